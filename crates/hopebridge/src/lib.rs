//! Core building blocks for a nonprofit content platform.
//!
//! The public site submits donations and training applications; the admin
//! console moderates them and controls what content is visible. Everything
//! with a state worth arguing about lives under [`moderation`]; `config`,
//! `telemetry`, and `error` carry the service scaffolding.

pub mod config;
pub mod error;
pub mod moderation;
pub mod telemetry;
