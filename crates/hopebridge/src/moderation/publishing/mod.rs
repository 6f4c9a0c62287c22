//! Publishable content: posts, podcast episodes, awareness resources.
//!
//! Unlike donations and enrollments, visibility here is a reversible
//! toggle — publish and unpublish are both always legal, and the shared
//! [`Publishable`] capability keeps the toggle semantics in one place.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests_support;

pub use domain::{
    ContentDraft, ContentId, ContentItem, ContentKind, ContentListingFilter, ContentView,
    InvalidContent, Publishable,
};
pub use repository::ContentRepository;
pub use router::content_router;
pub use service::{PublishingService, PublishingServiceError};
