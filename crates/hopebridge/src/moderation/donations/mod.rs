//! Donation intake and moderation.
//!
//! Donations arrive from the public site in the pending state and wait for
//! an admin to approve or reject them — a one-way decision enforced by the
//! repository's conditional `finalize` write.

pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Donation, DonationId, DonationSubmission, DonationView, InvalidDonation, PaymentMethod,
};
pub use export::{donations_csv, ExportError};
pub use repository::DonationRepository;
pub use router::donation_router;
pub use service::{DonationService, DonationServiceError};
