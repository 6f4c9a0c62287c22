use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Donation, DonationId, DonationSubmission, InvalidDonation};
use super::export::{donations_csv, ExportError};
use super::repository::DonationRepository;
use crate::moderation::identity::{CallerIdentity, UnauthorizedError};
use crate::moderation::lifecycle::{
    compute_listing, LifecycleError, ListingFilter, ModerationDecision, ModerationStatus,
};
use crate::moderation::store::{StoreError, WriteError};

static DONATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_donation_id() -> DonationId {
    let id = DONATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DonationId(format!("don-{id:06}"))
}

/// Donation intake and moderation operations.
pub struct DonationService<R> {
    repository: Arc<R>,
}

impl<R> DonationService<R>
where
    R: DonationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Record a public donation in the pending state. No authorization
    /// required; the record waits for an admin verdict.
    pub fn submit(
        &self,
        submission: DonationSubmission,
    ) -> Result<Donation, DonationServiceError> {
        submission.validate()?;

        let DonationSubmission {
            donor,
            amount_cents,
            donated_on,
            method,
            campaign,
            receipt_reference,
        } = submission;

        let donation = Donation {
            id: next_donation_id(),
            donor,
            amount_cents,
            donated_on,
            method,
            campaign,
            receipt_reference,
            status: ModerationStatus::Pending,
            submitted_at: Utc::now(),
        };

        let stored = self.repository.insert(donation)?;
        info!(
            donation_id = %stored.id.0,
            campaign = %stored.campaign,
            "donation recorded"
        );
        Ok(stored)
    }

    pub fn approve(
        &self,
        id: &DonationId,
        caller: &CallerIdentity,
    ) -> Result<Donation, DonationServiceError> {
        self.decide(id, ModerationDecision::Approve, caller)
    }

    pub fn reject(
        &self,
        id: &DonationId,
        caller: &CallerIdentity,
    ) -> Result<Donation, DonationServiceError> {
        self.decide(id, ModerationDecision::Reject, caller)
    }

    fn decide(
        &self,
        id: &DonationId,
        decision: ModerationDecision,
        caller: &CallerIdentity,
    ) -> Result<Donation, DonationServiceError> {
        caller.require_admin()?;

        let updated = self.repository.finalize(id, decision)?;
        info!(
            donation_id = %updated.id.0,
            decision = decision.label(),
            admin = %caller.id,
            "donation finalized"
        );
        Ok(updated)
    }

    pub fn get(
        &self,
        id: &DonationId,
        caller: &CallerIdentity,
    ) -> Result<Donation, DonationServiceError> {
        caller.require_admin()?;
        let donation = self.repository.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(donation)
    }

    pub fn list(
        &self,
        filter: ListingFilter,
        caller: &CallerIdentity,
    ) -> Result<Vec<Donation>, DonationServiceError> {
        caller.require_admin()?;
        let records = self.repository.list()?;
        Ok(compute_listing(records, filter))
    }

    /// Render the full ledger as CSV for finance reconciliation.
    pub fn export(&self, caller: &CallerIdentity) -> Result<String, DonationServiceError> {
        let records = self.list(ListingFilter::default(), caller)?;
        Ok(donations_csv(&records)?)
    }
}

/// Error raised by the donation service.
#[derive(Debug, thiserror::Error)]
pub enum DonationServiceError {
    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedError),
    #[error(transparent)]
    Invalid(#[from] InvalidDonation),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<WriteError> for DonationServiceError {
    fn from(value: WriteError) -> Self {
        match value {
            WriteError::Lifecycle(err) => Self::Lifecycle(err),
            WriteError::Store(err) => Self::Store(err),
        }
    }
}
