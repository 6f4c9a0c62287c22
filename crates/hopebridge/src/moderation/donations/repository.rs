use super::domain::{Donation, DonationId};
use crate::moderation::lifecycle::ModerationDecision;
use crate::moderation::store::{StoreError, WriteError};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait DonationRepository: Send + Sync {
    fn insert(&self, donation: Donation) -> Result<Donation, StoreError>;
    fn fetch(&self, id: &DonationId) -> Result<Option<Donation>, StoreError>;
    fn list(&self) -> Result<Vec<Donation>, StoreError>;

    /// Apply an admin decision to a still-pending record.
    ///
    /// Implementations must perform the pending check and the status write
    /// as one atomic step, so two racing moderators cannot both finalize
    /// the same record: the loser observes `AlreadyFinalized` with the
    /// store untouched.
    fn finalize(
        &self,
        id: &DonationId,
        decision: ModerationDecision,
    ) -> Result<Donation, WriteError>;
}
