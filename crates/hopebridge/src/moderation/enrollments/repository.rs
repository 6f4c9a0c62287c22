use super::domain::{Enrollment, EnrollmentId, Training, TrainingId, TrainingUpdate};
use crate::moderation::lifecycle::ModerationDecision;
use crate::moderation::store::{StoreError, WriteError};

/// Storage abstraction for the training catalog.
pub trait TrainingRepository: Send + Sync {
    fn insert(&self, training: Training) -> Result<Training, StoreError>;
    fn fetch(&self, id: &TrainingId) -> Result<Option<Training>, StoreError>;
    fn list(&self) -> Result<Vec<Training>, StoreError>;
    /// Apply a partial update; `NotFound` if the id is unknown.
    fn update(&self, id: &TrainingId, update: TrainingUpdate) -> Result<Training, StoreError>;
}

/// Storage abstraction for enrollment records.
pub trait EnrollmentRepository: Send + Sync {
    /// Insert while enforcing the one-enrollment-per-(user, training) rule.
    ///
    /// The uniqueness scan and the write must happen under one lock so two
    /// concurrent applications for the same pair cannot both land; the
    /// loser observes `DuplicateEnrollment`.
    fn insert_unique(&self, enrollment: Enrollment) -> Result<Enrollment, WriteError>;

    fn fetch(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StoreError>;
    fn list(&self) -> Result<Vec<Enrollment>, StoreError>;

    /// Apply an admin decision to a still-pending record, leaving the
    /// payment axis untouched. Same atomicity contract as
    /// [`crate::moderation::donations::DonationRepository::finalize`].
    fn finalize(
        &self,
        id: &EnrollmentId,
        decision: ModerationDecision,
    ) -> Result<Enrollment, WriteError>;

    /// Record a payment confirmation, independent of moderation status.
    /// Overwriting `paid` with `paid` is benign.
    fn mark_paid(
        &self,
        id: &EnrollmentId,
        payment_intent: Option<String>,
    ) -> Result<Enrollment, StoreError>;
}
