use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    validate_unique_enrollment, Enrollment, EnrollmentId, EnrollmentRequest, InvalidEnrollment,
    InvalidTraining, PaymentStatus, Training, TrainingDraft, TrainingFilter, TrainingId,
    TrainingUpdate, UserId,
};
use super::repository::{EnrollmentRepository, TrainingRepository};
use crate::moderation::identity::{CallerIdentity, UnauthorizedError};
use crate::moderation::lifecycle::{
    compute_listing, LifecycleError, ListingFilter, ModerationDecision, ModerationStatus,
};
use crate::moderation::store::{StoreError, WriteError};

static TRAINING_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ENROLLMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_training_id() -> TrainingId {
    let id = TRAINING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TrainingId(format!("trn-{id:06}"))
}

fn next_enrollment_id() -> EnrollmentId {
    let id = ENROLLMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EnrollmentId(format!("enr-{id:06}"))
}

/// Training catalog management plus the enrollment application and
/// moderation flow.
pub struct EnrollmentService<T, E> {
    trainings: Arc<T>,
    enrollments: Arc<E>,
}

impl<T, E> EnrollmentService<T, E>
where
    T: TrainingRepository + 'static,
    E: EnrollmentRepository + 'static,
{
    pub fn new(trainings: Arc<T>, enrollments: Arc<E>) -> Self {
        Self {
            trainings,
            enrollments,
        }
    }

    /// Admin: publish a new training offering.
    pub fn create_training(
        &self,
        draft: TrainingDraft,
        caller: &CallerIdentity,
    ) -> Result<Training, EnrollmentServiceError> {
        caller.require_admin()?;
        draft.validate()?;

        let TrainingDraft {
            title,
            description,
            scheduled_on,
            price_cents,
            image_reference,
            is_active,
        } = draft;

        let training = Training {
            id: next_training_id(),
            title,
            description,
            scheduled_on,
            price_cents,
            image_reference,
            is_active,
            created_at: Utc::now(),
        };

        let stored = self.trainings.insert(training)?;
        info!(training_id = %stored.id.0, title = %stored.title, "training created");
        Ok(stored)
    }

    /// Admin: partially update an existing training.
    pub fn update_training(
        &self,
        id: &TrainingId,
        update: TrainingUpdate,
        caller: &CallerIdentity,
    ) -> Result<Training, EnrollmentServiceError> {
        caller.require_admin()?;
        update.validate()?;
        let updated = self.trainings.update(id, update)?;
        info!(training_id = %updated.id.0, "training updated");
        Ok(updated)
    }

    pub fn get_training(&self, id: &TrainingId) -> Result<Training, EnrollmentServiceError> {
        let training = self.trainings.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(training)
    }

    /// Public catalog listing, newest offerings first.
    pub fn list_trainings(
        &self,
        filter: TrainingFilter,
    ) -> Result<Vec<Training>, EnrollmentServiceError> {
        let mut trainings = self.trainings.list()?;
        if filter.active_only {
            trainings.retain(|training| training.is_active);
        }
        trainings.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(trainings)
    }

    /// Public: apply for a training. The offering must exist and be active,
    /// and the (user, training) pair must not have applied before — in any
    /// status. Creates the record pending and unpaid; no payment is
    /// initiated here.
    pub fn apply(
        &self,
        request: EnrollmentRequest,
    ) -> Result<Enrollment, EnrollmentServiceError> {
        request.validate()?;

        let training = self
            .trainings
            .fetch(&request.training_id)?
            .ok_or(StoreError::NotFound)?;
        if !training.is_active {
            return Err(InvalidEnrollment::TrainingInactive {
                training_id: training.id.0,
            }
            .into());
        }

        let enrollment = Enrollment {
            id: next_enrollment_id(),
            user_id: request.user_id,
            training_id: request.training_id,
            status: ModerationStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_intent: None,
            applied_at: Utc::now(),
        };

        let stored = self.enrollments.insert_unique(enrollment)?;
        info!(
            enrollment_id = %stored.id.0,
            training_id = %stored.training_id.0,
            "enrollment application recorded"
        );
        Ok(stored)
    }

    /// Admin: approve or reject a pending application. Payment settlement
    /// is untouched — the two axes are owned by different parties.
    pub fn update_status(
        &self,
        id: &EnrollmentId,
        decision: ModerationDecision,
        caller: &CallerIdentity,
    ) -> Result<Enrollment, EnrollmentServiceError> {
        caller.require_admin()?;

        let updated = self.enrollments.finalize(id, decision)?;
        info!(
            enrollment_id = %updated.id.0,
            decision = decision.label(),
            admin = %caller.id,
            "enrollment finalized"
        );
        Ok(updated)
    }

    /// Payment-confirmation event from the settlement provider. The caller
    /// is trusted upstream; this core only records the outcome.
    pub fn confirm_payment(
        &self,
        id: &EnrollmentId,
        payment_intent: Option<String>,
    ) -> Result<Enrollment, EnrollmentServiceError> {
        let updated = self.enrollments.mark_paid(id, payment_intent)?;
        info!(enrollment_id = %updated.id.0, "enrollment payment confirmed");
        Ok(updated)
    }

    pub fn get(
        &self,
        id: &EnrollmentId,
        caller: &CallerIdentity,
    ) -> Result<Enrollment, EnrollmentServiceError> {
        caller.require_admin()?;
        let enrollment = self.enrollments.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(enrollment)
    }

    pub fn list(
        &self,
        filter: ListingFilter,
        caller: &CallerIdentity,
    ) -> Result<Vec<Enrollment>, EnrollmentServiceError> {
        caller.require_admin()?;
        let records = self.enrollments.list()?;
        Ok(compute_listing(records, filter))
    }

    /// Whether a user already holds a record for the training, used by the
    /// public site to disable the apply button. Pure check over the store.
    pub fn has_applied(
        &self,
        user_id: &UserId,
        training_id: &TrainingId,
    ) -> Result<bool, EnrollmentServiceError> {
        let records = self.enrollments.list()?;
        Ok(validate_unique_enrollment(&records, user_id, training_id).is_err())
    }
}

/// Error raised by the enrollment service.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentServiceError {
    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedError),
    #[error(transparent)]
    InvalidTraining(#[from] InvalidTraining),
    #[error(transparent)]
    InvalidEnrollment(#[from] InvalidEnrollment),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<WriteError> for EnrollmentServiceError {
    fn from(value: WriteError) -> Self {
        match value {
            WriteError::Lifecycle(err) => Self::Lifecycle(err),
            WriteError::Store(err) => Self::Store(err),
        }
    }
}
