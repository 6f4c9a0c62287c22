use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::moderation::lifecycle::{LifecycleError, LifecycleRecord, ModerationStatus};

/// Identifier wrapper for training offerings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingId(pub String);

/// Identifier wrapper for enrollment records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnrollmentId(pub String);

/// Identifier wrapper for platform users referenced by enrollments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Admin-provided payload for a new training offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDraft {
    pub title: String,
    pub description: String,
    pub scheduled_on: NaiveDate,
    pub price_cents: u32,
    #[serde(default)]
    pub image_reference: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl TrainingDraft {
    pub fn validate(&self) -> Result<(), InvalidTraining> {
        if self.title.trim().is_empty() {
            return Err(InvalidTraining::MissingTitle);
        }
        Ok(())
    }
}

/// Partial update applied to an existing training; unset fields keep
/// their recorded values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scheduled_on: Option<NaiveDate>,
    #[serde(default)]
    pub price_cents: Option<u32>,
    #[serde(default)]
    pub image_reference: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TrainingUpdate {
    pub fn validate(&self) -> Result<(), InvalidTraining> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(InvalidTraining::MissingTitle);
            }
        }
        Ok(())
    }
}

/// Constraint violations on training management payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTraining {
    #[error("training title is required")]
    MissingTitle,
}

/// A program offering users can apply to while it is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    pub id: TrainingId,
    pub title: String,
    pub description: String,
    pub scheduled_on: NaiveDate,
    pub price_cents: u32,
    pub image_reference: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Training {
    pub fn apply_update(&mut self, update: TrainingUpdate) {
        let TrainingUpdate {
            title,
            description,
            scheduled_on,
            price_cents,
            image_reference,
            is_active,
        } = update;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(scheduled_on) = scheduled_on {
            self.scheduled_on = scheduled_on;
        }
        if let Some(price_cents) = price_cents {
            self.price_cents = price_cents;
        }
        if let Some(image_reference) = image_reference {
            self.image_reference = image_reference;
        }
        if let Some(is_active) = is_active {
            self.is_active = is_active;
        }
    }
}

/// Listing options for the public training catalog.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TrainingFilter {
    #[serde(default)]
    pub active_only: bool,
}

/// Settlement state of an enrollment, independent of moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// Public application payload joining a user to a training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    pub user_id: UserId,
    pub training_id: TrainingId,
}

impl EnrollmentRequest {
    pub fn validate(&self) -> Result<(), InvalidEnrollment> {
        if self.user_id.0.trim().is_empty() {
            return Err(InvalidEnrollment::MissingUser);
        }
        Ok(())
    }
}

/// Constraint violations on an enrollment application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidEnrollment {
    #[error("user reference is required")]
    MissingUser,
    #[error("training {training_id} is not accepting applications")]
    TrainingInactive { training_id: String },
}

/// Join record between a user and a training. The (user, training) pair is
/// immutable after creation and unique across the store; moderation status
/// and payment settlement move on independent axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub training_id: TrainingId,
    pub status: ModerationStatus,
    pub payment_status: PaymentStatus,
    pub payment_intent: Option<String>,
    pub applied_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn view(&self) -> EnrollmentView {
        EnrollmentView {
            enrollment_id: self.id.clone(),
            user_id: self.user_id.clone(),
            training_id: self.training_id.clone(),
            status: self.status.label(),
            payment_status: self.payment_status.label(),
            payment_intent: self.payment_intent.clone(),
            applied_at: self.applied_at,
        }
    }
}

impl LifecycleRecord for Enrollment {
    fn moderation_status(&self) -> ModerationStatus {
        self.status
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.applied_at
    }

    fn record_id(&self) -> &str {
        &self.id.0
    }
}

/// Any existing record for the pair blocks a new application, whatever its
/// status: there is no re-application path after rejection.
pub fn validate_unique_enrollment(
    existing: &[Enrollment],
    user_id: &UserId,
    training_id: &TrainingId,
) -> Result<(), LifecycleError> {
    let duplicate = existing
        .iter()
        .any(|record| &record.user_id == user_id && &record.training_id == training_id);

    if duplicate {
        Err(LifecycleError::DuplicateEnrollment {
            user_id: user_id.0.clone(),
            training_id: training_id.0.clone(),
        })
    } else {
        Ok(())
    }
}

/// Serialized enrollment shape for the admin console.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentView {
    pub enrollment_id: EnrollmentId,
    pub user_id: UserId,
    pub training_id: TrainingId,
    pub status: &'static str,
    pub payment_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent: Option<String>,
    pub applied_at: DateTime<Utc>,
}
