use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::moderation::enrollments::domain::{
    validate_unique_enrollment, Enrollment, EnrollmentId, EnrollmentRequest, PaymentStatus,
    Training, TrainingDraft, TrainingId, TrainingUpdate, UserId,
};
use crate::moderation::enrollments::repository::{EnrollmentRepository, TrainingRepository};
use crate::moderation::enrollments::service::EnrollmentService;
use crate::moderation::identity::CallerIdentity;
use crate::moderation::lifecycle::{validate_one_way, ModerationDecision};
use crate::moderation::store::{StoreError, WriteError};

pub(super) fn draft() -> TrainingDraft {
    TrainingDraft {
        title: "Youth Mentoring Basics".to_string(),
        description: "Orientation for new volunteer mentors.".to_string(),
        scheduled_on: NaiveDate::from_ymd_opt(2026, 4, 18).expect("valid date"),
        price_cents: 1500,
        image_reference: Some("media/trainings/mentoring.jpg".to_string()),
        is_active: true,
    }
}

pub(super) fn request_for(training: &Training, user: &str) -> EnrollmentRequest {
    EnrollmentRequest {
        user_id: UserId(user.to_string()),
        training_id: training.id.clone(),
    }
}

pub(super) fn admin() -> CallerIdentity {
    CallerIdentity::admin("ops-1")
}

pub(super) fn build_service() -> (
    EnrollmentService<MemoryTrainingRepository, MemoryEnrollmentRepository>,
    Arc<MemoryTrainingRepository>,
    Arc<MemoryEnrollmentRepository>,
) {
    let trainings = Arc::new(MemoryTrainingRepository::default());
    let enrollments = Arc::new(MemoryEnrollmentRepository::default());
    let service = EnrollmentService::new(trainings.clone(), enrollments.clone());
    (service, trainings, enrollments)
}

/// Convenience: create an active training through the service.
pub(super) fn seeded_training(
    service: &EnrollmentService<MemoryTrainingRepository, MemoryEnrollmentRepository>,
) -> Training {
    service
        .create_training(draft(), &admin())
        .expect("training creation succeeds")
}

#[derive(Default, Clone)]
pub(super) struct MemoryTrainingRepository {
    records: Arc<Mutex<HashMap<TrainingId, Training>>>,
}

impl TrainingRepository for MemoryTrainingRepository {
    fn insert(&self, training: Training) -> Result<Training, StoreError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&training.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(training.id.clone(), training.clone());
        Ok(training)
    }

    fn fetch(&self, id: &TrainingId) -> Result<Option<Training>, StoreError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Training>, StoreError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn update(&self, id: &TrainingId, update: TrainingUpdate) -> Result<Training, StoreError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        record.apply_update(update);
        Ok(record.clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryEnrollmentRepository {
    records: Arc<Mutex<HashMap<EnrollmentId, Enrollment>>>,
}

impl EnrollmentRepository for MemoryEnrollmentRepository {
    fn insert_unique(&self, enrollment: Enrollment) -> Result<Enrollment, WriteError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let existing: Vec<Enrollment> = guard.values().cloned().collect();
        validate_unique_enrollment(&existing, &enrollment.user_id, &enrollment.training_id)?;
        guard.insert(enrollment.id.clone(), enrollment.clone());
        Ok(enrollment)
    }

    fn fetch(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StoreError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Enrollment>, StoreError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn finalize(
        &self,
        id: &EnrollmentId,
        decision: ModerationDecision,
    ) -> Result<Enrollment, WriteError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        validate_one_way(record.status)?;
        record.status = decision.resolved_status();
        Ok(record.clone())
    }

    fn mark_paid(
        &self,
        id: &EnrollmentId,
        payment_intent: Option<String>,
    ) -> Result<Enrollment, StoreError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        record.payment_status = PaymentStatus::Paid;
        if payment_intent.is_some() {
            record.payment_intent = payment_intent;
        }
        Ok(record.clone())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
