use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use hopebridge::moderation::donations::{Donation, DonationId, DonationRepository};
use hopebridge::moderation::enrollments::{
    validate_unique_enrollment, Enrollment, EnrollmentId, EnrollmentRepository, PaymentStatus,
    Training, TrainingId, TrainingRepository, TrainingUpdate,
};
use hopebridge::moderation::lifecycle::{validate_one_way, ModerationDecision};
use hopebridge::moderation::publishing::{
    ContentId, ContentItem, ContentKind, ContentRepository, Publishable,
};
use hopebridge::moderation::store::{StoreError, WriteError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDonationRepository {
    records: Arc<Mutex<HashMap<DonationId, Donation>>>,
}

impl DonationRepository for InMemoryDonationRepository {
    fn insert(&self, donation: Donation) -> Result<Donation, StoreError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&donation.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(donation.id.clone(), donation.clone());
        Ok(donation)
    }

    fn fetch(&self, id: &DonationId) -> Result<Option<Donation>, StoreError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Donation>, StoreError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn finalize(
        &self,
        id: &DonationId,
        decision: ModerationDecision,
    ) -> Result<Donation, WriteError> {
        // Conditional write: the pending check and the status flip share
        // the lock, so a racing moderator sees AlreadyFinalized.
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        validate_one_way(record.status)?;
        record.status = decision.resolved_status();
        Ok(record.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTrainingRepository {
    records: Arc<Mutex<HashMap<TrainingId, Training>>>,
}

impl TrainingRepository for InMemoryTrainingRepository {
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
pub(crate) struct InMemoryEnrollmentRepository {
    records: Arc<Mutex<HashMap<EnrollmentId, Enrollment>>>,
}

impl EnrollmentRepository for InMemoryEnrollmentRepository {
    fn insert_unique(&self, enrollment: Enrollment) -> Result<Enrollment, WriteError> {
        // Uniqueness scan and insert under one lock; concurrent duplicate
        // applications cannot both land.
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryContentRepository {
    records: Arc<Mutex<HashMap<ContentId, ContentItem>>>,
}

impl ContentRepository for InMemoryContentRepository {
    fn insert(&self, item: ContentItem) -> Result<ContentItem, StoreError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&item.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    fn fetch(&self, id: &ContentId) -> Result<Option<ContentItem>, StoreError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ContentItem>, StoreError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn toggle(&self, id: &ContentId) -> Result<ContentItem, StoreError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        record.toggle_published();
        Ok(record.clone())
    }
}

/// Preload a fresh instance with sample records so the console has
/// something to show. Only used when APP_SEED_DEMO_DATA is set.
pub(crate) fn seed_demo_data(
    trainings: &InMemoryTrainingRepository,
    content: &InMemoryContentRepository,
) -> Result<(), StoreError> {
    trainings.insert(Training {
        id: TrainingId("trn-seed-001".to_string()),
        title: "Volunteer Orientation".to_string(),
        description: "Intro session for new volunteers.".to_string(),
        scheduled_on: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap_or_default(),
        price_cents: 0,
        image_reference: None,
        is_active: true,
        created_at: Utc::now(),
    })?;

    content.insert(ContentItem {
        id: ContentId("cnt-seed-001".to_string()),
        kind: ContentKind::Post,
        title: "Welcome to the Platform".to_string(),
        summary: "What we do and how to get involved.".to_string(),
        media_reference: None,
        author: Some("seed".to_string()),
        is_published: true,
        created_at: Utc::now(),
    })?;

    Ok(())
}
