use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::moderation::donations::domain::{
    Donation, DonationId, DonationSubmission, PaymentMethod,
};
use crate::moderation::donations::repository::DonationRepository;
use crate::moderation::donations::service::DonationService;
use crate::moderation::lifecycle::{validate_one_way, ModerationDecision, ModerationStatus};
use crate::moderation::store::{StoreError, WriteError};

pub(super) fn submission() -> DonationSubmission {
    DonationSubmission {
        donor: Some("donor-041".to_string()),
        amount_cents: 5000,
        donated_on: NaiveDate::from_ymd_opt(2026, 1, 12).expect("valid date"),
        method: PaymentMethod::Card,
        campaign: "Winter Drive".to_string(),
        receipt_reference: None,
    }
}

pub(super) fn anonymous_submission() -> DonationSubmission {
    DonationSubmission {
        donor: None,
        ..submission()
    }
}

pub(super) fn recorded_at(seconds: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 12, 9, 0, seconds)
        .single()
        .expect("valid timestamp")
}

pub(super) fn donation_record(
    id: &str,
    status: ModerationStatus,
    submitted_at: DateTime<Utc>,
) -> Donation {
    Donation {
        id: DonationId(id.to_string()),
        donor: Some("donor-041".to_string()),
        amount_cents: 2500,
        donated_on: NaiveDate::from_ymd_opt(2026, 1, 10).expect("valid date"),
        method: PaymentMethod::BankTransfer,
        campaign: "Winter Drive".to_string(),
        receipt_reference: None,
        status,
        submitted_at,
    }
}

pub(super) fn build_service() -> (
    DonationService<MemoryDonationRepository>,
    Arc<MemoryDonationRepository>,
) {
    let repository = Arc::new(MemoryDonationRepository::default());
    let service = DonationService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryDonationRepository {
    records: Arc<Mutex<HashMap<DonationId, Donation>>>,
}

impl DonationRepository for MemoryDonationRepository {
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
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        validate_one_way(record.status)?;
        record.status = decision.resolved_status();
        Ok(record.clone())
    }
}

pub(super) struct UnavailableRepository;

impl DonationRepository for UnavailableRepository {
    fn insert(&self, _donation: Donation) -> Result<Donation, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &DonationId) -> Result<Option<Donation>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Donation>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn finalize(
        &self,
        _id: &DonationId,
        _decision: ModerationDecision,
    ) -> Result<Donation, WriteError> {
        Err(StoreError::Unavailable("database offline".to_string()).into())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
