use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::moderation::lifecycle::{LifecycleRecord, ModerationStatus};

/// Identifier wrapper for recorded donations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DonationId(pub String);

/// Payment channels the donation form accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    Check,
    Cash,
}

impl PaymentMethod {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Check => "check",
            PaymentMethod::Cash => "cash",
        }
    }
}

/// Inbound payload from the public donation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationSubmission {
    /// Donor reference; omitted for anonymous gifts.
    #[serde(default)]
    pub donor: Option<String>,
    pub amount_cents: u32,
    pub donated_on: NaiveDate,
    pub method: PaymentMethod,
    pub campaign: String,
    #[serde(default)]
    pub receipt_reference: Option<String>,
}

impl DonationSubmission {
    pub fn validate(&self) -> Result<(), InvalidDonation> {
        if self.amount_cents == 0 {
            return Err(InvalidDonation::NonPositiveAmount);
        }
        if self.campaign.trim().is_empty() {
            return Err(InvalidDonation::MissingCampaign);
        }
        if let Some(donor) = &self.donor {
            if donor.trim().is_empty() {
                return Err(InvalidDonation::BlankDonor);
            }
        }
        Ok(())
    }
}

/// Constraint violations on a donation submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDonation {
    #[error("donation amount must be positive")]
    NonPositiveAmount,
    #[error("campaign label is required")]
    MissingCampaign,
    #[error("donor reference must not be blank when present")]
    BlankDonor,
}

/// A recorded donation. Created pending; finalized exactly once by an
/// admin decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub id: DonationId,
    pub donor: Option<String>,
    pub amount_cents: u32,
    pub donated_on: NaiveDate,
    pub method: PaymentMethod,
    pub campaign: String,
    pub receipt_reference: Option<String>,
    pub status: ModerationStatus,
    pub submitted_at: DateTime<Utc>,
}

impl Donation {
    pub fn view(&self) -> DonationView {
        DonationView {
            donation_id: self.id.clone(),
            donor: self.donor.clone(),
            amount_cents: self.amount_cents,
            donated_on: self.donated_on,
            method: self.method.label(),
            campaign: self.campaign.clone(),
            receipt_reference: self.receipt_reference.clone(),
            status: self.status.label(),
            approved: self.status == ModerationStatus::Approved,
            rejected: self.status == ModerationStatus::Rejected,
            submitted_at: self.submitted_at,
        }
    }
}

impl LifecycleRecord for Donation {
    fn moderation_status(&self) -> ModerationStatus {
        self.status
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    fn record_id(&self) -> &str {
        &self.id.0
    }
}

/// Serialized shape handed to the admin console; carries the state flags
/// so status badges render without re-deriving them.
#[derive(Debug, Clone, Serialize)]
pub struct DonationView {
    pub donation_id: DonationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor: Option<String>,
    pub amount_cents: u32,
    pub donated_on: NaiveDate,
    pub method: &'static str,
    pub campaign: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_reference: Option<String>,
    pub status: &'static str,
    pub approved: bool,
    pub rejected: bool,
    pub submitted_at: DateTime<Utc>,
}
