//! Pure transition rules shared by the moderated entity families.
//!
//! Nothing in here touches storage or transport: callers pass in the
//! recorded state and get back a verdict. Approve/reject are one-way and
//! only ever leave the pending state; publish visibility is a reversible
//! toggle with no precondition. Keeping the two shapes separate is the
//! point — a rejected donation must never quietly become approvable the
//! way a draft becomes publishable.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation state carried by donations and enrollments.
///
/// A single enum rather than `approved`/`rejected` booleans, so the
/// "never both" invariant is unrepresentable. Views re-derive the flags
/// for API consumers that render status badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_pending(self) -> bool {
        matches!(self, ModerationStatus::Pending)
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Admin verdict applied to a pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationDecision {
    Approve,
    Reject,
}

impl ModerationDecision {
    pub const fn resolved_status(self) -> ModerationStatus {
        match self {
            ModerationDecision::Approve => ModerationStatus::Approved,
            ModerationDecision::Reject => ModerationStatus::Rejected,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ModerationDecision::Approve => "approve",
            ModerationDecision::Reject => "reject",
        }
    }
}

/// Failures raised by the pure lifecycle checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("record was already finalized as {current}")]
    AlreadyFinalized { current: ModerationStatus },
    #[error("an enrollment already exists for user {user_id} and training {training_id}")]
    DuplicateEnrollment {
        user_id: String,
        training_id: String,
    },
}

/// A one-way transition is only legal from the pending state. Any other
/// current state rejects the request, which is what makes a repeated
/// approve (or a racing reject) a detected error instead of a silent
/// overwrite.
pub fn validate_one_way(current: ModerationStatus) -> Result<(), LifecycleError> {
    if current.is_pending() {
        Ok(())
    } else {
        Err(LifecycleError::AlreadyFinalized { current })
    }
}

/// Publish visibility flips unconditionally.
pub const fn toggle_published(current: bool) -> bool {
    !current
}

/// Listing options accepted by the admin list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListingFilter {
    #[serde(default)]
    pub pending_only: bool,
}

/// Implemented by every record that shows up in a moderation listing.
pub trait LifecycleRecord {
    fn moderation_status(&self) -> ModerationStatus;
    fn recorded_at(&self) -> DateTime<Utc>;
    fn record_id(&self) -> &str;
}

/// Filter and order records for listing: newest first, ties broken by
/// identifier so repeated calls page identically.
pub fn compute_listing<T: LifecycleRecord>(mut records: Vec<T>, filter: ListingFilter) -> Vec<T> {
    if filter.pending_only {
        records.retain(|record| record.moderation_status().is_pending());
    }

    records.sort_by(|a, b| {
        b.recorded_at()
            .cmp(&a.recorded_at())
            .then_with(|| a.record_id().cmp(b.record_id()))
    });
    records
}
