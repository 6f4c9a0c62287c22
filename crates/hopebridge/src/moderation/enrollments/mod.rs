//! Training catalog and enrollment moderation.
//!
//! Users apply to active trainings; at most one enrollment exists per
//! (user, training) pair, whatever its status. Admin approval and payment
//! settlement are independent axes on the same record.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    validate_unique_enrollment, Enrollment, EnrollmentId, EnrollmentRequest, EnrollmentView,
    InvalidEnrollment, InvalidTraining, PaymentStatus, Training, TrainingDraft, TrainingFilter,
    TrainingId, TrainingUpdate, UserId,
};
pub use repository::{EnrollmentRepository, TrainingRepository};
pub use router::{enrollment_router, PaymentConfirmationRequest, UpdateEnrollmentStatusRequest};
pub use service::{EnrollmentService, EnrollmentServiceError};
