//! Moderation and publish-lifecycle workflows.
//!
//! Three entity families share the same anatomy: a domain model, a storage
//! trait, a service gluing identity checks to lifecycle rules, and an axum
//! router. The lifecycle rules themselves are pure functions in
//! [`lifecycle`]; atomicity for concurrent admin actions is owed by the
//! storage implementations (see the conditional-write contracts on each
//! repository trait).

pub mod donations;
pub mod enrollments;
pub mod identity;
pub mod lifecycle;
pub mod publishing;
pub mod store;

pub use identity::{CallerIdentity, Role, UnauthorizedError};
pub use lifecycle::{
    LifecycleError, LifecycleRecord, ListingFilter, ModerationDecision, ModerationStatus,
};
pub use store::{StoreError, WriteError};
