//! Caller identity resolved by the upstream auth layer.
//!
//! This core never sees the bearer credential; a trusted proxy resolves it
//! and forwards the result in headers. Admin gates compare the role value
//! exactly — anything that is not the literal string `admin`, including a
//! missing header, is a member.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

pub const CALLER_ID_HEADER: &str = "x-caller-id";
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

const ANONYMOUS_CALLER: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Only the exact string `admin` grants the admin role.
    pub fn parse(raw: &str) -> Self {
        if raw == "admin" {
            Role::Admin
        } else {
            Role::Member
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }
}

/// The resolved `{id, role}` pair threaded into every mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub id: String,
    pub role: Role,
}

impl CallerIdentity {
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Admin,
        }
    }

    pub fn member(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Member,
        }
    }

    pub fn anonymous() -> Self {
        Self::member(ANONYMOUS_CALLER)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), UnauthorizedError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(UnauthorizedError {
                caller_id: self.id.clone(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("caller '{caller_id}' lacks the admin role")]
pub struct UnauthorizedError {
    pub caller_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(CALLER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(ANONYMOUS_CALLER)
            .to_string();

        let role = parts
            .headers
            .get(CALLER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(Role::parse)
            .unwrap_or(Role::Member);

        Ok(CallerIdentity { id, role })
    }
}
