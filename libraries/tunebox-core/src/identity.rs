//! Caller identity as resolved by the authentication layer
//!
//! The library never authenticates anyone. It only needs the user id the
//! surrounding service extracted from its claims, and whether the caller is
//! signed in at all.

use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// Substring identifying the claim that carries the user id
pub const NAME_IDENTIFIER_CLAIM: &str = "nameidentifier";

/// A single `(type, value)` claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub kind: String,
    pub value: String,
}

impl Claim {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Claim carrying a user id
    pub fn name_identifier(user_id: impl Into<String>) -> Self {
        Self::new(NAME_IDENTIFIER_CLAIM, user_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    claims: Vec<Claim>,
    authenticated: bool,
}

impl Identity {
    /// Signed-out caller with no claims
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(claims: Vec<Claim>) -> Self {
        Self {
            claims,
            authenticated: true,
        }
    }

    /// Value of the first claim whose type mentions the name identifier
    pub fn user_id(&self) -> Option<UserId> {
        self.claims
            .iter()
            .find(|c| c.kind.contains(NAME_IDENTIFIER_CLAIM))
            .map(|c| UserId::new(c.value.clone()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }
}
