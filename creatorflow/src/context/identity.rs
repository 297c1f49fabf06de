//! Current-user identity used to stamp persisted records.

use crate::errors::IdentityError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an authenticated user, as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a provider-issued identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supplies the identity of the signed-in user.
///
/// The pipeline never authenticates on its own; it asks this provider who is
/// acting so records can be attributed.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the current user.
    async fn current_user(&self) -> Result<UserId, IdentityError>;
}

/// An identity provider that always returns the same user.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    user: UserId,
}

impl StaticIdentity {
    /// Creates a provider for the given user.
    #[must_use]
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: UserId::new(user),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Result<UserId, IdentityError> {
        Ok(self.user.clone())
    }
}

/// An identity provider with nobody signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIdentity;

#[async_trait]
impl IdentityProvider for AnonymousIdentity {
    async fn current_user(&self) -> Result<UserId, IdentityError> {
        Err(IdentityError::Unauthenticated)
    }
}
