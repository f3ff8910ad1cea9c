//! Token provider adapters.

use crate::application::ports::{TokenError, TokenProvider};
use crate::domain::envelope::AuthToken;
use async_trait::async_trait;

/// Token provider that always returns the same token.
///
/// Suitable for long-lived service tokens and tests. Rotation is up to the
/// caller: build a new provider with the new token.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AuthToken,
}

impl StaticTokenProvider {
    /// Create a provider for a fixed token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AuthToken::new(token),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<AuthToken, TokenError> {
        Ok(self.token.clone())
    }
}
