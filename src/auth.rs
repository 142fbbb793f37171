/// Caller authentication boundary.
///
/// The lookup core never sees credentials. The HTTP layer resolves a bearer
/// token to a [`Caller`] through an [`Authenticator`] and rejects the
/// request otherwise.
use std::collections::HashMap;

use crate::config::AuthConfig;

/// An already-authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub name: String,
}

pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Option<Caller>;
}

/// Accepts a fixed set of bearer tokens from configuration.
#[derive(Debug, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, String>,
}

impl StaticTokenAuthenticator {
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        let tokens = config
            .tokens
            .iter()
            .map(|t| (t.token.clone(), t.caller.clone()))
            .collect();
        Self { tokens }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, token: &str) -> Option<Caller> {
        self.tokens.get(token).map(|name| Caller { name: name.clone() })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
