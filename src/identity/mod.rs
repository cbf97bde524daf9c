mod jwt;
mod oauth_client;

pub use jwt::UnverifiedClaims;
pub use oauth_client::acquire_token;

use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Possible errors while obtaining a token from the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0} is not set")]
    MissingSetting(&'static str),
    #[error("unable to build token endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("token request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("token request failed: {status} {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("token response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("access token not found in the response")]
    MissingAccessToken,
}

/// A bearer token as issued by the identity provider.
/// Its `Debug` output never includes the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// The outcome of a client-credentials exchange.
#[derive(Debug, Clone)]
pub struct AcquiredToken {
    pub access_token: AccessToken,
    /// `None` when the token's payload could not be decoded.
    pub claims: Option<UnverifiedClaims>,
}
