use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Why a token's payload could not be turned into claims.
/// None of these are fatal to a run.
#[derive(Debug, Error)]
pub enum ClaimDecodeError {
    #[error("token has {0} segments, expected 3")]
    Malformed(usize),
    #[error("token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token payload is not a JSON object")]
    NotAnObject,
}

/// Claims read out of a token's payload *without* checking its signature.
///
/// Anyone can mint a token with whatever claims they like, so these are only
/// ever good for display. There is intentionally no way to turn this into a
/// plain map or to treat it as an authenticated identity.
#[derive(Debug, Clone, PartialEq)]
pub struct UnverifiedClaims(Map<String, Value>);

#[cfg(test)]
impl UnverifiedClaims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

impl fmt::Display for UnverifiedClaims {
    /// Pretty JSON, two-space indented.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pretty = serde_json::to_string_pretty(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&pretty)
    }
}

/// An extraordinarily basic JWT payload reader.
pub fn decode_unverified(token: &str) -> Result<UnverifiedClaims, ClaimDecodeError> {
    // There's three components to a JWT: its header, its payload, and signature.
    // These are separated by `.`s. We only care about the payload.
    let components: Vec<&str> = token.split('.').collect();
    if components.len() != 3 {
        return Err(ClaimDecodeError::Malformed(components.len()));
    }

    // Components use the URL-safe alphabet and are normally unpadded,
    // though some issuers pad anyway.
    let encoded_payload = components[1].trim_end_matches('=');
    let decoded_payload = URL_SAFE_NO_PAD.decode(encoded_payload)?;

    match serde_json::from_slice(&decoded_payload)? {
        Value::Object(claims) => Ok(UnverifiedClaims(claims)),
        _ => Err(ClaimDecodeError::NotAnObject),
    }
}
