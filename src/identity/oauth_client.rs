use super::{jwt, AccessToken, AcquiredToken, AuthError};
use crate::config::Config;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

/// The parts of the token endpoint's response we care about.
/// Everything else (`token_type`, `expires_in`, ...) is ignored.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Builds `{authority}/{tenant}/oauth2/v2.0/token`.
pub fn token_endpoint(config: &Config) -> Result<Url, AuthError> {
    let tenant_id = config
        .tenant_id
        .as_deref()
        .ok_or(AuthError::MissingSetting("TENANT_ID"))?;

    // `Url::join` drops the last path segment unless the base ends in a slash.
    let mut authority = config.authority_host.clone();
    if !authority.path().ends_with('/') {
        let path = format!("{}/", authority.path());
        authority.set_path(&path);
    }

    Ok(authority.join(&format!("{tenant_id}/oauth2/v2.0/token"))?)
}

/// Obtain an access token via the OAuth2 client credentials grant.
///
/// The token's claims are decoded for inspection only. A token we cannot
/// decode is still a perfectly usable bearer token, so decode failures are
/// logged and no claims are returned.
pub async fn acquire_token(
    client: &reqwest::Client,
    config: &Config,
) -> Result<AcquiredToken, AuthError> {
    let endpoint = token_endpoint(config)?;

    // Unset values are left out of the form entirely; the identity provider
    // will tell us which one it wanted.
    let form: Vec<(&str, &str)> = [
        ("grant_type", Some("client_credentials")),
        ("client_id", config.client_id.as_deref()),
        ("client_secret", config.client_secret.as_deref()),
        ("scope", config.scope.as_deref()),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|value| (name, value)))
    .collect();

    log::info!("Requesting token from {}", endpoint);
    let result = client.post(endpoint).form(&form).send().await?;

    let status = result.status();
    let response_text = result.text().await?;
    log::debug!("Token request status: {}", status);

    if status != StatusCode::OK {
        return Err(AuthError::Rejected {
            status,
            body: response_text,
        });
    }

    let token_data: TokenResponse = serde_json::from_str(&response_text)?;
    let access_token = token_data
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingAccessToken)?;
    log::info!("Access token acquired.");

    let claims = match jwt::decode_unverified(&access_token) {
        Ok(claims) => {
            log::info!("Decoded token claims:\n{}", claims);
            Some(claims)
        }
        Err(err) => {
            log::warn!("Failed to decode token claims: {}", err);
            None
        }
    };

    Ok(AcquiredToken {
        access_token: AccessToken::new(access_token),
        claims,
    })
}
