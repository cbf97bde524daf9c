use crate::identity::AccessToken;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The header API Management reads a subscription key from.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP method {0} not supported")]
    UnsupportedMethod(String),
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// The methods we know how to forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Only POST and PUT carry a request body.
    pub fn sends_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }

    fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(ApiError::UnsupportedMethod(method.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

/// Status and raw body of whatever the API sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    /// The bearer token presented on every request.
    access_token: AccessToken,
    /// Sent alongside the bearer token if the gateway wants one.
    subscription_key: Option<String>,
}

impl ApiClient {
    /// Creates a new API client around the given access token.
    pub fn new(
        http: reqwest::Client,
        access_token: AccessToken,
        subscription_key: Option<String>,
    ) -> Self {
        Self {
            http,
            access_token,
            subscription_key,
        }
    }

    /// Sends a single request to `endpoint`.
    ///
    /// `method` is matched case-insensitively and is checked before anything
    /// touches the network. The response body is returned untouched, whatever
    /// the status code.
    pub async fn call(
        &self,
        endpoint: &str,
        method: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError> {
        let method: HttpMethod = method.parse()?;

        let mut request = self
            .http
            .request(method.as_reqwest(), endpoint)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.access_token.secret()),
            )
            .header(CONTENT_TYPE, "application/json");

        if let Some(key) = &self.subscription_key {
            request = request.header(SUBSCRIPTION_KEY_HEADER, key);
        }

        match body {
            Some(body) if method.sends_body() => request = request.json(body),
            Some(_) => log::debug!("Ignoring payload for {} request", method),
            None => {}
        }

        log::info!("Calling API endpoint {} with method {}", endpoint, method);
        let result = request.send().await?;

        let status = result.status().as_u16();
        let body = result.text().await?;
        log::info!("API response status: {}", status);
        log::info!("Response body: {}", body);

        Ok(ApiResponse { status, body })
    }
}
