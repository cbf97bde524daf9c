use std::fmt;
use thiserror::Error;
use url::Url;

/// The Microsoft identity platform host used when `AUTHORITY_HOST` is not set.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Possible issues while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AUTHORITY_HOST is not a valid URL: {0}")]
    InvalidAuthorityHost(#[source] url::ParseError),
    #[error("no API endpoint given; pass --endpoint or set APIM_ENDPOINT")]
    MissingEndpoint,
}

/// Loads `.env` from the working directory into the process environment.
/// Variables that are already set are left alone.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        // A missing .env is fine: everything may come from the real environment.
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err),
    }
}

/// Everything we read from the environment at startup.
///
/// This is built once and handed to the token acquirer and API caller by reference.
/// Every value is optional; an empty variable counts as unset.
#[derive(Clone)]
pub struct Config {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub scope: Option<String>,
    /// The default target for `--endpoint`.
    pub apim_endpoint: Option<String>,
    /// Sent as `Ocp-Apim-Subscription-Key` when present.
    pub subscription_key: Option<String>,
    pub authority_host: Url,
}

impl Config {
    /// Reads the process environment.
    /// Call [`load_dotenv`] first if `.env` should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let authority_host = get("AUTHORITY_HOST")
            .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string());
        let authority_host =
            Url::parse(&authority_host).map_err(ConfigError::InvalidAuthorityHost)?;

        Ok(Self {
            tenant_id: get("TENANT_ID"),
            client_id: get("CLIENT_ID"),
            client_secret: get("CLIENT_SECRET"),
            scope: get("SCOPE"),
            apim_endpoint: get("APIM_ENDPOINT"),
            subscription_key: get("SUBSCRIPTION_KEY"),
            authority_host,
        })
    }

    /// Picks the API endpoint: an explicit override first, then `APIM_ENDPOINT`.
    pub fn resolve_endpoint(&self, requested: Option<&str>) -> Result<String, ConfigError> {
        requested
            .filter(|endpoint| !endpoint.is_empty())
            .map(str::to_string)
            .or_else(|| self.apim_endpoint.clone())
            .ok_or(ConfigError::MissingEndpoint)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");

        f.debug_struct("Config")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("scope", &self.scope)
            .field("apim_endpoint", &self.apim_endpoint)
            .field("subscription_key", &redact(&self.subscription_key))
            .field("authority_host", &self.authority_host.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("TENANT_ID", "contoso"),
            ("CLIENT_ID", "app"),
            ("CLIENT_SECRET", "hunter2"),
            ("SCOPE", "api://backend/.default"),
            ("APIM_ENDPOINT", "https://apim.example.com/orders"),
            ("SUBSCRIPTION_KEY", "abc123"),
        ])
        .unwrap();

        assert_eq!(config.tenant_id.as_deref(), Some("contoso"));
        assert_eq!(config.client_id.as_deref(), Some("app"));
        assert_eq!(config.client_secret.as_deref(), Some("hunter2"));
        assert_eq!(config.scope.as_deref(), Some("api://backend/.default"));
        assert_eq!(
            config.apim_endpoint.as_deref(),
            Some("https://apim.example.com/orders")
        );
        assert_eq!(config.subscription_key.as_deref(), Some("abc123"));
        assert_eq!(config.authority_host.as_str(), "https://login.microsoftonline.com/");
    }

    #[test]
    fn empty_values_are_unset() {
        let config = config_from(&[("SUBSCRIPTION_KEY", ""), ("TENANT_ID", "")]).unwrap();
        assert!(config.subscription_key.is_none());
        assert!(config.tenant_id.is_none());
    }

    #[test]
    fn rejects_relative_authority_host() {
        let result = config_from(&[("AUTHORITY_HOST", "not a url")]);
        assert!(matches!(result, Err(ConfigError::InvalidAuthorityHost(_))));
    }

    #[test]
    fn endpoint_override_wins() {
        let config = config_from(&[("APIM_ENDPOINT", "https://default.example.com")]).unwrap();

        assert_eq!(
            config.resolve_endpoint(Some("https://other.example.com")).unwrap(),
            "https://other.example.com"
        );
        assert_eq!(
            config.resolve_endpoint(None).unwrap(),
            "https://default.example.com"
        );
    }

    #[test]
    fn endpoint_is_required() {
        let config = config_from(&[]).unwrap();
        assert!(matches!(
            config.resolve_endpoint(None),
            Err(ConfigError::MissingEndpoint)
        ));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = config_from(&[("CLIENT_SECRET", "hunter2"), ("SUBSCRIPTION_KEY", "abc123")])
            .unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("abc123"));
        assert!(printed.contains("<redacted>"));
    }
}
