//! The [`DListClient`] entry point.

use tracing::debug;

use crate::config::{ApiKey, ClientConfig};
use crate::error::Result;
use crate::stats::BotStats;
use crate::webhook::WebhookVerifier;

/// Entry point for the discordlist.gg API.
///
/// Holds the resolved configuration and exposes the stats endpoints through
/// [`DListClient::bot`] and vote verification through
/// [`DListClient::webhooks`].
#[derive(Debug, Clone)]
pub struct DListClient {
    bot: BotStats,
    webhooks: WebhookVerifier,
    config: ClientConfig,
}

impl DListClient {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns a generic error if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, ClientConfig::default())
    }

    /// Creates a client with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns a generic error if `api_key` is empty or the HTTP client
    /// cannot be built.
    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let api_key = ApiKey::new(api_key)?;
        let bot = BotStats::new(api_key, &config)?;
        debug!(
            base_url = %bot.base_url(),
            timeout_ms = config.timeout_millis(),
            "discordlist client created"
        );
        Ok(Self {
            bot,
            webhooks: WebhookVerifier::new(),
            config,
        })
    }

    /// Bot statistics endpoints.
    #[must_use]
    pub const fn bot(&self) -> &BotStats {
        &self.bot
    }

    /// Vote webhook verification.
    #[must_use]
    pub const fn webhooks(&self) -> &WebhookVerifier {
        &self.webhooks
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MILLIS};
    use crate::error::{Error, ErrorKind};
    use std::time::Duration;

    #[test]
    fn new_requires_api_key() {
        let result = DListClient::new("");
        assert!(matches!(
            result,
            Err(Error::Generic { ref message }) if message == "API key is required"
        ));
    }

    #[test]
    fn with_config_requires_api_key() {
        let config = ClientConfig::new().with_base_url("http://localhost:1234");
        let err = DListClient::with_config(String::new(), config).err();
        assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::Generic));
    }

    #[test]
    fn new_applies_defaults() {
        let client = DListClient::new("api-key").ok().unwrap();
        assert_eq!(client.config().base_url, DEFAULT_BASE_URL);
        assert_eq!(client.config().timeout_millis(), DEFAULT_TIMEOUT_MILLIS);
        assert_eq!(client.bot().base_url(), "https://api.discordlist.gg/v0");
        assert_eq!(client.bot().timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn with_config_overrides_defaults() {
        let config = ClientConfig::new()
            .with_base_url("http://127.0.0.1:8080/v0")
            .with_timeout_millis(250);
        let client = DListClient::with_config("api-key", config).ok().unwrap();
        assert_eq!(client.bot().base_url(), "http://127.0.0.1:8080/v0");
        assert_eq!(client.bot().timeout(), Duration::from_millis(250));
    }

    #[test]
    fn with_config_empty_base_url_uses_default() {
        let config = ClientConfig::new().with_base_url("");
        let client = DListClient::with_config("api-key", config).ok().unwrap();
        assert_eq!(client.bot().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = DListClient::new("top-secret-key").ok().unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("top-secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DListClient>();
    }
}
