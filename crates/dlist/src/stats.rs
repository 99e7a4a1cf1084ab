//! Guild count reporting.
//!
//! [`BotStats`] posts a bot's guild count in one of three wire formats:
//!
//! | Method | Route | Payload |
//! |---|---|---|
//! | [`BotStats::set_guild_count`] | `PUT /bots/{id}/guilds` | `?count=n` |
//! | [`BotStats::set_guild_count_post`] | `POST /bots/{id}/guilds` | `{"count": n}` |
//! | [`BotStats::set_guild_count_top_gg`] | `POST /bots/{id}/stats` | `{"server_count": n}` |
//!
//! Each call validates its input, makes exactly one request and resolves to
//! `true` on any 2xx response. Failures are never retried.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ApiKey, ClientConfig};
use crate::error::{Error, Result};
use crate::validation::{
    validate_bot_id, validate_guild_count, BotId, GuildCount, GuildCountValue,
};

/// Body of `POST /bots/{id}/guilds`.
#[derive(Debug, Serialize)]
struct CountPayload {
    count: u64,
}

/// Body of `POST /bots/{id}/stats`.
#[derive(Debug, Serialize)]
struct CompatCountPayload {
    server_count: u64,
}

/// The supported ways of reporting a guild count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatsRoute {
    /// Preferred: count as a query parameter, no body.
    Put,
    /// Same path as `Put`, count in a JSON body.
    Post,
    /// Top.gg compatible path and body.
    TopGg,
}

impl StatsRoute {
    fn method(self) -> Method {
        match self {
            Self::Put => Method::PUT,
            Self::Post | Self::TopGg => Method::POST,
        }
    }

    const fn segment(self) -> &'static str {
        match self {
            Self::Put | Self::Post => "guilds",
            Self::TopGg => "stats",
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Put => "guilds_put",
            Self::Post => "guilds_post",
            Self::TopGg => "stats_top_gg",
        }
    }

    fn url(self, base_url: &str, bot_id: &BotId) -> String {
        format!("{base_url}/bots/{bot_id}/{}", self.segment())
    }

    fn attach(self, request: RequestBuilder, count: GuildCount) -> RequestBuilder {
        match self {
            Self::Put => request.query(&[("count", count.value())]),
            Self::Post => request.json(&CountPayload {
                count: count.value(),
            }),
            Self::TopGg => request.json(&CompatCountPayload {
                server_count: count.value(),
            }),
        }
    }
}

/// Client for the bot statistics endpoints.
#[derive(Debug, Clone)]
pub struct BotStats {
    http: Client,
    api_key: ApiKey,
    base_url: String,
    timeout: Duration,
}

impl BotStats {
    /// Creates a stats client bound to the given key and configuration.
    ///
    /// # Errors
    ///
    /// Returns a generic error if the HTTP client cannot be built.
    pub fn new(api_key: ApiKey, config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            api_key,
            base_url: config.normalized_base_url().to_string(),
            timeout: config.timeout,
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Updates a bot's guild count with `PUT /bots/{id}/guilds?count=n`.
    ///
    /// This is the preferred endpoint.
    ///
    /// # Errors
    ///
    /// Returns a generic error for invalid input, otherwise the classified
    /// failure of the request.
    pub async fn set_guild_count(
        &self,
        bot_id: impl std::fmt::Display,
        count: impl GuildCountValue,
    ) -> Result<bool> {
        self.report(StatsRoute::Put, bot_id, count).await
    }

    /// Updates a bot's guild count with `POST /bots/{id}/guilds` and a
    /// `{"count": n}` body.
    ///
    /// Compatibility endpoint; prefer [`BotStats::set_guild_count`].
    ///
    /// # Errors
    ///
    /// Returns a generic error for invalid input, otherwise the classified
    /// failure of the request.
    pub async fn set_guild_count_post(
        &self,
        bot_id: impl std::fmt::Display,
        count: impl GuildCountValue,
    ) -> Result<bool> {
        self.report(StatsRoute::Post, bot_id, count).await
    }

    /// Updates a bot's guild count with the Top.gg compatible
    /// `POST /bots/{id}/stats` and a `{"server_count": n}` body.
    ///
    /// Compatibility endpoint; prefer [`BotStats::set_guild_count`].
    ///
    /// # Errors
    ///
    /// Returns a generic error for invalid input, otherwise the classified
    /// failure of the request.
    pub async fn set_guild_count_top_gg(
        &self,
        bot_id: impl std::fmt::Display,
        count: impl GuildCountValue,
    ) -> Result<bool> {
        self.report(StatsRoute::TopGg, bot_id, count).await
    }

    async fn report(
        &self,
        route: StatsRoute,
        bot_id: impl std::fmt::Display,
        count: impl GuildCountValue,
    ) -> Result<bool> {
        let bot_id = validate_bot_id(bot_id)?;
        let count = validate_guild_count(count)?;

        let url = route.url(&self.base_url, &bot_id);
        debug!(bot_id = %bot_id, count = count.value(), route = route.name(), "reporting guild count");

        let request = self
            .http
            .request(route.method(), &url)
            .header(AUTHORIZATION, self.api_key.bearer())
            .header(CONTENT_TYPE, "application/json");
        let request = route.attach(request, count);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = Error::from(e);
                warn!(bot_id = %bot_id, route = route.name(), kind = %err.kind(), error = %err, "guild count request failed");
                return Err(err);
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!(bot_id = %bot_id, status = status.as_u16(), "guild count updated");
            return Ok(true);
        }

        let body = response.bytes().await.unwrap_or_default();
        let err = Error::from_response(status, &body);
        warn!(
            bot_id = %bot_id,
            route = route.name(),
            status = status.as_u16(),
            kind = %err.kind(),
            error = %err,
            "guild count rejected by API"
        );
        Err(err)
    }
}
