//! Client for the [discordlist.gg](https://discordlist.gg) bot listing API.
//!
//! This crate covers the two things a listed bot needs:
//! - Reporting its guild count ([`BotStats`])
//! - Verifying signed vote webhooks ([`WebhookVerifier`])
//!
//! Failures are reported as a single [`Error`] enum. HTTP failures are mapped
//! by status code (400, 401, 403, 404, 429, 500, anything else is a server
//! error); nothing is retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use dlist::DListClient;
//!
//! # async fn example() -> dlist::Result<()> {
//! let client = DListClient::new("your-api-key")?;
//! client.bot().set_guild_count("123456789012345678", 1_500).await?;
//!
//! let vote = client.webhooks().verify_vote("webhook-secret", "<jwt from request body>")?;
//! println!("{} voted for {}", vote.voter_id(), vote.bot_id());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod stats;
pub mod validation;
pub mod webhook;

pub use client::DListClient;
pub use config::{ApiKey, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MILLIS};
pub use error::{classify, Error, ErrorKind, Result};
pub use stats::BotStats;
pub use validation::{
    validate_bot_id, validate_guild_count, BotId, GuildCount, GuildCountValue, ValidationError,
};
pub use webhook::{Vote, WebhookVerifier};
