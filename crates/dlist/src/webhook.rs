//! Vote webhook verification.
//!
//! discordlist.gg delivers votes as an HS256-signed JWT. [`WebhookVerifier`]
//! checks the signature against the webhook secret and turns the claims into
//! a [`Vote`].

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Largest integer an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A verified vote.
///
/// Only produced by [`WebhookVerifier::verify_vote`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    voter_id: String,
    bot_id: String,
    timestamp: i64,
    is_test: bool,
}

impl Vote {
    /// Id of the user who voted.
    #[must_use]
    pub fn voter_id(&self) -> &str {
        &self.voter_id
    }

    /// Id of the bot that received the vote.
    #[must_use]
    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }

    /// When the vote was cast, in milliseconds since the Unix epoch.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Whether this is a test vote sent from the dashboard.
    #[must_use]
    pub const fn is_test(&self) -> bool {
        self.is_test
    }

    /// The vote time as a `DateTime`, if it is representable.
    #[must_use]
    pub fn voted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Verifies signed vote webhooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookVerifier;

impl WebhookVerifier {
    /// Creates a verifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Verifies `token` against `secret` and extracts the vote.
    ///
    /// The token must be signed with HS256. `exp` and `nbf` are enforced
    /// when present. The claims must be an object with truthy `userId`,
    /// `botId` and `timestamp`; `isTest` is optional.
    ///
    /// # Errors
    ///
    /// Returns `Error::WebhookVerification` for every failure.
    pub fn verify_vote(&self, secret: &str, token: &str) -> Result<Vote> {
        let result = Self::verify(secret, token);
        match &result {
            Ok(vote) => debug!(
                voter_id = %vote.voter_id,
                bot_id = %vote.bot_id,
                is_test = vote.is_test,
                "vote webhook verified"
            ),
            Err(e) => warn!(error = %e, "vote webhook rejected"),
        }
        result
    }

    fn verify(secret: &str, token: &str) -> Result<Vote> {
        if secret.is_empty() {
            return Err(Error::webhook_verification(
                "Webhook verification failed: webhook secret is empty",
            ));
        }

        decode_header(token).map_err(verification_failed)?;

        // With a readable header, a JSON error can only come from the payload,
        // which is parsed after the signature has been checked.
        let claims = decode::<Value>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation(),
        )
        .map_err(|e| match e.kind() {
            JwtErrorKind::Json(_) => Error::webhook_verification("Invalid webhook data format"),
            _ => verification_failed(e),
        })?
        .claims;

        let Value::Object(claims) = claims else {
            return Err(Error::webhook_verification("Invalid webhook data format"));
        };

        let (Some(user_id), Some(bot_id), Some(timestamp)) = (
            truthy_claim(&claims, "userId"),
            truthy_claim(&claims, "botId"),
            truthy_claim(&claims, "timestamp"),
        ) else {
            return Err(Error::webhook_verification(
                "Missing required fields in webhook data",
            ));
        };

        let timestamp = coerce_timestamp(timestamp)
            .ok_or_else(|| Error::webhook_verification("Invalid timestamp in webhook data"))?;

        Ok(Vote {
            voter_id: coerce_string(user_id),
            bot_id: coerce_string(bot_id),
            timestamp,
            is_test: claims.get("isTest").is_some_and(is_truthy),
        })
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_nbf = true;
    validation.validate_aud = false;
    validation
}

fn verification_failed(err: JwtError) -> Error {
    Error::webhook_verification(format!("Webhook verification failed: {err}"))
}

fn truthy_claim<'a>(claims: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    claims.get(name).filter(|value| is_truthy(value))
}

/// `null`, `false`, `0`, `NaN` and `""` count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn coerce_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(float_to_millis)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_millis))
        }
        Value::Bool(true) => Some(1),
        _ => None,
    }
}

fn float_to_millis(value: f64) -> Option<i64> {
    (value.is_finite() && value.abs() <= MAX_SAFE_INTEGER).then(|| value.trunc() as i64)
}
