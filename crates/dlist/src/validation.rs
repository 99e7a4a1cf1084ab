//! Input validation run before any request leaves the client.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::error::Error;

/// Discord snowflakes: ASCII digits only.
static BOT_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap_or_else(|_| unreachable!()));

/// Error returned when client input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The bot id is not a numeric snowflake.
    #[error("Invalid bot ID: must be a numeric Discord snowflake")]
    InvalidBotId {
        /// The rejected input.
        input: String,
    },

    /// The guild count is negative or not a whole number.
    #[error("Invalid guild count: must be a non-negative integer")]
    InvalidGuildCount {
        /// The rejected input.
        input: String,
    },
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::generic(err.to_string())
    }
}

/// A validated bot id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BotId(String);

impl BotId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BotId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated guild count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GuildCount(u64);

impl GuildCount {
    /// Returns the count.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GuildCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric values accepted as a guild count.
///
/// Implemented for the primitive integer and float types; conversion fails
/// for negatives, fractions and non-finite floats.
pub trait GuildCountValue: Copy + fmt::Display {
    /// Converts to a whole, non-negative count.
    fn to_count(self) -> Option<u64>;
}

macro_rules! impl_guild_count_int {
    ($($ty:ty),*) => {
        $(
            impl GuildCountValue for $ty {
                fn to_count(self) -> Option<u64> {
                    u64::try_from(self).ok()
                }
            }
        )*
    };
}

macro_rules! impl_guild_count_float {
    ($($ty:ty),*) => {
        $(
            impl GuildCountValue for $ty {
                fn to_count(self) -> Option<u64> {
                    let value = f64::from(self);
                    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 {
                        Some(value as u64)
                    } else {
                        None
                    }
                }
            }
        )*
    };
}

impl_guild_count_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
impl_guild_count_float!(f32, f64);

/// Validate a bot id.
///
/// The input is rendered with `Display` and must consist of one or more
/// ASCII digits. Leading zeros are allowed.
///
/// # Errors
///
/// Returns `ValidationError::InvalidBotId` for anything else.
pub fn validate_bot_id(raw: impl fmt::Display) -> Result<BotId, ValidationError> {
    let id = raw.to_string();
    if !BOT_ID_REGEX.is_match(&id) {
        return Err(ValidationError::InvalidBotId { input: id });
    }
    Ok(BotId(id))
}

/// Validate a guild count.
///
/// # Errors
///
/// Returns `ValidationError::InvalidGuildCount` unless the value is a whole
/// number `>= 0`.
pub fn validate_guild_count(raw: impl GuildCountValue) -> Result<GuildCount, ValidationError> {
    raw.to_count()
        .map(GuildCount)
        .ok_or_else(|| ValidationError::InvalidGuildCount {
            input: raw.to_string(),
        })
}
