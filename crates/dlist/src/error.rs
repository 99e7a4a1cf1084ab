//! Error types for the discordlist.gg client.
//!
//! Every failure surfaced by this crate is one [`Error`] variant carrying a
//! human-readable message. HTTP failures are mapped onto variants through a
//! fixed status table ([`ErrorKind::from_status`]); anything else is folded
//! into [`Error::Generic`] by [`classify`].

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Status codes with a dedicated kind. Anything missing from this table is a
/// server error.
const STATUS_KINDS: &[(u16, ErrorKind)] = &[
    (400, ErrorKind::BadRequest),
    (401, ErrorKind::Authentication),
    (403, ErrorKind::Forbidden),
    (404, ErrorKind::NotFound),
    (429, ErrorKind::RateLimit),
    (500, ErrorKind::Server),
];

/// The kind of an [`Error`], without its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The API rejected the request as malformed (400).
    BadRequest,
    /// The API key was missing or rejected (401).
    Authentication,
    /// The API key is not allowed to touch the resource (403).
    Forbidden,
    /// The bot or route does not exist (404).
    NotFound,
    /// Too many requests (429).
    RateLimit,
    /// The API failed, or answered with a status outside the table.
    Server,
    /// A vote webhook token could not be verified.
    WebhookVerification,
    /// Anything else: transport failures, timeouts, invalid input.
    Generic,
}

impl ErrorKind {
    /// Returns every kind.
    #[must_use]
    pub fn all() -> &'static [ErrorKind] {
        &[
            ErrorKind::BadRequest,
            ErrorKind::Authentication,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::RateLimit,
            ErrorKind::Server,
            ErrorKind::WebhookVerification,
            ErrorKind::Generic,
        ]
    }

    /// Maps an HTTP status onto a kind. Unknown and missing statuses map to
    /// [`ErrorKind::Server`].
    #[must_use]
    pub fn from_status(status: Option<u16>) -> Self {
        status
            .and_then(|code| {
                STATUS_KINDS
                    .iter()
                    .find(|(candidate, _)| *candidate == code)
                    .map(|(_, kind)| *kind)
            })
            .unwrap_or(ErrorKind::Server)
    }

    /// The status code this kind is registered under, if any.
    #[must_use]
    pub fn status_code(self) -> Option<u16> {
        STATUS_KINDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(code, _)| *code)
    }

    /// Message used when nothing more specific is available.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "The request was invalid.",
            Self::Authentication => "Authentication failed. Please check your API key.",
            Self::Forbidden => "You do not have permission to access this resource.",
            Self::NotFound => "The requested resource was not found.",
            Self::RateLimit => "Rate limit exceeded. Please try again later.",
            Self::Server => "An internal server error occurred.",
            Self::WebhookVerification => "Failed to verify webhook data.",
            Self::Generic => "An unknown error occurred",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "bad_request"),
            Self::Authentication => write!(f, "authentication"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::RateLimit => write!(f, "rate_limit"),
            Self::Server => write!(f, "server"),
            Self::WebhookVerification => write!(f, "webhook_verification"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

/// Errors returned by the discordlist.gg client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The API answered 400.
    #[error("{message}")]
    BadRequest {
        /// Message from the API, or the default for this kind.
        message: String,
    },

    /// The API answered 401.
    #[error("{message}")]
    Authentication {
        /// Message from the API, or the default for this kind.
        message: String,
    },

    /// The API answered 403.
    #[error("{message}")]
    Forbidden {
        /// Message from the API, or the default for this kind.
        message: String,
    },

    /// The API answered 404.
    #[error("{message}")]
    NotFound {
        /// Message from the API, or the default for this kind.
        message: String,
    },

    /// The API answered 429.
    #[error("{message}")]
    RateLimit {
        /// Message from the API, or the default for this kind.
        message: String,
    },

    /// The API answered 500 or any status not covered by the table.
    #[error("{message}")]
    Server {
        /// Message from the API, or the default for this kind.
        message: String,
    },

    /// A vote webhook token failed verification.
    #[error("{message}")]
    WebhookVerification {
        /// What went wrong.
        message: String,
    },

    /// Any other failure.
    #[error("{message}")]
    Generic {
        /// What went wrong.
        message: String,
    },
}

impl Error {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::BadRequest => Self::BadRequest { message },
            ErrorKind::Authentication => Self::Authentication { message },
            ErrorKind::Forbidden => Self::Forbidden { message },
            ErrorKind::NotFound => Self::NotFound { message },
            ErrorKind::RateLimit => Self::RateLimit { message },
            ErrorKind::Server => Self::Server { message },
            ErrorKind::WebhookVerification => Self::WebhookVerification { message },
            ErrorKind::Generic => Self::Generic { message },
        }
    }

    /// Creates an error of the given kind with its default message.
    #[must_use]
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    /// Creates a `WebhookVerification` error with a message.
    #[must_use]
    pub fn webhook_verification(message: impl Into<String>) -> Self {
        Self::WebhookVerification {
            message: message.into(),
        }
    }

    /// Creates a `Generic` error with a message.
    #[must_use]
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Maps a non-success HTTP response onto an error.
    ///
    /// A JSON body of the form `{"message": "..."}` supplies the message;
    /// otherwise the kind's default message is used.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let kind = ErrorKind::from_status(Some(status.as_u16()));
        match DetailError::parse(body) {
            Some(message) => Self::new(kind, message),
            None => Self::from_kind(kind),
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Server { .. } => ErrorKind::Server,
            Self::WebhookVerification { .. } => ErrorKind::WebhookVerification,
            Self::Generic { .. } => ErrorKind::Generic,
        }
    }

    /// Returns the message carried by this error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message }
            | Self::Authentication { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::RateLimit { message }
            | Self::Server { message }
            | Self::WebhookVerification { message }
            | Self::Generic { message } => message,
        }
    }

    /// The HTTP status this error's kind is registered under, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.kind().status_code()
    }

    /// Returns `true` for failures caused by the request itself (4xx kinds).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest { .. }
                | Self::Authentication { .. }
                | Self::Forbidden { .. }
                | Self::NotFound { .. }
                | Self::RateLimit { .. }
        )
    }

    /// Returns `true` if the API key was rejected or lacks access.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Forbidden { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        match err.status() {
            Some(status) => Self::new(ErrorKind::from_status(Some(status.as_u16())), message),
            None if message.is_empty() => Self::from_kind(ErrorKind::Generic),
            None => Self::generic(message),
        }
    }
}

/// Folds an arbitrary error into the taxonomy. Never fails.
///
/// Errors from this crate pass through unchanged, `reqwest` errors are
/// mapped through the status table, and anything else becomes
/// [`Error::Generic`] with its message.
#[must_use]
pub fn classify(err: &(dyn std::error::Error + 'static)) -> Error {
    if let Some(known) = err.downcast_ref::<Error>() {
        return known.clone();
    }
    if let Some(http) = err.downcast_ref::<reqwest::Error>() {
        let message = http.to_string();
        if let Some(status) = http.status() {
            return Error::new(ErrorKind::from_status(Some(status.as_u16())), message);
        }
        return generic_or_default(message);
    }
    generic_or_default(err.to_string())
}

fn generic_or_default(message: String) -> Error {
    if message.is_empty() {
        Error::from_kind(ErrorKind::Generic)
    } else {
        Error::generic(message)
    }
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct DetailError {
    #[serde(default)]
    message: Option<String>,
}

impl DetailError {
    fn parse(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .and_then(|detail| detail.message)
            .filter(|message| !message.is_empty())
    }
}
