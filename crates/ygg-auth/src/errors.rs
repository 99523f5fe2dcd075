use reqwest::StatusCode;
use thiserror::Error;

use crate::models::ApiError;

/// Yggdrasil client error types
///
/// Every failure is either local (nothing usable came back from the server)
/// or remote (the server answered with an error envelope).
#[derive(Error, Debug)]
pub enum YggdrasilError {
    #[error(transparent)]
    Local(#[from] LocalFailure),

    #[error("Yggdrasil error {status}: {error}")]
    Remote { status: StatusCode, error: ApiError },
}

/// Failures that happen on this side of the wire
#[derive(Error, Debug)]
pub enum LocalFailure {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP client could not be built: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl YggdrasilError {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// HTTP status that produced a remote failure
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Local(_) => None,
        }
    }

    /// Decoded error envelope of a remote failure
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Remote { error, .. } => Some(error),
            Self::Local(_) => None,
        }
    }
}

impl From<reqwest::Error> for YggdrasilError {
    fn from(err: reqwest::Error) -> Self {
        Self::Local(LocalFailure::Network(err))
    }
}

impl From<serde_json::Error> for YggdrasilError {
    fn from(err: serde_json::Error) -> Self {
        Self::Local(LocalFailure::Serde(err))
    }
}

impl From<url::ParseError> for YggdrasilError {
    fn from(err: url::ParseError) -> Self {
        Self::Local(LocalFailure::UrlParse(err))
    }
}

/// Well-known Yggdrasil error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Wrong credentials, or an invalid/expired token pair
    ForbiddenOperation,

    /// The account was migrated and must log in with its email instead
    UserMigrated,

    /// Malformed request, e.g. missing credentials or a token that already has a profile
    IllegalArgument,

    /// Too many attempts from this address
    TooManyRequests,

    /// Server-side failure
    Resource,

    Unknown(String),
}

impl ApiErrorKind {
    /// Classify an `error`/`cause` pair from an error envelope
    pub fn from_code(error: &str, cause: Option<&str>) -> Self {
        if cause == Some("UserMigratedException") {
            return Self::UserMigrated;
        }

        match error {
            "ForbiddenOperationException" => Self::ForbiddenOperation,
            "IllegalArgumentException" => Self::IllegalArgument,
            "TooManyRequestsException" | "TooManyRequests" => Self::TooManyRequests,
            "ResourceException" | "InternalServerError" => Self::Resource,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Whether logging in again from scratch can fix the failure
    pub fn is_reauthentication_required(&self) -> bool {
        matches!(self, Self::ForbiddenOperation)
    }
}

pub type Result<T> = std::result::Result<T, YggdrasilError>;
