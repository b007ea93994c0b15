//! Shared error type for every Pulse crate.
//!
//! Fallible operations converge on [`AppError`]: a coarse [`ErrorKind`]
//! the HTTP layer can map to a status code, a human-readable message, and
//! an optional underlying cause kept for logs. Subsystem error enums
//! (such as the auth rejection taxonomy) convert into it at the boundary.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Coarse category carried by every [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credential missing, invalid, expired, or revoked.
    Authentication,
    /// Caller-supplied input failed validation.
    Validation,
    /// The addressed resource does not exist.
    NotFound,
    /// Bad or unreadable deployment configuration.
    Configuration,
    /// Encoding or decoding a payload failed.
    Serialization,
    /// A collaborator outside the process (push provider, ledger) failed.
    ExternalService,
    /// A subsystem is switched off or not ready.
    ServiceUnavailable,
    /// Everything else; a bug until proven otherwise.
    Internal,
}

impl ErrorKind {
    /// Stable SCREAMING_SNAKE name used in response bodies and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "AUTHENTICATION",
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::ExternalService => "EXTERNAL_SERVICE",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The application error: kind, message, optional cause.
///
/// `source` is for logging only. It does not survive [`Clone`] and never
/// reaches a response body.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Like [`AppError::new`], keeping `source` as the cause for logs.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Generates one shorthand constructor per [`ErrorKind`].
macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident),* $(,)?) => {
        impl AppError {
            $(
                $(#[$doc])*
                pub fn $name(message: impl Into<String>) -> Self {
                    Self::new(ErrorKind::$kind, message)
                }
            )*
        }
    };
}

kind_constructors! {
    authentication => Authentication,
    validation => Validation,
    not_found => NotFound,
    configuration => Configuration,
    external_service => ExternalService,
    service_unavailable => ServiceUnavailable,
    internal => Internal,
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(ErrorKind::Configuration, err.to_string(), err)
    }
}
