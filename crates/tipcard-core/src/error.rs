//! Error types for the tipcard core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the tipcard crates.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Every remote-call wrapper
/// in the record store and session manager returns this type internally;
/// [`TipcardError::disposition`] maps each variant to how the caller is
/// expected to handle it.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum TipcardError {
    /// The remote auth provider or document store could not be reached.
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// All sign-in paths (demo, remote, local cache) were exhausted.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No remote document and no cached record for the given key.
    #[error("record not found: {collection} '{id}'")]
    NotFound { collection: String, id: String },

    /// The durable local store rejected a write. The in-memory cache still
    /// holds the value, so this is logged rather than propagated.
    #[error("local persistence write failed: {0}")]
    PersistenceWriteFailed(String),

    /// IO error (durable storage, config files).
    #[error("IO error: {message}")]
    Io { message: String },

    /// Caller-supplied input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation that needs an onboarded organization profile was invoked
    /// without one.
    #[error("no active organization profile")]
    NoActiveProfile,

    /// A record key component was empty or contained the reserved delimiter.
    #[error("invalid record key: {0}")]
    InvalidKey(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure reported by the payment processor.
    #[error("payment error: {0}")]
    Payment(String),
}

/// What a caller is expected to do with an error, per the propagation policy:
/// degrade to the local cache, log and continue, or surface to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// Degrade to the local cache path.
    Fallback,
    /// Log and continue; the operation still holds the data elsewhere.
    LogOnly,
    /// Return to the caller.
    Surface,
}

impl TipcardError {
    /// Creates a RemoteUnavailable error.
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable(message.into())
    }

    /// Creates a NotFound error.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a PersistenceWriteFailed error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::PersistenceWriteFailed(message.into())
    }

    /// Creates an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an InvalidKey error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey(message.into())
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Payment error.
    pub fn payment(message: impl Into<String>) -> Self {
        Self::Payment(message.into())
    }

    /// Check if this is a RemoteUnavailable error.
    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, Self::RemoteUnavailable(_))
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an InvalidCredentials error.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }

    /// The policy table: how each error kind is handled at the point where
    /// a remote or storage call is wrapped.
    ///
    /// | Kind | Disposition |
    /// |------|-------------|
    /// | `RemoteUnavailable`, `NotFound` | fall back to the local cache |
    /// | `PersistenceWriteFailed`, `Io` | log only |
    /// | everything else | surface to the caller |
    pub fn disposition(&self) -> ErrorDisposition {
        match self {
            Self::RemoteUnavailable(_) | Self::NotFound { .. } => ErrorDisposition::Fallback,
            Self::PersistenceWriteFailed(_) | Self::Io { .. } => ErrorDisposition::LogOnly,
            Self::InvalidCredentials
            | Self::InvalidInput(_)
            | Self::NoActiveProfile
            | Self::InvalidKey(_)
            | Self::Serialization { .. }
            | Self::Config(_)
            | Self::Payment(_) => ErrorDisposition::Surface,
        }
    }
}

impl From<std::io::Error> for TipcardError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TipcardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TipcardError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TipcardError>`.
pub type Result<T> = std::result::Result<T, TipcardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_helpers() {
        let err = TipcardError::not_found("hotels", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "record not found: hotels 'abc'");

        let err = TipcardError::remote_unavailable("connection refused");
        assert!(err.is_remote_unavailable());
    }

    #[test]
    fn test_disposition_table() {
        assert_eq!(
            TipcardError::remote_unavailable("x").disposition(),
            ErrorDisposition::Fallback
        );
        assert_eq!(
            TipcardError::not_found("hotels", "x").disposition(),
            ErrorDisposition::Fallback
        );
        assert_eq!(
            TipcardError::persistence("quota exceeded").disposition(),
            ErrorDisposition::LogOnly
        );
        assert_eq!(
            TipcardError::InvalidCredentials.disposition(),
            ErrorDisposition::Surface
        );
        assert_eq!(
            TipcardError::invalid_input("bad email").disposition(),
            ErrorDisposition::Surface
        );
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TipcardError = io.into();
        assert!(matches!(err, TipcardError::Io { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: TipcardError = parse.into();
        match err {
            TipcardError::Serialization { format, .. } => assert_eq!(format, "JSON"),
            other => panic!("expected Serialization, got {other:?}"),
        }
    }
}
