//! The public error type.
//!
//! Internally the crate uses `anyhow` and attaches context as errors bubble up. At the public
//! boundary those errors are wrapped in `Error`, which tags them with an `ErrorType` so callers
//! can react to the kind of failure without parsing messages.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The result type used inside the crate.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The result type returned by the public functions of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad categories of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or `config.json` is missing or invalid.
    Config,
    /// The remote gateway rejected a request or could not be reached.
    Gateway,
    /// The requested expense does not exist.
    NotFound,
    /// User input failed validation before reaching the store.
    Validation,
    /// The command requires a logged-in user.
    Auth,
    /// The command line or shell input could not be understood.
    Request,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error returned from the public interface, carrying its `ErrorType` and the full chain of
/// context messages.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// A human-readable message including every layer of context, outermost first.
    pub fn message(&self) -> String {
        format!("{:#}", self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

/// `Display` already prints the inner chain, so there is no separate source to report.
impl std::error::Error for Error {}

/// Converts an internal result into a public `Result` tagged with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
