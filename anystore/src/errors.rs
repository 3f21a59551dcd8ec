use backtrace::Backtrace;
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for repository operations.
///
/// Callers are expected to branch on the kind, never on the message. The
/// expected outcomes (`Conflict`, `NotFound`, `Concurrency`) are recoverable;
/// `UnsupportedFeature` and `InternalError` point at wiring defects.
///
/// # Examples
///
/// ```rust
/// use anystore::errors::{ErrorKind, StoreError, StoreResult};
///
/// fn example() -> StoreResult<()> {
///     Err(StoreError::new("entity 42 not found", ErrorKind::NotFound))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::NotFound);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// An entity with the same identity already exists
    Conflict,
    /// The targeted identity does not exist
    NotFound,
    /// The optimistic version check failed on update
    Concurrency,
    /// Malformed continuation token or query input
    BadInput,
    /// No handler is registered for a query shape, or the backend lacks an operation
    UnsupportedFeature,
    /// A validation decorator rejected the entity
    ValidationError,
    /// The operation observed its cancellation signal
    Cancelled,
    /// Domain event dispatch failed
    EventError,
    /// Serialization of an entity or token payload failed
    EncodingError,
    /// The call is not valid in the current configuration
    InvalidOperation,
    /// Failure reported by a storage backend that maps to no other kind
    BackendError,
    /// Invariant violation in the dispatch machinery (always a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Conflict => write!(f, "Conflict"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::Concurrency => write!(f, "Concurrency conflict"),
            ErrorKind::BadInput => write!(f, "Bad input"),
            ErrorKind::UnsupportedFeature => write!(f, "Unsupported feature"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::Cancelled => write!(f, "Cancelled"),
            ErrorKind::EventError => write!(f, "Event error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type shared by every layer of the repository stack.
///
/// `StoreError` carries a message, an [`ErrorKind`] and an optional cause.
/// Backends translate their native failures into a `StoreError` at the
/// repository boundary; decorators pass them through untouched.
///
/// # Examples
///
/// ```rust
/// use anystore::errors::{ErrorKind, StoreError};
///
/// let cause = StoreError::new("duplicate key", ErrorKind::BackendError);
/// let err = StoreError::new_with_cause("entity 7 already exists", ErrorKind::Conflict, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct StoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<StoreError>>,
    backtrace: Arc<RwLock<Backtrace>>,
}

impl StoreError {
    /// Creates a new `StoreError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(RwLock::new(Backtrace::new_unresolved())),
        }
    }

    /// Creates a new `StoreError` that keeps `cause` in its chain.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: StoreError) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(RwLock::new(Backtrace::new_unresolved())),
        }
    }

    /// Shorthand for a cancellation failure.
    pub fn cancelled(operation: &str) -> Self {
        StoreError::new(
            &format!("Operation '{}' was cancelled", operation),
            ErrorKind::Cancelled,
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&StoreError> {
        self.cause.as_deref()
    }

    /// Returns `true` when the failure is one callers are expected to handle
    /// (`Conflict`, `NotFound`, `Concurrency`).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.error_kind,
            ErrorKind::Conflict | ErrorKind::NotFound | ErrorKind::Concurrency
        )
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} ({})\nCaused by: {:?}", self.message, self.error_kind, cause),
            None => {
                let mut backtrace = self.backtrace.write();
                backtrace.resolve();
                write!(f, "{} ({})\n{:?}", self.message, self.error_kind, *backtrace)
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Result alias used by every fallible operation in this crate.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::new(
            &format!("Serialization error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<base64::DecodeError> for StoreError {
    fn from(err: base64::DecodeError) -> Self {
        StoreError::new(&format!("Base64 decoding error: {}", err), ErrorKind::BadInput)
    }
}

impl From<std::fmt::Error> for StoreError {
    fn from(err: std::fmt::Error) -> Self {
        StoreError::new(
            &format!("Formatting error: {}", err),
            ErrorKind::InternalError,
        )
    }
}
