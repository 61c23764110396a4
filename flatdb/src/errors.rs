use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for flatdb operations
///
/// Each kind describes one category of failure. Some of them are ordinary
/// outcomes rather than faults: [ErrorKind::NotFound] is what a query that
/// matched nothing returns, and callers are expected to handle it.
///
/// # Examples
///
/// ```rust,ignore
/// use flatdb::errors::{FlatDbError, ErrorKind, FlatDbResult};
///
/// fn example() -> FlatDbResult<()> {
///     Err(FlatDbError::new("Your query returned zero results", ErrorKind::NotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Query Errors
    /// The query matched zero documents
    NotFound,
    /// Malformed filter or control parameter
    InvalidQuery,

    // Load-time resolution Errors - reported, never abort a load
    /// Route shapes of a document and its parent cannot be combined
    InvalidRoute,
    /// The `collection` a document points to does not exist
    ParentMissing,
    /// A parent chain loops back onto itself
    CycleDetected,

    // Cache Errors
    /// The persisted snapshot cannot be decoded
    CorruptCache,

    // Source Errors
    /// A source document could not be parsed
    ParseError,

    // Operation Errors
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Invalid data type for operation
    InvalidDataType,

    // Data Encoding Errors
    /// Error encoding or decoding data
    EncodingError,

    // IO Errors
    /// Generic IO error
    IOError,
    /// The file was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,

    // Generic/Internal Errors - used as fallback
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::InvalidQuery => write!(f, "Invalid query"),
            ErrorKind::InvalidRoute => write!(f, "Invalid route"),
            ErrorKind::ParentMissing => write!(f, "Parent missing"),
            ErrorKind::CycleDetected => write!(f, "Cycle detected"),
            ErrorKind::CorruptCache => write!(f, "Corrupt cache"),
            ErrorKind::ParseError => write!(f, "Parse error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom flatdb error type.
///
/// `FlatDbError` carries a message, a kind, an optional cause and the
/// backtrace captured where it was created.
///
/// # Examples
///
/// ```rust,ignore
/// use flatdb::errors::{FlatDbError, ErrorKind};
///
/// let err = FlatDbError::new("Querying by id requires passing type", ErrorKind::InvalidQuery);
///
/// let cause = FlatDbError::new("unexpected end of input", ErrorKind::EncodingError);
/// let err = FlatDbError::new_with_cause("Cache is damaged", ErrorKind::CorruptCache, cause);
/// ```
#[derive(Clone)]
pub struct FlatDbError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<FlatDbError>>,
    backtrace: Atomic<Backtrace>,
}

impl FlatDbError {
    /// Creates a new `FlatDbError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        FlatDbError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `FlatDbError` with a cause error.
    ///
    /// The cause is kept for [Error::source] and printed by the `Debug` output.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: FlatDbError) -> Self {
        FlatDbError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&FlatDbError> {
        self.cause.as_deref()
    }

    /// Returns `true` if the error is the ordinary "nothing matched" outcome.
    pub fn is_not_found(&self) -> bool {
        self.error_kind == ErrorKind::NotFound
    }
}

impl Display for FlatDbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for FlatDbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for FlatDbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for flatdb operations.
pub type FlatDbResult<T> = Result<T, FlatDbError>;

impl From<std::io::Error> for FlatDbError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        FlatDbError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<serde_json::Error> for FlatDbError {
    fn from(err: serde_json::Error) -> Self {
        let error_kind = if err.is_io() {
            ErrorKind::IOError
        } else {
            ErrorKind::EncodingError
        };
        FlatDbError::new(&format!("JSON error: {}", err), error_kind)
    }
}

impl From<std::fmt::Error> for FlatDbError {
    fn from(err: std::fmt::Error) -> Self {
        FlatDbError::new(
            &format!("Formatting error: {}", err),
            ErrorKind::InternalError,
        )
    }
}

impl From<String> for FlatDbError {
    fn from(msg: String) -> Self {
        FlatDbError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for FlatDbError {
    fn from(msg: &str) -> Self {
        FlatDbError::new(msg, ErrorKind::InternalError)
    }
}
