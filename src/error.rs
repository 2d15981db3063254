//! Error handling for refsig
//!
//! The engine itself (hydrate, tree building, reduction) is total and never
//! fails. Errors only arise at the host boundary: turning raw editor input
//! into typed updates, loading/saving panel state, and handing service calls
//! to the transport.

use thiserror::Error;

/// Rejection of host input while constructing a typed settings update.
///
/// Raised when a string path or a raw value does not fit any legal
/// (field, value type) pair of the variant. Nothing that reaches the reducer
/// can produce one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// The path does not name a field of this variant
    #[error("Unknown settings path: {0}")]
    UnknownPath(String),

    /// The value has the wrong shape for the field
    #[error("Field `{field}` expects {expected}, got {got}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
        got: String,
    },

    /// The text does not name a signal type of this variant
    #[error("Unknown signal type: {0}")]
    UnknownSignalType(String),

    /// A plain number field was cleared
    #[error("Field `{0}` requires a value")]
    MissingValue(&'static str),

    /// A time bound that is neither finite nor positive infinity
    #[error("Invalid time bound: {0}")]
    InvalidBound(String),

    /// The number is below the field's lower limit
    #[error("Field `{field}` must be {expected}, got {got}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        got: f64,
    },

    /// The node action does not exist for this variant
    #[error("Unknown node action: {0}")]
    UnknownAction(String),
}

/// Main error type for refsig operations
#[derive(Error, Debug)]
pub enum RefSigError {
    /// Invalid editor input
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Errors related to panel state loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to handing service calls to the transport
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<RefSigError>,
    },
}

impl RefSigError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        RefSigError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for RefSigError {
    fn from(err: serde_json::Error) -> Self {
        RefSigError::Serialization(err.to_string())
    }
}

/// Result type alias for refsig operations
pub type Result<T> = std::result::Result<T, RefSigError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
