//! Error handling for PathForge
//!
//! Provides error types for every layer of the editing core:
//! - Path errors (parsing, command lookup, conversion)
//! - History errors (action lifecycle violations, failed replay)
//! - Host errors (collaborator lookups: nodes and attributes)
//! - Settings errors (configuration I/O and validation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Path error type
///
/// Represents errors raised while parsing, querying, or restructuring path data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// The path data could not be tokenized
    #[error("Invalid path data at offset {offset}: {reason}")]
    Parse {
        /// Byte offset of the offending token.
        offset: usize,
        /// The reason for the parse failure.
        reason: String,
    },

    /// A command index does not address a command of the path
    #[error("Command index {index} out of range (length: {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of commands in the path.
        len: usize,
    },

    /// The operation needs at least one command
    #[error("Path data is empty")]
    EmptyPath,

    /// A command was given the wrong number of operands
    #[error("Command '{letter}' expects {expected} operands, got {actual}")]
    OperandCount {
        /// The command letter.
        letter: char,
        /// Operands the command requires.
        expected: usize,
        /// Operands supplied.
        actual: usize,
    },

    /// A conversion between two command types cannot preserve the geometry
    #[error("Cannot convert '{from}' command to '{to}'")]
    UnsupportedConversion {
        /// Source command letter.
        from: char,
        /// Requested command letter.
        to: char,
    },

    /// The command at `index` does not support the requested edit
    #[error("Command {index} cannot be edited: {reason}")]
    InvalidCommand {
        /// The command index.
        index: usize,
        /// Why the edit was refused.
        reason: String,
    },
}

/// History error type
///
/// Represents violations of the action lifecycle and failed replays.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// Execute or undo was requested before `init`
    #[error("Action '{label}' has not been initialized")]
    NotInitialized {
        /// The action label.
        label: String,
    },

    /// Undo was requested for an action that has not been committed
    #[error("Action '{label}' has not been committed")]
    NotCommitted {
        /// The action label.
        label: String,
    },

    /// The action is not part of the history
    #[error("Unknown action {id}")]
    UnknownAction {
        /// The action id.
        id: String,
    },

    /// The operation was given parameters it cannot use
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Why the operation was rejected.
        reason: String,
    },

    /// The mutation performed by the action failed
    #[error("Action failed: {0}")]
    Host(#[from] HostError),

    /// The mutation performed by the action failed on path data
    #[error("Action failed: {0}")]
    Path(#[from] PathError),
}

/// Host error type
///
/// Represents failed lookups through the collaborator interface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// No node with this id exists
    #[error("Node {id} not found")]
    NodeNotFound {
        /// The missing node id.
        id: u64,
    },

    /// The node does not carry the attribute
    #[error("Node {id} has no attribute '{name}'")]
    MissingAttribute {
        /// The node id.
        id: u64,
        /// The attribute name.
        name: String,
    },

    /// The attribute holds a value of another type
    #[error("Attribute '{name}' on node {id} is not a {expected}")]
    WrongAttributeType {
        /// The node id.
        id: u64,
        /// The attribute name.
        name: String,
        /// The expected value type.
        expected: String,
    },
}

/// Settings error type
///
/// Represents errors while loading, saving, or validating editor settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The configuration file format is not supported
    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(String),

    /// A setting value is out of its valid range
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting {
        /// The setting key.
        key: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// Main error type for PathForge
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Path error
    #[error(transparent)]
    Path(#[from] PathError),

    /// History error
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Host error
    #[error(transparent)]
    Host(#[from] HostError),

    /// Settings error
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a path error
    pub fn is_path_error(&self) -> bool {
        matches!(self, Error::Path(_))
    }

    /// Check if this is a history error
    pub fn is_history_error(&self) -> bool {
        matches!(self, Error::History(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
