//! Error types for SoC description loading.

use std::path::PathBuf;

/// Errors that can occur while loading an SoC description.
#[derive(Debug, thiserror::Error)]
pub enum SocError {
    /// TOML deserialization error (includes missing required tables).
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading a description file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Description file not found.
    #[error("SoC description not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A row does not have the number of cells its schema expects.
    #[error("{table}[{row}]: expected {expected} fields, found {found}")]
    FieldCount {
        table: &'static str,
        row: usize,
        expected: String,
        found: usize,
    },

    /// A cell has the wrong type for its column.
    #[error("{table}[{row}]: field '{field}' must be {expected}")]
    FieldType {
        table: &'static str,
        row: usize,
        field: &'static str,
        expected: &'static str,
    },

    /// A column was requested that the row does not carry.
    #[error("{table}[{row}]: no field '{field}'")]
    MissingField {
        table: &'static str,
        row: usize,
        field: &'static str,
    },

    /// A GPIO identifier is not of the form `<bank letter(s)><digit>`.
    #[error("invalid GPIO identifier '{id}'")]
    InvalidGpioId { id: String },

    /// A group member list names a pin/GPIO that does not exist.
    #[error("lookup failed: group '{group}' references unknown pin '{name}'")]
    Lookup { group: String, name: String },

    /// Two records share one full name.
    #[error("duplicate pin/GPIO full name '{name}'")]
    DuplicateName { name: String },

    /// Two groups in one table share a name.
    #[error("duplicate group name '{name}' in {table}")]
    DuplicateGroup { name: String, table: &'static str },

    /// A group row has no member list.
    #[error("group '{group}' has no entry in {table}")]
    MissingGroupPins { group: String, table: &'static str },
}

/// Result type for SoC operations.
pub type Result<T> = std::result::Result<T, SocError>;
