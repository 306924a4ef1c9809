//! Error types for board loading and import validation.

use std::path::PathBuf;

use pinmux_soc::SocError;

/// Errors that can occur while loading or importing a board configuration.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// The target SoC failed to load, or a row failed its schema.
    #[error(transparent)]
    Soc(#[from] SocError),

    /// TOML deserialization error (includes missing required keys).
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading/writing board files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Board description file not found.
    #[error("board description not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The description targets a different SoC than the one supplied.
    #[error("board targets SoC '{expected}', but SoC '{found}' was supplied")]
    SocMismatch { expected: String, found: String },

    /// A configuration entry names a pin the SoC does not have.
    #[error("configured pin '{name}' does not exist in the SoC")]
    UnknownPin { name: String },

    /// A configuration entry names a pin the multiplexer does not control.
    #[error("pin '{name}' is not affected by the pinmux and cannot be configured")]
    NotConfigurable { name: String },

    /// The same pin is configured twice.
    #[error("pin '{name}' is configured more than once")]
    DuplicatePinConfig { name: String },

    /// The selected function is not one of the pin's F0..F3.
    #[error("{pin}: mux '{mux}' not in SoC F0..3 {funcs:?}")]
    MuxNotInFuncs {
        pin: String,
        mux: String,
        funcs: Vec<String>,
    },

    /// A cell holds a value outside its allowed set.
    #[error("{pin}: invalid {field} value '{value}'")]
    InvalidValue {
        pin: String,
        field: &'static str,
        value: String,
    },

    /// Board-level drive group configuration is not supported.
    #[error("board drive_groups must be empty, found {count} entries")]
    UnsupportedDriveGroups { count: usize },

    /// An import row names a ball the SoC does not have.
    #[error("ball '{name}' not found in the SoC")]
    UnknownBall { name: String },

    /// An imported F-slot function is not in the SoC's list for the pin.
    #[error("{ball}: F{slot} '{func}' not in SoC list {funcs:?}")]
    FuncNotInSoc {
        ball: String,
        slot: usize,
        func: String,
        funcs: Vec<String>,
    },

    /// The imported safe function is not one of the imported F0..F3.
    #[error("{ball}: FSAFE '{func}' not in F0..3 {funcs:?}")]
    SafeFuncNotInSlots {
        ball: String,
        func: String,
        funcs: Vec<String>,
    },

    /// The imported selected function is not one of the imported F0..F3.
    #[error("{ball}: mux '{mux}' not in F0..3 {funcs:?}")]
    MuxNotInSlots {
        ball: String,
        mux: String,
        funcs: Vec<String>,
    },

    /// A GPIO output row has no initial level.
    #[error("{ball}: GPIO output without an initial value")]
    MissingGpioInitValue { ball: String },

    /// Reserved-function renumbering from 1-based sources to a 0-based SoC.
    #[error("cannot convert reserved functions from base {source_base} to base {soc_base}")]
    UnsupportedRsvdBase { source_base: u32, soc_base: u32 },
}

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;
