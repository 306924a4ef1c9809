//! Board pin configurations validated against a pinmux SoC model.
//!
//! A board description names its target SoC and lists one configuration row
//! per pin. [`Board::from_description`] resolves every row against a loaded
//! [`pinmux_soc::Soc`] and rejects references the SoC cannot satisfy. The
//! [`import`] module applies the same rules to externally authored tables.

pub mod board;
pub mod config;
pub mod error;
pub mod import;
pub mod parse;

pub use board::{Board, BoardDescription};
pub use config::{GpioInit, PinConfig, Pull};
pub use error::{BoardError, Result};
pub use import::{
    board_description, import_table, validate_row, ImportOptions, ImportRow, ImportTable, ImportedPin,
};
pub use parse::{
    board_path, board_to_toml, discover_boards, load_board, load_board_description, load_board_soc,
    parse_board_description, parse_board_toml,
};
