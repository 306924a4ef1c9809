//! SoC pin-multiplexer data model.
//!
//! Loads a declarative SoC description (pins, GPIOs, drive groups, optional
//! MIPI pad-control groups and feature flags), resolves every cross-reference,
//! and exposes stable, deterministically ordered views for renderers:
//! - **Pins/GPIOs** by declaration, numeric and register order
//! - **Drive groups** by register and alphabetical order
//! - **Functions** by discovery and alphabetical order

pub mod error;
pub mod flags;
pub mod function;
pub mod group;
pub mod parse;
pub mod pin;
pub mod schema;
pub mod soc;

pub use error::{Result, SocError};
pub use flags::{CopyrightYears, SocFlags};
pub use function::{Function, FunctionUser};
pub use group::{DriveGroup, DriveGroupId, MipiPadCtrlGroup, MipiPadCtrlGroupId};
pub use parse::{discover, discover_socs, load_soc, parse_soc_description, parse_soc_toml, soc_path};
pub use pin::{gpio_number, MuxRegister, Pin, PinId, PinKind};
pub use schema::{Field, FieldKind, Row, RowSchema};
pub use soc::{Soc, SocDescription};
