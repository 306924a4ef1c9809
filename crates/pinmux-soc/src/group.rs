//! Drive groups and MIPI pad-control groups.

use serde::Serialize;

use crate::error::Result;
use crate::pin::PinId;
use crate::schema::Row;

/// Index of a drive group within its [`Soc`](crate::Soc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DriveGroupId(pub(crate) usize);

impl DriveGroupId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a MIPI pad-control group within its [`Soc`](crate::Soc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MipiPadCtrlGroupId(pub(crate) usize);

impl MipiPadCtrlGroupId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Electrical drive-strength register shared by a set of pins.
///
/// Bit positions (`*_b`) and widths (`*_w`) locate each field inside `reg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveGroup {
    pub name: String,
    /// `drive_<name>`.
    pub fullname: String,
    pub reg: u32,
    pub hsm_b: Option<u32>,
    pub schmitt_b: Option<u32>,
    pub lpmd_b: Option<u32>,
    pub drvdn_b: u32,
    pub drvdn_w: u32,
    pub drvup_b: u32,
    pub drvup_w: u32,
    pub slwr_b: u32,
    pub slwr_w: u32,
    pub slwf_b: u32,
    pub slwf_w: u32,
    pub drvtype: Option<bool>,
    /// Member pins, in the order the description lists them.
    pub pins: Vec<PinId>,
    /// This is the implicit per-pin group of its single member.
    pub has_matching_pin: bool,
}

impl DriveGroup {
    pub(crate) fn from_row(row: &Row<'_>, pins: Vec<PinId>) -> Result<Self> {
        let name = row.str("name")?.to_string();
        Ok(Self {
            fullname: format!("drive_{name}"),
            name,
            reg: row.int("reg")?,
            hsm_b: row.opt_int("hsm_b"),
            schmitt_b: row.opt_int("schmitt_b"),
            lpmd_b: row.opt_int("lpmd_b"),
            drvdn_b: row.int("drvdn_b")?,
            drvdn_w: row.int("drvdn_w")?,
            drvup_b: row.int("drvup_b")?,
            drvup_w: row.int("drvup_w")?,
            slwr_b: row.int("slwr_b")?,
            slwr_w: row.int("slwr_w")?,
            slwf_b: row.int("slwf_b")?,
            slwf_w: row.int("slwf_w")?,
            drvtype: row.opt_bool("drvtype"),
            pins,
            has_matching_pin: false,
        })
    }
}

/// MIPI pad-control group: two mux function slots over a pad cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MipiPadCtrlGroup {
    pub name: String,
    /// `mipi_pad_ctrl_<name>`.
    pub fullname: String,
    pub reg: u32,
    pub bit: u32,
    pub funcs: [String; 2],
    pub pins: Vec<PinId>,
}

impl MipiPadCtrlGroup {
    pub(crate) fn from_row(row: &Row<'_>, pins: Vec<PinId>) -> Result<Self> {
        let name = row.str("name")?.to_string();
        Ok(Self {
            fullname: format!("mipi_pad_ctrl_{name}"),
            name,
            reg: row.int("reg")?,
            bit: row.int("bit")?,
            funcs: [row.str("f0")?.to_string(), row.str("f1")?.to_string()],
            pins,
        })
    }
}
