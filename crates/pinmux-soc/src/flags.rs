//! SoC-level feature flags.
//!
//! Flags are the scalar keys at the top of an SoC description. They decide
//! which columns every row carries (see [`crate::schema`]) and which fields
//! downstream renderers emit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Copyright years as written in a description: a single year or a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CopyrightYears {
    Year(u32),
    Range(String),
}

impl Default for CopyrightYears {
    fn default() -> Self {
        CopyrightYears::Year(2014)
    }
}

impl fmt::Display for CopyrightYears {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyrightYears::Year(y) => write!(f, "{y}"),
            CopyrightYears::Range(r) => f.write_str(r),
        }
    }
}

/// Feature flags of one SoC. Absent keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocFlags {
    pub kernel_copyright_years: CopyrightYears,
    pub kernel_author: String,
    pub uboot_copyright_years: CopyrightYears,

    pub soc_has_io_clamping: bool,
    /// Per-pin drive groups are folded into their pin's mux group.
    pub soc_combine_pin_drvgroup: bool,

    #[serde(alias = "has_drvtype")]
    pub soc_drvgroups_have_drvtype: bool,
    pub soc_drvgroups_have_hsm: bool,
    pub soc_drvgroups_have_lpmd: bool,
    pub soc_drvgroups_have_schmitt: bool,

    pub soc_pins_all_have_od: bool,
    pub soc_pins_all_have_schmitt: bool,
    pub soc_pins_have_drvtype: bool,
    pub soc_pins_have_e_io_hv: bool,
    pub soc_pins_have_hsm: bool,
    pub soc_pins_have_ior: bool,
    pub soc_pins_have_od: bool,
    #[serde(alias = "has_rcv_sel")]
    pub soc_pins_have_rcv_sel: bool,
    pub soc_pins_have_schmitt: bool,

    /// Numbering base of reserved functions (`rsvd0` vs `rsvd1`).
    pub soc_rsvd_base: u32,
    pub soc_drv_reg_base: Option<u32>,
    pub soc_mipipadctrl_reg_base: Option<u32>,
    pub soc_einput_b: Option<u32>,
    pub soc_odrain_b: Option<u32>,
}

impl Default for SocFlags {
    fn default() -> Self {
        Self {
            kernel_copyright_years: CopyrightYears::default(),
            kernel_author: "NVIDIA".into(),
            uboot_copyright_years: CopyrightYears::default(),
            soc_has_io_clamping: false,
            soc_combine_pin_drvgroup: false,
            soc_drvgroups_have_drvtype: false,
            soc_drvgroups_have_hsm: false,
            soc_drvgroups_have_lpmd: false,
            soc_drvgroups_have_schmitt: false,
            soc_pins_all_have_od: false,
            soc_pins_all_have_schmitt: false,
            soc_pins_have_drvtype: false,
            soc_pins_have_e_io_hv: false,
            soc_pins_have_hsm: false,
            soc_pins_have_ior: false,
            soc_pins_have_od: false,
            soc_pins_have_rcv_sel: false,
            soc_pins_have_schmitt: false,
            soc_rsvd_base: 0,
            soc_drv_reg_base: None,
            soc_mipipadctrl_reg_base: None,
            soc_einput_b: None,
            soc_odrain_b: None,
        }
    }
}

impl SocFlags {
    /// Pin rows carry a per-pin `od` column.
    pub fn pins_have_od_column(&self) -> bool {
        self.soc_pins_have_od && !self.soc_pins_all_have_od
    }

    /// Pin rows carry a per-pin `schmitt` column.
    pub fn pins_have_schmitt_column(&self) -> bool {
        self.soc_pins_have_schmitt && !self.soc_pins_all_have_schmitt
    }

    /// Board rows carry a receiver-select style column (`rcv_sel` or `e_io_hv`).
    pub fn pins_have_input_select(&self) -> bool {
        self.soc_pins_have_rcv_sel || self.soc_pins_have_e_io_hv
    }
}
