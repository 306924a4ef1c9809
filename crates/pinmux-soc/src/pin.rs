//! Pin and GPIO records.

use serde::Serialize;

use crate::error::{Result, SocError};
use crate::flags::SocFlags;
use crate::group::DriveGroupId;
use crate::schema::Row;

/// Index of a pin/GPIO record within its [`Soc`](crate::Soc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PinId(pub(crate) usize);

impl PinId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which table a record was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PinKind {
    Gpio,
    Pin,
}

/// Numeric order of a GPIO identifier: `bank * 8 + index`.
///
/// `"a0"`..`"z7"` map to banks 0..25; three-character identifiers such as
/// `"aa3"` or `"cc1"` map to bank 26 upward by their first letter.
pub fn gpio_number(id: &str) -> Result<u32> {
    let invalid = || SocError::InvalidGpioId { id: id.to_string() };
    let bytes = id.as_bytes();
    let (bank, index) = match bytes {
        [b, i] if b.is_ascii_lowercase() => (u32::from(b - b'a'), *i),
        [b, b2, i] if b.is_ascii_lowercase() && b == b2 => (u32::from(b - b'a') + 26, *i),
        _ => return Err(invalid()),
    };
    if !(b'0'..=b'7').contains(&index) {
        return Err(invalid());
    }
    Ok(bank * 8 + u32::from(index - b'0'))
}

/// Mux register contents of a pinmux-controlled pad.
///
/// Capability fields are `None` when the SoC's flags say the column does not
/// exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MuxRegister {
    pub reg: u32,
    pub funcs: [String; 4],
    pub od: Option<bool>,
    pub ior: Option<bool>,
    pub rcv_sel: Option<bool>,
    pub hsm: Option<bool>,
    pub schmitt: Option<bool>,
    pub drvtype: Option<bool>,
    pub e_io_hv: Option<bool>,
}

impl MuxRegister {
    fn from_row(row: &Row<'_>, flags: &SocFlags) -> Result<Self> {
        let funcs = [
            row.str("f0")?.to_string(),
            row.str("f1")?.to_string(),
            row.str("f2")?.to_string(),
            row.str("f3")?.to_string(),
        ];
        let od = if flags.soc_pins_have_od && flags.soc_pins_all_have_od {
            Some(true)
        } else {
            row.opt_bool("od")
        };
        let schmitt = if flags.soc_pins_have_schmitt && flags.soc_pins_all_have_schmitt {
            Some(true)
        } else {
            row.opt_bool("schmitt")
        };
        Ok(Self {
            reg: row.int("reg")?,
            funcs,
            od,
            ior: row.opt_bool("ior"),
            rcv_sel: row.opt_bool("rcv_sel"),
            hsm: row.opt_bool("hsm"),
            schmitt,
            drvtype: row.opt_bool("drvtype"),
            e_io_hv: row.opt_bool("e_io_hv"),
        })
    }
}

/// A pad: either a GPIO-capable pin or a plain signal pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pin {
    pub kind: PinKind,
    /// Signal name; empty for pure GPIOs.
    pub signal: String,
    /// GPIO identifier (e.g. `"x5"`); empty for non-GPIO pins.
    pub gpio: String,
    /// GPIO number for GPIOs, declaration index for plain pins.
    pub num: u32,
    /// Global unique key, e.g. `"sdmmc1_clk_pz0"`.
    pub fullname: String,
    pub shortname: String,
    /// `None` for pads the multiplexer does not control.
    pub mux: Option<MuxRegister>,
    /// Set when this pin owns a matching per-pin drive group.
    pub per_pin_drive_group: Option<DriveGroupId>,
}

impl Pin {
    fn new(kind: PinKind, signal: &str, gpio: &str, num: u32, mux: Option<MuxRegister>) -> Self {
        let gpio_field = (!gpio.is_empty()).then(|| format!("p{gpio}"));
        let fullname = [(!signal.is_empty()).then(|| signal.to_string()), gpio_field]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("_");
        let shortname = if signal.is_empty() { gpio } else { signal };
        Self {
            kind,
            signal: signal.to_string(),
            gpio: gpio.to_string(),
            num,
            fullname,
            shortname: shortname.to_string(),
            mux,
            per_pin_drive_group: None,
        }
    }

    /// Build a GPIO record from a decoded `gpios` row.
    pub(crate) fn gpio_from_row(row: &Row<'_>, flags: &SocFlags) -> Result<Self> {
        let gpio = row.str("gpio")?;
        let num = gpio_number(gpio)?;
        let mux = Self::mux_from_row(row, flags)?;
        Ok(Self::new(PinKind::Gpio, row.str("signal")?, gpio, num, mux))
    }

    /// Build a plain pin record from a decoded `pins` row.
    pub(crate) fn pin_from_row(num: u32, row: &Row<'_>, flags: &SocFlags) -> Result<Self> {
        let mux = Self::mux_from_row(row, flags)?;
        Ok(Self::new(PinKind::Pin, row.str("signal")?, "", num, mux))
    }

    fn mux_from_row(row: &Row<'_>, flags: &SocFlags) -> Result<Option<MuxRegister>> {
        if row.is_short() {
            Ok(None)
        } else {
            MuxRegister::from_row(row, flags).map(Some)
        }
    }

    pub fn is_gpio(&self) -> bool {
        self.kind == PinKind::Gpio
    }

    pub fn reg(&self) -> Option<u32> {
        self.mux.as_ref().map(|m| m.reg)
    }

    pub fn funcs(&self) -> Option<&[String; 4]> {
        self.mux.as_ref().map(|m| &m.funcs)
    }

    /// Sort key for numeric order: GPIOs first, then plain pins.
    pub fn sort_by_num_key(&self) -> (bool, u32) {
        (self.kind == PinKind::Pin, self.num)
    }

    /// C identifier, e.g. `TEGRA_PIN_SDMMC1_CLK_PZ0`.
    pub fn define(&self) -> String {
        format!("TEGRA_PIN_{}", self.fullname.to_uppercase())
    }

    /// Human-readable description, e.g. `SDMMC1_CLK PZ0`.
    pub fn desc(&self) -> String {
        let mut parts = Vec::new();
        if !self.signal.is_empty() {
            parts.push(self.signal.to_uppercase());
        }
        if !self.gpio.is_empty() {
            parts.push(format!("P{}", self.gpio.to_uppercase()));
        }
        parts.join(" ")
    }

    pub fn supports_od(&self) -> bool {
        self.mux.as_ref().and_then(|m| m.od).unwrap_or(false)
    }

    pub fn supports_rcv_sel(&self) -> bool {
        self.mux.as_ref().and_then(|m| m.rcv_sel).unwrap_or(false)
    }

    pub fn supports_e_io_hv(&self) -> bool {
        self.mux.as_ref().and_then(|m| m.e_io_hv).unwrap_or(false)
    }
}
