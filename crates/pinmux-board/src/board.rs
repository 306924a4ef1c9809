//! The Board model: validated pin configurations over a borrowed SoC.

use std::collections::HashSet;

use pinmux_soc::{Pin, RowSchema, Soc};
use serde::{Deserialize, Serialize};
use toml::Value;

use crate::config::{GpioInit, PinConfig, Pull};
use crate::error::{BoardError, Result};

/// Raw board description as read from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BoardDescription {
    /// Name of the target SoC.
    pub soc: String,
    /// Configuration rows, in the SoC's board-row layout.
    pub pins: Vec<Vec<Value>>,
    /// Board-level drive-group overrides. Only an empty list is accepted.
    #[serde(default)]
    pub drive_groups: Vec<Value>,
}

/// A validated board configuration.
#[derive(Debug, Clone)]
pub struct Board<'soc> {
    pub name: String,
    /// `name` as a C identifier, e.g. `"jetson_tk1"`.
    pub varname: String,
    /// `name` as a C macro fragment, e.g. `"JETSON_TK1"`.
    pub definename: String,
    soc: &'soc Soc,
    pincfgs: Vec<PinConfig>,
    pincfgs_by_num: Vec<usize>,
}

impl<'soc> Board<'soc> {
    /// Validate `desc` against `soc` and build the board.
    pub fn from_description(name: &str, desc: &BoardDescription, soc: &'soc Soc) -> Result<Self> {
        if desc.soc != soc.name {
            return Err(BoardError::SocMismatch {
                expected: desc.soc.clone(),
                found: soc.name.clone(),
            });
        }
        if !desc.drive_groups.is_empty() {
            return Err(BoardError::UnsupportedDriveGroups {
                count: desc.drive_groups.len(),
            });
        }

        let schema = RowSchema::pin_config(&soc.flags);
        let mut seen = HashSet::new();
        let mut pincfgs = Vec::with_capacity(desc.pins.len());
        for (i, cells) in desc.pins.iter().enumerate() {
            let cfg = pin_config_from_row(soc, &schema, i, cells)?;
            if !seen.insert(cfg.pin) {
                return Err(BoardError::DuplicatePinConfig { name: cfg.fullname });
            }
            pincfgs.push(cfg);
        }

        let mut pincfgs_by_num: Vec<usize> = (0..pincfgs.len()).collect();
        pincfgs_by_num.sort_by_key(|&i| soc.pin(pincfgs[i].pin).sort_by_num_key());

        tracing::debug!(
            "loaded board {name} for SoC {}: {} pin configurations",
            soc.name,
            pincfgs.len()
        );

        Ok(Self {
            name: name.to_string(),
            varname: name.to_lowercase().replace('-', "_"),
            definename: name.to_uppercase().replace('-', "_"),
            soc,
            pincfgs,
            pincfgs_by_num,
        })
    }

    pub fn soc(&self) -> &'soc Soc {
        self.soc
    }

    /// Configurations in the order the description lists them.
    pub fn pincfgs_by_conf_order(&self) -> impl ExactSizeIterator<Item = &PinConfig> {
        self.pincfgs.iter()
    }

    /// Configurations sorted by their pin's numeric key (GPIOs first).
    pub fn pincfgs_by_num(&self) -> impl ExactSizeIterator<Item = &PinConfig> {
        self.pincfgs_by_num.iter().map(|&i| &self.pincfgs[i])
    }

    pub fn pincfg(&self, fullname: &str) -> Option<&PinConfig> {
        self.pincfgs.iter().find(|c| c.fullname == fullname)
    }

    /// Register-bearing SoC pins this board leaves unconfigured, sorted by
    /// full name. Each one is logged as a warning.
    pub fn warn_about_unconfigured_pins(&self) -> Vec<String> {
        let configured: HashSet<&str> = self.pincfgs.iter().map(|c| c.fullname.as_str()).collect();
        let mut unconfigured: Vec<String> = self
            .soc
            .gpios_pins_by_reg()
            .filter(|p| !configured.contains(p.fullname.as_str()))
            .map(|p| p.fullname.clone())
            .collect();
        unconfigured.sort();
        for name in &unconfigured {
            tracing::warn!("{}: pin {name} not configured", self.name);
        }
        unconfigured
    }
}

fn pin_config_from_row(soc: &Soc, schema: &RowSchema, i: usize, cells: &[Value]) -> Result<PinConfig> {
    let row = schema.decode(i, cells)?;
    let fullname = row.str("pin")?;
    let id = soc
        .gpio_or_pin_id(fullname)
        .ok_or_else(|| BoardError::UnknownPin {
            name: fullname.to_string(),
        })?;
    let pin = soc.pin(id);
    let Some(funcs) = pin.funcs() else {
        return Err(BoardError::NotConfigurable {
            name: fullname.to_string(),
        });
    };

    let mux = match row.str("mux")? {
        "" => None,
        m if funcs.iter().any(|f| f == m) => Some(m.to_string()),
        m => {
            return Err(BoardError::MuxNotInFuncs {
                pin: fullname.to_string(),
                mux: m.to_string(),
                funcs: funcs.to_vec(),
            })
        }
    };
    let gpio_init = match row.str("gpio_init")? {
        "" => None,
        s => Some(s.parse::<GpioInit>().map_err(|value| BoardError::InvalidValue {
            pin: fullname.to_string(),
            field: "gpio_init",
            value,
        })?),
    };
    let pull = row
        .str("pull")?
        .parse::<Pull>()
        .map_err(|value| BoardError::InvalidValue {
            pin: fullname.to_string(),
            field: "pull",
            value,
        })?;

    Ok(PinConfig {
        fullname: fullname.to_string(),
        pin: id,
        mux,
        gpio_init,
        pull,
        tri: row.bool("tri")?,
        e_inp: row.bool("e_inp")?,
        od: clear_unsupported(pin, "od", row.bool("od")?, pin.supports_od()),
        e_io_hv: row
            .opt_bool("e_io_hv")
            .map(|v| clear_unsupported(pin, "e_io_hv", v, pin.supports_e_io_hv())),
        rcv_sel: row
            .opt_bool("rcv_sel")
            .map(|v| clear_unsupported(pin, "rcv_sel", v, pin.supports_rcv_sel())),
    })
}

fn clear_unsupported(pin: &Pin, attr: &str, requested: bool, supported: bool) -> bool {
    if requested && !supported {
        tracing::warn!("{}: {attr} requested but not supported; cleared", pin.fullname);
        return false;
    }
    requested
}
