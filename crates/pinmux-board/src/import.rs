//! Validation of externally authored pin tables (e.g. spreadsheet exports)
//! before they become a board description.
//!
//! Each row names a ball, the function slots the source believes the pin has,
//! the safe function and the selected one. [`validate_row`] checks all of them
//! against the SoC, turns GPIO selections into a GPIO initial state, and maps
//! the source's cell vocabulary onto board values.

use pinmux_soc::{Pin, Soc};
use serde::Deserialize;
use toml::Value;

use crate::board::BoardDescription;
use crate::config::{GpioInit, Pull};
use crate::error::{BoardError, Result};

/// One raw row of an external pin table. Cells hold the source's own
/// vocabulary (`PULL_UP`, `TRISTATE`, `Open-Drain`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportRow {
    pub ball_name: String,
    pub gpio: String,
    pub funcs: [String; 4],
    pub fsafe: String,
    pub mux: String,
    pub pupd: String,
    pub tri: String,
    pub e_input: String,
    pub gpio_init_value: String,
    pub direction: String,
    /// Receiver-select / 3.3V-tolerance cell; empty when the source has no such column.
    pub rcv_sel: String,
}

/// Source-wide import settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportOptions {
    /// Numbering base of `rsvdN` functions in the source table.
    pub rsvd_base: u32,
}

/// A whole import source: target SoC, numbering base and `[[row]]` entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportTable {
    pub soc: String,
    #[serde(default)]
    pub rsvd_base: u32,
    #[serde(default, rename = "row")]
    pub rows: Vec<ImportRow>,
}

impl ImportTable {
    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            rsvd_base: self.rsvd_base,
        }
    }
}

/// Validate every row of `table` against `soc` and assemble the board
/// description. Rows the multiplexer does not touch are dropped.
pub fn import_table(soc: &Soc, table: &ImportTable) -> Result<BoardDescription> {
    if table.soc != soc.name {
        return Err(BoardError::SocMismatch {
            expected: table.soc.clone(),
            found: soc.name.clone(),
        });
    }
    let mut pins = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        if let Some(pin) = validate_row(soc, row, table.options())? {
            pins.push(pin);
        }
    }
    tracing::debug!(
        "validated import for SoC {}: {} rows, {} pin configurations",
        soc.name,
        table.rows.len(),
        pins.len()
    );
    Ok(board_description(soc, &pins))
}

/// A validated row, ready to be written as a board configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedPin {
    pub fullname: String,
    pub mux: Option<String>,
    pub gpio_init: Option<GpioInit>,
    pub pull: Pull,
    pub tri: bool,
    pub e_inp: bool,
    pub od: bool,
    /// Written to the `e_io_hv` and/or `rcv_sel` column, whichever the SoC has.
    pub rcv_sel: bool,
}

impl ImportedPin {
    /// Cells in the board-row layout of `soc`.
    pub fn to_row(&self, soc: &Soc) -> Vec<Value> {
        let mut row = vec![
            Value::String(self.fullname.clone()),
            Value::String(self.mux.clone().unwrap_or_default()),
            Value::String(self.gpio_init.map(|g| g.to_string()).unwrap_or_default()),
            Value::String(self.pull.to_string()),
            Value::Boolean(self.tri),
            Value::Boolean(self.e_inp),
            Value::Boolean(self.od),
        ];
        if soc.flags.soc_pins_have_e_io_hv {
            row.push(Value::Boolean(self.rcv_sel));
        }
        if soc.flags.soc_pins_have_rcv_sel {
            row.push(Value::Boolean(self.rcv_sel));
        }
        row
    }
}

/// Assemble a board description for `soc` from validated rows.
pub fn board_description(soc: &Soc, pins: &[ImportedPin]) -> BoardDescription {
    BoardDescription {
        soc: soc.name.clone(),
        pins: pins.iter().map(|p| p.to_row(soc)).collect(),
        drive_groups: Vec::new(),
    }
}

/// `rsvdN` to `rsvd(N+1)`; other names pass through.
pub fn rsvd_0base_to_1base(func: &str) -> String {
    match func.strip_prefix("rsvd").and_then(|n| n.parse::<u32>().ok()) {
        Some(n) => format!("rsvd{}", n + 1),
        None => func.to_string(),
    }
}

/// Validate one row against `soc`.
///
/// Returns `Ok(None)` for rows whose pin the multiplexer does not touch
/// (empty, `0` or `#n/a` mux cell).
pub fn validate_row(soc: &Soc, row: &ImportRow, options: ImportOptions) -> Result<Option<ImportedPin>> {
    let soc_base = soc.flags.soc_rsvd_base;
    if options.rsvd_base != soc_base && soc_base == 0 {
        return Err(BoardError::UnsupportedRsvdBase {
            source_base: options.rsvd_base,
            soc_base,
        });
    }
    let munge = |f: &str| {
        let f = f.to_lowercase();
        if options.rsvd_base != soc_base {
            rsvd_0base_to_1base(&f)
        } else {
            f
        }
    };

    let ball = row.ball_name.to_lowercase();
    let mux = munge(&row.mux);
    if matches!(mux.as_str(), "" | "0" | "#n/a") {
        return Ok(None);
    }

    let gpio = row.gpio.to_lowercase();
    let funcs: [String; 4] = std::array::from_fn(|i| munge(&row.funcs[i]));
    let fsafe = munge(&row.fsafe);
    let invalid = |field: &'static str, value: &str| BoardError::InvalidValue {
        pin: ball.clone(),
        field,
        value: value.to_string(),
    };

    let pull = match row.pupd.as_str() {
        "NORMAL" => Pull::None,
        "PULL_UP" => Pull::Up,
        "PULL_DOWN" => Pull::Down,
        other => return Err(invalid("pull", other)),
    };
    let tri = match row.tri.as_str() {
        "NORMAL" => false,
        "TRISTATE" => true,
        other => return Err(invalid("tri", other)),
    };
    let e_inp = match row.e_input.as_str() {
        "DISABLE" => false,
        "ENABLE" => true,
        other => return Err(invalid("e_input", other)),
    };
    let od = row.direction == "Open-Drain";
    let rcv_sel = match row.rcv_sel.as_str() {
        "" | "NORMAL" | "Disable" => false,
        "HIGH" | "Enable" => true,
        other => return Err(invalid("rcv_sel", other)),
    };

    let mux_gpio = mux.starts_with("gpio_p") || (!gpio.is_empty() && mux == gpio);
    let (mux, gpio_init) = if mux_gpio {
        let init = if e_inp {
            GpioInit::In
        } else {
            match row.gpio_init_value.as_str() {
                "0" => GpioInit::Out0,
                "1" => GpioInit::Out1,
                "" => return Err(BoardError::MissingGpioInitValue { ball: ball.clone() }),
                other => return Err(invalid("gpio_init", other)),
            }
        };
        (None, Some(init))
    } else {
        (Some(mux), None)
    };

    let pin = soc
        .gpio_or_pin_by_name(&ball)
        .ok_or_else(|| BoardError::UnknownBall { name: ball.clone() })?;
    let Some(soc_funcs) = pin.funcs() else {
        return Err(BoardError::NotConfigurable {
            name: pin.fullname.clone(),
        });
    };

    for (i, (func, soc_func)) in funcs.iter().zip(soc_funcs).enumerate() {
        if func != soc_func {
            tracing::warn!("{ball}: F{i} mismatch: table {func:?} vs SoC {soc_func:?}");
        }
    }
    for (slot, func) in funcs.iter().enumerate() {
        if !soc_funcs.contains(func) {
            return Err(BoardError::FuncNotInSoc {
                ball,
                slot,
                func: func.clone(),
                funcs: soc_funcs.to_vec(),
            });
        }
    }
    if !funcs.contains(&fsafe) {
        return Err(BoardError::SafeFuncNotInSlots {
            ball,
            func: fsafe,
            funcs: funcs.to_vec(),
        });
    }
    if let Some(m) = &mux {
        if !funcs.contains(m) {
            return Err(BoardError::MuxNotInSlots {
                ball,
                mux: m.clone(),
                funcs: funcs.to_vec(),
            });
        }
        if !soc_funcs.contains(m) {
            return Err(BoardError::MuxNotInFuncs {
                pin: ball,
                mux: m.clone(),
                funcs: soc_funcs.to_vec(),
            });
        }
    }

    let od = if od && !pin.supports_od() {
        tracing::warn!("{ball}: open-drain requested, but pin has no OD");
        false
    } else {
        od
    };
    let rcv_sel = if rcv_sel && !pin_has_rcv_sel(soc, pin) {
        tracing::warn!("{ball}: rcv_sel/e_io_hv requested, but pin does not support it");
        false
    } else {
        rcv_sel
    };

    Ok(Some(ImportedPin {
        fullname: pin.fullname.clone(),
        mux,
        gpio_init,
        pull,
        tri,
        e_inp,
        od,
        rcv_sel,
    }))
}

fn pin_has_rcv_sel(soc: &Soc, pin: &Pin) -> bool {
    if soc.flags.soc_pins_have_e_io_hv {
        pin.supports_e_io_hv()
    } else if soc.flags.soc_pins_have_rcv_sel {
        pin.supports_rcv_sel()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::{hv_soc, soc};
    use crate::board::Board;

    fn funcs(f: [&str; 4]) -> [String; 4] {
        f.map(str::to_string)
    }

    fn clk_row() -> ImportRow {
        ImportRow {
            ball_name: "CLK_32K_OUT".to_string(),
            gpio: "PA0".to_string(),
            funcs: funcs(["SOC", "BLINK", "RSVD3", "RSVD4"]),
            fsafe: "RSVD3".to_string(),
            mux: "BLINK".to_string(),
            pupd: "NORMAL".to_string(),
            tri: "NORMAL".to_string(),
            e_input: "DISABLE".to_string(),
            direction: "Output".to_string(),
            ..Default::default()
        }
    }

    fn validate(row: &ImportRow) -> Result<Option<ImportedPin>> {
        validate_row(&soc(), row, ImportOptions::default())
    }

    #[test]
    fn accepts_consistent_row() {
        let pin = validate(&clk_row()).unwrap().unwrap();
        assert_eq!(pin.fullname, "clk_32k_out_pa0");
        assert_eq!(pin.mux.as_deref(), Some("blink"));
        assert_eq!(pin.gpio_init, None);
        assert_eq!(pin.pull, Pull::None);
    }

    #[test]
    fn skips_rows_without_mux() {
        for mux in ["", "0", "#N/A"] {
            let row = ImportRow {
                mux: mux.to_string(),
                ..clk_row()
            };
            assert_eq!(validate(&row).unwrap(), None);
        }
    }

    #[test]
    fn gpio_mux_becomes_gpio_init() {
        let out = ImportRow {
            mux: "GPIO_PA0".to_string(),
            gpio_init_value: "1".to_string(),
            ..clk_row()
        };
        let pin = validate(&out).unwrap().unwrap();
        assert_eq!(pin.mux, None);
        assert_eq!(pin.gpio_init, Some(GpioInit::Out1));

        let input = ImportRow {
            ball_name: "gpio_px5".to_string(),
            gpio: "x5".to_string(),
            funcs: funcs(["rsvd1", "blink", "rsvd3", "rsvd4"]),
            fsafe: "rsvd1".to_string(),
            mux: "x5".to_string(),
            e_input: "ENABLE".to_string(),
            ..clk_row()
        };
        let pin = validate(&input).unwrap().unwrap();
        assert_eq!(pin.fullname, "px5");
        assert_eq!(pin.gpio_init, Some(GpioInit::In));
        assert!(pin.e_inp);
    }

    #[test]
    fn gpio_output_needs_initial_value() {
        let row = ImportRow {
            mux: "gpio_pa0".to_string(),
            ..clk_row()
        };
        assert!(matches!(
            validate(&row),
            Err(BoardError::MissingGpioInitValue { .. })
        ));
    }

    #[test]
    fn slot_outside_soc_list_is_rejected() {
        let row = ImportRow {
            funcs: funcs(["soc", "blink", "rsvd3", "uarta"]),
            ..clk_row()
        };
        let err = validate(&row).unwrap_err();
        assert!(matches!(err, BoardError::FuncNotInSoc { slot: 3, ref func, .. } if func == "uarta"));
    }

    #[test]
    fn reordered_slots_only_warn() {
        let row = ImportRow {
            funcs: funcs(["blink", "soc", "rsvd3", "rsvd4"]),
            ..clk_row()
        };
        assert!(validate(&row).unwrap().is_some());
    }

    #[test]
    fn safe_function_must_be_a_slot() {
        let row = ImportRow {
            fsafe: "rsvd1".to_string(),
            ..clk_row()
        };
        assert!(matches!(
            validate(&row),
            Err(BoardError::SafeFuncNotInSlots { .. })
        ));
    }

    #[test]
    fn mux_must_be_a_slot() {
        let row = ImportRow {
            mux: "uarta".to_string(),
            ..clk_row()
        };
        assert!(matches!(validate(&row), Err(BoardError::MuxNotInSlots { .. })));
    }

    #[test]
    fn unknown_ball_is_rejected() {
        let row = ImportRow {
            ball_name: "nothing_here".to_string(),
            ..clk_row()
        };
        assert!(matches!(validate(&row), Err(BoardError::UnknownBall { .. })));
    }

    #[test]
    fn unsupported_attributes_are_cleared() {
        let row = ImportRow {
            direction: "Open-Drain".to_string(),
            rcv_sel: "HIGH".to_string(),
            ..clk_row()
        };
        let pin = validate(&row).unwrap().unwrap();
        assert!(!pin.od);
        assert!(!pin.rcv_sel);

        let sda = ImportRow {
            ball_name: "gen1_i2c_sda".to_string(),
            gpio: "pc5".to_string(),
            funcs: funcs(["i2c1", "rsvd2", "rsvd3", "rsvd4"]),
            fsafe: "rsvd2".to_string(),
            mux: "i2c1".to_string(),
            direction: "Open-Drain".to_string(),
            rcv_sel: "HIGH".to_string(),
            ..clk_row()
        };
        let pin = validate(&sda).unwrap().unwrap();
        assert!(pin.od);
        assert!(pin.rcv_sel);
    }

    #[test]
    fn unknown_cell_value_is_rejected() {
        let row = ImportRow {
            pupd: "PULL_SIDEWAYS".to_string(),
            ..clk_row()
        };
        assert!(matches!(
            validate(&row),
            Err(BoardError::InvalidValue { field: "pull", .. })
        ));
    }

    #[test]
    fn rsvd_renumbering() {
        assert_eq!(rsvd_0base_to_1base("rsvd0"), "rsvd1");
        assert_eq!(rsvd_0base_to_1base("rsvd3"), "rsvd4");
        assert_eq!(rsvd_0base_to_1base("uarta"), "uarta");
    }

    #[test]
    fn one_based_source_into_zero_based_soc_is_rejected() {
        let err = validate_row(&soc(), &clk_row(), ImportOptions { rsvd_base: 1 }).unwrap_err();
        assert!(matches!(
            err,
            BoardError::UnsupportedRsvdBase {
                source_base: 1,
                soc_base: 0
            }
        ));
    }

    #[test]
    fn zero_based_source_into_one_based_soc() {
        let text = crate::board::tests::SOC.replacen(
            "soc_pins_have_od",
            "soc_rsvd_base = 1\nsoc_pins_have_od",
            1,
        );
        let soc = pinmux_soc::parse_soc_toml("tegra124", &text).unwrap();
        let row = ImportRow {
            funcs: funcs(["soc", "blink", "rsvd2", "rsvd3"]),
            fsafe: "rsvd2".to_string(),
            ..clk_row()
        };
        let pin = validate_row(&soc, &row, ImportOptions { rsvd_base: 0 })
            .unwrap()
            .unwrap();
        assert_eq!(pin.mux.as_deref(), Some("blink"));
    }

    #[test]
    fn imported_rows_load_as_board() {
        let soc = soc();
        let rows = [
            clk_row(),
            ImportRow {
                ball_name: "core_pwr_req".to_string(),
                gpio: String::new(),
                funcs: funcs(["pwron", "rsvd2", "rsvd3", "rsvd4"]),
                fsafe: "rsvd2".to_string(),
                mux: "pwron".to_string(),
                pupd: "PULL_DOWN".to_string(),
                ..clk_row()
            },
        ];
        let pins: Vec<_> = rows
            .iter()
            .filter_map(|r| validate_row(&soc, r, ImportOptions::default()).unwrap())
            .collect();
        let desc = board_description(&soc, &pins);
        let text = crate::parse::board_to_toml(&desc).unwrap();
        let board = crate::parse::parse_board_toml("venice2", &text, &soc).unwrap();
        let names: Vec<_> = board.pincfgs_by_conf_order().map(|c| c.fullname.as_str()).collect();
        assert_eq!(names, ["clk_32k_out_pa0", "core_pwr_req"]);
        assert_eq!(board.pincfg("core_pwr_req").unwrap().pull, Pull::Down);
    }

    #[test]
    fn imports_table_from_toml() {
        let soc = soc();
        let table: ImportTable = toml::from_str(
            r##"
soc = "tegra124"
rsvd_base = 0

[[row]]
ball_name = "CLK_32K_OUT"
gpio = "PA0"
funcs = ["SOC", "BLINK", "RSVD3", "RSVD4"]
fsafe = "RSVD3"
mux = "SOC"
pupd = "PULL_UP"
tri = "NORMAL"
e_input = "ENABLE"
direction = "Input"

[[row]]
ball_name = "JTAG_RTCK"
mux = "#N/A"
"##,
        )
        .unwrap();
        let desc = import_table(&soc, &table).unwrap();
        assert_eq!(desc.soc, "tegra124");
        assert_eq!(desc.pins.len(), 1);
        assert!(desc.drive_groups.is_empty());
        let board = Board::from_description("b", &desc, &soc).unwrap();
        assert_eq!(board.pincfg("clk_32k_out_pa0").unwrap().pull, Pull::Up);
    }

    fn uart_row(ball: &str, gpio: &str) -> ImportRow {
        ImportRow {
            ball_name: ball.to_string(),
            gpio: gpio.to_string(),
            funcs: funcs(["UARTB", "RSVD1", "RSVD2", "RSVD3"]),
            fsafe: "RSVD1".to_string(),
            mux: "UARTB".to_string(),
            direction: "Open-Drain".to_string(),
            rcv_sel: "Enable".to_string(),
            ..clk_row()
        }
    }

    #[test]
    fn e_io_hv_soc_checks_e_io_hv_capability() {
        let soc = hv_soc();
        let tx = validate_row(&soc, &uart_row("UART2_TX", "PG0"), ImportOptions::default())
            .unwrap()
            .unwrap();
        assert!(tx.od);
        assert!(tx.rcv_sel);

        // rx has rcv_sel but not e_io_hv, and e_io_hv decides on such SoCs.
        let rx = validate_row(&soc, &uart_row("UART2_RX", "PG1"), ImportOptions::default())
            .unwrap()
            .unwrap();
        assert!(rx.od);
        assert!(!rx.rcv_sel);
    }

    #[test]
    fn e_io_hv_soc_rows_fill_both_columns() {
        let soc = hv_soc();
        let tx = validate_row(&soc, &uart_row("UART2_TX", "PG0"), ImportOptions::default())
            .unwrap()
            .unwrap();
        let row = tx.to_row(&soc);
        assert_eq!(row.len(), 9);
        assert_eq!(row[7], Value::Boolean(true));
        assert_eq!(row[8], Value::Boolean(true));

        let desc = board_description(&soc, &[tx]);
        let text = crate::parse::board_to_toml(&desc).unwrap();
        let board = crate::parse::parse_board_toml("p2371", &text, &soc).unwrap();
        let cfg = board.pincfg("uart2_tx_pg0").unwrap();
        assert!(cfg.od);
        assert_eq!(cfg.e_io_hv, Some(true));
        assert_eq!(cfg.rcv_sel, Some(true));
    }
}
