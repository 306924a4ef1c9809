//! `pinmux board`: board listing, description, validation and import.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pinmux_board::{Board, BoardDescription, ImportTable, PinConfig};
use pinmux_soc::Soc;

use crate::Format;

/// List every board description in `configs`.
pub fn list(configs: &Path) -> Result<()> {
    let boards = pinmux_board::discover_boards(configs)
        .with_context(|| format!("scanning {}", configs.display()))?;
    if boards.is_empty() {
        println!("No board descriptions in {}", configs.display());
        return Ok(());
    }
    println!("Boards in {}:", configs.display());
    for (name, path) in boards {
        let soc = match pinmux_board::load_board_description(configs, &name) {
            Ok(desc) => desc.soc,
            Err(e) => {
                tracing::warn!("{}: {e}", path.display());
                "?".to_string()
            }
        };
        println!("  {name:<20} {soc:<12} {}", path.display());
    }
    Ok(())
}

fn load_description(configs: &Path, name: &str) -> Result<(BoardDescription, Soc)> {
    let desc = pinmux_board::load_board_description(configs, name)
        .with_context(|| format!("loading board '{name}'"))?;
    let soc = super::soc::load(configs, &desc.soc)?;
    Ok((desc, soc))
}

fn build<'soc>(name: &str, desc: &BoardDescription, soc: &'soc Soc) -> Result<Board<'soc>> {
    Board::from_description(name, desc, soc).with_context(|| format!("validating board '{name}'"))
}

/// Print a board's configurations in numeric pin order.
pub fn describe(configs: &Path, name: &str, format: Format) -> Result<()> {
    let (desc, soc) = load_description(configs, name)?;
    let board = build(name, &desc, &soc)?;
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&to_json(&board))?),
        Format::Human => {
            println!("=== Board: {} (SoC {}) ===", board.name, soc.name);
            println!("  {:<28} {:<12} {:<5} {:<5} tri e_inp od", "pin", "mux", "gpio", "pull");
            for cfg in board.pincfgs_by_num() {
                println!("  {}", format_pincfg(cfg));
            }
        }
    }
    Ok(())
}

fn format_pincfg(cfg: &PinConfig) -> String {
    let flag = |b: bool| if b { "1" } else { "0" };
    format!(
        "{:<28} {:<12} {:<5} {:<5} {:<3} {:<5} {}",
        cfg.fullname,
        cfg.mux.as_deref().unwrap_or("-"),
        cfg.gpio_init.map_or("-", |g| g.as_str()),
        cfg.pull.as_str(),
        flag(cfg.tri),
        flag(cfg.e_inp),
        flag(cfg.od),
    )
}

fn to_json(board: &Board<'_>) -> serde_json::Value {
    serde_json::json!({
        "name": board.name,
        "soc": board.soc().name,
        "varname": board.varname,
        "definename": board.definename,
        "pins": board.pincfgs_by_num().collect::<Vec<_>>(),
    })
}

/// Load a board against its SoC and list the pins it leaves unconfigured.
pub fn validate(configs: &Path, name: &str) -> Result<()> {
    let (desc, soc) = load_description(configs, name)?;
    let board = build(name, &desc, &soc)?;
    let unconfigured = board.warn_about_unconfigured_pins();
    println!(
        "{}: OK ({} pins configured, {} unconfigured)",
        board.name,
        board.pincfgs_by_conf_order().len(),
        unconfigured.len()
    );
    for pin in &unconfigured {
        println!("  unconfigured: {pin}");
    }
    Ok(())
}

/// Validate an import table and write `<name>.board.toml` into `configs`.
pub fn import(configs: &Path, name: &str, table_path: &Path) -> Result<()> {
    let content = fs::read_to_string(table_path)
        .with_context(|| format!("reading {}", table_path.display()))?;
    let table: ImportTable =
        toml::from_str(&content).with_context(|| format!("parsing {}", table_path.display()))?;
    let soc = super::soc::load(configs, &table.soc)?;
    let desc = pinmux_board::import_table(&soc, &table)
        .with_context(|| format!("importing {}", table_path.display()))?;

    // Reject output the loader itself would not accept.
    build(name, &desc, &soc)?;

    let out = pinmux_board::board_path(configs, name);
    let text = pinmux_board::board_to_toml(&desc).context("serializing board description")?;
    fs::write(&out, text).with_context(|| format!("writing {}", out.display()))?;
    println!("Wrote {} ({} pins)", out.display(), desc.pins.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::soc::tests::configs_dir;

    const BOARD: &str = r#"
soc = "tegra124"
pins = [
    ["core_pwr_req", "pwron", "", "none", false, false, false, false],
    ["px5", "", "out0", "up", false, false, true, true],
]
drive_groups = []
"#;

    const TABLE: &str = r#"
soc = "tegra124"

[[row]]
ball_name = "CLK_32K_OUT"
gpio = "PA0"
funcs = ["SOC", "BLINK", "RSVD3", "RSVD4"]
fsafe = "RSVD3"
mux = "GPIO_PA0"
pupd = "PULL_DOWN"
tri = "NORMAL"
e_input = "DISABLE"
gpio_init_value = "1"
direction = "Output"
"#;

    #[test]
    fn describe_and_validate_board() {
        let tmp = configs_dir();
        fs::write(tmp.path().join("venice2.board.toml"), BOARD).unwrap();
        assert!(list(tmp.path()).is_ok());
        assert!(describe(tmp.path(), "venice2", Format::Human).is_ok());
        assert!(describe(tmp.path(), "venice2", Format::Json).is_ok());
        assert!(validate(tmp.path(), "venice2").is_ok());
    }

    #[test]
    fn json_uses_numeric_order() {
        let tmp = configs_dir();
        fs::write(tmp.path().join("venice2.board.toml"), BOARD).unwrap();
        let (desc, soc) = load_description(tmp.path(), "venice2").unwrap();
        let board = build("venice2", &desc, &soc).unwrap();
        let json = to_json(&board);
        assert_eq!(json["pins"][0]["fullname"], "px5");
        assert_eq!(json["pins"][0]["gpio_init"], "out0");
        assert_eq!(json["pins"][1]["mux"], "pwron");
    }

    #[test]
    fn list_tolerates_unreadable_board() {
        let tmp = configs_dir();
        fs::write(tmp.path().join("venice2.board.toml"), BOARD).unwrap();
        fs::write(tmp.path().join("broken.board.toml"), "pins = [\n").unwrap();
        assert!(list(tmp.path()).is_ok());
    }

    #[test]
    fn board_with_unknown_soc_fails() {
        let tmp = configs_dir();
        fs::write(
            tmp.path().join("odd.board.toml"),
            "soc = \"tegra999\"\npins = []\n",
        )
        .unwrap();
        let err = validate(tmp.path(), "odd").unwrap_err();
        assert!(format!("{err:#}").contains("tegra999"));
    }

    #[test]
    fn import_writes_loadable_board() {
        let tmp = configs_dir();
        let table = tmp.path().join("beaver.import.toml");
        fs::write(&table, TABLE).unwrap();
        import(tmp.path(), "beaver", &table).unwrap();

        let (desc, soc) = load_description(tmp.path(), "beaver").unwrap();
        let board = build("beaver", &desc, &soc).unwrap();
        let cfg = board.pincfg("clk_32k_out_pa0").unwrap();
        assert_eq!(cfg.mux, None);
        assert_eq!(cfg.gpio_init, Some(pinmux_board::GpioInit::Out1));
    }

    #[test]
    fn import_rejects_bad_mux() {
        let tmp = configs_dir();
        let table = tmp.path().join("bad.import.toml");
        fs::write(&table, TABLE.replace("GPIO_PA0", "UARTA")).unwrap();
        assert!(import(tmp.path(), "bad", &table).is_err());
        assert!(!pinmux_board::board_path(tmp.path(), "bad").exists());
    }
}
