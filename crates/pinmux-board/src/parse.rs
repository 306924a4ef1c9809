//! Loading, discovery and serialization of `.board.toml` files.

use std::path::{Path, PathBuf};

use pinmux_soc::Soc;

use crate::board::{Board, BoardDescription};
use crate::error::{BoardError, Result};

/// File suffix of board descriptions.
pub const BOARD_SUFFIX: &str = ".board.toml";

/// Path of the description for `name` inside `configs_dir`.
pub fn board_path(configs_dir: &Path, name: &str) -> PathBuf {
    configs_dir.join(format!("{name}{BOARD_SUFFIX}"))
}

/// Read the raw description of board `name`. The SoC it names is not loaded.
pub fn load_board_description(configs_dir: &Path, name: &str) -> Result<BoardDescription> {
    let path = board_path(configs_dir, name);
    if !path.exists() {
        return Err(BoardError::NotFound { path });
    }
    tracing::debug!("loading board description {}", path.display());
    let content = std::fs::read_to_string(&path)?;
    parse_board_description(&content)
}

/// Load board `name` from `configs_dir` and validate it against `soc`.
pub fn load_board<'soc>(configs_dir: &Path, name: &str, soc: &'soc Soc) -> Result<Board<'soc>> {
    let desc = load_board_description(configs_dir, name)?;
    Board::from_description(name, &desc, soc)
}

/// Load the SoC a board description targets from the same directory.
pub fn load_board_soc(configs_dir: &Path, desc: &BoardDescription) -> Result<Soc> {
    Ok(pinmux_soc::load_soc(configs_dir, &desc.soc)?)
}

pub fn parse_board_description(toml_str: &str) -> Result<BoardDescription> {
    let desc: BoardDescription = toml::from_str(toml_str)?;
    Ok(desc)
}

/// Parse and validate a board from a TOML string against `soc`.
pub fn parse_board_toml<'soc>(name: &str, toml_str: &str, soc: &'soc Soc) -> Result<Board<'soc>> {
    let desc = parse_board_description(toml_str)?;
    Board::from_description(name, &desc, soc)
}

/// Serialize a description back to TOML.
pub fn board_to_toml(desc: &BoardDescription) -> Result<String> {
    Ok(toml::to_string_pretty(desc)?)
}

/// List the `*.board.toml` descriptions in `configs_dir` as (name, path), sorted by name.
pub fn discover_boards(configs_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    Ok(pinmux_soc::discover(configs_dir, BOARD_SUFFIX)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::{soc, SOC};

    const BOARD: &str = r#"
soc = "tegra124"
pins = [
    ["px5", "", "in", "none", false, true, false, false],
    ["clk_32k_out_pa0", "soc", "", "up", false, false, false, false],
]
drive_groups = []
"#;

    #[test]
    fn missing_board_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_board_description(tmp.path(), "nope").unwrap_err();
        assert!(matches!(err, BoardError::NotFound { .. }));
    }

    #[test]
    fn loads_board_and_its_soc() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("tegra124.soc.toml"), SOC).unwrap();
        std::fs::write(tmp.path().join("jetson-tk1.board.toml"), BOARD).unwrap();

        let desc = load_board_description(tmp.path(), "jetson-tk1").unwrap();
        let soc = load_board_soc(tmp.path(), &desc).unwrap();
        let board = load_board(tmp.path(), "jetson-tk1", &soc).unwrap();
        assert_eq!(board.pincfgs_by_conf_order().len(), 2);
    }

    #[test]
    fn missing_soc_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let desc = parse_board_description(BOARD).unwrap();
        let err = load_board_soc(tmp.path(), &desc).unwrap_err();
        assert!(matches!(
            err,
            BoardError::Soc(pinmux_soc::SocError::NotFound { .. })
        ));
    }

    #[test]
    fn missing_soc_key_is_fatal() {
        let err = parse_board_description("pins = []\n").unwrap_err();
        assert!(matches!(err, BoardError::Toml(_)));
    }

    #[test]
    fn discovers_only_boards() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("tegra124.soc.toml"), SOC).unwrap();
        std::fs::write(tmp.path().join("venice2.board.toml"), BOARD).unwrap();
        std::fs::write(tmp.path().join("jetson-tk1.board.toml"), BOARD).unwrap();

        let names: Vec<_> = discover_boards(tmp.path())
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, ["jetson-tk1", "venice2"]);
    }

    #[test]
    fn serialized_description_reloads() {
        let soc = soc();
        let desc = parse_board_description(BOARD).unwrap();
        let text = board_to_toml(&desc).unwrap();
        let board = parse_board_toml("jetson-tk1", &text, &soc).unwrap();
        let px5 = board.pincfg("px5").unwrap();
        assert_eq!(px5.gpio_init, Some(crate::GpioInit::In));
        assert!(px5.e_inp);
    }
}
