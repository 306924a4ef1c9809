//! Loading and discovery of `.soc.toml` description files.
//!
//! SoC descriptions live in a configs directory as `<soc>.soc.toml`. Each load
//! reads the file in full, builds the [`Soc`], and keeps nothing else around.

use std::path::{Path, PathBuf};

use crate::error::{Result, SocError};
use crate::soc::{Soc, SocDescription};

/// File suffix of SoC descriptions.
pub const SOC_SUFFIX: &str = ".soc.toml";

/// Path of the description for `name` inside `configs_dir`.
pub fn soc_path(configs_dir: &Path, name: &str) -> PathBuf {
    configs_dir.join(format!("{name}{SOC_SUFFIX}"))
}

/// Load and validate the SoC called `name` from `configs_dir`.
pub fn load_soc(configs_dir: &Path, name: &str) -> Result<Soc> {
    let path = soc_path(configs_dir, name);
    if !path.exists() {
        return Err(SocError::NotFound { path });
    }
    tracing::debug!("loading SoC description {}", path.display());
    let content = std::fs::read_to_string(&path)?;
    parse_soc_toml(name, &content)
}

/// Parse the raw description without validating cross-references.
pub fn parse_soc_description(toml_str: &str) -> Result<SocDescription> {
    let desc: SocDescription = toml::from_str(toml_str)?;
    Ok(desc)
}

/// Parse and validate an SoC from a TOML string.
pub fn parse_soc_toml(name: &str, toml_str: &str) -> Result<Soc> {
    let desc = parse_soc_description(toml_str)?;
    Soc::from_description(name, &desc)
}

/// List the `*.soc.toml` descriptions in `configs_dir` as (name, path), sorted by name.
pub fn discover_socs(configs_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    discover(configs_dir, SOC_SUFFIX)
}

/// List files in `dir` ending in `suffix`. A missing directory yields an empty list.
pub fn discover(dir: &Path, suffix: &str) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(suffix))
            .map(str::to_string);
        if let Some(name) = name {
            found.push((name, path));
        }
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soc::tests::SMALL_SOC;

    #[test]
    fn parse_from_string() {
        let soc = parse_soc_toml("tegra124", SMALL_SOC).unwrap();
        assert_eq!(soc.name, "tegra124");
        assert_eq!(soc.gpios_by_num().len(), 5);
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(matches!(
            parse_soc_toml("x", "this is not valid toml [[["),
            Err(SocError::Toml(_))
        ));
    }

    #[test]
    fn load_not_found() {
        let result = load_soc(Path::new("/nonexistent/configs"), "tegra999");
        assert!(matches!(result.unwrap_err(), SocError::NotFound { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(soc_path(dir.path(), "tegra124"), SMALL_SOC).unwrap();

        let soc = load_soc(dir.path(), "tegra124").unwrap();
        assert_eq!(soc.name, "tegra124");
        assert_eq!(soc.pins_by_conf_order().count(), 3);
    }

    #[test]
    fn independent_loads_do_not_interact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(soc_path(dir.path(), "a"), SMALL_SOC).unwrap();
        std::fs::write(soc_path(dir.path(), "b"), SMALL_SOC).unwrap();

        let a = load_soc(dir.path(), "a").unwrap();
        let b = load_soc(dir.path(), "b").unwrap();
        assert_eq!(a.name, "a");
        assert_eq!(b.name, "b");
        assert_eq!(a.functions().len(), b.functions().len());
    }

    #[test]
    fn discover_socs_finds_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(soc_path(dir.path(), "tegra30"), SMALL_SOC).unwrap();
        std::fs::write(soc_path(dir.path(), "tegra124"), SMALL_SOC).unwrap();
        std::fs::write(dir.path().join("jetson-tk1.board.toml"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let socs = discover_socs(dir.path()).unwrap();
        let names: Vec<_> = socs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["tegra124", "tegra30"]);
    }

    #[test]
    fn discover_missing_dir() {
        let socs = discover_socs(Path::new("/nonexistent/configs")).unwrap();
        assert!(socs.is_empty());
    }
}
