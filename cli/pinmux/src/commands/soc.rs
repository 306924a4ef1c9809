//! `pinmux soc`: SoC listing, description and validation.

use std::path::Path;

use anyhow::{Context, Result};
use pinmux_soc::{Pin, Soc};

use crate::Format;

/// List every SoC description in `configs`.
pub fn list(configs: &Path) -> Result<()> {
    let socs = pinmux_soc::discover_socs(configs)
        .with_context(|| format!("scanning {}", configs.display()))?;
    if socs.is_empty() {
        println!("No SoC descriptions in {}", configs.display());
        return Ok(());
    }
    println!("SoCs in {}:", configs.display());
    for (name, path) in socs {
        println!("  {name:<16} {}", path.display());
    }
    Ok(())
}

pub(crate) fn load(configs: &Path, name: &str) -> Result<Soc> {
    pinmux_soc::load_soc(configs, name).with_context(|| format!("loading SoC '{name}'"))
}

fn reg(pin: &Pin) -> String {
    pin.reg().map_or_else(|| "-".to_string(), |r| format!("0x{r:04x}"))
}

/// Print an SoC's pins, groups and functions.
pub fn describe(configs: &Path, name: &str, format: Format) -> Result<()> {
    let soc = load(configs, name)?;
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&to_json(&soc)?)?),
        Format::Human => print_human(&soc),
    }
    Ok(())
}

fn to_json(soc: &Soc) -> Result<serde_json::Value> {
    let pins: Vec<_> = soc
        .gpios_pins_by_num()
        .map(|p| {
            serde_json::json!({
                "fullname": p.fullname,
                "define": p.define(),
                "kind": p.kind,
                "num": p.num,
                "reg": p.reg(),
                "funcs": p.funcs(),
            })
        })
        .collect();
    let drive_groups: Vec<_> = soc
        .drive_groups_by_reg()
        .map(|g| {
            let members: Vec<_> = g.pins.iter().map(|&id| &soc.pin(id).fullname).collect();
            serde_json::json!({
                "name": g.name,
                "reg": g.reg,
                "pins": members,
                "has_matching_pin": g.has_matching_pin,
            })
        })
        .collect();
    let functions: Vec<_> = soc.functions_by_alpha().map(|f| &f.name).collect();
    Ok(serde_json::json!({
        "name": soc.name,
        "flags": serde_json::to_value(&soc.flags)?,
        "pins": pins,
        "drive_groups": drive_groups,
        "mipi_pad_ctrl_groups": soc.mipi_pad_ctrl_groups_by_reg().map(|g| &g.name).collect::<Vec<_>>(),
        "functions": functions,
    }))
}

fn print_human(soc: &Soc) {
    println!("=== SoC: {} ===", soc.titlename);
    println!(
        "Copyright: kernel {} / u-boot {} ({})",
        soc.flags.kernel_copyright_years, soc.flags.uboot_copyright_years, soc.flags.kernel_author
    );
    println!();

    println!("--- Pins ({}) ---", soc.pin_count());
    for pin in soc.gpios_pins_by_num() {
        let funcs = pin.funcs().map(|f| f.join(" ")).unwrap_or_default();
        println!("  {:<28} {:>7}  {funcs}", pin.fullname, reg(pin));
    }
    println!();

    println!("--- Drive groups ({}) ---", soc.drive_groups_by_reg().len());
    for group in soc.drive_groups_by_reg() {
        let members: Vec<_> = group.pins.iter().map(|&id| soc.pin(id).fullname.as_str()).collect();
        let marker = if group.has_matching_pin { " (per-pin)" } else { "" };
        println!("  {:<16} 0x{:04x}{marker}  {}", group.name, group.reg, members.join(", "));
    }

    let mipi: Vec<_> = soc.mipi_pad_ctrl_groups_by_reg().collect();
    if !mipi.is_empty() {
        println!();
        println!("--- MIPI pad control groups ---");
        for group in mipi {
            println!(
                "  {:<16} 0x{:04x} bit {}  {} {}",
                group.name, group.reg, group.bit, group.funcs[0], group.funcs[1]
            );
        }
    }
    println!();

    println!("--- Functions ({}) ---", soc.functions_by_alpha().len());
    for func in soc.functions_by_alpha() {
        println!("  {:<16} {} pin(s)", func.name, func.pins().count());
    }
}

/// Load an SoC and print a one-line summary.
pub fn validate(configs: &Path, name: &str) -> Result<()> {
    let soc = load(configs, name)?;
    println!(
        "{}: OK ({} gpios, {} pins, {} drive groups, {} functions)",
        soc.name,
        soc.gpios_by_conf_order().count(),
        soc.pins_by_conf_order().count(),
        soc.drive_groups_by_conf_order().len(),
        soc.functions().len(),
    );
    Ok(())
}
