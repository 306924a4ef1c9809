//! The SoC model: a validated registry of pins, GPIOs, groups and functions.
//!
//! Construction runs parse → index → cross-reference → derive. The result is
//! immutable; every query below is a read-only view over it.

use std::collections::{BTreeMap, HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use toml::Value;

use crate::error::{Result, SocError};
use crate::flags::SocFlags;
use crate::function::{self, Function};
use crate::group::{DriveGroup, DriveGroupId, MipiPadCtrlGroup, MipiPadCtrlGroupId};
use crate::pin::{Pin, PinId, PinKind};
use crate::schema::RowSchema;

/// Raw SoC description as read from a `.soc.toml` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocDescription {
    #[serde(flatten)]
    pub flags: SocFlags,
    pub gpios: Vec<Vec<Value>>,
    pub pins: Vec<Vec<Value>>,
    pub drive_groups: Vec<Vec<Value>>,
    pub drive_group_pins: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub mipi_pad_ctrl_groups: Vec<Vec<Value>>,
    #[serde(default)]
    pub mipi_pad_ctrl_group_pins: BTreeMap<String, Vec<String>>,
}

/// Sorted index sequences computed from the base tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DerivedViews {
    gpios_by_num: Vec<PinId>,
    pins_by_num: Vec<PinId>,
    gpios_pins_by_num: Vec<PinId>,
    gpios_by_reg: Vec<PinId>,
    pins_by_reg: Vec<PinId>,
    gpios_pins_by_reg: Vec<PinId>,
    drive_groups_by_reg: Vec<DriveGroupId>,
    drive_groups_by_alpha: Vec<DriveGroupId>,
    mipi_pad_ctrl_groups_by_reg: Vec<MipiPadCtrlGroupId>,
    mipi_pad_ctrl_groups_by_alpha: Vec<MipiPadCtrlGroupId>,
    functions_by_alpha: Vec<usize>,
}

impl DerivedViews {
    fn compute(
        pins: &[Pin],
        drive_groups: &[DriveGroup],
        mipi_groups: &[MipiPadCtrlGroup],
        functions: &IndexMap<String, Function>,
    ) -> Self {
        let ids = |kind: Option<PinKind>| -> Vec<PinId> {
            pins.iter()
                .enumerate()
                .filter(|(_, p)| kind.map_or(true, |k| p.kind == k))
                .map(|(i, _)| PinId(i))
                .collect()
        };
        let by_num = |mut v: Vec<PinId>| {
            v.sort_by_key(|id| pins[id.0].sort_by_num_key());
            v
        };
        let by_reg = |v: Vec<PinId>| {
            let mut v: Vec<PinId> = v.into_iter().filter(|id| pins[id.0].mux.is_some()).collect();
            v.sort_by_key(|id| pins[id.0].reg());
            v
        };

        let mut drive_groups_by_reg: Vec<DriveGroupId> =
            (0..drive_groups.len()).map(DriveGroupId).collect();
        let mut drive_groups_by_alpha = drive_groups_by_reg.clone();
        drive_groups_by_reg.sort_by_key(|id| drive_groups[id.0].reg);
        drive_groups_by_alpha.sort_by(|a, b| drive_groups[a.0].name.cmp(&drive_groups[b.0].name));

        let mut mipi_pad_ctrl_groups_by_reg: Vec<MipiPadCtrlGroupId> =
            (0..mipi_groups.len()).map(MipiPadCtrlGroupId).collect();
        let mut mipi_pad_ctrl_groups_by_alpha = mipi_pad_ctrl_groups_by_reg.clone();
        mipi_pad_ctrl_groups_by_reg.sort_by_key(|id| (mipi_groups[id.0].reg, mipi_groups[id.0].bit));
        mipi_pad_ctrl_groups_by_alpha.sort_by(|a, b| mipi_groups[a.0].name.cmp(&mipi_groups[b.0].name));

        let mut functions_by_alpha: Vec<usize> = (0..functions.len()).collect();
        functions_by_alpha.sort_by(|&a, &b| functions[a].name.cmp(&functions[b].name));

        Self {
            gpios_by_num: by_num(ids(Some(PinKind::Gpio))),
            pins_by_num: by_num(ids(Some(PinKind::Pin))),
            gpios_pins_by_num: by_num(ids(None)),
            gpios_by_reg: by_reg(ids(Some(PinKind::Gpio))),
            pins_by_reg: by_reg(ids(Some(PinKind::Pin))),
            gpios_pins_by_reg: by_reg(ids(None)),
            drive_groups_by_reg,
            drive_groups_by_alpha,
            mipi_pad_ctrl_groups_by_reg,
            mipi_pad_ctrl_groups_by_alpha,
            functions_by_alpha,
        }
    }
}

/// Scoped lookup state used only while one description is being loaded.
struct SocBuilder {
    flags: SocFlags,
    pins: Vec<Pin>,
    by_fullname: HashMap<String, PinId>,
}

impl SocBuilder {
    fn new(flags: SocFlags) -> Self {
        Self {
            flags,
            pins: Vec::new(),
            by_fullname: HashMap::new(),
        }
    }

    fn add_pin(&mut self, pin: Pin) -> Result<()> {
        let id = PinId(self.pins.len());
        if self.by_fullname.insert(pin.fullname.clone(), id).is_some() {
            return Err(SocError::DuplicateName { name: pin.fullname });
        }
        self.pins.push(pin);
        Ok(())
    }

    fn add_gpios(&mut self, rows: &[Vec<Value>]) -> Result<()> {
        let schema = RowSchema::gpio(&self.flags);
        for (i, cells) in rows.iter().enumerate() {
            let row = schema.decode(i, cells)?;
            let gpio = Pin::gpio_from_row(&row, &self.flags)?;
            self.add_pin(gpio)?;
        }
        Ok(())
    }

    fn add_pins(&mut self, rows: &[Vec<Value>]) -> Result<()> {
        let schema = RowSchema::pin(&self.flags);
        for (i, cells) in rows.iter().enumerate() {
            let row = schema.decode(i, cells)?;
            let pin = Pin::pin_from_row(i as u32, &row, &self.flags)?;
            self.add_pin(pin)?;
        }
        Ok(())
    }

    /// Resolve a group's member names to pin ids.
    fn resolve_members(
        &self,
        group: &str,
        table: &'static str,
        members: &BTreeMap<String, Vec<String>>,
    ) -> Result<Vec<PinId>> {
        let names = members.get(group).ok_or_else(|| SocError::MissingGroupPins {
            group: group.to_string(),
            table,
        })?;
        names
            .iter()
            .map(|name| {
                self.by_fullname
                    .get(name)
                    .copied()
                    .ok_or_else(|| SocError::Lookup {
                        group: group.to_string(),
                        name: name.clone(),
                    })
            })
            .collect()
    }

    fn drive_groups(
        &mut self,
        rows: &[Vec<Value>],
        members: &BTreeMap<String, Vec<String>>,
    ) -> Result<Vec<DriveGroup>> {
        let schema = RowSchema::drive_group(&self.flags);
        let mut groups = Vec::with_capacity(rows.len());
        let mut seen = HashSet::new();
        for (i, cells) in rows.iter().enumerate() {
            let row = schema.decode(i, cells)?;
            let name = row.str("name")?;
            unique_group_name(&mut seen, name, "drive_groups")?;
            let pins = self.resolve_members(name, "drive_group_pins", members)?;
            let mut group = DriveGroup::from_row(&row, pins)?;
            if self.flags.soc_combine_pin_drvgroup {
                if let [only] = group.pins[..] {
                    if self.pins[only.0].shortname == group.name {
                        group.has_matching_pin = true;
                        self.pins[only.0].per_pin_drive_group = Some(DriveGroupId(i));
                    }
                }
            }
            groups.push(group);
        }
        warn_orphan_member_lists("drive_group_pins", members, groups.iter().map(|g| &g.name));
        Ok(groups)
    }

    fn mipi_pad_ctrl_groups(
        &self,
        rows: &[Vec<Value>],
        members: &BTreeMap<String, Vec<String>>,
    ) -> Result<Vec<MipiPadCtrlGroup>> {
        let schema = RowSchema::mipi_pad_ctrl_group();
        let mut groups = Vec::with_capacity(rows.len());
        let mut seen = HashSet::new();
        for (i, cells) in rows.iter().enumerate() {
            let row = schema.decode(i, cells)?;
            let name = row.str("name")?;
            unique_group_name(&mut seen, name, "mipi_pad_ctrl_groups")?;
            let pins = self.resolve_members(name, "mipi_pad_ctrl_group_pins", members)?;
            groups.push(MipiPadCtrlGroup::from_row(&row, pins)?);
        }
        warn_orphan_member_lists(
            "mipi_pad_ctrl_group_pins",
            members,
            groups.iter().map(|g| &g.name),
        );
        Ok(groups)
    }
}

fn unique_group_name<'a>(seen: &mut HashSet<&'a str>, name: &'a str, table: &'static str) -> Result<()> {
    if !seen.insert(name) {
        return Err(SocError::DuplicateGroup {
            name: name.to_string(),
            table,
        });
    }
    Ok(())
}

fn warn_orphan_member_lists<'a>(
    table: &str,
    members: &BTreeMap<String, Vec<String>>,
    declared: impl Iterator<Item = &'a String>,
) {
    let declared: Vec<&String> = declared.collect();
    for name in members.keys() {
        if !declared.contains(&name) {
            tracing::warn!("{table}: member list for undeclared group '{name}' ignored");
        }
    }
}

/// A loaded, validated SoC.
#[derive(Debug, Clone)]
pub struct Soc {
    pub name: String,
    /// Capitalized name, e.g. `"Tegra124"`.
    pub titlename: String,
    pub flags: SocFlags,
    /// GPIOs in declaration order, then plain pins in declaration order.
    pins: Vec<Pin>,
    drive_groups: Vec<DriveGroup>,
    mipi_pad_ctrl_groups: Vec<MipiPadCtrlGroup>,
    functions: IndexMap<String, Function>,
    by_fullname: HashMap<String, PinId>,
    views: DerivedViews,
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Soc {
    /// Build and validate an SoC from its parsed description.
    pub fn from_description(name: &str, desc: &SocDescription) -> Result<Self> {
        let mut builder = SocBuilder::new(desc.flags.clone());
        builder.add_gpios(&desc.gpios)?;
        builder.add_pins(&desc.pins)?;
        let drive_groups = builder.drive_groups(&desc.drive_groups, &desc.drive_group_pins)?;
        let mipi_pad_ctrl_groups =
            builder.mipi_pad_ctrl_groups(&desc.mipi_pad_ctrl_groups, &desc.mipi_pad_ctrl_group_pins)?;

        let SocBuilder {
            flags,
            pins,
            by_fullname,
        } = builder;
        let functions = function::discover(&pins, &mipi_pad_ctrl_groups);
        let views = DerivedViews::compute(&pins, &drive_groups, &mipi_pad_ctrl_groups, &functions);

        tracing::debug!(
            "loaded SoC {name}: {} pins/GPIOs, {} drive groups, {} functions",
            pins.len(),
            drive_groups.len(),
            functions.len()
        );

        Ok(Self {
            name: name.to_string(),
            titlename: capitalize(name),
            flags,
            pins,
            drive_groups,
            mipi_pad_ctrl_groups,
            functions,
            by_fullname,
            views,
        })
    }

    fn pins_of<'a>(&'a self, ids: &'a [PinId]) -> impl ExactSizeIterator<Item = &'a Pin> + 'a {
        ids.iter().map(move |id| &self.pins[id.0])
    }

    fn drive_groups_of<'a>(
        &'a self,
        ids: &'a [DriveGroupId],
    ) -> impl ExactSizeIterator<Item = &'a DriveGroup> + 'a {
        ids.iter().map(move |id| &self.drive_groups[id.0])
    }

    fn mipi_groups_of<'a>(
        &'a self,
        ids: &'a [MipiPadCtrlGroupId],
    ) -> impl ExactSizeIterator<Item = &'a MipiPadCtrlGroup> + 'a {
        ids.iter().map(move |id| &self.mipi_pad_ctrl_groups[id.0])
    }

    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.0]
    }

    pub fn drive_group(&self, id: DriveGroupId) -> &DriveGroup {
        &self.drive_groups[id.0]
    }

    pub fn mipi_pad_ctrl_group(&self, id: MipiPadCtrlGroupId) -> &MipiPadCtrlGroup {
        &self.mipi_pad_ctrl_groups[id.0]
    }

    pub fn gpios_by_conf_order(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| p.kind == PinKind::Gpio)
    }

    pub fn gpios_by_num(&self) -> impl ExactSizeIterator<Item = &Pin> {
        self.pins_of(&self.views.gpios_by_num)
    }

    pub fn gpios_by_reg(&self) -> impl ExactSizeIterator<Item = &Pin> {
        self.pins_of(&self.views.gpios_by_reg)
    }

    pub fn pins_by_conf_order(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| p.kind == PinKind::Pin)
    }

    pub fn pins_by_num(&self) -> impl ExactSizeIterator<Item = &Pin> {
        self.pins_of(&self.views.pins_by_num)
    }

    pub fn pins_by_reg(&self) -> impl ExactSizeIterator<Item = &Pin> {
        self.pins_of(&self.views.pins_by_reg)
    }

    pub fn gpios_pins_by_num(&self) -> impl ExactSizeIterator<Item = &Pin> {
        self.pins_of(&self.views.gpios_pins_by_num)
    }

    /// Register-bearing pins and GPIOs, ordered by mux register offset.
    pub fn gpios_pins_by_reg(&self) -> impl ExactSizeIterator<Item = &Pin> {
        self.pins_of(&self.views.gpios_pins_by_reg)
    }

    /// Look up by signal name or `gpio_p<id>`.
    pub fn gpio_or_pin_by_name(&self, name: &str) -> Option<&Pin> {
        self.gpios_pins_by_num().find(|p| {
            (!p.signal.is_empty() && p.signal == name)
                || (!p.gpio.is_empty() && name.strip_prefix("gpio_p") == Some(p.gpio.as_str()))
        })
    }

    pub fn gpio_or_pin_by_fullname(&self, fullname: &str) -> Option<&Pin> {
        self.gpio_or_pin_id(fullname).map(|id| self.pin(id))
    }

    pub fn gpio_or_pin_id(&self, fullname: &str) -> Option<PinId> {
        self.by_fullname.get(fullname).copied()
    }

    pub fn drive_groups_by_conf_order(&self) -> impl ExactSizeIterator<Item = &DriveGroup> {
        self.drive_groups.iter()
    }

    pub fn drive_groups_by_reg(&self) -> impl ExactSizeIterator<Item = &DriveGroup> {
        self.drive_groups_of(&self.views.drive_groups_by_reg)
    }

    pub fn drive_groups_by_alpha(&self) -> impl ExactSizeIterator<Item = &DriveGroup> {
        self.drive_groups_of(&self.views.drive_groups_by_alpha)
    }

    /// Drive groups by register order, minus those merged into their pin.
    pub fn standalone_drive_groups_by_reg(&self) -> impl Iterator<Item = &DriveGroup> {
        self.drive_groups_by_reg().filter(|g| !g.has_matching_pin)
    }

    pub fn standalone_drive_groups_by_alpha(&self) -> impl Iterator<Item = &DriveGroup> {
        self.drive_groups_by_alpha().filter(|g| !g.has_matching_pin)
    }

    pub fn drive_group_by_name(&self, name: &str) -> Option<&DriveGroup> {
        self.drive_groups.iter().find(|g| g.name == name)
    }

    pub fn mipi_pad_ctrl_groups_by_conf_order(
        &self,
    ) -> impl ExactSizeIterator<Item = &MipiPadCtrlGroup> {
        self.mipi_pad_ctrl_groups.iter()
    }

    pub fn mipi_pad_ctrl_groups_by_reg(&self) -> impl ExactSizeIterator<Item = &MipiPadCtrlGroup> {
        self.mipi_groups_of(&self.views.mipi_pad_ctrl_groups_by_reg)
    }

    pub fn mipi_pad_ctrl_groups_by_alpha(
        &self,
    ) -> impl ExactSizeIterator<Item = &MipiPadCtrlGroup> {
        self.mipi_groups_of(&self.views.mipi_pad_ctrl_groups_by_alpha)
    }

    pub fn mipi_pad_ctrl_group_by_name(&self, name: &str) -> Option<&MipiPadCtrlGroup> {
        self.mipi_pad_ctrl_groups.iter().find(|g| g.name == name)
    }

    /// Functions in discovery order.
    pub fn functions(&self) -> impl ExactSizeIterator<Item = &Function> {
        self.functions.values()
    }

    pub fn functions_by_alpha(&self) -> impl ExactSizeIterator<Item = &Function> {
        self.views.functions_by_alpha.iter().map(move |&i| &self.functions[i])
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Total number of pin/GPIO records.
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }
}
