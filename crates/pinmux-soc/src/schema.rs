//! Positional row schemas.
//!
//! Description tables are arrays of positional rows, and which columns a row
//! carries depends on the SoC feature flags. Every table's column list is
//! computed here, once per load, as a pure function of [`SocFlags`]; rows are
//! then decoded against it.

use toml::Value;

use crate::error::{Result, SocError};
use crate::flags::SocFlags;

/// Cell type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Bool,
    Int,
}

impl FieldKind {
    fn describe(self) -> &'static str {
        match self {
            FieldKind::Str => "a string",
            FieldKind::Bool => "a boolean",
            FieldKind::Int => "an unsigned 32-bit integer",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::Str, Value::String(_)) => true,
            (FieldKind::Bool, Value::Boolean(_)) => true,
            (FieldKind::Int, Value::Integer(i)) => u32::try_from(*i).is_ok(),
            _ => false,
        }
    }
}

/// One named column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Ordered column list for one table.
///
/// A schema may also accept a short form: a row holding only the first
/// `short_len` columns. Pin tables use this for pads the multiplexer does not
/// control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSchema {
    table: &'static str,
    fields: Vec<Field>,
    short_len: Option<usize>,
}

impl RowSchema {
    /// An empty schema for `table`.
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            fields: Vec::new(),
            short_len: None,
        }
    }

    fn field(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field { name, kind });
        self
    }

    fn field_if(self, cond: bool, name: &'static str, kind: FieldKind) -> Self {
        if cond {
            self.field(name, kind)
        } else {
            self
        }
    }

    /// Mark everything declared so far as the short form.
    fn short_form(mut self) -> Self {
        self.short_len = Some(self.fields.len());
        self
    }

    fn mux_register_fields(self, flags: &SocFlags) -> Self {
        self.field("reg", FieldKind::Int)
            .field("f0", FieldKind::Str)
            .field("f1", FieldKind::Str)
            .field("f2", FieldKind::Str)
            .field("f3", FieldKind::Str)
            .field_if(flags.pins_have_od_column(), "od", FieldKind::Bool)
            .field_if(flags.soc_pins_have_ior, "ior", FieldKind::Bool)
            .field_if(flags.soc_pins_have_rcv_sel, "rcv_sel", FieldKind::Bool)
            .field_if(flags.soc_pins_have_hsm, "hsm", FieldKind::Bool)
            .field_if(flags.pins_have_schmitt_column(), "schmitt", FieldKind::Bool)
            .field_if(flags.soc_pins_have_drvtype, "drvtype", FieldKind::Bool)
            .field_if(flags.soc_pins_have_e_io_hv, "e_io_hv", FieldKind::Bool)
    }

    /// `gpios` table: `signal, gpio` then the mux register columns.
    pub fn gpio(flags: &SocFlags) -> Self {
        Self::new("gpios")
            .field("signal", FieldKind::Str)
            .field("gpio", FieldKind::Str)
            .short_form()
            .mux_register_fields(flags)
    }

    /// `pins` table: `signal` then the mux register columns.
    pub fn pin(flags: &SocFlags) -> Self {
        Self::new("pins")
            .field("signal", FieldKind::Str)
            .short_form()
            .mux_register_fields(flags)
    }

    /// `drive_groups` table.
    pub fn drive_group(flags: &SocFlags) -> Self {
        Self::new("drive_groups")
            .field("name", FieldKind::Str)
            .field("reg", FieldKind::Int)
            .field_if(flags.soc_drvgroups_have_hsm, "hsm_b", FieldKind::Int)
            .field_if(flags.soc_drvgroups_have_schmitt, "schmitt_b", FieldKind::Int)
            .field_if(flags.soc_drvgroups_have_lpmd, "lpmd_b", FieldKind::Int)
            .field("drvdn_b", FieldKind::Int)
            .field("drvdn_w", FieldKind::Int)
            .field("drvup_b", FieldKind::Int)
            .field("drvup_w", FieldKind::Int)
            .field("slwr_b", FieldKind::Int)
            .field("slwr_w", FieldKind::Int)
            .field("slwf_b", FieldKind::Int)
            .field("slwf_w", FieldKind::Int)
            .field_if(flags.soc_drvgroups_have_drvtype, "drvtype", FieldKind::Bool)
    }

    /// `mipi_pad_ctrl_groups` table.
    pub fn mipi_pad_ctrl_group() -> Self {
        Self::new("mipi_pad_ctrl_groups")
            .field("name", FieldKind::Str)
            .field("reg", FieldKind::Int)
            .field("bit", FieldKind::Int)
            .field("f0", FieldKind::Str)
            .field("f1", FieldKind::Str)
    }

    /// Board `pins` table.
    pub fn pin_config(flags: &SocFlags) -> Self {
        Self::new("pins")
            .field("pin", FieldKind::Str)
            .field("mux", FieldKind::Str)
            .field("gpio_init", FieldKind::Str)
            .field("pull", FieldKind::Str)
            .field("tri", FieldKind::Bool)
            .field("e_inp", FieldKind::Bool)
            .field("od", FieldKind::Bool)
            .field_if(flags.soc_pins_have_e_io_hv, "e_io_hv", FieldKind::Bool)
            .field_if(flags.soc_pins_have_rcv_sel, "rcv_sel", FieldKind::Bool)
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Column names, in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Check `cells` against the schema and wrap them for named access.
    pub fn decode<'a>(&'a self, row: usize, cells: &'a [Value]) -> Result<Row<'a>> {
        let full = cells.len() == self.fields.len();
        let short = self.short_len == Some(cells.len());
        if !full && !short {
            let expected = match self.short_len {
                Some(n) => format!("{n} or {}", self.fields.len()),
                None => self.fields.len().to_string(),
            };
            return Err(SocError::FieldCount {
                table: self.table,
                row,
                expected,
                found: cells.len(),
            });
        }
        for (field, value) in self.fields.iter().zip(cells) {
            if !field.kind.accepts(value) {
                return Err(SocError::FieldType {
                    table: self.table,
                    row,
                    field: field.name,
                    expected: field.kind.describe(),
                });
            }
        }
        Ok(Row {
            schema: self,
            row,
            cells,
        })
    }
}

/// A row that passed [`RowSchema::decode`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    schema: &'a RowSchema,
    row: usize,
    cells: &'a [Value],
}

impl<'a> Row<'a> {
    /// Position of the row within its table.
    pub fn index(&self) -> usize {
        self.row
    }

    /// Whether the row is in the schema's short form.
    pub fn is_short(&self) -> bool {
        self.cells.len() < self.schema.fields.len()
    }

    fn value(&self, name: &str) -> Option<&'a Value> {
        let pos = self.schema.fields.iter().position(|f| f.name == name)?;
        self.cells.get(pos)
    }

    fn missing(&self, field: &'static str) -> SocError {
        SocError::MissingField {
            table: self.schema.table,
            row: self.row,
            field,
        }
    }

    pub fn str(&self, name: &'static str) -> Result<&'a str> {
        self.opt_str(name).ok_or_else(|| self.missing(name))
    }

    pub fn int(&self, name: &'static str) -> Result<u32> {
        self.opt_int(name).ok_or_else(|| self.missing(name))
    }

    pub fn bool(&self, name: &'static str) -> Result<bool> {
        self.opt_bool(name).ok_or_else(|| self.missing(name))
    }

    /// `None` when the column is not part of this row.
    pub fn opt_str(&self, name: &str) -> Option<&'a str> {
        self.value(name).and_then(Value::as_str)
    }

    pub fn opt_int(&self, name: &str) -> Option<u32> {
        self.value(name)
            .and_then(Value::as_integer)
            .and_then(|i| u32::try_from(i).ok())
    }

    pub fn opt_bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(Value::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(src: &str) -> Vec<Value> {
        #[derive(serde::Deserialize)]
        struct Wrap {
            row: Vec<Value>,
        }
        toml::from_str::<Wrap>(&format!("row = {src}")).unwrap().row
    }

    #[test]
    fn schema_follows_flags() {
        let plain = RowSchema::pin(&SocFlags::default());
        assert_eq!(
            plain.names().collect::<Vec<_>>(),
            ["signal", "reg", "f0", "f1", "f2", "f3"]
        );

        let flags = SocFlags {
            soc_pins_have_od: true,
            soc_pins_have_ior: true,
            soc_pins_have_rcv_sel: true,
            ..SocFlags::default()
        };
        let gpio = RowSchema::gpio(&flags);
        assert_eq!(
            gpio.names().collect::<Vec<_>>(),
            ["signal", "gpio", "reg", "f0", "f1", "f2", "f3", "od", "ior", "rcv_sel"]
        );
    }

    #[test]
    fn schema_is_deterministic() {
        let flags = SocFlags {
            soc_drvgroups_have_hsm: true,
            soc_drvgroups_have_drvtype: true,
            ..SocFlags::default()
        };
        assert_eq!(RowSchema::drive_group(&flags), RowSchema::drive_group(&flags));
        let names: Vec<_> = RowSchema::drive_group(&flags).names().collect();
        assert_eq!(names[2], "hsm_b");
        assert_eq!(*names.last().unwrap(), "drvtype");
    }

    #[test]
    fn decode_full_row() {
        let schema = RowSchema::pin(&SocFlags::default());
        let cells = cells(r#"["core_pwr_req", 0x3324, "pwron", "rsvd1", "rsvd2", "rsvd3"]"#);
        let row = schema.decode(0, &cells).unwrap();
        assert!(!row.is_short());
        assert_eq!(row.str("signal").unwrap(), "core_pwr_req");
        assert_eq!(row.int("reg").unwrap(), 0x3324);
        assert_eq!(row.opt_bool("od"), None);
    }

    #[test]
    fn decode_short_row() {
        let schema = RowSchema::gpio(&SocFlags::default());
        let cells = cells(r#"["", "x0"]"#);
        let row = schema.decode(3, &cells).unwrap();
        assert!(row.is_short());
        assert!(row.opt_int("reg").is_none());
        assert!(matches!(
            row.int("reg"),
            Err(SocError::MissingField { field: "reg", .. })
        ));
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let flags = SocFlags {
            soc_pins_have_rcv_sel: true,
            ..SocFlags::default()
        };
        let schema = RowSchema::pin(&flags);
        let cells = cells(r#"["pwr_int_n", 0x3328, "pmi", "rsvd1", "rsvd2", "rsvd3"]"#);
        let err = schema.decode(7, &cells).unwrap_err();
        match err {
            SocError::FieldCount { row, found, .. } => {
                assert_eq!(row, 7);
                assert_eq!(found, 6);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_wrong_type() {
        let schema = RowSchema::mipi_pad_ctrl_group();
        let cells = cells(r#"["dsi_b", 0x820, "1", "csi", "dsi_b"]"#);
        assert!(matches!(
            schema.decode(0, &cells),
            Err(SocError::FieldType { field: "bit", .. })
        ));
    }

    #[test]
    fn decode_rejects_negative_int() {
        let schema = RowSchema::mipi_pad_ctrl_group();
        let cells = cells(r#"["dsi_b", -1, 1, "csi", "dsi_b"]"#);
        assert!(matches!(
            schema.decode(0, &cells),
            Err(SocError::FieldType { field: "reg", .. })
        ));
    }
}
