//! Mux functions discovered from pin and pad-control group slots.

use indexmap::IndexMap;
use serde::Serialize;

use crate::group::{MipiPadCtrlGroup, MipiPadCtrlGroupId};
use crate::pin::{Pin, PinId};

/// Something that can route a function: a pin or a pad-control group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FunctionUser {
    Pin(PinId),
    MipiPadCtrlGroup(MipiPadCtrlGroupId),
}

/// A named mux function and every pin/group that offers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: String,
    pub users: Vec<FunctionUser>,
}

impl Function {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            users: Vec::new(),
        }
    }

    fn add_user(&mut self, user: FunctionUser) {
        if !self.users.contains(&user) {
            self.users.push(user);
        }
    }

    /// Pins offering this function, in discovery order.
    pub fn pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.users.iter().filter_map(|u| match u {
            FunctionUser::Pin(id) => Some(*id),
            FunctionUser::MipiPadCtrlGroup(_) => None,
        })
    }
}

/// Scan every register-bearing pin (declaration order), then every pad-control
/// group. A function's first appearance fixes its position.
pub(crate) fn discover(pins: &[Pin], groups: &[MipiPadCtrlGroup]) -> IndexMap<String, Function> {
    let mut functions: IndexMap<String, Function> = IndexMap::new();
    for (i, pin) in pins.iter().enumerate() {
        let Some(funcs) = pin.funcs() else {
            continue;
        };
        for func in funcs {
            functions
                .entry(func.clone())
                .or_insert_with(|| Function::new(func))
                .add_user(FunctionUser::Pin(PinId(i)));
        }
    }
    for (i, group) in groups.iter().enumerate() {
        for func in &group.funcs {
            functions
                .entry(func.clone())
                .or_insert_with(|| Function::new(func))
                .add_user(FunctionUser::MipiPadCtrlGroup(MipiPadCtrlGroupId(i)));
        }
    }
    functions
}
