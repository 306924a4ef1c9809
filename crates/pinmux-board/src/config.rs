//! Per-pin configuration entries and their value sets.

use std::fmt;
use std::str::FromStr;

use pinmux_soc::PinId;
use serde::Serialize;

/// Pull resistor setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pull {
    #[default]
    None,
    Up,
    Down,
}

impl Pull {
    pub fn as_str(self) -> &'static str {
        match self {
            Pull::None => "none",
            Pull::Up => "up",
            Pull::Down => "down",
        }
    }
}

impl fmt::Display for Pull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pull {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Pull::None),
            "up" => Ok(Pull::Up),
            "down" => Ok(Pull::Down),
            other => Err(other.to_string()),
        }
    }
}

/// Initial GPIO state for pins left in GPIO mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GpioInit {
    In,
    Out0,
    Out1,
}

impl GpioInit {
    pub fn as_str(self) -> &'static str {
        match self {
            GpioInit::In => "in",
            GpioInit::Out0 => "out0",
            GpioInit::Out1 => "out1",
        }
    }

    /// Output at the given level.
    pub fn output(high: bool) -> Self {
        if high {
            GpioInit::Out1
        } else {
            GpioInit::Out0
        }
    }
}

impl fmt::Display for GpioInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GpioInit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(GpioInit::In),
            "out0" => Ok(GpioInit::Out0),
            "out1" => Ok(GpioInit::Out1),
            other => Err(other.to_string()),
        }
    }
}

/// Desired configuration of one SoC pin on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinConfig {
    /// Full name of the configured pin, e.g. `"sdmmc1_clk_pz0"`.
    pub fullname: String,
    /// The pin in the target SoC.
    pub pin: PinId,
    /// Selected function; `None` leaves the pad in GPIO mode.
    pub mux: Option<String>,
    pub gpio_init: Option<GpioInit>,
    pub pull: Pull,
    pub tri: bool,
    pub e_inp: bool,
    pub od: bool,
    /// Present only when the SoC has an `e_io_hv` column.
    pub e_io_hv: Option<bool>,
    /// Present only when the SoC has an `rcv_sel` column.
    pub rcv_sel: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_values() {
        assert_eq!("none".parse::<Pull>().unwrap(), Pull::None);
        assert_eq!("up".parse::<Pull>().unwrap(), Pull::Up);
        assert_eq!(Pull::Down.to_string(), "down");
        assert!("PULL_UP".parse::<Pull>().is_err());
    }

    #[test]
    fn gpio_init_values() {
        assert_eq!("in".parse::<GpioInit>().unwrap(), GpioInit::In);
        assert_eq!(GpioInit::output(true), GpioInit::Out1);
        assert_eq!(GpioInit::output(false).as_str(), "out0");
        assert!("out2".parse::<GpioInit>().is_err());
    }
}
