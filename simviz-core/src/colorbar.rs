//! Colour-bar scale: orientation setting and tick computation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matrix::AlignedMatrix;

/// Number of ticks on a colour bar.
pub const TICK_COUNT: usize = 5;

/// Direction of a line or a colour bar on the plot surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Colour-bar configuration: an orientation, or no colour bar at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorbarSetting {
    #[default]
    Horizontal,
    Vertical,
    None,
}

impl ColorbarSetting {
    pub fn orientation(self) -> Option<Orientation> {
        match self {
            ColorbarSetting::Horizontal => Some(Orientation::Horizontal),
            ColorbarSetting::Vertical => Some(Orientation::Vertical),
            ColorbarSetting::None => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown colour-bar setting '{0}' (expected horizontal, vertical or none)")]
pub struct UnknownColorbar(pub String);

impl FromStr for ColorbarSetting {
    type Err = UnknownColorbar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(ColorbarSetting::Horizontal),
            "vertical" => Ok(ColorbarSetting::Vertical),
            "none" | "off" => Ok(ColorbarSetting::None),
            _ => Err(UnknownColorbar(s.to_string())),
        }
    }
}

impl fmt::Display for ColorbarSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorbarSetting::Horizontal => "horizontal",
            ColorbarSetting::Vertical => "vertical",
            ColorbarSetting::None => "none",
        })
    }
}

/// Value range and tick marks of a colour bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<f64>,
}

impl ColorScale {
    /// Tick labels with three decimals.
    pub fn tick_labels(&self) -> Vec<String> {
        self.ticks.iter().map(|t| format!("{t:.3}")).collect()
    }
}

/// Five evenly spaced ticks from the matrix minimum to its maximum.
/// A constant matrix gets a single tick.
pub fn color_scale(matrix: &AlignedMatrix) -> ColorScale {
    let min = matrix.min();
    let max = matrix.max();
    let ticks = if max > min {
        let step = (max - min) / (TICK_COUNT - 1) as f64;
        (0..TICK_COUNT)
            .map(|i| if i + 1 == TICK_COUNT { max } else { min + step * i as f64 })
            .collect()
    } else {
        vec![min]
    };
    ColorScale { min, max, ticks }
}
