//! Tag labels evenly spaced along an axis.
//!
//! `n` tags split the axis into `n` equal cells; tag `i` sits at the centre of
//! its cell, `i/n + 1/(2n)` in axes-fraction coordinates. The cross-axis
//! coordinate is a caller-chosen offset (negative values sit outside the plot).

use serde::{Deserialize, Serialize};

use crate::colorbar::Orientation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Text styling passed through to the plot surface unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_size: f64,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f64,
    pub weight: FontWeight,
    pub horizontal_alignment: HAlign,
    pub vertical_alignment: VAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 15.0,
            rotation: 0.0,
            weight: FontWeight::Normal,
            horizontal_alignment: HAlign::Center,
            vertical_alignment: VAlign::Center,
        }
    }
}

/// A text label at axes-fraction coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedText {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub style: TextStyle,
}

/// Cell-centre positions for `n` tags.
pub fn tag_positions(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let cell = 1.0 / n as f64;
    let half = cell / 2.0;
    (0..n).map(|i| i as f64 * cell + half).collect()
}

/// Lay out a row of tags.
///
/// `Horizontal` spreads the tags along x at height `offset`; `Vertical`
/// spreads them along y at x = `offset`.
pub fn place_tags<S: AsRef<str>>(
    axis: Orientation,
    offset: f64,
    tags: &[S],
    style: &TextStyle,
) -> Vec<PlacedText> {
    tag_positions(tags.len())
        .into_iter()
        .zip(tags)
        .map(|(along, tag)| {
            let (x, y) = match axis {
                Orientation::Horizontal => (along, offset),
                Orientation::Vertical => (offset, along),
            };
            PlacedText {
                x,
                y,
                text: tag.as_ref().to_string(),
                style: style.clone(),
            }
        })
        .collect()
}
