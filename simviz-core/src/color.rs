//! Colours and named sequential colour schemes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Linear interpolation towards `other`, `t` in `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown colour scheme '{0}' (known: Blues, Greens, Greys, Oranges, Purples, Reds, Viridis; append _r to reverse)")]
pub struct UnknownScheme(pub String);

/// Base ramps, light to dark (viridis: dark to light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    Blues,
    Greens,
    Greys,
    Oranges,
    Purples,
    Reds,
    Viridis,
}

const BLUES: &[Rgb] = &[
    Rgb(0xf7, 0xfb, 0xff),
    Rgb(0xde, 0xeb, 0xf7),
    Rgb(0xc6, 0xdb, 0xef),
    Rgb(0x9e, 0xca, 0xe1),
    Rgb(0x6b, 0xae, 0xd6),
    Rgb(0x42, 0x92, 0xc6),
    Rgb(0x21, 0x71, 0xb5),
    Rgb(0x08, 0x51, 0x9c),
    Rgb(0x08, 0x30, 0x6b),
];

const GREENS: &[Rgb] = &[
    Rgb(0xf7, 0xfc, 0xf5),
    Rgb(0xe5, 0xf5, 0xe0),
    Rgb(0xc7, 0xe9, 0xc0),
    Rgb(0xa1, 0xd9, 0x9b),
    Rgb(0x74, 0xc4, 0x76),
    Rgb(0x41, 0xab, 0x5d),
    Rgb(0x23, 0x8b, 0x45),
    Rgb(0x00, 0x6d, 0x2c),
    Rgb(0x00, 0x44, 0x1b),
];

const GREYS: &[Rgb] = &[
    Rgb(0xff, 0xff, 0xff),
    Rgb(0xf0, 0xf0, 0xf0),
    Rgb(0xd9, 0xd9, 0xd9),
    Rgb(0xbd, 0xbd, 0xbd),
    Rgb(0x96, 0x96, 0x96),
    Rgb(0x73, 0x73, 0x73),
    Rgb(0x52, 0x52, 0x52),
    Rgb(0x25, 0x25, 0x25),
    Rgb(0x00, 0x00, 0x00),
];

const ORANGES: &[Rgb] = &[
    Rgb(0xff, 0xf5, 0xeb),
    Rgb(0xfe, 0xe6, 0xce),
    Rgb(0xfd, 0xd0, 0xa2),
    Rgb(0xfd, 0xae, 0x6b),
    Rgb(0xfd, 0x8d, 0x3c),
    Rgb(0xf1, 0x69, 0x13),
    Rgb(0xd9, 0x48, 0x01),
    Rgb(0xa6, 0x36, 0x03),
    Rgb(0x7f, 0x27, 0x04),
];

const PURPLES: &[Rgb] = &[
    Rgb(0xfc, 0xfb, 0xfd),
    Rgb(0xef, 0xed, 0xf5),
    Rgb(0xda, 0xda, 0xeb),
    Rgb(0xbc, 0xbd, 0xdc),
    Rgb(0x9e, 0x9a, 0xc8),
    Rgb(0x80, 0x7d, 0xba),
    Rgb(0x6a, 0x51, 0xa3),
    Rgb(0x54, 0x27, 0x8f),
    Rgb(0x3f, 0x00, 0x7d),
];

const REDS: &[Rgb] = &[
    Rgb(0xff, 0xf5, 0xf0),
    Rgb(0xfe, 0xe0, 0xd2),
    Rgb(0xfc, 0xbb, 0xa1),
    Rgb(0xfc, 0x92, 0x72),
    Rgb(0xfb, 0x6a, 0x4a),
    Rgb(0xef, 0x3b, 0x2c),
    Rgb(0xcb, 0x18, 0x1d),
    Rgb(0xa5, 0x0f, 0x15),
    Rgb(0x67, 0x00, 0x0d),
];

const VIRIDIS: &[Rgb] = &[
    Rgb(0x44, 0x01, 0x54),
    Rgb(0x48, 0x28, 0x78),
    Rgb(0x3e, 0x49, 0x89),
    Rgb(0x31, 0x68, 0x8e),
    Rgb(0x26, 0x82, 0x8e),
    Rgb(0x1f, 0x9e, 0x89),
    Rgb(0x35, 0xb7, 0x79),
    Rgb(0x6e, 0xce, 0x58),
    Rgb(0xb5, 0xde, 0x2b),
    Rgb(0xfd, 0xe7, 0x25),
];

impl Palette {
    const ALL: [Palette; 7] = [
        Palette::Blues,
        Palette::Greens,
        Palette::Greys,
        Palette::Oranges,
        Palette::Purples,
        Palette::Reds,
        Palette::Viridis,
    ];

    fn name(self) -> &'static str {
        match self {
            Palette::Blues => "Blues",
            Palette::Greens => "Greens",
            Palette::Greys => "Greys",
            Palette::Oranges => "Oranges",
            Palette::Purples => "Purples",
            Palette::Reds => "Reds",
            Palette::Viridis => "viridis",
        }
    }

    fn stops(self) -> &'static [Rgb] {
        match self {
            Palette::Blues => BLUES,
            Palette::Greens => GREENS,
            Palette::Greys => GREYS,
            Palette::Oranges => ORANGES,
            Palette::Purples => PURPLES,
            Palette::Reds => REDS,
            Palette::Viridis => VIRIDIS,
        }
    }
}

/// A named colour map, optionally reversed (`Blues_r`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorScheme {
    pub palette: Palette,
    pub reversed: bool,
}

impl ColorScheme {
    pub const fn new(palette: Palette) -> Self {
        Self {
            palette,
            reversed: false,
        }
    }

    /// Colour for a normalized value; `t` is clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let t = if self.reversed { 1.0 - t } else { t };
        let stops = self.palette.stops();
        let scaled = t * (stops.len() - 1) as f64;
        let i = (scaled.floor() as usize).min(stops.len() - 2);
        stops[i].lerp(stops[i + 1], scaled - i as f64)
    }

    /// Colour for `value` within `[min, max]`. A zero-width range maps to the
    /// bottom of the ramp.
    pub fn map(&self, value: f64, min: f64, max: f64) -> Rgb {
        let span = max - min;
        if span > 0.0 {
            self.sample((value - min) / span)
        } else {
            self.sample(0.0)
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::new(Palette::Blues)
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.palette.name())?;
        if self.reversed {
            f.write_str("_r")?;
        }
        Ok(())
    }
}

impl FromStr for ColorScheme {
    type Err = UnknownScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (base, reversed) = match trimmed.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (trimmed, false),
        };
        Palette::ALL
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(base))
            .map(|&palette| ColorScheme { palette, reversed })
            .ok_or_else(|| UnknownScheme(s.to_string()))
    }
}

impl TryFrom<String> for ColorScheme {
    type Error = UnknownScheme;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ColorScheme> for String {
    fn from(scheme: ColorScheme) -> Self {
        scheme.to_string()
    }
}
