//! TOML visualization configuration.
//!
//! ```toml
//! input = "rejRate_anselinRey.csv"
//! color_scheme = "Blues"
//! colorbar = "vertical"
//!
//! [parse]
//! delimiter = ","
//! light_marker = "b"
//! heavy_marker = "w"
//!
//! [image]
//! width = 800
//! height = 600
//!
//! [[tags]]
//! axis = "vertical"
//! offset = -0.15
//! labels = ["225", "169", "121", "81", "49", "25"]
//! rotation = 90
//! weight = "bold"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use simviz_core::{
    ColorScheme, ColorbarSetting, FontWeight, GridOptions, HAlign, MarkerTokens, Orientation,
    ParseOptions, TextStyle, VAlign,
};

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration of one visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizConfig {
    /// Path to the delimited grid file.
    pub input: PathBuf,

    #[serde(default)]
    pub color_scheme: ColorScheme,

    #[serde(default)]
    pub colorbar: ColorbarSetting,

    #[serde(default)]
    pub parse: ParseSettings,

    #[serde(default)]
    pub image: ImageSettings,

    #[serde(default)]
    pub tags: Vec<TagRow>,
}

/// Tokenizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSettings {
    pub delimiter: char,
    pub light_marker: String,
    pub heavy_marker: String,
}

impl Default for ParseSettings {
    fn default() -> Self {
        let markers = MarkerTokens::default();
        Self {
            delimiter: ',',
            light_marker: markers.light,
            heavy_marker: markers.heavy,
        }
    }
}

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// One row of tag labels along an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRow {
    /// Axis the labels are spread along.
    pub axis: Orientation,
    /// Axes-fraction coordinate on the cross axis.
    pub offset: f64,
    pub labels: Vec<String>,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub horizontal_alignment: HAlign,
    #[serde(default)]
    pub vertical_alignment: VAlign,
}

fn default_font_size() -> f64 {
    TextStyle::default().font_size
}

impl TagRow {
    pub fn style(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            rotation: self.rotation,
            weight: self.weight,
            horizontal_alignment: self.horizontal_alignment,
            vertical_alignment: self.vertical_alignment,
        }
    }
}

impl VizConfig {
    /// Defaults for everything except the input path.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            color_scheme: ColorScheme::default(),
            colorbar: ColorbarSetting::default(),
            parse: ParseSettings::default(),
            image: ImageSettings::default(),
            tags: Vec::new(),
        }
    }

    /// Load and validate a config file. A relative `input` is resolved
    /// against the config file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if config.input.is_relative() {
            if let Some(dir) = path.parent() {
                config.input = dir.join(&config.input);
            }
        }
        Ok(config)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: VizConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.parse;
        if !p.delimiter.is_ascii() {
            return Err(ConfigError::Invalid(format!(
                "delimiter '{}' must be a single ASCII character",
                p.delimiter
            )));
        }
        for (name, token) in [("light_marker", &p.light_marker), ("heavy_marker", &p.heavy_marker)] {
            if token.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
            if token.trim() != token.as_str() {
                return Err(ConfigError::Invalid(format!(
                    "{name} '{token}' must not have surrounding whitespace"
                )));
            }
            if token.parse::<f64>().is_ok() {
                return Err(ConfigError::Invalid(format!("{name} '{token}' parses as a number")));
            }
            if token.contains(p.delimiter) {
                return Err(ConfigError::Invalid(format!(
                    "{name} '{token}' contains the delimiter '{}'",
                    p.delimiter
                )));
            }
        }
        if p.light_marker == p.heavy_marker {
            return Err(ConfigError::Invalid(format!(
                "light_marker and heavy_marker are both '{}'",
                p.light_marker
            )));
        }
        if self.image.width == 0 || self.image.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size {}x{} must be positive",
                self.image.width, self.image.height
            )));
        }
        for (i, row) in self.tags.iter().enumerate() {
            if row.labels.is_empty() {
                return Err(ConfigError::Invalid(format!("tag row {i} has no labels")));
            }
            if row.font_size.is_nan() || row.font_size <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "tag row {i} font_size must be positive"
                )));
            }
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            // validate() guarantees an ASCII delimiter
            delimiter: self.parse.delimiter as u8,
            markers: MarkerTokens::new(&self.parse.light_marker, &self.parse.heavy_marker),
        }
    }

    pub fn grid_options(&self) -> GridOptions {
        GridOptions {
            scheme: self.color_scheme,
            colorbar: self.colorbar,
        }
    }
}
