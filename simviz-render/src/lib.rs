//! SimViz Render — configuration, sessions and real output for `simviz-core`.
//!
//! This crate builds on `simviz-core` to provide:
//! - TOML visualization config with validation (`config`)
//! - The `GridMap` session: parse, plan, draw, tag, show/save (`session`)
//! - A `plotters`-backed plot surface for PNG/JPEG/BMP/SVG (`plotters_surface`)
//! - Hand-off to the desktop image viewer (`viewer`)
//! - CSV/JSON artifact export (`export`)

pub mod config;
pub mod export;
pub mod plotters_surface;
pub mod session;
pub mod viewer;

pub use config::{ConfigError, ImageSettings, ParseSettings, TagRow, VizConfig};
pub use export::{export_calls_json, export_matrix_csv, export_plan_json, save_artifacts};
pub use plotters_surface::PlottersSurface;
pub use session::{GridMap, VizError};
pub use viewer::open_in_viewer;
