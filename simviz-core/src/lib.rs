//! SimViz Core — turns a delimited simulation-result grid into a draw plan.
//!
//! This crate contains the pure part of the pipeline:
//! - Grid parsing with divider-marker extraction (`parse`)
//! - The per-column alignment adapter (`matrix::align`)
//! - Divider position correction and stroke selection (`divider`)
//! - Colour-bar ticks and named colour schemes (`colorbar`, `color`)
//! - Evenly spaced tag labels (`labels`)
//! - The plotting-collaborator trait and a recording implementation (`surface`)
//! - The grid plan that sequences surface calls (`render`)

pub mod color;
pub mod colorbar;
pub mod divider;
pub mod labels;
pub mod marker;
pub mod matrix;
pub mod parse;
pub mod render;
pub mod surface;

pub use color::{ColorScheme, Palette, Rgb};
pub use colorbar::{color_scale, ColorScale, ColorbarSetting, Orientation};
pub use divider::{place_dividers, thin_separators, PlaceError, PlacedDivider, Stroke};
pub use labels::{place_tags, tag_positions, FontWeight, HAlign, PlacedText, TextStyle, VAlign};
pub use marker::{DividerMarker, DividerSet, MarkerKind, MarkerTokens};
pub use matrix::{align, AlignedMatrix, Matrix, ShapeError};
pub use parse::{parse, parse_file, ParseError, ParseOptions, ParsedGrid};
pub use render::{emit_tags, plan_grid, GridOptions, GridPlan, LinePlacement};
pub use surface::{DrawCall, PlotSurface, RecordingSurface, SurfaceError};
