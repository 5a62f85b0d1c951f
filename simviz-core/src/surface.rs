//! The 2-D plotting collaborator.
//!
//! The core never rasterizes anything itself: it emits a sequence of calls on
//! a [`PlotSurface`]. Data coordinates put `(0, 0)` at the bottom-left corner
//! of the grid with one unit per cell; text uses axes-fraction coordinates
//! where `(0, 0)` and `(1, 1)` are the bottom-left and top-right of the grid.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::color::ColorScheme;
use crate::colorbar::{ColorScale, Orientation};
use crate::divider::Stroke;
use crate::labels::TextStyle;
use crate::matrix::AlignedMatrix;

/// Errors raised when a surface presents its output.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("unsupported output format '{0}' (use png, jpg, bmp or svg)")]
    UnsupportedFormat(String),

    #[error("drawing backend error: {0}")]
    Backend(String),

    #[error("cannot display output: {0}")]
    Display(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Drawing primitives the grid renderer relies on.
pub trait PlotSurface {
    /// Paint one colour-mapped cell per matrix entry; row 0 is the bottom row.
    fn draw_colored_grid(&mut self, matrix: &AlignedMatrix, scheme: ColorScheme);

    fn draw_colorbar(&mut self, scale: &ColorScale, scheme: ColorScheme, orientation: Orientation);

    /// A full-span line: `Horizontal` at y = `position`, `Vertical` at x = `position`.
    fn draw_line(&mut self, orientation: Orientation, position: f64, stroke: Stroke);

    fn hide_axis_ticks(&mut self);

    fn set_axis_limits(&mut self, max_row: usize, max_col: usize);

    fn place_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle);

    fn show(&mut self) -> Result<(), SurfaceError>;

    fn export(&mut self, path: &Path) -> Result<(), SurfaceError>;
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum DrawCall {
    ColoredGrid {
        matrix: AlignedMatrix,
        scheme: ColorScheme,
    },
    Colorbar {
        scale: ColorScale,
        scheme: ColorScheme,
        orientation: Orientation,
    },
    Line {
        orientation: Orientation,
        position: f64,
        stroke: Stroke,
    },
    HideAxisTicks,
    AxisLimits {
        max_row: usize,
        max_col: usize,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
}

/// A surface that only records calls. Used as a test double and as the draw
/// buffer of real backends.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    pub exports: Vec<PathBuf>,
    pub shows: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded lines in call order.
    pub fn lines(&self) -> Vec<(Orientation, f64, Stroke)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Line {
                    orientation,
                    position,
                    stroke,
                } => Some((*orientation, *position, *stroke)),
                _ => None,
            })
            .collect()
    }

    /// Recorded colour bars.
    pub fn colorbars(&self) -> Vec<&ColorScale> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Colorbar { scale, .. } => Some(scale),
                _ => None,
            })
            .collect()
    }

    /// Recorded text labels.
    pub fn texts(&self) -> Vec<(f64, f64, &str)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
                _ => None,
            })
            .collect()
    }
}

impl PlotSurface for RecordingSurface {
    fn draw_colored_grid(&mut self, matrix: &AlignedMatrix, scheme: ColorScheme) {
        self.calls.push(DrawCall::ColoredGrid {
            matrix: matrix.clone(),
            scheme,
        });
    }

    fn draw_colorbar(&mut self, scale: &ColorScale, scheme: ColorScheme, orientation: Orientation) {
        self.calls.push(DrawCall::Colorbar {
            scale: scale.clone(),
            scheme,
            orientation,
        });
    }

    fn draw_line(&mut self, orientation: Orientation, position: f64, stroke: Stroke) {
        self.calls.push(DrawCall::Line {
            orientation,
            position,
            stroke,
        });
    }

    fn hide_axis_ticks(&mut self) {
        self.calls.push(DrawCall::HideAxisTicks);
    }

    fn set_axis_limits(&mut self, max_row: usize, max_col: usize) {
        self.calls.push(DrawCall::AxisLimits { max_row, max_col });
    }

    fn place_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        self.calls.push(DrawCall::Text {
            x,
            y,
            text: text.to_string(),
            style: style.clone(),
        });
    }

    fn show(&mut self) -> Result<(), SurfaceError> {
        self.shows += 1;
        Ok(())
    }

    fn export(&mut self, path: &Path) -> Result<(), SurfaceError> {
        self.exports.push(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{align, Matrix};

    #[test]
    fn records_calls_in_order() {
        let mut surface = RecordingSurface::new();
        let m = align(&Matrix::from_rows(vec![vec![1.0]]).unwrap());
        surface.draw_colored_grid(&m, ColorScheme::default());
        surface.draw_line(Orientation::Vertical, 1.0, Stroke::THIN);
        surface.hide_axis_ticks();
        surface.place_text(0.5, -0.1, "tag", &TextStyle::default());

        assert_eq!(surface.calls.len(), 4);
        assert!(matches!(surface.calls[0], DrawCall::ColoredGrid { .. }));
        assert_eq!(surface.lines(), vec![(Orientation::Vertical, 1.0, Stroke::THIN)]);
        assert_eq!(surface.texts(), vec![(0.5, -0.1, "tag")]);
    }

    #[test]
    fn show_and_export_are_counted() {
        let mut surface = RecordingSurface::new();
        surface.show().unwrap();
        surface.export(Path::new("out.png")).unwrap();
        assert_eq!(surface.shows, 1);
        assert_eq!(surface.exports, vec![PathBuf::from("out.png")]);
    }
}
