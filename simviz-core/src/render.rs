//! Grid rendering plan.
//!
//! `plan_grid` does every computation that can fail (divider placement) and
//! every computation that depends on the data (alignment, colour scale) up
//! front, so `GridPlan::emit` is a straight sequence of surface calls and a
//! bad input never produces a half-drawn figure.

use serde::Serialize;

use crate::color::ColorScheme;
use crate::colorbar::{color_scale, ColorScale, ColorbarSetting, Orientation};
use crate::divider::{place_dividers, thin_separators, PlaceError, PlacedDivider, Stroke};
use crate::labels::PlacedText;
use crate::matrix::{align, AlignedMatrix};
use crate::parse::ParsedGrid;
use crate::surface::PlotSurface;

/// Rendering options for the colour grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridOptions {
    pub scheme: ColorScheme,
    pub colorbar: ColorbarSetting,
}

/// A line in surface data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePlacement {
    pub orientation: Orientation,
    pub position: f64,
    pub stroke: Stroke,
}

/// Everything needed to draw one grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPlan {
    pub aligned: AlignedMatrix,
    pub scheme: ColorScheme,
    pub colorbar: Option<(ColorScale, Orientation)>,
    pub row_dividers: Vec<PlacedDivider>,
    pub col_dividers: Vec<PlacedDivider>,
}

/// Align the matrix, place the dividers and compute the colour scale.
pub fn plan_grid(parsed: &ParsedGrid, opts: &GridOptions) -> Result<GridPlan, PlaceError> {
    let (rows, cols) = parsed.matrix.shape();
    let row_dividers = place_dividers(&parsed.dividers.rows, rows)?;
    let col_dividers = place_dividers(&parsed.dividers.cols, cols)?;

    let aligned = align(&parsed.matrix);
    let colorbar = opts
        .colorbar
        .orientation()
        .map(|orientation| (color_scale(&aligned), orientation));

    Ok(GridPlan {
        aligned,
        scheme: opts.scheme,
        colorbar,
        row_dividers,
        col_dividers,
    })
}

impl GridPlan {
    /// All grid lines in drawing order: thin vertical, thin horizontal,
    /// column dividers, row dividers.
    ///
    /// Row divider positions count data rows from the top; the surface is
    /// bottom-origin, so they are drawn at `rows - position`.
    pub fn lines(&self) -> Vec<LinePlacement> {
        let rows = self.aligned.rows();
        let cols = self.aligned.cols();
        let thin = |orientation, i: usize| LinePlacement {
            orientation,
            position: i as f64,
            stroke: Stroke::THIN,
        };

        let mut lines: Vec<LinePlacement> = thin_separators(cols)
            .map(|i| thin(Orientation::Vertical, i))
            .chain(thin_separators(rows).map(|i| thin(Orientation::Horizontal, i)))
            .collect();

        lines.extend(self.col_dividers.iter().map(|d| LinePlacement {
            orientation: Orientation::Vertical,
            position: d.position as f64,
            stroke: d.stroke,
        }));
        lines.extend(self.row_dividers.iter().map(|d| LinePlacement {
            orientation: Orientation::Horizontal,
            position: (rows - d.position) as f64,
            stroke: d.stroke,
        }));
        lines
    }

    /// Issue the plan's calls on a surface.
    pub fn emit<S: PlotSurface + ?Sized>(&self, surface: &mut S) {
        surface.draw_colored_grid(&self.aligned, self.scheme);
        if let Some((scale, orientation)) = &self.colorbar {
            surface.draw_colorbar(scale, self.scheme, *orientation);
        }
        for line in self.lines() {
            surface.draw_line(line.orientation, line.position, line.stroke);
        }
        surface.hide_axis_ticks();
        surface.set_axis_limits(self.aligned.rows(), self.aligned.cols());
    }
}

/// Issue text calls for a row of placed tags.
pub fn emit_tags<S: PlotSurface + ?Sized>(surface: &mut S, tags: &[PlacedText]) {
    for tag in tags {
        surface.place_text(tag.x, tag.y, &tag.text, &tag.style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{DividerMarker, DividerSet, MarkerKind};
    use crate::matrix::Matrix;
    use crate::surface::{DrawCall, RecordingSurface};

    fn parsed(rows: Vec<Vec<f64>>, dividers: DividerSet) -> ParsedGrid {
        let matrix = Matrix::from_rows(rows).unwrap();
        let shape = matrix.shape();
        ParsedGrid {
            matrix,
            dividers,
            source_shape: shape,
        }
    }

    #[test]
    fn emits_in_drawing_order() {
        let grid = parsed(vec![vec![1.0, 2.0], vec![3.0, 4.0]], DividerSet::default());
        let plan = plan_grid(&grid, &GridOptions::default()).unwrap();
        let mut surface = RecordingSurface::new();
        plan.emit(&mut surface);

        assert!(matches!(surface.calls[0], DrawCall::ColoredGrid { .. }));
        assert!(matches!(surface.calls[1], DrawCall::Colorbar { .. }));
        assert!(matches!(surface.calls[surface.calls.len() - 2], DrawCall::HideAxisTicks));
        assert_eq!(
            surface.calls.last(),
            Some(&DrawCall::AxisLimits { max_row: 2, max_col: 2 })
        );
    }

    #[test]
    fn row_dividers_flip_to_bottom_origin() {
        // 4 data rows; a divider after the first data row sits 3 units up.
        let grid = parsed(
            vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]],
            DividerSet {
                rows: vec![DividerMarker::new(1, MarkerKind::Heavy)],
                cols: vec![],
            },
        );
        let plan = plan_grid(&grid, &GridOptions::default()).unwrap();
        let dividers: Vec<_> = plan
            .lines()
            .into_iter()
            .filter(|l| l.stroke != Stroke::THIN)
            .collect();
        assert_eq!(plan.row_dividers[0].position, 1);
        assert_eq!(dividers.len(), 1);
        assert_eq!(dividers[0].orientation, Orientation::Horizontal);
        assert_eq!(dividers[0].position, 3.0);
        assert_eq!(dividers[0].stroke, Stroke::HEAVY);
    }

    #[test]
    fn thin_kind_fails_before_any_call() {
        let grid = parsed(
            vec![vec![1.0, 2.0]],
            DividerSet {
                rows: vec![],
                cols: vec![DividerMarker::new(1, MarkerKind::ThinImplicit)],
            },
        );
        assert!(plan_grid(&grid, &GridOptions::default()).is_err());
    }

    #[test]
    fn thin_separators_cover_interior_offsets() {
        let grid = parsed(vec![vec![0.0; 3]; 2], DividerSet::default());
        let plan = plan_grid(&grid, &GridOptions::default()).unwrap();
        let thin: Vec<_> = plan
            .lines()
            .into_iter()
            .map(|l| (l.orientation, l.position))
            .collect();
        assert_eq!(
            thin,
            vec![
                (Orientation::Vertical, 1.0),
                (Orientation::Vertical, 2.0),
                (Orientation::Horizontal, 1.0),
            ]
        );
    }
}
