//! `GridMap` — one visualization session.
//!
//! Opening a session runs the whole pipeline against its surface:
//! parse → align → plan → emit grid calls → emit configured tag rows.
//! Further tag rows can be added afterwards, then the figure is shown or
//! saved. Any failure before emission leaves the surface untouched.

use std::path::Path;

use thiserror::Error;

use simviz_core::{
    emit_tags, parse_file, place_tags, plan_grid, GridOptions, GridPlan, Matrix, Orientation,
    ParseError, ParsedGrid, PlaceError, PlotSurface, SurfaceError, TextStyle,
};

use crate::config::{ConfigError, VizConfig};
use crate::plotters_surface::PlottersSurface;

/// Any failure while building, showing or saving a visualization.
#[derive(Debug, Error)]
pub enum VizError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("divider placement failed: {0}")]
    Place(#[from] PlaceError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// A parsed grid bound to the surface it was drawn on.
#[derive(Debug)]
pub struct GridMap<S: PlotSurface = PlottersSurface> {
    parsed: ParsedGrid,
    plan: GridPlan,
    surface: S,
}

impl GridMap<PlottersSurface> {
    /// Build a session rendering through plotters at the configured size.
    pub fn open(config: &VizConfig) -> Result<Self, VizError> {
        let surface = PlottersSurface::new(config.image.width, config.image.height);
        Self::with_surface(config, surface)
    }
}

impl<S: PlotSurface> GridMap<S> {
    /// Build a session on a caller-provided surface.
    pub fn with_surface(config: &VizConfig, surface: S) -> Result<Self, VizError> {
        config.validate()?;
        let parsed = parse_file(&config.input, &config.parse_options())?;
        let mut map = Self::from_parsed(parsed, &config.grid_options(), surface)?;
        for row in &config.tags {
            let style = row.style();
            match row.axis {
                Orientation::Horizontal => map.set_h_tags(row.offset, &row.labels, &style),
                Orientation::Vertical => map.set_v_tags(row.offset, &row.labels, &style),
            }
        }
        Ok(map)
    }

    /// Plan an already-parsed grid and draw it on `surface`.
    pub fn from_parsed(
        parsed: ParsedGrid,
        opts: &GridOptions,
        mut surface: S,
    ) -> Result<Self, VizError> {
        let plan = plan_grid(&parsed, opts)?;
        plan.emit(&mut surface);
        log::debug!(
            "grid drawn: {}x{} cells, {} row / {} column dividers",
            plan.aligned.rows(),
            plan.aligned.cols(),
            plan.row_dividers.len(),
            plan.col_dividers.len()
        );
        Ok(Self {
            parsed,
            plan,
            surface,
        })
    }

    /// The stripped matrix in file order (not column-reversed).
    pub fn matrix(&self) -> &Matrix {
        &self.parsed.matrix
    }

    pub fn parsed(&self) -> &ParsedGrid {
        &self.parsed
    }

    pub fn plan(&self) -> &GridPlan {
        &self.plan
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Tags spread along the x axis at axes-fraction height `y`.
    pub fn set_h_tags<T: AsRef<str>>(&mut self, y: f64, tags: &[T], style: &TextStyle) {
        let placed = place_tags(Orientation::Horizontal, y, tags, style);
        emit_tags(&mut self.surface, &placed);
    }

    /// Tags spread along the y axis at axes-fraction position `x`.
    pub fn set_v_tags<T: AsRef<str>>(&mut self, x: f64, tags: &[T], style: &TextStyle) {
        let placed = place_tags(Orientation::Vertical, x, tags, style);
        emit_tags(&mut self.surface, &placed);
    }

    pub fn show(&mut self) -> Result<(), VizError> {
        self.surface.show()?;
        Ok(())
    }

    pub fn save(&mut self, path: &Path) -> Result<(), VizError> {
        self.surface.export(path)?;
        Ok(())
    }
}
