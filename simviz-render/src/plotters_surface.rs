//! `PlotSurface` implementation on top of `plotters`.
//!
//! Calls are buffered and only rasterized when the figure is exported or
//! shown, because the frame layout depends on calls that may arrive late
//! (axis limits, colour bar). The output format follows the file extension:
//! `png`, `jpg`/`jpeg`, `bmp` go through the bitmap backend, `svg` through the
//! SVG backend.
//!
//! Text needs a TrueType font. The regular and bold sans-serif faces are
//! looked up once from `SIMVIZ_FONT` / `SIMVIZ_BOLD_FONT` and a list of common
//! system locations; without one, text is skipped with a warning and the rest
//! of the figure still renders.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{register_font, FontDesc, FontFamily, FontStyle, FontTransform};
use plotters::style::TextStyle as FontSpec;

use simviz_core::labels::TextStyle;
use simviz_core::{
    AlignedMatrix, ColorScale, ColorScheme, DrawCall, FontWeight, HAlign, Orientation,
    PlotSurface, RecordingSurface, Rgb, Stroke, SurfaceError, VAlign,
};

use crate::viewer::open_in_viewer;

/// Pixels per inch used to convert point sizes (line weights, fonts).
const DPI: f64 = 100.0;

const REGULAR_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BOLD_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Register sans-serif faces with plotters once per process.
fn fonts_available() -> bool {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    *REGISTERED.get_or_init(|| {
        let Some(regular) = load_font("SIMVIZ_FONT", REGULAR_FONTS) else {
            log::warn!("no TrueType font found; text labels will be skipped (set SIMVIZ_FONT)");
            return false;
        };
        let bold = load_font("SIMVIZ_BOLD_FONT", BOLD_FONTS).unwrap_or(regular);
        let family = FontFamily::SansSerif.as_str();
        match (
            register_font(family, FontStyle::Normal, regular),
            register_font(family, FontStyle::Bold, bold),
        ) {
            (Ok(()), Ok(())) => true,
            _ => {
                log::warn!("font file could not be parsed; text labels will be skipped");
                false
            }
        }
    })
}

fn load_font(env_var: &str, candidates: &[&str]) -> Option<&'static [u8]> {
    let from_env = std::env::var_os(env_var).map(PathBuf::from);
    from_env
        .into_iter()
        .chain(candidates.iter().map(PathBuf::from))
        .find_map(|path| {
            let bytes = std::fs::read(&path).ok()?;
            log::debug!("using font {}", path.display());
            // Registered fonts live for the rest of the process.
            Some(&*Box::leak(bytes.into_boxed_slice()))
        })
}

fn backend_error<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> SurfaceError {
    SurfaceError::Backend(err.to_string())
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn stroke_px(weight: f64) -> u32 {
    ((weight * DPI / 72.0).round() as u32).max(1)
}

/// A plot surface that renders through plotters.
#[derive(Debug, Clone)]
pub struct PlottersSurface {
    recorder: RecordingSurface,
    size: (u32, u32),
}

impl PlottersSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            recorder: RecordingSurface::new(),
            size: (width, height),
        }
    }

    /// The buffered calls, in order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.recorder.calls
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    fn render_to(&self, path: &Path) -> Result<(), SurfaceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let figure = Figure::from_calls(self.calls(), self.size);
        match ext.as_str() {
            "svg" => {
                let root = SVGBackend::new(path, self.size).into_drawing_area();
                figure.draw(&root)
            }
            "png" | "jpg" | "jpeg" | "bmp" => {
                let root = BitMapBackend::new(path, self.size).into_drawing_area();
                figure.draw(&root)
            }
            other => Err(SurfaceError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl PlotSurface for PlottersSurface {
    fn draw_colored_grid(&mut self, matrix: &AlignedMatrix, scheme: ColorScheme) {
        self.recorder.draw_colored_grid(matrix, scheme);
    }

    fn draw_colorbar(&mut self, scale: &ColorScale, scheme: ColorScheme, orientation: Orientation) {
        self.recorder.draw_colorbar(scale, scheme, orientation);
    }

    fn draw_line(&mut self, orientation: Orientation, position: f64, stroke: Stroke) {
        self.recorder.draw_line(orientation, position, stroke);
    }

    fn hide_axis_ticks(&mut self) {
        self.recorder.hide_axis_ticks();
    }

    fn set_axis_limits(&mut self, max_row: usize, max_col: usize) {
        self.recorder.set_axis_limits(max_row, max_col);
    }

    fn place_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        self.recorder.place_text(x, y, text, style);
    }

    /// Renders to a fresh PNG in the temp directory and hands it to the
    /// viewer. The file is left in place for the viewer to read.
    fn show(&mut self) -> Result<(), SurfaceError> {
        let path = preview_path()?;
        self.render_to(&path)?;
        open_in_viewer(&path).map_err(|e| SurfaceError::Display(e.to_string()))?;
        log::info!("opened {} in the system viewer", path.display());
        Ok(())
    }

    fn export(&mut self, path: &Path) -> Result<(), SurfaceError> {
        self.render_to(path)?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

/// Reserve a uniquely named PNG in the temp directory that outlives this call.
fn preview_path() -> Result<PathBuf, SurfaceError> {
    let (file, path) = tempfile::Builder::new()
        .prefix("simviz-")
        .suffix(".png")
        .tempfile()?
        .keep()
        .map_err(|e| SurfaceError::Io(e.error))?;
    drop(file);
    Ok(path)
}

// ─── Layout ─────────────────────────────────────────────────────────

/// Pixel rectangle of the plot area plus its data extent.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    rows: f64,
    cols: f64,
}

impl Frame {
    /// Data coordinates (bottom-left origin, one unit per cell) to pixels.
    fn data(&self, x: f64, y: f64) -> (i32, i32) {
        self.axes(x / self.cols, y / self.rows)
    }

    /// Axes-fraction coordinates to pixels.
    fn axes(&self, fx: f64, fy: f64) -> (i32, i32) {
        (
            (self.left + fx * self.width).round() as i32,
            (self.top + self.height - fy * self.height).round() as i32,
        )
    }
}

/// Everything a single rasterization pass needs, gathered from the calls.
struct Figure<'a> {
    calls: &'a [DrawCall],
    frame: Frame,
    colorbar_box: Option<(Orientation, Frame)>,
    ticks_hidden: bool,
}

impl<'a> Figure<'a> {
    fn from_calls(calls: &'a [DrawCall], (w, h): (u32, u32)) -> Self {
        let mut limits = None;
        let mut grid_shape = None;
        let mut colorbar = None;
        let mut ticks_hidden = false;
        for call in calls {
            match call {
                DrawCall::AxisLimits { max_row, max_col } => limits = Some((*max_row, *max_col)),
                DrawCall::ColoredGrid { matrix, .. } => grid_shape = Some((matrix.rows(), matrix.cols())),
                DrawCall::Colorbar { orientation, .. } => colorbar = Some(*orientation),
                DrawCall::HideAxisTicks => ticks_hidden = true,
                _ => {}
            }
        }
        let (rows, cols) = limits.or(grid_shape).unwrap_or((1, 1));

        let (w, h) = (w as f64, h as f64);
        let mut left = 0.125 * w;
        let mut right = 0.1 * w;
        let top = 0.1 * h;
        let mut bottom = 0.1 * h;
        match colorbar {
            Some(Orientation::Horizontal) => bottom += 0.2 * h,
            Some(Orientation::Vertical) => right += 0.15 * w,
            None => {}
        }
        if !ticks_hidden {
            left += 0.03 * w;
            bottom += 0.03 * h;
        }

        let frame = Frame {
            left,
            top,
            width: (w - left - right).max(1.0),
            height: (h - top - bottom).max(1.0),
            rows: rows.max(1) as f64,
            cols: cols.max(1) as f64,
        };

        let colorbar_box = colorbar.map(|orientation| {
            let bar = match orientation {
                Orientation::Horizontal => Frame {
                    left: frame.left,
                    top: frame.top + frame.height + 0.1 * h,
                    width: frame.width,
                    height: 0.04 * h,
                    ..frame
                },
                Orientation::Vertical => Frame {
                    left: frame.left + frame.width + 0.04 * w,
                    top: frame.top,
                    width: 0.03 * w,
                    height: frame.height,
                    ..frame
                },
            };
            (orientation, bar)
        });

        Self {
            calls,
            frame,
            colorbar_box,
            ticks_hidden,
        }
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), SurfaceError> {
        let fonts = fonts_available();
        root.fill(&WHITE).map_err(backend_error)?;

        for call in self.calls {
            match call {
                DrawCall::ColoredGrid { matrix, scheme } => self.draw_grid(root, matrix, *scheme)?,
                DrawCall::Colorbar { scale, scheme, .. } => {
                    if let Some((orientation, bar)) = self.colorbar_box {
                        draw_colorbar(root, &bar, orientation, scale, *scheme, fonts)?;
                    }
                }
                DrawCall::Line {
                    orientation,
                    position,
                    stroke,
                } => self.draw_line(root, *orientation, *position, *stroke)?,
                DrawCall::Text { x, y, text, style } => {
                    if fonts {
                        draw_text(root, self.frame.axes(*x, *y), text, style)?;
                    }
                }
                DrawCall::HideAxisTicks | DrawCall::AxisLimits { .. } => {}
            }
        }

        if !self.ticks_hidden {
            self.draw_axis_ticks(root, fonts)?;
        }

        let f = &self.frame;
        root.draw(&Rectangle::new(
            [f.axes(0.0, 1.0), f.axes(1.0, 0.0)],
            BLACK.stroke_width(1),
        ))
        .map_err(backend_error)?;

        root.present().map_err(backend_error)
    }

    fn draw_grid<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        matrix: &AlignedMatrix,
        scheme: ColorScheme,
    ) -> Result<(), SurfaceError> {
        let m = matrix.as_matrix();
        let (min, max) = (m.min(), m.max());
        for r in 0..m.rows() {
            for (c, &value) in m.row(r).iter().enumerate() {
                let color = rgb(scheme.map(value, min, max));
                let (x, y) = (c as f64, r as f64);
                root.draw(&Rectangle::new(
                    [self.frame.data(x, y + 1.0), self.frame.data(x + 1.0, y)],
                    color.filled(),
                ))
                .map_err(backend_error)?;
            }
        }
        Ok(())
    }

    fn draw_line<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        orientation: Orientation,
        position: f64,
        stroke: Stroke,
    ) -> Result<(), SurfaceError> {
        let f = &self.frame;
        let (start, end) = match orientation {
            Orientation::Horizontal => (f.data(0.0, position), f.data(f.cols, position)),
            Orientation::Vertical => (f.data(position, 0.0), f.data(position, f.rows)),
        };
        let style = rgb(stroke.color).stroke_width(stroke_px(stroke.weight));
        root.draw(&PathElement::new(vec![start, end], style))
            .map_err(backend_error)
    }

    fn draw_axis_ticks<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        fonts: bool,
    ) -> Result<(), SurfaceError> {
        let f = &self.frame;
        let label = LabelPlacement::new(10.0);
        for i in 0..=f.cols as usize {
            let (x, y) = f.data(i as f64, 0.0);
            root.draw(&PathElement::new(vec![(x, y), (x, y + 4)], BLACK.stroke_width(1)))
                .map_err(backend_error)?;
            if fonts {
                draw_text(root, (x, y + 6), &i.to_string(), &label.below())?;
            }
        }
        for i in 0..=f.rows as usize {
            let (x, y) = f.data(0.0, i as f64);
            root.draw(&PathElement::new(vec![(x - 4, y), (x, y)], BLACK.stroke_width(1)))
                .map_err(backend_error)?;
            if fonts {
                draw_text(root, (x - 6, y), &i.to_string(), &label.left_of())?;
            }
        }
        Ok(())
    }
}

/// Preset text styles for tick labels.
struct LabelPlacement {
    font_size: f64,
}

impl LabelPlacement {
    fn new(font_size: f64) -> Self {
        Self { font_size }
    }

    fn below(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            vertical_alignment: VAlign::Top,
            ..TextStyle::default()
        }
    }

    fn left_of(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            horizontal_alignment: HAlign::Right,
            ..TextStyle::default()
        }
    }

    fn right_of(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            horizontal_alignment: HAlign::Left,
            ..TextStyle::default()
        }
    }
}

fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bar: &Frame,
    orientation: Orientation,
    scale: &ColorScale,
    scheme: ColorScheme,
    fonts: bool,
) -> Result<(), SurfaceError> {
    const STEPS: usize = 128;
    for i in 0..STEPS {
        let lo = i as f64 / STEPS as f64;
        let hi = (i + 1) as f64 / STEPS as f64;
        let color = rgb(scheme.sample((lo + hi) / 2.0));
        let corners = match orientation {
            Orientation::Horizontal => [bar.axes(lo, 1.0), bar.axes(hi, 0.0)],
            Orientation::Vertical => [bar.axes(0.0, hi), bar.axes(1.0, lo)],
        };
        root.draw(&Rectangle::new(corners, color.filled()))
            .map_err(backend_error)?;
    }
    root.draw(&Rectangle::new(
        [bar.axes(0.0, 1.0), bar.axes(1.0, 0.0)],
        BLACK.stroke_width(1),
    ))
    .map_err(backend_error)?;

    let span = scale.max - scale.min;
    let label = LabelPlacement::new(10.0);
    for (tick, text) in scale.ticks.iter().zip(scale.tick_labels()) {
        let frac = if span > 0.0 { (tick - scale.min) / span } else { 0.5 };
        let (mark, anchor, style) = match orientation {
            Orientation::Horizontal => {
                let (x, y) = bar.axes(frac, 0.0);
                ([(x, y), (x, y + 4)], (x, y + 6), label.below())
            }
            Orientation::Vertical => {
                let (x, y) = bar.axes(1.0, frac);
                ([(x, y), (x + 4, y)], (x + 6, y), label.right_of())
            }
        };
        root.draw(&PathElement::new(mark.to_vec(), BLACK.stroke_width(1)))
            .map_err(backend_error)?;
        if fonts {
            draw_text(root, anchor, &text, &style)?;
        }
    }
    Ok(())
}

fn draw_text<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    at: (i32, i32),
    text: &str,
    style: &TextStyle,
) -> Result<(), SurfaceError> {
    let weight = match style.weight {
        FontWeight::Normal => FontStyle::Normal,
        FontWeight::Bold => FontStyle::Bold,
    };
    let hpos = match style.horizontal_alignment {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
        HAlign::Right => HPos::Right,
    };
    let vpos = match style.vertical_alignment {
        VAlign::Top => VPos::Top,
        VAlign::Center => VPos::Center,
        VAlign::Bottom => VPos::Bottom,
    };
    let font = FontDesc::new(FontFamily::SansSerif, style.font_size * DPI / 72.0, weight);
    let spec = FontSpec::from(font)
        .color(&BLACK)
        .pos(Pos::new(hpos, vpos))
        .transform(rotation_transform(style.rotation));
    root.draw(&Text::new(text.to_string(), at, spec))
        .map_err(backend_error)
}

/// Nearest quarter turn; plotters only rotates text in 90° steps.
/// `rotation` is counter-clockwise, plotters' transforms are clockwise.
fn rotation_transform(rotation: f64) -> FontTransform {
    let quarter = ((rotation / 90.0).round() as i64).rem_euclid(4);
    match quarter {
        1 => FontTransform::Rotate270,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate90,
        _ => FontTransform::None,
    }
}
