//! SimViz CLI — render, inspect and export simulation-result grids.
//!
//! Commands:
//! - `render` — draw a grid from a CSV file or a TOML config, then show or save it
//! - `inspect` — print shape, value range and divider positions of a grid
//! - `export` — write the stripped matrix (CSV) and draw plan (JSON) to a directory

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use simviz_core::{
    parse_file, plan_grid, ColorScheme, ColorbarSetting, GridOptions,
    MarkerTokens, ParseOptions, PlacedDivider, RecordingSurface, TextStyle,
};
use simviz_render::{save_artifacts, GridMap, VizConfig};

#[derive(Parser)]
#[command(
    name = "simviz",
    version,
    about = "SimViz CLI — colour-grid plots of simulation-result matrices"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by commands that build a full visualization config.
#[derive(clap::Args)]
struct GridArgs {
    /// Grid CSV file. Overrides `input` from --config.
    input: Option<PathBuf>,

    /// Path to a TOML visualization config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Colour scheme: Blues, Greens, Greys, Oranges, Purples, Reds, Viridis (suffix _r to reverse).
    #[arg(long)]
    cmap: Option<ColorScheme>,

    /// Colour bar: horizontal, vertical or none.
    #[arg(long)]
    colorbar: Option<ColorbarSetting>,

    /// Cell delimiter.
    #[arg(long)]
    delimiter: Option<char>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a grid and save it, or open it in the system viewer.
    Render {
        #[command(flatten)]
        grid: GridArgs,

        /// Output file (.png, .jpg, .bmp or .svg). Without it the image is shown.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Image width in pixels.
        #[arg(long)]
        width: Option<u32>,

        /// Image height in pixels.
        #[arg(long)]
        height: Option<u32>,

        /// Comma-separated labels spread along the x axis.
        #[arg(long, value_delimiter = ',')]
        h_tags: Vec<String>,

        /// Axes-fraction height of the --h-tags row.
        #[arg(long, default_value_t = -0.075, allow_negative_numbers = true)]
        h_offset: f64,

        /// Comma-separated labels spread along the y axis.
        #[arg(long, value_delimiter = ',')]
        v_tags: Vec<String>,

        /// Axes-fraction x position of the --v-tags row.
        #[arg(long, default_value_t = -0.15, allow_negative_numbers = true)]
        v_offset: f64,
    },
    /// Print shape, value range and divider positions of a grid file.
    Inspect {
        /// Grid CSV file.
        input: PathBuf,

        /// Cell delimiter.
        #[arg(long, default_value_t = ',')]
        delimiter: char,

        /// Token marking a light divider.
        #[arg(long, default_value = "b")]
        light_marker: String,

        /// Token marking a heavy divider.
        #[arg(long, default_value = "w")]
        heavy_marker: String,
    },
    /// Write matrix.csv, plan.json and calls.json for a grid.
    Export {
        #[command(flatten)]
        grid: GridArgs,

        /// Output directory.
        #[arg(long, default_value = "artifacts")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Render {
            grid,
            output,
            width,
            height,
            h_tags,
            h_offset,
            v_tags,
            v_offset,
        } => {
            let mut config = build_config(grid)?;
            if let Some(w) = width {
                config.image.width = w;
            }
            if let Some(h) = height {
                config.image.height = h;
            }
            run_render(
                &config,
                output.as_deref(),
                (h_offset, h_tags.as_slice()),
                (v_offset, v_tags.as_slice()),
            )
        }
        Commands::Inspect {
            input,
            delimiter,
            light_marker,
            heavy_marker,
        } => run_inspect(&input, delimiter, &light_marker, &heavy_marker),
        Commands::Export { grid, output_dir } => run_export(&build_config(grid)?, &output_dir),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to initialise logger")
}

/// Start from --config (if any) and apply command-line overrides.
fn build_config(args: GridArgs) -> Result<VizConfig> {
    let mut config = match (args.config, args.input.clone()) {
        (Some(path), _) => VizConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        (None, Some(input)) => VizConfig::new(input),
        (None, None) => bail!("an INPUT file or --config is required"),
    };

    if let Some(input) = args.input {
        config.input = input;
    }
    if let Some(scheme) = args.cmap {
        config.color_scheme = scheme;
    }
    if let Some(colorbar) = args.colorbar {
        config.colorbar = colorbar;
    }
    if let Some(delimiter) = args.delimiter {
        config.parse.delimiter = delimiter;
    }

    config.validate()?;
    Ok(config)
}

fn run_render(
    config: &VizConfig,
    output: Option<&Path>,
    (h_offset, h_tags): (f64, &[String]),
    (v_offset, v_tags): (f64, &[String]),
) -> Result<()> {
    let mut map = GridMap::open(config)
        .with_context(|| format!("failed to render {}", config.input.display()))?;

    if !h_tags.is_empty() {
        map.set_h_tags(h_offset, h_tags, &TextStyle::default());
    }
    if !v_tags.is_empty() {
        let style = TextStyle {
            rotation: 90.0,
            ..TextStyle::default()
        };
        map.set_v_tags(v_offset, v_tags, &style);
    }

    match output {
        Some(path) => {
            map.save(path)?;
            println!("Saved {}", path.display());
        }
        None => map.show()?,
    }
    Ok(())
}

fn run_inspect(input: &Path, delimiter: char, light: &str, heavy: &str) -> Result<()> {
    if !delimiter.is_ascii() {
        bail!("delimiter '{delimiter}' must be a single ASCII character");
    }
    let opts = ParseOptions {
        delimiter: delimiter as u8,
        markers: MarkerTokens::new(light, heavy),
    };
    let parsed = parse_file(input, &opts)?;
    let plan = plan_grid(
        &parsed,
        &GridOptions {
            colorbar: ColorbarSetting::None,
            ..GridOptions::default()
        },
    )?;

    let (src_rows, src_cols) = parsed.source_shape;
    let m = &parsed.matrix;
    println!("File:   {}", input.display());
    println!("Grid:   {src_rows} x {src_cols} (with divider lines)");
    println!("Matrix: {} x {}", m.rows(), m.cols());
    println!("Range:  {:.3} .. {:.3}", m.min(), m.max());
    println!();
    print_dividers("Row", &plan.row_dividers);
    print_dividers("Column", &plan.col_dividers);
    Ok(())
}

/// Original grid index next to the corrected position in the stripped matrix.
fn print_dividers(axis: &str, placed: &[PlacedDivider]) {
    if placed.is_empty() {
        println!("{axis} dividers: none");
        return;
    }
    println!("{axis} dividers:");
    println!("  {:<10} {:<10} {:<8}", "Original", "Position", "Kind");
    println!("  {}", "-".repeat(30));
    for d in placed {
        let kind = format!("{:?}", d.kind);
        println!("  {:<10} {:<10} {:<8}", d.original, d.position, kind);
    }
}

fn run_export(config: &VizConfig, output_dir: &Path) -> Result<()> {
    let map = GridMap::with_surface(config, RecordingSurface::new())
        .with_context(|| format!("failed to plan {}", config.input.display()))?;
    let written = save_artifacts(map.matrix(), map.plan(), &map.surface().calls, output_dir)?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
