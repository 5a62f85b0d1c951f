//! Artifact export — the stripped matrix as CSV and the draw-call plan as JSON.
//!
//! Both are plain-text renderings of what the session computed, for checking a
//! figure against another tool or diffing two runs without comparing images.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use simviz_core::{DrawCall, GridPlan, Matrix};

// ─── CSV export ─────────────────────────────────────────────────────

/// Write the matrix row by row, in file order, without a header.
pub fn export_matrix_csv(matrix: &Matrix) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for r in 0..matrix.rows() {
        wtr.write_record(matrix.row(r).iter().map(|v| v.to_string()))?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

/// The recorded surface calls as pretty JSON.
pub fn export_calls_json(calls: &[DrawCall]) -> Result<String> {
    serde_json::to_string_pretty(calls).context("failed to serialize draw calls to JSON")
}

#[derive(Serialize)]
struct PlanSummary<'a> {
    rows: usize,
    cols: usize,
    min: f64,
    max: f64,
    #[serde(flatten)]
    plan: &'a GridPlan,
}

/// The grid plan (aligned matrix, colour scale, placed dividers) as pretty JSON.
pub fn export_plan_json(plan: &GridPlan) -> Result<String> {
    let summary = PlanSummary {
        rows: plan.aligned.rows(),
        cols: plan.aligned.cols(),
        min: plan.aligned.min(),
        max: plan.aligned.max(),
        plan,
    };
    serde_json::to_string_pretty(&summary).context("failed to serialize grid plan to JSON")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `matrix.csv`, `plan.json` and `calls.json` into `output_dir`,
/// creating it if needed. Returns the written paths.
pub fn save_artifacts(
    matrix: &Matrix,
    plan: &GridPlan,
    calls: &[DrawCall],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create artifact dir: {}", output_dir.display()))?;

    let artifacts = [
        ("matrix.csv", export_matrix_csv(matrix)?),
        ("plan.json", export_plan_json(plan)?),
        ("calls.json", export_calls_json(calls)?),
    ];

    let mut written = Vec::with_capacity(artifacts.len());
    for (name, content) in artifacts {
        let path = output_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simviz_core::{parse, plan_grid, GridOptions, ParseOptions, RecordingSurface};

    #[test]
    fn matrix_csv_has_one_line_per_row() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.5], vec![-3.0, 0.125]]).unwrap();
        assert_eq!(export_matrix_csv(&m).unwrap(), "1,2.5\n-3,0.125\n");
    }

    #[test]
    fn exported_csv_parses_back() {
        let parsed = parse("1,b,2\n3,0,4\n", &ParseOptions::default()).unwrap();
        let csv = export_matrix_csv(&parsed.matrix).unwrap();
        let again = parse(&csv, &ParseOptions::default()).unwrap();
        assert_eq!(again.matrix, parsed.matrix);
    }

    #[test]
    fn calls_json_is_tagged() {
        let parsed = parse("1,2\n3,4\n", &ParseOptions::default()).unwrap();
        let plan = plan_grid(&parsed, &GridOptions::default()).unwrap();
        let mut surface = RecordingSurface::new();
        plan.emit(&mut surface);

        let json = export_calls_json(&surface.calls).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["call"], "colored_grid");
        assert_eq!(value.as_array().unwrap().last().unwrap()["call"], "axis_limits");
    }

    #[test]
    fn plan_json_carries_shape_and_range() {
        let parsed = parse("1,2\nw,w\n3,9\n", &ParseOptions::default()).unwrap();
        let plan = plan_grid(&parsed, &GridOptions::default()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&export_plan_json(&plan).unwrap()).unwrap();
        assert_eq!(value["rows"], 2);
        assert_eq!(value["max"], 9.0);
        assert_eq!(value["row_dividers"][0]["position"], 1);
    }

    #[test]
    fn artifacts_land_in_output_dir() {
        let parsed = parse("1,2\n3,4\n", &ParseOptions::default()).unwrap();
        let plan = plan_grid(&parsed, &GridOptions::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run");

        let written = save_artifacts(&parsed.matrix, &plan, &[], &out).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.exists()));
        assert_eq!(std::fs::read_to_string(out.join("calls.json")).unwrap(), "[]");
    }
}
