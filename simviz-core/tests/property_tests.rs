//! Property tests for parser, aligner, divider placement and tag layout.
//!
//! Uses proptest to verify:
//! 1. Marker-free grids parse to exactly their numeric values
//! 2. Stripping removes exactly the flagged rows and columns
//! 3. Alignment is an involution
//! 4. Divider positions shift by the number of earlier dividers
//! 5. Tag positions are cell centres inside (0, 1)

use proptest::prelude::*;
use simviz_core::{
    align, parse, place_dividers, tag_positions, DividerMarker, MarkerKind, Matrix, ParseOptions,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_value() -> impl Strategy<Value = f64> {
    (-1.0e6..1.0e6_f64).prop_map(|v| (v * 1000.0).round() / 1000.0)
}

fn arb_matrix() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..8, 1usize..8).prop_flat_map(|(n, k)| {
        prop::collection::vec(prop::collection::vec(arb_value(), k), n)
    })
}

fn arb_kind() -> impl Strategy<Value = MarkerKind> {
    prop_oneof![Just(MarkerKind::Light), Just(MarkerKind::Heavy)]
}

/// Flags for `len` lines where the first and last are never dividers.
fn arb_interior_flags(len: usize) -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), len).prop_map(move |mut flags| {
        flags[0] = false;
        flags[len - 1] = false;
        flags
    })
}

fn to_csv(rows: &[Vec<String>]) -> String {
    rows.iter().map(|r| r.join(",")).collect::<Vec<_>>().join("\n")
}

// ── 1. Marker-free grids ─────────────────────────────────────────────

proptest! {
    #[test]
    fn plain_grid_parses_to_its_values(rows in arb_matrix()) {
        let text = to_csv(
            &rows
                .iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect::<Vec<_>>(),
        );
        let parsed = parse(&text, &ParseOptions::default()).unwrap();
        prop_assert!(parsed.dividers.is_empty());
        prop_assert_eq!(parsed.matrix.to_rows(), rows);
    }
}

// ── 2. Stripping shape ───────────────────────────────────────────────

proptest! {
    #[test]
    fn stripping_removes_exactly_flagged_lines(
        (row_flags, col_flags, seed) in (3usize..9, 3usize..9).prop_flat_map(|(n, k)| {
            (arb_interior_flags(n), arb_interior_flags(k), prop::collection::vec(arb_value(), n * k))
        }),
    ) {
        let n = row_flags.len();
        let k = col_flags.len();
        let grid: Vec<Vec<String>> = (0..n)
            .map(|r| {
                (0..k)
                    .map(|c| {
                        let row_border = row_flags[r] && (c == 0 || c == k - 1);
                        let col_border = col_flags[c] && (r == 0 || r == n - 1);
                        if row_border || col_border {
                            "b".to_string()
                        } else {
                            seed[r * k + c].to_string()
                        }
                    })
                    .collect()
            })
            .collect();

        let parsed = parse(&to_csv(&grid), &ParseOptions::default()).unwrap();
        let removed_rows: Vec<usize> = (0..n).filter(|&r| row_flags[r]).collect();
        let removed_cols: Vec<usize> = (0..k).filter(|&c| col_flags[c]).collect();

        prop_assert_eq!(parsed.matrix.rows(), n - removed_rows.len());
        prop_assert_eq!(parsed.matrix.cols(), k - removed_cols.len());
        prop_assert_eq!(
            parsed.dividers.rows.iter().map(|d| d.position).collect::<Vec<_>>(),
            removed_rows
        );
        prop_assert_eq!(
            parsed.dividers.cols.iter().map(|d| d.position).collect::<Vec<_>>(),
            removed_cols
        );

        let kept_rows: Vec<usize> = (0..n).filter(|&r| !row_flags[r]).collect();
        let kept_cols: Vec<usize> = (0..k).filter(|&c| !col_flags[c]).collect();
        for (i, &r) in kept_rows.iter().enumerate() {
            for (j, &c) in kept_cols.iter().enumerate() {
                prop_assert_eq!(parsed.matrix.get(i, j), Some(seed[r * k + c]));
            }
        }
    }
}

// ── 3. Alignment ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn align_is_an_involution(rows in arb_matrix()) {
        let m = Matrix::from_rows(rows).unwrap();
        let twice = align(align(&m).as_matrix()).into_inner();
        prop_assert_eq!(twice, m);
    }

    #[test]
    fn align_reverses_each_column(rows in arb_matrix()) {
        let m = Matrix::from_rows(rows).unwrap();
        let aligned = align(&m);
        for c in 0..m.cols() {
            let mut original: Vec<f64> = m.column(c).collect();
            original.reverse();
            prop_assert_eq!(aligned.as_matrix().column(c).collect::<Vec<_>>(), original);
        }
    }
}

// ── 4. Divider placement ─────────────────────────────────────────────

proptest! {
    #[test]
    fn placement_subtracts_prior_dividers(
        (len, picks) in (1usize..40).prop_flat_map(|len| {
            (Just(len), prop::collection::vec((any::<bool>(), arb_kind()), len))
        }),
    ) {
        let dividers: Vec<DividerMarker> = picks
            .iter()
            .enumerate()
            .filter(|(_, (chosen, _))| *chosen)
            .map(|(p, (_, kind))| DividerMarker::new(p, *kind))
            .collect();
        let axis_length = len - dividers.len();

        let placed = place_dividers(&dividers, axis_length).unwrap();
        prop_assert_eq!(placed.len(), dividers.len());
        for (o, (p, d)) in placed.iter().zip(&dividers).enumerate() {
            prop_assert_eq!(p.position, d.position - o);
            prop_assert_eq!(p.original, d.position);
            prop_assert!(p.position <= axis_length);
        }
        for pair in placed.windows(2) {
            prop_assert!(pair[0].position <= pair[1].position);
            if pair[1].original > pair[0].original + 1 {
                prop_assert!(pair[0].position < pair[1].position);
            }
        }
    }
}

// ── 5. Tag layout ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn tag_positions_are_cell_centres(n in 1usize..60) {
        let positions = tag_positions(n);
        prop_assert_eq!(positions.len(), n);
        for (i, p) in positions.iter().enumerate() {
            let expected = i as f64 / n as f64 + 1.0 / (2.0 * n as f64);
            prop_assert!((p - expected).abs() < 1e-12);
            prop_assert!(*p > 0.0 && *p < 1.0);
        }
        for pair in positions.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}
