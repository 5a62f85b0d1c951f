//! Delimited grid parsing with divider-marker extraction.
//!
//! Input is a rectangular grid of delimited tokens. A row whose first or last
//! token is a marker is a row divider; a column whose first or last token is a
//! marker is a column divider. Divider rows and columns are both classified
//! against the original grid, then stripped together, and every remaining cell
//! must parse as a finite `f64`.
//!
//! Every cell on the outer border of the original grid must be a marker or a
//! finite number, whether or not its line is a divider. Blank lines are only
//! allowed at the end of the input.
//!
//! Divider positions are reported in original-grid coordinates. Correcting
//! them for the stripped lines is the job of [`crate::divider`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::marker::{DividerMarker, DividerSet, MarkerTokens};
use crate::matrix::Matrix;

/// Errors from reading and parsing an input grid.
///
/// `MalformedInput`, `EmptyInput` and `NoDataCells` are all malformed-input
/// conditions; see [`ParseError::is_malformed`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read input '{path}': {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input: line {line} has {found} cells, expected {expected}")]
    MalformedInput {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("malformed input: no rows")]
    EmptyInput,

    #[error("malformed input: no numeric cells left after removing dividers from a {rows}x{cols} grid")]
    NoDataCells { rows: usize, cols: usize },

    #[error("cell ({row}, {col}) is not a finite number: '{token}'")]
    NumericParse {
        row: usize,
        col: usize,
        token: String,
    },

    #[error("border cell ({row}, {col}) holds '{token}', which is neither a divider marker nor a number")]
    InvalidMarker {
        row: usize,
        col: usize,
        token: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl ParseError {
    /// True for the structural (non-rectangular or empty) grid conditions.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ParseError::MalformedInput { .. } | ParseError::EmptyInput | ParseError::NoDataCells { .. }
        )
    }
}

/// Options controlling how the raw grid is tokenized and classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Cell delimiter byte.
    pub delimiter: u8,
    /// Reserved divider tokens.
    pub markers: MarkerTokens,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            markers: MarkerTokens::default(),
        }
    }
}

/// Parser output: the stripped matrix plus divider positions in the original grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGrid {
    pub matrix: Matrix,
    pub dividers: DividerSet,
    /// `(rows, cols)` of the grid before stripping.
    pub source_shape: (usize, usize),
}

/// Read and parse a grid file.
pub fn parse_file(path: &Path, opts: &ParseOptions) -> Result<ParsedGrid, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, opts)
}

/// Parse grid text into a numeric matrix and its dividers.
pub fn parse(text: &str, opts: &ParseOptions) -> Result<ParsedGrid, ParseError> {
    let grid = read_raw_grid(text, opts.delimiter)?;
    let n = grid.len();
    let k = grid[0].len();

    let markers = &opts.markers;
    check_border(&grid, markers)?;

    let rows: Vec<DividerMarker> = grid
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            markers
                .line_kind(&row[0], &row[k - 1])
                .map(|kind| DividerMarker::new(i, kind))
        })
        .collect();
    let cols: Vec<DividerMarker> = (0..k)
        .filter_map(|j| {
            markers
                .line_kind(&grid[0][j], &grid[n - 1][j])
                .map(|kind| DividerMarker::new(j, kind))
        })
        .collect();

    let kept_rows = surviving(n, &rows);
    let kept_cols = surviving(k, &cols);
    if kept_rows.is_empty() || kept_cols.is_empty() {
        return Err(ParseError::NoDataCells { rows: n, cols: k });
    }

    let mut values = Vec::with_capacity(kept_rows.len() * kept_cols.len());
    for &r in &kept_rows {
        for &c in &kept_cols {
            values.push(parse_cell(&grid[r][c], r, c, (n, k))?);
        }
    }

    let matrix = Matrix::new(kept_rows.len(), kept_cols.len(), values)
        .map_err(|_| ParseError::NoDataCells { rows: n, cols: k })?;

    log::debug!(
        "parsed {n}x{k} grid into {}x{} matrix ({} row dividers, {} column dividers)",
        matrix.rows(),
        matrix.cols(),
        rows.len(),
        cols.len()
    );

    Ok(ParsedGrid {
        matrix,
        dividers: DividerSet { rows, cols },
        source_shape: (n, k),
    })
}

/// Tokenize the text into a rectangular grid of trimmed cells.
fn read_raw_grid(text: &str, delimiter: u8) -> Result<Vec<Vec<String>>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut grid: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if let Some(first) = grid.first() {
            if row.len() != first.len() {
                return Err(ParseError::MalformedInput {
                    line,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        grid.push(row);
    }

    let expected = match grid.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return Err(ParseError::EmptyInput),
    };

    // The csv reader skips empty records; a blank line between rows is still
    // a zero-cell row.
    if let Some(line) = first_inner_blank_line(text) {
        return Err(ParseError::MalformedInput {
            line,
            expected,
            found: 0,
        });
    }
    Ok(grid)
}

/// 1-based number of the first blank line that has content after it.
fn first_inner_blank_line(text: &str) -> Option<u64> {
    let lines: Vec<&str> = text.lines().collect();
    let last_content = lines.iter().rposition(|l| !l.trim().is_empty())?;
    lines[..last_content]
        .iter()
        .position(|l| l.trim().is_empty())
        .map(|i| i as u64 + 1)
}

/// Reject border cells that are neither markers nor finite numbers.
fn check_border(grid: &[Vec<String>], markers: &MarkerTokens) -> Result<(), ParseError> {
    let n = grid.len();
    for (r, row) in grid.iter().enumerate() {
        let k = row.len();
        let edge_row = r == 0 || r + 1 == n;
        for (c, token) in row.iter().enumerate() {
            if !(edge_row || c == 0 || c + 1 == k) {
                continue;
            }
            let numeric = token.parse::<f64>().map_or(false, f64::is_finite);
            if !numeric && markers.kind_of(token).is_none() {
                return Err(ParseError::InvalidMarker {
                    row: r,
                    col: c,
                    token: token.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Indices in `0..len` not named by any divider.
fn surviving(len: usize, dividers: &[DividerMarker]) -> Vec<usize> {
    let mut removed = vec![false; len];
    for d in dividers {
        removed[d.position] = true;
    }
    (0..len).filter(|&i| !removed[i]).collect()
}

fn parse_cell(token: &str, row: usize, col: usize, shape: (usize, usize)) -> Result<f64, ParseError> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => {
            let (n, k) = shape;
            let on_border = row == 0 || col == 0 || row + 1 == n || col + 1 == k;
            let token = token.to_string();
            if on_border {
                Err(ParseError::InvalidMarker { row, col, token })
            } else {
                Err(ParseError::NumericParse { row, col, token })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerKind;

    fn opts() -> ParseOptions {
        ParseOptions::default()
    }

    #[test]
    fn plain_grid_has_no_dividers() {
        let parsed = parse("1,2,3\n4,5,6\n", &opts()).unwrap();
        assert_eq!(parsed.matrix.shape(), (2, 3));
        assert_eq!(parsed.matrix.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert!(parsed.dividers.is_empty());
        assert_eq!(parsed.source_shape, (2, 3));
    }

    #[test]
    fn crlf_and_whitespace_are_tolerated() {
        let parsed = parse("1, 2\r\n 3 ,4\r\n", &opts()).unwrap();
        assert_eq!(parsed.matrix.to_rows(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn row_divider_is_stripped() {
        let text = "1,2,3\nb,9,b\n4,5,6\n";
        let parsed = parse(text, &opts()).unwrap();
        assert_eq!(parsed.matrix.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(parsed.dividers.rows, vec![DividerMarker::new(1, MarkerKind::Light)]);
        assert!(parsed.dividers.cols.is_empty());
    }

    #[test]
    fn column_divider_is_stripped() {
        let text = "1,w,2\n3,0,4\n5,w,6\n";
        let parsed = parse(text, &opts()).unwrap();
        assert_eq!(
            parsed.matrix.to_rows(),
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]
        );
        assert_eq!(parsed.dividers.cols, vec![DividerMarker::new(1, MarkerKind::Heavy)]);
        assert!(parsed.dividers.rows.is_empty());
    }

    #[test]
    fn marker_vetoes_numeric_looking_interior() {
        // Interior cells of the divider row are numeric but still dropped.
        let text = "1,2,3,4\nw,7,8,9\n5,6,7,8\n";
        let parsed = parse(text, &opts()).unwrap();
        assert_eq!(parsed.matrix.rows(), 2);
        assert_eq!(parsed.dividers.rows[0].kind, MarkerKind::Heavy);
    }

    #[test]
    fn single_sided_marker_counts() {
        let text = "1,2\n3,b\n5,6\n";
        let parsed = parse(text, &opts()).unwrap();
        assert_eq!(parsed.dividers.rows, vec![DividerMarker::new(1, MarkerKind::Light)]);
        assert_eq!(parsed.matrix.to_rows(), vec![vec![1.0, 2.0], vec![5.0, 6.0]]);
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let err = parse("b,1,2,b\n3,4\nb,5,6,b\n", &opts()).unwrap_err();
        assert!(err.is_malformed());
        match err {
            ParseError::MalformedInput { line, expected, found } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 4);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_is_malformed() {
        let err = parse("", &opts()).unwrap_err();
        assert!(matches!(err, ParseError::EmptyInput));
        assert!(err.is_malformed());
    }

    #[test]
    fn all_dividers_leave_no_data() {
        let err = parse("b,b\nb,b\n", &opts()).unwrap_err();
        assert!(matches!(err, ParseError::NoDataCells { rows: 2, cols: 2 }));
    }

    #[test]
    fn interior_text_is_numeric_parse_error() {
        let err = parse("1,2,3\n4,abc,6\n7,8,9\n", &opts()).unwrap_err();
        match err {
            ParseError::NumericParse { row, col, token } => {
                assert_eq!((row, col), (1, 1));
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = parse("1,2,3\n4,NaN,6\n7,8,9\n", &opts()).unwrap_err();
        assert!(matches!(err, ParseError::NumericParse { row: 1, col: 1, .. }));
    }

    #[test]
    fn unknown_border_token_is_invalid_marker() {
        let err = parse("x,1,2\n3,4,5\n", &opts()).unwrap_err();
        match err {
            ParseError::InvalidMarker { row, col, token } => {
                assert_eq!((row, col), (0, 0));
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_token_opposite_a_row_marker_is_invalid() {
        let err = parse("1,2,3\nx,4,b\n5,6,7\n", &opts()).unwrap_err();
        match err {
            ParseError::InvalidMarker { row, col, token } => {
                assert_eq!((row, col, token.as_str()), (1, 0, "x"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_last_cell_of_a_marked_column_is_invalid() {
        let err = parse("1,b,3\n4,0,6\n7,x,9\n", &opts()).unwrap_err();
        match err {
            ParseError::InvalidMarker { row, col, token } => {
                assert_eq!((row, col, token.as_str()), (2, 1, "x"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_border_value_is_invalid() {
        let err = parse("1,2\ninf,b\n3,4\n", &opts()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidMarker { row: 1, col: 0, .. }));
    }

    #[test]
    fn blank_line_between_rows_is_malformed() {
        let err = parse("1,2\n\n3,4\n", &opts()).unwrap_err();
        assert!(err.is_malformed());
        match err {
            ParseError::MalformedInput { line, expected, found } => {
                assert_eq!((line, expected, found), (2, 2, 0));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn leading_blank_line_is_malformed() {
        let err = parse("\n1,2\n3,4\n", &opts()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput { line: 1, .. }));
    }

    #[test]
    fn trailing_blank_lines_are_allowed() {
        let parsed = parse("1,2\r\n3,4\r\n\r\n\n", &opts()).unwrap();
        assert_eq!(parsed.matrix.to_rows(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn custom_delimiter_and_markers() {
        let options = ParseOptions {
            delimiter: b';',
            markers: MarkerTokens::new("|", "#"),
        };
        let parsed = parse("1;2\n|;|\n3;4\n#;#\n5;6\n", &options).unwrap();
        assert_eq!(
            parsed.matrix.to_rows(),
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]
        );
        assert_eq!(
            parsed.dividers.rows,
            vec![
                DividerMarker::new(1, MarkerKind::Light),
                DividerMarker::new(3, MarkerKind::Heavy),
            ]
        );
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let err = parse_file(Path::new("/definitely/not/here.csv"), &opts()).unwrap_err();
        assert!(matches!(err, ParseError::InputNotFound { .. }));
    }
}
