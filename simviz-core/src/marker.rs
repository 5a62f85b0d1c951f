//! Divider markers: the reserved border tokens that split the grid into blocks.

use serde::{Deserialize, Serialize};

/// Style of a divider line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// The uniform unit separator drawn between every pair of cells.
    /// Never produced by the parser and never a valid divider.
    ThinImplicit,
    /// Light divider: weight 2, primary colour.
    Light,
    /// Heavy divider: weight 4, secondary colour.
    Heavy,
}

/// A divider recorded at its position in the original, unstripped grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividerMarker {
    pub position: usize,
    pub kind: MarkerKind,
}

impl DividerMarker {
    pub fn new(position: usize, kind: MarkerKind) -> Self {
        Self { position, kind }
    }
}

/// Row and column dividers, each sorted by original position ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividerSet {
    pub rows: Vec<DividerMarker>,
    pub cols: Vec<DividerMarker>,
}

impl DividerSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

/// The two reserved marker tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerTokens {
    pub light: String,
    pub heavy: String,
}

impl MarkerTokens {
    pub fn new(light: impl Into<String>, heavy: impl Into<String>) -> Self {
        Self {
            light: light.into(),
            heavy: heavy.into(),
        }
    }

    /// Classify a (trimmed) token.
    pub fn kind_of(&self, token: &str) -> Option<MarkerKind> {
        if token == self.light {
            Some(MarkerKind::Light)
        } else if token == self.heavy {
            Some(MarkerKind::Heavy)
        } else {
            None
        }
    }

    /// Kind for a line given its first and last tokens. Either end suffices;
    /// the first token wins when both are markers.
    pub fn line_kind(&self, first: &str, last: &str) -> Option<MarkerKind> {
        self.kind_of(first).or_else(|| self.kind_of(last))
    }
}

impl Default for MarkerTokens {
    fn default() -> Self {
        Self::new("b", "w")
    }
}
