//! Divider placement on the stripped matrix.
//!
//! Divider rows/columns are removed from the matrix before rendering, so a
//! divider's original index overstates its position by the number of dividers
//! removed before it. The `o`-th divider (0-based, ascending original order)
//! lands at `original - o`, which is the count of data lines preceding it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;
use crate::marker::{DividerMarker, MarkerKind};

/// Errors from divider placement.
#[derive(Debug, Error, PartialEq)]
pub enum PlaceError {
    #[error("marker at position {position} has kind {kind:?}, which has no divider stroke")]
    NotADivider { position: usize, kind: MarkerKind },

    #[error("dividers must be strictly ascending: {previous} is followed by {position}")]
    Unsorted { previous: usize, position: usize },

    #[error("divider at original position {original} maps to {corrected}, outside an axis of length {axis_length}")]
    OutOfRange {
        original: usize,
        corrected: usize,
        axis_length: usize,
    },
}

/// Line weight and colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub weight: f64,
    pub color: Rgb,
}

impl Stroke {
    /// Uniform separator between adjacent cells.
    pub const THIN: Stroke = Stroke {
        weight: 0.25,
        color: Rgb::BLACK,
    };
    pub const LIGHT: Stroke = Stroke {
        weight: 2.0,
        color: Rgb::BLACK,
    };
    pub const HEAVY: Stroke = Stroke {
        weight: 4.0,
        color: Rgb::WHITE,
    };

    /// Divider stroke for a marker kind. `ThinImplicit` is not a divider.
    pub fn for_divider(kind: MarkerKind) -> Option<Stroke> {
        match kind {
            MarkerKind::Light => Some(Stroke::LIGHT),
            MarkerKind::Heavy => Some(Stroke::HEAVY),
            MarkerKind::ThinImplicit => None,
        }
    }
}

/// A divider with its corrected, post-strip position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedDivider {
    /// Index in the original grid.
    pub original: usize,
    /// Number of data lines before the divider, counted from the top (rows)
    /// or the left (columns).
    pub position: usize,
    pub kind: MarkerKind,
    pub stroke: Stroke,
}

/// Correct divider positions for stripped lines and pick strokes.
///
/// `dividers` must be strictly ascending by original position, as the parser
/// produces them. `axis_length` is the stripped line count on that axis.
pub fn place_dividers(
    dividers: &[DividerMarker],
    axis_length: usize,
) -> Result<Vec<PlacedDivider>, PlaceError> {
    let mut placed = Vec::with_capacity(dividers.len());
    let mut previous: Option<usize> = None;

    for (o, divider) in dividers.iter().enumerate() {
        if let Some(prev) = previous {
            if divider.position <= prev {
                return Err(PlaceError::Unsorted {
                    previous: prev,
                    position: divider.position,
                });
            }
        }
        previous = Some(divider.position);

        let stroke = Stroke::for_divider(divider.kind).ok_or(PlaceError::NotADivider {
            position: divider.position,
            kind: divider.kind,
        })?;

        // Strictly ascending positions guarantee position >= o.
        let corrected = divider.position - o;
        if corrected > axis_length {
            return Err(PlaceError::OutOfRange {
                original: divider.position,
                corrected,
                axis_length,
            });
        }

        log::debug!(
            "divider {o}: original {} -> {corrected} ({:?})",
            divider.position,
            divider.kind
        );
        placed.push(PlacedDivider {
            original: divider.position,
            position: corrected,
            kind: divider.kind,
            stroke,
        });
    }

    Ok(placed)
}

/// Offsets of the thin unit separators on an axis of `count` cells: `1..count`.
pub fn thin_separators(count: usize) -> std::ops::Range<usize> {
    1..count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light(p: usize) -> DividerMarker {
        DividerMarker::new(p, MarkerKind::Light)
    }

    fn heavy(p: usize) -> DividerMarker {
        DividerMarker::new(p, MarkerKind::Heavy)
    }

    #[test]
    fn empty_input_places_nothing() {
        assert!(place_dividers(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn positions_shift_by_prior_count() {
        // Original grid: data rows 0,1 | divider 2 | data 3,4 | divider 5 | data 6
        let placed = place_dividers(&[light(2), heavy(5)], 5).unwrap();
        assert_eq!(placed[0].position, 2);
        assert_eq!(placed[1].position, 4);
        assert_eq!(placed[0].stroke, Stroke::LIGHT);
        assert_eq!(placed[1].stroke, Stroke::HEAVY);
        assert_eq!(placed[1].original, 5);
    }

    #[test]
    fn first_divider_at_zero_stays_at_zero() {
        let placed = place_dividers(&[light(0)], 3).unwrap();
        assert_eq!(placed[0].position, 0);
    }

    #[test]
    fn adjacent_dividers_collapse_to_same_line() {
        let placed = place_dividers(&[light(3), heavy(4)], 6).unwrap();
        assert_eq!(placed[0].position, 3);
        assert_eq!(placed[1].position, 3);
    }

    #[test]
    fn strokes_match_kinds() {
        assert_eq!(Stroke::LIGHT.weight, 2.0);
        assert_eq!(Stroke::LIGHT.color, Rgb::BLACK);
        assert_eq!(Stroke::HEAVY.weight, 4.0);
        assert_eq!(Stroke::HEAVY.color, Rgb::WHITE);
        assert_eq!(Stroke::for_divider(MarkerKind::ThinImplicit), None);
    }

    #[test]
    fn thin_kind_is_an_error() {
        let err = place_dividers(&[DividerMarker::new(1, MarkerKind::ThinImplicit)], 4).unwrap_err();
        assert_eq!(
            err,
            PlaceError::NotADivider {
                position: 1,
                kind: MarkerKind::ThinImplicit
            }
        );
    }

    #[test]
    fn unsorted_input_is_rejected() {
        let err = place_dividers(&[light(4), light(2)], 6).unwrap_err();
        assert_eq!(err, PlaceError::Unsorted { previous: 4, position: 2 });
        assert!(place_dividers(&[light(2), light(2)], 6).is_err());
    }

    #[test]
    fn out_of_range_is_rejected() {
        let err = place_dividers(&[light(9)], 3).unwrap_err();
        assert!(matches!(err, PlaceError::OutOfRange { corrected: 9, .. }));
    }

    #[test]
    fn thin_separator_offsets() {
        assert_eq!(thin_separators(4).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(thin_separators(1).count(), 0);
        assert_eq!(thin_separators(0).count(), 0);
    }
}
