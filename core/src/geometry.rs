//! Side-by-side layout detection over ultrasound regions
//!
//! A dual display shows one B-mode region and one color Doppler region next to
//! each other, either left/right or top/bottom. Superimposed regions (color box
//! drawn on top of the B-mode sector) are the normal single display and must
//! not be reported as side-by-side.

use crate::types::{Region, RegionBounds, RegionKind};
use std::fmt;

/// Largest gap between the two regions still considered adjacent, in pixels
pub const SIDE_BY_SIDE_MAX_GAP: i64 = 100;

/// Largest overlap along the layout axis tolerated as a shared border, in pixels
pub const SIDE_BY_SIDE_OVERLAP_TOLERANCE: i64 = 5;

/// Orientation of a detected dual layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum Layout {
    /// Left/right
    Horizontal,
    /// Top/bottom
    Vertical,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Horizontal => write!(f, "horizontal"),
            Layout::Vertical => write!(f, "vertical"),
        }
    }
}

/// Outcome of side-by-side detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutVerdict {
    pub layout: Option<Layout>,
    pub reasoning: Vec<String>,
}

impl LayoutVerdict {
    pub fn is_side_by_side(&self) -> bool {
        self.layout.is_some()
    }

    fn rejected(reason: String) -> Self {
        Self {
            layout: None,
            reasoning: vec![reason],
        }
    }
}

/// Signed gap between two intervals along one axis
///
/// The intervals are ordered by their start so the result does not depend on
/// argument order. Negative values mean the intervals overlap.
fn signed_gap(a: (i32, i32), b: (i32, i32)) -> i64 {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    i64::from(second.0) - i64::from(first.1)
}

/// Checks one orientation: adjacency along the layout axis, shared extent across it
fn adjacent(gap: i64, cross_overlap: i64) -> bool {
    (-SIDE_BY_SIDE_OVERLAP_TOLERANCE..SIDE_BY_SIDE_MAX_GAP).contains(&gap) && cross_overlap > 0
}

/// Detects a side-by-side B-mode + color Doppler layout
///
/// Returns a verdict with a layout only when `regions` holds exactly two
/// entries, one [`RegionKind::BMode`] and one [`RegionKind::ColorDoppler`] in
/// any order, and they sit within [`SIDE_BY_SIDE_MAX_GAP`] of each other along
/// one axis while sharing a positive extent along the other.
///
/// # Example
///
/// ```
/// use echocat_core::geometry::{detect_side_by_side, Layout};
/// use echocat_core::{Region, RegionBounds, RegionKind};
///
/// let regions = vec![
///     Region::new(RegionKind::BMode, RegionBounds::new(0, 50, 456, 686)),
///     Region::new(RegionKind::ColorDoppler, RegionBounds::new(497, 50, 954, 686)),
/// ];
/// let verdict = detect_side_by_side(&regions);
/// assert_eq!(verdict.layout, Some(Layout::Horizontal));
/// ```
pub fn detect_side_by_side(regions: &[Region]) -> LayoutVerdict {
    if regions.len() != 2 {
        return LayoutVerdict::rejected(format!(
            "{} ultrasound regions, side-by-side needs exactly 2",
            regions.len()
        ));
    }

    let b_mode = regions.iter().find(|r| r.kind == RegionKind::BMode);
    let doppler = regions.iter().find(|r| r.kind == RegionKind::ColorDoppler);
    let (b, d) = match (b_mode, doppler) {
        (Some(b), Some(d)) => (&b.bounds, &d.bounds),
        _ => {
            return LayoutVerdict::rejected(format!(
                "region kinds {} + {}, side-by-side needs b-mode + color doppler",
                regions[0].kind, regions[1].kind
            ))
        }
    };

    analyze_pair(b, d)
}

fn analyze_pair(b: &RegionBounds, d: &RegionBounds) -> LayoutVerdict {
    let (bw, bh) = (b.width(), b.height());
    let (dw, dh) = (d.width(), d.height());
    let (bc, dc) = (b.center(), d.center());
    let mut reasoning = vec![format!(
        "b-mode {} ({}x{}, center {:.0},{:.0}), color doppler {} ({}x{}, center {:.0},{:.0})",
        b, bw, bh, bc.0, bc.1, d, dw, dh, dc.0, dc.1
    )];

    let gap_x = signed_gap((b.min_x, b.max_x), (d.min_x, d.max_x));
    let gap_y = signed_gap((b.min_y, b.max_y), (d.min_y, d.max_y));
    let y_overlap = b.y_overlap(d);
    let x_overlap = b.x_overlap(d);

    if adjacent(gap_x, y_overlap) {
        reasoning.push(format!(
            "horizontal gap {}px < {}px with {} shared rows",
            gap_x.max(0),
            SIDE_BY_SIDE_MAX_GAP,
            y_overlap
        ));
        return LayoutVerdict {
            layout: Some(Layout::Horizontal),
            reasoning,
        };
    }

    if adjacent(gap_y, x_overlap) {
        reasoning.push(format!(
            "vertical gap {}px < {}px with {} shared columns",
            gap_y.max(0),
            SIDE_BY_SIDE_MAX_GAP,
            x_overlap
        ));
        return LayoutVerdict {
            layout: Some(Layout::Vertical),
            reasoning,
        };
    }

    if gap_x < -SIDE_BY_SIDE_OVERLAP_TOLERANCE && gap_y < -SIDE_BY_SIDE_OVERLAP_TOLERANCE {
        reasoning.push(format!(
            "regions superimposed (overlap {}px x {}px)",
            -gap_x, -gap_y
        ));
    } else {
        reasoning.push(format!(
            "regions not adjacent (gap x {}px, gap y {}px)",
            gap_x, gap_y
        ));
    }

    LayoutVerdict {
        layout: None,
        reasoning,
    }
}
