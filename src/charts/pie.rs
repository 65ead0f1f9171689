//! Two-slice pie of the decision split: `Approuvé` = 100 − p, `Refusé` = p.
//!
//! Slices start at 12 o'clock and run counter-clockwise, each labelled
//! outside with its name and inside with a one-decimal percentage.

use std::fmt::Write as _;

use super::{polar, svg_open, text};
use crate::scoring::Decision;

pub const APPROVED_COLOR: &str = "#27ae60";
pub const REFUSED_COLOR: &str = "#e74c3c";

const SIZE: f64 = 300.0;
const CX: f64 = 150.0;
const CY: f64 = 150.0;
const RADIUS: f64 = 100.0;
const START_ANGLE: f64 = 90.0;

/// One slice of the pie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub label: &'static str,
    pub color: &'static str,
    /// Share of the whole in percent.
    pub value: f64,
}

/// The slices for a default percentage (clamped to 0–100).
pub fn slices(percentage: f64) -> [Slice; 2] {
    let p = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    [
        Slice {
            label: Decision::Approved.label(),
            color: APPROVED_COLOR,
            value: 100.0 - p,
        },
        Slice {
            label: Decision::Refused.label(),
            color: REFUSED_COLOR,
            value: p,
        },
    ]
}

/// Render the decision pie for a default percentage.
pub fn render(percentage: f64) -> String {
    let mut out = String::new();
    svg_open(&mut out, SIZE, SIZE);

    let mut start = START_ANGLE;
    for slice in slices(percentage) {
        if slice.value <= 0.0 {
            continue;
        }
        let sweep = 360.0 * slice.value / 100.0;
        let end = start + sweep;

        if sweep >= 360.0 {
            let _ = write!(
                out,
                r#"<circle cx="{CX}" cy="{CY}" r="{RADIUS}" fill="{}"/>"#,
                slice.color
            );
        } else {
            let (x1, y1) = polar(CX, CY, RADIUS, start);
            let (x2, y2) = polar(CX, CY, RADIUS, end);
            let large_arc = u8::from(sweep > 180.0);
            // Counter-clockwise on screen is SVG sweep-flag 0.
            let _ = write!(
                out,
                r#"<path d="M {CX} {CY} L {x1:.2} {y1:.2} A {RADIUS} {RADIUS} 0 {large_arc} 0 {x2:.2} {y2:.2} Z" fill="{}"/>"#,
                slice.color
            );
        }

        let middle = start + sweep / 2.0;
        let (px, py) = polar(CX, CY, RADIUS * 0.6, middle);
        text(&mut out, px, py + 4.0, 13.0, "middle", &format!("{:.1}%", slice.value));

        let (lx, ly) = polar(CX, CY, RADIUS * 1.1, middle);
        let anchor = if lx >= CX { "start" } else { "end" };
        text(&mut out, lx, ly + 4.0, 14.0, anchor, slice.label);

        start = end;
    }

    out.push_str("</svg>");
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_complement_each_other() {
        let [approved, refused] = slices(8.0);
        assert_eq!(approved.value, 92.0);
        assert_eq!(refused.value, 8.0);
        assert_eq!(approved.label, "Approuvé");
        assert_eq!(refused.color, REFUSED_COLOR);
    }

    #[test]
    fn renders_both_slices_with_percent_labels() {
        let svg = render(25.0);
        assert!(svg.contains(APPROVED_COLOR));
        assert!(svg.contains(REFUSED_COLOR));
        assert!(svg.contains(">75.0%<"));
        assert!(svg.contains(">25.0%<"));
        assert!(svg.contains(">Refusé<"));
    }

    #[test]
    fn zero_percent_is_a_full_approved_circle() {
        let svg = render(0.0);
        assert!(svg.contains("<circle"));
        assert!(svg.contains(APPROVED_COLOR));
        assert!(!svg.contains(REFUSED_COLOR));
    }

    #[test]
    fn majority_slice_uses_large_arc() {
        let svg = render(70.0);
        assert!(svg.contains("A 100 100 0 1 0"));
        assert!(svg.contains("A 100 100 0 0 0"));
    }
}
