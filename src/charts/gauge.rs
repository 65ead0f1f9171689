//! Semicircular gauge of the default probability.
//!
//! The dial runs from 0 (left) to 100 (right). The background is split into
//! a light-green half (0–50) and a salmon half (50–100); the value bar is
//! green for an approved credit and red for a refused one.

use std::fmt::Write as _;

use super::{polar, svg_open, text};
use crate::scoring::Decision;

pub const TITLE: &str = "Probabilité de Défaut (%)";

const WIDTH: f64 = 320.0;
const HEIGHT: f64 = 220.0;
const CX: f64 = 160.0;
const CY: f64 = 180.0;
const STEP_OUTER: f64 = 120.0;
const STEP_INNER: f64 = 72.0;
const BAR_OUTER: f64 = 108.0;
const BAR_INNER: f64 = 84.0;

/// Background bands: `(from, to, color)` on the 0–100 scale.
pub const STEPS: [(f64, f64, &str); 2] = [(0.0, 50.0, "lightgreen"), (50.0, 100.0, "salmon")];

/// Bar color for a decision.
pub fn bar_color(decision: Decision) -> &'static str {
    match decision {
        Decision::Approved => "green",
        Decision::Refused => "red",
    }
}

/// Dial angle in degrees for a value on the 0–100 scale.
fn angle(value: f64) -> f64 {
    180.0 * (1.0 - value / 100.0)
}

/// Path of the ring segment between two values.
fn band(out: &mut String, from: f64, to: f64, inner: f64, outer: f64, color: &str) {
    let (ox1, oy1) = polar(CX, CY, outer, angle(from));
    let (ox2, oy2) = polar(CX, CY, outer, angle(to));
    let (ix2, iy2) = polar(CX, CY, inner, angle(to));
    let (ix1, iy1) = polar(CX, CY, inner, angle(from));
    let _ = write!(
        out,
        r#"<path d="M {ox1:.2} {oy1:.2} A {outer} {outer} 0 0 1 {ox2:.2} {oy2:.2} L {ix2:.2} {iy2:.2} A {inner} {inner} 0 0 0 {ix1:.2} {iy1:.2} Z" fill="{color}"/>"#
    );
}

/// Render the gauge for a percentage (clamped to 0–100).
pub fn render(percentage: f64, decision: Decision) -> String {
    let value = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };

    let mut out = String::new();
    svg_open(&mut out, WIDTH, HEIGHT);
    text(&mut out, CX, 24.0, 16.0, "middle", TITLE);

    for (from, to, color) in STEPS {
        band(&mut out, from, to, STEP_INNER, STEP_OUTER, color);
    }

    if value > 0.0 {
        band(&mut out, 0.0, value, BAR_INNER, BAR_OUTER, bar_color(decision));
    }

    // Axis ticks every 20.
    for tick in (0..=100).step_by(20) {
        let t = f64::from(tick);
        let (x1, y1) = polar(CX, CY, STEP_OUTER, angle(t));
        let (x2, y2) = polar(CX, CY, STEP_OUTER + 6.0, angle(t));
        let (lx, ly) = polar(CX, CY, STEP_OUTER + 16.0, angle(t));
        let _ = write!(
            out,
            r##"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="#444" stroke-width="1"/>"##
        );
        text(&mut out, lx, ly + 4.0, 10.0, "middle", &tick.to_string());
    }

    text(&mut out, CX, CY - 8.0, 30.0, "middle", &format!("{value:.2}"));
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
    fn bar_color_follows_decision() {
        assert!(render(8.0, Decision::Approved).contains(r#"fill="green""#));
        assert!(render(30.0, Decision::Refused).contains(r#"fill="red""#));
    }

    #[test]
    fn steps_are_always_drawn() {
        let svg = render(0.0, Decision::Approved);
        assert!(svg.contains(r#"fill="lightgreen""#));
        assert!(svg.contains(r#"fill="salmon""#));
        // No value bar at zero.
        assert!(!svg.contains(r#"fill="green""#));
    }

    #[test]
    fn shows_title_and_value() {
        let svg = render(8.0, Decision::Approved);
        assert!(svg.contains(TITLE));
        assert!(svg.contains(">8.00<"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn value_is_clamped() {
        assert!(render(250.0, Decision::Refused).contains(">100.00<"));
        assert!(render(f64::NAN, Decision::Refused).contains(">0.00<"));
    }

    #[test]
    fn angles_span_half_circle() {
        assert_eq!(angle(0.0), 180.0);
        assert_eq!(angle(50.0), 90.0);
        assert_eq!(angle(100.0), 0.0);
    }
}
