//! Result charts, rendered server-side as standalone SVG documents.
//!
//! Three stateless renderers run after a successful prediction:
//!
//! - [`gauge`]: default probability on a 0–100 dial
//! - [`pie`]: Approved vs Refused proportions
//! - [`histogram`]: the applicant's income against the reference population
//!   (prediction tab only)
//!
//! Renderers have no failure mode: they draw whatever data they are given.

pub mod gauge;
pub mod histogram;
pub mod pie;

use std::fmt::Write as _;

use serde::Serialize;

use crate::scoring::Assessment;

/// Charts returned with a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub gauge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<String>,
}

impl ChartSet {
    /// Full set for the prediction tab. The histogram is omitted when the
    /// reference population is empty.
    pub fn full(assessment: &Assessment, population: &[f64], applicant_income: f64) -> Self {
        Self {
            gauge: gauge::render(assessment.percentage, assessment.decision),
            pie: Some(pie::render(assessment.percentage)),
            histogram: histogram::render(population, applicant_income),
        }
    }

    /// Gauge only, for the client lookup tab.
    pub fn gauge_only(assessment: &Assessment) -> Self {
        Self {
            gauge: gauge::render(assessment.percentage, assessment.decision),
            pie: None,
            histogram: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SVG helpers
// ---------------------------------------------------------------------------

pub(crate) const FONT: &str = "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif";

/// Opening `<svg>` tag with a fixed viewBox that scales to its container.
pub(crate) fn svg_open(out: &mut String, width: f64, height: f64) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="100%" font-family="{FONT}">"#
    );
}

/// Text element anchored at `(x, y)`.
pub(crate) fn text(out: &mut String, x: f64, y: f64, size: f64, anchor: &str, content: &str) {
    let _ = write!(
        out,
        r##"<text x="{x:.1}" y="{y:.1}" font-size="{size}" text-anchor="{anchor}" fill="#1e293b">{}</text>"##,
        escape(content)
    );
}

/// Point on a circle for an angle in degrees (counter-clockwise from the
/// positive x axis, y pointing up as in a math plot).
pub(crate) fn polar(cx: f64, cy: f64, r: f64, degrees: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (cx + r * rad.cos(), cy - r * rad.sin())
}

/// Escape text content for inclusion in SVG/HTML.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
        assert_eq!(escape("Probabilité"), "Probabilité");
    }

    #[test]
    fn polar_follows_math_orientation() {
        let (x, y) = polar(0.0, 0.0, 1.0, 90.0);
        assert!(x.abs() < 1e-9);
        assert!((y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn full_set_skips_histogram_without_population() {
        let a = Assessment::from_probability(0.3);
        let charts = ChartSet::full(&a, &[], 1000.0);
        assert!(charts.pie.is_some());
        assert!(charts.histogram.is_none());

        let json = serde_json::to_value(&charts).unwrap();
        assert!(json.get("histogram").is_none());
    }

    #[test]
    fn gauge_only_has_no_pie() {
        let charts = ChartSet::gauge_only(&Assessment::from_probability(0.05));
        assert!(charts.gauge.starts_with("<svg"));
        assert!(charts.pie.is_none());
    }
}
