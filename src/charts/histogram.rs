//! Income histogram of the reference population, with the current
//! applicant's income marked by a red dashed vertical line.
//!
//! Bin edges follow numpy's `"auto"` estimator: the narrower of the Sturges
//! and Freedman–Diaconis widths (Sturges alone when the interquartile range
//! is zero).

use std::fmt::Write as _;

use super::{svg_open, text};
use crate::dataset::INCOME_COLUMN;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 300.0;
const LEFT: f64 = 60.0;
const RIGHT: f64 = 20.0;
const TOP: f64 = 20.0;
const BOTTOM: f64 = 45.0;

/// Upper bound on the number of bins, so heavy outliers cannot blow up the
/// SVG.
pub const MAX_BINS: usize = 200;

pub const BAR_COLOR: &str = "lightblue";
pub const MARKER_COLOR: &str = "red";

/// Equal-width bins over a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    /// `counts.len() + 1` ascending edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Bins {
    /// Bin a sample with the `"auto"` rule. `None` for an empty sample.
    pub fn auto(data: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let mut first = sorted[0];
        let mut last = sorted[sorted.len() - 1];
        if first == last {
            first -= 0.5;
            last += 0.5;
        }

        let count = auto_bin_count(&sorted, last - first);
        let width = (last - first) / count as f64;
        let edges: Vec<f64> = (0..=count).map(|i| first + width * i as f64).collect();

        let mut counts = vec![0usize; count];
        for &v in &sorted {
            let index = (((v - first) / width) as usize).min(count - 1);
            counts[index] += 1;
        }

        Some(Self { edges, counts })
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Number of bins chosen by the `"auto"` estimator for sorted data.
fn auto_bin_count(sorted: &[f64], span: f64) -> usize {
    let n = sorted.len() as f64;
    let data_span = sorted[sorted.len() - 1] - sorted[0];
    if data_span == 0.0 {
        return 1;
    }

    let sturges = data_span / (n.log2() + 1.0);
    let iqr = percentile(sorted, 0.75) - percentile(sorted, 0.25);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

    ((span / width).ceil() as usize).clamp(1, MAX_BINS)
}

/// Linearly interpolated percentile of sorted data (`q` in `[0, 1]`).
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Render the histogram, or `None` when the population is empty.
pub fn render(population: &[f64], marker: f64) -> Option<String> {
    let bins = Bins::auto(population)?;

    let mut x_min = bins.edges[0];
    let mut x_max = bins.edges[bins.edges.len() - 1];
    if marker.is_finite() {
        x_min = x_min.min(marker);
        x_max = x_max.max(marker);
    }
    let y_max = bins.max_count().max(1) as f64;

    let plot_w = WIDTH - LEFT - RIGHT;
    let plot_h = HEIGHT - TOP - BOTTOM;
    let x_of = |v: f64| LEFT + (v - x_min) / (x_max - x_min) * plot_w;
    let y_of = |c: f64| TOP + plot_h - c / y_max * plot_h;

    let mut out = String::new();
    svg_open(&mut out, WIDTH, HEIGHT);

    for (i, &count) in bins.counts.iter().enumerate() {
        let x0 = x_of(bins.edges[i]);
        let x1 = x_of(bins.edges[i + 1]);
        let y = y_of(count as f64);
        let _ = write!(
            out,
            r#"<rect x="{x0:.2}" y="{y:.2}" width="{:.2}" height="{:.2}" fill="{BAR_COLOR}" stroke="white" stroke-width="0.5"/>"#,
            (x1 - x0).max(0.0),
            TOP + plot_h - y
        );
    }

    // Axes with five ticks each.
    let baseline = TOP + plot_h;
    let _ = write!(
        out,
        r##"<line x1="{LEFT}" y1="{baseline}" x2="{}" y2="{baseline}" stroke="#444"/><line x1="{LEFT}" y1="{TOP}" x2="{LEFT}" y2="{baseline}" stroke="#444"/>"##,
        LEFT + plot_w
    );
    for step in 0..=4 {
        let frac = f64::from(step) / 4.0;
        let xv = x_min + (x_max - x_min) * frac;
        text(&mut out, x_of(xv), baseline + 16.0, 11.0, "middle", &format!("{xv:.0}"));
        let yv = y_max * frac;
        text(&mut out, LEFT - 6.0, y_of(yv) + 4.0, 11.0, "end", &format!("{yv:.0}"));
    }
    text(&mut out, LEFT + plot_w / 2.0, HEIGHT - 6.0, 12.0, "middle", INCOME_COLUMN);
    text(&mut out, 14.0, TOP + plot_h / 2.0, 12.0, "middle", "Count");

    if marker.is_finite() {
        let mx = x_of(marker);
        let _ = write!(
            out,
            r#"<line x1="{mx:.2}" y1="{TOP}" x2="{mx:.2}" y2="{baseline}" stroke="{MARKER_COLOR}" stroke-width="2" stroke-dasharray="6 4"/>"#
        );
    }

    // Legend, top right.
    let lx = WIDTH - RIGHT - 130.0;
    let _ = write!(
        out,
        r#"<rect x="{lx}" y="{}" width="14" height="10" fill="{BAR_COLOR}"/><line x1="{lx}" y1="{}" x2="{}" y2="{}" stroke="{MARKER_COLOR}" stroke-width="2" stroke-dasharray="4 3"/>"#,
        TOP + 2.0,
        TOP + 25.0,
        lx + 14.0,
        TOP + 25.0
    );
    text(&mut out, lx + 20.0, TOP + 11.0, 12.0, "start", "Population");
    text(&mut out, lx + 20.0, TOP + 29.0, 12.0, "start", "Client actuel");

    out.push_str("</svg>");
    Some(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_bins_for_uniform_sample() {
        // 1..=100: Sturges width ≈ 12.95 beats Freedman–Diaconis ≈ 21.3,
        // giving ceil(99 / 12.95) = 8 bins.
        let data: Vec<f64> = (1..=100).map(f64::from).collect();
        let bins = Bins::auto(&data).unwrap();
        assert_eq!(bins.counts.len(), 8);
        assert_eq!(bins.edges.len(), 9);
        assert_eq!(bins.edges[0], 1.0);
        assert!((bins.edges[8] - 100.0).abs() < 1e-9);
        assert_eq!(bins.counts.iter().sum::<usize>(), 100);
    }

    #[test]
    fn constant_sample_gets_one_unit_bin() {
        let bins = Bins::auto(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(bins.edges, vec![4.5, 5.5]);
        assert_eq!(bins.counts, vec![3]);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let bins = Bins::auto(&[0.0, 1.0, 2.0, 3.0, 4.0, 10.0]).unwrap();
        assert!(*bins.counts.last().unwrap() >= 1);
        assert_eq!(bins.counts.iter().sum::<usize>(), 6);
    }

    #[test]
    fn percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.5), 2.5);
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 1.0), 4.0);
    }

    #[test]
    fn empty_population_renders_nothing() {
        assert!(render(&[], 5000.0).is_none());
        assert!(render(&[f64::NAN], 5000.0).is_none());
    }

    #[test]
    fn renders_bars_marker_and_legend() {
        let data = [2500.0, 3000.0, 3200.0, 4100.0, 5800.0, 6000.0, 12000.0];
        let svg = render(&data, 4583.0).unwrap();
        assert!(svg.contains(r#"fill="lightblue""#));
        assert!(svg.contains(r#"stroke="red""#));
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains(">Population<"));
        assert!(svg.contains(">Client actuel<"));
    }

    #[test]
    fn axis_extends_to_outlying_marker() {
        let data = [100.0, 200.0, 300.0];
        let svg = render(&data, 1000.0).unwrap();
        assert!(svg.contains(">1000<"));
    }
}
