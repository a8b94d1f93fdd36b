//! SVG-ready chart coordinates.

use std::f64::consts::PI;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Drawing area for a line chart, in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartFrame {
    fn default() -> Self {
        Self { width: 600.0, height: 240.0, padding: 24.0 }
    }
}

impl ChartFrame {
    pub fn plot_width(&self) -> f64 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - 2.0 * self.padding).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Line chart vertices for `values`.
///
/// x steps evenly across `N − 1` intervals (a single value sits at the left
/// edge). y is measured down from the top: `value == max` touches the top of
/// the plot area, 0 sits on the baseline. `max` is floored at 1 so an
/// all-zero series draws flat instead of dividing by zero.
pub fn line_points(values: &[f64], frame: &ChartFrame) -> Vec<Point> {
    let max = values.iter().copied().fold(1.0_f64, f64::max);
    let step = if values.len() > 1 {
        frame.plot_width() / (values.len() - 1) as f64
    } else {
        0.0
    };
    let baseline = frame.height - frame.padding;

    values
        .iter()
        .enumerate()
        .map(|(i, v)| Point {
            x: frame.padding + i as f64 * step,
            y: baseline - (v / max) * frame.plot_height(),
        })
        .collect()
}

/// `M x y L x y ...` path data, two decimals.
pub fn svg_path(points: &[Point]) -> String {
    let mut path = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            path.push(' ');
        }
        // Writing to a String cannot fail.
        let _ = write!(path, "{cmd} {:.2} {:.2}", p.x, p.y);
    }
    path
}

pub fn circumference(radius: f64) -> f64 {
    2.0 * PI * radius
}

/// One donut segment, drawn as a dash of `length` starting `offset` units
/// along the circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutArc {
    pub label: String,
    pub count: usize,
    pub length: f64,
    pub offset: f64,
}

/// Donut segments for labelled counts, in input order.
///
/// Zero total yields no arcs. Otherwise the last arc is sized to end exactly
/// at the circumference so rounding never leaves a gap.
pub fn donut_arcs(segments: &[(String, usize)], radius: f64) -> Vec<DonutArc> {
    let total: usize = segments.iter().map(|(_, c)| *c).sum();
    if total == 0 {
        return Vec::new();
    }
    let full = circumference(radius);

    let mut arcs = Vec::with_capacity(segments.len());
    let mut offset = 0.0;
    let last = segments.len() - 1;
    for (i, (label, count)) in segments.iter().enumerate() {
        let length = if i == last {
            full - offset
        } else {
            *count as f64 / total as f64 * full
        };
        arcs.push(DonutArc { label: label.clone(), count: *count, length, offset });
        offset += length;
    }
    arcs
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: ChartFrame = ChartFrame { width: 120.0, height: 60.0, padding: 10.0 };

    #[test]
    fn interpolates_x_and_scales_y() {
        let pts = line_points(&[0.0, 50.0, 100.0], &FRAME);
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0], Point { x: 10.0, y: 50.0 });
        assert_eq!(pts[1], Point { x: 60.0, y: 30.0 });
        assert_eq!(pts[2], Point { x: 110.0, y: 10.0 });
    }

    #[test]
    fn all_zero_series_is_flat_on_baseline() {
        let pts = line_points(&[0.0; 4], &FRAME);
        assert!(pts.iter().all(|p| p.y == 50.0 && p.y.is_finite()));
    }

    #[test]
    fn single_and_empty_series() {
        assert_eq!(line_points(&[5.0], &FRAME), vec![Point { x: 10.0, y: 10.0 }]);
        assert!(line_points(&[], &FRAME).is_empty());
    }

    #[test]
    fn path_rendering() {
        let pts = [Point { x: 1.0, y: 2.0 }, Point { x: 3.5, y: 4.25 }];
        assert_eq!(svg_path(&pts), "M 1.00 2.00 L 3.50 4.25");
        assert_eq!(svg_path(&[]), "");
    }

    #[test]
    fn arcs_are_proportional_and_offset() {
        let segs = vec![("confirmed".to_string(), 2), ("pending".to_string(), 1), ("refunded".to_string(), 1)];
        let arcs = donut_arcs(&segs, 10.0);
        let c = circumference(10.0);
        assert_eq!(arcs.len(), 3);
        assert!((arcs[0].length - c / 2.0).abs() < 1e-9);
        assert_eq!(arcs[0].offset, 0.0);
        assert!((arcs[1].offset - c / 2.0).abs() < 1e-9);
        assert!((arcs[2].offset - 3.0 * c / 4.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_has_no_arcs() {
        assert!(donut_arcs(&[("pending".to_string(), 0)], 10.0).is_empty());
        assert!(donut_arcs(&[], 10.0).is_empty());
    }

    proptest::proptest! {
        #[test]
        fn arcs_cover_the_circle(counts in proptest::collection::vec(0usize..50, 1..8), radius in 1.0f64..200.0) {
            let segs: Vec<(String, usize)> = counts.iter().enumerate().map(|(i, c)| (i.to_string(), *c)).collect();
            let arcs = donut_arcs(&segs, radius);
            let total: usize = counts.iter().sum();
            if total == 0 {
                proptest::prop_assert!(arcs.is_empty());
            } else {
                let sum: f64 = arcs.iter().map(|a| a.length).sum();
                proptest::prop_assert!((sum - circumference(radius)).abs() < 1e-9);
                let last = arcs.last().unwrap();
                proptest::prop_assert!((last.offset + last.length - circumference(radius)).abs() < 1e-9);
            }
        }
    }
}
