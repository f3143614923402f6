//! Geometry for the small SVG charts (assistant charts and dashboard).
//!
//! Values are laid out against a zero baseline; negative values are drawn
//! as zero.

/// Series colours, cycled by dataset index
pub const PALETTE: [&str; 6] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#06b6d4",
];

pub fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Round `max` up to 1, 2, 5 × 10^k so axis ticks stay readable
pub fn nice_max(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    let normalized = max / magnitude;
    let step = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub width: f64,
    pub height: f64,
    pub pad_left: f64,
    pub pad_right: f64,
    pub pad_top: f64,
    pub pad_bottom: f64,
}

impl Default for ChartFrame {
    fn default() -> Self {
        Self {
            width: 560.0,
            height: 240.0,
            pad_left: 56.0,
            pad_right: 12.0,
            pad_top: 12.0,
            pad_bottom: 32.0,
        }
    }
}

impl ChartFrame {
    pub fn plot_width(&self) -> f64 {
        (self.width - self.pad_left - self.pad_right).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - self.pad_top - self.pad_bottom).max(0.0)
    }

    pub fn baseline(&self) -> f64 {
        self.pad_top + self.plot_height()
    }

    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    /// Vertical position of `value` on a 0..=`max` axis
    pub fn y_of(&self, value: f64, max: f64) -> f64 {
        let ratio = if max > 0.0 { (value.max(0.0) / max).min(1.0) } else { 0.0 };
        self.baseline() - ratio * self.plot_height()
    }

    /// Centre of the `index`-th of `count` label slots
    pub fn slot_center(&self, index: usize, count: usize) -> f64 {
        let slot = self.plot_width() / count.max(1) as f64;
        self.pad_left + slot * (index as f64 + 0.5)
    }
}

/// Largest value across all series, rounded with [`nice_max`]
pub fn axis_max(series: &[Vec<f64>]) -> f64 {
    let max = series
        .iter()
        .flat_map(|s| s.iter().copied())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    nice_max(max)
}

/// Evenly spaced tick values from 0 to `max`
pub fn y_ticks(max: f64, count: usize) -> Vec<f64> {
    let count = count.max(1);
    (0..=count).map(|i| max * i as f64 / count as f64).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarRect {
    pub series: usize,
    pub label_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub value: f64,
}

/// Grouped bars: one group per label, one bar per series inside it
pub fn bar_layout(frame: &ChartFrame, labels: usize, series: &[Vec<f64>], max: f64) -> Vec<BarRect> {
    if labels == 0 || series.is_empty() {
        return Vec::new();
    }
    let slot = frame.plot_width() / labels as f64;
    let group = slot * 0.8;
    let bar_width = group / series.len() as f64;
    let baseline = frame.baseline();

    let mut out = Vec::with_capacity(labels * series.len());
    for label_index in 0..labels {
        let group_left = frame.pad_left + slot * label_index as f64 + (slot - group) / 2.0;
        for (s, values) in series.iter().enumerate() {
            let value = values.get(label_index).copied().unwrap_or(0.0);
            let y = frame.y_of(value, max);
            out.push(BarRect {
                series: s,
                label_index,
                x: group_left + bar_width * s as f64,
                y,
                width: bar_width,
                height: baseline - y,
                value,
            });
        }
    }
    out
}

/// Points of one line series; missing values count as zero
pub fn line_points(frame: &ChartFrame, labels: usize, values: &[f64], max: f64) -> Vec<(f64, f64)> {
    (0..labels)
        .map(|i| {
            let value = values.get(i).copied().unwrap_or(0.0);
            (frame.slot_center(i, labels), frame.y_of(value, max))
        })
        .collect()
}

/// `points` attribute of an SVG polyline
pub fn polyline(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compact axis label: 1200 → "1.2k", 2500000 → "2.5M"
pub fn short_number(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1_000_000.0 {
        (value / 1_000_000.0, "M")
    } else if abs >= 1_000.0 {
        (value / 1_000.0, "k")
    } else {
        (value, "")
    };
    let text = format!("{:.1}", scaled);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_max() {
        assert_eq!(nice_max(0.0), 1.0);
        assert_eq!(nice_max(7.0), 10.0);
        assert_eq!(nice_max(130.0), 200.0);
        assert_eq!(nice_max(4200.0), 5000.0);
        assert_eq!(nice_max(100.0), 100.0);
    }

    #[test]
    fn test_bar_layout_grouped() {
        let frame = ChartFrame::default();
        let series = vec![vec![50.0, 100.0], vec![25.0]];
        let bars = bar_layout(&frame, 2, &series, 100.0);
        assert_eq!(bars.len(), 4);

        let full = &bars[2];
        assert_eq!(full.label_index, 1);
        assert!((full.height - frame.plot_height()).abs() < 1e-9);

        let missing = &bars[3];
        assert_eq!(missing.value, 0.0);
        assert_eq!(missing.height, 0.0);
        assert!(bars[1].x > bars[0].x);
    }

    #[test]
    fn test_line_points_and_polyline() {
        let frame = ChartFrame {
            width: 100.0,
            height: 100.0,
            pad_left: 0.0,
            pad_right: 0.0,
            pad_top: 0.0,
            pad_bottom: 0.0,
        };
        let points = line_points(&frame, 2, &[0.0, 10.0], 10.0);
        assert_eq!(points, vec![(25.0, 100.0), (75.0, 0.0)]);
        assert_eq!(polyline(&points), "25.0,100.0 75.0,0.0");
    }

    #[test]
    fn test_short_number() {
        assert_eq!(short_number(950.0), "950");
        assert_eq!(short_number(1200.0), "1.2k");
        assert_eq!(short_number(2_000_000.0), "2M");
        assert_eq!(y_ticks(100.0, 4), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }
}
