use itertools::{Itertools, MinMaxResult};

use crate::sample::Sample;
use crate::util::{summarize, ChannelSummary};

pub const TABLE_HEADERS: [&str; 4] = ["Time (s)", "Acetone (ppm)", "Error (ppm)", "CO2 (ppm)"];

/// Length of one dash and one gap of the CO2 line, in seconds of the x axis
const DASH_SECS: f64 = 0.25;
/// Interpolated points per second when stippling the dashed series
const DASH_DENSITY: f64 = 40.0;

/// Everything the chart widget needs, rebuilt from the full series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartModel {
    pub acetone: Vec<(f64, f64)>,
    pub co2: Vec<(f64, f64)>,
    pub co2_dashed: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Table rows and chart state for the accumulated samples
#[derive(Debug, Clone, Default)]
pub struct Presenter {
    rows: Vec<[String; 4]>,
    chart: ChartModel,
    acetone_summary: Option<ChannelSummary>,
    redraws: usize,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[[String; 4]] {
        &self.rows
    }

    pub fn chart(&self) -> &ChartModel {
        &self.chart
    }

    pub fn acetone_summary(&self) -> Option<ChannelSummary> {
        self.acetone_summary
    }

    /// Number of full chart rebuilds since the last clear
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Appends the newest sample's row, then rebuilds the chart from every
    /// sample. The rebuild is quadratic over a run, which is fine for the
    /// sixty samples a test produces.
    pub fn render(&mut self, samples: &[Sample]) {
        if let Some(latest) = samples.last() {
            self.rows.push(latest.formatted());
        }
        self.chart = build_chart(samples);
        let acetone: Vec<f64> = samples.iter().map(|s| s.acetone).collect();
        self.acetone_summary = summarize(&acetone);
        self.redraws += 1;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub fn build_chart(samples: &[Sample]) -> ChartModel {
    let acetone: Vec<(f64, f64)> = samples.iter().map(Sample::acetone_point).collect();
    let co2: Vec<(f64, f64)> = samples.iter().map(Sample::co2_point).collect();
    let co2_dashed = dashed(&co2, DASH_SECS);

    let (x_bounds, y_bounds) = chart_bounds(samples);

    ChartModel {
        acetone,
        co2,
        co2_dashed,
        x_bounds,
        y_bounds,
    }
}

/// X spans the run (at least one second), Y spans both series with 10% padding
pub fn chart_bounds(samples: &[Sample]) -> ([f64; 2], [f64; 2]) {
    let x_max = samples.last().map(|s| s.time).unwrap_or(0.0).max(1.0);

    let values = samples
        .iter()
        .flat_map(|s| [s.acetone, s.co2])
        .filter(|v| v.is_finite());
    let (lo, hi) = match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    let pad = ((hi - lo) * 0.1).max(0.05);

    ([0.0, x_max], [lo - pad, hi + pad])
}

/// Stipples a polyline into on/off runs of `dash` length along x.
fn dashed(points: &[(f64, f64)], dash: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    for (&(x0, y0), &(x1, y1)) in points.iter().tuple_windows() {
        let span = x1 - x0;
        if span <= 0.0 {
            continue;
        }
        let steps = (span * DASH_DENSITY).ceil() as usize;
        for i in 0..=steps {
            let x = x0 + span * i as f64 / steps as f64;
            if ((x / dash).floor() as i64) % 2 == 0 {
                let y = y0 + (y1 - y0) * (x - x0) / span;
                out.push((x, y));
            }
        }
    }
    out
}

/// Format an axis label, dropping decimals for whole numbers
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new(0.0, 0.5, 0.1, 0.4),
            Sample::new(1.0, 0.52, 0.1, 0.41),
            Sample::new(2.0, 0.48, 0.1, 0.39),
        ]
    }

    #[test]
    fn render_appends_one_row_per_call() {
        let all = samples();
        let mut presenter = Presenter::new();
        for i in 1..=all.len() {
            presenter.render(&all[..i]);
        }
        assert_eq!(presenter.rows().len(), 3);
        assert_eq!(presenter.rows()[1], ["1.00", "0.520", "0.100", "0.410"]);
        assert_eq!(presenter.redraws(), 3);
    }

    #[test]
    fn chart_is_rebuilt_from_the_full_series() {
        let all = samples();
        let mut presenter = Presenter::new();
        presenter.render(&all[..1]);
        assert_eq!(presenter.chart().acetone.len(), 1);
        presenter.render(&all);
        assert_eq!(presenter.chart().acetone, vec![(0.0, 0.5), (1.0, 0.52), (2.0, 0.48)]);
        assert_eq!(presenter.chart().co2.len(), 3);
    }

    #[test]
    fn clear_empties_table_and_chart() {
        let mut presenter = Presenter::new();
        presenter.render(&samples());
        presenter.clear();
        assert!(presenter.rows().is_empty());
        assert_eq!(presenter.chart(), &ChartModel::default());
        assert!(presenter.acetone_summary().is_none());
        assert_eq!(presenter.redraws(), 0);
    }

    #[test]
    fn bounds_cover_both_series() {
        let (x, y) = chart_bounds(&samples());
        assert_eq!(x, [0.0, 2.0]);
        assert!(y[0] < 0.39 && y[1] > 0.52);
    }

    #[test]
    fn bounds_for_empty_and_single_sample() {
        let (x, y) = chart_bounds(&[]);
        assert_eq!(x, [0.0, 1.0]);
        assert!(y[0] < 0.0 && y[1] > 1.0);

        let (x, y) = chart_bounds(&[Sample::new(0.0, 0.5, 0.1, 0.5)]);
        assert_eq!(x, [0.0, 1.0]);
        assert!(y[0] < 0.5 && y[1] > 0.5);
    }

    #[test]
    fn dashed_series_has_gaps() {
        let line = vec![(0.0, 0.0), (1.0, 1.0)];
        let d = dashed(&line, 0.25);
        assert!(!d.is_empty());
        // nothing drawn inside the first gap
        assert!(d.iter().all(|&(x, _)| !(x > 0.25 && x < 0.5)));
        // points stay on the segment
        assert!(d.iter().all(|&(x, y)| (x - y).abs() < 1e-12));
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(60.0), "60");
        assert_eq!(format_label(0.4567), "0.46");
    }
}
