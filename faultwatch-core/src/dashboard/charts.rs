//! Chart Renderer
//!
//! Data behind the three dashboard charts. Drawing is left to the page; this
//! module decides what each chart shows.

use crate::sensor::{SafeRange, SafeRanges, SensorKey, SensorReading};
use crate::wire::{probability_percent, LogEntry};

/// Bar fill for a sensor value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarColor {
    /// Inside the safe range, or no value yet
    Green,
    /// Outside the safe range
    Red,
}

impl BarColor {
    pub fn for_value(range: SafeRange, value: f64) -> Self {
        if range.contains(value) {
            BarColor::Green
        } else {
            BarColor::Red
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            BarColor::Green => "#4CAF50",
            BarColor::Red => "#F44336",
        }
    }
}

/// Two-slice risk donut: `[safe, risk]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonutChart {
    slices: [u8; 2],
    center: String,
}

impl DonutChart {
    fn new(percent: u8) -> Self {
        let percent = percent.min(100);
        Self {
            slices: [100 - percent, percent],
            center: format!("{}%", percent),
        }
    }

    pub fn slices(&self) -> [u8; 2] {
        self.slices
    }

    /// Risk share, the second slice
    pub fn percent(&self) -> u8 {
        self.slices[1]
    }

    /// Label drawn in the hole
    pub fn center(&self) -> &str {
        &self.center
    }
}

/// One bar in the sensor chart
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub key: SensorKey,
    pub range: SafeRange,
    /// None until a reading has been submitted
    pub value: Option<f64>,
    pub color: BarColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    bars: Vec<Bar>,
}

impl BarChart {
    fn empty(ranges: &SafeRanges) -> Self {
        let bars = ranges
            .iter()
            .map(|(key, range)| Bar {
                key,
                range,
                value: None,
                color: BarColor::Green,
            })
            .collect();
        Self { bars }
    }

    /// Bars in display order
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar(&self, key: SensorKey) -> &Bar {
        &self.bars[key.index()]
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.bars.iter().map(|b| b.key.label()).collect()
    }
}

/// Probability history, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineChart {
    labels: Vec<String>,
    data: Vec<u8>,
}

impl LineChart {
    /// Raw server timestamps
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Probabilities as whole percents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Owns the donut, bar and line charts for the page's lifetime
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    ranges: SafeRanges,
    initialized: bool,
    donut: DonutChart,
    bar: BarChart,
    line: LineChart,
}

impl ChartRenderer {
    pub fn new(ranges: SafeRanges) -> Self {
        let bar = BarChart::empty(&ranges);
        Self {
            ranges,
            initialized: false,
            donut: DonutChart::new(0),
            bar,
            line: LineChart::default(),
        }
    }

    /// Reset all charts to their empty state. Only the first call has any effect.
    pub fn init_charts(&mut self) {
        if self.initialized {
            return;
        }

        self.donut = DonutChart::new(0);
        self.bar = BarChart::empty(&self.ranges);
        self.line = LineChart::default();
        self.initialized = true;

        tracing::debug!("Charts initialized");
    }

    /// Set the risk share; values above 100 are clamped
    pub fn update_donut(&mut self, percent: u8) {
        self.init_charts();
        self.donut = DonutChart::new(percent);
    }

    /// Show a submitted reading against the safe ranges
    pub fn update_bar(&mut self, reading: &SensorReading) {
        self.init_charts();
        for bar in &mut self.bar.bars {
            let value = reading.get(bar.key);
            bar.value = Some(value);
            bar.color = BarColor::for_value(bar.range, value);
        }
    }

    /// Replace the whole line series
    pub fn update_line(&mut self, entries: &[LogEntry]) {
        self.init_charts();
        self.line = LineChart {
            labels: entries.iter().map(|e| e.timestamp.clone()).collect(),
            data: entries.iter().map(|e| probability_percent(e.probability)).collect(),
        };
    }

    pub fn ranges(&self) -> &SafeRanges {
        &self.ranges
    }

    pub fn donut(&self) -> &DonutChart {
        &self.donut
    }

    pub fn bar(&self) -> &BarChart {
        &self.bar
    }

    pub fn line(&self) -> &LineChart {
        &self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> ChartRenderer {
        let mut charts = ChartRenderer::new(SafeRanges::default());
        charts.init_charts();
        charts
    }

    #[test]
    fn test_donut_slices_and_center() {
        let mut charts = renderer();
        charts.update_donut(42);

        assert_eq!(charts.donut().slices(), [58, 42]);
        assert_eq!(charts.donut().center(), "42%");
    }

    #[test]
    fn test_donut_clamps_percent() {
        let mut charts = renderer();
        charts.update_donut(250);
        assert_eq!(charts.donut().slices(), [0, 100]);
    }

    #[test]
    fn test_bar_colors_follow_inclusive_bounds() {
        let ranges = SafeRanges::default();
        let mut charts = renderer();

        for key in SensorKey::ALL {
            let range = ranges.get(key);
            let midpoint = (range.min + range.max) / 2.0;

            for (value, expected) in [
                (range.min, BarColor::Green),
                (range.max, BarColor::Green),
                (midpoint, BarColor::Green),
                (range.min - 0.01, BarColor::Red),
                (range.max + 0.01, BarColor::Red),
            ] {
                let reading = SensorReading::from_fn(|k| {
                    if k == key {
                        value
                    } else {
                        midpoint_of(&ranges, k)
                    }
                });
                charts.update_bar(&reading);

                let bar = charts.bar().bar(key);
                assert_eq!(bar.color, expected, "{} = {}", key, value);
                assert_eq!(bar.value, Some(value));
            }
        }
    }

    fn midpoint_of(ranges: &SafeRanges, key: SensorKey) -> f64 {
        let r = ranges.get(key);
        (r.min + r.max) / 2.0
    }

    #[test]
    fn test_bars_in_display_order() {
        let charts = renderer();
        let keys: Vec<_> = charts.bar().bars().iter().map(|b| b.key).collect();
        assert_eq!(keys, SensorKey::ALL.to_vec());
        assert!(charts.bar().bars().iter().all(|b| b.value.is_none()));
    }

    #[test]
    fn test_line_replaces_series() {
        let mut charts = renderer();
        charts.update_line(&[
            LogEntry::new("t0", 0.9),
            LogEntry::new("t00", 0.9),
            LogEntry::new("t000", 0.9),
        ]);
        charts.update_line(&[LogEntry::new("t1", 0.1), LogEntry::new("t2", 0.5)]);

        assert_eq!(charts.line().labels(), ["t1", "t2"]);
        assert_eq!(charts.line().data(), [10, 50]);
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut charts = renderer();
        charts.update_donut(30);
        charts.init_charts();
        assert_eq!(charts.donut().percent(), 30);
    }
}
