//! Sensor Channels
//!
//! The eight fixed measurement channels of a filling line, their inclusive
//! safe ranges, and a reading across all of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eight measurement channels.
///
/// Declaration order is the display order used by the bar chart and the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKey {
    Temp,
    Pressure,
    Flow,
    Vibration,
    FillHeight,
    Power,
    Co2,
    Humidity,
}

impl SensorKey {
    /// Number of channels
    pub const COUNT: usize = 8;

    /// All channels in display order
    pub const ALL: [SensorKey; Self::COUNT] = [
        SensorKey::Temp,
        SensorKey::Pressure,
        SensorKey::Flow,
        SensorKey::Vibration,
        SensorKey::FillHeight,
        SensorKey::Power,
        SensorKey::Co2,
        SensorKey::Humidity,
    ];

    /// Position in display order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire key, also used as the form input id
    pub fn as_str(self) -> &'static str {
        match self {
            SensorKey::Temp => "temp",
            SensorKey::Pressure => "pressure",
            SensorKey::Flow => "flow",
            SensorKey::Vibration => "vibration",
            SensorKey::FillHeight => "fillheight",
            SensorKey::Power => "power",
            SensorKey::Co2 => "co2",
            SensorKey::Humidity => "humidity",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            SensorKey::Temp => "Temperature",
            SensorKey::Pressure => "Pressure",
            SensorKey::Flow => "Flow Rate",
            SensorKey::Vibration => "Vibration",
            SensorKey::FillHeight => "Fill Height",
            SensorKey::Power => "Power",
            SensorKey::Co2 => "CO2",
            SensorKey::Humidity => "Humidity",
        }
    }

    /// Unit of measurement
    pub fn unit(self) -> &'static str {
        match self {
            SensorKey::Temp => "°C",
            SensorKey::Pressure => "bar",
            SensorKey::Flow => "L/min",
            SensorKey::Vibration => "mm/s",
            SensorKey::FillHeight => "mm",
            SensorKey::Power => "kW",
            SensorKey::Co2 => "ppm",
            SensorKey::Humidity => "%",
        }
    }

    /// Column name the prediction model was fitted on
    pub fn feature_name(self) -> &'static str {
        match self {
            SensorKey::Temp => "Temperature(°C)",
            SensorKey::Pressure => "Pressure(bar)",
            SensorKey::Flow => "FlowRate(L/min)",
            SensorKey::Vibration => "Vibration(mm/s)",
            SensorKey::FillHeight => "FillHeight(mm)",
            SensorKey::Power => "PowerConsumption(kW)",
            SensorKey::Co2 => "CO2_Level(ppm)",
            SensorKey::Humidity => "Humidity(%)",
        }
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorKey {
    type Err = UnknownSensor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSensor(s.to_string()))
    }
}

/// Returned when a string names no sensor channel
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sensor key: {0}")]
pub struct UnknownSensor(pub String);

/// Inclusive `[min, max]` bound for one channel.
///
/// Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct SafeRange {
    pub min: f64,
    pub max: f64,
}

impl SafeRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when `min <= max` and both bounds are finite
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Bounds are safe. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance outside the range as a fraction of its width; 0 inside
    pub fn deviation(&self, value: f64) -> f64 {
        let distance = if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            return 0.0;
        };

        let width = self.max - self.min;
        if width > 0.0 {
            distance / width
        } else {
            distance
        }
    }
}

impl From<[f64; 2]> for SafeRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<SafeRange> for [f64; 2] {
    fn from(range: SafeRange) -> Self {
        [range.min, range.max]
    }
}

impl fmt::Display for SafeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Safe range for every channel. Total over [`SensorKey::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct SafeRanges {
    ranges: [SafeRange; SensorKey::COUNT],
}

impl Default for SafeRanges {
    fn default() -> Self {
        Self {
            ranges: [
                SafeRange::new(20.0, 80.0),    // temp
                SafeRange::new(1.0, 5.0),      // pressure
                SafeRange::new(10.0, 100.0),   // flow
                SafeRange::new(0.0, 5.0),      // vibration
                SafeRange::new(95.0, 105.0),   // fillheight
                SafeRange::new(5.0, 50.0),     // power
                SafeRange::new(300.0, 1000.0), // co2
                SafeRange::new(30.0, 70.0),    // humidity
            ],
        }
    }
}

impl SafeRanges {
    pub fn get(&self, key: SensorKey) -> SafeRange {
        self.ranges[key.index()]
    }

    /// Replace one channel's range
    pub fn with(mut self, key: SensorKey, range: SafeRange) -> Self {
        self.ranges[key.index()] = range;
        self
    }

    /// Iterate in display order
    pub fn iter(&self) -> impl Iterator<Item = (SensorKey, SafeRange)> + '_ {
        SensorKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }
}

/// One value per channel, sent to `/predict` as a flat JSON object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub temp: f64,
    pub pressure: f64,
    pub flow: f64,
    pub vibration: f64,
    pub fillheight: f64,
    pub power: f64,
    pub co2: f64,
    pub humidity: f64,
}

impl SensorReading {
    /// Build a reading by evaluating `f` for every channel
    pub fn from_fn(mut f: impl FnMut(SensorKey) -> f64) -> Self {
        let mut reading = Self::default();
        for key in SensorKey::ALL {
            reading.set(key, f(key));
        }
        reading
    }

    pub fn get(&self, key: SensorKey) -> f64 {
        match key {
            SensorKey::Temp => self.temp,
            SensorKey::Pressure => self.pressure,
            SensorKey::Flow => self.flow,
            SensorKey::Vibration => self.vibration,
            SensorKey::FillHeight => self.fillheight,
            SensorKey::Power => self.power,
            SensorKey::Co2 => self.co2,
            SensorKey::Humidity => self.humidity,
        }
    }

    pub fn set(&mut self, key: SensorKey, value: f64) {
        let slot = match key {
            SensorKey::Temp => &mut self.temp,
            SensorKey::Pressure => &mut self.pressure,
            SensorKey::Flow => &mut self.flow,
            SensorKey::Vibration => &mut self.vibration,
            SensorKey::FillHeight => &mut self.fillheight,
            SensorKey::Power => &mut self.power,
            SensorKey::Co2 => &mut self.co2,
            SensorKey::Humidity => &mut self.humidity,
        };
        *slot = value;
    }

    /// Iterate in display order
    pub fn iter(&self) -> impl Iterator<Item = (SensorKey, f64)> + '_ {
        SensorKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_order_matches_index() {
        for (i, key) in SensorKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_key_round_trips_through_str() {
        for key in SensorKey::ALL {
            assert_eq!(key.as_str().parse::<SensorKey>().unwrap(), key);
        }
        assert!("rpm".parse::<SensorKey>().is_err());
    }

    #[test]
    fn test_serde_names_match_wire_keys() {
        for key in SensorKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = SafeRange::new(1.0, 5.0);
        assert!(range.contains(1.0));
        assert!(range.contains(5.0));
        assert!(!range.contains(0.999));
        assert!(!range.contains(5.001));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_range_deviation() {
        let range = SafeRange::new(0.0, 10.0);
        assert_eq!(range.deviation(5.0), 0.0);
        assert_eq!(range.deviation(15.0), 0.5);
        assert_eq!(range.deviation(-20.0), 2.0);
    }

    #[test]
    fn test_range_serializes_as_pair() {
        let range: SafeRange = serde_json::from_str("[1.5, 2.5]").unwrap();
        assert_eq!(range, SafeRange::new(1.5, 2.5));
        assert_eq!(serde_json::to_string(&range).unwrap(), "[1.5,2.5]");
    }

    #[test]
    fn test_default_ranges_are_valid() {
        let ranges = SafeRanges::default();
        assert_eq!(ranges.iter().count(), SensorKey::COUNT);
        assert!(ranges.iter().all(|(_, r)| r.is_valid()));
    }

    #[test]
    fn test_reading_wire_shape() {
        let reading = SensorReading::from_fn(|key| key.index() as f64);
        let value = serde_json::to_value(reading).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), SensorKey::COUNT);
        for key in SensorKey::ALL {
            assert_eq!(object[key.as_str()], key.index() as f64);
        }
    }
}
