//! Range-deviation scorer
//!
//! Each channel contributes `weight * deviation`, where deviation is the
//! distance outside its safe range divided by the range width. The sum plus
//! `bias` goes through a logistic function.

use async_trait::async_trait;
use faultwatch_core::fault::FaultCode;
use faultwatch_core::sensor::{SafeRanges, SensorKey, SensorReading};
use std::collections::BTreeMap;

use super::{Prediction, Predictor, PredictorError};

pub struct RangePredictor {
    ranges: SafeRanges,
    bias: f64,
    weight: f64,
}

impl RangePredictor {
    pub fn new(ranges: SafeRanges, bias: f64, weight: f64) -> Self {
        Self {
            ranges,
            bias,
            weight,
        }
    }

    /// Score synchronously; the trait method wraps this
    pub fn score(&self, reading: &SensorReading) -> Prediction {
        let mut contributions = BTreeMap::new();
        let mut logit = self.bias;
        let mut dominant: Option<(SensorKey, f64)> = None;

        for (key, range) in self.ranges.iter() {
            let deviation = range.deviation(reading.get(key));
            // huge finite readings overflow; JSON has no infinity
            let contribution = (self.weight * deviation).clamp(-f64::MAX, f64::MAX);

            logit += contribution;
            contributions.insert(key.feature_name().to_string(), contribution);

            // strict comparison keeps the earliest channel on ties
            if deviation > 0.0 && dominant.map_or(true, |(_, best)| deviation > best) {
                dominant = Some((key, deviation));
            }
        }

        let probability = sigmoid(logit);
        let error_code = dominant
            .map(|(key, _)| FaultCode::for_sensor(key))
            .unwrap_or(FaultCode::E000);

        Prediction {
            probability,
            fault: probability >= 0.5,
            error_code: error_code.to_string(),
            contributions,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[async_trait]
impl Predictor for RangePredictor {
    fn name(&self) -> &'static str {
        "range"
    }

    async fn predict(&self, reading: &SensorReading) -> Result<Prediction, PredictorError> {
        let prediction = self.score(reading);
        if !prediction.probability.is_finite() {
            return Err(PredictorError::InvalidOutput(format!(
                "non-finite probability for {:?}",
                reading
            )));
        }
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor() -> RangePredictor {
        RangePredictor::new(SafeRanges::default(), -4.0, 6.0)
    }

    fn nominal() -> SensorReading {
        let ranges = SafeRanges::default();
        SensorReading::from_fn(|key| {
            let r = ranges.get(key);
            (r.min + r.max) / 2.0
        })
    }

    #[test]
    fn test_nominal_reading_is_low_risk() {
        let prediction = predictor().score(&nominal());

        assert!(prediction.probability < 0.05);
        assert!(!prediction.fault);
        assert_eq!(prediction.error_code, "E000");
        assert_eq!(prediction.contributions.len(), SensorKey::COUNT);
        assert!(prediction.contributions.values().all(|c| *c == 0.0));
    }

    #[test]
    fn test_dominant_deviation_picks_code() {
        let mut reading = nominal();
        reading.set(SensorKey::Vibration, 9.0); // 0.8 widths over
        reading.set(SensorKey::Temp, 86.0); // 0.1 widths over

        let prediction = predictor().score(&reading);

        assert_eq!(prediction.error_code, "E004");
        assert!(prediction.fault);
        assert!(
            prediction.contributions["Vibration(mm/s)"]
                > prediction.contributions["Temperature(°C)"]
        );
    }

    #[test]
    fn test_ties_resolve_in_display_order() {
        let mut reading = nominal();
        reading.set(SensorKey::Pressure, 6.0); // 0.25 widths
        reading.set(SensorKey::Humidity, 80.0); // 0.25 widths

        assert_eq!(predictor().score(&reading).error_code, "E002");
    }

    #[test]
    fn test_probability_grows_with_deviation() {
        let mut reading = nominal();
        reading.set(SensorKey::Co2, 1100.0);
        let slight = predictor().score(&reading).probability;

        reading.set(SensorKey::Co2, 2000.0);
        let severe = predictor().score(&reading).probability;

        assert!(severe > slight);
        assert!(severe <= 1.0);
    }

    #[test]
    fn test_extreme_reading_keeps_contributions_finite() {
        let mut reading = nominal();
        reading.set(SensorKey::Pressure, 1.7e308);

        let prediction = predictor().score(&reading);

        assert_eq!(prediction.error_code, "E002");
        assert_eq!(prediction.probability, 1.0);
        assert_eq!(prediction.contributions["Pressure(bar)"], f64::MAX);
        assert!(prediction.contributions.values().all(|c| c.is_finite()));
    }

    #[tokio::test]
    async fn test_trait_predict() {
        let prediction = predictor().predict(&nominal()).await.unwrap();
        assert_eq!(prediction.error_code, "E000");
    }
}
