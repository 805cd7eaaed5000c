//! Form Validator
//!
//! Raw text of the eight sensor inputs and the check that gates submission.
//! Values are parsed here; range checking is left to the bar chart.

use crate::sensor::{SensorKey, SensorReading};

/// Text currently typed into each sensor input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: [String; SensorKey::COUNT],
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill every field from a reading
    pub fn from_reading(reading: &SensorReading) -> Self {
        let mut form = Self::new();
        for (key, value) in reading.iter() {
            form.set(key, value.to_string());
        }
        form
    }

    pub fn set(&mut self, key: SensorKey, text: impl Into<String>) {
        self.fields[key.index()] = text.into();
    }

    pub fn get(&self, key: SensorKey) -> &str {
        &self.fields[key.index()]
    }
}

/// Outcome of checking one input
#[derive(Debug, Clone, PartialEq)]
pub enum FieldStatus {
    Ok(f64),
    /// Blank or whitespace only
    Empty,
    /// Present but not a finite number; holds the raw text
    NotANumber(String),
}

impl FieldStatus {
    fn check(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldStatus::Empty;
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => FieldStatus::Ok(value),
            _ => FieldStatus::NotANumber(raw.to_string()),
        }
    }

    /// Whether the input should carry the error border
    pub fn is_flagged(&self) -> bool {
        !matches!(self, FieldStatus::Ok(_))
    }
}

/// Result of validating the whole form.
///
/// Every field gets a fresh status, so marks from an earlier attempt are
/// cleared before new ones are set.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    statuses: [FieldStatus; SensorKey::COUNT],
}

impl Validation {
    pub fn status(&self, key: SensorKey) -> &FieldStatus {
        &self.statuses[key.index()]
    }

    pub fn is_valid(&self) -> bool {
        self.statuses.iter().all(|s| !s.is_flagged())
    }

    /// Fields to mark, in display order
    pub fn flagged(&self) -> Vec<SensorKey> {
        SensorKey::ALL
            .into_iter()
            .filter(|key| self.status(*key).is_flagged())
            .collect()
    }

    pub fn empty_fields(&self) -> Vec<SensorKey> {
        SensorKey::ALL
            .into_iter()
            .filter(|key| *self.status(*key) == FieldStatus::Empty)
            .collect()
    }

    /// The parsed reading, present only when every field is valid
    pub fn reading(&self) -> Option<SensorReading> {
        let mut reading = SensorReading::default();
        for key in SensorKey::ALL {
            match self.status(key) {
                FieldStatus::Ok(value) => reading.set(key, *value),
                _ => return None,
            }
        }
        Some(reading)
    }
}

/// Check every field of `form`
pub fn validate(form: &FormState) -> Validation {
    Validation {
        statuses: SensorKey::ALL.map(|key| FieldStatus::check(form.get(key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(text: &str) -> FormState {
        let mut form = FormState::new();
        for key in SensorKey::ALL {
            form.set(key, text);
        }
        form
    }

    #[test]
    fn test_complete_form_is_valid() {
        let validation = validate(&filled(" 12.5 "));

        assert!(validation.is_valid());
        assert!(validation.flagged().is_empty());
        assert_eq!(validation.reading().unwrap().temp, 12.5);
    }

    #[test]
    fn test_every_empty_field_is_flagged() {
        let mut form = filled("1");
        form.set(SensorKey::Pressure, "");
        form.set(SensorKey::Humidity, "   ");

        let validation = validate(&form);

        assert!(!validation.is_valid());
        assert_eq!(validation.empty_fields(), vec![SensorKey::Pressure, SensorKey::Humidity]);
        assert!(validation.reading().is_none());
    }

    #[test]
    fn test_non_numeric_is_rejected_not_coerced() {
        let mut form = filled("1");
        form.set(SensorKey::Co2, "abc");
        form.set(SensorKey::Flow, "NaN");
        form.set(SensorKey::Power, "inf");

        let validation = validate(&form);

        assert_eq!(
            *validation.status(SensorKey::Co2),
            FieldStatus::NotANumber("abc".to_string())
        );
        assert_eq!(
            validation.flagged(),
            vec![SensorKey::Flow, SensorKey::Power, SensorKey::Co2]
        );
        assert!(validation.empty_fields().is_empty());
    }

    #[test]
    fn test_revalidation_clears_old_marks() {
        let mut form = filled("");
        assert_eq!(validate(&form).flagged().len(), SensorKey::COUNT);

        form = filled("3");
        assert!(validate(&form).flagged().is_empty());
    }

    #[test]
    fn test_from_reading_round_trip() {
        let reading = SensorReading::from_fn(|key| key.index() as f64 + 0.5);
        let validation = validate(&FormState::from_reading(&reading));
        assert_eq!(validation.reading(), Some(reading));
    }
}
