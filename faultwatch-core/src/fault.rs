//! Fault Codes
//!
//! `E000` means no fault; `E001`..`E008` each name one sensor channel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sensor::SensorKey;

/// Description used for codes outside the catalogue
pub const UNKNOWN_FAULT_DESCRIPTION: &str = "No fault detected.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultCode {
    E000,
    E001,
    E002,
    E003,
    E004,
    E005,
    E006,
    E007,
    E008,
}

impl FaultCode {
    pub const ALL: [FaultCode; 9] = [
        FaultCode::E000,
        FaultCode::E001,
        FaultCode::E002,
        FaultCode::E003,
        FaultCode::E004,
        FaultCode::E005,
        FaultCode::E006,
        FaultCode::E007,
        FaultCode::E008,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FaultCode::E000 => "E000",
            FaultCode::E001 => "E001",
            FaultCode::E002 => "E002",
            FaultCode::E003 => "E003",
            FaultCode::E004 => "E004",
            FaultCode::E005 => "E005",
            FaultCode::E006 => "E006",
            FaultCode::E007 => "E007",
            FaultCode::E008 => "E008",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FaultCode::E000 => "No fault detected — all parameters are within normal range.",
            FaultCode::E001 => "Over Temperature — system temperature has exceeded the safe limit.",
            FaultCode::E002 => "High Pressure — pressure is above the safe operating range.",
            FaultCode::E003 => "Flow Rate Out of Range — flow is too low or too high.",
            FaultCode::E004 => {
                "High Vibration — abnormal vibration detected, possible mechanical issue."
            }
            FaultCode::E005 => {
                "Fill Height Abnormal — container level is outside the expected range."
            }
            FaultCode::E006 => {
                "Power Consumption Abnormal — energy usage is not within normal limits."
            }
            FaultCode::E007 => "CO2 Out of Range — CO2 concentration is above or below normal.",
            FaultCode::E008 => "Humidity Out of Range — humidity level is outside the safe range.",
        }
    }

    /// The code raised when `key` is the dominant deviation
    pub fn for_sensor(key: SensorKey) -> Self {
        match key {
            SensorKey::Temp => FaultCode::E001,
            SensorKey::Pressure => FaultCode::E002,
            SensorKey::Flow => FaultCode::E003,
            SensorKey::Vibration => FaultCode::E004,
            SensorKey::FillHeight => FaultCode::E005,
            SensorKey::Power => FaultCode::E006,
            SensorKey::Co2 => FaultCode::E007,
            SensorKey::Humidity => FaultCode::E008,
        }
    }

    pub fn is_fault(self) -> bool {
        self != FaultCode::E000
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaultCode {
    type Err = UnknownFaultCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FaultCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownFaultCode(s.to_string()))
    }
}

/// Returned when a string is not one of `E000`..`E008`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown fault code: {0}")]
pub struct UnknownFaultCode(pub String);

/// Describe an arbitrary code string, as received from a remote model
pub fn describe(code: &str) -> &'static str {
    code.parse::<FaultCode>()
        .map(FaultCode::description)
        .unwrap_or(UNKNOWN_FAULT_DESCRIPTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_sensor_has_distinct_fault() {
        let codes: Vec<_> = SensorKey::ALL.into_iter().map(FaultCode::for_sensor).collect();
        assert_eq!(codes, FaultCode::ALL[1..].to_vec());
        assert!(codes.iter().all(|c| c.is_fault()));
    }

    #[test]
    fn test_parse_fault_code() {
        assert_eq!("E003".parse::<FaultCode>(), Ok(FaultCode::E003));

        let err = "e003".parse::<FaultCode>().unwrap_err();
        assert_eq!(err, UnknownFaultCode("e003".to_string()));
        assert_eq!(err.to_string(), "Unknown fault code: e003");
    }

    #[test]
    fn test_describe_unknown_code() {
        assert_eq!(describe("E999"), UNKNOWN_FAULT_DESCRIPTION);
        assert!(describe("E002").starts_with("High Pressure"));
    }
}
