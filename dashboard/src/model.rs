use crate::errors::Result;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Retained document holding the latest probe reading.
pub const SOIL_DATA_PATH: &str = "soilData";

/// Write-only path read by the probe for manual pump overrides.
pub const MANUAL_PUMP_PATH: &str = "soilData/manualPump";

/// One full reading from the soil probe, always delivered whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Soil moisture percentage, 0-100
    pub moisture: f64,
    /// "Dry", "Wet" or "Normal" as reported by the probe
    pub status: String,
    /// "ON" or "OFF"
    pub pump: String,
    /// Unix seconds; fractional readings are floored
    #[serde(deserialize_with = "unix_seconds")]
    pub timestamp: i64,
}

impl TelemetrySnapshot {
    pub fn pump_state(&self) -> PumpState {
        if self.pump == PumpState::On.as_str() {
            PumpState::On
        } else {
            PumpState::Off
        }
    }
}

fn unix_seconds<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    if !secs.is_finite() || secs.abs() > i64::MAX as f64 {
        return Err(de::Error::custom(format!("timestamp {} out of range", secs)));
    }
    Ok(secs.floor() as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PumpState {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl PumpState {
    pub fn as_str(self) -> &'static str {
        match self {
            PumpState::On => "ON",
            PumpState::Off => "OFF",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PumpState::On => PumpState::Off,
            PumpState::Off => PumpState::On,
        }
    }
}

impl fmt::Display for PumpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes a `soilData` payload. An empty payload (cleared retained message)
/// or a JSON `null` is an absent value and yields `None`.
pub fn decode_snapshot(payload: &[u8]) -> Result<Option<TelemetrySnapshot>> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    Ok(serde_json::from_slice::<Option<TelemetrySnapshot>>(payload)?)
}
