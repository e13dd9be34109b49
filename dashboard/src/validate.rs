use crate::errors::{Error, Result};
use crate::model::TelemetrySnapshot;

const MOISTURE_MIN: f64 = 0.0;
const MOISTURE_MAX: f64 = 100.0;

/// Validates a snapshot before it reaches the view
pub fn validate(snapshot: &TelemetrySnapshot) -> Result<()> {
    if !snapshot.moisture.is_finite()
        || snapshot.moisture < MOISTURE_MIN
        || snapshot.moisture > MOISTURE_MAX
    {
        return Err(Error::Validation(format!(
            "Moisture {} out of range [{}, {}]",
            snapshot.moisture, MOISTURE_MIN, MOISTURE_MAX
        )));
    }

    if snapshot.timestamp < 0 {
        return Err(Error::Validation(format!(
            "Timestamp {} is before the epoch",
            snapshot.timestamp
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(moisture: f64, timestamp: i64) -> TelemetrySnapshot {
        TelemetrySnapshot {
            moisture,
            status: "Normal".to_string(),
            pump: "OFF".to_string(),
            timestamp,
        }
    }

    #[test]
    fn test_valid_snapshot() {
        assert!(validate(&snapshot(0.0, 1_700_000_000)).is_ok());
        assert!(validate(&snapshot(100.0, 1_700_000_000)).is_ok());
        assert!(validate(&snapshot(45.5, 0)).is_ok());
    }

    #[test]
    fn test_invalid_moisture() {
        assert!(validate(&snapshot(100.5, 1_700_000_000)).is_err());
        assert!(validate(&snapshot(-1.0, 1_700_000_000)).is_err());
    }

    #[test]
    fn test_negative_timestamp() {
        assert!(validate(&snapshot(40.0, -5)).is_err());
    }
}
