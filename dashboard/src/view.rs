use crate::model::{PumpState, TelemetrySnapshot};
use chrono::{Local, TimeZone};
use serde::Serialize;
use std::fmt::Display;

const PLACEHOLDER: &str = "--";

pub const WATER_LABEL: &str = "Water Plant";
pub const STOP_LABEL: &str = "Stop Watering";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardModifier {
    Dry,
    Wet,
}

impl CardModifier {
    fn for_status(status: &str) -> Option<Self> {
        match status {
            "Dry" => Some(CardModifier::Dry),
            "Wet" => Some(CardModifier::Wet),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardModifier::Dry => "dry",
            CardModifier::Wet => "wet",
        }
    }
}

/// Status card: a base class plus at most one modifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusCard {
    pub modifier: Option<CardModifier>,
}

impl StatusCard {
    pub const BASE_CLASS: &'static str = "card";

    pub fn css_class(&self) -> String {
        match self.modifier {
            Some(m) => format!("{} {}", Self::BASE_CLASS, m.as_str()),
            None => Self::BASE_CLASS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterButton {
    pub label: String,
    pub watering: bool,
}

impl Default for WaterButton {
    fn default() -> Self {
        Self {
            label: WATER_LABEL.to_string(),
            watering: false,
        }
    }
}

impl WaterButton {
    pub const BASE_CLASS: &'static str = "water-button";

    pub fn css_class(&self) -> String {
        if self.watering {
            format!("{} watering", Self::BASE_CLASS)
        } else {
            Self::BASE_CLASS.to_string()
        }
    }
}

/// Everything the dashboard page shows apart from the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub moisture: String,
    pub status: String,
    pub pump: String,
    pub timestamp: String,
    pub status_card: StatusCard,
    pub water_button: WaterButton,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            moisture: PLACEHOLDER.to_string(),
            status: PLACEHOLDER.to_string(),
            pump: PLACEHOLDER.to_string(),
            timestamp: PLACEHOLDER.to_string(),
            status_card: StatusCard::default(),
            water_button: WaterButton::default(),
        }
    }
}

impl DashboardView {
    /// Projects a snapshot onto the view, rendering the timestamp in local time.
    pub fn project(&mut self, snapshot: &TelemetrySnapshot) {
        self.project_in(snapshot, &Local);
    }

    pub fn project_in<Tz>(&mut self, snapshot: &TelemetrySnapshot, tz: &Tz)
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.moisture = snapshot.moisture.to_string();
        self.status = snapshot.status.clone();
        self.pump = snapshot.pump.clone();
        self.timestamp = format_timestamp(snapshot.timestamp, tz);

        // Reset to the base class first so a stale modifier never survives
        self.status_card = StatusCard::default();
        self.status_card.modifier = CardModifier::for_status(&snapshot.status);

        let watering = snapshot.pump_state() == PumpState::On;
        self.water_button = WaterButton {
            label: if watering { STOP_LABEL } else { WATER_LABEL }.to_string(),
            watering,
        };
    }
}

/// Human-readable rendering of a Unix-seconds timestamp.
pub fn format_timestamp<Tz>(secs: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_opt(secs, 0).earliest() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "Invalid Date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(moisture: f64, status: &str, pump: &str) -> TelemetrySnapshot {
        TelemetrySnapshot {
            moisture,
            status: status.to_string(),
            pump: pump.to_string(),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_dry_snapshot() {
        let mut view = DashboardView::default();
        view.project_in(&snapshot(45.0, "Dry", "OFF"), &Utc);

        assert_eq!(view.moisture, "45");
        assert_eq!(view.status, "Dry");
        assert_eq!(view.pump, "OFF");
        assert_eq!(view.timestamp, "2023-11-14 22:13:20");
        assert_eq!(view.status_card.css_class(), "card dry");
        assert_eq!(view.water_button.label, WATER_LABEL);
        assert!(!view.water_button.watering);
    }

    #[test]
    fn test_fractional_moisture_is_raw() {
        let mut view = DashboardView::default();
        view.project_in(&snapshot(45.25, "Normal", "OFF"), &Utc);

        assert_eq!(view.moisture, "45.25");
    }

    #[test]
    fn test_stale_modifier_cleared() {
        let mut view = DashboardView::default();
        view.project_in(&snapshot(10.0, "Dry", "ON"), &Utc);
        view.project_in(&snapshot(90.0, "Wet", "ON"), &Utc);
        assert_eq!(view.status_card.css_class(), "card wet");

        view.project_in(&snapshot(50.0, "Normal", "ON"), &Utc);
        assert_eq!(view.status_card.modifier, None);
        assert_eq!(view.status_card.css_class(), "card");
    }

    #[test]
    fn test_status_match_is_exact() {
        let mut view = DashboardView::default();
        view.project_in(&snapshot(10.0, "dry", "OFF"), &Utc);

        assert_eq!(view.status_card.modifier, None);
    }

    #[test]
    fn test_pump_button_labels() {
        let mut view = DashboardView::default();

        view.project_in(&snapshot(20.0, "Dry", "ON"), &Utc);
        assert_eq!(view.water_button.label, STOP_LABEL);
        assert_eq!(view.water_button.css_class(), "water-button watering");

        view.project_in(&snapshot(20.0, "Dry", "OFF"), &Utc);
        assert_eq!(view.water_button.label, WATER_LABEL);
        assert_eq!(view.water_button.css_class(), "water-button");
    }

    #[test]
    fn test_projection_idempotent() {
        let reading = snapshot(63.0, "Wet", "ON");
        let mut once = DashboardView::default();
        once.project_in(&reading, &Utc);

        let mut twice = once.clone();
        twice.project_in(&reading, &Utc);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_out_of_range_timestamp() {
        assert_eq!(format_timestamp(i64::MAX, &Utc), "Invalid Date");
    }
}
