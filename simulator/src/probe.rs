use crate::telemetry::SoilData;
use rand::Rng;

pub const DRY_BELOW: f64 = 30.0;
pub const WET_ABOVE: f64 = 70.0;

const WATERING_GAIN: f64 = 4.0;
const DRYING_LOSS: f64 = 1.5;

pub fn soil_status(moisture: f64) -> &'static str {
    if moisture < DRY_BELOW {
        "Dry"
    } else if moisture > WET_ABOVE {
        "Wet"
    } else {
        "Normal"
    }
}

/// Simulated soil probe driving a water pump.
#[derive(Debug, Clone)]
pub struct Probe {
    moisture: f64,
    pump_on: bool,
    auto: bool,
    pending_override: Option<bool>,
}

impl Probe {
    pub fn new(moisture: f64, auto: bool) -> Self {
        Self {
            moisture: moisture.clamp(0.0, 100.0),
            pump_on: false,
            auto,
            pending_override: None,
        }
    }

    pub fn moisture(&self) -> f64 {
        self.moisture
    }

    pub fn pump_on(&self) -> bool {
        self.pump_on
    }

    /// Queues a manual override, applied on the next tick. Anything other
    /// than "ON" or "OFF" is ignored.
    pub fn request_override(&mut self, value: &str) -> bool {
        match value.trim() {
            "ON" => self.pending_override = Some(true),
            "OFF" => self.pending_override = Some(false),
            _ => return false,
        }
        true
    }

    /// Advances one reading interval. `jitter` is added to the drying loss.
    pub fn tick(&mut self, jitter: f64) {
        if let Some(on) = self.pending_override.take() {
            self.pump_on = on;
        } else if self.auto {
            if self.moisture < DRY_BELOW {
                self.pump_on = true;
            } else if self.moisture > WET_ABOVE {
                self.pump_on = false;
            }
        }

        let delta = if self.pump_on {
            WATERING_GAIN
        } else {
            -(DRYING_LOSS + jitter)
        };
        self.moisture = (self.moisture + delta).clamp(0.0, 100.0);
    }

    pub fn tick_random(&mut self, rng: &mut impl Rng) {
        let jitter = rng.gen_range(-0.5..0.5);
        self.tick(jitter);
    }

    pub fn reading(&self, timestamp: i64) -> SoilData {
        // Whole percentages, like a real ADC-backed probe
        let moisture = self.moisture.round();
        SoilData {
            moisture,
            status: soil_status(moisture).to_string(),
            pump: if self.pump_on { "ON" } else { "OFF" }.to_string(),
            timestamp,
        }
    }
}
