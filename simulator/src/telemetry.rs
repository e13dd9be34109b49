use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilData {
    pub moisture: f64,
    pub status: String,
    pub pump: String,
    pub timestamp: i64,
}

pub const SOIL_DATA_TOPIC: &str = "soilData";
pub const MANUAL_PUMP_TOPIC: &str = "soilData/manualPump";
