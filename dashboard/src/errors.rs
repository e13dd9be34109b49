use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Subscription error: {0}")]
    Subscription(#[from] rumqttc::ConnectionError),

    #[error("MQTT client error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    #[error("Command write error: {0}")]
    CommandWrite(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Channel send error")]
    ChannelSend,
}

pub type Result<T> = std::result::Result<T, Error>;
