use crate::errors::{Error, Result};
use crate::model::SOIL_DATA_PATH;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use std::future::Future;
use std::time::Duration;
use tracing::info;

const REQUEST_CAPACITY: usize = 100;

/// Connection parameters for the backing store, fixed at startup.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
}

impl StoreConfig {
    pub fn new(broker: impl Into<String>, port: u16) -> Self {
        Self {
            broker: broker.into(),
            port,
            client_id: format!("dashboard-{}", uuid::Uuid::new_v4()),
            keep_alive_secs: 30,
        }
    }
}

/// Destination for best-effort writes to a store path.
pub trait CommandSink: Send + Sync + 'static {
    fn write(&self, path: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone)]
pub struct MqttStore {
    client: AsyncClient,
}

impl CommandSink for MqttStore {
    fn write(&self, path: &str, value: &str) -> impl Future<Output = Result<()>> + Send {
        let client = self.client.clone();
        let topic = path.to_string();
        let payload = value.as_bytes().to_vec();

        async move {
            // Retained so a probe that reconnects still sees the last override
            client
                .publish(topic, QoS::AtLeastOnce, true, payload)
                .await
                .map_err(|e| Error::CommandWrite(e.to_string()))
        }
    }
}

impl MqttStore {
    /// Queues the exact-path subscription to the telemetry document.
    pub fn subscribe_telemetry(&self) -> Result<()> {
        // Exact path: our own manual override writes must not come back to us
        self.client
            .try_subscribe(SOIL_DATA_PATH, QoS::AtLeastOnce)
            .map_err(Error::Mqtt)?;

        info!("Subscribed to {} with QoS 1", SOIL_DATA_PATH);
        Ok(())
    }
}

/// Builds the store connection. Nothing goes over the wire until the
/// returned event loop is polled; the telemetry subscription is made by the
/// subscriber each time the broker reports a fresh session.
pub fn connect(config: &StoreConfig) -> (MqttStore, EventLoop) {
    info!(
        "Connecting to MQTT broker at {}:{}",
        config.broker, config.port
    );

    let mut mqtt_options = MqttOptions::new(&config.client_id, &config.broker, config.port);
    mqtt_options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));
    mqtt_options.set_clean_session(false);

    let (client, eventloop) = AsyncClient::new(mqtt_options, REQUEST_CAPACITY);

    (MqttStore { client }, eventloop)
}
