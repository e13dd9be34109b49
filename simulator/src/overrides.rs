use crate::telemetry::MANUAL_PUMP_TOPIC;
use rumqttc::{AsyncClient, Event, EventLoop, Packet, QoS};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Drives the probe's event loop and forwards manual pump overrides to `tx`.
/// Returns once `tx` is closed.
pub async fn run_override_listener(
    client: AsyncClient,
    mut eventloop: EventLoop,
    tx: mpsc::Sender<String>,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                // Subscriptions are not replayed by rumqttc on reconnect
                if connack.session_present {
                    debug!("Broker resumed session");
                } else if let Err(e) = client.try_subscribe(MANUAL_PUMP_TOPIC, QoS::AtLeastOnce) {
                    error!("Failed to subscribe to {}: {}", MANUAL_PUMP_TOPIC, e);
                } else {
                    info!("Subscribed to {}", MANUAL_PUMP_TOPIC);
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if publish.topic != MANUAL_PUMP_TOPIC {
                    continue;
                }
                let value = String::from_utf8_lossy(&publish.payload).into_owned();
                if tx.send(value).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT eventloop error: {}", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
