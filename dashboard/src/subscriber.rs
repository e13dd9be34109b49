use crate::errors::{Error, Result};
use crate::metrics::{SKIPPED_SNAPSHOTS_TOTAL, SNAPSHOTS_TOTAL, SUBSCRIPTION_ERRORS_TOTAL};
use crate::model::{decode_snapshot, TelemetrySnapshot, SOIL_DATA_PATH};
use crate::store::MqttStore;
use crate::validate::validate;
use rumqttc::{Event, EventLoop, Packet};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Handle to a running telemetry subscription.
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Drives the store event loop and forwards every change of `soilData`
/// to `tx`, in the order the store delivers them.
pub fn spawn(
    store: MqttStore,
    eventloop: EventLoop,
    tx: mpsc::Sender<TelemetrySnapshot>,
) -> Subscription {
    let handle = tokio::spawn(run_subscription(store, eventloop, tx));
    Subscription { handle }
}

async fn run_subscription(
    store: MqttStore,
    mut eventloop: EventLoop,
    tx: mpsc::Sender<TelemetrySnapshot>,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                // rumqttc does not replay subscriptions; a broker without our
                // session needs them again
                if connack.session_present {
                    debug!("Broker resumed session, subscription kept");
                } else if let Err(e) = store.subscribe_telemetry() {
                    error!("Failed to subscribe to {}: {}", SOIL_DATA_PATH, e);
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if publish.topic != SOIL_DATA_PATH {
                    debug!("Ignoring publish on {}", publish.topic);
                    continue;
                }

                match deliver(&publish.payload, &tx).await {
                    Ok(_) => {}
                    Err(Error::ChannelSend) => {
                        info!("Dashboard stopped, ending telemetry subscription");
                        break;
                    }
                    Err(e) => {
                        warn!("Skipping telemetry update: {}", e);
                        SKIPPED_SNAPSHOTS_TOTAL.inc();
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                SUBSCRIPTION_ERRORS_TOTAL.inc();
                error!("{}", Error::Subscription(e));
                // rumqttc reconnects on the next poll
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}

/// Decodes one payload and hands it to the dashboard. Returns `false` when
/// the value was absent and nothing was delivered.
pub(crate) async fn deliver(payload: &[u8], tx: &mpsc::Sender<TelemetrySnapshot>) -> Result<bool> {
    let Some(snapshot) = decode_snapshot(payload)? else {
        debug!("Telemetry value absent, skipping update");
        SKIPPED_SNAPSHOTS_TOTAL.inc();
        return Ok(false);
    };

    validate(&snapshot)?;

    tx.send(snapshot).await.map_err(|_| Error::ChannelSend)?;
    SNAPSHOTS_TOTAL.inc();
    Ok(true)
}
