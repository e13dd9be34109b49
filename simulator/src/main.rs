mod overrides;
mod probe;
mod telemetry;

use chrono::Utc;
use clap::Parser;
use probe::Probe;
use rumqttc::{AsyncClient, MqttOptions, QoS};
use std::time::Duration;
use telemetry::SOIL_DATA_TOPIC;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "simulator", about = "Simulated soil probe publishing soilData")]
struct Args {
    #[arg(long, env = "MQTT_BROKER", default_value = "localhost")]
    broker: String,

    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    port: u16,

    /// Milliseconds between readings
    #[arg(long, env = "INTERVAL_MS", default_value_t = 5000)]
    interval_ms: u64,

    #[arg(long, env = "INITIAL_MOISTURE", default_value_t = 45.0)]
    initial_moisture: f64,

    /// Switch the pump on when dry and off when wet
    #[arg(long, env = "AUTO_PUMP")]
    auto: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting soil probe simulator");
    info!(
        "Broker: {}:{}, Interval: {}ms, Auto pump: {}",
        args.broker, args.port, args.interval_ms, args.auto
    );

    let client_id = format!("probe-{}", uuid::Uuid::new_v4());

    let mut mqtt_options = MqttOptions::new(&client_id, &args.broker, args.port);
    mqtt_options.set_keep_alive(Duration::from_secs(30));
    mqtt_options.set_clean_session(false);

    let (client, eventloop) = AsyncClient::new(mqtt_options, 100);

    let (override_tx, mut override_rx) = mpsc::channel::<String>(16);

    // Spawn eventloop handler; it subscribes to overrides on every fresh session
    tokio::spawn(overrides::run_override_listener(
        client.clone(),
        eventloop,
        override_tx,
    ));

    let mut probe = Probe::new(args.initial_moisture, args.auto);
    let mut rng = rand::thread_rng();
    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms));
    let mut published = 0u64;

    loop {
        tokio::select! {
            Some(value) = override_rx.recv() => {
                if probe.request_override(&value) {
                    info!("Manual pump override received: {}", value.trim());
                } else {
                    warn!("Ignoring unknown pump override {:?}", value);
                }
            }

            _ = ticker.tick() => {
                probe.tick_random(&mut rng);
                let reading = probe.reading(Utc::now().timestamp());

                let payload = match serde_json::to_string(&reading) {
                    Ok(p) => p,
                    Err(e) => {
                        error!("Failed to serialize reading: {}", e);
                        continue;
                    }
                };

                // Retained so a dashboard gets the current value on attach
                match client.publish(SOIL_DATA_TOPIC, QoS::AtLeastOnce, true, payload).await {
                    Ok(_) => {
                        published += 1;
                        info!(
                            "Reading {}: moisture {}% ({}), pump {}",
                            published, reading.moisture, reading.status, reading.pump
                        );
                    }
                    Err(e) => {
                        warn!("Failed to publish: {}", e);
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }
}
