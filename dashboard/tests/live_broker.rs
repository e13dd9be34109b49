use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use soil_dashboard::command::CommandIssuer;
use soil_dashboard::model::{PumpState, MANUAL_PUMP_PATH, SOIL_DATA_PATH};
use soil_dashboard::store::{self, StoreConfig};
use soil_dashboard::subscriber;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Requires a broker on localhost:1883.
#[tokio::test]
#[ignore]
async fn test_round_trip_against_local_broker() {
    let mut probe_options = MqttOptions::new("live-test-probe", "localhost", 1883);
    probe_options.set_keep_alive(Duration::from_secs(30));
    let (probe, mut probe_events) = AsyncClient::new(probe_options, 100);

    probe
        .subscribe(MANUAL_PUMP_PATH, QoS::AtLeastOnce)
        .await
        .unwrap();
    probe
        .publish(
            SOIL_DATA_PATH,
            QoS::AtLeastOnce,
            true,
            r#"{"moisture":27,"status":"Dry","pump":"OFF","timestamp":1700000000}"#,
        )
        .await
        .unwrap();

    let (override_tx, mut override_rx) = mpsc::channel(4);
    tokio::spawn(async move {
        while let Ok(event) = probe_events.poll().await {
            if let Event::Incoming(Packet::Publish(publish)) = event {
                if publish.topic == MANUAL_PUMP_PATH {
                    let _ = override_tx.send(publish.payload.to_vec()).await;
                }
            }
        }
    });

    // Give the retained publish time to land
    tokio::time::sleep(Duration::from_millis(500)).await;

    let (store, eventloop) = store::connect(&StoreConfig::new("localhost", 1883));
    let (tx, mut rx) = mpsc::channel(4);
    let subscription = subscriber::spawn(store.clone(), eventloop, tx);

    let snapshot = timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no retained snapshot delivered")
        .unwrap();
    assert_eq!(snapshot.moisture, 27.0);
    assert_eq!(snapshot.pump_state(), PumpState::Off);

    let issuer = CommandIssuer::new(store);
    let requested = issuer.issue(snapshot.pump_state()).await.unwrap().unwrap();
    assert_eq!(requested, PumpState::On);

    let payload = timeout(Duration::from_secs(5), override_rx.recv())
        .await
        .expect("override never reached the probe")
        .unwrap();
    assert_eq!(payload, b"ON");

    subscription.cancel();
}
