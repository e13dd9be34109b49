use axum::{routing::get, Router};
use clap::Parser;
use soil_dashboard::command::CommandIssuer;
use soil_dashboard::controller::{Dashboard, LogSurface, WatchSurface};
use soil_dashboard::store::{self, StoreConfig};
use soil_dashboard::{api, metrics, subscriber};
use tokio::sync::mpsc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "soil-dashboard", about = "Live soil-moisture dashboard with manual pump override")]
struct Args {
    /// MQTT broker host carrying the soilData document
    #[arg(long, env = "MQTT_BROKER", default_value = "localhost")]
    broker: String,

    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    port: u16,

    /// Address for the dashboard HTTP API
    #[arg(long, env = "HTTP_ADDR", default_value = "0.0.0.0:8080")]
    http_addr: String,

    /// MQTT client id; a random one is generated when omitted
    #[arg(long, env = "CLIENT_ID")]
    client_id: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Initializing soil moisture dashboard");
    info!("MQTT broker: {}:{}", args.broker, args.port);
    info!("HTTP server: {}", args.http_addr);

    metrics::init_metrics();

    let mut config = StoreConfig::new(args.broker, args.port);
    if let Some(client_id) = args.client_id {
        config.client_id = client_id;
    }

    let (store, eventloop) = store::connect(&config);

    let (snapshot_tx, snapshot_rx) = mpsc::channel(64);
    let (press_tx, press_rx) = mpsc::channel(8);

    let subscription = subscriber::spawn(store.clone(), eventloop, snapshot_tx);

    let (watch_surface, state_rx) = WatchSurface::new();
    let dashboard = Dashboard::new(CommandIssuer::new(store), (watch_surface, LogSurface));
    let dashboard_handle = tokio::spawn(dashboard.run(snapshot_rx, press_rx));

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(api::create_router(state_rx, press_tx));

    let listener = tokio::net::TcpListener::bind(&args.http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", args.http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", args.http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    info!("Dashboard initialized");

    tokio::select! {
        _ = dashboard_handle => {
            error!("Dashboard task terminated");
        }
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    subscription.cancel();
    info!("Shutting down");
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}
