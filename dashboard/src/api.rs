use crate::controller::{DashboardState, WaterPress};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

#[derive(Debug, Clone)]
struct AppState {
    dashboard: watch::Receiver<DashboardState>,
    presses: mpsc::Sender<WaterPress>,
}

pub fn create_router(
    dashboard: watch::Receiver<DashboardState>,
    presses: mpsc::Sender<WaterPress>,
) -> Router {
    let state = AppState { dashboard, presses };

    Router::new()
        .route("/api/v1/dashboard", get(get_dashboard))
        .route("/api/v1/water", post(press_water))
        .with_state(state)
}

async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardState> {
    Json(state.dashboard.borrow().clone())
}

async fn press_water(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.presses.send(WaterPress).await.map_err(|_| {
        AppError(
            StatusCode::SERVICE_UNAVAILABLE,
            anyhow::anyhow!("Dashboard is not running"),
        )
    })?;

    info!("Water button pressed");
    Ok(StatusCode::ACCEPTED)
}

struct AppError(StatusCode, anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("API error: {}", self.1);
        (self.0, format!("{}", self.1)).into_response()
    }
}
