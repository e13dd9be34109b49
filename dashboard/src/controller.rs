use crate::chart::{ChartPoint, ChartWindow};
use crate::command::CommandIssuer;
use crate::errors::Result;
use crate::metrics::CHART_POINTS;
use crate::model::{PumpState, TelemetrySnapshot};
use crate::store::CommandSink;
use crate::view::DashboardView;
use chrono::Local;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A press of the water button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaterPress;

/// Where the projected view ends up.
pub trait Surface: Send {
    fn render(&mut self, view: &DashboardView, chart: &ChartWindow);
}

impl<A: Surface, B: Surface> Surface for (A, B) {
    fn render(&mut self, view: &DashboardView, chart: &ChartWindow) {
        self.0.render(view, chart);
        self.1.render(view, chart);
    }
}

/// Serializable copy of everything on screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardState {
    pub view: DashboardView,
    pub status_card_class: String,
    pub water_button_class: String,
    pub chart: Vec<ChartPoint>,
    pub redraws: u64,
}

impl DashboardState {
    pub fn capture(view: &DashboardView, chart: &ChartWindow) -> Self {
        Self {
            view: view.clone(),
            status_card_class: view.status_card.css_class(),
            water_button_class: view.water_button.css_class(),
            chart: chart.iter().cloned().collect(),
            redraws: chart.redraws(),
        }
    }
}

/// Publishes each render on a watch channel for the HTTP API.
pub struct WatchSurface {
    tx: watch::Sender<DashboardState>,
}

impl WatchSurface {
    pub fn new() -> (Self, watch::Receiver<DashboardState>) {
        let initial = DashboardState::capture(&DashboardView::default(), &ChartWindow::default());
        let (tx, rx) = watch::channel(initial);
        (Self { tx }, rx)
    }
}

impl Surface for WatchSurface {
    fn render(&mut self, view: &DashboardView, chart: &ChartWindow) {
        self.tx.send_replace(DashboardState::capture(view, chart));
    }
}

/// Writes each render to the log.
pub struct LogSurface;

impl Surface for LogSurface {
    fn render(&mut self, view: &DashboardView, chart: &ChartWindow) {
        info!(
            "Moisture {}% | {} | pump {} | {} | [{}] | {}",
            view.moisture,
            view.status,
            view.pump,
            view.timestamp,
            view.water_button.label,
            chart.sparkline()
        );
    }
}

/// Owns all dashboard state and runs it on a single task.
pub struct Dashboard<S, F> {
    view: DashboardView,
    chart: ChartWindow,
    last_snapshot: Option<TelemetrySnapshot>,
    issuer: CommandIssuer<S>,
    surface: F,
}

impl<S: CommandSink, F: Surface> Dashboard<S, F> {
    pub fn new(issuer: CommandIssuer<S>, surface: F) -> Self {
        Self {
            view: DashboardView::default(),
            chart: ChartWindow::default(),
            last_snapshot: None,
            issuer,
            surface,
        }
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn chart(&self) -> &ChartWindow {
        &self.chart
    }

    pub fn last_snapshot(&self) -> Option<&TelemetrySnapshot> {
        self.last_snapshot.as_ref()
    }

    /// Pump state as last reported by the probe. Before the first snapshot
    /// the pump is taken to be off.
    pub fn current_pump(&self) -> PumpState {
        self.last_snapshot
            .as_ref()
            .map(TelemetrySnapshot::pump_state)
            .unwrap_or(PumpState::Off)
    }

    pub fn on_snapshot(&mut self, snapshot: TelemetrySnapshot) {
        debug!("Applying snapshot: {:?}", snapshot);

        self.view.project(&snapshot);
        self.chart
            .push(Local::now().format("%H:%M:%S").to_string(), snapshot.moisture);
        CHART_POINTS.set(self.chart.len() as f64);

        self.last_snapshot = Some(snapshot);
        self.render();
    }

    /// Redraws the surface from current state without changing it.
    pub fn render(&mut self) {
        self.surface.render(&self.view, &self.chart);
    }

    pub fn on_water_pressed(&self) -> JoinHandle<Result<PumpState>> {
        self.issuer.issue(self.current_pump())
    }

    /// Event loop: applies snapshots and button presses one at a time until
    /// the telemetry channel closes.
    pub async fn run(
        mut self,
        mut snapshots: mpsc::Receiver<TelemetrySnapshot>,
        mut presses: mpsc::Receiver<WaterPress>,
    ) {
        info!("Dashboard started");
        self.render();

        loop {
            tokio::select! {
                snapshot = snapshots.recv() => {
                    match snapshot {
                        Some(s) => self.on_snapshot(s),
                        None => {
                            info!("Telemetry channel closed");
                            break;
                        }
                    }
                }

                Some(WaterPress) = presses.recv() => {
                    // Fire and forget, the issuer logs the outcome
                    let _ = self.on_water_pressed();
                }
            }
        }

        info!("Dashboard stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct NullSink;

    impl CommandSink for NullSink {
        async fn write(&self, _path: &str, _value: &str) -> Result<()> {
            Err(Error::CommandWrite("offline".to_string()))
        }
    }

    #[derive(Clone, Default)]
    struct CountingSurface(Arc<Mutex<usize>>);

    impl Surface for CountingSurface {
        fn render(&mut self, _view: &DashboardView, _chart: &ChartWindow) {
            *self.0.lock().unwrap() += 1;
        }
    }

    fn snapshot(moisture: f64, pump: &str) -> TelemetrySnapshot {
        TelemetrySnapshot {
            moisture,
            status: "Normal".to_string(),
            pump: pump.to_string(),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_each_delivery_appends_once() {
        let surface = CountingSurface::default();
        let mut dashboard = Dashboard::new(CommandIssuer::new(NullSink), surface.clone());

        dashboard.on_snapshot(snapshot(40.0, "OFF"));
        dashboard.on_snapshot(snapshot(40.0, "OFF"));

        assert_eq!(dashboard.chart().values(), vec![40.0, 40.0]);
        assert_eq!(dashboard.chart().redraws(), 2);
        assert_eq!(*surface.0.lock().unwrap(), 2);
    }

    #[test]
    fn test_chart_label_is_wall_clock_time() {
        let mut dashboard = Dashboard::new(CommandIssuer::new(NullSink), CountingSurface::default());
        dashboard.on_snapshot(snapshot(40.0, "OFF"));

        let labels = dashboard.chart().labels();
        let label = labels[0];
        assert_eq!(label.len(), 8);
        assert!(chrono::NaiveTime::parse_from_str(label, "%H:%M:%S").is_ok());
    }

    #[test]
    fn test_render_does_not_mutate() {
        let surface = CountingSurface::default();
        let mut dashboard = Dashboard::new(CommandIssuer::new(NullSink), surface.clone());
        dashboard.on_snapshot(snapshot(55.0, "ON"));

        let view = dashboard.view().clone();
        let values = dashboard.chart().values();
        dashboard.render();
        dashboard.render();

        assert_eq!(dashboard.view(), &view);
        assert_eq!(dashboard.chart().values(), values);
        assert_eq!(dashboard.chart().redraws(), 1);
        assert_eq!(*surface.0.lock().unwrap(), 3);
    }

    #[test]
    fn test_current_pump_tracks_snapshots() {
        let mut dashboard = Dashboard::new(CommandIssuer::new(NullSink), CountingSurface::default());
        assert_eq!(dashboard.current_pump(), PumpState::Off);

        dashboard.on_snapshot(snapshot(20.0, "ON"));
        assert_eq!(dashboard.current_pump(), PumpState::On);

        dashboard.on_snapshot(snapshot(80.0, "OFF"));
        assert_eq!(dashboard.current_pump(), PumpState::Off);
    }

    #[test]
    fn test_watch_surface_publishes() {
        let (watch_surface, rx) = WatchSurface::new();
        let mut dashboard = Dashboard::new(CommandIssuer::new(NullSink), watch_surface);
        assert_eq!(rx.borrow().view.moisture, "--");

        dashboard.on_snapshot(snapshot(12.0, "ON"));

        let state = rx.borrow();
        assert_eq!(state.view.moisture, "12");
        assert_eq!(state.water_button_class, "water-button watering");
        assert_eq!(state.chart.len(), 1);
    }
}
