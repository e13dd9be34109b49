use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref SNAPSHOTS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_snapshots_total",
        "Total telemetry snapshots delivered to the dashboard"
    ))
    .unwrap();
    pub static ref SKIPPED_SNAPSHOTS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_skipped_snapshots_total",
        "Total snapshots skipped as absent, malformed or invalid"
    ))
    .unwrap();
    pub static ref SUBSCRIPTION_ERRORS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_subscription_errors_total",
        "Total connection errors reported by the telemetry subscription"
    ))
    .unwrap();
    pub static ref COMMANDS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_commands_total",
        "Total manual pump overrides requested"
    ))
    .unwrap();
    pub static ref COMMAND_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_command_failures_total",
        "Total manual pump override writes that failed"
    ))
    .unwrap();
    pub static ref CHART_POINTS: Gauge = Gauge::with_opts(Opts::new(
        "dashboard_chart_points",
        "Points currently held in the moisture chart window"
    ))
    .unwrap();
}

pub fn init_metrics() {
    REGISTRY.register(Box::new(SNAPSHOTS_TOTAL.clone())).unwrap();
    REGISTRY
        .register(Box::new(SKIPPED_SNAPSHOTS_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(SUBSCRIPTION_ERRORS_TOTAL.clone()))
        .unwrap();
    REGISTRY.register(Box::new(COMMANDS_TOTAL.clone())).unwrap();
    REGISTRY
        .register(Box::new(COMMAND_FAILURES_TOTAL.clone()))
        .unwrap();
    REGISTRY.register(Box::new(CHART_POINTS.clone())).unwrap();
}

pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
