//! Live soil-moisture dashboard with a manual pump override.
//!
//! Telemetry arrives as whole snapshots of the `soilData` document, is
//! projected onto a [`view::DashboardView`] and a rolling
//! [`chart::ChartWindow`], and button presses are turned into a single
//! best-effort write to `soilData/manualPump`.

pub mod api;
pub mod chart;
pub mod command;
pub mod controller;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod store;
pub mod subscriber;
pub mod validate;
pub mod view;
