use crate::errors::Result;
use crate::metrics::{COMMANDS_TOTAL, COMMAND_FAILURES_TOTAL};
use crate::model::{PumpState, MANUAL_PUMP_PATH};
use crate::store::CommandSink;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Requests pump transitions upstream. It never changes what the dashboard
/// shows; the next snapshot from the probe does that.
pub struct CommandIssuer<S> {
    sink: Arc<S>,
}

impl<S: CommandSink> CommandIssuer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Writes the opposite of `current` to the manual override path.
    ///
    /// The write runs as its own task and is attempted exactly once. The
    /// handle resolves with the requested state, and it may be dropped.
    pub fn issue(&self, current: PumpState) -> JoinHandle<Result<PumpState>> {
        let requested = current.toggled();
        let sink = Arc::clone(&self.sink);
        COMMANDS_TOTAL.inc();

        info!(
            "Requesting manual pump override: {} -> {}",
            current, requested
        );

        tokio::spawn(async move {
            match sink.write(MANUAL_PUMP_PATH, requested.as_str()).await {
                Ok(()) => {
                    info!("Manual pump override set to: {}", requested);
                    Ok(requested)
                }
                Err(e) => {
                    COMMAND_FAILURES_TOTAL.inc();
                    error!("Error updating pump status: {}", e);
                    Err(e)
                }
            }
        })
    }
}
