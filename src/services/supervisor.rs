use crate::cancel::CancelSlot;
use crate::messages::{RecorderEvent, SessionOutcome};
use crate::services::session::{Session, SessionParams};
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Runs recording sessions back to back, forever
///
/// This service:
/// - Installs a fresh cancellation token in the shared slot before each session
/// - Restarts immediately after EOF or rotation (the file name is recomputed)
/// - Waits `retry_delay` after a failed session before reconnecting
///
/// Session errors are logged and never end the loop.
pub struct Supervisor {
    params: SessionParams,
    slot: CancelSlot,
    retry_delay: Duration,
    events: Option<mpsc::UnboundedSender<RecorderEvent>>,
}

impl Supervisor {
    pub fn new(params: SessionParams, slot: CancelSlot, retry_delay: Duration) -> Self {
        Self {
            params,
            slot,
            retry_delay,
            events: None,
        }
    }

    /// Report progress on `events` as sessions start and end.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<RecorderEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub async fn run(self) {
        let mut attempt = 0u64;

        loop {
            attempt += 1;
            let token = self.slot.install();
            tracing::debug!("Session {} starting", attempt);
            self.emit(RecorderEvent::SessionStarted { attempt });

            match Session::new(&self.params, token).run().await {
                Ok(outcome) => {
                    let verb = match outcome {
                        SessionOutcome::Eof { .. } => "Source closed",
                        SessionOutcome::Rotated { .. } => "Rotated",
                    };
                    tracing::debug!(
                        "{} after writing {} bytes to {}",
                        verb,
                        outcome.bytes(),
                        outcome.path().display()
                    );
                    self.emit(RecorderEvent::SessionEnded { attempt, outcome });
                }
                Err(e) => {
                    tracing::error!("record got error=[{}]", e);
                    self.emit(RecorderEvent::SessionFailed {
                        attempt,
                        error: e.to_string(),
                    });
                    self.emit(RecorderEvent::RetryScheduled {
                        delay: self.retry_delay,
                    });
                    tokio::time::sleep(self.retry_delay).await;
                }
            }

            tracing::info!("Restarting");
        }
    }

    fn emit(&self, event: RecorderEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}
