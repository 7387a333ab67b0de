use crate::cancel::CancelSlot;
use crate::config::Config;
use crate::naming::SplitAt;
use crate::schedule::RotationClock;
use crate::services::{SessionParams, Supervisor};

use anyhow::{Context, Result};

pub struct App {
    config: Config,
    split_at: SplitAt,
    params: SessionParams,
    slot: CancelSlot,
}

impl App {
    /// Fails if the rotation time cannot be scheduled.
    pub fn new(config: Config) -> Result<Self> {
        let split_at = config
            .parsed_split_at()
            .context("Failed to schedule file rotation")?;
        let params = config.session_params()?;

        Ok(Self {
            config,
            split_at,
            params,
            slot: CancelSlot::new(),
        })
    }

    /// Record until Ctrl+C.
    pub async fn run(self) -> Result<()> {
        let _clock = RotationClock::spawn(self.split_at, self.slot.clone());

        tracing::info!(
            "Recording {} into {}/{}-*.csv, new file every day at {}",
            self.params.source,
            self.params.output_dir.display(),
            self.params.prefix,
            self.split_at
        );

        let supervisor = Supervisor::new(self.params, self.slot, self.config.retry_delay());
        let mut recording = tokio::spawn(supervisor.run());

        tokio::select! {
            result = &mut recording => {
                Err(anyhow::anyhow!("Recorder stopped unexpectedly: {:?}", result))
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl+C")?;
                tracing::info!("Received Ctrl+C, shutting down");
                recording.abort();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_split_at_is_fatal() {
        let config = Config {
            split_at: "noon".to_string(),
            ..Config::default()
        };

        let err = App::new(config).err().unwrap();
        assert!(err.to_string().contains("Failed to schedule file rotation"));
    }

    #[test]
    fn test_new_with_defaults() {
        assert!(App::new(Config::default()).is_ok());
    }
}
