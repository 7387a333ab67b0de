use crate::cli::Args;
use crate::copy::DEFAULT_BUFFER_SIZE;
use crate::naming::SplitAt;
use crate::services::SessionParams;
use crate::services::supervisor::DEFAULT_RETRY_DELAY;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_source")]
    pub source: String,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_split_at")]
    pub split_at: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_source() -> String {
    "127.0.0.1:30003".to_string()
}

fn default_prefix() -> String {
    "adsb".to_string()
}

fn default_split_at() -> String {
    "00:00".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY.as_millis() as u64
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: default_source(),
            prefix: default_prefix(),
            split_at: default_split_at(),
            output_dir: default_output_dir(),
            retry_delay_ms: default_retry_delay_ms(),
            buffer_size: default_buffer_size(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Defaults, then the `--config` file if given, then explicit flags
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(source) = &args.source {
            config.source = source.clone();
        }
        if let Some(prefix) = &args.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(split_at) = &args.split_at {
            config.split_at = split_at.clone();
        }
        if let Some(output_dir) = &args.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(retry_delay_ms) = args.retry_delay_ms {
            config.retry_delay_ms = retry_delay_ms;
        }
        if let Some(buffer_size) = args.buffer_size {
            config.buffer_size = buffer_size;
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.source.is_empty() {
            return Err(anyhow::anyhow!("source cannot be empty"));
        }

        if self.prefix.is_empty() {
            return Err(anyhow::anyhow!("prefix cannot be empty"));
        }

        if self.buffer_size == 0 {
            return Err(anyhow::anyhow!("buffer_size must be greater than zero"));
        }

        self.parsed_split_at()?;

        Ok(())
    }

    pub fn parsed_split_at(&self) -> Result<SplitAt> {
        self.split_at
            .parse::<SplitAt>()
            .with_context(|| format!("Invalid split-at {:?}", self.split_at))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn session_params(&self) -> Result<SessionParams> {
        Ok(SessionParams {
            source: self.source.clone(),
            prefix: self.prefix.clone(),
            split_at: self.parsed_split_at()?,
            output_dir: self.output_dir.clone(),
            buffer_size: self.buffer_size,
        })
    }
}
