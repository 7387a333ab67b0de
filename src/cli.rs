use std::path::PathBuf;

use clap::Parser;

/// Record a TCP byte stream into daily-rotated files.
///
/// Flags left unset fall back to the `--config` file, then to built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "streamsplit", version)]
pub struct Args {
    /// Source address host:port [default: 127.0.0.1:30003]
    #[arg(long)]
    pub source: Option<String>,

    /// Prefix of the output file names [default: adsb]
    #[arg(long)]
    pub prefix: Option<String>,

    /// Time of day (HH:MM) at which to start a new file [default: 00:00]
    #[arg(long)]
    pub split_at: Option<String>,

    /// Directory the output files are written to [default: .]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Delay before reconnecting after a failed session, in milliseconds [default: 1000]
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Read buffer size in bytes [default: 32768]
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
