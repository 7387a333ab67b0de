use crate::copy::{Copied, copy_until_cancelled};
use crate::error::SessionError;
use crate::messages::{SessionOutcome, SessionState};
use crate::naming::{self, SplitAt};
use crate::output::{FileSink, Sink};
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

/// Everything a session needs to know about where to read and write
#[derive(Clone, Debug)]
pub struct SessionParams {
    pub source: String,
    pub prefix: String,
    pub split_at: SplitAt,
    pub output_dir: PathBuf,
    pub buffer_size: usize,
}

impl SessionParams {
    /// Output path for data arriving now
    pub fn current_path(&self) -> PathBuf {
        let name = naming::file_name(&self.prefix, self.split_at, &Local::now());
        self.output_dir.join(name)
    }
}

/// One connect → stream → close cycle against the source
///
/// There is no retry in here; the supervisor decides what happens next.
pub struct Session<'a> {
    params: &'a SessionParams,
    token: CancellationToken,
    state: SessionState,
}

impl<'a> Session<'a> {
    pub fn new(params: &'a SessionParams, token: CancellationToken) -> Self {
        Self {
            params,
            token,
            state: SessionState::Connecting,
        }
    }

    pub async fn run(mut self) -> Result<SessionOutcome, SessionError> {
        let result = self.record().await;
        self.enter(SessionState::Closed);
        result
    }

    fn enter(&mut self, state: SessionState) {
        tracing::debug!("Session {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    async fn record(&mut self) -> Result<SessionOutcome, SessionError> {
        let mut stream = TcpStream::connect(&self.params.source)
            .await
            .map_err(|source| SessionError::Connect {
                addr: self.params.source.clone(),
                source,
            })?;
        tracing::info!("Connected to {}", self.params.source);

        let path = self.params.current_path();
        tracing::info!("file name = {}", path.display());
        let mut sink = open_sink(&path).await?;

        self.enter(SessionState::Streaming);
        let copied = copy_until_cancelled(
            &mut stream,
            &mut sink,
            &self.token,
            self.params.buffer_size,
        )
        .await;

        // Both ends are released whatever the copy returned.
        let finalized = sink.finalize().await;
        if let Err(e) = stream.shutdown().await {
            tracing::debug!("Source shutdown failed: {}", e);
        }

        let copied = copied.map_err(SessionError::Transfer)?;
        finalized.map_err(SessionError::Transfer)?;

        Ok(match copied {
            Copied::Eof { bytes } => {
                tracing::info!("EOF received ({} bytes are transferred)", bytes);
                SessionOutcome::Eof { path, bytes }
            }
            Copied::Cancelled { bytes } => {
                tracing::info!("Rotation requested ({} bytes are transferred)", bytes);
                SessionOutcome::Rotated { path, bytes }
            }
        })
    }
}

async fn open_sink(path: &Path) -> Result<FileSink, SessionError> {
    FileSink::open(path)
        .await
        .map_err(|source| SessionError::SinkOpen {
            path: path.to_path_buf(),
            source,
        })
}
