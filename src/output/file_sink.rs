use super::sink::Sink;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Append-only output file
///
/// Opening never truncates, so a restart inside the same rotation period
/// keeps writing after whatever the previous run left in the file.
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
}

impl FileSink {
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        options.mode(0o644);

        let file = options.open(&path).await?;
        tracing::debug!("Opened {:?} for append", path);

        Ok(Self {
            path,
            file: Some(file),
        })
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn write_chunk(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.write_all(bytes).await,
            None => Err(io::Error::other(format!(
                "{:?} already finalized",
                self.path
            ))),
        }
    }

    async fn finalize(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_data().await?;
            tracing::debug!("Closed {:?}", self.path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adsb-2020-10-10T0900.csv");

        let mut sink = FileSink::open(&path).await.unwrap();
        sink.write_chunk(b"MSG,1\n").await.unwrap();
        sink.finalize().await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"MSG,1\n");
    }

    #[tokio::test]
    async fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adsb-2020-10-10T0900.csv");

        let mut first = FileSink::open(&path).await.unwrap();
        first.write_chunk(b"first run\n").await.unwrap();
        first.finalize().await.unwrap();

        let mut second = FileSink::open(&path).await.unwrap();
        second.write_chunk(b"second run\n").await.unwrap();
        second.finalize().await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"first run\nsecond run\n");
    }

    #[tokio::test]
    async fn test_open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("adsb.csv");

        assert!(FileSink::open(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_write_after_finalize_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::open(dir.path().join("a.csv")).await.unwrap();
        sink.finalize().await.unwrap();
        sink.finalize().await.unwrap();

        assert!(sink.write_chunk(b"late").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_new_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        let mut sink = FileSink::open(&path).await.unwrap();
        sink.finalize().await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        // umask may clear bits but never adds them
        assert_eq!(mode & 0o777 & !0o644, 0);
    }
}
