use crate::output::Sink;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// How a copy that did not fail came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Copied {
    /// The source closed the stream.
    Eof { bytes: u64 },
    /// The token was cancelled; `bytes` were written before that.
    Cancelled { bytes: u64 },
}

impl Copied {
    pub fn bytes(&self) -> u64 {
        match self {
            Copied::Eof { bytes } | Copied::Cancelled { bytes } => *bytes,
        }
    }
}

/// Copy `reader` into `sink` until EOF, an I/O error, or cancellation.
///
/// The token is checked before every write. A chunk that was read but not
/// yet written when cancellation is observed is dropped. Waiting on an idle
/// source also ends as soon as the token is cancelled; no bytes are consumed
/// from the source in that case.
pub async fn copy_until_cancelled<R, S>(
    reader: &mut R,
    sink: &mut S,
    token: &CancellationToken,
    buffer_size: usize,
) -> io::Result<Copied>
where
    R: AsyncRead + Unpin + ?Sized,
    S: Sink + ?Sized,
{
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut bytes = 0u64;

    loop {
        let n = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Cancelled while waiting for source data");
                return Ok(Copied::Cancelled { bytes });
            }
            read = reader.read(&mut buf) => read?,
        };

        if n == 0 {
            return Ok(Copied::Eof { bytes });
        }

        if token.is_cancelled() {
            tracing::info!("Writer is about to stop (rotation requested), dropping {} bytes", n);
            return Ok(Copied::Cancelled { bytes });
        }

        sink.write_chunk(&buf[..n]).await?;
        bytes += n as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, ReadBuf};

    #[derive(Default)]
    struct VecSink {
        data: Vec<u8>,
        fail: bool,
    }

    #[async_trait]
    impl Sink for VecSink {
        async fn write_chunk(&mut self, bytes: &[u8]) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::other("disk full"));
            }
            self.data.extend_from_slice(bytes);
            Ok(())
        }

        async fn finalize(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Hands out its data in one read and cancels the token at the same time.
    struct CancelOnRead {
        data: &'static [u8],
        token: CancellationToken,
    }

    impl AsyncRead for CancelOnRead {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let data = self.data;
            buf.put_slice(data);
            self.data = &[];
            self.token.cancel();
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_copies_until_eof() {
        let (mut tx, mut rx) = tokio::io::duplex(64);
        let token = CancellationToken::new();
        let mut sink = VecSink::default();

        let writer = tokio::spawn(async move {
            for line in ["MSG,3,1\n", "MSG,4,1\n", "MSG,8,1\n"] {
                tx.write_all(line.as_bytes()).await.unwrap();
            }
        });

        let copied = copy_until_cancelled(&mut rx, &mut sink, &token, 4)
            .await
            .unwrap();
        writer.await.unwrap();

        assert_eq!(copied, Copied::Eof { bytes: 24 });
        assert_eq!(sink.data, b"MSG,3,1\nMSG,4,1\nMSG,8,1\n");
    }

    #[tokio::test]
    async fn test_cancelled_chunk_is_not_written() {
        let token = CancellationToken::new();
        let mut reader = CancelOnRead {
            data: b"pending",
            token: token.clone(),
        };
        let mut sink = VecSink::default();

        let copied = copy_until_cancelled(&mut reader, &mut sink, &token, 64)
            .await
            .unwrap();

        assert_eq!(copied, Copied::Cancelled { bytes: 0 });
        assert!(sink.data.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_idle_source() {
        let (mut tx, mut rx) = tokio::io::duplex(64);
        let token = CancellationToken::new();

        let handle = {
            let token = token.clone();
            tokio::spawn(async move {
                let mut sink = VecSink::default();
                let copied = copy_until_cancelled(&mut rx, &mut sink, &token, 64).await;
                (copied, sink.data)
            })
        };

        tx.write_all(b"before\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        let (copied, data) = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(copied.unwrap(), Copied::Cancelled { bytes: 7 });
        assert_eq!(data, b"before\n");
        drop(tx);
    }

    #[tokio::test]
    async fn test_sink_error_is_reported() {
        let (mut tx, mut rx) = tokio::io::duplex(64);
        tx.write_all(b"data").await.unwrap();
        drop(tx);

        let token = CancellationToken::new();
        let mut sink = VecSink {
            fail: true,
            ..Default::default()
        };

        let err = copy_until_cancelled(&mut rx, &mut sink, &token, 64)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
    }
}
