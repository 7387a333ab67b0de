use async_trait::async_trait;
use std::io;

/// Destination for recorded bytes
///
/// Implementations store the chunks they receive verbatim, in order.
/// `finalize` must be called before the sink is dropped so buffered data
/// reaches storage.
#[async_trait]
pub trait Sink: Send {
    /// Append one chunk (called repeatedly while streaming)
    async fn write_chunk(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Flush and release the underlying storage
    async fn finalize(&mut self) -> io::Result<()>;
}
