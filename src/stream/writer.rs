//! Writes rencode values to an async byte stream.

use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::codec::encode_value;
use crate::error::RencodeError;
use crate::types::Value;

/// Writes rencode values to an `AsyncWrite` stream.
///
/// Each value is encoded in full before any of it is written, so an encode
/// error never leaves a partial value on the stream.
pub struct ValueWriter<W> {
    writer: W,
    scratch: BytesMut,
}

impl<W: AsyncWrite + Unpin> ValueWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            scratch: BytesMut::new(),
        }
    }

    /// Encodes and writes one value.
    pub async fn write_value(&mut self, value: &Value) -> Result<(), RencodeError> {
        self.scratch.clear();
        encode_value(&mut self.scratch, value)?;
        self.writer.write_all(&self.scratch).await?;
        tracing::trace!(len = self.scratch.len(), "wrote rencode value");
        Ok(())
    }

    /// Flushes the underlying writer.
    pub async fn flush(&mut self) -> Result<(), RencodeError> {
        self.writer.flush().await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
