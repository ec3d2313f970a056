//! Reads rencode values from an async byte stream.

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::scan::Scanner;
use crate::codec::Decoder;
use crate::error::RencodeError;
use crate::types::Value;

/// Default cap on bytes buffered for a single incomplete value (16 MiB).
pub const DEFAULT_MAX_BUFFERED: usize = 16 * 1024 * 1024;

const READ_CAPACITY: usize = 8 * 1024;

/// Reads self-delimiting rencode values from an `AsyncRead` stream.
///
/// Incoming bytes are scanned for the end of the current value as they arrive;
/// the decoder runs once that value is fully buffered. Whatever follows it stays
/// buffered for the next call.
pub struct ValueReader<R> {
    reader: R,
    buf: BytesMut,
    decoder: Decoder,
    scanner: Scanner,
    max_buffered: usize,
    decode_attempts: u64,
}

impl<R: AsyncRead + Unpin> ValueReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_decoder(reader, Decoder::default())
    }

    pub fn with_decoder(reader: R, decoder: Decoder) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(READ_CAPACITY),
            decoder,
            scanner: Scanner::default(),
            max_buffered: DEFAULT_MAX_BUFFERED,
            decode_attempts: 0,
        }
    }

    /// Sets the maximum number of bytes buffered while a value is incomplete.
    pub fn max_buffered(mut self, limit: usize) -> Self {
        self.max_buffered = limit;
        self
    }

    /// Returns the underlying stream, discarding any buffered bytes.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads the next value.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly between values, and
    /// `UnexpectedEof` when it ends part-way through one.
    pub async fn read_value(&mut self) -> Result<Option<Value>, RencodeError> {
        let max_depth = self.decoder.options().max_depth();

        loop {
            if self.scanner.scan(&self.buf, max_depth) {
                match self.decode_buffered() {
                    Ok(value) => return Ok(Some(value)),
                    // Only reachable on malformed input the scanner let through.
                    Err(e) if e.is_eof() => {}
                    Err(e) => {
                        tracing::debug!(error = %e, "rencode decode error");
                        return Err(e);
                    }
                }
            }

            if self.buf.len() >= self.max_buffered {
                return Err(RencodeError::ResourceExhausted(format!(
                    "incomplete value exceeds {} buffered bytes",
                    self.max_buffered
                )));
            }

            self.buf.reserve(READ_CAPACITY);
            let n = self.reader.read_buf(&mut self.buf).await?;
            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                tracing::debug!(buffered = self.buf.len(), "stream ended mid-value");
                return self.decode_buffered().map(Some);
            }
        }
    }

    fn decode_buffered(&mut self) -> Result<Value, RencodeError> {
        self.decode_attempts += 1;
        let mut cursor = &self.buf[..];
        let value = self.decoder.decode_value(&mut cursor)?;
        let consumed = self.buf.len() - cursor.len();
        self.buf.advance(consumed);
        self.scanner.reset();
        tracing::trace!(consumed, attempts = self.decode_attempts, "decoded rencode value");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{typecode, DecodeOptions};
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn read_consecutive_values_then_clean_eof() {
        let data: &[u8] = &[0x01, typecode::NULL, 0x82, b'h', b'i'];
        let mut reader = ValueReader::new(data);
        assert_eq!(reader.read_value().await.unwrap(), Some(Value::from(1i8)));
        assert_eq!(reader.read_value().await.unwrap(), Some(Value::Null));
        assert_eq!(
            reader.read_value().await.unwrap(),
            Some(Value::Bytes(b"hi".to_vec()))
        );
        assert_eq!(reader.read_value().await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_stream_is_clean_eof() {
        let data: &[u8] = &[];
        let mut reader = ValueReader::new(data);
        assert_eq!(reader.read_value().await.unwrap(), None);
    }

    #[tokio::test]
    async fn truncated_value_is_eof() {
        let data: &[u8] = &[typecode::INT_4, 0x00, 0x01];
        let mut reader = ValueReader::new(data);
        let err = reader.read_value().await.unwrap_err();
        assert!(err.is_eof());
    }

    #[tokio::test]
    async fn invalid_tag_is_reported() {
        let data: &[u8] = &[45];
        let mut reader = ValueReader::new(data);
        assert!(matches!(
            reader.read_value().await,
            Err(RencodeError::InvalidTag(45))
        ));
    }

    #[tokio::test]
    async fn values_split_across_reads() {
        let (client, server) = tokio::io::duplex(3);
        let mut payload = vec![typecode::LIST];
        payload.extend(std::iter::repeat_n(0x05, 70));
        payload.push(typecode::TERM);
        payload.extend_from_slice(b"5:hello");

        let writer = tokio::spawn(async move {
            let mut client = client;
            client.write_all(&payload).await.unwrap();
        });

        let decoder = Decoder::new(DecodeOptions::builder().decode_as_text().build());
        let mut reader = ValueReader::with_decoder(server, decoder);
        let list = reader.read_value().await.unwrap().unwrap();
        assert_eq!(list.as_list().map(<[Value]>::len), Some(70));
        assert_eq!(reader.read_value().await.unwrap(), Some(Value::from("hello")));
        assert_eq!(reader.decode_attempts, 2);

        writer.await.unwrap();
        assert_eq!(reader.read_value().await.unwrap(), None);
    }

    #[tokio::test]
    async fn buffer_cap_is_enforced() {
        let mut data = b"100:".to_vec();
        data.extend_from_slice(&[0u8; 10]);
        let mut reader = ValueReader::new(&data[..]).max_buffered(8);
        assert!(matches!(
            reader.read_value().await,
            Err(RencodeError::ResourceExhausted(_))
        ));
    }

    #[tokio::test]
    async fn large_value_trickling_in_is_decoded_once() {
        let (client, server) = tokio::io::duplex(16);
        let mut payload = vec![typecode::LIST];
        payload.extend(std::iter::repeat_n(0x05, 100_000));
        payload.push(typecode::TERM);
        payload.push(typecode::NULL);

        let writer = tokio::spawn(async move {
            let mut client = client;
            for piece in payload.chunks(7) {
                client.write_all(piece).await.unwrap();
            }
        });

        let mut reader = ValueReader::new(server);
        let list = reader.read_value().await.unwrap().unwrap();
        assert_eq!(list.as_list().map(<[Value]>::len), Some(100_000));
        assert_eq!(reader.decode_attempts, 1);
        assert_eq!(reader.read_value().await.unwrap(), Some(Value::Null));
        assert_eq!(reader.decode_attempts, 2);

        writer.await.unwrap();
        assert_eq!(reader.read_value().await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_value_is_reported_without_waiting() {
        let (mut client, server) = tokio::io::duplex(64);
        client.write_all(&[typecode::LIST, 0x01, 46]).await.unwrap();

        // The writer stays open: the error must not depend on end of stream.
        let mut reader = ValueReader::new(server);
        assert!(matches!(
            reader.read_value().await,
            Err(RencodeError::InvalidTag(46))
        ));
        drop(client);
    }
}
