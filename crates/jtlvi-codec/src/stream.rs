use std::io::{ErrorKind, Read, Write};

use crate::decoder::decode;
use crate::encoder::{encode, EncodeOptions};
use crate::error::{StreamError, StreamResult};
use crate::layout::MAX_PADDED_LENGTH;
use crate::pair::{Pair, PairSource};

/// Default maximum message size accepted by [`read_message`]: 16 MiB.
pub const DEFAULT_MAX_MESSAGE: usize = MAX_PADDED_LENGTH;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Configuration for reading messages from a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadConfig {
    /// Maximum number of bytes read before giving up. Default: 16 MiB.
    pub max_message_size: usize,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE,
        }
    }
}

/// Encode `source` and write the whole message to `writer`.
///
/// Returns the number of bytes written.
pub fn write_message<W: Write>(
    writer: &mut W,
    source: impl Into<PairSource>,
    options: &EncodeOptions,
) -> StreamResult<usize> {
    let message = encode(source, options)?;

    let mut offset = 0usize;
    while offset < message.len() {
        match writer.write(&message[offset..]) {
            Ok(0) => return Err(StreamError::Io(ErrorKind::WriteZero.into())),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(StreamError::Io(err)),
        }
    }

    loop {
        match writer.flush() {
            Ok(()) => break,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(StreamError::Io(err)),
        }
    }

    tracing::debug!(len = message.len(), "wrote message");
    Ok(message.len())
}

/// Read `reader` to EOF and decode the bytes as one message.
pub fn read_message<R: Read>(reader: &mut R, config: &ReadConfig) -> StreamResult<Vec<Pair>> {
    let buf = read_to_end_bounded(reader, config.max_message_size)?;
    tracing::debug!(len = buf.len(), "read message");
    Ok(decode(&buf)?)
}

/// Read everything from `reader`, failing once more than `max` bytes arrive.
pub fn read_to_end_bounded<R: Read>(reader: &mut R, max: usize) -> StreamResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(StreamError::Io(err)),
        };
        if read == 0 {
            return Ok(buf);
        }
        if buf.len() + read > max {
            return Err(StreamError::MessageTooLarge { max });
        }
        buf.extend_from_slice(&chunk[..read]);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn write_then_read() {
        let mut wire = Vec::new();
        let written = write_message(
            &mut wire,
            vec![(2u16, &b"bar"[..]), (1u16, &b"foo"[..])],
            &EncodeOptions::default(),
        )
        .unwrap();
        assert_eq!(written, wire.len());

        let pairs = read_message(&mut Cursor::new(wire), &ReadConfig::default()).unwrap();
        assert_eq!(
            pairs,
            vec![Pair::new(1, &b"foo"[..]), Pair::new(2, &b"bar"[..])]
        );
    }

    #[test]
    fn write_empty_message() {
        let mut wire = Vec::new();
        write_message(&mut wire, Vec::<Pair>::new(), &EncodeOptions::default()).unwrap();
        assert_eq!(wire, b"\xd4\x0e\x80\x61\xff\xff\x00\x00");
    }

    #[test]
    fn partial_read_handling() {
        let mut reader = ByteByByteReader {
            bytes: b"\xd4\x0e\x80\x61\xff\xff\x00\x00".to_vec(),
            pos: 0,
        };
        let pairs = read_message(&mut reader, &ReadConfig::default()).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn partial_write_handling() {
        let mut writer = ByteByByteWriter { bytes: Vec::new() };
        let written = write_message(
            &mut writer,
            vec![(1u16, &b"foo"[..])],
            &EncodeOptions::default(),
        )
        .unwrap();
        assert_eq!(written, writer.bytes.len());
        assert_eq!(
            decode(&writer.bytes).unwrap(),
            vec![Pair::new(1, &b"foo"[..])]
        );
    }

    #[test]
    fn oversized_input_rejected() {
        let cfg = ReadConfig {
            max_message_size: 4,
        };
        let err = read_message(
            &mut Cursor::new(b"\xd4\x0e\x80\x61\xff\xff\x00\x00".to_vec()),
            &cfg,
        )
        .unwrap_err();
        assert!(matches!(err, StreamError::MessageTooLarge { max: 4 }));
    }

    #[test]
    fn decode_error_surfaces() {
        let err = read_message(&mut Cursor::new(vec![0xD4]), &ReadConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            StreamError::Decode(DecodeError::TooShort { len: 1 })
        ));
    }

    #[test]
    fn zero_length_write_is_an_error() {
        let err = write_message(
            &mut ClosedWriter,
            Vec::<Pair>::new(),
            &EncodeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StreamError::Io(e) if e.kind() == ErrorKind::WriteZero));
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct ByteByByteWriter {
        bytes: Vec<u8>,
    }

    impl Write for ByteByByteWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            match buf.first() {
                Some(&b) => {
                    self.bytes.push(b);
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ClosedWriter;

    impl Write for ClosedWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
