use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CodecError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Append-only output buffer with a capacity ceiling and a sticky error.
///
/// Every write is all-or-nothing: a write that does not fit leaves the
/// buffer untouched and records `CapacityExceeded`. Once an error is
/// recorded, every later write returns it without touching the buffer until
/// [`reset`](Self::reset) is called. Multi-byte fields are written in
/// network (big-endian) order.
#[derive(Debug)]
pub struct ByteSink {
    buf: BytesMut,
    capacity: usize,
    error: Option<CodecError>,
}

impl ByteSink {
    /// Create an empty sink that accepts at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY.min(capacity)),
            capacity,
            error: None,
        }
    }

    /// Drop all written bytes and clear the error, keeping the allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.error = None;
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes that can still be written.
    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    /// The sticky error, if one was recorded.
    pub fn error(&self) -> Option<&CodecError> {
        self.error.as_ref()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Record `err` unless an earlier error is already sticky, and return
    /// whichever error is now recorded.
    pub fn fail(&mut self, err: CodecError) -> CodecError {
        self.error.get_or_insert(err).clone()
    }

    /// Append raw bytes. Returns the number of bytes written.
    pub fn append(&mut self, bytes: &[u8]) -> Result<usize> {
        self.reserve_exact(bytes.len())?;
        self.buf.put_slice(bytes);
        Ok(bytes.len())
    }

    /// Append a lone tag byte.
    pub fn put_tag(&mut self, tag: u8) -> Result<usize> {
        self.reserve_exact(1)?;
        self.buf.put_u8(tag);
        Ok(1)
    }

    pub fn put_tag_u8(&mut self, tag: u8, v: u8) -> Result<usize> {
        self.reserve_exact(2)?;
        self.buf.put_u8(tag);
        self.buf.put_u8(v);
        Ok(2)
    }

    pub fn put_tag_u16(&mut self, tag: u8, v: u16) -> Result<usize> {
        self.reserve_exact(3)?;
        self.buf.put_u8(tag);
        self.buf.put_u16(v);
        Ok(3)
    }

    pub fn put_tag_u32(&mut self, tag: u8, v: u32) -> Result<usize> {
        self.reserve_exact(5)?;
        self.buf.put_u8(tag);
        self.buf.put_u32(v);
        Ok(5)
    }

    pub fn put_tag_u64(&mut self, tag: u8, v: u64) -> Result<usize> {
        self.reserve_exact(9)?;
        self.buf.put_u8(tag);
        self.buf.put_u64(v);
        Ok(9)
    }

    pub fn put_tag_f64(&mut self, tag: u8, v: f64) -> Result<usize> {
        self.reserve_exact(9)?;
        self.buf.put_u8(tag);
        self.buf.put_f64(v);
        Ok(9)
    }

    /// Hand out the written bytes and leave the sink empty for reuse.
    ///
    /// Fails with the sticky error if any write failed; the partial output
    /// is discarded in that case.
    pub fn finish(&mut self) -> Result<Bytes> {
        if let Some(err) = self.error.take() {
            self.buf.clear();
            return Err(err);
        }
        Ok(self.buf.split().freeze())
    }

    fn reserve_exact(&mut self, needed: usize) -> Result<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let available = self.remaining();
        if needed > available {
            return Err(self.fail(CodecError::CapacityExceeded { needed, available }));
        }
        self.buf.reserve(needed);
        Ok(())
    }
}

impl Default for ByteSink {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_ENCODED_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_within_capacity() {
        let mut sink = ByteSink::new(4);
        assert_eq!(sink.append(b"ab").unwrap(), 2);
        assert_eq!(sink.append(b"cd").unwrap(), 2);
        assert_eq!(sink.remaining(), 0);
        assert_eq!(sink.finish().unwrap().as_ref(), b"abcd");
    }

    #[test]
    fn overflowing_append_writes_nothing() {
        let mut sink = ByteSink::new(4);
        sink.append(b"abc").unwrap();

        let err = sink.append(b"de").unwrap_err();
        assert_eq!(
            err,
            CodecError::CapacityExceeded {
                needed: 2,
                available: 1
            }
        );
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn error_is_sticky() {
        let mut sink = ByteSink::new(2);
        assert!(sink.put_tag_u16(0xcd, 1).is_err());

        // Fits on its own, but the earlier failure short-circuits it.
        let err = sink.put_tag(0xc0).unwrap_err();
        assert!(matches!(err, CodecError::CapacityExceeded { needed: 3, .. }));
        assert!(sink.is_empty());
        assert!(sink.is_failed());
    }

    #[test]
    fn finish_discards_output_after_error() {
        let mut sink = ByteSink::new(3);
        sink.put_tag(0x90).unwrap();
        assert!(sink.append(b"xyz").is_err());

        assert!(sink.finish().is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn reset_clears_error_and_output() {
        let mut sink = ByteSink::new(1);
        assert!(sink.append(b"too long").is_err());
        sink.reset();

        assert!(!sink.is_failed());
        sink.put_tag(0xc3).unwrap();
        assert_eq!(sink.finish().unwrap().as_ref(), &[0xc3]);
    }

    #[test]
    fn multi_byte_fields_are_big_endian() {
        let mut sink = ByteSink::new(64);
        sink.put_tag_u16(0xcd, 0x0102).unwrap();
        sink.put_tag_u32(0xce, 0x0304_0506).unwrap();
        sink.put_tag_f64(0xcb, 1.0).unwrap();

        assert_eq!(
            sink.finish().unwrap().as_ref(),
            &[
                0xcd, 0x01, 0x02, //
                0xce, 0x03, 0x04, 0x05, 0x06, //
                0xcb, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            ]
        );
    }
}
