use bytes::Buf;

use crate::error::{CodecError, Result};

/// Forward-only reader over a borrowed byte range with a sticky error.
///
/// Every read checks the remaining length first and never advances on
/// failure. Once an error is recorded, all further reads return it.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
    error: Option<CodecError>,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            error: None,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

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

    /// Fail unless at least `needed` bytes are unread.
    pub fn ensure(&mut self, needed: usize) -> Result<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let remaining = self.remaining();
        if needed > remaining {
            return Err(self.fail(CodecError::TruncatedInput {
                offset: self.offset,
                needed,
                remaining,
            }));
        }
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let data: &'a [u8] = self.data;
        let taken = &data[self.offset..self.offset + n];
        self.offset += n;
        Ok(taken)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let mut b = self.take(1)?;
        Ok(b.get_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let mut b = self.take(2)?;
        Ok(b.get_u16())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let mut b = self.take(4)?;
        Ok(b.get_u32())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let mut b = self.take(8)?;
        Ok(b.get_u64())
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        let mut b = self.take(1)?;
        Ok(b.get_i8())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let mut b = self.take(2)?;
        Ok(b.get_i16())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let mut b = self.take(4)?;
        Ok(b.get_i32())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let mut b = self.take(8)?;
        Ok(b.get_i64())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let mut b = self.take(4)?;
        Ok(b.get_f32())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let mut b = self.take(8)?;
        Ok(b.get_f64())
    }
}
