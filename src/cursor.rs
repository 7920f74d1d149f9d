use std::str::FromStr;

use crate::config::SampleWidth;
use crate::error::{EdfError, Result};

/// Forward-only cursor over an in-memory EDF buffer.
///
/// `offset + remaining == buffer.len()` always holds. A read either returns
/// the requested bytes and advances by exactly that many, or fails with
/// [`EdfError::OutOfBounds`] and leaves the cursor untouched, so a truncated
/// buffer never yields zero-filled data.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        ByteCursor { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    /// Reads the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(EdfError::OutOfBounds {
                offset: self.offset,
                requested: len,
                remaining: self.remaining(),
            });
        }

        let start = self.offset;
        self.offset += len;
        Ok(&self.buffer[start..self.offset])
    }

    /// Reads `len` bytes as text with surrounding whitespace removed.
    pub fn read_text(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).trim().to_string())
    }

    /// Reads `len` bytes of ASCII digits.
    ///
    /// The error is a short read only. Bytes that do not hold a number are
    /// still consumed and come back as a [`NumericText`] with no value, so
    /// the caller decides whether that is fatal.
    pub fn read_numeric_text<T: FromStr>(&mut self, len: usize) -> Result<NumericText<T>> {
        let text = self.read_text(len)?;
        Ok(NumericText::parse(text))
    }

    /// Reads one little-endian two's-complement sample.
    pub fn read_signed_int(&mut self, width: SampleWidth) -> Result<i32> {
        let bytes = self.read_bytes(width.bytes())?;
        Ok(decode_signed_int(bytes))
    }
}

/// A trimmed header field and its numeric value, if it parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericText<T> {
    pub text: String,
    pub value: Option<T>,
}

impl<T: FromStr> NumericText<T> {
    pub fn parse(text: String) -> Self {
        let value = text.parse().ok();
        NumericText { text, value }
    }

    /// The value, or [`EdfError::MalformedNumber`] naming the field.
    pub fn require(self, field: &'static str, signal: Option<usize>) -> Result<T> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(EdfError::MalformedNumber {
                field,
                signal,
                text: self.text,
            }),
        }
    }
}

/// Decodes 1 to 3 little-endian bytes as a sign-extended integer.
///
/// A 3-byte value is a 16-bit low word followed by an 8-bit high byte,
/// combined as `low | high << 16` and sign-extended from bit 23.
pub(crate) fn decode_signed_int(bytes: &[u8]) -> i32 {
    match *bytes {
        [b0] => b0 as i8 as i32,
        [b0, b1] => i16::from_le_bytes([b0, b1]) as i32,
        [b0, b1, b2] => {
            let low = u16::from_le_bytes([b0, b1]) as i32;
            let value = low | ((b2 as i32) << 16);
            (value << 8) >> 8
        }
        _ => unreachable!("sample width is 1, 2 or 3 bytes"),
    }
}
