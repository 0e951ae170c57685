use crate::foundation::error::{PowerError, PowerResult};

/// Size in bytes of one record word.
pub const WORD_BYTES: usize = 4;

/// Number of whole words needed to hold `len` bytes.
pub fn words_for_bytes(len: u32) -> usize {
    (len as usize).div_ceil(WORD_BYTES)
}

/// Bounds-checked forward reader over little-endian `u32` words.
///
/// Every read that would cross the end of the underlying slice fails with
/// [`PowerError::MalformedRecord`] and leaves the cursor where it was.
#[derive(Clone, Debug)]
pub struct WordCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> WordCursor<'a> {
    /// Start a cursor at the first byte of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Byte position of the next read.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whole words consumed so far.
    pub fn words_consumed(&self) -> usize {
        self.pos / WORD_BYTES
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Read one word as unsigned.
    pub fn read_u32(&mut self) -> PowerResult<u32> {
        let raw = self.take_bytes(WORD_BYTES)?;
        Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    /// Read one word as a two's-complement signed integer.
    pub fn read_i32(&mut self) -> PowerResult<i32> {
        self.read_u32().map(|w| w as i32)
    }

    /// Advance past `count` words without interpreting them.
    pub fn skip_words(&mut self, count: usize) -> PowerResult<()> {
        self.take_words(count).map(|_| ())
    }

    /// Borrow the next `count` words as raw bytes and advance past them.
    pub fn take_words(&mut self, count: usize) -> PowerResult<&'a [u8]> {
        let len = count.checked_mul(WORD_BYTES).ok_or_else(|| {
            PowerError::malformed(format!("word count {count} overflows the address space"))
        })?;
        self.take_bytes(len)
    }

    /// Read the next `count` words into a vector of unsigned values.
    pub fn read_words(&mut self, count: usize) -> PowerResult<Vec<u32>> {
        let raw = self.take_words(count)?;
        Ok(raw
            .chunks_exact(WORD_BYTES)
            .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
            .collect())
    }

    fn take_bytes(&mut self, len: usize) -> PowerResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(PowerError::malformed(format!(
                "read of {len} bytes at offset {} exceeds region of {} bytes",
                self.pos,
                self.bytes.len()
            )));
        }
        let out = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }
}

/// Borrow `len` bytes starting at `offset`, failing if the range leaves `bytes`.
pub fn sub_slice(bytes: &[u8], offset: usize, len: usize) -> PowerResult<&[u8]> {
    let end = offset.checked_add(len).ok_or_else(|| {
        PowerError::malformed(format!("region {offset}+{len} overflows the address space"))
    })?;
    bytes.get(offset..end).ok_or_else(|| {
        PowerError::malformed(format!(
            "region {offset}..{end} exceeds record of {} bytes",
            bytes.len()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/cursor.rs"]
mod tests;
