use super::{InputStream, OutputStream, StreamBase};
use crate::Error;

/// Fixed-capacity ring buffer usable as both an input and an output stream.
///
/// All `N` bytes are usable: when the read and write cursors coincide, the
/// `wrapped_write` flag tells a full buffer apart from an empty one.
pub struct CircularBufferStream<const N: usize> {
    buffer: [u8; N],
    read_pos: usize,
    write_pos: usize,
    wrapped_write: bool,
}

impl<const N: usize> CircularBufferStream<N> {
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            read_pos: 0,
            write_pos: 0,
            wrapped_write: false,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        if self.write_pos > self.read_pos {
            self.write_pos - self.read_pos
        } else if self.write_pos < self.read_pos {
            N - (self.read_pos - self.write_pos)
        } else if self.wrapped_write {
            N
        } else {
            0
        }
    }

    /// Number of bytes that can be written before the buffer is full.
    pub fn free(&self) -> usize {
        N - self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_pos == self.write_pos && !self.wrapped_write
    }

    pub fn is_full(&self) -> bool {
        self.read_pos == self.write_pos && self.wrapped_write
    }

    #[inline]
    fn advance(pos: usize, by: usize) -> usize {
        let next = pos + by;
        if next >= N { next - N } else { next }
    }
}

impl<const N: usize> Default for CircularBufferStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> StreamBase for CircularBufferStream<N> {}

impl<const N: usize> InputStream for CircularBufferStream<N> {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        if self.is_empty() {
            return Ok(None);
        }

        let value = self.buffer[self.read_pos];
        self.read_pos = Self::advance(self.read_pos, 1);
        self.wrapped_write = false;
        Ok(Some(value))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.read_byte()? {
                Some(value) => *slot = value,
                None => break,
            }
            count += 1;
        }
        Ok(count)
    }

    fn skip(&mut self, n: u32) -> Result<(), Error> {
        let n = n as usize;
        if n > self.len() {
            return Err(Error::InvalidSeek);
        }
        if n > 0 {
            self.read_pos = Self::advance(self.read_pos, n);
            self.wrapped_write = false;
        }
        Ok(())
    }

    fn available(&self) -> bool {
        !self.is_empty()
    }

    /// Discards all buffered content.
    fn reset(&mut self) -> Result<(), Error> {
        self.read_pos = 0;
        self.write_pos = 0;
        self.wrapped_write = false;
        Ok(())
    }
}

impl<const N: usize> OutputStream for CircularBufferStream<N> {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        if self.is_full() || N == 0 {
            return Err(Error::BufferFull);
        }

        self.buffer[self.write_pos] = byte;
        self.write_pos = Self::advance(self.write_pos, 1);
        if self.write_pos == self.read_pos {
            self.wrapped_write = true;
        }
        Ok(())
    }

    /// Writes all of `data`, or nothing if it does not fit.
    fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        if data.len() > self.free() {
            return Err(Error::BufferFull);
        }
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}
