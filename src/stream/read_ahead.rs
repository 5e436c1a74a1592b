use super::{InputStream, StreamBase};
use crate::Error;

/// Buffers reads from a wrapped stream in chunks of `N` bytes.
///
/// Useful in front of streams where small reads are expensive. Skipping and
/// rewinding are not supported.
pub struct ReadAheadInputStream<'a, S: InputStream, const N: usize> {
    inner: &'a mut S,
    buffer: [u8; N],
    pos: usize,
    filled: usize,
}

impl<'a, S: InputStream, const N: usize> ReadAheadInputStream<'a, S, N> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            buffer: [0; N],
            pos: 0,
            filled: 0,
        }
    }

    /// Refills the buffer. Returns false at the end of the wrapped stream.
    fn refill(&mut self) -> Result<bool, Error> {
        let count = self.inner.read(&mut self.buffer)?;
        if count == 0 {
            return Ok(false);
        }
        self.pos = 0;
        self.filled = count;
        Ok(true)
    }
}

impl<S: InputStream, const N: usize> StreamBase for ReadAheadInputStream<'_, S, N> {}

impl<S: InputStream, const N: usize> InputStream for ReadAheadInputStream<'_, S, N> {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        if self.pos == self.filled && !self.refill()? {
            return Ok(None);
        }
        let value = self.buffer[self.pos];
        self.pos += 1;
        Ok(Some(value))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut count = 0;
        while count < buf.len() {
            if self.pos == self.filled && !self.refill()? {
                break;
            }
            let chunk = (self.filled - self.pos).min(buf.len() - count);
            buf[count..count + chunk].copy_from_slice(&self.buffer[self.pos..self.pos + chunk]);
            self.pos += chunk;
            count += chunk;
        }
        Ok(count)
    }

    fn skip(&mut self, _n: u32) -> Result<(), Error> {
        Err(Error::NotSupported)
    }

    fn available(&self) -> bool {
        self.pos != self.filled || self.inner.available()
    }

    fn reset(&mut self) -> Result<(), Error> {
        Err(Error::NotSupported)
    }
}
