use super::{InputStream, OutputStream, StreamBase};
use crate::Error;

/// Flat buffer with independent read and write cursors.
///
/// Reads run up to the end of the buffer regardless of how much has been
/// written, so a buffer wrapped with [`with_content`](Self::with_content)
/// exposes all of its bytes. The buffer never grows.
///
/// `S` is any byte storage: an owned array, a borrowed slice for read-only
/// data, or a mutable slice.
pub struct LinearBufferStream<S> {
    storage: S,
    read_pos: usize,
    write_pos: usize,
}

impl<S: AsRef<[u8]>> LinearBufferStream<S> {
    /// Wraps `storage` with both cursors at the start.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// Wraps `storage` as existing content; the write cursor starts at the end.
    pub fn with_content(storage: S) -> Self {
        let write_pos = storage.as_ref().len();
        Self {
            storage,
            read_pos: 0,
            write_pos,
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.as_ref().len()
    }

    pub fn read_position(&self) -> usize {
        self.read_pos
    }

    pub fn write_position(&self) -> usize {
        self.write_pos
    }

    /// Rewinds the write cursor only.
    pub fn reset_output(&mut self) {
        self.write_pos = 0;
    }

    /// Bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.storage.as_ref()[..self.write_pos]
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    fn remaining(&self) -> usize {
        self.capacity() - self.read_pos
    }
}

impl<S> StreamBase for LinearBufferStream<S> {}

impl<S: AsRef<[u8]>> InputStream for LinearBufferStream<S> {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        match self.storage.as_ref().get(self.read_pos) {
            Some(&value) => {
                self.read_pos += 1;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let count = buf.len().min(self.remaining());
        let start = self.read_pos;
        buf[..count].copy_from_slice(&self.storage.as_ref()[start..start + count]);
        self.read_pos += count;
        Ok(count)
    }

    fn skip(&mut self, n: u32) -> Result<(), Error> {
        let n = n as usize;
        if n > self.remaining() {
            return Err(Error::InvalidSeek);
        }
        self.read_pos += n;
        Ok(())
    }

    fn available(&self) -> bool {
        self.read_pos < self.capacity()
    }

    /// Rewinds the read cursor only.
    fn reset(&mut self) -> Result<(), Error> {
        self.read_pos = 0;
        Ok(())
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> OutputStream for LinearBufferStream<S> {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        let pos = self.write_pos;
        let slot = self.storage.as_mut().get_mut(pos).ok_or(Error::BufferFull)?;
        *slot = byte;
        self.write_pos += 1;
        Ok(())
    }

    /// Writes all of `data`, or nothing if it does not fit.
    fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        let start = self.write_pos;
        if data.len() > self.capacity() - start {
            return Err(Error::BufferFull);
        }
        self.storage.as_mut()[start..start + data.len()].copy_from_slice(data);
        self.write_pos += data.len();
        Ok(())
    }
}
