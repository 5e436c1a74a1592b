//! Byte stream traits and in-memory stream implementations.
//!
//! Every stream reports failures through its own return value. Reaching the
//! end of an input stream is not a failure: [`InputStream::read_byte`]
//! returns `Ok(None)` and [`InputStream::read`] returns a short count.

mod circular;
mod linear;
mod macros;
mod read_ahead;

use macros::{impl_read_primitive, impl_read_primitives, impl_write_primitive, impl_write_primitives};

use crate::Error;

pub use circular::CircularBufferStream;
pub use linear::LinearBufferStream;
pub use read_ahead::ReadAheadInputStream;

/// Operations shared by input and output streams.
pub trait StreamBase {
    /// Releases the stream, flushing any buffered writer state.
    ///
    /// Closing more than once is harmless.
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// A readable byte stream.
pub trait InputStream: StreamBase {
    /// Reads one byte, or `None` at the end of the stream.
    fn read_byte(&mut self) -> Result<Option<u8>, Error>;

    /// Reads up to `buf.len()` bytes and returns how many were read.
    ///
    /// A count smaller than requested means the end of the stream was reached;
    /// `Err` is reserved for genuine failures.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error>;

    /// Advances the read position by `n` bytes without copying them out.
    ///
    /// On failure the position is unchanged.
    fn skip(&mut self, n: u32) -> Result<(), Error>;

    /// True if at least one more byte can be read.
    fn available(&self) -> bool;

    /// Rewinds to the stream's origin.
    fn reset(&mut self) -> Result<(), Error>;

    /// Fills `buf` completely or fails with [`Error::EndOfStream`].
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let mut filled = 0;
        while filled < buf.len() {
            let count = self.read(&mut buf[filled..])?;
            if count == 0 {
                return Err(Error::EndOfStream);
            }
            filled += count;
        }
        Ok(())
    }

    impl_read_primitives!();
}

/// A writable byte stream.
pub trait OutputStream: StreamBase {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error>;

    /// Writes all of `data` or fails.
    fn write(&mut self, data: &[u8]) -> Result<(), Error>;

    /// Pushes buffered bytes to the underlying storage.
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }

    impl_write_primitives!();
}

impl<S: StreamBase + ?Sized> StreamBase for &mut S {
    fn close(&mut self) -> Result<(), Error> {
        (**self).close()
    }
}

impl<S: InputStream + ?Sized> InputStream for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        (**self).read_byte()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        (**self).read(buf)
    }

    fn skip(&mut self, n: u32) -> Result<(), Error> {
        (**self).skip(n)
    }

    fn available(&self) -> bool {
        (**self).available()
    }

    fn reset(&mut self) -> Result<(), Error> {
        (**self).reset()
    }
}

impl<S: OutputStream + ?Sized> OutputStream for &mut S {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        (**self).write_byte(byte)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<(), Error> {
        (**self).flush()
    }
}
