use super::{DEFAULT_WINDOW, HEADER_SIZE, Header, LENGTH_DECODE_LUT, MIN_STREAM_SIZE};
use crate::{
    Error,
    stream::{InputStream, StreamBase},
};

/// Decompresses LZG1 data on the fly while it is read.
///
/// Only the last `W` decoded bytes are kept, so distant copies (marker 1)
/// cannot be served and fail with [`Error::UnsupportedCompressedData`];
/// every other encoding works with the default window. Any reference
/// further back than the data decoded so far, or than `W`, is
/// [`Error::CorruptCompressedData`].
///
/// ```rust,no_run
/// use embedded_plus::prelude::*;
///
/// # fn splash(compressed: &[u8]) -> Result<(), Error> {
/// let mut input = LinearBufferStream::with_content(compressed);
/// let mut pixels = LzgDecompressionStream::<_>::new(&mut input, compressed.len() as u32)?;
/// let mut row = [0u8; 480];
/// while pixels.available() {
///     let count = pixels.read(&mut row)?;
///     // send `count` bytes to the display
///     let _ = count;
/// }
/// # Ok(())
/// # }
/// ```
pub struct LzgDecompressionStream<'a, S: InputStream, const W: usize = DEFAULT_WINDOW> {
    input: &'a mut S,
    header: Option<Header>,
    markers: [u8; 4],
    is_marker: [bool; 256],
    history: [u8; W],
    dst: usize,
    produced: usize,
    copy_from: usize,
    copy_remaining: usize,
    remaining: u32,
}

impl<'a, S: InputStream, const W: usize> LzgDecompressionStream<'a, S, W> {
    /// Starts decoding `compressed_size` bytes of LZG data, header included,
    /// from `input`.
    pub fn new(input: &'a mut S, compressed_size: u32) -> Result<Self, Error> {
        const { assert!(W > 0, "history window must not be empty") };

        if (compressed_size as usize) < MIN_STREAM_SIZE {
            return Err(Error::CorruptCompressedData);
        }

        let mut raw = [0u8; MIN_STREAM_SIZE];
        input.read_exact(&mut raw).map_err(|e| match e {
            Error::EndOfStream => Error::CorruptCompressedData,
            other => other,
        })?;

        let mut markers = [0u8; 4];
        markers.copy_from_slice(&raw[HEADER_SIZE..]);
        let mut is_marker = [false; 256];
        for marker in markers {
            is_marker[usize::from(marker)] = true;
        }

        Ok(Self {
            input,
            header: Header::parse(&raw).ok(),
            markers,
            is_marker,
            history: [0; W],
            dst: 0,
            produced: 0,
            copy_from: 0,
            copy_remaining: 0,
            remaining: compressed_size - MIN_STREAM_SIZE as u32,
        })
    }

    /// The header, if it was well formed. Decoding does not depend on it.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    fn next_input(&mut self) -> Result<u8, Error> {
        if self.remaining == 0 {
            return Err(Error::CorruptCompressedData);
        }
        let byte = self.input.read_byte()?.ok_or(Error::CorruptCompressedData)?;
        self.remaining -= 1;
        Ok(byte)
    }

    fn emit(&mut self, byte: u8) {
        self.history[self.dst] = byte;
        self.dst = if self.dst + 1 == W { 0 } else { self.dst + 1 };
        self.produced = (self.produced + 1).min(W);
    }

    fn next_copied(&mut self) -> u8 {
        let byte = self.history[self.copy_from];
        self.copy_from = if self.copy_from + 1 == W { 0 } else { self.copy_from + 1 };
        self.copy_remaining -= 1;
        self.emit(byte);
        byte
    }

    fn start_copy(&mut self, length: usize, offset: usize) -> Result<u8, Error> {
        if offset > self.produced {
            #[cfg(feature = "defmt")]
            defmt::warn!("LZG reference {} beyond {} decoded bytes", offset, self.produced);
            return Err(Error::CorruptCompressedData);
        }
        self.copy_from = if offset <= self.dst {
            self.dst - offset
        } else {
            W - (offset - self.dst)
        };
        self.copy_remaining = length;
        Ok(self.next_copied())
    }
}

impl<S: InputStream, const W: usize> StreamBase for LzgDecompressionStream<'_, S, W> {}

impl<S: InputStream, const W: usize> InputStream for LzgDecompressionStream<'_, S, W> {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        if self.copy_remaining > 0 {
            return Ok(Some(self.next_copied()));
        }
        if self.remaining == 0 {
            return Ok(None);
        }

        let symbol = self.next_input()?;
        if !self.is_marker[usize::from(symbol)] {
            self.emit(symbol);
            return Ok(Some(symbol));
        }

        let b = self.next_input()?;
        if b == 0 {
            self.emit(symbol);
            return Ok(Some(symbol));
        }

        let [distant, medium, short, _] = self.markers;
        let (length, offset) = if symbol == distant {
            #[cfg(feature = "defmt")]
            defmt::warn!("LZG distant copy needs more history than is kept");
            return Err(Error::UnsupportedCompressedData);
        } else if symbol == medium {
            let b2 = self.next_input()?;
            (
                LENGTH_DECODE_LUT[usize::from(b & 0x1f)],
                ((usize::from(b & 0xe0) << 3) | usize::from(b2)) + 8,
            )
        } else if symbol == short {
            ((b >> 6) + 3, usize::from(b & 0x3f) + 8)
        } else {
            (LENGTH_DECODE_LUT[usize::from(b & 0x1f)], usize::from(b >> 5) + 1)
        };

        self.start_copy(usize::from(length), offset).map(Some)
    }

    /// Decodes up to `buf.len()` bytes, stopping early at the end of the data.
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

    fn skip(&mut self, _n: u32) -> Result<(), Error> {
        Err(Error::NotSupported)
    }

    fn available(&self) -> bool {
        self.remaining > 0 || self.copy_remaining > 0
    }

    /// The compressed data may not start at the origin of the input, so
    /// there is nothing to rewind to.
    fn reset(&mut self) -> Result<(), Error> {
        Err(Error::NotSupported)
    }
}
