use super::{BlockDevice, check_block_size};
use crate::{
    Error,
    stream::{OutputStream, StreamBase},
};

/// Writes a byte stream onto consecutive blocks of a device.
///
/// A partly written block is first filled from the device, so bytes after
/// the write position survive. When `buffered` is false every write reaches
/// the device immediately; otherwise a block is written once it is full, on
/// [`flush`](OutputStream::flush), or on [`close`](StreamBase::close).
/// Dropping the stream closes it.
pub struct BlockDeviceOutputStream<'a, D: BlockDevice, const BS: usize> {
    device: &'a mut D,
    block: [u8; BS],
    block_index: u32,
    index_in_block: usize,
    buffered: bool,
}

impl<'a, D: BlockDevice, const BS: usize> BlockDeviceOutputStream<'a, D, BS> {
    /// Fails with [`Error::BlockSizeMismatch`] if the device's block size is not `BS`.
    pub fn new(device: &'a mut D, first_block: u32, buffered: bool) -> Result<Self, Error> {
        check_block_size::<D, BS>(device)?;
        Ok(Self {
            device,
            block: [0; BS],
            block_index: first_block,
            index_in_block: 0,
            buffered,
        })
    }

    /// Current block and offset within it.
    pub fn position(&self) -> (u32, usize) {
        (self.block_index, self.index_in_block)
    }

    /// Prepares the staged block for a write of `len` bytes.
    fn begin_chunk(&mut self, len: usize) -> Result<(), Error> {
        if self.index_in_block != 0 {
            return Ok(());
        }
        if self.block_index >= self.device.total_blocks() {
            #[cfg(feature = "defmt")]
            defmt::warn!("no room for block {}", self.block_index);
            return Err(Error::DeviceFull);
        }
        if len < BS {
            self.device.read_block(&mut self.block, self.block_index)?;
        }
        Ok(())
    }

    fn end_chunk(&mut self) -> Result<(), Error> {
        let full = self.index_in_block == BS;
        if full || !self.buffered {
            self.write_staged()?;
        }
        if full {
            self.block_index += 1;
            self.index_in_block = 0;
        }
        Ok(())
    }

    fn write_staged(&mut self) -> Result<(), Error> {
        self.device
            .write_block(&self.block, self.block_index)
            .inspect_err(|_e| {
                #[cfg(feature = "defmt")]
                defmt::warn!("stream write of block {} failed: {}", self.block_index, _e);
            })
    }
}

impl<D: BlockDevice, const BS: usize> StreamBase for BlockDeviceOutputStream<'_, D, BS> {
    fn close(&mut self) -> Result<(), Error> {
        if self.buffered { self.flush() } else { Ok(()) }
    }
}

impl<D: BlockDevice, const BS: usize> OutputStream for BlockDeviceOutputStream<'_, D, BS> {
    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.write(&[byte])
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        let mut remaining = data;
        while !remaining.is_empty() {
            let start = self.index_in_block;
            let chunk = (BS - start).min(remaining.len());
            self.begin_chunk(chunk)?;

            self.block[start..start + chunk].copy_from_slice(&remaining[..chunk]);
            self.index_in_block += chunk;
            remaining = &remaining[chunk..];

            self.end_chunk()?;
        }
        Ok(())
    }

    /// Writes the partly filled block, if any. The position does not move.
    fn flush(&mut self) -> Result<(), Error> {
        if self.index_in_block > 0 {
            self.write_staged()?;
        }
        Ok(())
    }
}

impl<D: BlockDevice, const BS: usize> Drop for BlockDeviceOutputStream<'_, D, BS> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
