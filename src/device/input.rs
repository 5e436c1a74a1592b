use super::{BlockDevice, check_block_size};
use crate::{
    Error,
    stream::{InputStream, StreamBase},
};

/// Reads a block device as a byte stream, starting at a given block.
///
/// One block is staged in memory at a time. Put a
/// [`CachedBlockDevice`](super::CachedBlockDevice) underneath when the same
/// blocks are read repeatedly.
pub struct BlockDeviceInputStream<'a, D: BlockDevice, const BS: usize> {
    device: &'a mut D,
    block: [u8; BS],
    first_block: u32,
    block_index: u32,
    index_in_block: usize,
    staged: Option<u32>,
}

impl<'a, D: BlockDevice, const BS: usize> BlockDeviceInputStream<'a, D, BS> {
    /// Fails with [`Error::BlockSizeMismatch`] if the device's block size is not `BS`.
    pub fn new(device: &'a mut D, first_block: u32) -> Result<Self, Error> {
        check_block_size::<D, BS>(device)?;
        Ok(Self {
            device,
            block: [0; BS],
            first_block,
            block_index: first_block,
            index_in_block: 0,
            staged: None,
        })
    }

    /// Current block and offset within it.
    pub fn position(&self) -> (u32, usize) {
        (self.block_index, self.index_in_block)
    }

    fn load(&mut self, index: u32) -> Result<(), Error> {
        self.staged = None;
        self.device.read_block(&mut self.block, index).inspect_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("stream read of block {} failed: {}", index, _e);
        })?;
        self.staged = Some(index);
        Ok(())
    }

    /// Makes sure the staged block holds unread bytes. Returns false at the
    /// end of the device.
    fn require_bytes(&mut self) -> Result<bool, Error> {
        let total = self.device.total_blocks();
        if self.index_in_block == BS {
            if self.block_index.saturating_add(1) >= total {
                return Ok(false);
            }
            self.block_index += 1;
            self.index_in_block = 0;
        }
        if self.block_index >= total {
            return Ok(false);
        }
        if self.staged != Some(self.block_index) {
            self.load(self.block_index)?;
        }
        Ok(true)
    }
}

impl<D: BlockDevice, const BS: usize> StreamBase for BlockDeviceInputStream<'_, D, BS> {}

impl<D: BlockDevice, const BS: usize> InputStream for BlockDeviceInputStream<'_, D, BS> {
    fn read_byte(&mut self) -> Result<Option<u8>, Error> {
        if !self.require_bytes()? {
            return Ok(None);
        }
        let value = self.block[self.index_in_block];
        self.index_in_block += 1;
        Ok(Some(value))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut count = 0;
        while count < buf.len() {
            if !self.require_bytes()? {
                break;
            }
            let start = self.index_in_block;
            let chunk = (BS - start).min(buf.len() - count);
            buf[count..count + chunk].copy_from_slice(&self.block[start..start + chunk]);
            self.index_in_block += chunk;
            count += chunk;
        }
        Ok(count)
    }

    /// Moves forward `n` bytes, loading the target block straight away if it
    /// differs from the staged one.
    fn skip(&mut self, n: u32) -> Result<(), Error> {
        let bs = BS as u64;
        let offset = self.index_in_block as u64 + u64::from(n);
        let mut block = u64::from(self.block_index) + offset / bs;
        let mut index = (offset % bs) as usize;
        // land at the end of a block rather than the start of one that may not exist
        if index == 0 && block > u64::from(self.block_index) {
            block -= 1;
            index = BS;
        }

        if block >= u64::from(self.device.total_blocks()) {
            return Err(Error::InvalidSeek);
        }
        let block = block as u32;
        if index < BS && self.staged != Some(block) {
            self.load(block)?;
        }
        self.block_index = block;
        self.index_in_block = index;
        Ok(())
    }

    fn available(&self) -> bool {
        let total = self.device.total_blocks();
        if self.index_in_block < BS {
            self.block_index < total
        } else {
            self.block_index.saturating_add(1) < total
        }
    }

    /// Rewinds to the first block.
    fn reset(&mut self) -> Result<(), Error> {
        self.block_index = self.first_block;
        self.index_in_block = 0;
        Ok(())
    }
}
