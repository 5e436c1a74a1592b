use super::BlockDevice;
use crate::Error;

/// Device error code for an access beyond the last block.
pub const OUT_OF_RANGE: u16 = 1;

/// RAM-backed block device holding `BC` blocks of `BS` bytes.
///
/// Handy as a RAM disk, or as the backing store for a cache in tests.
pub struct MemoryBlockDevice<const BS: usize, const BC: usize> {
    blocks: [[u8; BS]; BC],
}

impl<const BS: usize, const BC: usize> MemoryBlockDevice<BS, BC> {
    pub const fn new() -> Self {
        Self {
            blocks: [[0; BS]; BC],
        }
    }

    /// Borrows the raw contents of a block, if it exists.
    pub fn block(&self, index: u32) -> Option<&[u8; BS]> {
        self.blocks.get(index as usize)
    }

    /// Raw view of the whole device.
    pub fn as_bytes(&self) -> &[u8] {
        self.blocks.as_flattened()
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.blocks.as_flattened_mut()
    }
}

impl<const BS: usize, const BC: usize> Default for MemoryBlockDevice<BS, BC> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BS: usize, const BC: usize> BlockDevice for MemoryBlockDevice<BS, BC> {
    fn read_block(&mut self, dest: &mut [u8], index: u32) -> Result<(), Error> {
        let block = self
            .blocks
            .get(index as usize)
            .ok_or(Error::Device(OUT_OF_RANGE))?;
        dest.copy_from_slice(block);
        Ok(())
    }

    fn write_block(&mut self, src: &[u8], index: u32) -> Result<(), Error> {
        let block = self
            .blocks
            .get_mut(index as usize)
            .ok_or(Error::Device(OUT_OF_RANGE))?;
        block.copy_from_slice(src);
        Ok(())
    }

    fn block_size(&self) -> u32 {
        BS as u32
    }

    fn total_blocks(&self) -> u32 {
        BC as u32
    }
}
