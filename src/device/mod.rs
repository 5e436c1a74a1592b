//! Block-addressable storage, an LRU block cache, and byte streams over blocks.

pub mod builder;
mod cached;
mod input;
mod memory;
mod output;

use crate::Error;

pub use builder::CachedBlockDeviceBuilder;
pub use cached::CachedBlockDevice;
pub use input::BlockDeviceInputStream;
pub use memory::MemoryBlockDevice;
pub use output::BlockDeviceOutputStream;

/// How the data on a block device is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatType {
    /// Partitioned with a master boot record.
    Mbr,
    /// A single volume starting at block zero.
    Unpartitioned,
}

/// Storage addressable only in fixed-size blocks.
///
/// Buffers passed to [`read_block`](Self::read_block) and
/// [`write_block`](Self::write_block) must be exactly
/// [`block_size`](Self::block_size) bytes long. Failures are reported with
/// whatever [`Error`] the device chooses; wrappers pass them on unchanged.
pub trait BlockDevice {
    fn read_block(&mut self, dest: &mut [u8], index: u32) -> Result<(), Error>;

    fn write_block(&mut self, src: &[u8], index: u32) -> Result<(), Error>;

    fn block_size(&self) -> u32;

    fn total_blocks(&self) -> u32;

    fn format_type(&self) -> FormatType {
        FormatType::Unpartitioned
    }

    /// Reads `count` consecutive blocks starting at `first`.
    ///
    /// Stops at the first failing block; blocks before it have already been read.
    ///
    /// # Panics
    /// Panics if `dest` is shorter than `count` blocks.
    fn read_blocks(&mut self, dest: &mut [u8], first: u32, count: u32) -> Result<(), Error> {
        let size = self.block_size() as usize;
        assert!(
            dest.len() >= size * count as usize,
            "read_blocks: buffer of {} bytes cannot hold {} blocks of {}",
            dest.len(),
            count,
            size
        );
        for (i, chunk) in dest.chunks_exact_mut(size).take(count as usize).enumerate() {
            self.read_block(chunk, first + i as u32)?;
        }
        Ok(())
    }

    /// Writes `count` consecutive blocks starting at `first`.
    ///
    /// Stops at the first failing block; blocks before it stay written.
    ///
    /// # Panics
    /// Panics if `src` is shorter than `count` blocks.
    fn write_blocks(&mut self, src: &[u8], first: u32, count: u32) -> Result<(), Error> {
        let size = self.block_size() as usize;
        assert!(
            src.len() >= size * count as usize,
            "write_blocks: buffer of {} bytes cannot hold {} blocks of {}",
            src.len(),
            count,
            size
        );
        for (i, chunk) in src.chunks_exact(size).take(count as usize).enumerate() {
            self.write_block(chunk, first + i as u32)?;
        }
        Ok(())
    }
}

impl<D: BlockDevice + ?Sized> BlockDevice for &mut D {
    fn read_block(&mut self, dest: &mut [u8], index: u32) -> Result<(), Error> {
        (**self).read_block(dest, index)
    }

    fn write_block(&mut self, src: &[u8], index: u32) -> Result<(), Error> {
        (**self).write_block(src, index)
    }

    fn block_size(&self) -> u32 {
        (**self).block_size()
    }

    fn total_blocks(&self) -> u32 {
        (**self).total_blocks()
    }

    fn format_type(&self) -> FormatType {
        (**self).format_type()
    }
}

/// Checks that a device's block size matches the configured `BS`.
pub(crate) fn check_block_size<D: BlockDevice + ?Sized, const BS: usize>(
    device: &D,
) -> Result<(), Error> {
    if BS == 0 || device.block_size() as usize != BS {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "device block size {} does not match configured {}",
            device.block_size(),
            BS
        );
        return Err(Error::BlockSizeMismatch);
    }
    Ok(())
}
