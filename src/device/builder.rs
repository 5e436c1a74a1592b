use core::marker::PhantomData;

use bitmaps::{Bits, BitsImpl};

use super::{BlockDevice, CachedBlockDevice};
use crate::Error;

// Builder states
pub struct NeedBlockSize;
pub struct NeedCachedBlocks;
pub struct NeedDevice;
pub struct Ready;

/// Step-by-step construction of a [`CachedBlockDevice`].
///
/// ```rust,no_run
/// use embedded_plus::prelude::*;
///
/// let mut sd = MemoryBlockDevice::<512, 64>::new();
/// let mut cache = CachedBlockDeviceBuilder::new()
///     .block_size::<512>()
///     .cached_blocks::<4>()
///     .device(&mut sd)
///     .build()
///     .unwrap();
///
/// let mut block = [0u8; 512];
/// cache.read_block(&mut block, 0).unwrap();
/// ```
pub struct CachedBlockDeviceBuilder<Dev, const BS: usize, const N: usize, State> {
    device: Dev,
    _phantom: PhantomData<State>,
}

// Start the builder
impl CachedBlockDeviceBuilder<(), 0, 0, NeedBlockSize> {
    pub fn new() -> Self {
        CachedBlockDeviceBuilder {
            device: (),
            _phantom: PhantomData,
        }
    }
}

impl Default for CachedBlockDeviceBuilder<(), 0, 0, NeedBlockSize> {
    fn default() -> Self {
        Self::new()
    }
}

// Set block size
impl CachedBlockDeviceBuilder<(), 0, 0, NeedBlockSize> {
    /// # Panics
    /// Panics at runtime if BS is zero.
    pub fn block_size<const BS: usize>(self) -> CachedBlockDeviceBuilder<(), BS, 0, NeedCachedBlocks> {
        assert!(BS > 0, "Block size must be non-zero");

        CachedBlockDeviceBuilder {
            device: (),
            _phantom: PhantomData,
        }
    }
}

// Set cache capacity
impl<const BS: usize> CachedBlockDeviceBuilder<(), BS, 0, NeedCachedBlocks> {
    /// Set how many blocks the cache holds.
    ///
    /// # Panics
    /// Panics at runtime if N is zero.
    pub fn cached_blocks<const N: usize>(self) -> CachedBlockDeviceBuilder<(), BS, N, NeedDevice> {
        assert!(N > 0, "Cache must hold at least one block, got {}", N);

        CachedBlockDeviceBuilder {
            device: (),
            _phantom: PhantomData,
        }
    }
}

// Set the wrapped device
impl<const BS: usize, const N: usize> CachedBlockDeviceBuilder<(), BS, N, NeedDevice> {
    pub fn device<D: BlockDevice>(
        self,
        device: &mut D,
    ) -> CachedBlockDeviceBuilder<&mut D, BS, N, Ready> {
        CachedBlockDeviceBuilder {
            device,
            _phantom: PhantomData,
        }
    }
}

// Build
impl<'a, D: BlockDevice, const BS: usize, const N: usize>
    CachedBlockDeviceBuilder<&'a mut D, BS, N, Ready>
where
    BitsImpl<N>: Bits,
{
    /// Fails with [`Error::BlockSizeMismatch`] if the device's block size is not BS.
    pub fn build(self) -> Result<CachedBlockDevice<'a, D, BS, N>, Error> {
        CachedBlockDevice::new(self.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestDevice, patterned_block};

    #[test]
    fn builds_a_working_cache() {
        let mut device = TestDevice::patterned();
        let mut cache = CachedBlockDeviceBuilder::new()
            .block_size::<16>()
            .cached_blocks::<2>()
            .device(&mut device)
            .build()
            .unwrap();

        let mut out = [0u8; 16];
        cache.read_block(&mut out, 3).unwrap();
        assert_eq!(out, patterned_block(3));
        assert!(cache.contains(3));
    }

    #[test]
    fn build_checks_the_device_block_size() {
        let mut device = TestDevice::new();
        let result = CachedBlockDeviceBuilder::new()
            .block_size::<64>()
            .cached_blocks::<2>()
            .device(&mut device)
            .build();
        assert_eq!(result.err(), Some(Error::BlockSizeMismatch));
    }

    #[test]
    #[should_panic(expected = "Cache must hold at least one block")]
    fn zero_capacity_panics() {
        let _ = CachedBlockDeviceBuilder::new()
            .block_size::<16>()
            .cached_blocks::<0>();
    }
}
