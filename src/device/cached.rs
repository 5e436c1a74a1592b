use bitmaps::{Bitmap, Bits, BitsImpl};

use super::{BlockDevice, FormatType, check_block_size};
use crate::Error;

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    block_index: u32,
    slot: usize,
}

/// Write-through LRU cache of `N` blocks in front of another device.
///
/// Entries are kept in recency order, most recent first. A hit moves the
/// entry to the front; a miss evicts the entry at the back. Entries that do
/// not yet hold a block always sit behind the ones that do, and their slot's
/// bit in the validity map is clear.
///
/// Writes go to the wrapped device first and only update the cache once the
/// device accepted them, so a failed write leaves the cache untouched.
pub struct CachedBlockDevice<'a, D: BlockDevice, const BS: usize, const N: usize>
where
    BitsImpl<N>: Bits,
{
    device: &'a mut D,
    entries: [CacheEntry; N],
    valid: Bitmap<N>,
    slots: [[u8; BS]; N],
}

impl<'a, D: BlockDevice, const BS: usize, const N: usize> CachedBlockDevice<'a, D, BS, N>
where
    BitsImpl<N>: Bits,
{
    /// Wraps `device`, failing if its block size is not `BS` or `N` is zero.
    pub fn new(device: &'a mut D) -> Result<Self, Error> {
        if N == 0 {
            return Err(Error::InvalidCacheSize);
        }
        check_block_size::<D, BS>(device)?;

        Ok(Self {
            device,
            entries: core::array::from_fn(|slot| CacheEntry {
                block_index: 0,
                slot,
            }),
            valid: Bitmap::new(),
            slots: [[0; BS]; N],
        })
    }

    /// Block indices currently cached, most recently used first.
    pub fn cached_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries
            .iter()
            .take_while(|e| self.valid.get(e.slot))
            .map(|e| e.block_index)
    }

    pub fn contains(&self, index: u32) -> bool {
        self.find(index).is_some()
    }

    /// Forgets every cached block.
    pub fn invalidate(&mut self) {
        self.valid = Bitmap::new();
    }

    /// Hands back the wrapped device.
    pub fn release(self) -> &'a mut D {
        self.device
    }

    fn find(&self, index: u32) -> Option<usize> {
        self.entries
            .iter()
            .take_while(|e| self.valid.get(e.slot))
            .position(|e| e.block_index == index)
    }

    fn promote(&mut self, pos: usize) -> usize {
        let entry = self.entries[pos];
        self.entries.copy_within(0..pos, 1);
        self.entries[0] = entry;
        entry.slot
    }

    /// Stores `data` as the most recent entry for `index`, evicting the
    /// least recent one.
    fn insert(&mut self, index: u32, data: &[u8]) {
        let victim = self.entries[N - 1];
        self.entries.copy_within(0..N - 1, 1);
        self.entries[0] = CacheEntry {
            block_index: index,
            slot: victim.slot,
        };
        self.slots[victim.slot].copy_from_slice(data);
        self.valid.set(victim.slot, true);
    }
}

impl<D: BlockDevice, const BS: usize, const N: usize> BlockDevice
    for CachedBlockDevice<'_, D, BS, N>
where
    BitsImpl<N>: Bits,
{
    fn read_block(&mut self, dest: &mut [u8], index: u32) -> Result<(), Error> {
        if let Some(pos) = self.find(index) {
            let slot = self.promote(pos);
            dest.copy_from_slice(&self.slots[slot]);
            return Ok(());
        }

        self.device.read_block(dest, index).inspect_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("cache fill of block {} failed: {}", index, _e);
        })?;
        self.insert(index, dest);
        Ok(())
    }

    fn write_block(&mut self, src: &[u8], index: u32) -> Result<(), Error> {
        self.device.write_block(src, index).inspect_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("write-through of block {} failed: {}", index, _e);
        })?;

        match self.find(index) {
            Some(pos) => {
                let slot = self.promote(pos);
                self.slots[slot].copy_from_slice(src);
            }
            None => self.insert(index, src),
        }
        Ok(())
    }

    fn block_size(&self) -> u32 {
        BS as u32
    }

    fn total_blocks(&self) -> u32 {
        self.device.total_blocks()
    }

    fn format_type(&self) -> FormatType {
        self.device.format_type()
    }
}

impl<D: BlockDevice, const BS: usize, const N: usize> core::fmt::Debug
    for CachedBlockDevice<'_, D, BS, N>
where
    BitsImpl<N>: Bits,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachedBlockDevice")
            .field("block_size", &BS)
            .field("capacity", &N)
            .field("cached", &self.valid.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestCache, TestDevice, patterned_block};

    fn read(cache: &mut TestCache<'_>, index: u32) -> [u8; 16] {
        let mut out = [0u8; 16];
        cache.read_block(&mut out, index).unwrap();
        out
    }

    #[test]
    fn rejects_wrong_block_size() {
        let mut device = TestDevice::new();
        assert_eq!(
            CachedBlockDevice::<_, 32, 2>::new(&mut device).err(),
            Some(Error::BlockSizeMismatch)
        );
    }

    #[test]
    fn repeated_read_hits_the_cache() {
        let mut device = TestDevice::patterned();
        let mut cache = TestCache::new(&mut device).unwrap();

        assert_eq!(read(&mut cache, 5), patterned_block(5));
        assert_eq!(read(&mut cache, 5), patterned_block(5));

        let device = cache.release();
        assert_eq!(device.reads, 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut device = TestDevice::patterned();
        let mut cache = TestCache::new(&mut device).unwrap();

        read(&mut cache, 1);
        read(&mut cache, 2);
        read(&mut cache, 3);
        // touch 1 so that 2 becomes the oldest
        read(&mut cache, 1);
        read(&mut cache, 4);

        assert!(cache.cached_indices().eq([4, 1, 3]));
        assert!(!cache.contains(2));

        assert_eq!(read(&mut cache, 2), patterned_block(2));
        let device = cache.release();
        assert_eq!(device.reads, 5);
    }

    #[test]
    fn entries_fill_before_anything_is_evicted() {
        let mut device = TestDevice::patterned();
        let mut cache = TestCache::new(&mut device).unwrap();

        assert_eq!(cache.cached_indices().count(), 0);
        // block 0 must not be reported as cached before it was read
        assert!(!cache.contains(0));

        read(&mut cache, 0);
        read(&mut cache, 7);
        assert!(cache.cached_indices().eq([7, 0]));
    }

    #[test]
    fn write_goes_through_and_refreshes_the_entry() {
        let mut device = TestDevice::patterned();
        let mut cache = TestCache::new(&mut device).unwrap();

        read(&mut cache, 2);
        read(&mut cache, 3);
        cache.write_block(&[0xAA; 16], 2).unwrap();

        assert!(cache.cached_indices().eq([2, 3]));
        assert_eq!(read(&mut cache, 2), [0xAA; 16]);

        let device = cache.release();
        assert_eq!(device.writes, 1);
        assert_eq!(device.reads, 2);
        assert_eq!(&device.bytes()[32..48], &[0xAA; 16]);
    }

    #[test]
    fn write_of_uncached_block_is_inserted() {
        let mut device = TestDevice::patterned();
        let mut cache = TestCache::new(&mut device).unwrap();

        cache.write_block(&[0x11; 16], 6).unwrap();
        assert_eq!(read(&mut cache, 6), [0x11; 16]);
        assert_eq!(cache.release().reads, 0);
    }

    #[test]
    fn failed_write_leaves_cache_untouched() {
        let mut device = TestDevice::patterned();
        device.fail_write_at = Some(4);
        let mut cache = TestCache::new(&mut device).unwrap();

        read(&mut cache, 4);
        assert_eq!(cache.write_block(&[0xFF; 16], 4), Err(Error::Device(9)));
        assert_eq!(read(&mut cache, 4), patterned_block(4));

        assert_eq!(cache.write_block(&[0xFF; 16], 4).err(), Some(Error::Device(9)));
        assert!(cache.cached_indices().eq([4]));
    }

    #[test]
    fn failed_read_caches_nothing() {
        let mut device = TestDevice::patterned();
        device.fail_read_at = Some(1);
        let mut cache = TestCache::new(&mut device).unwrap();

        let mut out = [0u8; 16];
        assert_eq!(cache.read_block(&mut out, 1), Err(Error::Device(7)));
        assert!(!cache.contains(1));
        assert_eq!(cache.cached_indices().count(), 0);
    }

    #[test]
    fn invalidate_forces_reload() {
        let mut device = TestDevice::patterned();
        let mut cache = TestCache::new(&mut device).unwrap();

        read(&mut cache, 0);
        cache.invalidate();
        assert!(!cache.contains(0));
        read(&mut cache, 0);
        assert_eq!(cache.release().reads, 2);
    }

    #[test]
    fn geometry_comes_from_the_wrapped_device() {
        let mut device = TestDevice::new();
        let cache = TestCache::new(&mut device).unwrap();
        assert_eq!(cache.block_size(), 16);
        assert_eq!(cache.total_blocks(), 8);
        assert_eq!(cache.format_type(), FormatType::Unpartitioned);
    }
}
