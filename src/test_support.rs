//! Test support utilities - only compiled in test builds.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Vec;

use crate::{
    Error,
    device::{BlockDevice, CachedBlockDevice, MemoryBlockDevice},
    event::{Event, Observer},
};

/// Event kind used by observer tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    Ping,
    Pong,
}

/// Shared record of notifications, in the order they arrived.
pub struct EventLog {
    entries: Mutex<RefCell<Vec<(u8, Event<TestKind>), 32>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    pub fn push(&self, id: u8, event: Event<TestKind>) {
        critical_section::with(|cs| {
            self.entries
                .borrow_ref_mut(cs)
                .push((id, event))
                .expect("event log overflow");
        });
    }

    /// Ids of the observers that were notified.
    pub fn ids(&self) -> Vec<u8, 32> {
        critical_section::with(|cs| self.entries.borrow_ref(cs).iter().map(|(id, _)| *id).collect())
    }

    pub fn events(&self) -> Vec<Event<TestKind>, 32> {
        critical_section::with(|cs| self.entries.borrow_ref(cs).iter().map(|(_, e)| *e).collect())
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer that appends its id to an [`EventLog`].
pub struct RecordingObserver<'a> {
    id: u8,
    log: &'a EventLog,
}

impl<'a> RecordingObserver<'a> {
    pub fn new(id: u8, log: &'a EventLog) -> Self {
        Self { id, log }
    }
}

impl Observer<TestKind> for RecordingObserver<'_> {
    fn on_event(&self, event: Event<TestKind>) {
        self.log.push(self.id, event);
    }
}

/// Block device wrapper that counts traffic and can be told to fail.
pub struct FakeBlockDevice<const BS: usize, const BC: usize> {
    pub inner: MemoryBlockDevice<BS, BC>,
    pub reads: usize,
    pub writes: usize,
    /// Reads of this block fail with `Error::Device(7)`.
    pub fail_read_at: Option<u32>,
    /// Writes to this block fail with `Error::Device(9)`.
    pub fail_write_at: Option<u32>,
}

impl<const BS: usize, const BC: usize> FakeBlockDevice<BS, BC> {
    pub fn new() -> Self {
        Self {
            inner: MemoryBlockDevice::new(),
            reads: 0,
            writes: 0,
            fail_read_at: None,
            fail_write_at: None,
        }
    }

    /// Device whose bytes count up from zero, wrapping at 256.
    pub fn patterned() -> Self {
        let mut device = Self::new();
        for (i, byte) in device.inner.as_bytes_mut().iter_mut().enumerate() {
            *byte = i as u8;
        }
        device
    }

    pub fn bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }
}

impl<const BS: usize, const BC: usize> Default for FakeBlockDevice<BS, BC> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BS: usize, const BC: usize> BlockDevice for FakeBlockDevice<BS, BC> {
    fn read_block(&mut self, dest: &mut [u8], index: u32) -> Result<(), Error> {
        self.reads += 1;
        if self.fail_read_at == Some(index) {
            return Err(Error::Device(7));
        }
        self.inner.read_block(dest, index)
    }

    fn write_block(&mut self, src: &[u8], index: u32) -> Result<(), Error> {
        self.writes += 1;
        if self.fail_write_at == Some(index) {
            return Err(Error::Device(9));
        }
        self.inner.write_block(src, index)
    }

    fn block_size(&self) -> u32 {
        BS as u32
    }

    fn total_blocks(&self) -> u32 {
        BC as u32
    }
}

/// Standard test configuration: 8 blocks of 16 bytes.
pub type TestDevice = FakeBlockDevice<16, 8>;
pub type TestCache<'a> = CachedBlockDevice<'a, TestDevice, 16, 3>;

/// Block `index` of a patterned [`TestDevice`].
pub fn patterned_block(index: u32) -> [u8; 16] {
    core::array::from_fn(|i| (index as usize * 16 + i) as u8)
}
