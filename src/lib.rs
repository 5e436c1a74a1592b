//! `no_std`, no-alloc building blocks for microcontroller firmware.
//!
//! The crate collects the pieces a peripheral library needs between the
//! register layer and the application:
//!
//! - **Events** - interrupt handlers raise typed events on an [`EventSource`](event::EventSource),
//!   which notifies subscribed observers in order
//! - **Streams** - byte-oriented [`InputStream`](stream::InputStream) and
//!   [`OutputStream`](stream::OutputStream) traits with ring and flat buffer implementations
//! - **Block devices** - an LRU block cache and byte streams on top of any
//!   [`BlockDevice`](device::BlockDevice)
//! - **LZG** - checksum, decoders and an encoder for LZG-compressed assets,
//!   including a decompressing input stream with a bounded history window
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────────┐ dispatch ┌─────────────┐ on_event ┌──────────────┐
//!  │ IRQ handler  │─────────▶│ EventSource │─────────▶│  Observers   │
//!  └──────────────┘ registry └─────────────┘          └──────────────┘
//!
//!  ┌───────────────────────┐   ┌────────────────────────┐   ┌─────────────┐
//!  │ LzgDecompressionStream│◀──│ BlockDeviceInputStream │◀──│ CachedBlock │◀── BlockDevice
//!  └───────────────────────┘   └────────────────────────┘   │   Device    │    (SD card,
//!                                                            └─────────────┘     flash, RAM)
//! ```
//!
//! Every operation reports failure through its own `Result`; there is no
//! global error state.
//!
//! # Example
//!
//! ```rust,no_run
//! use embedded_plus::prelude::*;
//!
//! let mut flash = MemoryBlockDevice::<512, 128>::new();
//!
//! // Write a record across block boundaries, then read it back.
//! {
//!     let mut out = BlockDeviceOutputStream::<_, 512>::new(&mut flash, 4, true).unwrap();
//!     out.write_u32_le(0xC0FF_EE00).unwrap();
//!     out.write(&[0x5A; 1000]).unwrap();
//! } // dropping the stream flushes it
//!
//! let mut cache = CachedBlockDevice::<_, 512, 4>::new(&mut flash).unwrap();
//! let mut input = BlockDeviceInputStream::<_, 512>::new(&mut cache, 4).unwrap();
//! assert_eq!(input.read_u32_le().unwrap(), 0xC0FF_EE00);
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod device;
mod error;
pub mod event;
pub mod lzg;
pub mod stream;

#[cfg(test)]
mod test_support;

pub use error::Error;

pub mod prelude {
    pub use crate::Error;
    pub use crate::device::{
        BlockDevice, BlockDeviceInputStream, BlockDeviceOutputStream, CachedBlockDevice,
        CachedBlockDeviceBuilder, FormatType, MemoryBlockDevice,
    };
    pub use crate::event::*;
    pub use crate::lzg::LzgDecompressionStream;
    pub use crate::stream::{
        CircularBufferStream, InputStream, LinearBufferStream, OutputStream,
        ReadAheadInputStream, StreamBase,
    };
}
