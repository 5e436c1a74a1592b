/// Errors that can occur during stream, device, codec and dispatch operations.
///
/// Reaching the end of a stream is normally not an error: single-byte reads
/// return `Ok(None)` and bulk reads return a short count. [`Error::EndOfStream`]
/// is only produced by exact reads that cannot be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Stream ended before an exact read could complete.
    EndOfStream,
    /// Not enough space to accept the write. Nothing was written.
    BufferFull,
    /// Skip target lies beyond the readable data.
    InvalidSeek,
    /// No blocks left on the device to write into.
    DeviceFull,
    /// Device-specific failure code, passed through unchanged.
    Device(u16),
    /// Operation not supported by this stream.
    NotSupported,
    /// Compressed data uses an encoding this decoder refuses.
    UnsupportedCompressedData,
    /// Compressed data is truncated or structurally invalid.
    CorruptCompressedData,
    /// Stored checksum does not match the data.
    ChecksumMismatch,
    /// Device block size differs from the configured block size.
    BlockSizeMismatch,
    /// Cache must hold at least one block.
    InvalidCacheSize,
    /// Subscriber list capacity exceeded.
    SubscribersFull,
    /// Peripheral instance number outside the registry table.
    InvalidInstance,
    /// Peripheral instance already has a registered source.
    AlreadyRegistered,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::EndOfStream => write!(f, "end of stream reached"),
            Error::BufferFull => write!(f, "buffer full"),
            Error::InvalidSeek => write!(f, "seek beyond end of data"),
            Error::DeviceFull => write!(f, "no blocks left on device"),
            Error::Device(code) => write!(f, "device error {code}"),
            Error::NotSupported => write!(f, "operation not supported"),
            Error::UnsupportedCompressedData => write!(f, "unsupported compressed data"),
            Error::CorruptCompressedData => write!(f, "corrupt compressed data"),
            Error::ChecksumMismatch => write!(f, "checksum mismatch"),
            Error::BlockSizeMismatch => write!(f, "device block size mismatch"),
            Error::InvalidCacheSize => write!(f, "cache must hold at least one block"),
            Error::SubscribersFull => write!(f, "subscriber list full"),
            Error::InvalidInstance => write!(f, "peripheral instance out of range"),
            Error::AlreadyRegistered => write!(f, "peripheral instance already registered"),
        }
    }
}
