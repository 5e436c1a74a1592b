//! LZG compressed data: checksum, header, decoders and an encoder.
//!
//! A compressed buffer is a 16-byte header followed by the encoded body:
//!
//! ```text
//! offset  size  field
//!      0     3  magic "LZG"
//!      3     4  decoded size (big endian)
//!      7     4  encoded size, header excluded (big endian)
//!     11     4  checksum of the encoded body (big endian)
//!     15     1  method: 0 = stored, 1 = LZG1
//! ```
//!
//! An LZG1 body starts with four marker symbols. Any other byte is a
//! literal. A marker followed by a zero byte is the marker itself as a
//! literal; otherwise it introduces a back-reference into the bytes already
//! produced:
//!
//! | marker | bytes | length            | offset                                  |
//! |--------|-------|-------------------|-----------------------------------------|
//! | 1      | 4     | `LUT[b & 0x1f]`   | `((b & 0xe0) << 11 \| b2 << 8 \| b3) + 2056` |
//! | 2      | 3     | `LUT[b & 0x1f]`   | `((b & 0xe0) << 3 \| b2) + 8`            |
//! | 3      | 2     | `(b >> 6) + 3`    | `(b & 0x3f) + 8`                        |
//! | 4      | 2     | `LUT[b & 0x1f]`   | `(b >> 5) + 1`                          |

mod decode;
mod encode;
mod stream;

use crate::Error;

pub use decode::decode;
pub use encode::{encode, max_encoded_size};
pub use stream::LzgDecompressionStream;

pub const MAGIC: [u8; 3] = *b"LZG";
pub const HEADER_SIZE: usize = 16;
/// Header plus the four marker symbols.
pub const MIN_STREAM_SIZE: usize = HEADER_SIZE + 4;
/// Largest back-reference the markers 2 to 4 can express, plus one.
pub const DEFAULT_WINDOW: usize = 2056;

const MAX_MEDIUM_OFFSET: usize = 2055;
const MAX_SHORT_OFFSET: usize = 71;
const MAX_NEAR_OFFSET: usize = 8;

pub(crate) const LENGTH_DECODE_LUT: [u8; 32] = [
    2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26,
    27, 28, 29, 35, 48, 72, 128,
];

/// Encoding of the body following the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Copy,
    Lzg1,
}

/// Parsed LZG header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Header {
    pub decoded_size: u32,
    pub encoded_size: u32,
    pub checksum: u32,
    pub method: Method,
}

impl Header {
    /// Parses the first [`HEADER_SIZE`] bytes of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        let raw = data
            .get(..HEADER_SIZE)
            .ok_or(Error::CorruptCompressedData)?;
        if raw[..3] != MAGIC {
            return Err(Error::CorruptCompressedData);
        }

        let word = |at: usize| u32::from_be_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
        let method = match raw[15] {
            0 => Method::Copy,
            1 => Method::Lzg1,
            _other => {
                #[cfg(feature = "defmt")]
                defmt::warn!("unknown LZG method {}", _other);
                return Err(Error::UnsupportedCompressedData);
            }
        };

        Ok(Self {
            decoded_size: word(3),
            encoded_size: word(7),
            checksum: word(11),
            method,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..3].copy_from_slice(&MAGIC);
        out[3..7].copy_from_slice(&self.decoded_size.to_be_bytes());
        out[7..11].copy_from_slice(&self.encoded_size.to_be_bytes());
        out[11..15].copy_from_slice(&self.checksum.to_be_bytes());
        out[15] = match self.method {
            Method::Copy => 0,
            Method::Lzg1 => 1,
        };
        out
    }
}

/// Size of the data once decompressed, read from the header.
pub fn decoded_size(data: &[u8]) -> Result<u32, Error> {
    Header::parse(data).map(|h| h.decoded_size)
}

/// Two 16-bit running sums packed as `(b << 16) | a`.
pub fn checksum(data: &[u8]) -> u32 {
    let mut a: u16 = 1;
    let mut b: u16 = 0;
    for &byte in data {
        a = a.wrapping_add(u16::from(byte));
        b = b.wrapping_add(a);
    }
    (u32::from(b) << 16) | u32::from(a)
}
