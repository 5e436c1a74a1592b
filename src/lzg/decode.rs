use super::{HEADER_SIZE, Header, LENGTH_DECODE_LUT, Method, checksum};
use crate::Error;

/// Decompresses a whole LZG buffer into `output`.
///
/// The header, the body size and the checksum are all checked before
/// anything is decoded. Returns the number of bytes written, which is the
/// decoded size from the header.
pub fn decode(input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    let header = Header::parse(input)?;
    let body = input
        .get(HEADER_SIZE..HEADER_SIZE + header.encoded_size as usize)
        .ok_or(Error::CorruptCompressedData)?;

    if checksum(body) != header.checksum {
        #[cfg(feature = "defmt")]
        defmt::warn!("LZG checksum mismatch");
        return Err(Error::ChecksumMismatch);
    }

    let size = header.decoded_size as usize;
    let output = output.get_mut(..size).ok_or(Error::BufferFull)?;

    match header.method {
        Method::Copy => {
            if body.len() != size {
                return Err(Error::CorruptCompressedData);
            }
            output.copy_from_slice(body);
        }
        Method::Lzg1 => decode_body(body, output)?,
    }
    Ok(size)
}

/// Decodes an LZG1 body so that it exactly fills `output`.
fn decode_body(body: &[u8], output: &mut [u8]) -> Result<(), Error> {
    let (markers, mut src) = body.split_first_chunk::<4>().ok_or(Error::CorruptCompressedData)?;
    let [m1, m2, m3, m4] = *markers;
    let is_marker = |s: u8| s == m1 || s == m2 || s == m3 || s == m4;

    let mut next = || -> Result<u8, Error> {
        let (&byte, rest) = src.split_first().ok_or(Error::CorruptCompressedData)?;
        src = rest;
        Ok(byte)
    };

    let mut dst = 0;
    loop {
        let symbol = match next() {
            Ok(symbol) => symbol,
            Err(_) => break,
        };

        if !is_marker(symbol) {
            *output.get_mut(dst).ok_or(Error::CorruptCompressedData)? = symbol;
            dst += 1;
            continue;
        }

        let b = next()?;
        if b == 0 {
            *output.get_mut(dst).ok_or(Error::CorruptCompressedData)? = symbol;
            dst += 1;
            continue;
        }

        let (length, offset) = if symbol == m1 {
            let b2 = next()?;
            let b3 = next()?;
            let offset = ((usize::from(b & 0xe0) << 11) | (usize::from(b2) << 8) | usize::from(b3))
                + 2056;
            (LENGTH_DECODE_LUT[usize::from(b & 0x1f)], offset)
        } else if symbol == m2 {
            let b2 = next()?;
            let offset = ((usize::from(b & 0xe0) << 3) | usize::from(b2)) + 8;
            (LENGTH_DECODE_LUT[usize::from(b & 0x1f)], offset)
        } else if symbol == m3 {
            ((b >> 6) + 3, usize::from(b & 0x3f) + 8)
        } else {
            (LENGTH_DECODE_LUT[usize::from(b & 0x1f)], usize::from(b >> 5) + 1)
        };

        let length = usize::from(length);
        if offset > dst || dst + length > output.len() {
            return Err(Error::CorruptCompressedData);
        }
        // overlapping runs must be copied forwards one byte at a time
        for _ in 0..length {
            output[dst] = output[dst - offset];
            dst += 1;
        }
    }

    if dst != output.len() {
        return Err(Error::CorruptCompressedData);
    }
    Ok(())
}
