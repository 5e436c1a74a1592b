use super::{
    HEADER_SIZE, Header, LENGTH_DECODE_LUT, MAX_MEDIUM_OFFSET, MAX_NEAR_OFFSET, MAX_SHORT_OFFSET,
    MIN_STREAM_SIZE, Method, checksum,
};
use crate::Error;

const MIN_MATCH: usize = 3;
const MAX_MATCH: usize = 128;

/// Output capacity that is always enough for [`encode`] of `len` bytes.
///
/// The four rarest symbols appear at most `len / 64` times between them, and
/// each of those costs one escape byte.
pub const fn max_encoded_size(len: usize) -> usize {
    MIN_STREAM_SIZE + len + len.div_ceil(64)
}

/// Compresses `input` as LZG1 into `output`, returning the bytes written.
///
/// Back-references never reach further than the default history window, so
/// the result can be read through an
/// [`LzgDecompressionStream`](super::LzgDecompressionStream) with the default
/// window. The match search is exhaustive over that window: fine for
/// preparing assets, slow for large inputs.
pub fn encode(input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    let markers = pick_markers(input);
    let mut out = Writer {
        buf: output,
        pos: HEADER_SIZE,
    };
    out.push(&markers)?;

    let [_, medium, short, near] = markers;
    let is_marker = |s: u8| markers.contains(&s);

    let mut pos = 0;
    while pos < input.len() {
        if let Some((length, offset)) = longest_match(input, pos) {
            if offset <= MAX_NEAR_OFFSET {
                let (index, length) = quantize(length);
                out.push(&[near, (((offset - 1) as u8) << 5) | index])?;
                pos += length;
                continue;
            }
            if offset <= MAX_SHORT_OFFSET && length <= 6 {
                out.push(&[short, (((length - 3) as u8) << 6) | (offset - 8) as u8])?;
                pos += length;
                continue;
            }
            if length > MIN_MATCH {
                let (index, length) = quantize(length);
                let offset = offset - 8;
                out.push(&[medium, (((offset >> 8) as u8) << 5) | index, offset as u8])?;
                pos += length;
                continue;
            }
        }

        let symbol = input[pos];
        if is_marker(symbol) {
            out.push(&[symbol, 0])?;
        } else {
            out.push(&[symbol])?;
        }
        pos += 1;
    }

    let end = out.pos;
    let body = &output[HEADER_SIZE..end];
    let header = Header {
        decoded_size: u32::try_from(input.len()).map_err(|_| Error::BufferFull)?,
        encoded_size: body.len() as u32,
        checksum: checksum(body),
        method: Method::Lzg1,
    };
    output[..HEADER_SIZE].copy_from_slice(&header.to_bytes());

    #[cfg(feature = "defmt")]
    defmt::debug!("LZG encoded {} bytes into {}", input.len(), end);
    Ok(end)
}

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Writer<'_> {
    fn push(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let dest = self
            .buf
            .get_mut(self.pos..self.pos + bytes.len())
            .ok_or(Error::BufferFull)?;
        dest.copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }
}

/// The four least frequent symbols, rarest first.
fn pick_markers(input: &[u8]) -> [u8; 4] {
    let mut histogram = [0u32; 256];
    for &byte in input {
        histogram[usize::from(byte)] += 1;
    }

    let mut markers = [0u8; 4];
    let mut taken = [false; 256];
    for marker in &mut markers {
        let mut best = 0;
        let mut best_count = u32::MAX;
        for (symbol, &count) in histogram.iter().enumerate() {
            if !taken[symbol] && count < best_count {
                best = symbol;
                best_count = count;
            }
        }
        taken[best] = true;
        *marker = best as u8;
    }
    markers
}

/// Longest earlier occurrence of the bytes at `pos`, nearest first on ties.
fn longest_match(input: &[u8], pos: usize) -> Option<(usize, usize)> {
    let limit = (input.len() - pos).min(MAX_MATCH);
    if limit < MIN_MATCH {
        return None;
    }

    let mut best: Option<(usize, usize)> = None;
    for offset in 1..=pos.min(MAX_MEDIUM_OFFSET) {
        let from = pos - offset;
        let length = (0..limit)
            .take_while(|&i| input[from + i] == input[pos + i])
            .count();
        if length >= MIN_MATCH && best.is_none_or(|(best_len, _)| length > best_len) {
            best = Some((length, offset));
            if length == limit {
                break;
            }
        }
    }
    best
}

/// Largest encodable length not above `length`, with its table index.
fn quantize(length: usize) -> (u8, usize) {
    let index = LENGTH_DECODE_LUT
        .iter()
        .rposition(|&l| usize::from(l) <= length)
        .unwrap_or(0);
    (index as u8, usize::from(LENGTH_DECODE_LUT[index]))
}
