use embedded_plus::lzg;
use embedded_plus::prelude::*;
use proptest::prelude::*;

/// RAM device that counts reads reaching it.
struct CountingDevice {
    inner: MemoryBlockDevice<8, 16>,
    reads: usize,
}

impl CountingDevice {
    fn new() -> Self {
        let mut inner = MemoryBlockDevice::new();
        for (i, byte) in inner.as_bytes_mut().iter_mut().enumerate() {
            *byte = (i * 31) as u8;
        }
        Self { inner, reads: 0 }
    }
}

impl BlockDevice for CountingDevice {
    fn read_block(&mut self, dest: &mut [u8], index: u32) -> Result<(), Error> {
        self.reads += 1;
        self.inner.read_block(dest, index)
    }

    fn write_block(&mut self, src: &[u8], index: u32) -> Result<(), Error> {
        self.inner.write_block(src, index)
    }

    fn block_size(&self) -> u32 {
        self.inner.block_size()
    }

    fn total_blocks(&self) -> u32 {
        self.inner.total_blocks()
    }
}

#[derive(Debug, Clone)]
enum CacheOp {
    Read(u32),
    Write(u32, u8),
}

fn cache_op() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (0u32..16).prop_map(CacheOp::Read),
        (0u32..16, any::<u8>()).prop_map(|(i, v)| CacheOp::Write(i, v)),
    ]
}

proptest! {
    #[test]
    fn cache_matches_an_lru_model(ops in prop::collection::vec(cache_op(), 1..64)) {
        const CAPACITY: usize = 4;
        let mut device = CountingDevice::new();
        let mut reference = MemoryBlockDevice::<8, 16>::new();
        reference.as_bytes_mut().copy_from_slice(device.inner.as_bytes());

        let mut model: Vec<u32> = Vec::new();
        let mut expected_reads = 0;
        {
            let mut cache = CachedBlockDevice::<_, 8, CAPACITY>::new(&mut device).unwrap();
            for op in &ops {
                match *op {
                    CacheOp::Read(index) => {
                        let mut got = [0u8; 8];
                        let mut want = [0u8; 8];
                        cache.read_block(&mut got, index).unwrap();
                        reference.read_block(&mut want, index).unwrap();
                        prop_assert_eq!(got, want);
                        if !model.contains(&index) {
                            expected_reads += 1;
                        }
                    }
                    CacheOp::Write(index, value) => {
                        cache.write_block(&[value; 8], index).unwrap();
                        reference.write_block(&[value; 8], index).unwrap();
                    }
                }
                let index = match *op {
                    CacheOp::Read(i) | CacheOp::Write(i, _) => i,
                };
                model.retain(|&i| i != index);
                model.insert(0, index);
                model.truncate(CAPACITY);

                prop_assert!(cache.cached_indices().eq(model.iter().copied()));
            }
        }
        prop_assert_eq!(device.reads, expected_reads);
        prop_assert_eq!(device.inner.as_bytes(), reference.as_bytes());
    }

    #[test]
    fn circular_buffer_is_fifo(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..12), 1..20)) {
        let mut stream = CircularBufferStream::<16>::new();
        let mut expected = std::collections::VecDeque::new();

        for chunk in &chunks {
            let fits = chunk.len() <= stream.free();
            prop_assert_eq!(stream.write(chunk).is_ok(), fits);
            if fits {
                expected.extend(chunk.iter().copied());
            }
            prop_assert_eq!(stream.len(), expected.len());

            // drain about half each round so the cursors wrap
            let mut out = [0u8; 16];
            let take = expected.len().div_ceil(2);
            prop_assert_eq!(stream.read(&mut out[..take]), Ok(take));
            for &byte in &out[..take] {
                prop_assert_eq!(Some(byte), expected.pop_front());
            }
        }
    }

    #[test]
    fn block_streams_round_trip(
        data in prop::collection::vec(any::<u8>(), 0..100),
        first_block in 0u32..4,
        buffered in any::<bool>(),
        chunk in 1usize..20,
    ) {
        let mut device = MemoryBlockDevice::<16, 12>::new();
        {
            let mut out = BlockDeviceOutputStream::<_, 16>::new(&mut device, first_block, buffered).unwrap();
            for piece in data.chunks(chunk) {
                out.write(piece).unwrap();
            }
            out.close().unwrap();
        }

        let mut input = BlockDeviceInputStream::<_, 16>::new(&mut device, first_block).unwrap();
        let mut back = vec![0u8; data.len()];
        input.read_exact(&mut back).unwrap();
        prop_assert_eq!(back, data);
    }

    #[test]
    fn skip_then_read_matches_the_device(start in 0u32..160, first_block in 0u32..10) {
        let mut device = CountingDevice::new();
        let flat = device.inner.as_bytes().to_vec();
        let origin = first_block as usize * 8;
        let mut input = BlockDeviceInputStream::<_, 8>::new(&mut device, first_block).unwrap();

        let result = input.skip(start);
        if origin + start as usize <= flat.len() {
            prop_assert_eq!(result, Ok(()));
            let expected = flat.get(origin + start as usize).copied();
            prop_assert_eq!(input.read_byte(), Ok(expected));
        } else {
            prop_assert_eq!(result, Err(Error::InvalidSeek));
        }
    }

    #[test]
    fn lzg_round_trips_through_both_decoders(
        data in prop::collection::vec(prop_oneof![Just(b'a'), Just(b'b'), any::<u8>()], 0..600),
    ) {
        let mut packed = vec![0u8; lzg::max_encoded_size(data.len())];
        let len = lzg::encode(&data, &mut packed).unwrap();
        let packed = &packed[..len];

        prop_assert_eq!(lzg::decoded_size(packed), Ok(data.len() as u32));

        let mut whole = vec![0u8; data.len()];
        prop_assert_eq!(lzg::decode(packed, &mut whole), Ok(data.len()));
        prop_assert_eq!(&whole, &data);

        let mut source = LinearBufferStream::with_content(packed);
        let mut stream = LzgDecompressionStream::<_>::new(&mut source, len as u32).unwrap();
        let mut streamed = vec![0u8; data.len() + 8];
        prop_assert_eq!(stream.read(&mut streamed), Ok(data.len()));
        prop_assert!(!stream.available());
        prop_assert_eq!(&streamed[..data.len()], &data[..]);
    }
}
