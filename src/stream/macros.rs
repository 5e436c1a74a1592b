/// Generates a provided read method for a single primitive type.
macro_rules! impl_read_primitive {
    // Single byte types - no endianness suffix
    (u8) => {
        /// Reads a `u8`.
        ///
        /// Fails with [`Error::EndOfStream`](crate::Error::EndOfStream) if the stream is exhausted.
        #[inline]
        fn read_u8(&mut self) -> Result<u8, crate::Error> {
            self.read_byte()?.ok_or(crate::Error::EndOfStream)
        }
    };
    (i8) => {
        /// Reads an `i8`.
        ///
        /// Fails with [`Error::EndOfStream`](crate::Error::EndOfStream) if the stream is exhausted.
        #[inline]
        fn read_i8(&mut self) -> Result<i8, crate::Error> {
            self.read_u8().map(|b| b as i8)
        }
    };
    // Multi-byte types - le/be variants
    ($type:ty, $size:literal) => {
        paste::paste! {
            #[doc = "Reads a little-endian `" $type "`."]
            #[doc = ""]
            #[doc = "Fails with `Error::EndOfStream` if fewer than " $size " bytes remain."]
            #[inline]
            fn [<read_ $type _le>](&mut self) -> Result<$type, crate::Error> {
                let mut bytes = [0u8; $size];
                self.read_exact(&mut bytes)?;
                Ok(<$type>::from_le_bytes(bytes))
            }

            #[doc = "Reads a big-endian `" $type "`."]
            #[doc = ""]
            #[doc = "Fails with `Error::EndOfStream` if fewer than " $size " bytes remain."]
            #[inline]
            fn [<read_ $type _be>](&mut self) -> Result<$type, crate::Error> {
                let mut bytes = [0u8; $size];
                self.read_exact(&mut bytes)?;
                Ok(<$type>::from_be_bytes(bytes))
            }
        }
    };
}

/// Generates provided read methods for all standard primitive types.
macro_rules! impl_read_primitives {
    () => {
        impl_read_primitive!(u8);
        impl_read_primitive!(i8);
        impl_read_primitive!(u16, 2);
        impl_read_primitive!(i16, 2);
        impl_read_primitive!(u32, 4);
        impl_read_primitive!(i32, 4);
    };
}

/// Generates a provided write method for a single primitive type.
macro_rules! impl_write_primitive {
    (u8) => {
        /// Writes a `u8`.
        #[inline]
        fn write_u8(&mut self, value: u8) -> Result<(), crate::Error> {
            self.write_byte(value)
        }
    };
    (i8) => {
        /// Writes an `i8`.
        #[inline]
        fn write_i8(&mut self, value: i8) -> Result<(), crate::Error> {
            self.write_byte(value as u8)
        }
    };
    ($type:ty, $size:literal) => {
        paste::paste! {
            #[doc = "Writes a little-endian `" $type "` as a single " $size "-byte write."]
            #[inline]
            fn [<write_ $type _le>](&mut self, value: $type) -> Result<(), crate::Error> {
                self.write(&value.to_le_bytes())
            }

            #[doc = "Writes a big-endian `" $type "` as a single " $size "-byte write."]
            #[inline]
            fn [<write_ $type _be>](&mut self, value: $type) -> Result<(), crate::Error> {
                self.write(&value.to_be_bytes())
            }
        }
    };
}

/// Generates provided write methods for all standard primitive types.
macro_rules! impl_write_primitives {
    () => {
        impl_write_primitive!(u8);
        impl_write_primitive!(i8);
        impl_write_primitive!(u16, 2);
        impl_write_primitive!(i16, 2);
        impl_write_primitive!(u32, 4);
        impl_write_primitive!(i32, 4);
    };
}

pub(super) use impl_read_primitive;
pub(super) use impl_read_primitives;
pub(super) use impl_write_primitive;
pub(super) use impl_write_primitives;
