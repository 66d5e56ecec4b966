//! Typed convenience reads on top of the raw bit primitives, plus the
//! panicking `expect_*` twins.
//!
//! Multi-byte integers follow the decoder's [`BitOrder`](crate::BitOrder):
//! byte-aligned reads come out big-endian in `MsbFirst` mode and
//! little-endian in `LsbFirst` mode. Signed variants reinterpret the raw
//! bits as two's complement at the requested width; floats reinterpret them
//! as IEEE-754 bit patterns, no rounding anywhere.
//!
//! The `expect_*` twins are for callers that already know enough input is
//! left (a fixed header, a length-prefixed record): they trade the
//! per-call `Result` for a panic on failure. They never hand back a default
//! value.

use std::io::Read;

use crate::decoder::{BitDecoder, DecodeError};

// fn $read_fn(&mut self) -> Result<$ty, DecodeError>
// fn $expect_fn(&mut self) -> $ty
macro_rules! impl_typed_reads {
    ($($(#[$doc:meta])* $read_fn:ident / $expect_fn:ident -> $ty:ty),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $read_fn(&mut self) -> Result<$ty, DecodeError> {
                self.read_bits(<$ty>::BITS as usize).map(|v| v as $ty)
            }

            /// Unwrap-or-crash twin of the checked read: panics where the
            /// checked version would return an error.
            pub fn $expect_fn(&mut self) -> $ty {
                match self.$read_fn() {
                    Ok(v) => v,
                    Err(e) => panic!("{} failed: {}", stringify!($read_fn), e),
                }
            }
        )*
    };
}

impl<R: Read> BitDecoder<R> {
    /// Reads a single bit as a flag: `true` iff the bit is set.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        self.read_bit()
    }

    impl_typed_reads! {
        /// Reads 8 bits as an unsigned byte.
        read_u8 / expect_u8 -> u8,
        /// Reads 8 bits as a signed byte (two's complement).
        read_i8 / expect_i8 -> i8,
        /// Reads 16 bits as an unsigned integer.
        read_u16 / expect_u16 -> u16,
        /// Reads 16 bits as a signed integer (two's complement).
        read_i16 / expect_i16 -> i16,
        /// Reads 32 bits as an unsigned integer.
        read_u32 / expect_u32 -> u32,
        /// Reads 32 bits as a signed integer (two's complement).
        read_i32 / expect_i32 -> i32,
        /// Reads 64 bits as an unsigned integer.
        read_u64 / expect_u64 -> u64,
        /// Reads 64 bits as a signed integer (two's complement).
        read_i64 / expect_i64 -> i64,
    }

    /// Reads 32 bits and reinterprets them as an IEEE-754 single.
    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.read_bits(32).map(|v| f32::from_bits(v as u32))
    }

    /// Reads 64 bits and reinterprets them as an IEEE-754 double.
    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.read_bits(64).map(f64::from_bits)
    }

    /// Panicking twin of [`BitDecoder::read_bool`].
    pub fn expect_bool(&mut self) -> bool {
        match self.read_bool() {
            Ok(v) => v,
            Err(e) => panic!("read_bool failed: {}", e),
        }
    }

    /// Panicking twin of [`BitDecoder::read_f32`].
    pub fn expect_f32(&mut self) -> f32 {
        match self.read_f32() {
            Ok(v) => v,
            Err(e) => panic!("read_f32 failed: {}", e),
        }
    }

    /// Panicking twin of [`BitDecoder::read_f64`].
    pub fn expect_f64(&mut self) -> f64 {
        match self.read_f64() {
            Ok(v) => v,
            Err(e) => panic!("read_f64 failed: {}", e),
        }
    }

    /// Panicking twin of [`BitDecoder::read_bits`].
    pub fn expect_bits(&mut self, nbits: usize) -> u64 {
        match self.read_bits(nbits) {
            Ok(v) => v,
            Err(e) => panic!("read_bits({}) failed: {}", nbits, e),
        }
    }

    /// Panicking twin of [`BitDecoder::read_bytes`].
    pub fn expect_bytes(&mut self, nbytes: usize) -> u64 {
        match self.read_bytes(nbytes) {
            Ok(v) => v,
            Err(e) => panic!("read_bytes({}) failed: {}", nbytes, e),
        }
    }

    /// Panicking twin of [`BitDecoder::read_bits_to_slice`].
    pub fn expect_bits_to_slice(&mut self, nbits: usize) -> Vec<u8> {
        match self.read_bits_to_slice(nbits) {
            Ok(v) => v,
            Err(e) => panic!("read_bits_to_slice({}) failed: {}", nbits, e),
        }
    }

    /// Panicking twin of [`BitDecoder::read_bytes_to_slice`].
    pub fn expect_bytes_to_slice(&mut self, nbytes: usize) -> Vec<u8> {
        match self.read_bytes_to_slice(nbytes) {
            Ok(v) => v,
            Err(e) => panic!("read_bytes_to_slice({}) failed: {}", nbytes, e),
        }
    }
}
