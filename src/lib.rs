//! Sequential bit-level decoding of byte streams.
//!
//! A [`BitDecoder`] wraps any [`std::io::Read`] source (a file, `&[u8]`, a
//! socket, ...) and hands out its content bit by bit: single bits, integers of
//! any width from 1 to 64 bits, whole bytes, IEEE-754 floats, strings and raw
//! byte slices. Bytes are pulled from the source one at a time, exactly when
//! the previous byte has been fully consumed.
//!
//! ## Bit ordering
//! A decoder is constructed with one of two orderings, fixed for its whole
//! lifetime:
//! - [`BitOrder::MsbFirst`]: bit 7 of each byte is handed out first, and the
//!   first bit read becomes the *most* significant bit of a multi-bit result.
//! - [`BitOrder::LsbFirst`]: bit 0 of each byte first, and the first bit read
//!   becomes bit 0 of the result.
//!
//! Per-byte extraction order and multi-bit assembly order are two different
//! things (and easy to conflate); the flag drives both together, see
//! [`BitOrder`] for the exact rules.
//!
//! ```rust
//! use bitdecode::{BitDecoder, BitOrder};
//!
//! let bytes: &[u8] = &[0b1111_0000, 0b0101_0101];
//!
//! let mut msb = BitDecoder::new(bytes, BitOrder::MsbFirst);
//! assert_eq!(msb.read_bits(12).unwrap(), 0b1111_0000_0101);
//!
//! let mut lsb = BitDecoder::new(bytes, BitOrder::LsbFirst);
//! assert_eq!(lsb.read_bits(12).unwrap(), 0b0101_1111_0000);
//! ```
//!
//! ## Records
//! There is no wire format built in; a record layout is simply the sequence
//! of calls the caller issues:
//!
//! ```rust
//! use bitdecode::{BitDecoder, BitOrder};
//!
//! let bytes: &[u8] = &[0x01, b'H', b'i', 0x00, 0x12, 0x34];
//! let mut d = BitDecoder::new(bytes, BitOrder::MsbFirst);
//! assert_eq!(d.read_u8().unwrap(), 1);
//! assert_eq!(d.read_string().unwrap(), "Hi");
//! assert_eq!(d.read_u16().unwrap(), 0x1234);
//! ```
//!
//! Every checked `read_*` has a panicking `expect_*` twin for callers that
//! know enough input is left and don't want per-call error handling.
//!
//! ## Lookahead
//! [`BitDecoder::fork`] snapshots the remaining input into an independent
//! decoder with the same cursor position, which makes non-destructive peeks
//! (and the [`BitDecoder::remaining_bits`] diagnostic) possible:
//!
//! ```rust
//! use bitdecode::{BitDecoder, BitOrder};
//!
//! let bytes: &[u8] = &[0xAB, 0xCD];
//! let mut d = BitDecoder::new(bytes, BitOrder::MsbFirst);
//! d.read_bits(4).unwrap();
//!
//! let mut peek = d.fork().unwrap();
//! assert_eq!(peek.read_bits(12).unwrap(), 0xBCD);
//! // the original did not move
//! assert_eq!(d.remaining_bits().unwrap(), 12);
//! assert_eq!(d.read_bits(12).unwrap(), 0xBCD);
//! ```
//!
//! The snapshot materializes the whole remainder in memory, so don't fork a
//! decoder sitting on an unbounded stream.
//!
//! This crate only decodes; there is no writer and no seeking.

pub mod decoder;
mod strings;
pub mod utils;
mod values;

pub use decoder::{BitDecoder, BitOrder, DecodeError};
