//! The core decoder: pulls bytes from a [`Read`] source one at a time and
//! hands out single bits, multi-bit integers, skips, snapshots and raw
//! slices.
//!
//! The situation with the two orderings, on the example bytes
//! `[0b11110000, 0b01010101]` and a 12 bit read:
//!
//! ```text
//! MsbFirst: bits come out 1,1,1,1,0,0,0,0,0,1,0,1
//!           first bit read is the highest result bit -> 0b1111_0000_0101 (0xF05)
//! LsbFirst: bits come out 0,0,0,0,1,1,1,1,1,0,1,0
//!           i-th bit read is result bit i            -> 0b0101_1111_0000 (0x5F0)
//! ```
//!
//! Note that a byte-aligned `read_bits(8)` yields the byte value itself in
//! *both* orderings; the orderings only disagree on where the bits of a
//! partial byte sit and how bits are glued across bytes.

use std::io::{self, Read};

use byteorder::ReadBytesExt;
use thiserror::Error;

/// Which bit of each byte is handed out first.
///
/// The flag pins down two rules at once:
/// - extraction: with `MsbFirst` the bit at position `7 - bit_pos` of the
///   current byte is read next, with `LsbFirst` the bit at `bit_pos`.
/// - assembly: `read_bits(n)` places the i-th bit it read at result position
///   `n - 1 - i` (`MsbFirst`) or `i` (`LsbFirst`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// Most significant bit of each byte first; first bit read lands in the
    /// highest bit of a multi-bit result.
    MsbFirst,
    /// Least significant bit of each byte first; first bit read lands in bit
    /// 0 of a multi-bit result.
    LsbFirst,
}

/// Everything that can go wrong while decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The source ran out of bytes in the middle of a read.
    #[error("end of stream: no bytes left to read")]
    UnexpectedEof,
    /// `read_bits` takes between 1 and 64 bits.
    #[error("bit count should be between 1 and 64, got {0}")]
    InvalidBitCount(usize),
    /// `read_bytes` takes between 1 and 8 bytes.
    #[error("byte count should be between 1 and 8, got {0}")]
    InvalidByteCount(usize),
    /// Any other io error coming out of the underlying source, unchanged.
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cold]
#[inline(never)]
fn end_of_stream() -> DecodeError {
    DecodeError::UnexpectedEof
}

/// Sequential bit-level decoder over a byte source.
///
/// Tracks the most recently pulled byte (`cur_byte`) and the position of the
/// next unread bit within it (`bit_pos`, always in `0..8`). A fresh byte is
/// pulled from the source exactly when `bit_pos` is 0 and a bit is requested.
/// Every read and skip mutates the decoder in place; there is no rollback,
/// so after a failed multi-bit read the bits consumed so far stay consumed
/// (observable via [`BitDecoder::bit_position`] and subsequent reads).
///
/// The decoder itself is single-owner and does no internal synchronization.
/// [`BitDecoder::fork`] is the one sanctioned way to diverge: it hands back a
/// decoder over a private copy of the remaining input, which can then be
/// driven independently (a different thread included).
pub struct BitDecoder<R> {
    source: R,
    /// snapshot remainder from `fork()`, drained before `source` is touched
    replay: io::Cursor<Vec<u8>>,
    cur_byte: u8,
    /// next bit of `cur_byte` to hand out, 0..8
    bit_pos: u8,
    order: BitOrder,
}

impl<R: Read> BitDecoder<R> {
    /// Creates a decoder over `source`. The ordering is fixed for the
    /// decoder's entire lifetime.
    pub fn new(source: R, order: BitOrder) -> Self {
        BitDecoder {
            source,
            replay: io::Cursor::new(Vec::new()),
            cur_byte: 0, // never inspected before the first pull
            bit_pos: 0,
            order,
        }
    }

    /// The ordering this decoder was constructed with.
    pub fn order(&self) -> BitOrder {
        self.order
    }

    /// Position of the next unread bit within the current byte, in `0..8`.
    ///
    /// 0 means the next bit read will pull a fresh byte from the source.
    pub fn bit_position(&self) -> u8 {
        self.bit_pos
    }

    /// Gives back the raw source.
    ///
    /// A partially consumed byte and any snapshot remainder buffered by
    /// [`BitDecoder::fork`] are dropped, so only call this before forking
    /// and on a byte boundary if you intend to keep reading from the source
    /// yourself.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Pulls the next raw byte: first off the fork snapshot (if any is
    /// left), then off the live source.
    fn pull_byte(&mut self) -> Result<u8, DecodeError> {
        match (&mut self.replay).chain(&mut self.source).read_u8() {
            Ok(b) => Ok(b),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(end_of_stream()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads a single bit.
    pub fn read_bit(&mut self) -> Result<bool, DecodeError> {
        if self.bit_pos == 0 {
            self.cur_byte = self.pull_byte()?;
        }
        let bit = match self.order {
            BitOrder::LsbFirst => (self.cur_byte >> self.bit_pos) & 1,
            BitOrder::MsbFirst => (self.cur_byte >> (7 - self.bit_pos)) & 1,
        };
        self.bit_pos = (self.bit_pos + 1) % 8;
        Ok(bit == 1)
    }

    /// Reads `nbits` bits (1..=64) and assembles them into a `u64` according
    /// to the decoder's [`BitOrder`]; see the module docs for the exact
    /// placement rules and a worked example.
    pub fn read_bits(&mut self, nbits: usize) -> Result<u64, DecodeError> {
        if nbits < 1 || nbits > 64 {
            return Err(DecodeError::InvalidBitCount(nbits));
        }
        let mut value = 0_u64;
        for i in 0..nbits {
            let bit = u64::from(self.read_bit()?);
            match self.order {
                BitOrder::LsbFirst => value |= bit << i,
                BitOrder::MsbFirst => value |= bit << (nbits - 1 - i),
            }
        }
        Ok(value)
    }

    /// Reads `nbytes` bytes (1..=8) as one integer, i.e. `read_bits(8 * nbytes)`.
    ///
    /// Does not need the cursor to sit on a byte boundary.
    pub fn read_bytes(&mut self, nbytes: usize) -> Result<u64, DecodeError> {
        if nbytes < 1 || nbytes > 8 {
            return Err(DecodeError::InvalidByteCount(nbytes));
        }
        self.read_bits(8 * nbytes)
    }

    /// Advances the cursor by `nbits` without assembling a value.
    ///
    /// Whole bytes are bulk-consumed straight off the source (the last one
    /// becomes the current byte, `bit_pos` is unchanged), the remaining
    /// `nbits % 8` bits go through [`BitDecoder::read_bit`]. On
    /// [`DecodeError::UnexpectedEof`] the input consumed so far stays
    /// consumed.
    pub fn skip_bits(&mut self, nbits: usize) -> Result<(), DecodeError> {
        let whole = nbits / 8;
        if whole > 0 {
            let mut buf = vec![0_u8; whole];
            match (&mut self.replay).chain(&mut self.source).read_exact(&mut buf) {
                Ok(()) => self.cur_byte = buf[whole - 1],
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(end_of_stream())
                }
                Err(e) => return Err(e.into()),
            }
        }
        for _ in 0..nbits % 8 {
            self.read_bit()?;
        }
        Ok(())
    }

    /// Advances the cursor by `nbytes` bytes, see [`BitDecoder::skip_bits`].
    pub fn skip_bytes(&mut self, nbytes: usize) -> Result<(), DecodeError> {
        self.skip_bits(8 * nbytes)
    }

    /// Reads `nbits` bits into a byte vector of `ceil(nbits / 8)` entries.
    ///
    /// All entries but the last come from full 8-bit reads; when `nbits` is
    /// not a multiple of 8, the last entry holds the remaining `nbits % 8`
    /// bits in its low-order positions (exactly what `read_bits(nbits % 8)`
    /// would have produced, not reinterpreted as a full byte).
    pub fn read_bits_to_slice(&mut self, nbits: usize) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::with_capacity(nbits.div_ceil(8));
        for _ in 0..nbits / 8 {
            out.push(self.read_bits(8)? as u8);
        }
        if nbits % 8 != 0 {
            out.push(self.read_bits(nbits % 8)? as u8);
        }
        Ok(out)
    }

    /// Reads `nbytes` sequential single-byte values into a vector.
    pub fn read_bytes_to_slice(&mut self, nbytes: usize) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::with_capacity(nbytes);
        for _ in 0..nbytes {
            out.push(self.read_bits(8)? as u8);
        }
        Ok(out)
    }

    /// Snapshots the decoder: materializes all remaining unread bytes and
    /// returns an independent decoder over a private copy of them, with
    /// identical cursor state (current byte, bit position, ordering).
    ///
    /// The original keeps going over its own copy of the remainder; the two
    /// share no mutable state afterwards and may be driven from different
    /// threads. Cost (time and memory) is proportional to the remaining
    /// input, so this must not be used on unbounded sources.
    pub fn fork(&mut self) -> Result<BitDecoder<io::Cursor<Vec<u8>>>, DecodeError> {
        let mut rest = Vec::new();
        (&mut self.replay)
            .chain(&mut self.source)
            .read_to_end(&mut rest)?;
        self.replay = io::Cursor::new(rest.clone());
        Ok(BitDecoder {
            source: io::Cursor::new(rest),
            replay: io::Cursor::new(Vec::new()),
            cur_byte: self.cur_byte,
            bit_pos: self.bit_pos,
            order: self.order,
        })
    }

    /// Counts the bits left in the input without moving the cursor: forks,
    /// then skips the fork forward bit by bit until it hits the end.
    ///
    /// O(remaining bits) and it buffers the whole remainder in memory (see
    /// [`BitDecoder::fork`]), so this is a diagnostic for bounded inputs,
    /// not something for a hot path.
    pub fn remaining_bits(&mut self) -> Result<usize, DecodeError> {
        let mut probe = self.fork()?;
        let mut count = 0;
        loop {
            match probe.skip_bits(1) {
                Ok(()) => count += 1,
                Err(DecodeError::UnexpectedEof) => return Ok(count),
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_read_bit_msb() {
        let mut d = BitDecoder::new(&[0b1010_0000_u8][..], BitOrder::MsbFirst);
        assert_eq!(d.read_bit().unwrap(), true);
        assert_eq!(d.read_bit().unwrap(), false);
        assert_eq!(d.read_bit().unwrap(), true);
        assert_eq!(d.bit_position(), 3);
    }

    #[test]
    fn test_read_bit_lsb() {
        let mut d = BitDecoder::new(&[0b0000_0101_u8][..], BitOrder::LsbFirst);
        assert_eq!(d.read_bit().unwrap(), true);
        assert_eq!(d.read_bit().unwrap(), false);
        assert_eq!(d.read_bit().unwrap(), true);
        assert_eq!(d.bit_position(), 3);
    }

    #[test]
    fn test_twelve_bits_msb() {
        let mut d = BitDecoder::new(&[0b1111_0000_u8, 0b0101_0101][..], BitOrder::MsbFirst);
        assert_eq!(d.read_bits(12).unwrap(), 0xF05);
        // the remaining low nibble of the second byte
        assert_eq!(d.read_bits(4).unwrap(), 0b0101);
    }

    #[test]
    fn test_twelve_bits_lsb() {
        let mut d = BitDecoder::new(&[0b1111_0000_u8, 0b0101_0101][..], BitOrder::LsbFirst);
        assert_eq!(d.read_bits(12).unwrap(), 0b0101_1111_0000);
        assert_eq!(d.read_bits(4).unwrap(), 0b0101);
    }

    #[test]
    fn test_read_bits_rejects_bad_widths() {
        let mut d = BitDecoder::new(&[0xFF_u8, 0xFF][..], BitOrder::MsbFirst);
        assert!(matches!(d.read_bits(0), Err(DecodeError::InvalidBitCount(0))));
        assert!(matches!(d.read_bits(65), Err(DecodeError::InvalidBitCount(65))));
        // the rejection consumed nothing
        assert_eq!(d.remaining_bits().unwrap(), 16);
        assert_eq!(d.read_bits(16).unwrap(), 0xFFFF);
    }

    #[test]
    fn test_read_bytes() {
        let mut d = BitDecoder::new(&[0x12_u8, 0x34][..], BitOrder::MsbFirst);
        assert_eq!(d.read_bytes(2).unwrap(), 0x1234);

        let mut d = BitDecoder::new(&[0x12_u8, 0x34][..], BitOrder::LsbFirst);
        assert_eq!(d.read_bytes(2).unwrap(), 0x3412);
    }

    #[test]
    fn test_read_bytes_rejects_bad_widths() {
        let mut d = BitDecoder::new(&[0xFF_u8][..], BitOrder::MsbFirst);
        assert!(matches!(d.read_bytes(0), Err(DecodeError::InvalidByteCount(0))));
        assert!(matches!(d.read_bytes(9), Err(DecodeError::InvalidByteCount(9))));
        assert_eq!(d.read_bytes(1).unwrap(), 0xFF);
    }

    #[test]
    fn test_sixtyfour_bits_follow_byte_endianness() {
        let bytes = [1_u8, 2, 3, 4, 5, 6, 7, 8];

        let mut d = BitDecoder::new(&bytes[..], BitOrder::MsbFirst);
        assert_eq!(d.read_bits(64).unwrap(), u64::from_be_bytes(bytes));

        let mut d = BitDecoder::new(&bytes[..], BitOrder::LsbFirst);
        assert_eq!(d.read_bits(64).unwrap(), u64::from_le_bytes(bytes));
    }

    #[test]
    fn test_eof_yields_error_not_zero() {
        let mut d = BitDecoder::new(&[][..], BitOrder::MsbFirst);
        assert!(matches!(d.read_bit(), Err(DecodeError::UnexpectedEof)));

        let mut d = BitDecoder::new(&[0xAB_u8][..], BitOrder::LsbFirst);
        assert_eq!(d.read_bits(8).unwrap(), 0xAB);
        assert!(matches!(d.read_bit(), Err(DecodeError::UnexpectedEof)));
    }

    #[test]
    fn test_failed_multibit_read_keeps_consumed_bits() {
        let mut d = BitDecoder::new(&[0xFF_u8][..], BitOrder::MsbFirst);
        // 12 > 8 available: the first 8 bits get consumed before the error
        assert!(matches!(d.read_bits(12), Err(DecodeError::UnexpectedEof)));
        assert_eq!(d.bit_position(), 0);
        assert!(matches!(d.read_bit(), Err(DecodeError::UnexpectedEof)));
    }

    #[test]
    fn test_skip_bits_partial_byte() {
        let mut d = BitDecoder::new(&[0b1010_1111_u8][..], BitOrder::MsbFirst);
        d.skip_bits(4).unwrap();
        assert_eq!(d.read_bits(4).unwrap(), 0b1111);
    }

    #[test]
    fn test_skip_whole_bytes_keeps_bit_pos() {
        let mut d = BitDecoder::new(&[0xAB_u8, 0xCD, 0xEF][..], BitOrder::MsbFirst);
        assert_eq!(d.read_bits(4).unwrap(), 0xA);
        d.skip_bits(8).unwrap();
        assert_eq!(d.bit_position(), 4);
        assert_eq!(d.read_bits(4).unwrap(), 0xD);
        assert_eq!(d.read_bits(8).unwrap(), 0xEF);
    }

    #[test]
    fn test_skip_bytes() {
        let mut d = BitDecoder::new(&[0x01_u8, 0x02, 0x03][..], BitOrder::LsbFirst);
        d.skip_bytes(2).unwrap();
        assert_eq!(d.read_bits(8).unwrap(), 0x03);
    }

    #[test]
    fn test_skip_past_end() {
        let mut d = BitDecoder::new(&[0xAA_u8][..], BitOrder::MsbFirst);
        assert!(matches!(d.skip_bits(16), Err(DecodeError::UnexpectedEof)));

        // partial consumption is not rolled back: the whole-byte part of the
        // skip succeeds, the trailing bit fails
        let mut d = BitDecoder::new(&[0xAA_u8][..], BitOrder::MsbFirst);
        assert!(matches!(d.skip_bits(9), Err(DecodeError::UnexpectedEof)));
        assert!(matches!(d.read_bit(), Err(DecodeError::UnexpectedEof)));
    }

    #[test]
    fn test_skip_zero_is_a_noop() {
        let mut d = BitDecoder::new(&[0xF0_u8][..], BitOrder::MsbFirst);
        d.skip_bits(0).unwrap();
        d.skip_bytes(0).unwrap();
        assert_eq!(d.read_bits(4).unwrap(), 0xF);
    }

    #[test]
    fn test_fork_mid_byte() {
        let mut d = BitDecoder::new(&[0b1010_1100_u8, 0xFF][..], BitOrder::MsbFirst);
        assert_eq!(d.read_bits(3).unwrap(), 0b101);

        let mut peek = d.fork().unwrap();
        assert_eq!(peek.read_bits(5).unwrap(), 0b0_1100);
        assert_eq!(peek.read_bits(8).unwrap(), 0xFF);
        assert!(matches!(peek.read_bit(), Err(DecodeError::UnexpectedEof)));

        // draining the fork did not move the original
        assert_eq!(d.read_bits(5).unwrap(), 0b0_1100);
        assert_eq!(d.read_bits(8).unwrap(), 0xFF);
    }

    #[test]
    fn test_advancing_original_leaves_fork_alone() {
        let mut d = BitDecoder::new(&[0x12_u8, 0x34, 0x56][..], BitOrder::LsbFirst);
        d.read_bits(8).unwrap();

        let mut peek = d.fork().unwrap();
        d.read_bits(16).unwrap();
        assert!(matches!(d.read_bit(), Err(DecodeError::UnexpectedEof)));

        assert_eq!(peek.read_bits(8).unwrap(), 0x34);
        assert_eq!(peek.read_bits(8).unwrap(), 0x56);
    }

    #[test]
    fn test_fork_of_a_fork() {
        let mut d = BitDecoder::new(&[0xDE_u8, 0xAD][..], BitOrder::MsbFirst);
        let mut f1 = d.fork().unwrap();
        f1.read_bits(8).unwrap();
        let mut f2 = f1.fork().unwrap();
        assert_eq!(f2.read_bits(8).unwrap(), 0xAD);
        assert_eq!(d.read_bits(16).unwrap(), 0xDEAD);
    }

    #[test]
    fn test_remaining_bits() {
        let mut d = BitDecoder::new(&[0xFF_u8, 0x00][..], BitOrder::MsbFirst);
        assert_eq!(d.remaining_bits().unwrap(), 16);
        // the count did not consume anything
        assert_eq!(d.read_bits(3).unwrap(), 0b111);
        assert_eq!(d.remaining_bits().unwrap(), 13);
        d.read_bits(13).unwrap();
        assert_eq!(d.remaining_bits().unwrap(), 0);
    }

    #[test]
    fn test_bits_to_slice() {
        let mut d = BitDecoder::new(&[0xF0_u8, 0x55][..], BitOrder::MsbFirst);
        assert_eq!(d.read_bits_to_slice(12).unwrap(), vec![0xF0, 0x05]);

        let mut d = BitDecoder::new(&[0xF0_u8, 0x55][..], BitOrder::LsbFirst);
        assert_eq!(d.read_bits_to_slice(12).unwrap(), vec![0xF0, 0x05]);

        // a multiple of 8 ends on a full byte
        let mut d = BitDecoder::new(&[0xF0_u8, 0x55][..], BitOrder::MsbFirst);
        assert_eq!(d.read_bits_to_slice(16).unwrap(), vec![0xF0, 0x55]);

        let mut d = BitDecoder::new(&[0xF0_u8][..], BitOrder::MsbFirst);
        assert_eq!(d.read_bits_to_slice(0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_bytes_to_slice() {
        let mut d = BitDecoder::new(&[0x01_u8, 0x02, 0x03][..], BitOrder::LsbFirst);
        assert_eq!(d.read_bytes_to_slice(3).unwrap(), vec![0x01, 0x02, 0x03]);

        // works off a bit boundary too: everything shifts by the nibble
        let mut d = BitDecoder::new(&[0x12_u8, 0x34][..], BitOrder::MsbFirst);
        d.skip_bits(4).unwrap();
        assert_eq!(d.read_bytes_to_slice(1).unwrap(), vec![0x23]);
    }

    #[test]
    fn test_into_inner() {
        let mut d = BitDecoder::new(&[0x12_u8, 0x34][..], BitOrder::MsbFirst);
        d.read_bits(8).unwrap();
        let rest = d.into_inner();
        assert_eq!(rest, &[0x34]);
    }
}
