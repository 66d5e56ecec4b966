//! Small helpers shared by the tests and benchmarks: deterministic random
//! buffers, and rendering a byte buffer as the bit sequence a decoder
//! would actually hand out.

use bitvec::order::{Lsb0, Msb0};
use bitvec::view::BitView;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::BitOrder;

/// Generates `n` random bytes off a seeded rng. Same seed, same bytes.
pub fn random_bytes(n: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = vec![0_u8; n];
    rng.fill_bytes(&mut out);
    out
}

/// Renders `bytes` as a string of `0`/`1`, in the order a decoder with the
/// given [`BitOrder`] would hand the bits out.
///
/// Just for debugging purpose (test failure output mostly).
///
/// ```rust
/// use bitdecode::BitOrder;
/// use bitdecode::utils::bit_string;
/// assert_eq!(bit_string(&[0b1010_0000], BitOrder::MsbFirst), "10100000");
/// assert_eq!(bit_string(&[0b1010_0000], BitOrder::LsbFirst), "00000101");
/// ```
pub fn bit_string(bytes: &[u8], order: BitOrder) -> String {
    match order {
        BitOrder::MsbFirst => bytes
            .view_bits::<Msb0>()
            .iter()
            .map(|b| if *b { "1" } else { "0" })
            .join(""),
        BitOrder::LsbFirst => bytes
            .view_bits::<Lsb0>()
            .iter()
            .map(|b| if *b { "1" } else { "0" })
            .join(""),
    }
}
