//! AES-128-CTR chunk decryption at arbitrary stream offsets.
//!
//! CTR mode enables random-access decryption (any byte range without
//! processing preceding bytes), which is what makes parallel range
//! downloads possible: the counter for a chunk starting at byte `offset`
//! is the base IV advanced by `offset / 16` block-units.
//!
//! Uses Ctr128BE (big-endian 128-bit counter), so carries out of the
//! 8-byte IV half propagate across the whole counter block.
//!
//! SECURITY NOTE: AES-CTR does NOT provide authentication. Integrity is
//! the caller's job, via the meta-MAC carried in [`KeyMaterial`].

use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};
use thiserror::Error;

use super::key::KeyMaterial;

/// AES block size in bytes; also the counter-block size.
pub const AES_BLOCK_SIZE: usize = 16;

/// Type alias for AES-128-CTR with a full-block big-endian counter.
type Aes128Ctr128BE = ctr::Ctr128BE<Aes128>;

#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("empty chunk")]
    EmptyInput,
    #[error("chunk offset {offset} is not a multiple of {AES_BLOCK_SIZE}")]
    MisalignedOffset { offset: u64 },
}

/// Decrypt one ciphertext chunk whose first byte sits at absolute stream
/// position `offset`.
///
/// CTR encrypt == decrypt (XOR is symmetric), so the same call turns
/// plaintext into ciphertext; tests rely on that to build fixtures.
///
/// `offset` must be a multiple of the block size: the keystream is
/// generated from the block boundary at `offset / 16` and applied from
/// byte 0 of `chunk`, so a misaligned offset would XOR against the wrong
/// keystream bytes. Misalignment is rejected rather than tolerated.
///
/// Empty chunks are rejected as degenerate requests -- a zero-length range
/// is a caller bug, not something to answer with empty output.
pub fn decrypt_chunk(
    chunk: &[u8],
    key: &KeyMaterial,
    offset: u64,
) -> Result<Vec<u8>, DecryptError> {
    if chunk.is_empty() {
        return Err(DecryptError::EmptyInput);
    }
    if offset % AES_BLOCK_SIZE as u64 != 0 {
        return Err(DecryptError::MisalignedOffset { offset });
    }

    // Counter block: IV in the high 8 bytes, zero low half, advanced to
    // the block containing `offset`.
    let mut counter = [0u8; AES_BLOCK_SIZE];
    counter[..key.iv.len()].copy_from_slice(&key.iv);
    advance_counter(&mut counter, offset / AES_BLOCK_SIZE as u64);

    let mut cipher = Aes128Ctr128BE::new((&key.key).into(), (&counter).into());

    let mut output = chunk.to_vec();
    cipher.apply_keystream(&mut output);
    Ok(output)
}

/// Add `n` to a big-endian counter, byte-wise from the least significant
/// end: each step adds the low byte of the remaining increment, pushes a
/// carry into the next step when the sum overflows, and stops once no
/// increment bytes and no carry remain.
pub(crate) fn advance_counter(block: &mut [u8], mut n: u64) {
    for i in (0..block.len()).rev() {
        if n == 0 {
            break;
        }
        let sum = u64::from(block[i]) + (n & 0xff);
        block[i] = (sum & 0xff) as u8;
        n >>= 8;
        if sum > 0xff {
            n += 1;
        }
    }
}
