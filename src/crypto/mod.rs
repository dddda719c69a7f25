//! Key derivation and counter-mode chunk decryption.
//!
//! Matches the key-token and stream-cipher layout used by the storage
//! backend: a 32-byte token folds into an AES-128 key, an 8-byte CTR IV, and
//! an 8-byte meta-MAC. All operations here are pure functions over explicit
//! inputs; nothing is cached or mutated after derivation.

pub mod aes_ctr;
pub mod key;

#[cfg(test)]
mod tests;

// Re-export primary functions for convenience
pub use aes_ctr::{decrypt_chunk, DecryptError};
pub use key::{KeyError, KeyMaterial};
