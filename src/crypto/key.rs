//! Key material derivation from the compact file-key token.
//!
//! The token is a URL-safe unpadded base64 string decoding to exactly 32
//! bytes. The two 16-byte halves are XOR-folded into the AES-128 cipher key;
//! the second half additionally carries the 8-byte CTR IV and the 8-byte
//! meta-MAC verbatim. The fold deliberately discards entropy -- it is the
//! fixed key-derivation contract of the storage backend and cannot be
//! changed here.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-128 cipher key size in bytes.
pub const KEY_SIZE: usize = 16;

/// CTR IV size in bytes (high half of the 16-byte counter block).
pub const IV_SIZE: usize = 8;

/// Meta-MAC size in bytes.
pub const META_MAC_SIZE: usize = 8;

/// Decoded token size in bytes.
const TOKEN_SIZE: usize = 32;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key token is not valid URL-safe base64")]
    Format,
    #[error("invalid key length: expected {TOKEN_SIZE} decoded bytes, got {got}")]
    Length { got: usize },
}

/// Symmetric key material for one remote file.
///
/// Derived once per download session and shared read-only across any number
/// of concurrent chunk operations. `meta_mac` is opaque to this crate; an
/// orchestrator compares it against the MAC accumulated over the decrypted
/// stream. The cipher key is zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    /// AES-128 key, XOR fold of the two token halves.
    pub key: [u8; KEY_SIZE],
    /// Base IV placed in the high 8 bytes of the counter block.
    #[zeroize(skip)]
    pub iv: [u8; IV_SIZE],
    /// Integrity tag for whole-file MAC verification by the caller.
    #[zeroize(skip)]
    pub meta_mac: [u8; META_MAC_SIZE],
}

// Keep the cipher key out of logs and panic messages; iv and meta_mac
// are not secret.
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"<redacted>")
            .field("iv", &self.iv)
            .field("meta_mac", &self.meta_mac)
            .finish()
    }
}

impl KeyMaterial {
    /// Derive key material from a URL-safe unpadded base64 token.
    ///
    /// `key[i] = decoded[i] ^ decoded[i + 16]`, `iv = decoded[16..24]`,
    /// `meta_mac = decoded[24..32]`. Deterministic, no side effects.
    pub fn from_base64(token: &str) -> Result<Self, KeyError> {
        let decoded = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| KeyError::Format)?;
        if decoded.len() != TOKEN_SIZE {
            return Err(KeyError::Length { got: decoded.len() });
        }

        let mut key = [0u8; KEY_SIZE];
        for (i, k) in key.iter_mut().enumerate() {
            *k = decoded[i] ^ decoded[i + KEY_SIZE];
        }

        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&decoded[16..24]);
        let mut meta_mac = [0u8; META_MAC_SIZE];
        meta_mac.copy_from_slice(&decoded[24..32]);

        Ok(Self { key, iv, meta_mac })
    }
}
