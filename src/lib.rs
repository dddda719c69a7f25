//! Megachunk: range-based retrieval and decryption of encrypted file chunks.
//!
//! The crate covers exactly one chunk's worth of work: fetch a byte range of
//! a remotely stored ciphertext over HTTP, then transform it back to
//! plaintext with AES-128-CTR positioned at that range's byte offset. An
//! external orchestrator owns everything around it -- sequencing chunks into
//! a file, retrying failed ranges, and verifying the meta-MAC carried in the
//! key material.
//!
//! Typical flow per chunk:
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use std::time::Duration;
//! use megachunk::{ChunkDownloader, KeyMaterial, decrypt_chunk};
//!
//! let key = KeyMaterial::from_base64("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA")?;
//! let downloader = ChunkDownloader::new("https://example.com/file", Duration::from_secs(30));
//!
//! let ciphertext = downloader.download_range(0, 1024).await?;
//! let plaintext = decrypt_chunk(&ciphertext, &key, 0)?;
//! # Ok(())
//! # }
//! ```
//!
//! `KeyMaterial` is immutable after derivation and safe to share read-only
//! across concurrent chunk operations; `ChunkDownloader` wraps a
//! `reqwest::Client` and is likewise shareable. No retries happen inside the
//! crate -- every failure is returned to the caller with enough context to
//! decide on a retry.

pub mod api;
pub mod crypto;

// Re-export primary types and functions for convenience
pub use api::downloader::{ChunkDownloader, DownloadError};
pub use crypto::aes_ctr::{decrypt_chunk, DecryptError};
pub use crypto::key::{KeyError, KeyMaterial};
