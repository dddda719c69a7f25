//! HTTP range retrieval against the storage backend.
//!
//! One downloader per remote file; each call fetches a single byte range
//! and validates the server's answer before handing the bytes to the
//! decryptor.

pub mod downloader;


pub use downloader::{ChunkDownloader, DownloadError};
