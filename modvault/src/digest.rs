//! Content digests for installed artifacts.
//!
//! The store deduplicates re-downloads by comparing SHA-256 digests of the
//! incoming byte stream against files already on disk. Digests are compared
//! as lowercase hex strings; byte-for-byte equality is what matters, never
//! file size alone.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 digest of an in-memory byte stream.
///
/// Returns the digest as a lowercase hex string.
pub fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Calculate the SHA-256 digest of a file on disk.
///
/// Reads in 8 KiB chunks so large artifacts never have to fit in memory.
/// Returns the digest as a lowercase hex string.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;

    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

/// Async variant of [`sha256_file`] for use inside store operations.
pub async fn sha256_file_async(path: &Path) -> std::io::Result<String> {
    use tokio::io::AsyncReadExt;

    let file = tokio::fs::File::open(path).await?;

    let mut reader = tokio::io::BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer).await?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}
