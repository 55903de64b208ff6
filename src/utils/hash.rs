use anyhow::{Context, Result};
use memmap2::MmapOptions;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use xxhash_rust::xxh3::{Xxh3, xxh3_128};

/// Files at or above this size are memory-mapped instead of read into a buffer.
pub const MMAP_THRESHOLD: u64 = 1_048_576;

pub fn hash_bytes(data: &[u8]) -> String {
    let hash = xxh3_128(data);
    format!("{hash:032x}")
}

/// Hash the full content of a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, stat'd or read.
pub fn hash_file(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {} for hashing", path.display()))?;
    let metadata = file.metadata()?;

    if metadata.len() == 0 {
        return Ok(hash_bytes(b""));
    }

    if metadata.len() < MMAP_THRESHOLD {
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read {} for hashing", path.display()))?;
        Ok(hash_bytes(&content))
    } else {
        // SAFETY: the map is read-only and dropped before returning. A concurrent
        // writer can only change the digest, which is then stale like any other read.
        let mmap = unsafe { MmapOptions::new().map(&file)? };
        Ok(hash_bytes(&mmap))
    }
}

/// Hash a file in fixed-size chunks without holding it in memory.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn hash_file_streaming(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Xxh3::new();
    let mut buffer = vec![0u8; 65536];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let hash = hasher.digest128();
    Ok(format!("{hash:032x}"))
}
