//! Streaming CRC-32 over file contents.
//!
//! The checksum transform is a [`Read`] adapter: it forwards reads from the
//! wrapped source and folds every forwarded byte into a running CRC-32. A
//! file checksum is that adapter over an opened file, drained one chunk at a
//! time so the file is never held in memory.

use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Default number of bytes pulled per read.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Reader adapter that keeps a CRC-32 of everything read through it.
pub struct Crc32Reader<R> {
    inner: R,
    hasher: crc32fast::Hasher,
    bytes_read: u64,
}

impl<R: Read> Crc32Reader<R> {
    /// Wrap `inner` with a fresh accumulator.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
            bytes_read: 0,
        }
    }

    /// CRC-32 of the bytes read so far.
    pub fn value(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Number of bytes read so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Read the rest of the source in chunks of `chunk_size` bytes.
    ///
    /// Stops at the first read returning zero bytes or at the first error.
    /// Interrupted reads are retried. On error the accumulator still holds
    /// the checksum of every byte read before the failure.
    pub fn drain(&mut self, chunk_size: usize) -> io::Result<u64> {
        if chunk_size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "chunk size must be non-zero",
            ));
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(chunk_size).map_err(|_| {
            io::Error::new(
                io::ErrorKind::OutOfMemory,
                format!("cannot allocate a {} byte read buffer", chunk_size),
            )
        })?;
        buf.resize(chunk_size, 0);

        let start = self.bytes_read;
        loop {
            match self.read(&mut buf) {
                Ok(0) => return Ok(self.bytes_read - start),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Unwrap the underlying reader, discarding the accumulator.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for Crc32Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// Checksum everything `reader` yields, pulling `chunk_size` bytes at a time.
pub fn checksum_reader<R: Read>(reader: R, chunk_size: usize) -> io::Result<u32> {
    let mut crc_reader = Crc32Reader::new(reader);
    crc_reader.drain(chunk_size)?;
    Ok(crc_reader.value())
}

/// Checksum a file, returning the CRC-32 and the number of bytes read.
fn scan_file(path: &Path, chunk_size: usize) -> Result<(u32, u64)> {
    if chunk_size == 0 {
        return Err(Error::invalid_argument("chunk size must be non-zero"));
    }

    let file = File::open(path)?;
    let mut reader = Crc32Reader::new(file);

    match reader.drain(chunk_size) {
        Ok(size) => {
            let crc = reader.value();
            debug!(path = %path.display(), size, crc = %crc32_to_hex(crc), "checksummed file");
            Ok((crc, size))
        }
        Err(e) if e.kind() == io::ErrorKind::OutOfMemory => Err(Error::out_of_memory(chunk_size)),
        Err(e) => Err(Error::checksum_read(path, reader.value(), e)),
    }
}

/// CRC-32 of the file at `path`, read in [`DEFAULT_CHUNK_SIZE`] chunks.
///
/// # Errors
///
/// Open failures are returned as `Io`. A failing read yields `ChecksumRead`,
/// which carries the checksum of the bytes read before the failure.
pub fn file_checksum(path: &Path) -> Result<u32> {
    file_checksum_with(path, DEFAULT_CHUNK_SIZE)
}

/// CRC-32 of the file at `path`, read in chunks of `chunk_size` bytes.
pub fn file_checksum_with(path: &Path, chunk_size: usize) -> Result<u32> {
    scan_file(path, chunk_size).map(|(crc, _)| crc)
}

/// Check that the file at `path` has CRC-32 `expected`.
pub fn verify_file(path: &Path, expected: u32) -> Result<()> {
    let actual = file_checksum(path)?;
    if actual != expected {
        return Err(Error::checksum_mismatch(path, expected, actual));
    }
    Ok(())
}

/// Format a CRC-32 as 8 lowercase hex digits.
pub fn crc32_to_hex(crc: u32) -> String {
    hex::encode(crc.to_be_bytes())
}

/// Parse a CRC-32 written as 8 hex digits, with an optional `0x` prefix.
pub fn crc32_from_hex(s: &str) -> Result<u32> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if digits.len() != 8 {
        return Err(Error::invalid_argument(format!(
            "Expected 8 hex characters, got {}",
            digits.len()
        )));
    }

    let bytes = hex::decode(digits)
        .map_err(|e| Error::invalid_argument(format!("Invalid hex: {}", e)))?;

    let mut crc = [0u8; 4];
    crc.copy_from_slice(&bytes);
    Ok(u32::from_be_bytes(crc))
}

fn serialize_crc32<S: Serializer>(
    crc: &u32,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&crc32_to_hex(*crc))
}

/// Checksum of one file found by [`checksum_tree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChecksum {
    /// Path relative to the walked root, `/`-separated.
    pub path: String,
    /// CRC-32 of the contents, serialized as hex.
    #[serde(serialize_with = "serialize_crc32")]
    pub crc32: u32,
    /// Size in bytes.
    pub size: u64,
}

/// Checksum every regular file below `root`.
///
/// Hidden files are included and `.gitignore` rules are honored. Entries are
/// sorted by path. When `root` is itself a file, the single entry is named
/// after it.
pub fn checksum_tree(root: &Path, chunk_size: usize) -> Result<Vec<FileChecksum>> {
    let walker = ignore::WalkBuilder::new(root)
        .hidden(false) // Include hidden files
        .git_ignore(true) // Respect .gitignore
        .build();

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let entry_path = entry.path();
        let relative = match entry_path.strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => Path::new(entry_path.file_name().unwrap_or(entry_path.as_os_str())),
        };

        let name = relative
            .components()
            .map(|c| {
                c.as_os_str().to_str().ok_or_else(|| {
                    Error::invalid_argument(format!(
                        "Non UTF-8 file name: {}",
                        entry_path.display()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?
            .join("/");

        let (crc32, size) = scan_file(entry_path, chunk_size)?;
        entries.push(FileChecksum {
            path: name,
            crc32,
            size,
        });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}
