//! Compressed, checksummed document files with atomic replacement.
//!
//! Layout: a 14 byte little-endian header (`magic`, `version`, `crc32`,
//! `payload_len`) followed by a zstd-compressed bincode payload.

use crc32fast::Hasher;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Magic number for stackshift documents ("SSDC").
pub const DOCUMENT_MAGIC: u32 = 0x5353_4443;

/// Current document format version.
pub const DOCUMENT_VERSION: u16 = 1;

const HEADER_LEN: usize = 14;

/// zstd level used for documents.
const COMPRESSION_LEVEL: i32 = 3;

/// Errors raised while reading or writing a document.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem failure.
    #[error("document I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Payload could not be serialized.
    #[error("failed to encode document: {0}")]
    Encode(#[source] bincode::Error),
    /// Payload could not be deserialized.
    #[error("failed to decode document: {0}")]
    Decode(#[source] bincode::Error),
    /// zstd failure.
    #[error("document compression failed: {0}")]
    Compression(#[source] std::io::Error),
    /// Not a stackshift document.
    #[error("invalid document magic: expected 0x{expected:08X}, got 0x{found:08X}")]
    BadMagic {
        /// Expected magic.
        expected: u32,
        /// Magic read from the file.
        found: u32,
    },
    /// Written by a newer format.
    #[error("unsupported document version {0}")]
    UnsupportedVersion(u16),
    /// Header or payload shorter than declared.
    #[error("document truncated")]
    Truncated,
    /// Payload corrupted.
    #[error("checksum mismatch: expected {expected:08X}, got {found:08X}")]
    ChecksumMismatch {
        /// CRC stored in the header.
        expected: u32,
        /// CRC computed from the payload.
        found: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DocumentHeader {
    magic: u32,
    version: u16,
    crc32: u32,
    payload_len: u32,
}

impl DocumentHeader {
    fn new(crc32: u32, payload_len: u32) -> Self {
        Self {
            magic: DOCUMENT_MAGIC,
            version: DOCUMENT_VERSION,
            crc32,
            payload_len,
        }
    }

    fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..10].copy_from_slice(&self.crc32.to_le_bytes());
        bytes[10..14].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        if bytes.len() < HEADER_LEN {
            return Err(PersistError::Truncated);
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != DOCUMENT_MAGIC {
            return Err(PersistError::BadMagic {
                expected: DOCUMENT_MAGIC,
                found: magic,
            });
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version > DOCUMENT_VERSION {
            return Err(PersistError::UnsupportedVersion(version));
        }

        Ok(Self {
            magic,
            version,
            crc32: u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]),
            payload_len: u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]),
        })
    }
}

fn checksum(bytes: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

/// Encode a document to its on-disk bytes.
pub fn encode_document<T: Serialize>(doc: &T) -> Result<Vec<u8>, PersistError> {
    let serialized = bincode::serialize(doc).map_err(PersistError::Encode)?;
    let compressed =
        zstd::encode_all(&serialized[..], COMPRESSION_LEVEL).map_err(PersistError::Compression)?;

    let header = DocumentHeader::new(checksum(&compressed), compressed.len() as u32);
    let mut bytes = Vec::with_capacity(HEADER_LEN + compressed.len());
    bytes.extend_from_slice(&header.to_bytes());
    bytes.extend_from_slice(&compressed);
    Ok(bytes)
}

/// Decode a document from its on-disk bytes.
pub fn decode_document<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PersistError> {
    let header = DocumentHeader::from_bytes(bytes)?;
    let payload = bytes
        .get(HEADER_LEN..HEADER_LEN + header.payload_len as usize)
        .ok_or(PersistError::Truncated)?;

    let found = checksum(payload);
    if found != header.crc32 {
        return Err(PersistError::ChecksumMismatch {
            expected: header.crc32,
            found,
        });
    }

    let decompressed = zstd::decode_all(payload).map_err(PersistError::Compression)?;
    bincode::deserialize(&decompressed).map_err(PersistError::Decode)
}

/// Read a document. Returns `Ok(None)` when the file does not exist.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistError> {
    if !path.exists() {
        return Ok(None);
    }
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    decode_document(&bytes).map(Some)
}

/// Temporary sibling used while writing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize to `<path>.tmp`, then rename over `path`.
pub fn write_atomic<T: Serialize>(path: &Path, doc: &T) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let bytes = encode_document(doc)?;
    let tmp = temp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        values: Vec<u32>,
    }

    fn sample() -> Sample {
        Sample {
            name: "grid".to_string(),
            values: vec![1, 2, 3, 64],
        }
    }

    #[test]
    fn header_roundtrip() {
        let header = DocumentHeader::new(0xDEADBEEF, 1234);
        let decoded = DocumentHeader::from_bytes(&header.to_bytes()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn rejects_foreign_files() {
        let err = decode_document::<Sample>(b"not a document at all").unwrap_err();
        assert!(matches!(err, PersistError::BadMagic { .. }));
        assert!(matches!(
            decode_document::<Sample>(b"SS").unwrap_err(),
            PersistError::Truncated
        ));
    }

    #[test]
    fn detects_corruption() {
        let mut bytes = encode_document(&sample()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(
            decode_document::<Sample>(&bytes).unwrap_err(),
            PersistError::ChecksumMismatch { .. }
        ));
    }

    #[test]
    fn atomic_write_replaces_file_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.bin");

        write_atomic(&path, &sample()).unwrap();
        write_atomic(
            &path,
            &Sample {
                name: "second".into(),
                values: vec![],
            },
        )
        .unwrap();

        let loaded: Sample = read_document(&path).unwrap().unwrap();
        assert_eq!(loaded.name, "second");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Option<Sample> = read_document(&dir.path().join("absent.bin")).unwrap();
        assert!(loaded.is_none());
    }
}
