use sha2::{Digest, Sha256};

use super::sample_buffer::SampleBuffer;
use crate::processing::fidelity::FidelityReport;

/// A secret file to hide, with the name and extension stored in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPayload {
    pub original_name: String,
    pub extension: String,
    pub data: Vec<u8>,
}

impl SecretPayload {
    /// Build a payload from a file name, deriving the extension from it.
    ///
    /// Any directory part of `name` is dropped.
    pub fn new(name: &str, data: Vec<u8>) -> Self {
        let original_name = base_name(name).to_string();
        let extension = split_extension(&original_name).to_string();
        Self {
            original_name,
            extension,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Outcome of a successful, verified embed.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedResult {
    /// The cover with the container written into its low-order bits.
    pub buffer: SampleBuffer,
    /// Distortion of `buffer` against the untouched cover.
    pub fidelity: FidelityReport,
    /// Bytes of the assembled container (header, metadata, payload).
    pub container_len: usize,
    /// Upper-bound capacity of the cover at the configured width, in bytes.
    pub capacity: usize,
    /// SHA-256 hex digest of the plaintext payload.
    pub payload_checksum: String,
}

/// A payload recovered from a stego buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPayload {
    pub original_name: String,
    pub extension: String,
    pub data: Vec<u8>,
    /// SHA-256 hex digest of `data`.
    pub checksum: String,
}

impl ExtractedPayload {
    pub fn new(original_name: String, extension: String, data: Vec<u8>) -> Self {
        let checksum = sha256_hex(&data);
        Self {
            original_name,
            extension,
            data,
            checksum,
        }
    }

    /// File name to restore the payload under.
    pub fn file_name(&self) -> String {
        let stored = base_name(&self.original_name);
        if stored.is_empty() {
            format!("extracted{}", self.extension)
        } else {
            stored.to_string()
        }
    }
}

/// SHA-256 hex digest of a byte slice.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn base_name(name: &str) -> &str {
    name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name)
}

/// Extension including its dot; leading dots of hidden files are not extensions.
fn split_extension(name: &str) -> &str {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(dot) => &name[stem_start + dot..],
        None => "",
    }
}
