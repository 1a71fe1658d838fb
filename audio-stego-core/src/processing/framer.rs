//! Container framing.
//!
//! ```text
//! [0-7]     signature "AUDIOSTG"
//! [8-11]    metadata length (u32, little-endian), 1..=MAX_METADATA_BYTES
//! [12-..]   metadata (UTF-8 JSON object)
//! [..]      payload (file_size bytes, possibly ciphered)
//! ```
//!
//! Signature, length and metadata are always stored sequentially at width 1
//! from sample 0, so a reader can locate the payload knowing nothing but the
//! buffer. The payload's width and placement come from the metadata.

use crate::models::config::validate_width;
use crate::models::error::StegoError;
use crate::models::metadata::{ContainerMetadata, REQUIRED_KEYS};
use crate::processing::bit_packer;

pub const SIGNATURE: [u8; 8] = *b"AUDIOSTG";
pub const SIGNATURE_SIZE: usize = SIGNATURE.len();
pub const METADATA_LENGTH_SIZE: usize = 4;
pub const HEADER_SIZE: usize = SIGNATURE_SIZE + METADATA_LENGTH_SIZE;
/// Samples (and bits) taken by the fixed header at width 1.
pub const HEADER_BITS: usize = HEADER_SIZE * 8;
pub const MAX_METADATA_BYTES: u32 = 10_000;

/// An assembled container ready to be written into a sample buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    metadata: ContainerMetadata,
    metadata_json: Vec<u8>,
    payload: Vec<u8>,
}

impl Container {
    pub fn new(metadata: ContainerMetadata, payload: Vec<u8>) -> Result<Self, StegoError> {
        let metadata_json = encode_metadata(&metadata)?;
        Ok(Self {
            metadata,
            metadata_json,
            payload,
        })
    }

    pub fn metadata(&self) -> &ContainerMetadata {
        &self.metadata
    }

    pub fn metadata_json(&self) -> &[u8] {
        &self.metadata_json
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Total container size in bytes.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.metadata_json.len() + self.payload.len()
    }

    /// Signature, length field and metadata: the part written at width 1.
    pub fn framing_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.metadata_json.len());
        bytes.extend_from_slice(&SIGNATURE);
        bytes.extend_from_slice(&(self.metadata_json.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&self.metadata_json);
        bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.framing_bytes();
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// First sample after the framing, where payload placement begins.
    pub fn payload_start(&self) -> usize {
        HEADER_BITS + self.metadata_json.len() * 8
    }
}

/// Build container bytes: signature, metadata length, metadata JSON, payload.
pub fn build(payload: &[u8], metadata: &ContainerMetadata) -> Result<Vec<u8>, StegoError> {
    Ok(Container::new(metadata.clone(), payload.to_vec())?.to_bytes())
}

/// Parse container bytes back into metadata and payload.
///
/// The payload slice is truncated to `file_size`; a shorter tail is an
/// `InsufficientCapacity` error.
pub fn parse_bytes(bytes: &[u8]) -> Result<(ContainerMetadata, &[u8]), StegoError> {
    if bytes.len() < SIGNATURE_SIZE || bytes[..SIGNATURE_SIZE] != SIGNATURE {
        return Err(StegoError::NotSteganographic);
    }
    let length_field = bytes
        .get(SIGNATURE_SIZE..HEADER_SIZE)
        .ok_or(StegoError::InsufficientCapacity {
            needed: HEADER_SIZE,
            available: bytes.len(),
        })?;
    let metadata_len = checked_metadata_len(length_field)?;

    let metadata_end = HEADER_SIZE + metadata_len;
    let metadata_json = bytes
        .get(HEADER_SIZE..metadata_end)
        .ok_or(StegoError::InsufficientCapacity {
            needed: metadata_end,
            available: bytes.len(),
        })?;
    let metadata = decode_metadata(metadata_json)?;

    let payload_end = usize::try_from(metadata.file_size)
        .ok()
        .and_then(|size| metadata_end.checked_add(size))
        .unwrap_or(usize::MAX);
    let payload = bytes
        .get(metadata_end..payload_end)
        .ok_or(StegoError::InsufficientCapacity {
            needed: payload_end,
            available: bytes.len(),
        })?;
    Ok((metadata, payload))
}

/// Header fields recovered from a sample buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    pub metadata: ContainerMetadata,
    pub metadata_len: usize,
    /// First sample after the metadata.
    pub payload_start: usize,
}

/// Write the framing of `container` sequentially at width 1 from sample 0.
///
/// Returns the payload start sample.
pub fn embed_framing(samples: &mut [i16], container: &Container) -> Result<usize, StegoError> {
    let next = bit_packer::embed_sequential(samples, 0, &container.framing_bytes())?;
    debug_assert_eq!(next, container.payload_start());
    Ok(next)
}

/// Read and validate the signature, metadata length and metadata from `samples`.
pub fn parse_header(samples: &[i16]) -> Result<ParsedHeader, StegoError> {
    if samples.len() < SIGNATURE_SIZE * 8 {
        return Err(StegoError::NotSteganographic);
    }
    let signature = bit_packer::extract_sequential(samples, 0, SIGNATURE_SIZE)?;
    if signature != SIGNATURE {
        return Err(StegoError::NotSteganographic);
    }

    let length_field = bit_packer::extract_sequential(samples, SIGNATURE_SIZE * 8, METADATA_LENGTH_SIZE)?;
    let metadata_len = checked_metadata_len(&length_field)?;
    log::debug!("metadata length field: {} bytes", metadata_len);

    let metadata_json = bit_packer::extract_sequential(samples, HEADER_BITS, metadata_len)?;
    let metadata = decode_metadata(&metadata_json)?;

    Ok(ParsedHeader {
        metadata,
        metadata_len,
        payload_start: HEADER_BITS + metadata_len * 8,
    })
}

/// Serialize metadata to JSON, enforcing the length-field bounds.
pub fn encode_metadata(metadata: &ContainerMetadata) -> Result<Vec<u8>, StegoError> {
    let json = serde_json::to_vec(metadata)
        .map_err(|e| StegoError::MetadataCorrupt(format!("failed to serialize metadata: {}", e)))?;
    if json.is_empty() || json.len() > MAX_METADATA_BYTES as usize {
        return Err(StegoError::MetadataSizeInvalid(
            u32::try_from(json.len()).unwrap_or(u32::MAX),
        ));
    }
    Ok(json)
}

/// Decode metadata JSON and check that every required key is present.
pub fn decode_metadata(bytes: &[u8]) -> Result<ContainerMetadata, StegoError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| StegoError::MetadataCorrupt(format!("metadata is not UTF-8: {}", e)))?;
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| StegoError::MetadataCorrupt(format!("metadata is not JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| StegoError::MetadataCorrupt("metadata is not a JSON object".into()))?;
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| !object.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(StegoError::MetadataIncomplete(missing));
    }

    let metadata: ContainerMetadata = serde_json::from_value(value)
        .map_err(|e| StegoError::MetadataCorrupt(format!("metadata field has wrong type: {}", e)))?;
    validate_width(metadata.n_lsb).map_err(StegoError::MetadataCorrupt)?;
    Ok(metadata)
}

fn checked_metadata_len(field: &[u8]) -> Result<usize, StegoError> {
    let bytes: [u8; METADATA_LENGTH_SIZE] = field
        .try_into()
        .map_err(|_| StegoError::MetadataSizeInvalid(0))?;
    let len = u32::from_le_bytes(bytes);
    if len == 0 || len > MAX_METADATA_BYTES {
        return Err(StegoError::MetadataSizeInvalid(len));
    }
    Ok(len as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata(file_size: u64) -> ContainerMetadata {
        ContainerMetadata {
            original_name: "note.txt".into(),
            file_size,
            extension: ".txt".into(),
            encrypted: false,
            random_positions: false,
            n_lsb: 1,
        }
    }

    #[test]
    fn constants() {
        assert_eq!(SIGNATURE_SIZE, 8);
        assert_eq!(HEADER_SIZE, 12);
        assert_eq!(HEADER_BITS, 96);
    }

    #[test]
    fn build_layout() {
        let meta = sample_metadata(3);
        let bytes = build(b"abc", &meta).unwrap();
        let json = serde_json::to_vec(&meta).unwrap();

        assert_eq!(&bytes[..8], b"AUDIOSTG");
        assert_eq!(u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize, json.len());
        assert_eq!(&bytes[12..12 + json.len()], json.as_slice());
        assert_eq!(&bytes[12 + json.len()..], b"abc");
    }

    #[test]
    fn parse_bytes_roundtrip() {
        let meta = sample_metadata(5);
        let bytes = build(b"hello", &meta).unwrap();
        let (parsed, payload) = parse_bytes(&bytes).unwrap();
        assert_eq!(parsed, meta);
        assert_eq!(payload, b"hello");
    }

    #[test]
    fn parse_bytes_truncated_payload() {
        let meta = sample_metadata(10);
        let bytes = build(b"short", &meta).unwrap();
        let err = parse_bytes(&bytes).unwrap_err();
        assert!(matches!(err, StegoError::InsufficientCapacity { .. }));
    }

    #[test]
    fn container_sizes() {
        let container = Container::new(sample_metadata(4), b"data".to_vec()).unwrap();
        let json_len = container.metadata_json().len();
        assert_eq!(container.encoded_len(), 12 + json_len + 4);
        assert_eq!(container.to_bytes().len(), container.encoded_len());
        assert_eq!(container.payload_start(), 96 + json_len * 8);
        assert_eq!(container.payload(), b"data");
    }

    #[test]
    fn header_roundtrip_through_samples() {
        let container = Container::new(sample_metadata(0), Vec::new()).unwrap();
        let mut samples = vec![0i16; container.payload_start() + 10];
        let start = embed_framing(&mut samples, &container).unwrap();
        assert_eq!(start, container.payload_start());

        let header = parse_header(&samples).unwrap();
        assert_eq!(&header.metadata, container.metadata());
        assert_eq!(header.metadata_len, container.metadata_json().len());
        assert_eq!(header.payload_start, start);
    }

    #[test]
    fn blank_buffer_is_not_steganographic() {
        assert_eq!(parse_header(&vec![0i16; 10_000]).unwrap_err(), StegoError::NotSteganographic);
        assert_eq!(parse_header(&[1i16; 10]).unwrap_err(), StegoError::NotSteganographic);
    }

    fn framed(samples_len: usize, length_field: u32, metadata: &[u8]) -> Vec<i16> {
        let mut bytes = SIGNATURE.to_vec();
        bytes.extend_from_slice(&length_field.to_le_bytes());
        bytes.extend_from_slice(metadata);
        let mut samples = vec![0i16; samples_len.max(bytes.len() * 8)];
        bit_packer::embed_sequential(&mut samples, 0, &bytes).unwrap();
        samples
    }

    #[test]
    fn zero_and_oversized_length() {
        let samples = framed(200, 0, &[]);
        assert_eq!(parse_header(&samples).unwrap_err(), StegoError::MetadataSizeInvalid(0));

        let samples = framed(200, 10_001, &[]);
        assert_eq!(parse_header(&samples).unwrap_err(), StegoError::MetadataSizeInvalid(10_001));
    }

    #[test]
    fn length_past_end_of_buffer() {
        let samples = framed(200, 500, b"{}");
        let err = parse_header(&samples).unwrap_err();
        assert!(matches!(err, StegoError::InsufficientCapacity { .. }));
    }

    #[test]
    fn corrupt_metadata() {
        let samples = framed(0, 4, b"{no}");
        assert!(matches!(parse_header(&samples).unwrap_err(), StegoError::MetadataCorrupt(_)));

        let samples = framed(0, 2, &[0xC3, 0x28]);
        assert!(matches!(parse_header(&samples).unwrap_err(), StegoError::MetadataCorrupt(_)));

        let samples = framed(0, 2, b"[]");
        assert!(matches!(parse_header(&samples).unwrap_err(), StegoError::MetadataCorrupt(_)));
    }

    #[test]
    fn incomplete_metadata() {
        let json = br#"{"original_name":"a","file_size":1,"extension":"","encrypted":false}"#;
        let samples = framed(0, json.len() as u32, json);
        assert_eq!(
            parse_header(&samples).unwrap_err(),
            StegoError::MetadataIncomplete(vec!["random_positions".into(), "n_lsb".into()])
        );
    }

    #[test]
    fn metadata_width_out_of_range() {
        let json = br#"{"original_name":"a","file_size":1,"extension":"","encrypted":false,"random_positions":false,"n_lsb":7}"#;
        assert!(matches!(decode_metadata(json).unwrap_err(), StegoError::MetadataCorrupt(_)));
    }

    #[test]
    fn extra_metadata_keys_are_ignored() {
        let json = br#"{"original_name":"a","file_size":1,"extension":"","encrypted":true,"random_positions":false,"n_lsb":3,"created":"x"}"#;
        let meta = decode_metadata(json).unwrap();
        assert_eq!(meta.n_lsb, 3);
        assert!(meta.encrypted);
    }

    #[test]
    fn oversized_metadata_rejected_on_build() {
        let mut meta = sample_metadata(0);
        meta.original_name = "x".repeat(MAX_METADATA_BYTES as usize);
        assert!(matches!(
            Container::new(meta, Vec::new()).unwrap_err(),
            StegoError::MetadataSizeInvalid(_)
        ));
    }
}
