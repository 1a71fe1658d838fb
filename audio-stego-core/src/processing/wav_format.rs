//! WAV file format utilities.
//!
//! Canonical 44-byte RIFF headers for 16-bit PCM output, and a chunk-walking
//! reader that accepts any RIFF/WAVE file carrying 16-bit PCM samples.

use crate::models::error::StegoError;
use crate::models::sample_buffer::SampleBuffer;
use crate::traits::audio_codec::{SampleDecoder, SampleEncoder};

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

const PCM_FORMAT_TAG: u16 = 1;
const PCM16_BIT_DEPTH: u16 = 16;

/// `(byte_rate, block_align)` for a PCM stream, or an error if either field
/// cannot be represented in a WAV header.
pub fn pcm_layout(sample_rate: u32, bit_depth: u16, channels: u16) -> Result<(u32, u16), StegoError> {
    let block_align = u32::from(channels)
        .checked_mul(u32::from(bit_depth))
        .map(|bits| bits / 8)
        .and_then(|align| u16::try_from(align).ok())
        .ok_or_else(|| {
            StegoError::AudioFormatError(format!(
                "block align overflows for {} channels at {} bits",
                channels, bit_depth
            ))
        })?;
    let byte_rate = sample_rate.checked_mul(u32::from(block_align)).ok_or_else(|| {
        StegoError::AudioFormatError(format!(
            "byte rate overflows for {} Hz with {}-byte frames",
            sample_rate, block_align
        ))
    })?;
    Ok((byte_rate, block_align))
}

/// Generate a 44-byte WAV RIFF header.
///
/// Format: PCM (format code 1), little-endian. Fails if the byte rate, block
/// align or chunk size does not fit its header field.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    36 + data_size
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bit_depth / 8
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn generate_wav_header(
    sample_rate: u32,
    bit_depth: u16,
    channels: u16,
    data_size: u32,
) -> Result<[u8; WAV_HEADER_SIZE], StegoError> {
    let (byte_rate, block_align) = pcm_layout(sample_rate, bit_depth, channels)?;
    let chunk_size = data_size
        .checked_add(36)
        .ok_or_else(|| StegoError::AudioFormatError("sample data too large for a WAV file".into()))?;

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    Ok(header)
}

/// Serialize a buffer as a 16-bit PCM WAV file.
pub fn encode_wav(buffer: &SampleBuffer) -> Result<Vec<u8>, StegoError> {
    if buffer.channels == 0 {
        return Err(StegoError::AudioFormatError("channel count must be positive".into()));
    }
    let data_size = buffer
        .samples
        .len()
        .checked_mul(2)
        .and_then(|size| u32::try_from(size).ok())
        .ok_or_else(|| StegoError::AudioFormatError("sample data too large for a WAV file".into()))?;

    let header = generate_wav_header(buffer.sample_rate, PCM16_BIT_DEPTH, buffer.channels, data_size)?;

    let mut bytes = Vec::with_capacity(WAV_HEADER_SIZE + data_size as usize);
    bytes.extend_from_slice(&header);
    for sample in &buffer.samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    Ok(bytes)
}

#[derive(Debug, Clone, Copy)]
struct FormatChunk {
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    bit_depth: u16,
}

/// Parse a RIFF/WAVE file holding 16-bit PCM into a sample buffer.
///
/// Unknown chunks are skipped. A data chunk that claims more bytes than the
/// file holds is read up to the end of the file.
pub fn decode_wav(bytes: &[u8]) -> Result<SampleBuffer, StegoError> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(StegoError::AudioFormatError("not a RIFF/WAVE file".into()));
    }

    let mut format: Option<FormatChunk> = None;
    let mut offset = 12;
    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = read_u32(bytes, offset + 4) as usize;
        let body_start = offset + 8;
        let body_end = body_start.saturating_add(size).min(bytes.len());
        let body = &bytes[body_start..body_end];

        match id {
            b"fmt " => format = Some(parse_format(body)?),
            b"data" => {
                let fmt = format
                    .ok_or_else(|| StegoError::AudioFormatError("data chunk before fmt chunk".into()))?;
                check_pcm16(&fmt)?;
                if body.len() < size {
                    log::warn!("data chunk truncated: {} of {} bytes present", body.len(), size);
                }
                let samples = body
                    .chunks_exact(2)
                    .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                return Ok(SampleBuffer::new(samples, fmt.channels, fmt.sample_rate));
            }
            _ => log::debug!("skipping WAV chunk {:?}", String::from_utf8_lossy(id)),
        }

        // Chunks are word-aligned.
        offset = body_start.saturating_add(size).saturating_add(size & 1);
    }

    Err(StegoError::AudioFormatError("no data chunk found".into()))
}

fn parse_format(body: &[u8]) -> Result<FormatChunk, StegoError> {
    if body.len() < 16 {
        return Err(StegoError::AudioFormatError(format!("fmt chunk too short: {} bytes", body.len())));
    }
    Ok(FormatChunk {
        format_tag: read_u16(body, 0),
        channels: read_u16(body, 2),
        sample_rate: read_u32(body, 4),
        bit_depth: read_u16(body, 14),
    })
}

fn check_pcm16(fmt: &FormatChunk) -> Result<(), StegoError> {
    if fmt.format_tag != PCM_FORMAT_TAG {
        return Err(StegoError::AudioFormatError(format!(
            "unsupported format tag {:#06x}, only PCM is supported",
            fmt.format_tag
        )));
    }
    if fmt.bit_depth != PCM16_BIT_DEPTH {
        return Err(StegoError::AudioFormatError(format!("unsupported bit depth: {}", fmt.bit_depth)));
    }
    if fmt.channels == 0 {
        return Err(StegoError::AudioFormatError("channel count must be positive".into()));
    }
    // Anything decoded here must be writable again.
    pcm_layout(fmt.sample_rate, fmt.bit_depth, fmt.channels).map(|_| ())
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// 16-bit PCM WAV codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavCodec;

impl SampleDecoder for WavCodec {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer, StegoError> {
        decode_wav(bytes)
    }
}

impl SampleEncoder for WavCodec {
    fn encode(&self, buffer: &SampleBuffer) -> Result<Vec<u8>, StegoError> {
        encode_wav(buffer)
    }

    fn is_lossless(&self) -> bool {
        true
    }
}
