//! # audio-stego-core
//!
//! Hides an arbitrary file in the least-significant bits of 16-bit PCM audio.
//!
//! A container (signature, metadata length, JSON metadata, payload) is written
//! into the sample LSBs. The framing always goes one bit per sample from sample
//! 0; the payload uses 1 to 4 bits per sample, placed either sequentially or
//! over a key-seeded permutation of the buffer. The payload can optionally be
//! passed through a repeating-key additive cipher first. That cipher is an
//! obfuscation layer, not encryption.
//!
//! Decoding compressed audio is left to external codecs behind the
//! `SampleDecoder` / `SampleEncoder` traits; 16-bit PCM WAV is built in.
//!
//! ## Architecture
//!
//! ```text
//! audio-stego-core (this crate)
//! ├── traits/       ← SampleDecoder, SampleEncoder
//! ├── models/       ← StegoError, EmbedConfiguration, ContainerMetadata, SampleBuffer, results
//! ├── processing/   ← cipher, positions, bit packer, framer, capacity, fidelity, WAV format
//! ├── session/      ← StegoEngine (embed / extract orchestration)
//! └── storage/      ← WAV and payload file helpers
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use audio_stego_core::{embed, extract, EmbedConfiguration, SampleBuffer, SecretPayload};
//!
//! let cover = SampleBuffer::mono(vec![0; 100_000]);
//! let secret = SecretPayload::new("note.txt", b"meet at dawn".to_vec());
//! let config = EmbedConfiguration::new(2, true, true);
//!
//! let result = embed(cover, &secret, "secretkey", &config)?;
//! println!("{}", result.fidelity);
//!
//! let recovered = extract(&result.buffer, "secretkey")?;
//! assert_eq!(recovered.data, b"meet at dawn");
//! # Ok::<(), audio_stego_core::StegoError>(())
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{EmbedConfiguration, PositionMode, MAX_LSB, MIN_LSB, RECOMMENDED_MIN_KEY_LENGTH};
pub use models::error::StegoError;
pub use models::metadata::ContainerMetadata;
pub use models::sample_buffer::SampleBuffer;
pub use models::stego_result::{EmbedResult, ExtractedPayload, SecretPayload};
pub use processing::cipher::KeyedCipher;
pub use processing::fidelity::{FidelityReport, QualityBand};
pub use processing::framer::{Container, HEADER_BITS, MAX_METADATA_BYTES, SIGNATURE};
pub use processing::positions::PositionSequencer;
pub use processing::wav_format::WavCodec;
pub use session::engine::{capacity, embed, extract, psnr, StegoEngine};
pub use storage::payload_file::{read_payload_file, write_extracted_payload};
pub use storage::wav_file::{read_wav_file, write_wav_file};
pub use traits::audio_codec::{SampleDecoder, SampleEncoder};
