use crate::models::config::EmbedConfiguration;
use crate::models::error::StegoError;
use crate::models::metadata::ContainerMetadata;
use crate::models::sample_buffer::SampleBuffer;
use crate::models::stego_result::{sha256_hex, EmbedResult, ExtractedPayload, SecretPayload};
use crate::processing::bit_packer;
use crate::processing::capacity;
use crate::processing::cipher::KeyedCipher;
use crate::processing::fidelity;
use crate::processing::framer::{self, Container, ParsedHeader};
use crate::processing::positions::PositionSequencer;

/// Embed / extract orchestrator.
///
/// Owns one [`PositionSequencer`], so a random-mode permutation computed during
/// an embed is reused by a later extract on the same engine for the same key and
/// buffer length. Engines share nothing; give each thread its own.
///
/// ```text
/// embed:   payload → cipher? → Container → capacity check → framing (width 1)
///          → payload at width n over sequenced positions → self-verify
/// extract: framing (width 1) → metadata → positions → payload → decipher?
/// ```
#[derive(Debug, Clone, Default)]
pub struct StegoEngine {
    sequencer: PositionSequencer,
}

impl StegoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide `payload` in `cover`, returning the stego buffer and its fidelity.
    ///
    /// Nothing is written unless the whole container fits. The result is
    /// re-read before returning; a mismatch is an `IntegrityError`, never a
    /// silent success.
    pub fn embed(
        &mut self,
        cover: SampleBuffer,
        payload: &SecretPayload,
        key: &str,
        config: &EmbedConfiguration,
    ) -> Result<EmbedResult, StegoError> {
        config.validate().map_err(StegoError::ConfigurationError)?;
        config.validate_key(key).map_err(StegoError::ConfigurationError)?;

        let n_lsb = config.n_lsb;
        let sample_count = cover.len();
        capacity::preflight(sample_count, n_lsb, payload.len())?;

        let metadata = ContainerMetadata {
            original_name: payload.original_name.clone(),
            file_size: payload.len() as u64,
            extension: payload.extension.clone(),
            encrypted: config.encrypt,
            random_positions: config.randomize,
            n_lsb,
        };
        let body = if config.encrypt {
            KeyedCipher::new(key)
                .map_err(StegoError::ConfigurationError)?
                .encrypt(&payload.data)
        } else {
            payload.data.clone()
        };

        let container = Container::new(metadata, body)?;
        let available = capacity::check_container(sample_count, n_lsb, &container)?;
        log::debug!(
            "container: {} bytes ({} metadata), payload from sample {}",
            container.encoded_len(),
            container.metadata_json().len(),
            container.payload_start()
        );

        let count = bit_packer::positions_needed(container.payload().len() * 8, n_lsb);
        let positions = self.sequencer.positions(
            config.position_mode(),
            key,
            sample_count,
            container.payload_start(),
            count,
        )?;

        let mut stego = cover.clone();
        framer::embed_framing(stego.as_mut_slice(), &container)?;
        bit_packer::embed_positions(stego.as_mut_slice(), &positions, container.payload(), n_lsb)?;

        self.verify(stego.as_slice(), &container, key)?;

        let fidelity = fidelity::evaluate(cover.as_slice(), stego.as_slice());
        log::info!(
            "embedded {} payload bytes at n_lsb={} ({:?} positions), {}",
            payload.len(),
            n_lsb,
            config.position_mode(),
            fidelity
        );

        Ok(EmbedResult {
            buffer: stego,
            fidelity,
            container_len: container.encoded_len(),
            capacity: available,
            payload_checksum: sha256_hex(&payload.data),
        })
    }

    /// Recover the hidden payload and its original name from `stego`.
    pub fn extract(&mut self, stego: &SampleBuffer, key: &str) -> Result<ExtractedPayload, StegoError> {
        let header = framer::parse_header(stego.as_slice()).inspect_err(|e| {
            log::warn!("no readable container: {}", e);
        })?;
        let metadata = &header.metadata;
        log::debug!(
            "container metadata: {} bytes payload, n_lsb={}, random={}, encrypted={}",
            metadata.file_size,
            metadata.n_lsb,
            metadata.random_positions,
            metadata.encrypted
        );

        if (metadata.encrypted || metadata.random_positions) && key.is_empty() {
            return Err(StegoError::ConfigurationError(
                "container requires a stego key".into(),
            ));
        }

        let mut data = self.read_payload(stego.as_slice(), &header, key)?;
        if metadata.encrypted {
            data = KeyedCipher::new(key)
                .map_err(StegoError::ConfigurationError)?
                .decrypt(&data);
        }

        log::info!("extracted {} bytes ({})", data.len(), metadata.original_name);
        Ok(ExtractedPayload::new(
            metadata.original_name.clone(),
            metadata.extension.clone(),
            data,
        ))
    }

    /// Upper-bound payload capacity of `buffer` at width `n_lsb`, in bytes.
    pub fn capacity(&self, buffer: &SampleBuffer, n_lsb: u8) -> Result<usize, StegoError> {
        capacity::checked_capacity(buffer.len(), n_lsb)
    }

    /// Re-read a freshly written container and compare it with what was written.
    pub fn verify(&mut self, samples: &[i16], container: &Container, key: &str) -> Result<(), StegoError> {
        let header = framer::parse_header(samples).map_err(|e| integrity_failure(format!("header unreadable: {}", e)))?;
        if &header.metadata != container.metadata() {
            return Err(integrity_failure("metadata mismatch".into()));
        }
        if header.payload_start != container.payload_start() {
            return Err(integrity_failure(format!(
                "payload offset {} differs from {}",
                header.payload_start,
                container.payload_start()
            )));
        }

        let recovered = self
            .read_payload(samples, &header, key)
            .map_err(|e| integrity_failure(format!("payload unreadable: {}", e)))?;
        if recovered != container.payload() {
            return Err(integrity_failure("payload mismatch".into()));
        }
        Ok(())
    }

    /// Payload bytes as stored (still ciphered if the container is encrypted).
    fn read_payload(&mut self, samples: &[i16], header: &ParsedHeader, key: &str) -> Result<Vec<u8>, StegoError> {
        let metadata = &header.metadata;
        let available = samples.len().saturating_sub(header.payload_start);
        let bit_count = usize::try_from(metadata.payload_bits()).map_err(|_| StegoError::InsufficientCapacity {
            needed: usize::MAX,
            available,
        })?;

        let needed = bit_packer::positions_needed(bit_count, metadata.n_lsb);
        if needed > available {
            return Err(StegoError::InsufficientCapacity { needed, available });
        }

        let positions = self.sequencer.positions(
            metadata.position_mode(),
            key,
            samples.len(),
            header.payload_start,
            needed,
        )?;
        let mut data = bit_packer::extract_positions(samples, &positions, bit_count, metadata.n_lsb)?;
        data.truncate(bit_count / 8);
        Ok(data)
    }
}

fn integrity_failure(reason: String) -> StegoError {
    log::error!("embedding verification failed: {}", reason);
    StegoError::IntegrityError(reason)
}

/// Hide `payload` in `cover` with a fresh engine.
pub fn embed(
    cover: SampleBuffer,
    payload: &SecretPayload,
    key: &str,
    config: &EmbedConfiguration,
) -> Result<EmbedResult, StegoError> {
    StegoEngine::new().embed(cover, payload, key, config)
}

/// Recover a payload from `stego` with a fresh engine.
pub fn extract(stego: &SampleBuffer, key: &str) -> Result<ExtractedPayload, StegoError> {
    StegoEngine::new().extract(stego, key)
}

/// Upper-bound payload capacity of `buffer` at width `n_lsb`, in bytes.
pub fn capacity(buffer: &SampleBuffer, n_lsb: u8) -> Result<usize, StegoError> {
    capacity::checked_capacity(buffer.len(), n_lsb)
}

/// PSNR in dB between two buffers' interleaved samples; `+∞` if identical.
pub fn psnr(original: &SampleBuffer, modified: &SampleBuffer) -> f64 {
    fidelity::evaluate_buffers(original, modified).psnr
}
