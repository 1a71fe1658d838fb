//! Sample position sequencing for payload bits.
//!
//! Sequential mode walks the samples directly after the metadata. Random mode
//! derives a 32-bit seed from the stego key, shuffles `[0, sample_count)` with a
//! ChaCha20 generator owned by the sequencer, and keeps the shuffled indices that
//! fall past the metadata, in shuffle order.
//!
//! Nothing about the permutation is stored in the container, so the embed and
//! extract paths must reproduce it bit-for-bit from `(key, sample_count)`. The
//! shuffle draws `u32` ranges and stores `u32` indices, so the sequence does not
//! depend on pointer width and costs four bytes per sample.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::models::config::PositionMode;
use crate::models::error::StegoError;

/// Derive the shuffle seed from a stego key.
///
/// The SHA-256 digest read as a big-endian integer, reduced mod 2^32.
pub fn derive_seed(key: &str) -> u32 {
    let digest = Sha256::digest(key.as_bytes());
    u32::from_be_bytes([digest[28], digest[29], digest[30], digest[31]])
}

/// Fisher-Yates permutation of `[0, sample_count)` for a given seed.
pub fn permutation(seed: u32, sample_count: usize) -> Result<Vec<u32>, StegoError> {
    let limit = u32::try_from(sample_count).map_err(|_| {
        StegoError::ConfigurationError(format!(
            "cannot permute {} samples, limit is {}",
            sample_count,
            u32::MAX
        ))
    })?;

    let mut order: Vec<u32> = (0..limit).collect();
    let mut rng = ChaCha20Rng::seed_from_u64(seed as u64);
    for i in (1..sample_count).rev() {
        let j = rng.gen_range(0..=(i as u32)) as usize;
        order.swap(i, j);
    }
    Ok(order)
}

#[derive(Debug, Clone)]
struct Memo {
    seed: u32,
    sample_count: usize,
    order: Vec<u32>,
}

/// Produces payload positions, memoizing the last permutation it computed.
///
/// Each operation owns its sequencer; nothing is shared between instances.
#[derive(Debug, Clone, Default)]
pub struct PositionSequencer {
    memo: Option<Memo>,
}

impl PositionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full permutation for `(seed, sample_count)`, computed at most once per key pair.
    pub fn permutation(&mut self, seed: u32, sample_count: usize) -> Result<&[u32], StegoError> {
        let cached = matches!(
            &self.memo,
            Some(memo) if memo.seed == seed && memo.sample_count == sample_count
        );
        if !cached {
            log::debug!("computing permutation of {} samples", sample_count);
            let order = permutation(seed, sample_count)?;
            self.memo = Some(Memo {
                seed,
                sample_count,
                order,
            });
        }

        Ok(self.memo.as_ref().map(|memo| memo.order.as_slice()).unwrap_or_default())
    }

    /// Whether a permutation for `(seed, sample_count)` is already memoized.
    pub fn is_memoized(&self, seed: u32, sample_count: usize) -> bool {
        matches!(
            &self.memo,
            Some(memo) if memo.seed == seed && memo.sample_count == sample_count
        )
    }

    /// The first `count` payload positions at or after `start`.
    ///
    /// Fails with `ConfigurationError` if fewer than `count` positions exist.
    pub fn positions(
        &mut self,
        mode: PositionMode,
        key: &str,
        sample_count: usize,
        start: usize,
        count: usize,
    ) -> Result<Vec<usize>, StegoError> {
        let available = sample_count.saturating_sub(start);
        if count > available {
            return Err(StegoError::ConfigurationError(format!(
                "requested {} positions from sample {}, only {} available",
                count, start, available
            )));
        }

        match mode {
            PositionMode::Sequential => Ok((start..start + count).collect()),
            PositionMode::Random => {
                let seed = derive_seed(key);
                let order = self.permutation(seed, sample_count)?;
                Ok(order
                    .iter()
                    .map(|&pos| pos as usize)
                    .filter(|&pos| pos >= start)
                    .take(count)
                    .collect())
            }
        }
    }
}
