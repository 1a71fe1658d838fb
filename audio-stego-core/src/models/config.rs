/// Smallest payload width, in low-order bits per sample.
pub const MIN_LSB: u8 = 1;

/// Largest payload width, in low-order bits per sample.
pub const MAX_LSB: u8 = 4;

/// Minimum stego key length enforced by [`EmbedConfiguration::recommended`].
pub const RECOMMENDED_MIN_KEY_LENGTH: usize = 6;

/// How payload sample positions are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionMode {
    /// Consecutive samples directly after the metadata.
    Sequential,
    /// A key-seeded permutation of the whole buffer, filtered past the metadata.
    Random,
}

impl PositionMode {
    pub fn from_flag(randomize: bool) -> Self {
        if randomize {
            Self::Random
        } else {
            Self::Sequential
        }
    }

    pub fn is_random(&self) -> bool {
        matches!(self, Self::Random)
    }
}

/// Configuration for a single embed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfiguration {
    /// Payload bits stored per sample (default: 1). Valid values: 1 through 4.
    pub n_lsb: u8,

    /// Obfuscate the payload with the key-driven additive cipher (default: false).
    ///
    /// This is not encryption in any cryptographic sense; it only hides byte values
    /// from casual inspection.
    pub encrypt: bool,

    /// Scatter payload bits over key-seeded positions (default: false).
    pub randomize: bool,

    /// Shortest accepted stego key in characters (default: 1).
    pub min_key_length: usize,
}

impl EmbedConfiguration {
    pub fn new(n_lsb: u8, encrypt: bool, randomize: bool) -> Self {
        Self {
            n_lsb,
            encrypt,
            randomize,
            ..Default::default()
        }
    }

    /// Defaults with the 6-character minimum key used by the web and console front ends.
    pub fn recommended() -> Self {
        Self {
            min_key_length: RECOMMENDED_MIN_KEY_LENGTH,
            ..Default::default()
        }
    }

    pub fn position_mode(&self) -> PositionMode {
        PositionMode::from_flag(self.randomize)
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_width(self.n_lsb)?;
        if self.min_key_length == 0 {
            return Err("minimum key length must be at least 1".into());
        }
        Ok(())
    }

    /// Check a stego key against this configuration.
    pub fn validate_key(&self, key: &str) -> Result<(), String> {
        if key.is_empty() {
            return Err("stego key must not be empty".into());
        }
        let length = key.chars().count();
        if length < self.min_key_length {
            return Err(format!(
                "stego key too short: {} characters, minimum {}",
                length, self.min_key_length
            ));
        }
        Ok(())
    }
}

impl Default for EmbedConfiguration {
    fn default() -> Self {
        Self {
            n_lsb: 1,
            encrypt: false,
            randomize: false,
            min_key_length: 1,
        }
    }
}

/// Reject payload widths outside `MIN_LSB..=MAX_LSB`.
pub fn validate_width(n_lsb: u8) -> Result<(), String> {
    if !(MIN_LSB..=MAX_LSB).contains(&n_lsb) {
        return Err(format!("n_lsb must be {}-{}, got {}", MIN_LSB, MAX_LSB, n_lsb));
    }
    Ok(())
}
