use thiserror::Error;

/// Errors that can occur while embedding into or extracting from a sample buffer.
///
/// Framing errors carry the specific reason so callers can tell a cover that never
/// held a container (`NotSteganographic`) from a damaged one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StegoError {
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error("capacity exceeded: container needs {required} bytes, cover holds {available}")]
    CapacityExceeded { required: usize, available: usize },

    #[error("not steganographic: container signature not found")]
    NotSteganographic,

    #[error("metadata size invalid: {0} bytes")]
    MetadataSizeInvalid(u32),

    #[error("metadata corrupt: {0}")]
    MetadataCorrupt(String),

    #[error("metadata incomplete: missing {}", .0.join(", "))]
    MetadataIncomplete(Vec<String>),

    #[error("insufficient capacity: needed {needed} sample positions, {available} available")]
    InsufficientCapacity { needed: usize, available: usize },

    #[error("integrity check failed: {0}")]
    IntegrityError(String),

    #[error("audio format error: {0}")]
    AudioFormatError(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl StegoError {
    /// Whether this error means the buffer holds a damaged or foreign container
    /// rather than a caller mistake.
    pub fn is_framing_error(&self) -> bool {
        matches!(
            self,
            Self::NotSteganographic
                | Self::MetadataSizeInvalid(_)
                | Self::MetadataCorrupt(_)
                | Self::MetadataIncomplete(_)
                | Self::InsufficientCapacity { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_lists_missing_keys() {
        let err = StegoError::MetadataIncomplete(vec!["file_size".into(), "n_lsb".into()]);
        assert_eq!(err.to_string(), "metadata incomplete: missing file_size, n_lsb");
    }

    #[test]
    fn framing_classification() {
        assert!(StegoError::NotSteganographic.is_framing_error());
        assert!(StegoError::MetadataSizeInvalid(0).is_framing_error());
        assert!(!StegoError::ConfigurationError("bad".into()).is_framing_error());
        assert!(!StegoError::IntegrityError("mismatch".into()).is_framing_error());
    }
}
