use serde::{Deserialize, Serialize};

use super::config::PositionMode;

/// Keys every container metadata object must carry.
pub const REQUIRED_KEYS: [&str; 6] = [
    "original_name",
    "file_size",
    "extension",
    "encrypted",
    "random_positions",
    "n_lsb",
];

/// JSON metadata stored in the container between the length field and the payload.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMetadata {
    pub original_name: String,
    pub file_size: u64,
    pub extension: String,
    pub encrypted: bool,
    pub random_positions: bool,
    pub n_lsb: u8,
}

impl ContainerMetadata {
    pub fn position_mode(&self) -> PositionMode {
        PositionMode::from_flag(self.random_positions)
    }

    /// Number of payload bits that follow the metadata.
    pub fn payload_bits(&self) -> u64 {
        self.file_size.saturating_mul(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_declared_order() {
        let meta = ContainerMetadata {
            original_name: "a.txt".into(),
            file_size: 3,
            extension: ".txt".into(),
            encrypted: false,
            random_positions: true,
            n_lsb: 2,
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(
            json,
            r#"{"original_name":"a.txt","file_size":3,"extension":".txt","encrypted":false,"random_positions":true,"n_lsb":2}"#
        );
        assert_eq!(meta.payload_bits(), 24);
        assert!(meta.position_mode().is_random());
    }

    #[test]
    fn required_keys_match_fields() {
        let meta = ContainerMetadata {
            original_name: String::new(),
            file_size: 0,
            extension: String::new(),
            encrypted: false,
            random_positions: false,
            n_lsb: 1,
        };
        let value = serde_json::to_value(&meta).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), REQUIRED_KEYS.len());
        for key in REQUIRED_KEYS {
            assert!(object.contains_key(key), "missing {}", key);
        }
    }
}
