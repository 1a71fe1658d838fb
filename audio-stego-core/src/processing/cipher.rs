/// Byte-wise additive stream cipher keyed by a repeating key.
///
/// `out[i] = (data[i] + key[i % key.len()]) mod 256`; decryption subtracts.
///
/// This is an obfuscation layer only. The keystream repeats with the key, so
/// known plaintext reveals the key directly and identical plaintext runs at the
/// same key phase produce identical ciphertext. Do not rely on it for
/// confidentiality.
#[derive(Debug, Clone)]
pub struct KeyedCipher {
    key: Vec<u8>,
}

impl KeyedCipher {
    /// Creates a cipher from the UTF-8 bytes of `key`.
    pub fn new(key: &str) -> Result<Self, String> {
        Self::from_bytes(key.as_bytes())
    }

    pub fn from_bytes(key: &[u8]) -> Result<Self, String> {
        if key.is_empty() {
            return Err("cipher key must not be empty".into());
        }
        Ok(Self { key: key.to_vec() })
    }

    pub fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.key.iter().cycle())
            .map(|(&byte, &k)| byte.wrapping_add(k))
            .collect()
    }

    pub fn decrypt(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.key.iter().cycle())
            .map(|(&byte, &k)| byte.wrapping_sub(k))
            .collect()
    }
}
