use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::StegoError;
use crate::models::stego_result::{ExtractedPayload, SecretPayload};

/// Load a file to hide, naming the payload after the file.
pub fn read_payload_file(path: &Path) -> Result<SecretPayload, StegoError> {
    let data = fs::read(path)
        .map_err(|e| StegoError::StorageError(format!("failed to read payload {}: {}", path.display(), e)))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(SecretPayload::new(&name, data))
}

/// Write an extracted payload into `directory` under its stored name.
///
/// Only the final component of the stored name is used, so a crafted name
/// cannot escape `directory`. Returns the written path.
pub fn write_extracted_payload(directory: &Path, payload: &ExtractedPayload) -> Result<PathBuf, StegoError> {
    fs::create_dir_all(directory)
        .map_err(|e| StegoError::StorageError(format!("failed to create directory: {}", e)))?;

    let mut file_name = payload.file_name();
    if file_name == "." || file_name == ".." {
        file_name = format!("extracted{}", payload.extension);
    }
    let path = directory.join(file_name);
    fs::write(&path, &payload.data)
        .map_err(|e| StegoError::StorageError(format!("failed to write payload: {}", e)))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("audio_stego_test_{}", name))
    }

    #[test]
    fn read_names_payload_after_file() {
        let dir = temp_dir("payload_read");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("letter.txt");
        fs::write(&path, b"dear reader").unwrap();

        let payload = read_payload_file(&path).unwrap();
        assert_eq!(payload.original_name, "letter.txt");
        assert_eq!(payload.extension, ".txt");
        assert_eq!(payload.data, b"dear reader");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn write_stays_inside_directory() {
        let dir = temp_dir("payload_write");
        let payload = ExtractedPayload::new("../../escape.bin".into(), ".bin".into(), vec![1, 2, 3]);

        let path = write_extracted_payload(&dir, &payload).unwrap();
        assert_eq!(path, dir.join("escape.bin"));
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3]);

        let dotted = ExtractedPayload::new("..".into(), ".dat".into(), vec![9]);
        let path = write_extracted_payload(&dir, &dotted).unwrap();
        assert_eq!(path, dir.join("extracted.dat"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_payload_file() {
        let err = read_payload_file(&temp_dir("missing_payload.bin")).unwrap_err();
        assert!(matches!(err, StegoError::StorageError(_)));
    }
}
