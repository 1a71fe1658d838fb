use std::fs;
use std::path::Path;

use crate::models::error::StegoError;
use crate::models::sample_buffer::SampleBuffer;
use crate::processing::wav_format::WavCodec;
use crate::traits::audio_codec::{SampleDecoder, SampleEncoder};

/// Read a 16-bit PCM WAV file into a sample buffer.
pub fn read_wav_file(path: &Path) -> Result<SampleBuffer, StegoError> {
    read_audio_file(path, &WavCodec)
}

/// Write a sample buffer as a 16-bit PCM WAV file, creating parent directories.
pub fn write_wav_file(path: &Path, buffer: &SampleBuffer) -> Result<(), StegoError> {
    write_audio_file(path, buffer, &WavCodec)
}

/// Read and decode an audio file with any decoder.
pub fn read_audio_file(path: &Path, decoder: &dyn SampleDecoder) -> Result<SampleBuffer, StegoError> {
    let bytes = fs::read(path)
        .map_err(|e| StegoError::StorageError(format!("failed to read {}: {}", path.display(), e)))?;
    let buffer = decoder.decode(&bytes)?;
    log::debug!(
        "loaded {}: {} samples, {} Hz, {} channel(s)",
        path.display(),
        buffer.len(),
        buffer.sample_rate,
        buffer.channels
    );
    Ok(buffer)
}

/// Encode and write an audio file with any encoder.
///
/// Lossy encoders destroy embedded data; writing through one only logs a warning.
pub fn write_audio_file(path: &Path, buffer: &SampleBuffer, encoder: &dyn SampleEncoder) -> Result<(), StegoError> {
    if !encoder.is_lossless() {
        log::warn!("{} is written with a lossy encoder, hidden data will not survive", path.display());
    }
    let bytes = encoder.encode(buffer)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| StegoError::StorageError(format!("failed to create directory: {}", e)))?;
    }
    fs::write(path, bytes)
        .map_err(|e| StegoError::StorageError(format!("failed to write {}: {}", path.display(), e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("audio_stego_test_{}", name))
    }

    #[test]
    fn write_then_read() {
        let path = temp_file_path("wav_file/roundtrip.wav");
        let buffer = SampleBuffer::new(vec![1, -2, 3, -4, 5, -6], 2, 22_050);

        write_wav_file(&path, &buffer).unwrap();
        let file_data = fs::read(&path).unwrap();
        assert_eq!(file_data.len(), 44 + 12);
        assert_eq!(&file_data[0..4], b"RIFF");

        assert_eq!(read_wav_file(&path).unwrap(), buffer);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_storage_error() {
        let err = read_wav_file(&temp_file_path("does_not_exist.wav")).unwrap_err();
        assert!(matches!(err, StegoError::StorageError(_)));
    }

    #[test]
    fn non_wav_file_is_format_error() {
        let path = temp_file_path("not_audio.wav");
        fs::write(&path, b"plain text").unwrap();
        let err = read_wav_file(&path).unwrap_err();
        assert!(matches!(err, StegoError::AudioFormatError(_)));
        fs::remove_file(&path).ok();
    }
}
