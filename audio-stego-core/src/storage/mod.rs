pub mod payload_file;
pub mod wav_file;
