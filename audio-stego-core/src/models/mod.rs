pub mod config;
pub mod error;
pub mod metadata;
pub mod sample_buffer;
pub mod stego_result;
