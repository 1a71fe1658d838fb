use crate::models::error::StegoError;
use crate::models::sample_buffer::SampleBuffer;

/// Turns an encoded audio file into flat interleaved 16-bit samples.
///
/// Implemented by `WavCodec`. Compressed formats (MP3, FLAC, OGG) plug in
/// from outside this crate.
pub trait SampleDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer, StegoError>;
}

/// Turns a sample buffer back into an encoded audio file.
pub trait SampleEncoder: Send + Sync {
    fn encode(&self, buffer: &SampleBuffer) -> Result<Vec<u8>, StegoError>;

    /// Whether decoding the output yields the exact input samples.
    ///
    /// Embedded data only survives lossless encoders.
    fn is_lossless(&self) -> bool;
}
