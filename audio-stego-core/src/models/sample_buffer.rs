/// Signed 16-bit PCM samples with their channel layout.
///
/// Multi-channel audio stays interleaved (`[L0, R0, L1, R1, ...]`); every
/// embedding operation treats the buffer as one flat sequence in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    pub samples: Vec<i16>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<i16>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples,
            channels,
            sample_rate,
        }
    }

    /// Mono buffer at 44.1 kHz.
    pub fn mono(samples: Vec<i16>) -> Self {
        Self::new(samples, 1, 44_100)
    }

    /// Total number of samples across all channels.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of complete interleaved frames.
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn as_slice(&self) -> &[i16] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [i16] {
        &mut self.samples
    }
}
