use crate::models::config::validate_width;
use crate::models::error::StegoError;
use crate::processing::bit_packer;
use crate::processing::framer::{Container, HEADER_BITS};

/// Upper-bound payload capacity in bytes for `sample_count` samples at width `n_lsb`.
///
/// `floor(max(0, sample_count * n_lsb - HEADER_BITS) / 8)`. Metadata size is not
/// known yet at this point, so this is only good for early rejection; see
/// [`check_container`] for the exact test.
pub fn capacity(sample_count: usize, n_lsb: u8) -> usize {
    bit_packer::capacity_bits(sample_count, n_lsb).saturating_sub(HEADER_BITS) / 8
}

/// [`capacity`] with the width validated first.
pub fn checked_capacity(sample_count: usize, n_lsb: u8) -> Result<usize, StegoError> {
    validate_width(n_lsb).map_err(StegoError::ConfigurationError)?;
    Ok(capacity(sample_count, n_lsb))
}

/// Samples a container occupies: framing at width 1, payload at width `n_lsb`.
pub fn required_samples(metadata_len: usize, payload_len: usize, n_lsb: u8) -> usize {
    HEADER_BITS + metadata_len * 8 + bit_packer::positions_needed(payload_len * 8, n_lsb)
}

/// Reject a payload that cannot fit even before metadata is accounted for.
pub fn preflight(sample_count: usize, n_lsb: u8, payload_len: usize) -> Result<usize, StegoError> {
    let available = checked_capacity(sample_count, n_lsb)?;
    if payload_len > available {
        return Err(StegoError::CapacityExceeded {
            required: payload_len,
            available,
        });
    }
    Ok(available)
}

/// Authoritative fit check for an assembled container. Returns the capacity.
pub fn check_container(sample_count: usize, n_lsb: u8, container: &Container) -> Result<usize, StegoError> {
    let available = checked_capacity(sample_count, n_lsb)?;
    let required = container.encoded_len();
    if required > available {
        return Err(StegoError::CapacityExceeded { required, available });
    }

    let samples = required_samples(container.metadata_json().len(), container.payload().len(), n_lsb);
    if samples > sample_count {
        // Metadata is written one bit per sample, so at wide widths the byte
        // estimate above can pass while the samples run out.
        let shortfall_bits = (samples - sample_count) * n_lsb as usize;
        return Err(StegoError::CapacityExceeded {
            required: required + shortfall_bits.div_ceil(8),
            available,
        });
    }
    Ok(available)
}
