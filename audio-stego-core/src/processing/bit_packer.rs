//! Reading and writing bits in the low-order bits of 16-bit samples.
//!
//! Two layouts are in use and must not be unified:
//!
//! - **Sequential, width 1** (header and metadata): each byte is expanded MSB
//!   first, one bit per sample, into bit 0 of consecutive samples.
//! - **Positioned, width n** (payload): the byte stream is expanded MSB first
//!   into one flat bit sequence, cut into groups of `n`, and group bit `i` is
//!   stored in sample bit `i`. Within a sample the group therefore reads
//!   LSB first.
//!
//! Extraction rebuilds the flat bit sequence and packs it MSB first; a trailing
//! partial byte is zero-padded.
//!
//! All writers check capacity before touching the buffer, so a failed write
//! leaves the samples unchanged.

use crate::models::config::validate_width;
use crate::models::error::StegoError;

/// Storable bits for `sample_count` samples at `n_lsb` bits each.
pub fn capacity_bits(sample_count: usize, n_lsb: u8) -> usize {
    sample_count.saturating_mul(n_lsb as usize)
}

/// Number of positions needed to hold `bit_count` bits at `n_lsb` bits each.
pub fn positions_needed(bit_count: usize, n_lsb: u8) -> usize {
    bit_count.div_ceil(n_lsb.max(1) as usize)
}

/// Write `bytes` one bit per sample into bit 0, starting at `start`.
///
/// Returns the index of the first sample after the written run.
pub fn embed_sequential(samples: &mut [i16], start: usize, bytes: &[u8]) -> Result<usize, StegoError> {
    let needed = bytes.len() * 8;
    let available = samples.len().saturating_sub(start);
    if needed > available {
        return Err(StegoError::InsufficientCapacity { needed, available });
    }

    let mut index = start;
    for bit in msb_first_bits(bytes) {
        samples[index] = (samples[index] & !1) | bit as i16;
        index += 1;
    }
    Ok(index)
}

/// Read `byte_count` bytes from bit 0 of consecutive samples starting at `start`.
pub fn extract_sequential(samples: &[i16], start: usize, byte_count: usize) -> Result<Vec<u8>, StegoError> {
    let needed = byte_count * 8;
    let available = samples.len().saturating_sub(start);
    if needed > available {
        return Err(StegoError::InsufficientCapacity { needed, available });
    }

    let bits: Vec<u8> = samples[start..start + needed]
        .iter()
        .map(|&sample| (sample & 1) as u8)
        .collect();
    Ok(pack_msb_first(&bits))
}

/// Write `bytes` into the low `n_lsb` bits of the samples at `positions`.
///
/// Returns the number of positions consumed.
pub fn embed_positions(
    samples: &mut [i16],
    positions: &[usize],
    bytes: &[u8],
    n_lsb: u8,
) -> Result<usize, StegoError> {
    validate_width(n_lsb).map_err(StegoError::ConfigurationError)?;

    let bits: Vec<u8> = msb_first_bits(bytes).collect();
    let needed = positions_needed(bits.len(), n_lsb);
    check_positions(samples.len(), positions, needed)?;

    let width = n_lsb as usize;
    for (chunk, &pos) in bits.chunks(width).zip(positions) {
        let value = chunk
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &bit)| acc | (bit << i));
        samples[pos] = write_low_bits(samples[pos], value, n_lsb);
    }
    Ok(needed)
}

/// Read `bit_count` bits from the low `n_lsb` bits of the samples at `positions`.
pub fn extract_positions(
    samples: &[i16],
    positions: &[usize],
    bit_count: usize,
    n_lsb: u8,
) -> Result<Vec<u8>, StegoError> {
    validate_width(n_lsb).map_err(StegoError::ConfigurationError)?;

    let needed = positions_needed(bit_count, n_lsb);
    check_positions(samples.len(), positions, needed)?;

    let mut bits = Vec::with_capacity(bit_count);
    'outer: for &pos in &positions[..needed] {
        let value = samples[pos];
        for i in 0..n_lsb {
            if bits.len() == bit_count {
                break 'outer;
            }
            bits.push(((value >> i) & 1) as u8);
        }
    }
    Ok(pack_msb_first(&bits))
}

/// Pack bits into bytes, first bit into bit 7 of the first byte.
pub fn pack_msb_first(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (j, &bit)| acc | ((bit & 1) << (7 - j)))
        })
        .collect()
}

fn msb_first_bits(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
}

fn write_low_bits(sample: i16, value: u8, n_lsb: u8) -> i16 {
    let mask = ((1u16 << n_lsb) - 1) as i16;
    (sample & !mask) | (value as i16 & mask)
}

fn check_positions(sample_count: usize, positions: &[usize], needed: usize) -> Result<(), StegoError> {
    if positions.len() < needed {
        return Err(StegoError::InsufficientCapacity {
            needed,
            available: positions.len(),
        });
    }
    if let Some(&pos) = positions[..needed].iter().find(|&&pos| pos >= sample_count) {
        return Err(StegoError::InsufficientCapacity {
            needed: pos + 1,
            available: sample_count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_bits_scales_with_width() {
        assert_eq!(capacity_bits(1000, 1), 1000);
        assert_eq!(capacity_bits(1000, 4), 4000);
        assert_eq!(positions_needed(17, 4), 5);
        assert_eq!(positions_needed(16, 4), 4);
        assert_eq!(positions_needed(0, 2), 0);
    }

    #[test]
    fn sequential_is_msb_first() {
        let mut samples = vec![0i16; 8];
        let next = embed_sequential(&mut samples, 0, &[0b1010_0001]).unwrap();
        assert_eq!(next, 8);
        assert_eq!(samples, vec![1, 0, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn sequential_touches_only_bit_zero() {
        let mut samples = vec![-1i16, -2, 100, 101, 0x7FFE, -32768, 3, 4];
        let original = samples.clone();
        embed_sequential(&mut samples, 0, &[0xFF]).unwrap();
        for (after, before) in samples.iter().zip(&original) {
            assert_eq!(after & !1, before & !1);
            assert_eq!(after & 1, 1);
        }
        assert_eq!(extract_sequential(&samples, 0, 1).unwrap(), vec![0xFF]);
    }

    #[test]
    fn sequential_roundtrip_with_offset() {
        let mut samples = vec![1234i16; 64];
        let next = embed_sequential(&mut samples, 16, b"hi").unwrap();
        assert_eq!(next, 32);
        assert_eq!(extract_sequential(&samples, 16, 2).unwrap(), b"hi");
        assert_eq!(samples[..16], [1234i16; 16]);
    }

    #[test]
    fn sequential_overflow_leaves_buffer_untouched() {
        let mut samples = vec![0i16; 15];
        let err = embed_sequential(&mut samples, 0, &[0xFF, 0xFF]).unwrap_err();
        assert_eq!(err, StegoError::InsufficientCapacity { needed: 16, available: 15 });
        assert!(samples.iter().all(|&s| s == 0));

        let err = extract_sequential(&samples, 10, 1).unwrap_err();
        assert_eq!(err, StegoError::InsufficientCapacity { needed: 8, available: 5 });
    }

    #[test]
    fn groups_are_lsb_first_within_sample() {
        // Bits of 0b1100_0110 in stream order: 1,1,0,0,0,1,1,0.
        // Width 2 groups: [1,1] [0,0] [0,1] [1,0] -> values 3, 0, 2, 1.
        let mut samples = vec![0i16; 4];
        let used = embed_positions(&mut samples, &[0, 1, 2, 3], &[0b1100_0110], 2).unwrap();
        assert_eq!(used, 4);
        assert_eq!(samples, vec![3, 0, 2, 1]);
        assert_eq!(extract_positions(&samples, &[0, 1, 2, 3], 8, 2).unwrap(), vec![0b1100_0110]);
    }

    #[test]
    fn partial_final_group() {
        // Width 3 over 8 bits: [1,0,1] [1,0,0] [1,1] -> 5, 1, 3.
        let mut samples = vec![0x7FFFi16; 3];
        embed_positions(&mut samples, &[0, 1, 2], &[0b1011_0011], 3).unwrap();
        assert_eq!(samples[0] & 7, 5);
        assert_eq!(samples[1] & 7, 1);
        // The whole low group is cleared even when fewer bits remain.
        assert_eq!(samples[2] & 7, 3);
        assert_eq!(samples[0] & !7, 0x7FFF & !7);
        assert_eq!(extract_positions(&samples, &[0, 1, 2], 8, 3).unwrap(), vec![0b1011_0011]);
    }

    #[test]
    fn negative_samples_keep_upper_bits() {
        let mut samples = vec![-32768i16, -1, -12345, 32767];
        let positions = [3, 0, 2, 1];
        embed_positions(&mut samples, &positions, &[0xA5, 0x3C], 4).unwrap();
        assert_eq!(samples[0] & !0xF, -32768);
        assert_eq!(samples[1] & !0xF, -1 & !0xF);
        assert_eq!(extract_positions(&samples, &positions, 16, 4).unwrap(), vec![0xA5, 0x3C]);
    }

    #[test]
    fn scattered_positions_all_widths() {
        let payload = b"The quick brown fox";
        for n in 1..=4u8 {
            let mut samples: Vec<i16> = (0..400).map(|i| (i * 37 - 7000) as i16).collect();
            let positions: Vec<usize> = (0..400).rev().step_by(2).collect();
            embed_positions(&mut samples, &positions, payload, n).unwrap();
            let bits = payload.len() * 8;
            assert_eq!(extract_positions(&samples, &positions, bits, n).unwrap(), payload);
        }
    }

    #[test]
    fn unaligned_bit_count_is_zero_padded() {
        let samples = vec![1i16; 16];
        let out = extract_positions(&samples, &(0..16).collect::<Vec<_>>(), 12, 1).unwrap();
        assert_eq!(out, vec![0xFF, 0xF0]);
    }

    #[test]
    fn exhausted_positions() {
        let mut samples = vec![0i16; 10];
        let err = embed_positions(&mut samples, &[0, 1, 2], &[0xFF], 2).unwrap_err();
        assert_eq!(err, StegoError::InsufficientCapacity { needed: 4, available: 3 });
        assert!(samples.iter().all(|&s| s == 0));

        let err = extract_positions(&samples, &[0, 1, 2], 8, 2).unwrap_err();
        assert_eq!(err, StegoError::InsufficientCapacity { needed: 4, available: 3 });
    }

    #[test]
    fn out_of_range_position() {
        let mut samples = vec![0i16; 4];
        let err = embed_positions(&mut samples, &[0, 1, 2, 9], &[0xFF], 2).unwrap_err();
        assert!(matches!(err, StegoError::InsufficientCapacity { .. }));
    }

    #[test]
    fn invalid_width() {
        let mut samples = vec![0i16; 16];
        for n in [0u8, 5, 16] {
            let err = embed_positions(&mut samples, &[0; 16], &[1], n).unwrap_err();
            assert!(matches!(err, StegoError::ConfigurationError(_)));
            let err = extract_positions(&samples, &[0; 16], 8, n).unwrap_err();
            assert!(matches!(err, StegoError::ConfigurationError(_)));
        }
    }

    #[test]
    fn pack_pads_trailing_byte() {
        assert_eq!(pack_msb_first(&[1, 0, 1]), vec![0b1010_0000]);
        assert!(pack_msb_first(&[]).is_empty());
    }
}
