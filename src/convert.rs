use crate::util::round_half_up;

/// Converts a sample in [-1.0, 1.0] to a signed 16-bit value.
/// Values outside that range are clamped rather than wrapped.
pub fn sample_to_i16(sample: f64) -> i16 {
    let scaled = round_half_up(sample * i16::MAX as f64);
    scaled.clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Converts a signed 16-bit value back to a sample in [-1.0, 1.0].
pub fn i16_to_sample(value: i16) -> f32 {
    value as f32 / i16::MAX as f32
}

/// Packs a signed 16-bit value into `output`, high byte first.
pub fn write_i16_be(value: i16, output: &mut [u8]) {
    output[..2].copy_from_slice(&value.to_be_bytes());
}

/// Unpacks a big-endian signed 16-bit PCM stream into its values.
/// A trailing odd byte is ignored.
pub fn read_i16_be(input: &[u8]) -> impl Iterator<Item = i16> + '_ {
    input.chunks_exact(2).map(|pair| i16::from_be_bytes([pair[0], pair[1]]))
}

/// Copies a mono signal onto every channel of an interleaved output.
pub fn mono_to_interleaved(mono: impl Iterator<Item = f32>, channels: usize, output: &mut Vec<f32>) {
    output.clear();
    for sample in mono {
        output.extend(std::iter::repeat(sample).take(channels));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sample_to_i16() {
        assert_eq!(sample_to_i16(0.0), 0);
        assert_eq!(sample_to_i16(1.0), i16::MAX);
        assert_eq!(sample_to_i16(-1.0), -i16::MAX);
        assert_eq!(sample_to_i16(0.5), 16384);
    }

    #[test]
    fn test_sample_to_i16_clamps() {
        assert_eq!(sample_to_i16(1.5), i16::MAX);
        assert_eq!(sample_to_i16(-3.0), i16::MIN);
    }

    #[test]
    fn test_big_endian_packing() {
        let mut bytes = [0u8; 4];
        write_i16_be(0x1234, &mut bytes[0..]);
        write_i16_be(-2, &mut bytes[2..]);
        assert_eq!(bytes, [0x12, 0x34, 0xff, 0xfe]);
        let values: Vec<_> = read_i16_be(&bytes).collect();
        assert_eq!(values, vec![0x1234, -2]);
    }

    #[test]
    fn test_mono_to_interleaved() {
        let mut output = vec![9.0];
        mono_to_interleaved([0.5, -0.5].into_iter(), 2, &mut output);
        assert_eq!(output, vec![0.5, 0.5, -0.5, -0.5]);
    }
}
