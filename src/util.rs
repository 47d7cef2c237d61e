/// Converts a deviation in octaves to the corresponding frequency ratio.
pub fn ratio_from_octaves(octaves: f64) -> f64 {
    2.0_f64.powf(octaves)
}

/// Rounds to the nearest integer, with halves rounded towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod test {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_ratio_from_octaves() {
        assert_eq!(ratio_from_octaves(0.0), 1.0);
        assert!((ratio_from_octaves(1.0) - 2.0).abs() < EPSILON);
        assert!((ratio_from_octaves(-1.0) - 0.5).abs() < EPSILON);
        assert!((ratio_from_octaves(0.5) - 2.0_f64.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(16383.5), 16384.0);
        assert_eq!(round_half_up(-16383.5), -16383.0);
        assert_eq!(round_half_up(0.49), 0.0);
        assert_eq!(round_half_up(-0.51), -1.0);
    }
}
