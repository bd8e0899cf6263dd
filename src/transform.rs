//! Value transforms applied to raw upstream readings.
//!
//! Pure functions, no I/O. Joint positions from actuators mounted mirrored
//! get their sign inverted; finger channels are flipped against the sensor's
//! full-scale value so that a closed finger reads high instead of low.

use std::collections::HashSet;

/// Negate `position` when `id` belongs to the inverted set, identity otherwise.
pub fn invert_if_listed(id: u32, position: f64, inverted: &HashSet<u32>) -> f64 {
    if inverted.contains(&id) { -position } else { position }
}

/// Flip a raw finger channel reading against the sensor's full-scale value.
///
/// Inputs outside `[0, max]` are not clamped; the result may be negative or
/// exceed `max`. Applying the flip twice returns the original value.
pub fn flip_range(raw: i32, max: i32) -> i32 {
    max - raw
}

/// Round a joint position to one decimal place of degrees.
pub fn round_tenth(position: f64) -> f64 {
    (position * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference_inverted() -> HashSet<u32> {
        [11, 15, 21, 25].into_iter().collect()
    }

    #[test]
    fn listed_ids_are_negated() {
        let inverted = reference_inverted();
        assert_eq!(invert_if_listed(11, 30.0, &inverted), -30.0);
        assert_eq!(invert_if_listed(15, -12.5, &inverted), 12.5);
        assert_eq!(invert_if_listed(12, -10.0, &inverted), -10.0);
        assert_eq!(invert_if_listed(24, 7.5, &inverted), 7.5);
    }

    #[test]
    fn flip_matches_reference_scenario() {
        // Raw glove reading against the 16-bit full scale
        let raw = [0, 65535, 100, 200, 300, 400];
        let flipped: Vec<i32> = raw.iter().map(|&v| flip_range(v, 65535)).collect();
        assert_eq!(flipped, vec![65535, 0, 65435, 65335, 65235, 65135]);
    }

    #[test]
    fn out_of_range_values_pass_through() {
        assert_eq!(flip_range(70000, 65535), -4465);
        assert_eq!(flip_range(-100, 65535), 65635);
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_tenth(30.04), 30.0);
        assert_eq!(round_tenth(30.05), 30.1);
        assert_eq!(round_tenth(-10.26), -10.3);
        assert_eq!(round_tenth(0.0), 0.0);
    }

    proptest! {
        #[test]
        fn inversion_only_touches_listed_ids(id in 0u32..64, position in -360.0f64..360.0) {
            let inverted = reference_inverted();
            let result = invert_if_listed(id, position, &inverted);
            if inverted.contains(&id) {
                prop_assert_eq!(result, -position);
            } else {
                prop_assert_eq!(result, position);
            }
        }

        #[test]
        fn flip_is_an_involution(raw in 0i32..=65535) {
            let once = flip_range(raw, 65535);
            prop_assert!((0..=65535).contains(&once));
            prop_assert_eq!(flip_range(once, 65535), raw);
        }

        #[test]
        fn rounded_positions_scale_to_integers(position in -360.0f64..360.0) {
            let rounded = round_tenth(position);
            let scaled = rounded * 10.0;
            prop_assert!((scaled - scaled.round()).abs() < 1e-6);
            prop_assert!((rounded - position).abs() <= 0.05 + 1e-9);
        }
    }
}
