//! Numeric normalization for real values.
//!
//! Two distinct corrections happen before a real number is serialized:
//! snapping values that sit within an epsilon of an integer (floating-point
//! noise from upstream arithmetic), and recovering the intended decimal of a
//! value that an engine parsed into a 32-bit float. Geospatial documents are
//! typically authored with double-precision coordinates, so a float-only
//! engine reads `297.84` back as `297.8399963378906`.

/// Snap `x` to the nearest integer when it is within an automatic epsilon:
/// `1e-10` for `|x| < 1`, `1e-8` otherwise.
pub fn round_if_close(x: f64) -> f64 {
    let eps = if x.abs() < 1.0 { 1e-10 } else { 1e-8 };
    round_if_close_eps(x, eps)
}

/// Snap `x` to the nearest integer when it is within `eps` of it.
pub fn round_if_close_eps(x: f64, eps: f64) -> f64 {
    let rounded = x.round();
    if (x - rounded).abs() < eps { rounded } else { x }
}

/// Recover the likely intended decimal value of a float parsed from a
/// decimal token.
///
/// Prints the value at six decimals and, when the third and fourth fraction
/// digits read `99` or `00`, tries the value rounded at the second decimal
/// (one hundredth further from zero for the `99` case). The candidate is
/// accepted only if casting it back to `f32` reproduces the input or one of
/// its immediate neighbors.
pub fn round_to_likely_double(value: f32) -> f64 {
    if value.round() == value {
        return f64::from(value);
    }

    let fallback = f64::from(value);
    let printed = format!("{value:.6}");
    let Some(dot) = printed.find('.') else {
        return fallback;
    };
    let frac = &printed[dot + 1..];
    if frac.len() < 4 {
        return fallback;
    }

    let nudge = match &frac[2..4] {
        "99" => 0.01f64.copysign(fallback),
        "00" => 0.0,
        _ => return fallback,
    };
    let Ok(truncated) = printed[..dot + 3].parse::<f64>() else {
        return fallback;
    };
    // Reparse through the printed form so the candidate is exactly the
    // two-decimal literal, not the literal plus accumulated float error.
    let Ok(candidate) = format!("{:.2}", truncated + nudge).parse::<f64>() else {
        return fallback;
    };

    let as_float = candidate as f32;
    if as_float == value || as_float == value.next_up() || as_float == value.next_down() {
        candidate
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- round_if_close ---

    #[test]
    fn snaps_near_integer_above_one() {
        assert_eq!(round_if_close(1.9999999999), 2.0);
        assert_eq!(round_if_close(42.000000004), 42.0);
    }

    #[test]
    fn leaves_distant_values_alone() {
        assert_eq!(round_if_close(1.5), 1.5);
        assert_eq!(round_if_close(297.84), 297.84);
    }

    #[test]
    fn small_magnitudes_use_tighter_epsilon() {
        // 1e-9 off is within 1e-8 but NOT within the sub-one epsilon of 1e-10.
        assert_eq!(round_if_close(0.999999999), 0.999999999);
        assert_eq!(round_if_close(0.99999999999), 1.0);
    }

    #[test]
    fn explicit_epsilon() {
        assert_eq!(round_if_close_eps(9.9, 0.2), 10.0);
        assert_eq!(round_if_close_eps(9.9, 0.05), 9.9);
    }

    #[test]
    fn negative_values_snap_too() {
        assert_eq!(round_if_close(-3.0000000001), -3.0);
    }

    // --- round_to_likely_double ---

    #[test]
    fn recovers_two_decimal_value_rounded_down_by_float() {
        // 297.84 stored as text, read back as f32.
        let parsed = 297.84f32;
        assert_eq!(round_to_likely_double(parsed), 297.84);
    }

    #[test]
    fn recovers_value_with_trailing_zeros_pattern() {
        // 297.8 as f32 prints as 297.799988: the "99" path adds one hundredth.
        let parsed = 297.8f32;
        assert_eq!(round_to_likely_double(parsed), 297.8);
    }

    #[test]
    fn integral_floats_pass_through() {
        assert_eq!(round_to_likely_double(300.0f32), 300.0);
        assert_eq!(round_to_likely_double(-2.0f32), -2.0);
    }

    #[test]
    fn exact_fractions_pass_through() {
        assert_eq!(round_to_likely_double(1.5f32), 1.5);
        assert_eq!(round_to_likely_double(0.25f32), 0.25);
    }

    #[test]
    fn negative_values_recover_symmetrically() {
        let parsed = -297.84f32;
        assert_eq!(round_to_likely_double(parsed), -297.84);
    }

    #[test]
    fn unrelated_fractions_keep_float_value() {
        let parsed = 0.123456f32;
        assert_eq!(round_to_likely_double(parsed), f64::from(parsed));
    }
}
