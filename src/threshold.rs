//! Threshold-matrix generators for ordered and checker dithering.
//!
//! Both return a scalar offset in `(-0.5, 0.5]`, broadcast across channels
//! by the caller and scaled by the configured dither level.

/// `(x XOR y) & 1` mapped to `{-0.5, +0.5}`.
pub fn checker_offset(x: u32, y: u32) -> f32 {
    if (x ^ y) & 1 == 1 {
        0.5
    } else {
        -0.5
    }
}

/// Bayer threshold for an `n`-bit ordered matrix (size `2^n x 2^n`), `n` in
/// `1..=6`. Built by interleaving bits of `x XOR y` and `x`, high bit first —
/// the standard recursive-Bayer bit-interleave construction.
pub fn bayer_offset(x: u32, y: u32, n: u32) -> f32 {
    debug_assert!((1..=6).contains(&n));
    let xor = x ^ y;
    let mut t: u32 = 0;
    for b in (0..n).rev() {
        t = (t << 1) | ((xor >> b) & 1);
        t = (t << 1) | ((x >> b) & 1);
    }
    let denom = (1u32 << (2 * n)) as f32;
    (t as f32) / denom - 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn checker_tile_sums_to_zero() {
        let mut sum = 0.0f32;
        for y in 0..2 {
            for x in 0..2 {
                sum += checker_offset(x, y);
            }
        }
        assert_eq!(sum, 0.0);
    }

    #[test]
    fn bayer_tile_is_a_permutation_of_its_value_set() {
        for n in 1..=6u32 {
            let size = 1u32 << n;
            let denom = (1u32 << (2 * n)) as f32;
            let mut seen = HashSet::new();
            let mut sum = 0.0f64;
            for y in 0..size {
                for x in 0..size {
                    let v = bayer_offset(x, y, n);
                    let k = ((v + 0.5) * denom).round() as i64;
                    assert!(seen.insert(k), "n={n} duplicate value {k} at ({x},{y})");
                    sum += v as f64;
                }
            }
            assert_eq!(seen.len(), (size * size) as usize);
            // sum of {k/denom - 0.5 : k in 0..denom} collapses to exactly -0.5
            // regardless of tile size, since the k/denom terms sum to (denom-1)/2.
            let expected_sum = -0.5f64;
            assert!((sum - expected_sum).abs() < 1e-3, "n={n} sum={sum} expected={expected_sum}");
        }
    }

    #[test]
    fn bayer_offset_is_deterministic() {
        for n in 1..=6u32 {
            for y in 0..4u32 {
                for x in 0..4u32 {
                    assert_eq!(bayer_offset(x, y, n), bayer_offset(x, y, n));
                }
            }
        }
    }
}
