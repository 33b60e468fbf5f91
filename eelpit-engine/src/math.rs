// math.rs - Scalar helpers shared by every entity pool

use rand::Rng;
use rand::distributions::Standard;

/// Uniform value between `min` and `max`. Unlike `gen_range`, empty or
/// inverted ranges don't panic.
#[inline]
pub fn range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let u: f32 = rng.sample(Standard);
    min + u * (max - min)
}

/// Fair coin as a travel direction: `1.0` or `-1.0`.
#[inline]
pub fn sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.gen_bool(0.5) { 1.0 } else { -1.0 }
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Pull `v` into `[lo, hi]`, favouring `hi` when the bounds cross
/// (a viewport shorter than both margins).
#[inline]
pub fn pin(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn range_stays_inside_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = range(&mut rng, 55.0, 90.0);
            assert!((55.0..=90.0).contains(&v));
        }
    }

    #[test]
    fn range_tolerates_inverted_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        let v = range(&mut rng, 10.0, -10.0);
        assert!((-10.0..=10.0).contains(&v));
    }

    #[test]
    fn lerp_clamps_t() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
    }

    #[test]
    fn pin_prefers_upper_bound_when_crossed() {
        assert_eq!(pin(5.0, 40.0, 460.0), 40.0);
        assert_eq!(pin(500.0, 40.0, 460.0), 460.0);
        assert_eq!(pin(5.0, 40.0, 20.0), 20.0);
    }
}
