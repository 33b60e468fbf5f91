// eye.rs - Watching eyes
//
// Eyes open once the ritual reaches its first tier. Their number is a pure
// function of ritual level and intensity; the pool is driven to exactly that
// number whenever it is reconciled.

use rand::Rng;

use crate::math::range;
use crate::world::Viewport;

const FIRST_TIER: u32 = 3;
const BASE_EYES: usize = 6;
const EYES_PER_LEVEL: usize = 4;
const EXTREME_MULT: usize = 3;
pub const MAX_EYES: usize = 100;

const SIZE: (f32, f32) = (18.0, 42.0);
const FOLLOW_GAIN: f32 = 12.0;
const FOLLOW_MIN: f32 = 0.08;
const FOLLOW_MAX: f32 = 0.3;
const OFFSET_BASE: f32 = 6.0;
const OFFSET_PER_LEVEL: f32 = 0.5;
const OFFSET_EXTREME: f32 = 1.5;
const MAX_TILT: f32 = 0.2;
const TILT_LAG: f32 = 0.5;
const BLINK_GAP: (f32, f32) = (2.0, 6.0);
const BLINK_SECS: f32 = 0.15;
const SHED_FRACTION: f32 = 0.15;

/// How many eyes should be open at this ritual level.
pub fn target_eye_count(level: u32, extreme: bool) -> usize {
    if level < FIRST_TIER {
        return 0;
    }
    let steps = (level - FIRST_TIER) as usize;
    let n = BASE_EYES.saturating_add(EYES_PER_LEVEL.saturating_mul(steps));
    let n = if extreme { n.saturating_mul(EXTREME_MULT) } else { n };
    n.min(MAX_EYES)
}

/// Furthest a pupil may stray from the center of its eye, in pixels.
pub fn max_pupil_offset(level: u32, extreme: bool) -> f32 {
    let base = OFFSET_BASE + OFFSET_PER_LEVEL * level as f32;
    if extreme { base * OFFSET_EXTREME } else { base }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Eye {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub pupil_x: f32,
    pub pupil_y: f32,
    pub tilt: f32,
    blink_in: f32,
    blink_left: f32,
}

impl Eye {
    fn open<R: Rng + ?Sized>(view: Viewport, rng: &mut R) -> Self {
        let size = range(rng, SIZE.0, SIZE.1);
        Self {
            x: range(rng, size, view.w - size),
            y: range(rng, size, view.h - size),
            size,
            pupil_x: 0.0,
            pupil_y: 0.0,
            tilt: 0.0,
            blink_in: range(rng, BLINK_GAP.0, BLINK_GAP.1),
            blink_left: 0.0,
        }
    }

    #[inline]
    pub fn is_blinking(&self) -> bool {
        self.blink_left > 0.0
    }

    fn blink<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        if self.blink_left > 0.0 {
            self.blink_left = (self.blink_left - dt).max(0.0);
            return;
        }
        self.blink_in -= dt;
        if self.blink_in <= 0.0 {
            self.blink_left = BLINK_SECS;
            self.blink_in = range(rng, BLINK_GAP.0, BLINK_GAP.1);
        }
    }
}

#[derive(Debug, Default)]
pub struct Eyes {
    list: Vec<Eye>,
}

impl Eyes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Eye> {
        self.list.iter()
    }

    /// Open or close eyes until exactly `target` remain. Newest close first.
    pub fn reconcile<R: Rng + ?Sized>(&mut self, target: usize, view: Viewport, rng: &mut R) {
        if self.list.len() > target {
            self.list.truncate(target);
            return;
        }
        while self.list.len() < target {
            self.list.push(Eye::open(view, rng));
        }
    }

    /// Close the oldest share of eyes. Returns how many closed.
    pub fn shed(&mut self) -> usize {
        let n = ((self.list.len() as f32 * SHED_FRACTION).ceil() as usize).min(self.list.len());
        self.list.drain(..n);
        n
    }

    /// Steer pupils toward the cursor and tick blinks.
    pub fn track<R: Rng + ?Sized>(
        &mut self,
        cursor: (f32, f32),
        dt: f32,
        level: u32,
        extreme: bool,
        view: Viewport,
        rng: &mut R,
    ) {
        let follow = (dt * FOLLOW_GAIN).clamp(FOLLOW_MIN, FOLLOW_MAX);
        let reach = max_pupil_offset(level, extreme);

        for eye in &mut self.list {
            let dx = cursor.0 - eye.x;
            let dy = cursor.1 - eye.y;
            let dist = (dx * dx + dy * dy).sqrt();
            let (tx, ty) = if dist > f32::EPSILON {
                let pull = dist.min(reach) / dist;
                (dx * pull, dy * pull)
            } else {
                (0.0, 0.0)
            };

            eye.pupil_x += (tx - eye.pupil_x) * follow;
            eye.pupil_y += (ty - eye.pupil_y) * follow;

            let off = (eye.pupil_x * eye.pupil_x + eye.pupil_y * eye.pupil_y).sqrt();
            if off > reach {
                let s = reach / off;
                eye.pupil_x *= s;
                eye.pupil_y *= s;
            }

            let tilt = (dx / view.w).clamp(-1.0, 1.0) * MAX_TILT;
            eye.tilt += (tilt - eye.tilt) * follow * TILT_LAG;

            eye.blink(dt, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn target_count_scenarios() {
        assert_eq!(target_eye_count(0, false), 0);
        assert_eq!(target_eye_count(2, true), 0);
        assert_eq!(target_eye_count(3, false), 6);
        assert_eq!(target_eye_count(5, false), 14);
        assert_eq!(target_eye_count(12, true), MAX_EYES);
        assert_eq!(target_eye_count(u32::MAX, false), MAX_EYES);
    }

    #[test]
    fn reconcile_hits_target_both_ways() {
        let mut rng = SmallRng::seed_from_u64(21);
        let view = Viewport::new(800.0, 600.0);
        let mut eyes = Eyes::new();

        eyes.reconcile(14, view, &mut rng);
        assert_eq!(eyes.len(), 14);
        let first = eyes.iter().next().cloned();

        eyes.reconcile(6, view, &mut rng);
        assert_eq!(eyes.len(), 6);
        assert_eq!(eyes.iter().next().cloned(), first);

        eyes.reconcile(0, view, &mut rng);
        assert!(eyes.is_empty());
    }

    #[test]
    fn shed_drops_oldest_fifteen_percent() {
        let mut rng = SmallRng::seed_from_u64(22);
        let view = Viewport::new(800.0, 600.0);
        let mut eyes = Eyes::new();
        eyes.reconcile(20, view, &mut rng);
        let survivor = eyes.iter().nth(3).cloned();

        assert_eq!(eyes.shed(), 3);
        assert_eq!(eyes.len(), 17);
        assert_eq!(eyes.iter().next().cloned(), survivor);

        let mut empty = Eyes::new();
        assert_eq!(empty.shed(), 0);
    }

    #[test]
    fn pupils_follow_cursor_within_reach() {
        let mut rng = SmallRng::seed_from_u64(23);
        let view = Viewport::new(800.0, 600.0);
        let mut eyes = Eyes::new();
        eyes.reconcile(5, view, &mut rng);

        let reach = max_pupil_offset(4, false);
        for _ in 0..240 {
            eyes.track((0.0, 0.0), 1.0 / 60.0, 4, false, view, &mut rng);
            for eye in eyes.iter() {
                let off = (eye.pupil_x.powi(2) + eye.pupil_y.powi(2)).sqrt();
                assert!(off <= reach + 1e-3);
            }
        }
        // Cursor is up and to the left of every eye.
        for eye in eyes.iter() {
            assert!(eye.pupil_x < 0.0 && eye.pupil_y < 0.0);
            assert!(eye.tilt < 0.0);
        }
    }

    #[test]
    fn reach_grows_with_level_and_extreme() {
        assert!(max_pupil_offset(12, false) > max_pupil_offset(3, false));
        assert!(max_pupil_offset(3, true) > max_pupil_offset(3, false));
    }

    #[test]
    fn eyes_blink_eventually() {
        let mut rng = SmallRng::seed_from_u64(24);
        let view = Viewport::new(800.0, 600.0);
        let mut eyes = Eyes::new();
        eyes.reconcile(1, view, &mut rng);

        let mut blinked = false;
        for _ in 0..(7 * 60) {
            eyes.track((400.0, 300.0), 1.0 / 60.0, 3, false, view, &mut rng);
            blinked |= eyes.iter().any(Eye::is_blinking);
        }
        assert!(blinked);
    }
}
