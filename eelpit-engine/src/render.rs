// render.rs - Encode poses into flat buffers for the page
//
// One f32 buffer per layer, rewritten every frame. The page reads them
// through pointer/length pairs; pointers are only good until the next frame.
//
//   segments  x, y, rot, scale, flags   (per segment, head first, per snake)
//   crumbs    x, y, sunk                (sunk: 0 or 1)
//   eyes      x, y, size, pupil_x, pupil_y, tilt, blink
//   splats    x, y, life                (life: 1 fresh -> 0 gone)
//
// Segment flags: 1 head, 2 excited, 4 heading left, 8 orbiting.

use crate::sim::{Crumbs, Eyes, SEGMENT_COUNT, SPLAT_SECS, Snakes, Splats};

pub const SEGMENT_STRIDE: usize = 5;
pub const CRUMB_STRIDE: usize = 3;
pub const EYE_STRIDE: usize = 7;
pub const SPLAT_STRIDE: usize = 3;

pub const FLAG_HEAD: u32 = 1;
pub const FLAG_EXCITED: u32 = 2;
pub const FLAG_REVERSE: u32 = 4;
pub const FLAG_ORBIT: u32 = 8;

#[derive(Debug, Default)]
pub struct Encoder {
    segments: Vec<f32>,
    crumbs: Vec<f32>,
    eyes: Vec<f32>,
    splats: Vec<f32>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.crumbs.clear();
        self.eyes.clear();
        self.splats.clear();
    }

    pub fn segments(&self) -> &[f32] { &self.segments }
    pub fn crumbs(&self) -> &[f32] { &self.crumbs }
    pub fn eyes(&self) -> &[f32] { &self.eyes }
    pub fn splats(&self) -> &[f32] { &self.splats }

    pub fn encode_snakes(&mut self, snakes: &Snakes) {
        for snake in snakes.iter() {
            let mut shared = 0;
            if snake.is_excited() { shared |= FLAG_EXCITED; }
            if snake.dir < 0.0 { shared |= FLAG_REVERSE; }
            if snake.orbit.is_some() { shared |= FLAG_ORBIT; }

            for (i, seg) in snake.segments.iter().enumerate() {
                let flags = if i == 0 { shared | FLAG_HEAD } else { shared };
                let scale = 1.0 - i as f32 / (SEGMENT_COUNT as f32 * 1.2);
                self.segments.extend_from_slice(&[seg.x, seg.y, seg.rot, scale, flags as f32]);
            }
        }
    }

    pub fn encode_crumbs(&mut self, crumbs: &Crumbs) {
        for c in crumbs.iter() {
            let sunk = if c.settled { 1.0 } else { 0.0 };
            self.crumbs.extend_from_slice(&[c.x, c.y, sunk]);
        }
    }

    pub fn encode_eyes(&mut self, eyes: &Eyes) {
        for e in eyes.iter() {
            let blink = if e.is_blinking() { 1.0 } else { 0.0 };
            self.eyes.extend_from_slice(&[e.x, e.y, e.size, e.pupil_x, e.pupil_y, e.tilt, blink]);
        }
    }

    pub fn encode_splats(&mut self, splats: &Splats) {
        for i in 0..splats.n {
            let life = 1.0 - (splats.age[i] / SPLAT_SECS).min(1.0);
            self.splats.extend_from_slice(&[splats.x[i], splats.y[i], life]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Viewport;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn snake_layout_is_head_first() {
        let mut rng = SmallRng::seed_from_u64(31);
        let view = Viewport::new(800.0, 600.0);
        let mut snakes = Snakes::new();
        let s = snakes.create(Some(300.0), view, false, false, &mut rng);
        s.dir = -1.0;
        s.excite = 1.0;
        let head = s.segments[0];

        let mut enc = Encoder::new();
        enc.encode_snakes(&snakes);
        let buf = enc.segments();
        assert_eq!(buf.len(), SEGMENT_COUNT * SEGMENT_STRIDE);
        assert_eq!(&buf[..3], &[head.x, head.y, head.rot]);
        assert_eq!(buf[3], 1.0);
        assert_eq!(buf[4] as u32, FLAG_HEAD | FLAG_EXCITED | FLAG_REVERSE);
        assert_eq!(buf[SEGMENT_STRIDE + 4] as u32, FLAG_EXCITED | FLAG_REVERSE);
        assert!(buf[SEGMENT_STRIDE * (SEGMENT_COUNT - 1) + 3] < 1.0);
    }

    #[test]
    fn clear_empties_every_layer() {
        let mut splats = Splats::new();
        splats.spawn(5.0, 6.0);
        let mut enc = Encoder::new();
        enc.encode_splats(&splats);
        assert_eq!(enc.splats(), &[5.0, 6.0, 1.0]);

        enc.clear();
        assert!(enc.splats().is_empty());
        assert!(enc.segments().is_empty());
    }
}
