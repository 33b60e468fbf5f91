// snake.rs - Ribbon eels
//
// A snake is a head position plus kinematic state. Its segments carry no
// velocity of their own; they are re-laid every frame from the head, either
// as a trailing sine ribbon (wandering) or along an arc (maelstrom).

use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;

use super::crumb::Crumbs;
use crate::config::Smoothing;
use crate::math::{lerp, pin, range, sign};
use crate::world::{Viewport, nearest_crumb_for};

pub const SEGMENT_COUNT: usize = 12;
const SEGMENT_SPACING: f32 = 20.0;

// Base kinematics, rolled per snake
const SPEED: (f32, f32) = (55.0, 90.0);
const SPEED_EXTREME: (f32, f32) = (90.0, 140.0);
const AMP: (f32, f32) = (8.0, 14.0);
const AMP_EXTREME: (f32, f32) = (14.0, 22.0);
const AMP_REDUCED: f32 = 2.0;
const FREQ: (f32, f32) = (0.016, 0.028);
const WAVELENGTH: (f32, f32) = (0.9, 1.6);

// Spawning and bounds
const SPAWN_TOP: f32 = 60.0;
const SPAWN_BOTTOM_INSET: f32 = 80.0;
const SPAWN_MIN_BOTTOM: f32 = 120.0;
const ENTRY_OFFSET: f32 = 60.0;
const MARGIN: f32 = 40.0;
const OVERSCAN: f32 = 120.0;
const REENTRY_OFFSET: f32 = 80.0;
const REENTRY_JITTER: f32 = 40.0;

// Chasing and feeding
const CONVERGE_RATE: f32 = 0.9;
const CONVERGE_CAP: f32 = 50.0;
const CHASE_BOOST: f32 = 1.25;
const CHASE_BOOST_EXTREME: f32 = 1.35;
pub const CONSUME_RADIUS: f32 = 22.0;
pub const EXCITE_SECS: f32 = 1.2;
const EXCITED_SPEED: f32 = 1.45;
const EXCITED_AMP: f32 = 1.5;
const EASE: f32 = 0.08;

// Maelstrom
const ORBIT_RADIUS_FRAC: f32 = 0.34;
const ORBIT_EASE: f32 = 0.04;
const ORBIT_SPEED: (f32, f32) = (0.6, 1.1);
const ORBIT_SPEED_EXTREME: f32 = 1.3;
const SEGMENT_ARC: f32 = 18.0;
const RIPPLE: f32 = 4.0;
const RIPPLE_FREQ: f32 = 3.0;
const RIPPLE_STEP: f32 = 0.8;

/// Pose of one body segment. `rot` is in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Segment {
    pub x: f32,
    pub y: f32,
    pub rot: f32,
}

/// Orbit slot held while the maelstrom is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub angle: f32,
    pub radius: f32,
    /// Radians per second.
    pub speed: f32,
    /// `1.0` or `-1.0`.
    pub dir: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub x: f32,
    pub y: f32,
    pub dir: f32,
    pub speed: f32,
    pub base_speed: f32,
    pub amp: f32,
    pub base_amp: f32,
    pub freq: f32,
    pub wavelength: f32,
    pub phase: f32,
    /// Seconds of excitement left after a meal.
    pub excite: f32,
    /// Head first.
    pub segments: [Segment; SEGMENT_COUNT],
    pub orbit: Option<Orbit>,
}

/// Per-frame inputs shared by every snake.
#[derive(Debug, Clone, Copy)]
pub struct SnakeCtx {
    pub dt: f32,
    pub time: f64,
    pub view: Viewport,
    pub extreme: bool,
    pub reduced_motion: bool,
    pub smoothing: Smoothing,
}

fn roll_base<R: Rng + ?Sized>(rng: &mut R, extreme: bool, reduced_motion: bool) -> (f32, f32) {
    let (s0, s1) = if extreme { SPEED_EXTREME } else { SPEED };
    let speed = range(rng, s0, s1);
    let amp = if reduced_motion {
        AMP_REDUCED
    } else {
        let (a0, a1) = if extreme { AMP_EXTREME } else { AMP };
        range(rng, a0, a1)
    };
    (speed, amp)
}

impl Snake {
    /// Roll a fresh snake just off the edge it will swim in from.
    pub fn spawn<R: Rng + ?Sized>(
        y: Option<f32>,
        view: Viewport,
        extreme: bool,
        reduced_motion: bool,
        rng: &mut R,
    ) -> Self {
        let y = y.unwrap_or_else(|| {
            range(rng, SPAWN_TOP, SPAWN_MIN_BOTTOM.max(view.h - SPAWN_BOTTOM_INSET))
        });
        let (base_speed, base_amp) = roll_base(rng, extreme, reduced_motion);
        let freq = range(rng, FREQ.0, FREQ.1);
        let wavelength = range(rng, WAVELENGTH.0, WAVELENGTH.1);
        let dir = sign(rng);
        let x = if dir > 0.0 { -ENTRY_OFFSET } else { view.w + ENTRY_OFFSET };

        let mut snake = Self {
            x,
            y,
            dir,
            speed: base_speed,
            base_speed,
            amp: base_amp,
            base_amp,
            freq,
            wavelength,
            phase: range(rng, 0.0, TAU),
            excite: 0.0,
            segments: [Segment::default(); SEGMENT_COUNT],
            orbit: None,
        };
        snake.lay_ribbon(reduced_motion);
        snake
    }

    /// Re-roll base speed and amplitude, e.g. after the intensity changes.
    pub fn reroll<R: Rng + ?Sized>(&mut self, extreme: bool, reduced_motion: bool, rng: &mut R) {
        let (speed, amp) = roll_base(rng, extreme, reduced_motion);
        self.base_speed = speed;
        self.base_amp = amp;
    }

    #[inline]
    pub fn is_excited(&self) -> bool {
        self.excite > 0.0
    }

    /// Take orbit slot `slot` of `slots`, starting from wherever the head is.
    pub fn enter_orbit<R: Rng + ?Sized>(
        &mut self,
        slot: usize,
        slots: usize,
        center: (f32, f32),
        extreme: bool,
        rng: &mut R,
    ) {
        let (dx, dy) = (self.x - center.0, self.y - center.1);
        let boost = if extreme { ORBIT_SPEED_EXTREME } else { 1.0 };
        self.orbit = Some(Orbit {
            angle: slot as f32 * TAU / slots.max(1) as f32,
            radius: (dx * dx + dy * dy).sqrt().max(1.0),
            speed: range(rng, ORBIT_SPEED.0, ORBIT_SPEED.1) * boost,
            dir: sign(rng),
        });
    }

    /// One wander/chase step. Returns true if a crumb was eaten.
    fn wander<R: Rng + ?Sized>(&mut self, crumbs: &mut Crumbs, ctx: &SnakeCtx, rng: &mut R) -> bool {
        let dt = ctx.dt;
        let mut speed_target = self.base_speed;
        let mut amp_target = self.base_amp;
        let mut ate = false;

        if let Some(i) = nearest_crumb_for(self, crumbs.as_slice()) {
            let (cx, cy) = {
                let c = &crumbs.as_slice()[i];
                (c.x, c.y)
            };

            let cap = CONVERGE_CAP * dt;
            self.y += ((cy - self.y) * CONVERGE_RATE * dt).clamp(-cap, cap);

            let boost = if ctx.extreme { CHASE_BOOST_EXTREME } else { CHASE_BOOST };
            speed_target *= boost;
            amp_target *= boost;

            let (dx, dy) = (cx - self.x, cy - self.y);
            if dx * dx + dy * dy < CONSUME_RADIUS * CONSUME_RADIUS {
                crumbs.consume(i);
                self.excite = EXCITE_SECS;
                ate = true;
            }
        }

        if self.excite > 0.0 {
            self.excite -= dt;
            speed_target = speed_target.max(self.base_speed * EXCITED_SPEED);
            amp_target = amp_target.max(self.base_amp * EXCITED_AMP);
        }

        let k = ctx.smoothing.factor(EASE, dt);
        self.speed = lerp(self.speed, speed_target, k);
        self.amp = lerp(self.amp, amp_target, k);

        let (w, h) = (ctx.view.w, ctx.view.h);
        self.x += self.dir * self.speed * dt;
        self.y = pin(self.y, MARGIN, h - MARGIN);

        // Swim off one edge, come back in heading the other way.
        if self.x < -OVERSCAN || self.x > w + OVERSCAN {
            self.dir = -self.dir;
            self.x = if self.dir > 0.0 { -REENTRY_OFFSET } else { w + REENTRY_OFFSET };
            self.y = pin(self.y + range(rng, -REENTRY_JITTER, REENTRY_JITTER), MARGIN, h - MARGIN);
            self.phase = range(rng, 0.0, TAU);
        }

        self.lay_ribbon(ctx.reduced_motion);
        ate
    }

    /// Segments trail the head; nearer the tail samples an earlier phase.
    fn lay_ribbon(&mut self, reduced_motion: bool) {
        let last = (SEGMENT_COUNT - 1) as f32;
        for (i, seg) in self.segments.iter_mut().enumerate() {
            let t = i as f32 / last;
            let bx = self.x - self.dir * i as f32 * SEGMENT_SPACING;
            let wave = if reduced_motion {
                0.0
            } else {
                self.amp * (bx * self.freq + self.phase - t * self.wavelength).sin()
            };
            seg.x = bx;
            seg.y = self.y + wave;
        }
        face_forward(&mut self.segments);
    }

    fn circle(&mut self, center: (f32, f32), target_radius: f32, ctx: &SnakeCtx) {
        let Some(orbit) = self.orbit.as_mut() else { return };

        let k = ctx.smoothing.factor(ORBIT_EASE, ctx.dt);
        orbit.radius = lerp(orbit.radius, target_radius, k);
        orbit.angle = (orbit.angle + orbit.dir * orbit.speed * ctx.dt).rem_euclid(TAU);

        let Orbit { angle, radius, dir, .. } = *orbit;
        let spacing = SEGMENT_ARC / radius.max(1.0);
        let time = ctx.time as f32;

        for (i, seg) in self.segments.iter_mut().enumerate() {
            let a = angle - dir * i as f32 * spacing;
            let r = radius + (time * RIPPLE_FREQ + i as f32 * RIPPLE_STEP).sin() * RIPPLE;
            seg.x = center.0 + a.cos() * r;
            seg.y = center.1 + a.sin() * r;
            seg.rot = a + dir * FRAC_PI_2;
        }

        self.x = self.segments[0].x;
        self.y = self.segments[0].y;
    }
}

/// Point each segment at the one ahead of it; the head copies its neck.
fn face_forward(segments: &mut [Segment; SEGMENT_COUNT]) {
    for i in (1..SEGMENT_COUNT).rev() {
        let ahead = segments[i - 1];
        let seg = &mut segments[i];
        seg.rot = (ahead.y - seg.y).atan2(ahead.x - seg.x);
    }
    segments[0].rot = segments[1].rot;
}

/// Live snake pool, in spawn order.
#[derive(Debug, Default)]
pub struct Snakes {
    list: Vec<Snake>,
}

impl Snakes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snake> {
        self.list.iter()
    }

    pub fn as_slice(&self) -> &[Snake] {
        &self.list
    }

    /// Spawn and register a snake.
    pub fn create<R: Rng + ?Sized>(
        &mut self,
        y: Option<f32>,
        view: Viewport,
        extreme: bool,
        reduced_motion: bool,
        rng: &mut R,
    ) -> &mut Snake {
        self.list.push(Snake::spawn(y, view, extreme, reduced_motion, rng));
        let last = self.list.len() - 1;
        &mut self.list[last]
    }

    pub fn reroll_all<R: Rng + ?Sized>(&mut self, extreme: bool, reduced_motion: bool, rng: &mut R) {
        for snake in &mut self.list {
            snake.reroll(extreme, reduced_motion, rng);
        }
    }

    /// Hand every snake an evenly spaced orbit slot.
    pub fn assign_orbits<R: Rng + ?Sized>(&mut self, view: Viewport, extreme: bool, rng: &mut R) {
        let slots = self.list.len();
        let center = view.center();
        for (slot, snake) in self.list.iter_mut().enumerate() {
            snake.enter_orbit(slot, slots, center, extreme, rng);
        }
    }

    /// Wander/chase step for every snake, in spawn order. A crumb eaten by
    /// an earlier snake is already gone when later snakes look for food.
    /// Returns the number of crumbs eaten.
    pub fn wander<R: Rng + ?Sized>(&mut self, crumbs: &mut Crumbs, ctx: &SnakeCtx, rng: &mut R) -> usize {
        let mut eaten = 0;
        for snake in &mut self.list {
            if snake.wander(crumbs, ctx, rng) {
                eaten += 1;
            }
        }
        eaten
    }

    /// Maelstrom step: everyone circles the viewport center.
    pub fn circle(&mut self, ctx: &SnakeCtx) {
        let center = ctx.view.center();
        let target = ctx.view.short_side() * ORBIT_RADIUS_FRAC;
        for snake in &mut self.list {
            snake.circle(center, target, ctx);
        }
    }
}
