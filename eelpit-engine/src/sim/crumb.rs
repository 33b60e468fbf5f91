// crumb.rs - Falling breadcrumbs
//
// Crumbs drop from above the tank, sway as they fall and sink into the floor.
// A sunk crumb lingers briefly, then is removed. Eaten crumbs are removed on
// the spot.

use rand::Rng;

use crate::math::range;
use crate::world::Viewport;

const FALL_MIN: f32 = 35.0;
const FALL_MAX: f32 = 70.0;
const GRAVITY: f32 = 220.0;
const TERMINAL_VY: f32 = 260.0;
const SWAY: f32 = 14.0;
const SWAY_EXTREME: f32 = 24.0;
const SWAY_FREQ: f32 = 0.06;
const FLOOR_INSET: f32 = 14.0;
const SPAWN_Y: f32 = -10.0;
const EDGE_INSET: f32 = 10.0;

/// Seconds a sunk crumb stays visible.
pub const SINK_DELAY: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct Crumb {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub phase: f32,
    pub settled: bool,
    pub consumed: bool,
    /// Clock time the crumb hit the floor.
    pub settled_at: Option<f64>,
}

impl Crumb {
    /// Only falling, uneaten crumbs can be chased.
    #[inline]
    pub fn is_edible(&self) -> bool {
        !self.settled && !self.consumed
    }
}

/// What one crumb tick did, for stats.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrumbTick {
    pub sunk: usize,
    pub removed: usize,
}

#[derive(Debug, Default)]
pub struct Crumbs {
    list: Vec<Crumb>,
    next_id: u32,
}

impl Crumbs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn as_slice(&self) -> &[Crumb] {
        &self.list
    }

    pub fn iter(&self) -> impl Iterator<Item = &Crumb> {
        self.list.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Crumb> {
        self.list.iter().find(|c| c.id == id)
    }

    /// Drop a new crumb. Missing coordinates default to a random column
    /// just above the top edge.
    pub fn create<R: Rng + ?Sized>(
        &mut self,
        x: Option<f32>,
        y: Option<f32>,
        view: Viewport,
        rng: &mut R,
    ) -> &Crumb {
        let x = x.unwrap_or_else(|| range(rng, EDGE_INSET, view.w - EDGE_INSET));
        let crumb = Crumb {
            id: self.next_id,
            x,
            y: y.unwrap_or(SPAWN_Y),
            vy: range(rng, FALL_MIN, FALL_MAX),
            phase: range(rng, 0.0, std::f32::consts::TAU),
            settled: false,
            consumed: false,
            settled_at: None,
        };
        self.next_id = self.next_id.wrapping_add(1);
        self.list.push(crumb);
        &self.list[self.list.len() - 1]
    }

    /// Remove a crumb by id.
    pub fn destroy(&mut self, id: u32) -> Option<Crumb> {
        let i = self.list.iter().position(|c| c.id == id)?;
        Some(self.list.remove(i))
    }

    /// Mark the crumb at `index` eaten and take it out of the pool.
    /// Scan order of the remaining crumbs is preserved.
    pub fn consume(&mut self, index: usize) -> Crumb {
        let mut crumb = self.list.remove(index);
        crumb.consumed = true;
        crumb
    }

    /// Fall, sway, sink, and expire crumbs that have been sunk long enough.
    pub fn update(&mut self, dt: f32, now: f64, view: Viewport, extreme: bool) -> CrumbTick {
        let floor = view.h - FLOOR_INSET;
        let sway = if extreme { SWAY_EXTREME } else { SWAY };
        let mut tick = CrumbTick::default();

        let mut expired = Vec::new();
        for c in &mut self.list {
            if !c.settled {
                c.vy = (c.vy + GRAVITY * dt).min(TERMINAL_VY);
                c.y += c.vy * dt;
                c.x += (c.y * SWAY_FREQ + c.phase).sin() * sway * dt;
                if c.y >= floor {
                    c.y = floor;
                    c.settled = true;
                    c.settled_at = Some(now);
                    tick.sunk += 1;
                }
            } else if c.settled_at.is_some_and(|at| now - at >= SINK_DELAY) {
                expired.push(c.id);
            }
        }
        for id in expired {
            if self.destroy(id).is_some() { tick.removed += 1; }
        }

        tick
    }
}
