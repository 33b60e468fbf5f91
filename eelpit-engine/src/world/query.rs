// query.rs - Spatial lookups between pools
//
// Plain linear scans: the pit never holds more than a few dozen crumbs.

use crate::sim::{Crumb, Snake};

/// Snakes notice crumbs inside this radius.
pub const SENSE_RADIUS: f32 = 180.0;

/// Index of the closest edible crumb strictly inside the sense radius.
/// Ties go to the crumb scanned first.
pub fn nearest_crumb_for(snake: &Snake, crumbs: &[Crumb]) -> Option<usize> {
    nearest_crumb(snake.x, snake.y, crumbs)
}

pub fn nearest_crumb(x: f32, y: f32, crumbs: &[Crumb]) -> Option<usize> {
    let sense2 = SENSE_RADIUS * SENSE_RADIUS;
    let mut best = None;
    let mut best_d2 = f32::INFINITY;

    for (i, c) in crumbs.iter().enumerate() {
        if !c.is_edible() { continue; }
        let dx = c.x - x;
        let dy = c.y - y;
        let d2 = dx * dx + dy * dy;
        if d2 < best_d2 && d2 < sense2 {
            best = Some(i);
            best_d2 = d2;
        }
    }

    best
}
