// splat.rs - Slime splats
//
// A blob of goo where the visitor clicked. Fixed pool, Structure-of-Arrays,
// compacted in place as splats dry up.

use super::MAX_SPLATS;

/// Seconds a splat stays on screen.
pub const SPLAT_SECS: f32 = 0.7;

pub struct Splats {
    // Position
    pub x: [f32; MAX_SPLATS],
    pub y: [f32; MAX_SPLATS],

    // Seconds since the click
    pub age: [f32; MAX_SPLATS],

    // Count
    pub n: usize,
}

impl Splats {
    pub fn new() -> Self {
        Self {
            x: [0.0; MAX_SPLATS],
            y: [0.0; MAX_SPLATS],
            age: [0.0; MAX_SPLATS],
            n: 0,
        }
    }

    /// Drop a splat. A full pool ignores the click.
    pub fn spawn(&mut self, x: f32, y: f32) {
        if self.n >= MAX_SPLATS { return; }

        let i = self.n;
        self.x[i] = x;
        self.y[i] = y;
        self.age[i] = 0.0;
        self.n += 1;
    }

    /// Age splats, drop the dry ones
    pub fn update(&mut self, dt: f32) {
        let mut write = 0;

        for read in 0..self.n {
            let age = self.age[read] + dt;
            if age >= SPLAT_SECS { continue; }

            self.x[write] = self.x[read];
            self.y[write] = self.y[read];
            self.age[write] = age;
            write += 1;
        }

        self.n = write;
    }
}

impl Default for Splats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splats_dry_up_in_order() {
        let mut splats = Splats::new();
        splats.spawn(1.0, 1.0);
        splats.update(0.5);
        splats.spawn(2.0, 2.0);

        splats.update(0.3);
        assert_eq!(splats.n, 1);
        assert_eq!(splats.x[0], 2.0);

        splats.update(0.5);
        assert_eq!(splats.n, 0);
    }

    #[test]
    fn full_pool_ignores_clicks() {
        let mut splats = Splats::new();
        for i in 0..MAX_SPLATS + 5 {
            splats.spawn(i as f32, 0.0);
        }
        assert_eq!(splats.n, MAX_SPLATS);
    }
}
