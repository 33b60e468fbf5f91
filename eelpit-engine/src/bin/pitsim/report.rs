// report.rs - End-of-run summary

use eelpit_engine::PitWorld;
use eelpit_engine::sim::Stats;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub seconds: f64,
    pub ritual_level: u32,
    pub maelstrom: bool,
    pub extreme: bool,
    pub snakes: usize,
    pub crumbs: usize,
    pub eyes: usize,
    pub fps: f32,
    pub stats: Stats,
    pub toasts: Vec<&'static str>,
}

impl Summary {
    pub fn from_world(world: &PitWorld, toasts: Vec<&'static str>) -> Self {
        Self {
            seconds: world.clock(),
            ritual_level: world.ritual_level(),
            maelstrom: world.is_maelstrom(),
            extreme: world.flags().extreme,
            snakes: world.snakes().len(),
            crumbs: world.crumbs().len(),
            eyes: world.eyes().len(),
            fps: world.fps(),
            stats: world.stats(),
            toasts,
        }
    }

    pub fn print(&self) {
        println!("Pit ran {:.1}s ({} frames)", self.seconds, self.stats.frames);
        println!("  ritual level  {}{}", self.ritual_level, if self.maelstrom { " (maelstrom)" } else { "" });
        println!("  snakes        {} ({} spawned)", self.snakes, self.stats.snakes_spawned);
        println!(
            "  crumbs        {} live, {} dropped, {} eaten, {} sunk",
            self.crumbs, self.stats.crumbs_spawned, self.stats.crumbs_eaten, self.stats.crumbs_sunk
        );
        println!("  eyes          {} ({} shed)", self.eyes, self.stats.eyes_shed);
        println!("  toasts        {}", self.toasts.len());
    }
}
