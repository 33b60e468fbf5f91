// pitsim - Run the eel pit headless
//
// Opens the gate, feeds on a fixed cadence and reports what happened:
//   1. Build a pit from the command line
//   2. Step it at a fixed frame rate, feeding every N frames
//   3. Log every effect the page would have received
//   4. Print a summary (text or JSON)
//
// Usage: cargo run --bin pitsim -- [--frames N] [--feed-every N] [--extreme] [--json]

mod report;

use clap::Parser;
use eelpit_engine::{Effect, PitConfig, PitEvent, PitWorld, Smoothing};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pitsim", about = "Run the eel pit without a page")]
struct Args {
    /// Frames to simulate
    #[arg(long, default_value_t = 1800)]
    frames: u32,

    /// Host frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Feed every N frames (0 never feeds)
    #[arg(long, default_value_t = 120)]
    feed_every: u32,

    /// Turn extreme mode on after opening the gate
    #[arg(long)]
    extreme: bool,

    /// Ease with time-scaled factors instead of per-frame ones
    #[arg(long)]
    time_scaled: bool,

    #[arg(long, default_value_t = 960.0)]
    width: f32,

    #[arg(long, default_value_t = 540.0)]
    height: f32,

    #[arg(long)]
    seed: Option<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = PitConfig {
        width: args.width,
        height: args.height,
        seed: args.seed,
        smoothing: if args.time_scaled { Smoothing::TimeScaled } else { Smoothing::PerFrame },
        ..PitConfig::default()
    };
    let mut world = PitWorld::new(config)?;

    world.send(PitEvent::OpenGate);
    if args.extreme {
        world.send(PitEvent::ToggleExtreme);
    }

    let frame_ms = 1000.0 / args.fps.max(1.0);
    let mut toasts = Vec::new();

    for frame in 0..args.frames {
        if args.feed_every > 0 && frame > 0 && frame % args.feed_every == 0 {
            world.send(PitEvent::Feed);
        }
        world.frame(frame as f64 * frame_ms);

        for effect in world.drain_effects() {
            match effect {
                Effect::Toast { text, .. } => {
                    info!(frame, "{text}");
                    toasts.push(text);
                }
                other => debug!(frame, ?other, "effect"),
            }
        }
    }

    let summary = report::Summary::from_world(&world, toasts);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary.print();
    }
    Ok(())
}
