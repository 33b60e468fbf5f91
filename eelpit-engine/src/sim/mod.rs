// sim/ - The eel pit
//
// Entity pools live in their own modules. `PitWorld` owns all of them plus
// the pit's flags, and is the only thing that mutates them: the page and
// the pit's own timers post `PitEvent`s, and `step` applies them in order
// before ticking the pools.

mod crumb;
mod eye;
mod schedule;
mod snake;
mod splat;

pub use crumb::{Crumb, CrumbTick, Crumbs, SINK_DELAY};
pub use eye::{Eye, Eyes, MAX_EYES, max_pupil_offset, target_eye_count};
pub use schedule::Schedule;
pub use snake::{CONSUME_RADIUS, EXCITE_SECS, Orbit, SEGMENT_COUNT, Segment, Snake, SnakeCtx, Snakes};
pub use splat::{SPLAT_SECS, Splats};

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audio::{AudioCommand, AudioDirector, Track, desired_track};
use crate::config::PitConfig;
use crate::error::PitError;
use crate::event::{Effect, PitEvent};
use crate::math::range;
use crate::render::Encoder;
use crate::ritual::{self, Beat, CHANT_LEVEL, Ritual};
use crate::world::Viewport;

// Capacity limits
pub const MAX_SPLATS: usize = 32;

/// Longest physics step, in seconds.
pub const MAX_STEP: f32 = 0.05;

// Feeding
pub const FEED_COUNT: usize = 14;
pub const FEED_COUNT_EXTREME: usize = 24;
const FEED_GAP: f64 = 0.04;
const FEED_X_INSET: (f32, f32) = (10.0, 20.0);
const FEED_Y: (f32, f32) = (-40.0, -8.0);
const RAIN_COUNT: usize = 3;

// Gate
const GATE_SPAWN_GAP: f64 = 0.25;
const PIT_VOLUME: f32 = 0.5;

// Eelpocalypse
pub const MAELSTROM_FLOOR: usize = 12;
const FLASH_INTERVAL: f64 = 0.9;
const WHISPER_INTERVAL: f64 = 7.0;
const WHISPER_MS: u32 = 2600;
const BEAT_MS: u32 = 2400;
const AWAKENED_RATE: f32 = 0.75;
const AWAKENED_VOLUME: f32 = 0.7;
const FLASH_COLORS: [&str; 3] = ["#2a0008", "#001a22", "#0b0b0b"];

// Frame monitor
const FPS_START: f32 = 60.0;
const FPS_BLEND: f32 = 0.1;
// Low FPS sheds eyes at most once per cooldown, not every slow frame.
const SHED_COOLDOWN: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    pub extreme: bool,
    pub quiet: bool,
    pub pit_open: bool,
}

/// State of the terminal orbit formation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maelstrom {
    /// Clock time the pit turned.
    pub since: f64,
}

/// How every snake moves this frame. Exactly one applies to all of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Wandering,
    Orbiting(Maelstrom),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub frames: u64,
    pub snakes_spawned: u64,
    pub crumbs_spawned: u64,
    pub crumbs_eaten: u64,
    pub crumbs_sunk: u64,
    pub eyes_shed: u64,
}

/// Smoothed frame rate, used to shed eyes when the page struggles.
#[derive(Debug, Clone)]
pub struct FrameMonitor {
    fps: f32,
    last_shed: Option<f64>,
}

impl FrameMonitor {
    pub fn new() -> Self {
        Self { fps: FPS_START, last_shed: None }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Fold in one frame of `elapsed` real seconds.
    pub fn observe(&mut self, elapsed: f64) -> f32 {
        if elapsed > 0.0 {
            let instant = (1.0 / elapsed) as f32;
            self.fps += (instant - self.fps) * FPS_BLEND;
        }
        self.fps
    }

    /// True at most once per cooldown while below `threshold`.
    fn should_shed(&mut self, now: f64, threshold: f32) -> bool {
        if self.fps >= threshold { return false; }
        if self.last_shed.is_some_and(|t| now - t < SHED_COOLDOWN) { return false; }
        self.last_shed = Some(now);
        true
    }
}

impl Default for FrameMonitor {
    fn default() -> Self {
        Self::new()
    }
}

pub struct PitWorld {
    config: PitConfig,
    view: Viewport,
    flags: Flags,
    motion: Motion,
    ritual: Ritual,
    audio: AudioDirector,

    // Entities
    snakes: Snakes,
    crumbs: Crumbs,
    eyes: Eyes,
    splats: Splats,

    cursor: (f32, f32),
    monitor: FrameMonitor,
    schedule: Schedule,
    queue: VecDeque<PitEvent>,
    effects: Vec<Effect>,
    flashes: usize,

    // Output
    encoder: Encoder,

    clock: f64,
    last_ts: Option<f64>,
    visible: bool,
    stats: Stats,
    rng: SmallRng,
}

impl PitWorld {
    pub fn new(config: PitConfig) -> Result<Self, PitError> {
        config.validate()?;
        let view = Viewport::new(config.width, config.height);
        Ok(Self {
            rng: SmallRng::seed_from_u64(config.seed()),
            view,
            flags: Flags::default(),
            motion: Motion::Wandering,
            ritual: Ritual::new(),
            audio: AudioDirector::new(),
            snakes: Snakes::new(),
            crumbs: Crumbs::new(),
            eyes: Eyes::new(),
            splats: Splats::new(),
            cursor: view.center(),
            monitor: FrameMonitor::new(),
            schedule: Schedule::new(),
            queue: VecDeque::new(),
            effects: Vec::new(),
            flashes: 0,
            encoder: Encoder::new(),
            clock: 0.0,
            last_ts: None,
            visible: true,
            stats: Stats::default(),
            config,
        })
    }

    // ------------------------------------------------------------------
    // Host surface
    // ------------------------------------------------------------------

    /// Queue an event for the next step.
    pub fn send(&mut self, event: PitEvent) {
        self.queue.push_back(event);
    }

    /// Animation-frame callback. `ts` is the host's timestamp in ms.
    pub fn frame(&mut self, ts: f64) {
        if !self.visible { return; }
        let elapsed = match self.last_ts {
            Some(last) => (ts - last) / 1000.0,
            None => 0.0,
        };
        self.last_ts = Some(ts);
        self.step(elapsed);
    }

    /// Advance by `elapsed` real seconds. Physics sees at most `MAX_STEP`.
    pub fn step(&mut self, elapsed: f64) {
        let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
        let dt = (elapsed as f32).min(MAX_STEP);
        self.clock += elapsed;

        self.schedule.fire(self.clock, &mut self.queue);
        while let Some(event) = self.queue.pop_front() {
            self.apply(event);
        }

        if self.flags.pit_open {
            self.tick_snakes(dt);
            let tick = self.crumbs.update(dt, self.clock, self.view, self.flags.extreme);
            self.stats.crumbs_sunk += tick.sunk as u64;
        }
        // Splats live on the real clock, like sinking crumbs.
        self.splats.update(elapsed as f32);
        self.eyes.track(
            self.cursor,
            dt,
            self.ritual.level(),
            self.flags.extreme,
            self.view,
            &mut self.rng,
        );
        self.watch_frame_rate(elapsed);

        self.encoder.clear();
        self.encoder.encode_snakes(&self.snakes);
        self.encoder.encode_crumbs(&self.crumbs);
        self.encoder.encode_eyes(&self.eyes);
        self.encoder.encode_splats(&self.splats);
        self.stats.frames += 1;
    }

    /// Tab hidden or shown. Hidden pits ignore frames and go silent.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible { return; }
        self.visible = visible;

        let mut cmds = Vec::new();
        if visible {
            self.last_ts = None;
            self.audio.resume(self.wanted_track(), &mut cmds);
        } else {
            self.audio.suspend(&mut cmds);
        }
        self.push_audio(cmds);
    }

    /// Container resized. Entities keep their positions.
    pub fn resize(&mut self, w: f32, h: f32) -> bool {
        self.view.resize(w, h)
    }

    /// Take everything the page needs to act on.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &PitConfig { &self.config }
    pub fn viewport(&self) -> Viewport { self.view }
    pub fn flags(&self) -> Flags { self.flags }
    pub fn motion(&self) -> Motion { self.motion }
    pub fn is_maelstrom(&self) -> bool { matches!(self.motion, Motion::Orbiting(_)) }
    pub fn ritual_level(&self) -> u32 { self.ritual.level() }
    pub fn snakes(&self) -> &Snakes { &self.snakes }
    pub fn crumbs(&self) -> &Crumbs { &self.crumbs }
    pub fn eyes(&self) -> &Eyes { &self.eyes }
    pub fn splats(&self) -> &Splats { &self.splats }
    pub fn cursor(&self) -> (f32, f32) { self.cursor }
    pub fn fps(&self) -> f32 { self.monitor.fps() }
    pub fn clock(&self) -> f64 { self.clock }
    pub fn is_visible(&self) -> bool { self.visible }
    pub fn stats(&self) -> Stats { self.stats }
    pub fn encoder(&self) -> &Encoder { &self.encoder }
    pub fn playing(&self) -> Option<Track> { self.audio.playing() }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    fn apply(&mut self, event: PitEvent) {
        match event {
            PitEvent::OpenGate => {
                self.open_pit();
                self.effects.push(Effect::toast("The pit opens..."));
            }
            PitEvent::Feed => self.feed(),
            PitEvent::ToggleExtreme => self.toggle_extreme(),
            PitEvent::ToggleQuiet => self.toggle_quiet(),
            PitEvent::SyncEyes => self.sync_eyes(),
            PitEvent::PointerMove { x, y } => self.cursor = (x, y),
            PitEvent::Click { x, y } => self.splats.spawn(x, y),
            PitEvent::SpawnSnake { y } => self.spawn_snake(y),
            PitEvent::SpawnCrumb { x, y } => self.spawn_crumb(x, y),
            PitEvent::Trickle => {
                if self.flags.pit_open && self.snakes.len() < self.config.trickle_cap {
                    self.spawn_snake(None);
                }
            }
            PitEvent::Rain => {
                if self.flags.pit_open && self.flags.extreme {
                    for _ in 0..RAIN_COUNT {
                        self.spawn_crumb(None, None);
                    }
                }
            }
            PitEvent::Flash => {
                let color = FLASH_COLORS[self.flashes % FLASH_COLORS.len()];
                self.flashes += 1;
                self.effects.push(Effect::Flash { color });
            }
            PitEvent::Whisper => {
                if self.ritual.level() >= CHANT_LEVEL {
                    let text = ritual::whisper(&mut self.rng);
                    self.effects.push(Effect::Toast { text, ms: WHISPER_MS });
                }
            }
        }
    }

    /// Opening is idempotent; only the first call releases snakes.
    fn open_pit(&mut self) {
        if self.flags.pit_open { return; }
        self.flags.pit_open = true;
        info!(snakes = self.config.initial_snakes, "pit opened");

        self.effects.push(Effect::Theme { name: "pit-open", on: true });
        for i in 0..self.config.initial_snakes {
            self.schedule.after(self.clock, i as f64 * GATE_SPAWN_GAP, PitEvent::SpawnSnake { y: None });
        }
        self.schedule.every(self.clock, self.config.trickle_interval, PitEvent::Trickle);
        self.schedule.every(self.clock, self.config.rain_interval, PitEvent::Rain);

        if !self.flags.quiet {
            self.push_audio(vec![AudioCommand::Volume { track: Track::Ambience, value: PIT_VOLUME }]);
        }
        self.sync_audio(true);
    }

    fn feed(&mut self) {
        self.open_pit();

        let count = if self.flags.extreme { FEED_COUNT_EXTREME } else { FEED_COUNT };
        for i in 0..count {
            let x = range(&mut self.rng, FEED_X_INSET.0, self.view.w - FEED_X_INSET.1);
            let y = range(&mut self.rng, FEED_Y.0, FEED_Y.1);
            self.schedule.after(
                self.clock,
                i as f64 * FEED_GAP,
                PitEvent::SpawnCrumb { x: Some(x), y: Some(y) },
            );
        }
        self.effects.push(Effect::toast("A rain of breadcrumbs descends..."));
        self.advance_ritual();
    }

    fn advance_ritual(&mut self) {
        let adv = self.ritual.advance();
        self.effects.push(Effect::Ritual { level: adv.level });
        self.effects.push(Effect::Tiers { flags: adv.flags });

        if let Some(beat) = adv.beat {
            info!(level = adv.level, ?beat, "ritual beat");
            self.effects.push(Effect::Toast { text: beat.toast(), ms: BEAT_MS });
            if beat == Beat::Eelpocalypse {
                self.awaken();
            }
        }

        self.sync_audio(false);
        self.sync_eyes();
    }

    /// Terminal mode: theme, flashes, whispers, and the maelstrom.
    fn awaken(&mut self) {
        if self.is_maelstrom() { return; }

        self.effects.push(Effect::Theme { name: "eelpocalypse", on: true });
        self.schedule.every(self.clock, FLASH_INTERVAL, PitEvent::Flash);
        self.schedule.every(self.clock, WHISPER_INTERVAL, PitEvent::Whisper);
        self.push_audio(vec![
            AudioCommand::Rate { track: Track::Ambience, value: AWAKENED_RATE },
            AudioCommand::Volume { track: Track::Ambience, value: AWAKENED_VOLUME },
        ]);

        while self.snakes.len() < MAELSTROM_FLOOR {
            self.spawn_snake(None);
        }
        self.snakes.assign_orbits(self.view, self.flags.extreme, &mut self.rng);
        self.motion = Motion::Orbiting(Maelstrom { since: self.clock });
        info!(snakes = self.snakes.len(), "maelstrom entered");
    }

    fn toggle_extreme(&mut self) {
        self.open_pit();
        self.flags.extreme = !self.flags.extreme;
        let extreme = self.flags.extreme;

        self.snakes.reroll_all(extreme, self.config.reduced_motion, &mut self.rng);
        self.effects.push(Effect::Theme { name: "shake", on: extreme });

        if extreme && !self.flags.quiet {
            self.sync_audio(false);
            self.effects.push(Effect::toast("The pit awakens..."));
        } else if !extreme {
            self.effects.push(Effect::toast("The pit rests... for now."));
        }
        self.sync_eyes();
    }

    fn toggle_quiet(&mut self) {
        self.flags.quiet = !self.flags.quiet;
        if self.flags.quiet {
            self.sync_audio(false);
            self.effects.push(Effect::toast("Audio muted. The eels sleep..."));
        } else {
            self.sync_audio(true);
            self.effects.push(Effect::toast("Audio loop resumed. The pit hums again."));
        }
    }

    fn sync_eyes(&mut self) {
        let target = target_eye_count(self.ritual.level(), self.flags.extreme);
        let before = self.eyes.len();
        self.eyes.reconcile(target, self.view, &mut self.rng);
        if before != target {
            debug!(before, target, "eyes reconciled");
        }
    }

    fn spawn_snake(&mut self, y: Option<f32>) {
        let slot = self.snakes.len();
        let center = self.view.center();
        let snake = self.snakes.create(
            y,
            self.view,
            self.flags.extreme,
            self.config.reduced_motion,
            &mut self.rng,
        );
        if matches!(self.motion, Motion::Orbiting(_)) {
            snake.enter_orbit(slot, slot + 1, center, self.flags.extreme, &mut self.rng);
        }
        self.stats.snakes_spawned += 1;
    }

    fn spawn_crumb(&mut self, x: Option<f32>, y: Option<f32>) {
        self.crumbs.create(x, y, self.view, &mut self.rng);
        self.stats.crumbs_spawned += 1;
    }

    // ------------------------------------------------------------------
    // Per-frame work
    // ------------------------------------------------------------------

    fn tick_snakes(&mut self, dt: f32) {
        let mut ctx = SnakeCtx {
            dt,
            time: self.clock,
            view: self.view,
            extreme: self.flags.extreme,
            reduced_motion: self.config.reduced_motion,
            smoothing: self.config.smoothing,
        };
        match self.motion {
            Motion::Wandering => {
                let eaten = self.snakes.wander(&mut self.crumbs, &ctx, &mut self.rng);
                self.stats.crumbs_eaten += eaten as u64;
            }
            Motion::Orbiting(maelstrom) => {
                ctx.time = self.clock - maelstrom.since;
                self.snakes.circle(&ctx);
            }
        }
    }

    fn watch_frame_rate(&mut self, elapsed: f64) {
        self.monitor.observe(elapsed);
        if self.eyes.is_empty() { return; }
        if !self.monitor.should_shed(self.clock, self.config.shed_fps) { return; }

        let shed = self.eyes.shed();
        self.stats.eyes_shed += shed as u64;
        warn!(fps = self.monitor.fps(), shed, left = self.eyes.len(), "frame rate low, closing eyes");
    }

    // ------------------------------------------------------------------
    // Audio
    // ------------------------------------------------------------------

    fn wanted_track(&self) -> Option<Track> {
        desired_track(self.ritual.level(), self.flags.quiet, self.flags.pit_open)
    }

    fn sync_audio(&mut self, restart: bool) {
        let mut cmds = Vec::new();
        self.audio.sync(self.wanted_track(), restart, &mut cmds);
        self.push_audio(cmds);
    }

    fn push_audio(&mut self, cmds: Vec<AudioCommand>) {
        self.effects.extend(cmds.into_iter().map(|command| Effect::Audio { command }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PitWorld {
        PitWorld::new(PitConfig { seed: Some(42), ..PitConfig::default() }).unwrap()
    }

    fn run(world: &mut PitWorld, seconds: f64) {
        let frames = (seconds * 60.0).round() as usize;
        for _ in 0..frames {
            world.step(1.0 / 60.0);
        }
    }

    #[test]
    fn closed_pit_does_not_simulate() {
        let mut w = world();
        run(&mut w, 5.0);
        assert!(!w.flags().pit_open);
        assert!(w.snakes().is_empty());
        assert_eq!(w.stats().frames, 300);
    }

    #[test]
    fn gate_releases_snakes_over_time() {
        let mut w = world();
        w.send(PitEvent::OpenGate);
        w.step(0.0);
        assert!(w.flags().pit_open);
        assert!(w.snakes().len() <= 1);

        run(&mut w, 1.5);
        assert_eq!(w.snakes().len(), 6);

        let effects = w.drain_effects();
        assert!(effects.contains(&Effect::toast("The pit opens...")));
        assert!(effects.contains(&Effect::Audio {
            command: AudioCommand::Play { track: Track::Ambience, restart: true }
        }));
    }

    #[test]
    fn trickle_stops_at_cap() {
        let mut w = PitWorld::new(PitConfig {
            seed: Some(1),
            trickle_cap: 8,
            trickle_interval: 0.5,
            ..PitConfig::default()
        })
        .unwrap();
        w.send(PitEvent::OpenGate);
        run(&mut w, 10.0);
        assert_eq!(w.snakes().len(), 8);
    }

    #[test]
    fn feed_advances_ritual_once_per_action() {
        let mut w = world();
        for expected in 1..=4 {
            w.send(PitEvent::Feed);
            w.step(0.0);
            assert_eq!(w.ritual_level(), expected);
        }
    }

    #[test]
    fn frame_derives_elapsed_from_timestamps() {
        let mut w = world();
        w.frame(1000.0);
        assert_eq!(w.clock(), 0.0);
        w.frame(1016.0);
        assert!((w.clock() - 0.016).abs() < 1e-9);
    }

    #[test]
    fn hidden_pit_ignores_frames_and_pauses_audio() {
        let mut w = world();
        w.send(PitEvent::OpenGate);
        w.frame(0.0);
        w.drain_effects();

        w.set_visible(false);
        assert_eq!(
            w.drain_effects(),
            vec![Effect::Audio { command: AudioCommand::Pause { track: Track::Ambience } }]
        );
        let frames = w.stats().frames;
        w.frame(60_000.0);
        assert_eq!(w.stats().frames, frames);

        w.set_visible(true);
        assert_eq!(
            w.drain_effects(),
            vec![Effect::Audio {
                command: AudioCommand::Play { track: Track::Ambience, restart: false }
            }]
        );
        // First frame after showing has no elapsed time.
        let clock = w.clock();
        w.frame(90_000.0);
        assert_eq!(w.clock(), clock);
    }

    #[test]
    fn monitor_sheds_when_slow() {
        let mut m = FrameMonitor::new();
        for _ in 0..50 {
            m.observe(0.1);
        }
        assert!(m.fps() < 30.0);
        assert!(m.should_shed(5.0, 30.0));
        assert!(!m.should_shed(5.5, 30.0));
        assert!(m.should_shed(6.0, 30.0));

        let mut fast = FrameMonitor::new();
        fast.observe(1.0 / 60.0);
        assert!(!fast.should_shed(0.0, 30.0));
    }

    #[test]
    fn clicks_leave_splats() {
        let mut w = world();
        w.send(PitEvent::Click { x: 12.0, y: 34.0 });
        w.step(0.0);
        assert_eq!(w.splats().n, 1);
        assert_eq!(w.encoder().splats(), &[12.0, 34.0, 1.0]);
        run(&mut w, 1.0);
        assert_eq!(w.splats().n, 0);
    }

    #[test]
    fn splats_dry_on_real_time_when_frames_are_slow() {
        let mut w = world();
        w.send(PitEvent::Click { x: 5.0, y: 5.0 });
        w.step(0.0);
        for _ in 0..6 {
            w.step(0.1);
        }
        assert_eq!(w.splats().n, 1);
        for _ in 0..4 {
            w.step(0.1);
        }
        assert_eq!(w.splats().n, 0);
    }

    #[test]
    fn muted_gate_leaves_ambience_volume_alone() {
        let mut w = world();
        w.send(PitEvent::ToggleQuiet);
        w.send(PitEvent::OpenGate);
        w.step(0.0);
        assert!(w.flags().pit_open);
        let touched = w.drain_effects().into_iter().any(|e| {
            matches!(e, Effect::Audio { command: AudioCommand::Volume { .. } | AudioCommand::Play { .. } })
        });
        assert!(!touched);
        assert_eq!(w.playing(), None);
    }
}
