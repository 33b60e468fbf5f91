// event.rs - What flows in and out of the pit
//
// Inbound: `PitEvent`s from the page (clicks, keys, pointer) and from the
// pit's own timers. Everything is queued and applied by the frame driver.
//
// Outbound: `Effect`s the page has to act on that are not poses: toasts,
// audio requests, theme classes, flashes.

use serde::{Deserialize, Serialize};

use crate::audio::AudioCommand;
use crate::ritual::TierFlags;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PitEvent {
    // Visitor actions
    OpenGate,
    Feed,
    ToggleExtreme,
    ToggleQuiet,
    SyncEyes,
    PointerMove { x: f32, y: f32 },
    Click { x: f32, y: f32 },

    // Posted by timers
    SpawnSnake { y: Option<f32> },
    SpawnCrumb { x: Option<f32>, y: Option<f32> },
    Trickle,
    Rain,
    Flash,
    Whisper,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Effect {
    Toast { text: &'static str, ms: u32 },
    Audio { command: AudioCommand },
    Theme { name: &'static str, on: bool },
    Tiers { flags: TierFlags },
    Flash { color: &'static str },
    Ritual { level: u32 },
}

impl Effect {
    pub const TOAST_MS: u32 = 1600;

    pub fn toast(text: &'static str) -> Self {
        Effect::Toast { text, ms: Self::TOAST_MS }
    }
}
