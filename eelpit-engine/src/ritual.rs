// ritual.rs - Feeding ritual
//
// A single counter, bumped once per feed. Tier flags are plain threshold
// checks and can be recomputed any time. Beats fire only when the level
// lands exactly on a tier, so each one happens once.

use rand::Rng;
use serde::Serialize;

pub const WATCHED_LEVEL: u32 = 3;
pub const HUNGRY_LEVEL: u32 = 6;
pub const CHANT_LEVEL: u32 = 9;
pub const AWAKENED_LEVEL: u32 = 12;

const WHISPERS: &[&str] = &[
    "Something counts the crumbs.",
    "Do not count the coils.",
    "The brine remembers your hand.",
    "It has learned the sound of the gate.",
    "Feed it again. Feed it again.",
    "The water is warmer where it watches.",
    "You were always going to open it.",
];

/// Threshold flags, one per tier, as the page's body classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierFlags {
    pub stirring: bool,
    pub watched: bool,
    pub hungry: bool,
    pub chanting: bool,
    pub awakened: bool,
}

impl TierFlags {
    pub fn at(level: u32) -> Self {
        Self {
            stirring: level >= 1,
            watched: level >= WATCHED_LEVEL,
            hungry: level >= HUNGRY_LEVEL,
            chanting: level >= CHANT_LEVEL,
            awakened: level >= AWAKENED_LEVEL,
        }
    }
}

/// One-shot narrative beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Beat {
    Watched,
    Hungry,
    Chanting,
    Eelpocalypse,
}

impl Beat {
    /// The beat that fires when the level becomes exactly `level`.
    pub fn at(level: u32) -> Option<Self> {
        match level {
            WATCHED_LEVEL => Some(Beat::Watched),
            HUNGRY_LEVEL => Some(Beat::Hungry),
            CHANT_LEVEL => Some(Beat::Chanting),
            AWAKENED_LEVEL => Some(Beat::Eelpocalypse),
            _ => None,
        }
    }

    pub fn level(self) -> u32 {
        match self {
            Beat::Watched => WATCHED_LEVEL,
            Beat::Hungry => HUNGRY_LEVEL,
            Beat::Chanting => CHANT_LEVEL,
            Beat::Eelpocalypse => AWAKENED_LEVEL,
        }
    }

    pub fn toast(self) -> &'static str {
        match self {
            Beat::Watched => "Something beneath the brine opens an eye.",
            Beat::Hungry => "The eels remember your hand.",
            Beat::Chanting => "A chant rises from the deep water.",
            Beat::Eelpocalypse => "EELPOCALYPSE. The pit turns as one.",
        }
    }
}

/// Result of one advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub level: u32,
    pub flags: TierFlags,
    pub beat: Option<Beat>,
}

#[derive(Debug, Default, Clone)]
pub struct Ritual {
    level: u32,
}

impl Ritual {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn flags(&self) -> TierFlags {
        TierFlags::at(self.level)
    }

    pub fn is_awakened(&self) -> bool {
        self.level >= AWAKENED_LEVEL
    }

    /// Bump the level by one.
    pub fn advance(&mut self) -> Advance {
        self.level = self.level.saturating_add(1);
        Advance {
            level: self.level,
            flags: self.flags(),
            beat: Beat::at(self.level),
        }
    }
}

pub fn whisper<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    WHISPERS[rng.gen_range(0..WHISPERS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_by_exactly_one() {
        let mut ritual = Ritual::new();
        for expected in 1..=20 {
            let adv = ritual.advance();
            assert_eq!(adv.level, expected);
            assert_eq!(ritual.level(), expected);
        }
    }

    #[test]
    fn each_beat_fires_once() {
        let mut ritual = Ritual::new();
        let beats: Vec<(u32, Beat)> = (0..30)
            .filter_map(|_| {
                let adv = ritual.advance();
                adv.beat.map(|b| (adv.level, b))
            })
            .collect();
        assert_eq!(
            beats,
            vec![
                (3, Beat::Watched),
                (6, Beat::Hungry),
                (9, Beat::Chanting),
                (12, Beat::Eelpocalypse),
            ]
        );
        for (level, beat) in beats {
            assert_eq!(beat.level(), level);
        }
    }

    #[test]
    fn flags_are_thresholds() {
        assert_eq!(TierFlags::at(0), TierFlags::default());
        let f = TierFlags::at(7);
        assert!(f.stirring && f.watched && f.hungry);
        assert!(!f.chanting && !f.awakened);
        assert_eq!(TierFlags::at(12), TierFlags::at(40));
        // Recomputing is idempotent.
        assert_eq!(TierFlags::at(9), TierFlags::at(9));
    }

    #[test]
    fn awakened_from_twelve_on() {
        let mut ritual = Ritual::new();
        for _ in 0..11 {
            ritual.advance();
        }
        assert!(!ritual.is_awakened());
        ritual.advance();
        assert!(ritual.is_awakened());
    }
}
