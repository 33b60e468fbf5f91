// audio.rs - Ambient track selection
//
// Two looping tracks already live on the page: the pit ambience and the
// chant. The director decides which one should be audible and emits the
// play/pause requests to get there. Playback failures (autoplay policy)
// are the page's to swallow; the director never retries.

use serde::Serialize;

use crate::ritual::CHANT_LEVEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Track {
    Ambience,
    Chant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum AudioCommand {
    /// `restart` rewinds to the start before playing.
    Play { track: Track, restart: bool },
    Pause { track: Track },
    Volume { track: Track, value: f32 },
    Rate { track: Track, value: f32 },
}

/// Which track should be audible, if any.
pub fn desired_track(level: u32, quiet: bool, pit_open: bool) -> Option<Track> {
    if quiet || !pit_open {
        None
    } else if level >= CHANT_LEVEL {
        Some(Track::Chant)
    } else {
        Some(Track::Ambience)
    }
}

#[derive(Debug, Default)]
pub struct AudioDirector {
    ambience: bool,
    chant: bool,
    suspended: bool,
}

impl AudioDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playing(&self) -> Option<Track> {
        match (self.ambience, self.chant) {
            (_, true) => Some(Track::Chant),
            (true, false) => Some(Track::Ambience),
            _ => None,
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn slot(&mut self, track: Track) -> &mut bool {
        match track {
            Track::Ambience => &mut self.ambience,
            Track::Chant => &mut self.chant,
        }
    }

    /// Converge on `want`. Only tracks whose state changes get a command,
    /// pauses first.
    pub fn sync(&mut self, want: Option<Track>, restart: bool, out: &mut Vec<AudioCommand>) {
        if self.suspended { return; }

        for track in [Track::Ambience, Track::Chant] {
            let on = self.slot(track);
            if *on && want != Some(track) {
                *on = false;
                out.push(AudioCommand::Pause { track });
            }
        }
        if let Some(track) = want {
            let on = self.slot(track);
            if !*on {
                *on = true;
                out.push(AudioCommand::Play { track, restart });
            }
        }
    }

    /// Page hidden: silence everything until `resume`.
    pub fn suspend(&mut self, out: &mut Vec<AudioCommand>) {
        self.sync(None, false, out);
        self.suspended = true;
    }

    pub fn resume(&mut self, want: Option<Track>, out: &mut Vec<AudioCommand>) {
        self.suspended = false;
        self.sync(want, false, out);
    }
}
