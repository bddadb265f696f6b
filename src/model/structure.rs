//! Sections, beats, events and tones: the song structure around the notes.

use crate::time::HasTime;

/// Name of sections without any guitar part.
pub const NOGUITAR: &str = "noguitar";

/// Measure value of a beat which does not start a measure.
pub const WEAK_BEAT: i32 = -1;

/// Measure value marking beats inserted temporarily while processing. They are removed before saving.
pub const TEMPORARY_BEAT: i32 = 30_000;

/// A named part of the song, such as a verse or a chorus.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    /// Name of the section.
    pub name: String,
    /// Occurrence number of this name, starts with 1.
    pub number: u32,
    /// Start time in seconds.
    pub time: f32,
}

impl Section {
    /// Creates a new section.
    #[must_use]
    pub fn new(name: impl Into<String>, number: u32, time: f32) -> Self {
        Self {
            name: name.into(),
            number,
            time,
        }
    }

    /// Whether this is a section without guitar.
    #[must_use]
    pub fn is_noguitar(&self) -> bool {
        self.name == NOGUITAR
    }
}

impl HasTime for Section {
    fn time(&self) -> f32 {
        self.time
    }
}

/// A beat of the beat grid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ebeat {
    /// Time in seconds.
    pub time: f32,
    /// Measure number of a strong beat, [`WEAK_BEAT`] otherwise.
    pub measure: i32,
}

impl Ebeat {
    /// Creates a new beat.
    #[must_use]
    pub const fn new(time: f32, measure: i32) -> Self {
        Self { time, measure }
    }

    /// Whether this beat was inserted temporarily.
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        self.measure == TEMPORARY_BEAT
    }
}

impl HasTime for Ebeat {
    fn time(&self) -> f32 {
        self.time
    }
}

/// Codes of the crowd events.
pub mod crowd {
    /// Start of the intro applause.
    pub const INTRO_APPLAUSE: &str = "E3";
    /// End of the intro applause.
    pub const INTRO_APPLAUSE_END: &str = "E13";
    /// Applause at the end of the song.
    pub const OUTRO_APPLAUSE: &str = "D3";
    /// Crowd tempo changes.
    pub const TEMPO: [&str; 3] = ["e0", "e1", "e2"];

    /// Whether `code` is any crowd event.
    #[must_use]
    pub fn is_crowd_event(code: &str) -> bool {
        code == INTRO_APPLAUSE
            || code == INTRO_APPLAUSE_END
            || code == OUTRO_APPLAUSE
            || TEMPO.contains(&code)
    }
}

/// A free-form event such as a crowd event or an author command.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Event code.
    pub code: String,
    /// Time in seconds.
    pub time: f32,
}

impl Event {
    /// Creates a new event.
    #[must_use]
    pub fn new(code: impl Into<String>, time: f32) -> Self {
        Self {
            code: code.into(),
            time,
        }
    }
}

impl HasTime for Event {
    fn time(&self) -> f32 {
        self.time
    }
}

/// A switch to another tone.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToneChange {
    /// Time in seconds.
    pub time: f32,
    /// Index of the tone slot, 0 is the base tone.
    pub id: u8,
    /// Name of the tone switched to.
    pub name: String,
}

impl HasTime for ToneChange {
    fn time(&self) -> f32 {
        self.time
    }
}

/// The tone slots and the tone changes of an arrangement.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tones {
    /// The tone at the start of the song.
    pub base: Option<String>,
    /// Alternate tones A to D.
    pub alternates: [Option<String>; 4],
    /// Tone changes sorted by time.
    pub changes: Vec<ToneChange>,
}
