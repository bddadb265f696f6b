//! Difficulty levels and the objects placed per level.

use itertools::Itertools;

use crate::time::{HasTime, time_equal};

use super::{chord::Chord, note::Note};

/// Default width of an [`Anchor`] in frets.
pub const DEFAULT_ANCHOR_WIDTH: f32 = 4.0;

/// The fret-hand base position from a time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    /// Time in seconds.
    pub time: f32,
    /// The lowest fret of the hand position.
    pub fret: i8,
    /// Number of frets covered.
    pub width: f32,
}

impl Anchor {
    /// Creates an anchor of the default width.
    #[must_use]
    pub const fn new(time: f32, fret: i8) -> Self {
        Self {
            time,
            fret,
            width: DEFAULT_ANCHOR_WIDTH,
        }
    }
}

impl HasTime for Anchor {
    fn time(&self) -> f32 {
        self.time
    }
}

/// A duration where the fretting hand holds the shape of a chord template.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandShape {
    /// Index into [`super::Arrangement::chord_templates`].
    pub chord_id: i16,
    /// Start time in seconds.
    pub start_time: f32,
    /// End time in seconds, not before `start_time`.
    pub end_time: f32,
}

impl HandShape {
    /// Creates a new handshape.
    #[must_use]
    pub const fn new(chord_id: i16, start_time: f32, end_time: f32) -> Self {
        Self {
            chord_id,
            start_time,
            end_time,
        }
    }

    /// Length in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.end_time - self.start_time
    }

    /// Whether `time` is in `[start_time, end_time)`, with tolerance at the start.
    #[must_use]
    pub fn contains(&self, time: f32) -> bool {
        (time_equal(time, self.start_time) || time > self.start_time) && time < self.end_time
    }
}

impl HasTime for HandShape {
    fn time(&self) -> f32 {
        self.start_time
    }
}

/// One difficulty level of an arrangement.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    /// Difficulty, 0 is the easiest. The transcription track uses -1.
    pub difficulty: i8,
    /// Notes sorted by time.
    pub notes: Vec<Note>,
    /// Chords sorted by time.
    pub chords: Vec<Chord>,
    /// Anchors sorted by time.
    pub anchors: Vec<Anchor>,
    /// Handshapes sorted by start time.
    pub hand_shapes: Vec<HandShape>,
}

impl Level {
    /// Creates an empty level.
    #[must_use]
    pub fn new(difficulty: i8) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Whether the level has no notes, chords, anchors or handshapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
            && self.chords.is_empty()
            && self.anchors.is_empty()
            && self.hand_shapes.is_empty()
    }

    /// Whether a note or chord starts at `time`.
    #[must_use]
    pub fn has_onset_at(&self, time: f32) -> bool {
        crate::time::contains_time(&self.notes, time)
            || crate::time::contains_time(&self.chords, time)
    }

    /// Distinct start times of notes and chords in order. Notes of a split chord share one onset.
    #[must_use]
    pub fn onset_times(&self) -> Vec<f32> {
        self.notes
            .iter()
            .map(|note| note.time)
            .merge(self.chords.iter().map(|chord| chord.time))
            .dedup_by(|a, b| time_equal(*a, *b))
            .collect()
    }

    /// The anchor in effect at `time`: the last one at or before it.
    #[must_use]
    pub fn active_anchor(&self, time: f32) -> Option<&Anchor> {
        self.anchors
            .iter()
            .take_while(|anchor| anchor.time < time || time_equal(anchor.time, time))
            .last()
    }

    /// Iterates every note of the level including chord notes, paired with whether it belongs to a chord.
    pub fn all_notes(&self) -> impl Iterator<Item = (&Note, bool)> {
        self.notes.iter().map(|note| (note, false)).merge_by(
            self.chords
                .iter()
                .flat_map(|chord| chord.chord_notes.iter().map(|note| (note, true))),
            |(a, _), (b, _)| a.time <= b.time,
        )
    }
}
