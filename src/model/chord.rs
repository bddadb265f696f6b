//! Chords and chord templates.

use crate::time::HasTime;

use super::{
    flags::{FlagSet, flag_accessors, flags},
    note::Note,
};

flags! {
    /// Boolean properties of a [`Chord`].
    pub enum ChordFlag {
        /// The chord is linked to the following notes.
        LinkNext = 0,
        /// Accented chord.
        Accent = 1,
        /// Fret-hand muted chord.
        FretHandMute = 2,
        /// Repeated chord shown without its notes.
        HighDensity = 3,
        /// The chord is excluded from the game's scoring and warnings.
        Ignore = 4,
        /// Palm muted chord.
        PalmMute = 5,
        /// Hammer-on or pull-off chord.
        Hopo = 6,
    }
}

/// Strumming direction of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strum {
    /// Downstroke, the default.
    #[default]
    Down,
    /// Upstroke.
    Up,
}

impl Strum {
    /// The attribute value in the file format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Up => "up",
        }
    }
}

/// Several notes played together, shaped by a [`ChordTemplate`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chord {
    /// Start time in seconds.
    pub time: f32,
    /// Index into [`super::Arrangement::chord_templates`].
    pub chord_id: i16,
    flags: FlagSet<ChordFlag>,
    /// Strumming direction.
    pub strum: Strum,
    /// Notes of the chord, one per used string. Empty for high density chords without techniques.
    pub chord_notes: Vec<Note>,
}

impl Chord {
    /// Creates a chord without notes.
    #[must_use]
    pub fn new(time: f32, chord_id: i16) -> Self {
        Self {
            time,
            chord_id,
            ..Self::default()
        }
    }

    /// Returns the boolean properties of this chord.
    #[must_use]
    pub const fn flags(&self) -> FlagSet<ChordFlag> {
        self.flags
    }

    flag_accessors! {
        ChordFlag {
            /// Whether the chord is linked to the following notes.
            is_link_next / set_link_next => LinkNext;
            /// Whether the chord is accented.
            is_accent / set_accent => Accent;
            /// Whether the chord is fret-hand muted.
            is_fret_hand_mute / set_fret_hand_mute => FretHandMute;
            /// Whether the chord is a high density repeat.
            is_high_density / set_high_density => HighDensity;
            /// Whether the chord is ignored.
            is_ignore / set_ignore => Ignore;
            /// Whether the chord is palm muted.
            is_palm_mute / set_palm_mute => PalmMute;
            /// Whether the chord is a hammer-on or pull-off.
            is_hopo / set_hopo => Hopo;
        }
    }

    /// The longest sustain of the chord notes.
    #[must_use]
    pub fn sustain(&self) -> f32 {
        self.chord_notes
            .iter()
            .map(|note| note.sustain)
            .fold(0.0, f32::max)
    }

    /// Time where the longest chord note ends.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.time + self.sustain()
    }

    /// Returns the chord note on `string`.
    #[must_use]
    pub fn note_on(&self, string: i8) -> Option<&Note> {
        self.chord_notes.iter().find(|note| note.string == string)
    }
}

impl HasTime for Chord {
    fn time(&self) -> f32 {
        self.time
    }
}

/// Number of strings of a template.
pub const STRING_COUNT: usize = 6;

/// The shape of a chord: frets and fingers per string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChordTemplate {
    /// Internal name, may carry author commands such as `OF3` or `CONV`.
    pub name: String,
    /// Name displayed in the game.
    pub display_name: String,
    /// Fret per string, -1 for an unused string.
    pub frets: [i8; STRING_COUNT],
    /// Finger per string, -1 for none, 0 for the thumb and 1 for the index finger.
    pub fingers: [i8; STRING_COUNT],
}

impl Default for ChordTemplate {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_name: String::new(),
            frets: [-1; STRING_COUNT],
            fingers: [-1; STRING_COUNT],
        }
    }
}

impl ChordTemplate {
    /// Creates a named template from the frets, without finger annotations.
    #[must_use]
    pub fn new(name: impl Into<String>, frets: [i8; STRING_COUNT]) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            frets,
            ..Self::default()
        }
    }

    /// Whether the template uses the index finger on any string.
    #[must_use]
    pub fn uses_first_finger(&self) -> bool {
        self.fingers.contains(&1)
    }

    /// Iterates `(string, fret, finger)` of the strings used by this template.
    pub fn used_strings(&self) -> impl Iterator<Item = (usize, i8, i8)> + '_ {
        self.frets
            .iter()
            .zip(self.fingers.iter())
            .enumerate()
            .filter(|(_, (fret, _))| **fret != -1)
            .map(|(string, (fret, finger))| (string, *fret, *finger))
    }
}
