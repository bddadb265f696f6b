//! Phrases, their placements and linked difficulties.

use crate::time::HasTime;

use super::flags::{FlagSet, flag_accessors, flags};

flags! {
    /// Boolean properties of a [`Phrase`].
    pub enum PhraseFlag {
        /// Difficulty disparity.
        Disparity = 0,
        /// Ignored phrase.
        Ignore = 1,
        /// Solo phrase.
        Solo = 2,
    }
}

/// A named, reusable difficulty unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phrase {
    /// Name of the phrase. May carry a move command such as `moveR2`.
    pub name: String,
    /// Index of the hardest level having content for this phrase.
    pub max_difficulty: u8,
    flags: FlagSet<PhraseFlag>,
}

impl Phrase {
    /// Creates a phrase without flags.
    #[must_use]
    pub fn new(name: impl Into<String>, max_difficulty: u8) -> Self {
        Self {
            name: name.into(),
            max_difficulty,
            flags: FlagSet::new(),
        }
    }

    /// Returns the boolean properties of this phrase.
    #[must_use]
    pub const fn flags(&self) -> FlagSet<PhraseFlag> {
        self.flags
    }

    flag_accessors! {
        PhraseFlag {
            /// Whether the phrase has difficulty disparity.
            is_disparity / set_disparity => Disparity;
            /// Whether the phrase is ignored.
            is_ignore / set_ignore => Ignore;
            /// Whether the phrase is a solo.
            is_solo / set_solo => Solo;
        }
    }
}

/// Recommended difficulties for the easy, medium and hard presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroLevels {
    /// Difficulty for the easy preset.
    pub easy: u8,
    /// Difficulty for the medium preset.
    pub medium: u8,
    /// Difficulty for the hard preset.
    pub hard: u8,
}

/// A placement of a [`Phrase`] in time.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhraseIteration {
    /// Start time in seconds.
    pub time: f32,
    /// Index into [`super::Arrangement::phrases`].
    pub phrase_id: u32,
    /// Variation label, usually empty.
    pub variation: String,
    /// Recommended difficulties.
    pub hero_levels: Option<HeroLevels>,
}

impl PhraseIteration {
    /// Creates an iteration without hero levels.
    #[must_use]
    pub fn new(time: f32, phrase_id: u32) -> Self {
        Self {
            time,
            phrase_id,
            ..Self::default()
        }
    }
}

impl HasTime for PhraseIteration {
    fn time(&self) -> f32 {
        self.time
    }
}

/// A group of phrases sharing their difficulty levels.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewLinkedDiff {
    /// The level from which the phrases stop being linked, -1 for all levels.
    pub level_break: i8,
    /// Ratio attribute, kept verbatim.
    pub ratio: String,
    /// Indices into [`super::Arrangement::phrases`].
    pub phrase_ids: Vec<u32>,
}
