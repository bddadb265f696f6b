//! Single notes and bend curves.

use crate::time::HasTime;

use super::flags::{FlagSet, flag_accessors, flags};

flags! {
    /// Boolean properties of a [`Note`].
    pub enum NoteFlag {
        /// The note is linked to the next note on the same string.
        LinkNext = 0,
        /// Accented note.
        Accent = 1,
        /// Hammer-on from the previous note.
        HammerOn = 2,
        /// Natural harmonic.
        Harmonic = 3,
        /// Pinch harmonic.
        HarmonicPinch = 4,
        /// The note is excluded from the game's scoring and warnings.
        Ignore = 5,
        /// Fret-hand mute.
        Mute = 6,
        /// Palm mute.
        PalmMute = 7,
        /// Pull-off to the next note.
        PullOff = 8,
        /// Tremolo picking.
        Tremolo = 9,
        /// Upstroke pick direction.
        PickDirection = 10,
    }
}

/// A point of a bend curve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BendValue {
    /// Time of the point in seconds.
    pub time: f32,
    /// Bend amount in half steps.
    pub step: f32,
}

impl BendValue {
    /// Creates a new bend point.
    #[must_use]
    pub const fn new(time: f32, step: f32) -> Self {
        Self { time, step }
    }
}

impl HasTime for BendValue {
    fn time(&self) -> f32 {
        self.time
    }
}

/// A single note, also used for the notes of a [`super::Chord`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// Start time in seconds.
    pub time: f32,
    /// Sustain length in seconds, zero for none.
    pub sustain: f32,
    /// String number, 0 is the lowest string.
    pub string: i8,
    /// Fret number, 0 is an open string.
    pub fret: i8,
    flags: FlagSet<NoteFlag>,
    /// Bend curve sorted by time. The note is a bend when this is not empty.
    pub bend_values: Vec<BendValue>,
    /// Target fret of a pitched slide, -1 for none.
    pub slide_to: i8,
    /// Target fret of an unpitched slide, -1 for none.
    pub slide_unpitch_to: i8,
    /// Vibrato depth, 0 for none.
    pub vibrato: u8,
    /// Tap depth, 0 for none.
    pub tap: u8,
    /// Fret-hand finger annotation, -1 for none.
    pub left_hand: i8,
    /// Picking-hand finger annotation, -1 for none.
    pub right_hand: i8,
    /// Pluck (pop) annotation, -1 for none.
    pub pluck: i8,
    /// Slap annotation, -1 for none.
    pub slap: i8,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            time: 0.0,
            sustain: 0.0,
            string: 0,
            fret: 0,
            flags: FlagSet::new(),
            bend_values: Vec::new(),
            slide_to: -1,
            slide_unpitch_to: -1,
            vibrato: 0,
            tap: 0,
            left_hand: -1,
            right_hand: -1,
            pluck: -1,
            slap: -1,
        }
    }
}

impl Note {
    /// Creates a note without any technique.
    #[must_use]
    pub fn new(time: f32, string: i8, fret: i8) -> Self {
        Self {
            time,
            string,
            fret,
            ..Self::default()
        }
    }

    /// Sets the sustain, for building notes in place.
    #[must_use]
    pub fn with_sustain(mut self, sustain: f32) -> Self {
        self.sustain = sustain;
        self
    }

    /// Returns the boolean properties of this note.
    #[must_use]
    pub const fn flags(&self) -> FlagSet<NoteFlag> {
        self.flags
    }

    flag_accessors! {
        NoteFlag {
            /// Whether the note is linked to the next note on the same string.
            is_link_next / set_link_next => LinkNext;
            /// Whether the note is accented.
            is_accent / set_accent => Accent;
            /// Whether the note is a hammer-on.
            is_hammer_on / set_hammer_on => HammerOn;
            /// Whether the note is a natural harmonic.
            is_harmonic / set_harmonic => Harmonic;
            /// Whether the note is a pinch harmonic.
            is_harmonic_pinch / set_harmonic_pinch => HarmonicPinch;
            /// Whether the note is ignored.
            is_ignore / set_ignore => Ignore;
            /// Whether the note is fret-hand muted.
            is_mute / set_mute => Mute;
            /// Whether the note is palm muted.
            is_palm_mute / set_palm_mute => PalmMute;
            /// Whether the note is a pull-off.
            is_pull_off / set_pull_off => PullOff;
            /// Whether the note is tremolo picked.
            is_tremolo / set_tremolo => Tremolo;
            /// Whether the note is picked with an upstroke.
            is_pick_direction / set_pick_direction => PickDirection;
        }
    }

    /// Whether the note has a bend curve.
    #[must_use]
    pub fn is_bend(&self) -> bool {
        !self.bend_values.is_empty()
    }

    /// Whether the note has a pitched slide.
    #[must_use]
    pub const fn is_slide(&self) -> bool {
        self.slide_to != -1
    }

    /// Whether the note has an unpitched slide.
    #[must_use]
    pub const fn is_unpitched_slide(&self) -> bool {
        self.slide_unpitch_to != -1
    }

    /// Whether the note is a hammer-on or a pull-off.
    #[must_use]
    pub fn is_hopo(&self) -> bool {
        self.is_hammer_on() || self.is_pull_off()
    }

    /// Whether the note has vibrato.
    #[must_use]
    pub const fn is_vibrato(&self) -> bool {
        self.vibrato != 0
    }

    /// The highest bend step, zero for no bend.
    #[must_use]
    pub fn max_bend(&self) -> f32 {
        self.bend_values
            .iter()
            .map(|bend| bend.step)
            .fold(0.0, f32::max)
    }

    /// Time where the sustain of this note ends.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.time + self.sustain
    }
}

impl HasTime for Note {
    fn time(&self) -> f32 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Accessor = (fn(&Note) -> bool, fn(&mut Note, bool));

    const ACCESSORS: [Accessor; 11] = [
        (Note::is_link_next, Note::set_link_next),
        (Note::is_accent, Note::set_accent),
        (Note::is_hammer_on, Note::set_hammer_on),
        (Note::is_harmonic, Note::set_harmonic),
        (Note::is_harmonic_pinch, Note::set_harmonic_pinch),
        (Note::is_ignore, Note::set_ignore),
        (Note::is_mute, Note::set_mute),
        (Note::is_palm_mute, Note::set_palm_mute),
        (Note::is_pull_off, Note::set_pull_off),
        (Note::is_tremolo, Note::set_tremolo),
        (Note::is_pick_direction, Note::set_pick_direction),
    ];

    #[test]
    fn setters_keep_other_flags() {
        for (index, (get, set)) in ACCESSORS.iter().enumerate() {
            let mut note = Note::new(1.0, 0, 5);
            for (other, (_, set_other)) in ACCESSORS.iter().enumerate() {
                set_other(&mut note, other % 2 == 0);
            }
            let before: Vec<bool> = ACCESSORS.iter().map(|(get, _)| get(&note)).collect();

            set(&mut note, !before[index]);
            for (other, (get_other, _)) in ACCESSORS.iter().enumerate() {
                let expected = if other == index {
                    !before[index]
                } else {
                    before[other]
                };
                assert_eq!(get_other(&note), expected, "setter {index} changed flag {other}");
            }
            assert_eq!(get(&note), !before[index]);
        }
    }
}
