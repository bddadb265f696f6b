//! The object graph of an arrangement.
//!
//! `chord_id` and `phrase_id` are plain indices into [`Arrangement::chord_templates`] and [`Arrangement::phrases`]. Removing a template or a phrase must go through [`Arrangement::remove_chord_template`] or [`Arrangement::remove_phrase`], which renumber every index above the removed one.
//!
//! Time-bearing collections are kept sorted by time. Decoding sorts them, and every edit inserts with [`crate::time::insert_by_time`].

pub mod chord;
pub mod comment;
pub mod flags;
pub mod level;
pub mod note;
pub mod phrase;
pub mod structure;

use std::collections::HashMap;

pub use self::{
    chord::{Chord, ChordFlag, ChordTemplate, STRING_COUNT, Strum},
    comment::ToolComment,
    flags::{Flag, FlagSet},
    level::{Anchor, DEFAULT_ANCHOR_WIDTH, HandShape, Level},
    note::{BendValue, Note, NoteFlag},
    phrase::{HeroLevels, NewLinkedDiff, Phrase, PhraseFlag, PhraseIteration},
    structure::{
        Ebeat, Event, NOGUITAR, Section, TEMPORARY_BEAT, ToneChange, Tones, WEAK_BEAT, crowd,
    },
};

/// Song information stored before the arrangement content.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// Song title.
    pub title: String,
    /// Arrangement name such as `Lead` or `Bass`.
    pub arrangement: String,
    /// Part number.
    pub part: i32,
    /// Offset in seconds.
    pub offset: f32,
    /// Tuning offset in cents.
    pub cent_offset: f32,
    /// Length of the audio in seconds.
    pub song_length: f32,
    /// Title used for sorting.
    pub song_name_sort: String,
    /// Time of the first beat in seconds.
    pub start_beat: f32,
    /// Average tempo in beats per minute.
    pub average_tempo: f32,
    /// Offset in half steps per string.
    pub tuning: [i16; STRING_COUNT],
    /// Capo fret, 0 for none.
    pub capo: i8,
    /// Artist name.
    pub artist_name: String,
    /// Artist name used for sorting.
    pub artist_name_sort: String,
    /// Album name.
    pub album_name: String,
    /// Album name used for sorting.
    pub album_name_sort: String,
    /// Album release year, kept as text.
    pub album_year: String,
    /// Album art reference.
    pub album_art: String,
    /// Crowd speed.
    pub crowd_speed: i32,
    /// Arrangement properties as ordered `(name, value)` attributes.
    pub arrangement_properties: Vec<(String, String)>,
    /// Last conversion date as written by the authoring tool.
    pub last_conversion_date_time: String,
}

/// The time window of one phrase iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhraseWindow {
    /// Index into [`Arrangement::phrase_iterations`].
    pub iteration: usize,
    /// Index into [`Arrangement::phrases`].
    pub phrase_id: u32,
    /// Inclusive start in seconds.
    pub start: f32,
    /// Exclusive end in seconds.
    pub end: f32,
}

impl PhraseWindow {
    /// Whether `time` is in `[start, end)`.
    #[must_use]
    pub fn contains(&self, time: f32) -> bool {
        (crate::time::time_equal(time, self.start) || time > self.start)
            && time < self.end
            && !crate::time::time_equal(time, self.end)
    }
}

/// One instrument track of a song.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arrangement {
    /// Version attribute of the root element.
    pub version: String,
    /// Comments at the top of the root element, verbatim.
    pub comments: Vec<String>,
    /// Song information.
    pub metadata: Metadata,
    /// Tone slots and changes.
    pub tones: Tones,
    /// Phrase definitions.
    pub phrases: Vec<Phrase>,
    /// Phrase placements sorted by time. The last one is conventionally `END`.
    pub phrase_iterations: Vec<PhraseIteration>,
    /// Linked difficulty groups.
    pub new_linked_diffs: Vec<NewLinkedDiff>,
    /// Chord shapes.
    pub chord_templates: Vec<ChordTemplate>,
    /// Beat grid sorted by time.
    pub ebeats: Vec<Ebeat>,
    /// Sections sorted by time.
    pub sections: Vec<Section>,
    /// Events sorted by time.
    pub events: Vec<Event>,
    /// The full difficulty track, if present.
    pub transcription_track: Option<Level>,
    /// Difficulty levels, index equals difficulty.
    pub levels: Vec<Level>,
}

impl Arrangement {
    /// Classifies the leading comments.
    pub fn tool_comments(&self) -> impl Iterator<Item = ToolComment> + '_ {
        self.comments
            .iter()
            .map(|comment| ToolComment::classify(comment))
    }

    /// Whether the arrangement has more than one difficulty level.
    #[must_use]
    pub fn has_dynamic_difficulty(&self) -> bool {
        self.levels.len() > 1
    }

    /// Whether the comments show that this file already went through difficulty generation.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.tool_comments()
            .any(ToolComment::implies_generated_levels)
    }

    /// The phrase used by `iteration`.
    #[must_use]
    pub fn phrase_of(&self, iteration: &PhraseIteration) -> Option<&Phrase> {
        self.phrases.get(iteration.phrase_id as usize)
    }

    /// Windows of every phrase iteration except the last, which conventionally has no content.
    #[must_use]
    pub fn phrase_windows(&self) -> Vec<PhraseWindow> {
        self.phrase_iterations
            .iter()
            .zip(self.phrase_iterations.iter().skip(1))
            .enumerate()
            .map(|(iteration, (current, next))| PhraseWindow {
                iteration,
                phrase_id: current.phrase_id,
                start: current.time,
                end: next.time,
            })
            .collect()
    }

    /// Iterates the levels and the transcription track mutably.
    pub fn all_levels_mut(&mut self) -> impl Iterator<Item = &mut Level> {
        self.levels.iter_mut().chain(self.transcription_track.as_mut())
    }

    /// Removes the phrase at `index` and renumbers every phrase id above it.
    ///
    /// The phrase should not be referenced by any phrase iteration. Linked difficulties drop the removed id.
    pub fn remove_phrase(&mut self, index: usize) -> Option<Phrase> {
        if index >= self.phrases.len() {
            return None;
        }
        let removed = self.phrases.remove(index);
        let index = index as u32;
        for iteration in &mut self.phrase_iterations {
            if iteration.phrase_id > index {
                iteration.phrase_id -= 1;
            }
        }
        for linked in &mut self.new_linked_diffs {
            linked.phrase_ids.retain(|&id| id != index);
            for id in &mut linked.phrase_ids {
                if *id > index {
                    *id -= 1;
                }
            }
        }
        Some(removed)
    }

    /// Removes the chord template at `index` and renumbers every chord id above it.
    ///
    /// The template should not be referenced by any chord or handshape.
    pub fn remove_chord_template(&mut self, index: usize) -> Option<ChordTemplate> {
        if index >= self.chord_templates.len() {
            return None;
        }
        let removed = self.chord_templates.remove(index);
        let index = index as i16;
        for level in self.all_levels_mut() {
            for chord in &mut level.chords {
                if chord.chord_id > index {
                    chord.chord_id -= 1;
                }
            }
            for hand_shape in &mut level.hand_shapes {
                if hand_shape.chord_id > index {
                    hand_shape.chord_id -= 1;
                }
            }
        }
        Some(removed)
    }

    /// Returns the index of a template equal to `template`, adding it if there is none.
    pub fn find_or_add_chord_template(&mut self, template: ChordTemplate) -> i16 {
        if let Some(index) = self.chord_templates.iter().position(|t| *t == template) {
            return index as i16;
        }
        self.chord_templates.push(template);
        (self.chord_templates.len() - 1) as i16
    }

    /// Renumbers the sections so that each name counts its occurrences from 1 in time order.
    pub fn renumber_sections(&mut self) {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for section in &mut self.sections {
            let count = counts.entry(section.name.clone()).or_default();
            *count += 1;
            section.number = *count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_phrase_renumbers() {
        let mut arrangement = Arrangement {
            phrases: vec![
                Phrase::new("COUNT", 0),
                Phrase::new("NG", 0),
                Phrase::new("riff", 3),
                Phrase::new("END", 0),
            ],
            phrase_iterations: vec![
                PhraseIteration::new(0.0, 0),
                PhraseIteration::new(1.0, 2),
                PhraseIteration::new(9.0, 3),
            ],
            new_linked_diffs: vec![NewLinkedDiff {
                level_break: -1,
                ratio: "1.000".into(),
                phrase_ids: vec![1, 2],
            }],
            ..Arrangement::default()
        };
        let removed = arrangement.remove_phrase(1);
        assert_eq!(removed.map(|p| p.name), Some("NG".to_string()));
        let ids: Vec<_> = arrangement
            .phrase_iterations
            .iter()
            .map(|pi| pi.phrase_id)
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(arrangement.new_linked_diffs[0].phrase_ids, vec![1]);
    }

    #[test]
    fn remove_template_renumbers() {
        let mut level = Level::new(0);
        level.chords.push(Chord::new(1.0, 2));
        level.hand_shapes.push(HandShape::new(0, 1.0, 2.0));
        level.hand_shapes.push(HandShape::new(2, 3.0, 4.0));
        let mut arrangement = Arrangement {
            chord_templates: vec![
                ChordTemplate::default(),
                ChordTemplate::default(),
                ChordTemplate::default(),
            ],
            levels: vec![level],
            ..Arrangement::default()
        };
        arrangement.remove_chord_template(1);
        let level = &arrangement.levels[0];
        assert_eq!(level.chords[0].chord_id, 1);
        assert_eq!(level.hand_shapes[0].chord_id, 0);
        assert_eq!(level.hand_shapes[1].chord_id, 1);
    }

    #[test]
    fn sections_count_per_name() {
        let mut arrangement = Arrangement {
            sections: vec![
                Section::new(NOGUITAR, 4, 0.0),
                Section::new("verse", 1, 2.0),
                Section::new(NOGUITAR, 1, 5.0),
                Section::new("verse", 9, 7.0),
            ],
            ..Arrangement::default()
        };
        arrangement.renumber_sections();
        let numbers: Vec<_> = arrangement.sections.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 1, 2, 2]);
    }
}
