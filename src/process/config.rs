//! Options of the pipelines.

use crate::{generator::GeneratorOptions, xml::WriteMode};

/// Options of one processing run, built once and shared by every block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ProcessConfig {
    /// Merge existing difficulty levels into one before generating new ones.
    pub remove_dd: bool,
    /// When removing levels, rebuild the phrases from the sections.
    pub regenerate_phrases_from_sections: bool,
    /// Add the intro and outro crowd events when there are none.
    pub add_crowd_events: bool,
    /// Apply the one-fret command and normalize chord names.
    pub process_chord_names: bool,
    /// Remove `TS:` time signature events.
    pub remove_time_signature_events: bool,
    /// Lint the arrangement before generating.
    pub check_arrangement: bool,
    /// Restore the anchors and the first section the generator drops in noguitar sections.
    pub restore_noguitar: bool,
    /// Give phrases with only one level a second level.
    pub fix_one_level_phrases: bool,
    /// Shorten handshapes which end too close to the next one.
    pub adjust_handshapes: bool,
    /// Clear the high density status of chords.
    pub remove_high_density: bool,
    /// Write the output without default valued attributes.
    pub abridged_output: bool,
    /// Options passed to the generator.
    pub generator: GeneratorOptions,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            remove_dd: true,
            regenerate_phrases_from_sections: false,
            add_crowd_events: true,
            process_chord_names: true,
            remove_time_signature_events: true,
            check_arrangement: true,
            restore_noguitar: true,
            fix_one_level_phrases: true,
            adjust_handshapes: true,
            remove_high_density: false,
            abridged_output: false,
            generator: GeneratorOptions::default(),
        }
    }
}

macro_rules! with_toggles {
    ($($(#[$doc:meta])* $with:ident => $field:ident;)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $with(mut self, value: bool) -> Self {
                self.$field = value;
                self
            }
        )*
    };
}

impl ProcessConfig {
    with_toggles! {
        /// Sets [`Self::remove_dd`].
        with_remove_dd => remove_dd;
        /// Sets [`Self::regenerate_phrases_from_sections`].
        with_regenerate_phrases_from_sections => regenerate_phrases_from_sections;
        /// Sets [`Self::add_crowd_events`].
        with_add_crowd_events => add_crowd_events;
        /// Sets [`Self::process_chord_names`].
        with_process_chord_names => process_chord_names;
        /// Sets [`Self::remove_time_signature_events`].
        with_remove_time_signature_events => remove_time_signature_events;
        /// Sets [`Self::check_arrangement`].
        with_check_arrangement => check_arrangement;
        /// Sets [`Self::restore_noguitar`].
        with_restore_noguitar => restore_noguitar;
        /// Sets [`Self::fix_one_level_phrases`].
        with_fix_one_level_phrases => fix_one_level_phrases;
        /// Sets [`Self::adjust_handshapes`].
        with_adjust_handshapes => adjust_handshapes;
        /// Sets [`Self::remove_high_density`].
        with_remove_high_density => remove_high_density;
        /// Sets [`Self::abridged_output`].
        with_abridged_output => abridged_output;
    }

    /// Sets the generator options.
    #[must_use]
    pub fn with_generator(mut self, generator: GeneratorOptions) -> Self {
        self.generator = generator;
        self
    }

    /// How arrangements are written.
    #[must_use]
    pub const fn write_mode(&self) -> WriteMode {
        if self.abridged_output {
            WriteMode::Abridged
        } else {
            WriteMode::Full
        }
    }
}
