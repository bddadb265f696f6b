//! Prelude module of this crate.
//!
//! Re-exports the types most hosts need, so that `use ddc_improver::prelude::*;` brings them in at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_load_error};

pub use crate::{
    VERSION,
    check::{Issue, IssueKind, check_arrangement},
    command::{CommandError, MoveCommand, SlideOutCommand, parse_time_spec},
    generator::{DifficultyGenerator, GeneratorError, GeneratorOptions, run_generator},
    improver::{ArrangementProcessor, ProcessOutcome, ProcessState},
    message::{Severity, StatusMessage, StatusMessages},
    model::{
        Anchor, Arrangement, BendValue, Chord, ChordTemplate, Ebeat, Event, HandShape, Level,
        Metadata, NewLinkedDiff, Note, Phrase, PhraseIteration, Section, ToneChange, Tones,
    },
    process::{
        Pipeline, ProcessBlock, ProcessConfig, ProcessContext, ProcessError, ProcessLog,
        post_pipeline, pre_pipeline,
    },
    repository::{MemoryRepository, PhraseLevelRepository, PhraseLevels, repository_key},
    time::{TIME_TOLERANCE, time_equal},
    xml::{LoadError, WriteMode},
};
