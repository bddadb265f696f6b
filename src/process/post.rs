//! Blocks run after difficulty generation.

mod beats;
mod chords;
mod comment;
mod events;
mod hand_shapes;
mod noguitar;
mod one_level;
mod phrase_levels;
mod phrases;
mod slide_out;

pub use self::{
    beats::TemporaryBeatRemover,
    chords::{ChordLinkNextFixer, HighDensityRemover},
    comment::ImproverComment,
    events::{AnchorWidthProcessor, CrowdEventFixer},
    hand_shapes::HandShapeAdjuster,
    noguitar::{FirstNoguitarSectionRestorer, NoguitarAnchorRestorer},
    one_level::OneLevelPhraseFixer,
    phrase_levels::PhraseLevelComparer,
    phrases::UnnecessaryNgPhraseRemover,
    slide_out::SlideOutProcessor,
};
