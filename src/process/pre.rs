//! Blocks run before difficulty generation.

mod beats;
mod chord_names;
mod dd_remover;
mod events;
mod phrase_mover;
mod state;

pub use self::{
    beats::{ExtraneousBeatsRemover, RemoveBeatsProcessor},
    chord_names::ChordNameProcessor,
    dd_remover::DdRemover,
    events::{CrowdEventAdder, TimeSignatureEventRemover},
    phrase_mover::PhraseMover,
    state::{ArrangementChecker, StatePreserver},
};
