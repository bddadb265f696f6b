//! Pipelines of fix blocks run before and after difficulty generation.
//!
//! A block implements [`ProcessBlock`]: it mutates the arrangement, logs what it changed into the [`ProcessContext`] and reports warnings there. A [`Pipeline`] runs its blocks strictly in order. A block may be gated by a predicate on the configuration and the arrangement; every gate of a pipeline is evaluated once, before its first block runs.
//!
//! - [`pre_pipeline`] prepares a single level arrangement for the generator and lints it.
//! - [`post_pipeline`] restores what the generator lost and applies the final fixes.

pub mod config;
pub mod context;
pub mod post;
pub mod pre;

use std::io;

use thiserror::Error;

use crate::{generator::GeneratorError, model::Arrangement, xml::LoadError};

pub use self::{
    config::ProcessConfig,
    context::{PreservedState, ProcessContext, ProcessLog},
};

/// A failure which aborts processing of one arrangement.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProcessError {
    /// A block failed unexpectedly.
    #[error("block `{block}` failed: {message}")]
    Block {
        /// Name of the block.
        block: &'static str,
        /// What went wrong.
        message: String,
    },
    /// The external generator failed.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    /// An arrangement could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// A file could not be written or removed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ProcessError {
    /// Creates a block failure.
    #[must_use]
    pub fn block(block: &'static str, message: impl Into<String>) -> Self {
        Self::Block {
            block,
            message: message.into(),
        }
    }
}

/// One step of a pipeline.
pub trait ProcessBlock {
    /// Name of the block for logs and errors.
    fn name(&self) -> &'static str;

    /// Applies the block to `arrangement`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError`] when the arrangement cannot be processed any further.
    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError>;
}

/// Decides whether a block runs for an arrangement.
pub type Gate = fn(&ProcessConfig, &Arrangement) -> bool;

/// An ordered list of blocks.
pub struct Pipeline {
    name: &'static str,
    blocks: Vec<(Box<dyn ProcessBlock>, Option<Gate>)>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            blocks: Vec::new(),
        }
    }

    /// Appends a block which always runs.
    #[must_use]
    pub fn block(mut self, block: impl ProcessBlock + 'static) -> Self {
        self.blocks.push((Box::new(block), None));
        self
    }

    /// Appends a block which runs only when `gate` holds.
    #[must_use]
    pub fn gated(mut self, block: impl ProcessBlock + 'static, gate: Gate) -> Self {
        self.blocks.push((Box::new(block), Some(gate)));
        self
    }

    /// Names of the blocks in order.
    pub fn block_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.blocks.iter().map(|(block, _)| block.name())
    }

    /// Runs the blocks in order.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing block. Later blocks do not run.
    pub fn run(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let config = context.config();
        let enabled: Vec<bool> = self
            .blocks
            .iter()
            .map(|(_, gate)| gate.is_none_or(|gate| gate(config, arrangement)))
            .collect();
        for ((block, _), enabled) in self.blocks.iter().zip(enabled) {
            if !enabled {
                tracing::debug!(pipeline = self.name, block = block.name(), "skipped");
                continue;
            }
            tracing::debug!(pipeline = self.name, block = block.name(), "running");
            block.apply(arrangement, context)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("blocks", &self.block_names().collect::<Vec<_>>())
            .finish()
    }
}

/// The blocks run before the generator.
#[must_use]
pub fn pre_pipeline() -> Pipeline {
    use pre::*;
    Pipeline::new("pre")
        .gated(DdRemover, |config, arrangement| {
            config.remove_dd && arrangement.has_dynamic_difficulty()
        })
        .gated(TimeSignatureEventRemover, |config, _| {
            config.remove_time_signature_events
        })
        .block(ExtraneousBeatsRemover)
        .block(RemoveBeatsProcessor)
        .gated(CrowdEventAdder, |config, _| config.add_crowd_events)
        .gated(ChordNameProcessor, |config, _| config.process_chord_names)
        .block(PhraseMover)
        .gated(ArrangementChecker, |config, _| config.check_arrangement)
        .block(StatePreserver)
}

/// The blocks run after the generator.
#[must_use]
pub fn post_pipeline() -> Pipeline {
    use post::*;
    Pipeline::new("post")
        .block(TemporaryBeatRemover)
        .gated(NoguitarAnchorRestorer, |config, _| config.restore_noguitar)
        .gated(FirstNoguitarSectionRestorer, |config, _| {
            config.restore_noguitar
        })
        .block(UnnecessaryNgPhraseRemover)
        .block(CrowdEventFixer)
        .block(ChordLinkNextFixer)
        .gated(OneLevelPhraseFixer, |config, _| config.fix_one_level_phrases)
        .block(AnchorWidthProcessor)
        .block(SlideOutProcessor)
        .gated(HandShapeAdjuster, |config, _| config.adjust_handshapes)
        .gated(HighDensityRemover, |config, _| config.remove_high_density)
        .block(PhraseLevelComparer)
        .block(ImproverComment)
}
