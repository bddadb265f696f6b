//! Drives one arrangement through loading, the pipelines, the generator and saving.
//!
//! ```text
//! Loaded -> PreProcessing -> GeneratingDifficulty -> PostProcessing -> Completed
//!    \            \                  \                     \
//!     +------------+------------------+---------------------+--> Error
//! ```
//!
//! A failure moves the processor into [`ProcessState::Error`] and the remaining phases are skipped. Temporary files are removed in every case. Arrangements are independent of each other, so a host may run many processors in parallel.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    generator::{DifficultyGenerator, GeneratorError, run_generator},
    message::{Severity, StatusMessage, StatusMessages},
    model::Arrangement,
    process::{
        ProcessConfig, ProcessContext, ProcessError, ProcessLog, post_pipeline, pre_pipeline,
    },
    repository::{PhraseLevelRepository, repository_key},
    xml::{self, LoadError, WriteMode},
};

/// Where a processor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcessState {
    /// The arrangement is loaded.
    Loaded,
    /// The pre pipeline ran.
    PreProcessing,
    /// The generator ran.
    GeneratingDifficulty,
    /// The post pipeline ran.
    PostProcessing,
    /// The result is saved.
    Completed,
    /// A phase failed.
    Error,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loaded => "loaded",
            Self::PreProcessing => "pre-processing",
            Self::GeneratingDifficulty => "generating difficulty",
            Self::PostProcessing => "post-processing",
            Self::Completed => "completed",
            Self::Error => "error",
        })
    }
}

/// The result of [`ArrangementProcessor::run`].
#[derive(Debug)]
pub struct ProcessOutcome {
    /// The final state, [`ProcessState::Completed`] or [`ProcessState::Error`].
    pub state: ProcessState,
    /// Messages for the user.
    pub messages: StatusMessages,
    /// Log of the changes.
    pub log: ProcessLog,
    /// The error which stopped processing.
    pub error: Option<ProcessError>,
}

impl ProcessOutcome {
    /// Whether every phase succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == ProcessState::Completed
    }

    /// The first message, which explains a failure.
    #[must_use]
    pub fn first_message(&self) -> Option<&StatusMessage> {
        self.messages.first()
    }
}

/// A file next to the input which is removed when dropped.
struct TemporaryFile(PathBuf);

impl TemporaryFile {
    fn next_to(path: &Path) -> Self {
        let name = path
            .file_stem()
            .map_or_else(|| "arrangement".into(), |stem| stem.to_string_lossy());
        Self(path.with_file_name(format!("{name}.ddc-tmp.xml")))
    }
}

impl Drop for TemporaryFile {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.0)
            && error.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %self.0.display(), %error, "failed to remove a temporary file");
        }
    }
}

/// Checks the references the generator is known to break.
fn validate_generated(arrangement: &Arrangement) -> Result<(), GeneratorError> {
    let templates = arrangement.chord_templates.len();
    let valid = |chord_id: i16| usize::try_from(chord_id).is_ok_and(|id| id < templates);
    for level in &arrangement.levels {
        if let Some(hand_shape) = level
            .hand_shapes
            .iter()
            .find(|hand_shape| !valid(hand_shape.chord_id))
        {
            return Err(GeneratorError::InvalidOutput(format!(
                "handshape at {:.3} s on level {} uses chord id {}",
                hand_shape.start_time, level.difficulty, hand_shape.chord_id
            )));
        }
        if let Some(chord) = level.chords.iter().find(|chord| !valid(chord.chord_id)) {
            return Err(GeneratorError::InvalidOutput(format!(
                "chord at {:.3} s on level {} uses chord id {}",
                chord.time, level.difficulty, chord.chord_id
            )));
        }
    }
    Ok(())
}

/// Processes one arrangement file.
pub struct ArrangementProcessor<'a> {
    path: PathBuf,
    arrangement: Arrangement,
    state: ProcessState,
    context: ProcessContext<'a>,
}

impl<'a> ArrangementProcessor<'a> {
    /// Loads the arrangement at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the file is not an arrangement. No phase can run then.
    pub fn load(path: impl Into<PathBuf>, config: &'a ProcessConfig) -> Result<Self, LoadError> {
        let path = path.into();
        let arrangement = xml::load(&path)?;
        tracing::info!(path = %path.display(), "loaded arrangement");
        Ok(Self::new(path, arrangement, config))
    }

    /// Wraps an arrangement already in memory, as if loaded from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, arrangement: Arrangement, config: &'a ProcessConfig) -> Self {
        Self {
            path: path.into(),
            arrangement,
            state: ProcessState::Loaded,
            context: ProcessContext::new(config),
        }
    }

    /// Compares phrase levels with previous runs stored in `repository`.
    #[must_use]
    pub fn with_repository(mut self, repository: &'a dyn PhraseLevelRepository) -> Self {
        let key = repository_key(&self.path);
        self.context = self.context.with_repository(repository, key);
        self
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> ProcessState {
        self.state
    }

    /// The arrangement in its current form.
    #[must_use]
    pub const fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    /// Messages reported so far.
    #[must_use]
    pub const fn messages(&self) -> &StatusMessages {
        &self.context.messages
    }

    /// Lines logged so far.
    #[must_use]
    pub const fn log(&self) -> &ProcessLog {
        &self.context.log
    }

    fn expect_state(&self, expected: ProcessState, phase: &'static str) -> Result<(), ProcessError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ProcessError::block(
                phase,
                format!("cannot run while the processor is {}", self.state),
            ))
        }
    }

    fn enter(&mut self, state: ProcessState) {
        tracing::info!(path = %self.path.display(), %state, "entering state");
        self.state = state;
    }

    fn fail(&mut self, error: ProcessError) -> ProcessError {
        tracing::error!(path = %self.path.display(), %error, "processing failed");
        self.context
            .messages
            .report(Severity::Error, error.to_string(), None);
        self.state = ProcessState::Error;
        error
    }

    fn phase(
        &mut self,
        expected: ProcessState,
        next: ProcessState,
        name: &'static str,
        body: impl FnOnce(&mut Self) -> Result<(), ProcessError>,
    ) -> Result<(), ProcessError> {
        self.expect_state(expected, name)?;
        self.enter(next);
        body(self).map_err(|error| self.fail(error))
    }

    /// Runs the pre pipeline.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing block.
    pub fn pre_process(&mut self) -> Result<(), ProcessError> {
        self.phase(
            ProcessState::Loaded,
            ProcessState::PreProcessing,
            "pre-processing",
            |this| pre_pipeline().run(&mut this.arrangement, &mut this.context),
        )
    }

    /// Runs the generator on a temporary copy of the arrangement and takes its output.
    ///
    /// An arrangement which still has difficulty levels is kept as it is.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::Generator`] when the generator fails or its output is invalid.
    pub fn generate(&mut self, generator: &dyn DifficultyGenerator) -> Result<(), ProcessError> {
        self.phase(
            ProcessState::PreProcessing,
            ProcessState::GeneratingDifficulty,
            "difficulty generation",
            |this| {
                if this.arrangement.has_dynamic_difficulty() {
                    this.context
                        .log("The arrangement already has difficulty levels, skipped generation.");
                    return Ok(());
                }
                let temporary = TemporaryFile::next_to(&this.path);
                xml::save(&this.arrangement, &temporary.0, WriteMode::Full)?;
                let options = &this.context.config().generator;
                run_generator(generator, &temporary.0, options)?;
                let generated = xml::load(&temporary.0)?;
                validate_generated(&generated)?;
                this.arrangement = generated;
                Ok(())
            },
        )
    }

    /// Runs the post pipeline.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing block.
    pub fn post_process(&mut self) -> Result<(), ProcessError> {
        self.phase(
            ProcessState::GeneratingDifficulty,
            ProcessState::PostProcessing,
            "post-processing",
            |this| post_pipeline().run(&mut this.arrangement, &mut this.context),
        )
    }

    /// Saves the arrangement to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::Io`] when the file cannot be written.
    pub fn save(&mut self, path: &Path) -> Result<(), ProcessError> {
        self.phase(
            ProcessState::PostProcessing,
            ProcessState::Completed,
            "saving",
            |this| {
                let mode = this.context.config().write_mode();
                xml::save(&this.arrangement, path, mode)?;
                Ok(())
            },
        )
    }

    /// Where [`Self::run`] saves: the input itself when overwriting, a `_DDC` file next to it otherwise.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        if self.context.config().generator.overwrite {
            return self.path.clone();
        }
        let stem = self
            .path
            .file_stem()
            .map_or_else(|| "arrangement".into(), |stem| stem.to_string_lossy());
        self.path.with_file_name(format!("{stem}_DDC.xml"))
    }

    /// Runs every phase, stopping at the first failure.
    pub fn run(mut self, generator: &dyn DifficultyGenerator) -> ProcessOutcome {
        let output = self.output_path();
        let result = self
            .pre_process()
            .and_then(|()| self.generate(generator))
            .and_then(|()| self.post_process())
            .and_then(|()| self.save(&output));
        ProcessOutcome {
            state: self.state,
            messages: self.context.messages,
            log: self.context.log,
            error: result.err(),
        }
    }
}

impl fmt::Debug for ArrangementProcessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrangementProcessor")
            .field("path", &self.path)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
