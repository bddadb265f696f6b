//! State shared by the blocks of the pipelines for one arrangement.

use crate::{
    check::Issue,
    message::{Severity, StatusMessages},
    model::{Anchor, Event, Section},
    repository::PhraseLevelRepository,
    time::sec_to_ms,
};

use super::ProcessConfig;

/// Human readable lines describing what the blocks changed.
///
/// Every line is also emitted as a `tracing` event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessLog {
    lines: Vec<String>,
}

impl ProcessLog {
    /// Appends a line.
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::info!(target: "ddc_improver::process", "{line}");
        self.lines.push(line);
    }

    /// The lines in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consumes the log into its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// What the pre pipeline remembers of the arrangement for the post pipeline to restore.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreservedState {
    /// The events before generation.
    pub events: Vec<Event>,
    /// Anchors at the start of noguitar sections, taken from the hardest level.
    pub noguitar_anchors: Vec<Anchor>,
    /// The first section, if it is a noguitar section.
    pub first_noguitar_section: Option<Section>,
}

/// The context passed to every block.
pub struct ProcessContext<'a> {
    config: &'a ProcessConfig,
    /// Log of the changes.
    pub log: ProcessLog,
    /// Messages for the user.
    pub messages: StatusMessages,
    /// State carried from the pre pipeline to the post pipeline.
    pub preserved: PreservedState,
    repository: Option<(&'a dyn PhraseLevelRepository, String)>,
}

impl<'a> ProcessContext<'a> {
    /// Creates a context without a repository.
    #[must_use]
    pub fn new(config: &'a ProcessConfig) -> Self {
        Self {
            config,
            log: ProcessLog::default(),
            messages: StatusMessages::new(),
            preserved: PreservedState::default(),
            repository: None,
        }
    }

    /// Attaches the phrase level repository and the key of this arrangement.
    #[must_use]
    pub fn with_repository(
        mut self,
        repository: &'a dyn PhraseLevelRepository,
        key: impl Into<String>,
    ) -> Self {
        self.repository = Some((repository, key.into()));
        self
    }

    /// The configuration of this run.
    #[must_use]
    pub const fn config(&self) -> &'a ProcessConfig {
        self.config
    }

    /// The repository and the key of this arrangement, if any.
    #[must_use]
    pub fn repository(&self) -> Option<(&'a dyn PhraseLevelRepository, &str)> {
        self.repository
            .as_ref()
            .map(|(repository, key)| (*repository, key.as_str()))
    }

    /// Appends a line to the log.
    pub fn log(&mut self, line: impl Into<String>) {
        self.log.push(line);
    }

    /// Reports a warning, at a time in seconds if given.
    pub fn warn(&mut self, text: impl Into<String>, time: Option<f32>) {
        let text = text.into();
        tracing::warn!(target: "ddc_improver::process", "{text}");
        self.messages
            .report(Severity::Warning, text, time.map(sec_to_ms));
    }

    /// Reports a linter issue.
    pub fn issue(&mut self, issue: &Issue) {
        self.messages.push(issue.to_status_message());
    }
}
