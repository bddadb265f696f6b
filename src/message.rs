//! Messages shown to the user after an arrangement is processed.

use std::fmt;

use crate::time::format_time_code;

/// How serious a [`StatusMessage`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Processing failed.
    Error,
    /// The linter found a plausible authoring mistake.
    Issue,
    /// A fix could not be fully applied.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "Error",
            Self::Issue => "Issue",
            Self::Warning => "Warning",
        })
    }
}

/// One message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusMessage {
    /// The message.
    pub text: String,
    /// How serious it is.
    pub severity: Severity,
    /// Where in the song it applies, in milliseconds.
    pub time_code: Option<i32>,
}

impl StatusMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(severity: Severity, text: impl Into<String>, time_code: Option<i32>) -> Self {
        Self {
            text: text.into(),
            severity,
            time_code,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time_code {
            Some(ms) => write!(
                f,
                "{}: {} ({})",
                self.severity,
                self.text,
                format_time_code(ms)
            ),
            None => write!(f, "{}: {}", self.severity, self.text),
        }
    }
}

/// Messages in the order they were reported, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusMessages {
    messages: Vec<StatusMessage>,
}

impl StatusMessages {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Adds a message unless an equal one is already present. Returns whether it was added.
    pub fn push(&mut self, message: StatusMessage) -> bool {
        if self.messages.contains(&message) {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Adds a message built from its parts.
    pub fn report(
        &mut self,
        severity: Severity,
        text: impl Into<String>,
        time_code: Option<i32>,
    ) -> bool {
        self.push(StatusMessage::new(severity, text, time_code))
    }

    /// The first reported message.
    #[must_use]
    pub fn first(&self) -> Option<&StatusMessage> {
        self.messages.first()
    }

    /// Iterates the messages in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, StatusMessage> {
        self.messages.iter()
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether there is no message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether any message has `severity`.
    #[must_use]
    pub fn any(&self, severity: Severity) -> bool {
        self.messages.iter().any(|m| m.severity == severity)
    }

    /// Sorts by time code, messages without one first. Equal time codes keep report order.
    pub fn sort_by_time(&mut self) {
        self.messages.sort_by_key(|m| m.time_code);
    }

    /// Moves every message of `other` into `self`, skipping duplicates.
    pub fn extend(&mut self, other: impl IntoIterator<Item = StatusMessage>) {
        for message in other {
            self.push(message);
        }
    }

    /// Consumes the list into its messages.
    #[must_use]
    pub fn into_vec(self) -> Vec<StatusMessage> {
        self.messages
    }
}

impl<'a> IntoIterator for &'a StatusMessages {
    type Item = &'a StatusMessage;
    type IntoIter = std::slice::Iter<'a, StatusMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
