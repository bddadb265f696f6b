//! Lints an arrangement for plausible authoring mistakes.
//!
//! The checks never mutate the arrangement and keep no state between runs, so the same arrangement always produces the same issues in the same order. Findings are values, not errors: they are reported to the user and never stop processing.

mod anchor;
mod chord;
mod crowd;
mod hand_shape;
mod link_next;
mod technique;

use thiserror::Error;

use crate::{
    message::{Severity, StatusMessage},
    model::{Arrangement, Level},
    time::sec_to_ms,
};

/// Distance in seconds under which two positions are suspiciously close.
pub(crate) const NEAR_DISTANCE: f32 = 0.005;

/// What an [`Issue`] is about.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IssueKind {
    /// A crowd event that must appear at most once appears again.
    #[error("Crowd event `{0}` appears more than once.")]
    DuplicateCrowdEvent(String),
    /// The intro applause ends before it starts.
    #[error("Intro applause end event comes before the start event.")]
    IntroApplauseEndBeforeStart,
    /// The intro applause starts but never ends.
    #[error("Intro applause start event has no matching end event.")]
    IntroApplauseWithoutEnd,
    /// A crowd tempo event is placed inside the intro applause.
    #[error("Crowd tempo event `{0}` is placed inside the intro applause.")]
    CrowdTempoInsideIntroApplause(String),
    /// Another event is placed inside the intro applause.
    #[error("Unexpected event `{0}` inside the intro applause.")]
    UnexpectedEventInsideIntroApplause(String),
    /// A link-next note has no following note on its string.
    #[error("Link-next note has no following note on string {string}.")]
    LinkNextMissingTarget {
        /// The string of the note.
        string: i8,
    },
    /// A link-next note links to another fret without sliding to it.
    #[error("Link-next fret mismatch: fret {fret} links to fret {next_fret} without a slide.")]
    LinkNextFretMismatch {
        /// Fret of the linked note.
        fret: i8,
        /// Fret of the next note.
        next_fret: i8,
    },
    /// A link-next note slides to another fret than the next note's.
    #[error("Link-next slide mismatch: slides to fret {slide_to} but the next note is on fret {next_fret}.")]
    LinkNextSlideMismatch {
        /// Target fret of the slide.
        slide_to: i8,
        /// Fret of the next note.
        next_fret: i8,
    },
    /// A link-next bend does not continue with the same step on the next note.
    #[error("Link-next bend mismatch: bend step {step} continues as {next_step}.")]
    LinkNextBendMismatch {
        /// Last bend step, in hundredths of a step.
        step: i32,
        /// First bend step of the next note, in hundredths of a step.
        next_step: i32,
    },
    /// A note is both a harmonic and a pinch harmonic.
    #[error("Note is both a harmonic and a pinch harmonic.")]
    HarmonicWithPinchHarmonic,
    /// A note on a very high fret is not ignored.
    #[error("Note on fret {0} without the ignore status.")]
    HighFretWithoutIgnore(i8),
    /// A 7th fret harmonic with sustain is not ignored.
    #[error("7th fret harmonic with sustain without the ignore status.")]
    SeventhFretHarmonicWithSustain,
    /// An unpitched slide also links to the next note.
    #[error("Unpitched slide note with link-next.")]
    UnpitchedSlideWithLinkNext,
    /// A tone change happens exactly on a note or a chord.
    #[error("Tone change `{0}` is placed on a note or a chord.")]
    ToneChangeOnNote(String),
    /// A note or chord is inside a section without guitar.
    #[error("Note or chord inside a noguitar section.")]
    NoteInsideNoguitarSection,
    /// The chord notes of a chord have different sustains.
    #[error("Chord notes of the chord have different sustains.")]
    VaryingChordNoteSustains,
    /// A chord sustains until the end of its handshape.
    #[error("Chord ends at or just before the end of its handshape.")]
    ChordAtEndOfHandShape,
    /// The anchor puts another finger than the index finger on its own fret.
    #[error("Anchor on fret {fret} is fretted by finger {finger} in a handshape without the index finger.")]
    FingeringAnchorMismatch {
        /// Fret of the anchor.
        fret: i8,
        /// Finger on that fret.
        finger: i8,
    },
    /// An anchor is close to a note but not exactly on it.
    #[error("Anchor is {0} ms away from a note.")]
    AnchorNotOnNote(i32),
}

/// A linter finding at a time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Issue {
    /// What is wrong.
    pub kind: IssueKind,
    /// Where, in seconds.
    pub time: f32,
}

impl Issue {
    /// Creates an issue.
    #[must_use]
    pub const fn new(kind: IssueKind, time: f32) -> Self {
        Self { kind, time }
    }

    /// The time in milliseconds.
    #[must_use]
    pub fn time_code(&self) -> i32 {
        sec_to_ms(self.time)
    }

    /// Converts into a message for the user.
    #[must_use]
    pub fn to_status_message(&self) -> StatusMessage {
        StatusMessage::new(
            Severity::Issue,
            self.kind.to_string(),
            Some(self.time_code()),
        )
    }
}

/// Runs every check on `arrangement`.
///
/// Issues are sorted by time; issues at the same time keep the order of the checks.
#[must_use]
pub fn check_arrangement(arrangement: &Arrangement) -> Vec<Issue> {
    let mut issues = Vec::new();
    crowd::check(arrangement, &mut issues);
    technique::check_tone_changes(arrangement, &mut issues);
    for level in &arrangement.levels {
        check_level(arrangement, level, &mut issues);
    }
    issues.sort_by(|a, b| a.time.total_cmp(&b.time));
    issues
}

fn check_level(arrangement: &Arrangement, level: &Level, issues: &mut Vec<Issue>) {
    link_next::check(level, issues);
    technique::check_notes(level, issues);
    technique::check_noguitar(arrangement, level, issues);
    chord::check(level, issues);
    hand_shape::check(arrangement, level, issues);
    anchor::check(level, issues);
}

impl Arrangement {
    /// Runs every check on this arrangement. See [`check_arrangement`].
    #[must_use]
    pub fn check(&self) -> Vec<Issue> {
        check_arrangement(self)
    }
}
