//! Author commands embedded in phrase names, chord names and event codes.
//!
//! - `moveto<time>` and `moveR<n>` phrase names relocate the phrase.
//! - `...OF<fret>` chord names collapse the chord onto one fret.
//! - `so` and `so<time>` events mark a slide-out.
//!
//! A time literal is `<minutes>m<seconds>s<millis>` or `<seconds>s<millis>`, e.g. `1m18s500` for 78.5 seconds.

use chumsky::prelude::*;
use thiserror::Error;

/// Prefix of the absolute phrase move command.
pub const MOVE_TO: &str = "moveto";
/// Prefix of the relative phrase move command.
pub const MOVE_RELATIVE: &str = "moveR";
/// Suffix marker of the one-fret chord command.
pub const ONE_FRET: &str = "OF";
/// Prefix of the slide-out event.
pub const SLIDE_OUT: &str = "so";
/// The highest fret a one-fret chord may use.
pub const MAX_FRET: i8 = 24;

type Extra<'a> = extra::Err<Rich<'a, char>>;

/// A command whose argument could not be read.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The time after `moveto` is not a time literal.
    #[error("unable to parse the time of the move command `{0}`")]
    InvalidMoveTime(String),
    /// The number after `moveR` is not a positive number.
    #[error("unable to parse the note count of the move command `{0}`")]
    InvalidMoveCount(String),
    /// The fret after `OF` is not a fret number.
    #[error("unable to parse the fret of the one-fret chord `{0}`")]
    InvalidOneFret(String),
    /// The suffix after `so` is not a time literal.
    #[error("unable to parse the time of the slide-out event `{0}`")]
    InvalidSlideOut(String),
}

fn number<'a>() -> impl Parser<'a, &'a str, u32, Extra<'a>> + Clone {
    text::digits(10)
        .to_slice()
        .try_map(|digits: &str, span| {
            digits
                .parse::<u32>()
                .map_err(|e| Rich::custom(span, e.to_string()))
        })
}

fn time_spec<'a>() -> impl Parser<'a, &'a str, i32, Extra<'a>> {
    number()
        .then_ignore(just('m'))
        .or_not()
        .then(number().then_ignore(just('s')))
        .then(number())
        .then_ignore(end())
        .try_map(|((minutes, seconds), millis), span| {
            minutes
                .unwrap_or(0)
                .checked_mul(60_000)
                .and_then(|ms| ms.checked_add(seconds.checked_mul(1000)?))
                .and_then(|ms| ms.checked_add(millis))
                .and_then(|ms| i32::try_from(ms).ok())
                .ok_or_else(|| Rich::custom(span, "time out of range"))
        })
}

/// Parses a time literal into milliseconds.
///
/// ```
/// use ddc_improver::command::parse_time_spec;
///
/// assert_eq!(parse_time_spec("1m18s500"), Some(78_500));
/// assert_eq!(parse_time_spec("0s0"), Some(0));
/// assert_eq!(parse_time_spec("1m18"), None);
/// ```
#[must_use]
pub fn parse_time_spec(text: &str) -> Option<i32> {
    time_spec().parse(text).into_result().ok()
}

fn parse_number(text: &str) -> Option<u32> {
    number().then_ignore(end()).parse(text).into_result().ok()
}

/// A phrase move command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCommand {
    /// Move to this time in milliseconds.
    Absolute(i32),
    /// Move forward by this many distinct note onsets.
    Relative(u32),
}

impl MoveCommand {
    /// Reads the move command of a phrase name.
    ///
    /// Returns `None` when the name is not a move command.
    #[must_use]
    pub fn parse(phrase_name: &str) -> Option<Result<Self, CommandError>> {
        if let Some(time) = phrase_name.strip_prefix(MOVE_TO) {
            return Some(
                parse_time_spec(time)
                    .map(Self::Absolute)
                    .ok_or_else(|| CommandError::InvalidMoveTime(phrase_name.to_string())),
            );
        }
        let count = phrase_name.strip_prefix(MOVE_RELATIVE)?;
        Some(
            parse_number(count)
                .filter(|&n| n > 0)
                .map(Self::Relative)
                .ok_or_else(|| CommandError::InvalidMoveCount(phrase_name.to_string())),
        )
    }
}

/// Reads the fret of a one-fret chord name such as `G5OF3`.
///
/// Returns `None` when the name does not end with the command.
#[must_use]
pub fn one_fret_suffix(chord_name: &str) -> Option<Result<i8, CommandError>> {
    let (_, suffix) = chord_name.rsplit_once(ONE_FRET)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(
        parse_number(suffix)
            .and_then(|fret| i8::try_from(fret).ok())
            .filter(|&fret| fret <= MAX_FRET)
            .ok_or_else(|| CommandError::InvalidOneFret(chord_name.to_string())),
    )
}

/// A slide-out event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SlideOutCommand {
    /// Time of the chord or notes to search for in milliseconds, the event time if `None`.
    pub target_ms: Option<i32>,
}

impl SlideOutCommand {
    /// Reads a slide-out event code.
    ///
    /// Returns `None` when the code is not a slide-out event.
    #[must_use]
    pub fn parse(event_code: &str) -> Option<Result<Self, CommandError>> {
        let suffix = event_code.strip_prefix(SLIDE_OUT)?;
        if suffix.is_empty() {
            return Some(Ok(Self::default()));
        }
        Some(
            parse_time_spec(suffix)
                .map(|ms| Self {
                    target_ms: Some(ms),
                })
                .ok_or_else(|| CommandError::InvalidSlideOut(event_code.to_string())),
        )
    }
}
