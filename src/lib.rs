//! Maintenance and repair of guitar/bass arrangement XML files around an external dynamic difficulty generator.
//!
//! An arrangement goes through these phases:
//!
//! Raw XML == [`xml::decode`] ==> [`model::Arrangement`] == [`process::pre_pipeline`] ==> external generator ==> [`process::post_pipeline`] == [`xml::encode`] ==> Raw XML
//!
//! - `time` module provides the tolerance based time comparisons shared by everything else.
//! - `model` module provides the entities of an arrangement such as [`model::Note`], [`model::Chord`] and [`model::Level`].
//! - `xml` module reads and writes the file format, optionally in the abridged form which omits default valued attributes.
//! - `command` module parses the small command languages authors embed into phrase, chord and event names.
//! - `check` module lints an arrangement for suspicious authoring mistakes.
//! - `process` module provides the pre and post processing pipelines made of independent blocks.
//! - `improver` module drives one arrangement through all phases with an external [`generator::DifficultyGenerator`].
//!
//! In detail, our policies are:
//!
//! - Never fail the whole batch for one arrangement; errors stay attached to the arrangement they came from.
//! - Log every structural change a human could be surprised by.
//! - Skip unknown elements of the file format instead of rejecting them.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod check;
pub mod command;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod generator;
pub mod improver;
pub mod message;
pub mod model;
pub mod prelude;
pub mod process;
pub mod repository;
pub mod time;
pub mod xml;

/// Version of this crate, written into the file comments of processed arrangements.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
