//! The interface of the external dynamic difficulty generator.
//!
//! The generator is a black box: it reads a single level arrangement from a path, writes the arrangement with generated difficulty levels back to the same path and reports the result by its exit code.

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Options passed to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GeneratorOptions {
    /// Length of automatically created phrases in measures.
    pub phrase_length: u32,
    /// Ramp-up model file.
    pub ramp_up: Option<PathBuf>,
    /// Generator configuration file.
    pub config: Option<PathBuf>,
    /// Whether the generator overwrites the input file.
    pub overwrite: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            phrase_length: 8,
            ramp_up: None,
            config: None,
            overwrite: true,
        }
    }
}

/// A failure of the generator, distinct from failures of this crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Exit code 1.
    #[error("the difficulty generator failed with a system error")]
    System,
    /// Exit code 2.
    #[error("the difficulty generator failed with an application error")]
    Application,
    /// Any other non-zero exit code.
    #[error("the difficulty generator exited with undefined code {0}")]
    Undefined(i32),
    /// The generator could not be started.
    #[error("failed to launch the difficulty generator: {0}")]
    Launch(#[source] io::Error),
    /// The generator succeeded but wrote a structurally invalid arrangement.
    #[error("the difficulty generator produced invalid output: {0}")]
    InvalidOutput(String),
}

impl GeneratorError {
    /// Maps an exit code, `None` for success.
    #[must_use]
    pub const fn from_exit_code(code: i32) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(Self::System),
            2 => Some(Self::Application),
            code => Some(Self::Undefined(code)),
        }
    }
}

/// Something which generates difficulty levels for the arrangement at a path.
pub trait DifficultyGenerator {
    /// Runs the generator synchronously and returns its exit code.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the generator cannot be launched.
    fn generate(&self, path: &Path, options: &GeneratorOptions) -> io::Result<i32>;
}

impl<F> DifficultyGenerator for F
where
    F: Fn(&Path, &GeneratorOptions) -> io::Result<i32>,
{
    fn generate(&self, path: &Path, options: &GeneratorOptions) -> io::Result<i32> {
        self(path, options)
    }
}

/// Runs `generator` and maps its exit code.
///
/// # Errors
///
/// Returns [`GeneratorError`] when the generator cannot be launched or exits with a non-zero code.
pub fn run_generator(
    generator: &dyn DifficultyGenerator,
    path: &Path,
    options: &GeneratorOptions,
) -> Result<(), GeneratorError> {
    let code = generator
        .generate(path, options)
        .map_err(GeneratorError::Launch)?;
    GeneratorError::from_exit_code(code).map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert!(GeneratorError::from_exit_code(0).is_none());
        assert!(matches!(
            GeneratorError::from_exit_code(1),
            Some(GeneratorError::System)
        ));
        assert!(matches!(
            GeneratorError::from_exit_code(2),
            Some(GeneratorError::Application)
        ));
        assert!(matches!(
            GeneratorError::from_exit_code(-3),
            Some(GeneratorError::Undefined(-3))
        ));
    }

    #[test]
    fn closures_are_generators() {
        let failing = |_: &Path, _: &GeneratorOptions| -> io::Result<i32> { Ok(2) };
        let result = run_generator(&failing, Path::new("x.xml"), &GeneratorOptions::default());
        assert!(matches!(result, Err(GeneratorError::Application)));
    }
}
