//! A store of the phrase difficulty depths of previous runs.
//!
//! After generation, the maximum difficulty of every phrase is compared with the previous run on the same file, so that a regenerated arrangement which lost difficulty depth is noticed.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    path::Path,
    sync::Mutex,
};

use thiserror::Error;

use crate::model::Arrangement;

/// Maximum difficulty per phrase name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhraseLevels(pub BTreeMap<String, u8>);

/// A malformed line of [`PhraseLevels::parse_flat`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed phrase level line `{0}`")]
pub struct PhraseLevelsError(pub String);

impl PhraseLevels {
    /// Collects the deepest maximum difficulty of every phrase name.
    #[must_use]
    pub fn from_arrangement(arrangement: &Arrangement) -> Self {
        let mut levels = BTreeMap::new();
        for phrase in &arrangement.phrases {
            let entry = levels.entry(phrase.name.clone()).or_insert(0);
            *entry = phrase.max_difficulty.max(*entry);
        }
        Self(levels)
    }

    /// Serializes into `name difficulty` lines.
    #[must_use]
    pub fn to_flat_string(&self) -> String {
        self.to_string()
    }

    /// Parses `name difficulty` lines. The name may contain spaces; the difficulty is after the last one.
    ///
    /// # Errors
    ///
    /// Returns the first line which has no difficulty.
    pub fn parse_flat(text: &str) -> Result<Self, PhraseLevelsError> {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.rsplit_once(' ')
                    .and_then(|(name, difficulty)| {
                        Some((name.to_string(), difficulty.trim().parse().ok()?))
                    })
                    .ok_or_else(|| PhraseLevelsError(line.to_string()))
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }

    /// Phrases whose difficulty is lower than in `previous`, as `(name, previous, current)`.
    pub fn decreases_from<'a>(
        &'a self,
        previous: &'a Self,
    ) -> impl Iterator<Item = (&'a str, u8, u8)> + 'a {
        previous.0.iter().filter_map(|(name, &before)| {
            let &now = self.0.get(name)?;
            (now < before).then_some((name.as_str(), before, now))
        })
    }
}

impl fmt::Display for PhraseLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, difficulty) in &self.0 {
            writeln!(f, "{name} {difficulty}")?;
        }
        Ok(())
    }
}

/// The key of a file in a repository: the hex blake3 digest of its path.
#[must_use]
pub fn repository_key(path: &Path) -> String {
    blake3::hash(path.to_string_lossy().as_bytes())
        .to_hex()
        .to_string()
}

/// Where phrase levels of previous runs are kept.
///
/// Saving is queued so that processing never waits on the store.
pub trait PhraseLevelRepository {
    /// Queues `levels` to be saved under `key`.
    fn queue_for_save(&self, key: &str, levels: PhraseLevels);

    /// The levels saved under `key` by a previous run.
    fn try_get_previous(&self, key: &str) -> Option<PhraseLevels>;
}

#[derive(Debug, Default)]
struct Entries {
    stored: HashMap<String, String>,
    queued: Vec<(String, PhraseLevels)>,
}

/// A repository in memory, storing the flat text of each entry.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: Mutex<Entries>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores every queued entry, replacing older ones. Returns how many were stored.
    pub fn flush(&self) -> usize {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let queued = std::mem::take(&mut entries.queued);
        let count = queued.len();
        for (key, levels) in queued {
            entries.stored.insert(key, levels.to_flat_string());
        }
        count
    }

    /// Number of queued entries.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .queued
            .len()
    }
}

impl PhraseLevelRepository for MemoryRepository {
    fn queue_for_save(&self, key: &str, levels: PhraseLevels) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .queued
            .push((key.to_string(), levels));
    }

    fn try_get_previous(&self, key: &str) -> Option<PhraseLevels> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let text = entries.stored.get(key)?;
        match PhraseLevels::parse_flat(text) {
            Ok(levels) => Some(levels),
            Err(error) => {
                tracing::warn!(key, %error, "ignoring a malformed repository entry");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn names_with_spaces() {
        let levels = PhraseLevels::parse_flat("intro riff 12\nEND 0\n").expect("must be parsed");
        assert_eq!(levels.0.get("intro riff"), Some(&12));
        assert_eq!(levels.to_flat_string(), "END 0\nintro riff 12\n");
    }

    #[test]
    fn malformed_line() {
        assert_eq!(
            PhraseLevels::parse_flat("verse x"),
            Err(PhraseLevelsError("verse x".to_string()))
        );
    }
}
