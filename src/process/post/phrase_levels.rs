use crate::{
    model::Arrangement,
    process::{ProcessBlock, ProcessContext, ProcessError},
    repository::PhraseLevels,
};

/// Warns when a phrase has fewer difficulty levels than in the previous run on the same file.
///
/// Does nothing without a repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseLevelComparer;

impl ProcessBlock for PhraseLevelComparer {
    fn name(&self) -> &'static str {
        "phrase level comparer"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let Some((repository, key)) = context.repository() else {
            return Ok(());
        };
        let key = key.to_string();
        let current = PhraseLevels::from_arrangement(arrangement);
        if let Some(previous) = repository.try_get_previous(&key) {
            let warnings: Vec<String> = current
                .decreases_from(&previous)
                .map(|(name, before, now)| {
                    format!(
                        "Max difficulty of phrase `{name}` decreased from {before} to {now} since the previous run."
                    )
                })
                .collect();
            for warning in warnings {
                context.warn(warning, None);
            }
        }
        repository.queue_for_save(&key, current);
        Ok(())
    }
}
