use crate::{
    model::Arrangement,
    process::{ProcessBlock, ProcessContext, ProcessError},
};

/// Removes the beats the phrase mover inserted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporaryBeatRemover;

impl ProcessBlock for TemporaryBeatRemover {
    fn name(&self) -> &'static str {
        "temporary beat remover"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let before = arrangement.ebeats.len();
        arrangement.ebeats.retain(|beat| !beat.is_temporary());
        let removed = before - arrangement.ebeats.len();
        if removed > 0 {
            context.log(format!("Removed {removed} temporary beats."));
        }
        Ok(())
    }
}
