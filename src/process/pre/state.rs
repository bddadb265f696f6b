use crate::{
    check::check_arrangement,
    model::Arrangement,
    process::{PreservedState, ProcessBlock, ProcessContext, ProcessError},
    time::find_by_time,
};

/// Reports the linter issues of the arrangement.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrangementChecker;

impl ProcessBlock for ArrangementChecker {
    fn name(&self) -> &'static str {
        "arrangement checker"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let issues = check_arrangement(arrangement);
        if !issues.is_empty() {
            context.log(format!("Found {} issues.", issues.len()));
        }
        for issue in &issues {
            context.issue(issue);
        }
        Ok(())
    }
}

/// Remembers what the generator is known to lose, for the post pipeline to restore.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatePreserver;

impl ProcessBlock for StatePreserver {
    fn name(&self) -> &'static str {
        "state preserver"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let noguitar_anchors = arrangement
            .levels
            .last()
            .map(|level| {
                arrangement
                    .sections
                    .iter()
                    .filter(|section| section.is_noguitar())
                    .filter_map(|section| find_by_time(&level.anchors, section.time).copied())
                    .collect()
            })
            .unwrap_or_default();
        context.preserved = PreservedState {
            events: arrangement.events.clone(),
            noguitar_anchors,
            first_noguitar_section: arrangement
                .sections
                .first()
                .filter(|section| section.is_noguitar())
                .cloned(),
        };
        Ok(())
    }
}
