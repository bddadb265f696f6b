use crate::{
    model::Arrangement,
    process::{ProcessBlock, ProcessContext, ProcessError},
    time::{sec_to_ms, time_equal},
};

/// Event code which sets the width of the anchor at its time to 3.
pub const ANCHOR_WIDTH_3: &str = "w3";

/// Restores the letter case of the events the generator changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrowdEventFixer;

impl ProcessBlock for CrowdEventFixer {
    fn name(&self) -> &'static str {
        "crowd event fixer"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let mut fixed = Vec::new();
        for event in &mut arrangement.events {
            let Some(original) = context.preserved.events.iter().find(|original| {
                time_equal(original.time, event.time)
                    && original.code != event.code
                    && original.code.eq_ignore_ascii_case(&event.code)
            }) else {
                continue;
            };
            fixed.push(format!(
                "Restored event `{}` changed into `{}` at {} ms.",
                original.code,
                event.code,
                sec_to_ms(event.time)
            ));
            event.code.clone_from(&original.code);
        }
        for line in fixed {
            context.log(line);
        }
        Ok(())
    }
}

/// Sets the width of the anchors at `w3` events to 3 and removes the events.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorWidthProcessor;

impl ProcessBlock for AnchorWidthProcessor {
    fn name(&self) -> &'static str {
        "anchor width processor"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let times: Vec<f32> = arrangement
            .events
            .iter()
            .filter(|event| event.code == ANCHOR_WIDTH_3)
            .map(|event| event.time)
            .collect();
        for &time in &times {
            let mut changed = 0;
            for level in &mut arrangement.levels {
                for anchor in level
                    .anchors
                    .iter_mut()
                    .filter(|anchor| time_equal(anchor.time, time))
                {
                    anchor.width = 3.0;
                    changed += 1;
                }
            }
            if changed == 0 {
                context.warn("No anchor found for the `w3` event.", Some(time));
            } else {
                context.log(format!(
                    "Set the width of {changed} anchors at {} ms to 3.",
                    sec_to_ms(time)
                ));
            }
        }
        arrangement
            .events
            .retain(|event| event.code != ANCHOR_WIDTH_3);
        Ok(())
    }
}
