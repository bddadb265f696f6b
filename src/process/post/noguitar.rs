use crate::{
    model::Arrangement,
    process::{ProcessBlock, ProcessContext, ProcessError},
    time::{contains_time, insert_by_time, sec_to_ms, time_equal},
};

/// Puts back the anchors at the start of noguitar sections which the generator drops.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoguitarAnchorRestorer;

impl ProcessBlock for NoguitarAnchorRestorer {
    fn name(&self) -> &'static str {
        "noguitar anchor restorer"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let mut restored = 0;
        for anchor in &context.preserved.noguitar_anchors {
            for level in &mut arrangement.levels {
                if !contains_time(&level.anchors, anchor.time) {
                    insert_by_time(&mut level.anchors, *anchor);
                    restored += 1;
                }
            }
        }
        if restored > 0 {
            context.log(format!(
                "Restored {restored} anchors at the start of noguitar sections."
            ));
        }
        Ok(())
    }
}

/// Puts back a leading noguitar section which the generator drops.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstNoguitarSectionRestorer;

impl ProcessBlock for FirstNoguitarSectionRestorer {
    fn name(&self) -> &'static str {
        "first noguitar section restorer"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let Some(section) = context.preserved.first_noguitar_section.clone() else {
            return Ok(());
        };
        let present = arrangement
            .sections
            .first()
            .is_some_and(|first| first.is_noguitar() && time_equal(first.time, section.time));
        if present {
            return Ok(());
        }
        let time = section.time;
        insert_by_time(&mut arrangement.sections, section);
        arrangement.renumber_sections();
        context.log(format!(
            "Restored the first noguitar section at {} ms.",
            sec_to_ms(time)
        ));
        Ok(())
    }
}
