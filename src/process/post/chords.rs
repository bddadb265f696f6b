use crate::{
    model::Arrangement,
    process::{ProcessBlock, ProcessContext, ProcessError},
    time::sec_to_ms,
};

/// Sets link-next on chords whose chord notes link to the next note.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChordLinkNextFixer;

impl ProcessBlock for ChordLinkNextFixer {
    fn name(&self) -> &'static str {
        "chord link-next fixer"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let mut fixed = Vec::new();
        for level in &mut arrangement.levels {
            for chord in &mut level.chords {
                if !chord.is_link_next() && chord.chord_notes.iter().any(|note| note.is_link_next())
                {
                    chord.set_link_next(true);
                    fixed.push((level.difficulty, chord.time));
                }
            }
        }
        for (difficulty, time) in fixed {
            context.log(format!(
                "Set link-next on the chord at {} ms of level {difficulty}.",
                sec_to_ms(time)
            ));
        }
        Ok(())
    }
}

/// Clears the high density status of every chord.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighDensityRemover;

impl ProcessBlock for HighDensityRemover {
    fn name(&self) -> &'static str {
        "high density remover"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let mut cleared = 0;
        for level in &mut arrangement.levels {
            for chord in level.chords.iter_mut().filter(|chord| chord.is_high_density()) {
                chord.set_high_density(false);
                cleared += 1;
            }
        }
        if cleared > 0 {
            context.log(format!("Removed high density from {cleared} chords."));
        }
        Ok(())
    }
}
