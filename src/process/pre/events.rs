use crate::{
    model::{Arrangement, Event, crowd},
    process::{ProcessBlock, ProcessContext, ProcessError},
    time::insert_by_time,
};

/// Prefix of time signature events.
const TIME_SIGNATURE_PREFIX: &str = "TS:";

/// Removes the time signature events, which the game does not use.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSignatureEventRemover;

impl ProcessBlock for TimeSignatureEventRemover {
    fn name(&self) -> &'static str {
        "time signature event remover"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let before = arrangement.events.len();
        arrangement
            .events
            .retain(|event| !event.code.starts_with(TIME_SIGNATURE_PREFIX));
        let removed = before - arrangement.events.len();
        if removed > 0 {
            context.log(format!("Removed {removed} time signature events."));
        }
        Ok(())
    }
}

/// Adds the intro and outro applause when the arrangement has no crowd event.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrowdEventAdder;

impl ProcessBlock for CrowdEventAdder {
    fn name(&self) -> &'static str {
        "crowd event adder"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        if arrangement
            .events
            .iter()
            .any(|event| crowd::is_crowd_event(&event.code))
        {
            return Ok(());
        }
        let iterations = &arrangement.phrase_iterations;
        let (Some(first), Some(second), Some(last)) =
            (iterations.first(), iterations.get(1), iterations.last())
        else {
            return Ok(());
        };
        let added = [
            Event::new(crowd::INTRO_APPLAUSE, first.time),
            Event::new(crowd::INTRO_APPLAUSE_END, second.time),
            Event::new(crowd::OUTRO_APPLAUSE, last.time),
        ];
        for event in added {
            insert_by_time(&mut arrangement.events, event);
        }
        context.log("Added intro and outro crowd events.");
        Ok(())
    }
}
