use crate::{
    model::Arrangement,
    process::{ProcessBlock, ProcessContext, ProcessError},
    time::{sec_to_ms, time_equal},
};

/// Event code which removes every beat from its time.
pub const REMOVE_BEATS: &str = "removebeats";

/// Removes the beats after the end of the audio.
///
/// Of the last beat inside the audio and the first beat after it, the one closer to the end is kept. When that is the beat after the end, it is moved exactly onto the end.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtraneousBeatsRemover;

impl ProcessBlock for ExtraneousBeatsRemover {
    fn name(&self) -> &'static str {
        "extraneous beats remover"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let song_length = arrangement.metadata.song_length;
        let beats = &mut arrangement.ebeats;
        let first_after = beats.partition_point(|beat| {
            beat.time < song_length || time_equal(beat.time, song_length)
        });
        if first_after == beats.len() {
            return Ok(());
        }

        let before = beats.len();
        let keep_after = first_after.checked_sub(1).is_none_or(|last_inside| {
            let inside = song_length - beats[last_inside].time;
            let after = beats[first_after].time - song_length;
            after < inside
        });
        if keep_after {
            beats[first_after].time = song_length;
            beats.truncate(first_after + 1);
        } else {
            beats.truncate(first_after);
        }

        context.log(format!(
            "Removed {} beats after the end of the audio at {} ms.",
            before - beats.len(),
            sec_to_ms(song_length)
        ));
        Ok(())
    }
}

/// Removes every beat at or after a `removebeats` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveBeatsProcessor;

impl ProcessBlock for RemoveBeatsProcessor {
    fn name(&self) -> &'static str {
        "removebeats processor"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let Some(index) = arrangement
            .events
            .iter()
            .position(|event| event.code == REMOVE_BEATS)
        else {
            return Ok(());
        };
        let event = arrangement.events.remove(index);
        let before = arrangement.ebeats.len();
        arrangement
            .ebeats
            .retain(|beat| beat.time < event.time && !time_equal(beat.time, event.time));
        context.log(format!(
            "Removed {} beats from {} ms.",
            before - arrangement.ebeats.len(),
            sec_to_ms(event.time)
        ));
        Ok(())
    }
}
