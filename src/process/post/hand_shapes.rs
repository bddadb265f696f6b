use crate::{
    model::{Arrangement, Ebeat, HandShape, Level},
    process::{ProcessBlock, ProcessContext, ProcessError},
    time::{find_by_time, sec_to_ms, time_equal},
};

/// Gaps below this are nested handshapes, which are left alone.
const NESTED_GAP: f32 = -0.001;
/// Adjustments shorter than this are not logged.
const LOGGED_ADJUSTMENT: f32 = 0.005;
/// How many times the minimum gap is halved when the full gap does not fit.
const MAX_HALVINGS: usize = 2;

/// Shortens handshapes which end too close to the next handshape.
///
/// The minimum gap is a 32nd note of the beat where the next handshape starts, a 12th of the beat when the next one follows closely, and doubled after a long chord slide.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandShapeAdjuster;

/// Length of the beat containing `time`, or of the nearest beat outside the grid.
fn beat_duration(beats: &[Ebeat], time: f32) -> Option<f32> {
    if beats.len() < 2 {
        return None;
    }
    let index = beats
        .partition_point(|beat| beat.time <= time)
        .clamp(1, beats.len() - 1);
    Some(beats[index].time - beats[index - 1].time)
}

/// Whether the handshape starts on a link-next chord sliding for at least half a beat.
fn starts_on_long_slide(level: &Level, hand_shape: &HandShape, beat: f32) -> bool {
    find_by_time(&level.chords, hand_shape.start_time).is_some_and(|chord| {
        chord.is_link_next()
            && chord
                .chord_notes
                .iter()
                .any(|note| note.is_slide() || note.is_unpitched_slide())
            && chord.sustain() >= beat / 2.0
    })
}

/// The minimum gap before `next`, from values shortening `current` never changes.
fn minimum_gap(
    level: &Level,
    beats: &[Ebeat],
    current: &HandShape,
    next: &HandShape,
) -> Option<f32> {
    let beat = beat_duration(beats, next.start_time)?;
    let note_32nd = beat / 8.0;
    let mut gap = if next.start_time - current.start_time <= note_32nd * 2.0 {
        beat / 12.0
    } else {
        note_32nd
    };
    if starts_on_long_slide(level, current, beat) {
        gap *= 2.0;
    }
    Some(gap)
}

/// The new end of `current`, if it must move.
fn adjusted_end(current: &HandShape, next: &HandShape, minimum: f32) -> Option<f32> {
    let gap = next.start_time - current.end_time;
    if gap < NESTED_GAP || gap >= minimum || time_equal(gap, minimum) {
        return None;
    }
    let mut shift = minimum;
    for _ in 0..=MAX_HALVINGS {
        let end = next.start_time - shift;
        if end > current.start_time && !time_equal(end, current.start_time) {
            return (end < current.end_time && !time_equal(end, current.end_time)).then_some(end);
        }
        shift /= 2.0;
    }
    None
}

fn adjust_level(level: &mut Level, beats: &[Ebeat], context: &mut ProcessContext<'_>) {
    for index in 1..level.hand_shapes.len() {
        let current = level.hand_shapes[index - 1];
        let next = level.hand_shapes[index];
        let Some(minimum) = minimum_gap(level, beats, &current, &next) else {
            return;
        };
        let Some(end) = adjusted_end(&current, &next, minimum) else {
            continue;
        };
        level.hand_shapes[index - 1].end_time = end;
        if current.end_time - end >= LOGGED_ADJUSTMENT {
            context.log(format!(
                "Shortened the handshape at {} ms on level {}: distance to the next one {} ms -> {} ms.",
                sec_to_ms(current.start_time),
                level.difficulty,
                sec_to_ms(next.start_time - current.end_time),
                sec_to_ms(next.start_time - end),
            ));
        }
    }
}

impl ProcessBlock for HandShapeAdjuster {
    fn name(&self) -> &'static str {
        "handshape adjuster"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        for level in &mut arrangement.levels {
            adjust_level(level, &arrangement.ebeats, context);
        }
        Ok(())
    }
}
