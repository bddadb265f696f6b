use crate::{
    command::SlideOutCommand,
    model::{Arrangement, ChordTemplate, HandShape, Level, Note},
    process::{ProcessBlock, ProcessContext, ProcessError},
    time::{find_by_time, insert_by_time, ms_to_sec, sec_to_ms, time_equal},
};

/// The original handshape keeps this fraction of the slide sustain.
const KEPT_SUSTAIN_DIVISOR: f32 = 3.0;

/// Gives the slide-out of a chord its own handshape at the frets the slide ends on.
///
/// A `so` event marks the chord or the unpitched slide notes at its time. The suffix of `so<time>` points at another time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideOutProcessor;

struct SlideOut {
    level: usize,
    hand_shape: usize,
    template: ChordTemplate,
    time: f32,
    sustain: f32,
}

/// The unpitched slide notes starting at `time`, from a chord if there is one.
fn slide_notes(level: &Level, time: f32) -> Vec<&Note> {
    match find_by_time(&level.chords, time) {
        Some(chord) => chord
            .chord_notes
            .iter()
            .filter(|note| note.is_unpitched_slide())
            .collect(),
        None => level
            .notes
            .iter()
            .skip_while(|note| note.time < time && !time_equal(note.time, time))
            .take_while(|note| time_equal(note.time, time))
            .filter(|note| note.is_unpitched_slide())
            .collect(),
    }
}

fn plan(arrangement: &Arrangement, level_index: usize, time: f32) -> Option<SlideOut> {
    let level = arrangement.levels.get(level_index)?;
    let notes = slide_notes(level, time);
    if notes.is_empty() {
        return None;
    }
    let hand_shape = level
        .hand_shapes
        .iter()
        .position(|hand_shape| hand_shape.contains(time))?;
    let original = arrangement
        .chord_templates
        .get(usize::try_from(level.hand_shapes[hand_shape].chord_id).ok()?)?;

    let mut template = ChordTemplate::default();
    for note in &notes {
        let string = usize::try_from(note.string).ok()?;
        *template.frets.get_mut(string)? = note.slide_unpitch_to;
        template.fingers[string] = original.fingers[string];
    }
    Some(SlideOut {
        level: level_index,
        hand_shape,
        template,
        time,
        sustain: notes.iter().map(|note| note.sustain).fold(0.0, f32::max),
    })
}

fn apply_slide_out(
    arrangement: &mut Arrangement,
    slide_out: SlideOut,
    context: &mut ProcessContext<'_>,
) {
    let chord_id = arrangement.find_or_add_chord_template(slide_out.template);
    let Some(level) = arrangement.levels.get_mut(slide_out.level) else {
        return;
    };
    let original = &mut level.hand_shapes[slide_out.hand_shape];
    let before = original.end_time;
    original.end_time = slide_out.time + slide_out.sustain / KEPT_SUSTAIN_DIVISOR;
    let start = original.end_time;
    context.log(format!(
        "Shortened the handshape at {} ms on level {} for the slide-out: end {} ms -> {} ms.",
        sec_to_ms(original.start_time),
        level.difficulty,
        sec_to_ms(before),
        sec_to_ms(start)
    ));
    insert_by_time(
        &mut level.hand_shapes,
        HandShape::new(chord_id, start, slide_out.time + slide_out.sustain),
    );
}

impl ProcessBlock for SlideOutProcessor {
    fn name(&self) -> &'static str {
        "slide-out processor"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let commands: Vec<(f32, Option<SlideOutCommand>)> = arrangement
            .events
            .iter()
            .filter_map(|event| match SlideOutCommand::parse(&event.code)? {
                Ok(command) => Some((event.time, Some(command))),
                Err(error) => {
                    context.warn(error.to_string(), Some(event.time));
                    Some((event.time, None))
                }
            })
            .collect();
        if commands.is_empty() {
            return Ok(());
        }

        for (event_time, command) in &commands {
            let Some(command) = command else {
                continue;
            };
            let time = command.target_ms.map_or(*event_time, ms_to_sec);
            let mut processed = 0;
            for level in 0..arrangement.levels.len() {
                if let Some(slide_out) = plan(arrangement, level, time) {
                    apply_slide_out(arrangement, slide_out, context);
                    processed += 1;
                }
            }
            if processed == 0 {
                context.warn(
                    "No chord or unpitched slide found for the slide-out event.",
                    Some(time),
                );
            } else {
                context.log(format!(
                    "Added slide-out handshapes at {} ms on {processed} levels.",
                    sec_to_ms(time)
                ));
            }
        }

        arrangement
            .events
            .retain(|event| !matches!(SlideOutCommand::parse(&event.code), Some(Ok(_))));
        Ok(())
    }
}
