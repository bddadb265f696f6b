use crate::{
    model::{Arrangement, Level, Note, PhraseWindow},
    process::{ProcessBlock, ProcessContext, ProcessError},
    time::{HasTime, insert_by_time, time_equal},
};

/// Gives every phrase with content on only one level a second level.
///
/// The content is copied unchanged into level 1, and the level 0 copy loses its sustains and the techniques which need a following note or a sustain.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneLevelPhraseFixer;

fn copy_into<T: HasTime + Clone>(source: &[T], target: &mut Vec<T>, window: &PhraseWindow) {
    for item in source.iter().filter(|item| window.contains(item.time())) {
        insert_by_time(target, item.clone());
    }
}

fn simplify(note: &mut Note) {
    note.set_link_next(false);
    note.slide_to = -1;
    note.slide_unpitch_to = -1;
    note.vibrato = 0;
    note.set_tremolo(false);
    note.sustain = 0.0;
    let end = note.end_time();
    note.bend_values
        .retain(|bend| bend.time <= end || time_equal(bend.time, end));
}

fn simplify_window(level: &mut Level, window: &PhraseWindow) {
    for note in level
        .notes
        .iter_mut()
        .filter(|note| window.contains(note.time))
    {
        simplify(note);
    }
    for chord in level
        .chords
        .iter_mut()
        .filter(|chord| window.contains(chord.time))
    {
        chord.set_link_next(false);
        chord.chord_notes.iter_mut().for_each(simplify);
    }
}

fn has_content(level: &Level, window: &PhraseWindow) -> bool {
    level.notes.iter().any(|note| window.contains(note.time))
        || level.chords.iter().any(|chord| window.contains(chord.time))
}

impl ProcessBlock for OneLevelPhraseFixer {
    fn name(&self) -> &'static str {
        "one level phrase fixer"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let windows = arrangement.phrase_windows();
        let Some(first) = arrangement.levels.first() else {
            return Ok(());
        };
        let targets: Vec<PhraseWindow> = windows
            .into_iter()
            .filter(|window| {
                arrangement
                    .phrases
                    .get(window.phrase_id as usize)
                    .is_some_and(|phrase| phrase.max_difficulty == 0)
                    && has_content(first, window)
            })
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        if arrangement.levels.len() < 2 {
            arrangement.levels.push(Level::new(1));
        }
        let (easy, rest) = arrangement.levels.split_at_mut(1);
        let (easy, copy) = (&mut easy[0], &mut rest[0]);
        for window in &targets {
            copy_into(&easy.notes, &mut copy.notes, window);
            copy_into(&easy.chords, &mut copy.chords, window);
            copy_into(&easy.anchors, &mut copy.anchors, window);
            copy_into(&easy.hand_shapes, &mut copy.hand_shapes, window);
            simplify_window(easy, window);
        }

        for window in &targets {
            if let Some(phrase) = arrangement.phrases.get_mut(window.phrase_id as usize)
                && phrase.max_difficulty == 0
            {
                phrase.max_difficulty = 1;
                context.log(format!(
                    "Added a second level to phrase `{}`.",
                    phrase.name
                ));
            }
        }
        Ok(())
    }
}
