use crate::{
    VERSION,
    model::{Arrangement, Level, Phrase, PhraseIteration, PhraseWindow, ToolComment},
    process::{ProcessBlock, ProcessContext, ProcessError},
    time::{HasTime, time_equal},
};

/// Merges the difficulty levels into one level made of the hardest content of every phrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct DdRemover;

fn copy_window<T: HasTime + Clone>(source: &[T], target: &mut Vec<T>, window: &PhraseWindow) {
    target.extend(
        source
            .iter()
            .filter(|item| window.contains(item.time()))
            .cloned(),
    );
}

/// Builds the merged level from the hardest level of each phrase window.
fn merge_levels(arrangement: &Arrangement) -> Level {
    let mut merged = Level::new(0);
    let hardest = arrangement.levels.len().saturating_sub(1);
    for window in arrangement.phrase_windows() {
        let max_difficulty = arrangement
            .phrases
            .get(window.phrase_id as usize)
            .map_or(hardest, |phrase| usize::from(phrase.max_difficulty));
        let Some(source) = arrangement.levels.get(max_difficulty.min(hardest)) else {
            continue;
        };
        copy_window(&source.notes, &mut merged.notes, &window);
        copy_window(&source.chords, &mut merged.chords, &window);
        copy_window(&source.anchors, &mut merged.anchors, &window);
        copy_window(&source.hand_shapes, &mut merged.hand_shapes, &window);
    }
    merged
}

/// Replaces the phrases with one phrase per distinct section name, between `COUNT` and `END`.
fn regenerate_phrases(arrangement: &mut Arrangement) {
    let Some(last) = arrangement.sections.last() else {
        return;
    };
    let end_on_last = last.is_noguitar();
    let end_time = if end_on_last {
        last.time
    } else {
        arrangement.metadata.song_length
    };
    let count_time = arrangement.ebeats.first().map_or(0.0, |beat| beat.time);

    let mut phrases = vec![Phrase::new("COUNT", 0)];
    let mut iterations = Vec::new();
    if arrangement
        .sections
        .first()
        .is_some_and(|first| first.time > count_time && !time_equal(first.time, count_time))
    {
        iterations.push(PhraseIteration::new(count_time, 0));
    }
    let section_count = arrangement.sections.len() - usize::from(end_on_last);
    for section in &arrangement.sections[..section_count] {
        let existing = phrases
            .iter()
            .position(|phrase| phrase.name == section.name);
        let id = existing.unwrap_or_else(|| {
            phrases.push(Phrase::new(section.name.clone(), 0));
            phrases.len() - 1
        });
        iterations.push(PhraseIteration::new(section.time, id as u32));
    }
    phrases.push(Phrase::new("END", 0));
    iterations.push(PhraseIteration::new(end_time, (phrases.len() - 1) as u32));

    arrangement.phrases = phrases;
    arrangement.phrase_iterations = iterations;
    arrangement.new_linked_diffs.clear();
}

/// Replaces the generator comments with one recording the removal.
fn record_removal(arrangement: &mut Arrangement) {
    let previous: Vec<String> = arrangement
        .comments
        .iter()
        .filter(|comment| ToolComment::classify(comment).implies_generated_levels())
        .map(|comment| comment.trim().to_string())
        .collect();
    arrangement
        .comments
        .retain(|comment| !ToolComment::classify(comment).implies_generated_levels());
    let comment = if previous.is_empty() {
        format!(" DDC Improver {VERSION} removed DD ")
    } else {
        format!(
            " DDC Improver {VERSION} removed DD (was: {}) ",
            previous.join("; ")
        )
    };
    arrangement.comments.push(comment);
}

impl ProcessBlock for DdRemover {
    fn name(&self) -> &'static str {
        "DD remover"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let level_count = arrangement.levels.len();
        let merged = merge_levels(arrangement);
        arrangement.transcription_track = Some(Level {
            difficulty: -1,
            ..merged.clone()
        });
        arrangement.levels = vec![merged];

        if context.config().regenerate_phrases_from_sections && !arrangement.sections.is_empty() {
            regenerate_phrases(arrangement);
            context.log(format!(
                "Regenerated {} phrases from the sections.",
                arrangement.phrases.len()
            ));
        } else {
            for phrase in &mut arrangement.phrases {
                phrase.max_difficulty = 0;
            }
            for iteration in &mut arrangement.phrase_iterations {
                iteration.hero_levels = None;
            }
        }

        record_removal(arrangement);
        context.log(format!("Removed DD: merged {level_count} levels into one."));
        Ok(())
    }
}
