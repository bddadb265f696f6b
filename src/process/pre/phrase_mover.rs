use crate::{
    command::MoveCommand,
    model::{Arrangement, Ebeat, TEMPORARY_BEAT},
    process::{ProcessBlock, ProcessContext, ProcessError},
    time::{
        contains_time, find_index_by_time, insert_by_time, ms_to_sec, sec_to_ms, sort_by_time,
        time_equal,
    },
};

/// Moves the phrases named with a move command.
///
/// Anchors and sections at the old time move along, and a temporary beat is placed at the new time so that the generator starts the phrase there.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseMover;

struct Move {
    iteration: usize,
    from: f32,
    to: f32,
    max_difficulty: usize,
}

/// The time of the `count`-th distinct onset after `from`.
fn relative_destination(arrangement: &Arrangement, from: f32, count: u32, level: usize) -> Option<f32> {
    let level = arrangement.levels.get(level)?;
    level
        .onset_times()
        .into_iter()
        .filter(|&onset| onset > from && !time_equal(onset, from))
        .nth(count.checked_sub(1)? as usize)
}

fn plan_moves(arrangement: &Arrangement, context: &mut ProcessContext<'_>) -> Vec<Move> {
    let hardest = arrangement.levels.len().saturating_sub(1);
    let mut moves = Vec::new();
    for (index, iteration) in arrangement.phrase_iterations.iter().enumerate() {
        let Some(phrase) = arrangement.phrase_of(iteration) else {
            continue;
        };
        let max_difficulty = usize::from(phrase.max_difficulty).min(hardest);
        let to = match MoveCommand::parse(&phrase.name) {
            None => continue,
            Some(Err(error)) => {
                context.warn(error.to_string(), Some(iteration.time));
                continue;
            }
            Some(Ok(MoveCommand::Absolute(ms))) => ms_to_sec(ms),
            Some(Ok(MoveCommand::Relative(count))) => {
                let Some(to) =
                    relative_destination(arrangement, iteration.time, count, max_difficulty)
                else {
                    context.warn(
                        format!(
                            "Phrase `{}` cannot move forward by {count} notes.",
                            phrase.name
                        ),
                        Some(iteration.time),
                    );
                    continue;
                };
                to
            }
        };
        moves.push(Move {
            iteration: index,
            from: iteration.time,
            to,
            max_difficulty,
        });
    }
    moves
}

fn move_anchors(arrangement: &mut Arrangement, movement: &Move, context: &mut ProcessContext<'_>) {
    for level in arrangement.levels.iter_mut().take(movement.max_difficulty + 1) {
        let Some(index) = find_index_by_time(&level.anchors, movement.from) else {
            continue;
        };
        if contains_time(&level.anchors, movement.to) {
            continue;
        }
        let mut anchor = level.anchors[index];
        if !level.has_onset_at(movement.from) {
            level.anchors.remove(index);
        }
        anchor.time = movement.to;
        insert_by_time(&mut level.anchors, anchor);
        context.log(format!(
            "Moved the anchor on level {} from {} ms to {} ms.",
            level.difficulty,
            sec_to_ms(movement.from),
            sec_to_ms(movement.to)
        ));
    }
}

impl ProcessBlock for PhraseMover {
    fn name(&self) -> &'static str {
        "phrase mover"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let moves = plan_moves(arrangement, context);
        for movement in &moves {
            move_anchors(arrangement, movement, context);
            for section in &mut arrangement.sections {
                if time_equal(section.time, movement.from) {
                    section.time = movement.to;
                }
            }
            if !contains_time(&arrangement.ebeats, movement.to) {
                insert_by_time(
                    &mut arrangement.ebeats,
                    Ebeat::new(movement.to, TEMPORARY_BEAT),
                );
            }
            arrangement.phrase_iterations[movement.iteration].time = movement.to;
            context.log(format!(
                "Moved phrase iteration {} from {} ms to {} ms.",
                movement.iteration,
                sec_to_ms(movement.from),
                sec_to_ms(movement.to)
            ));
        }
        if !moves.is_empty() {
            sort_by_time(&mut arrangement.phrase_iterations);
            sort_by_time(&mut arrangement.sections);
        }
        Ok(())
    }
}
