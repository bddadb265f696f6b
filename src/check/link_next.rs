use super::{Issue, IssueKind};
use crate::{
    model::{Level, Note},
    time::time_equal,
};

/// Longer gaps mean the generator left a stale link-next on a note which no longer links.
const MAX_LINK_GAP: f32 = 0.001;

fn hundredths(step: f32) -> i32 {
    (step * 100.0).round() as i32
}

fn next_on_string<'a>(notes: &[&'a Note], index: usize) -> Option<&'a Note> {
    let note = notes[index];
    notes[index + 1..]
        .iter()
        .copied()
        .filter(|next| next.time > note.time && !time_equal(next.time, note.time))
        .find(|next| next.string == note.string)
}

pub(super) fn check(level: &Level, issues: &mut Vec<Issue>) {
    let notes: Vec<&Note> = level.all_notes().map(|(note, _)| note).collect();
    for (index, note) in notes.iter().enumerate() {
        if !note.is_link_next() {
            continue;
        }
        let Some(next) = next_on_string(&notes, index) else {
            issues.push(Issue::new(
                IssueKind::LinkNextMissingTarget {
                    string: note.string,
                },
                note.time,
            ));
            continue;
        };
        if next.time - note.end_time() > MAX_LINK_GAP {
            continue;
        }

        if next.fret != note.fret {
            let slide_to = if note.is_slide() {
                Some(note.slide_to)
            } else if note.is_unpitched_slide() {
                Some(note.slide_unpitch_to)
            } else {
                None
            };
            match slide_to {
                None => issues.push(Issue::new(
                    IssueKind::LinkNextFretMismatch {
                        fret: note.fret,
                        next_fret: next.fret,
                    },
                    note.time,
                )),
                Some(slide_to) if slide_to != next.fret => issues.push(Issue::new(
                    IssueKind::LinkNextSlideMismatch {
                        slide_to,
                        next_fret: next.fret,
                    },
                    note.time,
                )),
                Some(_) => {}
            }
        }

        if let Some(last) = note.bend_values.last() {
            let next_step = next
                .bend_values
                .first()
                .filter(|bend| time_equal(bend.time, next.time))
                .map_or(0.0, |bend| bend.step);
            if hundredths(last.step) != hundredths(next_step) {
                issues.push(Issue::new(
                    IssueKind::LinkNextBendMismatch {
                        step: hundredths(last.step),
                        next_step: hundredths(next_step),
                    },
                    note.time,
                ));
            }
        }
    }
}
