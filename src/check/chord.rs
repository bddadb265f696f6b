use super::{Issue, IssueKind, NEAR_DISTANCE};
use crate::{model::Level, time::time_equal};

pub(super) fn check(level: &Level, issues: &mut Vec<Issue>) {
    for chord in &level.chords {
        let mut sustains = chord.chord_notes.iter().map(|note| note.sustain);
        if let Some(first) = sustains.next()
            && sustains.any(|sustain| !time_equal(sustain, first))
        {
            issues.push(Issue::new(IssueKind::VaryingChordNoteSustains, chord.time));
        }

        let sustain = chord.sustain();
        if sustain <= 0.0 {
            continue;
        }
        let Some(hand_shape) = level.hand_shapes.iter().find(|hand_shape| {
            hand_shape.chord_id == chord.chord_id && hand_shape.contains(chord.time)
        }) else {
            continue;
        };
        let end = chord.end_time();
        if end > hand_shape.end_time - NEAR_DISTANCE || time_equal(end, hand_shape.end_time) {
            issues.push(Issue::new(IssueKind::ChordAtEndOfHandShape, chord.time));
        }
    }
}
