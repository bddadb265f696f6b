use super::{Issue, IssueKind, NEAR_DISTANCE};
use crate::{
    model::Level,
    time::{sec_to_ms, time_equal},
};

/// Scans the anchors and the note onsets together. Both are sorted, so the onset cursor only moves forward.
pub(super) fn check(level: &Level, issues: &mut Vec<Issue>) {
    let onsets = level.onset_times();
    let mut cursor = 0;
    for anchor in &level.anchors {
        while onsets
            .get(cursor)
            .is_some_and(|&onset| onset < anchor.time - NEAR_DISTANCE)
        {
            cursor += 1;
        }

        let mut nearest: Option<f32> = None;
        for &onset in onsets[cursor..]
            .iter()
            .take_while(|&&onset| onset <= anchor.time + NEAR_DISTANCE)
        {
            if time_equal(onset, anchor.time) {
                nearest = None;
                break;
            }
            let distance = onset - anchor.time;
            if nearest.is_none_or(|nearest| distance.abs() < nearest.abs()) {
                nearest = Some(distance);
            }
        }

        if let Some(distance) = nearest {
            issues.push(Issue::new(
                IssueKind::AnchorNotOnNote(sec_to_ms(distance.abs())),
                anchor.time,
            ));
        }
    }
}
