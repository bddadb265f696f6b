use super::{Issue, IssueKind};
use crate::{
    model::{Anchor, Arrangement, HandShape, Level},
    time::time_equal,
};

fn same_anchor(a: Option<&Anchor>, b: Option<&Anchor>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => time_equal(a.time, b.time) && a.fret == b.fret,
        _ => false,
    }
}

pub(super) fn check(arrangement: &Arrangement, level: &Level, issues: &mut Vec<Issue>) {
    let template_of = |hand_shape: &HandShape| {
        usize::try_from(hand_shape.chord_id)
            .ok()
            .and_then(|id| arrangement.chord_templates.get(id))
    };
    let needs_first_finger = |hand_shape: Option<&HandShape>, anchor: Option<&Anchor>| {
        hand_shape.is_some_and(|hand_shape| {
            template_of(hand_shape).is_some_and(|t| t.uses_first_finger())
                && same_anchor(level.active_anchor(hand_shape.start_time), anchor)
        })
    };

    for (index, hand_shape) in level.hand_shapes.iter().enumerate() {
        let Some(template) = template_of(hand_shape) else {
            continue;
        };
        if template.uses_first_finger() {
            continue;
        }
        let anchor = level.active_anchor(hand_shape.start_time);
        let Some(anchor_fret) = anchor.map(|anchor| anchor.fret) else {
            continue;
        };
        let Some((_, _, finger)) = template
            .used_strings()
            .find(|&(_, fret, finger)| fret == anchor_fret && fret > 0 && finger > 1)
        else {
            continue;
        };

        let previous = index
            .checked_sub(1)
            .and_then(|previous| level.hand_shapes.get(previous));
        let next = level.hand_shapes.get(index + 1);
        if needs_first_finger(previous, anchor) || needs_first_finger(next, anchor) {
            continue;
        }

        issues.push(Issue::new(
            IssueKind::FingeringAnchorMismatch {
                fret: anchor_fret,
                finger,
            },
            hand_shape.start_time,
        ));
    }
}
