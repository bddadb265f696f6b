use super::{Issue, IssueKind};
use crate::model::{Arrangement, crowd};

pub(super) fn check(arrangement: &Arrangement, issues: &mut Vec<Issue>) {
    let mut intro_start = None;
    let mut intro_end = None;
    let mut outro_seen = false;

    for event in &arrangement.events {
        let code = event.code.as_str();
        match code {
            crowd::INTRO_APPLAUSE => {
                if intro_start.is_some() {
                    issues.push(Issue::new(
                        IssueKind::DuplicateCrowdEvent(code.to_string()),
                        event.time,
                    ));
                } else {
                    intro_start = Some(event.time);
                }
            }
            crowd::INTRO_APPLAUSE_END => {
                if intro_end.is_some() {
                    issues.push(Issue::new(
                        IssueKind::DuplicateCrowdEvent(code.to_string()),
                        event.time,
                    ));
                } else if intro_start.is_none() {
                    issues.push(Issue::new(
                        IssueKind::IntroApplauseEndBeforeStart,
                        event.time,
                    ));
                    intro_end = Some(event.time);
                } else {
                    intro_end = Some(event.time);
                }
            }
            crowd::OUTRO_APPLAUSE => {
                if outro_seen {
                    issues.push(Issue::new(
                        IssueKind::DuplicateCrowdEvent(code.to_string()),
                        event.time,
                    ));
                }
                outro_seen = true;
            }
            _ if intro_start.is_some() && intro_end.is_none() => {
                let kind = if crowd::TEMPO.contains(&code) {
                    IssueKind::CrowdTempoInsideIntroApplause(code.to_string())
                } else {
                    IssueKind::UnexpectedEventInsideIntroApplause(code.to_string())
                };
                issues.push(Issue::new(kind, event.time));
            }
            _ => {}
        }
    }

    if let (Some(start), None) = (intro_start, intro_end) {
        issues.push(Issue::new(IssueKind::IntroApplauseWithoutEnd, start));
    }
}
