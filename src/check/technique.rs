use super::{Issue, IssueKind};
use crate::{
    model::{Arrangement, Level},
    time::time_equal,
};

pub(super) fn check_notes(level: &Level, issues: &mut Vec<Issue>) {
    for (note, _) in level.all_notes() {
        if note.is_harmonic() && note.is_harmonic_pinch() {
            issues.push(Issue::new(IssueKind::HarmonicWithPinchHarmonic, note.time));
        }
        if note.fret >= 23 && !note.is_ignore() {
            issues.push(Issue::new(
                IssueKind::HighFretWithoutIgnore(note.fret),
                note.time,
            ));
        }
        if note.fret == 7 && note.is_harmonic() && note.sustain > 0.0 && !note.is_ignore() {
            issues.push(Issue::new(
                IssueKind::SeventhFretHarmonicWithSustain,
                note.time,
            ));
        }
        if note.is_unpitched_slide() && note.is_link_next() {
            issues.push(Issue::new(IssueKind::UnpitchedSlideWithLinkNext, note.time));
        }
    }
}

pub(super) fn check_tone_changes(arrangement: &Arrangement, issues: &mut Vec<Issue>) {
    for change in &arrangement.tones.changes {
        if arrangement
            .levels
            .iter()
            .any(|level| level.has_onset_at(change.time))
        {
            issues.push(Issue::new(
                IssueKind::ToneChangeOnNote(change.name.clone()),
                change.time,
            ));
        }
    }
}

/// Start and end of each noguitar section. The last section lasts until the end of the song.
fn noguitar_windows(arrangement: &Arrangement) -> Vec<(f32, f32)> {
    let sections = &arrangement.sections;
    sections
        .iter()
        .enumerate()
        .filter(|(_, section)| section.is_noguitar())
        .map(|(index, section)| {
            let end = sections
                .get(index + 1)
                .map_or(arrangement.metadata.song_length, |next| next.time);
            (section.time, end)
        })
        .collect()
}

pub(super) fn check_noguitar(arrangement: &Arrangement, level: &Level, issues: &mut Vec<Issue>) {
    let windows = noguitar_windows(arrangement);
    if windows.is_empty() {
        return;
    }
    let inside = |time: f32| {
        windows.iter().any(|&(start, end)| {
            (time > start || time_equal(time, start)) && time < end && !time_equal(time, end)
        })
    };
    for time in level.onset_times() {
        if inside(time) {
            issues.push(Issue::new(IssueKind::NoteInsideNoguitarSection, time));
        }
    }
}
