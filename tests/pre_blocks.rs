use ddc_improver::{
    message::Severity,
    model::{
        Anchor, Arrangement, ChordTemplate, Ebeat, Event, Level, Note, Phrase, PhraseIteration,
        Section, TEMPORARY_BEAT, ToolComment, WEAK_BEAT,
    },
    process::{ProcessBlock, ProcessConfig, ProcessContext, pre::*},
};
use pretty_assertions::assert_eq;
use std::sync::LazyLock;

static DEFAULT_CONFIG: LazyLock<ProcessConfig> = LazyLock::new(ProcessConfig::default);

fn apply(block: impl ProcessBlock, arrangement: &mut Arrangement) -> ProcessContext<'static> {
    apply_with(block, arrangement, &DEFAULT_CONFIG)
}

fn apply_with<'a>(
    block: impl ProcessBlock,
    arrangement: &mut Arrangement,
    config: &'a ProcessConfig,
) -> ProcessContext<'a> {
    let mut context = ProcessContext::new(config);
    block
        .apply(arrangement, &mut context)
        .expect("block must succeed");
    context
}

fn beats(times: &[f32]) -> Vec<Ebeat> {
    times.iter().map(|&time| Ebeat::new(time, WEAK_BEAT)).collect()
}

fn beat_times(arrangement: &Arrangement) -> Vec<f32> {
    arrangement.ebeats.iter().map(|beat| beat.time).collect()
}

#[test]
fn test_one_fret_chord() {
    let mut arrangement = Arrangement {
        chord_templates: vec![ChordTemplate::new("OF3", [-1, -1, 8, -1, -1, -1])],
        ..Arrangement::default()
    };
    let context = apply(ChordNameProcessor, &mut arrangement);

    let template = &arrangement.chord_templates[0];
    assert_eq!(template.name, "");
    assert_eq!(template.display_name, "");
    assert_eq!(template.frets, [-1, -1, 3, -1, -1, -1]);
    assert_eq!(context.log.lines().len(), 1);
}

#[test]
fn test_one_fret_chord_drops_open_strings() {
    let mut template = ChordTemplate::new("G5OF5", [3, 5, 5, 0, -1, -1]);
    template.fingers = [1, 3, 4, 0, -1, -1];
    let mut arrangement = Arrangement {
        chord_templates: vec![template],
        ..Arrangement::default()
    };
    apply(ChordNameProcessor, &mut arrangement);

    let template = &arrangement.chord_templates[0];
    assert_eq!(template.frets, [5, 5, 5, -1, -1, -1]);
    assert_eq!(template.fingers, [1, 3, 4, -1, -1, -1]);
}

#[test]
fn test_invalid_one_fret_is_kept() {
    let original = ChordTemplate::new("C5OF30", [3, 5, -1, -1, -1, -1]);
    let mut arrangement = Arrangement {
        chord_templates: vec![original.clone()],
        ..Arrangement::default()
    };
    let context = apply(ChordNameProcessor, &mut arrangement);

    assert_eq!(arrangement.chord_templates[0], original);
    assert!(context.messages.any(Severity::Warning));
}

#[test]
fn test_chord_names_are_normalized_and_logged_once() {
    let mut arrangement = Arrangement {
        chord_templates: vec![
            ChordTemplate::new("Amin7CONV", [-1, 0, 2, 0, 1, 0]),
            ChordTemplate::new("Amin7CONV", [5, 7, 5, 5, 5, 5]),
            ChordTemplate::new("E5-nop", [0, 2, -1, -1, -1, -1]),
            ChordTemplate::new("D", [-1, -1, 0, 2, 3, 2]),
        ],
        ..Arrangement::default()
    };
    let context = apply(ChordNameProcessor, &mut arrangement);

    let names: Vec<_> = arrangement
        .chord_templates
        .iter()
        .map(|t| (t.name.as_str(), t.display_name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Am7", "Am7-arp"),
            ("Am7", "Am7-arp"),
            ("E5", "E5"),
            ("D", "D"),
        ]
    );
    assert_eq!(context.log.lines().len(), 2);
}

#[test]
fn test_extraneous_beats_snap_to_end() {
    let mut arrangement = Arrangement {
        ebeats: beats(&[8.0, 9.0, 10.4, 11.0]),
        ..Arrangement::default()
    };
    arrangement.metadata.song_length = 10.0;
    let context = apply(ExtraneousBeatsRemover, &mut arrangement);

    assert_eq!(beat_times(&arrangement), vec![8.0, 9.0, 10.0]);
    assert_eq!(context.log.lines().len(), 1);
}

#[test]
fn test_extraneous_beats_keep_last_inside() {
    let mut arrangement = Arrangement {
        ebeats: beats(&[9.0, 9.8, 10.6]),
        ..Arrangement::default()
    };
    arrangement.metadata.song_length = 10.0;
    apply(ExtraneousBeatsRemover, &mut arrangement);

    assert_eq!(beat_times(&arrangement), vec![9.0, 9.8]);
}

#[test]
fn test_beats_inside_audio_untouched() {
    let mut arrangement = Arrangement {
        ebeats: beats(&[8.0, 9.0, 10.0]),
        ..Arrangement::default()
    };
    arrangement.metadata.song_length = 10.0;
    let context = apply(ExtraneousBeatsRemover, &mut arrangement);

    assert_eq!(beat_times(&arrangement), vec![8.0, 9.0, 10.0]);
    assert!(context.log.is_empty());
}

#[test]
fn test_removebeats_event() {
    let mut arrangement = Arrangement {
        ebeats: beats(&[4.0, 5.0, 6.0]),
        events: vec![Event::new("E3", 1.0), Event::new("removebeats", 5.0)],
        ..Arrangement::default()
    };
    apply(RemoveBeatsProcessor, &mut arrangement);

    assert_eq!(beat_times(&arrangement), vec![4.0]);
    assert_eq!(arrangement.events, vec![Event::new("E3", 1.0)]);
}

#[test]
fn test_time_signature_events_removed() {
    let mut arrangement = Arrangement {
        events: vec![Event::new("TS:4/4", 1.0), Event::new("E3", 1.0)],
        ..Arrangement::default()
    };
    apply(TimeSignatureEventRemover, &mut arrangement);

    assert_eq!(arrangement.events, vec![Event::new("E3", 1.0)]);
}

#[test]
fn test_crowd_events_added() {
    let mut arrangement = Arrangement {
        phrase_iterations: vec![
            PhraseIteration::new(1.0, 0),
            PhraseIteration::new(5.0, 1),
            PhraseIteration::new(17.0, 2),
        ],
        events: vec![Event::new("B0", 3.0)],
        ..Arrangement::default()
    };
    apply(CrowdEventAdder, &mut arrangement);

    assert_eq!(
        arrangement.events,
        vec![
            Event::new("E3", 1.0),
            Event::new("B0", 3.0),
            Event::new("E13", 5.0),
            Event::new("D3", 17.0),
        ]
    );
}

#[test]
fn test_crowd_events_not_added_twice() {
    let mut arrangement = Arrangement {
        phrase_iterations: vec![PhraseIteration::new(1.0, 0), PhraseIteration::new(5.0, 1)],
        events: vec![Event::new("e0", 3.0)],
        ..Arrangement::default()
    };
    apply(CrowdEventAdder, &mut arrangement);

    assert_eq!(arrangement.events, vec![Event::new("e0", 3.0)]);
}

fn movable(name: &str) -> Arrangement {
    let mut level = Level::new(0);
    level.notes = vec![
        Note::new(5.0, 0, 3),
        Note::new(5.5, 0, 5),
        Note::new(6.0, 0, 7),
    ];
    level.anchors = vec![Anchor::new(4.5, 3)];
    Arrangement {
        phrases: vec![
            Phrase::new("COUNT", 0),
            Phrase::new(name, 0),
            Phrase::new("END", 0),
        ],
        phrase_iterations: vec![
            PhraseIteration::new(1.0, 0),
            PhraseIteration::new(4.5, 1),
            PhraseIteration::new(9.0, 2),
        ],
        sections: vec![Section::new("verse", 1, 4.5)],
        ebeats: beats(&[4.5, 7.0]),
        levels: vec![level],
        ..Arrangement::default()
    }
}

#[test]
fn test_move_to_absolute_time() {
    let mut arrangement = movable("moveto6s0");
    let context = apply(PhraseMover, &mut arrangement);

    assert_eq!(arrangement.phrase_iterations[1].time, 6.0);
    assert_eq!(arrangement.phrases[1].name, "moveto6s0");
    assert_eq!(arrangement.sections[0].time, 6.0);
    assert_eq!(arrangement.levels[0].anchors, vec![Anchor::new(6.0, 3)]);
    assert_eq!(
        arrangement.ebeats,
        vec![
            Ebeat::new(4.5, WEAK_BEAT),
            Ebeat::new(6.0, TEMPORARY_BEAT),
            Ebeat::new(7.0, WEAK_BEAT),
        ]
    );
    assert_eq!(
        context.log.lines(),
        [
            "Moved the anchor on level 0 from 4500 ms to 6000 ms.",
            "Moved phrase iteration 1 from 4500 ms to 6000 ms.",
        ]
    );
}

#[test]
fn test_move_by_note_count() {
    let mut arrangement = movable("moveR2");
    apply(PhraseMover, &mut arrangement);

    assert_eq!(arrangement.phrase_iterations[1].time, 5.5);
    assert_eq!(arrangement.sections[0].time, 5.5);
}

#[test]
fn test_move_keeps_anchor_on_note() {
    let mut arrangement = movable("moveR1");
    arrangement.levels[0].anchors = vec![Anchor::new(5.0, 3)];
    arrangement.phrase_iterations[1].time = 5.0;
    apply(PhraseMover, &mut arrangement);

    assert_eq!(arrangement.phrase_iterations[1].time, 5.5);
    assert_eq!(
        arrangement.levels[0].anchors,
        vec![Anchor::new(5.0, 3), Anchor::new(5.5, 3)]
    );
}

#[test]
fn test_unparsable_move_warns() {
    let mut arrangement = movable("moveto1m");
    let context = apply(PhraseMover, &mut arrangement);

    assert_eq!(arrangement.phrase_iterations[1].time, 4.5);
    let warning = context.messages.first().expect("a warning");
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.time_code, Some(4500));
}

#[test]
fn test_move_past_last_note_warns() {
    let mut arrangement = movable("moveR9");
    let context = apply(PhraseMover, &mut arrangement);

    assert_eq!(arrangement.phrase_iterations[1].time, 4.5);
    assert!(context.messages.any(Severity::Warning));
}

fn with_dd() -> Arrangement {
    let mut easy = Level::new(0);
    easy.notes = vec![Note::new(1.0, 0, 3)];
    let mut hard = Level::new(1);
    hard.notes = vec![Note::new(1.0, 0, 5), Note::new(2.0, 0, 7)];
    hard.anchors = vec![Anchor::new(1.0, 5)];
    let mut riff = Phrase::new("riff", 1);
    riff.set_solo(true);
    Arrangement {
        comments: vec![" DDC v3.2 ".into(), " EOF v1.8c ".into()],
        phrases: vec![riff, Phrase::new("END", 0)],
        phrase_iterations: vec![PhraseIteration::new(0.0, 0), PhraseIteration::new(4.0, 1)],
        levels: vec![easy, hard],
        ..Arrangement::default()
    }
}

#[test]
fn test_dd_removal() {
    let mut arrangement = with_dd();
    let context = apply(DdRemover, &mut arrangement);

    assert_eq!(arrangement.levels.len(), 1);
    let level = &arrangement.levels[0];
    assert_eq!(level.difficulty, 0);
    assert_eq!(level.notes.len(), 2);
    assert_eq!(level.notes[0].fret, 5);
    assert_eq!(level.anchors, vec![Anchor::new(1.0, 5)]);
    assert!(arrangement.phrases[0].is_solo());
    assert_eq!(arrangement.phrases[0].max_difficulty, 0);
    assert!(!arrangement.has_dynamic_difficulty());

    let comments: Vec<_> = arrangement.tool_comments().collect();
    assert_eq!(comments, vec![ToolComment::Eof, ToolComment::DdRemover]);
    assert!(arrangement.comments[1].contains("(was: DDC v3.2)"));
    assert!(!context.log.is_empty());
}

#[test]
fn test_dd_removal_regenerates_phrases() {
    let mut arrangement = with_dd();
    arrangement.ebeats = beats(&[1.0, 2.0]);
    arrangement.sections = vec![
        Section::new("verse", 1, 2.0),
        Section::new("chorus", 1, 6.0),
        Section::new("verse", 2, 10.0),
        Section::new("noguitar", 1, 14.0),
    ];
    let config = ProcessConfig::default().with_regenerate_phrases_from_sections(true);
    apply_with(DdRemover, &mut arrangement, &config);

    let names: Vec<_> = arrangement.phrases.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["COUNT", "verse", "chorus", "END"]);
    let iterations: Vec<_> = arrangement
        .phrase_iterations
        .iter()
        .map(|pi| (pi.time, pi.phrase_id))
        .collect();
    assert_eq!(
        iterations,
        vec![(1.0, 0), (2.0, 1), (6.0, 2), (10.0, 1), (14.0, 3)]
    );
}

#[test]
fn test_state_preserved() {
    let mut level = Level::new(0);
    level.anchors = vec![Anchor::new(0.0, 1), Anchor::new(3.0, 5)];
    let mut arrangement = Arrangement {
        sections: vec![Section::new("noguitar", 1, 0.0), Section::new("riff", 1, 3.0)],
        events: vec![Event::new("E3", 0.0)],
        levels: vec![level],
        ..Arrangement::default()
    };
    let context = apply(StatePreserver, &mut arrangement);

    let preserved = &context.preserved;
    assert_eq!(preserved.events, arrangement.events);
    assert_eq!(preserved.noguitar_anchors, vec![Anchor::new(0.0, 1)]);
    assert_eq!(
        preserved.first_noguitar_section,
        Some(Section::new("noguitar", 1, 0.0))
    );
}

#[test]
fn test_checker_reports_issues() {
    let mut level = Level::new(0);
    level.notes = vec![Note::new(1.0, 0, 23)];
    let mut arrangement = Arrangement {
        levels: vec![level],
        ..Arrangement::default()
    };
    let context = apply(ArrangementChecker, &mut arrangement);

    let message = context.messages.first().expect("an issue");
    assert_eq!(message.severity, Severity::Issue);
    assert_eq!(message.time_code, Some(1000));
}
