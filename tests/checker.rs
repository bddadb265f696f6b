use ddc_improver::{
    check::{IssueKind, check_arrangement},
    message::Severity,
    model::{
        Anchor, Arrangement, BendValue, Chord, ChordTemplate, Event, HandShape, Level, Note,
        Section, ToneChange,
    },
    xml::decode_str,
};
use pretty_assertions::assert_eq;

fn with_level(level: Level) -> Arrangement {
    Arrangement {
        levels: vec![level],
        ..Arrangement::default()
    }
}

fn linked(time: f32, string: i8, fret: i8, sustain: f32) -> Note {
    let mut note = Note::new(time, string, fret).with_sustain(sustain);
    note.set_link_next(true);
    note
}

fn kinds(arrangement: &Arrangement) -> Vec<IssueKind> {
    check_arrangement(arrangement)
        .into_iter()
        .map(|issue| issue.kind)
        .collect()
}

#[test]
fn test_clean_fixture() {
    let arrangement = decode_str(include_str!("files/lead.xml")).expect("must be decoded");
    assert_eq!(check_arrangement(&arrangement), Vec::new());
}

#[test]
fn test_link_next_bend_mismatch() {
    let mut bent = linked(1.0, 2, 7, 0.5);
    bent.bend_values = vec![BendValue::new(1.2, 1.0)];
    let mut level = Level::new(0);
    level.notes = vec![bent, Note::new(1.5, 2, 7)];

    let issues = check_arrangement(&with_level(level));
    assert_eq!(issues.len(), 1);
    assert_eq!(
        issues[0].kind,
        IssueKind::LinkNextBendMismatch {
            step: 100,
            next_step: 0
        }
    );
    assert_eq!(issues[0].time_code(), 1000);
}

#[test]
fn test_link_next_bend_continues() {
    let mut bent = linked(1.0, 2, 7, 0.5);
    bent.bend_values = vec![BendValue::new(1.2, 1.0)];
    let mut next = Note::new(1.5, 2, 7).with_sustain(0.5);
    next.bend_values = vec![BendValue::new(1.5, 1.0), BendValue::new(1.8, 0.0)];
    let mut level = Level::new(0);
    level.notes = vec![bent, next];

    assert_eq!(kinds(&with_level(level)), Vec::<IssueKind>::new());
}

#[test]
fn test_link_next_without_target() {
    let mut level = Level::new(0);
    level.notes = vec![linked(1.0, 3, 5, 0.5), Note::new(1.5, 2, 5)];
    assert_eq!(
        kinds(&with_level(level)),
        vec![IssueKind::LinkNextMissingTarget { string: 3 }]
    );
}

#[test]
fn test_link_next_fret_and_slide() {
    let mut level = Level::new(0);
    let mut slide = linked(3.0, 1, 5, 0.5);
    slide.slide_to = 9;
    level.notes = vec![
        linked(1.0, 0, 5, 0.5),
        Note::new(1.5, 0, 7),
        slide,
        Note::new(3.5, 1, 7),
    ];
    assert_eq!(
        kinds(&with_level(level)),
        vec![
            IssueKind::LinkNextFretMismatch {
                fret: 5,
                next_fret: 7
            },
            IssueKind::LinkNextSlideMismatch {
                slide_to: 9,
                next_fret: 7
            },
        ]
    );
}

#[test]
fn test_link_next_through_chord_notes() {
    let mut chord = Chord::new(1.0, 0);
    chord.chord_notes = vec![linked(1.0, 0, 5, 0.5), Note::new(1.0, 1, 7).with_sustain(0.5)];
    let mut level = Level::new(0);
    level.chords = vec![chord];
    level.notes = vec![Note::new(1.5, 0, 5)];
    level.hand_shapes = vec![HandShape::new(0, 1.0, 2.0)];

    let mut arrangement = with_level(level);
    arrangement.chord_templates = vec![ChordTemplate::new("A5", [5, 7, -1, -1, -1, -1])];
    assert_eq!(kinds(&arrangement), Vec::<IssueKind>::new());
}

#[test]
fn test_note_techniques() {
    let mut pinch = Note::new(1.0, 0, 12);
    pinch.set_harmonic(true);
    pinch.set_harmonic_pinch(true);
    let mut seventh = Note::new(2.0, 1, 7).with_sustain(1.0);
    seventh.set_harmonic(true);
    let mut high_ignored = Note::new(4.0, 0, 24);
    high_ignored.set_ignore(true);
    let mut level = Level::new(0);
    level.notes = vec![pinch, seventh, Note::new(3.0, 0, 23), high_ignored];

    assert_eq!(
        kinds(&with_level(level)),
        vec![
            IssueKind::HarmonicWithPinchHarmonic,
            IssueKind::SeventhFretHarmonicWithSustain,
            IssueKind::HighFretWithoutIgnore(23),
        ]
    );
}

#[test]
fn test_noguitar_and_tone_change() {
    let mut level = Level::new(0);
    level.notes = vec![Note::new(1.0, 0, 3), Note::new(6.0, 0, 3), Note::new(9.0, 0, 3)];
    let mut arrangement = with_level(level);
    arrangement.metadata.song_length = 12.0;
    arrangement.sections = vec![
        Section::new("verse", 1, 0.0),
        Section::new("noguitar", 1, 5.0),
        Section::new("verse", 2, 8.0),
    ];
    arrangement.tones.changes = vec![ToneChange {
        time: 9.0,
        id: 1,
        name: "lead".into(),
    }];

    let issues = check_arrangement(&arrangement);
    let found: Vec<_> = issues.iter().map(|i| (i.time_code(), i.kind.clone())).collect();
    assert_eq!(
        found,
        vec![
            (6000, IssueKind::NoteInsideNoguitarSection),
            (9000, IssueKind::ToneChangeOnNote("lead".into())),
        ]
    );
}

#[test]
fn test_crowd_events() {
    let mut arrangement = with_level(Level::new(0));
    arrangement.events = vec![
        Event::new("E3", 1.0),
        Event::new("e1", 2.0),
        Event::new("E3", 3.0),
        Event::new("D3", 30.0),
    ];
    assert_eq!(
        kinds(&arrangement),
        vec![
            IssueKind::IntroApplauseWithoutEnd,
            IssueKind::CrowdTempoInsideIntroApplause("e1".into()),
            IssueKind::DuplicateCrowdEvent("E3".into()),
        ]
    );
}

#[test]
fn test_intro_end_before_start() {
    let mut arrangement = with_level(Level::new(0));
    arrangement.events = vec![Event::new("E13", 1.0), Event::new("E3", 2.0)];
    assert_eq!(
        kinds(&arrangement),
        vec![IssueKind::IntroApplauseEndBeforeStart]
    );
}

#[test]
fn test_chord_sustains_and_hand_shape_end() {
    let mut varying = Chord::new(1.0, 0);
    varying.chord_notes = vec![
        Note::new(1.0, 0, 5).with_sustain(0.5),
        Note::new(1.0, 1, 7).with_sustain(0.25),
    ];
    let mut at_end = Chord::new(3.0, 0);
    at_end.chord_notes = vec![
        Note::new(3.0, 0, 5).with_sustain(1.0),
        Note::new(3.0, 1, 7).with_sustain(1.0),
    ];
    let mut level = Level::new(0);
    level.chords = vec![varying, at_end];
    level.hand_shapes = vec![HandShape::new(0, 1.0, 2.0), HandShape::new(0, 3.0, 4.0)];
    let mut arrangement = with_level(level);
    arrangement.chord_templates = vec![ChordTemplate::new("A5", [5, 7, -1, -1, -1, -1])];

    assert_eq!(
        kinds(&arrangement),
        vec![
            IssueKind::VaryingChordNoteSustains,
            IssueKind::ChordAtEndOfHandShape,
        ]
    );
}

#[test]
fn test_fingering_anchor_mismatch() {
    let mut template = ChordTemplate::new("D5", [-1, 5, 7, -1, -1, -1]);
    template.fingers = [-1, 2, 4, -1, -1, -1];
    let mut level = Level::new(0);
    level.anchors = vec![Anchor::new(1.0, 5)];
    level.hand_shapes = vec![HandShape::new(0, 1.0, 2.0)];
    let mut arrangement = with_level(level);
    arrangement.chord_templates = vec![template];

    assert_eq!(
        kinds(&arrangement),
        vec![IssueKind::FingeringAnchorMismatch { fret: 5, finger: 2 }]
    );
}

#[test]
fn test_fingering_next_to_first_finger_shape() {
    let mut middle = ChordTemplate::new("D5", [-1, 5, 7, -1, -1, -1]);
    middle.fingers = [-1, 2, 4, -1, -1, -1];
    let mut index = ChordTemplate::new("A5", [5, 7, -1, -1, -1, -1]);
    index.fingers = [1, 3, -1, -1, -1, -1];
    let mut level = Level::new(0);
    level.anchors = vec![Anchor::new(1.0, 5)];
    level.hand_shapes = vec![HandShape::new(1, 1.0, 2.0), HandShape::new(0, 2.5, 3.0)];
    let mut arrangement = with_level(level);
    arrangement.chord_templates = vec![middle, index];

    assert_eq!(kinds(&arrangement), Vec::<IssueKind>::new());
}

#[test]
fn test_anchor_near_note() {
    let mut level = Level::new(0);
    level.notes = vec![Note::new(1.003, 0, 5), Note::new(2.0, 0, 5)];
    level.anchors = vec![Anchor::new(1.0, 5), Anchor::new(2.0, 5), Anchor::new(3.0, 5)];
    let issues = check_arrangement(&with_level(level));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::AnchorNotOnNote(3));
    assert_eq!(issues[0].time_code(), 1000);
}

#[test]
fn test_deterministic_and_sorted() {
    let mut level = Level::new(0);
    level.notes = vec![
        linked(1.0, 3, 5, 0.5),
        Note::new(2.0, 0, 23),
        linked(0.5, 4, 5, 0.1),
    ];
    level.notes.sort_by(|a, b| a.time.total_cmp(&b.time));
    let arrangement = with_level(level);

    let first = check_arrangement(&arrangement);
    let second = arrangement.check();
    assert_eq!(first, second);
    let times: Vec<_> = first.iter().map(|issue| issue.time_code()).collect();
    assert_eq!(times, vec![500, 1000, 2000]);

    let message = first[2].to_status_message();
    assert_eq!(message.severity, Severity::Issue);
    assert_eq!(message.time_code, Some(2000));
}
