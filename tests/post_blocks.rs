use std::sync::LazyLock;

use ddc_improver::{
    message::Severity,
    model::{
        Anchor, Arrangement, BendValue, Chord, ChordTemplate, Ebeat, Event, HandShape, Level, Note,
        Phrase, PhraseIteration, Section, TEMPORARY_BEAT, ToolComment, WEAK_BEAT,
    },
    process::{ProcessBlock, ProcessConfig, ProcessContext, post::*},
    time::time_equal,
};
use pretty_assertions::assert_eq;

static DEFAULT_CONFIG: LazyLock<ProcessConfig> = LazyLock::new(ProcessConfig::default);

fn context() -> ProcessContext<'static> {
    ProcessContext::new(&DEFAULT_CONFIG)
}

fn run(block: &impl ProcessBlock, arrangement: &mut Arrangement, context: &mut ProcessContext<'_>) {
    block
        .apply(arrangement, context)
        .expect("block must succeed");
}

fn apply(block: impl ProcessBlock, arrangement: &mut Arrangement) -> ProcessContext<'static> {
    let mut context = context();
    run(&block, arrangement, &mut context);
    context
}

fn single_phrase(level: Level) -> Arrangement {
    Arrangement {
        phrases: vec![Phrase::new("riff", 0), Phrase::new("END", 0)],
        phrase_iterations: vec![PhraseIteration::new(0.0, 0), PhraseIteration::new(4.0, 1)],
        levels: vec![level],
        ..Arrangement::default()
    }
}

#[test]
fn test_temporary_beats_removed() {
    let mut arrangement = Arrangement {
        ebeats: vec![
            Ebeat::new(1.0, 1),
            Ebeat::new(1.5, TEMPORARY_BEAT),
            Ebeat::new(2.0, WEAK_BEAT),
        ],
        ..Arrangement::default()
    };
    let context = apply(TemporaryBeatRemover, &mut arrangement);

    assert_eq!(
        arrangement.ebeats,
        vec![Ebeat::new(1.0, 1), Ebeat::new(2.0, WEAK_BEAT)]
    );
    assert_eq!(context.log.lines(), ["Removed 1 temporary beats."]);
}

#[test]
fn test_one_level_phrase_gets_second_level() {
    let mut slide = Note::new(1.0, 0, 5).with_sustain(0.5);
    slide.set_link_next(true);
    slide.slide_to = 7;
    let mut vibrato = Note::new(1.5, 0, 7).with_sustain(0.5);
    vibrato.vibrato = 80;
    let mut level = Level::new(0);
    level.notes = vec![slide.clone(), vibrato.clone()];
    level.anchors = vec![Anchor::new(1.0, 5)];
    let mut arrangement = single_phrase(level);

    let context = apply(OneLevelPhraseFixer, &mut arrangement);

    assert_eq!(arrangement.levels.len(), 2);
    assert_eq!(arrangement.phrases[0].max_difficulty, 1);
    assert_eq!(arrangement.phrases[1].max_difficulty, 0);

    let hard = &arrangement.levels[1];
    assert_eq!(hard.difficulty, 1);
    assert_eq!(hard.notes, vec![slide, vibrato]);
    assert_eq!(hard.anchors, vec![Anchor::new(1.0, 5)]);

    let easy = &arrangement.levels[0];
    assert!(!easy.notes[0].is_link_next());
    assert_eq!(easy.notes[0].slide_to, -1);
    assert_eq!(easy.notes[0].sustain, 0.0);
    assert_eq!(easy.notes[1].vibrato, 0);
    assert_eq!(easy.notes[1].sustain, 0.0);
    assert_eq!(context.log.lines(), ["Added a second level to phrase `riff`."]);
}

#[test]
fn test_one_level_phrase_sustain_trimmed() {
    let mut bend = Note::new(1.0, 1, 7).with_sustain(3.0);
    bend.bend_values = vec![BendValue::new(1.0, 0.5), BendValue::new(2.0, 1.0)];
    let mut level = Level::new(0);
    level.notes = vec![bend.clone()];
    let mut arrangement = single_phrase(level);

    apply(OneLevelPhraseFixer, &mut arrangement);

    assert_eq!(arrangement.phrases[0].max_difficulty, 1);
    assert_eq!(arrangement.levels[1].notes, vec![bend]);
    let easy = &arrangement.levels[0].notes[0];
    assert_eq!(easy.sustain, 0.0);
    assert_eq!(easy.bend_values, vec![BendValue::new(1.0, 0.5)]);
}

#[test]
fn test_phrase_with_levels_untouched() {
    let mut level = Level::new(0);
    level.notes = vec![Note::new(1.0, 0, 5)];
    let mut arrangement = single_phrase(level);
    arrangement.phrases[0].max_difficulty = 3;
    let before = arrangement.clone();

    let context = apply(OneLevelPhraseFixer, &mut arrangement);
    assert_eq!(arrangement, before);
    assert!(context.log.is_empty());
}

fn with_hand_shapes(hand_shapes: Vec<HandShape>) -> Arrangement {
    let mut level = Level::new(0);
    level.hand_shapes = hand_shapes;
    Arrangement {
        ebeats: (0..8)
            .map(|beat| Ebeat::new(beat as f32 * 0.5, WEAK_BEAT))
            .collect(),
        levels: vec![level],
        ..Arrangement::default()
    }
}

#[test]
fn test_hand_shape_shortened_once() {
    let mut arrangement = with_hand_shapes(vec![
        HandShape::new(0, 1.0, 2.0),
        HandShape::new(1, 2.02, 3.0),
    ]);
    let mut context = context();
    run(&HandShapeAdjuster, &mut arrangement, &mut context);

    let end = arrangement.levels[0].hand_shapes[0].end_time;
    assert!(time_equal(end, 2.02 - 0.0625), "{end}");
    assert_eq!(context.log.lines().len(), 1);

    let adjusted = arrangement.clone();
    run(&HandShapeAdjuster, &mut arrangement, &mut context);
    assert_eq!(arrangement, adjusted);
    assert_eq!(context.log.lines().len(), 1);
}

#[test]
fn test_hand_shape_adjusted_once_across_tempo_change() {
    let mut arrangement = with_hand_shapes(vec![
        HandShape::new(0, 0.0, 1.01),
        HandShape::new(1, 1.02, 1.2),
    ]);
    arrangement.ebeats = [0.0, 1.0, 1.25, 1.5]
        .into_iter()
        .map(|time| Ebeat::new(time, WEAK_BEAT))
        .collect();
    let mut context = context();
    run(&HandShapeAdjuster, &mut arrangement, &mut context);

    let end = arrangement.levels[0].hand_shapes[0].end_time;
    assert!(time_equal(end, 1.02 - 0.03125), "{end}");
    assert_eq!(context.log.lines().len(), 1);

    let adjusted = arrangement.clone();
    run(&HandShapeAdjuster, &mut arrangement, &mut context);
    assert_eq!(arrangement, adjusted);
    assert_eq!(context.log.lines().len(), 1);
}

#[test]
fn test_nested_and_distant_hand_shapes_kept() {
    let hand_shapes = vec![
        HandShape::new(0, 1.0, 2.0),
        HandShape::new(1, 1.5, 1.8),
        HandShape::new(0, 2.5, 3.0),
    ];
    let mut arrangement = with_hand_shapes(hand_shapes.clone());
    apply(HandShapeAdjuster, &mut arrangement);

    assert_eq!(arrangement.levels[0].hand_shapes, hand_shapes);
}

#[test]
fn test_unused_ng_phrase_removed() {
    let mut arrangement = Arrangement {
        phrases: vec![
            Phrase::new("COUNT", 0),
            Phrase::new("NG", 0),
            Phrase::new("riff", 2),
            Phrase::new("END", 0),
        ],
        phrase_iterations: vec![
            PhraseIteration::new(0.0, 0),
            PhraseIteration::new(1.0, 2),
            PhraseIteration::new(5.0, 2),
            PhraseIteration::new(9.0, 3),
        ],
        ..Arrangement::default()
    };
    apply(UnnecessaryNgPhraseRemover, &mut arrangement);

    let names: Vec<_> = arrangement.phrases.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["COUNT", "riff", "END"]);
    let ids: Vec<_> = arrangement
        .phrase_iterations
        .iter()
        .map(|pi| pi.phrase_id)
        .collect();
    assert_eq!(ids, vec![0, 1, 1, 2]);
}

#[test]
fn test_used_ng_phrase_kept() {
    let mut arrangement = Arrangement {
        phrases: vec![Phrase::new("NG", 0), Phrase::new("END", 0)],
        phrase_iterations: vec![PhraseIteration::new(0.0, 0), PhraseIteration::new(9.0, 1)],
        ..Arrangement::default()
    };
    let context = apply(UnnecessaryNgPhraseRemover, &mut arrangement);

    assert_eq!(arrangement.phrases.len(), 2);
    assert!(context.log.is_empty());
}

#[test]
fn test_crowd_event_case_restored() {
    let mut arrangement = Arrangement {
        events: vec![Event::new("e3", 1.0), Event::new("e1", 4.0)],
        ..Arrangement::default()
    };
    let mut context = context();
    context.preserved.events = vec![Event::new("E3", 1.0), Event::new("e1", 4.0)];
    run(&CrowdEventFixer, &mut arrangement, &mut context);

    assert_eq!(
        arrangement.events,
        vec![Event::new("E3", 1.0), Event::new("e1", 4.0)]
    );
    assert_eq!(context.log.lines().len(), 1);
}

#[test]
fn test_chord_link_next_fixed() {
    let mut linked = Note::new(1.0, 0, 5).with_sustain(0.5);
    linked.set_link_next(true);
    let mut chord = Chord::new(1.0, 0);
    chord.chord_notes = vec![linked, Note::new(1.0, 1, 7).with_sustain(0.5)];
    let mut level = Level::new(0);
    level.chords = vec![chord, Chord::new(3.0, 0)];
    let mut arrangement = single_phrase(level);

    let context = apply(ChordLinkNextFixer, &mut arrangement);
    let chords = &arrangement.levels[0].chords;
    assert!(chords[0].is_link_next());
    assert!(!chords[1].is_link_next());
    assert_eq!(
        context.log.lines(),
        ["Set link-next on the chord at 1000 ms of level 0."]
    );
}

#[test]
fn test_high_density_removed() {
    let mut chord = Chord::new(1.0, 0);
    chord.set_high_density(true);
    let mut level = Level::new(0);
    level.chords = vec![chord];
    let mut arrangement = single_phrase(level);

    apply(HighDensityRemover, &mut arrangement);
    assert!(!arrangement.levels[0].chords[0].is_high_density());
}

#[test]
fn test_anchor_width_event() {
    let mut easy = Level::new(0);
    easy.anchors = vec![Anchor::new(2.0, 5)];
    let mut hard = Level::new(1);
    hard.anchors = vec![Anchor::new(1.0, 3), Anchor::new(2.0, 5)];
    let mut arrangement = Arrangement {
        events: vec![
            Event::new("w3", 2.0),
            Event::new("w3", 6.0),
            Event::new("E3", 7.0),
        ],
        levels: vec![easy, hard],
        ..Arrangement::default()
    };
    let context = apply(AnchorWidthProcessor, &mut arrangement);

    assert_eq!(arrangement.levels[0].anchors[0].width, 3.0);
    assert_eq!(arrangement.levels[1].anchors[0].width, 4.0);
    assert_eq!(arrangement.levels[1].anchors[1].width, 3.0);
    assert_eq!(arrangement.events, vec![Event::new("E3", 7.0)]);

    let warning = context.messages.first().expect("a warning");
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.time_code, Some(6000));
}

fn with_slide_out(code: &str) -> Arrangement {
    let mut low = Note::new(2.0, 0, 5).with_sustain(0.9);
    low.slide_unpitch_to = 9;
    let mut high = Note::new(2.0, 1, 7).with_sustain(0.9);
    high.slide_unpitch_to = 11;
    let mut chord = Chord::new(2.0, 0);
    chord.chord_notes = vec![low, high];
    let mut level = Level::new(0);
    level.chords = vec![chord];
    level.hand_shapes = vec![HandShape::new(0, 2.0, 2.9)];
    let mut template = ChordTemplate::new("A5", [5, 7, -1, -1, -1, -1]);
    template.fingers = [1, 3, -1, -1, -1, -1];
    Arrangement {
        chord_templates: vec![template],
        events: vec![Event::new(code, 1.0)],
        levels: vec![level],
        ..Arrangement::default()
    }
}

#[test]
fn test_slide_out_hand_shape() {
    let mut arrangement = with_slide_out("so0s2000");
    let context = apply(SlideOutProcessor, &mut arrangement);

    assert_eq!(arrangement.chord_templates.len(), 2);
    let slide = &arrangement.chord_templates[1];
    assert_eq!(slide.frets, [9, 11, -1, -1, -1, -1]);
    assert_eq!(slide.fingers, [1, 3, -1, -1, -1, -1]);
    assert_eq!(slide.name, "");

    let hand_shapes = &arrangement.levels[0].hand_shapes;
    assert_eq!(hand_shapes.len(), 2);
    assert_eq!(hand_shapes[0].chord_id, 0);
    assert!(time_equal(hand_shapes[0].end_time, 2.3));
    assert_eq!(hand_shapes[1].chord_id, 1);
    assert!(time_equal(hand_shapes[1].start_time, 2.3));
    assert!(time_equal(hand_shapes[1].end_time, 2.9));

    assert!(arrangement.events.is_empty());
    assert_eq!(
        context.log.lines(),
        [
            "Shortened the handshape at 2000 ms on level 0 for the slide-out: end 2900 ms -> 2300 ms.",
            "Added slide-out handshapes at 2000 ms on 1 levels.",
        ]
    );
}

#[test]
fn test_slide_out_at_event_time() {
    let mut arrangement = with_slide_out("so");
    arrangement.events[0].time = 2.0;
    apply(SlideOutProcessor, &mut arrangement);

    assert_eq!(arrangement.levels[0].hand_shapes.len(), 2);
}

#[test]
fn test_unparsable_slide_out_kept() {
    let mut arrangement = with_slide_out("soon");
    let context = apply(SlideOutProcessor, &mut arrangement);

    assert_eq!(arrangement.levels[0].hand_shapes.len(), 1);
    assert_eq!(arrangement.events.len(), 1);
    assert!(context.messages.any(Severity::Warning));
}

#[test]
fn test_noguitar_anchors_restored() {
    let mut hard = Level::new(1);
    hard.anchors = vec![Anchor::new(0.0, 1), Anchor::new(3.0, 5)];
    let mut arrangement = Arrangement {
        levels: vec![Level::new(0), hard],
        ..Arrangement::default()
    };
    let mut context = context();
    context.preserved.noguitar_anchors = vec![Anchor::new(0.0, 1)];
    run(&NoguitarAnchorRestorer, &mut arrangement, &mut context);

    assert_eq!(arrangement.levels[0].anchors, vec![Anchor::new(0.0, 1)]);
    assert_eq!(arrangement.levels[1].anchors.len(), 2);
    assert_eq!(context.log.lines().len(), 1);
}

#[test]
fn test_first_noguitar_section_restored() {
    let mut arrangement = Arrangement {
        sections: vec![Section::new("riff", 1, 3.0), Section::new("noguitar", 1, 9.0)],
        ..Arrangement::default()
    };
    let mut context = context();
    context.preserved.first_noguitar_section = Some(Section::new("noguitar", 1, 0.0));
    run(&FirstNoguitarSectionRestorer, &mut arrangement, &mut context);

    assert_eq!(
        arrangement.sections,
        vec![
            Section::new("noguitar", 1, 0.0),
            Section::new("riff", 1, 3.0),
            Section::new("noguitar", 2, 9.0),
        ]
    );

    run(&FirstNoguitarSectionRestorer, &mut arrangement, &mut context);
    assert_eq!(arrangement.sections.len(), 3);
}

#[test]
fn test_improver_comment_added_once() {
    let mut arrangement = Arrangement {
        comments: vec![" EOF v1.8c ".into()],
        ..Arrangement::default()
    };
    apply(ImproverComment, &mut arrangement);
    apply(ImproverComment, &mut arrangement);

    let comments: Vec<_> = arrangement.tool_comments().collect();
    assert_eq!(comments, vec![ToolComment::Eof, ToolComment::DdcImprover]);
    assert!(arrangement.is_generated());
}
