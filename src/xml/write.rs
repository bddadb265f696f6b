//! Serializing an [`Arrangement`] into XML text.

use std::fmt::{Display, Write as _};

use super::{
    WriteMode,
    read::{FINGER_ATTRS, FRET_ATTRS, STRING_ATTRS, TONE_SLOTS},
};
use crate::model::*;

const HEADER: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
const INDENT: &str = "  ";

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Formats with three decimals unless that would not read back as the same value.
fn seconds(value: f32) -> String {
    let formatted = format!("{value:.3}");
    if formatted.parse::<f32>().is_ok_and(|parsed| parsed == value) {
        formatted
    } else {
        value.to_string()
    }
}

/// Makes `text` valid inside `<!--` and `-->`.
fn comment_text(text: &str) -> String {
    let mut escaped = text.to_string();
    while escaped.contains("--") {
        escaped = escaped.replace("--", "- -");
    }
    if escaped.ends_with('-') {
        escaped.push(' ');
    }
    escaped
}

/// The start tag of one element, built attribute by attribute.
///
/// Each attribute decides by itself whether [`WriteMode::Abridged`] omits it.
struct Element {
    name: &'static str,
    attributes: String,
    mode: WriteMode,
}

impl Element {
    fn new(name: &'static str, mode: WriteMode) -> Self {
        Self {
            name,
            attributes: String::new(),
            mode,
        }
    }

    fn always(mut self, name: &str, value: impl Display) -> Self {
        let _ = write!(self.attributes, r#" {name}="{value}""#);
        self
    }

    fn text(self, name: &str, value: &str) -> Self {
        self.always(name, escape(value))
    }

    fn int<T: Display + PartialEq>(self, name: &str, value: T, default: T) -> Self {
        if self.mode == WriteMode::Abridged && value == default {
            return self;
        }
        self.always(name, value)
    }

    fn flag(self, name: &str, value: bool) -> Self {
        self.int(name, u8::from(value), 0)
    }

    fn float(self, name: &str, value: f32, default: f32) -> Self {
        let formatted = seconds(value);
        if self.mode == WriteMode::Abridged && formatted == seconds(default) {
            return self;
        }
        self.always(name, formatted)
    }
}

struct XmlWriter {
    out: String,
    depth: usize,
    mode: WriteMode,
}

impl XmlWriter {
    fn new(mode: WriteMode) -> Self {
        let mut out = String::with_capacity(64 * 1024);
        out.push_str(HEADER);
        out.push('\n');
        Self {
            out,
            depth: 0,
            mode,
        }
    }

    fn element(&self, name: &'static str) -> Element {
        Element::new(name, self.mode)
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn empty(&mut self, element: Element) {
        self.indent();
        let _ = writeln!(self.out, "<{}{} />", element.name, element.attributes);
    }

    fn open(&mut self, element: Element) {
        self.indent();
        let _ = writeln!(self.out, "<{}{}>", element.name, element.attributes);
        self.depth += 1;
    }

    fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        let _ = writeln!(self.out, "</{name}>");
    }

    fn text_element(&mut self, name: &str, text: impl Display) {
        self.indent();
        let _ = writeln!(self.out, "<{name}>{text}</{name}>");
    }

    fn comment(&mut self, text: &str) {
        self.indent();
        let _ = writeln!(self.out, "<!--{}-->", comment_text(text));
    }

    /// Writes `items` wrapped in `name` with a matching `count` attribute.
    fn collection<T>(
        &mut self,
        name: &'static str,
        items: &[T],
        mut write_item: impl FnMut(&mut Self, &T),
    ) {
        let wrapper = self.element(name).always("count", items.len());
        if items.is_empty() {
            self.empty(wrapper);
            return;
        }
        self.open(wrapper);
        for item in items {
            write_item(self, item);
        }
        self.close(name);
    }
}

pub(super) fn write_arrangement(arrangement: &Arrangement, mode: WriteMode) -> String {
    let mut w = XmlWriter::new(mode);
    w.open(w.element("song").text("version", &arrangement.version));
    for comment in &arrangement.comments {
        w.comment(comment);
    }
    write_metadata(&mut w, &arrangement.metadata);
    write_tones(&mut w, &arrangement.tones);
    w.collection("phrases", &arrangement.phrases, |w, phrase| {
        let element = w
            .element("phrase")
            .flag("disparity", phrase.is_disparity())
            .flag("ignore", phrase.is_ignore())
            .always("maxDifficulty", phrase.max_difficulty)
            .text("name", &phrase.name)
            .flag("solo", phrase.is_solo());
        w.empty(element);
    });
    w.collection(
        "phraseIterations",
        &arrangement.phrase_iterations,
        write_phrase_iteration,
    );
    w.collection(
        "newLinkedDiffs",
        &arrangement.new_linked_diffs,
        |w, linked| {
            let element = w
                .element("newLinkedDiff")
                .always("levelBreak", linked.level_break)
                .text("ratio", &linked.ratio)
                .always("phrases", linked.phrase_ids.len());
            w.open(element);
            for id in &linked.phrase_ids {
                let phrase = w.element("nld_phrase").always("id", id);
                w.empty(phrase);
            }
            w.close("newLinkedDiff");
        },
    );
    w.collection(
        "chordTemplates",
        &arrangement.chord_templates,
        write_template,
    );
    w.collection("ebeats", &arrangement.ebeats, |w, beat| {
        let element = w
            .element("ebeat")
            .always("time", seconds(beat.time))
            .int("measure", beat.measure, WEAK_BEAT);
        w.empty(element);
    });
    w.collection("sections", &arrangement.sections, |w, section| {
        let element = w
            .element("section")
            .text("name", &section.name)
            .always("number", section.number)
            .always("startTime", seconds(section.time));
        w.empty(element);
    });
    w.collection("events", &arrangement.events, |w, event| {
        let element = w
            .element("event")
            .always("time", seconds(event.time))
            .text("code", &event.code);
        w.empty(element);
    });
    if let Some(track) = &arrangement.transcription_track {
        write_level(&mut w, "transcriptionTrack", track);
    }
    w.collection("levels", &arrangement.levels, |w, level| {
        write_level(w, "level", level);
    });
    w.close("song");
    w.out
}

fn write_metadata(w: &mut XmlWriter, metadata: &Metadata) {
    w.text_element("title", escape(&metadata.title));
    w.text_element("arrangement", escape(&metadata.arrangement));
    w.text_element("part", metadata.part);
    w.text_element("offset", seconds(metadata.offset));
    w.text_element("centOffset", seconds(metadata.cent_offset));
    w.text_element("songLength", seconds(metadata.song_length));
    w.text_element("songNameSort", escape(&metadata.song_name_sort));
    w.text_element("startBeat", seconds(metadata.start_beat));
    w.text_element("averageTempo", seconds(metadata.average_tempo));
    let tuning = metadata
        .tuning
        .iter()
        .zip(STRING_ATTRS)
        .fold(w.element("tuning"), |element, (offset, name)| {
            element.always(name, offset)
        });
    w.empty(tuning);
    w.text_element("capo", metadata.capo);
    w.text_element("artistName", escape(&metadata.artist_name));
    w.text_element("artistNameSort", escape(&metadata.artist_name_sort));
    w.text_element("albumName", escape(&metadata.album_name));
    w.text_element("albumNameSort", escape(&metadata.album_name_sort));
    w.text_element("albumYear", escape(&metadata.album_year));
    w.text_element("albumArt", escape(&metadata.album_art));
    w.text_element("crowdSpeed", metadata.crowd_speed);
    if !metadata.arrangement_properties.is_empty() {
        let properties = metadata
            .arrangement_properties
            .iter()
            .fold(w.element("arrangementProperties"), |element, (name, value)| {
                element.text(name, value)
            });
        w.empty(properties);
    }
    w.text_element(
        "lastConversionDateTime",
        escape(&metadata.last_conversion_date_time),
    );
}

fn write_tones(w: &mut XmlWriter, tones: &Tones) {
    if let Some(base) = &tones.base {
        w.text_element("tone_base", escape(base));
    }
    for (slot, name) in tones.alternates.iter().zip(TONE_SLOTS) {
        if let Some(tone) = slot {
            w.text_element(name, escape(tone));
        }
    }
    if !tones.changes.is_empty() {
        w.collection("tones", &tones.changes, |w, change| {
            let element = w
                .element("tone")
                .always("time", seconds(change.time))
                .always("id", change.id)
                .text("name", &change.name);
            w.empty(element);
        });
    }
}

fn write_phrase_iteration(w: &mut XmlWriter, iteration: &PhraseIteration) {
    let element = w
        .element("phraseIteration")
        .always("time", seconds(iteration.time))
        .always("phraseId", iteration.phrase_id)
        .text("variation", &iteration.variation);
    let Some(hero_levels) = iteration.hero_levels else {
        w.empty(element);
        return;
    };
    w.open(element);
    let heroes = [
        (1, hero_levels.easy),
        (2, hero_levels.medium),
        (3, hero_levels.hard),
    ];
    w.collection("heroLevels", &heroes, |w, &(hero, difficulty)| {
        let element = w
            .element("heroLevel")
            .always("hero", hero)
            .always("difficulty", difficulty);
        w.empty(element);
    });
    w.close("phraseIteration");
}

fn write_template(w: &mut XmlWriter, template: &ChordTemplate) {
    let mut element = w
        .element("chordTemplate")
        .text("chordName", &template.name)
        .text("displayName", &template.display_name);
    for (finger, name) in template.fingers.iter().zip(FINGER_ATTRS) {
        element = element.int(name, *finger, -1);
    }
    for (fret, name) in template.frets.iter().zip(FRET_ATTRS) {
        element = element.int(name, *fret, -1);
    }
    w.empty(element);
}

fn write_level(w: &mut XmlWriter, name: &'static str, level: &Level) {
    w.open(w.element(name).always("difficulty", level.difficulty));
    w.collection("notes", &level.notes, |w, note| write_note(w, "note", note));
    w.collection("chords", &level.chords, write_chord);
    w.collection("anchors", &level.anchors, |w, anchor| {
        let element = w
            .element("anchor")
            .always("time", seconds(anchor.time))
            .always("fret", anchor.fret)
            .float("width", anchor.width, DEFAULT_ANCHOR_WIDTH);
        w.empty(element);
    });
    w.collection("handShapes", &level.hand_shapes, |w, hand_shape| {
        let element = w
            .element("handShape")
            .always("chordId", hand_shape.chord_id)
            .always("startTime", seconds(hand_shape.start_time))
            .always("endTime", seconds(hand_shape.end_time));
        w.empty(element);
    });
    w.close(name);
}

fn write_note(w: &mut XmlWriter, name: &'static str, note: &Note) {
    let element = w
        .element(name)
        .always("time", seconds(note.time.max(0.0)))
        .flag("linkNext", note.is_link_next())
        .flag("accent", note.is_accent())
        .float("bend", note.max_bend(), 0.0)
        .always("fret", note.fret)
        .flag("hammerOn", note.is_hammer_on())
        .flag("harmonic", note.is_harmonic())
        .flag("hopo", note.is_hopo())
        .flag("ignore", note.is_ignore())
        .int("leftHand", note.left_hand, -1)
        .flag("mute", note.is_mute())
        .flag("palmMute", note.is_palm_mute())
        .int("pluck", note.pluck, -1)
        .flag("pullOff", note.is_pull_off())
        .int("slap", note.slap, -1)
        .int("slideTo", note.slide_to, -1)
        .always("string", note.string)
        .float("sustain", note.sustain.max(0.0), 0.0)
        .flag("tremolo", note.is_tremolo())
        .flag("harmonicPinch", note.is_harmonic_pinch())
        .flag("pickDirection", note.is_pick_direction())
        .int("rightHand", note.right_hand, -1)
        .int("slideUnpitchTo", note.slide_unpitch_to, -1)
        .int("tap", note.tap, 0)
        .int("vibrato", note.vibrato, 0);
    if note.bend_values.is_empty() {
        w.empty(element);
        return;
    }
    w.open(element);
    w.collection("bendValues", &note.bend_values, |w, bend| {
        let element = w
            .element("bendValue")
            .always("time", seconds(bend.time))
            .float("step", bend.step, 0.0);
        w.empty(element);
    });
    w.close(name);
}

fn write_chord(w: &mut XmlWriter, chord: &Chord) {
    let element = w
        .element("chord")
        .always("time", seconds(chord.time.max(0.0)))
        .flag("linkNext", chord.is_link_next())
        .flag("accent", chord.is_accent())
        .always("chordId", chord.chord_id)
        .flag("fretHandMute", chord.is_fret_hand_mute())
        .flag("highDensity", chord.is_high_density())
        .flag("ignore", chord.is_ignore())
        .flag("palmMute", chord.is_palm_mute())
        .flag("hopo", chord.is_hopo())
        .int("strum", chord.strum.as_str(), Strum::Down.as_str());
    if chord.chord_notes.is_empty() {
        w.empty(element);
        return;
    }
    w.open(element);
    for note in &chord.chord_notes {
        write_note(w, "chordNote", note);
    }
    w.close("chord");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"A & "B" <C>"#), "A &amp; &quot;B&quot; &lt;C&gt;");
    }

    #[test]
    fn abridged_omits_defaults_only() {
        let element = Element::new("anchor", WriteMode::Abridged)
            .always("time", seconds(1.0))
            .int("fret", 0i8, -1)
            .float("width", 4.0, DEFAULT_ANCHOR_WIDTH)
            .flag("ignore", false);
        assert_eq!(element.attributes, r#" time="1.000" fret="0""#);

        let element = Element::new("anchor", WriteMode::Full)
            .float("width", 4.0, DEFAULT_ANCHOR_WIDTH)
            .flag("ignore", false);
        assert_eq!(element.attributes, r#" width="4.000" ignore="0""#);
    }

    #[test]
    fn seconds_keep_sub_millisecond_digits() {
        assert_eq!(seconds(5.5), "5.500");
        assert_eq!(seconds(0.0), "0.000");
        let precise = "10.0004".parse::<f32>().expect("must be parsed");
        assert_eq!(seconds(precise).parse::<f32>(), Ok(precise));
    }

    #[test]
    fn comments_never_contain_double_hyphens() {
        assert_eq!(comment_text(" DDC v3.2 "), " DDC v3.2 ");
        for text in ["a--b", "---", "end-", "--"] {
            let escaped = comment_text(text);
            assert!(!escaped.contains("--"), "{escaped}");
            assert!(!escaped.ends_with('-'), "{escaped}");
        }
    }
}
