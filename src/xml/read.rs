//! Building an [`Arrangement`] from a parsed XML tree.

use std::str::FromStr;

use roxmltree::Node;

use super::LoadError;
use crate::{model::*, time::sort_by_time};

type Result<T> = core::result::Result<T, LoadError>;

fn invalid(node: Node<'_, '_>, attribute: &str, value: &str) -> LoadError {
    LoadError::InvalidValue {
        element: node.tag_name().name().to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
        range: node.range(),
    }
}

fn attr<T: FromStr>(node: Node<'_, '_>, name: &'static str) -> Result<Option<T>> {
    node.attribute(name)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| invalid(node, name, value))
        })
        .transpose()
}

fn attr_or<T: FromStr>(node: Node<'_, '_>, name: &'static str, default: T) -> Result<T> {
    Ok(attr(node, name)?.unwrap_or(default))
}

fn required<T: FromStr>(node: Node<'_, '_>, name: &'static str) -> Result<T> {
    attr(node, name)?.ok_or_else(|| LoadError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: name,
        range: node.range(),
    })
}

fn flag(node: Node<'_, '_>, name: &'static str) -> Result<bool> {
    Ok(attr_or::<i32>(node, name, 0)? != 0)
}

fn string_attr(node: Node<'_, '_>, name: &'static str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn non_negative(value: f32) -> f32 {
    value.max(0.0)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(name))
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |child| child.has_tag_name(name))
}

/// Reads the children named `item` and checks them against the `count_attribute` of `node`.
fn counted<T>(
    node: Node<'_, '_>,
    item: &str,
    count_attribute: &'static str,
    read: impl Fn(Node<'_, '_>) -> Result<T>,
) -> Result<Vec<T>> {
    let items = children(node, item).map(read).collect::<Result<Vec<_>>>()?;
    if let Some(expected) = attr::<usize>(node, count_attribute)?
        && expected != items.len()
    {
        return Err(LoadError::CountMismatch {
            element: node.tag_name().name().to_string(),
            expected,
            actual: items.len(),
            range: node.range(),
        });
    }
    Ok(items)
}

/// Reads the collection element `name` under `parent`, empty if it is absent.
fn collection<T>(
    parent: Node<'_, '_>,
    name: &str,
    item: &str,
    read: impl Fn(Node<'_, '_>) -> Result<T>,
) -> Result<Vec<T>> {
    child(parent, name).map_or_else(|| Ok(Vec::new()), |node| counted(node, item, "count", read))
}

fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().unwrap_or_default()
}

fn text_value<T: FromStr>(node: Node<'_, '_>) -> Result<T> {
    let value = text(node);
    value
        .trim()
        .parse::<T>()
        .map_err(|_| invalid(node, "#text", value))
}

fn optional_text<T: FromStr + Default>(root: Node<'_, '_>, name: &str) -> Result<T> {
    child(root, name).map_or_else(|| Ok(T::default()), text_value)
}

fn optional_string(root: Node<'_, '_>, name: &str) -> String {
    child(root, name).map(text).unwrap_or_default().to_string()
}

fn required_child<'a, 'input>(
    root: Node<'a, 'input>,
    name: &'static str,
) -> Result<Node<'a, 'input>> {
    child(root, name).ok_or(LoadError::MissingTag(name))
}

pub(super) fn read_arrangement(root: Node<'_, '_>) -> Result<Arrangement> {
    if !root.has_tag_name("song") {
        return Err(LoadError::UnexpectedRoot(
            root.tag_name().name().to_string(),
        ));
    }

    let comments = root
        .children()
        .filter(|node| !(node.is_text() && text(*node).trim().is_empty()))
        .take_while(|node| node.is_comment())
        .map(|node| text(node).to_string())
        .collect();

    let mut arrangement = Arrangement {
        version: string_attr(root, "version"),
        comments,
        metadata: read_metadata(root)?,
        tones: read_tones(root)?,
        phrases: collection(root, "phrases", "phrase", read_phrase)?,
        phrase_iterations: collection(
            root,
            "phraseIterations",
            "phraseIteration",
            read_phrase_iteration,
        )?,
        new_linked_diffs: collection(
            root,
            "newLinkedDiffs",
            "newLinkedDiff",
            read_new_linked_diff,
        )?,
        chord_templates: collection(root, "chordTemplates", "chordTemplate", read_template)?,
        ebeats: collection(root, "ebeats", "ebeat", |node| {
            Ok(Ebeat::new(
                required(node, "time")?,
                attr_or(node, "measure", WEAK_BEAT)?,
            ))
        })?,
        sections: collection(root, "sections", "section", |node| {
            Ok(Section::new(
                string_attr(node, "name"),
                attr_or(node, "number", 1)?,
                required(node, "startTime")?,
            ))
        })?,
        events: collection(root, "events", "event", |node| {
            Ok(Event::new(string_attr(node, "code"), required(node, "time")?))
        })?,
        transcription_track: child(root, "transcriptionTrack")
            .map(read_level)
            .transpose()?,
        levels: counted(required_child(root, "levels")?, "level", "count", read_level)?,
    };

    sort_by_time(&mut arrangement.phrase_iterations);
    sort_by_time(&mut arrangement.ebeats);
    sort_by_time(&mut arrangement.sections);
    sort_by_time(&mut arrangement.events);
    sort_by_time(&mut arrangement.tones.changes);
    Ok(arrangement)
}

fn read_metadata(root: Node<'_, '_>) -> Result<Metadata> {
    let mut tuning = [0; STRING_COUNT];
    if let Some(node) = child(root, "tuning") {
        for (string, value) in tuning.iter_mut().enumerate() {
            *value = attr_or(node, STRING_ATTRS[string], 0)?;
        }
    }
    Ok(Metadata {
        title: text(required_child(root, "title")?).to_string(),
        arrangement: text(required_child(root, "arrangement")?).to_string(),
        part: optional_text(root, "part")?,
        offset: optional_text(root, "offset")?,
        cent_offset: optional_text(root, "centOffset")?,
        song_length: text_value(required_child(root, "songLength")?)?,
        song_name_sort: optional_string(root, "songNameSort"),
        start_beat: optional_text(root, "startBeat")?,
        average_tempo: optional_text(root, "averageTempo")?,
        tuning,
        capo: optional_text(root, "capo")?,
        artist_name: optional_string(root, "artistName"),
        artist_name_sort: optional_string(root, "artistNameSort"),
        album_name: optional_string(root, "albumName"),
        album_name_sort: optional_string(root, "albumNameSort"),
        album_year: optional_string(root, "albumYear"),
        album_art: optional_string(root, "albumArt"),
        crowd_speed: optional_text(root, "crowdSpeed")?,
        arrangement_properties: child(root, "arrangementProperties")
            .map(|node| {
                node.attributes()
                    .map(|a| (a.name().to_string(), a.value().to_string()))
                    .collect()
            })
            .unwrap_or_default(),
        last_conversion_date_time: optional_string(root, "lastConversionDateTime"),
    })
}

pub(super) const STRING_ATTRS: [&str; STRING_COUNT] = [
    "string0", "string1", "string2", "string3", "string4", "string5",
];
pub(super) const FRET_ATTRS: [&str; STRING_COUNT] =
    ["fret0", "fret1", "fret2", "fret3", "fret4", "fret5"];
pub(super) const FINGER_ATTRS: [&str; STRING_COUNT] = [
    "finger0", "finger1", "finger2", "finger3", "finger4", "finger5",
];
pub(super) const TONE_SLOTS: [&str; 4] = ["tone_a", "tone_b", "tone_c", "tone_d"];

fn read_tones(root: Node<'_, '_>) -> Result<Tones> {
    let mut alternates: [Option<String>; 4] = Default::default();
    for (slot, name) in alternates.iter_mut().zip(TONE_SLOTS) {
        *slot = child(root, name).map(|node| text(node).to_string());
    }
    Ok(Tones {
        base: child(root, "tone_base").map(|node| text(node).to_string()),
        alternates,
        changes: collection(root, "tones", "tone", |node| {
            Ok(ToneChange {
                time: required(node, "time")?,
                id: attr_or(node, "id", 0)?,
                name: string_attr(node, "name"),
            })
        })?,
    })
}

fn read_phrase(node: Node<'_, '_>) -> Result<Phrase> {
    let mut phrase = Phrase::new(string_attr(node, "name"), attr_or(node, "maxDifficulty", 0)?);
    phrase.set_disparity(flag(node, "disparity")?);
    phrase.set_ignore(flag(node, "ignore")?);
    phrase.set_solo(flag(node, "solo")?);
    Ok(phrase)
}

fn read_phrase_iteration(node: Node<'_, '_>) -> Result<PhraseIteration> {
    let hero_levels = child(node, "heroLevels")
        .map(|hero_node| -> Result<HeroLevels> {
            let mut levels = HeroLevels::default();
            for hero in counted(hero_node, "heroLevel", "count", |hero| {
                Ok((
                    required::<u8>(hero, "hero")?,
                    required::<u8>(hero, "difficulty")?,
                ))
            })? {
                match hero {
                    (1, difficulty) => levels.easy = difficulty,
                    (2, difficulty) => levels.medium = difficulty,
                    (3, difficulty) => levels.hard = difficulty,
                    (other, _) => return Err(invalid(hero_node, "hero", &other.to_string())),
                }
            }
            Ok(levels)
        })
        .transpose()?;
    Ok(PhraseIteration {
        time: required(node, "time")?,
        phrase_id: required(node, "phraseId")?,
        variation: string_attr(node, "variation"),
        hero_levels,
    })
}

fn read_new_linked_diff(node: Node<'_, '_>) -> Result<NewLinkedDiff> {
    Ok(NewLinkedDiff {
        level_break: attr_or(node, "levelBreak", -1)?,
        ratio: string_attr(node, "ratio"),
        phrase_ids: counted(node, "nld_phrase", "phrases", |phrase| required(phrase, "id"))?,
    })
}

fn read_template(node: Node<'_, '_>) -> Result<ChordTemplate> {
    let mut template = ChordTemplate {
        name: string_attr(node, "chordName"),
        display_name: string_attr(node, "displayName"),
        ..ChordTemplate::default()
    };
    for string in 0..STRING_COUNT {
        template.frets[string] = attr_or(node, FRET_ATTRS[string], -1)?;
        template.fingers[string] = attr_or(node, FINGER_ATTRS[string], -1)?;
    }
    Ok(template)
}

fn read_level(node: Node<'_, '_>) -> Result<Level> {
    let mut level = Level {
        difficulty: attr_or(node, "difficulty", 0)?,
        notes: collection(node, "notes", "note", read_note)?,
        chords: collection(node, "chords", "chord", read_chord)?,
        anchors: collection(node, "anchors", "anchor", |anchor| {
            Ok(Anchor {
                time: required(anchor, "time")?,
                fret: required(anchor, "fret")?,
                width: attr_or(anchor, "width", DEFAULT_ANCHOR_WIDTH)?,
            })
        })?,
        hand_shapes: collection(node, "handShapes", "handShape", |hand_shape| {
            Ok(HandShape::new(
                required(hand_shape, "chordId")?,
                required(hand_shape, "startTime")?,
                required(hand_shape, "endTime")?,
            ))
        })?,
    };
    sort_by_time(&mut level.notes);
    sort_by_time(&mut level.chords);
    sort_by_time(&mut level.anchors);
    sort_by_time(&mut level.hand_shapes);
    Ok(level)
}

fn read_note(node: Node<'_, '_>) -> Result<Note> {
    let mut note = Note::new(
        non_negative(required(node, "time")?),
        attr_or(node, "string", 0)?,
        attr_or(node, "fret", 0)?,
    );
    note.sustain = non_negative(attr_or(node, "sustain", 0.0)?);
    note.bend_values = collection(node, "bendValues", "bendValue", |bend| {
        Ok(BendValue::new(
            required(bend, "time")?,
            attr_or(bend, "step", 0.0)?,
        ))
    })?;
    note.slide_to = attr_or(node, "slideTo", -1)?;
    note.slide_unpitch_to = attr_or(node, "slideUnpitchTo", -1)?;
    note.vibrato = attr_or(node, "vibrato", 0)?;
    note.tap = attr_or(node, "tap", 0)?;
    note.left_hand = attr_or(node, "leftHand", -1)?;
    note.right_hand = attr_or(node, "rightHand", -1)?;
    note.pluck = attr_or(node, "pluck", -1)?;
    note.slap = attr_or(node, "slap", -1)?;
    note.set_link_next(flag(node, "linkNext")?);
    note.set_accent(flag(node, "accent")?);
    note.set_hammer_on(flag(node, "hammerOn")?);
    note.set_harmonic(flag(node, "harmonic")?);
    note.set_harmonic_pinch(flag(node, "harmonicPinch")?);
    note.set_ignore(flag(node, "ignore")?);
    note.set_mute(flag(node, "mute")?);
    note.set_palm_mute(flag(node, "palmMute")?);
    note.set_pull_off(flag(node, "pullOff")?);
    note.set_tremolo(flag(node, "tremolo")?);
    note.set_pick_direction(flag(node, "pickDirection")?);
    Ok(note)
}

fn read_chord(node: Node<'_, '_>) -> Result<Chord> {
    let strum = match node.attribute("strum") {
        None | Some("down") => Strum::Down,
        Some("up") => Strum::Up,
        Some(other) => return Err(invalid(node, "strum", other)),
    };
    let mut chord = Chord::new(
        non_negative(required(node, "time")?),
        required(node, "chordId")?,
    );
    chord.strum = strum;
    chord.chord_notes = children(node, "chordNote")
        .map(read_note)
        .collect::<Result<Vec<_>>>()?;
    chord.set_link_next(flag(node, "linkNext")?);
    chord.set_accent(flag(node, "accent")?);
    chord.set_fret_hand_mute(flag(node, "fretHandMute")?);
    chord.set_high_density(flag(node, "highDensity")?);
    chord.set_ignore(flag(node, "ignore")?);
    chord.set_palm_mute(flag(node, "palmMute")?);
    chord.set_hopo(flag(node, "hopo")?);
    Ok(chord)
}
