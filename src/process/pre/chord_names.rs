use std::collections::HashSet;

use crate::{
    command::one_fret_suffix,
    model::{Arrangement, ChordTemplate},
    process::{ProcessBlock, ProcessContext, ProcessError},
};

const CONVERTED: &str = "CONV";
const NO_PICK: &str = "-nop";
const ARPEGGIO: &str = "-arp";

/// Applies the one-fret command and normalizes the chord names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChordNameProcessor;

/// Moves every fretted string onto `fret` and drops the open strings.
fn collapse_to_fret(template: &mut ChordTemplate, fret: i8) {
    for (template_fret, finger) in template.frets.iter_mut().zip(template.fingers.iter_mut()) {
        match *template_fret {
            0 => {
                *template_fret = -1;
                *finger = -1;
            }
            f if f > 0 => *template_fret = fret,
            _ => {}
        }
    }
    template.name.clear();
    template.display_name.clear();
}

fn normalize(name: &str) -> String {
    name.replace("min", "m").replace(CONVERTED, "")
}

fn rename(template: &mut ChordTemplate) {
    let converted = template.name.contains(CONVERTED);
    template.name = normalize(&template.name)
        .replace(NO_PICK, "")
        .replace(ARPEGGIO, "");
    let mut display = normalize(&template.display_name).replace(NO_PICK, "");
    if converted && !display.ends_with(ARPEGGIO) {
        display.push_str(ARPEGGIO);
    }
    template.display_name = display;
}

impl ProcessBlock for ChordNameProcessor {
    fn name(&self) -> &'static str {
        "chord name processor"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let mut logged = HashSet::new();
        for template in &mut arrangement.chord_templates {
            let original = template.name.clone();
            match one_fret_suffix(&template.name) {
                Some(Ok(fret)) => {
                    collapse_to_fret(template, fret);
                    if logged.insert(original.clone()) {
                        context.log(format!("Applied one-fret command of chord `{original}`."));
                    }
                }
                Some(Err(error)) => context.warn(error.to_string(), None),
                None => {
                    let before = template.clone();
                    rename(template);
                    if *template != before && logged.insert(original.clone()) {
                        context.log(format!(
                            "Processed chord name `{original}` into `{}`.",
                            template.name
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
