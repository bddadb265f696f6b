use crate::{
    model::Arrangement,
    process::{ProcessBlock, ProcessContext, ProcessError},
};

/// Name of the phrase the generator creates for noguitar sections.
const NO_GUITAR_PHRASE: &str = "NG";

/// Removes the `NG` phrase when no phrase iteration uses it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnnecessaryNgPhraseRemover;

impl ProcessBlock for UnnecessaryNgPhraseRemover {
    fn name(&self) -> &'static str {
        "unnecessary NG phrase remover"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        let unused: Vec<usize> = arrangement
            .phrases
            .iter()
            .enumerate()
            .filter(|(_, phrase)| phrase.name.eq_ignore_ascii_case(NO_GUITAR_PHRASE))
            .map(|(index, _)| index)
            .filter(|&index| {
                !arrangement
                    .phrase_iterations
                    .iter()
                    .any(|iteration| iteration.phrase_id as usize == index)
            })
            .collect();
        for &index in unused.iter().rev() {
            arrangement.remove_phrase(index);
            context.log(format!("Removed unused phrase {index} `{NO_GUITAR_PHRASE}`."));
        }
        Ok(())
    }
}
