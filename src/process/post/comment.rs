use crate::{
    VERSION,
    model::{Arrangement, ToolComment},
    process::{ProcessBlock, ProcessContext, ProcessError},
};

/// Records in the file comments that the arrangement went through this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImproverComment;

impl ProcessBlock for ImproverComment {
    fn name(&self) -> &'static str {
        "improver comment"
    }

    fn apply(
        &self,
        arrangement: &mut Arrangement,
        _context: &mut ProcessContext<'_>,
    ) -> Result<(), ProcessError> {
        if !arrangement
            .tool_comments()
            .any(|comment| comment == ToolComment::DdcImprover)
        {
            arrangement
                .comments
                .push(format!(" DDC Improver {VERSION} "));
        }
        Ok(())
    }
}
