//! Leading file comments and the authoring tools they reveal.

/// The tool which left a comment at the top of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToolComment {
    /// Editor On Fire, which exports single level arrangements.
    Eof,
    /// This crate's improver, which runs after difficulty generation.
    DdcImprover,
    /// Removal of the difficulty levels by this crate.
    DdRemover,
    /// The external difficulty generator.
    Ddc,
    /// Anything else.
    Other,
}

impl ToolComment {
    /// Classifies a comment by the names it mentions.
    #[must_use]
    pub fn classify(comment: &str) -> Self {
        if comment.contains("DDC Improver") {
            if comment.contains("removed DD") {
                Self::DdRemover
            } else {
                Self::DdcImprover
            }
        } else if comment.contains("DDC") || comment.contains("DD Creator") {
            Self::Ddc
        } else if comment.contains("EOF") {
            Self::Eof
        } else {
            Self::Other
        }
    }

    /// Whether a file carrying this comment has been through difficulty generation.
    #[must_use]
    pub const fn implies_generated_levels(self) -> bool {
        matches!(self, Self::Ddc | Self::DdcImprover)
    }
}
