//! Ordered segment units produced by snippet splitting.

/// One unit of a plain/link segmentation.
///
/// Segments are produced in source order and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkSegment {
    /// Literal text, rendered as-is.
    Plain(String),
    /// A link span with visible text and its raw destination.
    Link {
        /// Visible anchor text.
        text: String,
        /// Destination exactly as written in the snippet.
        href: String,
    },
}

/// One unit of a plain/code segmentation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodeSegment {
    /// Literal text, rendered as-is.
    Plain(String),
    /// An inline code span (backtick contents, without the backticks).
    Code(String),
}
