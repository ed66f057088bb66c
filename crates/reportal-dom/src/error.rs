//! Error types for the document facade.

/// Error from a facade operation.
///
/// Malformed or unsafe link destinations are not represented here: the
/// sanitizer leaves the href unset instead, since a bad link must never
/// abort the surrounding render pass.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DomError {
    /// A required lookup matched nothing. Callers must ensure the markup
    /// exists before querying.
    #[error("no element matches selector `{selector}`")]
    NotFound {
        /// Selector that failed to match.
        selector: String,
    },

    /// A template lookup matched nothing, or matched a non-template element.
    #[error("no <template> matches selector `{selector}`")]
    TemplateNotFound {
        /// Selector that failed to match a template.
        selector: String,
    },

    /// A blob carried a MIME type the sanitizer does not accept.
    #[error("unsupported blob MIME type `{mime_type}`")]
    UnsupportedBlobType {
        /// MIME type of the rejected blob.
        mime_type: String,
    },
}
