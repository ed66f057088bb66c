//! Host-document facade for building the on-page report UI.
//!
//! [`Dom`] wraps a [`Document`] and provides the five operation groups a
//! report renderer needs:
//!
//! - an element factory (create, namespaced create, fragments, appended
//!   children)
//! - query helpers with a hard [`find`](Dom::find) for required markup and a
//!   soft [`find_all`](Dom::find_all) for optional markup
//! - a template stamper that deduplicates embedded `<style>` blocks across
//!   clones
//! - markdown snippet converters (links and inline code) backed by the
//!   `reportal-markdown` segmenter
//! - a fail-closed URL/blob sanitizer: unsafe destinations degrade to
//!   non-navigable anchors instead of failing the render pass
//!
//! Everything is synchronous and single-threaded; node handles are `Rc`
//! based and not `Send`.
//!
//! # Example
//!
//! ```
//! use reportal_dom::{Document, Dom};
//!
//! let dom = Dom::new(Document::new());
//! let snippet = dom.convert_markdown_link_snippets(
//!     "Read the [guide](https://web.dev/lcp).",
//! );
//! assert!(snippet.outer_html().contains("utm_medium=unknown"));
//!
//! let anchor = dom.create_element("a");
//! dom.set_href_safely(&anchor, Some("javascript:alert(1)"));
//! assert_eq!(anchor.attr("href"), None);
//! ```

mod document;
mod dom;
mod error;
mod selector;
mod tree;

pub use document::{Blob, Document};
pub use dom::Dom;
pub use error::DomError;
pub use tree::Node;
