//! Document facade for building the on-page report UI.

use reportal_markdown::{CodeSegment, LinkSegment};
use url::Url;

use crate::document::{Blob, Document};
use crate::error::DomError;
use crate::tree::Node;

/// Origins whose links get UTM decoration before sanitization.
const DOC_LINK_ORIGINS: &[&str] = &[
    "https://developers.google.com",
    "https://web.dev",
    "https://developer.chrome.com",
];

/// `utm_source` value attached to documentation links.
const UTM_SOURCE: &str = "lighthouse";

/// Schemes an anchor is allowed to navigate to.
const SAFE_SCHEMES: &[&str] = &["http", "https"];

/// Blob MIME types eligible for object-URL hrefs.
const SAFE_BLOB_TYPES: &[&str] = &["text/html", "application/json"];

/// Marker attribute recording that a template already yielded a clone.
/// Owned exclusively by the stamper; no other component reads or writes it.
const STAMPED_ATTR: &str = "data-stamped";

/// Facade over a host [`Document`].
///
/// One instance is created per report render. All mutable state — the
/// template stamp markers and the distribution channel — is scoped to the
/// instance's document, so independent instances never interfere.
pub struct Dom {
    document: Document,
    channel: String,
}

impl Dom {
    /// Wrap a document. The channel defaults to `unknown` until the host
    /// calls [`set_channel`](Self::set_channel).
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            document,
            channel: "unknown".to_owned(),
        }
    }

    /// The wrapped document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Set the distribution channel used to tag documentation links.
    pub fn set_channel(&mut self, channel: impl Into<String>) {
        self.channel = channel.into();
    }

    /// Create a detached element.
    #[must_use]
    pub fn create_element(&self, tag: &str) -> Node {
        self.document.create_element(tag)
    }

    /// Create a detached element with a class. The class is applied only if
    /// non-empty.
    #[must_use]
    pub fn create_element_with_class(&self, tag: &str, class_name: &str) -> Node {
        let element = self.document.create_element(tag);
        if !class_name.is_empty() {
            element.set_attr("class", class_name);
        }
        element
    }

    /// Create a detached element in the given namespace.
    #[must_use]
    pub fn create_element_ns(&self, namespace: &str, tag: &str) -> Node {
        self.document.create_element_ns(namespace, tag)
    }

    /// Create an empty fragment.
    #[must_use]
    pub fn create_fragment(&self) -> Node {
        self.document.create_fragment()
    }

    /// Create an element appended to `parent`.
    pub fn create_child_of(&self, parent: &Node, tag: &str) -> Node {
        let element = self.create_element(tag);
        parent.append_child(&element);
        element
    }

    /// Create an element with a class appended to `parent`. The class is
    /// applied only if non-empty.
    pub fn create_child_of_with_class(&self, parent: &Node, tag: &str, class_name: &str) -> Node {
        let element = self.create_element_with_class(tag, class_name);
        parent.append_child(&element);
        element
    }

    /// First element under `context` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotFound`] when nothing matches. Required markup
    /// being absent is a caller bug, not a recoverable condition; use
    /// [`find_all`](Self::find_all) for lookups that may come up empty.
    pub fn find(&self, selector: &str, context: &Node) -> Result<Node, DomError> {
        context
            .query_selector(selector)
            .ok_or_else(|| DomError::NotFound {
                selector: selector.to_owned(),
            })
    }

    /// All elements under `context` matching `selector`, in document order.
    /// Never fails; no match yields an empty list.
    #[must_use]
    pub fn find_all(&self, selector: &str, context: &Node) -> Vec<Node> {
        context.query_selector_all(selector)
    }

    /// Clone the content of the `<template>` under `context` matching
    /// `selector` into a detached fragment.
    ///
    /// The first clone of a template keeps its `<style>` descendants — they
    /// carry the template's rules into the rendered output. Every later
    /// clone has them stripped, until [`reset_templates`](Self::reset_templates)
    /// clears the markers.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::TemplateNotFound`] when the selector matches
    /// nothing, or matches an element that is not a template.
    pub fn clone_from_template(&self, selector: &str, context: &Node) -> Result<Node, DomError> {
        let template = context
            .query_selector(selector)
            .filter(|node| node.tag_name().as_deref() == Some("template"))
            .ok_or_else(|| DomError::TemplateNotFound {
                selector: selector.to_owned(),
            })?;

        let clone = self.document.create_fragment();
        for child in template.children() {
            clone.append_child(&self.document.import(&child));
        }

        if template.has_attr(STAMPED_ATTR) {
            let styles = clone.query_selector_all("style");
            if !styles.is_empty() {
                tracing::debug!(
                    selector,
                    styles = styles.len(),
                    "stripping styles from repeat template clone"
                );
            }
            for style in &styles {
                style.detach();
            }
        }
        template.set_attr(STAMPED_ATTR, "true");
        Ok(clone)
    }

    /// Clear the stamp marker from every marked template in the document,
    /// restoring first-clone (styles included) behavior for all of them.
    pub fn reset_templates(&self) {
        let stamped = self
            .document
            .query_selector_all(&format!("template[{STAMPED_ATTR}]"));
        tracing::debug!(templates = stamped.len(), "resetting stamped templates");
        for template in &stamped {
            template.remove_attr(STAMPED_ATTR);
        }
    }

    /// Convert a snippet with markdown-style links into a container element:
    /// one text node per plain segment, one anchor per link segment.
    ///
    /// Anchors open in a new tab (`rel=noopener`, `target=_blank`).
    /// Destinations on documentation origins are tagged with
    /// `utm_source`/`utm_medium` before the href is assigned; assignment
    /// itself goes through [`set_href_safely`](Self::set_href_safely), so an
    /// unsafe destination renders as a non-navigable anchor.
    #[must_use]
    pub fn convert_markdown_link_snippets(&self, text: &str) -> Node {
        let root = self.create_element("span");
        for segment in reportal_markdown::split_links(text) {
            match segment {
                LinkSegment::Plain(text) => {
                    root.append_text(&text);
                }
                LinkSegment::Link { text, href } => {
                    let anchor = self.create_element("a");
                    anchor.set_attr("rel", "noopener");
                    anchor.set_attr("target", "_blank");
                    anchor.append_text(&text);
                    let destination = self.decorate_doc_link(&href);
                    self.set_href_safely(&anchor, Some(destination.as_str()));
                    root.append_child(&anchor);
                }
            }
        }
        root
    }

    /// Convert a snippet with markdown-style code spans into a container
    /// element: one text node per plain segment, one `<code>` element per
    /// code segment.
    #[must_use]
    pub fn convert_markdown_code_snippets(&self, text: &str) -> Node {
        let root = self.create_element("span");
        for segment in reportal_markdown::split_code(text) {
            match segment {
                CodeSegment::Plain(text) => {
                    root.append_text(&text);
                }
                CodeSegment::Code(code) => {
                    let element = self.create_element("code");
                    element.append_text(&code);
                    root.append_child(&element);
                }
            }
        }
        root
    }

    /// Append UTM tags to destinations on documentation origins.
    ///
    /// Runs before sanitization: a destination that later fails the scheme
    /// check loses href and decoration together.
    fn decorate_doc_link(&self, href: &str) -> String {
        let Ok(mut url) = Url::parse(href) else {
            return href.to_owned();
        };
        if DOC_LINK_ORIGINS.contains(&url.origin().ascii_serialization().as_str()) {
            url.query_pairs_mut()
                .append_pair("utm_source", UTM_SOURCE)
                .append_pair("utm_medium", &self.channel);
        }
        String::from(url)
    }

    /// Assign `url` as the anchor's href only if it is safe to navigate to.
    ///
    /// In-page fragments (`#…`) are assigned verbatim — they cannot carry a
    /// scheme. Anything else must parse as an absolute `http`/`https` URL and
    /// is assigned in normalized form. Absent, malformed or unsafe input
    /// leaves the href unset: the anchor degrades to plain styled text
    /// instead of failing the render pass.
    pub fn set_href_safely(&self, anchor: &Node, url: Option<&str>) {
        let url = url.unwrap_or_default();
        if url.starts_with('#') {
            anchor.set_attr("href", url);
            return;
        }
        match Url::parse(url) {
            Ok(parsed) if SAFE_SCHEMES.contains(&parsed.scheme()) => {
                anchor.set_attr("href", parsed.as_str());
            }
            _ => {
                if !url.is_empty() {
                    tracing::debug!(url, "dropping unsafe link destination");
                }
            }
        }
    }

    /// Assign a revocable object URL for `blob` as the anchor's href.
    ///
    /// Returns the object URL; revoking it (via
    /// [`Document::revoke_object_url`]) is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnsupportedBlobType`] for any MIME type other
    /// than `text/html` or `application/json`; the href is left untouched.
    pub fn set_blob_href_safely(&self, anchor: &Node, blob: &Blob) -> Result<String, DomError> {
        if !SAFE_BLOB_TYPES.contains(&blob.mime_type()) {
            return Err(DomError::UnsupportedBlobType {
                mime_type: blob.mime_type().to_owned(),
            });
        }
        let url = self.document.create_object_url(blob);
        anchor.set_attr("href", &url);
        Ok(url)
    }
}
