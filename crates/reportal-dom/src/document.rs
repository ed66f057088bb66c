//! Document services: root ownership, node creation, subtree import and the
//! object-URL registry.
//!
//! [`Document`] is the narrow capability set the facade runs against —
//! exactly the operations the core needs, nothing more, so a harness can
//! stand up a document without any surrounding page machinery.

use std::cell::RefCell;
use std::collections::HashMap;

use uuid::Uuid;

use crate::tree::Node;

/// MIME-typed byte buffer, the payload behind an object URL.
#[derive(Clone, Debug)]
pub struct Blob {
    mime_type: String,
    data: Vec<u8>,
}

impl Blob {
    /// Create a blob from a MIME type and raw content.
    #[must_use]
    pub fn new(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// The blob's MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The blob's raw content.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A host document: a root element plus the services the facade needs.
///
/// Object URLs handed out by [`create_object_url`](Self::create_object_url)
/// stay resolvable until explicitly revoked; the document never revokes them
/// on its own.
#[derive(Debug)]
pub struct Document {
    root: Node,
    object_urls: RefCell<HashMap<String, Blob>>,
}

impl Document {
    /// Create an empty document with an `<html>` root element.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::new_element("html"),
            object_urls: RefCell::new(HashMap::new()),
        }
    }

    /// The document's root element.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Create a detached element.
    #[must_use]
    pub fn create_element(&self, tag: &str) -> Node {
        Node::new_element(tag)
    }

    /// Create a detached element in the given namespace.
    #[must_use]
    pub fn create_element_ns(&self, namespace: &str, tag: &str) -> Node {
        Node::new_element_ns(namespace, tag)
    }

    /// Create an empty fragment.
    #[must_use]
    pub fn create_fragment(&self) -> Node {
        Node::new_fragment()
    }

    /// Import a subtree into this document as a detached deep clone.
    #[must_use]
    pub fn import(&self, node: &Node) -> Node {
        node.deep_clone()
    }

    /// First element under the root matching the selector.
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<Node> {
        self.root.query_selector(selector)
    }

    /// All elements under the root matching the selector, in document order.
    #[must_use]
    pub fn query_selector_all(&self, selector: &str) -> Vec<Node> {
        self.root.query_selector_all(selector)
    }

    /// Register a blob and return a unique `blob:` URL for it.
    ///
    /// The URL stays resolvable until [`revoke_object_url`](Self::revoke_object_url)
    /// is called with it; the lifetime is the caller's responsibility.
    #[must_use]
    pub fn create_object_url(&self, blob: &Blob) -> String {
        let url = format!("blob:{}", Uuid::new_v4());
        self.object_urls
            .borrow_mut()
            .insert(url.clone(), blob.clone());
        url
    }

    /// Drop a registered object URL. Returns whether it was registered.
    pub fn revoke_object_url(&self, url: &str) -> bool {
        self.object_urls.borrow_mut().remove(url).is_some()
    }

    /// Resolve a registered object URL back to its blob.
    #[must_use]
    pub fn object_url_blob(&self, url: &str) -> Option<Blob> {
        self.object_urls.borrow().get(url).cloned()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_import_detaches_and_clones() {
        let document = Document::new();
        let section = document.create_element("section");
        section.append_text("score");
        document.root().append_child(&section);

        let imported = document.import(&section);
        assert!(imported.parent().is_none());
        assert_eq!(imported.text_content(), "score");

        imported.append_text("!");
        assert_eq!(section.text_content(), "score");
    }

    #[test]
    fn test_query_from_root() {
        let document = Document::new();
        let div = document.create_element("div");
        div.set_attr("class", "summary");
        document.root().append_child(&div);
        assert!(document.query_selector(".summary").is_some());
        assert!(document.query_selector(".missing").is_none());
        assert_eq!(document.query_selector_all("div").len(), 1);
    }

    #[test]
    fn test_object_urls_unique_and_resolvable() {
        let document = Document::new();
        let blob = Blob::new("text/html", "<p>report</p>");
        let first = document.create_object_url(&blob);
        let second = document.create_object_url(&blob);
        assert!(first.starts_with("blob:"));
        assert_ne!(first, second);
        assert_eq!(
            document
                .object_url_blob(&first)
                .map(|b| b.mime_type().to_owned()),
            Some("text/html".to_owned())
        );
    }

    #[test]
    fn test_revoke_object_url() {
        let document = Document::new();
        let blob = Blob::new("application/json", "{}");
        let url = document.create_object_url(&blob);
        assert!(document.revoke_object_url(&url));
        assert!(document.object_url_blob(&url).is_none());
        assert!(!document.revoke_object_url(&url));
        assert!(!document.revoke_object_url("blob:never-registered"));
    }
}
