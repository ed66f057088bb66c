//! In-memory element tree.
//!
//! Nodes are cheap handles (`Rc` backed) over element, text and fragment
//! data. The tree implements the small slice of document behavior the facade
//! needs: construction, attribute access, traversal, deep cloning and HTML
//! serialization. Handles are intentionally not `Send` — the tree is a
//! single-threaded structure mutated in place.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::selector::Selector;

/// Elements whose text children serialize without entity escaping.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug)]
enum NodeKind {
    Element {
        tag: String,
        namespace: Option<String>,
        /// Attributes in insertion order.
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Fragment,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<Weak<RefCell<NodeData>>>,
    children: Vec<Node>,
}

/// Handle to a node in the tree.
///
/// Cloning the handle aliases the same node; use [`Node::deep_clone`] for a
/// structural copy.
#[derive(Clone, Debug)]
pub struct Node(Rc<RefCell<NodeData>>);

impl Node {
    fn from_kind(kind: NodeKind) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        })))
    }

    pub(crate) fn new_element(tag: &str) -> Self {
        Self::from_kind(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            namespace: None,
            attrs: Vec::new(),
        })
    }

    pub(crate) fn new_element_ns(namespace: &str, tag: &str) -> Self {
        Self::from_kind(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            namespace: Some(namespace.to_owned()),
            attrs: Vec::new(),
        })
    }

    pub(crate) fn new_text(text: &str) -> Self {
        Self::from_kind(NodeKind::Text(text.to_owned()))
    }

    pub(crate) fn new_fragment() -> Self {
        Self::from_kind(NodeKind::Fragment)
    }

    /// Whether two handles alias the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this node is an element.
    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Element { .. })
    }

    /// Whether this node is a text node.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Text(_))
    }

    /// Whether this node is a fragment.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Fragment)
    }

    /// Lowercase tag name, for elements.
    #[must_use]
    pub fn tag_name(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        }
    }

    /// Namespace URI, for namespaced elements.
    #[must_use]
    pub fn namespace(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { namespace, .. } => namespace.clone(),
            _ => None,
        }
    }

    /// Text node content.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// Attribute value by name, for elements.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(attr, _)| attr == name)
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }

    /// Whether an attribute is present, for elements.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, replacing an existing value. No-op on non-elements.
    pub fn set_attr(&self, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.0.borrow_mut().kind {
            if let Some(slot) = attrs.iter_mut().find(|(attr, _)| attr == name) {
                slot.1 = value.to_owned();
            } else {
                attrs.push((name.to_owned(), value.to_owned()));
            }
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&self, name: &str) -> bool {
        if let NodeKind::Element { attrs, .. } = &mut self.0.borrow_mut().kind {
            let before = attrs.len();
            attrs.retain(|(attr, _)| attr != name);
            attrs.len() != before
        } else {
            false
        }
    }

    /// Parent node, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.as_ref()?.upgrade().map(Node)
    }

    /// Snapshot of the current children.
    #[must_use]
    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    /// Append a child, detaching it from its previous parent first.
    ///
    /// Appending a fragment moves the fragment's children and leaves the
    /// fragment empty. Appending a node into itself or one of its
    /// descendants would create a cycle and is ignored.
    pub fn append_child(&self, child: &Node) {
        if self.ptr_eq(child) || child.is_ancestor_of(self) {
            return;
        }
        if child.is_fragment() {
            let moved: Vec<Node> = child.0.borrow_mut().children.drain(..).collect();
            for node in &moved {
                node.0.borrow_mut().parent = None;
                self.append_child(node);
            }
            return;
        }
        child.detach();
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Create a text node and append it.
    pub fn append_text(&self, text: &str) -> Node {
        let node = Node::new_text(text);
        self.append_child(&node);
        node
    }

    /// Remove this node from its parent, if attached.
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent
                .0
                .borrow_mut()
                .children
                .retain(|child| !child.ptr_eq(self));
        }
        self.0.borrow_mut().parent = None;
    }

    fn is_ancestor_of(&self, other: &Node) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// All descendants in document (pre-)order, excluding this node.
    #[must_use]
    pub fn descendants(&self) -> Vec<Node> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<Node>) {
        for child in self.children() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    /// Structural copy of this node and its subtree, detached from any parent.
    #[must_use]
    pub fn deep_clone(&self) -> Node {
        let data = self.0.borrow();
        let kind = match &data.kind {
            NodeKind::Element {
                tag,
                namespace,
                attrs,
            } => NodeKind::Element {
                tag: tag.clone(),
                namespace: namespace.clone(),
                attrs: attrs.clone(),
            },
            NodeKind::Text(text) => NodeKind::Text(text.clone()),
            NodeKind::Fragment => NodeKind::Fragment,
        };
        let clone = Node::from_kind(kind);
        for child in &data.children {
            let child_clone = child.deep_clone();
            child_clone.0.borrow_mut().parent = Some(Rc::downgrade(&clone.0));
            clone.0.borrow_mut().children.push(child_clone);
        }
        clone
    }

    /// Concatenated text of this node and all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        let data = self.0.borrow();
        if let NodeKind::Text(text) = &data.kind {
            out.push_str(text);
        }
        for child in &data.children {
            child.push_text(out);
        }
    }

    /// First descendant matching the selector, in document order.
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<Node> {
        let selector = Selector::parse(selector)?;
        self.descendants()
            .into_iter()
            .find(|node| selector.matches(node))
    }

    /// All descendants matching the selector, in document order.
    #[must_use]
    pub fn query_selector_all(&self, selector: &str) -> Vec<Node> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.descendants()
            .into_iter()
            .filter(|node| selector.matches(node))
            .collect()
    }

    /// Serialize this node and its subtree to HTML.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(false, &mut out);
        out
    }

    /// Serialize the children of this node to HTML.
    #[must_use]
    pub fn inner_html(&self) -> String {
        let data = self.0.borrow();
        let raw = matches!(
            &data.kind,
            NodeKind::Element { tag, .. } if RAW_TEXT_TAGS.contains(&tag.as_str())
        );
        let mut out = String::new();
        for child in &data.children {
            child.write_html(raw, &mut out);
        }
        out
    }

    fn write_html(&self, raw_text: bool, out: &mut String) {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_html(text));
                }
            }
            NodeKind::Fragment => {
                for child in &data.children {
                    child.write_html(false, out);
                }
            }
            NodeKind::Element { tag, attrs, .. } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_html(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }
                let raw = RAW_TEXT_TAGS.contains(&tag.as_str());
                for child in &data.children {
                    child.write_html(raw, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

/// Escape `&`, `<`, `>` and `"` for text and attribute serialization.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_append_child_sets_parent() {
        let parent = Node::new_element("div");
        let child = Node::new_element("span");
        parent.append_child(&child);
        assert!(child.parent().is_some_and(|p| p.ptr_eq(&parent)));
        assert_eq!(parent.children().len(), 1);
    }

    #[test]
    fn test_append_child_moves_between_parents() {
        let first = Node::new_element("div");
        let second = Node::new_element("div");
        let child = Node::new_element("span");
        first.append_child(&child);
        second.append_child(&child);
        assert!(first.children().is_empty());
        assert_eq!(second.children().len(), 1);
        assert!(child.parent().is_some_and(|p| p.ptr_eq(&second)));
    }

    #[test]
    fn test_append_fragment_moves_children() {
        let fragment = Node::new_fragment();
        fragment.append_text("a");
        fragment.append_text("b");
        let target = Node::new_element("div");
        target.append_child(&fragment);
        assert!(fragment.children().is_empty());
        assert_eq!(target.children().len(), 2);
        assert_eq!(target.text_content(), "ab");
    }

    #[test]
    fn test_append_into_descendant_is_ignored() {
        let outer = Node::new_element("div");
        let inner = Node::new_element("span");
        outer.append_child(&inner);
        inner.append_child(&outer);
        assert!(inner.children().is_empty());
        assert!(outer.parent().is_none());
    }

    #[test]
    fn test_attr_roundtrip() {
        let element = Node::new_element("a");
        assert_eq!(element.attr("href"), None);
        element.set_attr("href", "https://example.com/");
        assert_eq!(element.attr("href"), Some("https://example.com/".to_owned()));
        element.set_attr("href", "#top");
        assert_eq!(element.attr("href"), Some("#top".to_owned()));
        assert!(element.remove_attr("href"));
        assert!(!element.remove_attr("href"));
        assert_eq!(element.attr("href"), None);
    }

    #[test]
    fn test_attrs_ignored_on_text_nodes() {
        let text = Node::new_text("hi");
        text.set_attr("class", "x");
        assert_eq!(text.attr("class"), None);
        assert!(!text.remove_attr("class"));
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let original = Node::new_element("div");
        original.set_attr("class", "card");
        original.append_text("hello");
        let clone = original.deep_clone();
        clone.set_attr("class", "changed");
        clone.append_text(" world");
        assert_eq!(original.attr("class"), Some("card".to_owned()));
        assert_eq!(original.text_content(), "hello");
        assert_eq!(clone.text_content(), "hello world");
        assert!(clone.parent().is_none());
    }

    #[test]
    fn test_descendants_preorder() {
        let root = Node::new_element("div");
        let first = Node::new_element("section");
        let nested = Node::new_element("span");
        first.append_child(&nested);
        root.append_child(&first);
        let second = Node::new_element("p");
        root.append_child(&second);
        let order: Vec<Option<String>> =
            root.descendants().iter().map(Node::tag_name).collect();
        assert_eq!(
            order,
            vec![
                Some("section".to_owned()),
                Some("span".to_owned()),
                Some("p".to_owned()),
            ]
        );
    }

    #[test]
    fn test_outer_html_escapes_text_and_attrs() {
        let element = Node::new_element("div");
        element.set_attr("title", "a \"b\" & c");
        element.append_text("1 < 2 & 3 > 2");
        assert_eq!(
            element.outer_html(),
            "<div title=\"a &quot;b&quot; &amp; c\">1 &lt; 2 &amp; 3 &gt; 2</div>"
        );
    }

    #[test]
    fn test_style_text_serializes_raw() {
        let style = Node::new_element("style");
        style.append_text(".a > .b { color: red; }");
        assert_eq!(style.outer_html(), "<style>.a > .b { color: red; }</style>");
    }

    #[test]
    fn test_void_element_has_no_closing_tag() {
        let img = Node::new_element("img");
        img.set_attr("src", "chart.png");
        assert_eq!(img.outer_html(), "<img src=\"chart.png\">");
    }

    #[test]
    fn test_fragment_serializes_children_only() {
        let fragment = Node::new_fragment();
        fragment.append_text("a");
        let span = Node::new_element("span");
        span.append_text("b");
        fragment.append_child(&span);
        assert_eq!(fragment.outer_html(), "a<span>b</span>");
    }

    #[test]
    fn test_tag_name_lowercased() {
        let element = Node::new_element("DIV");
        assert_eq!(element.tag_name(), Some("div".to_owned()));
    }
}
