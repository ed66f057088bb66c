//! Minimal CSS selector subset.
//!
//! Supports compound selectors made of a type name or `*`, `#id`, `.class`,
//! `[attr]` and `[attr=value]` parts, joined by the descendant combinator.
//! This is the slice of selector grammar the report markup actually uses.
//! An unparseable selector matches nothing.

use crate::tree::Node;

/// A parsed selector: one or more compounds joined by descendant combinators.
#[derive(Debug)]
pub(crate) struct Selector {
    compounds: Vec<Compound>,
}

#[derive(Debug, Default)]
struct Compound {
    /// Lowercase type name; `None` matches any element.
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    /// Attribute name plus optional required value.
    attrs: Vec<(String, Option<String>)>,
}

impl Selector {
    /// Parse a selector, returning `None` on unsupported or malformed input.
    pub(crate) fn parse(input: &str) -> Option<Self> {
        let compounds: Option<Vec<Compound>> =
            input.split_whitespace().map(parse_compound).collect();
        let compounds = compounds?;
        if compounds.is_empty() {
            return None;
        }
        Some(Self { compounds })
    }

    /// Whether `node` matches the full selector, checking ancestor compounds
    /// right to left up the parent chain.
    pub(crate) fn matches(&self, node: &Node) -> bool {
        let Some((last, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(node) {
            return false;
        }
        let mut remaining = ancestors.len();
        let mut current = node.parent();
        while remaining > 0 {
            let Some(candidate) = current else {
                return false;
            };
            if ancestors[remaining - 1].matches(&candidate) {
                remaining -= 1;
            }
            current = candidate.parent();
        }
        true
    }
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        if !node.is_element() {
            return false;
        }
        if let Some(tag) = &self.tag
            && node.tag_name().as_deref() != Some(tag.as_str())
        {
            return false;
        }
        if let Some(id) = &self.id
            && node.attr("id").as_deref() != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.is_empty() {
            let class_attr = node.attr("class").unwrap_or_default();
            let class_list: Vec<&str> = class_attr.split_whitespace().collect();
            if !self
                .classes
                .iter()
                .all(|class| class_list.contains(&class.as_str()))
            {
                return false;
            }
        }
        self.attrs.iter().all(|(name, expected)| match expected {
            Some(value) => node.attr(name).as_deref() == Some(value.as_str()),
            None => node.has_attr(name),
        })
    }
}

fn parse_compound(part: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = part;

    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
        if end > 0 {
            let tag = &rest[..end];
            if !is_identifier(tag) {
                return None;
            }
            compound.tag = Some(tag.to_ascii_lowercase());
            rest = &rest[end..];
        }
    }

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('#') {
            let end = after.find(['#', '.', '[']).unwrap_or(after.len());
            if !is_identifier(&after[..end]) {
                return None;
            }
            compound.id = Some(after[..end].to_owned());
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix('.') {
            let end = after.find(['#', '.', '[']).unwrap_or(after.len());
            if !is_identifier(&after[..end]) {
                return None;
            }
            compound.classes.push(after[..end].to_owned());
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix('[') {
            let close = after.find(']')?;
            let body = &after[..close];
            let (name, value) = match body.split_once('=') {
                Some((name, value)) => (name, Some(unquote(value).to_owned())),
                None => (body, None),
            };
            if !is_identifier(name) {
                return None;
            }
            compound.attrs.push((name.to_owned(), value));
            rest = &after[close + 1..];
        } else {
            return None;
        }
    }

    if compound.tag.is_none()
        && compound.id.is_none()
        && compound.classes.is_empty()
        && compound.attrs.is_empty()
        && !part.starts_with('*')
    {
        return None;
    }
    Some(compound)
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

fn unquote(value: &str) -> &str {
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
}
