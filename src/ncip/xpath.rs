//! Typed field-path lookups over a parsed protocol document.
//!
//! Paths are lists of local element names resolved against the NCIP
//! namespace. A document that declares no namespaces resolves the same
//! paths, which covers responders that omit the default namespace
//! declaration. Fallback chains (the protocol allows the same datum under
//! several element paths) are expressed as ordered path lists.

use xmltree::{Element, XMLNode};

use super::NCIP_NS;
use crate::error::{IlsError, IlsResult};

fn name_matches(el: &Element, local: &str) -> bool {
    el.name == local
        && el
            .namespace
            .as_deref()
            .map_or(true, |ns| ns == NCIP_NS)
}

/// Child elements of `el` with the given local name
pub fn children<'a>(el: &'a Element, local: &'a str) -> impl Iterator<Item = &'a Element> {
    el.children.iter().filter_map(move |node| match node {
        XMLNode::Element(child) if name_matches(child, local) => Some(child),
        _ => None,
    })
}

/// First element reached by walking `path` from `el`
pub fn first<'a>(el: &'a Element, path: &[&'a str]) -> Option<&'a Element> {
    let (head, rest) = path.split_first()?;
    let mut found = children(el, head);
    if rest.is_empty() {
        found.next()
    } else {
        found.find_map(|child| first(child, rest))
    }
}

/// All elements reached by walking `path` from `el`, in document order
pub fn all<'a>(el: &'a Element, path: &[&'a str]) -> Vec<&'a Element> {
    let Some((head, rest)) = path.split_first() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for child in children(el, head) {
        if rest.is_empty() {
            out.push(child);
        } else {
            out.extend(all(child, rest));
        }
    }
    out
}

/// Concatenated text content of an element, trimmed
pub fn text(el: &Element) -> String {
    let mut out = String::new();
    for node in &el.children {
        match node {
            XMLNode::Text(t) | XMLNode::CData(t) => out.push_str(t),
            _ => {}
        }
    }
    out.trim().to_string()
}

/// Text of the first element on `path`; `None` when absent
pub fn first_text(el: &Element, path: &[&str]) -> Option<String> {
    first(el, path).map(text)
}

/// Text of the first element found across an ordered list of paths.
/// Used for protocol fields that may live under alternative elements.
pub fn first_text_of(el: &Element, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| first_text(el, path))
}

/// Like [`first_text_of`] but the field is required; its absence is a
/// protocol violation surfaced as a business-rule error.
pub fn required_text_of(el: &Element, paths: &[&[&str]], what: &str) -> IlsResult<String> {
    first_text_of(el, paths)
        .ok_or_else(|| IlsError::Ils(format!("{} missing in response", what)))
}
