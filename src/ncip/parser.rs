//! Response parsing and protocol fault detection

use xmltree::{Element, XMLNode};

use super::xpath;
use crate::error::{IlsError, IlsResult, ProblemFault};

/// Parse a raw response body into an element tree.
///
/// A `Problem` element anywhere in the tree signals failure; the scan runs
/// before any field extraction, on every response.
pub fn parse_response(body: &str) -> IlsResult<Element> {
    let root = parse_document(body)?;
    if let Some(fault) = find_problem(&root) {
        return Err(IlsError::ProtocolFault(fault));
    }
    Ok(root)
}

/// Parse without the fault scan. Used when a fault is the expected content,
/// e.g. describing the body of a non-2xx HTTP response.
pub fn parse_document(body: &str) -> IlsResult<Element> {
    Element::parse(body.as_bytes())
        .map_err(|e| IlsError::Parse(format!("malformed response body: {}", e)))
}

/// Recursively scan for the first `Problem` element and extract its details
pub fn find_problem(el: &Element) -> Option<ProblemFault> {
    if el.name == "Problem" {
        return Some(ProblemFault {
            problem_type: xpath::first_text(el, &["ProblemType"]),
            detail: xpath::first_text(el, &["ProblemDetail"]),
            element: xpath::first_text(el, &["ProblemElement"]),
            value: xpath::first_text(el, &["ProblemValue"]),
        });
    }
    el.children.iter().find_map(|node| match node {
        XMLNode::Element(child) => find_problem(child),
        _ => None,
    })
}

/// Human-readable description of the problem reported in a body.
/// Returns `None` when the body is not parseable or carries no problem.
pub fn describe_problem(body: &str) -> Option<String> {
    let root = parse_document(body).ok()?;
    find_problem(&root).map(|fault| fault.to_string())
}
