//! NCIP v2 protocol layer
//!
//! Builds outbound message documents and parses inbound responses into a
//! navigable element tree with typed field-path lookups.

pub mod message;
pub mod parser;
pub mod xpath;

/// XML namespace of the NCIP v2 message envelope
pub const NCIP_NS: &str = "http://www.niso.org/2008/ncip";

pub use message::MessageBuilder;
pub use parser::parse_response;
