//! Hold and storage-retrieval request records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Hold,
    Recall,
    StorageRetrieval,
}

/// One outstanding (or cancelled) request of a patron
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatronRequest {
    /// Bibliographic record id
    pub id: String,
    pub request_id: Option<String>,
    pub item_id: Option<String>,
    pub item_agency_id: Option<String>,
    pub pickup_location: Option<String>,
    pub title: Option<String>,
    /// Display-formatted placement date; empty when unknown
    pub create_date: String,
    /// Display-formatted pickup expiry date; empty when unknown
    pub expire_date: String,
    pub position: Option<String>,
    /// The request is ready for pickup
    pub available: bool,
    /// Inferred from the absence of an active status string
    pub canceled: bool,
    pub request_type: RequestType,
}
