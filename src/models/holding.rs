//! Item status and holding records

use serde::{Deserialize, Serialize};

/// Kind of request that can be placed against an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldType {
    Hold,
    Recall,
}

impl HoldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldType::Hold => "Hold",
            HoldType::Recall => "Recall",
        }
    }
}

/// Status summary for one item, as returned by a bulk status lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStatus {
    /// Bibliographic record id this item belongs to
    pub id: String,
    pub status: String,
    pub location: Option<String>,
    pub call_number: Option<String>,
    pub available: bool,
    /// Set when the remote reported the literal "circulation status undefined",
    /// so callers can render an explanatory message instead of "unavailable"
    pub status_unknown: bool,
}

/// Full holding record for one item. Derived fresh on every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    /// Aggregate (possibly consortial) record id the lookup was issued for
    pub id: Option<String>,
    pub bib_id: String,
    pub item_id: String,
    pub item_agency_id: Option<String>,
    pub status: String,
    pub available: bool,
    pub location: Option<String>,
    pub call_number: Option<String>,
    pub due_date: String,
    pub volume: String,
    pub number: String,
    pub barcode: String,
    pub is_holdable: bool,
    pub hold_type: HoldType,
    pub eresource: String,
    pub status_unknown: bool,
}
