//! Loan (checked-out item) records

use serde::{Deserialize, Serialize};

/// One checked-out item of a patron
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Bibliographic record id
    pub id: String,
    pub item_id: String,
    pub item_agency_id: Option<String>,
    pub patron_agency_id: Option<String>,
    /// Display-formatted due date; empty when the remote omitted it
    pub due_date: String,
    pub title: Option<String>,
    /// Always false when renewals are administratively disabled
    pub renewable: bool,
}
