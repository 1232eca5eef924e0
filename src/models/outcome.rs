//! Per-item result structures for batched write operations.
//!
//! Write operations never raise; they return these structures so that
//! partial success is always representable to the caller.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of placing a hold or storage-retrieval request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub success: bool,
    /// Human-readable message key rendered by the caller
    pub sys_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOutcome {
    pub success: bool,
    /// Message key, e.g. "hold_cancel_success"
    pub status: String,
}

/// Aggregate over a cancel batch: count of successes plus one entry per
/// requested item, keyed by item id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBatchResult {
    pub count: usize,
    pub items: HashMap<String, CancelOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewOutcome {
    pub success: bool,
    pub item_id: String,
    pub new_date: Option<String>,
    pub new_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewBatchResult {
    /// The remote system never blocks renewals wholesale over this protocol
    pub blocks: bool,
    pub details: HashMap<String, RenewOutcome>,
}
