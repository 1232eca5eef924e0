//! Pickup locations

use serde::{Deserialize, Serialize};

/// A place a patron may collect a requested item.
/// `location_id` is the composite `agency|localCode` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupLocation {
    pub location_id: String,
    pub location_display: String,
}
