//! Patron account and profile records

use serde::{Deserialize, Serialize};

/// Result of a successful login. Held by the caller for the duration of a
/// user's actions; credentials are re-sent on every operation because the
/// protocol is stateless per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatronAccount {
    pub id: String,
    pub patron_agency_id: Option<String>,
    pub cat_username: String,
    pub cat_password: String,
    pub email: Option<String>,
    pub firstname: String,
    pub lastname: String,
}

/// Patron address and name details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatronProfile {
    pub firstname: String,
    pub lastname: String,
    pub address1: String,
    pub address2: String,
    pub zip: String,
    pub phone: String,
    pub group: String,
}
