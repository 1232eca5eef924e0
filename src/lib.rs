//! ILS gateway: a client library for library circulation systems.
//!
//! Speaks NCIP v2 over HTTP for circulation (statuses, holdings, patron
//! accounts, holds, storage retrievals, renewals) and the Aleph X-Server
//! REST interface for bulk status lookups. Adapters normalize vendor
//! responses into the canonical records in [`models`].

pub mod config;
pub mod error;
pub mod models;
pub mod ncip;
pub mod services;

pub use config::GatewayConfig;
pub use error::{IlsError, IlsResult, ProblemFault};
pub use services::{connect, Connector};
