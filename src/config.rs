//! Configuration management for the ILS gateway

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Which vendor adapter to build
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    #[default]
    Ncip,
    Aleph,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// NCIP responder URL
    pub url: String,
    /// Agency of the initiating system; initiation headers are omitted when unset
    pub from_agency: Option<String>,
    /// Participating agencies; first entry is the default target
    pub agency: Vec<String>,
    /// Consortium mode: multiple agencies considered together
    pub consortium: bool,
    pub http_timeout_secs: u64,
    pub disable_renewals: bool,
    /// Delimited pickup-locations file; takes precedence over the protocol lookup
    pub pickup_locations_file: Option<String>,
    /// Load pickup locations via a LookupAgency call
    pub pickup_locations_from_ncip: bool,
    pub driver: DriverKind,
}

/// Status-string vocabularies matched case-insensitively against protocol data
#[derive(Debug, Deserialize, Clone)]
pub struct VocabularyConfig {
    pub available_statuses: Vec<String>,
    pub active_request_statuses: Vec<String>,
    pub request_available_status: String,
    pub hold_request_types: Vec<String>,
    pub storage_retrieval_request_types: Vec<String>,
    pub not_holdable_restrictions: Vec<String>,
    pub not_holdable_statuses: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PaymentConfig {
    /// Base URL for fine payment; a payable balance appends the amount
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlephConfig {
    pub base_url: String,
    pub available_statuses: Vec<String>,
    /// Above this many ids the lookup switches to one request per item; -1 means no limit
    pub max_items_parsed: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    pub aleph: Option<AlephConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("ILS")
                    .separator("_")
                    .try_parsing(true),
            )
            .set_override_option("catalog.url", env::var("ILS_CATALOG_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9000/ncip".to_string(),
            from_agency: None,
            agency: Vec::new(),
            consortium: false,
            http_timeout_secs: 30,
            disable_renewals: false,
            pickup_locations_file: None,
            pickup_locations_from_ncip: false,
            driver: DriverKind::Ncip,
        }
    }
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            available_statuses: vec![
                "not charged".to_string(),
                "available on shelf".to_string(),
            ],
            active_request_statuses: vec![
                "available for pickup".to_string(),
                "in process".to_string(),
            ],
            request_available_status: "available for pickup".to_string(),
            hold_request_types: vec!["hold".to_string(), "recall".to_string()],
            storage_retrieval_request_types: vec!["stack retrieval".to_string()],
            not_holdable_restrictions: vec!["not for loan".to_string()],
            not_holdable_statuses: vec![
                "circulation status undefined".to_string(),
                "not available".to_string(),
                "lost".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
