//! Adapters and the capability surface they expose.
//!
//! Callers hold a [`Connector`] and probe it for capabilities instead of
//! matching on the configured vendor; a capability that the configured
//! adapter does not implement is simply absent.

pub mod agency;
pub mod aleph;
pub mod ncip_driver;
pub mod normalize;
pub mod pickup;
pub mod transport;

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;

use crate::config::{DriverKind, GatewayConfig};
use crate::error::{IlsError, IlsResult};
use crate::models::{
    CancelBatchResult, Fine, FinesSummary, Holding, ItemStatus, Loan, PatronAccount,
    PatronProfile, PatronRequest, PickupLocation, RenewBatchResult, RequestOutcome,
};

pub use aleph::AlephDriver;
pub use ncip_driver::{Feature, FeatureConfig, NcipDriver, PlaceRequestDetails};
pub use transport::{HttpTransport, Transport};

#[async_trait]
pub trait StatusLookup: Send + Sync {
    async fn get_statuses(&self, ids: &[String]) -> IlsResult<IndexMap<String, Vec<ItemStatus>>>;
}

#[async_trait]
pub trait HoldingsLookup: Send + Sync {
    async fn get_holding(&self, id: &str) -> IlsResult<Vec<Holding>>;
}

#[async_trait]
pub trait PatronAuth: Send + Sync {
    async fn patron_login(&self, username: &str, password: &str)
        -> IlsResult<Option<PatronAccount>>;
}

#[async_trait]
pub trait AccountView: Send + Sync {
    async fn get_my_transactions(&self, patron: &PatronAccount) -> IlsResult<Vec<Loan>>;
    async fn get_my_fines(&self, patron: &PatronAccount) -> IlsResult<Vec<Fine>>;
    async fn get_my_fines_summary(
        &self,
        patron: &PatronAccount,
    ) -> IlsResult<(Vec<Fine>, FinesSummary)>;
    async fn get_my_holds(&self, patron: &PatronAccount) -> IlsResult<Vec<PatronRequest>>;
    async fn get_my_storage_retrieval_requests(
        &self,
        patron: &PatronAccount,
    ) -> IlsResult<Vec<PatronRequest>>;
    async fn get_my_profile(&self, patron: &PatronAccount) -> IlsResult<PatronProfile>;
}

#[async_trait]
pub trait RequestPlacement: Send + Sync {
    async fn place_hold(
        &self,
        patron: &PatronAccount,
        details: &PlaceRequestDetails,
    ) -> RequestOutcome;
    async fn place_storage_retrieval_request(
        &self,
        patron: &PatronAccount,
        details: &PlaceRequestDetails,
    ) -> RequestOutcome;
}

#[async_trait]
pub trait RequestCancellation: Send + Sync {
    async fn cancel_holds(
        &self,
        patron: &PatronAccount,
        cancel_details: &[String],
    ) -> CancelBatchResult;
    async fn cancel_storage_retrieval_requests(
        &self,
        patron: &PatronAccount,
        cancel_details: &[String],
    ) -> CancelBatchResult;
    fn get_cancel_request_details(&self, request: &PatronRequest) -> String;
}

#[async_trait]
pub trait Renewal: Send + Sync {
    async fn renew_my_items(
        &self,
        patron: &PatronAccount,
        renew_details: &[String],
    ) -> RenewBatchResult;
    fn get_renew_details(&self, loan: &Loan) -> String;
}

#[async_trait]
pub trait PickupDirectory: Send + Sync {
    async fn get_pickup_locations(&self) -> IlsResult<Vec<PickupLocation>>;
    async fn get_default_pickup_location(
        &self,
        patron: &PatronAccount,
    ) -> IlsResult<Option<PickupLocation>>;
}

#[async_trait]
impl StatusLookup for NcipDriver {
    async fn get_statuses(&self, ids: &[String]) -> IlsResult<IndexMap<String, Vec<ItemStatus>>> {
        NcipDriver::get_statuses(self, ids).await
    }
}

#[async_trait]
impl HoldingsLookup for NcipDriver {
    async fn get_holding(&self, id: &str) -> IlsResult<Vec<Holding>> {
        NcipDriver::get_holding(self, id).await
    }
}

#[async_trait]
impl PatronAuth for NcipDriver {
    async fn patron_login(
        &self,
        username: &str,
        password: &str,
    ) -> IlsResult<Option<PatronAccount>> {
        NcipDriver::patron_login(self, username, password).await
    }
}

#[async_trait]
impl AccountView for NcipDriver {
    async fn get_my_transactions(&self, patron: &PatronAccount) -> IlsResult<Vec<Loan>> {
        NcipDriver::get_my_transactions(self, patron).await
    }
    async fn get_my_fines(&self, patron: &PatronAccount) -> IlsResult<Vec<Fine>> {
        NcipDriver::get_my_fines(self, patron).await
    }
    async fn get_my_fines_summary(
        &self,
        patron: &PatronAccount,
    ) -> IlsResult<(Vec<Fine>, FinesSummary)> {
        NcipDriver::get_my_fines_summary(self, patron).await
    }
    async fn get_my_holds(&self, patron: &PatronAccount) -> IlsResult<Vec<PatronRequest>> {
        NcipDriver::get_my_holds(self, patron).await
    }
    async fn get_my_storage_retrieval_requests(
        &self,
        patron: &PatronAccount,
    ) -> IlsResult<Vec<PatronRequest>> {
        NcipDriver::get_my_storage_retrieval_requests(self, patron).await
    }
    async fn get_my_profile(&self, patron: &PatronAccount) -> IlsResult<PatronProfile> {
        NcipDriver::get_my_profile(self, patron).await
    }
}

#[async_trait]
impl RequestPlacement for NcipDriver {
    async fn place_hold(
        &self,
        patron: &PatronAccount,
        details: &PlaceRequestDetails,
    ) -> RequestOutcome {
        NcipDriver::place_hold(self, patron, details).await
    }
    async fn place_storage_retrieval_request(
        &self,
        patron: &PatronAccount,
        details: &PlaceRequestDetails,
    ) -> RequestOutcome {
        NcipDriver::place_storage_retrieval_request(self, patron, details).await
    }
}

#[async_trait]
impl RequestCancellation for NcipDriver {
    async fn cancel_holds(
        &self,
        patron: &PatronAccount,
        cancel_details: &[String],
    ) -> CancelBatchResult {
        NcipDriver::cancel_holds(self, patron, cancel_details).await
    }
    async fn cancel_storage_retrieval_requests(
        &self,
        patron: &PatronAccount,
        cancel_details: &[String],
    ) -> CancelBatchResult {
        NcipDriver::cancel_storage_retrieval_requests(self, patron, cancel_details).await
    }
    fn get_cancel_request_details(&self, request: &PatronRequest) -> String {
        NcipDriver::get_cancel_request_details(self, request)
    }
}

#[async_trait]
impl Renewal for NcipDriver {
    async fn renew_my_items(
        &self,
        patron: &PatronAccount,
        renew_details: &[String],
    ) -> RenewBatchResult {
        NcipDriver::renew_my_items(self, patron, renew_details).await
    }
    fn get_renew_details(&self, loan: &Loan) -> String {
        NcipDriver::get_renew_details(self, loan)
    }
}

#[async_trait]
impl PickupDirectory for NcipDriver {
    async fn get_pickup_locations(&self) -> IlsResult<Vec<PickupLocation>> {
        NcipDriver::get_pickup_locations(self).await
    }
    async fn get_default_pickup_location(
        &self,
        patron: &PatronAccount,
    ) -> IlsResult<Option<PickupLocation>> {
        NcipDriver::get_default_pickup_location(self, patron).await
    }
}

#[async_trait]
impl StatusLookup for AlephDriver {
    async fn get_statuses(&self, ids: &[String]) -> IlsResult<IndexMap<String, Vec<ItemStatus>>> {
        let flat = AlephDriver::get_statuses(self, ids).await?;
        let mut grouped: IndexMap<String, Vec<ItemStatus>> = IndexMap::new();
        for (_, status) in flat {
            grouped.entry(status.id.clone()).or_default().push(status);
        }
        Ok(grouped)
    }
}

/// The connected adapter with its advertised capabilities
pub struct Connector {
    pub status: Arc<dyn StatusLookup>,
    pub holdings: Option<Arc<dyn HoldingsLookup>>,
    pub auth: Option<Arc<dyn PatronAuth>>,
    pub account: Option<Arc<dyn AccountView>>,
    pub placement: Option<Arc<dyn RequestPlacement>>,
    pub cancellation: Option<Arc<dyn RequestCancellation>>,
    pub renewal: Option<Arc<dyn Renewal>>,
    pub pickup: Option<Arc<dyn PickupDirectory>>,
}

/// Build the adapter the configuration selects
pub fn connect(config: &GatewayConfig) -> IlsResult<Connector> {
    match config.catalog.driver {
        DriverKind::Ncip => {
            let driver = Arc::new(NcipDriver::from_config(config)?);
            Ok(Connector {
                status: driver.clone(),
                holdings: Some(driver.clone()),
                auth: Some(driver.clone()),
                account: Some(driver.clone()),
                placement: Some(driver.clone()),
                cancellation: Some(driver.clone()),
                renewal: Some(driver.clone()),
                pickup: Some(driver),
            })
        }
        DriverKind::Aleph => {
            let aleph = config.aleph.as_ref().ok_or_else(|| {
                IlsError::Config("aleph driver selected but [aleph] is not configured".to_string())
            })?;
            let driver = Arc::new(AlephDriver::from_config(
                aleph,
                config.catalog.http_timeout_secs,
            )?);
            Ok(Connector {
                status: driver,
                holdings: None,
                auth: None,
                account: None,
                placement: None,
                cancellation: None,
                renewal: None,
                pickup: None,
            })
        }
    }
}
