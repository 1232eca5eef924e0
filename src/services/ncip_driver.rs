//! NCIP adapter: orchestrates message building, transport and normalization.
//!
//! Read operations propagate errors; write operations (placing, cancelling,
//! renewing) never raise and instead report per-item outcomes, so one failed
//! item cannot abort a batch.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tokio::sync::OnceCell;
use xmltree::Element;

use crate::config::GatewayConfig;
use crate::error::{IlsError, IlsResult};
use crate::models::{
    CancelBatchResult, CancelOutcome, Fine, FinesSummary, HoldType, Holding, ItemStatus, Loan,
    PatronAccount, PatronProfile, PatronRequest, PickupLocation, RenewBatchResult, RenewOutcome,
    RequestOutcome,
};
use crate::ncip::message::{CancelRequestParams, RequestItemParams};
use crate::ncip::{self, parser, xpath, MessageBuilder};
use crate::services::agency::AgencyRouter;
use crate::services::normalize::{self, Normalizer};
use crate::services::pickup;
use crate::services::transport::{HttpTransport, Transport};

/// Aggregate record ids may carry a source-agency prefix, e.g. `(MZK) 1234`
static AGENCY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(([^)]+)\)\s*(.+)$").expect("valid agency prefix pattern"));

const BIB_ITEM_ID_PATHS: &[&[&str]] = &[
    &["BibliographicId", "BibliographicItemId", "BibliographicItemIdentifier"],
    &["BibliographicId", "BibliographicRecordId", "BibliographicRecordIdentifier"],
];

/// Caller-supplied parameters for placing a request
#[derive(Debug, Clone, Default)]
pub struct PlaceRequestDetails {
    pub bib_id: String,
    pub item_id: String,
    pub item_agency_id: Option<String>,
    /// Composed pickup location id, `agency|code`
    pub pickup_location: Option<String>,
    /// Last interest date, `YYYY-MM-DD`
    pub required_by: Option<String>,
    /// Defaults to a plain hold when unset
    pub hold_type: Option<HoldType>,
}

/// Functions a caller may probe for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Holds,
    StorageRetrievalRequests,
}

/// Placement-form configuration advertised per feature
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    pub hmac_keys: String,
    pub extra_fields: String,
    pub default_required_date: Option<String>,
    pub consortium: Option<bool>,
}

pub struct NcipDriver {
    builder: MessageBuilder,
    transport: Arc<dyn Transport>,
    router: AgencyRouter,
    normalizer: Normalizer,
    disable_renewals: bool,
    pickup_locations_file: Option<String>,
    pickup_locations_from_ncip: bool,
    payment_url: Option<String>,
    pickup_cache: OnceCell<Vec<PickupLocation>>,
}

impl NcipDriver {
    pub fn new(config: &GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            builder: MessageBuilder::new(config.catalog.from_agency.clone()),
            transport,
            router: AgencyRouter::from_config(&config.catalog),
            normalizer: Normalizer::new(&config.vocabulary),
            disable_renewals: config.catalog.disable_renewals,
            pickup_locations_file: config.catalog.pickup_locations_file.clone(),
            pickup_locations_from_ncip: config.catalog.pickup_locations_from_ncip,
            payment_url: config.payment.url.clone(),
            pickup_cache: OnceCell::new(),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> IlsResult<Self> {
        let transport = Arc::new(HttpTransport::new(
            &config.catalog.url,
            config.catalog.http_timeout_secs,
        )?);
        Ok(Self::new(config, transport))
    }

    async fn exchange(&self, body: &str) -> IlsResult<Element> {
        let response = self.transport.exchange(body).await?;
        parser::parse_response(&response)
    }

    /// Bulk item statuses for a list of bibliographic ids.
    ///
    /// Follows the remote's continuation token until the result set is
    /// exhausted. In consortium mode aggregate ids cannot be resolved to a
    /// single source catalog here, so the result is empty and callers fall
    /// back to per-record holdings lookups.
    pub async fn get_statuses(
        &self,
        bib_ids: &[String],
    ) -> IlsResult<IndexMap<String, Vec<ItemStatus>>> {
        let mut statuses: IndexMap<String, Vec<ItemStatus>> = IndexMap::new();
        if self.router.consortium() {
            return Ok(statuses);
        }

        let to_agency = self.router.default_agency().map(str::to_string);
        let mut token: Option<String> = None;
        loop {
            let body = self
                .builder
                .lookup_item_set(bib_ids, to_agency.as_deref(), token.as_deref());
            let root = self.exchange(&body).await?;

            for bib in xpath::all(&root, &["LookupItemSetResponse", "BibInformation"]) {
                let bib_id =
                    xpath::required_text_of(bib, BIB_ITEM_ID_PATHS, "bibliographic identifier")?;
                let entry = statuses.entry(bib_id.clone()).or_default();
                for holding_set in xpath::children(bib, "HoldingsSet") {
                    let call_number = xpath::first_text(holding_set, &["CallNumber"])
                        .filter(|s| !s.is_empty());
                    let location = holdings_level_location(holding_set);
                    for item in xpath::children(holding_set, "ItemInformation") {
                        entry.push(self.normalizer.status_chunk(
                            item,
                            &bib_id,
                            call_number.as_deref(),
                            location.as_deref(),
                        ));
                    }
                }
            }

            token = xpath::first_text(&root, &["LookupItemSetResponse", "NextItemToken"])
                .filter(|t| !t.is_empty());
            if token.is_none() {
                return Ok(statuses);
            }
        }
    }

    /// Full holdings for one record. The id may carry a source-agency prefix
    /// (`(MZK) 1234`); an unprefixed id targets the default agency.
    pub async fn get_holding(&self, id: &str) -> IlsResult<Vec<Holding>> {
        let (agency, bib_id) = self.split_aggregate_id(id);
        let aggregate_id = if agency.is_some() { Some(id) } else { None };

        let mut holdings = Vec::new();
        let to_agency = self.router.resolve(agency.as_deref()).map(str::to_string);
        let bib_ids = vec![bib_id.clone()];
        let mut token: Option<String> = None;
        loop {
            let body = self
                .builder
                .lookup_item_set(&bib_ids, to_agency.as_deref(), token.as_deref());
            let root = self.exchange(&body).await?;

            for bib in xpath::all(&root, &["LookupItemSetResponse", "BibInformation"]) {
                let response_bib =
                    xpath::required_text_of(bib, BIB_ITEM_ID_PATHS, "bibliographic identifier")?;
                for holding_set in xpath::children(bib, "HoldingsSet") {
                    let call_number = xpath::first_text(holding_set, &["CallNumber"])
                        .filter(|s| !s.is_empty());
                    let location = holdings_level_location(holding_set);
                    for item in xpath::children(holding_set, "ItemInformation") {
                        let eresource = xpath::first_text(
                            item,
                            &["ItemOptionalFields", "ElectronicResource", "ReferenceToResource"],
                        )
                        .unwrap_or_default();
                        holdings.push(self.normalizer.holding_chunk(
                            item,
                            aggregate_id,
                            &response_bib,
                            call_number.as_deref(),
                            location.as_deref(),
                            &eresource,
                        ));
                    }
                }
            }

            token = xpath::first_text(&root, &["LookupItemSetResponse", "NextItemToken"])
                .filter(|t| !t.is_empty());
            if token.is_none() {
                return Ok(holdings);
            }
        }
    }

    /// Split an aggregate record id into its source agency (when it names a
    /// configured member) and the local bibliographic id
    fn split_aggregate_id(&self, id: &str) -> (Option<String>, String) {
        if let Some(captures) = AGENCY_PREFIX.captures(id) {
            let (agency, local) = (&captures[1], &captures[2]);
            if self.router.is_member(agency) {
                return (Some(agency.to_string()), local.to_string());
            }
        }
        (None, id.to_string())
    }

    /// Authenticate a patron. `Ok(None)` means the remote rejected the
    /// credentials without raising a protocol fault.
    pub async fn patron_login(
        &self,
        username: &str,
        password: &str,
    ) -> IlsResult<Option<PatronAccount>> {
        let extras = vec![
            ncip::message::user_element("User Address Information"),
            ncip::message::user_element("Name Information"),
        ];
        let body = self.builder.lookup_user(
            username,
            password,
            self.router.default_agency(),
            Some(username),
            &extras,
        );
        let root = self.exchange(&body).await?;

        let Some(id) = xpath::first_text(
            &root,
            &["LookupUserResponse", "UserId", "UserIdentifierValue"],
        )
        .filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let patron_agency_id = xpath::first_text(&root, &["LookupUserResponse", "UserId", "AgencyId"])
            .filter(|s| !s.is_empty())
            .or_else(|| self.router.default_agency().map(str::to_string));
        let profile = self.normalizer.profile(&root);
        let email = xpath::first_text(
            &root,
            &[
                "LookupUserResponse",
                "UserOptionalFields",
                "UserAddressInformation",
                "ElectronicAddress",
                "ElectronicAddressData",
            ],
        )
        .filter(|s| !s.is_empty());

        Ok(Some(PatronAccount {
            id,
            patron_agency_id,
            cat_username: username.to_string(),
            cat_password: password.to_string(),
            email,
            firstname: profile.firstname,
            lastname: profile.lastname,
        }))
    }

    fn patron_lookup_body(&self, patron: &PatronAccount, extras: &[String]) -> String {
        self.builder.lookup_user(
            &patron.cat_username,
            &patron.cat_password,
            patron
                .patron_agency_id
                .as_deref()
                .or_else(|| self.router.default_agency()),
            Some(&patron.id),
            extras,
        )
    }

    /// Checked-out items of a patron. Responders routinely omit the bib id,
    /// item agency or due date from the bulk response; those are recovered
    /// through a per-item lookup, with a placeholder bib id as last resort.
    pub async fn get_my_transactions(&self, patron: &PatronAccount) -> IlsResult<Vec<Loan>> {
        let extras = vec![ncip::message::desired("LoanedItemsDesired")];
        let root = self.exchange(&self.patron_lookup_body(patron, &extras)).await?;

        let mut loans = Vec::new();
        for current in xpath::all(&root, &["LookupUserResponse", "LoanedItem"]) {
            let mut draft = self.normalizer.loan_draft(current, self.disable_renewals);
            if draft.item_id.is_empty() {
                continue;
            }

            if draft.bib_id.is_none() || draft.item_agency_id.is_none() || draft.due_date.is_empty()
            {
                let body = self.builder.lookup_item(
                    &draft.item_id,
                    draft.item_id_type.as_deref(),
                    draft
                        .item_agency_id
                        .as_deref()
                        .or(patron.patron_agency_id.as_deref()),
                );
                match self.exchange(&body).await {
                    Ok(item_root) => {
                        if draft.bib_id.is_none() {
                            draft.bib_id = self.normalizer.loan_bib_from_item_lookup(&item_root);
                        }
                        if draft.item_agency_id.is_none() {
                            draft.item_agency_id =
                                self.normalizer.loan_agency_from_item_lookup(&item_root);
                        }
                        if draft.due_date.is_empty() {
                            draft.due_date = self.normalizer.loan_due_from_item_lookup(&item_root);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            "secondary lookup for item {} failed: {}",
                            draft.item_id,
                            e
                        );
                    }
                }
            }

            loans.push(Loan {
                // Some systems cannot provide the bib id at all; a non-empty
                // placeholder keeps the record addressable downstream
                id: draft.bib_id.unwrap_or_else(|| "1".to_string()),
                item_id: draft.item_id,
                item_agency_id: draft.item_agency_id,
                patron_agency_id: patron.patron_agency_id.clone(),
                due_date: draft.due_date,
                title: draft.title,
                renewable: draft.renewable,
            });
        }
        Ok(loans)
    }

    /// Fiscal account entries of a patron
    pub async fn get_my_fines(&self, patron: &PatronAccount) -> IlsResult<Vec<Fine>> {
        let extras = vec![ncip::message::desired("UserFiscalAccountDesired")];
        let root = self.exchange(&self.patron_lookup_body(patron, &extras)).await?;
        Ok(xpath::all(
            &root,
            &["LookupUserResponse", "UserFiscalAccount", "AccountDetails"],
        )
        .into_iter()
        .map(|details| self.normalizer.fine(details))
        .collect())
    }

    /// Fines plus their aggregate, including the payment link for a payable
    /// (credit-convention) balance
    pub async fn get_my_fines_summary(
        &self,
        patron: &PatronAccount,
    ) -> IlsResult<(Vec<Fine>, FinesSummary)> {
        let fines = self.get_my_fines(patron).await?;
        let summary = FinesSummary::summarize(&fines, self.payment_url.as_deref());
        Ok((fines, summary))
    }

    pub async fn get_my_holds(&self, patron: &PatronAccount) -> IlsResult<Vec<PatronRequest>> {
        self.get_my_requests(patron, self.normalizer.hold_request_types().to_vec())
            .await
    }

    pub async fn get_my_storage_retrieval_requests(
        &self,
        patron: &PatronAccount,
    ) -> IlsResult<Vec<PatronRequest>> {
        self.get_my_requests(
            patron,
            self.normalizer.storage_retrieval_request_types().to_vec(),
        )
        .await
    }

    async fn get_my_requests(
        &self,
        patron: &PatronAccount,
        allowed_types: Vec<String>,
    ) -> IlsResult<Vec<PatronRequest>> {
        let extras = vec![ncip::message::desired("RequestedItemsDesired")];
        let root = self.exchange(&self.patron_lookup_body(patron, &extras)).await?;

        Ok(xpath::all(&root, &["LookupUserResponse", "RequestedItem"])
            .into_iter()
            .filter_map(|current| self.normalizer.request(current, &allowed_types))
            .map(|draft| PatronRequest {
                id: draft.bib_id,
                request_id: draft.request_id,
                item_id: draft.item_id,
                item_agency_id: draft.item_agency_id,
                pickup_location: draft.pickup_location,
                title: draft.title,
                create_date: draft.create_date,
                expire_date: draft.expire_date,
                position: draft.position,
                available: draft.available,
                canceled: draft.canceled,
                request_type: draft.request_type,
            })
            .collect())
    }

    /// Name and address details of a patron
    pub async fn get_my_profile(&self, patron: &PatronAccount) -> IlsResult<PatronProfile> {
        let extras = vec![
            ncip::message::user_element("User Address Information"),
            ncip::message::user_element("Name Information"),
        ];
        let root = self.exchange(&self.patron_lookup_body(patron, &extras)).await?;
        Ok(self.normalizer.profile(&root))
    }

    /// Place a hold or recall
    pub async fn place_hold(
        &self,
        patron: &PatronAccount,
        details: &PlaceRequestDetails,
    ) -> RequestOutcome {
        let request_type = details.hold_type.unwrap_or(HoldType::Hold).as_str();
        self.place_request(patron, details, request_type).await
    }

    /// Place a storage (stack) retrieval request
    pub async fn place_storage_retrieval_request(
        &self,
        patron: &PatronAccount,
        details: &PlaceRequestDetails,
    ) -> RequestOutcome {
        self.place_request(patron, details, "Stack Retrieval").await
    }

    async fn place_request(
        &self,
        patron: &PatronAccount,
        details: &PlaceRequestDetails,
        request_type: &str,
    ) -> RequestOutcome {
        // Composed pickup ids carry the agency before the code
        let pickup_code = details
            .pickup_location
            .as_deref()
            .map(|composed| composed.split('|').next_back().unwrap_or(composed).to_string())
            .filter(|s| !s.is_empty());
        let need_before = details
            .required_by
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|date| format!("{}T23:59:59Z", date));

        let params = RequestItemParams {
            username: patron.cat_username.clone(),
            password: patron.cat_password.clone(),
            bib_id: details.bib_id.clone(),
            item_id: details.item_id.clone(),
            patron_agency_id: patron.patron_agency_id.clone(),
            item_agency_id: details.item_agency_id.clone(),
            patron_id: Some(patron.id.clone()),
            request_type: request_type.to_string(),
            request_scope: "Item".to_string(),
            pickup_location: pickup_code,
            need_before,
        };
        let body = self.builder.request_item(&params);

        match self.exchange(&body).await {
            Ok(root) => {
                let confirmed = xpath::first_text_of(
                    &root,
                    &[
                        &["RequestItemResponse", "ItemId", "ItemIdentifierValue"],
                        &["RequestItemResponse", "RequestId", "RequestIdentifierValue"],
                    ],
                )
                .filter(|s| !s.is_empty())
                .is_some();
                RequestOutcome {
                    success: confirmed,
                    sys_message: if confirmed {
                        String::new()
                    } else {
                        "Request was not confirmed by the library system".to_string()
                    },
                }
            }
            Err(e) => RequestOutcome {
                success: false,
                sys_message: e.to_string(),
            },
        }
    }

    /// Cancel a batch of holds. Each entry is independent; one failure never
    /// aborts the rest.
    pub async fn cancel_holds(
        &self,
        patron: &PatronAccount,
        cancel_details: &[String],
    ) -> CancelBatchResult {
        self.cancel_requests(patron, cancel_details, "Hold", "hold_cancel")
            .await
    }

    pub async fn cancel_storage_retrieval_requests(
        &self,
        patron: &PatronAccount,
        cancel_details: &[String],
    ) -> CancelBatchResult {
        self.cancel_requests(
            patron,
            cancel_details,
            "Stack Retrieval",
            "storage_retrieval_request_cancel",
        )
        .await
    }

    async fn cancel_requests(
        &self,
        patron: &PatronAccount,
        cancel_details: &[String],
        request_type: &str,
        message_prefix: &str,
    ) -> CancelBatchResult {
        let mut result = CancelBatchResult {
            count: 0,
            items: std::collections::HashMap::new(),
        };

        for detail in cancel_details {
            let (item_agency_id, request_id, item_id) = split_cancel_detail(detail);
            let key = item_id
                .clone()
                .or_else(|| request_id.clone())
                .unwrap_or_else(|| detail.clone());

            let success = self
                .cancel_one(patron, item_agency_id, request_id, item_id, request_type)
                .await;
            if success {
                result.count += 1;
            }
            let status = format!(
                "{}_{}",
                message_prefix,
                if success { "success" } else { "fail" }
            );
            result.items.insert(key, CancelOutcome { success, status });
        }
        result
    }

    async fn cancel_one(
        &self,
        patron: &PatronAccount,
        item_agency_id: Option<String>,
        request_id: Option<String>,
        item_id: Option<String>,
        request_type: &str,
    ) -> bool {
        let params = CancelRequestParams {
            username: patron.cat_username.clone(),
            password: patron.cat_password.clone(),
            patron_agency_id: patron.patron_agency_id.clone(),
            item_agency_id,
            request_id,
            item_id,
            patron_id: Some(patron.id.clone()),
            request_type: request_type.to_string(),
        };
        let body = match self.builder.cancel_request_item(&params) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("cancel request rejected: {}", e);
                return false;
            }
        };
        match self.exchange(&body).await {
            // Confirmation is the echoed user id in the response
            Ok(root) => xpath::first_text(
                &root,
                &["CancelRequestItemResponse", "UserId", "UserIdentifierValue"],
            )
            .filter(|s| !s.is_empty())
            .is_some(),
            Err(e) => {
                tracing::warn!("cancel request failed: {}", e);
                false
            }
        }
    }

    /// Renew a batch of loans. With renewals administratively disabled every
    /// item fails without any network traffic.
    pub async fn renew_my_items(
        &self,
        patron: &PatronAccount,
        renew_details: &[String],
    ) -> RenewBatchResult {
        let mut result = RenewBatchResult {
            blocks: false,
            details: std::collections::HashMap::new(),
        };

        for detail in renew_details {
            let (item_agency_id, item_id) = split_renew_detail(detail);
            let outcome = if self.disable_renewals {
                RenewOutcome {
                    success: false,
                    item_id: item_id.clone(),
                    new_date: None,
                    new_time: None,
                }
            } else {
                self.renew_one(patron, item_agency_id.as_deref(), &item_id)
                    .await
            };
            result.details.insert(item_id, outcome);
        }
        result
    }

    async fn renew_one(
        &self,
        patron: &PatronAccount,
        item_agency_id: Option<&str>,
        item_id: &str,
    ) -> RenewOutcome {
        let body = self.builder.renew_item(
            &patron.cat_username,
            &patron.cat_password,
            patron
                .patron_agency_id
                .as_deref()
                .or_else(|| self.router.default_agency()),
            Some(&patron.id),
            item_agency_id,
            item_id,
        );

        let due = match self.exchange(&body).await {
            Ok(root) => xpath::first_text(&root, &["RenewItemResponse", "DateDue"])
                .filter(|s| !s.is_empty()),
            Err(e) => {
                tracing::warn!("renewal of item {} failed: {}", item_id, e);
                None
            }
        };
        match due {
            Some(raw) => RenewOutcome {
                success: true,
                item_id: item_id.to_string(),
                new_date: Some(normalize::display_date(Some(&raw))),
                new_time: Some(normalize::display_time(Some(&raw))),
            },
            None => RenewOutcome {
                success: false,
                item_id: item_id.to_string(),
                new_date: None,
                new_time: None,
            },
        }
    }

    /// Pickup locations, resolved once per process. A configured file takes
    /// precedence over the protocol lookup.
    pub async fn get_pickup_locations(&self) -> IlsResult<Vec<PickupLocation>> {
        let locations = self
            .pickup_cache
            .get_or_try_init(|| async { self.load_pickup_locations().await })
            .await?;
        Ok(locations.clone())
    }

    async fn load_pickup_locations(&self) -> IlsResult<Vec<PickupLocation>> {
        if let Some(path) = &self.pickup_locations_file {
            return pickup::load_from_file(path).await;
        }
        if self.pickup_locations_from_ncip {
            let body = self.builder.lookup_agency(self.router.default_agency());
            // The agency lookup is optional on the remote side; a responder
            // that does not implement it degrades to an empty directory
            return match self.exchange(&body).await {
                Ok(root) => Ok(self.normalizer.pickup_locations(&root)),
                Err(e) => {
                    tracing::warn!("pickup location lookup failed: {}", e);
                    Ok(Vec::new())
                }
            };
        }
        Err(IlsError::Config(
            "no pickup location source configured".to_string(),
        ))
    }

    /// First pickup location of the patron's agency, falling back to the
    /// first location overall
    pub async fn get_default_pickup_location(
        &self,
        patron: &PatronAccount,
    ) -> IlsResult<Option<PickupLocation>> {
        let locations = self.get_pickup_locations().await?;
        let preferred = patron
            .patron_agency_id
            .as_deref()
            .map(|agency| format!("{}|", agency));
        Ok(preferred
            .and_then(|prefix| {
                locations
                    .iter()
                    .find(|l| l.location_id.starts_with(&prefix))
                    .cloned()
            })
            .or_else(|| locations.first().cloned()))
    }

    /// Opaque token identifying a request in a later cancel batch
    pub fn get_cancel_request_details(&self, request: &PatronRequest) -> String {
        format!(
            "{}|{}|{}",
            request.item_agency_id.as_deref().unwrap_or_default(),
            request.request_id.as_deref().unwrap_or_default(),
            request.item_id.as_deref().unwrap_or_default(),
        )
    }

    /// Opaque token identifying a loan in a later renew batch
    pub fn get_renew_details(&self, loan: &Loan) -> String {
        format!(
            "{}|{}",
            loan.item_agency_id.as_deref().unwrap_or_default(),
            loan.item_id,
        )
    }

    /// Placement-form configuration the caller renders for a feature
    pub fn feature_config(&self, feature: Feature) -> Option<FeatureConfig> {
        match feature {
            Feature::Holds => Some(FeatureConfig {
                hmac_keys: "item_id:holdtype:item_agency_id:id:bib_id".to_string(),
                extra_fields: "comments:requiredByDate:pickUpLocation".to_string(),
                default_required_date: Some("0:1:0".to_string()),
                consortium: Some(self.router.consortium()),
            }),
            Feature::StorageRetrievalRequests => Some(FeatureConfig {
                hmac_keys: "id:item_id:item_agency_id:bib_id".to_string(),
                extra_fields: "comments:requiredByDate:pickUpLocation".to_string(),
                default_required_date: Some("0:1:0".to_string()),
                consortium: None,
            }),
        }
    }
}

fn holdings_level_location(holding_set: &Element) -> Option<String> {
    xpath::first_text(
        holding_set,
        &[
            "Location",
            "LocationName",
            "LocationNameInstance",
            "LocationNameValue",
        ],
    )
    .filter(|s| !s.is_empty())
}

/// Split `agency|requestId|itemId`; empty positions become `None`
fn split_cancel_detail(detail: &str) -> (Option<String>, Option<String>, Option<String>) {
    let mut parts = detail.splitn(3, '|');
    let mut next = || {
        parts
            .next()
            .map(str::to_string)
            .filter(|s| !s.is_empty())
    };
    (next(), next(), next())
}

/// Split `agency|itemId`; a bare id has no agency
fn split_renew_detail(detail: &str) -> (Option<String>, String) {
    match detail.split_once('|') {
        Some((agency, item)) => (
            Some(agency.to_string()).filter(|s| !s.is_empty()),
            item.to_string(),
        ),
        None => (None, detail.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_detail_splits_with_empty_positions() {
        assert_eq!(
            split_cancel_detail("MZK|R9|IT1"),
            (Some("MZK".into()), Some("R9".into()), Some("IT1".into()))
        );
        assert_eq!(
            split_cancel_detail("|R9|"),
            (None, Some("R9".into()), None)
        );
        assert_eq!(split_cancel_detail("||IT1"), (None, None, Some("IT1".into())));
    }

    #[test]
    fn renew_detail_tolerates_bare_item_id() {
        assert_eq!(
            split_renew_detail("MZK|IT1"),
            (Some("MZK".into()), "IT1".into())
        );
        assert_eq!(split_renew_detail("IT1"), (None, "IT1".into()));
        assert_eq!(split_renew_detail("|IT1"), (None, "IT1".into()));
    }

    #[test]
    fn hold_feature_advertises_consortium_flag() {
        let config = GatewayConfig {
            catalog: crate::config::CatalogConfig {
                consortium: true,
                agency: vec!["MZK".to_string()],
                ..Default::default()
            },
            vocabulary: Default::default(),
            payment: Default::default(),
            aleph: None,
            logging: Default::default(),
        };
        let transport = Arc::new(NullTransport);
        let driver = NcipDriver::new(&config, transport);

        let holds = driver.feature_config(Feature::Holds).unwrap();
        assert_eq!(holds.consortium, Some(true));
        assert!(holds.hmac_keys.contains("item_id"));
        let storage = driver
            .feature_config(Feature::StorageRetrievalRequests)
            .unwrap();
        assert_eq!(storage.consortium, None);
    }

    struct NullTransport;

    #[async_trait::async_trait]
    impl Transport for NullTransport {
        async fn exchange(&self, _body: &str) -> IlsResult<String> {
            Err(IlsError::Transport("no transport in this test".to_string()))
        }
    }
}
