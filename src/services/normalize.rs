//! Mapping of parsed protocol fragments into canonical records.
//!
//! Vocabulary matching is case-insensitive against the configured lists.
//! Date conversion failures render as empty strings; a display-only field
//! must not abort an otherwise-successful operation.

use chrono::DateTime;
use xmltree::Element;

use crate::config::VocabularyConfig;
use crate::models::{Fine, HoldType, Holding, ItemStatus, PatronProfile, PickupLocation, RequestType};
use crate::ncip::xpath;

/// Literal status flagged separately so callers can render an explanatory
/// message rather than a plain "unavailable"
pub const STATUS_UNDEFINED: &str = "circulation status undefined";

/// Wire datetime formats, tried in order
const WIRE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%:z"];

const DISPLAY_DATE_FORMAT: &str = "%m-%d-%Y";
const DISPLAY_TIME_FORMAT: &str = "%H:%M";

/// Loan fields extracted from one `LoanedItem` element. Some responders omit
/// bib id, item agency or due date from the bulk response; the driver
/// recovers those through a secondary per-item lookup.
#[derive(Debug, Clone, Default)]
pub struct LoanDraft {
    pub item_id: String,
    pub item_id_type: Option<String>,
    pub bib_id: Option<String>,
    pub item_agency_id: Option<String>,
    pub due_date: String,
    pub title: Option<String>,
    pub renewable: bool,
}

/// Request fields extracted from one `RequestedItem` element
#[derive(Debug, Clone)]
pub struct RequestDraft {
    pub bib_id: String,
    pub request_id: Option<String>,
    pub item_id: Option<String>,
    pub item_agency_id: Option<String>,
    pub pickup_location: Option<String>,
    pub title: Option<String>,
    pub create_date: String,
    pub expire_date: String,
    pub position: Option<String>,
    pub available: bool,
    pub canceled: bool,
    pub request_type: RequestType,
}

fn contains_lowered(list: &[String], value: &str) -> bool {
    let lowered = value.to_lowercase();
    list.iter().any(|entry| entry == &lowered)
}

/// Convert a wire datetime to the display date, empty string on failure
pub fn display_date(raw: Option<&str>) -> String {
    convert_datetime(raw, DISPLAY_DATE_FORMAT)
}

/// Convert a wire datetime to the display time, empty string on failure
pub fn display_time(raw: Option<&str>) -> String {
    convert_datetime(raw, DISPLAY_TIME_FORMAT)
}

fn convert_datetime(raw: Option<&str>, display_format: &str) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    for wire_format in WIRE_DATETIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, wire_format) {
            return parsed.format(display_format).to_string();
        }
    }
    String::new()
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    available_statuses: Vec<String>,
    active_request_statuses: Vec<String>,
    request_available_status: String,
    hold_request_types: Vec<String>,
    storage_retrieval_request_types: Vec<String>,
    not_holdable_restrictions: Vec<String>,
    not_holdable_statuses: Vec<String>,
}

impl Normalizer {
    pub fn new(vocab: &VocabularyConfig) -> Self {
        let lower = |list: &[String]| list.iter().map(|s| s.to_lowercase()).collect();
        Self {
            available_statuses: lower(&vocab.available_statuses),
            active_request_statuses: lower(&vocab.active_request_statuses),
            request_available_status: vocab.request_available_status.to_lowercase(),
            hold_request_types: lower(&vocab.hold_request_types),
            storage_retrieval_request_types: lower(&vocab.storage_retrieval_request_types),
            not_holdable_restrictions: lower(&vocab.not_holdable_restrictions),
            not_holdable_statuses: lower(&vocab.not_holdable_statuses),
        }
    }

    pub fn hold_request_types(&self) -> &[String] {
        &self.hold_request_types
    }

    pub fn storage_retrieval_request_types(&self) -> &[String] {
        &self.storage_retrieval_request_types
    }

    /// Pure function of the configured vocabulary; case-insensitive
    pub fn is_available(&self, status: &str) -> bool {
        contains_lowered(&self.available_statuses, status)
    }

    /// A hold is placed on available items, a recall on charged ones
    pub fn hold_type(&self, status: &str) -> HoldType {
        if self.is_available(status) {
            HoldType::Hold
        } else {
            HoldType::Recall
        }
    }

    /// Cancellation is inferred from the absence of an active status string;
    /// an unrecognized-but-valid status therefore reads as cancelled
    pub fn is_request_cancelled(&self, status: Option<&str>) -> bool {
        match status {
            Some(status) => !contains_lowered(&self.active_request_statuses, status),
            None => true,
        }
    }

    /// Holdable unless a use restriction or circulation status is in the
    /// configured deny-lists; both checks short-circuit on first match
    pub fn is_item_holdable(&self, item: &Element) -> bool {
        for restriction in xpath::all(item, &["ItemOptionalFields", "ItemUseRestrictionType"]) {
            if contains_lowered(&self.not_holdable_restrictions, &xpath::text(restriction)) {
                return false;
            }
        }
        for status in xpath::all(item, &["ItemOptionalFields", "CirculationStatus"]) {
            if contains_lowered(&self.not_holdable_statuses, &xpath::text(status)) {
                return false;
            }
        }
        true
    }

    /// Status record from one `ItemInformation` chunk of a bulk lookup.
    /// Call number and location fall back to the holdings-set level values.
    pub fn status_chunk(
        &self,
        item: &Element,
        bib_id: &str,
        holding_call_number: Option<&str>,
        holding_location: Option<&str>,
    ) -> ItemStatus {
        let status =
            xpath::first_text(item, &["ItemOptionalFields", "CirculationStatus"]).unwrap_or_default();
        let call_number = xpath::first_text(
            item,
            &["ItemOptionalFields", "ItemDescription", "CallNumber"],
        )
        .filter(|s| !s.is_empty())
        .or_else(|| holding_call_number.map(str::to_string));
        let location = self
            .item_location(item)
            .or_else(|| holding_location.map(str::to_string));

        ItemStatus {
            id: bib_id.to_string(),
            available: self.is_available(&status),
            status_unknown: status.to_lowercase() == STATUS_UNDEFINED,
            status,
            location,
            call_number,
        }
    }

    /// Full holding record from one `ItemInformation` chunk
    pub fn holding_chunk(
        &self,
        item: &Element,
        aggregate_id: Option<&str>,
        bib_id: &str,
        holding_call_number: Option<&str>,
        holding_location: Option<&str>,
        eresource: &str,
    ) -> Holding {
        let status =
            xpath::first_text(item, &["ItemOptionalFields", "CirculationStatus"]).unwrap_or_default();
        let item_id = xpath::first_text(item, &["ItemId", "ItemIdentifierValue"]).unwrap_or_default();
        let item_type = xpath::first_text(item, &["ItemId", "ItemIdentifierType"]).unwrap_or_default();
        let item_agency_id = xpath::first_text(item, &["ItemId", "AgencyId"]).filter(|s| !s.is_empty());

        let call_number = xpath::first_text(
            item,
            &["ItemOptionalFields", "ItemDescription", "CallNumber"],
        )
        .filter(|s| !s.is_empty())
        .or_else(|| holding_call_number.map(str::to_string));
        let location = self
            .item_location(item)
            .or_else(|| holding_location.map(str::to_string));

        let number = xpath::first_text(item, &["ItemOptionalFields", "ItemDescription", "CopyNumber"])
            .unwrap_or_default();
        let volume = xpath::first_text(
            item,
            &[
                "ItemOptionalFields",
                "ItemDescription",
                "HoldingsInformation",
                "UnstructuredHoldingsData",
            ],
        )
        .unwrap_or_default();

        let barcode = if item_type == "Barcode" {
            item_id.clone()
        } else {
            "Unknown barcode".to_string()
        };

        Holding {
            id: aggregate_id.map(str::to_string),
            bib_id: bib_id.to_string(),
            item_id,
            item_agency_id,
            available: self.is_available(&status),
            is_holdable: self.is_item_holdable(item),
            hold_type: self.hold_type(&status),
            status_unknown: status.to_lowercase() == STATUS_UNDEFINED,
            status,
            location,
            call_number,
            due_date: String::new(), // not reported by the bulk lookup
            volume,
            number,
            barcode,
            eresource: eresource.to_string(),
        }
    }

    fn item_location(&self, item: &Element) -> Option<String> {
        xpath::first_text(
            item,
            &[
                "ItemOptionalFields",
                "Location",
                "LocationName",
                "LocationNameInstance",
                "LocationNameValue",
            ],
        )
        .filter(|s| !s.is_empty())
    }

    /// Loan fields from one `LoanedItem` element
    pub fn loan_draft(&self, current: &Element, disable_renewals: bool) -> LoanDraft {
        let renewable = !disable_renewals
            && xpath::first(current, &["Ext", "RenewalNotPermitted"]).is_none();

        LoanDraft {
            item_id: xpath::first_text(current, &["ItemId", "ItemIdentifierValue"])
                .unwrap_or_default(),
            item_id_type: xpath::first_text(current, &["ItemId", "ItemIdentifierType"])
                .filter(|s| !s.is_empty()),
            bib_id: xpath::first_text_of(
                current,
                &[
                    &[
                        "Ext",
                        "BibliographicDescription",
                        "BibliographicRecordId",
                        "BibliographicRecordIdentifier",
                    ],
                    &[
                        "Ext",
                        "BibliographicDescription",
                        "BibliographicItemId",
                        "BibliographicItemIdentifier",
                    ],
                ],
            ),
            item_agency_id: xpath::first_text_of(
                current,
                &[
                    &["Ext", "BibliographicDescription", "BibliographicRecordId", "AgencyId"],
                    &["ItemId", "AgencyId"],
                ],
            ),
            due_date: display_date(xpath::first_text(current, &["DateDue"]).as_deref()),
            title: xpath::first_text(current, &["Title"]).filter(|s| !s.is_empty()),
            renewable,
        }
    }

    /// Recover loan fields omitted from the bulk response out of a
    /// `LookupItemResponse`
    pub fn loan_bib_from_item_lookup(&self, root: &Element) -> Option<String> {
        xpath::first_text_of(
            root,
            &[
                &[
                    "LookupItemResponse",
                    "ItemOptionalFields",
                    "BibliographicDescription",
                    "BibliographicItemId",
                    "BibliographicItemIdentifier",
                ],
                &[
                    "LookupItemResponse",
                    "ItemOptionalFields",
                    "BibliographicDescription",
                    "BibliographicRecordId",
                    "BibliographicRecordIdentifier",
                ],
            ],
        )
    }

    pub fn loan_agency_from_item_lookup(&self, root: &Element) -> Option<String> {
        xpath::first_text_of(
            root,
            &[
                &[
                    "LookupItemResponse",
                    "ItemOptionalFields",
                    "BibliographicDescription",
                    "BibliographicRecordId",
                    "AgencyId",
                ],
                &["LookupItemResponse", "ItemId", "AgencyId"],
            ],
        )
    }

    pub fn loan_due_from_item_lookup(&self, root: &Element) -> String {
        display_date(
            xpath::first_text(root, &["LookupItemResponse", "ItemOptionalFields", "DateDue"])
                .as_deref(),
        )
    }

    /// Fine record from one `AccountDetails` element
    pub fn fine(&self, details: &Element) -> Fine {
        let amount = xpath::first_text(
            details,
            &["FiscalTransactionInformation", "Amount", "MonetaryValue"],
        )
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0);

        Fine {
            amount,
            balance: amount,
            description: xpath::first_text(
                details,
                &["FiscalTransactionInformation", "FiscalTransactionType"],
            )
            .unwrap_or_default(),
            create_date: display_date(xpath::first_text(details, &["AccrualDate"]).as_deref()),
            bib_id: xpath::first_text_of(
                details,
                &[
                    &[
                        "FiscalTransactionInformation",
                        "ItemDetails",
                        "BibliographicDescription",
                        "BibliographicRecordId",
                        "BibliographicRecordIdentifier",
                    ],
                    &[
                        "FiscalTransactionInformation",
                        "ItemDetails",
                        "BibliographicDescription",
                        "BibliographicItemId",
                        "BibliographicItemIdentifier",
                    ],
                ],
            )
            .unwrap_or_default(),
        }
    }

    /// Request record from one `RequestedItem` element, filtered by the
    /// allow-list of request-type strings (case-insensitive). Returns `None`
    /// when the request is not of a desired type.
    pub fn request(&self, current: &Element, allowed_types: &[String]) -> Option<RequestDraft> {
        let type_string = xpath::first_text(current, &["RequestType"]).unwrap_or_default();
        let type_lowered = type_string.to_lowercase();
        if !allowed_types.contains(&type_lowered) {
            return None;
        }

        let request_type = if self.storage_retrieval_request_types.contains(&type_lowered) {
            RequestType::StorageRetrieval
        } else if type_lowered == "recall" {
            RequestType::Recall
        } else {
            RequestType::Hold
        };

        let status = xpath::first_text(current, &["RequestStatusType"]).filter(|s| !s.is_empty());
        let available = status
            .as_deref()
            .map(|s| s.to_lowercase() == self.request_available_status)
            .unwrap_or(false);

        Some(RequestDraft {
            bib_id: xpath::first_text_of(
                current,
                &[
                    &[
                        "Ext",
                        "BibliographicDescription",
                        "BibliographicRecordId",
                        "BibliographicRecordIdentifier",
                    ],
                    &[
                        "Ext",
                        "BibliographicDescription",
                        "BibliographicItemId",
                        "BibliographicItemIdentifier",
                    ],
                ],
            )
            .unwrap_or_default(),
            request_id: xpath::first_text(current, &["RequestId", "RequestIdentifierValue"])
                .filter(|s| !s.is_empty()),
            item_id: xpath::first_text(current, &["ItemId", "ItemIdentifierValue"])
                .filter(|s| !s.is_empty()),
            item_agency_id: xpath::first_text(
                current,
                &["Ext", "BibliographicDescription", "BibliographicRecordId", "AgencyId"],
            )
            .filter(|s| !s.is_empty()),
            pickup_location: xpath::first_text(current, &["PickupLocation"])
                .filter(|s| !s.is_empty()),
            title: xpath::first_text(current, &["Title"]).filter(|s| !s.is_empty()),
            create_date: display_date(xpath::first_text(current, &["DatePlaced"]).as_deref()),
            expire_date: display_date(
                xpath::first_text(current, &["PickupExpiryDate"]).as_deref(),
            ),
            position: xpath::first_text(current, &["HoldQueuePosition"]).filter(|s| !s.is_empty()),
            available,
            canceled: self.is_request_cancelled(status.as_deref()),
            request_type,
        })
    }

    /// Patron profile from a `LookupUserResponse`, with fallbacks from the
    /// structured name/address forms to the unstructured ones
    pub fn profile(&self, root: &Element) -> PatronProfile {
        const OPTIONAL: &[&str] = &["LookupUserResponse", "UserOptionalFields"];

        let name_path = |leaf: &'static str| -> Vec<&'static str> {
            let mut path = OPTIONAL.to_vec();
            path.extend([
                "NameInformation",
                "PersonalNameInformation",
                "StructuredPersonalUserName",
                leaf,
            ]);
            path
        };
        let firstname = xpath::first_text(root, &name_path("GivenName")).unwrap_or_default();
        let mut lastname = xpath::first_text(root, &name_path("Surname")).unwrap_or_default();
        if firstname.is_empty() && lastname.is_empty() {
            let mut unstructured = OPTIONAL.to_vec();
            unstructured.extend([
                "NameInformation",
                "PersonalNameInformation",
                "UnstructuredPersonalUserName",
            ]);
            lastname = xpath::first_text(root, &unstructured).unwrap_or_default();
        }

        let structured = |leaf: &'static str| -> Vec<&'static str> {
            let mut path = OPTIONAL.to_vec();
            path.extend([
                "UserAddressInformation",
                "PhysicalAddress",
                "StructuredAddress",
                leaf,
            ]);
            path
        };
        let mut address1 = xpath::first_text_of(
            root,
            &[&structured("Line1"), &structured("Street")],
        )
        .unwrap_or_default();
        let mut address2 = xpath::first_text_of(
            root,
            &[&structured("Line2"), &structured("Locality")],
        )
        .unwrap_or_default();
        let mut zip = xpath::first_text(root, &structured("PostalCode")).unwrap_or_default();

        if address1.is_empty() {
            let mut unstructured = OPTIONAL.to_vec();
            unstructured.extend([
                "UserAddressInformation",
                "PhysicalAddress",
                "UnstructuredAddress",
                "UnstructuredAddressData",
            ]);
            let raw = xpath::first_text(root, &unstructured).unwrap_or_default();
            let lines: Vec<&str> = raw.lines().map(str::trim).collect();
            address1 = lines.first().copied().unwrap_or_default().to_string();
            address2 = match (lines.get(1), lines.get(2)) {
                (Some(second), Some(third)) => format!("{}, {}", second, third),
                (Some(second), None) => second.to_string(),
                _ => String::new(),
            };
            zip = lines.get(3).copied().unwrap_or_default().to_string();
        }

        PatronProfile {
            firstname,
            lastname,
            address1,
            address2,
            zip,
            phone: String::new(),
            group: String::new(),
        }
    }

    /// Pickup locations from a `LookupAgencyResponse`
    pub fn pickup_locations(&self, root: &Element) -> Vec<PickupLocation> {
        let agency_id =
            xpath::first_text(root, &["LookupAgencyResponse", "AgencyId"]).unwrap_or_default();
        xpath::all(
            root,
            &["LookupAgencyResponse", "Ext", "LocationName", "LocationNameInstance"],
        )
        .into_iter()
        .filter_map(|instance| {
            let level = xpath::first_text(instance, &["LocationNameLevel"])?;
            let name = xpath::first_text(instance, &["LocationNameValue"])?;
            if level.is_empty() || name.is_empty() {
                return None;
            }
            Some(PickupLocation {
                location_id: format!("{}|{}", agency_id, level),
                location_display: name,
            })
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VocabularyConfig;

    fn normalizer() -> Normalizer {
        Normalizer::new(&VocabularyConfig::default())
    }

    fn parse(xml: &str) -> Element {
        Element::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn availability_is_case_insensitive_and_stable() {
        let n = normalizer();
        for status in ["Not Charged", "NOT CHARGED", "not charged"] {
            assert!(n.is_available(status));
            assert!(n.is_available(&status.to_lowercase()));
        }
        assert!(!n.is_available("charged"));
        // repeated calls are pure
        assert!(n.is_available("Available On Shelf"));
        assert!(n.is_available("Available On Shelf"));
    }

    #[test]
    fn hold_type_follows_availability() {
        let n = normalizer();
        assert_eq!(n.hold_type("Not Charged"), HoldType::Hold);
        assert_eq!(n.hold_type("Charged"), HoldType::Recall);
    }

    #[test]
    fn missing_or_unknown_request_status_reads_as_cancelled() {
        let n = normalizer();
        assert!(n.is_request_cancelled(None));
        assert!(n.is_request_cancelled(Some("Expired")));
        assert!(!n.is_request_cancelled(Some("In Process")));
        assert!(!n.is_request_cancelled(Some("Available For Pickup")));
    }

    #[test]
    fn restriction_and_status_deny_lists_block_holdability() {
        let n = normalizer();
        let restricted = parse(
            "<ItemInformation><ItemOptionalFields>\
             <ItemUseRestrictionType>Not For Loan</ItemUseRestrictionType>\
             </ItemOptionalFields></ItemInformation>",
        );
        assert!(!n.is_item_holdable(&restricted));

        let lost = parse(
            "<ItemInformation><ItemOptionalFields>\
             <CirculationStatus>Lost</CirculationStatus>\
             </ItemOptionalFields></ItemInformation>",
        );
        assert!(!n.is_item_holdable(&lost));

        let plain = parse(
            "<ItemInformation><ItemOptionalFields>\
             <CirculationStatus>Not Charged</CirculationStatus>\
             </ItemOptionalFields></ItemInformation>",
        );
        assert!(n.is_item_holdable(&plain));
    }

    #[test]
    fn datetime_accepts_both_wire_formats() {
        assert_eq!(display_date(Some("2026-03-01T10:30:00+01:00")), "03-01-2026");
        assert_eq!(
            display_date(Some("2026-03-01T10:30:00.123+01:00")),
            "03-01-2026"
        );
        assert_eq!(display_time(Some("2026-03-01T10:30:00+01:00")), "10:30");
    }

    #[test]
    fn datetime_failures_are_swallowed() {
        assert_eq!(display_date(Some("tomorrow")), "");
        assert_eq!(display_date(Some("")), "");
        assert_eq!(display_date(None), "");
    }

    #[test]
    fn status_chunk_flags_undefined_status() {
        let n = normalizer();
        let item = parse(
            "<ItemInformation><ItemOptionalFields>\
             <CirculationStatus>Circulation Status Undefined</CirculationStatus>\
             </ItemOptionalFields></ItemInformation>",
        );
        let chunk = n.status_chunk(&item, "123", None, None);
        assert!(chunk.status_unknown);
        assert!(!chunk.available);
    }

    #[test]
    fn chunk_falls_back_to_holdings_level_values() {
        let n = normalizer();
        let item = parse(
            "<ItemInformation><ItemOptionalFields>\
             <CirculationStatus>Not Charged</CirculationStatus>\
             </ItemOptionalFields></ItemInformation>",
        );
        let chunk = n.status_chunk(&item, "123", Some("QA76"), Some("Main stacks"));
        assert_eq!(chunk.call_number.as_deref(), Some("QA76"));
        assert_eq!(chunk.location.as_deref(), Some("Main stacks"));
    }

    #[test]
    fn holding_barcode_requires_barcode_identifier_type() {
        let n = normalizer();
        let with_barcode = parse(
            "<ItemInformation><ItemId>\
             <ItemIdentifierType>Barcode</ItemIdentifierType>\
             <ItemIdentifierValue>31234</ItemIdentifierValue>\
             </ItemId></ItemInformation>",
        );
        let holding = n.holding_chunk(&with_barcode, None, "123", None, None, "");
        assert_eq!(holding.barcode, "31234");

        let without = parse(
            "<ItemInformation><ItemId>\
             <ItemIdentifierValue>31234</ItemIdentifierValue>\
             </ItemId></ItemInformation>",
        );
        let holding = n.holding_chunk(&without, None, "123", None, None, "");
        assert_eq!(holding.barcode, "Unknown barcode");
    }

    #[test]
    fn loan_draft_reports_missing_fields_for_secondary_lookup() {
        let n = normalizer();
        let sparse = parse(
            "<LoanedItem>\
             <ItemId><ItemIdentifierValue>IT1</ItemIdentifierValue></ItemId>\
             </LoanedItem>",
        );
        let draft = n.loan_draft(&sparse, false);
        assert_eq!(draft.item_id, "IT1");
        assert!(draft.bib_id.is_none());
        assert!(draft.item_agency_id.is_none());
        assert!(draft.due_date.is_empty());
        assert!(draft.renewable);
    }

    #[test]
    fn renewals_disabled_overrides_protocol_data() {
        let n = normalizer();
        let loan = parse(
            "<LoanedItem>\
             <ItemId><ItemIdentifierValue>IT1</ItemIdentifierValue></ItemId>\
             <DateDue>2026-04-01T00:00:00+02:00</DateDue>\
             </LoanedItem>",
        );
        assert!(n.loan_draft(&loan, false).renewable);
        assert!(!n.loan_draft(&loan, true).renewable);
    }

    #[test]
    fn renewal_not_permitted_ext_blocks_renewal() {
        let n = normalizer();
        let loan = parse(
            "<LoanedItem>\
             <ItemId><ItemIdentifierValue>IT1</ItemIdentifierValue></ItemId>\
             <Ext><RenewalNotPermitted/></Ext>\
             </LoanedItem>",
        );
        assert!(!n.loan_draft(&loan, false).renewable);
    }

    #[test]
    fn request_filter_is_case_insensitive() {
        let n = normalizer();
        let request = parse(
            "<RequestedItem>\
             <RequestType>HOLD</RequestType>\
             <RequestStatusType>In Process</RequestStatusType>\
             <Ext><BibliographicDescription><BibliographicItemId>\
             <BibliographicItemIdentifier>B1</BibliographicItemIdentifier>\
             </BibliographicItemId></BibliographicDescription></Ext>\
             </RequestedItem>",
        );
        let draft = n.request(&request, n.hold_request_types()).unwrap();
        assert_eq!(draft.bib_id, "B1");
        assert!(!draft.canceled);
        assert!(n
            .request(&request, n.storage_retrieval_request_types())
            .is_none());
    }

    #[test]
    fn request_without_active_status_is_canceled() {
        let n = normalizer();
        let request = parse(
            "<RequestedItem><RequestType>Hold</RequestType></RequestedItem>",
        );
        let draft = n.request(&request, n.hold_request_types()).unwrap();
        assert!(draft.canceled);
        assert!(!draft.available);
    }

    #[test]
    fn profile_unstructured_address_fallback() {
        let n = normalizer();
        let response = parse(
            "<NCIPMessage><LookupUserResponse><UserOptionalFields>\
             <UserAddressInformation><PhysicalAddress><UnstructuredAddress>\
             <UnstructuredAddressData>1 Library Way\nSpringfield\nWest Wing\n12345</UnstructuredAddressData>\
             </UnstructuredAddress></PhysicalAddress></UserAddressInformation>\
             </UserOptionalFields></LookupUserResponse></NCIPMessage>",
        );
        let profile = n.profile(&response);
        assert_eq!(profile.address1, "1 Library Way");
        assert_eq!(profile.address2, "Springfield, West Wing");
        assert_eq!(profile.zip, "12345");
    }

    #[test]
    fn pickup_locations_compose_agency_and_level() {
        let n = normalizer();
        let response = parse(
            "<NCIPMessage><LookupAgencyResponse>\
             <AgencyId>MZK</AgencyId>\
             <Ext><LocationName>\
             <LocationNameInstance>\
             <LocationNameLevel>1</LocationNameLevel>\
             <LocationNameValue>Main desk</LocationNameValue>\
             </LocationNameInstance>\
             <LocationNameInstance>\
             <LocationNameValue>No level</LocationNameValue>\
             </LocationNameInstance>\
             </LocationName></Ext>\
             </LookupAgencyResponse></NCIPMessage>",
        );
        let locations = n.pickup_locations(&response);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].location_id, "MZK|1");
        assert_eq!(locations[0].location_display, "Main desk");
    }
}
