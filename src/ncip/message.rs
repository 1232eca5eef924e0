//! Outbound NCIP message construction.
//!
//! Every builder takes already-validated canonical parameters and returns a
//! complete request document; no I/O happens here. The only synchronous
//! rejection is a cancel request carrying neither identifier.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::NCIP_NS;
use crate::error::{IlsError, IlsResult};

/// Scheme URIs preset for certain elements, per the NCIP implementation
/// profile. Elements absent from this table get no scheme attribute.
static SCHEMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "AgencyElementType",
            "http://www.niso.org/ncip/v1_0/imp1/schemes/agencyelementtype/agencyelementtype.scm",
        ),
        (
            "AuthenticationDataFormatType",
            "http://www.iana.org/assignments/media-types/",
        ),
        (
            "AuthenticationInputType",
            "http://www.niso.org/ncip/v1_0/imp1/schemes/authenticationinputtype/authenticationinputype.scm",
        ),
        (
            "BibliographicItemIdentifierCode",
            "http://www.niso.org/ncip/v1_0/imp1/schemes/bibliographicitemidentifiercode/bibliographicitemidentifiercode.scm",
        ),
        (
            "ItemElementType",
            "http://www.niso.org/ncip/v1_0/schemes/itemelementtype/itemelementtype.scm",
        ),
        (
            "RequestScopeType",
            "http://www.niso.org/ncip/v1_0/imp1/schemes/requestscopetype/requestscopetype.scm",
        ),
        (
            "RequestType",
            "http://www.niso.org/ncip/v1_0/imp1/schemes/requesttype/requesttype.scm",
        ),
        (
            "UserElementType",
            "http://www.niso.org/ncip/v1_0/schemes/userelementtype/userelementtype.scm",
        ),
    ])
});

/// Item data requested by bulk status/holdings lookups
const DESIRED_ITEM_PARTS: &[&str] = &[
    "Bibliographic Description",
    "Circulation Status",
    "Electronic Resource",
    "Hold Queue Length",
    "Item Description",
    "Item Use Restriction Type",
    "Location",
];

/// Agency data requested by the pickup-location lookup
const DESIRED_AGENCY_PARTS: &[&str] = &[
    "Agency Address Information",
    "Agency User Privilege Type",
    "Application Profile Supported Type",
    "Authentication Prompt",
    "Consortium Agreement",
    "Organization Name Information",
];

pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Simple leaf element, decorated with a scheme attribute when the element
/// name has a preset scheme
pub fn element(name: &str, text: &str) -> String {
    let scheme = SCHEMES
        .get(name)
        .map(|uri| format!(" ns1:Scheme=\"{}\"", uri))
        .unwrap_or_default();
    format!(
        "<ns1:{name}{scheme}>{}</ns1:{name}>",
        xml_escape(text),
        name = name,
        scheme = scheme
    )
}

/// Desired-data extra element for LookupUser, e.g. `<ns1:LoanedItemsDesired/>`
pub fn desired(name: &str) -> String {
    format!("<ns1:{}/>", name)
}

/// UserElementType extra for LookupUser
pub fn user_element(value: &str) -> String {
    element("UserElementType", value)
}

/// Parameters for a RequestItem message
#[derive(Debug, Clone, Default)]
pub struct RequestItemParams {
    pub username: String,
    pub password: String,
    pub bib_id: String,
    pub item_id: String,
    pub patron_agency_id: Option<String>,
    pub item_agency_id: Option<String>,
    pub patron_id: Option<String>,
    /// "Hold", "Recall" or "Stack Retrieval"
    pub request_type: String,
    pub request_scope: String,
    pub pickup_location: Option<String>,
    pub need_before: Option<String>,
}

/// Parameters for a CancelRequestItem message
#[derive(Debug, Clone, Default)]
pub struct CancelRequestParams {
    pub username: String,
    pub password: String,
    pub patron_agency_id: Option<String>,
    pub item_agency_id: Option<String>,
    pub request_id: Option<String>,
    pub item_id: Option<String>,
    pub patron_id: Option<String>,
    pub request_type: String,
}

/// Builds complete NCIP message envelopes. Holds the initiating agency so
/// that initiation headers can be omitted uniformly when it is unset.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    from_agency: Option<String>,
}

impl MessageBuilder {
    pub fn new(from_agency: Option<String>) -> Self {
        Self { from_agency }
    }

    fn message_start(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <ns1:NCIPMessage xmlns:ns1=\"{}\" \
             ns1:version=\"http://www.niso.org/schemas/ncip/v2_02/ncip_v2_02.xsd\">",
            NCIP_NS
        )
    }

    /// Omitted entirely when either agency is unset; the protocol tolerates
    /// headerless requests in single-agency deployments.
    fn initiation_header(&self, to_agency: Option<&str>) -> String {
        match (self.from_agency.as_deref(), to_agency) {
            (Some(from), Some(to)) if !from.is_empty() && !to.is_empty() => format!(
                "<ns1:InitiationHeader>\
                 <ns1:FromAgencyId>{}</ns1:FromAgencyId>\
                 <ns1:ToAgencyId>{}</ns1:ToAgencyId>\
                 </ns1:InitiationHeader>",
                element("AgencyId", from),
                element("AgencyId", to)
            ),
            _ => String::new(),
        }
    }

    fn authentication_input(&self, username: &str, password: &str) -> String {
        if username.is_empty() || password.is_empty() {
            return String::new();
        }
        format!(
            "<ns1:AuthenticationInput>{}{}{}</ns1:AuthenticationInput>\
             <ns1:AuthenticationInput>{}{}{}</ns1:AuthenticationInput>",
            element("AuthenticationInputData", username),
            element("AuthenticationDataFormatType", "text"),
            element("AuthenticationInputType", "Username"),
            element("AuthenticationInputData", password),
            element("AuthenticationDataFormatType", "text"),
            element("AuthenticationInputType", "Password"),
        )
    }

    fn user_id(&self, agency: Option<&str>, patron_id: Option<&str>) -> String {
        match patron_id {
            Some(id) => format!(
                "<ns1:UserId>{}{}{}</ns1:UserId>",
                agency.map(|a| element("AgencyId", a)).unwrap_or_default(),
                element("UserIdentifierType", "Institution Id Number"),
                element("UserIdentifierValue", id),
            ),
            None => String::new(),
        }
    }

    fn item_id(&self, agency: Option<&str>, item_id: &str, id_type: Option<&str>) -> String {
        format!(
            "<ns1:ItemId>{}{}{}</ns1:ItemId>",
            agency.map(|a| element("AgencyId", a)).unwrap_or_default(),
            id_type
                .map(|t| element("ItemIdentifierType", t))
                .unwrap_or_default(),
            element("ItemIdentifierValue", item_id),
        )
    }

    fn bibliographic_id(&self, id: &str) -> String {
        format!(
            "<ns1:BibliographicId><ns1:BibliographicItemId>{}{}</ns1:BibliographicItemId></ns1:BibliographicId>",
            element("BibliographicItemIdentifier", id),
            element("BibliographicItemIdentifierCode", "Legal Deposit Number"),
        )
    }

    fn request_type(&self, request_type: &str, scope: &str) -> String {
        format!(
            "{}{}",
            element("RequestType", request_type),
            element("RequestScopeType", scope)
        )
    }

    /// LookupItemSet for bulk status/holdings, optionally resuming a
    /// previous page via the remote's continuation token
    pub fn lookup_item_set(
        &self,
        bib_ids: &[String],
        to_agency: Option<&str>,
        resumption: Option<&str>,
    ) -> String {
        let mut xml = self.message_start();
        xml.push_str("<ns1:LookupItemSet>");
        xml.push_str(&self.initiation_header(to_agency));
        for id in bib_ids {
            xml.push_str(&self.bibliographic_id(id));
        }
        for part in DESIRED_ITEM_PARTS {
            xml.push_str(&element("ItemElementType", part));
        }
        if let Some(token) = resumption {
            if !token.is_empty() {
                xml.push_str(&element("NextItemToken", token));
            }
        }
        xml.push_str("</ns1:LookupItemSet></ns1:NCIPMessage>");
        xml
    }

    /// LookupUser: login, profile, loans, fines and requests all go through
    /// this message with different desired-data extras
    pub fn lookup_user(
        &self,
        username: &str,
        password: &str,
        patron_agency: Option<&str>,
        patron_id: Option<&str>,
        extras: &[String],
    ) -> String {
        format!(
            "{}<ns1:LookupUser>{}{}{}{}</ns1:LookupUser></ns1:NCIPMessage>",
            self.message_start(),
            self.initiation_header(patron_agency),
            self.authentication_input(username, password),
            self.user_id(patron_agency, patron_id),
            extras.concat(),
        )
    }

    /// Secondary per-item lookup, used when the bulk response omitted fields
    pub fn lookup_item(
        &self,
        item_id: &str,
        id_type: Option<&str>,
        to_agency: Option<&str>,
    ) -> String {
        format!(
            "{}<ns1:LookupItem>{}{}{}</ns1:LookupItem></ns1:NCIPMessage>",
            self.message_start(),
            self.initiation_header(to_agency),
            self.item_id(to_agency, item_id, id_type),
            element("ItemElementType", "Bibliographic Description"),
        )
    }

    /// LookupAgency, used to discover pickup locations
    pub fn lookup_agency(&self, to_agency: Option<&str>) -> String {
        let mut xml = self.message_start();
        xml.push_str("<ns1:LookupAgency>");
        xml.push_str(&self.initiation_header(to_agency));
        if let Some(agency) = to_agency {
            xml.push_str(&element("AgencyId", agency));
        }
        for part in DESIRED_AGENCY_PARTS {
            xml.push_str(&element("AgencyElementType", part));
        }
        xml.push_str("</ns1:LookupAgency></ns1:NCIPMessage>");
        xml
    }

    /// RequestItem: place a hold, recall or stack retrieval
    pub fn request_item(&self, p: &RequestItemParams) -> String {
        let mut xml = format!(
            "{}<ns1:RequestItem>{}{}{}{}{}{}",
            self.message_start(),
            self.initiation_header(p.patron_agency_id.as_deref()),
            self.authentication_input(&p.username, &p.password),
            self.user_id(p.patron_agency_id.as_deref(), p.patron_id.as_deref()),
            self.bibliographic_id(&p.bib_id),
            self.item_id(p.item_agency_id.as_deref(), &p.item_id, None),
            self.request_type(&p.request_type, &p.request_scope),
        );
        if let Some(ref pickup) = p.pickup_location {
            if !pickup.is_empty() {
                xml.push_str(&element("PickupLocation", pickup));
            }
        }
        if let Some(ref need_before) = p.need_before {
            if !need_before.is_empty() {
                xml.push_str(&element("NeedBeforeDate", need_before));
            }
        }
        xml.push_str("</ns1:RequestItem></ns1:NCIPMessage>");
        xml
    }

    /// CancelRequestItem. Rejected synchronously when the caller supplied
    /// neither a request id nor an item id.
    pub fn cancel_request_item(&self, p: &CancelRequestParams) -> IlsResult<String> {
        if p.request_id.is_none() && p.item_id.is_none() {
            return Err(IlsError::InvalidRequest(
                "no identifiers for CancelRequestItem".to_string(),
            ));
        }
        let mut xml = format!(
            "{}<ns1:CancelRequestItem>{}{}{}",
            self.message_start(),
            self.initiation_header(p.patron_agency_id.as_deref()),
            self.authentication_input(&p.username, &p.password),
            self.user_id(p.patron_agency_id.as_deref(), p.patron_id.as_deref()),
        );
        if let Some(ref request_id) = p.request_id {
            xml.push_str(&format!(
                "<ns1:RequestId>{}{}</ns1:RequestId>",
                p.item_agency_id
                    .as_deref()
                    .map(|a| element("AgencyId", a))
                    .unwrap_or_default(),
                element("RequestIdentifierValue", request_id),
            ));
        }
        if let Some(ref item_id) = p.item_id {
            xml.push_str(&self.item_id(p.item_agency_id.as_deref(), item_id, None));
        }
        xml.push_str(&self.request_type(&p.request_type, "Bibliographic Item"));
        xml.push_str("</ns1:CancelRequestItem></ns1:NCIPMessage>");
        Ok(xml)
    }

    /// RenewItem for one checked-out item
    pub fn renew_item(
        &self,
        username: &str,
        password: &str,
        patron_agency: Option<&str>,
        patron_id: Option<&str>,
        item_agency: Option<&str>,
        item_id: &str,
    ) -> String {
        format!(
            "{}<ns1:RenewItem>{}{}{}{}</ns1:RenewItem></ns1:NCIPMessage>",
            self.message_start(),
            self.initiation_header(patron_agency),
            self.authentication_input(username, password),
            self.user_id(patron_agency, patron_id),
            self.item_id(item_agency, item_id, None),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> MessageBuilder {
        MessageBuilder::new(Some("CPK".to_string()))
    }

    #[test]
    fn initiation_header_omitted_without_from_agency() {
        let anonymous = MessageBuilder::new(None);
        let xml = anonymous.lookup_item_set(&["123".to_string()], Some("MZK"), None);
        assert!(!xml.contains("InitiationHeader"));
    }

    #[test]
    fn initiation_header_omitted_without_to_agency() {
        let xml = builder().lookup_item_set(&["123".to_string()], None, None);
        assert!(!xml.contains("InitiationHeader"));
    }

    #[test]
    fn initiation_header_present_with_both_agencies() {
        let xml = builder().lookup_item_set(&["123".to_string()], Some("MZK"), None);
        assert!(xml.contains("<ns1:FromAgencyId><ns1:AgencyId>CPK</ns1:AgencyId></ns1:FromAgencyId>"));
        assert!(xml.contains("<ns1:ToAgencyId><ns1:AgencyId>MZK</ns1:AgencyId></ns1:ToAgencyId>"));
    }

    #[test]
    fn resumption_token_only_on_follow_up_pages() {
        let first = builder().lookup_item_set(&["123".to_string()], None, None);
        assert!(!first.contains("NextItemToken"));
        let next = builder().lookup_item_set(&["123".to_string()], None, Some("T1"));
        assert!(next.contains("<ns1:NextItemToken>T1</ns1:NextItemToken>"));
    }

    #[test]
    fn scheme_attribute_follows_the_static_table() {
        let decorated = element("ItemElementType", "Location");
        assert!(decorated.contains("ns1:Scheme=\"http://www.niso.org/ncip/v1_0/schemes/itemelementtype/itemelementtype.scm\""));
        let plain = element("NextItemToken", "T1");
        assert!(!plain.contains("Scheme"));
    }

    #[test]
    fn credentials_are_escaped() {
        let xml = builder().lookup_user("a&b", "p<w>", None, None, &[]);
        assert!(xml.contains("<ns1:AuthenticationInputData>a&amp;b</ns1:AuthenticationInputData>"));
        assert!(xml.contains("<ns1:AuthenticationInputData>p&lt;w&gt;</ns1:AuthenticationInputData>"));
    }

    #[test]
    fn lookup_user_without_credentials_has_no_auth_input() {
        let xml = builder().lookup_user("", "", None, Some("1001"), &[]);
        assert!(!xml.contains("AuthenticationInput"));
        assert!(xml.contains("<ns1:UserIdentifierValue>1001</ns1:UserIdentifierValue>"));
    }

    #[test]
    fn cancel_without_identifiers_is_invalid() {
        let params = CancelRequestParams {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            request_type: "Hold".to_string(),
            ..Default::default()
        };
        let err = builder().cancel_request_item(&params).unwrap_err();
        assert!(matches!(err, IlsError::InvalidRequest(_)));
    }

    #[test]
    fn cancel_with_request_id_builds_request_id_element() {
        let params = CancelRequestParams {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            item_agency_id: Some("MZK".to_string()),
            request_id: Some("R9".to_string()),
            request_type: "Hold".to_string(),
            ..Default::default()
        };
        let xml = builder().cancel_request_item(&params).unwrap();
        assert!(xml.contains("<ns1:RequestIdentifierValue>R9</ns1:RequestIdentifierValue>"));
        assert!(!xml.contains("ItemIdentifierValue"));
    }
}
