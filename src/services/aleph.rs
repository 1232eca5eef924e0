//! Aleph X-Server adapter.
//!
//! Covers bulk status lookups only; circulation goes through the NCIP
//! adapter. Above a configured id count the whole-record lookup becomes too
//! expensive on the remote side and the adapter switches to one request per
//! item.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Duration;
use xmltree::Element;

use crate::config::AlephConfig;
use crate::error::{IlsError, IlsResult};
use crate::models::ItemStatus;

/// Seam between the adapter and the X-Server. Mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn get(&self, url: &str) -> IlsResult<String>;
}

struct HttpRestClient {
    client: reqwest::Client,
}

#[async_trait]
impl RestClient for HttpRestClient {
    async fn get(&self, url: &str) -> IlsResult<String> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| IlsError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(IlsError::Transport(format!("HTTP error: status {}", status)));
        }
        response
            .text()
            .await
            .map_err(|e| IlsError::Transport(e.to_string()))
    }
}

pub struct AlephDriver {
    client: Arc<dyn RestClient>,
    base_url: String,
    available_statuses: Vec<String>,
    max_items_parsed: i32,
}

impl AlephDriver {
    pub fn new(config: &AlephConfig, client: Arc<dyn RestClient>) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            available_statuses: config
                .available_statuses
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            max_items_parsed: config.max_items_parsed,
        }
    }

    pub fn from_config(config: &AlephConfig, timeout_secs: u64) -> IlsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| IlsError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::new(config, Arc::new(HttpRestClient { client })))
    }

    /// Item statuses for a batch of item ids of one record.
    ///
    /// Ids have the form `bibId:itemSeq`. Small batches fetch the whole
    /// record once and filter; past `max_items_parsed` (-1 means no limit)
    /// each item is fetched individually.
    pub async fn get_statuses(
        &self,
        item_ids: &[String],
    ) -> IlsResult<IndexMap<String, ItemStatus>> {
        let mut statuses = IndexMap::new();
        let Some(first) = item_ids.first() else {
            return Ok(statuses);
        };
        let bib_id = first.split(':').next().unwrap_or(first).replace('-', "");

        let whole_record = self.max_items_parsed < 0
            || item_ids.len() <= self.max_items_parsed as usize;
        if whole_record {
            let url = format!("{}/record/{}/items?view=full", self.base_url, bib_id);
            let root = parse_xml(&self.client.get(&url).await?)?;
            for item in collect_items(&root) {
                let Some(item_id) = item_href_id(item) else {
                    continue;
                };
                if !item_ids.contains(&item_id) {
                    continue;
                }
                statuses.insert(item_id.clone(), self.item_status(&bib_id, item));
            }
        } else {
            for item_id in item_ids {
                let url = format!("{}/record/{}/items/{}", self.base_url, bib_id, item_id);
                let root = parse_xml(&self.client.get(&url).await?)?;
                if let Some(item) = first_item(&root) {
                    statuses.insert(item_id.clone(), self.item_status(&bib_id, item));
                }
            }
        }
        Ok(statuses)
    }

    fn item_status(&self, bib_id: &str, item: &Element) -> ItemStatus {
        let raw_status = child_text(item, &["status"]).unwrap_or_default();
        let available = self.available_statuses.contains(&raw_status.to_lowercase());
        ItemStatus {
            id: bib_id.to_string(),
            status: if available { "available" } else { "unavailable" }.to_string(),
            location: child_text(item, &["sub-library"]),
            call_number: child_text(item, &["call-no-1"]),
            available,
            status_unknown: false,
        }
    }
}

fn parse_xml(body: &str) -> IlsResult<Element> {
    Element::parse(body.as_bytes())
        .map_err(|e| IlsError::Parse(format!("malformed response body: {}", e)))
}

fn collect_items(root: &Element) -> Vec<&Element> {
    fn walk<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
        for child in el.children.iter().filter_map(|n| n.as_element()) {
            if child.name == "item" {
                out.push(child);
            } else {
                walk(child, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

fn first_item(root: &Element) -> Option<&Element> {
    if root.name == "item" {
        return Some(root);
    }
    collect_items(root).into_iter().next()
}

/// Item id from the trailing segment of the item's `href` attribute
fn item_href_id(item: &Element) -> Option<String> {
    let href = item.attributes.get("href")?;
    href.rsplit('/').next().map(str::to_string)
}

fn child_text(el: &Element, path: &[&str]) -> Option<String> {
    let mut current = el;
    for name in path {
        current = current
            .children
            .iter()
            .filter_map(|n| n.as_element())
            .find(|c| &c.name == name)?;
    }
    Some(current.get_text().unwrap_or_default().trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn config(max_items_parsed: i32) -> AlephConfig {
        AlephConfig {
            base_url: "http://aleph.example.org/X".to_string(),
            available_statuses: vec!["on shelf".to_string()],
            max_items_parsed,
        }
    }

    const RECORD_BODY: &str = r#"<get-item-list>
        <items>
            <item href="http://aleph.example.org/X/record/123/items/123:1">
                <status>On Shelf</status>
                <sub-library>Main</sub-library>
                <call-no-1>QA76</call-no-1>
            </item>
            <item href="http://aleph.example.org/X/record/123/items/123:2">
                <status>On Loan</status>
            </item>
            <item href="http://aleph.example.org/X/record/123/items/123:3">
                <status>On Shelf</status>
            </item>
        </items>
    </get-item-list>"#;

    #[tokio::test]
    async fn small_batches_fetch_the_whole_record_once() {
        let mut client = MockRestClient::new();
        client
            .expect_get()
            .with(eq("http://aleph.example.org/X/record/123/items?view=full"))
            .times(1)
            .returning(|_| Ok(RECORD_BODY.to_string()));

        let driver = AlephDriver::new(&config(10), Arc::new(client));
        let ids = vec!["123:1".to_string(), "123:2".to_string()];
        let statuses = driver.get_statuses(&ids).await.unwrap();

        assert_eq!(statuses.len(), 2);
        let first = &statuses["123:1"];
        assert!(first.available);
        assert_eq!(first.status, "available");
        assert_eq!(first.location.as_deref(), Some("Main"));
        assert_eq!(first.call_number.as_deref(), Some("QA76"));
        assert!(!statuses["123:2"].available);
        assert_eq!(statuses["123:2"].status, "unavailable");
        // 123:3 was not requested
        assert!(!statuses.contains_key("123:3"));
    }

    #[tokio::test]
    async fn large_batches_fetch_each_item() {
        let mut client = MockRestClient::new();
        client
            .expect_get()
            .with(eq("http://aleph.example.org/X/record/123/items/123:1"))
            .times(1)
            .returning(|_| {
                Ok("<item><status>On Shelf</status></item>".to_string())
            });
        client
            .expect_get()
            .with(eq("http://aleph.example.org/X/record/123/items/123:2"))
            .times(1)
            .returning(|_| {
                Ok("<item><status>Lost</status></item>".to_string())
            });

        let driver = AlephDriver::new(&config(1), Arc::new(client));
        let ids = vec!["123:1".to_string(), "123:2".to_string()];
        let statuses = driver.get_statuses(&ids).await.unwrap();

        assert!(statuses["123:1"].available);
        assert!(!statuses["123:2"].available);
    }

    #[tokio::test]
    async fn negative_limit_always_uses_the_whole_record() {
        let mut client = MockRestClient::new();
        client
            .expect_get()
            .with(eq("http://aleph.example.org/X/record/123/items?view=full"))
            .times(1)
            .returning(|_| Ok(RECORD_BODY.to_string()));

        let driver = AlephDriver::new(&config(-1), Arc::new(client));
        let ids: Vec<String> = (1..=3).map(|i| format!("123:{}", i)).collect();
        let statuses = driver.get_statuses(&ids).await.unwrap();
        assert_eq!(statuses.len(), 3);
    }

    #[tokio::test]
    async fn bib_id_is_derived_from_the_first_item_id() {
        let mut client = MockRestClient::new();
        client
            .expect_get()
            .with(eq("http://aleph.example.org/X/record/000123/items?view=full"))
            .times(1)
            .returning(|_| Ok("<get-item-list><items/></get-item-list>".to_string()));

        let driver = AlephDriver::new(&config(10), Arc::new(client));
        // dashes in the record part are stripped
        let statuses = driver
            .get_statuses(&["000-123:1".to_string()])
            .await
            .unwrap();
        assert!(statuses.is_empty());
    }
}
