//! Accumulation of result sets spread over several pages

use crate::client::RequestExecutor;
use crate::error::{ReportError, Result};
use crate::requests::render;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// One page of a paged search endpoint
pub trait PagedResponse: DeserializeOwned {
    type Item;

    /// Total number of results announced by the server; `None` when the
    /// endpoint is not paged and answers everything at once
    fn total(&self) -> Option<u64>;

    fn into_items(self) -> Vec<Self::Item>;
}

/// Paging block of recent SonarQube versions
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(default)]
    pub page_index: u64,
    #[serde(default)]
    pub page_size: u64,
    pub total: u64,
}

/// Resolves the total from the top level field or the `paging` block
pub fn announced_total(total: Option<u64>, paging: Option<Paging>) -> Option<u64> {
    total.or(paging.map(|p| p.total))
}

/// Requests pages 1, 2, ... until the announced total is reached
pub struct PaginatedFetcher<'a> {
    executor: &'a RequestExecutor,
    page_size: u32,
}

impl<'a> PaginatedFetcher<'a> {
    pub fn new(executor: &'a RequestExecutor, page_size: u32) -> Self {
        Self {
            executor,
            page_size,
        }
    }

    /// Fetches every item, in delivery order.
    ///
    /// `template` must contain a `{page}` placeholder; `{page_size}` is bound
    /// too. An empty page ends the fetch even if the total was not reached.
    pub async fn fetch_all<P: PagedResponse>(
        &self,
        template: &str,
        bindings: &[(&str, &str)],
    ) -> Result<Vec<P::Item>> {
        if !template.contains("{page}") {
            return Err(ReportError::Config(format!(
                "Paged request has no {{page}} placeholder: {}",
                template
            )));
        }

        let page_size = self.page_size.to_string();
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let page_number = page.to_string();
            let mut page_bindings: Vec<(&str, &str)> = bindings.to_vec();
            page_bindings.push(("page", &page_number));
            page_bindings.push(("page_size", &page_size));

            let url = render(template, &page_bindings)?;
            let response: P = self.executor.execute_as(&url).await?;
            let total = response.total();
            let batch = response.into_items();

            debug!(
                "Page {} returned {} items (total announced: {:?})",
                page,
                batch.len(),
                total
            );

            if batch.is_empty() {
                break;
            }
            items.extend(batch);

            match total {
                Some(total) if (items.len() as u64) < total => page += 1,
                _ => break,
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Deserialize)]
    struct NumbersPage {
        #[serde(default)]
        values: Vec<u32>,
        total: Option<u64>,
        paging: Option<Paging>,
    }

    impl PagedResponse for NumbersPage {
        type Item = u32;

        fn total(&self) -> Option<u64> {
            announced_total(self.total, self.paging)
        }

        fn into_items(self) -> Vec<u32> {
            self.values
        }
    }

    const TEMPLATE: &str = "{url}/api/numbers?ps={page_size}&p={page}";

    async fn fetch(transport: Arc<MockTransport>, page_size: u32) -> Result<Vec<u32>> {
        let executor = RequestExecutor::new(transport);
        PaginatedFetcher::new(&executor, page_size)
            .fetch_all::<NumbersPage>(TEMPLATE, &[("url", "http://x")])
            .await
    }

    #[tokio::test]
    async fn test_zero_total_issues_one_request() {
        let transport = Arc::new(MockTransport::new().on(&["p=1"], json!({"values": [], "total": 0})));

        let items = fetch(transport.clone(), 2).await.unwrap();

        assert!(items.is_empty());
        assert_eq!(transport.requests(), vec!["http://x/api/numbers?ps=2&p=1"]);
    }

    #[tokio::test]
    async fn test_pages_are_concatenated_in_order() {
        let transport = Arc::new(
            MockTransport::new()
                .on(&["&p=1"], json!({"values": [5, 3], "total": 5}))
                .on(&["&p=2"], json!({"values": [9, 1], "total": 5}))
                .on(&["&p=3"], json!({"values": [4], "total": 5})),
        );

        let items = fetch(transport.clone(), 2).await.unwrap();

        assert_eq!(items, vec![5, 3, 9, 1, 4]);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_paging_block_total() {
        let transport = Arc::new(
            MockTransport::new()
                .on(&["&p=1"], json!({"values": [1], "paging": {"pageIndex": 1, "pageSize": 1, "total": 2}}))
                .on(&["&p=2"], json!({"values": [2], "paging": {"pageIndex": 2, "pageSize": 1, "total": 2}})),
        );

        assert_eq!(fetch(transport, 1).await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_empty_page_stops_short_total() {
        let transport = Arc::new(
            MockTransport::new()
                .on(&["&p=1"], json!({"values": [1, 2], "total": 10}))
                .on(&["&p=2"], json!({"values": [], "total": 10})),
        );

        assert_eq!(fetch(transport.clone(), 2).await.unwrap(), vec![1, 2]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_unpaged_endpoint_is_single_request() {
        let transport = Arc::new(MockTransport::new().on(&["&p=1"], json!({"values": [7, 8, 9]})));

        assert_eq!(fetch(transport.clone(), 2).await.unwrap(), vec![7, 8, 9]);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_error_on_later_page_aborts() {
        let transport = Arc::new(
            MockTransport::new()
                .on(&["&p=1"], json!({"values": [1], "total": 3}))
                .on(&["&p=2"], json!({"errors": [{"msg": "Can return only the first 10000 results"}]})),
        );

        match fetch(transport.clone(), 1).await {
            Err(ReportError::ServerReported(msg)) => {
                assert_eq!(msg, "Can return only the first 10000 results")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_template_without_page_is_rejected() {
        let transport = Arc::new(MockTransport::new());
        let executor = RequestExecutor::new(transport.clone());

        let result = PaginatedFetcher::new(&executor, 10)
            .fetch_all::<NumbersPage>("{url}/api/numbers", &[("url", "http://x")])
            .await;

        assert!(matches!(result, Err(ReportError::Config(_))));
        assert!(transport.requests().is_empty());
    }
}
