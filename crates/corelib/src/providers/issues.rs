use super::ProviderContext;
use crate::client::RequestExecutor;
use crate::error::Result;
use crate::pagination::{announced_total, PagedResponse, PaginatedFetcher, Paging};
use crate::types::{Facet, Issue, RawIssue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

/// `resolved` filter selecting open issues
const CONFIRMED: &str = "false";
/// `resolved` filter selecting issues closed as false positive, won't fix...
const UNCONFIRMED: &str = "true";

#[derive(Debug, Deserialize)]
struct IssueSearchPage<T> {
    #[serde(default = "Vec::new")]
    issues: Vec<T>,
    total: Option<u64>,
    paging: Option<Paging>,
}

impl<T: DeserializeOwned> PagedResponse for IssueSearchPage<T> {
    type Item = T;

    fn total(&self) -> Option<u64> {
        announced_total(self.total, self.paging)
    }

    fn into_items(self) -> Vec<T> {
        self.issues
    }
}

#[derive(Debug, Deserialize)]
struct FacetsResponse {
    #[serde(default)]
    facets: Vec<Facet>,
}

/// Provides the issue views of the project.
///
/// Each view runs its own search with its own `resolved` filter; nothing is
/// classified on this side.
pub struct IssuesProvider<'a> {
    context: &'a ProviderContext,
    executor: &'a RequestExecutor,
}

impl<'a> IssuesProvider<'a> {
    pub fn new(context: &'a ProviderContext, executor: &'a RequestExecutor) -> Self {
        Self { context, executor }
    }

    /// Open issues of the project
    pub async fn get_issues(&self) -> Result<Vec<Issue>> {
        let issues = self.search::<Issue>(CONFIRMED).await?;
        info!("Retrieved {} issues", issues.len());
        Ok(issues)
    }

    /// Resolved issues (false positives, won't fix, fixed)
    pub async fn get_unconfirmed_issues(&self) -> Result<Vec<Issue>> {
        let issues = self.search::<Issue>(UNCONFIRMED).await?;
        info!("Retrieved {} unconfirmed issues", issues.len());
        Ok(issues)
    }

    /// Open issues with every field the server sent, in delivery order
    pub async fn get_raw_issues(&self) -> Result<Vec<RawIssue>> {
        let issues = self.search::<RawIssue>(CONFIRMED).await?;
        info!("Retrieved {} raw issues", issues.len());
        Ok(issues)
    }

    /// Facets computed with the first page of the issue search
    pub async fn get_facets(&self) -> Result<Vec<Facet>> {
        let url = self.context.request(&self.context.templates.facets, &[])?;
        let response: FacetsResponse = self.executor.execute_as(&url).await?;

        info!("Retrieved {} facets", response.facets.len());
        Ok(response.facets)
    }

    async fn search<T: DeserializeOwned>(&self, resolved: &str) -> Result<Vec<T>> {
        let mut bindings = self.context.bindings().to_vec();
        bindings.push(("resolved", resolved));

        PaginatedFetcher::new(self.executor, self.context.page_size)
            .fetch_all::<IssueSearchPage<T>>(&self.context.templates.issues, &bindings)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_context;
    use crate::testing::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn issue(key: &str) -> serde_json::Value {
        json!({
            "key": key,
            "rule": "java:S1481",
            "severity": "MAJOR",
            "component": "proj1:src/Main.java",
            "line": 3,
            "status": "OPEN",
            "message": "Remove this unused variable",
            "type": "CODE_SMELL",
            "debt": "5min"
        })
    }

    fn transport() -> Arc<MockTransport> {
        Arc::new(
            MockTransport::new()
                .on(
                    &["additionalFields", "resolved=false", "&p=1"],
                    json!({"total": 3, "p": 1, "ps": 2, "issues": [issue("A"), issue("B")]}),
                )
                .on(
                    &["additionalFields", "resolved=false", "&p=2"],
                    json!({"total": 3, "p": 2, "ps": 2, "issues": [issue("C")]}),
                )
                .on(
                    &["additionalFields", "resolved=true", "&p=1"],
                    json!({"total": 1, "issues": [issue("D")]}),
                )
                .on(
                    &["facets="],
                    json!({
                        "total": 3,
                        "issues": [issue("A")],
                        "facets": [
                            {"property": "severities", "values": [{"val": "MAJOR", "count": 3}]},
                            {"property": "types", "values": [{"val": "CODE_SMELL", "count": 3}]}
                        ]
                    }),
                ),
        )
    }

    #[tokio::test]
    async fn test_confirmed_and_unconfirmed_are_disjoint() {
        let transport = transport();
        let executor = RequestExecutor::new(transport.clone());
        let context = test_context();
        let provider = IssuesProvider::new(&context, &executor);

        let confirmed = provider.get_issues().await.unwrap();
        let unconfirmed = provider.get_unconfirmed_issues().await.unwrap();

        let confirmed_keys: Vec<_> = confirmed.iter().map(|i| i.key.as_str()).collect();
        let unconfirmed_keys: Vec<_> = unconfirmed.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(confirmed_keys, vec!["A", "B", "C"]);
        assert_eq!(unconfirmed_keys, vec!["D"]);
        assert!(confirmed_keys.iter().all(|k| !unconfirmed_keys.contains(k)));

        assert_eq!(transport.count("resolved=false"), 2);
        assert_eq!(transport.count("resolved=true"), 1);
    }

    #[tokio::test]
    async fn test_raw_issues_keep_unmodeled_fields_in_order() {
        let transport = transport();
        let executor = RequestExecutor::new(transport);
        let context = test_context();

        let raw = IssuesProvider::new(&context, &executor)
            .get_raw_issues()
            .await
            .unwrap();

        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0]["debt"], json!("5min"));
        let fields: Vec<_> = raw[0].keys().map(String::as_str).collect();
        assert_eq!(fields.first(), Some(&"key"));
        assert_eq!(fields.last(), Some(&"debt"));
    }

    #[tokio::test]
    async fn test_facets_single_request() {
        let transport = transport();
        let executor = RequestExecutor::new(transport.clone());
        let context = test_context();

        let facets = IssuesProvider::new(&context, &executor)
            .get_facets()
            .await
            .unwrap();

        assert_eq!(facets.len(), 2);
        assert_eq!(facets[0].property, "severities");
        assert_eq!(facets[0].count("MAJOR"), 3);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_issues_url_shape() {
        let transport = transport();
        let executor = RequestExecutor::new(transport.clone());
        let context = test_context();

        IssuesProvider::new(&context, &executor)
            .get_unconfirmed_issues()
            .await
            .unwrap();

        assert_eq!(
            transport.requests(),
            vec![
                "http://sonar:9000/api/issues/search?componentKeys=proj1&resolved=true&additionalFields=rules,comments&ps=2&p=1"
            ]
        );
    }
}
