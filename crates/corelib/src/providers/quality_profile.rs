use super::ProviderContext;
use crate::client::RequestExecutor;
use crate::error::Result;
use crate::pagination::{announced_total, PagedResponse, PaginatedFetcher, Paging};
use crate::requests::encode_value;
use crate::types::{QualityProfile, Rule};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileSummary {
    key: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    language_name: String,
    #[serde(default)]
    is_default: bool,
    #[serde(default)]
    active_rule_count: u64,
}

#[derive(Debug, Deserialize)]
struct ProfilesPage {
    #[serde(default)]
    profiles: Vec<ProfileSummary>,
    total: Option<u64>,
    paging: Option<Paging>,
}

impl PagedResponse for ProfilesPage {
    type Item = ProfileSummary;

    fn total(&self) -> Option<u64> {
        announced_total(self.total, self.paging)
    }

    fn into_items(self) -> Vec<ProfileSummary> {
        self.profiles
    }
}

#[derive(Debug, Deserialize)]
struct RulesPage {
    #[serde(default)]
    rules: Vec<Rule>,
    total: Option<u64>,
    paging: Option<Paging>,
}

impl PagedResponse for RulesPage {
    type Item = Rule;

    fn total(&self) -> Option<u64> {
        announced_total(self.total, self.paging)
    }

    fn into_items(self) -> Vec<Rule> {
        self.rules
    }
}

/// Provides every quality profile of the server with its configuration
pub struct QualityProfileProvider<'a> {
    context: &'a ProviderContext,
    executor: &'a RequestExecutor,
}

impl<'a> QualityProfileProvider<'a> {
    pub fn new(context: &'a ProviderContext, executor: &'a RequestExecutor) -> Self {
        Self { context, executor }
    }

    /// Lists the profiles, then fetches the export and active rules of each one
    pub async fn get_quality_profiles(&self) -> Result<Vec<QualityProfile>> {
        let fetcher = PaginatedFetcher::new(self.executor, self.context.page_size);
        let templates = &self.context.templates;

        let summaries = fetcher
            .fetch_all::<ProfilesPage>(&templates.quality_profiles, &self.context.bindings())
            .await?;

        let mut profiles = Vec::with_capacity(summaries.len());

        for summary in summaries {
            debug!("Fetching configuration of quality profile {}", summary.key);

            let profile = encode_value(&summary.key);
            let profile_name = encode_value(&summary.name);
            let language = encode_value(&summary.language);
            let extra = [
                ("profile", profile.as_str()),
                ("profile_name", profile_name.as_str()),
                ("language", language.as_str()),
            ];

            let conf_url = self.context.request(&templates.quality_profile_conf, &extra)?;
            let conf = self.executor.execute_text(&conf_url).await?;

            let mut bindings = self.context.bindings().to_vec();
            bindings.extend_from_slice(&extra);
            let rules = fetcher
                .fetch_all::<RulesPage>(&templates.quality_profile_rules, &bindings)
                .await?;

            profiles.push(QualityProfile {
                key: summary.key,
                name: summary.name,
                language: summary.language,
                language_name: summary.language_name,
                is_default: summary.is_default,
                active_rule_count: summary.active_rule_count,
                conf,
                rules,
            });
        }

        info!("Retrieved {} quality profiles", profiles.len());
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::providers::test_context;
    use crate::testing::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn transport() -> MockTransport {
        MockTransport::new()
            .on(
                &["api/qualityprofiles/search"],
                json!({"profiles": [
                    {"key": "p1", "name": "Sonar way", "language": "java", "languageName": "Java",
                     "isDefault": true, "activeRuleCount": 3, "isInherited": false},
                    {"key": "p3", "name": "Strict", "language": "py", "languageName": "Python",
                     "activeRuleCount": 1}
                ]}),
            )
            .on_text(&["qualityProfile=Sonar%20way"], 200, "<profile><name>Sonar way</name></profile>")
            .on_text(&["qualityProfile=Strict"], 200, "<profile><name>Strict</name></profile>")
            .on(
                &["qprofile=p1", "&p=1"],
                json!({"total": 3, "rules": [
                    {"key": "java:S1", "name": "One", "severity": "MAJOR", "type": "BUG", "lang": "java"},
                    {"key": "java:S2", "name": "Two", "severity": "MINOR", "type": "CODE_SMELL", "lang": "java"}
                ]}),
            )
            .on(
                &["qprofile=p1", "&p=2"],
                json!({"total": 3, "rules": [
                    {"key": "java:S3", "name": "Three", "severity": "INFO", "type": "CODE_SMELL", "lang": "java"}
                ]}),
            )
            .on(
                &["qprofile=p3"],
                json!({"total": 1, "rules": [{"key": "python:S1", "lang": "py"}]}),
            )
    }

    #[tokio::test]
    async fn test_profiles_combine_list_and_configuration() {
        let transport = Arc::new(transport());
        let executor = RequestExecutor::new(transport.clone());
        let context = test_context();

        let profiles = QualityProfileProvider::new(&context, &executor)
            .get_quality_profiles()
            .await
            .unwrap();

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].key, "p1");
        assert_eq!(profiles[0].language_name, "Java");
        assert!(profiles[0].is_default);
        assert_eq!(profiles[0].conf, "<profile><name>Sonar way</name></profile>");
        let rules: Vec<_> = profiles[0].rules.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(rules, vec!["java:S1", "java:S2", "java:S3"]);

        assert_eq!(profiles[1].key, "p3");
        assert!(!profiles[1].is_default);
        assert_eq!(profiles[1].rules.len(), 1);

        assert_eq!(transport.count("api/qualityprofiles/export"), 2);
    }

    #[tokio::test]
    async fn test_profile_name_is_encoded_in_export() {
        let transport = Arc::new(
            MockTransport::new()
                .on(
                    &["api/qualityprofiles/search"],
                    json!({"profiles": [{"key": "p9", "name": "A&B C#", "language": "cs"}]}),
                )
                .on_text(&["qualityProfile=A%26B%20C%23"], 200, "<profile><name>A&amp;B C#</name></profile>")
                .on(&["qprofile=p9"], json!({"total": 0, "rules": []})),
        );
        let executor = RequestExecutor::new(transport.clone());
        let context = test_context();

        let profiles = QualityProfileProvider::new(&context, &executor)
            .get_quality_profiles()
            .await
            .unwrap();

        assert_eq!(profiles[0].name, "A&B C#");
        assert_eq!(profiles[0].conf, "<profile><name>A&amp;B C#</name></profile>");
        assert_eq!(
            transport.requests()[1],
            "http://sonar:9000/api/qualityprofiles/export?language=cs&qualityProfile=A%26B%20C%23"
        );
    }

    #[tokio::test]
    async fn test_export_failure_aborts() {
        let transport = Arc::new(
            MockTransport::new()
                .on(
                    &["api/qualityprofiles/search"],
                    json!({"profiles": [{"key": "p1", "name": "Sonar way", "language": "java"}]}),
                )
                .on_text(&["api/qualityprofiles/export"], 403, r#"{"errors":[{"msg":"Insufficient privileges"}]}"#),
        );
        let executor = RequestExecutor::new(transport.clone());
        let context = test_context();

        let result = QualityProfileProvider::new(&context, &executor)
            .get_quality_profiles()
            .await;

        match result {
            Err(ReportError::ServerReported(msg)) => assert_eq!(msg, "Insufficient privileges"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(transport.count("api/rules/search"), 0);
    }
}
