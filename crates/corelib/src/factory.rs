use crate::client::{HttpTransport, RequestExecutor, Transport};
use crate::providers::*;
use crate::types::*;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the report by querying every provider in turn
pub struct ReportFactory {
    context: ProviderContext,
    executor: RequestExecutor,
    author: String,
    date: String,
}

impl ReportFactory {
    /// Creates a factory talking to the configured server over HTTP
    pub fn new(config: &crate::config::Config) -> crate::Result<Self> {
        info!(
            "Preparing report of project {} from {}",
            config.project_key, config.server_url
        );

        let templates = config.request_templates()?;
        let transport = Arc::new(HttpTransport::new(config)?);
        Self::with_transport(config, templates, transport)
    }

    /// Creates a factory on top of an existing transport
    pub fn with_transport(
        config: &crate::config::Config,
        templates: crate::requests::RequestTemplates,
        transport: Arc<dyn Transport>,
    ) -> crate::Result<Self> {
        let context = ProviderContext::new(config, templates)?;

        Ok(Self {
            context,
            executor: RequestExecutor::new(transport),
            author: config.author.clone(),
            date: config.report_date.clone(),
        })
    }

    /// Queries the server and assembles the report.
    ///
    /// Providers run one after the other; the first error aborts the whole
    /// report.
    pub async fn create(&self) -> crate::Result<Report> {
        let context = &self.context;
        let executor = &self.executor;

        let project_provider = ProjectProvider::new(context, executor);
        let measure_provider = MeasureProvider::new(context, executor);
        let issues_provider = IssuesProvider::new(context, executor);
        let quality_profile_provider = QualityProfileProvider::new(context, executor);
        let quality_gate_provider = QualityGateProvider::new(context, executor);
        let language_provider = LanguageProvider::new(context, executor);

        let mut project = project_provider
            .get_project(project_provider.project_key())
            .await?;
        let measures = measure_provider.get_measures().await?;
        let issues = issues_provider.get_issues().await?;
        let unconfirmed = issues_provider.get_unconfirmed_issues().await?;
        let raw_issues = issues_provider.get_raw_issues().await?;
        let facets = issues_provider.get_facets().await?;
        let all_profiles = quality_profile_provider.get_quality_profiles().await?;
        let quality_gate = quality_gate_provider.get_project_quality_gate().await?;
        project.languages = language_provider.get_languages().await?;

        let quality_profiles = select_used_profiles(&project.quality_profiles, all_profiles);

        info!(
            "Report assembled: {} issues, {} unconfirmed, {} measures, {} quality profiles",
            issues.len(),
            unconfirmed.len(),
            measures.len(),
            quality_profiles.len()
        );

        Ok(Report {
            project,
            author: self.author.clone(),
            date: self.date.clone(),
            measures,
            issues,
            unconfirmed,
            raw_issues,
            facets,
            quality_profiles,
            quality_gate,
        })
    }
}

/// Keeps the fetched profiles referenced by the project, in metadata order.
///
/// A metadata entry without a fetched profile is skipped: the profile may
/// have been deleted or renamed between the two queries.
pub fn select_used_profiles(
    metadata: &[ProfileMetaData],
    mut profiles: Vec<QualityProfile>,
) -> Vec<QualityProfile> {
    let mut used = Vec::with_capacity(metadata.len());

    for meta in metadata {
        match profiles.iter().position(|profile| profile.key == meta.key) {
            Some(index) => used.push(profiles.remove(index)),
            None => warn!(
                "Quality profile {} ({}) is linked to the project but was not returned by the server",
                meta.key, meta.name
            ),
        }
    }

    used
}
