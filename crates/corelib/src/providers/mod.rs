//! Entity providers: one per family of server queries

mod issues;
mod language;
mod measure;
mod project;
mod quality_gate;
mod quality_profile;

pub use issues::IssuesProvider;
pub use language::LanguageProvider;
pub use measure::MeasureProvider;
pub use project::ProjectProvider;
pub use quality_gate::QualityGateProvider;
pub use quality_profile::QualityProfileProvider;

use crate::config::Config;
use crate::error::Result;
use crate::requests::{render, RequestTemplates};

/// Immutable parameters shared by every provider of a run
#[derive(Debug, Clone)]
pub struct ProviderContext {
    pub server_url: String,
    pub project_key: String,
    pub page_size: u32,
    pub templates: RequestTemplates,
}

impl ProviderContext {
    /// Builds the context from a configuration, failing on missing parameters
    pub fn new(config: &Config, templates: RequestTemplates) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            server_url: config.server_url.trim_end_matches('/').to_string(),
            project_key: config.project_key.clone(),
            page_size: config.page_size,
            templates,
        })
    }

    /// Renders `template` with `url` and `project` bound, plus `extra`.
    /// Entries of `extra` override the context's own bindings.
    pub(crate) fn request(&self, template: &str, extra: &[(&str, &str)]) -> Result<String> {
        let mut bindings = self.bindings().to_vec();
        bindings.extend_from_slice(extra);
        render(template, &bindings)
    }

    pub(crate) fn bindings(&self) -> [(&str, &str); 2] {
        [
            ("url", self.server_url.as_str()),
            ("project", self.project_key.as_str()),
        ]
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> ProviderContext {
    ProviderContext {
        server_url: "http://sonar:9000".to_string(),
        project_key: "proj1".to_string(),
        page_size: 2,
        templates: RequestTemplates::default(),
    }
}
