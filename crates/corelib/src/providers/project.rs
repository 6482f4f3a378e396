use super::ProviderContext;
use crate::client::RequestExecutor;
use crate::error::{ReportError, Result};
use crate::types::Project;
use tracing::info;

/// Provides the project description and its linked quality profiles
pub struct ProjectProvider<'a> {
    context: &'a ProviderContext,
    executor: &'a RequestExecutor,
}

impl<'a> ProjectProvider<'a> {
    pub fn new(context: &'a ProviderContext, executor: &'a RequestExecutor) -> Self {
        Self { context, executor }
    }

    /// Key of the project configured for this run
    pub fn project_key(&self) -> &str {
        &self.context.project_key
    }

    pub async fn get_project(&self, key: &str) -> Result<Project> {
        if key.trim().is_empty() {
            return Err(ReportError::UnknownParameter("sonar.project.id".to_string()));
        }

        let url = self
            .context
            .request(&self.context.templates.project, &[("project", key)])?;
        let project: Project = self.executor.execute_as(&url).await?;

        info!(
            "Project {} ({}) uses {} quality profile(s)",
            project.key,
            project.name,
            project.quality_profiles.len()
        );

        Ok(project)
    }
}
