use super::ProviderContext;
use crate::client::RequestExecutor;
use crate::error::Result;
use crate::types::Measure;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct MeasuresResponse {
    component: MeasuredComponent,
}

#[derive(Debug, Deserialize)]
struct MeasuredComponent {
    #[serde(default)]
    measures: Vec<Measure>,
}

/// Provides the project's measures (one request, not paged)
pub struct MeasureProvider<'a> {
    context: &'a ProviderContext,
    executor: &'a RequestExecutor,
}

impl<'a> MeasureProvider<'a> {
    pub fn new(context: &'a ProviderContext, executor: &'a RequestExecutor) -> Self {
        Self { context, executor }
    }

    pub async fn get_measures(&self) -> Result<Vec<Measure>> {
        let url = self.context.request(&self.context.templates.measures, &[])?;
        let response: MeasuresResponse = self.executor.execute_as(&url).await?;

        info!("Retrieved {} measures", response.component.measures.len());
        Ok(response.component.measures)
    }
}
