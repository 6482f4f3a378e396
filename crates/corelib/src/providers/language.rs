use super::ProviderContext;
use crate::client::RequestExecutor;
use crate::error::Result;
use crate::types::Language;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Deserialize)]
struct LanguagesResponse {
    #[serde(default)]
    languages: Vec<Language>,
}

/// Provides the languages known by the server
pub struct LanguageProvider<'a> {
    context: &'a ProviderContext,
    executor: &'a RequestExecutor,
}

impl<'a> LanguageProvider<'a> {
    pub fn new(context: &'a ProviderContext, executor: &'a RequestExecutor) -> Self {
        Self { context, executor }
    }

    pub async fn get_languages(&self) -> Result<HashMap<String, Language>> {
        let url = self.context.request(&self.context.templates.languages, &[])?;
        let response: LanguagesResponse = self.executor.execute_as(&url).await?;

        info!("Retrieved {} languages", response.languages.len());

        Ok(response
            .languages
            .into_iter()
            .map(|language| (language.key.clone(), language))
            .collect())
    }
}
