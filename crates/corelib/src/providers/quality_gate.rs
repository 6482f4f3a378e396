use super::ProviderContext;
use crate::client::RequestExecutor;
use crate::error::{ReportError, Result};
use crate::requests::encode_value;
use crate::types::QualityGate;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
struct ProjectGateResponse {
    #[serde(rename = "qualityGate")]
    quality_gate: GateRef,
}

#[derive(Debug, Clone, Deserialize)]
struct GateRef {
    /// Numeric on older servers, textual on recent ones
    #[serde(default)]
    id: serde_json::Value,
    name: String,
    #[serde(default)]
    default: bool,
}

#[derive(Debug, Deserialize)]
struct GatesList {
    #[serde(default)]
    qualitygates: Vec<GateRef>,
    #[serde(default)]
    default: serde_json::Value,
}

fn id_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Provides the quality gate applied to the project
pub struct QualityGateProvider<'a> {
    context: &'a ProviderContext,
    executor: &'a RequestExecutor,
}

impl<'a> QualityGateProvider<'a> {
    pub fn new(context: &'a ProviderContext, executor: &'a RequestExecutor) -> Self {
        Self { context, executor }
    }

    /// Resolves the project's gate, checks it against the server's gate list
    /// and fetches its configuration
    pub async fn get_project_quality_gate(&self) -> Result<QualityGate> {
        let templates = &self.context.templates;

        let url = self.context.request(&templates.quality_gate, &[])?;
        let applied: ProjectGateResponse = self.executor.execute_as(&url).await?;
        let name = applied.quality_gate.name;

        let url = self.context.request(&templates.quality_gates, &[])?;
        let list: GatesList = self.executor.execute_as(&url).await?;

        let gate = list
            .qualitygates
            .iter()
            .find(|gate| gate.name == name)
            .cloned()
            .ok_or_else(|| ReportError::UnknownQualityGate(name.clone()))?;

        let gate_name = encode_value(&name);
        let url = self
            .context
            .request(&templates.quality_gate_details, &[("gate", gate_name.as_str())])?;
        let conf = self.executor.execute(&url).await?;

        let id = id_string(&gate.id);
        let is_default = gate.default
            || applied.quality_gate.default
            || (!id.is_empty() && id_string(&list.default) == id);

        info!("Project uses quality gate {}", name);

        Ok(QualityGate {
            id,
            name,
            is_default,
            conf,
        })
    }
}
