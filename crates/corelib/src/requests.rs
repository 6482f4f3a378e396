//! Named request templates and placeholder rendering

use crate::error::{ReportError, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// URL patterns for every query the providers issue.
///
/// Placeholders are written `{name}` and filled by [`render`]. A custom set can
/// be loaded from a JSON file; keys missing from that file keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestTemplates {
    pub project: String,
    pub measures: String,
    pub issues: String,
    pub facets: String,
    pub quality_profiles: String,
    pub quality_profile_conf: String,
    pub quality_profile_rules: String,
    pub quality_gate: String,
    pub quality_gates: String,
    pub quality_gate_details: String,
    pub languages: String,
}

impl Default for RequestTemplates {
    fn default() -> Self {
        use crate::defaults::requests::*;

        Self {
            project: PROJECT.to_string(),
            measures: MEASURES.to_string(),
            issues: ISSUES.to_string(),
            facets: FACETS.to_string(),
            quality_profiles: QUALITY_PROFILES.to_string(),
            quality_profile_conf: QUALITY_PROFILE_CONF.to_string(),
            quality_profile_rules: QUALITY_PROFILE_RULES.to_string(),
            quality_gate: QUALITY_GATE.to_string(),
            quality_gates: QUALITY_GATES.to_string(),
            quality_gate_details: QUALITY_GATE_DETAILS.to_string(),
            languages: LANGUAGES.to_string(),
        }
    }
}

impl RequestTemplates {
    /// Loads templates from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!(
                "Failed to read request templates {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            ReportError::Config(format!(
                "Invalid request templates {}: {}",
                path.display(),
                e
            ))
        })
    }
}

static PLACEHOLDER: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();

/// `{name}` pattern, compiled on first use
fn placeholder() -> Result<&'static Regex> {
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{([a-z_]+)\}"))
        .as_ref()
        .map_err(|e| ReportError::Config(format!("Invalid placeholder pattern: {}", e)))
}

/// Fills the `{name}` placeholders of `template` from `bindings`.
///
/// A placeholder without a binding is reported as `UnknownParameter`. When a
/// name is bound twice the later binding wins. Values are inserted as-is, so
/// callers encode server-provided text first.
pub fn render(template: &str, bindings: &[(&str, &str)]) -> Result<String> {
    let pattern = placeholder()?;

    let lookup = |name: &str| {
        bindings
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    };

    if let Some(missing) = pattern
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .find(|name| lookup(name).is_none())
    {
        return Err(ReportError::UnknownParameter(missing));
    }

    Ok(pattern
        .replace_all(template, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned())
}

/// Percent-encodes a value taken from server data (profile or gate name)
/// so it stays a single query parameter
pub fn encode_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
