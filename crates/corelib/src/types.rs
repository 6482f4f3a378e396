//! Report model assembled from the server responses

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Loosely typed issue record, field order as delivered by the server
pub type RawIssue = serde_json::Map<String, serde_json::Value>;

/// Aggregate handed to every exporter
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub project: Project,
    pub author: String,
    pub date: String,
    pub measures: Vec<Measure>,
    pub issues: Vec<Issue>,
    pub unconfirmed: Vec<Issue>,
    pub raw_issues: Vec<RawIssue>,
    pub facets: Vec<Facet>,
    /// Profiles actually used by the project, in project metadata order
    pub quality_profiles: Vec<QualityProfile>,
    pub quality_gate: QualityGate,
}

impl Report {
    pub fn project_name(&self) -> &str {
        &self.project.name
    }

    /// Finds a measure by metric key
    pub fn measure(&self, metric: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.metric == metric)
    }

    /// Finds a facet by property name (e.g. "severities")
    pub fn facet(&self, property: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.property == property)
    }
}

/// Project as described by the server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "qualityProfiles")]
    pub quality_profiles: Vec<ProfileMetaData>,
    #[serde(skip_deserializing)]
    pub languages: HashMap<String, Language>,
}

impl Project {
    pub fn language(&self, key: &str) -> Option<&Language> {
        self.languages.get(key)
    }
}

/// Reference to a quality profile linked to a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetaData {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// Full quality profile: list metadata plus exported configuration
#[derive(Debug, Clone, Default, Serialize)]
pub struct QualityProfile {
    pub key: String,
    pub name: String,
    pub language: String,
    pub language_name: String,
    pub is_default: bool,
    pub active_rule_count: u64,
    /// Exported configuration, kept verbatim (XML)
    pub conf: String,
    pub rules: Vec<Rule>,
}

/// Active rule of a quality profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default, rename = "type")]
    pub rule_type: String,
    #[serde(default, rename = "lang")]
    pub language: String,
}

/// Quality gate applied to the project
#[derive(Debug, Clone, Default, Serialize)]
pub struct QualityGate {
    pub id: String,
    pub name: String,
    pub is_default: bool,
    /// Configuration as returned by the server
    pub conf: serde_json::Value,
}

/// Single metric value of the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub metric: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Measure {
    /// Value rendered as text, `None` when the server sent no value
    pub fn value_str(&self) -> Option<String> {
        match &self.value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Issue as returned by the issue search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub text_range: Option<TextRange>,
    #[serde(default, rename = "type")]
    pub issue_type: String,
    #[serde(default)]
    pub effort: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
}

impl Issue {
    /// Path of the file inside the project, without the `project:` prefix
    pub fn file_path(&self) -> &str {
        self.component
            .split_once(':')
            .map(|(_, path)| path)
            .unwrap_or(&self.component)
    }

    /// First and last line of the issue, when known
    pub fn line_range(&self) -> Option<(u32, u32)> {
        match (&self.text_range, self.line) {
            (Some(range), _) => Some((range.start_line, range.end_line)),
            (None, Some(line)) => Some((line, line)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_line: u32,
    pub end_line: u32,
    #[serde(default)]
    pub start_offset: Option<u32>,
    #[serde(default)]
    pub end_offset: Option<u32>,
}

/// Server side aggregation returned with an issue search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub property: String,
    #[serde(default)]
    pub values: Vec<FacetValue>,
}

impl Facet {
    pub fn count(&self, val: &str) -> u64 {
        self.values
            .iter()
            .find(|v| v.val == val)
            .map(|v| v.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetValue {
    pub val: String,
    #[serde(default)]
    pub count: u64,
}

/// Language known by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub key: String,
    #[serde(default)]
    pub name: String,
}
