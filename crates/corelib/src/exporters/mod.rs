//! Exporters turning a [`Report`] into files

mod csv;
mod json;
mod markdown;
mod xml;

pub use self::csv::CsvIssuesExporter;
pub use self::json::JsonGateExporter;
pub use self::markdown::{render_markdown, MarkdownExporter};
pub use self::xml::XmlProfileExporter;

use crate::config::Config;
use crate::types::Report;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes (part of) a report below `dir` and returns the written files
pub trait Exporter {
    fn export(&self, report: &Report, dir: &Path) -> crate::Result<Vec<PathBuf>>;
}

/// Runs every exporter the configuration asks for
pub fn export_all(report: &Report, config: &Config) -> crate::Result<Vec<PathBuf>> {
    let mut exporters: Vec<Box<dyn Exporter>> =
        vec![Box::new(MarkdownExporter), Box::new(CsvIssuesExporter)];

    if config.export_conf {
        exporters.push(Box::new(XmlProfileExporter));
        exporters.push(Box::new(JsonGateExporter));
    }

    let mut written = Vec::new();
    for exporter in exporters {
        written.extend(exporter.export(report, &config.output_dir)?);
    }

    info!("Wrote {} files to {:?}", written.len(), config.output_dir);
    Ok(written)
}

/// Writes `content` to `path`, creating the parent directory if needed
pub(crate) fn write_file(path: &Path, content: &str) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;

    info!("Saved {:?}", path);
    Ok(())
}

/// Directory receiving the configuration exports
pub(crate) fn conf_dir(dir: &Path) -> PathBuf {
    dir.join(crate::defaults::CONF_DIR)
}

#[cfg(test)]
pub(crate) fn sample_report() -> Report {
    use crate::types::*;
    use serde_json::json;

    let mut project = Project {
        key: "proj1".to_string(),
        name: "Proj One".to_string(),
        version: "1.0".to_string(),
        description: "Sample".to_string(),
        quality_profiles: vec![ProfileMetaData {
            key: "p1".to_string(),
            name: "Sonar way".to_string(),
            language: Some("java".to_string()),
        }],
        ..Default::default()
    };
    project.languages.insert(
        "java".to_string(),
        Language {
            key: "java".to_string(),
            name: "Java".to_string(),
        },
    );

    let issue: Issue = serde_json::from_value(json!({
        "key": "A",
        "rule": "java:S1481",
        "severity": "MAJOR",
        "component": "proj1:src/Main.java",
        "line": 3,
        "status": "OPEN",
        "message": "Remove \"tmp\", it is unused",
        "type": "CODE_SMELL"
    }))
    .unwrap();

    let raw = json!({"key": "A", "rule": "java:S1481", "debt": "5min"})
        .as_object()
        .cloned()
        .unwrap();

    Report {
        project,
        author: "Jane".to_string(),
        date: "2024-05-01".to_string(),
        measures: vec![Measure {
            metric: "coverage".to_string(),
            value: json!("87.3"),
        }],
        issues: vec![issue],
        unconfirmed: Vec::new(),
        raw_issues: vec![raw],
        facets: vec![Facet {
            property: "severities".to_string(),
            values: vec![FacetValue {
                val: "MAJOR".to_string(),
                count: 1,
            }],
        }],
        quality_profiles: vec![QualityProfile {
            key: "p1".to_string(),
            name: "Sonar way".to_string(),
            language: "java".to_string(),
            language_name: "Java".to_string(),
            conf: "<profile><name>Sonar way</name></profile>".to_string(),
            ..Default::default()
        }],
        quality_gate: QualityGate {
            id: "1".to_string(),
            name: "Sonar way".to_string(),
            is_default: true,
            conf: json!({"name": "Sonar way", "conditions": []}),
        },
    }
}
