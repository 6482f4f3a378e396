use super::{write_file, Exporter};
use crate::types::*;
use crate::utils::format_filename;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Metrics shown in the summary table, with their labels
const SUMMARY_METRICS: &[(&str, &str)] = &[
    ("alert_status", "Quality gate status"),
    ("ncloc", "Lines of code"),
    ("bugs", "Bugs"),
    ("vulnerabilities", "Vulnerabilities"),
    ("security_hotspots", "Security hotspots"),
    ("code_smells", "Code smells"),
    ("coverage", "Coverage (%)"),
    ("duplicated_lines_density", "Duplication (%)"),
    ("sqale_index", "Technical debt (min)"),
    ("reliability_rating", "Reliability rating"),
    ("security_rating", "Security rating"),
    ("sqale_rating", "Maintainability rating"),
];

const SEVERITIES: &[&str] = &["BLOCKER", "CRITICAL", "MAJOR", "MINOR", "INFO"];
const TYPES: &[&str] = &["BUG", "VULNERABILITY", "CODE_SMELL", "SECURITY_HOTSPOT"];

/// Writes the human readable analysis report
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export(&self, report: &Report, dir: &Path) -> crate::Result<Vec<PathBuf>> {
        let name = format_filename(
            crate::defaults::REPORT_FILENAME,
            &report.date,
            report.project_name(),
        );
        let path = dir.join(name);

        write_file(&path, &render_markdown(report))?;
        Ok(vec![path])
    }
}

/// Renders a complete report as Markdown
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&generate_header(report));
    out.push_str(&generate_measures(report));
    out.push_str(&generate_quality_gate(&report.quality_gate));
    out.push_str(&generate_profiles(report));
    out.push_str(&generate_distribution(report));
    out.push_str(&generate_issues(&report.issues));

    out.push_str(&format!(
        "---\n*Generated by sonar-report v{}*\n",
        crate::VERSION
    ));
    out
}

fn generate_header(report: &Report) -> String {
    let project = &report.project;
    let mut section = format!(
        r#"# Analysis report: {name}

**Project key:** {key}
**Version:** {version}
**Author:** {author}
**Date:** {date}
"#,
        name = project.name,
        key = project.key,
        version = project.version,
        author = report.author,
        date = report.date,
    );

    if !project.description.is_empty() {
        section.push_str(&format!("\n{}\n", project.description));
    }

    section.push_str("\n---\n\n");
    section
}

fn generate_measures(report: &Report) -> String {
    let mut section = String::from("## Measures\n\n| Metric | Value |\n|---|---|\n");

    for (metric, label) in SUMMARY_METRICS {
        let value = report
            .measure(metric)
            .and_then(Measure::value_str)
            .unwrap_or_else(|| "-".to_string());
        section.push_str(&format!("| {} | {} |\n", label, value));
    }

    section.push('\n');
    section
}

fn generate_quality_gate(gate: &QualityGate) -> String {
    let mut section = format!("## Quality gate\n\n**{}**", gate.name);
    if gate.is_default {
        section.push_str(" (default)");
    }
    section.push_str("\n\n");

    let conditions = gate
        .conf
        .get("conditions")
        .and_then(|c| c.as_array())
        .filter(|c| !c.is_empty());

    if let Some(conditions) = conditions {
        section.push_str("| Metric | Operator | Threshold |\n|---|---|---|\n");
        for condition in conditions {
            let field = |name: &str| {
                condition
                    .get(name)
                    .map(|v| match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .unwrap_or_default()
            };
            section.push_str(&format!(
                "| {} | {} | {} |\n",
                field("metric"),
                field("op"),
                field("error")
            ));
        }
        section.push('\n');
    }

    section
}

fn generate_profiles(report: &Report) -> String {
    let mut section = String::from("## Quality profiles\n\n");

    if report.quality_profiles.is_empty() {
        section.push_str("No quality profile.\n\n");
        return section;
    }

    section.push_str("| Language | Profile | Active rules |\n|---|---|---|\n");
    for profile in &report.quality_profiles {
        let language = match report.project.language(&profile.language) {
            Some(language) => &language.name,
            None if !profile.language_name.is_empty() => &profile.language_name,
            None => &profile.language,
        };
        let rules = if profile.rules.is_empty() {
            profile.active_rule_count
        } else {
            profile.rules.len() as u64
        };
        section.push_str(&format!("| {} | {} | {} |\n", language, profile.name, rules));
    }

    section.push('\n');
    section
}

fn generate_distribution(report: &Report) -> String {
    let mut section = String::from("## Issues distribution\n\n");

    section.push_str("### By severity\n\n");
    section.push_str(&distribution_table(report.facet("severities"), SEVERITIES));

    section.push_str("### By type\n\n");
    section.push_str(&distribution_table(report.facet("types"), TYPES));

    section.push_str(&format!(
        "- **Open issues:** {}\n- **Unconfirmed issues:** {}\n\n",
        report.issues.len(),
        report.unconfirmed.len()
    ));
    section
}

fn distribution_table(facet: Option<&Facet>, keys: &[&str]) -> String {
    let mut table = String::from("| Value | Count |\n|---|---|\n");
    for key in keys {
        let count = facet.map(|f| f.count(key)).unwrap_or(0);
        table.push_str(&format!("| {} | {} |\n", key, count));
    }
    table.push('\n');
    table
}

fn generate_issues(issues: &[Issue]) -> String {
    let mut section = String::from("## Issues\n\n");

    if issues.is_empty() {
        section.push_str("No open issue.\n\n");
        return section;
    }

    let mut by_file: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
    for issue in issues {
        by_file.entry(issue.file_path()).or_default().push(issue);
    }

    for (file, issues) in by_file {
        section.push_str(&format!("### {}\n\n", file));

        for issue in issues {
            let location = match issue.line_range() {
                Some((start, end)) if start == end => format!("L{}", start),
                Some((start, end)) => format!("L{}-{}", start, end),
                None => "-".to_string(),
            };
            section.push_str(&format!(
                "- **{}** {} `{}` ({}): {}\n",
                issue.severity,
                issue.issue_type,
                issue.rule,
                location,
                issue.message.replace('\n', " ")
            ));
        }
        section.push('\n');
    }

    section
}
