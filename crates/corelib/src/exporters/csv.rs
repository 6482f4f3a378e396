use super::{write_file, Exporter};
use crate::types::{Issue, RawIssue, Report};
use crate::utils::format_filename;
use std::path::{Path, PathBuf};

const ISSUE_COLUMNS: &[&str] = &[
    "Key",
    "Type",
    "Severity",
    "Rule",
    "Message",
    "File",
    "Start line",
    "End line",
    "Status",
    "Resolution",
    "Effort",
    "Tags",
    "Author",
    "Creation date",
];

/// Writes the issue sheets: open issues, unconfirmed issues and every raw field
pub struct CsvIssuesExporter;

impl Exporter for CsvIssuesExporter {
    fn export(&self, report: &Report, dir: &Path) -> crate::Result<Vec<PathBuf>> {
        let sheets = [
            ("issues", issues_sheet(&report.issues)),
            ("unconfirmed", issues_sheet(&report.unconfirmed)),
            ("all", raw_sheet(&report.raw_issues)),
        ];

        let mut written = Vec::with_capacity(sheets.len());
        for (sheet, content) in sheets {
            let pattern = crate::defaults::ISSUES_FILENAME.replace("SHEET", sheet);
            let path = dir.join(format_filename(&pattern, &report.date, report.project_name()));
            write_file(&path, &content)?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Quotes a field when it holds a separator, a quote or a line break
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let row: Vec<String> = fields.iter().map(|f| escape(f.as_ref())).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

fn issues_sheet(issues: &[Issue]) -> String {
    let mut out = String::new();
    push_row(&mut out, ISSUE_COLUMNS);

    for issue in issues {
        let (start, end) = issue
            .line_range()
            .map(|(s, e)| (s.to_string(), e.to_string()))
            .unwrap_or_default();

        push_row(
            &mut out,
            &[
                issue.key.clone(),
                issue.issue_type.clone(),
                issue.severity.clone(),
                issue.rule.clone(),
                issue.message.clone(),
                issue.file_path().to_string(),
                start,
                end,
                issue.status.clone(),
                issue.resolution.clone().unwrap_or_default(),
                issue.effort.clone().unwrap_or_default(),
                issue.tags.join(" "),
                issue.author.clone().unwrap_or_default(),
                issue.creation_date.clone().unwrap_or_default(),
            ],
        );
    }

    out
}

/// One column per field seen in any raw issue, in first-seen order
fn raw_sheet(issues: &[RawIssue]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for issue in issues {
        for key in issue.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut out = String::new();
    push_row(&mut out, &columns);

    for issue in issues {
        let row: Vec<String> = columns
            .iter()
            .map(|column| match issue.get(*column) {
                None | Some(serde_json::Value::Null) => String::new(),
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            })
            .collect();
        push_row(&mut out, &row);
    }

    out
}
