use super::{conf_dir, write_file, Exporter};
use crate::types::Report;
use crate::utils::sanitize_file_name;
use std::path::{Path, PathBuf};

/// Writes the quality gate configuration as pretty-printed JSON
pub struct JsonGateExporter;

impl Exporter for JsonGateExporter {
    fn export(&self, report: &Report, dir: &Path) -> crate::Result<Vec<PathBuf>> {
        let gate = &report.quality_gate;
        let path = conf_dir(dir).join(format!("{}.json", sanitize_file_name(&gate.name)));

        let content = serde_json::to_string_pretty(&gate.conf)?;
        write_file(&path, &content)?;

        Ok(vec![path])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporters::sample_report;

    #[test]
    fn test_gate_conf_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();

        let written = JsonGateExporter.export(&report, dir.path()).unwrap();

        let content = std::fs::read_to_string(&written[0]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, report.quality_gate.conf);
        assert!(written[0].ends_with("conf/Sonar way.json"));
    }
}
