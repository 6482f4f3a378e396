use super::{conf_dir, write_file, Exporter};
use crate::types::Report;
use crate::utils::sanitize_file_name;
use std::path::{Path, PathBuf};

/// Writes the exported configuration of each used quality profile
pub struct XmlProfileExporter;

impl Exporter for XmlProfileExporter {
    fn export(&self, report: &Report, dir: &Path) -> crate::Result<Vec<PathBuf>> {
        let dir = conf_dir(dir);
        let mut written = Vec::with_capacity(report.quality_profiles.len());

        for profile in &report.quality_profiles {
            let path = dir.join(format!("{}.xml", sanitize_file_name(&profile.key)));
            write_file(&path, &profile.conf)?;
            written.push(path);
        }

        Ok(written)
    }
}
