//! Sonar Report - quality reports for a SonarQube project
//!
//! This library queries the web API of a SonarQube server for one project
//! (issues, measures, quality profiles, quality gate, languages), assembles
//! the answers into a [`Report`] and exports it as documents.
//!
//! ## Features
//!
//! - **Providers**: one per entity family, each knowing its query and answer shape
//! - **Pagination**: paged searches are accumulated in server delivery order
//! - **Consistency**: only the quality profiles actually used by the project are reported
//! - **Exporters**: Markdown report, CSV issue sheets, XML profiles, JSON quality gate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sonar_corelib::{exporters, Config, ReportFactory};
//!
//! #[tokio::main]
//! async fn main() -> sonar_corelib::Result<()> {
//!     let config = Config {
//!         server_url: "http://localhost:9000".to_string(),
//!         project_key: "my-project".to_string(),
//!         ..Config::default()
//!     };
//!
//!     let report = ReportFactory::new(&config)?.create().await?;
//!     exporters::export_all(&report, &config)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Request templates
//!
//! Every query is a URL template with `{placeholder}` names (`{url}`,
//! `{project}`, `{page}`, `{page_size}`, ...). The built-in set lives in
//! [`defaults::requests`] and can be replaced from a JSON file.

pub mod client;
pub mod config;
pub mod error;
pub mod exporters;
pub mod factory;
pub mod logging;
pub mod pagination;
pub mod providers;
pub mod requests;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{HttpTransport, RequestExecutor, Transport, TransportResponse};
pub use config::Config;
pub use error::{ReportError, Result};
pub use factory::ReportFactory;
pub use requests::RequestTemplates;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Largest page size SonarQube accepts
    pub const MAX_PAGE_SIZE: u32 = 500;

    /// Default author written in the report
    pub const DEFAULT_AUTHOR: &str = "Unknown";

    /// Default output directory
    pub const DEFAULT_OUTPUT_DIR: &str = "./reports";

    /// Sub-directory receiving the configuration exports
    pub const CONF_DIR: &str = "conf";

    /// Report document filename pattern
    pub const REPORT_FILENAME: &str = "DATE-NAME-analysis-report.md";

    /// Issues sheet filename pattern, `SHEET` is the sheet name
    pub const ISSUES_FILENAME: &str = "DATE-NAME-issues-SHEET.csv";

    /// Built-in request templates
    pub mod requests {
        pub const PROJECT: &str = "{url}/api/navigation/component?component={project}";

        pub const MEASURES: &str = "{url}/api/measures/component?component={project}&metricKeys=ncloc,comment_lines_density,coverage,duplicated_lines_density,complexity,cognitive_complexity,bugs,vulnerabilities,code_smells,security_hotspots,sqale_index,sqale_rating,reliability_rating,security_rating,alert_status";

        pub const ISSUES: &str = "{url}/api/issues/search?componentKeys={project}&resolved={resolved}&additionalFields=rules,comments&ps={page_size}&p={page}";

        pub const FACETS: &str = "{url}/api/issues/search?componentKeys={project}&resolved=false&facets=severities,types,rules,tags,directories&ps=1&p=1";

        pub const QUALITY_PROFILES: &str = "{url}/api/qualityprofiles/search?ps={page_size}&p={page}";

        pub const QUALITY_PROFILE_CONF: &str = "{url}/api/qualityprofiles/export?language={language}&qualityProfile={profile_name}";

        pub const QUALITY_PROFILE_RULES: &str = "{url}/api/rules/search?qprofile={profile}&activation=true&ps={page_size}&p={page}";

        pub const QUALITY_GATE: &str = "{url}/api/qualitygates/get_by_project?project={project}";

        pub const QUALITY_GATES: &str = "{url}/api/qualitygates/list";

        pub const QUALITY_GATE_DETAILS: &str = "{url}/api/qualitygates/show?name={gate}";

        pub const LANGUAGES: &str = "{url}/api/languages/list";
    }
}

/// Filename helpers shared by the exporters
pub mod utils {
    /// Replaces `DATE` and `NAME` in a filename pattern; both stay inside
    /// one path component
    pub fn format_filename(pattern: &str, date: &str, project_name: &str) -> String {
        pattern
            .replace("DATE", &sanitize_file_name(date))
            .replace("NAME", &sanitize_file_name(project_name))
    }

    /// Keeps a name usable as a single path component
    pub fn sanitize_file_name(name: &str) -> String {
        let cleaned: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
            "unnamed".to_string()
        } else {
            cleaned
        }
    }

}
