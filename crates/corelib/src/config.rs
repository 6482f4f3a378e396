use crate::error::ReportError;
use crate::requests::RequestTemplates;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a report run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the SonarQube server
    pub server_url: String,

    /// Access token, sent as basic-auth user when present
    pub token: Option<String>,

    /// Key of the project to report
    pub project_key: String,

    /// Author written in the report
    pub author: String,

    /// Report date (YYYY-MM-DD)
    pub report_date: String,

    /// Directory receiving the generated files
    pub output_dir: PathBuf,

    /// Whether quality profile and quality gate configurations are exported
    pub export_conf: bool,

    /// Number of results requested per page
    pub page_size: u32,

    /// Timeout in seconds for each request, transport default when unset
    pub timeout_seconds: Option<u64>,

    /// JSON file overriding the built-in request templates
    pub requests_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            token: None,
            project_key: String::new(),
            author: crate::defaults::DEFAULT_AUTHOR.to_string(),
            report_date: today(),
            output_dir: PathBuf::from(crate::defaults::DEFAULT_OUTPUT_DIR),
            export_conf: true,
            page_size: crate::defaults::MAX_PAGE_SIZE,
            timeout_seconds: None,
            requests_file: None,
        }
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Creates a new configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let defaults = Config::default();

        let server_url = non_empty_var("SONAR_URL").unwrap_or(defaults.server_url);
        let token = non_empty_var("SONAR_TOKEN");
        let project_key = non_empty_var("SONAR_PROJECT_ID").unwrap_or(defaults.project_key);
        let author = non_empty_var("REPORT_AUTHOR").unwrap_or(defaults.author);
        let report_date = non_empty_var("REPORT_DATE").unwrap_or(defaults.report_date);

        let output_dir = non_empty_var("REPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let export_conf = non_empty_var("REPORT_CONF")
            .map(|v| !matches!(v.to_lowercase().as_str(), "no" | "false" | "0"))
            .unwrap_or(defaults.export_conf);

        let page_size = match non_empty_var("MAX_PER_PAGE") {
            Some(v) => v.parse().map_err(|_| {
                ReportError::Config(format!("MAX_PER_PAGE is not a number: {}", v))
            })?,
            None => defaults.page_size,
        };

        let timeout_seconds = match non_empty_var("TIMEOUT_SECONDS") {
            Some(v) => Some(v.parse().map_err(|_| {
                ReportError::Config(format!("TIMEOUT_SECONDS is not a number: {}", v))
            })?),
            None => None,
        };

        let requests_file = non_empty_var("REQUESTS_FILE").map(PathBuf::from);

        Ok(Config {
            server_url,
            token,
            project_key,
            author,
            report_date,
            output_dir,
            export_conf,
            page_size,
            timeout_seconds,
            requests_file,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(ReportError::UnknownParameter("sonar.url".to_string()));
        }

        if self.project_key.trim().is_empty() {
            return Err(ReportError::UnknownParameter("sonar.project.id".to_string()));
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(ReportError::Config(format!(
                "Server URL must start with http:// or https://: {}",
                self.server_url
            )));
        }

        if chrono::NaiveDate::parse_from_str(&self.report_date, "%Y-%m-%d").is_err() {
            return Err(ReportError::Config(format!(
                "Report date must be formatted YYYY-MM-DD: {}",
                self.report_date
            )));
        }

        if self.page_size == 0 || self.page_size > crate::defaults::MAX_PAGE_SIZE {
            return Err(ReportError::Config(format!(
                "Page size must be between 1 and {}",
                crate::defaults::MAX_PAGE_SIZE
            )));
        }

        if self.timeout_seconds == Some(0) {
            return Err(ReportError::Config(
                "Timeout seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Request templates for this run, built-in unless a file is configured
    pub fn request_templates(&self) -> crate::Result<RequestTemplates> {
        match &self.requests_file {
            Some(path) => RequestTemplates::from_file(path),
            None => Ok(RequestTemplates::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn valid() -> Config {
        Config {
            server_url: "http://localhost:9000".to_string(),
            project_key: "proj1".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.author, "Unknown");
        assert_eq!(config.page_size, 500);
        assert!(config.export_conf);
        assert!(config.token.is_none());
        assert_eq!(config.report_date.len(), 10);
    }

    #[test]
    fn test_missing_server_url_is_unknown_parameter() {
        let config = Config {
            server_url: String::new(),
            ..valid()
        };
        match config.validate() {
            Err(ReportError::UnknownParameter(name)) => assert_eq!(name, "sonar.url"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_project_is_unknown_parameter() {
        let config = Config {
            project_key: "  ".to_string(),
            ..valid()
        };
        match config.validate() {
            Err(ReportError::UnknownParameter(name)) => assert_eq!(name, "sonar.project.id"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(valid().validate().is_ok());

        let too_big = Config {
            page_size: 501,
            ..valid()
        };
        assert!(matches!(too_big.validate(), Err(ReportError::Config(_))));

        let zero = Config {
            page_size: 0,
            ..valid()
        };
        assert!(matches!(zero.validate(), Err(ReportError::Config(_))));
    }

    #[test]
    fn test_report_date_format() {
        let slashed = Config {
            report_date: "2024/05/01".to_string(),
            ..valid()
        };
        assert!(matches!(slashed.validate(), Err(ReportError::Config(_))));

        let dated = Config {
            report_date: "2024-05-01".to_string(),
            ..valid()
        };
        assert!(dated.validate().is_ok());
    }

    #[test]
    fn test_bad_scheme_rejected() {
        let config = Config {
            server_url: "sonar:9000".to_string(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ReportError::Config(_))));
    }

    #[test]
    fn test_config_from_env() {
        // Only variables no other test touches
        env::set_var("REPORT_AUTHOR", "Jane");
        env::set_var("REPORT_CONF", "no");

        let config = Config::from_env().unwrap();
        assert_eq!(config.author, "Jane");
        assert!(!config.export_conf);

        env::remove_var("REPORT_AUTHOR");
        env::remove_var("REPORT_CONF");
    }

    #[test]
    fn test_default_request_templates() {
        let templates = valid().request_templates().unwrap();
        assert_eq!(templates, RequestTemplates::default());
    }
}
