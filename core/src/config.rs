//! Process-wide list service configuration.
//!
//! Loaded once at startup (optional file, then `SPLIST_*` environment
//! variables) and passed by value into the client. Nothing here changes
//! after construction.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::ListKind;

pub const ENV_PREFIX: &str = "SPLIST";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListServiceConfig {
    /// Base URL of the site hosting the lists, e.g. `https://contoso.sharepoint.com/sites/research`.
    pub site_url: String,
    pub projects_list_name: String,
    pub references_list_name: String,
    /// Transport-level timeout. `None` leaves bounding calls to the caller.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ListServiceConfig {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            projects_list_name: "Projects".to_string(),
            references_list_name: "References".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ListServiceConfig {
    pub fn new(site_url: &str) -> Self {
        Self {
            site_url: site_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Load from an optional file, overridden by `SPLIST_*` variables
    /// (`SPLIST_SITE_URL`, `SPLIST_PROJECTS_LIST_NAME`, ...).
    pub fn load(config_file: Option<&str>) -> Result<Self, ApiError> {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            } else {
                tracing::warn!(path, "configuration file not found, using environment only");
            }
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.site_url = config.site_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.site_url.is_empty() {
            return Err(ApiError::InvalidConfig("site_url must be set".to_string()));
        }
        if !(self.site_url.starts_with("http://") || self.site_url.starts_with("https://")) {
            return Err(ApiError::InvalidConfig(format!(
                "site_url must be an http(s) URL, got {}",
                self.site_url
            )));
        }
        if self.projects_list_name.trim().is_empty() {
            return Err(ApiError::InvalidConfig(
                "projects_list_name must not be empty".to_string(),
            ));
        }
        if self.references_list_name.trim().is_empty() {
            return Err(ApiError::InvalidConfig(
                "references_list_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_list_names(mut self, projects: &str, references: &str) -> Self {
        self.projects_list_name = projects.to_string();
        self.references_list_name = references.to_string();
        self
    }

    pub fn list_name(&self, kind: ListKind) -> &str {
        match kind {
            ListKind::Projects => &self.projects_list_name,
            ListKind::References => &self.references_list_name,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
