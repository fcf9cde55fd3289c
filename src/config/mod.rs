use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::sources::{DataSource, FixtureDataSource, RestDataSource};
use crate::types::{DashboardError, Identity, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Dashboard configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub user_id: Option<String>,
    pub timeout_secs: u64,
    pub fixture: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            access_token: None,
            user_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fixture: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_url: get("ACCTDASH_API_URL"),
            api_key: get("ACCTDASH_API_KEY"),
            access_token: get("ACCTDASH_ACCESS_TOKEN"),
            user_id: get("ACCTDASH_USER_ID"),
            timeout_secs: get("ACCTDASH_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            fixture: get("ACCTDASH_FIXTURE").map(PathBuf::from),
        }
    }

    /// Apply command-line flags on top of the environment
    pub fn with_overrides(
        mut self,
        user_id: Option<String>,
        api_url: Option<String>,
        fixture: Option<PathBuf>,
    ) -> Self {
        if user_id.is_some() {
            self.user_id = user_id;
        }
        if api_url.is_some() {
            self.api_url = api_url;
        }
        if fixture.is_some() {
            self.fixture = fixture;
        }
        self
    }

    /// Signed-in identity, if one is configured
    pub fn identity(&self) -> Option<Identity> {
        self.user_id.as_deref().map(Identity::new)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the configured data source. A fixture takes precedence over the
    /// REST service.
    pub fn data_source(&self) -> Result<Arc<dyn DataSource>> {
        if let Some(path) = &self.fixture {
            return Ok(Arc::new(FixtureDataSource::from_path(path)?));
        }

        let api_url = self
            .api_url
            .as_deref()
            .ok_or_else(|| DashboardError::Config("ACCTDASH_API_URL is not set".to_string()))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DashboardError::Config("ACCTDASH_API_KEY is not set".to_string()))?;
        let access_token = self.access_token.as_deref().unwrap_or(api_key);

        let source = RestDataSource::new(api_url, api_key, access_token, self.timeout())?;
        Ok(Arc::new(source))
    }
}
