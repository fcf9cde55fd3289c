//! Fixture-backed data source (offline use and tests)
//!
//! Reads a JSON file holding full service and connection rows and answers the
//! three dashboard reads from it, scoped by owner like the real service.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DataSource;
use crate::services::Aggregator;
use crate::types::{
    ConnectionRecord, DashboardError, DataFetchFailure, Identity, PriceRecord, Result,
    ServiceRecord,
};

/// Fixture file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

/// Data source answering reads from an in-memory fixture
pub struct FixtureDataSource {
    fixture: Fixture,
}

impl FixtureDataSource {
    /// Load a fixture from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let fixture: Fixture = serde_json::from_str(&content).map_err(|e| {
            DashboardError::Fixture(format!("{}: invalid fixture: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            services = fixture.services.len(),
            connections = fixture.connections.len(),
            "loaded fixture"
        );

        Ok(Self { fixture })
    }

    /// Build a fixture source from records directly
    pub fn from_records(services: Vec<ServiceRecord>, connections: Vec<ConnectionRecord>) -> Self {
        Self {
            fixture: Fixture {
                services,
                connections,
            },
        }
    }

    fn services_of<'a>(
        &'a self,
        identity: &'a Identity,
    ) -> impl Iterator<Item = &'a ServiceRecord> + 'a {
        self.fixture
            .services
            .iter()
            .filter(move |s| s.user_id == identity.user_id)
    }
}

impl DataSource for FixtureDataSource {
    fn name(&self) -> &str {
        "fixture"
    }

    fn count_active_services(
        &self,
        identity: &Identity,
    ) -> std::result::Result<u64, DataFetchFailure> {
        Ok(Aggregator::count_active(self.services_of(identity)))
    }

    fn list_connections(
        &self,
        identity: &Identity,
    ) -> std::result::Result<Vec<ConnectionRecord>, DataFetchFailure> {
        Ok(self
            .fixture
            .connections
            .iter()
            .filter(|c| c.user_id == identity.user_id)
            .cloned()
            .collect())
    }

    fn list_service_prices(
        &self,
        identity: &Identity,
    ) -> std::result::Result<Vec<PriceRecord>, DataFetchFailure> {
        Ok(self.services_of(identity).map(PriceRecord::from).collect())
    }
}
