//! Data source trait and implementations for the account data service

mod fixture;
mod rest;

pub use fixture::{Fixture, FixtureDataSource};
pub use rest::{parse_content_range_total, RestDataSource};

use crate::types::{ConnectionRecord, DataFetchFailure, FetchedRecords, Identity, PriceRecord};

/// Read names used in failure reports and log events
pub const READ_ACTIVE_COUNT: &str = "count_active_services";
pub const READ_CONNECTIONS: &str = "list_connections";
pub const READ_PRICES: &str = "list_service_prices";

/// Identity-scoped reads the dashboard needs from the data service
pub trait DataSource: Send + Sync {
    /// Source name (e.g., "rest", "fixture")
    fn name(&self) -> &str;

    /// Count of services with status `active` owned by `identity`
    fn count_active_services(&self, identity: &Identity) -> Result<u64, DataFetchFailure>;

    /// All connections owned by `identity`, in service order
    fn list_connections(
        &self,
        identity: &Identity,
    ) -> Result<Vec<ConnectionRecord>, DataFetchFailure>;

    /// `{price}` of every service owned by `identity`, any status
    fn list_service_prices(
        &self,
        identity: &Identity,
    ) -> Result<Vec<PriceRecord>, DataFetchFailure>;

    /// Run the three reads in order. Any failure fails the whole cycle.
    fn fetch_all(&self, identity: &Identity) -> Result<FetchedRecords, DataFetchFailure> {
        let active_service_count = self.count_active_services(identity)?;
        let connections = self.list_connections(identity)?;
        let service_prices = self.list_service_prices(identity)?;

        Ok(FetchedRecords {
            active_service_count,
            connections,
            service_prices,
        })
    }
}
