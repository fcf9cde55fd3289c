//! Aggregator service for computing dashboard summary figures

use serde_json::Value;

use crate::types::{
    ConnectionRecord, DashboardSummary, FetchedRecords, Identity, PriceRecord, ServiceRecord,
    ServiceStatus,
};

/// Coerce a raw price value to a number.
///
/// Finite numbers and numeric strings pass through, negative ones included.
/// Anything else (null, missing, empty, non-numeric, non-finite) contributes
/// zero.
pub fn coerce_price(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(price) if price.is_finite() => {
            if price < 0.0 {
                tracing::warn!(price, "negative service price included in total");
            }
            price
        }
        _ => 0.0,
    }
}

/// Aggregator for computing dashboard summary figures
pub struct Aggregator;

impl Aggregator {
    /// Compute the summary for `identity` from full service and connection records.
    ///
    /// Returns `None` when no identity is resolved; the caller keeps whatever
    /// summary it already holds. Records owned by other users are ignored.
    pub fn compute_summary(
        identity: Option<&Identity>,
        services: &[ServiceRecord],
        connections: &[ConnectionRecord],
    ) -> Option<DashboardSummary> {
        let user_id = identity?.user_id.as_str();
        let owned_services = || services.iter().filter(move |s| s.user_id == user_id);
        let owned_connections = connections.iter().filter(|c| c.user_id == user_id);

        Some(DashboardSummary {
            active_service_count: Self::count_active(owned_services()),
            connected_tool_count: Self::count_connected(owned_connections),
            total_spent: Self::total_spent(owned_services().map(|s| &s.price)),
        })
    }

    /// Compute the summary from the three identity-scoped remote reads
    pub fn summarize_fetch(records: &FetchedRecords) -> DashboardSummary {
        DashboardSummary {
            active_service_count: records.active_service_count,
            connected_tool_count: Self::count_connected(&records.connections),
            total_spent: Self::total_prices(&records.service_prices),
        }
    }

    /// Count services with status `active` (count only, nothing collected)
    pub fn count_active<'a, I>(services: I) -> u64
    where
        I: IntoIterator<Item = &'a ServiceRecord>,
    {
        services
            .into_iter()
            .filter(|s| s.status == ServiceStatus::Active)
            .count() as u64
    }

    /// Count connections with status `connected`
    pub fn count_connected<'a, I>(connections: I) -> u64
    where
        I: IntoIterator<Item = &'a ConnectionRecord>,
    {
        connections
            .into_iter()
            .filter(|c| c.status.is_connected())
            .count() as u64
    }

    /// Sum of prices regardless of service status, seeded at zero
    pub fn total_spent<'a, I>(prices: I) -> f64
    where
        I: IntoIterator<Item = &'a Value>,
    {
        prices
            .into_iter()
            .map(coerce_price)
            .fold(0.0, |sum, price| sum + price)
    }

    /// `total_spent` over `{price}` projections
    pub fn total_prices(prices: &[PriceRecord]) -> f64 {
        Self::total_spent(prices.iter().map(|p| &p.price))
    }
}
