//! Fetch-cycle state for one dashboard view
//!
//! The session owns the last summary together with the identity it was
//! computed for. Every fetch is stamped with a generation number; only the
//! completion matching the current generation is applied.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::Aggregator;
use crate::sources::DataSource;
use crate::types::{ConnectionRecord, DashboardSummary, DataFetchFailure, FetchedRecords, Identity};

/// Handle for one in-flight fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub identity: Identity,
}

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Result replaced the summary
    Applied,
    /// Read failed; previous summary kept
    Failed,
    /// A newer fetch or identity superseded this one
    Stale,
}

/// Counters exposed for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchStats {
    pub successes: u64,
    pub failures: u64,
    pub stale_discarded: u64,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure_at: Option<DateTime<Utc>>,
}

/// Dashboard view-model state for a single view instance
#[derive(Debug)]
pub struct DashboardSession {
    identity: Option<Identity>,
    summary: DashboardSummary,
    connections: Vec<ConnectionRecord>,
    loading: bool,
    generation: u64,
    stats: FetchStats,
}

impl DashboardSession {
    /// New session: no identity, zero summary, loading
    pub fn new() -> Self {
        Self {
            identity: None,
            summary: DashboardSummary::default(),
            connections: Vec::new(),
            loading: true,
            generation: 0,
            stats: FetchStats::default(),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn summary(&self) -> &DashboardSummary {
        &self.summary
    }

    pub fn connections(&self) -> &[ConnectionRecord] {
        &self.connections
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> &FetchStats {
        &self.stats
    }

    /// Switch to a new identity.
    ///
    /// An unchanged identity is a no-op. Otherwise the cached summary and
    /// connections are dropped, any in-flight fetch becomes stale, and a ticket
    /// is returned when the new identity is present.
    pub fn set_identity(&mut self, identity: Option<Identity>) -> Option<FetchTicket> {
        if self.identity == identity {
            return None;
        }

        tracing::debug!(
            previous = ?self.identity.as_ref().map(|i| i.user_id.as_str()),
            next = ?identity.as_ref().map(|i| i.user_id.as_str()),
            "identity changed, invalidating summary"
        );

        self.identity = identity;
        self.summary = DashboardSummary::default();
        self.connections.clear();
        self.loading = true;
        self.generation += 1;
        self.ticket()
    }

    /// Start another fetch for the current identity (manual refresh).
    /// Returns None without an identity.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        self.identity.as_ref()?;
        self.generation += 1;
        self.loading = true;
        self.ticket()
    }

    fn ticket(&self) -> Option<FetchTicket> {
        self.identity.clone().map(|identity| FetchTicket {
            generation: self.generation,
            identity,
        })
    }

    /// Apply the result of a fetch.
    ///
    /// Failures never propagate: they are logged, counted, and the previous
    /// summary stays in place. Loading clears either way.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<FetchedRecords, DataFetchFailure>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation || self.identity.as_ref() != Some(&ticket.identity)
        {
            self.stats.stale_discarded += 1;
            tracing::debug!(
                generation = ticket.generation,
                current_generation = self.generation,
                user_id = %ticket.identity,
                "discarding stale fetch result"
            );
            return FetchOutcome::Stale;
        }

        self.loading = false;

        match result {
            Ok(records) => {
                self.summary = Aggregator::summarize_fetch(&records);
                self.connections = records.connections;
                self.stats.successes += 1;
                self.stats.last_success_at = Some(Utc::now());

                tracing::info!(
                    user_id = %ticket.identity,
                    generation = ticket.generation,
                    active_services = self.summary.active_service_count,
                    connected_tools = self.summary.connected_tool_count,
                    total_spent = self.summary.total_spent,
                    "dashboard summary updated"
                );
                FetchOutcome::Applied
            }
            Err(failure) => {
                self.stats.failures += 1;
                self.stats.last_failure_at = Some(Utc::now());

                tracing::error!(
                    read = failure.read,
                    error = %failure.message,
                    user_id = %ticket.identity,
                    generation = ticket.generation,
                    failures = self.stats.failures,
                    "dashboard fetch failed, keeping previous summary"
                );
                FetchOutcome::Failed
            }
        }
    }

    /// Run a fetch synchronously against `source` and apply it
    pub fn run_fetch(&mut self, ticket: &FetchTicket, source: &dyn DataSource) -> FetchOutcome {
        let result = source.fetch_all(&ticket.identity);
        self.complete(ticket, result)
    }
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}
