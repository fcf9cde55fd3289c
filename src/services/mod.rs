//! Services for summary aggregation, fetch-cycle state, and presentation

pub mod aggregator;
pub mod billing;
pub mod presenter;
pub mod session;

pub use aggregator::{coerce_price, Aggregator};
pub use billing::{billing_history, BillingHistory, Invoice};
pub use presenter::{
    format_last_used, format_number, format_total_spent, select_connection_view, summary_cards,
    BadgeVariant, ConnectionRow, ConnectionView, StatCardView, StatKind,
};
pub use session::{DashboardSession, FetchOutcome, FetchStats, FetchTicket};
