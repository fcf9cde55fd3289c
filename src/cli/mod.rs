use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::Config;
use crate::logging;
use crate::services::presenter::RECENT_ACTIVITY;
use crate::services::{
    billing_history, select_connection_view, summary_cards, BillingHistory, ConnectionView,
    DashboardSession, FetchStats,
};
use crate::types::DashboardSummary;

/// Account dashboard: service stats, connected AI tools, and billing history
#[derive(Parser)]
#[command(name = "acctdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Signed-in user id (overrides ACCTDASH_USER_ID)
    #[arg(long, global = true)]
    user_id: Option<String>,

    /// Data service URL (overrides ACCTDASH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Read from a JSON fixture instead of the data service
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Fetch once and print the account summary
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show billing history
    Billing {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// `summary --json` payload
#[derive(Debug, Serialize)]
pub struct SummaryReport<'a> {
    pub user_id: &'a str,
    pub summary: &'a DashboardSummary,
    pub connections: ConnectionView,
    pub stats: &'a FetchStats,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::from_env().with_overrides(self.user_id, self.api_url, self.fixture);

        match self.command {
            None | Some(Commands::Tui) => crate::tui::run(config),
            Some(Commands::Summary { json }) => {
                logging::init_stderr().ok();
                run_summary(&config, json)
            }
            Some(Commands::Billing { json }) => {
                let history = billing_history();
                if json {
                    println!("{}", serde_json::to_string_pretty(&history)?);
                } else {
                    print!("{}", BillingText(&history));
                }
                Ok(())
            }
        }
    }
}

fn run_summary(config: &Config, json: bool) -> anyhow::Result<()> {
    let identity = config
        .identity()
        .context("no user id configured (set ACCTDASH_USER_ID or pass --user-id)")?;
    let source = config.data_source()?;

    let mut session = DashboardSession::new();
    if let Some(ticket) = session.set_identity(Some(identity.clone())) {
        session.run_fetch(&ticket, source.as_ref());
    }

    let now = Utc::now();
    if json {
        let report = SummaryReport {
            user_id: &identity.user_id,
            summary: session.summary(),
            connections: select_connection_view(session.connections(), session.is_loading(), now),
            stats: session.stats(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", SummaryText { session: &session, now });
    }
    Ok(())
}

/// Plain-text account overview
pub struct SummaryText<'a> {
    pub session: &'a DashboardSession,
    pub now: DateTime<Utc>,
}

impl fmt::Display for SummaryText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;
        let user = session
            .identity()
            .map(|i| i.user_id.as_str())
            .unwrap_or("-");
        writeln!(f, "Account overview ({})", user)?;
        writeln!(f)?;

        for card in summary_cards(session.summary(), session.is_loading()) {
            writeln!(f, "  {:<20} {:<10} {}", card.title, card.value, card.caption)?;
        }

        writeln!(f)?;
        writeln!(f, "Connected AI Tools")?;
        match select_connection_view(session.connections(), session.is_loading(), self.now) {
            ConnectionView::Loading => writeln!(f, "  Loading...")?,
            ConnectionView::Empty => writeln!(f, "  No AI tools connected yet (Connect Tool)")?,
            ConnectionView::Populated(rows) => {
                for row in rows {
                    writeln!(
                        f,
                        "  {:<20} {:<16} {}",
                        row.tool_name, row.last_used, row.status
                    )?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Recent Activity")?;
        for entry in RECENT_ACTIVITY.iter() {
            writeln!(
                f,
                "  {:<14} {:<20} {}",
                entry.date, entry.activity, entry.status
            )?;
        }
        Ok(())
    }
}

/// Plain-text billing page
pub struct BillingText<'a>(pub &'a BillingHistory);

impl fmt::Display for BillingText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let history = self.0;
        writeln!(
            f,
            "Payment Method  {} ({})",
            history.payment_method.label, history.payment_method.expiry
        )?;
        writeln!(
            f,
            "Next Payment    {}  {}",
            history.next_payment.date, history.next_payment.amount
        )?;
        writeln!(f)?;
        writeln!(f, "{:<10} {:<14} {:<10} Status", "Invoice", "Date", "Amount")?;
        for invoice in history.invoices {
            writeln!(
                f,
                "{:<10} {:<14} {:<10} {}",
                invoice.id,
                invoice.date,
                invoice.amount_label(),
                invoice.status
            )?;
        }
        Ok(())
    }
}
