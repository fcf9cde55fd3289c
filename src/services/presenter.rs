//! Presenter mapping from summary and connection records to display values

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{ConnectionRecord, ConnectionStatus, DashboardSummary};

/// Shown in place of numbers while a fetch is in flight
pub const PLACEHOLDER: &str = "...";

/// Label for a connection that has never been used
pub const NEVER_USED: &str = "Never";

/// Relative labels switch to a calendar date after this many days
const RELATIVE_DAYS_LIMIT: i64 = 30;

/// Format a number with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Whole-dollar amount, halves rounded away from zero, no separators
/// (e.g., 1234.5 -> "$1235", -20 -> "$-20")
pub fn format_total_spent(total: f64) -> String {
    if !total.is_finite() {
        return "$0".to_string();
    }
    // Adding zero folds -0 into 0
    format!("${:.0}", total.round() + 0.0)
}

/// Badge styling classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Affirmative,
    Negative,
    Secondary,
}

/// Connection badges are binary: connected or not
pub fn connection_badge(status: &ConnectionStatus) -> BadgeVariant {
    if status.is_connected() {
        BadgeVariant::Affirmative
    } else {
        BadgeVariant::Negative
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Human-relative "last used" label; "Never" when absent
pub fn format_last_used(last_used: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = last_used else {
        return NEVER_USED.to_string();
    };

    let elapsed = now.signed_duration_since(at);
    if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    }
    if elapsed.num_hours() < 1 {
        return plural(elapsed.num_minutes(), "minute");
    }
    if elapsed.num_days() < 1 {
        return plural(elapsed.num_hours(), "hour");
    }
    if elapsed.num_days() < RELATIVE_DAYS_LIMIT {
        return plural(elapsed.num_days(), "day");
    }
    at.format("%b %-d, %Y").to_string()
}

/// One row of the connected-tools panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionRow {
    pub tool_name: String,
    pub last_used: String,
    pub status: String,
    pub badge: BadgeVariant,
}

impl ConnectionRow {
    fn from_record(record: &ConnectionRecord, now: DateTime<Utc>) -> Self {
        Self {
            tool_name: record.tool_name.clone(),
            last_used: format_last_used(record.last_used, now),
            status: record.status.as_str().to_string(),
            badge: connection_badge(&record.status),
        }
    }
}

/// Display state of the connected-tools panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "rows", rename_all = "lowercase")]
pub enum ConnectionView {
    Loading,
    Empty,
    Populated(Vec<ConnectionRow>),
}

/// Classify the connected-tools panel. Rows keep the service's order.
pub fn select_connection_view(
    connections: &[ConnectionRecord],
    loading: bool,
    now: DateTime<Utc>,
) -> ConnectionView {
    if loading {
        return ConnectionView::Loading;
    }
    if connections.is_empty() {
        return ConnectionView::Empty;
    }
    ConnectionView::Populated(
        connections
            .iter()
            .map(|c| ConnectionRow::from_record(c, now))
            .collect(),
    )
}

/// Which overview stat a card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    ActiveServices,
    ConnectedTools,
    TotalSpent,
    AccountStatus,
}

/// Display values for one overview stat card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCardView {
    pub kind: StatKind,
    pub title: &'static str,
    pub value: String,
    pub caption: &'static str,
}

/// The four overview cards. While loading, numbers render as placeholders so
/// "no data yet" never looks like zero.
pub fn summary_cards(summary: &DashboardSummary, loading: bool) -> [StatCardView; 4] {
    let count = |n: u64| {
        if loading {
            PLACEHOLDER.to_string()
        } else {
            format_number(n)
        }
    };
    let spent = if loading {
        format!("${}", PLACEHOLDER)
    } else {
        format_total_spent(summary.total_spent)
    };

    [
        StatCardView {
            kind: StatKind::ActiveServices,
            title: "Active Services",
            value: count(summary.active_service_count),
            caption: "Services running",
        },
        StatCardView {
            kind: StatKind::ConnectedTools,
            title: "Connected AI Tools",
            value: count(summary.connected_tool_count),
            caption: "Tools connected",
        },
        StatCardView {
            kind: StatKind::TotalSpent,
            title: "Total Spent",
            value: spent,
            caption: "All time",
        },
        StatCardView {
            kind: StatKind::AccountStatus,
            title: "Account Status",
            value: "Active".to_string(),
            caption: "All systems go",
        },
    ]
}

/// Static recent-activity feed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub date: &'static str,
    pub activity: &'static str,
    pub status: &'static str,
}

impl ActivityEntry {
    pub fn badge(&self) -> BadgeVariant {
        match self.status {
            "Active" | "Success" => BadgeVariant::Affirmative,
            _ => BadgeVariant::Secondary,
        }
    }
}

pub const RECENT_ACTIVITY: [ActivityEntry; 3] = [
    ActivityEntry {
        date: "Dec 10, 2024",
        activity: "NextCore Activated",
        status: "Active",
    },
    ActivityEntry {
        date: "Dec 12, 2024",
        activity: "AI Tool Connected",
        status: "Success",
    },
    ActivityEntry {
        date: "Dec 15, 2024",
        activity: "Payment Processed",
        status: "Active",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn make_connection(tool: &str, status: &str, last_used: Option<DateTime<Utc>>) -> ConnectionRecord {
        ConnectionRecord {
            id: None,
            user_id: "u-1".into(),
            tool_name: tool.into(),
            status: ConnectionStatus::from(status.to_string()),
            last_used,
        }
    }

    // ========== format tests ==========

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_total_spent_rounds_to_dollars() {
        assert_eq!(format_total_spent(0.0), "$0");
        assert_eq!(format_total_spent(150.5), "$151");
        assert_eq!(format_total_spent(150.49), "$150");
        assert_eq!(format_total_spent(2.5), "$3");
        assert_eq!(format_total_spent(1234.5), "$1235");
        assert_eq!(format_total_spent(12345.0), "$12345");
    }

    #[test]
    fn test_format_total_spent_negative_and_non_finite() {
        assert_eq!(format_total_spent(-20.0), "$-20");
        assert_eq!(format_total_spent(-0.4), "$0");
        assert_eq!(format_total_spent(f64::NAN), "$0");
    }

    #[test]
    fn test_format_last_used_never() {
        assert_eq!(format_last_used(None, now()), "Never");
    }

    #[test]
    fn test_format_last_used_relative() {
        let now = now();
        assert_eq!(format_last_used(Some(now - Duration::seconds(20)), now), "just now");
        assert_eq!(format_last_used(Some(now - Duration::minutes(1)), now), "1 minute ago");
        assert_eq!(format_last_used(Some(now - Duration::minutes(45)), now), "45 minutes ago");
        assert_eq!(format_last_used(Some(now - Duration::hours(3)), now), "3 hours ago");
        assert_eq!(format_last_used(Some(now - Duration::days(1)), now), "1 day ago");
        assert_eq!(format_last_used(Some(now - Duration::days(12)), now), "12 days ago");
    }

    #[test]
    fn test_format_last_used_old_is_calendar_date() {
        let at = Utc.with_ymd_and_hms(2024, 12, 10, 8, 0, 0).unwrap();
        assert_eq!(format_last_used(Some(at), now()), "Dec 10, 2024");
    }

    #[test]
    fn test_format_last_used_future_is_just_now() {
        let now = now();
        assert_eq!(format_last_used(Some(now + Duration::hours(2)), now), "just now");
    }

    // ========== select_connection_view tests ==========

    #[test]
    fn test_loading_wins_over_data() {
        let connections = vec![make_connection("ChatGPT", "connected", None)];
        assert_eq!(
            select_connection_view(&connections, true, now()),
            ConnectionView::Loading
        );
        assert_eq!(select_connection_view(&[], true, now()), ConnectionView::Loading);
    }

    #[test]
    fn test_empty_after_loading() {
        assert_eq!(select_connection_view(&[], false, now()), ConnectionView::Empty);
    }

    #[test]
    fn test_populated_keeps_order() {
        let connections = vec![
            make_connection("Zapier", "connected", None),
            make_connection("ChatGPT", "disconnected", None),
            make_connection("Midjourney", "connected", None),
        ];

        let ConnectionView::Populated(rows) = select_connection_view(&connections, false, now())
        else {
            panic!("expected populated view");
        };

        let names: Vec<&str> = rows.iter().map(|r| r.tool_name.as_str()).collect();
        assert_eq!(names, vec!["Zapier", "ChatGPT", "Midjourney"]);
    }

    #[test]
    fn test_error_status_gets_negative_badge() {
        let connections = vec![make_connection("Claude", "error", None)];

        let ConnectionView::Populated(rows) = select_connection_view(&connections, false, now())
        else {
            panic!("expected populated view");
        };

        assert_eq!(rows[0].badge, BadgeVariant::Negative);
        assert_eq!(rows[0].status, "error");
        assert_eq!(rows[0].last_used, "Never");
    }

    #[test]
    fn test_connection_badge_is_binary() {
        assert_eq!(connection_badge(&ConnectionStatus::Connected), BadgeVariant::Affirmative);
        assert_eq!(connection_badge(&ConnectionStatus::Disconnected), BadgeVariant::Negative);
        assert_eq!(connection_badge(&ConnectionStatus::Error), BadgeVariant::Negative);
        assert_eq!(
            connection_badge(&ConnectionStatus::Other("pending".into())),
            BadgeVariant::Negative
        );
    }

    #[test]
    fn test_connection_view_serializes_tagged() {
        let json = serde_json::to_value(ConnectionView::Empty).unwrap();
        assert_eq!(json["state"], "empty");
    }

    // ========== summary_cards tests ==========

    #[test]
    fn test_summary_cards_loading_placeholders() {
        let summary = DashboardSummary::default();
        let cards = summary_cards(&summary, true);

        assert_eq!(cards[0].value, "...");
        assert_eq!(cards[1].value, "...");
        assert_eq!(cards[2].value, "$...");
        assert_eq!(cards[3].value, "Active");
    }

    #[test]
    fn test_summary_cards_zero_is_not_placeholder() {
        let cards = summary_cards(&DashboardSummary::default(), false);
        assert_eq!(cards[0].value, "0");
        assert_eq!(cards[1].value, "0");
        assert_eq!(cards[2].value, "$0");
    }

    #[test]
    fn test_summary_cards_values() {
        let summary = DashboardSummary {
            active_service_count: 2,
            connected_tool_count: 1,
            total_spent: 150.5,
        };
        let cards = summary_cards(&summary, false);

        assert_eq!(cards[0].kind, StatKind::ActiveServices);
        assert_eq!(cards[0].value, "2");
        assert_eq!(cards[1].value, "1");
        assert_eq!(cards[2].value, "$151");
        assert_eq!(cards[2].caption, "All time");
    }

    // ========== activity tests ==========

    #[test]
    fn test_recent_activity_badges() {
        assert!(RECENT_ACTIVITY
            .iter()
            .all(|a| a.badge() == BadgeVariant::Affirmative));

        let pending = ActivityEntry {
            date: "Jan 1, 2025",
            activity: "Renewal",
            status: "Pending",
        };
        assert_eq!(pending.badge(), BadgeVariant::Secondary);
    }
}
