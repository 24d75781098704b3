//! Recent reports table.
//!
//! The table shows a fixed list of the latest anonymous submissions. There
//! is no derivation beyond choosing badge tags for status and priority.

use chrono::NaiveDate;
use serde::Serialize;

/// Case state of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportStatus {
    Active,
    Resolved,
}

impl ReportStatus {
    /// Badge classes: orange for active cases, green otherwise.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Active => "bg-orange-100 text-orange-700",
            Self::Resolved => "bg-green-100 text-green-700",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Resolved => write!(f, "Resolved"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Badge classes: red, yellow, or blue.
    pub fn tag(self) -> &'static str {
        match self {
            Self::High => "bg-red-100 text-red-700",
            Self::Medium => "bg-yellow-100 text-yellow-700",
            Self::Low => "bg-blue-100 text-blue-700",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// One row of the recent reports table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentReport {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub category: &'static str,
    pub status: ReportStatus,
    pub date: NaiveDate,
    pub priority: Priority,
}

const RECENT: [(&str, &str, ReportStatus, (i32, u32, u32), Priority); 5] = [
    ("#R047", "Harassment", ReportStatus::Active, (2025, 11, 28), Priority::High),
    ("#R046", "Discrimination", ReportStatus::Active, (2025, 11, 27), Priority::Medium),
    ("#R045", "Verbal Abuse", ReportStatus::Resolved, (2025, 11, 26), Priority::Low),
    ("#R044", "Harassment", ReportStatus::Resolved, (2025, 11, 25), Priority::High),
    ("#R043", "Bullying", ReportStatus::Active, (2025, 11, 24), Priority::Medium),
];

/// The latest submissions, newest first.
pub fn recent_reports() -> Vec<RecentReport> {
    RECENT
        .iter()
        .filter_map(|&(id, category, status, (y, m, d), priority)| {
            Some(RecentReport {
                id,
                category,
                status,
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                priority,
            })
        })
        .collect()
}

/// Render reports as CSV for the table's export action.
pub fn to_csv(reports: &[RecentReport]) -> String {
    let mut out = String::from("id,type,status,date,priority\n");
    for r in reports {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            r.id,
            csv_field(r.category),
            r.status,
            r.date.format("%Y-%m-%d"),
            r.priority,
        ));
    }
    out
}

/// Quote a field if it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_reports_are_newest_first() {
        let reports = recent_reports();
        assert_eq!(reports.len(), 5);
        assert_eq!(reports[0].id, "#R047");
        assert_eq!(reports[4].id, "#R043");
        assert!(reports.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[test]
    fn status_and_priority_tags() {
        assert!(ReportStatus::Active.tag().contains("orange"));
        assert!(ReportStatus::Resolved.tag().contains("green"));
        assert!(Priority::High.tag().contains("red"));
        assert!(Priority::Medium.tag().contains("yellow"));
        assert!(Priority::Low.tag().contains("blue"));
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let csv = to_csv(&recent_reports());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,type,status,date,priority");
        assert_eq!(lines[1], "#R047,Harassment,Active,2025-11-28,High");
        assert_eq!(lines[3], "#R045,Verbal Abuse,Resolved,2025-11-26,Low");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn csv_field_quotes_delimiters() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn report_serializes_category_as_type() {
        let json = serde_json::to_string(&recent_reports()[0]).unwrap();
        assert!(json.contains("\"type\":\"Harassment\""));
        assert!(json.contains("\"date\":\"2025-11-28\""));
        assert!(json.contains("\"status\":\"Active\""));
    }
}
