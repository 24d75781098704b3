/// Display-ready view models derived from an [`AnalyticsReport`].
///
/// Everything here is a pure function of the report: no I/O, no mutation of
/// the input. The dashboard recomputes the view model on every fetch and
/// never stores it.
use serde::{Serialize, Serializer};

use super::report::AnalyticsReport;

/// Placeholder shown when a numeric field is missing from the payload.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Category tags
// ---------------------------------------------------------------------------

/// Color tag for a report category.
///
/// Known categories map to a fixed tag by exact name. Any other name falls
/// through to [`CategoryTag::Neutral`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CategoryTag {
    Harassment,
    Discrimination,
    VerbalAbuse,
    Bullying,
    #[default]
    Neutral,
}

impl CategoryTag {
    /// Resolve the tag for a category name. Matching is case-sensitive.
    pub fn for_category(name: &str) -> Self {
        match name {
            "Harassment" => Self::Harassment,
            "Discrimination" => Self::Discrimination,
            "Verbal Abuse" => Self::VerbalAbuse,
            "Bullying" => Self::Bullying,
            _ => Self::Neutral,
        }
    }

    /// CSS color class used by the web dashboard.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Harassment => "bg-primary",
            Self::Discrimination => "bg-accent",
            Self::VerbalAbuse => "bg-orange-400",
            Self::Bullying => "bg-pink-400",
            Self::Neutral => "bg-muted",
        }
    }
}

impl std::fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategoryTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Category view items
// ---------------------------------------------------------------------------

/// One row of the category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryViewItem {
    pub name: String,
    pub count: u64,
    /// Share of `total_reports`, 0–100 for consistent payloads. `0.0` when
    /// the report total is zero.
    pub percentage: f64,
    pub color_tag: CategoryTag,
}

/// Derive one [`CategoryViewItem`] per category, in payload order.
///
/// Zero-count categories are kept and nothing is sorted.
pub fn derive_categories(report: &AnalyticsReport) -> Vec<CategoryViewItem> {
    report
        .category_distribution
        .iter()
        .map(|(name, count)| CategoryViewItem {
            name: name.to_string(),
            count,
            percentage: percentage_of(count, report.total_reports),
            color_tag: CategoryTag::for_category(name),
        })
        .collect()
}

/// `count` as a percentage of `total`, or `0.0` when `total` is zero.
pub fn percentage_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 * 100.0) / total as f64
    }
}

// ---------------------------------------------------------------------------
// Stat cards
// ---------------------------------------------------------------------------

/// The four fixed stat card positions, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatSlot {
    Total,
    Active,
    Resolved,
    AvgResponse,
}

impl StatSlot {
    pub const ALL: [StatSlot; 4] = [Self::Total, Self::Active, Self::Resolved, Self::AvgResponse];

    pub fn title(self) -> &'static str {
        match self {
            Self::Total => "Total Reports",
            Self::Active => "Active Cases",
            Self::Resolved => "Resolved",
            Self::AvgResponse => "Avg Response",
        }
    }

    /// Gradient classes for the card icon.
    pub fn gradient(self) -> &'static str {
        match self {
            Self::Total => "from-primary to-accent",
            Self::Active => "from-orange-400 to-red-400",
            Self::Resolved => "from-green-400 to-teal-400",
            Self::AvgResponse => "from-purple-400 to-pink-400",
        }
    }
}

/// A headline statistic card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCardViewItem {
    pub slot: StatSlot,
    pub title: String,
    pub value: String,
    pub trend: String,
    pub gradient: &'static str,
}

impl StatCardViewItem {
    fn new(slot: StatSlot, value: String, trend: String) -> Self {
        Self {
            slot,
            title: slot.title().to_string(),
            value,
            trend,
            gradient: slot.gradient(),
        }
    }
}

/// Derive the four stat cards in the order Total, Active, Resolved,
/// Avg Response. The result length never depends on field presence.
pub fn derive_stat_cards(report: &AnalyticsReport) -> [StatCardViewItem; 4] {
    StatSlot::ALL.map(|slot| stat_card(slot, report))
}

fn stat_card(slot: StatSlot, report: &AnalyticsReport) -> StatCardViewItem {
    match slot {
        StatSlot::Total => StatCardViewItem::new(
            slot,
            report.total_reports.to_string(),
            format!("{} this week", report.new_reports_this_week),
        ),
        StatSlot::Active => StatCardViewItem::new(
            slot,
            report.active_cases.to_string(),
            "Requires attention".to_string(),
        ),
        StatSlot::Resolved => StatCardViewItem::new(
            slot,
            report.resolved_cases.to_string(),
            format!("{}% resolution rate", report.resolution_rate),
        ),
        StatSlot::AvgResponse => StatCardViewItem::new(
            slot,
            report
                .avg_response_time_hours
                .map(|hours| format!("{hours}h"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            "Within SLA".to_string(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Dashboard view model
// ---------------------------------------------------------------------------

/// Everything the dashboard renders from one analytics payload.
///
/// `Default` is the empty state shown before the first fetch resolves and
/// after a failed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardViewModel {
    pub categories: Vec<CategoryViewItem>,
    pub stat_cards: Vec<StatCardViewItem>,
}

impl DashboardViewModel {
    pub fn from_report(report: &AnalyticsReport) -> Self {
        Self {
            categories: derive_categories(report),
            stat_cards: derive_stat_cards(report).to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.stat_cards.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::report::CategoryDistribution;

    fn report_with(total: u64, categories: &[(&str, u64)]) -> AnalyticsReport {
        AnalyticsReport {
            total_reports: total,
            category_distribution: categories.iter().copied().collect::<CategoryDistribution>(),
            ..AnalyticsReport::default()
        }
    }

    #[test]
    fn known_categories_map_to_fixed_tags() {
        assert_eq!(CategoryTag::for_category("Harassment"), CategoryTag::Harassment);
        assert_eq!(
            CategoryTag::for_category("Discrimination"),
            CategoryTag::Discrimination
        );
        assert_eq!(CategoryTag::for_category("Verbal Abuse"), CategoryTag::VerbalAbuse);
        assert_eq!(CategoryTag::for_category("Bullying"), CategoryTag::Bullying);
    }

    #[test]
    fn unknown_and_near_miss_names_are_neutral() {
        assert_eq!(CategoryTag::for_category("Other"), CategoryTag::Neutral);
        assert_eq!(CategoryTag::for_category("harassment"), CategoryTag::Neutral);
        assert_eq!(CategoryTag::for_category("Verbal  Abuse"), CategoryTag::Neutral);
        assert_eq!(CategoryTag::for_category(""), CategoryTag::Neutral);
    }

    #[test]
    fn tag_serializes_as_color_class() {
        let json = serde_json::to_string(&CategoryTag::VerbalAbuse).unwrap();
        assert_eq!(json, "\"bg-orange-400\"");
    }

    #[test]
    fn percentage_is_zero_for_zero_total() {
        assert_eq!(percentage_of(10, 0), 0.0);
        assert_eq!(percentage_of(0, 0), 0.0);
    }

    #[test]
    fn percentage_can_exceed_hundred_for_inconsistent_payloads() {
        assert_eq!(percentage_of(30, 20), 150.0);
    }

    #[test]
    fn zero_count_categories_are_kept() {
        let report = report_with(10, &[("Bullying", 0), ("Harassment", 10)]);
        let categories = derive_categories(&report);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].count, 0);
        assert_eq!(categories[0].percentage, 0.0);
        assert_eq!(categories[1].percentage, 100.0);
    }

    #[test]
    fn stat_card_titles_follow_slots() {
        let cards = derive_stat_cards(&AnalyticsReport::default());
        let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Total Reports", "Active Cases", "Resolved", "Avg Response"]
        );
    }

    #[test]
    fn resolution_rate_prints_without_trailing_zero() {
        let report = AnalyticsReport {
            resolution_rate: 74.0,
            ..AnalyticsReport::default()
        };
        let cards = derive_stat_cards(&report);
        assert_eq!(cards[2].trend, "74% resolution rate");

        let report = AnalyticsReport {
            resolution_rate: 74.47,
            ..AnalyticsReport::default()
        };
        assert_eq!(derive_stat_cards(&report)[2].trend, "74.47% resolution rate");
    }

    #[test]
    fn empty_view_model_is_default() {
        let model = DashboardViewModel::default();
        assert!(model.is_empty());

        let model = DashboardViewModel::from_report(&AnalyticsReport::default());
        assert!(!model.is_empty());
        assert_eq!(model.stat_cards.len(), 4);
        assert!(model.categories.is_empty());
    }
}
