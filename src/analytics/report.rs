/// Wire types for the analytics payload served at `/api/v1/analytics/`.
///
/// The payload is a flat JSON object. `category_distribution` is a JSON
/// object whose key order is significant: it is the display order of the
/// category breakdown, so it is parsed into an order-preserving
/// [`CategoryDistribution`] instead of a hash map.
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Analytics report
// ---------------------------------------------------------------------------

/// Raw analytics response from the reporting API.
///
/// Server-side invariants such as `resolved_cases + active_cases <=
/// total_reports` are not checked here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub total_reports: u64,
    pub new_reports_this_week: u64,
    pub active_cases: u64,
    pub resolved_cases: u64,
    /// Percentage of reports resolved, may be fractional.
    pub resolution_rate: f64,
    /// Average hours to first response. Absent or `null` when the server has
    /// no data yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_response_time_hours: Option<f64>,
    #[serde(default)]
    pub category_distribution: CategoryDistribution,
}

impl AnalyticsReport {
    /// Parse a report from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// ---------------------------------------------------------------------------
// Category distribution
// ---------------------------------------------------------------------------

/// Category name → report count, in payload order.
///
/// Keys are distinct. A key repeated in the source object keeps the
/// position of its first occurrence and the value of its last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDistribution {
    entries: Vec<(String, u64)>,
}

impl CategoryDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a category count.
    pub fn insert(&mut self, name: impl Into<String>, count: u64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = count,
            None => self.entries.push((name, count)),
        }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, count)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
    }

    /// Sum of all category counts. May differ from `total_reports`.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for CategoryDistribution {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut distribution = Self::new();
        for (name, count) in iter {
            distribution.insert(name, count);
        }
        distribution
    }
}

impl Serialize for CategoryDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DistributionVisitor)
    }
}

struct DistributionVisitor;

impl<'de> Visitor<'de> for DistributionVisitor {
    type Value = CategoryDistribution;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping category names to non-negative counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut distribution = CategoryDistribution::new();
        while let Some((name, count)) = access.next_entry::<String, u64>()? {
            distribution.insert(name, count);
        }
        Ok(distribution)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
