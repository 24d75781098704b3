//! Analytics payload types, view-model derivation, and the dashboard event log.
//!
//! - [`report`]: the raw payload served by the reporting API
//! - [`view_model`]: categories and stat cards derived for display
//! - [`events`]: JSONL log of fetches and login attempts

pub mod events;
pub mod report;
pub mod view_model;

pub use report::{AnalyticsReport, CategoryDistribution};
pub use view_model::{
    CategoryTag, CategoryViewItem, DashboardViewModel, StatCardViewItem, StatSlot,
    derive_categories, derive_stat_cards,
};
