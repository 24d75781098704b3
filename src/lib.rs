//! Haven: admin dashboard for a workplace-safety incident reporting service.
//!
//! The crate fetches live analytics from the reporting API, derives the
//! display view model (stat cards and category breakdown), and serves it
//! through a CLI and an embedded web dashboard behind a login gate.

pub mod analytics;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod reports;
pub mod view;
pub mod web;
