//! Flight status fetcher.
//!
//! Pulls flight data from the aviationstack API, answers repeated requests
//! from a short-lived in-memory cache, and reduces the upstream records to
//! a few stable JSON shapes for export.

pub mod aviation;
pub mod cache;
pub mod config;
pub mod export;
pub mod format;
pub mod query;
