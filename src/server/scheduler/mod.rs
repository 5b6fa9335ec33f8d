//! Cron jobs for background maintenance.

pub mod editor_eviction;
