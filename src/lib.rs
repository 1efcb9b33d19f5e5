//! Alert and reminder feed for a CRM workspace.
//!
//! The [`alerts::AlertEngine`] reads tasks, activities and contacts from
//! pluggable stores and turns them into a ranked list of overdue/due-soon
//! task reminders and contact follow-up prompts, with per-session dismissal.

pub mod alerts;
pub mod config;
pub mod error;
pub mod json_loader;
pub mod logging;
pub mod stores;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use alerts::{Alert, AlertEngine, AlertSummary, DismissalSet};
pub use config::{AlertConfig, AlertSettings};
pub use error::{AlertError, StoreError};
