//! Alert and reminder feed.
//!
//! Derives overdue/due-soon task reminders and contact follow-up prompts from
//! the current records, filters out what the user dismissed and ranks the
//! rest by urgency.

pub mod detectors;
pub mod dismissals;
pub mod engine;
pub mod model;
pub mod summary;

pub use dismissals::DismissalSet;
pub use engine::{derive_alerts, AlertEngine, Clock, FixedClock, SystemClock};
pub use model::{
    Alert, AlertAction, AlertActionType, AlertId, AlertKind, AlertPriority, AlertType,
    DismissalKey,
};
pub use summary::AlertSummary;
