//! Data layer backed by a local SQLite database.
//!
//! Holds inspections, their measurement points and process-wide settings.

mod error;
mod models;
mod storage;

pub use error::FormError;
pub use models::{Inspection, InspectionDraft, InspectionSummary, MachineRoom, PointsMap};
pub use storage::{PointStore, SettingsStore, Storage};
