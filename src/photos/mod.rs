//! Per-item photo checklist for an inspection, backed by image files on disk.

mod checklist;
mod store;

pub use checklist::{expected_items, find_item, ChecklistItem, Section};
pub use store::{PhotoProgress, PhotoStore};
