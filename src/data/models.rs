//! Data models for inspections and their measurement points.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::FormError;
use crate::grid::Coordinate;

/// Stored values of an inspection keyed by coordinate
pub type PointsMap = HashMap<Coordinate, String>;

/// Whether the site has a machine room. Picks which machine checklist
/// section applies; unset sites get neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineRoom {
    #[default]
    Unset,
    Yes,
    No,
}

impl MachineRoom {
    /// Stored column value
    pub fn key(self) -> Option<&'static str> {
        match self {
            MachineRoom::Unset => None,
            MachineRoom::Yes => Some("yes"),
            MachineRoom::No => Some("no"),
        }
    }

    /// Read the stored column; anything unknown counts as unset
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(str::trim) {
            Some("yes") => MachineRoom::Yes,
            Some("no") => MachineRoom::No,
            _ => MachineRoom::Unset,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MachineRoom::Unset => "Not set",
            MachineRoom::Yes => "Yes",
            MachineRoom::No => "No",
        }
    }

    /// Next value in the form toggle cycle
    pub fn cycle(self) -> Self {
        match self {
            MachineRoom::Unset => MachineRoom::Yes,
            MachineRoom::Yes => MachineRoom::No,
            MachineRoom::No => MachineRoom::Unset,
        }
    }
}

/// A single inspection record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub id: i64,
    /// Unique display number
    pub number: i64,
    pub name: String,
    pub has_fourth_layer: bool,
    pub machine_room: MachineRoom,
    pub export_count: i64,
    pub last_image_path: Option<String>,
    pub last_exported_at: Option<DateTime<Utc>>,
}

impl Inspection {
    /// Title shown in lists and headers, e.g. "12 - Tower B"
    pub fn title(&self) -> String {
        format!("{} - {}", self.number, self.name)
    }

    /// Number of coordinates counted towards progress
    pub fn applicable_points(&self) -> usize {
        Coordinate::applicable_count(self.has_fourth_layer)
    }
}

/// An inspection together with its filled point count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionSummary {
    #[serde(flatten)]
    pub inspection: Inspection,
    pub filled: usize,
}

impl InspectionSummary {
    pub fn total(&self) -> usize {
        self.inspection.applicable_points()
    }

    pub fn is_complete(&self) -> bool {
        self.filled >= self.total()
    }
}

/// User-entered fields for creating or editing an inspection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionDraft {
    pub number: i64,
    pub name: String,
    pub has_fourth_layer: bool,
    pub machine_room: MachineRoom,
}

impl InspectionDraft {
    pub fn new(number: i64, name: impl Into<String>, has_fourth_layer: bool) -> Self {
        InspectionDraft {
            number,
            name: name.into(),
            has_fourth_layer,
            machine_room: MachineRoom::Unset,
        }
    }

    pub fn with_machine_room(mut self, machine_room: MachineRoom) -> Self {
        self.machine_room = machine_room;
        self
    }

    /// Check the fields that do not need the store. Returns the trimmed name.
    pub fn validate(&self) -> Result<&str, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName);
        }
        if self.number <= 0 {
            return Err(FormError::InvalidNumber);
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspection(has_fourth_layer: bool) -> Inspection {
        Inspection {
            id: 1,
            number: 7,
            name: "Tower B".to_string(),
            has_fourth_layer,
            machine_room: MachineRoom::Unset,
            export_count: 0,
            last_image_path: None,
            last_exported_at: None,
        }
    }

    #[test]
    fn test_title() {
        assert_eq!(inspection(false).title(), "7 - Tower B");
    }

    #[test]
    fn test_summary_completion_uses_applicable_points() {
        let summary = InspectionSummary {
            inspection: inspection(false),
            filled: 36,
        };
        assert_eq!(summary.total(), 36);
        assert!(summary.is_complete());

        let summary = InspectionSummary {
            inspection: inspection(true),
            filled: 36,
        };
        assert_eq!(summary.total(), 48);
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_draft_validation() {
        assert_eq!(
            InspectionDraft::new(1, "  ", false).validate(),
            Err(FormError::EmptyName)
        );
        assert_eq!(
            InspectionDraft::new(0, "Site", false).validate(),
            Err(FormError::InvalidNumber)
        );
        assert_eq!(InspectionDraft::new(3, " Site ", true).validate(), Ok("Site"));
    }

    #[test]
    fn test_machine_room_key_round_trip() {
        for room in [MachineRoom::Unset, MachineRoom::Yes, MachineRoom::No] {
            assert_eq!(MachineRoom::from_key(room.key()), room);
        }
        assert_eq!(MachineRoom::from_key(Some("maybe")), MachineRoom::Unset);
        assert_eq!(MachineRoom::No.cycle(), MachineRoom::Unset);
    }
}
