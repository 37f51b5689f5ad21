//! The measurement table shared by the workbook and the image snapshot.
//!
//! One row per applicable layer, twelve value columns ordered by
//! measurement then point.

use crate::data::PointsMap;
use crate::grid::normalizer::export_display;
use crate::grid::{Axis, Coordinate, MEASUREMENTS, POINTS};

pub const CORNER_HEADER: &str = "Medición";
pub const MEASUREMENT_HEADERS: [&str; 3] = ["1° Medición", "2° Medición", "3° Medición"];
pub const POINT_HEADERS: [&str; 4] = ["1° punto", "2° punto", "3° punto", "4° punto"];

/// Value columns per row
pub const VALUE_COLUMNS: usize = (MEASUREMENTS * POINTS) as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub label: String,
    /// Values in export display form, empty when unset
    pub cells: Vec<String>,
}

pub fn table_rows(points: &PointsMap, has_fourth_layer: bool) -> Vec<TableRow> {
    Axis::Layer
        .values(has_fourth_layer)
        .map(|layer| {
            let cells = (1..=MEASUREMENTS)
                .flat_map(|m| (1..=POINTS).map(move |p| (m, p)))
                .map(|(measurement, point)| {
                    Coordinate::new(layer, measurement, point)
                        .and_then(|c| points.get(&c))
                        .map(|v| export_display(v))
                        .unwrap_or_default()
                })
                .collect();
            TableRow {
                label: format!("Manto {layer}"),
                cells,
            }
        })
        .collect()
}
