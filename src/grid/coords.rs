//! Grid coordinates and the configurable display order of the three axes.

use std::fmt;
use std::ops::RangeInclusive;

/// Number of layers when the fourth layer applies
pub const LAYERS: u8 = 4;
/// Measurement passes per layer
pub const MEASUREMENTS: u8 = 3;
/// Sampled positions per measurement pass
pub const POINTS: u8 = 4;

/// Settings key under which the axis order is persisted
pub const AXIS_ORDER_KEY: &str = "estructura_inspeccion";

/// One of the three axes of the measurement grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Layer,
    Measurement,
    Point,
}

impl Axis {
    /// Key used in the persisted order setting
    pub fn key(self) -> &'static str {
        match self {
            Axis::Layer => "mantos",
            Axis::Measurement => "mediciones",
            Axis::Point => "puntos",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "mantos" => Some(Axis::Layer),
            "mediciones" => Some(Axis::Measurement),
            "puntos" => Some(Axis::Point),
            _ => None,
        }
    }

    /// Singular label for a single group on this axis
    pub fn label(self) -> &'static str {
        match self {
            Axis::Layer => "Layer",
            Axis::Measurement => "Measurement",
            Axis::Point => "Point",
        }
    }

    /// Plural label used by the settings screen
    pub fn plural_label(self) -> &'static str {
        match self {
            Axis::Layer => "Layers",
            Axis::Measurement => "Measurements",
            Axis::Point => "Points",
        }
    }

    /// Values this axis takes, honoring whether the fourth layer applies
    pub fn values(self, has_fourth_layer: bool) -> RangeInclusive<u8> {
        match self {
            Axis::Layer if has_fourth_layer => 1..=LAYERS,
            Axis::Layer => 1..=LAYERS - 1,
            Axis::Measurement => 1..=MEASUREMENTS,
            Axis::Point => 1..=POINTS,
        }
    }
}

/// Display order of the axes: the first groups tabs, the second groups
/// blocks inside a tab and the third enumerates rows inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisOrder([Axis; 3]);

impl Default for AxisOrder {
    fn default() -> Self {
        AxisOrder([Axis::Measurement, Axis::Layer, Axis::Point])
    }
}

impl AxisOrder {
    /// Build an order from three axes. Returns None unless all three are distinct.
    pub fn new(axes: [Axis; 3]) -> Option<Self> {
        let [a, b, c] = axes;
        if a == b || b == c || a == c {
            return None;
        }
        Some(AxisOrder(axes))
    }

    /// Parse the persisted comma-separated form, e.g. `mediciones,mantos,puntos`
    pub fn parse(value: &str) -> Option<Self> {
        let axes: Vec<Axis> = value
            .split(',')
            .map(Axis::from_key)
            .collect::<Option<Vec<_>>>()?;
        let axes: [Axis; 3] = axes.try_into().ok()?;
        Self::new(axes)
    }

    /// Parse a stored value, falling back to the default order when malformed
    pub fn from_setting(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            tracing::warn!(value, "invalid axis order setting, using default");
            Self::default()
        })
    }

    /// Persisted comma-separated form
    pub fn to_setting(self) -> String {
        self.0.map(Axis::key).join(",")
    }

    pub fn axes(self) -> [Axis; 3] {
        self.0
    }

    /// Axis used for tabs
    pub fn tab(self) -> Axis {
        self.0[0]
    }

    /// Axis used for blocks inside a tab
    pub fn block(self) -> Axis {
        self.0[1]
    }

    /// Axis used for rows inside a block
    pub fn row(self) -> Axis {
        self.0[2]
    }

    /// Swap the axes at positions `a` and `b`. Out of range positions are ignored.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a < 3 && b < 3 {
            self.0.swap(a, b);
        }
    }
}

/// Position of a single cell in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub layer: u8,
    pub measurement: u8,
    pub point: u8,
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside the grid
    pub fn new(layer: u8, measurement: u8, point: u8) -> Option<Self> {
        let valid = (1..=LAYERS).contains(&layer)
            && (1..=MEASUREMENTS).contains(&measurement)
            && (1..=POINTS).contains(&point);
        valid.then_some(Coordinate {
            layer,
            measurement,
            point,
        })
    }

    /// Build a coordinate from its (tab, block, row) values under an axis order
    pub fn from_ordered(order: AxisOrder, values: [u8; 3]) -> Option<Self> {
        let mut layer = 0;
        let mut measurement = 0;
        let mut point = 0;
        for (axis, value) in order.axes().into_iter().zip(values) {
            match axis {
                Axis::Layer => layer = value,
                Axis::Measurement => measurement = value,
                Axis::Point => point = value,
            }
        }
        Self::new(layer, measurement, point)
    }

    /// Every coordinate of the full 48-cell grid, in layer/measurement/point order
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (1..=LAYERS).flat_map(|layer| {
            (1..=MEASUREMENTS).flat_map(move |measurement| {
                (1..=POINTS).map(move |point| Coordinate {
                    layer,
                    measurement,
                    point,
                })
            })
        })
    }

    /// Coordinates that count towards progress: all 48, or the 36 with layer < 4
    pub fn applicable(has_fourth_layer: bool) -> impl Iterator<Item = Coordinate> {
        Self::all().filter(move |c| c.is_applicable(has_fourth_layer))
    }

    /// Number of applicable coordinates
    pub fn applicable_count(has_fourth_layer: bool) -> usize {
        Self::applicable(has_fourth_layer).count()
    }

    pub fn is_applicable(self, has_fourth_layer: bool) -> bool {
        has_fourth_layer || self.layer < LAYERS
    }

    /// Value of this coordinate on the given axis
    pub fn get(self, axis: Axis) -> u8 {
        match axis {
            Axis::Layer => self.layer,
            Axis::Measurement => self.measurement,
            Axis::Point => self.point,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.layer, self.measurement, self.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_sizes() {
        assert_eq!(Coordinate::all().count(), 48);
        assert_eq!(Coordinate::applicable_count(true), 48);
        assert_eq!(Coordinate::applicable_count(false), 36);
        assert!(Coordinate::applicable(false).all(|c| c.layer < 4));
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(Coordinate::new(1, 1, 1).is_some());
        assert!(Coordinate::new(4, 3, 4).is_some());
        assert!(Coordinate::new(0, 1, 1).is_none());
        assert!(Coordinate::new(5, 1, 1).is_none());
        assert!(Coordinate::new(1, 4, 1).is_none());
        assert!(Coordinate::new(1, 1, 5).is_none());
    }

    #[test]
    fn test_axis_order_parse() {
        let order = AxisOrder::parse("mantos,puntos,mediciones").unwrap();
        assert_eq!(order.tab(), Axis::Layer);
        assert_eq!(order.block(), Axis::Point);
        assert_eq!(order.row(), Axis::Measurement);
        assert_eq!(order.to_setting(), "mantos,puntos,mediciones");
    }

    #[test]
    fn test_axis_order_rejects_malformed() {
        assert!(AxisOrder::parse("mantos,mantos,puntos").is_none());
        assert!(AxisOrder::parse("mantos,puntos").is_none());
        assert!(AxisOrder::parse("mantos,puntos,mediciones,mantos").is_none());
        assert!(AxisOrder::parse("floors,puntos,mediciones").is_none());
        assert_eq!(AxisOrder::from_setting(""), AxisOrder::default());
        assert_eq!(
            AxisOrder::default().to_setting(),
            "mediciones,mantos,puntos"
        );
    }

    #[test]
    fn test_from_ordered_maps_values_to_axes() {
        let order = AxisOrder::parse("puntos,mantos,mediciones").unwrap();
        let c = Coordinate::from_ordered(order, [4, 2, 3]).unwrap();
        assert_eq!(c, Coordinate::new(2, 3, 4).unwrap());
        assert_eq!(c.get(Axis::Point), 4);
        assert_eq!(c.to_string(), "2-3-4");
    }

    #[test]
    fn test_layer_values_follow_fourth_layer_flag() {
        assert_eq!(Axis::Layer.values(false).count(), 3);
        assert_eq!(Axis::Layer.values(true).count(), 4);
        assert_eq!(Axis::Point.values(false).count(), 4);
    }
}
