//! Completion aggregation over an inspection's grid.

use super::coords::{Axis, AxisOrder, Coordinate};
use super::normalizer::is_filled;
use crate::data::PointsMap;

/// Filled/total counts for one group of cells sharing an axis value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupProgress {
    pub axis: Axis,
    pub value: u8,
    pub filled: usize,
    pub total: usize,
}

impl GroupProgress {
    pub fn is_complete(&self) -> bool {
        self.filled == self.total
    }
}

/// Progress of a whole inspection, grouped by the configured tab axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridProgress {
    pub filled: usize,
    pub total: usize,
    pub groups: Vec<GroupProgress>,
}

impl GridProgress {
    /// Reduce the stored values of an inspection. Coordinates outside the
    /// applicable set are ignored even when they hold values.
    pub fn compute(points: &PointsMap, has_fourth_layer: bool, order: AxisOrder) -> Self {
        let tab = order.tab();
        let groups = tab
            .values(has_fourth_layer)
            .map(|value| count_group(points, has_fourth_layer, &[(tab, value)]))
            .collect();

        let total = Coordinate::applicable_count(has_fourth_layer);
        let filled = Coordinate::applicable(has_fourth_layer)
            .filter(|c| is_filled(points.get(c).map(String::as_str)))
            .count();

        GridProgress {
            filled,
            total,
            groups,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.filled == self.total
    }

    /// Progress of one tab group, if the value exists
    pub fn group(&self, value: u8) -> Option<&GroupProgress> {
        self.groups.iter().find(|g| g.value == value)
    }
}

/// Progress of the blocks (second axis) inside one tab (first axis value)
pub fn block_progress(
    points: &PointsMap,
    has_fourth_layer: bool,
    order: AxisOrder,
    tab_value: u8,
) -> Vec<GroupProgress> {
    let block = order.block();
    block
        .values(has_fourth_layer)
        .map(|value| {
            count_group(
                points,
                has_fourth_layer,
                &[(order.tab(), tab_value), (block, value)],
            )
        })
        .collect()
}

/// Count the applicable cells matching every (axis, value) filter. The
/// reported axis/value are those of the last filter.
fn count_group(
    points: &PointsMap,
    has_fourth_layer: bool,
    filters: &[(Axis, u8)],
) -> GroupProgress {
    let (axis, value) = *filters.last().unwrap_or(&(Axis::Layer, 0));
    let mut filled = 0;
    let mut total = 0;
    for coord in Coordinate::applicable(has_fourth_layer)
        .filter(|c| filters.iter().all(|&(a, v)| c.get(a) == v))
    {
        total += 1;
        if is_filled(points.get(&coord).map(String::as_str)) {
            filled += 1;
        }
    }
    GroupProgress {
        axis,
        value,
        filled,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_where(pred: impl Fn(Coordinate) -> bool) -> PointsMap {
        Coordinate::all()
            .map(|c| (c, if pred(c) { "5,0".to_string() } else { String::new() }))
            .collect()
    }

    #[test]
    fn test_empty_grid() {
        let points = filled_where(|_| false);
        let progress = GridProgress::compute(&points, true, AxisOrder::default());
        assert_eq!(progress.filled, 0);
        assert_eq!(progress.total, 48);
        assert!(!progress.is_complete());
        assert_eq!(progress.groups.len(), 3);
        assert!(progress.groups.iter().all(|g| !g.is_complete()));
    }

    #[test]
    fn test_three_layers_complete_ignores_fourth() {
        let points = filled_where(|c| c.layer <= 3);
        let progress = GridProgress::compute(&points, false, AxisOrder::default());
        assert_eq!(progress.filled, 36);
        assert_eq!(progress.total, 36);
        assert!(progress.is_complete());
    }

    #[test]
    fn test_fourth_layer_values_excluded_without_flag() {
        let points = filled_where(|c| c.layer == 4);
        let progress = GridProgress::compute(&points, false, AxisOrder::default());
        assert_eq!(progress.filled, 0);
        assert_eq!(progress.total, 36);

        let with_flag = GridProgress::compute(&points, true, AxisOrder::default());
        assert_eq!(with_flag.filled, 12);
        assert_eq!(with_flag.total, 48);
        assert!(!with_flag.is_complete());
    }

    #[test]
    fn test_missing_rows_count_as_unfilled() {
        let points = PointsMap::new();
        let progress = GridProgress::compute(&points, false, AxisOrder::default());
        assert_eq!(progress.filled, 0);
        assert_eq!(progress.total, 36);
    }

    #[test]
    fn test_whitespace_is_not_filled() {
        let mut points = filled_where(|_| false);
        points.insert(Coordinate::new(1, 1, 1).unwrap(), "  ".to_string());
        let progress = GridProgress::compute(&points, true, AxisOrder::default());
        assert_eq!(progress.filled, 0);
    }

    #[test]
    fn test_groups_follow_tab_axis_with_layers() {
        let order = AxisOrder::parse("mantos,mediciones,puntos").unwrap();
        let points = filled_where(|c| c.layer == 2);

        let progress = GridProgress::compute(&points, false, order);
        assert_eq!(progress.groups.len(), 3);
        assert!(progress.groups.iter().all(|g| g.axis == Axis::Layer));
        assert!(progress.group(2).unwrap().is_complete());
        assert!(!progress.group(1).unwrap().is_complete());
        assert_eq!(progress.group(2).unwrap().total, 12);
        assert!(progress.group(4).is_none());

        let with_flag = GridProgress::compute(&points, true, order);
        assert_eq!(with_flag.groups.len(), 4);
    }

    #[test]
    fn test_groups_follow_tab_axis_with_measurements() {
        let order = AxisOrder::default();
        // Measurement 1 filled on layers 1-3, layer 4 left empty
        let points = filled_where(|c| c.measurement == 1 && c.layer <= 3);

        let without = GridProgress::compute(&points, false, order);
        let group = without.group(1).unwrap();
        assert_eq!(group.axis, Axis::Measurement);
        assert_eq!(group.total, 12);
        assert!(group.is_complete());

        let with = GridProgress::compute(&points, true, order);
        let group = with.group(1).unwrap();
        assert_eq!(group.total, 16);
        assert!(!group.is_complete());
    }

    #[test]
    fn test_groups_follow_tab_axis_with_points() {
        let order = AxisOrder::parse("puntos,mantos,mediciones").unwrap();
        let points = filled_where(|c| c.point == 4);
        let progress = GridProgress::compute(&points, true, order);
        assert_eq!(progress.groups.len(), 4);
        assert!(progress.group(4).unwrap().is_complete());
        assert_eq!(progress.group(4).unwrap().total, 12);
        assert!(!progress.group(3).unwrap().is_complete());
    }

    #[test]
    fn test_block_progress() {
        let order = AxisOrder::default();
        let points = filled_where(|c| c.measurement == 2 && c.layer == 1);
        let blocks = block_progress(&points, false, order, 2);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].axis, Axis::Layer);
        assert_eq!(blocks[0].value, 1);
        assert_eq!(blocks[0].total, 4);
        assert!(blocks[0].is_complete());
        assert!(!blocks[1].is_complete());
    }
}
