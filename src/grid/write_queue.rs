//! Per-cell ordered persistence of grid edits.
//!
//! Edits are enqueued as they are accepted and applied to the store in
//! enqueue order when the queue is flushed. Within a cell that order is
//! strict; a failed write is logged and dropped and later writes still run.
//! An edit whose canonical value equals the last one enqueued for the same
//! cell is skipped. Cells are independent of each other. After a failed
//! write the caller re-reads the cell and [`CellWriteQueue::reseed`]s it, so
//! retyping the rejected value is not mistaken for a repeat.

use std::collections::{HashMap, VecDeque};

use super::coords::Coordinate;
use super::normalizer::canonicalize;
use crate::data::{PointStore, PointsMap};

/// Outcome of a flush
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub applied: usize,
    pub failed: usize,
    /// Cells with at least one failed write, in first-failure order
    pub failed_cells: Vec<Coordinate>,
}

#[derive(Debug)]
pub struct CellWriteQueue {
    inspection_id: i64,
    last_enqueued: HashMap<Coordinate, String>,
    pending: VecDeque<(Coordinate, String)>,
}

impl CellWriteQueue {
    pub fn new(inspection_id: i64) -> Self {
        CellWriteQueue {
            inspection_id,
            last_enqueued: HashMap::new(),
            pending: VecDeque::new(),
        }
    }

    /// Create a queue that already knows the stored values, so re-committing
    /// an unchanged cell does not reach the store
    pub fn seeded(inspection_id: i64, stored: &PointsMap) -> Self {
        let mut queue = Self::new(inspection_id);
        queue.last_enqueued = stored
            .iter()
            .map(|(coord, value)| (*coord, canonicalize(value)))
            .collect();
        queue
    }

    /// Enqueue the canonical form of `value` for `coord`. Returns false when
    /// the write was suppressed as a repeat of the last enqueued value.
    pub fn enqueue(&mut self, coord: Coordinate, value: &str) -> bool {
        let canonical = canonicalize(value);
        if self.last_enqueued.get(&coord) == Some(&canonical) {
            tracing::debug!(%coord, value = %canonical, "skipping unchanged write");
            return false;
        }
        self.last_enqueued.insert(coord, canonical.clone());
        self.pending.push_back((coord, canonical));
        true
    }

    /// Reset the repeat check of `coord` to the value the store holds
    pub fn reseed(&mut self, coord: Coordinate, stored: &str) {
        self.last_enqueued.insert(coord, canonicalize(stored));
    }

    /// Number of writes waiting to be applied
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Apply every pending write in order. Failures are logged and discarded.
    pub fn flush<S: PointStore + ?Sized>(&mut self, store: &S) -> FlushReport {
        let mut report = FlushReport::default();
        while let Some((coord, value)) = self.pending.pop_front() {
            match store.set_point_value(self.inspection_id, coord, &value) {
                Ok(()) => {
                    tracing::debug!(inspection = self.inspection_id, %coord, %value, "point saved");
                    report.applied += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        inspection = self.inspection_id,
                        %coord,
                        %value,
                        "failed to save point: {e:#}"
                    );
                    report.failed += 1;
                    if !report.failed_cells.contains(&coord) {
                        report.failed_cells.push(coord);
                    }
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anyhow::{bail, Result};

    use super::*;

    /// Store that records writes and can be told to fail some values
    #[derive(Default)]
    struct RecordingStore {
        writes: RefCell<Vec<(i64, Coordinate, String)>>,
        fail_value: Option<String>,
    }

    impl PointStore for RecordingStore {
        fn get_point_value(&self, _id: i64, coord: Coordinate) -> Result<Option<String>> {
            Ok(self
                .writes
                .borrow()
                .iter()
                .rev()
                .find(|(_, c, _)| *c == coord)
                .map(|(_, _, v)| v.clone()))
        }

        fn set_point_value(&self, id: i64, coord: Coordinate, value: &str) -> Result<()> {
            if self.fail_value.as_deref() == Some(value) {
                bail!("disk full");
            }
            self.writes.borrow_mut().push((id, coord, value.to_string()));
            Ok(())
        }

        fn list_points(&self, _id: i64) -> Result<Vec<(Coordinate, Option<String>)>> {
            Ok(Vec::new())
        }
    }

    fn cell(l: u8, m: u8, p: u8) -> Coordinate {
        Coordinate::new(l, m, p).unwrap()
    }

    #[test]
    fn test_canonical_repeat_is_suppressed() {
        let store = RecordingStore::default();
        let mut queue = CellWriteQueue::new(1);
        let c = cell(1, 1, 1);

        assert!(queue.enqueue(c, "7,"));
        assert!(!queue.enqueue(c, "7,0"));
        assert!(queue.enqueue(c, "7,5"));

        let report = queue.flush(&store);
        assert_eq!(report.applied, 2);
        assert_eq!(report.failed, 0);
        let writes = store.writes.borrow();
        assert_eq!(
            *writes,
            vec![(1, c, "7,0".to_string()), (1, c, "7,5".to_string())]
        );
    }

    #[test]
    fn test_writes_apply_in_enqueue_order() {
        let store = RecordingStore::default();
        let mut queue = CellWriteQueue::new(3);
        let a = cell(1, 1, 1);
        let b = cell(2, 3, 4);

        queue.enqueue(a, "1");
        queue.enqueue(b, "2");
        queue.enqueue(a, "3");
        queue.enqueue(a, "");
        assert_eq!(queue.pending(), 4);
        queue.flush(&store);

        let values: Vec<_> = store
            .writes
            .borrow()
            .iter()
            .map(|(_, c, v)| (*c, v.clone()))
            .collect();
        assert_eq!(
            values,
            vec![
                (a, "1".to_string()),
                (b, "2".to_string()),
                (a, "3".to_string()),
                (a, String::new()),
            ]
        );
        assert_eq!(store.get_point_value(3, a).unwrap(), Some(String::new()));
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_failed_write_does_not_block_later_writes() {
        let store = RecordingStore {
            fail_value: Some("4,0".to_string()),
            ..Default::default()
        };
        let mut queue = CellWriteQueue::new(1);
        let c = cell(1, 2, 3);

        queue.enqueue(c, "4,");
        queue.enqueue(c, "4,5");
        let report = queue.flush(&store);

        assert_eq!(report.applied, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failed_cells, vec![c]);
        assert_eq!(store.writes.borrow().len(), 1);
        assert_eq!(store.writes.borrow()[0].2, "4,5");
    }

    #[test]
    fn test_reseed_after_failure_allows_retry() {
        let store = RecordingStore {
            fail_value: Some("9,0".to_string()),
            ..Default::default()
        };
        let mut queue = CellWriteQueue::new(1);
        let c = cell(2, 2, 2);

        queue.enqueue(c, "9");
        assert_eq!(queue.flush(&store).failed_cells, vec![c]);
        assert!(!queue.enqueue(c, "9"));

        queue.reseed(c, "");
        assert!(queue.enqueue(c, "9"));
    }

    #[test]
    fn test_suppression_is_per_cell() {
        let mut queue = CellWriteQueue::new(1);
        assert!(queue.enqueue(cell(1, 1, 1), "5"));
        assert!(queue.enqueue(cell(1, 1, 2), "5"));
        assert!(!queue.enqueue(cell(1, 1, 1), " 5 "));
    }

    #[test]
    fn test_seeded_queue_skips_stored_values() {
        let mut stored = PointsMap::new();
        stored.insert(cell(1, 1, 1), "6,5".to_string());
        stored.insert(cell(1, 1, 2), String::new());
        let mut queue = CellWriteQueue::seeded(9, &stored);

        assert!(!queue.enqueue(cell(1, 1, 1), "6,5"));
        assert!(!queue.enqueue(cell(1, 1, 2), ""));
        assert!(queue.enqueue(cell(1, 1, 2), "1"));
    }
}
