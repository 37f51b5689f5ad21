//! Measurement grid editor.
//!
//! Cells are laid out by the configured axis order: one tab per value of the
//! first axis, one block per value of the second, one row per value of the
//! third. Every keystroke runs through the normalizer, updates the shown
//! value and enqueues the canonical form; leaving a cell canonicalizes what
//! is shown.

use crossterm::event::KeyCode;

use crate::data::{Inspection, PointStore, PointsMap};
use crate::grid::normalizer::{accept, canonicalize};
use crate::grid::{
    block_progress, AxisOrder, CellWriteQueue, Coordinate, FlushReport, GridProgress,
    GroupProgress,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAction {
    None,
    Back,
}

#[derive(Debug)]
pub struct GridScreen {
    inspection: Inspection,
    order: AxisOrder,
    values: PointsMap,
    queue: CellWriteQueue,
    tab: usize,
    block: usize,
    row: usize,
}

impl GridScreen {
    pub fn new(inspection: Inspection, mut stored: PointsMap, order: AxisOrder) -> Self {
        // Unset cells hold "" so blurring an untouched cell is not a write
        for coord in Coordinate::all() {
            stored.entry(coord).or_default();
        }
        let queue = CellWriteQueue::seeded(inspection.id, &stored);
        GridScreen {
            inspection,
            order,
            values: stored,
            queue,
            tab: 0,
            block: 0,
            row: 0,
        }
    }

    pub fn inspection(&self) -> &Inspection {
        &self.inspection
    }

    pub fn order(&self) -> AxisOrder {
        self.order
    }

    fn flag(&self) -> bool {
        self.inspection.has_fourth_layer
    }

    pub fn tab_values(&self) -> Vec<u8> {
        self.order.tab().values(self.flag()).collect()
    }

    pub fn block_values(&self) -> Vec<u8> {
        self.order.block().values(self.flag()).collect()
    }

    pub fn row_values(&self) -> Vec<u8> {
        self.order.row().values(self.flag()).collect()
    }

    /// Index of the active tab
    pub fn tab(&self) -> usize {
        self.tab
    }

    /// (block, row) indices of the cursor inside the active tab
    pub fn cursor(&self) -> (usize, usize) {
        (self.block, self.row)
    }

    fn tab_value(&self) -> u8 {
        self.tab_values().get(self.tab).copied().unwrap_or(1)
    }

    /// Coordinate at (block, row) indices of the active tab
    pub fn coordinate_at(&self, block: usize, row: usize) -> Option<Coordinate> {
        let block = *self.block_values().get(block)?;
        let row = *self.row_values().get(row)?;
        Coordinate::from_ordered(self.order, [self.tab_value(), block, row])
    }

    pub fn selected(&self) -> Option<Coordinate> {
        self.coordinate_at(self.block, self.row)
    }

    /// Value shown in a cell
    pub fn value(&self, coord: Coordinate) -> &str {
        self.values.get(&coord).map(String::as_str).unwrap_or("")
    }

    pub fn progress(&self) -> GridProgress {
        GridProgress::compute(&self.values, self.flag(), self.order)
    }

    /// Completion of each block in the active tab
    pub fn blocks(&self) -> Vec<GroupProgress> {
        block_progress(&self.values, self.flag(), self.order, self.tab_value())
    }

    /// Writes waiting for the next flush
    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    /// Run the raw buffer of the selected cell through the normalizer
    fn edit(&mut self, raw: impl FnOnce(&str) -> String) {
        let Some(coord) = self.selected() else {
            return;
        };
        let previous = self.value(coord).to_string();
        let next = accept(&previous, &raw(&previous));
        if next != previous {
            self.queue.enqueue(coord, &next);
            self.values.insert(coord, next);
        }
    }

    /// Canonicalize the selected cell when the cursor leaves it
    fn blur(&mut self) {
        let Some(coord) = self.selected() else {
            return;
        };
        let canonical = canonicalize(self.value(coord));
        self.queue.enqueue(coord, &canonical);
        self.values.insert(coord, canonical);
    }

    fn move_to(&mut self, tab: usize, block: usize, row: usize) {
        self.blur();
        self.tab = tab;
        self.block = block;
        self.row = row;
    }

    /// Next cell in reading order, continuing into the next tab
    fn next_cell(&mut self) {
        let rows = self.row_values().len();
        let blocks = self.block_values().len();
        let tabs = self.tab_values().len();
        if self.row + 1 < rows {
            self.move_to(self.tab, self.block, self.row + 1);
        } else if self.block + 1 < blocks {
            self.move_to(self.tab, self.block + 1, 0);
        } else if self.tab + 1 < tabs {
            self.move_to(self.tab + 1, 0, 0);
        } else {
            self.blur();
        }
    }

    fn prev_cell(&mut self) {
        let rows = self.row_values().len();
        if self.row > 0 {
            self.move_to(self.tab, self.block, self.row - 1);
        } else if self.block > 0 {
            self.move_to(self.tab, self.block - 1, rows.saturating_sub(1));
        }
    }

    fn switch_tab(&mut self, forward: bool) {
        let tabs = self.tab_values().len();
        let tab = if forward {
            (self.tab + 1) % tabs
        } else {
            self.tab.checked_sub(1).unwrap_or(tabs - 1)
        };
        self.move_to(tab, 0, 0);
    }

    pub fn handle_key(&mut self, key: KeyCode) -> GridAction {
        match key {
            KeyCode::Esc => {
                self.blur();
                return GridAction::Back;
            }
            KeyCode::Enter | KeyCode::Down | KeyCode::Tab => self.next_cell(),
            KeyCode::Up | KeyCode::BackTab => self.prev_cell(),
            KeyCode::Right => {
                if self.block + 1 < self.block_values().len() {
                    self.move_to(self.tab, self.block + 1, self.row);
                }
            }
            KeyCode::Left => {
                if self.block > 0 {
                    self.move_to(self.tab, self.block - 1, self.row);
                }
            }
            KeyCode::PageDown | KeyCode::Char(']') => self.switch_tab(true),
            KeyCode::PageUp | KeyCode::Char('[') => self.switch_tab(false),
            KeyCode::Backspace => self.edit(|prev| {
                let mut raw = prev.to_string();
                raw.pop();
                raw
            }),
            KeyCode::Delete => self.edit(|_| String::new()),
            KeyCode::Char(c) => self.edit(|prev| format!("{prev}{c}")),
            _ => {}
        }
        GridAction::None
    }

    /// Persist queued edits. Cells whose write failed show the stored value
    /// again.
    pub fn flush<S: PointStore + ?Sized>(&mut self, store: &S) -> FlushReport {
        let report = self.queue.flush(store);
        for &coord in &report.failed_cells {
            match store.get_point_value(self.inspection.id, coord) {
                Ok(stored) => {
                    let stored = stored.unwrap_or_default();
                    self.queue.reseed(coord, &stored);
                    self.values.insert(coord, stored);
                }
                Err(e) => tracing::warn!(%coord, "failed to re-read point: {e:#}"),
            }
        }
        report
    }
}
