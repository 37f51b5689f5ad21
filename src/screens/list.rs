//! Inspection list: selection, search filter and per-row actions.

use crossterm::event::KeyCode;

use crate::data::InspectionSummary;
use crate::dialog::{ConfirmAction, Dialogs};
use crate::search::filter_inspections;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    None,
    Open(i64),
    New,
    Edit(i64),
    Photos(i64),
    Export(i64),
    Settings,
    Refresh,
    Quit,
}

#[derive(Debug, Default)]
pub struct ListScreen {
    summaries: Vec<InspectionSummary>,
    /// Indices into `summaries` matching the query
    visible: Vec<usize>,
    /// Index into `visible`
    selected: usize,
    query: String,
    searching: bool,
}

impl ListScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list contents, keeping the selection on the same
    /// inspection when it is still visible
    pub fn set_summaries(&mut self, summaries: Vec<InspectionSummary>) {
        let selected_id = self.selected_summary().map(|s| s.inspection.id);
        self.summaries = summaries;
        self.refilter();
        if let Some(id) = selected_id {
            if let Some(pos) = self
                .visible
                .iter()
                .position(|&i| self.summaries[i].inspection.id == id)
            {
                self.selected = pos;
            }
        }
    }

    fn refilter(&mut self) {
        self.visible = filter_inspections(&self.summaries, &self.query);
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &InspectionSummary> {
        self.visible.iter().map(|&i| &self.summaries[i])
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_summary(&self) -> Option<&InspectionSummary> {
        self.visible.get(self.selected).map(|&i| &self.summaries[i])
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// "Showing n of m" while a query is active
    pub fn filter_label(&self) -> Option<String> {
        (!self.query.trim().is_empty())
            .then(|| format!("Showing {} of {}", self.visible.len(), self.summaries.len()))
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected = 0;
        self.refilter();
    }

    fn select_next(&mut self) {
        if !self.visible.is_empty() {
            self.selected = (self.selected + 1) % self.visible.len();
        }
    }

    fn select_prev(&mut self) {
        if !self.visible.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.visible.len() - 1);
        }
    }

    fn handle_search_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.searching = false;
                self.set_query("");
            }
            KeyCode::Enter => self.searching = false,
            KeyCode::Backspace => {
                let mut query = self.query.clone();
                query.pop();
                self.set_query(query);
            }
            KeyCode::Char(c) => {
                let query = format!("{}{c}", self.query);
                self.set_query(query);
            }
            KeyCode::Down => self.select_next(),
            KeyCode::Up => self.select_prev(),
            _ => {}
        }
    }

    /// Handle a key. Deletion and refused exports are routed through `dialogs`.
    pub fn handle_key(&mut self, key: KeyCode, dialogs: &mut Dialogs) -> ListAction {
        if self.searching {
            self.handle_search_key(key);
            return ListAction::None;
        }

        let selected = self.selected_summary().cloned();
        match key {
            KeyCode::Char('q') => ListAction::Quit,
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                ListAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                ListAction::None
            }
            KeyCode::Char('/') => {
                self.searching = true;
                ListAction::None
            }
            KeyCode::Esc if !self.query.is_empty() => {
                self.set_query("");
                ListAction::None
            }
            KeyCode::Char('n') => ListAction::New,
            KeyCode::Char('c') => ListAction::Settings,
            KeyCode::Char('r') => ListAction::Refresh,
            KeyCode::Enter | KeyCode::Char('l') => selected
                .map(|s| ListAction::Open(s.inspection.id))
                .unwrap_or(ListAction::None),
            KeyCode::Char('e') => selected
                .map(|s| ListAction::Edit(s.inspection.id))
                .unwrap_or(ListAction::None),
            KeyCode::Char('p') => selected
                .map(|s| ListAction::Photos(s.inspection.id))
                .unwrap_or(ListAction::None),
            KeyCode::Char('d') => {
                if let Some(s) = selected {
                    dialogs.confirm(
                        "Delete inspection",
                        format!("Delete {}?", s.inspection.title()),
                        ConfirmAction::DeleteInspection(s.inspection.id),
                    );
                }
                ListAction::None
            }
            KeyCode::Char('x') => match selected {
                Some(s) if s.is_complete() => ListAction::Export(s.inspection.id),
                Some(s) => {
                    dialogs.alert(
                        "Incomplete inspection",
                        format!(
                            "{} has {} of {} points. Fill every point before exporting.",
                            s.inspection.title(),
                            s.filled,
                            s.total()
                        ),
                    );
                    ListAction::None
                }
                None => ListAction::None,
            },
            _ => ListAction::None,
        }
    }
}
