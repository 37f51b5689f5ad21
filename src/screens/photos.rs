//! Photo checklist of one inspection: a tab per section, a row per item.
//!
//! Attaching takes a path typed at the bottom of the screen; the file is
//! copied in by `App` through the photo store.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyCode;

use crate::data::Inspection;
use crate::dialog::{ConfirmAction, Dialogs};
use crate::photos::{expected_items, ChecklistItem, PhotoProgress, PhotoStore, Section};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotosAction {
    None,
    Back,
    Attach { item: u32, path: PathBuf },
}

#[derive(Debug)]
pub struct PhotosScreen {
    inspection: Inspection,
    sections: Vec<Section>,
    tab: usize,
    selected: usize,
    counts: HashMap<u32, usize>,
    progress: PhotoProgress,
    /// Path being typed for an attachment
    input: Option<String>,
}

impl PhotosScreen {
    pub fn new(inspection: Inspection) -> Self {
        let sections = Section::for_machine_room(inspection.machine_room);
        PhotosScreen {
            inspection,
            sections,
            tab: 0,
            selected: 0,
            counts: HashMap::new(),
            progress: PhotoProgress::default(),
            input: None,
        }
    }

    /// Re-read photo counts and progress from disk
    pub fn refresh(&mut self, store: &PhotoStore) -> Result<()> {
        self.counts = store.counts(&self.inspection)?;
        let expected = expected_items(self.inspection.machine_room);
        self.progress = store.progress(&self.inspection, &expected)?;
        Ok(())
    }

    pub fn inspection(&self) -> &Inspection {
        &self.inspection
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn tab(&self) -> usize {
        self.tab
    }

    pub fn section(&self) -> Section {
        self.sections
            .get(self.tab)
            .copied()
            .unwrap_or(Section::GeneralSeals)
    }

    pub fn items(&self) -> Vec<&'static ChecklistItem> {
        self.section().items().collect()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&'static ChecklistItem> {
        self.items().get(self.selected).copied()
    }

    pub fn count(&self, item_id: u32) -> usize {
        self.counts.get(&item_id).copied().unwrap_or(0)
    }

    /// Every item of the section has at least one photo
    pub fn section_complete(&self, section: Section) -> bool {
        section.items().all(|item| self.count(item.id) > 0)
    }

    pub fn progress(&self) -> PhotoProgress {
        self.progress
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn is_typing(&self) -> bool {
        self.input.is_some()
    }

    fn switch_tab(&mut self, forward: bool) {
        let tabs = self.sections.len();
        if tabs == 0 {
            return;
        }
        self.tab = if forward {
            (self.tab + 1) % tabs
        } else {
            self.tab.checked_sub(1).unwrap_or(tabs - 1)
        };
        self.selected = 0;
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.items().len();
        if len == 0 {
            return;
        }
        self.selected = if down {
            (self.selected + 1) % len
        } else {
            self.selected.checked_sub(1).unwrap_or(len - 1)
        };
    }

    fn handle_input_key(&mut self, key: KeyCode) -> PhotosAction {
        let Some(input) = self.input.as_mut() else {
            return PhotosAction::None;
        };
        match key {
            KeyCode::Esc => self.input = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Enter => {
                // Terminals quote dropped paths
                let path = input.trim().trim_matches(&['\'', '"'][..]).to_string();
                self.input = None;
                if let (false, Some(item)) = (path.is_empty(), self.selected_item()) {
                    return PhotosAction::Attach {
                        item: item.id,
                        path: PathBuf::from(path),
                    };
                }
            }
            _ => {}
        }
        PhotosAction::None
    }

    /// Handle a key. Section deletion is confirmed through `dialogs`.
    pub fn handle_key(&mut self, key: KeyCode, dialogs: &mut Dialogs) -> PhotosAction {
        if self.input.is_some() {
            return self.handle_input_key(key);
        }

        match key {
            KeyCode::Esc | KeyCode::Char('q') => return PhotosAction::Back,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char(']') => self.switch_tab(true),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('[') => self.switch_tab(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Enter | KeyCode::Char('a') => {
                if self.selected_item().is_some() {
                    self.input = Some(String::new());
                }
            }
            KeyCode::Char('D') => {
                let section = self.section();
                dialogs.confirm(
                    "Delete photos",
                    format!(
                        "Delete every {} photo of {}?",
                        section.title(),
                        self.inspection.title()
                    ),
                    ConfirmAction::DeleteSectionPhotos {
                        inspection_id: self.inspection.id,
                        section,
                    },
                );
            }
            _ => {}
        }
        PhotosAction::None
    }
}
