//! Alert and confirmation dialogs.
//!
//! `App` owns a single [`Dialogs`] and hands `&mut Dialogs` to whichever
//! controller needs to raise one. Confirmations carry the action to run when
//! accepted; the owner performs it.

use crossterm::event::KeyCode;

use crate::photos::Section;

/// Work deferred until the user confirms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteInspection(i64),
    DeleteSectionPhotos { inspection_id: i64, section: Section },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    Alert,
    Confirm(ConfirmAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub kind: DialogKind,
}

#[derive(Debug, Default)]
pub struct Dialogs {
    current: Option<Dialog>,
}

impl Dialogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an informational dialog, replacing any open one
    pub fn alert(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.current = Some(Dialog {
            title: title.into(),
            message: message.into(),
            kind: DialogKind::Alert,
        });
    }

    /// Ask the user to confirm `action`
    pub fn confirm(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        action: ConfirmAction,
    ) {
        self.current = Some(Dialog {
            title: title.into(),
            message: message.into(),
            kind: DialogKind::Confirm(action),
        });
    }

    pub fn current(&self) -> Option<&Dialog> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Feed a key to the open dialog. Returns the action when a confirmation
    /// is accepted.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<ConfirmAction> {
        let dialog = self.current.as_ref()?;
        match (&dialog.kind, key) {
            (DialogKind::Alert, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) => {
                self.current = None;
                None
            }
            (DialogKind::Confirm(action), KeyCode::Enter | KeyCode::Char('y')) => {
                let action = *action;
                self.current = None;
                Some(action)
            }
            (DialogKind::Confirm(_), KeyCode::Esc | KeyCode::Char('n')) => {
                self.current = None;
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_closes_without_action() {
        let mut dialogs = Dialogs::new();
        dialogs.alert("Error", "Could not export");
        assert!(dialogs.is_open());
        assert_eq!(dialogs.handle_key(KeyCode::Char('x')), None);
        assert!(dialogs.is_open());
        assert_eq!(dialogs.handle_key(KeyCode::Enter), None);
        assert!(!dialogs.is_open());
    }

    #[test]
    fn test_confirm_returns_action() {
        let mut dialogs = Dialogs::new();
        dialogs.confirm("Delete", "Delete 3 - Site?", ConfirmAction::DeleteInspection(3));
        assert_eq!(
            dialogs.handle_key(KeyCode::Char('y')),
            Some(ConfirmAction::DeleteInspection(3))
        );
        assert!(!dialogs.is_open());
    }

    #[test]
    fn test_confirm_section_photo_deletion() {
        let mut dialogs = Dialogs::new();
        let action = ConfirmAction::DeleteSectionPhotos {
            inspection_id: 2,
            section: Section::Pit,
        };
        dialogs.confirm("Delete photos", "Delete every Pozo photo?", action);
        assert_eq!(dialogs.handle_key(KeyCode::Char('n')), None);
        dialogs.confirm("Delete photos", "Delete every Pozo photo?", action);
        assert_eq!(dialogs.handle_key(KeyCode::Enter), Some(action));
    }

    #[test]
    fn test_confirm_cancel() {
        let mut dialogs = Dialogs::new();
        dialogs.confirm("Delete", "Delete?", ConfirmAction::DeleteInspection(1));
        assert_eq!(dialogs.handle_key(KeyCode::Esc), None);
        assert!(!dialogs.is_open());
        assert_eq!(dialogs.handle_key(KeyCode::Enter), None);
    }
}
