//! Create / edit form for an inspection.

use crossterm::event::KeyCode;

use crate::data::{Inspection, InspectionDraft, MachineRoom};

const MAX_NUMBER_DIGITS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Number,
    Name,
    FourthLayer,
    MachineRoom,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Number => FormField::Name,
            FormField::Name => FormField::FourthLayer,
            FormField::FourthLayer => FormField::MachineRoom,
            FormField::MachineRoom => FormField::Number,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Number => FormField::MachineRoom,
            FormField::Name => FormField::Number,
            FormField::FourthLayer => FormField::Name,
            FormField::MachineRoom => FormField::FourthLayer,
        }
    }

    /// Fields toggled with Space rather than typed into
    pub fn is_toggle(self) -> bool {
        matches!(self, FormField::FourthLayer | FormField::MachineRoom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    None,
    Cancel,
    Submit(InspectionDraft),
}

#[derive(Debug, Clone)]
pub struct FormState {
    /// Inspection being edited, `None` when creating
    pub editing: Option<i64>,
    pub number: String,
    pub name: String,
    pub has_fourth_layer: bool,
    pub machine_room: MachineRoom,
    pub focus: FormField,
    /// Last rejection, shown under the fields
    pub error: Option<String>,
}

impl FormState {
    /// Blank form pre-filled with the suggested next number
    pub fn create(next_number: i64) -> Self {
        FormState {
            editing: None,
            number: next_number.to_string(),
            name: String::new(),
            has_fourth_layer: false,
            machine_room: MachineRoom::Unset,
            focus: FormField::Name,
            error: None,
        }
    }

    pub fn edit(inspection: &Inspection) -> Self {
        FormState {
            editing: Some(inspection.id),
            number: inspection.number.to_string(),
            name: inspection.name.clone(),
            has_fourth_layer: inspection.has_fourth_layer,
            machine_room: inspection.machine_room,
            focus: FormField::Name,
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit inspection"
        } else {
            "New inspection"
        }
    }

    fn draft(&self) -> InspectionDraft {
        // An empty number field parses to 0 and fails validation
        let number = self.number.parse().unwrap_or(0);
        InspectionDraft::new(number, self.name.clone(), self.has_fourth_layer)
            .with_machine_room(self.machine_room)
    }

    pub fn handle_key(&mut self, key: KeyCode) -> FormAction {
        match key {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => {
                let draft = self.draft();
                return match draft.validate() {
                    Ok(_) => FormAction::Submit(draft),
                    Err(e) => {
                        self.error = Some(e.to_string());
                        FormAction::None
                    }
                };
            }
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Backspace => match self.focus {
                FormField::Number => {
                    self.number.pop();
                }
                FormField::Name => {
                    self.name.pop();
                }
                FormField::FourthLayer | FormField::MachineRoom => {}
            },
            KeyCode::Char(c) => match self.focus {
                FormField::Number => {
                    if c.is_ascii_digit() && self.number.len() < MAX_NUMBER_DIGITS {
                        self.number.push(c);
                    }
                }
                FormField::Name => self.name.push(c),
                FormField::FourthLayer => {
                    if c == ' ' {
                        self.has_fourth_layer = !self.has_fourth_layer;
                    }
                }
                FormField::MachineRoom => {
                    if c == ' ' {
                        self.machine_room = self.machine_room.cycle();
                    }
                }
            },
            _ => {}
        }
        FormAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_create_submits_trimmed_fields() {
        let mut form = FormState::create(7);
        type_text(&mut form, "Torre B ");
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Char(' '));

        match form.handle_key(KeyCode::Enter) {
            FormAction::Submit(draft) => {
                assert_eq!(draft.number, 7);
                assert_eq!(draft.validate().unwrap(), "Torre B");
                assert!(draft.has_fourth_layer);
            }
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn test_number_accepts_digits_only() {
        let mut form = FormState::create(1);
        form.handle_key(KeyCode::BackTab);
        assert_eq!(form.focus, FormField::Number);
        form.handle_key(KeyCode::Backspace);
        type_text(&mut form, "4a-2.");
        assert_eq!(form.number, "42");
    }

    #[test]
    fn test_validation_errors_are_shown() {
        let mut form = FormState::create(3);
        assert_eq!(form.handle_key(KeyCode::Enter), FormAction::None);
        assert_eq!(form.error.as_deref(), Some("Name is required"));

        type_text(&mut form, "Casa");
        form.focus = FormField::Number;
        form.handle_key(KeyCode::Backspace);
        assert_eq!(form.handle_key(KeyCode::Enter), FormAction::None);
        assert_eq!(
            form.error.as_deref(),
            Some("Number must be a positive integer")
        );
    }

    #[test]
    fn test_edit_prefills_fields() {
        let inspection = Inspection {
            id: 5,
            number: 12,
            name: "Puente".to_string(),
            has_fourth_layer: true,
            machine_room: MachineRoom::Yes,
            export_count: 0,
            last_image_path: None,
            last_exported_at: None,
        };
        let form = FormState::edit(&inspection);
        assert_eq!(form.editing, Some(5));
        assert_eq!(form.machine_room, MachineRoom::Yes);
        assert_eq!(form.number, "12");
        assert_eq!(form.title(), "Edit inspection");
        assert!(form.has_fourth_layer);
    }

    #[test]
    fn test_machine_room_cycles_with_space() {
        let mut form = FormState::create(2);
        type_text(&mut form, "Edificio");
        form.handle_key(KeyCode::Tab);
        form.handle_key(KeyCode::Tab);
        assert_eq!(form.focus, FormField::MachineRoom);
        form.handle_key(KeyCode::Char(' '));
        form.handle_key(KeyCode::Char(' '));
        assert_eq!(form.machine_room, MachineRoom::No);

        match form.handle_key(KeyCode::Enter) {
            FormAction::Submit(draft) => assert_eq!(draft.machine_room, MachineRoom::No),
            other => panic!("expected submit, got {other:?}"),
        }
    }

    #[test]
    fn test_escape_cancels() {
        let mut form = FormState::create(1);
        assert_eq!(form.handle_key(KeyCode::Esc), FormAction::Cancel);
    }
}
