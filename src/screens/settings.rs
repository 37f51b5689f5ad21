//! Axis order editor.

use crossterm::event::KeyCode;

use crate::grid::AxisOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    Cancel,
    Save(AxisOrder),
}

#[derive(Debug, Clone)]
pub struct SettingsScreen {
    order: AxisOrder,
    cursor: usize,
}

impl SettingsScreen {
    pub fn new(order: AxisOrder) -> Self {
        SettingsScreen { order, cursor: 0 }
    }

    pub fn order(&self) -> AxisOrder {
        self.order
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: KeyCode) -> SettingsAction {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => return SettingsAction::Cancel,
            KeyCode::Enter | KeyCode::Char('s') => return SettingsAction::Save(self.order),
            KeyCode::Char('r') => self.order = AxisOrder::default(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor = (self.cursor + 1).min(2),
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            // Move the highlighted axis
            KeyCode::Char('J') if self.cursor < 2 => {
                self.order.swap(self.cursor, self.cursor + 1);
                self.cursor += 1;
            }
            KeyCode::Char('K') if self.cursor > 0 => {
                self.order.swap(self.cursor, self.cursor - 1);
                self.cursor -= 1;
            }
            _ => {}
        }
        SettingsAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Axis;

    #[test]
    fn test_move_axis_down_and_save() {
        let mut screen = SettingsScreen::new(AxisOrder::default());
        screen.handle_key(KeyCode::Char('J'));
        assert_eq!(screen.cursor(), 1);
        assert_eq!(
            screen.handle_key(KeyCode::Enter),
            SettingsAction::Save(AxisOrder::new([Axis::Layer, Axis::Measurement, Axis::Point]).unwrap())
        );
    }

    #[test]
    fn test_moves_stop_at_edges() {
        let mut screen = SettingsScreen::new(AxisOrder::default());
        screen.handle_key(KeyCode::Char('K'));
        assert_eq!(screen.order(), AxisOrder::default());
        screen.handle_key(KeyCode::Down);
        screen.handle_key(KeyCode::Down);
        screen.handle_key(KeyCode::Down);
        assert_eq!(screen.cursor(), 2);
        screen.handle_key(KeyCode::Char('J'));
        assert_eq!(screen.order(), AxisOrder::default());
    }

    #[test]
    fn test_reset_and_cancel() {
        let order = AxisOrder::new([Axis::Point, Axis::Layer, Axis::Measurement]).unwrap();
        let mut screen = SettingsScreen::new(order);
        screen.handle_key(KeyCode::Char('r'));
        assert_eq!(screen.order(), AxisOrder::default());
        assert_eq!(screen.handle_key(KeyCode::Esc), SettingsAction::Cancel);
    }
}
