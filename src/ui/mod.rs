//! Terminal User Interface components for betonera-tui.

mod grid;
mod help;
mod photos;
mod theme;
pub mod widgets;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub use grid::GridView;
pub use help::HelpOverlay;
pub use photos::PhotosView;
pub use theme::Theme;

/// Create a centered rect for popup dialogs
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
