//! Grid editor view: tab bar, then one column of cells per block.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::theme::Theme;
use crate::screens::GridScreen;

pub struct GridView<'a> {
    screen: &'a GridScreen,
    theme: &'a Theme,
}

impl<'a> GridView<'a> {
    pub fn new(screen: &'a GridScreen, theme: &'a Theme) -> Self {
        GridView { screen, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(6),    // Blocks
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);
        self.render_blocks(frame, chunks[1]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let order = self.screen.order();
        let progress = self.screen.progress();
        let titles: Vec<Line> = self
            .screen
            .tab_values()
            .into_iter()
            .map(|value| {
                let complete = progress.group(value).is_some_and(|g| g.is_complete());
                Line::from(vec![
                    Span::raw(format!("{} {value} ", order.tab().label())),
                    Span::styled(
                        Theme::completion_mark(complete),
                        self.theme.completion_style(complete),
                    ),
                ])
            })
            .collect();

        let title = format!(
            " {}  {} / {} ",
            self.screen.inspection().title(),
            progress.filled,
            progress.total
        );
        let tabs = Tabs::new(titles)
            .select(self.screen.tab())
            .block(
                Block::default()
                    .title(title)
                    .title_style(self.theme.completion_style(progress.is_complete()))
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style()),
            )
            .highlight_style(self.theme.highlight_style())
            .divider("|");
        frame.render_widget(tabs, area);
    }

    fn render_blocks(&self, frame: &mut Frame, area: Rect) {
        let order = self.screen.order();
        let blocks = self.screen.blocks();
        let row_values = self.screen.row_values();
        let (cursor_block, cursor_row) = self.screen.cursor();

        let constraints = vec![Constraint::Ratio(1, blocks.len().max(1) as u32); blocks.len()];
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (b, (group, column)) in blocks.iter().zip(columns.iter()).enumerate() {
            let lines: Vec<Line> = row_values
                .iter()
                .enumerate()
                .filter_map(|(r, row_value)| {
                    let coord = self.screen.coordinate_at(b, r)?;
                    let value = self.screen.value(coord);
                    let mut style = self.theme.value_style(value);
                    if b == cursor_block && r == cursor_row {
                        style = self.theme.highlight_style().fg(style.fg.unwrap_or(self.theme.fg));
                    }
                    let shown = if value.is_empty() { "·" } else { value };
                    Some(Line::from(vec![
                        Span::styled(
                            format!(" {} {row_value:<3}", order.row().label()),
                            self.theme.dimmed_title_style(),
                        ),
                        Span::styled(format!(" {shown:>5} "), style),
                    ]))
                })
                .collect();

            let focused = b == cursor_block;
            let (border, _) = self.theme.panel_styles(focused);
            let title = Line::from(vec![
                Span::raw(format!(" {} {} ", group.axis.label(), group.value)),
                Span::styled(
                    format!("{}/{} ", group.filled, group.total),
                    self.theme
                        .completion_style(group.is_complete())
                        .add_modifier(Modifier::BOLD),
                ),
            ]);
            let paragraph = Paragraph::new(lines).block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(border),
            );
            frame.render_widget(paragraph, *column);
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::data::{Inspection, MachineRoom, PointsMap};
    use crate::grid::{AxisOrder, Coordinate};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_tabs_and_values() {
        let inspection = Inspection {
            id: 1,
            number: 7,
            name: "Losa".to_string(),
            has_fourth_layer: false,
            machine_room: MachineRoom::Unset,
            export_count: 0,
            last_image_path: None,
            last_exported_at: None,
        };
        let mut points = PointsMap::new();
        points.insert(Coordinate::new(1, 1, 1).unwrap(), "3,5".to_string());
        let screen = GridScreen::new(inspection, points, AxisOrder::default());
        let theme = Theme::default();

        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        terminal
            .draw(|f| GridView::new(&screen, &theme).render(f, f.area()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("7 - Losa"));
        assert!(text.contains("Measurement 1"));
        assert!(text.contains("Layer 3"));
        assert!(!text.contains("Layer 4"));
        assert!(text.contains("3,5"));
        assert!(text.contains("1/4"));
    }
}
