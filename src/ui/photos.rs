//! Photo checklist view: section tabs, the item list and the path prompt.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use super::theme::Theme;
use crate::screens::PhotosScreen;

pub struct PhotosView<'a> {
    screen: &'a PhotosScreen,
    theme: &'a Theme,
}

impl<'a> PhotosView<'a> {
    pub fn new(screen: &'a PhotosScreen, theme: &'a Theme) -> Self {
        PhotosView { screen, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let prompt = if self.screen.is_typing() { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),      // Tabs
                Constraint::Min(3),         // Items
                Constraint::Length(prompt), // Path prompt
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);
        self.render_items(frame, chunks[1]);
        if let Some(input) = self.screen.input() {
            let prompt = Paragraph::new(format!("{input}_")).block(
                Block::default()
                    .title(" Image path (Enter to attach, Esc to cancel) ")
                    .borders(Borders::ALL)
                    .border_style(self.theme.focused_border_style()),
            );
            frame.render_widget(prompt, chunks[2]);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = self
            .screen
            .sections()
            .iter()
            .map(|&section| {
                let complete = self.screen.section_complete(section);
                Line::from(vec![
                    Span::raw(format!("{} ", section.title())),
                    Span::styled(
                        Theme::completion_mark(complete),
                        self.theme.completion_style(complete),
                    ),
                ])
            })
            .collect();

        let progress = self.screen.progress();
        let title = format!(
            " {}  Photos {}/{} ",
            self.screen.inspection().title(),
            progress.taken,
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

    fn render_items(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .screen
            .items()
            .into_iter()
            .map(|item| {
                let count = self.screen.count(item.id);
                let taken = count > 0;
                let mut spans = vec![
                    Span::styled(
                        format!(" {} ", Theme::completion_mark(taken)),
                        self.theme.completion_style(taken),
                    ),
                    Span::styled(format!("{:>3}  ", item.id), self.theme.dimmed_title_style()),
                    Span::raw(item.name),
                ];
                if let Some(group) = item.group {
                    spans.push(Span::styled(
                        format!("  ({group})"),
                        self.theme.dimmed_title_style(),
                    ));
                }
                spans.push(Span::styled(
                    format!("  Photos saved: {count}"),
                    self.theme
                        .completion_style(taken)
                        .add_modifier(Modifier::ITALIC),
                ));
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" {} ", self.screen.section().title()))
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style()),
            )
            .highlight_style(self.theme.highlight_style());

        let mut state = ListState::default();
        state.select(Some(self.screen.selected()));
        frame.render_stateful_widget(list, area, &mut state);
    }
}
