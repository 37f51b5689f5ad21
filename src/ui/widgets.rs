//! UI widgets for the inspection screens.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{centered_rect, theme::Theme};
use crate::dialog::{Dialog, DialogKind};
use crate::screens::{FormField, FormState, ListScreen, SettingsScreen};

/// Inspection list panel widget
pub struct InspectionList<'a> {
    screen: &'a ListScreen,
    theme: &'a Theme,
}

impl<'a> InspectionList<'a> {
    pub fn new(screen: &'a ListScreen, theme: &'a Theme) -> Self {
        InspectionList { screen, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .screen
            .visible()
            .map(|s| {
                let mut spans = vec![
                    Span::raw(format!("{:<32}", s.inspection.title())),
                    Span::styled(
                        format!("Progress: {} / {}", s.filled, s.total()),
                        self.theme.completion_style(s.is_complete()),
                    ),
                ];
                if s.inspection.export_count > 0 {
                    spans.push(Span::styled(
                        format!("  exported {}x", s.inspection.export_count),
                        self.theme.dimmed_title_style(),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let title = match self.screen.filter_label() {
            Some(label) => format!(" Inspections ({label}) "),
            None => " Inspections ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .title_style(self.theme.title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .border_style(self.theme.border_style());

        if self.screen.is_empty() {
            let hint = Paragraph::new("No inspections yet. Press [n] to create one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(self.screen.selected_summary().map(|_| self.screen.selected()));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// One-line search input shown above the list
pub struct SearchBar<'a> {
    query: &'a str,
    active: bool,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(query: &'a str, active: bool, theme: &'a Theme) -> Self {
        SearchBar {
            query,
            active,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (border, title) = self.theme.panel_styles(self.active);
        let cursor = if self.active { "_" } else { "" };
        let paragraph = Paragraph::new(format!("{}{cursor}", self.query)).block(
            Block::default()
                .title(" Search [/] ")
                .title_style(title)
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(paragraph, area);
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    context: Option<&'a str>,
    message: Option<&'a str>,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        context: Option<&'a str>,
        message: Option<&'a str>,
        error: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        StatusBar {
            context,
            message,
            error,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(e) = self.error {
            Line::from(Span::styled(format!("Error: {e}"), self.theme.error_style()))
        } else if let Some(m) = self.message {
            Line::from(m.to_string())
        } else {
            match self.context {
                Some(c) => Line::from(format!("betonera: {c} | [?] Help")),
                None => Line::from("betonera | [?] Help [q] Quit"),
            }
        };

        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::TOP));
        frame.render_widget(paragraph, area);
    }
}

/// Create / edit popup
pub struct FormPopup<'a> {
    form: &'a FormState,
    theme: &'a Theme,
}

impl<'a> FormPopup<'a> {
    pub fn new(form: &'a FormState, theme: &'a Theme) -> Self {
        FormPopup { form, theme }
    }

    fn field(&self, label: &str, value: String, field: FormField) -> Line<'static> {
        let focused = self.form.focus == field;
        let style = if focused {
            self.theme.highlight_style()
        } else {
            Style::default()
        };
        let cursor = if focused && !field.is_toggle() {
            "_"
        } else {
            ""
        };
        Line::from(vec![
            Span::styled(format!("  {label:<14}"), self.theme.title_style()),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup);

        let toggle = if self.form.has_fourth_layer {
            "[x]"
        } else {
            "[ ]"
        };
        let mut lines = vec![
            Line::from(""),
            self.field("Number", self.form.number.clone(), FormField::Number),
            self.field("Name", self.form.name.clone(), FormField::Name),
            self.field("Fourth layer", toggle.to_string(), FormField::FourthLayer),
            self.field(
                "Machine room",
                format!("< {} >", self.form.machine_room.label()),
                FormField::MachineRoom,
            ),
            Line::from(""),
        ];
        if let Some(e) = &self.form.error {
            lines.push(Line::from(Span::styled(
                format!("  {e}"),
                self.theme.error_style(),
            )));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "  [Tab] Next field  [Space] Toggle  [Enter] Save  [Esc] Cancel",
            self.theme.dimmed_title_style(),
        )));

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(format!(" {} ", self.form.title()))
                .title_alignment(Alignment::Center)
                .title_style(self.theme.title_style())
                .borders(Borders::ALL)
                .border_style(self.theme.focused_border_style())
                .style(self.theme.surface_style()),
        );
        frame.render_widget(paragraph, popup);
    }
}

/// Alert / confirmation popup
pub struct DialogPopup<'a> {
    dialog: &'a Dialog,
    theme: &'a Theme,
}

impl<'a> DialogPopup<'a> {
    pub fn new(dialog: &'a Dialog, theme: &'a Theme) -> Self {
        DialogPopup { dialog, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup);

        let keys = match self.dialog.kind {
            DialogKind::Alert => "[Enter] OK",
            DialogKind::Confirm(_) => "[y/Enter] Confirm  [n/Esc] Cancel",
        };
        let lines = vec![
            Line::from(""),
            Line::from(self.dialog.message.clone()),
            Line::from(""),
            Line::from(Span::styled(keys, self.theme.dimmed_title_style())),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!(" {} ", self.dialog.title))
                    .title_alignment(Alignment::Center)
                    .title_style(self.theme.title_style())
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(self.theme.focused_border_style())
                    .style(self.theme.surface_style()),
            );
        frame.render_widget(paragraph, popup);
    }
}

/// Axis order editor panel
pub struct SettingsPanel<'a> {
    screen: &'a SettingsScreen,
    theme: &'a Theme,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(screen: &'a SettingsScreen, theme: &'a Theme) -> Self {
        SettingsPanel { screen, theme }
    }

    fn role(position: usize) -> &'static str {
        match position {
            0 => "Tabs",
            1 => "Blocks",
            _ => "Rows",
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .screen
            .order()
            .axes()
            .into_iter()
            .enumerate()
            .map(|(i, axis)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<8}", Self::role(i)), self.theme.dimmed_title_style()),
                    Span::raw(axis.plural_label()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Grid structure  [J/K] Move  [r] Reset  [Enter] Save  [Esc] Cancel ")
                    .title_style(self.theme.title_style())
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style()),
            )
            .highlight_style(self.theme.highlight_style().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.screen.cursor()));
        frame.render_stateful_widget(list, area, &mut state);
    }
}
