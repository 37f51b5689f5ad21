//! Help overlay widget showing keyboard shortcuts.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{centered_rect, theme::Theme};

/// Help overlay showing all keyboard shortcuts
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        HelpOverlay { theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        // Center the help popup
        let popup_area = centered_rect(65, 80, area);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        const DESCRIPTION: &str = "Record concrete inspection measurements layer by layer. Values under 2,0 are shown in red; complete inspections can be exported to a workbook and an image.";

        let shortcuts = [
            ("Inspections", vec![
                ("j / k", "Move down / up"),
                ("Enter / l", "Open the measurement grid"),
                ("n", "New inspection"),
                ("e", "Edit inspection"),
                ("p", "Photo checklist"),
                ("d", "Delete inspection"),
                ("x", "Export (complete inspections only)"),
                ("/", "Search by number or name"),
                ("c", "Grid structure settings"),
                ("r", "Reload"),
            ]),
            ("Grid", vec![
                ("0-9 , .", "Type a value (0 to 10, one decimal)"),
                ("Backspace", "Delete last character"),
                ("Del", "Clear cell"),
                ("Enter / ↓", "Next cell"),
                ("↑", "Previous cell"),
                ("← / →", "Previous / next block"),
                ("[ / ]", "Previous / next tab"),
                ("Esc", "Back to the list"),
            ]),
            ("Photos", vec![
                ("← / →", "Previous / next section"),
                ("j / k", "Move down / up"),
                ("Enter / a", "Attach an image file to the item"),
                ("D", "Delete every photo of the section"),
                ("Esc", "Back to the list"),
            ]),
            ("General", vec![
                ("? / F1", "Toggle this help"),
                ("q", "Quit"),
            ]),
        ];

        let mut lines: Vec<Line> = Vec::new();

        // Add description as a single wrapped line
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {DESCRIPTION}"),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));

        // Add keyboard shortcuts sections
        for (section, items) in shortcuts {
            lines.push(Line::from(Span::styled(
                format!("  {section} "),
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::UNDERLINED),
            )));
            lines.push(Line::from(""));

            for (key, desc) in items {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        format!("{key:<14}"),
                        Style::default().fg(self.theme.title),
                    ),
                    Span::raw(desc),
                ]));
            }
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" betonera Help ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title_style(self.theme.title_style())
                    .style(self.theme.surface_style()),
            )
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false })
            .style(self.theme.surface_style());

        frame.render_widget(paragraph, popup_area);
    }
}
