//! Theme configuration for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::grid::Threshold;

/// Color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub border: Color,
    pub title: Color,
    pub complete: Color,
    pub incomplete: Color,
    pub below_threshold: Color,
    pub above_threshold: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bg: Color::Reset,
            fg: Color::White,
            highlight_bg: Color::Rgb(60, 60, 80),
            highlight_fg: Color::White,
            border: Color::Rgb(100, 100, 120),
            title: Color::Cyan,
            complete: Color::Green,
            incomplete: Color::Red,
            // Named colors for terminal compatibility, matching the export fills
            below_threshold: Color::Red,
            above_threshold: Color::Green,
            error: Color::LightRed,
        }
    }
}

impl Theme {
    /// Base surface style used to paint widget backgrounds
    pub fn surface_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Convenience helper returning (border_style, title_style) for focus state
    pub fn panel_styles(&self, focused: bool) -> (Style, Style) {
        if focused {
            (self.focused_border_style(), self.focused_border_style())
        } else {
            (self.border_style(), self.dimmed_title_style())
        }
    }

    /// Get style for highlighted/selected items
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for focused panel borders (distinct from normal borders)
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for titles
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for unfocused/dimmed titles
    pub fn dimmed_title_style(&self) -> Style {
        Style::default()
            .fg(self.border)
            .add_modifier(Modifier::DIM)
    }

    /// Style for a completion marker or counter
    pub fn completion_style(&self, complete: bool) -> Style {
        Style::default().fg(if complete {
            self.complete
        } else {
            self.incomplete
        })
    }

    /// ✓ or ✗ for a group's completion
    pub fn completion_mark(complete: bool) -> &'static str {
        if complete {
            "✓"
        } else {
            "✗"
        }
    }

    /// Style for a cell value, colored by its threshold class
    pub fn value_style(&self, value: &str) -> Style {
        match Threshold::classify(value) {
            Some(Threshold::Below) => Style::default().fg(self.below_threshold),
            Some(Threshold::AtOrAbove) => Style::default().fg(self.above_threshold),
            None => Style::default().fg(self.fg),
        }
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error)
            .add_modifier(Modifier::BOLD)
    }
}
