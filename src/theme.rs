use ratatui::style::{Color, Modifier, Style};
use crate::models::NoticeLevel;

pub struct Theme {
    pub focus_border: Color,
    pub blurred_border: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub text_highlight: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,

    // Specific components
    pub gist_name: Style,
    pub gist_language: Style,
    pub gist_owner: Style,
    pub gist_date: Style,
    pub match_highlight: Style,
    pub starred: Style,
    pub forked: Style,
    pub favorite: Style,
    pub badge: Style,
    pub footer: Style,
    pub popup_title: Style,
    pub popup_border: Style,
    pub popup_text: Style,
    pub field_error: Style,
    pub danger: Style,
    pub disabled: Style,
    pub notice_info: Style,
    pub notice_success: Style,
    pub notice_error: Style,
}

impl Theme {
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus_border).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.blurred_border)
        }
    }

    pub fn notice(&self, level: NoticeLevel) -> Style {
        match level {
            NoticeLevel::Info => self.notice_info,
            NoticeLevel::Success => self.notice_success,
            NoticeLevel::Error => self.notice_error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            focus_border: Color::Cyan,
            blurred_border: Color::DarkGray,
            text: Color::White,
            text_secondary: Color::Gray,
            text_highlight: Color::Yellow,
            selection_bg: Color::DarkGray,
            selection_fg: Color::Yellow,

            gist_name: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            gist_language: Style::default().fg(Color::Magenta),
            gist_owner: Style::default().fg(Color::Green),
            gist_date: Style::default().fg(Color::Gray),
            match_highlight: Style::default().fg(Color::Black).bg(Color::Yellow),
            starred: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            forked: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            favorite: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            badge: Style::default().fg(Color::Black).bg(Color::Cyan),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            popup_title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            popup_border: Style::default().fg(Color::Magenta).bg(Color::Black),
            popup_text: Style::default().fg(Color::White),
            field_error: Style::default().fg(Color::Red),
            danger: Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            notice_info: Style::default().fg(Color::Cyan),
            notice_success: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            notice_error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}
