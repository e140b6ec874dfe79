use tuirealm::event::{Key, KeyEvent, KeyModifiers};
use tuirealm::ratatui::style::{Color, Modifier, Style};
use tuirealm::ratatui::text::{Line, Span};

/// Single-line text buffer shared by the form-like components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    placeholder: String,
    masked: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Render the value as asterisks.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Applies an editing key. Returns whether the key was consumed.
    ///
    /// Characters typed with Ctrl or Alt held are left to other handlers.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            Key::Char(ch) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.value.push(ch);
                true
            }
            Key::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }

    fn display_value(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    pub fn line(&self, label: &str, focused: bool) -> Line<'static> {
        let marker = if focused { ">" } else { " " };
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let mut spans = vec![Span::styled(format!("{marker} {label}: "), style)];
        if self.value.is_empty() && !self.placeholder.is_empty() {
            spans.push(Span::styled(
                self.placeholder.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
        } else {
            spans.push(Span::styled(self.display_value(), style));
        }
        if focused {
            spans.push(Span::styled("_", style));
        }
        Line::from(spans)
    }
}

/// `[ label ]` button span, highlighted when focused.
pub fn button(label: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default()
    };
    Span::styled(format!("[ {label} ]"), style)
}
