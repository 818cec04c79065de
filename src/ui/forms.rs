use anyhow::{Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::error::TrackerError;

/// Internal representation of the "add artist" form. A single free-text
/// field; validation happens on submit so the user can type freely.
#[derive(Default, Clone)]
pub(crate) struct ArtistForm {
    pub(crate) label: String,
    pub(crate) error: Option<String>,
}

impl ArtistForm {
    /// Append a character, refusing control characters.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.label.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.label.pop();
    }

    /// Validate and return the trimmed label ready for creation.
    pub(crate) fn parse_inputs(&self) -> Result<String> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err(TrackerError::BlankLabel).context("empty artist form");
        }
        Ok(label.to_string())
    }

    /// Render the single input line for the modal widget.
    pub(crate) fn build_line(&self) -> Line<'static> {
        let display = if self.label.is_empty() {
            "<e.g. Claude Monet>".to_string()
        } else {
            self.label.clone()
        };
        let style = if self.label.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Yellow)
        };
        Line::from(vec![Span::raw("Name: "), Span::styled(display, style)])
    }

    pub(crate) fn value_len(&self) -> usize {
        self.label.chars().count()
    }
}

/// State carried into the delete confirmation dialog.
#[derive(Clone)]
pub(crate) struct ConfirmArtistDelete {
    pub(crate) id: String,
    pub(crate) label: String,
}

/// Marker state for the "wipe everything" confirmation dialog.
pub(crate) struct ConfirmReset;
