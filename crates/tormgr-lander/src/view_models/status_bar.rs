//! Status Bar View Model
//!
//! Pre-computes presentation data for the status bar.

use crate::state::{AppState, StatusKind};
use ratatui::style::{Color, Modifier, Style};

/// View model for rendering the status bar
#[derive(Debug, Clone)]
pub struct StatusBarViewModel {
    /// Labels of operations in flight, joined for display
    pub pending: Option<String>,
    /// Emoji/icon for the status
    pub emoji: &'static str,
    /// The message text
    pub message: String,
    /// Timestamp formatted for display (e.g., "14:32:05")
    pub timestamp: String,
    /// Source operation for context
    pub source: String,
    pub message_style: Style,
    pub metadata_style: Style,
}

impl StatusBarViewModel {
    pub fn from_state(state: &AppState) -> Self {
        let pending = state.async_state.in_progress().then(|| {
            let labels: Vec<&str> = state.async_state.pending.values().map(String::as_str).collect();
            format!("⏳ {}…", labels.join(", "))
        });
        let metadata_style = Style::default().fg(Color::DarkGray);

        match state.status_bar.latest() {
            Some(msg) => {
                let fg = match msg.kind {
                    StatusKind::Success => Color::Green,
                    StatusKind::Error => Color::Red,
                    StatusKind::Info => Color::Cyan,
                };
                Self {
                    pending,
                    emoji: msg.kind.emoji(),
                    message: msg.message.clone(),
                    timestamp: msg.timestamp.format("%H:%M:%S").to_string(),
                    source: msg.source.clone(),
                    message_style: Style::default().fg(fg).add_modifier(Modifier::BOLD),
                    metadata_style,
                }
            }
            None => Self {
                pending,
                emoji: "👋",
                message: "Welcome to tormgr".to_string(),
                timestamp: String::new(),
                source: String::new(),
                message_style: Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
                metadata_style,
            },
        }
    }
}
