use crate::state::AppState;
use crate::views::{error_line, field_line, row_style, View, ViewId};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct FolderView;

impl View for FolderView {
    fn view_id(&self) -> ViewId {
        ViewId::Folder
    }

    fn title(&self, state: &AppState) -> String {
        match &state.folder.current {
            Some(folder) => folder.name.clone(),
            None => "Loading folder…".to_string(),
        }
    }

    fn hints(&self, state: &AppState) -> &'static str {
        if state.editor.renaming {
            "Enter save · Esc cancel"
        } else {
            "↑/↓ move · Enter edit · a add · x delete item · e rename · d delete folder · Esc back"
        }
    }

    fn render(&self, state: &AppState, area: Rect, f: &mut Frame) {
        let mut lines: Vec<Line> = Vec::new();

        if state.editor.renaming {
            let name = state
                .editor
                .folder
                .value()
                .map(|folder| folder.name.as_str())
                .unwrap_or_default();
            lines.push(field_line("Name", name, true));
            lines.push(Line::from(""));
        }
        if let Some(link) = state.folder.current.as_ref().and_then(|folder| folder.link.as_deref()) {
            lines.push(Line::styled(
                format!("Feed: {}", link),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.extend(error_line(state.folder.fetch.err.as_deref()));

        let items = state
            .folder
            .current
            .as_ref()
            .map(|folder| folder.items.as_slice())
            .unwrap_or_default();
        if items.is_empty() && !state.folder.fetch.is_fetching {
            lines.push(Line::from("No torrents. Press a to add one."));
        }
        for (i, item) in items.iter().enumerate() {
            let title = if item.title.is_empty() { &item.id } else { &item.title };
            let modified = item.date_modified.as_deref().unwrap_or_default();
            lines.push(Line::styled(
                format!(" {}  {}", title, modified),
                row_style(i == state.ui.cursor),
            ));
        }

        let block = Block::default().borders(Borders::ALL);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
