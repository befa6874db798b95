use crate::state::AppState;
use crate::views::{error_line, field_line, row_style, View, ViewId};
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct FoldersView;

impl View for FoldersView {
    fn view_id(&self) -> ViewId {
        ViewId::Folders
    }

    fn title(&self, state: &AppState) -> String {
        format!("Folders ({})", state.folders.folders.len())
    }

    fn hints(&self, state: &AppState) -> &'static str {
        if state.ui.new_folder.is_some() {
            "Enter create · Esc cancel"
        } else {
            "↑/↓ move · Enter open · n new · r reload · o sign out · q quit"
        }
    }

    fn render(&self, state: &AppState, area: Rect, f: &mut Frame) {
        let folders = &state.folders;
        let mut lines: Vec<Line> = Vec::new();

        if let Some(name) = &state.ui.new_folder {
            lines.push(field_line("New folder", name, true));
            lines.push(Line::from(""));
        }
        lines.extend(error_line(folders.fetch.err.as_deref()));

        if folders.folders.is_empty() && !folders.fetch.is_fetching {
            lines.push(Line::from("No folders yet. Press n to create one."));
        }
        for (i, folder) in folders.folders.iter().enumerate() {
            let text = format!(" {} ({} items) ", folder.name, folder.items.len());
            lines.push(Line::styled(text, row_style(i == state.ui.cursor)));
        }

        let block = Block::default().borders(Borders::ALL);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
