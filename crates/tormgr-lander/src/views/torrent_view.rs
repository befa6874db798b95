use crate::routes::{Route, NEW_TORRENT};
use crate::state::{AppState, TorrentField};
use crate::views::{error_line, field_line, View, ViewId};
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct TorrentView;

fn is_new(state: &AppState) -> bool {
    matches!(&state.route, Route::Torrent(_, id) if id == NEW_TORRENT)
}

impl View for TorrentView {
    fn view_id(&self) -> ViewId {
        ViewId::Torrent
    }

    fn title(&self, state: &AppState) -> String {
        if is_new(state) {
            return "Add torrent".to_string();
        }
        match state.editor.torrent.value() {
            Some(item) => item.title.clone(),
            None => "Loading torrent…".to_string(),
        }
    }

    fn hints(&self, state: &AppState) -> &'static str {
        if is_new(state) {
            "Enter add · Esc back"
        } else {
            "Tab next field · Enter save · Esc back"
        }
    }

    fn render(&self, state: &AppState, area: Rect, f: &mut Frame) {
        let mut lines: Vec<Line> = Vec::new();

        match state.editor.torrent.value() {
            Some(item) if is_new(state) => {
                lines.push(Line::from("Paste a torrent URL, magnet link or info hash."));
                lines.push(Line::from(""));
                let source = TorrentField::Url.get(item);
                lines.push(field_line("Source", source, true));
            }
            Some(item) => {
                for field in TorrentField::ALL {
                    lines.push(field_line(
                        field.label(),
                        field.get(item),
                        field == state.editor.field,
                    ));
                }
                if state.editor.torrent.is_dirty() {
                    lines.push(Line::from(""));
                    lines.push(Line::from("Unsaved changes"));
                }
            }
            None => lines.push(Line::from("Loading…")),
        }
        lines.extend(error_line(state.folder.fetch.err.as_deref()));

        let block = Block::default().borders(Borders::ALL);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
