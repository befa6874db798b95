use crate::middleware::keyboard_middleware::TextTarget;
use crate::routes::Route;
use crate::state::AppState;
use crate::view_models::StatusBarViewModel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub mod confirm_popup_view;
pub mod folder_view;
pub mod folders_view;
pub mod signin_view;
pub mod status_bar;
pub mod torrent_view;

pub use folder_view::FolderView;
pub use folders_view::FoldersView;
pub use signin_view::SignInView;
pub use torrent_view::TorrentView;

/// View identifier - allows comparing which view is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    SignIn,
    Folders,
    Folder,
    Torrent,
}

/// View trait - one screen of the application
pub trait View: std::fmt::Debug {
    fn view_id(&self) -> ViewId;

    /// Title shown in the header
    fn title(&self, state: &AppState) -> String;

    /// Key hints shown in the header
    fn hints(&self, state: &AppState) -> &'static str;

    /// Render the body of this screen
    fn render(&self, state: &AppState, area: Rect, f: &mut Frame);
}

/// Screen for the current route
pub fn active_view(state: &AppState) -> Box<dyn View> {
    match state.route {
        Route::Root | Route::SignIn { .. } => Box::new(SignInView),
        Route::Folders => Box::new(FoldersView),
        Route::Folder(_) => Box::new(FolderView),
        Route::Torrent(..) => Box::new(TorrentView),
    }
}

/// Render the entire application UI
pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let view = active_view(state);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(view.as_ref(), state, chunks[0], f);
    view.render(state, chunks[1], f);

    let vm = StatusBarViewModel::from_state(state);
    f.render_widget(status_bar::StatusBarWidget(&vm), chunks[2]);

    if let Some(confirm) = &state.ui.confirm {
        confirm_popup_view::render(confirm, area, f);
    }
}

fn render_header(view: &dyn View, state: &AppState, area: Rect, f: &mut Frame) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", view.title(state)),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(view.hints(state), Style::default().fg(Color::DarkGray)),
    ];
    if TextTarget::of(state).is_some() {
        spans.push(Span::styled("  [editing]", Style::default().fg(Color::Yellow)));
    }
    if let Some(email) = &state.auth.email {
        spans.push(Span::styled(
            format!("  {}", email),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Inline error line, or nothing
pub(crate) fn error_line(err: Option<&str>) -> Option<Line<'static>> {
    err.map(|err| {
        Line::from(Span::styled(
            format!("⚠ {}", err),
            Style::default().fg(Color::Red),
        ))
    })
}

/// `label: value` line of a form, with a cursor on the focused field
pub(crate) fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::styled(format!("{:>12}: ", label), label_style),
        Span::raw(format!("{}{}", value, cursor)),
    ])
}

/// Style of a list row
pub(crate) fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_view_follows_route() {
        let mut state = AppState::default();
        assert_eq!(active_view(&state).view_id(), ViewId::SignIn);

        state.route = Route::Folder("1".to_string());
        assert_eq!(active_view(&state).view_id(), ViewId::Folder);

        state.route = Route::Torrent("1".to_string(), "t1".to_string());
        assert_eq!(active_view(&state).view_id(), ViewId::Torrent);
    }
}
