use crate::state::{AppState, SignInField};
use crate::views::{error_line, field_line, View, ViewId};
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct SignInView;

impl View for SignInView {
    fn view_id(&self) -> ViewId {
        ViewId::SignIn
    }

    fn title(&self, _state: &AppState) -> String {
        "Sign in".to_string()
    }

    fn hints(&self, _state: &AppState) -> &'static str {
        "Tab next field · Enter sign in · Ctrl+S sign up · Ctrl+C quit"
    }

    fn render(&self, state: &AppState, area: Rect, f: &mut Frame) {
        let form = &state.ui.signin;
        let masked = "•".repeat(form.password.chars().count());

        let mut lines = vec![
            Line::from(""),
            field_line("Email", &form.email, form.field == SignInField::Email),
            field_line("Password", &masked, form.field == SignInField::Password),
            Line::from(""),
        ];
        lines.extend(error_line(state.auth.err.as_deref()));

        let block = Block::default().borders(Borders::ALL).title(" tormgr ");
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
