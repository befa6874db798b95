//! Status Bar Widget
//!
//! Renders the status bar at the bottom of the screen.
//! Format: `[timestamp] emoji message        ⏳ pending… [source]`

use crate::view_models::StatusBarViewModel;
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

/// Widget for rendering the status bar
pub struct StatusBarWidget<'a>(pub &'a StatusBarViewModel);

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let vm = self.0;

        if area.height < 1 || area.width < 4 {
            return;
        }

        buf.set_style(area, Style::default());

        // Right side: pending operations, then source
        let mut right = String::new();
        if let Some(pending) = &vm.pending {
            right.push_str(pending);
            right.push(' ');
        }
        if !vm.source.is_empty() {
            right.push_str(&format!("[{}]", vm.source));
        }
        let right_width = u16::try_from(right.chars().count()).unwrap_or(u16::MAX);

        let mut x = area.x + 1; // 1 char padding

        if !vm.timestamp.is_empty() {
            let ts = format!("[{}] ", vm.timestamp);
            buf.set_string(x, area.y, &ts, vm.metadata_style);
            x = x.saturating_add(u16::try_from(ts.len()).unwrap_or(u16::MAX));
        }

        buf.set_string(x, area.y, format!("{} ", vm.emoji), vm.message_style);
        x = x.saturating_add(3); // emoji typically renders as 2 cells

        let available = area
            .width
            .saturating_sub((x - area.x).saturating_add(right_width).saturating_add(2))
            as usize;
        if vm.message.chars().count() > available {
            let truncated: String = vm.message.chars().take(available.saturating_sub(1)).collect();
            buf.set_string(x, area.y, format!("{}…", truncated), vm.message_style);
        } else {
            buf.set_string(x, area.y, &vm.message, vm.message_style);
        }

        if right_width > 0 && right_width.saturating_add(1) < area.width {
            let right_x = area.x + area.width - right_width - 1;
            buf.set_string(right_x, area.y, &right, vm.metadata_style);
        }
    }
}
