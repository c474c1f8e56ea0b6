use crate::app::Toast;
use crate::notify::Level;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 3;

/// Stacks toasts upward from the bottom-right corner, newest at the bottom.
pub fn render<'a>(
    frame: &mut Frame,
    area: Rect,
    toasts: impl DoubleEndedIterator<Item = &'a Toast>,
) {
    let width = TOAST_WIDTH.min(area.width);
    let mut bottom = area.y + area.height.saturating_sub(1);

    for toast in toasts.rev() {
        if bottom < area.y + TOAST_HEIGHT {
            break;
        }
        let rect = Rect::new(
            area.x + area.width.saturating_sub(width + 1),
            bottom - TOAST_HEIGHT,
            width,
            TOAST_HEIGHT,
        );
        bottom -= TOAST_HEIGHT;

        let color = match toast.notification.level {
            Level::Success => Color::Green,
            Level::Error => Color::Red,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let paragraph = Paragraph::new(toast.notification.message.as_str())
            .block(block)
            .wrap(Wrap { trim: true });

        frame.render_widget(Clear, rect);
        frame.render_widget(paragraph, rect);
    }
}
