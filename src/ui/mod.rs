pub mod widgets;

use crate::app::{App, Mode};
use ratatui::Frame;
use widgets::tweets::FeedView;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let snapshot = app.feed.snapshot();
    let composer = app.feed.composer_text();

    let view = FeedView {
        title: &app.title,
        snapshot: &snapshot,
        session: app.feed.session(),
        composer: &composer,
        composing: app.mode == Mode::Compose,
        selected: app.selected(),
    };

    widgets::tweets::render(frame, area, &view);
    widgets::toast::render(frame, area, app.toasts.iter());
}
