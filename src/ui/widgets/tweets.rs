use crate::api::Tweet;
use crate::feed::FeedSnapshot;
use crate::session::Session;
use crate::timefmt::date_ago;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const COMPOSER_PLACEHOLDER: &str = "What is happening?!";

/// Everything the feed view needs for one frame.
pub struct FeedView<'a> {
    pub title: &'a str,
    pub snapshot: &'a FeedSnapshot,
    pub session: &'a Session,
    pub composer: &'a str,
    pub composing: bool,
    pub selected: usize,
}

pub fn render(frame: &mut Frame, area: Rect, view: &FeedView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], view);
    render_composer(frame, chunks[1], view);
    render_tweets(frame, chunks[2], view);
    render_footer(frame, chunks[3], view);
}

fn render_header(frame: &mut Frame, area: Rect, view: &FeedView) {
    let status = match (view.session.is_authenticated(), view.session.display_name()) {
        (true, Some(name)) => Span::styled(
            format!("signed in as {}", name),
            Style::default().fg(Color::Green),
        ),
        (true, None) => Span::styled("signed in", Style::default().fg(Color::Green)),
        (false, _) => Span::styled("not signed in", Style::default().fg(Color::DarkGray)),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", view.title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        status,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_composer(frame: &mut Frame, area: Rect, view: &FeedView) {
    let border_style = if view.composing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Post ");

    let text = if view.composer.is_empty() && !view.composing {
        Line::from(Span::styled(
            COMPOSER_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else if view.composing {
        Line::from(vec![
            Span::raw(view.composer),
            Span::styled("_", Style::default().fg(Color::Cyan)),
        ])
    } else {
        Line::from(view.composer)
    };

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_tweets(frame: &mut Frame, area: Rect, view: &FeedView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ({}) ", view.title, view.snapshot.tweets.len()));

    if view.snapshot.loading {
        let loading = List::new(vec![ListItem::new("Loading tweets...")]).block(block);
        frame.render_widget(loading, area);
        return;
    }

    if view.snapshot.tweets.is_empty() {
        let empty = List::new(vec![ListItem::new(Span::styled(
            "No tweets available.",
            Style::default().fg(Color::Gray),
        ))])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Borders plus the two-space indent of the content lines.
    let wrap_width = (area.width as usize).saturating_sub(6).max(10);
    let items: Vec<ListItem> = view
        .snapshot
        .tweets
        .iter()
        .map(|tweet| tweet_item(tweet, wrap_width))
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(Some(view.selected.min(view.snapshot.tweets.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn tweet_item(tweet: &Tweet, wrap_width: usize) -> ListItem<'static> {
    let mut meta = vec![Span::styled(
        tweet.author().to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(created_at) = tweet.created_at {
        meta.push(Span::styled(
            format!("  {}", date_ago(created_at)),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(meta)];
    for chunk in textwrap::wrap(&tweet.content, wrap_width) {
        lines.push(Line::from(format!("  {}", chunk)));
    }
    lines.push(Line::from(""));

    ListItem::new(lines)
}

fn render_footer(frame: &mut Frame, area: Rect, view: &FeedView) {
    let hint = if view.composing {
        "Enter post | Esc leave".to_string()
    } else {
        let like = if view.session.is_authenticated() {
            "Like Tweet"
        } else {
            "Login to Like Tweet"
        };
        format!("t compose | l {} | r refresh | j/k move | q quit", like)
    };

    let footer = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)));
    frame.render_widget(footer, area);
}
