use crate::config::UiConfig;
use crate::feed::TweetFeed;
use crate::notify::Notification;
use crate::ui;
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Compose,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

pub struct App {
    pub running: bool,
    pub mode: Mode,
    pub feed: TweetFeed,
    pub selected_index: usize,
    pub toasts: VecDeque<Toast>,
    pub title: String,
    notifications: UnboundedReceiver<Notification>,
    toast_ttl: Duration,
    tick_rate: Duration,
}

impl App {
    pub fn new(
        feed: TweetFeed,
        notifications: UnboundedReceiver<Notification>,
        config: &UiConfig,
    ) -> Self {
        Self {
            running: true,
            mode: Mode::Browse,
            feed,
            selected_index: 0,
            toasts: VecDeque::new(),
            title: config.title.clone(),
            notifications,
            toast_ttl: Duration::from_secs(config.toast_secs),
            tick_rate: Duration::from_millis(config.tick_rate_ms.max(16)),
        }
    }

    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let feed = self.feed.clone();
        tokio::spawn(async move { feed.on_mount().await });

        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(self.tick_rate);

        while self.running {
            terminal.draw(|frame| ui::draw(frame, &self))?;

            tokio::select! {
                _ = ticker.tick() => self.tick(Instant::now()),
                Some(notification) = self.notifications.recv() => {
                    self.push_toast(notification, Instant::now());
                }
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => self.running = false,
                },
            }
        }

        tracing::info!("exiting");
        Ok(())
    }

    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn push_toast(&mut self, notification: Notification, now: Instant) {
        self.toasts.push_back(Toast {
            notification,
            expires_at: now + self.toast_ttl,
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.running = false;
            return;
        }

        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Compose => self.handle_compose_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
            KeyCode::Char('t') | KeyCode::Char('i') => self.mode = Mode::Compose,
            KeyCode::Char('l') => self.toggle_selected(),
            KeyCode::Char('r') => self.spawn_refresh(),
            _ => {}
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        match key.code {
            // Leaving keeps the draft, like an input box losing focus.
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                self.spawn_submit();
            }
            KeyCode::Backspace => self.feed.composer_pop(),
            KeyCode::Char(c) => self.feed.composer_push(c),
            _ => {}
        }
    }

    fn tweet_count(&self) -> usize {
        self.feed.snapshot().tweets.len()
    }

    pub fn selected(&self) -> usize {
        self.selected_index.min(self.tweet_count().saturating_sub(1))
    }

    fn scroll_down(&mut self) {
        let count = self.tweet_count();
        if count > 0 && self.selected_index + 1 < count {
            self.selected_index += 1;
        }
    }

    fn scroll_up(&mut self) {
        self.selected_index = self.selected().saturating_sub(1);
    }

    fn spawn_refresh(&self) {
        let feed = self.feed.clone();
        tokio::spawn(async move { feed.refresh().await });
    }

    fn spawn_submit(&self) {
        let feed = self.feed.clone();
        let text = feed.composer_text();
        tokio::spawn(async move { feed.submit(&text).await });
    }

    fn toggle_selected(&self) {
        let tweets = self.feed.snapshot().tweets;
        let Some(tweet) = tweets.get(self.selected()) else {
            return;
        };
        let feed = self.feed.clone();
        let tweet_id = tweet.id.clone();
        tokio::spawn(async move { feed.toggle(&tweet_id).await });
    }
}
