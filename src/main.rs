use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tweetfeed::api::{HttpTweetService, TweetService};
use tweetfeed::app::App;
use tweetfeed::config::Config;
use tweetfeed::feed::TweetFeed;
use tweetfeed::logging;
use tweetfeed::notify::{ChannelNotifier, Level, RecordingNotifier};
use tweetfeed::session::{
    LocalStore, LocalStoreSessionProvider, Session, SessionProvider, StaticSessionProvider,
};
use tweetfeed::timefmt::date_ago;

#[derive(Parser, Debug)]
#[command(name = "tweetfeed")]
#[command(about = "Read, post and like tweets from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API base URL, overrides the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Access token to use instead of the stored session
    #[arg(long)]
    token: Option<String>,

    /// Log filter, e.g. "debug" or "tweetfeed=trace"
    #[arg(long)]
    log_level: Option<String>,

    /// Fetch the feed once, print it and exit
    #[arg(long)]
    print: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    if cli.init_config {
        Config::write_default(&config_path)?;
        println!("Wrote default config to {}", config_path.display());
        return Ok(());
    }

    let mut config = Config::load(&config_path)?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    logging::init(&config.log, cli.log_level.as_deref())?;
    tracing::info!(base_url = %config.api.base_url, "starting tweetfeed");

    let sessions: Box<dyn SessionProvider> = match cli.token {
        Some(token) => Box::new(StaticSessionProvider::new(Session::with_token(token))),
        None => Box::new(LocalStoreSessionProvider::new(
            LocalStore::new(config.session.store_path.clone()),
            config.session.key.clone(),
        )),
    };
    let service: Arc<dyn TweetService> = Arc::new(HttpTweetService::new(&config.api));

    if cli.print {
        return print_feed(service, sessions.as_ref()).await;
    }

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let feed = TweetFeed::with_reloading_store(
        service,
        Arc::new(ChannelNotifier::new(tx)),
        sessions.as_ref(),
    );
    let app = App::new(feed, rx, &config.ui);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    result
}

async fn print_feed(service: Arc<dyn TweetService>, sessions: &dyn SessionProvider) -> Result<()> {
    let notifier = Arc::new(RecordingNotifier::new());
    let feed = TweetFeed::with_reloading_store(service, notifier.clone(), sessions);

    let loaded = feed.load_feed().await;
    for notification in notifier.take() {
        if notification.level == Level::Error {
            eprintln!("{}", notification.message);
        }
    }
    let tweets = loaded?;

    if tweets.is_empty() {
        println!("No tweets available.");
    }
    for tweet in &tweets {
        let when = tweet.created_at.map(date_ago).unwrap_or_default();
        println!("{}  {}", tweet.author(), when);
        println!("  {}", tweet.content);
        println!();
    }

    Ok(())
}
