use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tracing::warn;
use yt_subs::cache::{self, ResultCache};
use yt_subs::fetcher::HttpFetcher;
use yt_subs::session::{LinkDisposition, Links};
use yt_subs::util::format_duration;
use yt_subs::view::{self, LOADING_TEXT};
use yt_subs::{LoadState, Session, Settings, Surface};

#[derive(Parser)]
#[command(name = "yt_subs", about = "Browse your YouTube subscriptions from the terminal")]
struct Cli {
    /// Settings file (TOML); YT_SUBS_* variables override it
    #[arg(short, long, default_value = "yt_subs.toml")]
    config: PathBuf,

    /// Which host surface policy to run
    #[arg(short, long, value_enum, default_value = "popup")]
    surface: Surface,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and list subscriptions
    List {
        /// Skip the cache and fetch the feed
        #[arg(short, long)]
        refresh: bool,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Load subscriptions and filter them by name
    Search {
        query: String,
        #[arg(short, long)]
        refresh: bool,
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show the cached slot
    Cache,
    /// Print the sign-in link
    Login,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(Some(cli.config.as_path()))?;

    match cli.command {
        Commands::List { refresh, limit } => {
            let mut session = open_session(&settings, cli.surface)?;
            let state = load_with_spinner(&mut session, refresh).await;
            println!("{}", view::render(&view::for_state(&state, session.surface()), limit));
            print_actions(&session, &state);
            Ok(())
        }
        Commands::Search { query, refresh, limit } => {
            let mut session = open_session(&settings, cli.surface)?;
            let state = load_with_spinner(&mut session, refresh).await;
            if !matches!(state, LoadState::Loaded { .. }) {
                println!("{}", view::render(&view::for_state(&state, session.surface()), limit));
                print_actions(&session, &state);
                return Ok(());
            }
            let hits = session.search(&query);
            let v = view::for_search(&query, session.channels(), &hits, session.surface());
            println!("{}", view::render(&v, limit));
            Ok(())
        }
        Commands::Cache => {
            let cache = ResultCache::open(&settings.cache_path, settings.cache_ttl_ms)?;
            match cache.entry()? {
                None => println!("Cache is empty ({:?})", settings.cache_path),
                Some(entry) => {
                    let age = entry.age_ms(cache::now_ms()).max(0);
                    let fresh = age <= cache.ttl_ms();
                    println!("Path:     {:?}", settings.cache_path);
                    println!("Channels: {}", entry.data.len());
                    println!("Age:      {}", format_duration(Duration::from_millis(age as u64)));
                    println!("Status:   {}", if fresh { "fresh" } else { "expired" });
                }
            }
            Ok(())
        }
        Commands::Login => {
            print_link("Sign in", &settings.login_url, cli.surface.link_disposition());
            Ok(())
        }
    }
}

fn open_session(settings: &Settings, surface: Surface) -> Result<Session<HttpFetcher>> {
    let fetcher = HttpFetcher::new(&settings.feed_url, settings.cookie.as_deref())?;
    let session = if surface.uses_cache() {
        let cache = ResultCache::open(&settings.cache_path, settings.cache_ttl_ms)?;
        Session::popup(fetcher, cache)
    } else {
        Session::overlay(fetcher)
    };
    Ok(session.with_links(Links::from(settings)))
}

async fn load_with_spinner(session: &mut Session<HttpFetcher>, refresh: bool) -> LoadState {
    let rx = session.subscribe();
    let spinner = tokio::spawn(show_spinner(rx));
    let state = session.load_subscriptions(refresh).await;
    if let Err(e) = spinner.await {
        warn!("Loading spinner task failed: {}", e);
    }
    state
}

async fn show_spinner(mut rx: watch::Receiver<LoadState>) {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }

    while rx.changed().await.is_ok() {
        if rx.borrow_and_update().is_terminal() {
            break;
        }
        pb.set_message(LOADING_TEXT);
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb.finish_and_clear();
}

fn print_actions(session: &Session<HttpFetcher>, state: &LoadState) {
    if let view::View::Empty(empty) = view::for_state(state, session.surface()) {
        if empty.show_actions {
            let login = session.login_action();
            let feed = session.open_feed_action();
            print_link("Sign in", &login.url, login.disposition);
            print_link("Open feed", &feed.url, feed.disposition);
        }
    }
}

fn print_link(label: &str, url: &str, disposition: LinkDisposition) {
    let how = match disposition {
        LinkDisposition::NewTab => "new tab",
        LinkDisposition::External => "external window",
    };
    println!("{:<10} {} ({})", format!("{}:", label), url, how);
}
