use tokio::sync::watch;
use tracing::{info, warn};

use crate::cache::ResultCache;
use crate::channel::{filter_channels, normalize_url, Channel};
use crate::config::{Settings, FEED_URL, LOGIN_URL};
use crate::fetcher::{FeedFetcher, FetchError};
use crate::parser;

/// The two host surfaces sharing one pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Surface {
    /// Cached for 30 minutes, links open in a new tab.
    Popup,
    /// Always live, links open in an external window.
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDisposition {
    NewTab,
    External,
}

impl Surface {
    pub fn uses_cache(self) -> bool {
        matches!(self, Surface::Popup)
    }

    pub fn link_disposition(self) -> LinkDisposition {
        match self {
            Surface::Popup => LinkDisposition::NewTab,
            Surface::Overlay => LinkDisposition::External,
        }
    }
}

/// A link the caller should open, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAction {
    pub url: String,
    pub disposition: LinkDisposition,
}

/// Where the sign-in and open-feed actions point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    pub feed_url: String,
    pub login_url: String,
}

impl Default for Links {
    fn default() -> Self {
        Self {
            feed_url: FEED_URL.to_string(),
            login_url: LOGIN_URL.to_string(),
        }
    }
}

impl From<&Settings> for Links {
    fn from(settings: &Settings) -> Self {
        Self {
            feed_url: settings.feed_url.clone(),
            login_url: settings.login_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Live,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded { channels: Vec<Channel>, source: Source },
    SignedOut,
    Unrecognized,
    Failed(FetchError),
}

impl LoadState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadState::Idle | LoadState::Loading)
    }
}

/// Everything one surface holds between invocations.
pub struct Session<F> {
    fetcher: F,
    surface: Surface,
    cache: Option<ResultCache>,
    links: Links,
    channels: Vec<Channel>,
    state: watch::Sender<LoadState>,
}

impl<F: FeedFetcher> Session<F> {
    pub fn popup(fetcher: F, cache: ResultCache) -> Self {
        Self::new(fetcher, Surface::Popup, Some(cache))
    }

    pub fn overlay(fetcher: F) -> Self {
        Self::new(fetcher, Surface::Overlay, None)
    }

    fn new(fetcher: F, surface: Surface, cache: Option<ResultCache>) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            fetcher,
            surface,
            cache,
            links: Links::default(),
            channels: Vec::new(),
            state,
        }
    }

    /// Point the sign-in and open-feed actions at configured URLs.
    pub fn with_links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Observe state transitions (`Loading`, then one terminal state).
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Channels from the last successful load.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn cache(&self) -> Option<&ResultCache> {
        self.cache.as_ref()
    }

    pub async fn load_subscriptions(&mut self, force_refresh: bool) -> LoadState {
        self.state.send_replace(LoadState::Loading);
        let outcome = self.run(force_refresh).await;
        if let LoadState::Loaded { channels, .. } = &outcome {
            self.channels = channels.clone();
        }
        self.state.send_replace(outcome.clone());
        outcome
    }

    async fn run(&self, force_refresh: bool) -> LoadState {
        if !force_refresh {
            if let Some(channels) = self.cached() {
                info!("Using {} cached channels", channels.len());
                return LoadState::Loaded {
                    channels,
                    source: Source::Cache,
                };
            }
        }

        let html = match self.fetcher.fetch().await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to load subscriptions: {}", e);
                return LoadState::Failed(e);
            }
        };

        let channels = parser::extract_channels(&html);
        if channels.is_empty() {
            if parser::signed_out::detect(&html) {
                info!("Feed page looks signed out");
                return LoadState::SignedOut;
            }
            warn!("No channels found in feed page ({} bytes)", html.len());
            return LoadState::Unrecognized;
        }

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.write(&channels) {
                warn!("Failed to write subscriptions cache: {:#}", e);
            }
        }

        LoadState::Loaded {
            channels,
            source: Source::Live,
        }
    }

    fn cached(&self) -> Option<Vec<Channel>> {
        let cache = self.cache.as_ref()?;
        match cache.read() {
            Ok(Some(channels)) if !channels.is_empty() => Some(channels),
            Ok(_) => None,
            Err(e) => {
                warn!("Ignoring unreadable subscriptions cache: {:#}", e);
                None
            }
        }
    }

    /// Filter the loaded channels by name.
    pub fn search(&self, query: &str) -> Vec<Channel> {
        filter_channels(query, &self.channels)
    }

    pub fn open_channel(&self, channel: &Channel) -> Option<LinkAction> {
        self.link(&normalize_url(&channel.url))
    }

    pub fn login_action(&self) -> LinkAction {
        LinkAction {
            url: self.links.login_url.clone(),
            disposition: self.surface.link_disposition(),
        }
    }

    pub fn open_feed_action(&self) -> LinkAction {
        LinkAction {
            url: self.links.feed_url.clone(),
            disposition: self.surface.link_disposition(),
        }
    }

    fn link(&self, url: &str) -> Option<LinkAction> {
        if url.is_empty() {
            return None;
        }
        Some(LinkAction {
            url: url.to_string(),
            disposition: self.surface.link_disposition(),
        })
    }
}
