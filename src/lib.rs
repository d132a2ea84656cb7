//! Subscription list extraction for the YouTube channels feed.
//!
//! The pipeline fetches the signed-in feed page, reads channels out of the
//! embedded `ytInitialData` payload (falling back to scraping channel anchors),
//! and classifies empty results as signed-out or unrecognized.

pub mod cache;
pub mod channel;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod session;
pub mod util;
pub mod view;

pub use crate::channel::{filter_channels, normalize_url, Channel};
pub use crate::config::Settings;
pub use crate::session::{LoadState, Session, Source, Surface};
