use serde::{Deserialize, Serialize};

pub const ORIGIN: &str = "https://www.youtube.com";

/// A subscribed channel as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    /// Raw link as found in the page; may be relative.
    pub url: String,
    pub avatar: String,
}

impl Channel {
    /// Build an entry, rejecting anything without a name or a link.
    pub fn new(name: impl Into<String>, url: impl Into<String>, avatar: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let url = url.into();
        if name.is_empty() || url.is_empty() {
            return None;
        }
        Some(Self {
            name,
            url,
            avatar: avatar.into(),
        })
    }

    pub fn identity_key(&self) -> (&str, &str) {
        (&self.name, &self.url)
    }

    pub fn link(&self) -> String {
        normalize_url(&self.url)
    }
}

pub fn normalize_url(url: &str) -> String {
    if url.is_empty() || url.starts_with("http") {
        return url.to_string();
    }
    format!("{}{}", ORIGIN, url)
}

/// Case-insensitive substring match on channel names.
pub fn filter_channels(query: &str, source: &[Channel]) -> Vec<Channel> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return source.to_vec();
    }
    source
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
