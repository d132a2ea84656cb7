use crate::channel::Channel;
use crate::session::{LoadState, Surface};
use crate::util::truncate;

pub const LOADING_TEXT: &str = "Loading subscriptions...";

/// What to show instead of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub title: &'static str,
    pub body: &'static str,
    /// Whether the login / open-feed actions are offered.
    pub show_actions: bool,
}

impl EmptyState {
    pub fn sign_in(surface: Surface) -> Self {
        Self {
            title: "Please sign in to YouTube to load subscriptions.",
            body: match surface {
                Surface::Popup => "Open YouTube and sign in, then click Refresh.",
                Surface::Overlay => "Open YouTube and sign in, then open the overlay again.",
            },
            show_actions: true,
        }
    }

    pub fn unrecognized(surface: Surface) -> Self {
        Self {
            title: "Unable to find subscriptions.",
            body: match surface {
                Surface::Popup => {
                    "YouTube may have updated the page. Try Refresh or open the subscriptions feed."
                }
                Surface::Overlay => {
                    "YouTube may have updated the page. Reopen the overlay or open the subscriptions feed."
                }
            },
            show_actions: true,
        }
    }

    pub fn no_match() -> Self {
        Self {
            title: "No channels match your search.",
            body: "Try a different search.",
            show_actions: false,
        }
    }
}

pub enum View<'a> {
    Loading,
    List(&'a [Channel]),
    Empty(EmptyState),
}

/// Map a pipeline state to what the surface displays.
/// Network failures get the same sign-in prompt as a signed-out page.
pub fn for_state(state: &LoadState, surface: Surface) -> View<'_> {
    match state {
        LoadState::Idle | LoadState::Loading => View::Loading,
        LoadState::Loaded { channels, .. } => list_or_sign_in(channels, surface),
        LoadState::SignedOut | LoadState::Failed(_) => View::Empty(EmptyState::sign_in(surface)),
        LoadState::Unrecognized => View::Empty(EmptyState::unrecognized(surface)),
    }
}

/// View for a search over loaded channels.
pub fn for_search<'a>(query: &str, all: &'a [Channel], hits: &'a [Channel], surface: Surface) -> View<'a> {
    if query.trim().is_empty() {
        return list_or_sign_in(all, surface);
    }
    if hits.is_empty() {
        return View::Empty(EmptyState::no_match());
    }
    View::List(hits)
}

fn list_or_sign_in(channels: &[Channel], surface: Surface) -> View<'_> {
    if channels.is_empty() {
        View::Empty(EmptyState::sign_in(surface))
    } else {
        View::List(channels)
    }
}

pub fn render(view: &View<'_>, limit: usize) -> String {
    match view {
        View::Loading => LOADING_TEXT.to_string(),
        View::Empty(empty) => format!("{}\n{}", empty.title, empty.body),
        View::List(channels) => render_table(channels, limit),
    }
}

fn render_table(channels: &[Channel], limit: usize) -> String {
    let mut out = format!("{:>4} | {:<32} | {}\n", "#", "Channel", "URL");
    out.push_str(&"-".repeat(80));
    out.push('\n');

    for (i, c) in channels.iter().take(limit).enumerate() {
        out.push_str(&format!("{:>4} | {:<32} | {}\n", i + 1, truncate(&c.name, 32), c.link()));
    }

    if channels.len() > limit {
        out.push_str(&format!("... {} more\n", channels.len() - limit));
    }
    out.push_str(&format!("\n{} channels", channels.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::session::Source;

    fn channels() -> Vec<Channel> {
        vec![
            Channel::new("Foo", "/channel/abc", "y.jpg").unwrap(),
            Channel::new("Bar", "https://www.youtube.com/@bar", "").unwrap(),
        ]
    }

    #[test]
    fn failure_looks_like_signed_out() {
        let failed = LoadState::Failed(FetchError::Status(403));
        let View::Empty(a) = for_state(&failed, Surface::Popup) else { panic!("expected empty") };
        let View::Empty(b) = for_state(&LoadState::SignedOut, Surface::Popup) else {
            panic!("expected empty")
        };
        assert_eq!(a, b);
        assert!(a.show_actions);
    }

    #[test]
    fn bodies_differ_per_surface() {
        assert_ne!(EmptyState::sign_in(Surface::Popup).body, EmptyState::sign_in(Surface::Overlay).body);
        assert_eq!(
            EmptyState::unrecognized(Surface::Overlay).title,
            "Unable to find subscriptions."
        );
    }

    #[test]
    fn loaded_renders_list() {
        let state = LoadState::Loaded {
            channels: channels(),
            source: Source::Live,
        };
        let view = for_state(&state, Surface::Overlay);
        assert!(matches!(view, View::List(list) if list.len() == 2));

        let text = render(&view, 50);
        assert!(text.contains("https://www.youtube.com/channel/abc"));
        assert!(text.contains("https://www.youtube.com/@bar"));
        assert!(text.ends_with("2 channels"));
    }

    #[test]
    fn limit_truncates_table() {
        let list = channels();
        let text = render(&View::List(&list), 1);
        assert!(text.contains("Foo"));
        assert!(!text.contains("| Bar"));
        assert!(text.contains("... 1 more"));
    }

    #[test]
    fn search_views() {
        let all = channels();
        let none: Vec<Channel> = Vec::new();
        let view = for_search("zzz", &all, &none, Surface::Popup);
        assert!(matches!(view, View::Empty(e) if e == EmptyState::no_match() && !e.show_actions));

        let view = for_search("  ", &all, &none, Surface::Popup);
        assert!(matches!(view, View::List(list) if list.len() == 2));
    }

    #[test]
    fn loading_text() {
        assert_eq!(render(&for_state(&LoadState::Loading, Surface::Popup), 10), LOADING_TEXT);
    }
}
