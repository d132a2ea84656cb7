use yt_subs::cache::{ResultCache, DEFAULT_TTL_MS};
use yt_subs::fetcher::{FeedFetcher, FetchError};
use yt_subs::view::{self, EmptyState, View};
use yt_subs::{Channel, LoadState, Session, Source, Surface};

struct FixtureFetcher(Result<String, FetchError>);

impl FixtureFetcher {
    fn page(name: &str) -> Self {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        Self(Ok(html))
    }
}

impl FeedFetcher for FixtureFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        self.0.clone()
    }
}

fn loaded(state: &LoadState) -> &[Channel] {
    match state {
        LoadState::Loaded { channels, .. } => channels,
        other => panic!("expected Loaded, got {:?}", other),
    }
}

#[tokio::test]
async fn signed_in_feed_through_payload() {
    let mut session = Session::overlay(FixtureFetcher::page("feed_signed_in"));
    let state = session.load_subscriptions(false).await;
    let channels = loaded(&state);

    assert_eq!(channels.len(), 3);
    assert_eq!(channels[0].name, "Tom Scott");
    assert_eq!(channels[0].avatar, "//yt3.ggpht.com/tom=s176");
    assert_eq!(channels[2].url, "/channel/UCYO_jab_esuFRV4b17AJtAw");
    assert_eq!(channels[2].avatar, "");
    assert!(channels.iter().all(|c| !c.name.is_empty() && !c.url.is_empty()));
}

#[tokio::test]
async fn dom_only_feed_falls_back() {
    let mut session = Session::overlay(FixtureFetcher::page("feed_dom_only"));
    let state = session.load_subscriptions(false).await;
    let channels = loaded(&state);

    assert_eq!(channels[0], Channel::new("Someone", "/@someone", "p.jpg").unwrap());
    assert_eq!(channels[1].name, "Channel One Two Three");
}

#[tokio::test]
async fn signed_out_feed_prompts_sign_in() {
    let mut session = Session::overlay(FixtureFetcher::page("feed_signed_out"));
    let state = session.load_subscriptions(false).await;
    assert_eq!(state, LoadState::SignedOut);

    let View::Empty(empty) = view::for_state(&state, Surface::Overlay) else {
        panic!("expected empty state")
    };
    assert_eq!(empty, EmptyState::sign_in(Surface::Overlay));
}

#[tokio::test]
async fn forbidden_fetch_fails_but_displays_sign_in() {
    let mut session = Session::overlay(FixtureFetcher(Err(FetchError::Status(403))));
    let state = session.load_subscriptions(false).await;
    assert_eq!(state, LoadState::Failed(FetchError::Status(403)));
    assert!(matches!(
        view::for_state(&state, Surface::Overlay),
        View::Empty(e) if e == EmptyState::sign_in(Surface::Overlay)
    ));
}

#[tokio::test]
async fn popup_caches_then_serves_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.sqlite");

    let cache = ResultCache::open(&path, DEFAULT_TTL_MS).unwrap();
    let mut first = Session::popup(FixtureFetcher::page("feed_signed_in"), cache);
    let live = first.load_subscriptions(false).await;
    assert!(matches!(live, LoadState::Loaded { source: Source::Live, .. }));

    // second process, feed now broken: cache still answers
    let cache = ResultCache::open(&path, DEFAULT_TTL_MS).unwrap();
    let mut second = Session::popup(FixtureFetcher(Err(FetchError::Status(500))), cache);
    let cached = second.load_subscriptions(false).await;
    assert!(matches!(cached, LoadState::Loaded { source: Source::Cache, .. }));
    assert_eq!(loaded(&cached), loaded(&live));

    // forced refresh goes to the network and surfaces the failure
    let refreshed = second.load_subscriptions(true).await;
    assert_eq!(refreshed, LoadState::Failed(FetchError::Status(500)));
}

#[tokio::test]
async fn overlay_never_touches_cache() {
    let mut session = Session::overlay(FixtureFetcher::page("feed_signed_in"));
    session.load_subscriptions(false).await;
    assert!(session.cache().is_none());
}

#[tokio::test]
async fn search_after_load() {
    let mut session = Session::popup(
        FixtureFetcher::page("feed_signed_in"),
        ResultCache::in_memory(DEFAULT_TTL_MS).unwrap(),
    );
    session.load_subscriptions(false).await;

    let hits = session.search("blue");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "3Blue1Brown");
    assert_eq!(session.search("").len(), 3);

    let miss = session.search("nope");
    assert!(matches!(
        view::for_search("nope", session.channels(), &miss, Surface::Popup),
        View::Empty(e) if e == EmptyState::no_match()
    ));
}
