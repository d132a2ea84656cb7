use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::dedup;
use crate::channel::Channel;

static CHANNEL_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/channel/"], a[href^="/@"]"#).unwrap());
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// Scrape channel anchors from the raw page.
pub fn extract(html: &str) -> Vec<Channel> {
    let document = Html::parse_document(html);

    let channels = document
        .select(&CHANNEL_LINK)
        .filter_map(|anchor| {
            let name = anchor.text().collect::<String>();
            let url = anchor.value().attr("href").unwrap_or_default();
            let avatar = anchor
                .select(&IMAGE)
                .next()
                .and_then(|img| img.value().attr("src"))
                .unwrap_or_default();
            Channel::new(name.trim(), url, avatar)
        })
        .collect();

    dedup::dedup(channels)
}
