pub mod dedup;
pub mod dom;
pub mod payload;
pub mod signed_out;
pub mod structured;

use tracing::info;

use crate::channel::Channel;

/// Embedded payload first, anchor scraping when the payload yields nothing.
pub fn extract_channels(html: &str) -> Vec<Channel> {
    let initial_data = payload::locate(html);
    let from_payload = structured::extract(initial_data.as_ref());
    if !from_payload.is_empty() {
        info!("Extracted {} channels from ytInitialData", from_payload.len());
        return from_payload;
    }

    let from_dom = dom::extract(html);
    info!("Payload had no channels, DOM fallback found {}", from_dom.len());
    from_dom
}
