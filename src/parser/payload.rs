use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

static INITIAL_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)ytInitialData\s*=\s*(\{.*?\});").unwrap());

/// Find and decode the `ytInitialData = {...};` assignment.
///
/// The capture stops at the first `};`, so a payload containing that sequence
/// inside a string is cut short and fails to decode.
pub fn locate(html: &str) -> Option<Value> {
    let Some(caps) = INITIAL_DATA_RE.captures(html) else {
        debug!("No ytInitialData assignment in page");
        return None;
    };

    match serde_json::from_str(&caps[1]) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("ytInitialData present but failed to decode: {}", e);
            None
        }
    }
}
