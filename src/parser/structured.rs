use serde_json::{Map, Value};

use super::dedup;
use crate::channel::Channel;

const RENDERER_KEY: &str = "channelRenderer";

/// Pull channel entries out of a decoded `ytInitialData` tree.
pub fn extract(initial_data: Option<&Value>) -> Vec<Channel> {
    let Some(root) = initial_data else {
        return Vec::new();
    };

    let mut channels = Vec::new();
    walk(root, &mut |node| {
        if let Some(Value::Object(renderer)) = node.get(RENDERER_KEY) {
            if let Some(channel) = from_renderer(renderer) {
                channels.push(channel);
            }
        }
    });

    dedup::dedup(channels)
}

/// Depth-first visit of every object in the tree, in document order.
/// Objects are visited before their children.
pub fn walk<'a, F>(node: &'a Value, visit: &mut F)
where
    F: FnMut(&'a Map<String, Value>),
{
    match node {
        Value::Array(items) => {
            for item in items {
                walk(item, visit);
            }
        }
        Value::Object(map) => {
            visit(map);
            for child in map.values() {
                walk(child, visit);
            }
        }
        _ => {}
    }
}

fn from_renderer(renderer: &Map<String, Value>) -> Option<Channel> {
    let name = renderer
        .get("title")
        .and_then(|t| t.get("simpleText"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    let url = renderer
        .get("navigationEndpoint")
        .and_then(|n| n.get("commandMetadata"))
        .and_then(|c| c.get("webCommandMetadata"))
        .and_then(|w| w.get("url"))
        .and_then(Value::as_str)?;

    // thumbnails come smallest first
    let avatar = renderer
        .get("thumbnail")
        .and_then(|t| t.get("thumbnails"))
        .and_then(Value::as_array)
        .and_then(|thumbs| thumbs.last())
        .and_then(|last| last.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    Channel::new(name, url, avatar)
}
