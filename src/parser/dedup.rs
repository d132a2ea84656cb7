use std::collections::HashSet;

use crate::channel::Channel;

/// Keep the first entry for each (name, url) pair, in order.
pub fn dedup(channels: Vec<Channel>) -> Vec<Channel> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(channels.len());

    for channel in channels {
        let (name, url) = channel.identity_key();
        if seen.insert((name.to_owned(), url.to_owned())) {
            unique.push(channel);
        }
    }

    unique
}
