const MARKERS: &[&str] = &["Sign in", "ServiceLogin", "accounts.google.com"];

/// Heuristic: the page was served without a session if every marker shows up.
pub fn detect(html: &str) -> bool {
    MARKERS.iter().all(|m| html.contains(m))
}
