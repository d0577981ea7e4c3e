//! Filename exclusion rules and entry-file validation.

use std::path::Path;
use tracing::warn;

/// Characters that must not appear anywhere in a synced file's relative path.
pub const DISALLOWED_CHARS: &[char] = &['@', '#'];

/// Returns the first disallowed character found in `rel_path`, if any.
pub fn disallowed_char(rel_path: &str) -> Option<char> {
    rel_path.chars().find(|c| DISALLOWED_CHARS.contains(c))
}

/// The entry file expected at the sync root for a given service.
pub fn entry_file(service: &str) -> &'static str {
    match service {
        "nodejs" => "handler.js",
        _ => "index.html",
    }
}

/// Warns when the designated entry file is missing from the sync root.
/// The publish still proceeds; the warning flags a likely broken deployment.
pub fn check_entry_file(root: &Path, service: &str) {
    let expected = entry_file(service);
    if !root.join(expected).exists() {
        warn!("the root folder doesn't have {expected} and the web app may not be available");
    }
}
