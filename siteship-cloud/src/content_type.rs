//! Extension-based content-type routing for uploaded objects.

/// Ordered suffix routing table, evaluated top to bottom. First match wins;
/// anything unmatched falls through to [`DEFAULT_CONTENT_TYPE`].
const ROUTES: &[(&str, &str)] = &[
    (".pdf", "application/pdf"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (".ts", "application/x-typescript"),
    (".jpg", "image/jpg"),
    (".jpeg", "image/jpg"),
    (".bmp", "image/bmp"),
    (".tiff", "image/tiff"),
    (".ico", "image/x-icon"),
    (".gif", "image/gif"),
    (".png", "image/png"),
    (".svg", "image/svg+xml"),
    (".html", "text/html"),
    (".zip", "application/zip"),
];

/// Content type for files whose extension is not in the routing table.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Resolves the content type for a relative path. Matching is
/// case-insensitive: the path is lower-cased before the table is consulted.
pub fn content_type_for(rel_path: &str) -> &'static str {
    let lower = rel_path.to_ascii_lowercase();
    ROUTES
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Builds the remote object key: the destination prefix joined with the
/// relative path, separators normalized to `/` and the extension lower-cased.
pub fn remote_key(prefix: &str, rel_path: &str) -> String {
    let rel = lower_extension(&rel_path.replace('\\', "/"));
    format!("{}/{}", prefix.trim_end_matches('/'), rel)
}

/// Lower-cases the extension of the final path component, leaving dotfiles
/// without a real extension (`.env`) untouched.
fn lower_extension(rel: &str) -> String {
    let name_start = rel.rfind('/').map_or(0, |slash| slash + 1);
    match rel.rfind('.') {
        Some(dot) if dot > name_start => {
            let (head, ext) = rel.split_at(dot);
            format!("{}{}", head, ext.to_ascii_lowercase())
        }
        _ => rel.to_string(),
    }
}
