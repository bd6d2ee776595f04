//! Share link validation
//!
//! The check is a case-insensitive substring match against the provider's
//! known domains, not host parsing. Redirector and shortened forms that
//! mention one of the domains anywhere in the string are accepted.

use url::Url;

/// Domains the provider issues share links on
pub const ALLOWED_DOMAINS: [&str; 4] = [
    "terabox.com",
    "terasharelink.com",
    "teraboxapp.com",
    "1024tera.com",
];

/// Returns true when `link` mentions one of [`ALLOWED_DOMAINS`]
pub fn is_supported_link(link: &str) -> bool {
    let link = link.trim();
    if link.is_empty() {
        return false;
    }

    let lowered = link.to_ascii_lowercase();
    ALLOWED_DOMAINS
        .iter()
        .any(|domain| lowered.contains(domain))
}

/// Extracts the share id from `/s/<id>` paths or a `surl` query parameter
pub fn share_id(link: &str) -> Option<String> {
    let parsed = Url::parse(link.trim()).ok()?;

    if let Some((_, surl)) = parsed.query_pairs().find(|(key, _)| key == "surl") {
        if !surl.is_empty() {
            return Some(surl.into_owned());
        }
    }

    let mut segments = parsed.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment == "s" {
            return segments
                .next()
                .filter(|id| !id.is_empty())
                .map(str::to_owned);
        }
    }

    None
}
