//! Pattern-based extraction of media URLs and titles from raw page text

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Title reported when neither the upstream nor the page provides one
pub const DEFAULT_TITLE: &str = "TeraBox Video";

/// Direct media URL patterns, in priority order
static VIDEO_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"["']?videoUrl["']?\s*[:=]\s*["']([^"']+)["']"#,
        r#"["']?dlink["']?\s*[:=]\s*["']([^"']+)["']"#,
        r#"["'](https?:[^"'\s]*\.mp4[^"'\s]*)["']"#,
        r#"["']?downloadUrl["']?\s*[:=]\s*["']([^"']+)["']"#,
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("video url pattern is valid"))
    .collect()
});

/// Title patterns, in priority order
static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)<title[^>]*>(.*?)</title>",
        r#"(?is)<meta[^>]+property\s*=\s*["']og:title["'][^>]*content\s*=\s*["']([^"']*)["']"#,
        r#"(?is)<meta[^>]+content\s*=\s*["']([^"']*)["'][^>]*property\s*=\s*["']og:title["']"#,
        r"(?is)<h1[^>]*>(.*?)</h1>",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("title pattern is valid"))
    .collect()
});

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Absolute URL ending in a streamable extension, optionally with a query string
static MEDIA_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>]+?\.(?:mp4|m3u8|webm)(?:\?[^\s"'<>]*)?"#)
        .expect("media url pattern is valid")
});

/// Finds the first direct media URL in `text`
///
/// Patterns are tried in order: `videoUrl` assignment, `dlink` assignment,
/// any quoted `.mp4` URL, `downloadUrl` assignment. A capture is accepted
/// only when it is a valid absolute http(s) URL; otherwise the search moves
/// on to the next capture and then the next pattern.
pub fn find_video_url(text: &str) -> Option<String> {
    VIDEO_URL_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| unescape_json_url(m.as_str()))
            .find(|candidate| is_absolute_url(candidate))
    })
}

/// Finds a human-readable title with tags stripped and common entities
/// decoded, falling back to [`DEFAULT_TITLE`]
pub fn find_title(text: &str) -> String {
    TITLE_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_tags(m.as_str()))
        .find(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Finds an absolute `.mp4`, `.m3u8` or `.webm` URL anywhere in `text`
pub fn find_media_url(text: &str) -> Option<String> {
    let text = text.replace("\\/", "/");
    MEDIA_URL_PATTERN
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .find(|candidate| is_absolute_url(candidate))
}

/// True for syntactically valid absolute http(s) URLs with a host
pub fn is_absolute_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn strip_tags(fragment: &str) -> String {
    html_unescape_basic(&TAG_PATTERN.replace_all(fragment, ""))
        .trim()
        .to_string()
}

// `&amp;` goes last so `&amp;lt;` decodes once
fn html_unescape_basic(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn unescape_json_url(raw: &str) -> String {
    raw.replace("\\/", "/").replace("\\u0026", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_url_prefers_video_url_over_dlink() {
        let html = r#"
            var data = {"dlink": "https://d.example/file?sign=1"};
            var player = {"videoUrl": "https://cdn.example/v.mp4"};
        "#;
        assert_eq!(
            find_video_url(html).as_deref(),
            Some("https://cdn.example/v.mp4")
        );
    }

    #[test]
    fn test_video_url_falls_back_to_dlink() {
        let html = r#"window.config = { dlink: 'https://d.terabox.example/file/abc?fid=1' };"#;
        assert_eq!(
            find_video_url(html).as_deref(),
            Some("https://d.terabox.example/file/abc?fid=1")
        );
    }

    #[test]
    fn test_video_url_skips_invalid_capture() {
        let html = r#"{"videoUrl": "/relative/path.mp4", "dlink": "https://ok.example/f"}"#;
        assert_eq!(find_video_url(html).as_deref(), Some("https://ok.example/f"));
    }

    #[test]
    fn test_video_url_quoted_mp4() {
        let html = r#"<video src="https://media.example/clip.mp4?token=abc"></video>"#;
        assert_eq!(
            find_video_url(html).as_deref(),
            Some("https://media.example/clip.mp4?token=abc")
        );
    }

    #[test]
    fn test_video_url_unescapes_json_slashes() {
        let html = r#"{"downloadUrl":"https:\/\/dl.example\/f\/1?a=1&b=2"}"#;
        assert_eq!(
            find_video_url(html).as_deref(),
            Some("https://dl.example/f/1?a=1&b=2")
        );
    }

    #[test]
    fn test_video_url_none() {
        assert_eq!(find_video_url("<html><body>nothing</body></html>"), None);
    }

    #[test]
    fn test_title_from_title_tag() {
        let html = "<html><head><title>  My <b>Clip</b> </title></head></html>";
        assert_eq!(find_title(html), "My Clip");
    }

    #[test]
    fn test_title_decodes_entities() {
        let html = "<title>Tom &amp; Jerry &quot;S01&quot; &#39;Pilot&#39; &amp;lt;raw&amp;gt;</title>";
        assert_eq!(find_title(html), "Tom & Jerry \"S01\" 'Pilot' &lt;raw&gt;");
    }

    #[test]
    fn test_title_from_og_title() {
        let html = r#"<title></title><meta property="og:title" content="Shared Video">"#;
        assert_eq!(find_title(html), "Shared Video");
    }

    #[test]
    fn test_title_from_h1() {
        let html = "<body><h1 class=\"name\">\n  Holiday.mp4 </h1><h1>Other</h1></body>";
        assert_eq!(find_title(html), "Holiday.mp4");
    }

    #[test]
    fn test_title_falls_back_to_placeholder() {
        assert_eq!(find_title("<body><p>no heading</p></body>"), DEFAULT_TITLE);
    }

    #[test]
    fn test_media_url_extensions() {
        assert_eq!(
            find_media_url("src=https://a.example/v.M3U8 more").as_deref(),
            Some("https://a.example/v.M3U8")
        );
        assert_eq!(
            find_media_url(r#"file: "https://a.example/x.webm?exp=1&sig=2""#).as_deref(),
            Some("https://a.example/x.webm?exp=1&sig=2")
        );
        assert_eq!(find_media_url("https://a.example/page.html"), None);
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://x/y.mp4"));
        assert!(is_absolute_url("http://example.com"));
        assert!(!is_absolute_url("ftp://example.com/file"));
        assert!(!is_absolute_url("/path/only"));
        assert!(!is_absolute_url(""));
    }
}
