//! Tag-extractor helpers: video id extraction and tag list shaping

/// Maximum number of tags returned from a generated list
pub const MAX_TAGS: usize = 20;

/// Returned when the metadata lookup answers with a non-success status
pub const FALLBACK_TAGS: [&str; 15] = [
    "youtube",
    "video",
    "content",
    "creator",
    "viral",
    "trending",
    "2024",
    "tips",
    "tutorial",
    "howto",
    "guide",
    "education",
    "entertainment",
    "funny",
    "lifehacks",
];

pub fn fallback_tags() -> Vec<String> {
    FALLBACK_TAGS.iter().map(ToString::to_string).collect()
}

/// Extract a video id from a watch URL (`v=` parameter, cut at `&`) or a
/// short link (segment after `youtu.be/`, cut at `?`).
///
/// The `v=` form is tried first; an empty id counts as no match.
pub fn extract_video_id(url: &str) -> Option<&str> {
    let from_query = url
        .split("v=")
        .nth(1)
        .and_then(|rest| rest.split('&').next());
    let from_short_link = || {
        url.split("youtu.be/")
            .nth(1)
            .and_then(|rest| rest.split('?').next())
    };

    from_query
        .filter(|id| !id.is_empty())
        .or_else(|| from_short_link().filter(|id| !id.is_empty()))
}

/// Strip a leading `"<digits>."` marker plus the whitespace after it.
fn strip_ordinal(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    line[digits..]
        .strip_prefix('.')
        .map_or(line, str::trim_start)
}

/// Turn generated text into a tag list: one tag per non-blank line, list
/// numbering removed, at most [`MAX_TAGS`] entries.
pub fn parse_generated_tags(text: &str) -> Vec<String> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| strip_ordinal(line).trim().to_string())
        .take(MAX_TAGS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123&t=5"),
            Some("abc123")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_from_short_link() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=30"), Some("dQw4w9WgXcQ"));
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_extract_rejects_non_video_urls() {
        assert_eq!(extract_video_id("https://not-a-video-url.com"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v="), None);
        assert_eq!(extract_video_id("https://youtu.be/"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_empty_query_id_falls_back_to_short_link() {
        assert_eq!(extract_video_id("https://youtu.be/xyz789?v=&si=1"), Some("xyz789"));
    }

    #[test]
    fn test_parse_numbered_list() {
        let tags = parse_generated_tags("1. rust\n2. programming\n\n3.  systems\n");
        assert_eq!(tags, vec!["rust", "programming", "systems"]);
    }

    #[test]
    fn test_parse_keeps_unnumbered_lines() {
        let tags = parse_generated_tags("rust lang\r\n  - cargo\n2024 update\n10 tips");
        assert_eq!(tags, vec!["rust lang", "- cargo", "2024 update", "10 tips"]);
    }

    #[test]
    fn test_parse_indented_numbers_are_kept() {
        // Only a marker at the very start of the line counts
        let tags = parse_generated_tags("  1. indented");
        assert_eq!(tags, vec!["1. indented"]);
    }

    #[test]
    fn test_parse_truncates_to_twenty() {
        let text: String = (1..=30).map(|i| format!("{i}. tag{i}\n")).collect();
        let tags = parse_generated_tags(&text);
        assert_eq!(tags.len(), MAX_TAGS);
        assert_eq!(tags.first().map(String::as_str), Some("tag1"));
        assert_eq!(tags.last().map(String::as_str), Some("tag20"));
    }

    #[test]
    fn test_fallback_tags() {
        let tags = fallback_tags();
        assert_eq!(tags.len(), 15);
        assert_eq!(tags[0], "youtube");
        assert_eq!(tags[14], "lifehacks");
    }
}
