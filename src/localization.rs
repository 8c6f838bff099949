//! Language-specific heading and numbering conventions.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^heading\s*(\d+)$").expect("valid heading regex"));

static KOREAN_HEADING_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^제목\s*(\d+)$").expect("valid korean heading regex"));

static KOREAN_ARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^제\s*\d+\s*조\.?$").expect("valid article regex"));

/// Strategy for handling language-specific formatting conventions.
pub trait LocalizationStrategy: Send + Sync {
    /// Returns a heading prefix when a list marker really denotes a heading
    /// (e.g. `제1조` in Korean statutes).
    fn heading_for_marker(&self, marker: &str) -> Option<String>;

    /// Heading level encoded in a paragraph style id, if any.
    fn heading_level(&self, style_id: &str) -> Option<usize>;
}

fn common_heading_level(style_id: &str) -> Option<usize> {
    let style_id = style_id.trim();
    if let Some(caps) = HEADING_STYLE.captures(style_id) {
        return caps[1].parse().ok().filter(|level| (1..=6).contains(level));
    }
    match style_id.to_lowercase().as_str() {
        "title" => Some(1),
        "subtitle" => Some(2),
        _ => None,
    }
}

/// Pass-through strategy: English heading styles, no marker rewriting.
pub struct DefaultLocalization;

impl LocalizationStrategy for DefaultLocalization {
    fn heading_for_marker(&self, _marker: &str) -> Option<String> {
        None
    }

    fn heading_level(&self, style_id: &str) -> Option<usize> {
        common_heading_level(style_id)
    }
}

/// Korean strategy: understands `제목 N` styles and `제N조` article markers.
pub struct KoreanLocalization;

impl LocalizationStrategy for KoreanLocalization {
    fn heading_for_marker(&self, marker: &str) -> Option<String> {
        if KOREAN_ARTICLE.is_match(marker) {
            // Articles sit under chapter headings.
            return Some(format!("### {}", marker.trim_end_matches('.')));
        }
        None
    }

    fn heading_level(&self, style_id: &str) -> Option<usize> {
        if let Some(level) = common_heading_level(style_id) {
            return Some(level);
        }
        KOREAN_HEADING_STYLE
            .captures(style_id.trim())
            .and_then(|caps| caps[1].parse().ok())
            .filter(|level| (1..=6).contains(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_heading_levels() {
        let l = DefaultLocalization;
        assert_eq!(l.heading_level("Heading1"), Some(1));
        assert_eq!(l.heading_level("heading 3"), Some(3));
        assert_eq!(l.heading_level("Title"), Some(1));
        assert_eq!(l.heading_level("Subtitle"), Some(2));
        assert_eq!(l.heading_level("Heading9"), None);
        assert_eq!(l.heading_level("BodyText"), None);
        assert_eq!(l.heading_level("제목 2"), None);
    }

    #[test]
    fn test_korean_heading_levels() {
        let l = KoreanLocalization;
        assert_eq!(l.heading_level("제목 2"), Some(2));
        assert_eq!(l.heading_level("제목1"), Some(1));
        assert_eq!(l.heading_level("Heading4"), Some(4));
    }

    #[test]
    fn test_korean_article_marker() {
        let l = KoreanLocalization;
        assert_eq!(l.heading_for_marker("제3조."), Some("### 제3조".to_string()));
        assert_eq!(l.heading_for_marker("제12조"), Some("### 제12조".to_string()));
        assert_eq!(l.heading_for_marker("1."), None);
        assert_eq!(DefaultLocalization.heading_for_marker("제3조"), None);
    }
}
