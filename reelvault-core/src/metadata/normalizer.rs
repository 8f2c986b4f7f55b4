use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Container extensions treated as playable media when scanning a library.
pub const MEDIA_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "webm"];

static BRACKETED_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\(\[]\s*\d{4}\s*[\)\]]").unwrap());

static STANDALONE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

// Quality and release vocabulary stripped from filenames before search.
// Matched on word boundaries so words that merely contain a tag survive.
static RELEASE_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(720p|1080p|2160p|4K|HDR|SDR|LATINO|ES|ENG|DUAL AUDIO|SUB|VOSE|DVDRip|BRRip|WEB[ -]?DL|BluRay|x264|x265|xvid|DTS|AC3|HDTV|AAC)\b",
    )
    .unwrap()
});

static CONTAINER_TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(mp4|mkv|avi|webm)\b").unwrap());

/// Returns true when the file name carries one of the supported media extensions.
pub fn has_media_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MEDIA_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// Reduce a raw media file name to a search-friendly title.
///
/// Strips the extension, turns separator characters into spaces, removes
/// year markers and the release-tag vocabulary, and collapses whitespace.
/// The result can be empty when the name consists only of tags.
pub fn clean_title(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name);

    let mut cleaned = stem.replace(['.', '_', '-'], " ");
    cleaned = BRACKETED_YEAR.replace_all(&cleaned, " ").to_string();
    cleaned = STANDALONE_YEAR.replace_all(&cleaned, " ").to_string();
    cleaned = RELEASE_TAGS.replace_all(&cleaned, " ").to_string();
    cleaned = CONTAINER_TOKENS.replace_all(&cleaned, " ").to_string();

    cleaned.split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_dotted_release_name() {
        assert_eq!(
            clean_title("Inception.2010.1080p.BluRay.x264.mkv"),
            "Inception"
        );
    }

    #[test]
    fn cleans_bracketed_year_and_tags() {
        assert_eq!(
            clean_title("The_Matrix_(1999)_1080p_LATINO.avi"),
            "The Matrix"
        );
        assert_eq!(clean_title("Heat [1995] DVDRip.avi"), "Heat");
    }

    #[test]
    fn preserves_words_containing_tag_substrings() {
        // "es" is in the tag vocabulary but must only match whole words
        assert_eq!(clean_title("Espresso.Dreams.mkv"), "Espresso Dreams");
        assert_eq!(clean_title("Submarine.mp4"), "Submarine");
    }

    #[test]
    fn removes_multi_word_tags() {
        assert_eq!(
            clean_title("Parasite.2019.DUAL AUDIO.WEB-DL.mkv"),
            "Parasite"
        );
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "Inception.2010.1080p.BluRay.x264.mkv",
            "The_Matrix_(1999).avi",
            "Some Plain Title.webm",
        ];
        for input in inputs {
            let once = clean_title(input);
            assert_eq!(clean_title(&once), once);
        }
    }

    #[test]
    fn can_produce_empty_title() {
        assert_eq!(clean_title("1080p.x264.mkv"), "");
    }

    #[test]
    fn detects_media_extensions() {
        assert!(has_media_extension("movie.mkv"));
        assert!(has_media_extension("movie.MP4"));
        assert!(!has_media_extension("movie.srt"));
        assert!(!has_media_extension("movie"));
    }
}
