use std::sync::LazyLock;

use regex::Regex;

static MULTI_SLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("/{2,}").expect("invalid slash pattern"));

/// Compose the public URL of a stored media file from the configured base
/// URL and the stored relative path, collapsing duplicate path separators.
pub fn media_url(base_url: &str, path: &str) -> String {
    let location = format!("/{}/{}", base_url, path);
    MULTI_SLASH.replace_all(&location, "/").into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_media_url_collapses_slashes() {
        assert_eq!(
            media_url("/media/", "user-pictures/jane.png"),
            "/media/user-pictures/jane.png"
        );
        assert_eq!(media_url("media", "pic.png"), "/media/pic.png");
        assert_eq!(media_url("//cdn//media//", "//a.png"), "/cdn/media/a.png");
    }

    #[test]
    fn test_media_url_empty_path() {
        assert_eq!(media_url("/media/", ""), "/media/");
    }
}
