/// Derive a URL-safe slug from a human-readable name: lowercase, runs of
/// non-alphanumeric characters collapsed to single hyphens, no leading or
/// trailing hyphen.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|ch| match ch {
            'a'..='z' | '0'..='9' => ch,
            _ => '-',
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
