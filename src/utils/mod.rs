use std::sync::LazyLock;

use regex::Regex;

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\n\r]"#).expect("static pattern is valid"));

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    UNSAFE_FILENAME_CHARS
        .replace_all(filename, "_")
        .trim()
        .trim_matches('.')
        .to_string()
}
