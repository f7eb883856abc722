//! Content classification: which display mode and which lexer to use.

use std::path::Path;

use crate::domain::Mode;

/// Extensions whose lexer name is known without asking syntect.
const COMMON_LEXERS: &[(&str, &str)] = &[
    ("html", "html"),
    ("py", "python"),
    ("md", "markdown"),
    ("js", "javascript"),
    ("xml", "xml"),
    ("json", "json"),
    ("toml", "toml"),
];

/// Content-Type values mapped to lexer names.
const MIME_LEXERS: &[(&str, &str)] = &[
    ("text/html", "html"),
    ("application/xhtml+xml", "html"),
    ("text/x-python", "python"),
    ("application/x-python", "python"),
    ("text/markdown", "markdown"),
    ("text/x-markdown", "markdown"),
    ("text/javascript", "javascript"),
    ("application/javascript", "javascript"),
    ("application/json", "json"),
    ("application/xml", "xml"),
    ("text/xml", "xml"),
    ("text/css", "css"),
    ("text/x-rust", "rust"),
    ("text/x-c", "c"),
    ("text/x-c++", "c++"),
    ("text/x-java", "java"),
    ("text/x-go", "go"),
    ("application/x-sh", "bash"),
    ("text/x-shellscript", "bash"),
    ("application/toml", "toml"),
    ("application/yaml", "yaml"),
    ("text/yaml", "yaml"),
    ("text/csv", "csv"),
    ("text/plain", "text"),
];

pub fn is_url(resource: &str) -> bool {
    resource.starts_with("http://") || resource.starts_with("https://")
}

/// The path component of a URL, without query or fragment.
pub fn url_path(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let rest = rest.split(['?', '#']).next().unwrap_or("");
    rest.find('/').map_or("", |index| &rest[index..])
}

/// Lower-cased extension of a path or URL, without the dot.
pub fn extension(resource: &str) -> Option<String> {
    let path = if is_url(resource) { url_path(resource) } else { resource };
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Pick the display mode.
///
/// An explicit mode always wins. Otherwise the extension decides, and
/// anything unrecognised is shown as syntax.
pub fn select_mode(explicit: Option<Mode>, resource: &str) -> Mode {
    if let Some(mode) = explicit {
        return mode;
    }
    let mode = match extension(resource).as_deref() {
        Some("md" | "markdown") => Mode::Markdown,
        Some("json") => Mode::Json,
        Some("csv" | "tsv") => Mode::Csv,
        Some("rst") => Mode::Rst,
        Some("ipynb") => Mode::Notebook,
        _ => Mode::Syntax,
    };
    tracing::debug!("classified {:?} as {}", resource, mode);
    mode
}

/// Lexer for a well-known extension.
pub fn common_lexer(resource: &str) -> Option<&'static str> {
    let ext = extension(resource)?;
    COMMON_LEXERS.iter().find(|(known, _)| *known == ext).map(|(_, lexer)| *lexer)
}

/// Lexer for a Content-Type header value (parameters are ignored).
pub fn lexer_for_mime(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    MIME_LEXERS.iter().find(|(known, _)| *known == mime).map(|(_, lexer)| *lexer)
}
