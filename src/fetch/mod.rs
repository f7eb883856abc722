//! Resource reading (local files, stdin, HTTP)

use crate::classify::{common_lexer, is_url, lexer_for_mime};
use crate::error::{Error, Result};

pub mod local;
pub mod remote;

/// Text of a resource plus the lexer it should be highlighted with, if known.
#[derive(Debug, Clone)]
pub struct Resource {
    /// The path, URL or `-` the text came from.
    pub name: String,
    pub text: String,
    pub lexer: Option<String>,
}

/// Read a resource from a path, URL or stdin (`-`).
///
/// Lexer resolution: an explicit `lexer` always wins, then the common
/// extension table, then (for URLs) the response Content-Type.
pub fn read_resource(resource: &str, lexer: Option<&str>) -> Result<Resource> {
    if resource.is_empty() {
        return Err(Error::Usage("missing path or URL".to_string()));
    }

    let explicit = lexer.map(str::to_string);

    if is_url(resource) {
        let fetched = remote::fetch(resource)?;
        let lexer = explicit
            .or_else(|| common_lexer(resource).map(str::to_string))
            .or_else(|| fetched.content_type.as_deref().and_then(lexer_for_mime).map(str::to_string));
        return Ok(Resource { name: resource.to_string(), text: fetched.text, lexer });
    }

    if resource == "-" {
        let text = local::read_stdin()?;
        return Ok(Resource { name: resource.to_string(), text, lexer: explicit });
    }

    let text = local::read_path(resource)?;
    let lexer = explicit.or_else(|| common_lexer(resource).map(str::to_string));
    Ok(Resource { name: resource.to_string(), text, lexer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_resource_is_a_usage_error() {
        let err = read_resource("", None).unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "missing path or URL");
    }

    #[test]
    fn test_local_file_gets_common_lexer() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("hello.py");
        fs::write(&path, "print('hi')\n").expect("write");

        let resource = read_resource(path.to_str().expect("utf8"), None).expect("read");
        assert_eq!(resource.text, "print('hi')\n");
        assert_eq!(resource.lexer.as_deref(), Some("python"));

        let resource = read_resource(path.to_str().expect("utf8"), Some("text")).expect("read");
        assert_eq!(resource.lexer.as_deref(), Some("text"));
    }

    #[test]
    fn test_missing_file_names_the_resource() {
        let err = read_resource("/definitely/not/here.txt", None).unwrap_err();
        assert_eq!(err.to_string(), "unable to read /definitely/not/here.txt");
    }
}
