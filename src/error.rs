//! Error type shared by the input, rendering and output layers.

use std::path::PathBuf;

use thiserror::Error;

use crate::render::markup::MarkupError;
use crate::render::style::StyleError;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad combination of options or a missing argument.
    #[error("{0}")]
    Usage(String),

    #[error("unable to read {resource}")]
    Read {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to fetch {url}")]
    Fetch {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("unable to parse {format} in {resource}")]
    Parse {
        format: &'static str,
        resource: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unable to parse console markup")]
    Markup(#[from] MarkupError),

    #[error("unable to parse style {definition:?}")]
    Style {
        definition: String,
        #[source]
        source: StyleError,
    },

    #[error("unable to write to the terminal")]
    Terminal(#[from] std::io::Error),

    #[error("unable to write {}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn parse(
        format: &'static str,
        resource: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Parse { format, resource: resource.into(), source: source.into() }
    }

    /// Errors caused by how the command was invoked rather than by the input.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_) | Error::Style { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_format_and_resource() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::parse("json", "cats.json", source);
        assert_eq!(err.to_string(), "unable to parse json in cats.json");
        assert!(!err.is_usage());
    }

    #[test]
    fn style_errors_count_as_usage() {
        let err = Error::Style {
            definition: "bold chartreuse-ish".into(),
            source: StyleError::UnknownColor("chartreuse-ish".into()),
        };
        assert!(err.is_usage());
    }
}
