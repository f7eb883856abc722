//! Jupyter notebooks (nbformat 4).

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::render::ansi;
use crate::render::{Color, Style, Text};

use super::document::{Document, DocumentStyle};
use super::layout::{BoxedRenderable, Group};
use super::markdown;
use super::syntax::Syntax;

#[derive(Debug, Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<Cell>,
    #[serde(default)]
    metadata: NotebookMetadata,
    nbformat: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct NotebookMetadata {
    kernelspec: Option<KernelSpec>,
    language_info: Option<LanguageInfo>,
}

#[derive(Debug, Deserialize)]
struct KernelSpec {
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LanguageInfo {
    name: Option<String>,
}

/// Cell sources and output texts are either one string or a list of lines.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Source {
    Text(String),
    Lines(Vec<String>),
}

impl Default for Source {
    fn default() -> Self {
        Source::Text(String::new())
    }
}

impl Source {
    fn joined(&self) -> String {
        match self {
            Source::Text(text) => text.clone(),
            Source::Lines(lines) => lines.concat(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
enum Cell {
    Markdown {
        #[serde(default)]
        source: Source,
    },
    Code {
        #[serde(default)]
        source: Source,
        execution_count: Option<u64>,
        #[serde(default)]
        outputs: Vec<Output>,
    },
    Raw {
        #[serde(default)]
        source: Source,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
enum Output {
    Stream {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        text: Source,
    },
    ExecuteResult {
        execution_count: Option<u64>,
        #[serde(default)]
        data: Map<String, Value>,
    },
    DisplayData {
        #[serde(default)]
        data: Map<String, Value>,
    },
    Error {
        ename: String,
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default)]
pub struct NotebookOptions {
    pub document: DocumentStyle,
    pub line_numbers: bool,
    pub guides: bool,
    pub hyperlinks: bool,
    pub word_wrap: bool,
}

fn prompt(label: &str, count: Option<u64>, color: u8) -> BoxedRenderable {
    let count = count.map_or_else(|| " ".to_string(), |count| count.to_string());
    Box::new(Text::styled(format!("{label}[{count}]:"), Style::new().bold().fg(Color::Standard(color))))
}

/// `text/plain` from a MIME bundle, or a note naming what couldn't be shown.
fn mime_text(data: &Map<String, Value>) -> Option<Text> {
    if let Some(plain) = data.get("text/plain") {
        let text = match plain {
            Value::String(text) => text.clone(),
            Value::Array(lines) => lines.iter().filter_map(Value::as_str).collect(),
            _ => String::new(),
        };
        return Some(Text::plain(text.trim_end().to_string()));
    }
    let kind = data.keys().next()?;
    Some(Text::styled(format!("<{kind}>"), Style::new().dim()))
}

struct Builder<'a> {
    options: &'a NotebookOptions,
    language: Option<String>,
}

impl Builder<'_> {
    fn code(&self, source: &str) -> BoxedRenderable {
        let lexer = self.options.document.code_lexer.as_deref().or(self.language.as_deref());
        Box::new(
            Syntax::new(source.trim_end(), lexer, None, &self.options.document.theme)
                .line_numbers(self.options.line_numbers)
                .indent_guides(self.options.guides)
                .word_wrap(self.options.word_wrap),
        )
    }

    fn output(&self, output: &Output, items: &mut Vec<BoxedRenderable>) {
        match output {
            Output::Stream { name, text } => {
                let mut text = ansi::decode(&text.joined());
                text.rstrip();
                if name.as_deref() == Some("stderr") {
                    text.stylize_before(Style::new().fg(Color::Standard(1)));
                }
                items.push(Box::new(text));
            }
            Output::ExecuteResult { execution_count, data } => {
                items.push(prompt("Out", *execution_count, 1));
                if let Some(text) = mime_text(data) {
                    items.push(Box::new(text));
                }
            }
            Output::DisplayData { data } => {
                if let Some(text) = mime_text(data) {
                    items.push(Box::new(text));
                }
            }
            Output::Error { ename, evalue, traceback } => {
                if traceback.is_empty() {
                    let header = format!("{ename}: {evalue}");
                    items.push(Box::new(Text::styled(header, Style::new().bold().fg(Color::Standard(1)))));
                } else {
                    let mut text = ansi::decode(&traceback.join("\n"));
                    text.rstrip();
                    items.push(Box::new(text));
                }
            }
            Output::Unknown => {}
        }
    }

    fn cell(&self, cell: &Cell) -> Option<BoxedRenderable> {
        match cell {
            Cell::Markdown { source } => {
                let blocks = markdown::parse(&source.joined(), self.options.hyperlinks);
                let mut style = self.options.document.clone();
                style.code_lexer = style.code_lexer.or_else(|| self.language.clone());
                Some(Box::new(Document::new(blocks, style)))
            }
            Cell::Code { source, execution_count, outputs } => {
                let mut items = vec![prompt("In ", *execution_count, 2), self.code(&source.joined())];
                for output in outputs {
                    self.output(output, &mut items);
                }
                Some(Box::new(Group::new(items, 0)))
            }
            Cell::Raw { source } => Some(Box::new(Text::plain(source.joined().trim_end().to_string()))),
            Cell::Unknown => None,
        }
    }
}

/// Parse a notebook; `resource` names the input in errors.
pub fn build(source: &str, resource: &str, options: &NotebookOptions) -> Result<Group> {
    let notebook: Notebook =
        serde_json::from_str(source).map_err(|e| Error::parse("notebook", resource, e))?;
    if let Some(version) = notebook.nbformat.filter(|version| *version != 4) {
        tracing::warn!("nbformat {} notebooks may not display correctly", version);
    }
    let language = notebook
        .metadata
        .language_info
        .and_then(|info| info.name)
        .or_else(|| notebook.metadata.kernelspec.and_then(|spec| spec.language));
    tracing::debug!("notebook: {} cells, language {:?}", notebook.cells.len(), language);

    let builder = Builder { options, language };
    let cells = notebook.cells.iter().filter_map(|cell| builder.cell(cell)).collect();
    Ok(Group::new(cells, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::segment::line_text;
    use crate::render::{RenderOptions, Renderable};

    const NOTEBOOK: &str = r##"{
      "nbformat": 4,
      "metadata": {"language_info": {"name": "python"}},
      "cells": [
        {"cell_type": "markdown", "source": ["# Heading\n", "Some text"], "metadata": {}},
        {"cell_type": "code", "execution_count": 3, "source": "x = 1\nx", "metadata": {},
         "outputs": [
           {"output_type": "stream", "name": "stdout", "text": ["hello\n"]},
           {"output_type": "execute_result", "execution_count": 3, "data": {"text/plain": "1"}, "metadata": {}},
           {"output_type": "display_data", "data": {"image/png": "AAAA"}, "metadata": {}}
         ]},
        {"cell_type": "raw", "source": "raw text"}
      ]
    }"##;

    fn render(source: &str) -> Vec<String> {
        let group = build(source, "nb.ipynb", &NotebookOptions::default()).unwrap();
        group.render(&RenderOptions::new(40)).iter().map(|line| line_text(line).trim_end().to_string()).collect()
    }

    #[test]
    fn renders_cells_in_order() {
        let lines = render(NOTEBOOK);
        let joined = lines.join("\n");
        assert!(joined.contains("Heading"));
        assert!(joined.contains("Some text"));
        assert!(lines.contains(&"In [3]:".to_string()));
        assert!(lines.contains(&"x = 1".to_string()));
        assert!(lines.contains(&"hello".to_string()));
        assert!(lines.contains(&"Out[3]:".to_string()));
        assert!(lines.contains(&"<image/png>".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("raw text"));
    }

    #[test]
    fn error_outputs_decode_ansi_tracebacks() {
        let source = r#"{"cells": [{"cell_type": "code", "execution_count": null, "source": "1/0",
            "outputs": [{"output_type": "error", "ename": "ZeroDivisionError", "evalue": "division by zero",
                         "traceback": ["\u001b[0;31mZeroDivisionError\u001b[0m: division by zero"]}]}]}"#;
        let lines = render(source);
        assert!(lines.contains(&"In [ ]:".to_string()));
        assert!(lines.contains(&"ZeroDivisionError: division by zero".to_string()));
    }

    #[test]
    fn invalid_notebooks_name_the_resource() {
        let err = build("[1, 2]", "bad.ipynb", &NotebookOptions::default()).err().unwrap();
        assert_eq!(err.to_string(), "unable to parse notebook in bad.ipynb");
    }
}
