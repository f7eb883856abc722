//! Turn merged settings into one renderable: pick the mode, build the
//! content, then apply the layout wrappers.

use tracing::debug;

use crate::classify::select_mode;
use crate::domain::{Align, Mode, Settings};
use crate::error::Result;
use crate::fetch::{local, read_resource, Resource};
use crate::render::{ansi, markup, Justify, Text};
use crate::renderables::boxes;
use crate::renderables::csv::{self as csv_table, CsvOptions};
use crate::renderables::document::{Document, DocumentStyle};
use crate::renderables::layout::{Aligned, BoxedRenderable, ForceWidth, Padding, Panel, Styled};
use crate::renderables::notebook::{self, NotebookOptions};
use crate::renderables::rule::Rule;
use crate::renderables::syntax::Syntax;
use crate::renderables::{json, markdown, rst};

/// Lexer for reStructuredText literal blocks when none is given.
const RST_DEFAULT_LEXER: &str = "python";

fn document_style(settings: &Settings, code_lexer: Option<String>) -> DocumentStyle {
    DocumentStyle { theme: settings.theme.clone(), code_lexer, justify: settings.justify }
}

/// `text` with escape sequences removed, keeping the visible characters.
fn without_escapes(text: String) -> String {
    if ansi::contains_escapes(&text) {
        ansi::strip(&text)
    } else {
        text
    }
}

/// Read a resource for a mode that builds its own styles, so any escape
/// sequences in it are dropped.
fn read_stripped(settings: &Settings, lexer: Option<&str>) -> Result<Resource> {
    let mut resource = read_resource(&settings.resource, lexer)?;
    resource.text = without_escapes(resource.text);
    Ok(resource)
}

/// Console markup from the resource itself, or from stdin for `-`.
fn markup_text(settings: &Settings) -> Result<Text> {
    let source = if settings.resource == "-" { local::read_stdin()? } else { settings.resource.clone() };
    // Escapes survive markup parsing only when they are decoded afterwards
    let source = if settings.preprocess_ansi { source } else { without_escapes(source) };
    let mut text = markup::render(&source, settings.emoji)?;
    text.justify = settings.justify;
    text.no_wrap = settings.no_wrap;
    if settings.preprocess_ansi {
        text = ansi::decode_text(&text);
    }
    Ok(text)
}

fn optional_markup(value: Option<&str>, emoji: bool) -> Result<Option<Text>> {
    value
        .filter(|value| !value.is_empty())
        .map(|value| markup::render(&without_escapes(value.to_string()), emoji))
        .transpose()
        .map_err(Into::into)
}

fn rule(settings: &Settings) -> Result<BoxedRenderable> {
    let title = markup::render(&without_escapes(settings.resource.clone()), settings.emoji)?;
    let align = match settings.justify {
        Some(Justify::Left) => Align::Left,
        Some(Justify::Right) => Align::Right,
        Some(Justify::Center | Justify::Full) | None => Align::Center,
    };
    Ok(Box::new(
        Rule::new(Some(title))
            .style(settings.rule_style.clone())
            .characters(&settings.rule_char)
            .align(align),
    ))
}

fn syntax(settings: &Settings) -> Result<BoxedRenderable> {
    let resource = read_resource(&settings.resource, settings.lexer.as_deref())?;
    if settings.preprocess_ansi && ansi::contains_escapes(&resource.text) {
        debug!("decoding ANSI escapes instead of highlighting");
        let mut text = ansi::decode(&resource.text);
        text.no_wrap = settings.no_wrap;
        return Ok(Box::new(text));
    }
    let code = without_escapes(resource.text);
    let path = (resource.name != "-").then_some(resource.name.as_str());
    let syntax = Syntax::new(code, resource.lexer.as_deref(), path, &settings.theme)
        .line_numbers(settings.line_numbers)
        .indent_guides(settings.guides)
        .word_wrap(!settings.no_wrap)
        .head_tail(settings.head, settings.tail);
    debug!("highlighting {} as {}", resource.name, syntax.syntax_name());
    Ok(Box::new(syntax))
}

fn content(mode: Mode, settings: &Settings) -> Result<BoxedRenderable> {
    let emoji = settings.emoji;
    Ok(match mode {
        Mode::Print => Box::new(markup_text(settings)?),
        Mode::Rule => rule(settings)?,
        Mode::Syntax => syntax(settings)?,
        Mode::Json => {
            let resource = read_stripped(settings, None)?;
            Box::new(json::build(&resource.text, &resource.name)?)
        }
        Mode::Markdown => {
            let resource = read_stripped(settings, settings.lexer.as_deref())?;
            let blocks = markdown::parse(&resource.text, settings.hyperlinks);
            Box::new(Document::new(blocks, document_style(settings, settings.lexer.clone())))
        }
        Mode::Rst => {
            let resource = read_stripped(settings, None)?;
            let lexer = settings.lexer.as_deref().unwrap_or(RST_DEFAULT_LEXER);
            let blocks = rst::parse(&resource.text, lexer, settings.hyperlinks);
            Box::new(Document::new(blocks, document_style(settings, Some(lexer.to_string()))))
        }
        Mode::Csv => {
            let resource = read_stripped(settings, None)?;
            let options = CsvOptions {
                head: settings.head,
                tail: settings.tail,
                title: optional_markup(settings.title.as_deref(), emoji)?,
                caption: optional_markup(settings.caption.as_deref(), emoji)?,
            };
            Box::new(csv_table::build(&resource.text, &resource.name, options)?)
        }
        Mode::Notebook => {
            let resource = read_stripped(settings, None)?;
            let options = NotebookOptions {
                document: document_style(settings, settings.lexer.clone()),
                line_numbers: settings.line_numbers,
                guides: settings.guides,
                hyperlinks: settings.hyperlinks,
                word_wrap: !settings.no_wrap,
            };
            Box::new(notebook::build(&resource.text, &resource.name, &options)?)
        }
    })
}

/// Padding, panel, style, forced width and alignment, in that order.
fn wrap(mut renderable: BoxedRenderable, settings: &Settings) -> Result<BoxedRenderable> {
    if let Some(padding) = settings.padding.filter(|padding| !padding.is_empty()) {
        renderable = Box::new(Padding::new(renderable, padding, settings.expand));
    }
    if let Some(kind) = boxes::for_panel(settings.panel) {
        renderable = Box::new(
            Panel::new(renderable, kind)
                .title(optional_markup(settings.title.as_deref(), settings.emoji)?)
                .subtitle(optional_markup(settings.caption.as_deref(), settings.emoji)?)
                .border_style(settings.panel_style.clone())
                .expand(settings.expand),
        );
    }
    if !settings.style.is_plain() {
        renderable = Box::new(Styled::new(renderable, settings.style.clone()));
    }
    if let Some(width) = settings.width.filter(|_| !settings.pager) {
        renderable = Box::new(ForceWidth::new(renderable, width));
    }
    if let Some(align) = settings.align {
        renderable = Box::new(Aligned::new(renderable, align));
    }
    Ok(renderable)
}

/// Build the renderable for `settings`.
pub fn build(settings: &Settings) -> Result<BoxedRenderable> {
    let mode = select_mode(settings.mode, &settings.resource);
    debug!("rendering {:?} as {}", settings.resource, mode);
    let renderable = content(mode, settings)?;
    wrap(renderable, settings)
}
