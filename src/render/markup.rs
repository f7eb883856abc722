//! Console markup: `[bold red]hello[/bold red]`, `[link=URL]...[/link]`.
//!
//! A tag is a `[` followed by a letter, `#`, `/` or `@`, up to the next `]`.
//! Backslashes escape tags (`\[bold]` is literal). `[/]` closes the most
//! recently opened tag. Tags that aren't valid styles are kept as literal
//! text, so `[1, 2, 3]` and `[x]` survive untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::emoji;
use super::style::Style;
use super::text::Text;

static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\\*)\[([a-zA-Z#/@][^\[\]]*?)\]").expect("tag pattern is valid"));

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarkupError {
    #[error("closing tag '[/{0}]' doesn't match any open tag")]
    UnmatchedClose(String),
    #[error("closing tag '[/]' has nothing to close")]
    NothingToClose,
}

enum Token<'a> {
    Text(String),
    Tag(&'a str),
}

fn tokenize(markup: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut position = 0;
    for caps in TAG.captures_iter(markup) {
        let Some(whole) = caps.get(0) else { continue };
        let escapes = caps.get(1).map_or(0, |m| m.as_str().len());
        let tag = caps.get(2).map_or("", |m| m.as_str());
        if whole.start() > position {
            tokens.push(Token::Text(markup[position..whole.start()].to_string()));
        }
        position = whole.end();
        let (backslashes, escaped) = (escapes / 2, escapes % 2 == 1);
        if backslashes > 0 {
            tokens.push(Token::Text("\\".repeat(backslashes)));
        }
        if escaped {
            tokens.push(Token::Text(format!("[{tag}]")));
            continue;
        }
        tokens.push(Token::Tag(tag));
    }
    if position < markup.len() {
        tokens.push(Token::Text(markup[position..].to_string()));
    }
    tokens
}

fn tag_style(tag: &str) -> Option<Style> {
    let tag = tag.trim();
    if let Some(url) = tag.strip_prefix("link=").or_else(|| tag.strip_prefix("link ")) {
        return Some(Style::new().link(url.trim()));
    }
    if tag == "link" {
        return None;
    }
    Style::parse(tag).ok()
}

/// Parse console markup into styled text.
pub fn render(markup: &str, emoji: bool) -> Result<Text, MarkupError> {
    render_with_style(markup, Style::default(), emoji)
}

/// Parse console markup where every character starts out with `base`.
pub fn render_with_style(markup: &str, base: Style, emoji: bool) -> Result<Text, MarkupError> {
    let mut text = Text::new();
    let mut stack: Vec<(String, usize, Style)> = Vec::new();

    let push_text = |text: &mut Text, chunk: &str| {
        let chunk = if emoji { emoji::replace(chunk) } else { chunk.to_string() };
        text.append(&chunk, base.clone());
    };

    for token in tokenize(markup) {
        match token {
            Token::Text(chunk) => push_text(&mut text, &chunk),
            Token::Tag(tag) => {
                if let Some(name) = tag.strip_prefix('/') {
                    let name = name.trim();
                    let index = if name.is_empty() {
                        stack.len().checked_sub(1).ok_or(MarkupError::NothingToClose)?
                    } else {
                        stack
                            .iter()
                            .rposition(|(open, _, _)| open == name || tag_name(open) == name)
                            .ok_or_else(|| MarkupError::UnmatchedClose(name.to_string()))?
                    };
                    let (_, start, style) = stack.remove(index);
                    let end = text.as_str().len();
                    text.stylize(style, start..end);
                    continue;
                }
                match tag_style(tag) {
                    Some(style) => stack.push((tag.trim().to_string(), text.as_str().len(), style)),
                    None => push_text(&mut text, &format!("[{tag}]")),
                }
            }
        }
    }

    // Unclosed tags run to the end; apply them innermost-last so outer tags sit underneath.
    let end = text.as_str().len();
    for (_, start, style) in stack {
        text.stylize(style, start..end);
    }
    Ok(text)
}

fn tag_name(tag: &str) -> &str {
    tag.split(['=', ' ']).next().unwrap_or(tag)
}

/// Escape text so it can be embedded in markup without being read as tags.
pub fn escape(text: &str) -> String {
    static ESCAPABLE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(\\*)(\[[a-zA-Z#/@][^\[\]]*?\])").expect("escape pattern is valid"));
    ESCAPABLE
        .replace_all(text, |caps: &regex::Captures| format!("{}{}\\{}", &caps[1], &caps[1], &caps[2]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::segment::line_text;
    use crate::render::style::{Attribute, Color};

    fn first_line(text: &Text) -> Vec<crate::render::Segment> {
        text.wrap(80, None, false).remove(0)
    }

    #[test]
    fn applies_and_closes_tags() {
        let text = render("[bold]a[/bold] b [red]c[/]", false).unwrap();
        assert_eq!(text.as_str(), "a b c");
        let line = first_line(&text);
        assert!(line[0].style.has(Attribute::Bold));
        assert_eq!(line[1].text, " b ");
        assert_eq!(line[2].style.color, Some(Color::Standard(1)));
    }

    #[test]
    fn nested_tags_combine() {
        let text = render("[bold][italic]x[/italic]y[/bold]", false).unwrap();
        let line = first_line(&text);
        assert!(line[0].style.has(Attribute::Bold) && line[0].style.has(Attribute::Italic));
        assert!(line[1].style.has(Attribute::Bold) && !line[1].style.has(Attribute::Italic));
    }

    #[test]
    fn escaped_and_non_style_tags_stay_literal() {
        assert_eq!(render(r"\[bold]x", false).unwrap().as_str(), "[bold]x");
        assert_eq!(render("[x] done [1, 2]", false).unwrap().as_str(), "[x] done [1, 2]");
    }

    #[test]
    fn unmatched_close_is_an_error() {
        assert_eq!(
            render("hello[/green]", false),
            Err(MarkupError::UnmatchedClose("green".to_string()))
        );
        assert_eq!(render("[/]", false), Err(MarkupError::NothingToClose));
    }

    #[test]
    fn links_and_emoji() {
        let text = render("[link=https://example.com]site[/link] :rocket:", true).unwrap();
        assert_eq!(text.as_str(), "site 🚀");
        let line = first_line(&text);
        assert_eq!(line[0].style.link.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn unclosed_tags_run_to_the_end() {
        let text = render("[green]hello", false).unwrap();
        assert_eq!(first_line(&text)[0].style.color, Some(Color::Standard(2)));
    }

    #[test]
    fn escape_round_trips() {
        let original = "[bold]not markup[/bold]";
        let escaped = escape(original);
        assert_eq!(render(&escaped, false).unwrap().as_str(), original);
        assert_eq!(line_text(&first_line(&render(&escaped, false).unwrap())), original);
    }
}
