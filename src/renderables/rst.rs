//! Line-oriented reStructuredText reader.
//!
//! Covers the constructs that show up in READMEs and docs pages: section
//! titles, transitions, paragraphs, bullet and enumerated lists, literal
//! blocks, code directives, admonitions and block quotes. Unknown
//! directives and comments are skipped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::render::{Style, Text};

use super::document::{Block, ListItem};
use super::markdown::{inline_code_style, link_style, link_url_style};

static ENUMERATED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\(?(?P<n>\d+|#|[a-zA-Z])[.)])\s+").expect("enumerated list regex is valid")
});

static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\.\.\s+(?P<name>[\w:+-]+)::\s*(?P<args>.*)$").expect("directive regex is valid")
});

static INLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"``(?P<literal>.+?)``",
        r"|\*\*(?P<strong>[^*]+?)\*\*",
        r"|\*(?P<em>[^*\s][^*]*?)\*",
        r"|:(?P<role>[\w.+-]+):`(?P<role_text>[^`]+)`",
        r"|`(?P<reference>[^`]+)`(?P<underscore>__?)?",
    ))
    .expect("inline markup regex is valid")
});

const ADMONITIONS: &[&str] = &[
    "attention", "caution", "danger", "error", "hint", "important", "note", "tip", "warning",
    "admonition", "seealso",
];

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Remove the common indentation of the non-blank lines.
fn dedent(lines: &[String]) -> Vec<String> {
    let common = lines.iter().filter(|line| !is_blank(line)).map(|line| indent_of(line)).min().unwrap_or(0);
    lines
        .iter()
        .map(|line| if is_blank(line) { String::new() } else { line[common..].to_string() })
        .collect()
}

/// The repeated punctuation character of a title adornment or transition.
fn adornment(line: &str) -> Option<char> {
    let line = line.trim_end();
    let first = line.chars().next()?;
    (line.chars().count() >= 2 && first.is_ascii_punctuation() && line.chars().all(|ch| ch == first))
        .then_some(first)
}

fn bullet_marker(line: &str) -> Option<usize> {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some('-' | '*' | '+' | '•'), Some(' ')) => Some(line.chars().next().map_or(1, char::len_utf8) + 1),
        (Some('-' | '*' | '+'), None) => Some(1),
        _ => None,
    }
}

fn enumerated_marker(line: &str) -> Option<(usize, u64)> {
    let captures = ENUMERATED_RE.captures(line)?;
    let whole = captures.get(0)?.end();
    let label = captures.name("n")?.as_str();
    let number = label.parse::<u64>().ok().or_else(|| {
        let ch = label.chars().next()?;
        ch.is_ascii_alphabetic().then(|| u64::from(ch.to_ascii_lowercase() as u8 - b'a' + 1))
    });
    Some((whole, number.unwrap_or(1)))
}

fn starts_list(line: &str) -> bool {
    bullet_marker(line).is_some() || enumerated_marker(line).is_some()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct RstReader {
    default_lexer: String,
    hyperlinks: bool,
    /// Title adornments in order of first appearance: (character, has overline).
    title_styles: Vec<(char, bool)>,
}

impl RstReader {
    pub fn new(default_lexer: &str, hyperlinks: bool) -> Self {
        Self { default_lexer: default_lexer.to_string(), hyperlinks, title_styles: Vec::new() }
    }

    fn title_level(&mut self, key: (char, bool)) -> u8 {
        let index = match self.title_styles.iter().position(|known| *known == key) {
            Some(index) => index,
            None => {
                self.title_styles.push(key);
                self.title_styles.len() - 1
            }
        };
        u8::try_from(index + 1).unwrap_or(u8::MAX).min(6)
    }

    pub fn parse(&mut self, source: &str) -> Vec<Block> {
        let lines: Vec<String> =
            source.lines().map(|line| line.replace('\t', "        ").trim_end().to_string()).collect();
        let blocks = self.parse_lines(&lines);
        tracing::debug!("rst: {} top-level blocks", blocks.len());
        blocks
    }

    /// Lines after `start` that are blank or indented past column 0.
    fn indented_block(lines: &[String], start: usize) -> (Vec<String>, usize) {
        let mut end = start;
        while end < lines.len() && (is_blank(&lines[end]) || indent_of(&lines[end]) > 0) {
            end += 1;
        }
        let mut block = lines[start..end].to_vec();
        while block.last().is_some_and(|line| is_blank(line)) {
            block.pop();
        }
        while block.first().is_some_and(|line| is_blank(line)) {
            block.remove(0);
        }
        (dedent(&block), end)
    }

    fn parse_lines(&mut self, lines: &[String]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            if is_blank(line) {
                i += 1;
                continue;
            }

            if indent_of(line) > 0 {
                let (body, end) = Self::indented_block(lines, i);
                blocks.push(Block::Quote(self.parse_lines(&body)));
                i = end;
                continue;
            }

            if line.starts_with("..") {
                i = self.directive(lines, i, &mut blocks);
                continue;
            }

            if let Some(ch) = adornment(line) {
                let is_overline = i + 2 < lines.len()
                    && !is_blank(&lines[i + 1])
                    && adornment(&lines[i + 2]) == Some(ch);
                if is_overline {
                    let level = self.title_level((ch, true));
                    blocks.push(Block::Heading { level, text: self.inline(lines[i + 1].trim()) });
                    i += 3;
                    continue;
                }
                let next_is_blank = lines.get(i + 1).map_or(true, |next| is_blank(next));
                if line.chars().count() >= 4 && next_is_blank {
                    blocks.push(Block::Rule);
                    i += 1;
                    continue;
                }
            }

            if let Some(ch) = lines.get(i + 1).and_then(|next| adornment(next)) {
                if lines[i + 1].chars().count() >= line.trim().chars().count() {
                    let level = self.title_level((ch, false));
                    blocks.push(Block::Heading { level, text: self.inline(line.trim()) });
                    i += 2;
                    continue;
                }
            }

            if bullet_marker(line).is_some() {
                i = self.list(lines, i, None, &mut blocks);
                continue;
            }
            if let Some((_, start)) = enumerated_marker(line) {
                i = self.list(lines, i, Some(start), &mut blocks);
                continue;
            }

            i = self.paragraph(lines, i, &mut blocks);
        }
        blocks
    }

    fn paragraph(&mut self, lines: &[String], start: usize, blocks: &mut Vec<Block>) -> usize {
        let mut end = start + 1;
        while end < lines.len()
            && !is_blank(&lines[end])
            && indent_of(&lines[end]) == 0
            && !starts_list(&lines[end])
        {
            end += 1;
        }
        let mut text = lines[start..end].iter().map(|line| line.trim()).collect::<Vec<_>>().join(" ");

        let literal = text.ends_with("::");
        if literal {
            text.truncate(text.len() - 2);
            if text.ends_with(' ') || text.is_empty() {
                text = text.trim_end().to_string();
            } else {
                text.push(':');
            }
        }
        if !text.is_empty() {
            blocks.push(Block::Paragraph(self.inline(&text)));
        }
        if !literal {
            return end;
        }

        let (code, next) = Self::indented_block(lines, end);
        if !code.is_empty() {
            blocks.push(Block::Code { code: code.join("\n"), lexer: Some(self.default_lexer.clone()) });
        }
        next
    }

    fn list(&mut self, lines: &[String], start: usize, numbered: Option<u64>, blocks: &mut Vec<Block>) -> usize {
        let mut items = Vec::new();
        let mut i = start;
        while i < lines.len() {
            let line = &lines[i];
            let marker = match numbered {
                Some(_) => enumerated_marker(line).map(|(width, _)| width),
                None => bullet_marker(line),
            };
            let Some(marker) = marker else { break };

            let mut body = vec![line[marker.min(line.len())..].to_string()];
            let (continuation, end) = Self::indented_block(lines, i + 1);
            body.extend(continuation);
            items.push(ListItem { checked: None, blocks: self.parse_lines(&body) });

            i = end;
            while i < lines.len() && is_blank(&lines[i]) {
                i += 1;
            }
        }
        blocks.push(Block::List { start: numbered, items });
        i
    }

    fn directive(&mut self, lines: &[String], start: usize, blocks: &mut Vec<Block>) -> usize {
        let (body, end) = Self::indented_block(lines, start + 1);
        let Some(captures) = DIRECTIVE_RE.captures(&lines[start]) else {
            return end;
        };
        let name = captures.name("name").map_or("", |m| m.as_str()).to_ascii_lowercase();
        let args = captures.name("args").map_or("", |m| m.as_str()).trim().to_string();

        let content: Vec<String> = {
            let skip = body.iter().take_while(|line| line.starts_with(':')).count();
            let mut content = body[skip..].to_vec();
            while content.first().is_some_and(|line| is_blank(line)) {
                content.remove(0);
            }
            content
        };

        match name.as_str() {
            "code-block" | "code" | "sourcecode" => {
                let lexer = if args.is_empty() { self.default_lexer.clone() } else { args };
                blocks.push(Block::Code { code: content.join("\n"), lexer: Some(lexer) });
            }
            name if ADMONITIONS.contains(&name) => {
                let title = if name == "admonition" && !args.is_empty() { args.clone() } else { capitalize(name) };
                let mut body = Vec::new();
                if name != "admonition" && !args.is_empty() {
                    body.push(args);
                }
                body.extend(content);
                blocks.push(Block::Admonition { title, body: self.parse_lines(&body) });
            }
            "image" | "figure" => {
                let mut text = Text::plain("🌆 ");
                text.append_text(&self.inline(&args));
                blocks.push(Block::Paragraph(text));
            }
            other => tracing::debug!("skipping rst directive {:?}", other),
        }
        end
    }

    /// Apply inline markup.
    pub fn inline(&self, source: &str) -> Text {
        let mut text = Text::new();
        let mut last = 0;
        for captures in INLINE_RE.captures_iter(source) {
            let Some(whole) = captures.get(0) else { continue };
            text.push_str(&unescape(&source[last..whole.start()]));
            last = whole.end();

            if let Some(literal) = captures.name("literal") {
                text.append(literal.as_str(), inline_code_style());
            } else if let Some(strong) = captures.name("strong") {
                text.append(strong.as_str(), Style::new().bold());
            } else if let Some(em) = captures.name("em") {
                text.append(em.as_str(), Style::new().italic());
            } else if let Some(role_text) = captures.name("role_text") {
                text.append(role_text.as_str(), inline_code_style());
            } else if let Some(reference) = captures.name("reference") {
                if captures.name("underscore").is_some() {
                    self.reference(reference.as_str(), &mut text);
                } else {
                    text.append(reference.as_str(), Style::new().italic());
                }
            }
        }
        text.push_str(&unescape(&source[last..]));
        text
    }

    /// `` `label <url>`_ `` or a bare `` `label`_ ``.
    fn reference(&self, reference: &str, text: &mut Text) {
        let target = reference
            .strip_suffix('>')
            .and_then(|rest| rest.rsplit_once('<'))
            .map(|(label, url)| (label.trim(), url.trim()));
        match target {
            Some((label, url)) => {
                let label = if label.is_empty() { url } else { label };
                if self.hyperlinks {
                    text.append(label, link_style().link(url));
                } else {
                    text.append(label, link_style());
                    text.push_str(" (");
                    text.append(url, link_url_style());
                    text.push_str(")");
                }
            }
            None => text.append(reference, link_style()),
        }
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Read reStructuredText into blocks; literal blocks use `default_lexer`.
pub fn parse(source: &str, default_lexer: &str, hyperlinks: bool) -> Vec<Block> {
    RstReader::new(default_lexer, hyperlinks).parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(block: &Block) -> (u8, &str) {
        match block {
            Block::Heading { level, text } => (*level, text.as_str()),
            other => panic!("expected a heading, got {other:?}"),
        }
    }

    #[test]
    fn title_levels_follow_first_appearance() {
        let source = "=====\nTitle\n=====\n\nSection\n-------\n\nOther\n-----\n\nSub\n~~~\n";
        let blocks = parse(source, "python", false);
        assert_eq!(heading(&blocks[0]), (1, "Title"));
        assert_eq!(heading(&blocks[1]), (2, "Section"));
        assert_eq!(heading(&blocks[2]), (2, "Other"));
        assert_eq!(heading(&blocks[3]), (3, "Sub"));
    }

    #[test]
    fn paragraphs_join_lines_and_transitions_become_rules() {
        let blocks = parse("one\ntwo\n\n----\n\nthree\n", "python", false);
        assert!(matches!(&blocks[0], Block::Paragraph(text) if text.as_str() == "one two"));
        assert_eq!(blocks[1], Block::Rule);
    }

    #[test]
    fn literal_blocks_use_the_default_lexer() {
        let blocks = parse("Example::\n\n    print(1)\n    print(2)\n\nafter\n", "python", false);
        assert!(matches!(&blocks[0], Block::Paragraph(text) if text.as_str() == "Example:"));
        assert_eq!(
            blocks[1],
            Block::Code { code: "print(1)\nprint(2)".to_string(), lexer: Some("python".to_string()) }
        );
        assert!(matches!(&blocks[2], Block::Paragraph(text) if text.as_str() == "after"));
    }

    #[test]
    fn code_block_directives_name_their_lexer() {
        let blocks = parse(".. code-block:: rust\n   :linenos:\n\n   fn main() {}\n", "python", false);
        assert_eq!(blocks[0], Block::Code { code: "fn main() {}".to_string(), lexer: Some("rust".to_string()) });
        let blocks = parse(".. code::\n\n   x = 1\n", "python", false);
        assert_eq!(blocks[0], Block::Code { code: "x = 1".to_string(), lexer: Some("python".to_string()) });
    }

    #[test]
    fn lists_collect_items() {
        let blocks = parse("- one\n- two\n  continued\n\n1. first\n2. second\n", "python", false);
        let Block::List { start: None, items } = &blocks[0] else { panic!("expected a bullet list") };
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[1].blocks[0], Block::Paragraph(text) if text.as_str() == "two continued"));
        assert!(matches!(&blocks[1], Block::List { start: Some(1), items } if items.len() == 2));
    }

    #[test]
    fn admonitions_and_comments() {
        let blocks = parse(".. note:: Be careful.\n\n.. this is a comment\n   spanning lines\n\ntext\n", "python", false);
        assert!(matches!(&blocks[0], Block::Admonition { title, body } if title == "Note" && body.len() == 1));
        assert!(matches!(&blocks[1], Block::Paragraph(text) if text.as_str() == "text"));
    }

    #[test]
    fn inline_markup() {
        let reader = RstReader::new("python", false);
        let text = reader.inline("use ``code`` and **bold** or *em* see `site <https://x.org>`_");
        assert_eq!(text.as_str(), "use code and bold or em see site (https://x.org)");
        let runs = text.runs();
        assert!(runs.contains(&("code".to_string(), inline_code_style())));
        assert!(runs.contains(&("bold".to_string(), Style::new().bold())));
        assert!(runs.contains(&("em".to_string(), Style::new().italic())));
    }

    #[test]
    fn indented_text_is_a_block_quote() {
        let blocks = parse("intro\n\n    quoted words\n", "python", false);
        assert!(matches!(&blocks[1], Block::Quote(inner) if inner.len() == 1));
    }
}
