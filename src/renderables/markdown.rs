//! Markdown reader built on pulldown-cmark events.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::render::style::Attribute;
use crate::render::{Color, Justify, Style, Text};

use super::document::{Block, ListItem};

enum Container {
    Root(Vec<Block>),
    Quote(Vec<Block>),
    List { start: Option<u64>, items: Vec<ListItem> },
    Item(ListItem),
    Table { justify: Vec<Justify>, header: Vec<Text>, rows: Vec<Vec<Text>>, row: Vec<Text> },
}

struct Reader {
    hyperlinks: bool,
    stack: Vec<Container>,
    /// Inline text being collected for the current paragraph, heading or cell.
    inline: Option<Text>,
    styles: Vec<Style>,
    links: Vec<String>,
    heading: Option<u8>,
    code: Option<(Option<String>, String)>,
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn justify_for(alignment: &Alignment) -> Justify {
    match alignment {
        Alignment::Center => Justify::Center,
        Alignment::Right => Justify::Right,
        Alignment::Left | Alignment::None => Justify::Left,
    }
}

pub fn inline_code_style() -> Style {
    Style::new().bold().fg(Color::Standard(6)).on(Color::Standard(0))
}

pub fn link_style() -> Style {
    Style::new().fg(Color::Standard(12))
}

pub fn link_url_style() -> Style {
    Style::new().underline().fg(Color::Standard(4))
}

impl Reader {
    fn new(hyperlinks: bool) -> Self {
        Self {
            hyperlinks,
            stack: vec![Container::Root(Vec::new())],
            inline: None,
            styles: Vec::new(),
            links: Vec::new(),
            heading: None,
            code: None,
        }
    }

    fn style(&self) -> Style {
        self.styles.iter().fold(Style::default(), |acc, style| acc.combine(style))
    }

    fn append(&mut self, text: &str, extra: Option<Style>) {
        let style = match extra {
            Some(extra) => self.style().combine(&extra),
            None => self.style(),
        };
        self.inline.get_or_insert_with(Text::new).append(text, style);
    }

    fn push_block(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(Container::Root(blocks) | Container::Quote(blocks)) => blocks.push(block),
            Some(Container::Item(item)) => item.blocks.push(block),
            _ => tracing::debug!("dropping block outside of a container"),
        }
    }

    /// Turn loose inline text (tight list items) into a paragraph.
    fn flush(&mut self) {
        if matches!(self.stack.last(), Some(Container::Table { .. })) {
            return;
        }
        if let Some(mut text) = self.inline.take() {
            text.strip();
            if !text.is_empty() {
                self.push_block(Block::Paragraph(text));
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush();
                self.inline = Some(Text::new());
            }
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(heading_level(level));
                self.inline = Some(Text::new());
            }
            Tag::BlockQuote => {
                self.flush();
                self.stack.push(Container::Quote(Vec::new()));
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let lexer = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((lexer, String::new()));
            }
            Tag::List(start) => {
                self.flush();
                self.stack.push(Container::List { start, items: Vec::new() });
            }
            Tag::Item => self.stack.push(Container::Item(ListItem::default())),
            Tag::Table(alignments) => {
                self.flush();
                self.stack.push(Container::Table {
                    justify: alignments.iter().map(justify_for).collect(),
                    header: Vec::new(),
                    rows: Vec::new(),
                    row: Vec::new(),
                });
            }
            Tag::TableCell => self.inline = Some(Text::new()),
            Tag::Emphasis => self.styles.push(Style::new().italic()),
            Tag::Strong => self.styles.push(Style::new().bold()),
            Tag::Strikethrough => self.styles.push(Style::new().with(Attribute::Strike, true)),
            Tag::Link { dest_url, .. } => {
                let mut style = link_style();
                if self.hyperlinks {
                    style = style.link(dest_url.to_string());
                }
                self.styles.push(style);
                self.links.push(dest_url.to_string());
            }
            Tag::Image { dest_url, .. } => {
                self.append("🌆 ", None);
                let mut style = Style::default();
                if self.hyperlinks {
                    style = style.link(dest_url.to_string());
                }
                self.styles.push(style);
                self.links.push(String::new());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.flush(),
            TagEnd::Heading(_) => {
                let mut text = self.inline.take().unwrap_or_default();
                text.rstrip();
                let level = self.heading.take().unwrap_or(1);
                self.push_block(Block::Heading { level, text });
            }
            TagEnd::BlockQuote => {
                self.flush();
                if let Some(Container::Quote(blocks)) = self.stack.pop() {
                    self.push_block(Block::Quote(blocks));
                }
            }
            TagEnd::CodeBlock => {
                if let Some((lexer, code)) = self.code.take() {
                    self.push_block(Block::Code { code, lexer });
                }
            }
            TagEnd::Item => {
                self.flush();
                if let Some(Container::Item(item)) = self.stack.pop() {
                    if let Some(Container::List { items, .. }) = self.stack.last_mut() {
                        items.push(item);
                    }
                }
            }
            TagEnd::List(_) => {
                if let Some(Container::List { start, items }) = self.stack.pop() {
                    self.push_block(Block::List { start, items });
                }
            }
            TagEnd::TableCell => {
                let mut cell = self.inline.take().unwrap_or_default();
                cell.rstrip();
                if let Some(Container::Table { row, .. }) = self.stack.last_mut() {
                    row.push(cell);
                }
            }
            TagEnd::TableHead => {
                if let Some(Container::Table { header, row, .. }) = self.stack.last_mut() {
                    *header = std::mem::take(row);
                }
            }
            TagEnd::TableRow => {
                if let Some(Container::Table { rows, row, .. }) = self.stack.last_mut() {
                    rows.push(std::mem::take(row));
                }
            }
            TagEnd::Table => {
                if let Some(Container::Table { justify, header, rows, .. }) = self.stack.pop() {
                    self.push_block(Block::Table { header, rows, justify });
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                let url = self.links.pop().unwrap_or_default();
                if !self.hyperlinks && !url.is_empty() {
                    self.append(" (", None);
                    self.append(&url, Some(link_url_style()));
                    self.append(")", None);
                }
            }
            TagEnd::Image => {
                self.styles.pop();
                self.links.pop();
            }
            _ => {}
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => match &mut self.code {
                Some((_, code)) => code.push_str(&text),
                None => self.append(&text, None),
            },
            Event::Code(code) => self.append(&code, Some(inline_code_style())),
            Event::SoftBreak => self.append(" ", None),
            Event::HardBreak => self.append("\n", None),
            Event::Rule => {
                self.flush();
                self.push_block(Block::Rule);
            }
            Event::TaskListMarker(checked) => {
                if let Some(Container::Item(item)) = self.stack.last_mut() {
                    item.checked = Some(checked);
                }
            }
            Event::FootnoteReference(label) => self.append(&format!("[{label}]"), None),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        while self.stack.len() > 1 {
            match self.stack.pop() {
                Some(Container::Quote(blocks)) => self.push_block(Block::Quote(blocks)),
                Some(Container::List { start, items }) => self.push_block(Block::List { start, items }),
                _ => {}
            }
        }
        match self.stack.pop() {
            Some(Container::Root(blocks)) => blocks,
            _ => Vec::new(),
        }
    }
}

/// Read Markdown (with tables, strikethrough and task lists) into blocks.
pub fn parse(source: &str, hyperlinks: bool) -> Vec<Block> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut reader = Reader::new(hyperlinks);
    for event in Parser::new_ext(source, options) {
        reader.event(event);
    }
    let blocks = reader.finish();
    tracing::debug!("markdown: {} top-level blocks", blocks.len());
    blocks
}
