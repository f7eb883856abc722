//! Block model shared by the Markdown and reStructuredText readers.
//!
//! Readers turn their input into a list of [`Block`]s with inline styles
//! already applied; [`Document`] lays the blocks out.

use crate::domain::PaddingSpec;
use crate::render::segment::cell_len;
use crate::render::{Color, Justify, Line, Lines, RenderOptions, Renderable, Segment, Style, Text};

use super::boxes::BoxKind;
use super::layout::{prefixed, Padding, Panel};
use super::rule::Rule;
use super::syntax::Syntax;
use super::table::{Column, Table};

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: Text },
    Paragraph(Text),
    Code { code: String, lexer: Option<String> },
    Quote(Vec<Block>),
    List { start: Option<u64>, items: Vec<ListItem> },
    Rule,
    Table { header: Vec<Text>, rows: Vec<Vec<Text>>, justify: Vec<Justify> },
    /// A note, warning or other call-out with a title.
    Admonition { title: String, body: Vec<Block> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    /// `Some` for task list items.
    pub checked: Option<bool>,
    pub blocks: Vec<Block>,
}

/// Settings that affect how blocks are drawn.
#[derive(Debug, Clone)]
pub struct DocumentStyle {
    pub theme: String,
    /// Lexer for code blocks that don't name one.
    pub code_lexer: Option<String>,
    pub justify: Option<Justify>,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self { theme: crate::domain::DEFAULT_THEME.to_string(), code_lexer: None, justify: None }
    }
}

pub struct Document {
    blocks: Vec<Block>,
    style: DocumentStyle,
}

fn heading_style(level: u8) -> Style {
    match level {
        1 | 3 => Style::new().bold(),
        2 => Style::new().bold().underline(),
        4 => Style::new().bold().dim(),
        5 => Style::new().underline(),
        _ => Style::new().italic(),
    }
}

impl Document {
    pub fn new(blocks: Vec<Block>, style: DocumentStyle) -> Self {
        Self { blocks, style }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn render_blocks(&self, blocks: &[Block], options: &RenderOptions, gap: bool) -> Vec<Line> {
        let mut lines = Vec::new();
        for (index, block) in blocks.iter().enumerate() {
            if index > 0 && gap {
                lines.push(Vec::new());
                if matches!(block, Block::Heading { level: 2, .. }) {
                    lines.push(Vec::new());
                }
            }
            lines.extend(self.render_block(block, options));
        }
        lines
    }

    fn render_block(&self, block: &Block, options: &RenderOptions) -> Vec<Line> {
        let width = options.max_width;
        match block {
            Block::Heading { level, text } => {
                let mut text = text.clone().with_justify(Some(Justify::Center));
                text.stylize_before(heading_style(*level));
                if *level == 1 {
                    Panel::new(Box::new(text), BoxKind::Heavy).render(options)
                } else {
                    text.render(options)
                }
            }
            Block::Paragraph(text) => {
                text.wrap(width, text.justify.or(self.style.justify).or(options.justify), false)
            }
            Block::Code { code, lexer } => {
                let lexer = lexer.as_deref().or(self.style.code_lexer.as_deref()).unwrap_or("default");
                let syntax = Syntax::new(code.trim_end(), Some(lexer), None, &self.style.theme).word_wrap(true);
                Padding::new(Box::new(syntax), PaddingSpec::symmetric(0, 4), true).render(options)
            }
            Block::Quote(body) => {
                let marker = Segment::new("▌ ", Style::new().fg(Color::Standard(5)));
                let inner = options.with_width(width.saturating_sub(2));
                prefixed(self.render_blocks(body, &inner, true), marker.clone(), marker)
            }
            Block::List { start, items } => self.render_list(*start, items, options),
            Block::Rule => Rule::new(None).style(Style::new().fg(Color::Standard(3))).render(options),
            Block::Table { header, rows, justify } => {
                let mut table = Table::new(BoxKind::SimpleHeavy).show_edge(false);
                for (index, title) in header.iter().enumerate() {
                    let column_justify = justify.get(index).copied().unwrap_or(Justify::Left);
                    table.add_column(Column::new(title.clone()).justify(column_justify));
                }
                for row in rows {
                    table.add_row(row.clone());
                }
                table.render(options)
            }
            Block::Admonition { title, body } => {
                let inner = Lines(self.render_blocks(body, &options.with_width(width.saturating_sub(4)), true));
                Panel::new(Box::new(inner), BoxKind::Rounded)
                    .title(Some(Text::styled(title.clone(), Style::new().bold())))
                    .render(options)
            }
        }
    }

    fn render_list(&self, start: Option<u64>, items: &[ListItem], options: &RenderOptions) -> Vec<Line> {
        let bullet_style = Style::new().bold().fg(Color::Standard(3));
        let last_number = start.map(|first| first + items.len().saturating_sub(1) as u64);
        let number_width = last_number.map_or(0, |last| last.to_string().len());

        let mut lines = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let marker = match (start, item.checked) {
                (_, Some(true)) => " ☑ ".to_string(),
                (_, Some(false)) => " ☐ ".to_string(),
                (Some(first), None) => format!(" {:>width$}. ", first + index as u64, width = number_width),
                (None, None) => " • ".to_string(),
            };
            let indent = cell_len(&marker);
            let inner = options.with_width(options.max_width.saturating_sub(indent));
            let body = self.render_blocks(&item.blocks, &inner, false);
            let body = if body.is_empty() { vec![Vec::new()] } else { body };
            lines.extend(prefixed(
                body,
                Segment::new(marker, bullet_style.clone()),
                Segment::plain(" ".repeat(indent)),
            ));
        }
        lines
    }
}

impl Renderable for Document {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        self.render_blocks(&self.blocks, options, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::segment::line_text;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|line| line_text(line).trim_end().to_string()).collect()
    }

    fn draw(blocks: Vec<Block>, width: usize) -> Vec<String> {
        texts(&Document::new(blocks, DocumentStyle::default()).render(&RenderOptions::new(width)))
    }

    fn paragraph(text: &str) -> Block {
        Block::Paragraph(Text::plain(text))
    }

    #[test]
    fn first_level_headings_are_boxed() {
        let lines = draw(vec![Block::Heading { level: 1, text: Text::plain("Title") }], 11);
        assert_eq!(lines, vec!["┏━━━━━━━━━┓", "┃  Title  ┃", "┗━━━━━━━━━┛"]);
    }

    #[test]
    fn blocks_are_separated_by_blank_lines() {
        let lines = draw(vec![paragraph("one"), paragraph("two")], 20);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn lists_use_bullets_numbers_and_checkboxes() {
        let item = |text: &str, checked| ListItem { checked, blocks: vec![paragraph(text)] };
        let bullets = draw(vec![Block::List { start: None, items: vec![item("a", None), item("b", None)] }], 20);
        assert_eq!(bullets, vec![" • a", " • b"]);
        let numbers = draw(vec![Block::List { start: Some(9), items: vec![item("a", None), item("b", None)] }], 20);
        assert_eq!(numbers, vec!["  9. a", " 10. b"]);
        let tasks = draw(vec![Block::List { start: None, items: vec![item("done", Some(true)), item("todo", Some(false))] }], 20);
        assert_eq!(tasks, vec![" ☑ done", " ☐ todo"]);
    }

    #[test]
    fn list_items_wrap_under_their_marker() {
        let item = ListItem { checked: None, blocks: vec![paragraph("alpha beta")] };
        let lines = draw(vec![Block::List { start: None, items: vec![item] }], 8);
        assert_eq!(lines, vec![" • alpha", "   beta"]);
    }

    #[test]
    fn quotes_get_a_bar() {
        let lines = draw(vec![Block::Quote(vec![paragraph("said")])], 20);
        assert_eq!(lines, vec!["▌ said"]);
    }

    #[test]
    fn code_blocks_are_indented() {
        let lines = draw(vec![Block::Code { code: "x = 1\n".into(), lexer: Some("python".into()) }], 20);
        assert_eq!(lines, vec!["    x = 1"]);
    }

    #[test]
    fn tables_have_a_heavy_header_rule() {
        let lines = draw(
            vec![Block::Table {
                header: vec![Text::plain("a"), Text::plain("b")],
                rows: vec![vec![Text::plain("1"), Text::plain("2")]],
                justify: vec![Justify::Left, Justify::Right],
            }],
            20,
        );
        assert_eq!(lines, vec![" a   b", "━━━━━━━", " 1   2"]);
    }
}
