//! Grid of cells with box-drawn borders.
//!
//! Column widths start at the widest cell. When the table doesn't fit, the
//! widest columns give up space first, down to their longest word; after
//! that every column shrinks toward a single cell of content.

use crate::render::segment::set_line_length;
use crate::render::{Justify, Line, Measurement, RenderOptions, Renderable, Segment, Style, Text};

use super::boxes::{BoxKind, BoxRow};

#[derive(Debug, Clone)]
pub struct Column {
    header: Text,
    justify: Justify,
    style: Style,
    header_style: Style,
}

impl Column {
    pub fn new(header: impl Into<Text>) -> Self {
        Self {
            header: header.into(),
            justify: Justify::Left,
            style: Style::default(),
            header_style: Style::new().bold(),
        }
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn header_style(mut self, style: Style) -> Self {
        self.header_style = style;
        self
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Text>>,
    kind: BoxKind,
    border_style: Style,
    show_header: bool,
    show_edge: bool,
    padding: usize,
    title: Option<Text>,
    caption: Option<Text>,
    caption_justify: Justify,
}

impl Table {
    pub fn new(kind: BoxKind) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            kind,
            border_style: Style::default(),
            show_header: true,
            show_edge: true,
            padding: 1,
            title: None,
            caption: None,
            caption_justify: Justify::Center,
        }
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Add a row; missing cells are left empty and extra cells add columns.
    pub fn add_row(&mut self, cells: Vec<Text>) {
        while self.columns.len() < cells.len() {
            self.columns.push(Column::new(""));
        }
        self.rows.push(cells);
    }

    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    pub fn show_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }

    pub fn show_edge(mut self, show: bool) -> Self {
        self.show_edge = show;
        self
    }

    pub fn title(mut self, title: Option<Text>) -> Self {
        self.title = title.filter(|text| !text.is_empty());
        self
    }

    pub fn caption(mut self, caption: Option<Text>, justify: Justify) -> Self {
        self.caption = caption.filter(|text| !text.is_empty());
        self.caption_justify = justify;
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn chrome(&self) -> usize {
        let dividers = self.columns.len().saturating_sub(1);
        dividers + if self.show_edge { 2 } else { 0 }
    }

    fn cells_of(&self, index: usize) -> impl Iterator<Item = &Text> {
        let header = self.show_header.then(|| &self.columns[index].header);
        header.into_iter().chain(self.rows.iter().filter_map(move |row| row.get(index)))
    }

    /// (minimum, maximum) width of every column including padding.
    fn column_ranges(&self) -> Vec<(usize, usize)> {
        let pad = self.padding * 2;
        (0..self.columns.len())
            .map(|index| {
                let (mut minimum, mut maximum) = (1, 1);
                for cell in self.cells_of(index) {
                    maximum = maximum.max(cell.cell_len());
                    let longest_word = cell
                        .as_str()
                        .split_whitespace()
                        .map(crate::render::segment::cell_len)
                        .max()
                        .unwrap_or(0);
                    minimum = minimum.max(longest_word);
                }
                (minimum + pad, maximum + pad)
            })
            .collect()
    }

    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let ranges = self.column_ranges();
        let mut widths: Vec<usize> = ranges.iter().map(|(_, maximum)| *maximum).collect();
        let available = max_width.saturating_sub(self.chrome());
        let floors = [
            ranges.iter().map(|(minimum, _)| *minimum).collect::<Vec<_>>(),
            vec![self.padding * 2 + 1; widths.len()],
        ];
        for floor in &floors {
            while widths.iter().sum::<usize>() > available {
                let widest = widths
                    .iter()
                    .enumerate()
                    .filter(|(index, width)| **width > floor[*index])
                    .max_by_key(|(index, width)| (**width, std::cmp::Reverse(*index)))
                    .map(|(index, _)| index);
                match widest {
                    Some(index) => widths[index] -= 1,
                    None => break,
                }
            }
        }
        widths
    }

    fn border(&self, row: BoxRow, widths: &[usize]) -> Line {
        vec![Segment::new(self.kind.line(row, widths, self.show_edge), self.border_style.clone())]
    }

    fn row_lines(&self, cells: &[(Text, Justify)], widths: &[usize], row: BoxRow) -> Vec<Line> {
        let edge = self.kind.edge(row);
        let pad = " ".repeat(self.padding);
        let rendered: Vec<Vec<Line>> = cells
            .iter()
            .zip(widths)
            .map(|((text, justify), width)| {
                let inner = width.saturating_sub(self.padding * 2).max(1);
                text.wrap(inner, Some(*justify), false)
                    .into_iter()
                    .map(|line| set_line_length(line, inner, &Style::default()))
                    .collect()
            })
            .collect();
        let height = rendered.iter().map(Vec::len).max().unwrap_or(1);

        (0..height)
            .map(|line_index| {
                let mut line = Vec::new();
                if self.show_edge {
                    line.push(Segment::new(edge.left.to_string(), self.border_style.clone()));
                }
                for (column, cell_lines) in rendered.iter().enumerate() {
                    if column > 0 {
                        line.push(Segment::new(edge.divider.to_string(), self.border_style.clone()));
                    }
                    let inner = widths[column].saturating_sub(self.padding * 2).max(1);
                    line.push(Segment::plain(pad.clone()));
                    match cell_lines.get(line_index) {
                        Some(content) => line.extend(content.iter().cloned()),
                        None => line.push(Segment::plain(" ".repeat(inner))),
                    }
                    line.push(Segment::plain(pad.clone()));
                }
                if self.show_edge {
                    line.push(Segment::new(edge.right.to_string(), self.border_style.clone()));
                }
                line
            })
            .collect()
    }

    fn label(&self, text: &Text, style: Style, justify: Justify, width: usize) -> Vec<Line> {
        let mut text = text.clone();
        text.stylize_before(style);
        text.wrap(width, Some(justify), false)
    }
}

impl Renderable for Table {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        if self.columns.is_empty() {
            return Vec::new();
        }
        let widths = self.column_widths(options.max_width);
        let table_width = widths.iter().sum::<usize>() + self.chrome();
        let mut lines = Vec::new();

        if let Some(title) = &self.title {
            lines.extend(self.label(title, Style::new().italic(), Justify::Center, table_width));
        }
        if self.show_edge {
            lines.push(self.border(BoxRow::Top, &widths));
        }
        if self.show_header {
            let cells: Vec<(Text, Justify)> = self
                .columns
                .iter()
                .map(|column| {
                    let mut header = column.header.clone();
                    header.stylize_before(column.header_style.clone());
                    (header, column.justify)
                })
                .collect();
            lines.extend(self.row_lines(&cells, &widths, BoxRow::Head));
            lines.push(self.border(BoxRow::HeadRow, &widths));
        }
        for row in &self.rows {
            let cells: Vec<(Text, Justify)> = self
                .columns
                .iter()
                .enumerate()
                .map(|(index, column)| {
                    let mut cell = row.get(index).cloned().unwrap_or_default();
                    cell.stylize_before(column.style.clone());
                    (cell, column.justify)
                })
                .collect();
            lines.extend(self.row_lines(&cells, &widths, BoxRow::Mid));
        }
        if self.show_edge {
            lines.push(self.border(BoxRow::Bottom, &widths));
        }
        if let Some(caption) = &self.caption {
            lines.extend(self.label(caption, Style::new().italic().dim(), self.caption_justify, table_width));
        }
        lines
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        let ranges = self.column_ranges();
        let chrome = self.chrome();
        let minimum = ranges.iter().map(|(minimum, _)| minimum).sum::<usize>() + chrome;
        let maximum = ranges.iter().map(|(_, maximum)| maximum).sum::<usize>() + chrome;
        Measurement::new(minimum, maximum).clamp(options.max_width)
    }
}
