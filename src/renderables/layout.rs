//! Wrappers that place another renderable: padding, panels, styles,
//! alignment and width constraints.

use crate::domain::{Align, PaddingSpec};
use crate::render::segment::{apply_style, blank_line, line_len, set_line_length};
use crate::render::{Justify, Line, Measurement, RenderOptions, Renderable, Segment, Style, Text};

use super::boxes::{BoxKind, BoxRow};

pub type BoxedRenderable = Box<dyn Renderable>;

/// Blank space around a renderable.
pub struct Padding {
    inner: BoxedRenderable,
    pad: PaddingSpec,
    expand: bool,
    pub style: Style,
}

impl Padding {
    pub fn new(inner: BoxedRenderable, pad: PaddingSpec, expand: bool) -> Self {
        Self { inner, pad, expand, style: Style::default() }
    }

    fn horizontal(&self) -> usize {
        self.pad.left + self.pad.right
    }
}

impl Renderable for Padding {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        let width = if self.expand {
            options.max_width
        } else {
            self.measure(options).maximum
        };
        let inner_width = width.saturating_sub(self.horizontal()).max(1);
        let width = inner_width + self.horizontal();

        let mut lines = Vec::new();
        for _ in 0..self.pad.top {
            lines.push(blank_line(width, &self.style));
        }
        for line in self.inner.render(&options.with_width(inner_width)) {
            let mut padded = Vec::with_capacity(line.len() + 2);
            if self.pad.left > 0 {
                padded.push(Segment::new(" ".repeat(self.pad.left), self.style.clone()));
            }
            padded.extend(set_line_length(line, inner_width, &self.style));
            if self.pad.right > 0 {
                padded.push(Segment::new(" ".repeat(self.pad.right), self.style.clone()));
            }
            lines.push(padded);
        }
        for _ in 0..self.pad.bottom {
            lines.push(blank_line(width, &self.style));
        }
        lines
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        let available = options.max_width.saturating_sub(self.horizontal()).max(1);
        let inner = self.inner.measure(&options.with_width(available));
        Measurement::new(inner.minimum + self.horizontal(), inner.maximum + self.horizontal())
            .clamp(options.max_width)
    }
}

/// A border around a renderable, with an optional title and subtitle.
pub struct Panel {
    inner: BoxedRenderable,
    kind: BoxKind,
    title: Option<Text>,
    subtitle: Option<Text>,
    border_style: Style,
    expand: bool,
    padding: usize,
}

impl Panel {
    pub fn new(inner: BoxedRenderable, kind: BoxKind) -> Self {
        Self {
            inner,
            kind,
            title: None,
            subtitle: None,
            border_style: Style::default(),
            expand: true,
            padding: 1,
        }
    }

    pub fn title(mut self, title: Option<Text>) -> Self {
        self.title = title.filter(|text| !text.is_empty());
        self
    }

    pub fn subtitle(mut self, subtitle: Option<Text>) -> Self {
        self.subtitle = subtitle.filter(|text| !text.is_empty());
        self
    }

    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    fn frame(&self) -> usize {
        2 + self.padding * 2
    }

    fn title_width(&self) -> usize {
        [&self.title, &self.subtitle]
            .into_iter()
            .flatten()
            .map(|text| text.cell_len() + 4)
            .max()
            .unwrap_or(0)
    }

    /// Top or bottom border with `label` centered in it.
    fn border(&self, row: BoxRow, label: Option<&Text>, width: usize) -> Line {
        let edge = self.kind.edge(row);
        let inner = width.saturating_sub(2);
        let mut line = vec![Segment::new(edge.left.to_string(), self.border_style.clone())];

        let label_lines = label.map(|text| {
            let mut text = text.clone();
            text.stylize_before(self.border_style.clone());
            let mut padded = Text::plain(" ");
            padded.append_text(&text);
            padded.push_str(" ");
            padded.wrap(inner, None, true).into_iter().next().unwrap_or_default()
        });
        match label_lines {
            Some(label) if inner >= 3 => {
                let gap = inner - line_len(&label);
                let left = gap / 2;
                let fill = |count: usize| {
                    Segment::new(edge.fill.to_string().repeat(count), self.border_style.clone())
                };
                line.push(fill(left));
                line.extend(label);
                line.push(fill(gap - left));
            }
            _ => line.push(Segment::new(
                edge.fill.to_string().repeat(inner),
                self.border_style.clone(),
            )),
        }
        line.push(Segment::new(edge.right.to_string(), self.border_style.clone()));
        line
    }
}

impl Renderable for Panel {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        let width = if self.expand {
            options.max_width
        } else {
            self.measure(options).maximum
        }
        .max(self.frame() + 1);
        let inner_width = width - self.frame();

        let mid = self.kind.edge(BoxRow::Mid);
        let left = Segment::new(mid.left.to_string(), self.border_style.clone());
        let right = Segment::new(mid.right.to_string(), self.border_style.clone());
        let pad = " ".repeat(self.padding);

        let mut lines = vec![self.border(BoxRow::Top, self.title.as_ref(), width)];
        for line in self.inner.render(&options.with_width(inner_width)) {
            let mut row = vec![left.clone()];
            if !pad.is_empty() {
                row.push(Segment::plain(pad.clone()));
            }
            row.extend(set_line_length(line, inner_width, &Style::default()));
            if !pad.is_empty() {
                row.push(Segment::plain(pad.clone()));
            }
            row.push(right.clone());
            lines.push(row);
        }
        lines.push(self.border(BoxRow::Bottom, self.subtitle.as_ref(), width));
        lines
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        if self.expand {
            return Measurement::new(options.max_width, options.max_width);
        }
        let available = options.max_width.saturating_sub(self.frame()).max(1);
        let inner = self.inner.measure(&options.with_width(available));
        let maximum = (inner.maximum + self.frame()).max(self.title_width());
        Measurement::new(inner.minimum + self.frame(), maximum).clamp(options.max_width)
    }
}

/// Applies a style underneath everything a renderable produces.
pub struct Styled {
    inner: BoxedRenderable,
    style: Style,
}

impl Styled {
    pub fn new(inner: BoxedRenderable, style: Style) -> Self {
        Self { inner, style }
    }
}

impl Renderable for Styled {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        let mut lines = self.inner.render(options);
        apply_style(&mut lines, &self.style);
        lines
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        self.inner.measure(options)
    }
}

/// Places a renderable to the left, center or right of the available width.
pub struct Aligned {
    inner: BoxedRenderable,
    align: Align,
}

impl Aligned {
    pub fn new(inner: BoxedRenderable, align: Align) -> Self {
        Self { inner, align }
    }
}

impl Renderable for Aligned {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        let justify = match self.align {
            Align::Left => Justify::Left,
            Align::Center => Justify::Center,
            Align::Right => Justify::Right,
        };
        let options = options.with_justify(options.justify.or(Some(justify)));
        let width = self.inner.measure(&options).maximum.clamp(1, options.max_width);
        let gap = options.max_width - width;
        let (left, right) = match self.align {
            Align::Left => (0, gap),
            Align::Center => (gap / 2, gap - gap / 2),
            Align::Right => (gap, 0),
        };

        self.inner
            .render(&options.with_width(width))
            .into_iter()
            .map(|line| {
                let mut out = Vec::with_capacity(line.len() + 2);
                if left > 0 {
                    out.push(Segment::plain(" ".repeat(left)));
                }
                out.extend(set_line_length(line, width, &Style::default()));
                if right > 0 {
                    out.push(Segment::plain(" ".repeat(right)));
                }
                out
            })
            .collect()
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        Measurement::new(options.max_width, options.max_width)
    }
}

/// Renders a renderable at exactly `width` columns.
pub struct ForceWidth {
    inner: BoxedRenderable,
    width: usize,
}

impl ForceWidth {
    pub fn new(inner: BoxedRenderable, width: usize) -> Self {
        Self { inner, width: width.max(1) }
    }
}

impl Renderable for ForceWidth {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        self.inner.render(&options.with_width(self.width))
    }

    fn measure(&self, _options: &RenderOptions) -> Measurement {
        Measurement::new(self.width, self.width)
    }
}

/// Vertically stacked renderables separated by blank lines.
pub struct Group {
    items: Vec<BoxedRenderable>,
    gap: usize,
}

impl Group {
    pub fn new(items: Vec<BoxedRenderable>, gap: usize) -> Self {
        Self { items, gap }
    }
}

impl Renderable for Group {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        let mut lines = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            if index > 0 {
                lines.extend((0..self.gap).map(|_| Vec::new()));
            }
            lines.extend(item.render(options));
        }
        lines
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        self.items.iter().map(|item| item.measure(options)).fold(
            Measurement::new(0, 0),
            |acc, m| Measurement::new(acc.minimum.max(m.minimum), acc.maximum.max(m.maximum)),
        )
    }
}

/// Lines with `prefix` in front of each, for quotes and list items.
pub fn prefixed(lines: Vec<Line>, first: Segment, rest: Segment) -> Vec<Line> {
    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            let mut out = Vec::with_capacity(line.len() + 1);
            out.push(if index == 0 { first.clone() } else { rest.clone() });
            out.extend(line);
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::segment::line_text;

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|line| line_text(line)).collect()
    }

    fn boxed(text: &str) -> BoxedRenderable {
        Box::new(Text::plain(text))
    }

    #[test]
    fn padding_surrounds_content() {
        let padding = Padding::new(boxed("hi"), PaddingSpec::symmetric(1, 2), false);
        let lines = padding.render(&RenderOptions::new(20));
        assert_eq!(texts(&lines), vec!["      ", "  hi  ", "      "]);
    }

    #[test]
    fn expanded_padding_fills_the_width() {
        let padding = Padding::new(boxed("hi"), PaddingSpec::uniform(0), true);
        let lines = padding.render(&RenderOptions::new(6));
        assert_eq!(texts(&lines), vec!["hi    "]);
    }

    #[test]
    fn panel_draws_a_border_with_title() {
        let panel = Panel::new(boxed("hello"), BoxKind::Square)
            .title(Some(Text::plain("T")))
            .expand(false);
        let lines = panel.render(&RenderOptions::new(40));
        assert_eq!(texts(&lines), vec!["┌── T ──┐", "│ hello │", "└───────┘"]);
    }

    #[test]
    fn expanded_panel_fills_the_width() {
        let panel = Panel::new(boxed("x"), BoxKind::Ascii);
        let lines = panel.render(&RenderOptions::new(10));
        assert!(lines.iter().all(|line| line_len(line) == 10));
    }

    #[test]
    fn align_centers_the_block() {
        let aligned = Aligned::new(boxed("abc"), Align::Center);
        let lines = aligned.render(&RenderOptions::new(9));
        assert_eq!(texts(&lines), vec!["   abc   "]);
        let right = Aligned::new(boxed("abc"), Align::Right);
        assert_eq!(texts(&right.render(&RenderOptions::new(5))), vec!["  abc"]);
    }

    #[test]
    fn styled_sits_under_existing_styles() {
        let mut text = Text::plain("a");
        text.append("b", Style::parse("red").unwrap());
        let styled = Styled::new(Box::new(text), Style::parse("bold blue").unwrap());
        let lines = styled.render(&RenderOptions::new(10));
        assert_eq!(lines[0][0].style, Style::parse("bold blue").unwrap());
        assert_eq!(lines[0][1].style, Style::parse("bold red").unwrap());
    }

    #[test]
    fn force_width_overrides_available_width() {
        let forced = ForceWidth::new(boxed("aaa bbb"), 3);
        assert_eq!(texts(&forced.render(&RenderOptions::new(80))), vec!["aaa", "bbb"]);
    }
}
