//! Styled text with word wrapping and justification.

use std::borrow::Cow;
use std::ops::Range;

use super::segment::{char_width, simplify, Line, Segment};
use super::style::Style;
use super::{Measurement, RenderOptions, Renderable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
    Right,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Span {
    range: Range<usize>,
    style: Style,
}

/// A string with styled byte ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    plain: String,
    spans: Vec<Span>,
    /// Base style under every span.
    pub style: Style,
    pub justify: Option<Justify>,
    pub no_wrap: bool,
}

type StyledChar = (char, Style);

/// Control characters that would move the cursor on their own. Newlines and
/// tabs are laid out by the text itself, and escapes are left for the ANSI
/// decoder.
fn is_stray_control(ch: char) -> bool {
    ch.is_ascii_control() && !matches!(ch, '\n' | '\t' | '\x1b')
}

/// Remove carriage returns, bells, backspaces and the like from `text`.
pub fn strip_control_codes(text: &str) -> Cow<'_, str> {
    if text.contains(is_stray_control) {
        Cow::Owned(text.chars().filter(|ch| !is_stray_control(*ch)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        let mut plain = text.into();
        if plain.contains(is_stray_control) {
            plain.retain(|ch| !is_stray_control(ch));
        }
        Self { plain, ..Self::default() }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        let mut out = Self::new();
        out.append(&text.into(), style);
        out
    }

    pub fn with_justify(mut self, justify: Option<Justify>) -> Self {
        self.justify = justify;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.plain
    }

    pub fn is_empty(&self) -> bool {
        self.plain.is_empty()
    }

    pub fn push_str(&mut self, text: &str) {
        self.plain.push_str(&strip_control_codes(text));
    }

    pub fn append(&mut self, text: &str, style: Style) {
        let text = strip_control_codes(text);
        let start = self.plain.len();
        self.plain.push_str(&text);
        if !style.is_plain() && !text.is_empty() {
            self.spans.push(Span { range: start..self.plain.len(), style });
        }
    }

    pub fn append_text(&mut self, other: &Text) {
        let offset = self.plain.len();
        self.plain.push_str(&other.plain);
        if !other.style.is_plain() && !other.plain.is_empty() {
            self.spans
                .push(Span { range: offset..offset + other.plain.len(), style: other.style.clone() });
        }
        for span in &other.spans {
            self.spans.push(Span {
                range: span.range.start + offset..span.range.end + offset,
                style: span.style.clone(),
            });
        }
    }

    /// Apply `style` to a byte range of the text.
    pub fn stylize(&mut self, style: Style, range: Range<usize>) {
        let end = range.end.min(self.plain.len());
        if range.start < end && !style.is_plain() {
            self.spans.push(Span { range: range.start..end, style });
        }
    }

    /// Apply `style` to the whole text, beneath existing spans.
    pub fn stylize_before(&mut self, style: Style) {
        if !style.is_plain() && !self.plain.is_empty() {
            self.spans.insert(0, Span { range: 0..self.plain.len(), style });
        }
    }

    /// Remove trailing whitespace (and the spans that only covered it).
    pub fn rstrip(&mut self) {
        let trimmed = self.plain.trim_end().len();
        self.plain.truncate(trimmed);
        self.spans.retain_mut(|span| {
            span.range.end = span.range.end.min(trimmed);
            span.range.start < span.range.end
        });
    }

    /// Remove leading and trailing whitespace.
    pub fn strip(&mut self) {
        self.rstrip();
        let start = self.plain.len() - self.plain.trim_start().len();
        if start > 0 {
            *self = self.slice(start..self.plain.len());
        }
    }

    /// Split into one `Text` per line, keeping styles.
    pub fn split_lines(&self) -> Vec<Text> {
        let mut lines = Vec::new();
        let mut start = 0;
        for (index, ch) in self.plain.char_indices() {
            if ch == '\n' {
                lines.push(self.slice(start..index));
                start = index + 1;
            }
        }
        lines.push(self.slice(start..self.plain.len()));
        lines
    }

    /// Copy of a byte range, keeping overlapping spans.
    pub fn slice(&self, range: Range<usize>) -> Text {
        let spans = self
            .spans
            .iter()
            .filter_map(|span| {
                let start = span.range.start.max(range.start);
                let end = span.range.end.min(range.end);
                (start < end)
                    .then(|| Span { range: start - range.start..end - range.start, style: span.style.clone() })
            })
            .collect();
        Text {
            plain: self.plain[range].to_string(),
            spans,
            style: self.style.clone(),
            justify: self.justify,
            no_wrap: self.no_wrap,
        }
    }

    /// Width of the widest line in cells.
    pub fn cell_len(&self) -> usize {
        self.plain.split('\n').map(super::segment::cell_len).max().unwrap_or(0)
    }

    fn styled_chars(&self) -> Vec<StyledChar> {
        let mut chars: Vec<StyledChar> =
            self.plain.chars().map(|ch| (ch, self.style.clone())).collect();
        if self.spans.is_empty() {
            return chars;
        }
        let offsets: Vec<usize> = self.plain.char_indices().map(|(offset, _)| offset).collect();
        for span in &self.spans {
            let first = offsets.partition_point(|offset| *offset < span.range.start);
            let last = offsets.partition_point(|offset| *offset < span.range.end);
            for (_, style) in &mut chars[first..last] {
                *style = style.combine(&span.style);
            }
        }
        chars
    }

    /// Consecutive runs of characters that share a style.
    pub fn runs(&self) -> Vec<(String, Style)> {
        let mut runs: Vec<(String, Style)> = Vec::new();
        for (ch, style) in self.styled_chars() {
            match runs.last_mut() {
                Some((text, last)) if *last == style => text.push(ch),
                _ => runs.push((ch.to_string(), style)),
            }
        }
        runs
    }

    /// Lay the text out in lines no wider than `width`.
    pub fn wrap(&self, width: usize, justify: Option<Justify>, no_wrap: bool) -> Vec<Line> {
        let width = width.max(1);
        let chars = self.styled_chars();
        let mut out = Vec::new();
        for paragraph in chars.split(|(ch, _)| *ch == '\n') {
            let lines = if no_wrap {
                vec![crop_chars(paragraph, width)]
            } else {
                wrap_paragraph(paragraph, width)
            };
            let count = lines.len();
            for (index, line) in lines.into_iter().enumerate() {
                let is_last = index + 1 == count;
                out.push(to_segments(justify_line(line, width, justify, is_last)));
            }
        }
        out
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::plain(value)
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text::plain(value)
    }
}

impl Renderable for Text {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        if options.soft_wrap {
            return self.wrap(usize::MAX, None, true);
        }
        let justify = self.justify.or(options.justify);
        self.wrap(options.max_width, justify, self.no_wrap || options.no_wrap)
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        let maximum = self.cell_len();
        let minimum = self
            .plain
            .split_whitespace()
            .map(super::segment::cell_len)
            .max()
            .unwrap_or(0);
        Measurement::new(minimum, maximum).clamp(options.max_width)
    }
}

fn chars_width(chars: &[StyledChar]) -> usize {
    chars.iter().map(|(ch, _)| char_width(*ch)).sum()
}

fn crop_chars(chars: &[StyledChar], width: usize) -> Vec<StyledChar> {
    let mut used = 0;
    let mut out = Vec::new();
    for (ch, style) in chars {
        let w = char_width(*ch);
        if used + w > width {
            break;
        }
        used += w;
        out.push((*ch, style.clone()));
    }
    out
}

fn trim_trailing_spaces(line: &mut Vec<StyledChar>) {
    while matches!(line.last(), Some((ch, _)) if ch.is_whitespace()) {
        line.pop();
    }
}

/// Greedy word wrap; words longer than the width are folded.
fn wrap_paragraph(chars: &[StyledChar], width: usize) -> Vec<Vec<StyledChar>> {
    let mut lines = Vec::new();
    let mut current: Vec<StyledChar> = Vec::new();
    let mut current_width = 0;

    for token in tokens(chars) {
        let is_space = token[0].0.is_whitespace();
        let token_width = chars_width(token);
        if current_width + token_width <= width {
            current.extend_from_slice(token);
            current_width += token_width;
            continue;
        }
        if is_space {
            trim_trailing_spaces(&mut current);
            lines.push(std::mem::take(&mut current));
            current_width = 0;
            continue;
        }
        trim_trailing_spaces(&mut current);
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if token_width <= width {
            current.extend_from_slice(token);
            current_width = token_width;
            continue;
        }
        for styled in token {
            let w = char_width(styled.0);
            if current_width + w > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(styled.clone());
            current_width += w;
        }
    }
    lines.push(current);
    lines
}

/// Split into alternating runs of whitespace and non-whitespace.
fn tokens(chars: &[StyledChar]) -> Vec<&[StyledChar]> {
    let mut out = Vec::new();
    let mut start = 0;
    for index in 1..=chars.len() {
        let boundary = index == chars.len()
            || chars[index].0.is_whitespace() != chars[index - 1].0.is_whitespace();
        if boundary {
            out.push(&chars[start..index]);
            start = index;
        }
    }
    out
}

fn justify_line(
    mut line: Vec<StyledChar>,
    width: usize,
    justify: Option<Justify>,
    is_last: bool,
) -> Vec<StyledChar> {
    let Some(justify) = justify else {
        return line;
    };
    trim_trailing_spaces(&mut line);
    let length = chars_width(&line);
    if length >= width {
        return line;
    }
    let gap = width - length;
    let pad = |count: usize| std::iter::repeat((' ', Style::default())).take(count);
    match justify {
        Justify::Left => {
            line.extend(pad(gap));
            line
        }
        Justify::Right => pad(gap).chain(line).collect(),
        Justify::Center => {
            let left = gap / 2;
            pad(left).chain(line).chain(pad(gap - left)).collect()
        }
        Justify::Full if is_last => {
            line.extend(pad(gap));
            line
        }
        Justify::Full => full_justify(line, gap),
    }
}

fn full_justify(line: Vec<StyledChar>, extra: usize) -> Vec<StyledChar> {
    let leading = line.iter().take_while(|(ch, _)| ch.is_whitespace()).count();
    let words: Vec<Vec<StyledChar>> = line[leading..]
        .split(|(ch, _)| ch.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(<[StyledChar]>::to_vec)
        .collect();
    if words.len() < 2 {
        let mut line = line;
        line.extend(std::iter::repeat((' ', Style::default())).take(extra));
        return line;
    }
    let spaces_in_line = line[leading..].iter().filter(|(ch, _)| ch.is_whitespace()).count();
    let total_spaces = spaces_in_line + extra;
    let gaps = words.len() - 1;
    let mut out: Vec<StyledChar> = line[..leading].to_vec();
    for (index, word) in words.into_iter().enumerate() {
        out.extend(word);
        if index < gaps {
            let count = total_spaces / gaps + usize::from(index < total_spaces % gaps);
            out.extend(std::iter::repeat((' ', Style::default())).take(count));
        }
    }
    out
}

fn to_segments(chars: Vec<StyledChar>) -> Line {
    let line = chars.into_iter().map(|(ch, style)| Segment::new(ch.to_string(), style)).collect();
    simplify(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::segment::{line_len, line_text};

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|line| line_text(line)).collect()
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let text = Text::plain("the quick brown fox jumps");
        let lines = text.wrap(10, None, false);
        assert_eq!(texts(&lines), vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn folds_words_longer_than_the_width() {
        let lines = Text::plain("abcdefghij").wrap(4, None, false);
        assert_eq!(texts(&lines), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn no_wrap_crops() {
        let lines = Text::plain("hello world").wrap(5, None, true);
        assert_eq!(texts(&lines), vec!["hello"]);
    }

    #[test]
    fn justification() {
        let text = Text::plain("ab");
        assert_eq!(texts(&text.wrap(6, Some(Justify::Right), false)), vec!["    ab"]);
        assert_eq!(texts(&text.wrap(6, Some(Justify::Center), false)), vec!["  ab  "]);
        assert_eq!(texts(&text.wrap(6, Some(Justify::Left), false)), vec!["ab    "]);
    }

    #[test]
    fn full_justify_stretches_all_but_the_last_line() {
        let lines = Text::plain("aa bb cc dd").wrap(9, Some(Justify::Full), false);
        assert_eq!(texts(&lines), vec!["aa  bb cc", "dd       "]);
        assert!(lines.iter().all(|line| line_len(line) == 9));
    }

    #[test]
    fn spans_survive_wrapping() {
        let mut text = Text::plain("plain ");
        text.append("bold", Style::new().bold());
        let lines = text.wrap(80, None, false);
        assert_eq!(lines[0].len(), 2);
        assert_eq!(lines[0][1].text, "bold");
        assert!(lines[0][1].style.has(crate::render::style::Attribute::Bold));
    }

    #[test]
    fn split_lines_keeps_styles() {
        let mut text = Text::new();
        text.append("one\ntwo", Style::new().italic());
        let parts = text.split_lines();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].as_str(), "two");
        let rendered = parts[1].wrap(10, None, false);
        assert!(rendered[0][0].style.has(crate::render::style::Attribute::Italic));
    }

    #[test]
    fn measure_reports_longest_word_and_line() {
        let text = Text::plain("a bbbb cc\nddddddd");
        let measurement = text.measure(&RenderOptions::new(80));
        assert_eq!(measurement, Measurement::new(7, 9));
    }

    #[test]
    fn control_codes_are_stripped() {
        assert_eq!(Text::plain("a\r\nb\x07").as_str(), "a\nb");
        let mut text = Text::new();
        text.append("x\ry\x08", Style::new().bold());
        text.push_str("\tz");
        assert_eq!(text.as_str(), "xy\tz");
        assert_eq!(strip_control_codes("keep \x1b[1m"), "keep \x1b[1m");
    }
}
