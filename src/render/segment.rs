//! Styled runs of text and helpers for working with rendered lines.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use super::style::Style;

/// A run of text that shares one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

/// One rendered row of output.
pub type Line = Vec<Segment>;

impl Segment {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self { text: text.into(), style }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::default())
    }

    pub fn cell_len(&self) -> usize {
        cell_len(&self.text)
    }
}

/// Number of terminal cells `text` occupies.
pub fn cell_len(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

pub fn line_len(line: &[Segment]) -> usize {
    line.iter().map(Segment::cell_len).sum()
}

pub fn blank_line(width: usize, style: &Style) -> Line {
    if width == 0 {
        return Vec::new();
    }
    vec![Segment::new(" ".repeat(width), style.clone())]
}

/// Crop or pad `line` so it is exactly `width` cells wide.
pub fn set_line_length(mut line: Line, width: usize, style: &Style) -> Line {
    let length = line_len(&line);
    if length > width {
        return crop_line(line, width);
    }
    if length < width {
        line.push(Segment::new(" ".repeat(width - length), style.clone()));
    }
    line
}

/// Drop everything past `width` cells.
///
/// A wide character straddling the boundary is replaced by a space.
pub fn crop_line(line: Line, width: usize) -> Line {
    let mut out = Vec::with_capacity(line.len());
    let mut used = 0;
    for segment in line {
        if used >= width {
            break;
        }
        let length = segment.cell_len();
        if used + length <= width {
            used += length;
            out.push(segment);
            continue;
        }
        let mut text = String::new();
        for ch in segment.text.chars() {
            let w = char_width(ch);
            if used + w > width {
                if used < width {
                    text.push(' ');
                    used += 1;
                }
                break;
            }
            text.push(ch);
            used += w;
        }
        out.push(Segment::new(text, segment.style));
    }
    out
}

/// Apply `style` underneath every segment's own style.
pub fn apply_style(lines: &mut [Line], style: &Style) {
    if style.is_plain() {
        return;
    }
    for line in lines {
        for segment in line.iter_mut() {
            segment.style = style.combine(&segment.style);
        }
    }
}

/// Merge neighbouring segments that share a style.
pub fn simplify(line: Line) -> Line {
    let mut out: Line = Vec::with_capacity(line.len());
    for segment in line {
        if segment.text.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.style == segment.style => last.text.push_str(&segment.text),
            _ => out.push(segment),
        }
    }
    out
}

/// Plain text of a line with styles dropped.
pub fn line_text(line: &[Segment]) -> String {
    line.iter().map(|segment| segment.text.as_str()).collect()
}
