//! HTML and SVG export of recorded console output.

use std::collections::HashMap;
use std::fmt::Write as _;

use super::segment::{cell_len, Line};
use super::style::{Style, TerminalTheme, DEFAULT_TERMINAL_THEME, SVG_EXPORT_THEME};

const FONT_FAMILY: &str = "Menlo,'DejaVu Sans Mono',consolas,'Courier New',monospace";

/// Escape HTML special characters for safe embedding in HTML and SVG.
pub fn html_escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Assigns a stable class number to each distinct CSS rule.
#[derive(Default)]
struct StyleClasses {
    rules: Vec<String>,
    by_rule: HashMap<String, usize>,
}

impl StyleClasses {
    fn class_for(&mut self, css: String) -> Option<usize> {
        if css.is_empty() {
            return None;
        }
        if let Some(index) = self.by_rule.get(&css) {
            return Some(*index);
        }
        self.rules.push(css.clone());
        let index = self.rules.len();
        self.by_rule.insert(css, index);
        Some(index)
    }
}

/// A complete HTML document with the recorded lines inside a `<pre>`.
pub fn html(lines: &[Line]) -> String {
    let theme = &DEFAULT_TERMINAL_THEME;
    let mut classes = StyleClasses::default();
    let mut body = String::new();

    for line in lines {
        for segment in line {
            let escaped = html_escape(&segment.text);
            let mut fragment = match classes.class_for(segment.style.css(theme)) {
                Some(index) => format!("<span class=\"r{index}\">{escaped}</span>"),
                None => escaped,
            };
            if let Some(url) = &segment.style.link {
                fragment = format!("<a href=\"{}\">{fragment}</a>", html_escape(url));
            }
            body.push_str(&fragment);
        }
        body.push('\n');
    }

    let mut stylesheet = String::new();
    for (index, rule) in classes.rules.iter().enumerate() {
        let _ = writeln!(stylesheet, ".r{} {{{}}}", index + 1, rule);
    }

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\"/>\n\
         <style>\n\
         {stylesheet}\
         body {{\n    color: {fg};\n    background-color: {bg};\n}}\n\
         </style>\n\
         </head>\n\
         <body>\n    \
         <pre style=\"font-family:{FONT_FAMILY}\"><code style=\"font-family:inherit\">{body}</code></pre>\n\
         </body>\n\
         </html>\n",
        fg = hex(theme.foreground),
        bg = hex(theme.background),
    )
}

const CHAR_WIDTH: f64 = 12.2;
const LINE_HEIGHT: f64 = 24.4;
const FONT_SIZE: f64 = 20.0;
const MARGIN: f64 = 16.0;
const CHROME_HEIGHT: f64 = 40.0;

/// A terminal-window style SVG of the recorded lines.
pub fn svg(lines: &[Line], title: &str, width: usize) -> String {
    let theme = &SVG_EXPORT_THEME;
    let columns = lines
        .iter()
        .map(|line| line.iter().map(|segment| segment.cell_len()).sum::<usize>())
        .max()
        .unwrap_or(0)
        .max(width.min(120))
        .max(1);
    let terminal_width = columns as f64 * CHAR_WIDTH;
    let terminal_height = lines.len().max(1) as f64 * LINE_HEIGHT;
    let total_width = terminal_width + MARGIN * 2.0 + 2.0 * MARGIN;
    let total_height = terminal_height + CHROME_HEIGHT + MARGIN * 3.0;

    let mut classes = StyleClasses::default();
    let mut backgrounds = String::new();
    let mut texts = String::new();

    for (row, line) in lines.iter().enumerate() {
        let y = row as f64 * LINE_HEIGHT;
        let mut column = 0usize;
        for segment in line {
            let length = cell_len(&segment.text);
            let x = column as f64 * CHAR_WIDTH;
            column += length;
            if length == 0 {
                continue;
            }
            if let Some(bg) = svg_background(&segment.style, theme) {
                let _ = writeln!(
                    backgrounds,
                    "<rect fill=\"{bg}\" x=\"{x:.1}\" y=\"{y:.1}\" width=\"{w:.1}\" height=\"{h:.1}\" shape-rendering=\"crispEdges\"/>",
                    w = length as f64 * CHAR_WIDTH,
                    h = LINE_HEIGHT,
                );
            }
            if segment.text.trim().is_empty() {
                continue;
            }
            let class = classes
                .class_for(svg_css(&segment.style, theme))
                .map(|index| format!(" class=\"r{index}\""))
                .unwrap_or_default();
            let escaped = html_escape(&segment.text).replace(' ', "&#160;");
            let _ = writeln!(
                texts,
                "<text{class} x=\"{x:.1}\" y=\"{baseline:.1}\" textLength=\"{w:.1}\">{escaped}</text>",
                baseline = y + LINE_HEIGHT * 0.8,
                w = length as f64 * CHAR_WIDTH,
            );
        }
    }

    let mut stylesheet = String::new();
    let _ = writeln!(
        stylesheet,
        ".terminal {{ font-family: {FONT_FAMILY}; font-size: {FONT_SIZE}px; fill: {}; }}",
        hex(theme.foreground)
    );
    let _ = writeln!(stylesheet, ".title {{ font-size: 18px; font-weight: bold; fill: {}; }}", hex(theme.foreground));
    for (index, rule) in classes.rules.iter().enumerate() {
        let _ = writeln!(stylesheet, ".r{} {{ {} }}", index + 1, rule);
    }

    format!(
        "<svg class=\"rich-terminal\" viewBox=\"0 0 {total_width:.1} {total_height:.1}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         <style>\n{stylesheet}</style>\n\
         <rect fill=\"{bg}\" stroke=\"rgba(255,255,255,0.35)\" stroke-width=\"1\" x=\"{MARGIN}\" y=\"{MARGIN}\" width=\"{window_width:.1}\" height=\"{window_height:.1}\" rx=\"8\"/>\n\
         <text class=\"title\" x=\"{title_x:.1}\" y=\"{title_y:.1}\" text-anchor=\"middle\">{title}</text>\n\
         <g transform=\"translate({dots_x},{dots_y})\">\n\
         <circle cx=\"0\" cy=\"0\" r=\"7\" fill=\"#ff5f57\"/>\n\
         <circle cx=\"22\" cy=\"0\" r=\"7\" fill=\"#febc2e\"/>\n\
         <circle cx=\"44\" cy=\"0\" r=\"7\" fill=\"#28c840\"/>\n\
         </g>\n\
         <g class=\"terminal\" transform=\"translate({content_x},{content_y})\">\n\
         {backgrounds}{texts}</g>\n\
         </svg>\n",
        bg = hex(theme.background),
        window_width = total_width - MARGIN * 2.0,
        window_height = total_height - MARGIN * 2.0,
        title_x = total_width / 2.0,
        title_y = MARGIN + 26.0,
        title = html_escape(title),
        dots_x = MARGIN * 2.0,
        dots_y = MARGIN + 20.0,
        content_x = MARGIN * 2.0,
        content_y = MARGIN + CHROME_HEIGHT,
    )
}

fn svg_background(style: &Style, theme: &TerminalTheme) -> Option<String> {
    let css = style.css(theme);
    css.split("; ")
        .find_map(|rule| rule.strip_prefix("background-color: "))
        .map(str::to_string)
}

/// SVG text uses `fill` rather than `color`, and backgrounds are drawn as rects.
fn svg_css(style: &Style, theme: &TerminalTheme) -> String {
    style
        .css(theme)
        .split("; ")
        .filter(|rule| !rule.is_empty() && !rule.starts_with("background-color"))
        .map(|rule| match rule.strip_prefix("color: ") {
            Some(color) => format!("fill: {color}"),
            None => rule.to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::segment::Segment;

    fn sample() -> Vec<Line> {
        vec![
            vec![Segment::new("hello", Style::parse("bold green").unwrap())],
            vec![Segment::plain("a <b> & \"c\"")],
        ]
    }

    #[test]
    fn html_is_a_complete_document() {
        let html = html(&sample());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<head>") && html.contains("<body>") && html.contains("</html>"));
        assert!(html.contains(".r1 {color: #008000; font-weight: bold}"));
        assert!(html.contains("<span class=\"r1\">hello</span>"));
        assert!(html.contains("a &lt;b&gt; &amp; &quot;c&quot;"));
        assert!(!html.contains('\x1b'));
    }

    #[test]
    fn html_reuses_classes() {
        let bold = Style::new().bold();
        let lines = vec![vec![Segment::new("a", bold.clone())], vec![Segment::new("b", bold)]];
        let html = html(&lines);
        assert!(html.contains(".r1 "));
        assert!(!html.contains(".r2 "));
    }

    #[test]
    fn svg_uses_fill_and_escapes_text() {
        let svg = svg(&sample(), "Rich", 80);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("fill: #98a84b; font-weight: bold"));
        assert!(svg.contains("a&#160;&lt;b&gt;&#160;&amp;&#160;&quot;c&quot;"));
        assert!(!svg.contains('\x1b'));
    }
}
