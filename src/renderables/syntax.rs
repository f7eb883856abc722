//! Syntax highlighted source code.
//!
//! Lexing and themes come from syntect's bundled defaults. Theme names from
//! other highlighters (`monokai`, `ansi_dark`, ...) are mapped onto the
//! closest bundled theme.

use once_cell::sync::Lazy;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::render::segment::{cell_len, set_line_length};
use crate::render::{Color, Line, Measurement, RenderOptions, Renderable, Segment, Style, Text};

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

const DEFAULT_THEME: &str = "base16-ocean.dark";
const TAB_SIZE: usize = 4;

const THEME_ALIASES: &[(&str, &str)] = &[
    ("ansi_dark", "base16-ocean.dark"),
    ("ansi_light", "base16-ocean.light"),
    ("monokai", "base16-mocha.dark"),
    ("dracula", "base16-mocha.dark"),
    ("one-dark", "base16-eighties.dark"),
    ("eighties", "base16-eighties.dark"),
    ("github", "InspiredGitHub"),
    ("github-light", "InspiredGitHub"),
    ("default", "InspiredGitHub"),
    ("solarized-dark", "Solarized (dark)"),
    ("solarized_dark", "Solarized (dark)"),
    ("solarized-light", "Solarized (light)"),
    ("solarized_light", "Solarized (light)"),
];

/// A resolved theme plus whether its background should be painted.
#[derive(Clone, Copy)]
pub struct CodeTheme {
    theme: &'static Theme,
    /// `ansi_*` themes leave the terminal's own colors alone.
    ansi: bool,
}

impl CodeTheme {
    /// Look up a theme by syntect name or alias; unknown names fall back to
    /// the default with a warning.
    pub fn resolve(name: &str) -> Self {
        let lowered = name.trim().to_ascii_lowercase();
        let ansi = lowered.starts_with("ansi_");
        let target = THEME_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map_or(name.trim(), |(_, theme)| *theme);

        let theme = match THEME_SET.themes.get(target) {
            Some(theme) => theme,
            None => {
                tracing::warn!("unknown theme {:?}, using {}", name, DEFAULT_THEME);
                &THEME_SET.themes[DEFAULT_THEME]
            }
        };
        tracing::debug!("theme {:?} resolved to {:?}", name, target);
        Self { theme, ansi }
    }

    fn background(&self) -> Option<Color> {
        if self.ansi {
            return None;
        }
        self.theme.settings.background.map(|c| Color::Rgb(c.r, c.g, c.b))
    }

    fn convert(&self, style: syntect::highlighting::Style) -> Style {
        let fg = style.foreground;
        let is_default_fg = self
            .theme
            .settings
            .foreground
            .is_some_and(|default| default.r == fg.r && default.g == fg.g && default.b == fg.b);
        let mut out = Style::new();
        if !(self.ansi && is_default_fg) {
            out = out.fg(Color::Rgb(fg.r, fg.g, fg.b));
        }
        if style.font_style.contains(FontStyle::BOLD) {
            out = out.bold();
        }
        if style.font_style.contains(FontStyle::ITALIC) {
            out = out.italic();
        }
        if style.font_style.contains(FontStyle::UNDERLINE) {
            out = out.underline();
        }
        out
    }
}

/// Find the syntax for an explicit lexer name, a file name, or the first line.
pub fn find_syntax(lexer: Option<&str>, path: Option<&str>, code: &str) -> &'static SyntaxReference {
    let set: &'static SyntaxSet = &SYNTAX_SET;
    if let Some(lexer) = lexer.map(str::trim).filter(|lexer| !lexer.is_empty()) {
        if matches!(lexer.to_ascii_lowercase().as_str(), "text" | "default" | "plain") {
            return set.find_syntax_plain_text();
        }
        let found = set.find_syntax_by_token(lexer).or_else(|| {
            set.syntaxes().iter().find(|syntax| syntax.name.eq_ignore_ascii_case(lexer))
        });
        if let Some(syntax) = found {
            tracing::debug!("lexer {:?} resolved to {}", lexer, syntax.name);
            return syntax;
        }
        tracing::debug!("no syntax for lexer {:?}", lexer);
    }
    if let Some(path) = path {
        let path = std::path::Path::new(path);
        let by_name = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| set.find_syntax_by_extension(ext))
            .or_else(|| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| set.find_syntax_by_extension(name))
            });
        if let Some(syntax) = by_name {
            return syntax;
        }
    }
    code.lines()
        .next()
        .and_then(|line| set.find_syntax_by_first_line(line))
        .unwrap_or_else(|| set.find_syntax_plain_text())
}

pub fn expand_tabs(line: &str) -> String {
    expand_tabs_at(line, &mut 0)
}

/// Expand tabs in a piece of a line that starts at cell `column`, moving
/// `column` past it.
fn expand_tabs_at(piece: &str, column: &mut usize) -> String {
    if !piece.contains('\t') {
        *column += cell_len(piece);
        return piece.to_string();
    }
    let mut out = String::with_capacity(piece.len() + TAB_SIZE);
    for ch in piece.chars() {
        if ch == '\t' {
            let spaces = TAB_SIZE - *column % TAB_SIZE;
            out.extend(std::iter::repeat(' ').take(spaces));
            *column += spaces;
        } else {
            out.push(ch);
            *column += crate::render::segment::char_width(ch);
        }
    }
    out
}

pub struct Syntax {
    code: String,
    syntax: &'static SyntaxReference,
    theme: CodeTheme,
    line_numbers: bool,
    indent_guides: bool,
    word_wrap: bool,
    /// First and last line to show, 1-based and inclusive.
    line_range: Option<(usize, usize)>,
}

impl Syntax {
    pub fn new(code: impl Into<String>, lexer: Option<&str>, path: Option<&str>, theme: &str) -> Self {
        let code = code.into();
        let syntax = find_syntax(lexer, path, &code);
        Self {
            code,
            syntax,
            theme: CodeTheme::resolve(theme),
            line_numbers: false,
            indent_guides: false,
            word_wrap: false,
            line_range: None,
        }
    }

    pub fn line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    pub fn indent_guides(mut self, enabled: bool) -> Self {
        self.indent_guides = enabled;
        self
    }

    pub fn word_wrap(mut self, enabled: bool) -> Self {
        self.word_wrap = enabled;
        self
    }

    /// Show only the first `head` or last `tail` lines.
    pub fn head_tail(mut self, head: Option<usize>, tail: Option<usize>) -> Self {
        let count = self.code.lines().count();
        self.line_range = match (head, tail) {
            (Some(head), _) => Some((1, head.min(count))),
            (None, Some(tail)) => Some((count.saturating_sub(tail) + 1, count)),
            (None, None) => None,
        };
        self
    }

    pub fn syntax_name(&self) -> &str {
        &self.syntax.name
    }

    fn visible_range(&self) -> (usize, usize) {
        let count = self.code.lines().count();
        self.line_range.unwrap_or((1, count))
    }

    fn gutter_width(&self) -> usize {
        if !self.line_numbers {
            return 0;
        }
        let (_, last) = self.visible_range();
        last.max(1).to_string().len() + 2
    }

    /// One styled text per source line, tabs expanded.
    pub fn highlight(&self) -> Vec<Text> {
        let mut highlighter = HighlightLines::new(self.syntax, self.theme.theme);
        let mut out = Vec::new();
        for line in LinesWithEndings::from(&self.code) {
            let mut text = Text::new();
            match highlighter.highlight_line(line, &SYNTAX_SET) {
                Ok(tokens) => {
                    let mut column = 0;
                    for (style, token) in tokens {
                        let token = token.trim_end_matches(['\n', '\r']);
                        text.append(&expand_tabs_at(token, &mut column), self.theme.convert(style));
                    }
                }
                Err(e) => {
                    tracing::debug!("highlighting failed, showing plain text: {}", e);
                    text.append(&expand_tabs(line.trim_end_matches(['\n', '\r'])), Style::default());
                }
            }
            out.push(text);
        }
        out
    }

    fn guides(&self, text: &Text) -> Text {
        let plain = text.as_str();
        let indent = plain.len() - plain.trim_start_matches(' ').len();
        if indent == 0 || indent == plain.len() {
            return text.clone();
        }
        let mut guided = Text::new();
        for column in 0..indent {
            if column % TAB_SIZE == 0 {
                guided.append("│", Style::new().dim());
            } else {
                guided.append(" ", Style::default());
            }
        }
        guided.append_text(&text.slice(indent..plain.len()));
        guided
    }
}

impl Renderable for Syntax {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        let gutter = self.gutter_width();
        let code_width = options.max_width.saturating_sub(gutter).max(1);
        let background = self.theme.background().map(|bg| Style::new().on(bg));
        let number_style = Style::new().dim();
        let (first, last) = self.visible_range();

        let mut lines = Vec::new();
        for (index, text) in self.highlight().into_iter().enumerate() {
            let number = index + 1;
            if number < first || number > last {
                continue;
            }
            let text = if self.indent_guides { self.guides(&text) } else { text };
            let wrapped = text.wrap(code_width, None, !self.word_wrap);
            for (part, segments) in wrapped.into_iter().enumerate() {
                let mut line = Vec::with_capacity(segments.len() + 1);
                if gutter > 0 {
                    let label = if part == 0 {
                        format!("{:>width$} ", number, width = gutter - 1)
                    } else {
                        " ".repeat(gutter)
                    };
                    line.push(Segment::new(label, number_style.clone()));
                }
                match &background {
                    Some(bg) => {
                        let mut code = set_line_length(segments, code_width, bg);
                        for segment in &mut code {
                            segment.style = bg.combine(&segment.style);
                        }
                        line.extend(code);
                    }
                    None => line.extend(segments),
                }
                lines.push(line);
            }
        }
        lines
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        let longest = self.code.lines().map(|line| cell_len(&expand_tabs(line))).max().unwrap_or(0);
        let gutter = self.gutter_width();
        Measurement::new(gutter + 1, gutter + longest).clamp(options.max_width)
    }
}
