//! Core types shared across modules.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Deserialize;

use crate::render::{Justify, Style};

/// How a resource is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Syntax,
    Print,
    Rule,
    Json,
    Markdown,
    Rst,
    Csv,
    Notebook,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Syntax => "syntax",
            Mode::Print => "print",
            Mode::Rule => "rule",
            Mode::Json => "json",
            Mode::Markdown => "markdown",
            Mode::Rst => "rst",
            Mode::Csv => "csv",
            Mode::Notebook => "ipynb",
        };
        f.write_str(name)
    }
}

/// Horizontal placement of the whole output block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Border drawn by `--panel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelBox {
    #[default]
    None,
    Ascii,
    Ascii2,
    Square,
    Rounded,
    Heavy,
    Double,
}

/// Space around the output, in CSS order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaddingSpec {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

pub const PADDING_ERROR: &str = "padding should be 1, 2 or 4 integers separated by commas";

impl PaddingSpec {
    pub fn uniform(pad: usize) -> Self {
        Self { top: pad, right: pad, bottom: pad, left: pad }
    }

    pub fn symmetric(vertical: usize, horizontal: usize) -> Self {
        Self { top: vertical, right: horizontal, bottom: vertical, left: horizontal }
    }

    /// Parse `"1"`, `"1,2"` or `"1,2,3,4"`.
    pub fn parse(value: &str) -> Result<Self, String> {
        let values = value
            .split(',')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| PADDING_ERROR.to_string())?;
        match values[..] {
            [pad] => Ok(Self::uniform(pad)),
            [vertical, horizontal] => Ok(Self::symmetric(vertical, horizontal)),
            [top, right, bottom, left] => Ok(Self { top, right, bottom, left }),
            _ => Err(PADDING_ERROR.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }
}

/// Defaults read from a config file. Every field is optional; CLI flags and
/// environment variables take precedence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub theme: Option<String>,
    pub line_numbers: Option<bool>,
    pub guides: Option<bool>,
    pub hyperlinks: Option<bool>,
    pub panel: Option<PanelBox>,
    pub panel_style: Option<String>,
    pub rule_style: Option<String>,
    pub rule_char: Option<String>,
    pub max_width: Option<usize>,
    pub emoji: Option<bool>,
    pub pager: Option<bool>,
}

/// Every display option after merging CLI flags, environment and config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub resource: String,
    /// Mode chosen explicitly with a flag.
    pub mode: Option<Mode>,

    pub width: Option<usize>,
    pub max_width: Option<usize>,
    pub justify: Option<Justify>,
    pub align: Option<Align>,
    pub style: Style,
    pub padding: Option<PaddingSpec>,
    pub expand: bool,

    pub panel: PanelBox,
    pub panel_style: Style,
    pub title: Option<String>,
    pub caption: Option<String>,

    pub theme: String,
    pub lexer: Option<String>,
    pub line_numbers: bool,
    pub guides: bool,
    pub hyperlinks: bool,
    pub no_wrap: bool,
    pub soft_wrap: bool,
    pub emoji: bool,

    pub rule_style: Style,
    pub rule_char: String,

    pub head: Option<usize>,
    pub tail: Option<usize>,

    pub pager: bool,
    pub force_terminal: bool,
    pub preprocess_ansi: bool,
    pub export_html: Option<PathBuf>,
    pub export_svg: Option<PathBuf>,
}

pub const DEFAULT_THEME: &str = "ansi_dark";
pub const DEFAULT_RULE_STYLE: &str = "bright_green";
pub const DEFAULT_RULE_CHAR: &str = "─";

impl Default for Settings {
    fn default() -> Self {
        Self {
            resource: String::new(),
            mode: None,
            width: None,
            max_width: None,
            justify: None,
            align: None,
            style: Style::default(),
            padding: None,
            expand: false,
            panel: PanelBox::None,
            panel_style: Style::default(),
            title: None,
            caption: None,
            theme: DEFAULT_THEME.to_string(),
            lexer: None,
            line_numbers: false,
            guides: false,
            hyperlinks: false,
            no_wrap: false,
            soft_wrap: false,
            emoji: false,
            rule_style: Style::default().fg(crate::render::Color::Standard(10)),
            rule_char: DEFAULT_RULE_CHAR.to_string(),
            head: None,
            tail: None,
            pager: false,
            force_terminal: false,
            preprocess_ansi: false,
            export_html: None,
            export_svg: None,
        }
    }
}

impl Settings {
    pub fn exporting(&self) -> bool {
        self.export_html.is_some() || self.export_svg.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_accepts_one_two_or_four_values() {
        assert_eq!(PaddingSpec::parse("2").unwrap(), PaddingSpec::uniform(2));
        assert_eq!(PaddingSpec::parse("1, 4").unwrap(), PaddingSpec::symmetric(1, 4));
        assert_eq!(
            PaddingSpec::parse("1,2,3,4").unwrap(),
            PaddingSpec { top: 1, right: 2, bottom: 3, left: 4 }
        );
    }

    #[test]
    fn padding_rejects_other_shapes() {
        for bad in ["1,2,3", "", "a", "-1", "1,2,3,4,5"] {
            assert_eq!(PaddingSpec::parse(bad).unwrap_err(), PADDING_ERROR, "{bad:?}");
        }
    }
}
