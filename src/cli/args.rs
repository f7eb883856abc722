//! Display options

use clap::builder::FalseyValueParser;
use clap::{value_parser, ArgGroup, Args};
use std::path::PathBuf;

use crate::config::CliOverrides;
use crate::domain::{Align, Mode, PaddingSpec, PanelBox};
use crate::render::Justify;

#[derive(Args, Debug, Default)]
#[command(group(ArgGroup::new("mode").multiple(false)
    .args(["print", "rule", "json", "markdown", "rst", "csv", "ipynb", "syntax"])))]
#[command(group(ArgGroup::new("align").multiple(false).args(["left", "center", "right"])))]
#[command(group(ArgGroup::new("justify").multiple(false)
    .args(["text_left", "text_right", "text_center", "text_full"])))]
pub struct RenderArgs {
    /// Path, URL, text to render, or '-' for stdin
    #[arg(value_name = "RESOURCE")]
    pub resource: Option<String>,

    /// Print console markup
    #[arg(short = 'p', long, help_heading = "Mode")]
    pub print: bool,

    /// Display a horizontal rule with the resource as title
    #[arg(short = 'u', long, help_heading = "Mode")]
    pub rule: bool,

    /// Display as JSON
    #[arg(short = 'j', long, help_heading = "Mode")]
    pub json: bool,

    /// Display as Markdown
    #[arg(short = 'm', long, help_heading = "Mode")]
    pub markdown: bool,

    /// Display as reStructuredText
    #[arg(long, help_heading = "Mode")]
    pub rst: bool,

    /// Display CSV/TSV as a table
    #[arg(long, help_heading = "Mode")]
    pub csv: bool,

    /// Display a Jupyter notebook
    #[arg(long, help_heading = "Mode")]
    pub ipynb: bool,

    /// Syntax highlight
    #[arg(long, help_heading = "Mode")]
    pub syntax: bool,

    /// Display only the first LINES of the file
    #[arg(short = 'h', long, value_name = "LINES", conflicts_with = "tail",
          value_parser = value_parser!(u32).range(1..))]
    pub head: Option<u32>,

    /// Display only the last LINES of the file
    #[arg(short = 't', long, value_name = "LINES", value_parser = value_parser!(u32).range(1..))]
    pub tail: Option<u32>,

    /// Enable emoji codes such as :sparkles:
    #[arg(short = 'E', long)]
    pub emoji: bool,

    /// Align to left
    #[arg(short = 'l', long, help_heading = "Layout")]
    pub left: bool,

    /// Align to center
    #[arg(short = 'c', long, help_heading = "Layout")]
    pub center: bool,

    /// Align to right
    #[arg(short = 'r', long, help_heading = "Layout")]
    pub right: bool,

    /// Justify text to left
    #[arg(short = 'L', long, help_heading = "Layout")]
    pub text_left: bool,

    /// Justify text to right
    #[arg(short = 'R', long, help_heading = "Layout")]
    pub text_right: bool,

    /// Justify text to center
    #[arg(short = 'C', long, help_heading = "Layout")]
    pub text_center: bool,

    /// Justify text to both left and right edges
    #[arg(short = 'F', long, help_heading = "Layout")]
    pub text_full: bool,

    /// Leave line wrapping to the terminal
    #[arg(long = "soft", env = "RICH_SOFT_WRAP", value_parser = FalseyValueParser::new(), help_heading = "Layout")]
    pub soft_wrap: bool,

    /// Expand to full width (requires --panel or --padding)
    #[arg(short = 'e', long, help_heading = "Layout")]
    pub expand: bool,

    /// Fit output to SIZE columns
    #[arg(short = 'w', long, value_name = "SIZE", env = "RICH_WIDTH",
          value_parser = value_parser!(u16).range(1..), help_heading = "Layout")]
    pub width: Option<u16>,

    /// Maximum width of output
    #[arg(short = 'W', long, value_name = "SIZE", value_parser = value_parser!(u16).range(1..),
          help_heading = "Layout")]
    pub max_width: Option<u16>,

    /// Padding around output: 1, 2 or 4 comma separated integers
    #[arg(short = 'd', long, value_name = "TOP,RIGHT,BOTTOM,LEFT", value_parser = PaddingSpec::parse,
          help_heading = "Layout")]
    pub padding: Option<PaddingSpec>,

    /// Style to apply to output, e.g. "bold red on black"
    #[arg(short = 's', long, value_name = "STYLE", help_heading = "Style")]
    pub style: Option<String>,

    /// Set rule style
    #[arg(long, value_name = "STYLE", help_heading = "Style")]
    pub rule_style: Option<String>,

    /// Character to draw rules with
    #[arg(long, value_name = "CHARACTER", help_heading = "Style")]
    pub rule_char: Option<String>,

    /// Set the panel box type
    #[arg(short = 'a', long, value_enum, ignore_case = true, value_name = "BOX", help_heading = "Style")]
    pub panel: Option<PanelBox>,

    /// Set the panel border style
    #[arg(short = 'S', long, value_name = "STYLE", help_heading = "Style")]
    pub panel_style: Option<String>,

    /// Set panel or table title
    #[arg(long, value_name = "TEXT", help_heading = "Style")]
    pub title: Option<String>,

    /// Set panel or table caption
    #[arg(long, value_name = "TEXT", help_heading = "Style")]
    pub caption: Option<String>,

    /// Syntax highlighting theme
    #[arg(long, value_name = "THEME", env = "RICH_THEME", help_heading = "Syntax")]
    pub theme: Option<String>,

    /// Show line numbers
    #[arg(short = 'n', long, env = "RICH_LINE_NUMBERS", value_parser = FalseyValueParser::new(),
          help_heading = "Syntax")]
    pub line_numbers: bool,

    /// Show indentation guides
    #[arg(short = 'g', long, env = "RICH_GUIDES", value_parser = FalseyValueParser::new(),
          help_heading = "Syntax")]
    pub guides: bool,

    /// Lexer to use for syntax highlighting
    #[arg(short = 'x', long, value_name = "LEXER", help_heading = "Syntax")]
    pub lexer: Option<String>,

    /// Render hyperlinks in Markdown
    #[arg(short = 'y', long, env = "RICH_HYPERLINKS", value_parser = FalseyValueParser::new(),
          help_heading = "Syntax")]
    pub hyperlinks: bool,

    /// Don't wrap syntax
    #[arg(long, help_heading = "Syntax")]
    pub no_wrap: bool,

    /// Write ANSI escape codes even when stdout is not a terminal
    #[arg(long, env = "RICH_FORCE_TERMINAL", value_parser = FalseyValueParser::new(), help_heading = "Output")]
    pub force_terminal: bool,

    /// Write HTML to PATH
    #[arg(short = 'o', long, value_name = "PATH", help_heading = "Output")]
    pub export_html: Option<PathBuf>,

    /// Write SVG to PATH
    #[arg(long, value_name = "PATH", help_heading = "Output")]
    pub export_svg: Option<PathBuf>,

    /// Convert ANSI escape codes in the input into styles
    #[arg(long, help_heading = "Output")]
    pub preprocess_ansi: bool,

    /// Display in an interactive pager
    #[arg(long, env = "RICH_PAGER", value_parser = FalseyValueParser::new(), help_heading = "Output")]
    pub pager: bool,
}

impl RenderArgs {
    fn mode(&self) -> Option<Mode> {
        [
            (self.print, Mode::Print),
            (self.rule, Mode::Rule),
            (self.json, Mode::Json),
            (self.markdown, Mode::Markdown),
            (self.rst, Mode::Rst),
            (self.csv, Mode::Csv),
            (self.ipynb, Mode::Notebook),
            (self.syntax, Mode::Syntax),
        ]
        .into_iter()
        .find_map(|(set, mode)| set.then_some(mode))
    }

    fn align(&self) -> Option<Align> {
        [(self.left, Align::Left), (self.center, Align::Center), (self.right, Align::Right)]
            .into_iter()
            .find_map(|(set, align)| set.then_some(align))
    }

    fn justify(&self) -> Option<Justify> {
        [
            (self.text_left, Justify::Left),
            (self.text_right, Justify::Right),
            (self.text_center, Justify::Center),
            (self.text_full, Justify::Full),
        ]
        .into_iter()
        .find_map(|(set, justify)| set.then_some(justify))
    }

    /// True when no resource was given and no mode asks for one.
    pub fn wants_usage_hint(&self) -> bool {
        self.resource.as_deref().unwrap_or("").is_empty() && matches!(self.mode(), None | Some(Mode::Syntax))
    }

    pub fn into_overrides(self) -> CliOverrides {
        CliOverrides {
            mode: self.mode(),
            align: self.align(),
            justify: self.justify(),
            resource: self.resource.unwrap_or_default(),
            width: self.width.map(usize::from),
            max_width: self.max_width.map(usize::from),
            style: self.style,
            padding: self.padding,
            expand: self.expand,
            panel: self.panel,
            panel_style: self.panel_style,
            title: self.title,
            caption: self.caption,
            theme: self.theme,
            lexer: self.lexer,
            line_numbers: self.line_numbers,
            guides: self.guides,
            hyperlinks: self.hyperlinks,
            no_wrap: self.no_wrap,
            soft_wrap: self.soft_wrap,
            emoji: self.emoji,
            rule_style: self.rule_style,
            rule_char: self.rule_char,
            head: self.head.map(|lines| lines as usize),
            tail: self.tail.map(|lines| lines as usize),
            pager: self.pager,
            force_terminal: self.force_terminal,
            preprocess_ansi: self.preprocess_ansi,
            export_html: self.export_html,
            export_svg: self.export_svg,
        }
    }
}
