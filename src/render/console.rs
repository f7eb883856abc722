//! The console: terminal detection, ANSI output, and recording for export.

use std::io::{self, Write};

use tracing::debug;

use super::export;
use super::segment::{line_text, Line};
use super::style::ColorSystem;
use super::{RenderOptions, Renderable};

const DEFAULT_WIDTH: usize = 80;
const DEFAULT_HEIGHT: usize = 25;

/// How the console should be set up.
#[derive(Debug, Clone, Default)]
pub struct ConsoleOptions {
    /// Write escape sequences even when stdout isn't a terminal.
    pub force_terminal: bool,
    /// Keep every printed line so it can be exported afterwards.
    pub record: bool,
    /// Override the detected width.
    pub width: Option<usize>,
}

#[derive(Debug)]
pub struct Console {
    width: usize,
    height: usize,
    color_system: Option<ColorSystem>,
    record: bool,
    recorded: Vec<Line>,
}

impl Console {
    /// Detect the terminal attached to stdout.
    pub fn new(options: ConsoleOptions) -> Self {
        let term = console::Term::stdout();
        let is_tty = term.is_term();
        let size = if is_tty { term.size_checked() } else { None };

        let width = options
            .width
            .or_else(columns_from_env)
            .or_else(|| size.map(|(_, columns)| usize::from(columns)))
            .unwrap_or(DEFAULT_WIDTH);
        let height = size.map(|(rows, _)| usize::from(rows)).unwrap_or(DEFAULT_HEIGHT);

        let color_system = if colors_wanted(options.force_terminal) { detect_color_system() } else { None };
        debug!(width, height, ?color_system, is_tty, "console detected");

        Self { width, height, color_system, record: options.record, recorded: Vec::new() }
    }

    /// A console with no color output, for rendering to plain text.
    pub fn plain(width: usize) -> Self {
        Self {
            width,
            height: DEFAULT_HEIGHT,
            color_system: None,
            record: false,
            recorded: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_color_system(mut self, color_system: Option<ColorSystem>) -> Self {
        self.color_system = color_system;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Options for rendering at the full console width.
    pub fn options(&self) -> RenderOptions {
        RenderOptions::new(self.width)
    }

    /// One line as it would be written to the terminal (without newline).
    pub fn render_line(&self, line: &Line) -> String {
        match self.color_system {
            None => line_text(line),
            Some(system) => line
                .iter()
                .map(|segment| {
                    if segment.style.is_plain() {
                        segment.text.clone()
                    } else {
                        segment.style.paint(&segment.text, system)
                    }
                })
                .collect(),
        }
    }

    /// Render `renderable` and write it to `out`.
    pub fn print(
        &mut self,
        renderable: &dyn Renderable,
        options: &RenderOptions,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let lines = renderable.render(options);
        self.write_lines(&lines, out)?;
        if self.record {
            self.recorded.extend(lines);
        }
        Ok(())
    }

    pub fn write_lines(&self, lines: &[Line], out: &mut dyn Write) -> io::Result<()> {
        for line in lines {
            out.write_all(self.render_line(line).as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }

    /// Keep lines for export without writing them anywhere.
    pub fn record_lines(&mut self, lines: Vec<Line>) {
        self.recorded.extend(lines);
    }

    pub fn export_html(&self) -> String {
        export::html(&self.recorded)
    }

    pub fn export_svg(&self, title: &str) -> String {
        export::svg(&self.recorded, title, self.width)
    }
}

fn columns_from_env() -> Option<usize> {
    std::env::var("COLUMNS").ok()?.trim().parse().ok().filter(|columns| *columns > 0)
}

/// `NO_COLOR` always wins. Otherwise a forced terminal gets color, and
/// anything else is left to `console`, which looks at the tty together with
/// `CLICOLOR` and `CLICOLOR_FORCE`.
fn colors_wanted(force_terminal: bool) -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    force_terminal || console::colors_enabled()
}

/// How many colors the terminal takes, once color is on.
fn detect_color_system() -> Option<ColorSystem> {
    let colorterm = std::env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if colorterm == "truecolor" || colorterm == "24bit" {
        return Some(ColorSystem::TrueColor);
    }
    let term = std::env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return None;
    }
    if term.contains("256color") || cfg!(windows) {
        return Some(ColorSystem::EightBit);
    }
    Some(ColorSystem::Standard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::style::Style;
    use crate::render::text::Text;

    #[test]
    fn plain_console_writes_no_escapes() {
        let mut console = Console::plain(20);
        let text = Text::styled("hello", Style::parse("bold red").unwrap());
        let mut out = Vec::new();
        console.print(&text, &console.options(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello\n");
    }

    #[test]
    fn color_console_writes_sgr() {
        let mut console = Console::plain(20).with_color_system(Some(ColorSystem::Standard));
        let text = Text::styled("hello", Style::parse("bold red").unwrap());
        let mut out = Vec::new();
        console.print(&text, &console.options(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b[1;31mhello\x1b[0m\n");
    }

    #[test]
    fn recording_keeps_printed_lines() {
        let mut console = Console::new(ConsoleOptions { record: true, width: Some(20), ..Default::default() });
        let mut sink = Vec::new();
        console.print(&Text::plain("alpha\nbeta"), &console.options(), &mut sink).unwrap();
        let html = console.export_html();
        assert!(html.contains("alpha\nbeta\n"));
    }
}
