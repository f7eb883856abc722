//! A small full-screen pager for rendered output.
//!
//! Lines are drawn on the alternate screen with a status line at the
//! bottom. Navigation follows `less`/vi habits.

use std::io;

use console::{style, Key, Term};
use tracing::debug;

/// What a key press asks the pager to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    LineDown,
    LineUp,
    PageDown,
    PageUp,
    HalfPageDown,
    HalfPageUp,
    Top,
    Bottom,
    /// First half of `gg`.
    Pending,
    Ignore,
}

/// Map a key to an action. `pending_g` is true after a lone `g`.
pub fn action_for(key: &Key, pending_g: bool) -> Action {
    match key {
        Key::Char('q') | Key::Char('Q') | Key::Escape => Action::Quit,
        Key::ArrowDown | Key::Enter | Key::Char('j') => Action::LineDown,
        Key::ArrowUp | Key::Char('k') => Action::LineUp,
        Key::PageDown | Key::Char(' ') | Key::Char('f') | Key::Char('\u{6}') => Action::PageDown,
        Key::PageUp | Key::Char('b') | Key::Char('\u{2}') => Action::PageUp,
        Key::Char('d') | Key::Char('\u{4}') => Action::HalfPageDown,
        Key::Char('u') | Key::Char('\u{15}') => Action::HalfPageUp,
        Key::Home => Action::Top,
        Key::Char('g') if pending_g => Action::Top,
        Key::Char('g') => Action::Pending,
        Key::End | Key::Char('G') => Action::Bottom,
        _ => Action::Ignore,
    }
}

/// Scroll position over `total` lines with `height` visible rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerState {
    offset: usize,
    height: usize,
    total: usize,
    pending_g: bool,
}

impl PagerState {
    pub fn new(total: usize, height: usize) -> Self {
        Self { offset: 0, height: height.max(1), total, pending_g: false }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.height)
    }

    fn scroll_down(&mut self, rows: usize) {
        self.offset = (self.offset + rows).min(self.max_offset());
    }

    fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }

    /// Apply a key press. Returns false when the pager should close.
    pub fn handle(&mut self, key: &Key) -> bool {
        let action = action_for(key, self.pending_g);
        self.pending_g = action == Action::Pending;
        let half = (self.height / 2).max(1);
        match action {
            Action::Quit => return false,
            Action::LineDown => self.scroll_down(1),
            Action::LineUp => self.scroll_up(1),
            Action::PageDown => self.scroll_down(self.height),
            Action::PageUp => self.scroll_up(self.height),
            Action::HalfPageDown => self.scroll_down(half),
            Action::HalfPageUp => self.scroll_up(half),
            Action::Top => self.offset = 0,
            Action::Bottom => self.offset = self.max_offset(),
            Action::Pending | Action::Ignore => {}
        }
        true
    }

    /// Indices of the lines currently on screen.
    pub fn visible(&self) -> std::ops::Range<usize> {
        self.offset..(self.offset + self.height).min(self.total)
    }

    pub fn status(&self) -> String {
        let range = self.visible();
        let percent = if self.max_offset() == 0 { 100 } else { self.offset * 100 / self.max_offset() };
        format!(" lines {}-{} of {} ({}%)  q to quit ", range.start + 1, range.end, self.total, percent)
    }
}

/// Switches to the alternate screen and restores the terminal on drop.
struct AlternateScreen<'a> {
    term: &'a Term,
}

impl<'a> AlternateScreen<'a> {
    fn enter(term: &'a Term) -> io::Result<Self> {
        term.write_str("\x1b[?1049h")?;
        term.hide_cursor()?;
        Ok(Self { term })
    }
}

impl Drop for AlternateScreen<'_> {
    fn drop(&mut self) {
        let _ = self.term.show_cursor();
        let _ = self.term.write_str("\x1b[?1049l");
        let _ = self.term.flush();
    }
}

fn draw(term: &Term, lines: &[String], state: &PagerState, rows: usize) -> io::Result<()> {
    let mut frame = String::from("\x1b[H");
    let range = state.visible();
    let shown = range.len();
    for line in &lines[range] {
        frame.push_str(line);
        frame.push_str("\x1b[0m\x1b[K\r\n");
    }
    for _ in shown..rows.saturating_sub(1) {
        frame.push_str("~\x1b[K\r\n");
    }
    frame.push_str(&style(state.status()).reverse().force_styling(true).to_string());
    frame.push_str("\x1b[K");
    term.write_str(&frame)?;
    term.flush()
}

/// Page through pre-rendered lines on a screen `rows` high until the
/// user quits.
pub fn run(lines: &[String], rows: usize) -> io::Result<()> {
    let term = Term::stdout();
    let rows = rows.max(2);
    let mut state = PagerState::new(lines.len(), rows - 1);
    debug!(lines = lines.len(), rows, "starting pager");

    let _screen = AlternateScreen::enter(&term)?;
    loop {
        draw(&term, lines, &state, rows)?;
        let key = term.read_key()?;
        if !state.handle(&key) {
            break;
        }
    }
    Ok(())
}
