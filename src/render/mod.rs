//! Rendering core: styles, segments, text, console markup, and exporters.
//!
//! Everything that ends up on screen or in an exported file implements
//! [`Renderable`], which turns itself into a list of styled lines for a given
//! width. The [`console::Console`] writes those lines as ANSI escape sequences
//! or plain text and optionally records them for HTML/SVG export.

pub mod ansi;
pub mod console;
pub mod emoji;
pub mod export;
pub mod markup;
pub mod segment;
pub mod style;
pub mod text;

pub use console::{Console, ConsoleOptions};
pub use segment::{Line, Segment};
pub use style::{Color, ColorSystem, Style};
pub use text::{Justify, Text};

/// Constraints a renderable is laid out against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub max_width: usize,
    /// Justification inherited by text that doesn't set its own.
    pub justify: Option<Justify>,
    pub no_wrap: bool,
    /// Leave line breaking to the terminal.
    pub soft_wrap: bool,
}

impl RenderOptions {
    pub fn new(max_width: usize) -> Self {
        Self { max_width: max_width.max(1), justify: None, no_wrap: false, soft_wrap: false }
    }

    pub fn with_width(&self, max_width: usize) -> Self {
        Self { max_width: max_width.max(1), ..self.clone() }
    }

    pub fn with_justify(&self, justify: Option<Justify>) -> Self {
        Self { justify, ..self.clone() }
    }
}

/// Minimum and maximum number of cells a renderable wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub minimum: usize,
    pub maximum: usize,
}

impl Measurement {
    pub fn new(minimum: usize, maximum: usize) -> Self {
        Self { minimum: minimum.min(maximum), maximum }
    }

    /// Clamp both ends to `width`.
    pub fn clamp(self, width: usize) -> Self {
        Self::new(self.minimum.min(width), self.maximum.min(width))
    }
}

/// Anything that can be laid out into lines of segments.
pub trait Renderable {
    fn render(&self, options: &RenderOptions) -> Vec<Line>;

    /// Preferred width range; by default a renderable fills the space given.
    fn measure(&self, options: &RenderOptions) -> Measurement {
        Measurement::new(options.max_width, options.max_width)
    }
}

impl<T: Renderable + ?Sized> Renderable for Box<T> {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        (**self).render(options)
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        (**self).measure(options)
    }
}

/// Lines that have already been rendered.
#[derive(Debug, Clone, Default)]
pub struct Lines(pub Vec<Line>);

impl Renderable for Lines {
    fn render(&self, _options: &RenderOptions) -> Vec<Line> {
        self.0.clone()
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        let width = self.0.iter().map(|line| segment::line_len(line)).max().unwrap_or(0);
        Measurement::new(width, width).clamp(options.max_width)
    }
}
