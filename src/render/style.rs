//! Colors and text styles.
//!
//! A [`Style`] is parsed from strings such as `"bold red on white"`,
//! `"not italic #ff8800"`, `"color(208) on rgb(10,20,30)"` or
//! `"link https://example.com"`. Attributes are tri-state so a style can
//! explicitly switch something off when combined on top of another one.

use std::fmt::Write as _;

use thiserror::Error;

/// Error raised when a style or color definition can't be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("unknown color {0:?}")]
    UnknownColor(String),
    #[error("expected a color after 'on' in {0:?}")]
    MissingBackground(String),
    #[error("expected a style attribute after 'not' in {0:?}")]
    MissingAttribute(String),
    #[error("expected a URL after 'link' in {0:?}")]
    MissingLink(String),
}

/// How many colors the output device can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorSystem {
    Standard,
    EightBit,
    TrueColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// The terminal's default foreground or background.
    Default,
    /// One of the 16 standard colors (8..16 are the bright variants).
    Standard(u8),
    /// An entry in the 256 color palette.
    Indexed(u8),
    Rgb(u8, u8, u8),
}

const STANDARD_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "bright_black",
    "bright_red",
    "bright_green",
    "bright_yellow",
    "bright_blue",
    "bright_magenta",
    "bright_cyan",
    "bright_white",
];

/// A few of the named 256-color entries that show up in themes and docs.
const EXTENDED_NAMES: &[(&str, u8)] = &[
    ("grey0", 16),
    ("navy_blue", 17),
    ("dark_green", 22),
    ("deep_sky_blue1", 39),
    ("spring_green1", 48),
    ("purple", 129),
    ("orange3", 172),
    ("gold1", 220),
    ("dark_orange", 208),
    ("orange1", 214),
    ("hot_pink", 205),
    ("grey50", 244),
    ("grey70", 249),
    ("grey84", 253),
    ("grey100", 231),
];

impl Color {
    pub fn parse(name: &str) -> Result<Self, StyleError> {
        let original = name;
        let name = name.trim().to_ascii_lowercase();
        if name == "default" {
            return Ok(Color::Default);
        }
        let lookup = name.replace(' ', "_").replace("gray", "grey");
        if let Some(index) = STANDARD_NAMES.iter().position(|candidate| *candidate == lookup) {
            return Ok(Color::Standard(index as u8));
        }
        if let Some((_, index)) = EXTENDED_NAMES.iter().find(|(candidate, _)| *candidate == lookup) {
            return Ok(Color::Indexed(*index));
        }
        if let Some(hex) = name.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| StyleError::UnknownColor(original.to_string()));
        }
        if let Some(number) = name.strip_prefix("color(").and_then(|rest| rest.strip_suffix(')')) {
            let index: u8 = number
                .trim()
                .parse()
                .map_err(|_| StyleError::UnknownColor(original.to_string()))?;
            return Ok(if index < 16 { Color::Standard(index) } else { Color::Indexed(index) });
        }
        if let Some(triplet) = name.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
            let parts: Vec<u8> = triplet
                .split(',')
                .map(|part| part.trim().parse::<u8>())
                .collect::<Result<_, _>>()
                .map_err(|_| StyleError::UnknownColor(original.to_string()))?;
            if let [r, g, b] = parts[..] {
                return Ok(Color::Rgb(r, g, b));
            }
        }
        Err(StyleError::UnknownColor(original.to_string()))
    }

    /// Resolve the color to RGB using `theme` for the palette entries.
    ///
    /// Returns `None` for [`Color::Default`] so callers can pick the theme's
    /// foreground or background.
    pub fn to_rgb(self, theme: &TerminalTheme) -> Option<(u8, u8, u8)> {
        match self {
            Color::Default => None,
            Color::Standard(index) => Some(theme.ansi[usize::from(index % 16)]),
            Color::Indexed(index) if index < 16 => Some(theme.ansi[usize::from(index)]),
            Color::Indexed(index) => Some(eight_bit_to_rgb(index)),
            Color::Rgb(r, g, b) => Some((r, g, b)),
        }
    }

    /// Reduce the color to something `system` can display.
    pub fn downgrade(self, system: ColorSystem) -> Color {
        match (self, system) {
            (Color::Rgb(r, g, b), ColorSystem::EightBit) => {
                Color::Indexed(rgb2ansi256::rgb_to_ansi256(r, g, b))
            }
            (Color::Rgb(r, g, b), ColorSystem::Standard) => nearest_standard((r, g, b)),
            (Color::Indexed(index), ColorSystem::Standard) if index >= 16 => {
                nearest_standard(eight_bit_to_rgb(index))
            }
            (color, _) => color,
        }
    }

    fn sgr(self, background: bool, system: ColorSystem, out: &mut Vec<String>) {
        match self.downgrade(system) {
            Color::Default => out.push(if background { "49" } else { "39" }.to_string()),
            Color::Standard(index) | Color::Indexed(index) if index < 16 => {
                let base = match (index < 8, background) {
                    (true, false) => 30,
                    (true, true) => 40,
                    (false, false) => 90 - 8,
                    (false, true) => 100 - 8,
                };
                out.push((base + u32::from(index)).to_string());
            }
            Color::Standard(index) | Color::Indexed(index) => {
                out.push(format!("{};5;{}", if background { 48 } else { 38 }, index));
            }
            Color::Rgb(r, g, b) => {
                out.push(format!("{};2;{};{};{}", if background { 48 } else { 38 }, r, g, b));
            }
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|ch| [ch, ch]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let value = u32::from_str_radix(&expanded, 16).ok()?;
    Some(Color::Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

fn eight_bit_to_rgb(index: u8) -> (u8, u8, u8) {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    match index {
        0..=15 => DEFAULT_TERMINAL_THEME.ansi[usize::from(index)],
        16..=231 => {
            let value = index - 16;
            (
                LEVELS[usize::from(value / 36)],
                LEVELS[usize::from((value / 6) % 6)],
                LEVELS[usize::from(value % 6)],
            )
        }
        _ => {
            let grey = 8 + (index - 232) * 10;
            (grey, grey, grey)
        }
    }
}

fn nearest_standard(rgb: (u8, u8, u8)) -> Color {
    let distance = |other: (u8, u8, u8)| {
        let dr = i32::from(rgb.0) - i32::from(other.0);
        let dg = i32::from(rgb.1) - i32::from(other.1);
        let db = i32::from(rgb.2) - i32::from(other.2);
        dr * dr + dg * dg + db * db
    };
    let index = DEFAULT_TERMINAL_THEME
        .ansi
        .iter()
        .enumerate()
        .min_by_key(|(_, candidate)| distance(**candidate))
        .map(|(index, _)| index)
        .unwrap_or(7);
    Color::Standard(index as u8)
}

/// Palette used to turn terminal colors into concrete RGB values on export.
#[derive(Debug, Clone)]
pub struct TerminalTheme {
    pub background: (u8, u8, u8),
    pub foreground: (u8, u8, u8),
    pub ansi: [(u8, u8, u8); 16],
}

pub const DEFAULT_TERMINAL_THEME: TerminalTheme = TerminalTheme {
    background: (255, 255, 255),
    foreground: (0, 0, 0),
    ansi: [
        (0, 0, 0),
        (128, 0, 0),
        (0, 128, 0),
        (128, 128, 0),
        (0, 0, 128),
        (128, 0, 128),
        (0, 128, 128),
        (192, 192, 192),
        (128, 128, 128),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (0, 0, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ],
};

pub const SVG_EXPORT_THEME: TerminalTheme = TerminalTheme {
    background: (41, 41, 41),
    foreground: (197, 200, 198),
    ansi: [
        (75, 78, 85),
        (204, 85, 90),
        (152, 168, 75),
        (208, 179, 68),
        (96, 138, 177),
        (152, 114, 159),
        (104, 160, 179),
        (197, 200, 198),
        (154, 155, 153),
        (255, 38, 39),
        (0, 130, 61),
        (208, 132, 66),
        (25, 132, 233),
        (255, 44, 122),
        (57, 130, 128),
        (253, 253, 197),
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Attribute {
    Bold = 1,
    Dim = 1 << 1,
    Italic = 1 << 2,
    Underline = 1 << 3,
    Blink = 1 << 4,
    Reverse = 1 << 5,
    Conceal = 1 << 6,
    Strike = 1 << 7,
}

impl Attribute {
    const ALL: [Attribute; 8] = [
        Attribute::Bold,
        Attribute::Dim,
        Attribute::Italic,
        Attribute::Underline,
        Attribute::Blink,
        Attribute::Reverse,
        Attribute::Conceal,
        Attribute::Strike,
    ];

    fn from_name(name: &str) -> Option<Self> {
        let attribute = match name {
            "bold" | "b" => Attribute::Bold,
            "dim" | "d" => Attribute::Dim,
            "italic" | "i" => Attribute::Italic,
            "underline" | "u" => Attribute::Underline,
            "blink" => Attribute::Blink,
            "reverse" | "r" => Attribute::Reverse,
            "conceal" | "c" => Attribute::Conceal,
            "strike" | "s" | "strikethrough" => Attribute::Strike,
            _ => return None,
        };
        Some(attribute)
    }

    fn sgr_on(self) -> &'static str {
        match self {
            Attribute::Bold => "1",
            Attribute::Dim => "2",
            Attribute::Italic => "3",
            Attribute::Underline => "4",
            Attribute::Blink => "5",
            Attribute::Reverse => "7",
            Attribute::Conceal => "8",
            Attribute::Strike => "9",
        }
    }

    fn bit(self) -> u16 {
        self as u16
    }
}

/// Visual attributes for a run of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Style {
    pub color: Option<Color>,
    pub bgcolor: Option<Color>,
    attributes: u16,
    set_attributes: u16,
    pub link: Option<String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn on(mut self, color: Color) -> Self {
        self.bgcolor = Some(color);
        self
    }

    pub fn with(mut self, attribute: Attribute, enabled: bool) -> Self {
        self.set_attributes |= attribute.bit();
        if enabled {
            self.attributes |= attribute.bit();
        } else {
            self.attributes &= !attribute.bit();
        }
        self
    }

    pub fn bold(self) -> Self {
        self.with(Attribute::Bold, true)
    }

    pub fn dim(self) -> Self {
        self.with(Attribute::Dim, true)
    }

    pub fn italic(self) -> Self {
        self.with(Attribute::Italic, true)
    }

    pub fn underline(self) -> Self {
        self.with(Attribute::Underline, true)
    }

    pub fn link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    /// `Some(true)`/`Some(false)` if the attribute is set either way.
    pub fn get(&self, attribute: Attribute) -> Option<bool> {
        (self.set_attributes & attribute.bit() != 0).then(|| self.attributes & attribute.bit() != 0)
    }

    pub fn has(&self, attribute: Attribute) -> bool {
        self.get(attribute).unwrap_or(false)
    }

    pub fn is_plain(&self) -> bool {
        self.color.is_none()
            && self.bgcolor.is_none()
            && self.set_attributes == 0
            && self.link.is_none()
    }

    /// Overlay `other` on top of `self`; anything `other` sets wins.
    pub fn combine(&self, other: &Style) -> Style {
        if other.is_plain() {
            return self.clone();
        }
        if self.is_plain() {
            return other.clone();
        }
        Style {
            color: other.color.or(self.color),
            bgcolor: other.bgcolor.or(self.bgcolor),
            attributes: (self.attributes & !other.set_attributes)
                | (other.attributes & other.set_attributes),
            set_attributes: self.set_attributes | other.set_attributes,
            link: other.link.clone().or_else(|| self.link.clone()),
        }
    }

    /// Parse a style definition.
    ///
    /// Empty strings and `"none"` produce a plain style.
    pub fn parse(definition: &str) -> Result<Style, StyleError> {
        let mut style = Style::new();
        let normalized = definition.trim();
        if normalized.is_empty() || normalized.eq_ignore_ascii_case("none") {
            return Ok(style);
        }

        let mut words = normalized.split_whitespace();
        while let Some(original_word) = words.next() {
            let word = original_word.to_ascii_lowercase();
            match word.as_str() {
                "on" => {
                    let color = words
                        .next()
                        .ok_or_else(|| StyleError::MissingBackground(definition.to_string()))?;
                    style.bgcolor = Some(Color::parse(color)?);
                }
                "not" => {
                    let attribute = words
                        .next()
                        .and_then(|name| Attribute::from_name(&name.to_ascii_lowercase()))
                        .ok_or_else(|| StyleError::MissingAttribute(definition.to_string()))?;
                    style = style.with(attribute, false);
                }
                "link" => {
                    let url =
                        words.next().ok_or_else(|| StyleError::MissingLink(definition.to_string()))?;
                    style.link = Some(url.to_string());
                }
                _ => match Attribute::from_name(&word) {
                    Some(attribute) => style = style.with(attribute, true),
                    None => style.color = Some(Color::parse(original_word)?),
                },
            }
        }
        Ok(style)
    }

    /// The SGR parameter list for this style (without `ESC[` and `m`).
    pub fn sgr(&self, system: ColorSystem) -> String {
        let mut params: Vec<String> = Vec::new();
        for attribute in Attribute::ALL {
            if self.has(attribute) {
                params.push(attribute.sgr_on().to_string());
            }
        }
        if let Some(color) = self.color {
            color.sgr(false, system, &mut params);
        }
        if let Some(color) = self.bgcolor {
            color.sgr(true, system, &mut params);
        }
        params.join(";")
    }

    /// Wrap `text` in the escape sequences for this style.
    pub fn paint(&self, text: &str, system: ColorSystem) -> String {
        let sgr = self.sgr(system);
        let mut out = String::with_capacity(text.len() + 16);
        if let Some(url) = &self.link {
            let _ = write!(out, "\x1b]8;;{url}\x1b\\");
        }
        if sgr.is_empty() {
            out.push_str(text);
        } else {
            let _ = write!(out, "\x1b[{sgr}m{text}\x1b[0m");
        }
        if self.link.is_some() {
            out.push_str("\x1b]8;;\x1b\\");
        }
        out
    }

    /// CSS declarations for exporters, resolving colors through `theme`.
    pub fn css(&self, theme: &TerminalTheme) -> String {
        let mut color = self.color.and_then(|c| c.to_rgb(theme));
        let mut bgcolor = self.bgcolor.and_then(|c| c.to_rgb(theme));
        if self.has(Attribute::Reverse) {
            let fg = color.unwrap_or(theme.foreground);
            let bg = bgcolor.unwrap_or(theme.background);
            color = Some(bg);
            bgcolor = Some(fg);
        }
        if self.has(Attribute::Dim) {
            let (r, g, b) = color.unwrap_or(theme.foreground);
            let (br, bgg, bb) = theme.background;
            color = Some((blend(r, br), blend(g, bgg), blend(b, bb)));
        }

        let mut rules = Vec::new();
        if let Some((r, g, b)) = color {
            rules.push(format!("color: #{r:02x}{g:02x}{b:02x}"));
        }
        if let Some((r, g, b)) = bgcolor {
            rules.push(format!("background-color: #{r:02x}{g:02x}{b:02x}"));
        }
        if self.has(Attribute::Bold) {
            rules.push("font-weight: bold".to_string());
        }
        if self.has(Attribute::Italic) {
            rules.push("font-style: italic".to_string());
        }
        let mut decorations = Vec::new();
        if self.has(Attribute::Underline) {
            decorations.push("underline");
        }
        if self.has(Attribute::Strike) {
            decorations.push("line-through");
        }
        if !decorations.is_empty() {
            rules.push(format!("text-decoration: {}", decorations.join(" ")));
        }
        rules.join("; ")
    }
}

fn blend(value: u8, background: u8) -> u8 {
    ((u16::from(value) + u16::from(background)) / 2) as u8
}
