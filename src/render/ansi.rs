//! Decoding of ANSI escape sequences into styled [`Text`].
//!
//! SGR sequences (`ESC [ ... m`) become styles and OSC 8 sequences become
//! hyperlinks. Every other escape sequence is dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use super::style::{Attribute, Color, Style};
use super::text::Text;

static ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b(?:\[([0-9;:?]*)([@-~])|\]8;[^;\x07\x1b]*;([^\x07\x1b]*)(?:\x07|\x1b\\)|\][^\x07\x1b]*(?:\x07|\x1b\\)|[@-Z\\-_])")
        .expect("escape pattern is valid")
});

/// True if `text` contains anything that looks like an escape sequence.
pub fn contains_escapes(text: &str) -> bool {
    text.contains('\x1b')
}

/// Remove escape sequences, keeping the visible text.
pub fn strip(text: &str) -> String {
    console::strip_ansi_codes(text).into_owned()
}

/// Decode `input` into styled text.
pub fn decode(input: &str) -> Text {
    let mut text = Text::new();
    Decoder::default().feed(input, &Style::default(), &mut text);
    text
}

/// Decode escape sequences inside already styled text.
///
/// The decoded ANSI style sits underneath the style each run already has,
/// and carries over from one run to the next.
pub fn decode_text(input: &Text) -> Text {
    let mut text = Text::new();
    text.justify = input.justify;
    text.no_wrap = input.no_wrap;
    let mut decoder = Decoder::default();
    for (run, style) in input.runs() {
        decoder.feed(&run, &style, &mut text);
    }
    text
}

#[derive(Default)]
struct Decoder {
    style: Style,
}

impl Decoder {
    fn feed(&mut self, input: &str, base: &Style, text: &mut Text) {
        let mut position = 0;
        for caps in ESCAPE.captures_iter(input) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > position {
                text.append(&input[position..whole.start()], self.style.combine(base));
            }
            position = whole.end();

            if let (Some(params), Some(command)) = (caps.get(1), caps.get(2)) {
                if command.as_str() == "m" {
                    self.style = apply_sgr(std::mem::take(&mut self.style), params.as_str());
                }
            } else if let Some(url) = caps.get(3) {
                self.style.link = (!url.as_str().is_empty()).then(|| url.as_str().to_string());
            }
        }
        if position < input.len() {
            text.append(&input[position..], self.style.combine(base));
        }
    }
}

fn apply_sgr(mut style: Style, params: &str) -> Style {
    let codes: Vec<u16> = if params.is_empty() {
        vec![0]
    } else {
        params.split([';', ':']).map(|code| code.parse().unwrap_or(0)).collect()
    };

    let mut iter = codes.into_iter();
    while let Some(code) = iter.next() {
        style = match code {
            0 => {
                let mut reset = Style::default();
                reset.link = style.link.take();
                reset
            }
            1 => style.with(Attribute::Bold, true),
            2 => style.with(Attribute::Dim, true),
            3 => style.with(Attribute::Italic, true),
            4 => style.with(Attribute::Underline, true),
            5 | 6 => style.with(Attribute::Blink, true),
            7 => style.with(Attribute::Reverse, true),
            8 => style.with(Attribute::Conceal, true),
            9 => style.with(Attribute::Strike, true),
            21 => style.with(Attribute::Underline, true),
            22 => style.with(Attribute::Bold, false).with(Attribute::Dim, false),
            23 => style.with(Attribute::Italic, false),
            24 => style.with(Attribute::Underline, false),
            25 => style.with(Attribute::Blink, false),
            27 => style.with(Attribute::Reverse, false),
            28 => style.with(Attribute::Conceal, false),
            29 => style.with(Attribute::Strike, false),
            30..=37 => style.fg(Color::Standard((code - 30) as u8)),
            39 => {
                style.color = None;
                style
            }
            40..=47 => style.on(Color::Standard((code - 40) as u8)),
            49 => {
                style.bgcolor = None;
                style
            }
            90..=97 => style.fg(Color::Standard((code - 90 + 8) as u8)),
            100..=107 => style.on(Color::Standard((code - 100 + 8) as u8)),
            38 | 48 => match extended_color(&mut iter) {
                Some(color) if code == 38 => style.fg(color),
                Some(color) => style.on(color),
                None => style,
            },
            _ => style,
        };
    }
    style
}

fn extended_color(iter: &mut impl Iterator<Item = u16>) -> Option<Color> {
    match iter.next()? {
        5 => {
            let index = u8::try_from(iter.next()?).ok()?;
            Some(if index < 16 { Color::Standard(index) } else { Color::Indexed(index) })
        }
        2 => {
            let r = u8::try_from(iter.next()?).ok()?;
            let g = u8::try_from(iter.next()?).ok()?;
            let b = u8::try_from(iter.next()?).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_standard_colors_and_reset() {
        let text = decode("\x1b[32mhello\x1b[0m world");
        assert_eq!(text.as_str(), "hello world");
        let line = text.wrap(80, None, false).remove(0);
        assert_eq!(line[0].style.color, Some(Color::Standard(2)));
        assert!(line[1].style.is_plain());
    }

    #[test]
    fn decodes_extended_colors() {
        let text = decode("\x1b[1;38;2;10;20;30mx\x1b[48;5;200my");
        let line = text.wrap(80, None, false).remove(0);
        assert_eq!(line[0].style.color, Some(Color::Rgb(10, 20, 30)));
        assert!(line[0].style.has(Attribute::Bold));
        assert_eq!(line[1].style.bgcolor, Some(Color::Indexed(200)));
    }

    #[test]
    fn drops_other_sequences_and_keeps_links() {
        let text = decode("\x1b[2J\x1b]8;;https://x.dev\x1b\\site\x1b]8;;\x1b\\ end");
        assert_eq!(text.as_str(), "site end");
        let line = text.wrap(80, None, false).remove(0);
        assert_eq!(line[0].style.link.as_deref(), Some("https://x.dev"));
    }

    #[test]
    fn decode_text_keeps_markup_styles_on_top() {
        let mut marked = Text::new();
        marked.append("\x1b[31mred ", Style::default());
        marked.append("bold", Style::new().bold());
        let decoded = decode_text(&marked);
        assert_eq!(decoded.as_str(), "red bold");
        let line = decoded.wrap(80, None, false).remove(0);
        assert_eq!(line[1].style.color, Some(Color::Standard(1)));
        assert!(line[1].style.has(Attribute::Bold));
    }

    #[test]
    fn strip_removes_codes() {
        assert_eq!(strip("\x1b[31mred\x1b[0m"), "red");
    }
}
