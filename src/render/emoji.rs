//! `:emoji:` code replacement.
//!
//! Codes are looked up as GitHub shortcodes (`:tada:`, `:+1:`) and then as
//! Unicode names with underscores for spaces (`:party_popper:`,
//! `:thumbs_up:`).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static EMOJI_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([a-z0-9_+\-]+):").expect("emoji pattern is valid"));

static BY_NAME: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    emojis::iter()
        .map(|emoji| (emoji.name().to_lowercase().replace([' ', '-'], "_"), emoji.as_str()))
        .collect()
});

pub fn lookup(code: &str) -> Option<&'static str> {
    emojis::get_by_shortcode(code)
        .map(|emoji| emoji.as_str())
        .or_else(|| BY_NAME.get(code).copied())
}

/// Replace known `:codes:` in `text`; unknown codes are left alone.
pub fn replace(text: &str) -> String {
    if !text.contains(':') {
        return text.to_string();
    }
    EMOJI_CODE
        .replace_all(text, |caps: &Captures| match lookup(&caps[1]) {
            Some(emoji) => emoji.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
