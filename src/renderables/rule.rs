//! Horizontal rule with an optional title.

use crate::domain::Align;
use crate::render::segment::{cell_len, char_width, line_len};
use crate::render::{Line, Measurement, RenderOptions, Renderable, Segment, Style, Text};

pub struct Rule {
    title: Option<Text>,
    characters: String,
    style: Style,
    align: Align,
}

impl Rule {
    pub fn new(title: Option<Text>) -> Self {
        Self {
            title: title.filter(|text| !text.is_empty()),
            characters: "─".to_string(),
            style: Style::default(),
            align: Align::Center,
        }
    }

    pub fn characters(mut self, characters: &str) -> Self {
        if !characters.is_empty() {
            self.characters = characters.to_string();
        }
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// `width` cells of the rule characters, repeating as needed.
    fn fill(&self, width: usize) -> Segment {
        let mut out = String::new();
        let mut used = 0;
        for ch in self.characters.chars().cycle() {
            let w = char_width(ch).max(1);
            if used + w > width {
                break;
            }
            out.push(ch);
            used += w;
        }
        out.extend(std::iter::repeat(' ').take(width - used));
        Segment::new(out, self.style.clone())
    }
}

impl Renderable for Rule {
    fn render(&self, options: &RenderOptions) -> Vec<Line> {
        let width = options.max_width;
        let Some(title) = &self.title else {
            return vec![vec![self.fill(width)]];
        };

        let mut label = Text::plain(" ");
        label.append_text(&title.split_lines().into_iter().next().unwrap_or_default());
        label.push_str(" ");
        let label_room = width.saturating_sub(2).max(1);
        let label = label.wrap(label_room, None, true).into_iter().next().unwrap_or_default();
        let rest = width.saturating_sub(line_len(&label));

        let mut line = Vec::new();
        match self.align {
            Align::Left => {
                line.extend(label);
                line.push(self.fill(rest));
            }
            Align::Right => {
                line.push(self.fill(rest));
                line.extend(label);
            }
            Align::Center => {
                let left = rest / 2;
                line.push(self.fill(left));
                line.extend(label);
                line.push(self.fill(rest - left));
            }
        }
        vec![line]
    }

    fn measure(&self, options: &RenderOptions) -> Measurement {
        let title = self.title.as_ref().map_or(0, |text| text.cell_len() + 2);
        Measurement::new(title.max(cell_len(&self.characters)), options.max_width)
            .clamp(options.max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::segment::line_text;

    fn draw(rule: Rule, width: usize) -> String {
        rule.render(&RenderOptions::new(width)).iter().map(|line| line_text(line)).collect()
    }

    #[test]
    fn plain_rule_fills_width() {
        assert_eq!(draw(Rule::new(None), 5), "─────");
    }

    #[test]
    fn title_is_centered_by_default() {
        assert_eq!(draw(Rule::new(Some(Text::plain("Hi"))), 10), "─── Hi ───");
    }

    #[test]
    fn title_can_be_aligned() {
        assert_eq!(draw(Rule::new(Some(Text::plain("Hi"))).align(Align::Left), 8), " Hi ────");
        assert_eq!(draw(Rule::new(Some(Text::plain("Hi"))).align(Align::Right), 8), "──── Hi ");
    }

    #[test]
    fn multi_character_patterns_repeat() {
        assert_eq!(draw(Rule::new(None).characters("=-"), 5), "=-=-=");
    }
}
