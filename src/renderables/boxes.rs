//! Box drawing characters for panels and tables.
//!
//! Each box is eight rows of four characters:
//!
//! ```text
//! top        ┌─┬┐
//! head       │ ││
//! head_row   ├─┼┤
//! mid        │ ││
//! row        ├─┼┤
//! foot_row   ├─┼┤
//! foot       │ ││
//! bottom     └─┴┘
//! ```

use crate::domain::PanelBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    Ascii,
    Ascii2,
    Square,
    Rounded,
    Heavy,
    HeavyHead,
    Double,
    SimpleHeavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxRow {
    Top,
    Head,
    HeadRow,
    Mid,
    Row,
    FootRow,
    Foot,
    Bottom,
}

/// The four characters of one row: left edge, fill, divider, right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub left: char,
    pub fill: char,
    pub divider: char,
    pub right: char,
}

impl BoxKind {
    fn layout(self) -> &'static str {
        match self {
            BoxKind::Ascii => "+--+| |||-+|| |||-+||-+|| ||+--+",
            BoxKind::Ascii2 => "+-++| ||+-++| ||+-+++-++| ||+-++",
            BoxKind::Square => "┌─┬┐│ ││├─┼┤│ ││├─┼┤├─┼┤│ ││└─┴┘",
            BoxKind::Rounded => "╭─┬╮│ ││├─┼┤│ ││├─┼┤├─┼┤│ ││╰─┴╯",
            BoxKind::Heavy => "┏━┳┓┃ ┃┃┣━╋┫┃ ┃┃┣━╋┫┣━╋┫┃ ┃┃┗━┻┛",
            BoxKind::HeavyHead => "┏━┳┓┃ ┃┃┡━╇┩│ ││├─┼┤├─┼┤│ ││└─┴┘",
            BoxKind::Double => "╔═╦╗║ ║║╠═╬╣║ ║║╠═╬╣╠═╬╣║ ║║╚═╩╝",
            BoxKind::SimpleHeavy => "         ━━          ━━         ",
        }
    }

    pub fn edge(self, row: BoxRow) -> Edge {
        let index = row as usize * 4;
        let mut chars = self.layout().chars().skip(index);
        let mut next = || chars.next().unwrap_or(' ');
        Edge { left: next(), fill: next(), divider: next(), right: next() }
    }

    /// A horizontal line through columns of the given widths.
    pub fn line(self, row: BoxRow, widths: &[usize], edges: bool) -> String {
        let edge = self.edge(row);
        let mut out = String::new();
        if edges {
            out.push(edge.left);
        }
        for (index, width) in widths.iter().enumerate() {
            if index > 0 {
                out.push(edge.divider);
            }
            out.extend(std::iter::repeat(edge.fill).take(*width));
        }
        if edges {
            out.push(edge.right);
        }
        out
    }
}

/// Box used for a `--panel` choice; `none` means no panel.
pub fn for_panel(panel: PanelBox) -> Option<BoxKind> {
    match panel {
        PanelBox::None => None,
        PanelBox::Ascii => Some(BoxKind::Ascii),
        PanelBox::Ascii2 => Some(BoxKind::Ascii2),
        PanelBox::Square => Some(BoxKind::Square),
        PanelBox::Rounded => Some(BoxKind::Rounded),
        PanelBox::Heavy => Some(BoxKind::Heavy),
        PanelBox::Double => Some(BoxKind::Double),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_have_eight_rows_of_four() {
        for kind in [
            BoxKind::Ascii,
            BoxKind::Ascii2,
            BoxKind::Square,
            BoxKind::Rounded,
            BoxKind::Heavy,
            BoxKind::HeavyHead,
            BoxKind::Double,
            BoxKind::SimpleHeavy,
        ] {
            assert_eq!(kind.layout().chars().count(), 32, "{kind:?}");
        }
    }

    #[test]
    fn lines_join_columns_with_dividers() {
        assert_eq!(BoxKind::Square.line(BoxRow::Top, &[2, 3], true), "┌──┬───┐");
        assert_eq!(BoxKind::HeavyHead.line(BoxRow::HeadRow, &[1, 1], true), "┡━╇━┩");
        assert_eq!(BoxKind::Rounded.line(BoxRow::Bottom, &[3], true), "╰───╯");
    }
}
