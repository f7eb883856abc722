//! Merge CLI arguments with config file values

use std::path::PathBuf;

use crate::domain::{
    Align, FileConfig, Mode, PaddingSpec, PanelBox, Settings, DEFAULT_RULE_CHAR, DEFAULT_RULE_STYLE,
    DEFAULT_THEME,
};
use crate::error::{Error, Result};
use crate::render::{Justify, Style};

/// Values given on the command line (or through `RICH_*` environment
/// variables, which clap folds into the same fields).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub resource: String,
    pub mode: Option<Mode>,
    pub width: Option<usize>,
    pub max_width: Option<usize>,
    pub justify: Option<Justify>,
    pub align: Option<Align>,
    pub style: Option<String>,
    pub padding: Option<PaddingSpec>,
    pub expand: bool,
    pub panel: Option<PanelBox>,
    pub panel_style: Option<String>,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub theme: Option<String>,
    pub lexer: Option<String>,
    pub line_numbers: bool,
    pub guides: bool,
    pub hyperlinks: bool,
    pub no_wrap: bool,
    pub soft_wrap: bool,
    pub emoji: bool,
    pub rule_style: Option<String>,
    pub rule_char: Option<String>,
    pub head: Option<usize>,
    pub tail: Option<usize>,
    pub pager: bool,
    pub force_terminal: bool,
    pub preprocess_ansi: bool,
    pub export_html: Option<PathBuf>,
    pub export_svg: Option<PathBuf>,
}

fn parse_style(definition: &str) -> Result<Style> {
    Style::parse(definition)
        .map_err(|source| Error::Style { definition: definition.to_string(), source })
}

/// Combine CLI values with config file defaults.
///
/// Flags that can only be switched on from the command line are enabled
/// when either the CLI or the file enables them.
pub fn merge_cli_with_config(cli: CliOverrides, file: FileConfig) -> Result<Settings> {
    let style = parse_style(cli.style.as_deref().unwrap_or(""))?;
    let panel_style = parse_style(cli.panel_style.as_deref().or(file.panel_style.as_deref()).unwrap_or(""))?;
    let rule_style =
        parse_style(cli.rule_style.as_deref().or(file.rule_style.as_deref()).unwrap_or(DEFAULT_RULE_STYLE))?;

    let rule_char = cli
        .rule_char
        .or(file.rule_char)
        .filter(|chars| !chars.is_empty())
        .unwrap_or_else(|| DEFAULT_RULE_CHAR.to_string());
    let theme = cli
        .theme
        .or(file.theme)
        .filter(|theme| !theme.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_THEME.to_string());

    // A fixed width implies filling it
    let expand = cli.expand || cli.width.is_some();

    Ok(Settings {
        resource: cli.resource,
        mode: cli.mode,
        width: cli.width,
        max_width: cli.max_width.or(file.max_width).filter(|width| *width > 0),
        justify: cli.justify,
        align: cli.align,
        style,
        padding: cli.padding,
        expand,
        panel: cli.panel.or(file.panel).unwrap_or_default(),
        panel_style,
        title: cli.title,
        caption: cli.caption,
        theme,
        lexer: cli.lexer.filter(|lexer| !lexer.trim().is_empty()),
        line_numbers: cli.line_numbers || file.line_numbers.unwrap_or(false),
        guides: cli.guides || file.guides.unwrap_or(false),
        hyperlinks: cli.hyperlinks || file.hyperlinks.unwrap_or(false),
        no_wrap: cli.no_wrap,
        soft_wrap: cli.soft_wrap,
        emoji: cli.emoji || file.emoji.unwrap_or(false),
        rule_style,
        rule_char,
        head: cli.head,
        tail: cli.tail,
        pager: cli.pager || file.pager.unwrap_or(false),
        force_terminal: cli.force_terminal,
        preprocess_ansi: cli.preprocess_ansi,
        export_html: cli.export_html,
        export_svg: cli.export_svg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;

    #[test]
    fn test_defaults_without_cli_or_file() {
        let settings = merge_cli_with_config(CliOverrides::default(), FileConfig::default()).unwrap();
        assert_eq!(settings.theme, "ansi_dark");
        assert_eq!(settings.rule_char, "─");
        assert_eq!(settings.rule_style, Style::new().fg(Color::Standard(10)));
        assert_eq!(settings.panel, PanelBox::None);
        assert!(!settings.expand);
    }

    #[test]
    fn test_cli_overrides_file() {
        let cli = CliOverrides { theme: Some("monokai".into()), panel: Some(PanelBox::Heavy), ..Default::default() };
        let file = FileConfig {
            theme: Some("github".into()),
            panel: Some(PanelBox::Rounded),
            rule_char: Some("=".into()),
            ..Default::default()
        };
        let settings = merge_cli_with_config(cli, file).unwrap();
        assert_eq!(settings.theme, "monokai");
        assert_eq!(settings.panel, PanelBox::Heavy);
        assert_eq!(settings.rule_char, "=");
    }

    #[test]
    fn test_file_enables_flags() {
        let file = FileConfig { line_numbers: Some(true), pager: Some(true), ..Default::default() };
        let settings = merge_cli_with_config(CliOverrides::default(), file).unwrap();
        assert!(settings.line_numbers);
        assert!(settings.pager);
        assert!(!settings.guides);
    }

    #[test]
    fn test_width_implies_expand() {
        let cli = CliOverrides { width: Some(40), ..Default::default() };
        assert!(merge_cli_with_config(cli, FileConfig::default()).unwrap().expand);
    }

    #[test]
    fn test_invalid_style_is_a_usage_error() {
        let cli = CliOverrides { style: Some("bold not-a-color".into()), ..Default::default() };
        let err = merge_cli_with_config(cli, FileConfig::default()).unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.to_string(), "unable to parse style \"bold not-a-color\"");
    }
}
