//! Command-line interface for rich
//!
//! Parses arguments, loads the config file, then builds and emits the
//! renderable for the requested resource.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, merge_cli_with_config};
use crate::{dispatch, error, sink};

mod args;

use args::RenderArgs;

const USAGE_HINT: &str = "Usage: rich [OPTIONS] <PATH,TEXT,URL, or '-'>";

/// Rich text and formatting in the terminal
#[derive(Parser)]
#[command(name = "rich")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    #[command(flatten)]
    render: RenderArgs,

    /// Path to config file (TOML or YAML)
    #[arg(long, value_name = "FILE", env = "RICH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

fn run(cli: Cli) -> Result<()> {
    if cli.render.wants_usage_hint() {
        println!("{USAGE_HINT}");
        println!("See rich --help for options");
        return Ok(());
    }

    let file_config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    let settings = merge_cli_with_config(cli.render.into_overrides(), file_config)?;
    let renderable = dispatch::build(&settings)?;
    sink::emit(renderable.as_ref(), &settings)?;
    Ok(())
}

fn report(err: &anyhow::Error) {
    let label = console::style("error:").red().bold().for_stderr();
    eprintln!("{label} {err}");
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<error::Error>() {
        Some(err) if err.is_usage() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

pub fn main() -> ExitCode {
    // Usage errors from clap print and exit with status 2 here
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            exit_code(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rich").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_flags_follow_rich() {
        let cli = parse(&["-h", "5", "-n", "-g", "-E", "-a", "rounded", "file.py"]).unwrap();
        let overrides = cli.render.into_overrides();
        assert_eq!(overrides.head, Some(5));
        assert!(overrides.line_numbers && overrides.guides && overrides.emoji);
        assert_eq!(overrides.panel, Some(crate::domain::PanelBox::Rounded));
        assert_eq!(overrides.resource, "file.py");
    }

    #[test]
    fn mode_flags_are_exclusive() {
        let err = parse(&["--json", "--markdown", "x"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn head_and_tail_conflict() {
        assert!(parse(&["--head", "1", "--tail", "1", "x"]).is_err());
    }

    #[test]
    fn widths_must_be_positive() {
        assert!(parse(&["-w", "0", "x"]).is_err());
        assert!(parse(&["-w", "-5", "x"]).is_err());
        assert!(parse(&["-w", "abc", "x"]).is_err());
        assert!(parse(&["-W", "40", "x"]).is_ok());
    }

    #[test]
    fn padding_is_validated() {
        let err = parse(&["-d", "1,2,3", "x"]).err().unwrap();
        assert!(err.to_string().contains("padding should be 1, 2 or 4 integers"));
        let cli = parse(&["-d", "1,2", "x"]).unwrap();
        assert_eq!(cli.render.padding, Some(crate::domain::PaddingSpec::symmetric(1, 2)));
    }

    #[test]
    fn justify_and_align_map_to_settings() {
        let cli = parse(&["-F", "-r", "-p", "x"]).unwrap();
        let overrides = cli.render.into_overrides();
        assert_eq!(overrides.justify, Some(crate::render::Justify::Full));
        assert_eq!(overrides.align, Some(crate::domain::Align::Right));
        assert_eq!(overrides.mode, Some(crate::domain::Mode::Print));
    }

    #[test]
    fn usage_hint_only_without_resource() {
        assert!(parse(&[]).unwrap().render.wants_usage_hint());
        assert!(!parse(&["--rule"]).unwrap().render.wants_usage_hint());
        assert!(!parse(&["x"]).unwrap().render.wants_usage_hint());
    }
}
