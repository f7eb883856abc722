//! rich: rich text and formatting in the terminal
//!
//! Renders files, URLs, console markup and standard input with syntax
//! highlighting, Markdown, reStructuredText, JSON, CSV tables and Jupyter
//! notebooks, then writes the result to the terminal, a pager, or HTML/SVG.

use std::process::ExitCode;

mod classify;
mod cli;
mod config;
mod dispatch;
mod domain;
mod error;
mod fetch;
mod pager;
mod render;
mod renderables;
mod sink;
mod utils;

fn main() -> ExitCode {
    cli::main()
}
