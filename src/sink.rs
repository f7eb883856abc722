//! Where the rendered output goes: terminal/stdout, the pager, or export files.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::Settings;
use crate::error::{Error, Result};
use crate::pager;
use crate::render::{Console, ConsoleOptions, RenderOptions, Renderable};

const SVG_TITLE: &str = "Rich";

fn render_options(settings: &Settings, base: RenderOptions) -> RenderOptions {
    let width = settings.max_width.map_or(base.max_width, |max| max.min(base.max_width));
    RenderOptions {
        justify: settings.justify,
        no_wrap: settings.no_wrap,
        soft_wrap: settings.soft_wrap,
        ..base.with_width(width)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| Error::Export { path: path.to_path_buf(), source })?;
    debug!("exported {}", path.display());
    Ok(())
}

/// Record the output and write the requested export files. Nothing is
/// written to stdout.
fn export(renderable: &dyn Renderable, settings: &Settings) -> Result<()> {
    let mut console = Console::new(ConsoleOptions { record: true, ..ConsoleOptions::default() });
    let lines = renderable.render(&render_options(settings, console.options()));
    console.record_lines(lines);
    if let Some(path) = &settings.export_html {
        write_file(path, &console.export_html())?;
    }
    if let Some(path) = &settings.export_svg {
        write_file(path, &console.export_svg(SVG_TITLE))?;
    }
    Ok(())
}

fn page(renderable: &dyn Renderable, settings: &Settings, console: &Console) -> Result<()> {
    // Leave the last column free so full-width lines don't wrap
    let options = render_options(settings, console.options().with_width(console.width().saturating_sub(1)));
    let lines: Vec<String> =
        renderable.render(&options).iter().map(|line| console.render_line(line)).collect();
    pager::run(&lines, console.height())?;
    Ok(())
}

/// Write `renderable` to the sink `settings` selects.
pub fn emit(renderable: &dyn Renderable, settings: &Settings) -> Result<()> {
    if settings.exporting() {
        if settings.pager {
            warn!("--pager is ignored when exporting");
        }
        return export(renderable, settings);
    }

    let mut console = Console::new(ConsoleOptions {
        force_terminal: settings.force_terminal,
        ..ConsoleOptions::default()
    });

    if settings.pager {
        if console::Term::stdout().is_term() {
            return page(renderable, settings, &console);
        }
        debug!("stdout is not a terminal, printing instead of paging");
    }

    let options = render_options(settings, console.options());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match console.print(renderable, &options, &mut out) {
        // Output piped into something that stopped reading
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => Ok(result?),
    }
}
