use crate::args::{Args, Command};
use clap::Parser;
use std::io;
use std::io::{stderr, stdout, Stderr, StderrLock, Stdout, StdoutLock, Write};
use tracing::metadata::LevelFilter;
use tracing::{debug, trace, Level, Metadata};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::{format, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

mod args;
mod commands;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.logging().log_level_filter())?;
    trace!("starting ksc with args: {args:?}");
    debug!("ksc version: {}", env!("CARGO_PKG_VERSION"));

    let files = args.command.files();
    let stdout = stdout();
    let mut out = stdout.lock();
    for path in files {
        if files.len() > 1 {
            writeln!(out, "; {}", path.display())?;
        }
        match &args.command {
            Command::Tokens { width, .. } => commands::tokens(path, *width, &mut out)?,
            Command::Ast { .. } => commands::ast(path, &mut out)?,
            Command::Signatures { .. } => commands::signatures(path, &mut out)?,
        }
    }
    out.flush()?;

    Ok(())
}

struct MyWriter {
    stdout: Stdout,
    stderr: Stderr,
}

enum StdioLock<'a> {
    Stdout(StdoutLock<'a>),
    Stderr(StderrLock<'a>),
}

impl<'a> io::Write for StdioLock<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            StdioLock::Stdout(stdout) => stdout.write(buf),
            StdioLock::Stderr(stderr) => stderr.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            StdioLock::Stdout(stdout) => stdout.flush(),
            StdioLock::Stderr(stderr) => stderr.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for MyWriter {
    type Writer = StdioLock<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        StdioLock::Stdout(self.stdout.lock())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        // warnings and errors go to stderr
        if meta.level() <= &Level::WARN {
            StdioLock::Stderr(self.stderr.lock())
        } else {
            StdioLock::Stdout(self.stdout.lock())
        }
    }
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let registry = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format().without_time())
                .with_writer(MyWriter {
                    stdout: stdout(),
                    stderr: stderr(),
                })
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)?;

    Ok(())
}
