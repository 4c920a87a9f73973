//! The subcommands of ksc

use eyre::{eyre, WrapErr};
use knossos_parsing::parser::error::ParseError;
use knossos_parsing::parser::signatures::FunctionKind;
use knossos_parsing::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use std::io::Write;
use std::path::Path;
use tracing::debug;

fn open(path: &Path) -> eyre::Result<Parser> {
    debug!("opening {path:?}");
    Parser::with_file(path).wrap_err_with(|| format!("could not read {}", path.display()))
}

/// Renders a parse error against the source it came from
fn report(parser: &Parser, path: &Path, error: ParseError) -> eyre::Report {
    eyre!("{}", error.render(parser.source()).trim_end())
        .wrap_err(format!("could not parse {}", path.display()))
}

fn parsed(path: &Path) -> eyre::Result<Parser> {
    let mut parser = open(path)?;
    let result = parser.parse().map(|_| ());
    result.map_err(|error| report(&parser, path, error))?;
    Ok(parser)
}

/// Prints the top level forms of a file, one per line unless a width is given
pub fn tokens(path: &Path, width: Option<usize>, out: &mut impl Write) -> eyre::Result<()> {
    let mut parser = open(path)?;
    let root = parser
        .tokenise()
        .cloned()
        .map_err(|error| report(&parser, path, error))?;
    for form in root.children() {
        match width {
            Some(width) => writeln!(out, "{}", form.pprint(width))?,
            None => writeln!(out, "{form}")?,
        }
    }
    Ok(())
}

/// Prints the parsed expressions of a file
pub fn ast(path: &Path, out: &mut impl Write) -> eyre::Result<()> {
    let parser = parsed(path)?;
    if let Some(root) = parser.root_node() {
        writeln!(out, "{root}")?;
    }
    if !parser.extra_decls().is_empty() {
        writeln!(out, "; extra declarations")?;
        writeln!(out, "{}", parser.extra_decls())?;
    }
    Ok(())
}

/// Lists the functions of a file
pub fn signatures(path: &Path, out: &mut impl Write) -> eyre::Result<()> {
    let parser = parsed(path)?;
    for (signature, entry) in parser.signatures().iter() {
        let kind = format!("{:<8}", entry.kind.to_string());
        let kind = match entry.kind {
            FunctionKind::Declared => kind.if_supports_color(Stdout, |text| text.blue()).to_string(),
            FunctionKind::Defined => kind.if_supports_color(Stdout, |text| text.green()).to_string(),
        };
        writeln!(
            out,
            "{kind} {signature} -> {} ; line {}",
            entry.return_type,
            entry.span.line()
        )?;
    }
    Ok(())
}
