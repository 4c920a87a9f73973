//! the args for running ksc

use clap::{Subcommand, ValueHint};
use knossos_cli_common::LoggingArgs;
use std::path::PathBuf;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Prints what the knossos front end makes of source files")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }
}

/// What to print for every source file
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints the token tree
    Tokens {
        /// Pretty print, breaking forms longer than this many columns
        #[clap(short, long)]
        width: Option<usize>,
        #[command(flatten)]
        sources: Sources,
    },
    /// Prints the parsed expressions
    Ast {
        #[command(flatten)]
        sources: Sources,
    },
    /// Lists every declared and defined function
    Signatures {
        #[command(flatten)]
        sources: Sources,
    },
}

impl Command {
    /// The source files to work on
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Command::Tokens { sources, .. }
            | Command::Ast { sources }
            | Command::Signatures { sources } => &sources.files,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct Sources {
    /// Specify which source files to read
    #[clap(required = true, value_name = "source file", value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}
