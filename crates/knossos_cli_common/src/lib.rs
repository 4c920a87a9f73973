#![doc = include_str!("../README.md")]

use clap::{value_parser, ArgAction, Args};

/// Sets how much is logged. Each `-v` logs more and each `-q` logs less.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct LoggingArgs {
    /// Log more, can be given twice
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "quiet", global = true)]
    verbose: u8,
    /// Log less, can be given twice
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "verbose", global = true)]
    quiet: u8,
}

impl LoggingArgs {
    /// How far from the default level logging was moved. Positive is more verbose.
    pub fn verbosity(&self) -> i8 {
        (self.verbose.min(2) as i8) - (self.quiet.min(2) as i8)
    }

    /// Gets the logging level based on whether `-v[v]` or `-q[q]` has been used
    #[cfg(feature = "tracing")]
    pub fn log_level_filter(&self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;
        match self.verbosity() {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            2..=i8::MAX => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        logging: LoggingArgs,
    }

    fn verbosity(args: &str) -> i8 {
        Cli::try_parse_from(args.split_whitespace())
            .expect("could not parse test string")
            .logging
            .verbosity()
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(verbosity("cli"), 0);
        assert_eq!(verbosity("cli -vv"), 2);
        assert_eq!(verbosity("cli -q"), -1);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["cli", "-v", "-q"]).is_err());
    }
}
