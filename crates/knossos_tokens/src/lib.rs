#![doc = include_str!("../README.md")]

use crate::spanned::{LineReader, Span};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod spanned;
pub mod token;

/// An error with a location
#[derive(Debug)]
pub struct SpannedError<E, C> {
    error: E,
    location: Option<Span>,
    cause: Option<Box<C>>,
}

impl<E, C> SpannedError<E, C> {
    pub fn new(error: E, location: impl Into<Option<Span>>, cause: impl Into<Option<C>>) -> Self {
        Self {
            error,
            location: location.into(),
            cause: cause.into().map(Box::new),
        }
    }

    /// Gets the error
    pub fn error(&self) -> &E {
        &self.error
    }

    /// Gets the location of the error, if known
    pub fn location(&self) -> Option<Span> {
        self.location
    }

    /// Gets the cause of this error
    pub fn cause(&self) -> Option<&C> {
        self.cause.as_deref()
    }

    /// Sets the location of this error if it doesn't have one yet
    pub fn or_location(mut self, location: Span) -> Self {
        self.location.get_or_insert(location);
        self
    }
}

impl<E: Display, C: Display> SpannedError<E, C> {
    /// Renders this error along with an excerpt of the source it came from.
    pub fn render(&self, src: &str) -> String {
        let mut out = format!("{}\n", self.error);
        if let Some(location) = &self.location {
            out.push_str(&format!("  -> {location}\n"));
            let lines = LineReader::new(2, 2).lines(src, location);
            let width = lines.iter().map(|line| line.line).max().unwrap_or(0) / 10 + 1;
            for line in &lines {
                out.push_str(&format!("{:width$} | {}\n", line.line, line.src.trim_end()));
                if line.line == location.line() {
                    out.push_str(&format!("{}{}^\n", " ".repeat(width + 3), "-".repeat(line.col)));
                }
            }
        }
        if let Some(cause) = &self.cause {
            out.push_str(&cause.to_string());
        }
        out
    }
}

impl<E: Display, C: Display> Display for SpannedError<E, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(location) = &self.location {
            write!(f, "\n  -> line {location}")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "\n{cause}")?;
        }
        Ok(())
    }
}

impl<E, C> Error for SpannedError<E, C>
where
    E: Debug + Display,
    C: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("bad thing")]
    struct Bad;

    #[test]
    fn test_display_with_location() {
        let error = SpannedError::<_, Bad>::new(Bad, Span::new(2, 5), None);
        assert_eq!(error.to_string(), "bad thing\n  -> line 2:5");
    }

    #[test]
    fn test_render_excerpt() {
        let error = SpannedError::<_, Bad>::new(Bad, Span::new(2, 3), None);
        let rendered = error.render("(a)\n(b c)\n(d)\n");
        assert!(rendered.contains("2 | (b c)"), "{rendered}");
        assert!(rendered.contains("--^"), "{rendered}");
    }

    #[test]
    fn test_or_location_keeps_existing() {
        let error = SpannedError::<_, Bad>::new(Bad, Span::new(1, 1), None).or_location(Span::new(4, 4));
        assert_eq!(error.location(), Some(Span::new(1, 1)));
    }
}
