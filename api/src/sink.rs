//! Interfaces for the consumers of a statement stream.

use crate::model::{Statement, Term};
use std::error::Error;
use std::fmt;

/// Returned by a sink to stop the read.
///
/// A reader receiving `Err(Cancelled)` from any sink method unwinds and
/// reports a cancelled read to its caller. Everything delivered before the
/// cancellation was valid data.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Hash)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cancelled by sink")
    }
}

impl Error for Cancelled {}

/// A consumer of the events produced while reading an RDF document.
///
/// All terms passed to a sink borrow from the reader's internal storage and
/// are only valid for the duration of the call; a sink that needs to keep
/// them must copy them.
///
/// Count the statements of a Turtle document:
/// ```
/// use brook_api::model::Statement;
/// use brook_api::sink::{Cancelled, ReadSink};
///
/// struct Counter(usize);
///
/// impl ReadSink for Counter {
///     fn statement(&mut self, _: &Statement<'_>) -> Result<(), Cancelled> {
///         self.0 += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait ReadSink {
    /// Called for each `@base` directive with the new base URI.
    fn base(&mut self, uri: &Term<'_>) -> Result<(), Cancelled> {
        let _ = uri;
        Ok(())
    }

    /// Called for each `@prefix` directive.
    ///
    /// `name` is the declared prefix name, possibly empty, without the
    /// trailing `:`.
    fn prefix(&mut self, name: &Term<'_>, uri: &Term<'_>) -> Result<(), Cancelled> {
        let _ = (name, uri);
        Ok(())
    }

    /// Called exactly once for each statement of the document.
    fn statement(&mut self, statement: &Statement<'_>) -> Result<(), Cancelled>;

    /// Called when an anonymous blank node scope (`[ … ]`) closes, with the
    /// blank node that was minted for it.
    fn end(&mut self, node: &Term<'_>) -> Result<(), Cancelled> {
        let _ = node;
        Ok(())
    }
}

impl<S: ReadSink + ?Sized> ReadSink for &mut S {
    fn base(&mut self, uri: &Term<'_>) -> Result<(), Cancelled> {
        (**self).base(uri)
    }

    fn prefix(&mut self, name: &Term<'_>, uri: &Term<'_>) -> Result<(), Cancelled> {
        (**self).prefix(name, uri)
    }

    fn statement(&mut self, statement: &Statement<'_>) -> Result<(), Cancelled> {
        (**self).statement(statement)
    }

    fn end(&mut self, node: &Term<'_>) -> Result<(), Cancelled> {
        (**self).end(node)
    }
}
