//! Streaming [Turtle](https://www.w3.org/TeamSubmission/turtle/) and
//! [N-Triples](https://www.w3.org/TR/n-triples/) parser.
//!
//! The reader works in streaming from any `Read` implementation or from an
//! in-memory string, and pushes every directive and statement it parses
//! into the [sinks](brook_api::sink::ReadSink) it was built with. It never
//! builds a graph: memory use is bounded by the size of the largest single
//! token plus the nesting depth of the document.
//!
//! How to collect all the statements of a document:
//! ```
//! use brook_api::model::Statement;
//! use brook_api::sink::{Cancelled, ReadSink};
//! use brook_turtle::{Reader, Syntax};
//!
//! #[derive(Default)]
//! struct ToStrings(Vec<String>);
//!
//! impl ReadSink for ToStrings {
//!     fn statement(&mut self, statement: &Statement<'_>) -> Result<(), Cancelled> {
//!         self.0.push(statement.to_string());
//!         Ok(())
//!     }
//! }
//!
//! let mut reader = Reader::new(Syntax::Turtle, ToStrings::default());
//! reader.read_string("<http://example.com/s> <http://example.com/p> \"o\" .").unwrap();
//! assert_eq!(
//!     vec!["<http://example.com/s> <http://example.com/p> \"o\" ."],
//!     reader.sink().0
//! );
//! ```
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_qualifications
)]

mod error;
mod reader;
mod utils;

pub use error::ReadError;
pub use error::ReadErrorKind;
pub use reader::Reader;
pub use reader::Syntax;
