//! Data structures for the parsed RDF terms and statements delivered to sinks.

use std::fmt;
use std::fmt::Write;
use std::ops::{BitOr, BitOrAssign};

/// The kind of an RDF [`Term`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum TermKind {
    /// A URI reference, possibly relative.
    Uri,
    /// A compact URI of the form `prefix:name`, not expanded by the reader.
    Curie,
    /// A blank node label, without the leading `_:`.
    Blank,
    /// A literal lexical form.
    Literal,
}

/// Lexical flags attached to a [`Term`] while it was read.
///
/// ```
/// use brook_api::model::TermFlags;
///
/// let mut flags = TermFlags::NONE;
/// flags |= TermFlags::HAS_QUOTE;
/// assert!(flags.contains(TermFlags::HAS_QUOTE));
/// assert!(!flags.contains(TermFlags::HAS_NEWLINE));
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Hash)]
pub struct TermFlags(u32);

impl TermFlags {
    pub const NONE: Self = Self(0);
    /// The literal contains a (possibly escaped) newline or carriage return.
    pub const HAS_NEWLINE: Self = Self(1);
    /// The literal contains an escaped double quote.
    pub const HAS_QUOTE: Self = Self(1 << 1);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for TermFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TermFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Flags describing the syntactic context of a [`Statement`].
///
/// The `EMPTY_*` and `ANON_*_BEGIN` flags are one-shot: they appear on a
/// single statement. `ANON_CONT` is sticky and marks every statement nested
/// inside an anonymous blank node scope.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Hash)]
pub struct StatementFlags(u32);

impl StatementFlags {
    pub const NONE: Self = Self(0);
    /// The subject is `[]`.
    pub const EMPTY_S: Self = Self(1);
    /// The object is `[]`.
    pub const EMPTY_O: Self = Self(1 << 1);
    /// The subject begins an anonymous blank node scope (`[ … ]`).
    pub const ANON_S_BEGIN: Self = Self(1 << 2);
    /// The object begins an anonymous blank node scope (`[ … ]`).
    pub const ANON_O_BEGIN: Self = Self(1 << 3);
    /// The statement is nested inside an anonymous blank node scope.
    pub const ANON_CONT: Self = Self(1 << 4);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Keeps only the flags also present in `other`.
    #[inline]
    pub fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Removes the flags present in `other`.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for StatementFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for StatementFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A measured RDF term.
///
/// `value` borrows from the reader's arena and is only valid for the
/// duration of the sink call it is passed to. `n_chars` is the number of
/// characters in `value`, which is at most `value.len()` (its size in
/// bytes).
///
/// The default string formatter returns an N-Triples compatible
/// representation, except for CURIEs which are written unexpanded.
///
/// ```
/// use brook_api::model::Term;
///
/// assert_eq!("<http://example.com/foo>", Term::uri("http://example.com/foo").to_string());
/// assert_eq!("_:b0", Term::blank("b0").to_string());
/// assert_eq!("\"a\\nb\"", Term::literal("a\nb").to_string());
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Term<'a> {
    pub kind: TermKind,
    pub value: &'a str,
    pub n_chars: usize,
    pub flags: TermFlags,
}

impl<'a> Term<'a> {
    pub fn new(kind: TermKind, value: &'a str) -> Self {
        Self {
            kind,
            value,
            n_chars: value.chars().count(),
            flags: TermFlags::NONE,
        }
    }

    pub fn uri(value: &'a str) -> Self {
        Self::new(TermKind::Uri, value)
    }

    pub fn curie(value: &'a str) -> Self {
        Self::new(TermKind::Curie, value)
    }

    pub fn blank(value: &'a str) -> Self {
        Self::new(TermKind::Blank, value)
    }

    pub fn literal(value: &'a str) -> Self {
        Self::new(TermKind::Literal, value)
    }
}

impl<'a> fmt::Display for Term<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TermKind::Uri => write!(f, "<{}>", self.value),
            TermKind::Curie => f.write_str(self.value),
            TermKind::Blank => write!(f, "_:{}", self.value),
            TermKind::Literal => {
                f.write_char('"')?;
                escape(self.value).try_for_each(|c| f.write_char(c))?;
                f.write_char('"')
            }
        }
    }
}

/// A single parsed statement together with its context flags.
///
/// `graph` is reserved for future quad syntaxes and is always `None` for
/// Turtle and N-Triples. `object_datatype` and `object_lang` are only
/// present when `object` is a literal, and never both at once.
///
/// The default string formatter returns an N-Triples compatible
/// representation when no CURIE is involved.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Statement<'a> {
    pub flags: StatementFlags,
    pub graph: Option<Term<'a>>,
    pub subject: Term<'a>,
    pub predicate: Term<'a>,
    pub object: Term<'a>,
    pub object_datatype: Option<Term<'a>>,
    pub object_lang: Option<Term<'a>>,
}

impl<'a> fmt::Display for Statement<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(datatype) = &self.object_datatype {
            write!(f, "^^{}", datatype)?;
        }
        if let Some(lang) = &self.object_lang {
            write!(f, "@{}", lang.value)?;
        }
        write!(f, " .")
    }
}

fn escape(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(EscapeRdf::new)
}

/// A customized version of EscapeDefault of the Rust standard library
struct EscapeRdf {
    state: EscapeRdfState,
}

enum EscapeRdfState {
    Done,
    Char(char),
    Backslash(char),
}

impl EscapeRdf {
    fn new(c: char) -> Self {
        Self {
            state: match c {
                '\n' => EscapeRdfState::Backslash('n'),
                '\r' => EscapeRdfState::Backslash('r'),
                '"' => EscapeRdfState::Backslash('"'),
                '\\' => EscapeRdfState::Backslash('\\'),
                c => EscapeRdfState::Char(c),
            },
        }
    }
}

impl Iterator for EscapeRdf {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self.state {
            EscapeRdfState::Backslash(c) => {
                self.state = EscapeRdfState::Char(c);
                Some('\\')
            }
            EscapeRdfState::Char(c) => {
                self.state = EscapeRdfState::Done;
                Some(c)
            }
            EscapeRdfState::Done => None,
        }
    }
}

#[test]
fn term_display() {
    assert_eq!(
        "<http://example.com/foo>",
        Term::uri("http://example.com/foo").to_string()
    );
    assert_eq!("ex:foo", Term::curie("ex:foo").to_string());
    assert_eq!("_:genid1", Term::blank("genid1").to_string());
    assert_eq!("\"a\\\"b\\\\c\"", Term::literal("a\"b\\c").to_string());
}

#[test]
fn statement_display() {
    let statement = Statement {
        flags: StatementFlags::NONE,
        graph: None,
        subject: Term::uri("http://example.com/s"),
        predicate: Term::uri("http://example.com/p"),
        object: Term::literal("1"),
        object_datatype: Some(Term::uri("http://www.w3.org/2001/XMLSchema#integer")),
        object_lang: None,
    };
    assert_eq!(
        "<http://example.com/s> <http://example.com/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .",
        statement.to_string()
    );
}

#[test]
fn term_measures() {
    let term = Term::literal("héllo");
    assert_eq!(6, term.value.len());
    assert_eq!(5, term.n_chars);
}
