//! Streaming reader for the Turtle and N-Triples syntaxes.

use crate::error::{ReadError, ReadErrorKind};
use crate::utils::{BlankIdGenerator, ByteSource, ReadBuffer, StrRef, StringArena};
use brook_api::model::{Statement, StatementFlags, Term, TermFlags, TermKind};
use brook_api::sink::ReadSink;
use brook_api::uri::file_uri_to_path;
use std::fs::File;
use std::io::Read;
use std::str;

pub(crate) const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub(crate) const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub(crate) const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub(crate) const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub(crate) const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub(crate) const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub(crate) const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub(crate) const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// The syntaxes the reader understands.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Syntax {
    /// [Turtle](https://www.w3.org/TeamSubmission/turtle/).
    Turtle,
    /// [N-Triples](https://www.w3.org/TR/n-triples/).
    ///
    /// The grammar tables are shared with Turtle, so this mode accepts a
    /// superset of strict N-Triples.
    NTriples,
}

/// A streaming [Turtle](https://www.w3.org/TeamSubmission/turtle/) and
/// N-Triples reader.
///
/// The reader pulls bytes from its input and pushes every directive and
/// statement it encounters into a [`ReadSink`], without ever materialising
/// a graph. One reader can read any number of documents in sequence; the
/// blank node labels it mints stay unique across them.
///
/// Count the number of `rdf:type` statements of a document:
/// ```
/// use brook_api::model::{Statement, TermKind};
/// use brook_api::sink::{Cancelled, ReadSink};
/// use brook_turtle::{Reader, Syntax};
///
/// struct TypeCount(usize);
///
/// impl ReadSink for TypeCount {
///     fn statement(&mut self, statement: &Statement<'_>) -> Result<(), Cancelled> {
///         if statement.predicate.value == "http://www.w3.org/1999/02/22-rdf-syntax-ns#type" {
///             self.0 += 1;
///         }
///         Ok(())
///     }
/// }
///
/// let mut reader = Reader::new(Syntax::Turtle, TypeCount(0));
/// reader.read_string("<http://example.com/foo> a <http://schema.org/Person> .").unwrap();
/// assert_eq!(1, reader.sink().0);
/// ```
pub struct Reader<S: ReadSink> {
    sink: S,
    syntax: Syntax,
    stack: StringArena,
    blank_ids: BlankIdGenerator,
    rdf_first: Node,
    rdf_rest: Node,
    rdf_nil: Node,
}

impl<S: ReadSink> Reader<S> {
    /// Builds a reader for `syntax` delivering its events to `sink`.
    pub fn new(syntax: Syntax, sink: S) -> Self {
        let mut stack = StringArena::default();
        let rdf_first = Node {
            kind: TermKind::Uri,
            value: stack.push_str(RDF_FIRST),
        };
        let rdf_rest = Node {
            kind: TermKind::Uri,
            value: stack.push_str(RDF_REST),
        };
        let rdf_nil = Node {
            kind: TermKind::Uri,
            value: stack.push_str(RDF_NIL),
        };
        stack.pin();
        Self {
            sink,
            syntax,
            stack,
            blank_ids: BlankIdGenerator::default(),
            rdf_first,
            rdf_rest,
            rdf_nil,
        }
    }

    /// Prepends `prefix` to every blank node label the reader mints, so
    /// that labels from different readers cannot clash. `None` removes a
    /// previously installed prefix.
    pub fn set_blank_prefix(&mut self, prefix: Option<&str>) {
        self.blank_ids.set_prefix(prefix);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Reads the document at a `file:` URI or a plain filesystem path.
    pub fn read_file(&mut self, uri: &str) -> Result<(), ReadError> {
        let path = match file_uri_to_path(uri) {
            Some(path) => path,
            None => {
                tracing::warn!("non-file URI `{}`", uri);
                return Err(ReadError::bad_arg(format!("non-file URI `{}`", uri)));
            }
        };
        let file = File::open(path)
            .map_err(|e| ReadError::with_document(path, ReadErrorKind::Io(e)))?;
        self.read_file_handle(file, path)
    }

    /// Reads a document from an already open byte stream. `name` is only
    /// used in diagnostics.
    pub fn read_file_handle(&mut self, file: impl Read, name: &str) -> Result<(), ReadError> {
        let read = ReadBuffer::new(file, name)?;
        self.read_document(read)
    }

    /// Reads a complete in-memory document.
    pub fn read_string(&mut self, utf8: &str) -> Result<(), ReadError> {
        let read = ReadBuffer::new(utf8.as_bytes(), "(string)")?;
        self.read_document(read)
    }

    fn read_document<B: ByteSource>(&mut self, read: ReadBuffer<B>) -> Result<(), ReadError> {
        let mut doc = DocReader { reader: self, read };
        match read_turtle_doc(&mut doc) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::error!("{}", error);
                Err(error)
            }
        }
    }
}

/// A term held in the arena while the statements using it are read.
#[derive(Debug, Clone, Copy)]
struct Node {
    kind: TermKind,
    value: StrRef,
}

/// The ambient state threaded through the recursive descent.
#[derive(Debug, Clone, Copy, Default)]
struct ReadContext {
    graph: Option<Node>,
    subject: Option<Node>,
    predicate: Option<Node>,
}

/// The state of one document read: the reader itself plus the input.
struct DocReader<'a, S: ReadSink, B: ByteSource> {
    reader: &'a mut Reader<S>,
    read: ReadBuffer<B>,
}

// [1] turtleDoc ::= statement*
fn read_turtle_doc<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<(), ReadError> {
    while !doc.read.eof() {
        read_statement(doc)?;
    }
    Ok(())
}

// Impl: [1] statement ::= directive ws* '.' | triples ws* '.' | ws+
fn read_statement<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<(), ReadError> {
    let mut flags = StatementFlags::NONE;
    let ctx = ReadContext::default();
    read_ws_star(doc)?;
    if doc.read.eof() {
        return Ok(());
    }
    match doc.read.peek_byte() {
        b'@' => read_directive(doc)?,
        _ => read_triples(doc, ctx, &mut flags)?,
    }
    read_ws_star(doc)?;
    doc.read.eat_byte(b'.')?;
    Ok(())
}

// [3] directive ::= prefixID | base
fn read_directive<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<(), ReadError> {
    doc.read.eat_byte(b'@')?;
    match doc.read.peek_byte() {
        b'b' => read_base(doc),
        b'p' => read_prefix_id(doc),
        _ => Err(doc.read.syntax_error("illegal directive".to_owned())),
    }
}

// [5] base ::= '@base' ws+ uriref
fn read_base<S: ReadSink, B: ByteSource>(doc: &mut DocReader<'_, S, B>) -> Result<(), ReadError> {
    // the `@` is consumed by read_directive
    doc.read.eat_string(b"base")?;
    read_ws_plus(doc)?;
    let uri = read_uriref(doc)?;
    let result = sink_base(doc, uri);
    doc.reader.stack.pop(uri);
    result
}

// Impl: [4] prefixID ::= '@prefix' ws+ prefixName? ':' ws* uriref
fn read_prefix_id<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<(), ReadError> {
    // the `@` is consumed by read_directive
    doc.read.eat_string(b"prefix")?;
    read_ws_plus(doc)?;
    let name = match read_prefix_name(doc)? {
        Some(name) => name,
        None => doc.reader.stack.push_empty(),
    };
    let result = read_prefix_id_rest(doc, name);
    doc.reader.stack.pop(name);
    result
}

fn read_prefix_id_rest<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    name: StrRef,
) -> Result<(), ReadError> {
    doc.read.eat_byte(b':')?;
    read_ws_star(doc)?;
    let uri = read_uriref(doc)?;
    let result = sink_prefix(doc, name, uri);
    doc.reader.stack.pop(uri);
    result
}

// Impl: [6] triples ::= subject ws+ predicateObjectList
fn read_triples<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    mut ctx: ReadContext,
    flags: &mut StatementFlags,
) -> Result<(), ReadError> {
    let subject = read_subject(doc, ctx, flags)?;
    ctx.subject = Some(subject);
    let result = match read_ws_plus(doc) {
        Ok(()) => read_predicate_object_list(doc, ctx, flags),
        Err(e) => Err(e),
    };
    doc.reader.stack.pop(subject.value);
    result
}

// [11] subject ::= resource | blank
fn read_subject<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    ctx: ReadContext,
    flags: &mut StatementFlags,
) -> Result<Node, ReadError> {
    match doc.read.peek_byte() {
        b'[' | b'(' | b'_' => read_blank(doc, ctx, flags, true),
        _ => read_resource(doc),
    }
}

// Impl: [7] predicateObjectList ::= verb ws+ objectList
//                                   (ws* ';' ws* (verb ws+ objectList)?)* (';')?
fn read_predicate_object_list<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    mut ctx: ReadContext,
    flags: &mut StatementFlags,
) -> Result<(), ReadError> {
    if doc.read.eof() {
        return Err(doc.read.syntax_error("premature end of file".to_owned()));
    }
    loop {
        let predicate = read_verb(doc)?;
        ctx.predicate = Some(predicate);
        let result = match read_ws_plus(doc) {
            Ok(()) => read_object_list(doc, ctx, flags),
            Err(e) => Err(e),
        };
        doc.reader.stack.pop(predicate.value);
        result?;
        ctx.predicate = None;
        read_ws_star(doc)?;
        if doc.read.peek_byte() != b';' {
            return Ok(());
        }
        while doc.read.peek_byte() == b';' {
            doc.read.eat_byte(b';')?;
            read_ws_star(doc)?;
        }
        match doc.read.peek_byte() {
            b'.' | b']' => return Ok(()),
            _ => (),
        }
    }
}

// Impl: [8] objectList ::= object (ws* ',' ws* object)*
fn read_object_list<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    ctx: ReadContext,
    flags: &mut StatementFlags,
) -> Result<(), ReadError> {
    read_object(doc, ctx, flags)?;
    read_ws_star(doc)?;
    while doc.read.peek_byte() == b',' {
        doc.read.eat_byte(b',')?;
        read_ws_star(doc)?;
        read_object(doc, ctx, flags)?;
        read_ws_star(doc)?;
    }
    Ok(())
}

// [9] verb ::= predicate | 'a'
fn read_verb<S: ReadSink, B: ByteSource>(doc: &mut DocReader<'_, S, B>) -> Result<Node, ReadError> {
    let mut pre = [0_u8; 2];
    doc.read.peek_n(&mut pre)?;
    if pre[0] == b'a' && matches!(pre[1], 0x9 | 0xA | 0xD | 0x20) {
        doc.read.eat_byte(b'a')?;
        Ok(Node {
            kind: TermKind::Uri,
            value: doc.reader.stack.push_str(RDF_TYPE),
        })
    } else {
        read_predicate(doc)
    }
}

// [12] predicate ::= resource
fn read_predicate<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<Node, ReadError> {
    read_resource(doc)
}

// [25] resource ::= uriref | qname
fn read_resource<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<Node, ReadError> {
    match doc.read.peek_byte() {
        b'<' => Ok(Node {
            kind: TermKind::Uri,
            value: read_uriref(doc)?,
        }),
        _ => Ok(Node {
            kind: TermKind::Curie,
            value: read_qname(doc)?,
        }),
    }
}

fn is_object_end(c: u8) -> bool {
    matches!(
        c,
        0x9 | 0xA | 0xD | 0x20 | 0 | b'#' | b'.' | b';' | b',' | b')' | b']'
    )
}

// [13] object ::= resource | blank | literal
// Recurses, calling the statement sink for every statement encountered.
// Leaves the stack in its original state (pops everything it pushes).
fn read_object<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    ctx: ReadContext,
    flags: &mut StatementFlags,
) -> Result<(), ReadError> {
    let orig_size = doc.reader.stack.size();
    let result = read_object_inner(doc, ctx, flags);
    debug_assert_eq!(orig_size, doc.reader.stack.size());
    result
}

fn read_object_inner<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    ctx: ReadContext,
    flags: &mut StatementFlags,
) -> Result<(), ReadError> {
    let mut emit = ctx.subject.is_some();
    let c = doc.read.peek_byte();
    let (object, datatype, lang, term_flags) = match c {
        0 => return Err(doc.read.syntax_error("unexpected end of file".to_owned())),
        b')' => return Err(doc.read.syntax_error("unexpected `)`".to_owned())),
        b'[' | b'(' => {
            // the blank or collection emits the containing statement itself
            emit = false;
            let node = read_blank(doc, ctx, flags, false)?;
            (node, None, None, TermFlags::NONE)
        }
        b'_' => {
            let node = read_blank(doc, ctx, flags, false)?;
            (node, None, None, TermFlags::NONE)
        }
        b'<' | b':' => (read_resource(doc)?, None, None, TermFlags::NONE),
        b'"' | b'+' | b'-' | b'.' | b'0'..=b'9' => read_literal(doc)?,
        _ => {
            // Either a boolean literal or a qname starting with the same
            // letters; only lookahead can tell them apart.
            let mut pre = [0_u8; 6];
            doc.read.peek_n(&mut pre)?;
            if pre.starts_with(b"true") && is_object_end(pre[4]) {
                doc.read.eat_string(b"true")?;
                let value = doc.reader.stack.push_str("true");
                let datatype = doc.reader.stack.push_str(XSD_BOOLEAN);
                (
                    Node {
                        kind: TermKind::Literal,
                        value,
                    },
                    Some(Node {
                        kind: TermKind::Uri,
                        value: datatype,
                    }),
                    None,
                    TermFlags::NONE,
                )
            } else if pre.starts_with(b"false") && is_object_end(pre[5]) {
                doc.read.eat_string(b"false")?;
                let value = doc.reader.stack.push_str("false");
                let datatype = doc.reader.stack.push_str(XSD_BOOLEAN);
                (
                    Node {
                        kind: TermKind::Literal,
                        value,
                    },
                    Some(Node {
                        kind: TermKind::Uri,
                        value: datatype,
                    }),
                    None,
                    TermFlags::NONE,
                )
            } else if !is_object_end(c) {
                let node = Node {
                    kind: TermKind::Curie,
                    value: read_qname(doc)?,
                };
                (node, None, None, TermFlags::NONE)
            } else {
                return Err(doc.read.syntax_error("expected object".to_owned()));
            }
        }
    };

    let result = if emit {
        emit_statement(doc, flags, ctx, &object, datatype.as_ref(), lang, term_flags)
    } else {
        Ok(())
    };
    if let Some(lang) = lang {
        doc.reader.stack.pop(lang);
    }
    if let Some(datatype) = datatype {
        doc.reader.stack.pop(datatype.value);
    }
    doc.reader.stack.pop(object.value);
    result
}

// [14] literal ::= quotedString ('@' language)? | datatypeString
//    | integer | double | decimal | boolean
fn read_literal<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<(Node, Option<Node>, Option<StrRef>, TermFlags), ReadError> {
    let c = doc.read.peek_byte();
    if c == b'-' || c == b'+' || c == b'.' || c.is_ascii_digit() {
        let (value, datatype) = read_number(doc)?;
        return Ok((value, Some(datatype), None, TermFlags::NONE));
    }
    if c != b'"' {
        return Err(doc.read.syntax_error("unknown literal type".to_owned()));
    }

    let mut term_flags = TermFlags::NONE;
    let value = read_quoted_string(doc, &mut term_flags)?;
    let object = Node {
        kind: TermKind::Literal,
        value,
    };
    match doc.read.peek_byte() {
        b'^' => {
            let rest = (|| {
                doc.read.eat_byte(b'^')?;
                doc.read.eat_byte(b'^')?;
                read_resource(doc)
            })();
            match rest {
                Ok(datatype) => Ok((object, Some(datatype), None, term_flags)),
                Err(e) => {
                    doc.reader.stack.pop(value);
                    Err(e)
                }
            }
        }
        b'@' => {
            let rest = (|| {
                doc.read.eat_byte(b'@')?;
                read_language(doc)
            })();
            match rest {
                Ok(lang) => Ok((object, None, Some(lang), term_flags)),
                Err(e) => {
                    doc.reader.stack.pop(value);
                    Err(e)
                }
            }
        }
        _ => Ok((object, None, None, term_flags)),
    }
}

// [19] exponent ::= [eE] ('-' | '+')? [0-9]+
// [18] decimal ::= ('-' | '+')? ( [0-9]+ '.' [0-9]* | '.' [0-9]+ | [0-9]+ )
// [17] double  ::= ('-' | '+')? ( [0-9]+ '.' [0-9]* exponent
//                                 | '.' [0-9]+ exponent | [0-9]+ exponent )
// [16] integer ::= ('-' | '+')? [0-9]+
fn read_number<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<(Node, Node), ReadError> {
    let value = doc.reader.stack.push_empty();
    match read_number_body(doc, value) {
        Ok(datatype) => Ok((
            Node {
                kind: TermKind::Literal,
                value,
            },
            Node {
                kind: TermKind::Uri,
                value: datatype,
            },
        )),
        Err(e) => {
            doc.reader.stack.pop(value);
            Err(e)
        }
    }
}

fn read_number_body<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    value: StrRef,
) -> Result<StrRef, ReadError> {
    let c = doc.read.peek_byte();
    let mut has_decimal = false;
    if c == b'-' || c == b'+' {
        doc.read.eat_byte(c)?;
        doc.reader.stack.push_byte(value, c);
    }
    if doc.read.peek_byte() == b'.' {
        // decimal with no integer part (e.g. `.05` or `-.05`)
        has_decimal = true;
        doc.read.eat_byte(b'.')?;
        doc.reader.stack.push_byte(value, b'.');
        read_0_9(doc, value, true)?;
    } else {
        read_0_9(doc, value, true)?;
        if doc.read.peek_byte() == b'.' {
            has_decimal = true;
            doc.read.eat_byte(b'.')?;
            doc.reader.stack.push_byte(value, b'.');
            read_0_9(doc, value, false)?;
        }
    }
    let c = doc.read.peek_byte();
    let datatype = if c == b'e' || c == b'E' {
        doc.read.eat_byte(c)?;
        doc.reader.stack.push_byte(value, c);
        let sign = doc.read.peek_byte();
        if sign == b'+' || sign == b'-' {
            doc.read.eat_byte(sign)?;
            doc.reader.stack.push_byte(value, sign);
        }
        read_0_9(doc, value, true)?;
        doc.reader.stack.push_str(XSD_DOUBLE)
    } else if has_decimal {
        doc.reader.stack.push_str(XSD_DECIMAL)
    } else {
        doc.reader.stack.push_str(XSD_INTEGER)
    };
    Ok(datatype)
}

fn read_0_9<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
    at_least_one: bool,
) -> Result<(), ReadError> {
    if at_least_one && !doc.read.peek_byte().is_ascii_digit() {
        return Err(doc.read.syntax_error("expected digit".to_owned()));
    }
    loop {
        let c = doc.read.peek_byte();
        if !c.is_ascii_digit() {
            return Ok(());
        }
        doc.read.eat_byte(c)?;
        doc.reader.stack.push_byte(dest, c);
    }
}

// Spec: [21] blank ::= nodeID | '[]' | '[' predicateObjectList ']' | collection
// Impl: [21] blank ::= nodeID | '[' ws* ']'
//          | '[' ws* predicateObjectList ws* ']' | collection
fn read_blank<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    ctx: ReadContext,
    flags: &mut StatementFlags,
    subject: bool,
) -> Result<Node, ReadError> {
    let was_anon_subject = subject && flags.contains(StatementFlags::ANON_CONT);
    match doc.read.peek_byte() {
        b'_' => Ok(Node {
            kind: TermKind::Blank,
            value: read_node_id(doc)?,
        }),
        b'[' => {
            doc.read.eat_byte(b'[')?;
            read_ws_star(doc)?;
            let dest = Node {
                kind: TermKind::Blank,
                value: doc.reader.blank_ids.generate(&mut doc.reader.stack),
            };
            match read_anon_body(doc, ctx, flags, subject, was_anon_subject, dest) {
                Ok(()) => Ok(dest),
                Err(e) => {
                    doc.reader.stack.pop(dest.value);
                    Err(e)
                }
            }
        }
        b'(' => read_collection(doc, ctx, flags),
        _ => Err(doc.read.syntax_error("illegal blank node".to_owned())),
    }
}

fn read_anon_body<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    ctx: ReadContext,
    flags: &mut StatementFlags,
    subject: bool,
    was_anon_subject: bool,
    dest: Node,
) -> Result<(), ReadError> {
    if doc.read.peek_byte() == b']' {
        // `[]`: a fresh node with no content
        doc.read.eat_byte(b']')?;
        *flags |= if subject {
            StatementFlags::EMPTY_S
        } else {
            StatementFlags::EMPTY_O
        };
        if ctx.subject.is_some() {
            emit_statement(doc, flags, ctx, &dest, None, None, TermFlags::NONE)?;
        }
        return Ok(());
    }

    *flags |= if subject {
        StatementFlags::ANON_S_BEGIN
    } else {
        StatementFlags::ANON_O_BEGIN
    };
    if ctx.subject.is_some() {
        emit_statement(doc, flags, ctx, &dest, None, None, TermFlags::NONE)?;
    }
    let mut inner = ctx;
    inner.subject = Some(dest);
    if !subject {
        *flags |= StatementFlags::ANON_CONT;
    }
    read_predicate_object_list(doc, inner, flags)?;
    read_ws_star(doc)?;
    doc.read.eat_byte(b']')?;
    sink_end(doc, &dest)?;
    if !was_anon_subject {
        flags.remove(StatementFlags::ANON_CONT);
    }
    Ok(())
}

// [22] itemList   ::= object+
// [23] collection ::= '(' itemList? ')'
fn read_collection<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    ctx: ReadContext,
    flags: &mut StatementFlags,
) -> Result<Node, ReadError> {
    doc.read.eat_byte(b'(')?;
    read_ws_star(doc)?;
    if doc.read.peek_byte() == b')' {
        // `()` is the empty list, which is exactly rdf:nil
        doc.read.eat_byte(b')')?;
        let nil = doc.reader.rdf_nil;
        if ctx.subject.is_some() {
            emit_statement(doc, flags, ctx, &nil, None, None, TermFlags::NONE)?;
        }
        return Ok(nil);
    }

    let head = Node {
        kind: TermKind::Blank,
        value: doc.reader.blank_ids.generate(&mut doc.reader.stack),
    };
    match read_collection_body(doc, ctx, flags, head) {
        Ok(()) => Ok(head),
        Err(e) => {
            doc.reader.stack.pop(head.value);
            Err(e)
        }
    }
}

fn read_collection_body<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    ctx: ReadContext,
    flags: &mut StatementFlags,
    head: Node,
) -> Result<(), ReadError> {
    if ctx.subject.is_some() {
        // the statement pointing at the list head comes before the chain
        emit_statement(doc, flags, ctx, &head, None, None, TermFlags::NONE)?;
    }
    let mut inner = ctx;
    inner.subject = Some(head);
    inner.predicate = Some(doc.reader.rdf_first);
    read_object(doc, inner, flags)?;
    read_collection_rec(doc, inner, flags)
}

/// Recursive helper for read_collection, one level per remaining item.
fn read_collection_rec<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    mut ctx: ReadContext,
    flags: &mut StatementFlags,
) -> Result<(), ReadError> {
    read_ws_star(doc)?;
    if doc.read.peek_byte() == b')' {
        doc.read.eat_byte(b')')?;
        let mut link = ctx;
        link.predicate = Some(doc.reader.rdf_rest);
        let nil = doc.reader.rdf_nil;
        return emit_statement(doc, flags, link, &nil, None, None, TermFlags::NONE);
    }

    let rest = Node {
        kind: TermKind::Blank,
        value: doc.reader.blank_ids.generate(&mut doc.reader.stack),
    };
    let mut link = ctx;
    link.predicate = Some(doc.reader.rdf_rest);
    let result = match emit_statement(doc, flags, link, &rest, None, None, TermFlags::NONE) {
        Ok(()) => {
            ctx.subject = Some(rest);
            ctx.predicate = Some(doc.reader.rdf_first);
            match read_object(doc, ctx, flags) {
                Ok(()) => read_collection_rec(doc, ctx, flags),
                Err(e) => Err(e),
            }
        }
        Err(e) => Err(e),
    };
    doc.reader.stack.pop(rest.value);
    result
}

// [26] nodeID ::= '_:' name
fn read_node_id<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<StrRef, ReadError> {
    doc.read.eat_byte(b'_')?;
    doc.read.eat_byte(b':')?;
    let dest = doc.reader.stack.push_empty();
    if let Err(e) = read_name(doc, dest, true) {
        doc.reader.stack.pop(dest);
        return Err(e);
    }
    if doc.reader.syntax == Syntax::Turtle {
        let bytes = doc.reader.stack.bytes_mut(dest);
        if bytes.starts_with(b"genid") {
            // rewrite `genid` labels so documents cannot clash with the
            // labels this reader mints
            bytes[..5].copy_from_slice(b"docid");
        }
    }
    Ok(dest)
}

// [27] qname ::= prefixName? ':' name?
fn read_qname<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<StrRef, ReadError> {
    let dest = match read_prefix_name(doc)? {
        Some(prefix) => prefix,
        None => doc.reader.stack.push_empty(),
    };
    match read_qname_rest(doc, dest) {
        Ok(()) => Ok(dest),
        Err(e) => {
            doc.reader.stack.pop(dest);
            Err(e)
        }
    }
}

fn read_qname_rest<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
) -> Result<(), ReadError> {
    doc.read.eat_byte(b':')?;
    doc.reader.stack.push_byte(dest, b':');
    read_name(doc, dest, false)?;
    Ok(())
}

// [28] uriref ::= '<' relativeURI '>'
fn read_uriref<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<StrRef, ReadError> {
    doc.read.eat_byte(b'<')?;
    let dest = doc.reader.stack.push_empty();
    match read_uriref_rest(doc, dest) {
        Ok(()) => Ok(dest),
        Err(e) => {
            doc.reader.stack.pop(dest);
            Err(e)
        }
    }
}

fn read_uriref_rest<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
) -> Result<(), ReadError> {
    // [34] relativeURI ::= ucharacter*
    while read_ucharacter(doc, dest)? {}
    doc.read.eat_byte(b'>')?;
    Ok(())
}

// [29] language ::= [a-z]+ ('-' [a-z0-9]+)*
fn read_language<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<StrRef, ReadError> {
    let start = doc.read.peek_byte();
    if !start.is_ascii_lowercase() {
        return Err(doc.read.syntax_error(format!(
            "unexpected `{}` in language tag",
            char::from(start).escape_debug()
        )));
    }
    let dest = doc.reader.stack.push_empty();
    match read_language_rest(doc, dest) {
        Ok(()) => Ok(dest),
        Err(e) => {
            doc.reader.stack.pop(dest);
            Err(e)
        }
    }
}

fn read_language_rest<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
) -> Result<(), ReadError> {
    loop {
        let c = doc.read.peek_byte();
        if !c.is_ascii_lowercase() {
            break;
        }
        doc.read.eat_byte(c)?;
        doc.reader.stack.push_byte(dest, c);
    }
    while doc.read.peek_byte() == b'-' {
        doc.read.eat_byte(b'-')?;
        doc.reader.stack.push_byte(dest, b'-');
        loop {
            let c = doc.read.peek_byte();
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() {
                break;
            }
            doc.read.eat_byte(c)?;
            doc.reader.stack.push_byte(dest, c);
        }
    }
    Ok(())
}

// [30] nameStartChar ::= [A-Z] | '_' | [a-z]
//    | [#x00C0-#x00D6] | [#x00D8-#x00F6] | [#x00F8-#x02FF] | [#x0370-#x037D]
//    | [#x037F-#x1FFF] | [#x200C-#x200D] | [#x2070-#x218F] | [#x2C00-#x2FEF]
//    | [#x3001-#xD7FF] | [#xF900-#xFDCF] | [#xFDF0-#xFFFD] | [#x10000-#xEFFFF]
fn read_name_start_char<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    required: bool,
) -> Result<Option<u8>, ReadError> {
    // TODO: accept the non-ASCII ranges of the production
    let c = doc.read.peek_byte();
    if c == b'_' || c.is_ascii_alphabetic() {
        doc.read.eat_byte(c)?;
        Ok(Some(c))
    } else if required {
        Err(doc.read.syntax_error(format!(
            "illegal character `{}` at start of name",
            char::from(c).escape_debug()
        )))
    } else {
        Ok(None)
    }
}

// [31] nameChar ::= nameStartChar | '-' | [0-9]
//    | #x00B7 | [#x0300-#x036F] | [#x203F-#x2040]
fn read_name_char<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<Option<u8>, ReadError> {
    if let Some(c) = read_name_start_char(doc, false)? {
        return Ok(Some(c));
    }
    let c = doc.read.peek_byte();
    match c {
        b'-' | 0xB7 | b'0'..=b'9' => {
            doc.read.eat_byte(c)?;
            Ok(Some(c))
        }
        _ => Ok(None),
    }
}

// [32] name ::= nameStartChar nameChar*
fn read_name<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
    required: bool,
) -> Result<bool, ReadError> {
    let c = match read_name_start_char(doc, required)? {
        Some(c) => c,
        None => return Ok(false),
    };
    doc.reader.stack.push_byte(dest, c);
    while let Some(c) = read_name_char(doc)? {
        doc.reader.stack.push_byte(dest, c);
    }
    Ok(true)
}

// [33] prefixName ::= ( nameStartChar - '_' ) nameChar*
fn read_prefix_name<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<Option<StrRef>, ReadError> {
    if doc.read.peek_byte() == b'_' {
        return Err(doc
            .read
            .syntax_error("unexpected `_` at start of prefix name".to_owned()));
    }
    let c = match read_name_start_char(doc, false)? {
        Some(c) => c,
        None => return Ok(None),
    };
    let dest = doc.reader.stack.push_empty();
    doc.reader.stack.push_byte(dest, c);
    loop {
        match read_name_char(doc) {
            Ok(Some(c)) => doc.reader.stack.push_byte(dest, c),
            Ok(None) => return Ok(Some(dest)),
            Err(e) => {
                doc.reader.stack.pop(dest);
                return Err(e);
            }
        }
    }
}

// [35] quotedString ::= string | longString
fn read_quoted_string<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    flags: &mut TermFlags,
) -> Result<StrRef, ReadError> {
    let mut pre = [0_u8; 3];
    doc.read.peek_n(&mut pre)?;
    if pre[1] == b'"' && pre[2] == b'"' {
        read_long_string(doc, flags)
    } else {
        read_string(doc, flags)
    }
}

// [36] string ::= #x22 scharacter* #x22
fn read_string<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    flags: &mut TermFlags,
) -> Result<StrRef, ReadError> {
    doc.read.eat_byte(b'"')?;
    let dest = doc.reader.stack.push_empty();
    let result = (|| {
        while read_scharacter(doc, dest, flags)? {}
        doc.read.eat_byte(b'"')?;
        Ok(())
    })();
    match result {
        Ok(()) => Ok(dest),
        Err(e) => {
            doc.reader.stack.pop(dest);
            Err(e)
        }
    }
}

// [37] longString ::= #x22 #x22 #x22 lcharacter* #x22 #x22 #x22
fn read_long_string<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    flags: &mut TermFlags,
) -> Result<StrRef, ReadError> {
    doc.read.eat_string(b"\"\"\"")?;
    let dest = doc.reader.stack.push_empty();
    loop {
        match read_lcharacter(doc, dest, flags) {
            Ok(true) => (),
            Ok(false) => return Ok(dest),
            Err(e) => {
                doc.reader.stack.pop(dest);
                return Err(e);
            }
        }
    }
}

// [38] character ::= '\u' hex hex hex hex
//    | '\U' hex hex hex hex hex hex hex hex
//    | '\\'
//    | [#x20-#x5B] | [#x5D-#x10FFFF]
fn read_character<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
) -> Result<(), ReadError> {
    // escapes are handled by the callers
    let c = doc.read.peek_byte();
    debug_assert!(c != b'\\');
    if c == 0 {
        Err(doc.read.syntax_error("unexpected end of file".to_owned()))
    } else if c < 0x20 {
        Err(doc
            .read
            .syntax_error("unexpected control character".to_owned()))
    } else if c <= 0x7E {
        doc.read.eat_byte(c)?;
        doc.reader.stack.push_byte(dest, c);
        Ok(())
    } else {
        // the length of a wide character is the number of leading 1 bits
        // of its first byte; continuation bytes are taken as they come
        let size = if c & 0xE0 == 0xC0 {
            2
        } else if c & 0xF0 == 0xE0 {
            3
        } else if c & 0xF8 == 0xF0 {
            4
        } else {
            return Err(doc.read.syntax_error("invalid character".to_owned()));
        };
        for _ in 0..size {
            let c = doc.read.peek_byte();
            doc.read.eat_byte(c)?;
            doc.reader.stack.push_byte(dest, c);
        }
        Ok(())
    }
}

// [42] scharacter ::= ( echaracter - #x22 ) | '\"'
fn read_scharacter<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
    flags: &mut TermFlags,
) -> Result<bool, ReadError> {
    match doc.read.peek_byte() {
        b'\\' => {
            doc.read.eat_byte(b'\\')?;
            if read_scharacter_escape(doc, dest, flags)? {
                Ok(true)
            } else {
                Err(illegal_escape(doc))
            }
        }
        b'"' => Ok(false),
        _ => {
            read_character(doc, dest)?;
            Ok(true)
        }
    }
}

// [43] lcharacter ::= echaracter | '\"' | #x9 | #xA | #xD
fn read_lcharacter<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
    flags: &mut TermFlags,
) -> Result<bool, ReadError> {
    let c = doc.read.peek_byte();
    match c {
        b'"' => {
            // the string ends at exactly three quotes; one or two are body
            let mut pre = [0_u8; 4];
            doc.read.peek_n(&mut pre)?;
            if pre[1] == b'"' && pre[2] == b'"' && pre[3] != b'"' {
                doc.read.eat_string(b"\"\"\"")?;
                Ok(false)
            } else {
                *flags |= TermFlags::HAS_QUOTE;
                doc.read.eat_byte(b'"')?;
                doc.reader.stack.push_byte(dest, b'"');
                Ok(true)
            }
        }
        b'\\' => {
            doc.read.eat_byte(b'\\')?;
            if read_scharacter_escape(doc, dest, flags)? {
                Ok(true)
            } else {
                Err(illegal_escape(doc))
            }
        }
        0xA | 0xD => {
            *flags |= TermFlags::HAS_NEWLINE;
            doc.read.eat_byte(c)?;
            doc.reader.stack.push_byte(dest, c);
            Ok(true)
        }
        0x9 => {
            doc.read.eat_byte(c)?;
            doc.reader.stack.push_byte(dest, c);
            Ok(true)
        }
        _ => {
            read_character(doc, dest)?;
            Ok(true)
        }
    }
}

// Spec: [41] ucharacter ::= ( character - #x3E ) | '\>'
// Impl: [41] ucharacter ::= ( echaracter - #x3E ) | '\>'
fn read_ucharacter<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
) -> Result<bool, ReadError> {
    match doc.read.peek_byte() {
        b'\\' => {
            doc.read.eat_byte(b'\\')?;
            if read_ucharacter_escape(doc, dest)? {
                Ok(true)
            } else {
                Err(illegal_escape(doc))
            }
        }
        b'>' => Ok(false),
        _ => {
            read_character(doc, dest)?;
            Ok(true)
        }
    }
}

fn illegal_escape<S: ReadSink, B: ByteSource>(doc: &DocReader<'_, S, B>) -> ReadError {
    doc.read.syntax_error(format!(
        "illegal escape `\\{}`",
        char::from(doc.read.peek_byte()).escape_debug()
    ))
}

fn read_character_escape<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
) -> Result<bool, ReadError> {
    match doc.read.peek_byte() {
        b'\\' => {
            doc.read.eat_byte(b'\\')?;
            doc.reader.stack.push_byte(dest, b'\\');
            Ok(true)
        }
        b'u' => {
            doc.read.eat_byte(b'u')?;
            read_hex_escape(doc, 4, dest)?;
            Ok(true)
        }
        b'U' => {
            doc.read.eat_byte(b'U')?;
            read_hex_escape(doc, 8, dest)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn read_echaracter_escape<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
    flags: &mut TermFlags,
) -> Result<bool, ReadError> {
    match doc.read.peek_byte() {
        b't' => {
            doc.read.eat_byte(b't')?;
            doc.reader.stack.push_byte(dest, b'\t');
            Ok(true)
        }
        b'n' => {
            *flags |= TermFlags::HAS_NEWLINE;
            doc.read.eat_byte(b'n')?;
            doc.reader.stack.push_byte(dest, b'\n');
            Ok(true)
        }
        b'r' => {
            *flags |= TermFlags::HAS_NEWLINE;
            doc.read.eat_byte(b'r')?;
            doc.reader.stack.push_byte(dest, b'\r');
            Ok(true)
        }
        _ => read_character_escape(doc, dest),
    }
}

fn read_scharacter_escape<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
    flags: &mut TermFlags,
) -> Result<bool, ReadError> {
    match doc.read.peek_byte() {
        b'"' => {
            *flags |= TermFlags::HAS_QUOTE;
            doc.read.eat_byte(b'"')?;
            doc.reader.stack.push_byte(dest, b'"');
            Ok(true)
        }
        _ => read_echaracter_escape(doc, dest, flags),
    }
}

fn read_ucharacter_escape<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    dest: StrRef,
) -> Result<bool, ReadError> {
    match doc.read.peek_byte() {
        b'>' => {
            doc.read.eat_byte(b'>')?;
            doc.reader.stack.push_byte(dest, b'>');
            Ok(true)
        }
        _ => {
            let mut flags = TermFlags::NONE;
            read_echaracter_escape(doc, dest, &mut flags)
        }
    }
}

// [40] hex ::= [#x30-#x39] | [#x41-#x46]
fn read_hex<S: ReadSink, B: ByteSource>(doc: &mut DocReader<'_, S, B>) -> Result<u8, ReadError> {
    let c = doc.read.peek_byte();
    if c.is_ascii_digit() || (b'A'..=b'F').contains(&c) {
        doc.read.eat_byte(c)
    } else {
        Err(doc.read.syntax_error(format!(
            "illegal hexadecimal digit `{}`",
            char::from(c).escape_debug()
        )))
    }
}

fn read_hex_escape<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    length: usize,
    dest: StrRef,
) -> Result<(), ReadError> {
    let mut code_point: u32 = 0;
    for _ in 0..length {
        let c = read_hex(doc)?;
        let digit = if c.is_ascii_digit() { c - b'0' } else { c - b'A' + 10 };
        code_point = code_point * 16 + u32::from(digit);
    }

    let size = if code_point < 0x80 {
        1
    } else if code_point < 0x800 {
        2
    } else if code_point < 0x1_0000 {
        3
    } else if code_point < 0x20_0000 {
        4
    } else {
        return Err(doc.read.syntax_error(format!(
            "escaped code point {:#X} is out of range",
            code_point
        )));
    };

    // canonical UTF-8 bit patterns, 1 to 4 bytes
    let mut bytes = [0_u8; 4];
    match size {
        1 => bytes[0] = code_point as u8,
        2 => {
            bytes[0] = 0xC0 | (code_point >> 6) as u8;
            bytes[1] = 0x80 | (code_point & 0x3F) as u8;
        }
        3 => {
            bytes[0] = 0xE0 | (code_point >> 12) as u8;
            bytes[1] = 0x80 | ((code_point >> 6) & 0x3F) as u8;
            bytes[2] = 0x80 | (code_point & 0x3F) as u8;
        }
        _ => {
            bytes[0] = 0xF0 | (code_point >> 18) as u8;
            bytes[1] = 0x80 | ((code_point >> 12) & 0x3F) as u8;
            bytes[2] = 0x80 | ((code_point >> 6) & 0x3F) as u8;
            bytes[3] = 0x80 | (code_point & 0x3F) as u8;
        }
    }
    for &b in &bytes[..size] {
        doc.reader.stack.push_byte(dest, b);
    }
    Ok(())
}

// [10] comment ::= '#' ( [^#xA #xD] )*
fn read_comment<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<(), ReadError> {
    doc.read.eat_byte(b'#')?;
    loop {
        match doc.read.peek_byte() {
            0 | 0xA | 0xD => return Ok(()),
            c => {
                doc.read.eat_byte(c)?;
            }
        }
    }
}

// [24] ws ::= #x9 | #xA | #xD | #x20 | comment
fn read_ws<S: ReadSink, B: ByteSource>(doc: &mut DocReader<'_, S, B>) -> Result<bool, ReadError> {
    match doc.read.peek_byte() {
        c @ (0x9 | 0xA | 0xD | 0x20) => {
            doc.read.eat_byte(c)?;
            Ok(true)
        }
        b'#' => {
            read_comment(doc)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn read_ws_star<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<(), ReadError> {
    while read_ws(doc)? {}
    Ok(())
}

fn read_ws_plus<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
) -> Result<(), ReadError> {
    if !read_ws(doc)? {
        return Err(doc.read.syntax_error(format!(
            "expected whitespace, found `{}`",
            char::from(doc.read.peek_byte()).escape_debug()
        )));
    }
    read_ws_star(doc)
}

fn make_term<'a>(
    stack: &'a StringArena,
    node: &Node,
    flags: TermFlags,
) -> Result<Term<'a>, ReadErrorKind> {
    let value = str::from_utf8(stack.bytes(node.value)).map_err(|_| ReadErrorKind::InvalidUtf8)?;
    Ok(Term {
        kind: node.kind,
        value,
        n_chars: stack.n_chars(node.value),
        flags,
    })
}

/// Packages the nodes of one statement and hands it to the sink.
///
/// After the call the one-shot flags are gone; only `ANON_CONT` survives.
fn emit_statement<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    flags: &mut StatementFlags,
    ctx: ReadContext,
    object: &Node,
    datatype: Option<&Node>,
    lang: Option<StrRef>,
    term_flags: TermFlags,
) -> Result<(), ReadError> {
    let reader = &mut *doc.reader;
    let read = &doc.read;
    let stack = &reader.stack;
    let term = |node: &Node, flags: TermFlags| {
        make_term(stack, node, flags).map_err(|kind| read.error(kind))
    };

    let subject = ctx.subject.unwrap();
    let predicate = ctx.predicate.unwrap();
    let statement = Statement {
        flags: *flags,
        graph: match &ctx.graph {
            Some(graph) => Some(term(graph, TermFlags::NONE)?),
            None => None,
        },
        subject: term(&subject, TermFlags::NONE)?,
        predicate: term(&predicate, TermFlags::NONE)?,
        object: term(object, term_flags)?,
        object_datatype: match datatype {
            Some(datatype) => Some(term(datatype, TermFlags::NONE)?),
            None => None,
        },
        object_lang: match lang {
            Some(lang) => Some(term(
                &Node {
                    kind: TermKind::Literal,
                    value: lang,
                },
                TermFlags::NONE,
            )?),
            None => None,
        },
    };
    let result = reader.sink.statement(&statement);
    *flags = flags.intersect(StatementFlags::ANON_CONT);
    result.map_err(|_| read.error(ReadErrorKind::Cancelled))
}

fn sink_base<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    uri: StrRef,
) -> Result<(), ReadError> {
    let reader = &mut *doc.reader;
    let read = &doc.read;
    let node = Node {
        kind: TermKind::Uri,
        value: uri,
    };
    let term = make_term(&reader.stack, &node, TermFlags::NONE).map_err(|kind| read.error(kind))?;
    reader
        .sink
        .base(&term)
        .map_err(|_| read.error(ReadErrorKind::Cancelled))
}

fn sink_prefix<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    name: StrRef,
    uri: StrRef,
) -> Result<(), ReadError> {
    let reader = &mut *doc.reader;
    let read = &doc.read;
    let name_node = Node {
        kind: TermKind::Literal,
        value: name,
    };
    let uri_node = Node {
        kind: TermKind::Uri,
        value: uri,
    };
    let name_term =
        make_term(&reader.stack, &name_node, TermFlags::NONE).map_err(|kind| read.error(kind))?;
    let uri_term =
        make_term(&reader.stack, &uri_node, TermFlags::NONE).map_err(|kind| read.error(kind))?;
    reader
        .sink
        .prefix(&name_term, &uri_term)
        .map_err(|_| read.error(ReadErrorKind::Cancelled))
}

fn sink_end<S: ReadSink, B: ByteSource>(
    doc: &mut DocReader<'_, S, B>,
    node: &Node,
) -> Result<(), ReadError> {
    let reader = &mut *doc.reader;
    let read = &doc.read;
    let term = make_term(&reader.stack, node, TermFlags::NONE).map_err(|kind| read.error(kind))?;
    reader
        .sink
        .end(&term)
        .map_err(|_| read.error(ReadErrorKind::Cancelled))
}
