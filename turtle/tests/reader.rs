use brook_api::model::{Statement, StatementFlags, Term, TermFlags, TermKind};
use brook_api::sink::{Cancelled, ReadSink};
use brook_turtle::{ReadErrorKind, Reader, Syntax};

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// One record per sink call, with every borrowed string copied out.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Base(String),
    Prefix(String, String),
    Statement {
        flags: StatementFlags,
        subject: (TermKind, String),
        predicate: (TermKind, String),
        object: (TermKind, String),
        object_chars: usize,
        object_flags: TermFlags,
        datatype: Option<String>,
        lang: Option<String>,
    },
    End(String),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
    statements: usize,
    stop_after: Option<usize>,
    cancel_on_base: bool,
}

impl ReadSink for Recorder {
    fn base(&mut self, uri: &Term<'_>) -> Result<(), Cancelled> {
        self.events.push(Event::Base(uri.value.to_owned()));
        if self.cancel_on_base {
            return Err(Cancelled);
        }
        Ok(())
    }

    fn prefix(&mut self, name: &Term<'_>, uri: &Term<'_>) -> Result<(), Cancelled> {
        self.events
            .push(Event::Prefix(name.value.to_owned(), uri.value.to_owned()));
        Ok(())
    }

    fn statement(&mut self, statement: &Statement<'_>) -> Result<(), Cancelled> {
        assert!(statement.graph.is_none());
        assert!(!statement.subject.value.is_empty());
        assert!(!statement.predicate.value.is_empty());
        assert!(statement.object_datatype.is_none() || statement.object_lang.is_none());
        self.events.push(Event::Statement {
            flags: statement.flags,
            subject: (statement.subject.kind, statement.subject.value.to_owned()),
            predicate: (statement.predicate.kind, statement.predicate.value.to_owned()),
            object: (statement.object.kind, statement.object.value.to_owned()),
            object_chars: statement.object.n_chars,
            object_flags: statement.object.flags,
            datatype: statement.object_datatype.map(|d| d.value.to_owned()),
            lang: statement.object_lang.map(|l| l.value.to_owned()),
        });
        self.statements += 1;
        if self.stop_after == Some(self.statements) {
            return Err(Cancelled);
        }
        Ok(())
    }

    fn end(&mut self, node: &Term<'_>) -> Result<(), Cancelled> {
        assert_eq!(TermKind::Blank, node.kind);
        self.events.push(Event::End(node.value.to_owned()));
        Ok(())
    }
}

fn uri(value: &str) -> (TermKind, String) {
    (TermKind::Uri, value.to_owned())
}

fn curie(value: &str) -> (TermKind, String) {
    (TermKind::Curie, value.to_owned())
}

fn blank(value: &str) -> (TermKind, String) {
    (TermKind::Blank, value.to_owned())
}

fn literal(value: &str) -> (TermKind, String) {
    (TermKind::Literal, value.to_owned())
}

fn statement(
    subject: (TermKind, String),
    predicate: (TermKind, String),
    object: (TermKind, String),
) -> Event {
    let object_chars = object.1.chars().count();
    Event::Statement {
        flags: StatementFlags::NONE,
        subject,
        predicate,
        object,
        object_chars,
        object_flags: TermFlags::NONE,
        datatype: None,
        lang: None,
    }
}

fn with_flags(mut event: Event, value: StatementFlags) -> Event {
    if let Event::Statement { flags, .. } = &mut event {
        *flags = value;
    }
    event
}

fn with_datatype(mut event: Event, value: &str) -> Event {
    if let Event::Statement { datatype, .. } = &mut event {
        *datatype = Some(value.to_owned());
    }
    event
}

fn with_lang(mut event: Event, value: &str) -> Event {
    if let Event::Statement { lang, .. } = &mut event {
        *lang = Some(value.to_owned());
    }
    event
}

fn with_object_flags(mut event: Event, value: TermFlags) -> Event {
    if let Event::Statement { object_flags, .. } = &mut event {
        *object_flags = value;
    }
    event
}

fn read_turtle(input: &str) -> Vec<Event> {
    let mut reader = Reader::new(Syntax::Turtle, Recorder::default());
    reader.read_string(input).unwrap();
    reader.into_sink().events
}

fn read_turtle_err(input: &str) -> brook_turtle::ReadError {
    let mut reader = Reader::new(Syntax::Turtle, Recorder::default());
    reader.read_string(input).unwrap_err()
}

#[test]
fn single_triple() {
    assert_eq!(
        vec![statement(
            uri("http://example.com/s"),
            uri("http://example.com/p"),
            uri("http://example.com/o"),
        )],
        read_turtle("<http://example.com/s> <http://example.com/p> <http://example.com/o> .")
    );
}

#[test]
fn a_is_rdf_type() {
    assert_eq!(
        vec![statement(uri("x"), uri(RDF_TYPE), uri("T"))],
        read_turtle("<x> a <T> .")
    );
}

#[test]
fn a_prefixed_name_is_not_the_a_keyword() {
    assert_eq!(
        vec![statement(uri("x"), curie("a:b"), uri("y"))],
        read_turtle("<x> a:b <y> .")
    );
}

#[test]
fn directives_are_delivered_in_order() {
    assert_eq!(
        vec![
            Event::Prefix("ex".to_owned(), "http://example.com/".to_owned()),
            Event::Base("http://example.org/base".to_owned()),
            statement(curie("ex:s"), curie("ex:p"), curie("ex:o")),
        ],
        read_turtle(
            "@prefix ex: <http://example.com/> .\n\
             @base <http://example.org/base> .\n\
             ex:s ex:p ex:o .",
        )
    );
}

#[test]
fn empty_prefix_name() {
    assert_eq!(
        vec![
            Event::Prefix(String::new(), "http://example.com/".to_owned()),
            statement(curie(":s"), curie(":p"), curie(":o")),
        ],
        read_turtle("@prefix : <http://example.com/> .\n:s :p :o .")
    );
}

#[test]
fn predicate_object_lists_fan_out() {
    assert_eq!(
        vec![
            statement(uri("s"), uri("p"), uri("a")),
            statement(uri("s"), uri("p"), uri("b")),
            statement(uri("s"), uri("q"), uri("c")),
        ],
        read_turtle("<s> <p> <a>, <b> ; <q> <c> .")
    );
}

#[test]
fn stray_and_trailing_semicolons_are_tolerated() {
    assert_eq!(
        vec![
            statement(uri("a"), uri("b"), uri("c")),
            statement(uri("a"), uri("d"), uri("e")),
        ],
        read_turtle("<a> <b> <c> ; ; <d> <e> ; .")
    );
}

#[test]
fn comments_are_whitespace() {
    assert_eq!(
        vec![statement(uri("s"), uri("p"), uri("o"))],
        read_turtle("# leading comment\n<s> # subject\n<p> <o> # object\n .")
    );
}

#[test]
fn numeric_literals_infer_their_datatype() {
    assert_eq!(
        vec![
            with_datatype(statement(uri("a"), uri("b"), literal("1")), XSD_INTEGER),
            with_datatype(statement(uri("a"), uri("b"), literal("1.0")), XSD_DECIMAL),
            with_datatype(statement(uri("a"), uri("b"), literal("1e0")), XSD_DOUBLE),
        ],
        read_turtle("<a> <b> 1, 1.0, 1e0 .")
    );
}

#[test]
fn signed_and_fractional_numbers() {
    assert_eq!(
        vec![
            with_datatype(statement(uri("a"), uri("b"), literal("-4")), XSD_INTEGER),
            with_datatype(statement(uri("a"), uri("b"), literal("+.5")), XSD_DECIMAL),
            with_datatype(
                statement(uri("a"), uri("b"), literal("-1.2e-3")),
                XSD_DOUBLE,
            ),
        ],
        read_turtle("<a> <b> -4, +.5, -1.2e-3 .")
    );
}

#[test]
fn exponent_requires_digits() {
    let error = read_turtle_err("<a> <b> 1e .");
    assert!(matches!(error.kind(), ReadErrorKind::BadSyntax(_)));
}

#[test]
fn boolean_literals() {
    assert_eq!(
        vec![
            with_datatype(statement(uri("a"), uri("b"), literal("true")), XSD_BOOLEAN),
            with_datatype(statement(uri("a"), uri("b"), literal("false")), XSD_BOOLEAN),
        ],
        read_turtle("<a> <b> true, false .")
    );
}

#[test]
fn boolean_lookalikes_are_prefixed_names() {
    assert_eq!(
        vec![statement(uri("a"), uri("b"), curie("truthy:x"))],
        read_turtle("<a> <b> truthy:x .")
    );
}

#[test]
fn quoted_literal_with_language() {
    assert_eq!(
        vec![
            with_lang(statement(uri("a"), uri("b"), literal("chat")), "fr"),
            with_lang(statement(uri("a"), uri("b"), literal("chat")), "en-us"),
        ],
        read_turtle("<a> <b> \"chat\"@fr, \"chat\"@en-us .")
    );
}

#[test]
fn quoted_literal_with_datatype() {
    assert_eq!(
        vec![
            with_datatype(statement(uri("a"), uri("b"), literal("1")), XSD_INTEGER),
            statement(uri("a"), uri("b"), literal("plain")),
        ],
        read_turtle(&format!("<a> <b> \"1\"^^<{XSD_INTEGER}>, \"plain\" ."))
    );
}

#[test]
fn datatype_can_be_a_prefixed_name() {
    let events = read_turtle("@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n<a> <b> \"1\"^^xsd:integer .");
    assert_eq!(
        Event::Prefix(
            "xsd".to_owned(),
            "http://www.w3.org/2001/XMLSchema#".to_owned()
        ),
        events[0]
    );
    match &events[1] {
        Event::Statement { datatype, .. } => {
            assert_eq!(Some("xsd:integer".to_owned()), *datatype);
        }
        other => panic!("expected a statement, got {:?}", other),
    }
}

#[test]
fn string_escapes() {
    assert_eq!(
        vec![
            with_object_flags(
                statement(uri("a"), uri("b"), literal("a\tb\\c\"d")),
                TermFlags::HAS_QUOTE,
            ),
            with_object_flags(
                statement(uri("a"), uri("b"), literal("x\ny")),
                TermFlags::HAS_NEWLINE,
            ),
        ],
        read_turtle("<a> <b> \"a\\tb\\\\c\\\"d\", \"x\\ny\" .")
    );
}

#[test]
fn unicode_escapes_become_utf8() {
    let events = read_turtle("<x> <p> \"\\u00E9\" .");
    match &events[0] {
        Event::Statement {
            object,
            object_chars,
            ..
        } => {
            assert_eq!("é", object.1);
            assert_eq!(2, object.1.len());
            assert_eq!(1, *object_chars);
        }
        other => panic!("expected a statement, got {:?}", other),
    }

    assert_eq!(
        vec![statement(uri("x"), uri("p"), literal("🎉"))],
        read_turtle("<x> <p> \"\\U0001F389\" .")
    );
}

#[test]
fn lowercase_hex_digits_are_rejected() {
    let error = read_turtle_err("<x> <p> \"\\u00e9\" .");
    assert!(matches!(error.kind(), ReadErrorKind::BadSyntax(_)));
}

#[test]
fn long_string_keeps_inner_quotes() {
    assert_eq!(
        vec![with_object_flags(
            statement(uri("x"), uri("p"), literal("a\"\"b")),
            TermFlags::HAS_QUOTE,
        )],
        read_turtle("<x> <p> \"\"\"a\"\"b\"\"\" .")
    );
}

#[test]
fn long_string_accepts_raw_newlines() {
    assert_eq!(
        vec![with_object_flags(
            statement(uri("x"), uri("p"), literal("line1\nline2")),
            TermFlags::HAS_NEWLINE,
        )],
        read_turtle("<x> <p> \"\"\"line1\nline2\"\"\" .")
    );
}

#[test]
fn short_string_rejects_raw_newlines() {
    let error = read_turtle_err("<a> <b> \"a\nb\" .");
    assert!(matches!(error.kind(), ReadErrorKind::BadSyntax(_)));
}

#[test]
fn escaped_uri_closing_bracket() {
    assert_eq!(
        vec![statement(uri("s"), uri("p"), uri("o>dd"))],
        read_turtle("<s> <p> <o\\>dd> .")
    );
}

#[test]
fn empty_collection_is_rdf_nil() {
    assert_eq!(
        vec![statement(uri("a"), uri("b"), uri(RDF_NIL))],
        read_turtle("<a> <b> () .")
    );
}

#[test]
fn two_element_collection() {
    assert_eq!(
        vec![
            statement(uri("a"), uri("b"), blank("genid1")),
            statement(blank("genid1"), uri(RDF_FIRST), uri("c")),
            statement(blank("genid1"), uri(RDF_REST), blank("genid2")),
            statement(blank("genid2"), uri(RDF_FIRST), uri("d")),
            statement(blank("genid2"), uri(RDF_REST), uri(RDF_NIL)),
        ],
        read_turtle("<a> <b> (<c> <d>) .")
    );
}

#[test]
fn single_element_collection() {
    assert_eq!(
        vec![
            statement(uri("a"), uri("b"), blank("genid1")),
            statement(blank("genid1"), uri(RDF_FIRST), uri("c")),
            statement(blank("genid1"), uri(RDF_REST), uri(RDF_NIL)),
        ],
        read_turtle("<a> <b> (<c>) .")
    );
}

#[test]
fn collection_as_subject() {
    assert_eq!(
        vec![
            statement(blank("genid1"), uri(RDF_FIRST), uri("c")),
            statement(blank("genid1"), uri(RDF_REST), uri(RDF_NIL)),
            statement(blank("genid1"), uri("p"), uri("o")),
        ],
        read_turtle("(<c>) <p> <o> .")
    );
}

#[test]
fn named_blank_nodes() {
    assert_eq!(
        vec![statement(blank("a"), uri("p"), blank("b"))],
        read_turtle("_:a <p> _:b .")
    );
}

#[test]
fn genid_labels_are_rewritten_in_turtle() {
    assert_eq!(
        vec![statement(blank("docid1"), uri("p"), blank("other"))],
        read_turtle("_:genid1 <p> _:other .")
    );
}

#[test]
fn genid_labels_are_kept_in_ntriples() {
    let mut reader = Reader::new(Syntax::NTriples, Recorder::default());
    reader.read_string("_:genid1 <http://example.com/p> <http://example.com/o> .").unwrap();
    assert_eq!(
        vec![statement(
            blank("genid1"),
            uri("http://example.com/p"),
            uri("http://example.com/o"),
        )],
        reader.into_sink().events
    );
}

#[test]
fn empty_blank_object() {
    assert_eq!(
        vec![with_flags(
            statement(uri("x"), uri("p"), blank("genid1")),
            StatementFlags::EMPTY_O,
        )],
        read_turtle("<x> <p> [] .")
    );
}

#[test]
fn empty_blank_subject() {
    assert_eq!(
        vec![with_flags(
            statement(blank("genid1"), uri("p"), uri("o")),
            StatementFlags::EMPTY_S,
        )],
        read_turtle("[] <p> <o> .")
    );
}

#[test]
fn anonymous_object_scope() {
    assert_eq!(
        vec![
            with_flags(
                statement(uri("x"), uri("p"), blank("genid1")),
                StatementFlags::ANON_O_BEGIN,
            ),
            with_flags(
                statement(blank("genid1"), uri("q"), uri("y")),
                StatementFlags::ANON_CONT,
            ),
            Event::End("genid1".to_owned()),
        ],
        read_turtle("<x> <p> [ <q> <y> ] .")
    );
}

#[test]
fn anonymous_subject_scope() {
    assert_eq!(
        vec![
            with_flags(
                statement(blank("genid1"), uri("q"), uri("y")),
                StatementFlags::ANON_S_BEGIN,
            ),
            Event::End("genid1".to_owned()),
            statement(blank("genid1"), uri("p"), uri("o")),
        ],
        read_turtle("[ <q> <y> ] <p> <o> .")
    );
}

#[test]
fn nested_anonymous_scopes() {
    assert_eq!(
        vec![
            with_flags(
                statement(uri("x"), uri("p"), blank("genid1")),
                StatementFlags::ANON_O_BEGIN,
            ),
            with_flags(
                statement(blank("genid1"), uri("q"), blank("genid2")),
                StatementFlags::ANON_CONT | StatementFlags::ANON_O_BEGIN,
            ),
            with_flags(
                statement(blank("genid2"), uri("r"), uri("z")),
                StatementFlags::ANON_CONT,
            ),
            Event::End("genid2".to_owned()),
            statement(blank("genid1"), uri("s"), uri("t")),
            Event::End("genid1".to_owned()),
        ],
        read_turtle("<x> <p> [ <q> [ <r> <z> ] ; <s> <t> ] .")
    );
}

#[test]
fn minted_labels_stay_unique_across_documents() {
    let mut reader = Reader::new(Syntax::Turtle, Recorder::default());
    reader.read_string("<x> <p> [] .").unwrap();
    reader.read_string("<y> <q> [] .").unwrap();
    assert_eq!(
        vec![
            with_flags(
                statement(uri("x"), uri("p"), blank("genid1")),
                StatementFlags::EMPTY_O,
            ),
            with_flags(
                statement(uri("y"), uri("q"), blank("genid2")),
                StatementFlags::EMPTY_O,
            ),
        ],
        reader.into_sink().events
    );
}

#[test]
fn blank_prefix_is_prepended_to_minted_labels() {
    let mut reader = Reader::new(Syntax::Turtle, Recorder::default());
    reader.set_blank_prefix(Some("d0"));
    reader.read_string("<x> <p> [] .").unwrap();
    assert_eq!(
        vec![with_flags(
            statement(uri("x"), uri("p"), blank("d0genid1")),
            StatementFlags::EMPTY_O,
        )],
        reader.into_sink().events
    );
}

#[test]
fn ntriples_reads_the_same_statements_as_turtle() {
    let input = "<http://example.com/s> <http://example.com/p> \"o\" .\n\
                 <http://example.com/s> <http://example.com/q> _:b .\n";
    let mut turtle = Reader::new(Syntax::Turtle, Recorder::default());
    turtle.read_string(input).unwrap();
    let mut ntriples = Reader::new(Syntax::NTriples, Recorder::default());
    ntriples.read_string(input).unwrap();
    assert_eq!(turtle.into_sink().events, ntriples.into_sink().events);
}

#[test]
fn syntax_errors_locate_the_offending_byte() {
    let error = read_turtle_err("<a> <b> %");
    assert!(matches!(error.kind(), ReadErrorKind::BadSyntax(_)));
    assert_eq!("(string)", error.document());
    assert_eq!((1, 10), error.position());

    let error = read_turtle_err("\n\n<a> <b> ^ .");
    assert_eq!(3, error.position().0);
}

#[test]
fn truncated_documents_fail() {
    assert!(matches!(
        read_turtle_err("<a> <b> <c>").kind(),
        ReadErrorKind::BadSyntax(_)
    ));
    assert!(matches!(
        read_turtle_err("<a> <b> \"unterminated").kind(),
        ReadErrorKind::BadSyntax(_)
    ));
    assert!(matches!(
        read_turtle_err("<a> <b> (<c>").kind(),
        ReadErrorKind::BadSyntax(_)
    ));
}

#[test]
fn control_characters_are_rejected() {
    let error = read_turtle_err("<a> <b> \"a\u{1}b\" .");
    assert!(matches!(error.kind(), ReadErrorKind::BadSyntax(_)));
}

#[test]
fn sink_can_cancel_statements() {
    let mut reader = Reader::new(
        Syntax::Turtle,
        Recorder {
            stop_after: Some(1),
            ..Recorder::default()
        },
    );
    let error = reader
        .read_string("<a> <b> <c> .\n<d> <e> <f> .")
        .unwrap_err();
    assert!(matches!(error.kind(), ReadErrorKind::Cancelled));
    assert_eq!(1, reader.sink().statements);
}

#[test]
fn sink_can_cancel_directives() {
    let mut reader = Reader::new(
        Syntax::Turtle,
        Recorder {
            cancel_on_base: true,
            ..Recorder::default()
        },
    );
    let error = reader.read_string("@base <http://example.com/> .").unwrap_err();
    assert!(matches!(error.kind(), ReadErrorKind::Cancelled));
}

#[test]
fn a_reader_survives_a_failed_document() {
    let mut reader = Reader::new(Syntax::Turtle, Recorder::default());
    assert!(reader.read_string("<a> <b> [ <c> ").is_err());
    reader.read_string("<a> <b> <c> .").unwrap();
    assert_eq!(
        &statement(uri("a"), uri("b"), uri("c")),
        reader.sink().events.last().unwrap()
    );
}

#[test]
fn documents_larger_than_one_page() {
    let mut input = String::new();
    for i in 0..300 {
        input.push_str(&format!(
            "<http://example.com/s{i}> <http://example.com/p> \"value {i}\" .\n"
        ));
    }
    assert!(input.len() > 2 * 4096);
    assert_eq!(300, read_turtle(&input).len());
}

#[test]
fn tokens_may_span_page_boundaries() {
    let body = "x".repeat(5000);
    let events = read_turtle(&format!("<s> <p> \"{body}\" ."));
    assert_eq!(vec![statement(uri("s"), uri("p"), literal(&body))], events);
}

#[test]
fn read_file_accepts_file_uris() {
    let path = std::env::temp_dir().join("brook_reader_test.ttl");
    std::fs::write(
        &path,
        "<http://example.com/s> <http://example.com/p> <http://example.com/o> .",
    )
    .unwrap();
    let mut reader = Reader::new(Syntax::Turtle, Recorder::default());
    reader
        .read_file(&format!("file://{}", path.display()))
        .unwrap();
    assert_eq!(1, reader.sink().statements);
    std::fs::remove_file(&path).ok();
}

#[test]
fn read_file_rejects_other_schemes() {
    let mut reader = Reader::new(Syntax::Turtle, Recorder::default());
    let error = reader.read_file("http://example.com/data.ttl").unwrap_err();
    assert!(matches!(error.kind(), ReadErrorKind::BadArg(_)));
}

#[test]
fn read_file_reports_missing_files() {
    let mut reader = Reader::new(Syntax::Turtle, Recorder::default());
    let error = reader
        .read_file("file:///dev/null/definitely/not/here.ttl")
        .unwrap_err();
    assert!(matches!(error.kind(), ReadErrorKind::Io(_)));
}
