//! Utilities to split, resolve and write URI references following
//! [RFC 3986](https://www.ietf.org/rfc/rfc3986).
//!
//! Example:
//! ```
//! use brook_api::uri::Uri;
//!
//! let base = Uri::parse("http://example.com/bar/baz");
//! let reference = Uri::parse("bat#foo");
//!
//! let mut out = Vec::new();
//! reference.resolve(&base).serialise(&mut out).unwrap();
//! assert_eq!(b"http://example.com/bar/bat#foo", out.as_slice());
//! ```

use std::io;
use std::io::Write;

/// A URI reference split into its RFC 3986 components.
///
/// Each component borrows from the string the reference was parsed from.
/// `path_base` is only produced by [`resolve`](Uri::resolve): it carries the
/// base path that must be merged in front of a relative `path`, and the
/// merge itself (including dot-segment removal) is deferred to
/// [`serialise`](Uri::serialise).
///
/// `fragment` includes its leading `#`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Hash)]
pub struct Uri<'a> {
    pub scheme: Option<&'a str>,
    pub authority: Option<&'a str>,
    pub path_base: Option<&'a str>,
    pub path: Option<&'a str>,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
    /// Set by [`resolve`](Uri::resolve): the base URI had an authority.
    pub base_uri_has_authority: bool,
}

impl<'a> Uri<'a> {
    /// Splits a URI reference into its components following RFC 3986 §3.
    ///
    /// Splitting never fails: input that does not start with a scheme is a
    /// relative reference and starts with its path. No validation of the
    /// component characters is performed.
    pub fn parse(input: &'a str) -> Self {
        let bytes = input.as_bytes();
        let mut uri = Self::default();
        let mut i = 0;

        // §3.1: scheme ::= ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
        if bytes.first().map_or(false, u8::is_ascii_alphabetic) {
            let mut j = 1;
            while let Some(&c) = bytes.get(j) {
                match c {
                    b'/' | b'?' | b'#' => break,
                    b':' => {
                        uri.scheme = Some(&input[..j]);
                        i = j + 1;
                        break;
                    }
                    _ => j += 1,
                }
            }
        }

        // §3.2: the authority is preceded by "//" and terminated by the next
        // `/`, `?` or `#`, or by the end of the URI
        if bytes.get(i) == Some(&b'/') && bytes.get(i + 1) == Some(&b'/') {
            i += 2;
            let start = i;
            while let Some(&c) = bytes.get(i) {
                if matches!(c, b'/' | b'?' | b'#') {
                    break;
                }
                i += 1;
            }
            uri.authority = Some(&input[start..i]);
        }

        // §3.3: the path is terminated by the first `?` or `#`, or by the
        // end of the URI
        if let Some(&c) = bytes.get(i) {
            if c != b'?' && c != b'#' {
                let start = i;
                while let Some(&c) = bytes.get(i) {
                    if c == b'?' || c == b'#' {
                        break;
                    }
                    i += 1;
                }
                uri.path = Some(&input[start..i]);
            }
        }

        // §3.4: the query runs from after `?` to `#` or the end of the URI
        if bytes.get(i) == Some(&b'?') {
            i += 1;
            let start = i;
            while let Some(&c) = bytes.get(i) {
                if c == b'#' {
                    break;
                }
                i += 1;
            }
            uri.query = Some(&input[start..i]);
        }

        // §3.5: the fragment runs to the end of the URI, `#` included
        if bytes.get(i) == Some(&b'#') {
            uri.fragment = Some(&input[i..]);
        }

        uri
    }

    /// Resolves `self` against `base` following RFC 3986 §5.2.2.
    ///
    /// Path merging is not performed here: the target carries the base path
    /// in `path_base` and the reference path in `path`, and
    /// [`serialise`](Uri::serialise) merges them while removing dot
    /// segments.
    pub fn resolve(&self, base: &Uri<'a>) -> Uri<'a> {
        let mut target = Uri::default();
        if self.scheme.is_some() {
            target = *self;
            target.path_base = None;
        } else {
            if self.authority.is_some() {
                target.authority = self.authority;
                target.path = self.path;
                target.query = self.query;
            } else {
                target.path = self.path;
                match self.path {
                    None => {
                        target.path_base = base.path;
                        target.query = if self.query.is_some() {
                            self.query
                        } else {
                            base.query
                        };
                    }
                    Some(path) => {
                        if !path.starts_with('/') {
                            target.path_base = base.path;
                        }
                        target.query = self.query;
                    }
                }
                target.authority = base.authority;
            }
            target.scheme = base.scheme;
            target.fragment = self.fragment;
        }
        target.base_uri_has_authority = base.authority.is_some();
        target
    }

    /// Writes the URI to `sink` following RFC 3986 §5.3, merging `path_base`
    /// and `path` with dot-segment removal (§5.2.3 and §5.2.4) on the fly.
    ///
    /// Returns the number of bytes written.
    pub fn serialise<W: Write>(&self, sink: &mut W) -> io::Result<usize> {
        let mut written = 0;

        if let Some(scheme) = self.scheme {
            put(sink, scheme.as_bytes(), &mut written)?;
            put(sink, b":", &mut written)?;
        }
        if let Some(authority) = self.authority {
            put(sink, b"//", &mut written)?;
            put(sink, authority.as_bytes(), &mut written)?;
        }

        match self.path_base {
            Some(base) if !base.is_empty() => match self.path {
                None => {
                    // A reference that was just a query or fragment keeps
                    // the base path unchanged.
                    if self.query.is_some() || self.fragment.is_some() {
                        put(sink, base.as_bytes(), &mut written)?;
                    }
                }
                Some(path) => {
                    let path = path.as_bytes();
                    let base = base.as_bytes();

                    // Skip the leading dot segments of the reference path,
                    // counting one `up` per "..". A leading "//" collapses
                    // to "/".
                    let mut begin = 0;
                    let mut up = 1usize;
                    loop {
                        match (path.get(begin).copied(), path.get(begin + 1).copied()) {
                            (Some(b'.'), Some(b'/')) => begin += 2,
                            (Some(b'.'), None) => begin += 1,
                            (Some(b'.'), Some(b'.')) => match path.get(begin + 2).copied() {
                                Some(b'/') => {
                                    up += 1;
                                    begin += 3;
                                }
                                None => {
                                    up += 1;
                                    begin += 2;
                                }
                                _ => break,
                            },
                            (Some(b'/'), Some(b'/')) => begin += 1,
                            _ => break,
                        }
                    }

                    // Walk back through the base path to the up'th last
                    // slash and write the base up to and including it.
                    let mut last = base.len() - 1;
                    loop {
                        if base[last] == b'/' {
                            up -= 1;
                            if up == 0 {
                                break;
                            }
                        }
                        if last == 0 {
                            break;
                        }
                        last -= 1;
                    }
                    put(sink, &base[..=last], &mut written)?;
                    put(sink, &path[begin..], &mut written)?;
                }
            },
            _ => {
                if let Some(path) = self.path {
                    put(sink, path.as_bytes(), &mut written)?;
                }
            }
        }

        if let Some(query) = self.query {
            put(sink, b"?", &mut written)?;
            put(sink, query.as_bytes(), &mut written)?;
        }
        if let Some(fragment) = self.fragment {
            // The fragment component keeps its leading `#`.
            put(sink, fragment.as_bytes(), &mut written)?;
        }

        Ok(written)
    }
}

fn put<W: Write>(sink: &mut W, bytes: &[u8], written: &mut usize) -> io::Result<()> {
    sink.write_all(bytes)?;
    *written += bytes.len();
    Ok(())
}

/// Returns true iff `utf8` starts with a valid scheme followed by `:`.
pub fn uri_string_has_scheme(utf8: &str) -> bool {
    // RFC 3986: scheme ::= ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
    let mut bytes = utf8.bytes();
    match bytes.next() {
        Some(c) if c.is_ascii_alphabetic() => (),
        _ => return false,
    }
    for c in bytes {
        match c {
            b':' => return true,
            b'+' | b'-' | b'.' => (),
            c if c.is_ascii_alphanumeric() => (),
            _ => return false,
        }
    }
    false
}

/// Extracts the filesystem path of a `file:` URI.
///
/// Plain paths without a scheme are returned unchanged. Returns `None` for
/// URIs with any other scheme, and on Windows for `file:` URIs missing the
/// `file:///` form.
pub fn file_uri_to_path(uri: &str) -> Option<&str> {
    if !uri_string_has_scheme(uri) {
        return Some(uri);
    }
    let rest = uri.strip_prefix("file:")?;
    if cfg!(windows) {
        rest.strip_prefix("///")
    } else if let Some(path) = rest.strip_prefix("//") {
        Some(path)
    } else {
        Some(rest)
    }
}

#[cfg(test)]
fn serialise_to_string(uri: &Uri<'_>) -> String {
    let mut out = Vec::new();
    let written = uri.serialise(&mut out).unwrap();
    assert_eq!(written, out.len());
    String::from_utf8(out).unwrap()
}

#[test]
fn test_split_then_write_is_identity() {
    let examples = [
        "file://foo",
        "ftp://ftp.is.co.za/rfc/rfc1808.txt",
        "http://www.ietf.org/rfc/rfc2396.txt",
        "ldap://[2001:db8::7]/c=GB?objectClass?one",
        "mailto:John.Doe@example.com",
        "news:comp.infosystems.www.servers.unix",
        "tel:+1-816-555-1212",
        "telnet://192.0.2.16:80/",
        "urn:oasis:names:specification:docbook:dtd:xml:4.1.2",
        "http://example.com",
        "http://example.com/",
        "http://example.com/foo",
        "http://example.com/foo/bar",
        "http://example.com/foo/bar/",
        "http://example.com/foo/bar?q=1&r=2",
        "http://example.com/foo/bar/?q=1&r=2",
        "http://example.com#toto",
        "http://example.com/#toto",
        "http://example.com/foo#toto",
        "http://example.com/foo/bar#toto",
        "http://example.com/foo/bar/#toto",
        "http://example.com/foo/bar?q=1&r=2#toto",
        "http://example.com/foo/bar/.././baz",
        "//example.org/aaa/bbb#ccc",
        "?abc",
        "#def",
        "",
    ];

    for e in examples.iter() {
        assert_eq!(
            *e,
            serialise_to_string(&Uri::parse(e)),
            "parse/serialise of {} is not the identity",
            e
        );
    }
}

#[test]
fn test_split_components() {
    let uri = Uri::parse("http://a/b/c/d;p?q#frag");
    assert_eq!(Some("http"), uri.scheme);
    assert_eq!(Some("a"), uri.authority);
    assert_eq!(Some("/b/c/d;p"), uri.path);
    assert_eq!(Some("q"), uri.query);
    assert_eq!(Some("#frag"), uri.fragment);

    let relative = Uri::parse("g;x?y/./x");
    assert_eq!(None, relative.scheme);
    assert_eq!(None, relative.authority);
    assert_eq!(Some("g;x"), relative.path);
    assert_eq!(Some("y/./x"), relative.query);
    assert_eq!(None, relative.fragment);

    let empty = Uri::parse("");
    assert_eq!(Uri::default(), empty);
}

#[test]
fn test_resolve_relative_uri() {
    // The RFC 3986 §5.4.1 "normal examples", plus the §5.4.2 cases this
    // resolver handles (extra "..", merged dot segments in relative paths).
    let examples = [
        ("g:h", "http://a/b/c/d;p?q", "g:h"),
        ("g", "http://a/b/c/d;p?q", "http://a/b/c/g"),
        ("./g", "http://a/b/c/d;p?q", "http://a/b/c/g"),
        ("g/", "http://a/b/c/d;p?q", "http://a/b/c/g/"),
        ("/g", "http://a/b/c/d;p?q", "http://a/g"),
        ("//g", "http://a/b/c/d;p?q", "http://g"),
        ("?y", "http://a/b/c/d;p?q", "http://a/b/c/d;p?y"),
        ("g?y", "http://a/b/c/d;p?q", "http://a/b/c/g?y"),
        ("#s", "http://a/b/c/d;p?q", "http://a/b/c/d;p?q#s"),
        ("g#s", "http://a/b/c/d;p?q", "http://a/b/c/g#s"),
        ("g?y#s", "http://a/b/c/d;p?q", "http://a/b/c/g?y#s"),
        (";x", "http://a/b/c/d;p?q", "http://a/b/c/;x"),
        ("g;x", "http://a/b/c/d;p?q", "http://a/b/c/g;x"),
        ("g;x?y#s", "http://a/b/c/d;p?q", "http://a/b/c/g;x?y#s"),
        ("", "http://a/b/c/d;p?q", "http://a/b/c/d;p?q"),
        (".", "http://a/b/c/d;p?q", "http://a/b/c/"),
        ("./", "http://a/b/c/d;p?q", "http://a/b/c/"),
        ("..", "http://a/b/c/d;p?q", "http://a/b/"),
        ("../", "http://a/b/c/d;p?q", "http://a/b/"),
        ("../g", "http://a/b/c/d;p?q", "http://a/b/g"),
        ("../..", "http://a/b/c/d;p?q", "http://a/"),
        ("../../", "http://a/b/c/d;p?q", "http://a/"),
        ("../../g", "http://a/b/c/d;p?q", "http://a/g"),
        ("../../../g", "http://a/b/c/d;p?q", "http://a/g"),
        ("../../../../g", "http://a/b/c/d;p?q", "http://a/g"),
        ("g.", "http://a/b/c/d;p?q", "http://a/b/c/g."),
        (".g", "http://a/b/c/d;p?q", "http://a/b/c/.g"),
        ("g..", "http://a/b/c/d;p?q", "http://a/b/c/g.."),
        ("..g", "http://a/b/c/d;p?q", "http://a/b/c/..g"),
        ("./../g", "http://a/b/c/d;p?q", "http://a/b/g"),
        ("http:g", "http://a/b/c/d;p?q", "http:g"),
        ("http:", "http://a/b/c/d;p?q", "http:"),
        // slashes in the base URI's query arguments
        ("g", "http://a/b/c/d;p?q=1/2", "http://a/b/c/g"),
        ("./g", "http://a/b/c/d;p?q=1/2", "http://a/b/c/g"),
        ("g/", "http://a/b/c/d;p?q=1/2", "http://a/b/c/g/"),
        ("/g", "http://a/b/c/d;p?q=1/2", "http://a/g"),
        ("//g", "http://a/b/c/d;p?q=1/2", "http://g"),
        ("?y", "http://a/b/c/d;p?q=1/2", "http://a/b/c/d;p?y"),
        ("g?y", "http://a/b/c/d;p?q=1/2", "http://a/b/c/g?y"),
        ("./", "http://a/b/c/d;p?q=1/2", "http://a/b/c/"),
        ("../", "http://a/b/c/d;p?q=1/2", "http://a/b/"),
        ("../g", "http://a/b/c/d;p?q=1/2", "http://a/b/g"),
        ("../../", "http://a/b/c/d;p?q=1/2", "http://a/"),
        ("../../g", "http://a/b/c/d;p?q=1/2", "http://a/g"),
        // slashes in the base URI's path parameters
        ("g", "http://a/b/c/d;p=1/2?q", "http://a/b/c/d;p=1/g"),
        ("./g", "http://a/b/c/d;p=1/2?q", "http://a/b/c/d;p=1/g"),
        ("g/", "http://a/b/c/d;p=1/2?q", "http://a/b/c/d;p=1/g/"),
        ("g?y", "http://a/b/c/d;p=1/2?q", "http://a/b/c/d;p=1/g?y"),
        (";x", "http://a/b/c/d;p=1/2?q", "http://a/b/c/d;p=1/;x"),
        ("g;x", "http://a/b/c/d;p=1/2?q", "http://a/b/c/d;p=1/g;x"),
        ("./", "http://a/b/c/d;p=1/2?q", "http://a/b/c/d;p=1/"),
        ("../", "http://a/b/c/d;p=1/2?q", "http://a/b/c/"),
        ("../g", "http://a/b/c/d;p=1/2?q", "http://a/b/c/g"),
        ("../../", "http://a/b/c/d;p=1/2?q", "http://a/b/"),
        ("../../g", "http://a/b/c/d;p=1/2?q", "http://a/b/g"),
        // other bases
        ("bar:abc", "foo:xyz", "bar:abc"),
        ("../abc", "http://example/x/y/z", "http://example/x/abc"),
        (
            "http://example/x/abc",
            "http://example2/x/y/z",
            "http://example/x/abc",
        ),
        ("../r", "http://ex/x/y/z", "http://ex/x/r"),
        ("q/r", "http://ex/x/y", "http://ex/x/q/r"),
        ("q/r#s", "http://ex/x/y", "http://ex/x/q/r#s"),
        ("q/r#s/t", "http://ex/x/y", "http://ex/x/q/r#s/t"),
        ("ftp://ex/x/q/r", "http://ex/x/y", "ftp://ex/x/q/r"),
        ("z/", "http://ex/x/y/", "http://ex/x/y/z/"),
        ("#Animal", "file:/swap/test/animal.rdf", "file:/swap/test/animal.rdf#Animal"),
        ("../abc", "file:/e/x/y/z", "file:/e/x/abc"),
        ("/example/x/abc", "file:/example2/x/y/z", "file:/example/x/abc"),
        ("q/r", "file:/ex/x/y", "file:/ex/x/q/r"),
        ("q/r#", "file:/ex/x/y", "file:/ex/x/q/r#"),
        ("./#blort", "file:/some/dir/foo", "file:/some/dir/#blort"),
        ("./#", "file:/some/dir/foo", "file:/some/dir/#"),
        ("./", "http://example/x/abc.efg", "http://example/x/"),
        ("./q:r", "http://ex/x/y", "http://ex/x/q:r"),
        ("./p=q:r", "http://ex/x/y", "http://ex/x/p=q:r"),
        ("?pp/rr", "http://ex/x/y?pp/qq", "http://ex/x/y?pp/rr"),
        ("y/z", "http://ex/x/y?pp/qq", "http://ex/x/y/z"),
        ("y?q", "http://ex/x/y?q", "http://ex/x/y?q"),
        ("mini1.xml", "file:///w/d/e/", "file:///w/d/e/mini1.xml"),
    ];

    for (reference, base, output) in examples.iter() {
        let base = Uri::parse(base);
        let target = Uri::parse(reference).resolve(&base);
        assert_eq!(
            *output,
            serialise_to_string(&target),
            "resolving {} against {:?} is wrong",
            reference,
            base
        );
    }
}

#[test]
fn test_resolve_defers_path_merging() {
    let base = Uri::parse("http://a/b/c/d;p?q");
    let target = Uri::parse("../../g").resolve(&base);
    assert_eq!(Some("/b/c/d;p"), target.path_base);
    assert_eq!(Some("../../g"), target.path);
    assert!(target.base_uri_has_authority);
}

#[test]
fn test_uri_string_has_scheme() {
    assert!(uri_string_has_scheme("http://example.com/"));
    assert!(uri_string_has_scheme("file:foo"));
    assert!(uri_string_has_scheme("urn:oasis:names"));
    assert!(uri_string_has_scheme("x+y-z.w:rest"));
    assert!(!uri_string_has_scheme("example/relative"));
    assert!(!uri_string_has_scheme("/absolute/path"));
    assert!(!uri_string_has_scheme("1http://example.com/"));
    assert!(!uri_string_has_scheme("ht tp://example.com/"));
    assert!(!uri_string_has_scheme(""));
}

#[test]
#[cfg(not(windows))]
fn test_file_uri_to_path() {
    assert_eq!(Some("/foo/bar.ttl"), file_uri_to_path("/foo/bar.ttl"));
    assert_eq!(Some("foo.ttl"), file_uri_to_path("foo.ttl"));
    assert_eq!(Some("/foo/bar.ttl"), file_uri_to_path("file:/foo/bar.ttl"));
    assert_eq!(Some("/foo/bar.ttl"), file_uri_to_path("file:///foo/bar.ttl"));
    assert_eq!(None, file_uri_to_path("http://example.com/foo.ttl"));
    assert_eq!(None, file_uri_to_path("ftp://example.com/foo.ttl"));
}
