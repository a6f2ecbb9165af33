//! URI components.
//!
//! Every component keeps its *literal*, the exact text that appears in a URI,
//! next to a way to obtain its decoded value. Components are immutable:
//! constructors produce new values, nothing mutates one in place.

use crate::{
    config::QueryEncoding,
    error::{HostError, ParseError},
    host,
    pct_enc::{self, encoder, table, EStr},
};
use std::{
    borrow::Cow,
    net::{Ipv4Addr, Ipv6Addr},
};

/// A [scheme] component.
///
/// Schemes are case-insensitive and are therefore stored in lowercase.
///
/// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
///
/// # Examples
///
/// ```
/// use uri_formatter::component::Scheme;
///
/// let scheme = Scheme::new("HTTP").unwrap();
/// assert_eq!(scheme.as_str(), "http");
/// assert!(Scheme::new("1http").is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Scheme {
    inner: String,
}

impl Scheme {
    /// Creates a scheme, returning `None` if the string is not a valid scheme name
    /// according to [Section 3.1 of RFC 3986][scheme].
    ///
    /// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
    #[must_use]
    pub fn new(s: &str) -> Option<Scheme> {
        match s.as_bytes() {
            [first, rem @ ..] if first.is_ascii_alphabetic() && table::SCHEME.validate(rem) => {
                Some(Scheme {
                    inner: s.to_ascii_lowercase(),
                })
            }
            _ => None,
        }
    }

    /// Returns the scheme as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the literal form, which for a scheme is the scheme itself.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.inner
    }
}

/// A [userinfo] component, conventionally `user[:password]`.
///
/// [userinfo]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.1
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Userinfo {
    literal: String,
}

impl Userinfo {
    /// Creates a userinfo from a decoded user name and an optional password.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_formatter::component::Userinfo;
    ///
    /// let userinfo = Userinfo::new("jo:e", Some("p@ss"));
    /// assert_eq!(userinfo.literal(), "jo%3Ae:p%40ss");
    /// assert_eq!(userinfo.user(), "jo:e");
    /// assert_eq!(userinfo.password().as_deref(), Some("p@ss"));
    /// ```
    #[must_use]
    pub fn new(user: &str, password: Option<&str>) -> Userinfo {
        let mut literal = EStr::<encoder::User>::encode(user, false).into_owned();
        if let Some(password) = password {
            literal.push(':');
            literal.push_str(&EStr::<encoder::Userinfo>::encode(password, false));
        }
        Userinfo { literal }
    }

    /// Creates a userinfo from its literal form.
    #[must_use]
    pub fn from_literal(literal: &str) -> Userinfo {
        Userinfo {
            literal: literal.to_owned(),
        }
    }

    /// Returns the literal form.
    #[must_use]
    pub fn literal(&self) -> &EStr<encoder::Userinfo> {
        EStr::new(&self.literal)
    }

    /// Returns the decoded userinfo.
    #[must_use]
    pub fn decoded(&self) -> Cow<'_, str> {
        self.literal().decode().to_string_lossy()
    }

    /// Returns the decoded user name, i.e. everything before the first `':'`.
    #[must_use]
    pub fn user(&self) -> Cow<'_, str> {
        let user = self.literal().split_once(':').map_or(self.literal(), |(user, _)| user);
        user.decode().to_string_lossy()
    }

    /// Returns the decoded password, i.e. everything after the first `':'`.
    #[must_use]
    pub fn password(&self) -> Option<Cow<'_, str>> {
        self.literal()
            .split_once(':')
            .map(|(_, password)| password.decode().to_string_lossy())
    }

    /// Checks whether the userinfo is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literal.is_empty()
    }
}

/// The kind of a [`Host`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// No host at all.
    Empty,
    /// A registered name, usually a domain name.
    RegName,
    /// An IPv4 address in dotted-decimal form.
    Ipv4(Ipv4Addr),
    /// A bracketed IPv6 address.
    Ipv6(Ipv6Addr),
    /// A bracketed address of a future IP version.
    IpvFuture,
}

/// A [host] component.
///
/// [host]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.2
///
/// # Examples
///
/// ```
/// use std::net::Ipv6Addr;
/// use uri_formatter::component::{Host, HostKind};
///
/// let host = Host::parse("[::1]")?;
/// assert_eq!(host.kind(), HostKind::Ipv6(Ipv6Addr::LOCALHOST));
///
/// let host = Host::parse("xn--gwd-hna98db.pl")?;
/// assert_eq!(host.to_unicode()?, "gwóźdź.pl");
/// # Ok::<_, uri_formatter::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Host {
    literal: String,
    kind: HostKind,
}

impl Default for Host {
    fn default() -> Self {
        Host::empty()
    }
}

impl Host {
    pub(crate) fn new_validated(literal: &str, kind: HostKind) -> Host {
        Host {
            literal: literal.to_owned(),
            kind,
        }
    }

    /// Creates an empty host.
    #[must_use]
    pub fn empty() -> Host {
        Host {
            literal: String::new(),
            kind: HostKind::Empty,
        }
    }

    /// Parses a host from its literal form.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host is bracketed but is not a valid IP literal.
    pub fn parse(literal: &str) -> Result<Host, ParseError> {
        let kind = crate::parse::parse_host(literal)?;
        Ok(Host::new_validated(literal, kind))
    }

    /// Returns the literal form.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Returns the kind of the host.
    #[must_use]
    pub fn kind(&self) -> HostKind {
        self.kind
    }

    /// Checks whether the host is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind == HostKind::Empty
    }

    /// Returns the decoded host.
    ///
    /// A registered name is percent-decoded; IP literals are returned as is.
    #[must_use]
    pub fn decoded(&self) -> Cow<'_, str> {
        match self.kind {
            HostKind::RegName => EStr::<encoder::RegName>::new(&self.literal)
                .decode()
                .to_string_lossy(),
            _ => Cow::Borrowed(&self.literal),
        }
    }

    /// Converts the decoded host to its ASCII-compatible form.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a label cannot be encoded.
    pub fn to_ascii(&self) -> Result<String, HostError> {
        host::to_ascii(&self.decoded()).map(Cow::into_owned)
    }

    /// Converts the decoded host to its Unicode form.
    ///
    /// # Errors
    ///
    /// Returns `Err` if an `xn--` label is malformed.
    pub fn to_unicode(&self) -> Result<String, HostError> {
        host::to_unicode(&self.decoded()).map(Cow::into_owned)
    }
}

/// A [port] component.
///
/// [port]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2.3
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Port {
    value: u16,
    literal: String,
}

impl Port {
    /// Creates a port.
    #[must_use]
    pub fn new(value: u16) -> Port {
        Port {
            value,
            literal: value.to_string(),
        }
    }

    /// Keeps leading zeros of a parsed port in its literal.
    pub(crate) fn new_validated(literal: &str, value: u16) -> Port {
        Port {
            value,
            literal: literal.to_owned(),
        }
    }

    /// Returns the port number.
    #[must_use]
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Returns the literal form.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }
}

/// A [path] component.
///
/// [path]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.3
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    literal: String,
}

impl Path {
    /// Creates a path from its decoded form.
    ///
    /// Slashes are kept as segment separators.
    #[must_use]
    pub fn new(decoded: &str) -> Path {
        Path {
            literal: EStr::<encoder::Path>::encode(decoded, false).into_owned(),
        }
    }

    /// Creates a path from decoded segments.
    ///
    /// Slashes inside a segment are percent-encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_formatter::component::Path;
    ///
    /// let path = Path::from_segments(["a/b", "c d"], true);
    /// assert_eq!(path.literal(), "/a%2Fb/c%20d");
    /// assert!(path.segments().eq(["a%2Fb", "c%20d"]));
    /// ```
    #[must_use]
    pub fn from_segments<I, S>(segments: I, absolute: bool) -> Path
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut literal = String::new();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 || absolute {
                literal.push('/');
            }
            literal.push_str(&EStr::<encoder::Segment>::encode(segment.as_ref(), false));
        }
        Path { literal }
    }

    /// Creates a path from its literal form.
    #[must_use]
    pub fn from_literal(literal: &str) -> Path {
        Path {
            literal: literal.to_owned(),
        }
    }

    /// Returns the literal form.
    #[must_use]
    pub fn literal(&self) -> &EStr<encoder::Path> {
        EStr::new(&self.literal)
    }

    /// Returns the decoded path.
    #[must_use]
    pub fn decoded(&self) -> Cow<'_, str> {
        self.literal().decode().to_string_lossy()
    }

    /// Checks whether the path is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literal.is_empty()
    }

    /// Checks whether the path is absolute, i.e., starting with `'/'`.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.literal.starts_with('/')
    }

    /// Returns an iterator over the path segments, separated by `'/'`.
    ///
    /// The empty string before a leading `'/'` is not a segment, and an
    /// empty path has no segments. Segments can be empty in the other cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_formatter::Uri;
    ///
    /// let uri = Uri::parse("file:///path/to//dir/")?;
    /// assert!(uri.path().segments().eq(["path", "to", "", "dir", ""]));
    ///
    /// let uri = Uri::parse("foo:bar/baz")?;
    /// assert!(uri.path().segments().eq(["bar", "baz"]));
    ///
    /// let uri = Uri::parse("http://example.com")?;
    /// assert_eq!(uri.path().segments().count(), 0);
    /// # Ok::<_, uri_formatter::ParseError>(())
    /// ```
    pub fn segments(&self) -> impl Iterator<Item = &EStr<encoder::Path>> + '_ {
        let path = self.literal.strip_prefix('/').unwrap_or(&self.literal);
        (!self.literal.is_empty())
            .then(|| EStr::<encoder::Path>::new(path).split('/'))
            .into_iter()
            .flatten()
    }
}

type Pair = (String, Option<String>);

/// A [query] component, viewed as a sequence of key/value pairs.
///
/// Pairs are separated by `'&'` and a key is separated from its value by the
/// first `'='`. A pair without `'='` has no value, which is distinct from an
/// empty value. Keys may repeat and their order is kept.
///
/// [query]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.4
///
/// # Examples
///
/// ```
/// use uri_formatter::{component::Query, QueryEncoding};
///
/// let query = Query::parse("kingkong=toto&foo=bar+baz&flag");
/// assert_eq!(query.get("foo"), Some(Some("bar baz")));
/// assert_eq!(query.get("flag"), Some(None));
/// assert_eq!(query.get("nope"), None);
///
/// assert_eq!(
///     query.encode(QueryEncoding::Rfc3986, ";"),
///     "kingkong=toto;foo=bar%20baz;flag"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Query {
    literal: String,
    pairs: Vec<Pair>,
}

impl Query {
    /// Parses a query found in a URI.
    ///
    /// Keys and values are decoded reading `+` as a space, which is how
    /// form data has always been written into query strings.
    #[must_use]
    pub fn parse(literal: &str) -> Query {
        Query::parse_with(literal, QueryEncoding::Rfc1738)
    }

    /// Parses a query, decoding keys and values under the given encoding.
    ///
    /// Only [`QueryEncoding::Rfc1738`] reads `+` as a space.
    #[must_use]
    pub fn parse_with(literal: &str, encoding: QueryEncoding) -> Query {
        let plus_as_space = encoding.space_as_plus();
        let decode = |s: &str| pct_enc::decode(s, plus_as_space).to_string_lossy().into_owned();

        let pairs = if literal.is_empty() {
            Vec::new()
        } else {
            literal
                .split('&')
                .map(|pair| match pair.split_once('=') {
                    Some((key, value)) => (decode(key), Some(decode(value))),
                    None => (decode(pair), None),
                })
                .collect()
        };

        Query {
            literal: literal.to_owned(),
            pairs,
        }
    }

    /// Creates a query from decoded key/value pairs.
    ///
    /// The literal form is written with [`QueryEncoding::Rfc3986`] and `'&'`.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Query
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<Pair> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.map(Into::into)))
            .collect();
        let literal = encode_pairs(&pairs, QueryEncoding::Rfc3986, "&");
        Query { literal, pairs }
    }

    /// Returns the literal form.
    #[must_use]
    pub fn literal(&self) -> &EStr<encoder::Query> {
        EStr::new(&self.literal)
    }

    /// Returns the decoded pairs in order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, Option<String>)] {
        &self.pairs
    }

    /// Returns the value of the first pair with the given key.
    ///
    /// The outer `Option` tells whether the key is present, the inner one
    /// whether it has a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Checks whether the query is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literal.is_empty()
    }

    /// Serializes the pairs with the given encoding and pair separator.
    #[must_use]
    pub fn encode(&self, encoding: QueryEncoding, separator: &str) -> String {
        encode_pairs(&self.pairs, encoding, separator)
    }
}

fn encode_pairs(pairs: &[Pair], encoding: QueryEncoding, separator: &str) -> String {
    let space_as_plus = encoding.space_as_plus();
    let mut buf = String::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            buf.push_str(separator);
        }
        buf.push_str(&EStr::<encoder::QueryKey>::encode(key, space_as_plus));
        if let Some(value) = value {
            buf.push('=');
            buf.push_str(&EStr::<encoder::QueryValue>::encode(value, space_as_plus));
        }
    }
    buf
}

/// A [fragment] component.
///
/// [fragment]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.5
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Fragment {
    literal: String,
}

impl Fragment {
    /// Creates a fragment from its decoded form.
    #[must_use]
    pub fn new(decoded: &str) -> Fragment {
        Fragment {
            literal: EStr::<encoder::Fragment>::encode(decoded, false).into_owned(),
        }
    }

    /// Creates a fragment from its literal form.
    #[must_use]
    pub fn from_literal(literal: &str) -> Fragment {
        Fragment {
            literal: literal.to_owned(),
        }
    }

    /// Returns the literal form.
    #[must_use]
    pub fn literal(&self) -> &EStr<encoder::Fragment> {
        EStr::new(&self.literal)
    }

    /// Returns the decoded fragment.
    #[must_use]
    pub fn decoded(&self) -> Cow<'_, str> {
        self.literal().decode().to_string_lossy()
    }
}
