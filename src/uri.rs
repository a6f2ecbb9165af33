use crate::{
    component::{Fragment, Host, Path, Port, Query, Scheme, Userinfo},
    error::ParseError,
    parse,
};
use core::str::FromStr;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// The components of a URI, open for modification.
///
/// A [`Uri`] is immutable. To change a URI, take its parts with
/// [`Uri::into_parts`] or [`Uri::to_parts`], modify them and build a new
/// URI with [`Uri::from_parts`].
///
/// # Examples
///
/// ```
/// use uri_formatter::{component::Host, Formatter, Uri};
///
/// let uri = Uri::parse("https://user@example.com:8443/x?y#z")?;
/// let mut parts = uri.into_parts();
/// parts.scheme = None;
/// parts.userinfo = None;
/// parts.host = Host::empty();
/// parts.port = None;
///
/// let uri = Uri::from_parts(parts);
/// assert_eq!(Formatter::new().format(&uri)?, "/x?y#z");
/// # Ok::<_, uri_formatter::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Parts {
    /// The scheme.
    pub scheme: Option<Scheme>,
    /// The userinfo.
    pub userinfo: Option<Userinfo>,
    /// The host, possibly empty.
    pub host: Host,
    /// The port.
    pub port: Option<Port>,
    /// The path, possibly empty.
    pub path: Path,
    /// The query.
    pub query: Option<Query>,
    /// The fragment.
    pub fragment: Option<Fragment>,
}

/// A parsed URI.
///
/// Any component may be absent. A URI has an [authority] if and only if it
/// has a non-empty userinfo, a non-empty host or a port.
///
/// [authority]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2
///
/// # Examples
///
/// ```
/// use uri_formatter::Uri;
///
/// let uri = Uri::parse("http://user@example.com:8042/over/there?name=ferret#nose")?;
///
/// assert_eq!(uri.scheme().unwrap().as_str(), "http");
/// assert_eq!(uri.userinfo().unwrap().literal(), "user");
/// assert_eq!(uri.host().literal(), "example.com");
/// assert_eq!(uri.port().unwrap().value(), 8042);
/// assert_eq!(uri.path().literal(), "/over/there");
/// assert_eq!(uri.query().unwrap().get("name"), Some(Some("ferret")));
/// assert_eq!(uri.fragment().unwrap().literal(), "nose");
/// # Ok::<_, uri_formatter::ParseError>(())
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    parts: Parts,
}

impl Uri {
    /// Parses a URI from a string.
    ///
    /// Only the scheme, the port and bracketed IP literals are validated.
    /// Other components are taken as they are and decoded leniently.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the scheme, the port or an IP literal is malformed.
    pub fn parse(s: &str) -> Result<Uri, ParseError> {
        match parse::parse(s) {
            Ok(parts) => Ok(Uri { parts }),
            Err(e) => {
                debug!(input = s, error = %e, "rejecting malformed URI");
                Err(e)
            }
        }
    }

    /// Creates a URI from its parts.
    #[must_use]
    pub fn from_parts(parts: Parts) -> Uri {
        Uri { parts }
    }

    /// Consumes the URI and returns its parts.
    #[must_use]
    pub fn into_parts(self) -> Parts {
        self.parts
    }

    /// Returns a copy of the parts.
    #[must_use]
    pub fn to_parts(&self) -> Parts {
        self.parts.clone()
    }

    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> Option<&Scheme> {
        self.parts.scheme.as_ref()
    }

    /// Returns the userinfo.
    #[must_use]
    pub fn userinfo(&self) -> Option<&Userinfo> {
        self.parts.userinfo.as_ref()
    }

    /// Returns the host, which is empty when there is none.
    #[must_use]
    pub fn host(&self) -> &Host {
        &self.parts.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> Option<&Port> {
        self.parts.port.as_ref()
    }

    /// Returns the path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.parts.path
    }

    /// Returns the query.
    #[must_use]
    pub fn query(&self) -> Option<&Query> {
        self.parts.query.as_ref()
    }

    /// Returns the fragment.
    #[must_use]
    pub fn fragment(&self) -> Option<&Fragment> {
        self.parts.fragment.as_ref()
    }

    /// Checks whether the URI has an authority.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_formatter::Uri;
    ///
    /// assert!(Uri::parse("http://example.com")?.has_authority());
    /// assert!(Uri::parse("//:8080")?.has_authority());
    /// assert!(!Uri::parse("file:///etc/hosts")?.has_authority());
    /// assert!(!Uri::parse("mailto:user@example.com")?.has_authority());
    /// # Ok::<_, uri_formatter::ParseError>(())
    /// ```
    #[must_use]
    pub fn has_authority(&self) -> bool {
        self.parts.userinfo.as_ref().is_some_and(|u| !u.is_empty())
            || !self.parts.host.is_empty()
            || self.parts.port.is_some()
    }

    /// Writes the URI with an already rendered host and query.
    pub(crate) fn assemble(&self, host: &str, query: Option<&str>) -> String {
        let p = &self.parts;
        let mut buf = String::new();

        if let Some(scheme) = &p.scheme {
            buf.push_str(scheme.as_str());
            buf.push(':');
        }

        let path = p.path.literal().as_str();
        if self.has_authority() {
            buf.push_str("//");
            if let Some(userinfo) = &p.userinfo {
                buf.push_str(userinfo.literal().as_str());
                buf.push('@');
            }
            buf.push_str(host);
            if let Some(port) = &p.port {
                buf.push(':');
                buf.push_str(port.literal());
            }
            if !path.is_empty() && !path.starts_with('/') {
                buf.push('/');
            }
        } else if path.starts_with("//") {
            // Keeps the path from being read as an authority.
            buf.push_str("//");
        } else if p.scheme.is_none() && path.split('/').next().is_some_and(|s| s.contains(':')) {
            // Keeps the first segment from being read as a scheme.
            buf.push_str("./");
        }
        buf.push_str(path);

        if let Some(query) = query {
            buf.push('?');
            buf.push_str(query);
        }
        if let Some(fragment) = &p.fragment {
            buf.push('#');
            buf.push_str(fragment.literal().as_str());
        }
        buf
    }

    /// Returns the literal form of the URI.
    pub(crate) fn to_literal(&self) -> String {
        let query = self.parts.query.as_ref().map(|q| q.literal().as_str());
        self.assemble(self.parts.host.literal(), query)
    }
}

impl From<Parts> for Uri {
    fn from(parts: Parts) -> Self {
        Uri::from_parts(parts)
    }
}

impl FromStr for Uri {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Uri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_literal())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Uri::parse(&s).map_err(de::Error::custom)
    }
}
