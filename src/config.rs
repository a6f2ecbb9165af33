//! Formatter configuration.

use crate::error::Error;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a host is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HostEncoding {
    /// Unicode labels, decoding `xn--` labels.
    #[default]
    Unicode,
    /// ASCII-compatible labels, encoding non-ASCII labels with Punycode.
    Ascii,
}

impl HostEncoding {
    /// Returns the lowercase name of the encoding.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HostEncoding::Unicode => "unicode",
            HostEncoding::Ascii => "ascii",
        }
    }
}

/// How a query is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum QueryEncoding {
    /// [RFC 3986]: a space is written as `%20`.
    ///
    /// [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986
    #[default]
    Rfc3986,
    /// [RFC 1738]: a space is written as `+`, as in form data.
    ///
    /// [RFC 1738]: https://datatracker.ietf.org/doc/html/rfc1738
    Rfc1738,
}

impl QueryEncoding {
    /// Returns the lowercase name of the encoding.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QueryEncoding::Rfc3986 => "rfc3986",
            QueryEncoding::Rfc1738 => "rfc1738",
        }
    }

    /// Checks whether a space is written as `+`.
    #[must_use]
    pub fn space_as_plus(self) -> bool {
        self == QueryEncoding::Rfc1738
    }
}

impl FromStr for HostEncoding {
    type Err = Error;

    /// Parses `"unicode"` or `"ascii"`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unicode") {
            Ok(HostEncoding::Unicode)
        } else if s.eq_ignore_ascii_case("ascii") {
            Ok(HostEncoding::Ascii)
        } else {
            Err(Error::InvalidArgument {
                name: "host encoding",
                value: s.to_owned(),
            })
        }
    }
}

impl FromStr for QueryEncoding {
    type Err = Error;

    /// Parses `"rfc3986"` or `"rfc1738"`, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("rfc3986") {
            Ok(QueryEncoding::Rfc3986)
        } else if s.eq_ignore_ascii_case("rfc1738") {
            Ok(QueryEncoding::Rfc1738)
        } else {
            Err(Error::InvalidArgument {
                name: "query encoding",
                value: s.to_owned(),
            })
        }
    }
}

impl TryFrom<&str> for HostEncoding {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<&str> for QueryEncoding {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// The settings a [`Formatter`] renders with.
///
/// [`Formatter`]: crate::Formatter
///
/// # Examples
///
/// ```
/// use uri_formatter::{FormatterConfig, HostEncoding, QueryEncoding};
///
/// let config = FormatterConfig::default();
/// assert_eq!(config.host_encoding, HostEncoding::Unicode);
/// assert_eq!(config.query_encoding, QueryEncoding::Rfc3986);
/// assert_eq!(config.query_separator, "&");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormatterConfig {
    /// How hosts are rendered.
    pub host_encoding: HostEncoding,
    /// How query keys and values are percent-encoded.
    pub query_encoding: QueryEncoding,
    /// The string written between query pairs.
    pub query_separator: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        FormatterConfig {
            host_encoding: HostEncoding::default(),
            query_encoding: QueryEncoding::default(),
            query_separator: "&".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("ASCII".parse::<HostEncoding>(), Ok(HostEncoding::Ascii));
        assert_eq!(HostEncoding::try_from("Unicode"), Ok(HostEncoding::Unicode));
        assert_eq!("RFC1738".parse::<QueryEncoding>(), Ok(QueryEncoding::Rfc1738));
        assert_eq!(
            "punycode".parse::<HostEncoding>(),
            Err(Error::InvalidArgument {
                name: "host encoding",
                value: "punycode".to_owned(),
            })
        );
        assert!("rfc 3986".parse::<QueryEncoding>().is_err());
    }

    #[test]
    fn names_round_trip() {
        for enc in [HostEncoding::Unicode, HostEncoding::Ascii] {
            assert_eq!(enc.as_str().parse::<HostEncoding>(), Ok(enc));
        }
        for enc in [QueryEncoding::Rfc3986, QueryEncoding::Rfc1738] {
            assert_eq!(enc.as_str().parse::<QueryEncoding>(), Ok(enc));
        }
    }
}
