//! Error types.

use core::convert::Infallible;
use thiserror::Error;

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseErrorKind {
    /// A colon ends the first segment but what precedes it is not a scheme.
    ///
    /// The error index points to the start of input.
    InvalidScheme,
    /// The port contains a non-digit or exceeds 65535.
    ///
    /// The error index points to the first byte of the port.
    InvalidPort,
    /// Invalid IP literal address.
    ///
    /// The error index points to the first byte of the address.
    InvalidIpLiteral,
    /// Unexpected character or end of input.
    ///
    /// The error index points to the first byte of the character or the end of input.
    UnexpectedCharOrEnd,
}

/// An error occurred when parsing a URI.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("{kind} at index {index}")]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl ParseError {
    /// Returns the index at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

/// Detailed cause of a [`HostError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HostErrorKind {
    /// An `xn--` label is not valid Punycode, decodes to ASCII only,
    /// or does not encode back to itself.
    InvalidPunycode,
    /// A label cannot be Punycode-encoded.
    UnencodableLabel,
    /// A label is longer than 63 octets once encoded.
    LabelTooLong,
}

/// An error occurred when converting a host between Unicode and ASCII.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{kind}: {label:?}")]
pub struct HostError {
    pub(crate) kind: HostErrorKind,
    pub(crate) label: String,
}

impl HostError {
    pub(crate) fn new(kind: HostErrorKind, label: &str) -> Self {
        Self {
            kind,
            label: label.to_owned(),
        }
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> HostErrorKind {
        self.kind
    }

    /// Returns the offending label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Any error returned by this crate.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// The input violates the URI grammar.
    #[error("malformed URI: {0}")]
    MalformedUri(#[from] ParseError),
    /// A host label could not be converted.
    #[error("invalid host: {0}")]
    InvalidHost(#[from] HostError),
    /// A configuration value is outside its domain.
    #[error("invalid {name}: {value:?}")]
    InvalidArgument {
        /// The name of the rejected setting.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The value is not a URI component and cannot be formatted.
    #[error("unsupported component: {0}")]
    UnsupportedComponent(&'static str),
}

impl From<Infallible> for Error {
    fn from(x: Infallible) -> Self {
        match x {}
    }
}
