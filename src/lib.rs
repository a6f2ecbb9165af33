#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

//! An [RFC 3986] URI component model with configurable rendering.
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//!
//! A URI is parsed into a [`Uri`], an immutable set of components that each
//! keep their literal form. A [`Formatter`] renders a URI or any single
//! component, choosing how the host is written ([`HostEncoding`]: Unicode or
//! ASCII-compatible Punycode) and how the query is written
//! ([`QueryEncoding`]: `%20` or `+` for a space, with any pair separator).
//!
//! # Examples
//!
//! ```
//! use uri_formatter::{Formatter, HostEncoding, QueryEncoding, Uri};
//!
//! let uri: Uri = "http://gwóźdź.pl/szukaj?q=gwóźdź+stalowy".parse()?;
//!
//! let mut formatter = Formatter::new();
//! formatter
//!     .set_host_encoding(HostEncoding::Ascii)?
//!     .set_query_encoding(QueryEncoding::Rfc1738)?;
//!
//! assert_eq!(
//!     formatter.format(&uri)?,
//!     "http://xn--gwd-hna98db.pl/szukaj?q=gw%C3%B3%C5%BAd%C5%BA+stalowy"
//! );
//! # Ok::<_, uri_formatter::Error>(())
//! ```
//!
//! # Feature flags
//!
//! - `serde`: Implements `Serialize` and `Deserialize` for [`Uri`] (as a
//!   string) and for [`FormatterConfig`] and its encodings.
//!
//! # Logging
//!
//! Rejected input is reported through [`tracing`] at the `debug` level and
//! configuration changes at the `trace` level. No subscriber is installed.

pub mod component;
pub mod host;
pub mod pct_enc;

mod config;
mod error;
mod fmt;
mod formatter;
mod parse;
mod uri;

pub use config::{FormatterConfig, HostEncoding, QueryEncoding};
pub use error::{Error, HostError, HostErrorKind, ParseError, ParseErrorKind};
pub use formatter::{AsComponent, ComponentRef, Formatter};
pub use uri::{Parts, Uri};
