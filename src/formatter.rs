//! Rendering of URIs and their components.

use crate::{
    component::{Fragment, Host, HostKind, Path, Port, Query, Scheme, Userinfo},
    config::{FormatterConfig, HostEncoding, QueryEncoding},
    error::Error,
    host::{to_ascii, to_unicode},
    pct_enc::{encoder, EStr},
    uri::Uri,
};
use core::any::type_name;
use tracing::{debug, trace};

/// A borrowed URI or URI component, as accepted by [`Formatter::format`].
#[derive(Clone, Copy, Debug)]
pub enum ComponentRef<'a> {
    /// A scheme.
    Scheme(&'a Scheme),
    /// A userinfo.
    Userinfo(&'a Userinfo),
    /// A host.
    Host(&'a Host),
    /// A port.
    Port(&'a Port),
    /// A path.
    Path(&'a Path),
    /// A query.
    Query(&'a Query),
    /// A fragment.
    Fragment(&'a Fragment),
    /// A whole URI.
    Uri(&'a Uri),
}

/// Values that may be passed to [`Formatter::format`].
///
/// Every URI component implements this trait. String types implement it
/// too but are not components, so formatting them fails with
/// [`Error::UnsupportedComponent`].
pub trait AsComponent {
    /// Returns the component this value stands for, if any.
    fn as_component(&self) -> Option<ComponentRef<'_>>;
}

macro_rules! impl_as_component {
    ($($Ty:ident),+) => {
        $(
            impl AsComponent for $Ty {
                fn as_component(&self) -> Option<ComponentRef<'_>> {
                    Some(ComponentRef::$Ty(self))
                }
            }
        )+
    };
}

impl_as_component!(Scheme, Userinfo, Host, Port, Path, Query, Fragment, Uri);

impl AsComponent for ComponentRef<'_> {
    fn as_component(&self) -> Option<ComponentRef<'_>> {
        Some(*self)
    }
}

impl AsComponent for str {
    fn as_component(&self) -> Option<ComponentRef<'_>> {
        None
    }
}

impl AsComponent for String {
    fn as_component(&self) -> Option<ComponentRef<'_>> {
        None
    }
}

impl<T: AsComponent + ?Sized> AsComponent for &T {
    fn as_component(&self) -> Option<ComponentRef<'_>> {
        (**self).as_component()
    }
}

/// Renders URIs and their components under a [`FormatterConfig`].
///
/// The host is rendered in Unicode or ASCII-compatible form and the query
/// is re-serialized from its pairs. The other components are written as
/// their literal.
///
/// # Concurrency
///
/// [`format`](Self::format) takes `&self` and depends only on the component
/// and the current configuration, so a formatter can be shared freely while
/// nobody reconfigures it. The setters take `&mut self`: a formatter that is
/// shared across threads *and* reconfigured must be wrapped in a lock such as
/// [`RwLock`](std::sync::RwLock).
///
/// # Examples
///
/// ```
/// use uri_formatter::{Formatter, Uri};
///
/// let uri = Uri::parse("http://www.xn--gwd-hna98db.pl/?kingkong=toto&foo=bar+baz")?;
///
/// let mut formatter = Formatter::new();
/// assert_eq!(
///     formatter.format(&uri)?,
///     "http://www.gwóźdź.pl/?kingkong=toto&foo=bar%20baz"
/// );
///
/// formatter.set_host_encoding("ascii")?;
/// formatter.set_query_encoding("rfc1738")?;
/// formatter.set_query_separator("&amp;");
/// assert_eq!(
///     formatter.format(&uri)?,
///     "http://www.xn--gwd-hna98db.pl/?kingkong=toto&amp;foo=bar+baz"
/// );
/// # Ok::<_, uri_formatter::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Formatter {
    config: FormatterConfig,
}

impl Formatter {
    /// Creates a formatter with the default configuration.
    #[must_use]
    pub fn new() -> Formatter {
        Formatter::default()
    }

    /// Creates a formatter with the given configuration.
    #[must_use]
    pub fn with_config(config: FormatterConfig) -> Formatter {
        Formatter { config }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Returns the host encoding.
    #[must_use]
    pub fn host_encoding(&self) -> HostEncoding {
        self.config.host_encoding
    }

    /// Returns the query encoding.
    #[must_use]
    pub fn query_encoding(&self) -> QueryEncoding {
        self.config.query_encoding
    }

    /// Returns the query separator.
    #[must_use]
    pub fn query_separator(&self) -> &str {
        &self.config.query_separator
    }

    /// Sets the host encoding from an [`HostEncoding`] or its name.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the name is unknown, in which case the
    /// configuration is left unchanged.
    pub fn set_host_encoding<T>(&mut self, encoding: T) -> Result<&mut Self, Error>
    where
        T: TryInto<HostEncoding>,
        Error: From<T::Error>,
    {
        let encoding = encoding.try_into().map_err(|e| rejected(e.into()))?;
        trace!(encoding = encoding.as_str(), "setting host encoding");
        self.config.host_encoding = encoding;
        Ok(self)
    }

    /// Sets the query encoding from a [`QueryEncoding`] or its name.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the name is unknown, in which case the
    /// configuration is left unchanged.
    pub fn set_query_encoding<T>(&mut self, encoding: T) -> Result<&mut Self, Error>
    where
        T: TryInto<QueryEncoding>,
        Error: From<T::Error>,
    {
        let encoding = encoding.try_into().map_err(|e| rejected(e.into()))?;
        trace!(encoding = encoding.as_str(), "setting query encoding");
        self.config.query_encoding = encoding;
        Ok(self)
    }

    /// Sets the string written between query pairs. Any string is accepted.
    pub fn set_query_separator(&mut self, separator: impl Into<String>) -> &mut Self {
        let separator = separator.into();
        trace!(separator = separator.as_str(), "setting query separator");
        self.config.query_separator = separator;
        self
    }

    /// Formats a URI or a URI component.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the value is not a URI component or if its host
    /// cannot be converted to the configured host encoding.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_formatter::{component::Scheme, Error, Formatter};
    ///
    /// let formatter = Formatter::new();
    /// assert_eq!(formatter.format(&Scheme::new("ftp").unwrap())?, "ftp");
    /// assert!(matches!(
    ///     formatter.format("http://example.com"),
    ///     Err(Error::UnsupportedComponent(_))
    /// ));
    /// # Ok::<_, Error>(())
    /// ```
    pub fn format<C: AsComponent + ?Sized>(&self, component: &C) -> Result<String, Error> {
        let Some(component) = component.as_component() else {
            let name = type_name::<C>();
            debug!(component = name, "rejecting unsupported component");
            return Err(Error::UnsupportedComponent(name));
        };

        Ok(match component {
            ComponentRef::Scheme(scheme) => scheme.as_str().to_owned(),
            ComponentRef::Userinfo(userinfo) => userinfo.literal().as_str().to_owned(),
            ComponentRef::Host(host) => self.format_host(host)?,
            ComponentRef::Port(port) => port.literal().to_owned(),
            ComponentRef::Path(path) => path.literal().as_str().to_owned(),
            ComponentRef::Query(query) => self.format_query(query),
            ComponentRef::Fragment(fragment) => fragment.literal().as_str().to_owned(),
            ComponentRef::Uri(uri) => self.format_uri(uri)?,
        })
    }

    /// Renders a host with the configured host encoding.
    ///
    /// The host is percent-decoded, converted label by label, then every
    /// character outside `reg-name` is percent-encoded again. Non-ASCII
    /// characters stay as they are in Unicode mode. IP literals are written
    /// as is.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a label cannot be converted.
    pub fn format_host(&self, host: &Host) -> Result<String, Error> {
        if host.kind() != HostKind::RegName {
            return Ok(host.literal().to_owned());
        }

        let decoded = host.decoded();
        Ok(match self.config.host_encoding {
            HostEncoding::Unicode => {
                EStr::<encoder::IRegName>::encode(&to_unicode(&decoded)?, false).into_owned()
            }
            HostEncoding::Ascii => {
                EStr::<encoder::RegName>::encode(&to_ascii(&decoded)?, false).into_owned()
            }
        })
    }

    /// Serializes a query with the configured query encoding and separator.
    #[must_use]
    pub fn format_query(&self, query: &Query) -> String {
        query.encode(self.config.query_encoding, &self.config.query_separator)
    }

    /// Renders a whole URI.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host cannot be converted.
    pub fn format_uri(&self, uri: &Uri) -> Result<String, Error> {
        let host = self.format_host(uri.host())?;
        let query = uri.query().map(|q| self.format_query(q));
        Ok(uri.assemble(&host, query.as_deref()))
    }
}

fn rejected(e: Error) -> Error {
    debug!(error = %e, "rejecting configuration value");
    e
}
