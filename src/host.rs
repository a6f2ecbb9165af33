//! Conversion of hosts between Unicode and ASCII-compatible form.
//!
//! A host is split on `'.'` into labels, and each label is converted on its
//! own with [Punycode]. IPv4 addresses and bracketed IP literals are never
//! touched.
//!
//! [Punycode]: https://datatracker.ietf.org/doc/html/rfc3492
//!
//! # Examples
//!
//! ```
//! use uri_formatter::host;
//!
//! assert_eq!(host::to_ascii("gwóźdź.pl")?, "xn--gwd-hna98db.pl");
//! assert_eq!(host::to_unicode("xn--gwd-hna98db.pl")?, "gwóźdź.pl");
//! assert_eq!(host::to_ascii("[::1]")?, "[::1]");
//! # Ok::<_, uri_formatter::HostError>(())
//! ```

use crate::{
    component::HostKind,
    error::{HostError, HostErrorKind},
    parse,
};
use idna::punycode;
use std::borrow::Cow;
use tracing::debug;

/// The prefix marking a Punycode label.
pub const ACE_PREFIX: &str = "xn--";

/// The maximum length of a label in octets.
pub const MAX_LABEL_LEN: usize = 63;

/// Converts a host to its ASCII-compatible form.
///
/// Labels containing non-ASCII characters are Punycode-encoded and prefixed
/// with `xn--`. An `xn--` label is validated and written the way its
/// decoded form encodes. Encoded labels are written in lowercase. Other
/// ASCII labels are kept as is.
///
/// # Errors
///
/// Returns `Err` if a label cannot be encoded, if an `xn--` label is not
/// valid Punycode, or if a label is longer than 63 octets once encoded.
pub fn to_ascii(host: &str) -> Result<Cow<'_, str>, HostError> {
    if is_ip_literal(host) {
        return Ok(Cow::Borrowed(host));
    }
    map_labels(host, |label| {
        let encoded = if label.is_ascii() {
            match strip_ace_prefix(label) {
                Some(body) => {
                    let decoded = decode_label(label, body)?;
                    Cow::Owned(encode_label(label, &decoded)?)
                }
                None => Cow::Borrowed(label),
            }
        } else {
            Cow::Owned(encode_label(label, label)?)
        };
        check_len(label, &encoded)?;
        Ok(match encoded {
            Cow::Owned(s) if s == label => Cow::Borrowed(label),
            encoded => encoded,
        })
    })
}

/// Converts a host to its Unicode form.
///
/// Labels starting with `xn--`, matched case-insensitively, are decoded.
/// Other labels are kept as is.
///
/// # Errors
///
/// Returns `Err` if an `xn--` label is not valid Punycode, decodes to
/// ASCII only, or does not encode back to itself.
pub fn to_unicode(host: &str) -> Result<Cow<'_, str>, HostError> {
    if is_ip_literal(host) {
        return Ok(Cow::Borrowed(host));
    }
    map_labels(host, |label| match strip_ace_prefix(label) {
        Some(body) => decode_label(label, body).map(Cow::Owned),
        None => Ok(Cow::Borrowed(label)),
    })
}

fn is_ip_literal(host: &str) -> bool {
    matches!(
        parse::parse_host(host),
        Ok(HostKind::Ipv4(_) | HostKind::Ipv6(_) | HostKind::IpvFuture)
    )
}

/// Applies `f` to every label, allocating only once a label changes.
fn map_labels<'a, F>(host: &'a str, mut f: F) -> Result<Cow<'a, str>, HostError>
where
    F: FnMut(&'a str) -> Result<Cow<'a, str>, HostError>,
{
    let mut out: Option<String> = None;
    let mut start = 0;

    for label in host.split('.') {
        let mapped = f(label)?;
        if let Some(buf) = out.as_mut() {
            buf.push('.');
            buf.push_str(&mapped);
        } else if let Cow::Owned(s) = mapped {
            // Everything before this label is unchanged, dot included.
            let mut buf = String::with_capacity(host.len() + 16);
            buf.push_str(&host[..start]);
            buf.push_str(&s);
            out = Some(buf);
        }
        start += label.len() + 1;
    }

    Ok(match out {
        Some(buf) => Cow::Owned(buf),
        None => Cow::Borrowed(host),
    })
}

fn strip_ace_prefix(label: &str) -> Option<&str> {
    let prefix = label.get(..ACE_PREFIX.len())?;
    prefix
        .eq_ignore_ascii_case(ACE_PREFIX)
        .then(|| &label[ACE_PREFIX.len()..])
}

fn encode_label(label: &str, unicode: &str) -> Result<String, HostError> {
    match punycode::encode_str(unicode) {
        Some(body) => Ok(format!("{ACE_PREFIX}{}", body.to_ascii_lowercase())),
        None => Err(reject(HostErrorKind::UnencodableLabel, label)),
    }
}

fn decode_label(label: &str, body: &str) -> Result<String, HostError> {
    let decoded = punycode::decode_to_string(body)
        .ok_or_else(|| reject(HostErrorKind::InvalidPunycode, label))?;
    if decoded.is_ascii() {
        return Err(reject(HostErrorKind::InvalidPunycode, label));
    }
    match punycode::encode_str(&decoded) {
        Some(reencoded) if reencoded.eq_ignore_ascii_case(body) => Ok(decoded),
        _ => Err(reject(HostErrorKind::InvalidPunycode, label)),
    }
}

fn check_len(label: &str, encoded: &str) -> Result<(), HostError> {
    if encoded.len() > MAX_LABEL_LEN {
        return Err(reject(HostErrorKind::LabelTooLong, label));
    }
    Ok(())
}

fn reject(kind: HostErrorKind, label: &str) -> HostError {
    debug!(?kind, label, "rejecting host label");
    HostError::new(kind, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        for host in ["example.com", "", "a..b", "example.com.", "127.0.0.1", "[::1]"] {
            assert!(matches!(to_ascii(host), Ok(Cow::Borrowed(h)) if h == host));
            assert!(matches!(to_unicode(host), Ok(Cow::Borrowed(h)) if h == host));
        }
    }

    #[test]
    fn mixed_labels() {
        assert_eq!(
            to_ascii("www.gwóźdź.pl").unwrap(),
            "www.xn--gwd-hna98db.pl"
        );
        assert_eq!(
            to_unicode("www.XN--gwd-hna98db.pl").unwrap(),
            "www.gwóźdź.pl"
        );
        assert_eq!(to_ascii("münchen.de.").unwrap(), "xn--mnchen-3ya.de.");
    }

    #[test]
    fn canonical_ace_label() {
        assert_eq!(to_ascii("XN--gwd-HNA98DB.pl").unwrap(), "xn--gwd-hna98db.pl");
        assert_eq!(to_ascii("XN--GWD-HNA98DB.pl").unwrap(), "xn--gwd-hna98db.pl");
        assert_eq!(to_ascii("Gwóźdź.pl").unwrap(), "xn--gwd-hna98db.pl");
        assert!(matches!(
            to_ascii("xn--gwd-hna98db.pl"),
            Ok(Cow::Borrowed(_))
        ));
    }

    #[test]
    fn invalid_punycode() {
        for host in ["xn--abc-", "xn--", "example.xn--!!", "XN--ls8h-.com"] {
            let e = to_unicode(host).unwrap_err();
            assert_eq!(e.kind(), HostErrorKind::InvalidPunycode, "{host}");
            assert!(to_ascii(host).is_err(), "{host}");
        }
    }

    #[test]
    fn label_too_long() {
        let host = format!("{}.com", "a".repeat(64));
        let e = to_ascii(&host).unwrap_err();
        assert_eq!(e.kind(), HostErrorKind::LabelTooLong);
        assert_eq!(e.label(), "a".repeat(64));

        let host = format!("{}.com", "a".repeat(63));
        assert_eq!(to_ascii(&host).unwrap(), host);

        let host = "ó".repeat(70);
        assert_eq!(
            to_ascii(&host).unwrap_err().kind(),
            HostErrorKind::LabelTooLong
        );
    }
}
