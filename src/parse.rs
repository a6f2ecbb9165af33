use crate::{
    component::{Fragment, Host, HostKind, Path, Port, Query, Scheme, Userinfo},
    error::{ParseError, ParseErrorKind},
    pct_enc::{self, table, Table},
    uri::Parts,
};
use core::ops::{Deref, DerefMut};
use std::net::{Ipv4Addr, Ipv6Addr};

type Result<T> = core::result::Result<T, ParseError>;

/// Returns immediately with an error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(ParseError {
            index: $index,
            kind: ParseErrorKind::$kind,
        })
    };
}

pub(crate) fn parse(s: &str) -> Result<Parts> {
    let mut parser = Parser {
        src: s,
        reader: Reader::new(s.as_bytes()),
        out: Parts::default(),
    };
    parser.parse_from_scheme()?;
    Ok(parser.out)
}

/// Classifies a standalone host, validating it if it is bracketed.
pub(crate) fn parse_host(s: &str) -> Result<HostKind> {
    if s.is_empty() {
        return Ok(HostKind::Empty);
    }
    let mut reader = Reader::new(s.as_bytes());
    match reader.read_ip_literal()? {
        Some(kind) if !reader.has_remaining() => Ok(kind),
        Some(_) => err!(reader.pos, UnexpectedCharOrEnd),
        None => Ok(v4_or_reg_name(s.as_bytes())),
    }
}

pub(crate) fn parse_v4(bytes: &[u8]) -> Option<Ipv4Addr> {
    let mut reader = Reader::new(bytes);
    match reader.read_v4() {
        Some(addr) if !reader.has_remaining() => Some(addr.into()),
        _ => None,
    }
}

fn v4_or_reg_name(bytes: &[u8]) -> HostKind {
    match parse_v4(bytes) {
        Some(addr) => HostKind::Ipv4(addr),
        None => HostKind::RegName,
    }
}

/// URI parser.
///
/// Splits the input on the RFC 3986 delimiters without validating the
/// characters of each component. Only the scheme, the port and bracketed
/// hosts are checked, since nothing downstream can make sense of them
/// otherwise.
///
/// # Invariants
///
/// `pos <= len`, `pos` is non-decreasing and on the boundary of a UTF-8 code point.
struct Parser<'a> {
    src: &'a str,
    reader: Reader<'a>,
    out: Parts,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Deref for Parser<'a> {
    type Target = Reader<'a>;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

impl DerefMut for Parser<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reader
    }
}

enum Seg {
    // *1":" 1*4HEXDIG
    Normal(u16, bool),
    // "::"
    Ellipsis,
    // *1":" 1*4HEXDIG "."
    MaybeV4(bool),
    // ":"
    SingleColon,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.len()
    }

    fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    // Any call to this method must keep the invariants.
    fn skip(&mut self, n: usize) {
        // INVARIANT: `pos` is non-decreasing.
        self.pos += n;
        debug_assert!(self.pos <= self.len());
    }

    /// Returns the index of the first of `delims` at or after `pos`, or `len`.
    fn find(&self, delims: &[u8]) -> usize {
        self.bytes[self.pos..]
            .iter()
            .position(|x| delims.contains(x))
            .map_or(self.len(), |i| self.pos + i)
    }

    fn read(&mut self, table: Table) -> bool {
        let start = self.pos;
        while let Some(x) = self.peek(0) {
            if !table.allows_ascii(x) {
                break;
            }
            // INVARIANT: Skipping an ASCII byte is fine.
            self.skip(1);
        }
        self.pos > start
    }

    fn read_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            // INVARIANT: The remaining bytes start with `s` so it's fine to skip `s.len()`.
            self.skip(s.len());
            true
        } else {
            false
        }
    }

    fn read_v6(&mut self) -> Option<[u16; 8]> {
        let mut segs = [0; 8];
        let mut ellipsis_idx = 8;

        let mut i = 0;
        while i < 8 {
            match self.read_v6_segment() {
                Some(Seg::Normal(seg, colon)) => {
                    if colon == (i == 0 || i == ellipsis_idx) {
                        // Leading colon, triple colons, or no colon.
                        return None;
                    }
                    segs[i] = seg;
                    i += 1;
                }
                Some(Seg::Ellipsis) => {
                    if ellipsis_idx != 8 {
                        // Multiple ellipses.
                        return None;
                    }
                    ellipsis_idx = i;
                }
                Some(Seg::MaybeV4(colon)) => {
                    if i > 6 || colon == (i == ellipsis_idx) {
                        // Not enough space, triple colons, or no colon.
                        return None;
                    }
                    let octets = self.read_v4()?.to_be_bytes();
                    segs[i] = u16::from_be_bytes([octets[0], octets[1]]);
                    segs[i + 1] = u16::from_be_bytes([octets[2], octets[3]]);
                    i += 2;
                    break;
                }
                Some(Seg::SingleColon) => return None,
                None => break,
            }
        }

        if ellipsis_idx == 8 {
            // No ellipsis.
            if i != 8 {
                // Too short.
                return None;
            }
        } else if i == 8 {
            // Eliding nothing.
            return None;
        } else {
            // Shift the segments after the ellipsis to the right.
            for j in (ellipsis_idx..i).rev() {
                segs[8 - (i - j)] = segs[j];
                segs[j] = 0;
            }
        }

        Some(segs)
    }

    fn read_v6_segment(&mut self) -> Option<Seg> {
        let colon = self.read_str(":");
        let Some(first) = self.peek(0) else {
            return colon.then_some(Seg::SingleColon);
        };

        let mut x = match pct_enc::decode_hexdigit(first) {
            Some(v) => v as u16,
            _ => {
                return colon.then(|| {
                    if first == b':' {
                        // INVARIANT: Skipping ":" is fine.
                        self.skip(1);
                        Seg::Ellipsis
                    } else {
                        Seg::SingleColon
                    }
                });
            }
        };
        let mut i = 1;

        while i < 4 {
            let Some(b) = self.peek(i) else {
                // INVARIANT: Skipping `i` hexadecimal digits is fine.
                self.skip(i);
                return None;
            };
            match pct_enc::decode_hexdigit(b) {
                Some(v) => {
                    x = (x << 4) | v as u16;
                    i += 1;
                }
                _ if b == b'.' => return Some(Seg::MaybeV4(colon)),
                _ => break,
            }
        }
        // INVARIANT: Skipping `i` hexadecimal digits is fine.
        self.skip(i);
        Some(Seg::Normal(x, colon))
    }

    fn read_v4(&mut self) -> Option<u32> {
        let mut addr = self.read_v4_octet()? << 24;
        for i in (0..3).rev() {
            if !self.read_str(".") {
                return None;
            }
            addr |= self.read_v4_octet()? << (i * 8);
        }
        Some(addr)
    }

    fn read_v4_octet(&mut self) -> Option<u32> {
        let mut res = self.peek_digit(0)?;
        if res == 0 {
            // INVARIANT: Skipping "0" is fine.
            self.skip(1);
            return Some(0);
        }

        for i in 1..3 {
            let Some(x) = self.peek_digit(i) else {
                // INVARIANT: Skipping `i` digits is fine.
                self.skip(i);
                return Some(res);
            };
            res = res * 10 + x;
        }
        // INVARIANT: Skipping 3 digits is fine.
        self.skip(3);

        u8::try_from(res).is_ok().then_some(res)
    }

    fn peek_digit(&self, i: usize) -> Option<u32> {
        self.peek(i).and_then(|x| (x as char).to_digit(10))
    }

    fn read_ip_literal(&mut self) -> Result<Option<HostKind>> {
        if !self.read_str("[") {
            return Ok(None);
        }

        let start = self.pos;

        let kind = if let Some(segs) = self.read_v6() {
            HostKind::Ipv6(Ipv6Addr::from(segs))
        } else if self.pos == start {
            self.read_ipv_future()?;
            HostKind::IpvFuture
        } else {
            err!(start, InvalidIpLiteral);
        };

        if !self.read_str("]") {
            err!(self.pos, UnexpectedCharOrEnd);
        }
        Ok(Some(kind))
    }

    fn read_ipv_future(&mut self) -> Result<()> {
        if let Some(b'v' | b'V') = self.peek(0) {
            // INVARIANT: Skipping "v" or "V" is fine.
            self.skip(1);
            if self.read(table::HEXDIG) && self.read_str(".") && self.read(table::IPV_FUTURE) {
                return Ok(());
            }
        }
        err!(self.pos, InvalidIpLiteral);
    }
}

impl Parser<'_> {
    fn parse_from_scheme(&mut self) -> Result<()> {
        let end = self.find(b":/?#");

        if self.bytes.get(end) == Some(&b':') {
            // A colon before any other delimiter can only end a scheme.
            match Scheme::new(&self.src[..end]) {
                Some(scheme) => self.out.scheme = Some(scheme),
                None => err!(0, InvalidScheme),
            }
            // INVARIANT: Skipping the scheme and ":" is fine.
            self.skip(end + 1);
        }

        if self.read_str("//") {
            self.parse_from_authority()?;
        }
        self.parse_from_path()
    }

    fn parse_from_authority(&mut self) -> Result<()> {
        let start = self.pos;
        let end = self.find(b"/?#");
        let authority = &self.src[start..end];

        // The last "@" ends the userinfo.
        if let Some(i) = authority.rfind('@') {
            self.out.userinfo = Some(Userinfo::from_literal(&authority[..i]));
            // INVARIANT: Skipping the userinfo and "@" is fine.
            self.skip(i + 1);
        }

        let host_start = self.pos;
        let (host_end, kind) = match self.read_ip_literal()? {
            Some(kind) => {
                if self.pos != end && self.peek(0) != Some(b':') {
                    err!(self.pos, UnexpectedCharOrEnd);
                }
                (self.pos, kind)
            }
            None => {
                let host_end = self.src[host_start..end]
                    .rfind(':')
                    .map_or(end, |i| host_start + i);
                let host = &self.bytes[host_start..host_end];
                let kind = if host.is_empty() {
                    HostKind::Empty
                } else {
                    v4_or_reg_name(host)
                };
                (host_end, kind)
            }
        };
        self.out.host = Host::new_validated(&self.src[host_start..host_end], kind);

        // INVARIANT: `host_end` is not before `pos`.
        let n = host_end - self.pos;
        self.skip(n);

        if self.read_str(":") {
            self.parse_port(end)?;
        }

        // INVARIANT: `end` is not before `pos`.
        let n = end - self.pos;
        self.skip(n);
        Ok(())
    }

    fn parse_port(&mut self, end: usize) -> Result<()> {
        let start = self.pos;
        let digits = &self.src[start..end];
        if digits.is_empty() {
            // An empty port is allowed and means no port.
            return Ok(());
        }

        if let Some(i) = digits.bytes().position(|x| !x.is_ascii_digit()) {
            err!(start + i, InvalidPort);
        }
        match digits.parse::<u16>() {
            Ok(value) => self.out.port = Some(Port::new_validated(digits, value)),
            Err(_) => err!(start, InvalidPort),
        }
        Ok(())
    }

    fn parse_from_path(&mut self) -> Result<()> {
        let start = self.pos;
        let end = self.find(b"?#");
        self.out.path = Path::from_literal(&self.src[start..end]);
        // INVARIANT: Skipping the path is fine.
        self.skip(end - start);

        if self.read_str("?") {
            let start = self.pos;
            let end = self.find(b"#");
            self.out.query = Some(Query::parse(&self.src[start..end]));
            // INVARIANT: Skipping the query is fine.
            self.skip(end - start);
        }

        if self.read_str("#") {
            self.out.fragment = Some(Fragment::from_literal(&self.src[self.pos..]));
            // INVARIANT: Skipping the rest is fine.
            let n = self.len() - self.pos;
            self.skip(n);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4() {
        assert_eq!(parse_v4(b"127.0.0.1"), Some(Ipv4Addr::LOCALHOST));
        assert_eq!(parse_v4(b"255.255.255.255"), Some(Ipv4Addr::BROADCAST));
        assert_eq!(parse_v4(b"256.0.0.1"), None);
        assert_eq!(parse_v4(b"1.2.3"), None);
        assert_eq!(parse_v4(b"1.2.3.4.5"), None);
        // Leading zeros make a registered name.
        assert_eq!(parse_v4(b"01.2.3.4"), None);
    }

    #[test]
    fn host_kinds() {
        assert_eq!(parse_host(""), Ok(HostKind::Empty));
        assert_eq!(parse_host("example.com"), Ok(HostKind::RegName));
        assert_eq!(
            parse_host("[::1]"),
            Ok(HostKind::Ipv6(Ipv6Addr::LOCALHOST))
        );
        assert_eq!(parse_host("[v1.fe80::a+en1]"), Ok(HostKind::IpvFuture));
        assert_eq!(
            parse_host("[::1"),
            Err(ParseError {
                index: 4,
                kind: ParseErrorKind::UnexpectedCharOrEnd
            })
        );
        assert_eq!(
            parse_host("[::1]x"),
            Err(ParseError {
                index: 5,
                kind: ParseErrorKind::UnexpectedCharOrEnd
            })
        );
        assert_eq!(
            parse_host("[1::2::3]"),
            Err(ParseError {
                index: 1,
                kind: ParseErrorKind::InvalidIpLiteral
            })
        );
    }
}
