//! Character tables from RFC 3986.
//!
//! The predefined table constants in this module are documented with
//! the ABNF notation of [RFC 5234].
//!
//! A table lists the characters that may appear *unencoded*; every other
//! character is percent-encoded by [`encode`]. The percent sign itself can
//! never be allowed, so encoded output always decodes back to its input.
//!
//! [RFC 5234]: https://datatracker.ietf.org/doc/html/rfc5234
//! [`encode`]: super::encode

const MASK_NON_ASCII: u64 = 1;
const MASK_UNENCODED_ASCII: u64 = !MASK_NON_ASCII;

/// A table specifying the characters allowed unencoded in a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table(u64, u64);

impl Table {
    /// Creates a table that only allows the given unencoded bytes.
    ///
    /// # Panics
    ///
    /// Panics if any of the bytes is not ASCII or equals `0` or `b'%'`.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut table = 0;
        while let [cur, rem @ ..] = bytes {
            assert!(
                !matches!(cur, 0 | b'%' | 128..),
                "cannot allow non-ASCII byte, 0, or %"
            );
            table |= 1u128.wrapping_shl(*cur as u32);
            bytes = rem;
        }
        Self(table as u64, (table >> 64) as u64)
    }

    /// Combines two tables into one.
    ///
    /// Returns a new table that allows all the characters allowed
    /// by `self` or by `other`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0, self.1 | other.1)
    }

    /// Marks this table as allowing every non-ASCII character unencoded.
    ///
    /// This is how Unicode hosts are rendered: the host codec decides what
    /// a non-ASCII label becomes, not the percent-codec.
    #[must_use]
    pub const fn or_non_ascii(self) -> Self {
        Self(self.0 | MASK_NON_ASCII, self.1)
    }

    /// Subtracts from this table.
    ///
    /// Returns a new table that allows all the characters allowed
    /// by `self` but not allowed by `other`.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self(self.0 & !other.0, self.1 & !other.1)
    }

    /// Checks whether the table is a subset of another, i.e., `other`
    /// allows at least all the characters allowed by `self`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & other.0 == self.0 && self.1 & other.1 == self.1
    }

    #[inline]
    pub(crate) const fn allows_ascii(self, x: u8) -> bool {
        let table = if x < 64 {
            self.0 & MASK_UNENCODED_ASCII
        } else if x < 128 {
            self.1
        } else {
            0
        };
        table & 1u64.wrapping_shl(x as u32) != 0
    }

    /// Checks whether non-ASCII characters are allowed by the table.
    #[inline]
    #[must_use]
    pub const fn allows_non_ascii(self) -> bool {
        self.0 & MASK_NON_ASCII != 0
    }

    /// Checks whether the given unencoded character is allowed by the table.
    #[inline]
    #[must_use]
    pub const fn allows(self, ch: char) -> bool {
        if ch.is_ascii() {
            self.allows_ascii(ch as u8)
        } else {
            self.allows_non_ascii()
        }
    }

    /// Checks whether every byte of the given ASCII string is allowed by the table.
    pub(crate) const fn validate(self, s: &[u8]) -> bool {
        let mut i = 0;
        while i < s.len() {
            if !self.allows_ascii(s[i]) {
                return false;
            }
            i += 1;
        }
        true
    }
}

const fn new(bytes: &[u8]) -> Table {
    Table::new(bytes)
}

/// `ALPHA = %x41-5A / %x61-7A`
pub const ALPHA: Table = new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `DIGIT = %x30-39`
pub const DIGIT: Table = new(b"0123456789");

/// `HEXDIG = DIGIT / "A" / "B" / "C" / "D" / "E" / "F"`
pub const HEXDIG: Table = DIGIT.or(new(b"ABCDEFabcdef"));

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub const SCHEME: Table = ALPHA.or(DIGIT).or(new(b"+-."));

/// `userinfo = *( unreserved / pct-encoded / sub-delims / ":" )`
pub const USERINFO: Table = UNRESERVED.or(SUB_DELIMS).or(new(b":"));

/// The user name inside `userinfo`: `userinfo` without `":"`.
pub const USER: Table = USERINFO.sub(new(b":"));

/// `IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`
pub const IPV_FUTURE: Table = UNRESERVED.or(SUB_DELIMS).or(new(b":"));

/// `reg-name = *( unreserved / pct-encoded / sub-delims )`
pub const REG_NAME: Table = UNRESERVED.or(SUB_DELIMS);

/// `reg-name`, additionally allowing non-ASCII characters.
pub const IREG_NAME: Table = REG_NAME.or_non_ascii();

/// `path = *( pchar / "/" )`
pub const PATH: Table = PCHAR.or(new(b"/"));

/// `pchar = unreserved / pct-encoded / sub-delims / ":" / "@"`
pub const PCHAR: Table = UNRESERVED.or(SUB_DELIMS).or(new(b":@"));

/// `query = *( pchar / "/" / "?" )`
pub const QUERY: Table = PCHAR.or(new(b"/?"));

/// A key or a value inside a query pair: `query` without `"&" / "=" / "+"`.
pub const QUERY_DATA: Table = QUERY.sub(new(b"&=+"));

/// A value inside a query pair: `query` without `"&" / "+"`.
///
/// Only the first `'='` of a pair splits it, so a value may keep `'='`.
pub const QUERY_VALUE: Table = QUERY.sub(new(b"&+"));

/// `fragment = *( pchar / "/" / "?" )`
pub const FRAGMENT: Table = QUERY;

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub const UNRESERVED: Table = ALPHA.or(DIGIT).or(new(b"-._~"));

/// `reserved = gen-delims / sub-delims`
pub const RESERVED: Table = GEN_DELIMS.or(SUB_DELIMS);

/// `gen-delims = ":" / "/" / "?" / "#" / "[" / "]" / "@"`
pub const GEN_DELIMS: Table = new(b":/?#[]@");

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")"
///             / "*" / "+" / "," / ";" / "="`
pub const SUB_DELIMS: Table = new(b"!$&'()*+,;=");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_data_excludes_pair_delimiters() {
        assert!(QUERY_DATA.is_subset(QUERY));
        for ch in ['&', '=', '+', '#', '%', ' '] {
            assert!(!QUERY_DATA.allows(ch), "{ch:?}");
        }
        for ch in ['a', '~', '/', '?', ':', '@', ';', ','] {
            assert!(QUERY_DATA.allows(ch), "{ch:?}");
        }
    }

    #[test]
    fn query_value_keeps_equals() {
        assert!(QUERY_DATA.is_subset(QUERY_VALUE));
        assert!(QUERY_VALUE.allows('='));
        assert!(!QUERY_VALUE.allows('&'));
        assert!(!QUERY_VALUE.allows('+'));
    }

    #[test]
    fn non_ascii() {
        assert!(!REG_NAME.allows('ó'));
        assert!(IREG_NAME.allows('ó'));
        assert!(IREG_NAME.allows('z'));
        assert!(!IREG_NAME.allows('/'));
        // The non-ASCII flag shares a slot with NUL, which must stay disallowed.
        assert!(!IREG_NAME.allows('\0'));
    }

    #[test]
    fn validate() {
        assert!(SCHEME.validate(b"svn+ssh"));
        assert!(!SCHEME.validate(b"a b"));
        assert!(!SCHEME.validate("ó".as_bytes()));
    }
}
