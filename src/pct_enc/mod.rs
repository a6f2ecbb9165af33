//! Percent-encoding utilities.
//!
//! # Leniency
//!
//! Decoding never fails. A `%` that is not followed by two hexadecimal
//! digits is passed through unchanged, so `"100%"` decodes to `"100%"` and
//! `"%zz"` to `"%zz"`. Encoding, on the other hand, always encodes `%`, so
//! [`decode`] is the exact inverse of [`encode`] for every string.
//!
//! # Space as plus
//!
//! The RFC 1738 convention writes a space as `+`. With `space_as_plus` set,
//! [`encode`] writes `' '` as `+` and a literal `+` as `%2B`, and
//! [`decode`] with `plus_as_space` set reads `+` as a space. Without the
//! flag, `+` is an ordinary character in both directions.

pub mod encoder;
pub mod table;

pub use encoder::Encoder;
pub use table::Table;

use core::{cmp::Ordering, fmt, hash, iter::FusedIterator, marker::PhantomData, str};
use ref_cast::{ref_cast_custom, RefCastCustom};
use std::borrow::Cow;

/// Percent-encoded string slices.
///
/// # Type parameter
///
/// The `EStr<E>` type is parameterized over a type `E` that implements [`Encoder`].
/// The associated constant `E::TABLE` tells which characters the component
/// keeps unencoded. Because decoding is lenient, any string slice is a valid
/// `EStr` slice; the parameter only records which component it came from.
///
/// # Comparison
///
/// `EStr` slices are compared [lexicographically](Ord#lexicographical-comparison)
/// by their byte values. Normalization is **not** performed prior to comparison.
///
/// # Examples
///
/// ```
/// use uri_formatter::pct_enc::{encoder::Query, EStr};
///
/// let query = EStr::<Query>::new("name=%E5%BC%A0%E4%B8%89&lang=Rust");
/// let pairs: Vec<_> = query
///     .split('&')
///     .map(|s| s.split_once('=').unwrap_or((s, EStr::EMPTY)))
///     .map(|(k, v)| (k.decode().to_string_lossy(), v.decode().to_string_lossy()))
///     .collect();
/// assert_eq!(pairs[0].1, "张三");
/// assert_eq!(pairs[1].1, "Rust");
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr<E: Encoder> {
    encoder: PhantomData<E>,
    inner: str,
}

impl<E: Encoder> EStr<E> {
    /// Converts a string slice to an `EStr` slice.
    #[ref_cast_custom]
    #[must_use]
    pub const fn new(s: &str) -> &Self;

    /// An empty `EStr` slice.
    pub const EMPTY: &'static Self = Self::new("");

    /// Percent-encodes a string with the table of `E`.
    ///
    /// See [`encode`](self::encode) for how `space_as_plus` is handled.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_formatter::pct_enc::{encoder::{QueryKey, QueryValue}, EStr};
    ///
    /// assert_eq!(EStr::<QueryKey>::encode("a=b c", false), "a%3Db%20c");
    /// assert_eq!(EStr::<QueryValue>::encode("a=b c", true), "a=b+c");
    /// ```
    #[must_use]
    pub fn encode(raw: &str, space_as_plus: bool) -> Cow<'_, str> {
        self::encode(raw, E::TABLE, space_as_plus)
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length of the `EStr` slice in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the `EStr` slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Checks whether the `EStr` slice is unencoded, i.e., does not contain `'%'`.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_formatter::pct_enc::{encoder::Path, EStr};
    ///
    /// assert!(EStr::<Path>::new("Hello!").is_unencoded());
    /// assert!(!EStr::<Path>::new("%C2%A1Hola%21").is_unencoded());
    /// ```
    #[must_use]
    pub fn is_unencoded(&self) -> bool {
        !self.inner.contains('%')
    }

    /// Returns an iterator used to decode the `EStr` slice.
    ///
    /// Always **split before decoding**, as otherwise the data may be
    /// mistaken for component delimiters.
    ///
    /// Note that the iterator will **not** decode `U+002B` (+) as `0x20` (space).
    /// Use [`decode_plus_as_space`](Self::decode_plus_as_space) for that.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_formatter::pct_enc::{encoder::Path, EStr};
    ///
    /// let dec = EStr::<Path>::new("%C2%A1Hola%21").decode();
    /// assert_eq!(*dec.clone().to_bytes(), [0xc2, 0xa1, 0x48, 0x6f, 0x6c, 0x61, 0x21]);
    /// assert_eq!(dec.to_string().unwrap(), "¡Hola!");
    /// ```
    pub fn decode(&self) -> Decode<'_> {
        Decode::new(&self.inner, false)
    }

    /// Returns an iterator used to decode the `EStr` slice, reading `+` as a space.
    pub fn decode_plus_as_space(&self) -> Decode<'_> {
        Decode::new(&self.inner, true)
    }

    /// Returns an iterator over subslices of the `EStr` slice separated by the given delimiter.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_formatter::pct_enc::{encoder::Path, EStr};
    ///
    /// assert!(EStr::<Path>::new("a,b,c").split(',').eq(["a", "b", "c"]));
    /// assert!(EStr::<Path>::new(",").split(',').eq(["", ""]));
    /// assert!(EStr::<Path>::EMPTY.split(',').eq([""]));
    /// ```
    pub fn split(&self, delim: char) -> Split<'_, E> {
        assert!(
            delim.is_ascii() && table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        Split {
            inner: self.inner.split(delim),
            encoder: PhantomData,
        }
    }

    /// Splits the `EStr` slice on the first occurrence of the given delimiter and
    /// returns prefix before delimiter and suffix after delimiter.
    ///
    /// Returns `None` if the delimiter is not found.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    #[must_use]
    pub fn split_once(&self, delim: char) -> Option<(&Self, &Self)> {
        assert!(
            delim.is_ascii() && table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        self.inner
            .split_once(delim)
            .map(|(a, b)| (Self::new(a), Self::new(b)))
    }

    /// Splits the `EStr` slice on the last occurrence of the given delimiter and
    /// returns prefix before delimiter and suffix after delimiter.
    ///
    /// Returns `None` if the delimiter is not found.
    ///
    /// # Panics
    ///
    /// Panics if the delimiter is not a [reserved] character.
    ///
    /// [reserved]: https://datatracker.ietf.org/doc/html/rfc3986#section-2.2
    #[must_use]
    pub fn rsplit_once(&self, delim: char) -> Option<(&Self, &Self)> {
        assert!(
            delim.is_ascii() && table::RESERVED.allows(delim),
            "splitting with non-reserved character"
        );
        self.inner
            .rsplit_once(delim)
            .map(|(a, b)| (Self::new(a), Self::new(b)))
    }
}

impl<E: Encoder> AsRef<str> for EStr<E> {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl<E: Encoder> PartialEq for EStr<E> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<E: Encoder> PartialEq<str> for EStr<E> {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl<E: Encoder> PartialEq<&str> for EStr<E> {
    fn eq(&self, other: &&str) -> bool {
        &self.inner == *other
    }
}

impl<E: Encoder> PartialEq<EStr<E>> for str {
    fn eq(&self, other: &EStr<E>) -> bool {
        self == &other.inner
    }
}

impl<E: Encoder> Eq for EStr<E> {}

impl<E: Encoder> hash::Hash for EStr<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<E: Encoder> PartialOrd for EStr<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Encoder> Ord for EStr<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl<E: Encoder> Default for &EStr<E> {
    /// Creates an empty `EStr` slice.
    fn default() -> Self {
        EStr::EMPTY
    }
}

impl<E: Encoder> fmt::Debug for EStr<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<E: Encoder> fmt::Display for EStr<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

pub(crate) const fn is_hexdig(x: u8) -> bool {
    OCTET_TABLE_LO[x as usize] != 0xff
}

pub(crate) const fn is_hexdig_pair(hi: u8, lo: u8) -> bool {
    is_hexdig(hi) && is_hexdig(lo)
}

pub(crate) fn decode_hexdigit(x: u8) -> Option<u8> {
    let v = OCTET_TABLE_LO[x as usize];
    (v != 0xff).then_some(v)
}

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(is_hexdig_pair(hi, lo));
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

/// Percent-encodes a string with the given table.
///
/// Every character that `table` does not [allow] is replaced by its
/// UTF-8 bytes, each written as `%XX` with uppercase hexadecimal digits.
/// With `space_as_plus` set, `' '` is written as `+` and `+` as `%2B`.
///
/// This function allocates only when something needs encoding.
///
/// [allow]: Table::allows
///
/// # Examples
///
/// ```
/// use uri_formatter::pct_enc::{encode, table::QUERY_DATA};
///
/// assert_eq!(encode("bar baz", QUERY_DATA, false), "bar%20baz");
/// assert_eq!(encode("bar baz", QUERY_DATA, true), "bar+baz");
/// assert_eq!(encode("1+1", QUERY_DATA, true), "1%2B1");
/// assert_eq!(encode("gwóźdź", QUERY_DATA, false), "gw%C3%B3%C5%BAd%C5%BA");
/// ```
pub fn encode(raw: &str, table: Table, space_as_plus: bool) -> Cow<'_, str> {
    let needs_encoding =
        |ch: char| !table.allows(ch) || (space_as_plus && matches!(ch, ' ' | '+'));

    let Some(i) = raw.find(needs_encoding) else {
        return Cow::Borrowed(raw);
    };

    let mut buf = String::with_capacity(raw.len() + 16);
    buf.push_str(&raw[..i]);

    for ch in raw[i..].chars() {
        if space_as_plus && ch == ' ' {
            buf.push('+');
        } else if needs_encoding(ch) {
            for &x in ch.encode_utf8(&mut [0; 4]).as_bytes() {
                buf.push_str(encode_byte(x));
            }
        } else {
            buf.push(ch);
        }
    }
    Cow::Owned(buf)
}

/// Returns an iterator used to decode a percent-encoded string.
///
/// With `plus_as_space` set, `+` is decoded as a space. `%2B` is always
/// decoded as `+`. A `%` that does not start a valid octet is kept as is.
///
/// # Examples
///
/// ```
/// use uri_formatter::pct_enc::decode;
///
/// assert_eq!(decode("bar+baz", false).to_string_lossy(), "bar+baz");
/// assert_eq!(decode("bar+baz", true).to_string_lossy(), "bar baz");
/// assert_eq!(decode("a%2Bb", true).to_string_lossy(), "a+b");
/// assert_eq!(decode("100%", false).to_string_lossy(), "100%");
/// ```
pub fn decode(encoded: &str, plus_as_space: bool) -> Decode<'_> {
    Decode::new(encoded, plus_as_space)
}

/// An iterator used to decode a percent-encoded string.
///
/// This struct is created by [`decode`] and [`EStr::decode`]. Normally you'll use
/// the methods below instead of iterating over a `Decode` manually.
///
/// See the [`DecodedChunk`] type for documentation of the items yielded by this iterator.
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    source: &'a str,
    plus_as_space: bool,
}

/// An item returned by the [`Decode`] iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodedChunk<'a> {
    /// An unencoded subslice.
    ///
    /// A stray `%` and a `+` read as a space are also yielded this way.
    Unencoded(&'a str),
    /// A percent-encoded octet, decoded (for example, `"%20"` decoded as `0x20`).
    PctDecoded(u8),
}

impl<'a> Decode<'a> {
    pub(crate) fn new(source: &'a str, plus_as_space: bool) -> Self {
        Self {
            source,
            plus_as_space,
        }
    }

    fn is_special(&self, x: u8) -> bool {
        x == b'%' || (self.plus_as_space && x == b'+')
    }

    /// Returns the whole source if decoding would leave it unchanged.
    fn borrow_all(&self) -> Option<&'a str> {
        (!self.source.bytes().any(|x| self.is_special(x))).then_some(self.source)
    }

    fn decode_to_vec(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.source.len());
        for chunk in self {
            match chunk {
                DecodedChunk::Unencoded(s) => buf.extend_from_slice(s.as_bytes()),
                DecodedChunk::PctDecoded(x) => buf.push(x),
            }
        }
        buf
    }

    /// Decodes the slice to bytes.
    ///
    /// This method allocates only when the slice contains anything to decode.
    #[must_use]
    pub fn to_bytes(self) -> Cow<'a, [u8]> {
        match self.borrow_all() {
            Some(s) => Cow::Borrowed(s.as_bytes()),
            None => Cow::Owned(self.decode_to_vec()),
        }
    }

    /// Attempts to decode the slice to a string.
    ///
    /// This method allocates only when the slice contains anything to decode.
    ///
    /// # Errors
    ///
    /// Returns `Err` containing the decoded bytes if they are not valid UTF-8.
    pub fn to_string(self) -> Result<Cow<'a, str>, Vec<u8>> {
        if let Some(s) = self.borrow_all() {
            return Ok(Cow::Borrowed(s));
        }
        String::from_utf8(self.decode_to_vec())
            .map(Cow::Owned)
            .map_err(|e| e.into_bytes())
    }

    /// Decodes the slice to a string, replacing any invalid UTF-8 sequences with
    /// [`U+FFFD REPLACEMENT CHARACTER`][U+FFFD].
    ///
    /// [U+FFFD]: char::REPLACEMENT_CHARACTER
    ///
    /// This method allocates only when the slice contains anything to decode.
    #[must_use]
    pub fn to_string_lossy(self) -> Cow<'a, str> {
        if let Some(s) = self.borrow_all() {
            return Cow::Borrowed(s);
        }
        match String::from_utf8(self.decode_to_vec()) {
            Ok(s) => Cow::Owned(s),
            Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        }
    }
}

impl<'a> Iterator for Decode<'a> {
    type Item = DecodedChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.source.as_bytes();
        let (&first, rem) = bytes.split_first()?;

        if first == b'%' {
            if let [hi, lo, ..] = *rem {
                if is_hexdig_pair(hi, lo) {
                    self.source = &self.source[3..];
                    return Some(DecodedChunk::PctDecoded(decode_octet(hi, lo)));
                }
            }
            // Not an octet: the "%" stands for itself.
            let s;
            (s, self.source) = self.source.split_at(1);
            return Some(DecodedChunk::Unencoded(s));
        }

        if first == b'+' && self.plus_as_space {
            self.source = &self.source[1..];
            return Some(DecodedChunk::Unencoded(" "));
        }

        let i = bytes
            .iter()
            .position(|&x| self.is_special(x))
            .unwrap_or(bytes.len());
        let s;
        (s, self.source) = self.source.split_at(i);
        Some(DecodedChunk::Unencoded(s))
    }
}

impl FusedIterator for Decode<'_> {}

/// An iterator over subslices of an [`EStr`] slice separated by a delimiter.
///
/// This struct is created by [`EStr::split`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Split<'a, E: Encoder> {
    inner: str::Split<'a, char>,
    encoder: PhantomData<E>,
}

impl<'a, E: Encoder> Iterator for Split<'a, E> {
    type Item = &'a EStr<E>;

    fn next(&mut self) -> Option<&'a EStr<E>> {
        self.inner.next().map(EStr::new)
    }
}

impl<'a, E: Encoder> DoubleEndedIterator for Split<'a, E> {
    fn next_back(&mut self) -> Option<&'a EStr<E>> {
        self.inner.next_back().map(EStr::new)
    }
}

impl<E: Encoder> FusedIterator for Split<'_, E> {}
