//! Percent-encoders for URI components.

use super::table::{self, Table};

/// A trait used by [`EStr`] to specify the table used for encoding.
///
/// [`EStr`]: super::EStr
pub trait Encoder: Send + Sync + 'static {
    /// The table used for encoding.
    const TABLE: Table;
}

/// An encoder for the userinfo component.
#[derive(Clone, Copy, Debug)]
pub struct Userinfo(());

/// An encoder for the user name inside a userinfo.
#[derive(Clone, Copy, Debug)]
pub struct User(());

/// An encoder for a registered name host.
#[derive(Clone, Copy, Debug)]
pub struct RegName(());

/// An encoder for a registered name host that keeps non-ASCII characters.
#[derive(Clone, Copy, Debug)]
pub struct IRegName(());

/// An encoder for the path component.
#[derive(Clone, Copy, Debug)]
pub struct Path(());

/// An encoder for a single path segment.
#[derive(Clone, Copy, Debug)]
pub struct Segment(());

/// An encoder for the query component.
#[derive(Clone, Copy, Debug)]
pub struct Query(());

/// An encoder for the key of a query pair.
#[derive(Clone, Copy, Debug)]
pub struct QueryKey(());

/// An encoder for the value of a query pair.
#[derive(Clone, Copy, Debug)]
pub struct QueryValue(());

/// An encoder for the fragment component.
#[derive(Clone, Copy, Debug)]
pub struct Fragment(());

impl Encoder for Userinfo {
    const TABLE: Table = table::USERINFO;
}

impl Encoder for User {
    const TABLE: Table = table::USER;
}

impl Encoder for RegName {
    const TABLE: Table = table::REG_NAME;
}

impl Encoder for IRegName {
    const TABLE: Table = table::IREG_NAME;
}

impl Encoder for Path {
    const TABLE: Table = table::PATH;
}

impl Encoder for Segment {
    const TABLE: Table = table::PCHAR;
}

impl Encoder for Query {
    const TABLE: Table = table::QUERY;
}

impl Encoder for QueryKey {
    const TABLE: Table = table::QUERY_DATA;
}

impl Encoder for QueryValue {
    const TABLE: Table = table::QUERY_VALUE;
}

impl Encoder for Fragment {
    const TABLE: Table = table::FRAGMENT;
}
