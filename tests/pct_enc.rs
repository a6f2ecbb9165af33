use uri_formatter::pct_enc::{
    decode,
    encode,
    encoder::{self, Encoder, Path, Query},
    table::*,
    DecodedChunk, EStr, Table,
};

const RAW: &str = "te😃a 测1`~!@试#$%st^&+=";
const ENCODED: &str = "te%F0%9F%98%83a%20%E6%B5%8B1%60~!@%E8%AF%95%23$%25st%5E&+=";

#[test]
fn enc_dec() {
    assert_eq!(encode(RAW, QUERY, false), ENCODED);
    assert_eq!(decode(ENCODED, false).to_string().unwrap(), RAW);
    assert_eq!(
        decode("%2D%E6%B5", false).to_bytes().into_owned(),
        b"\x2d\xe6\xb5"
    );
    assert_eq!(
        decode("%2D%E6%B5", false).to_string().unwrap_err(),
        b"\x2d\xe6\xb5"
    );
    assert_eq!(decode("%E6%B5", false).to_string_lossy(), "\u{fffd}");
}

#[test]
fn lenient_decode() {
    for s in ["100%", "%", "%zz", "%2", "%%41", "a%g1b"] {
        let expected = s.replace("%41", "A");
        assert_eq!(decode(s, false).to_string_lossy(), expected, "{s}");
    }
    let chunks: Vec<_> = decode("%%41", false).collect();
    assert_eq!(
        chunks,
        [DecodedChunk::Unencoded("%"), DecodedChunk::PctDecoded(b'A')]
    );
}

#[test]
fn space_as_plus() {
    assert_eq!(encode("a b+c", QUERY_DATA, true), "a+b%2Bc");
    assert_eq!(encode("a b+c", QUERY_DATA, false), "a%20b%2Bc");
    assert_eq!(decode("a+b%2Bc", true).to_string_lossy(), "a b+c");
    assert_eq!(decode("a+b%2Bc", false).to_string_lossy(), "a+b+c");
    assert_eq!(decode("a%20b", true).to_string_lossy(), "a b");
}

#[test]
fn tables() {
    assert_eq!(encode("a&b=c", QUERY, false), "a&b=c");
    assert_eq!(encode("a&b=c", QUERY_DATA, false), "a%26b%3Dc");
    assert_eq!(encode("/a b", PATH, false), "/a%20b");
    assert_eq!(encode("/a b", PCHAR, false), "%2Fa%20b");
    assert_eq!(encode("ó", IREG_NAME, false), "ó");
    assert_eq!(encode("ó", REG_NAME, false), "%C3%B3");

    let t = Table::new(b"ab");
    assert!(t.allows('a') && !t.allows('c'));
    assert!(t.is_subset(ALPHA));
    assert!(!ALPHA.is_subset(t));
    assert!(t.or(DIGIT).allows('7'));
    assert!(!ALPHA.sub(t).allows('a'));
}

#[test]
fn encoder_tables() {
    assert_eq!(encoder::QueryKey::TABLE, QUERY_DATA);
    assert_eq!(encoder::QueryValue::TABLE, QUERY_VALUE);
    assert_eq!(encoder::User::TABLE, USER);
    assert_eq!(encoder::Segment::TABLE, PCHAR);

    assert_eq!(EStr::<encoder::QueryValue>::encode("b=c&d+e f", true), "b=c%26d%2Be+f");
    assert_eq!(EStr::<encoder::QueryKey>::encode("b=c", false), "b%3Dc");
    assert_eq!(EStr::<encoder::User>::encode("jo:e", false), "jo%3Ae");
    assert_eq!(EStr::<encoder::Userinfo>::encode("jo:e", false), "jo:e");
    assert_eq!(EStr::<encoder::Segment>::encode("a/b", false), "a%2Fb");
    assert_eq!(EStr::<Path>::encode("a/b", false), "a/b");
    assert_eq!(EStr::<encoder::IRegName>::encode("gwóźdź pl", false), "gwóźdź%20pl");
    assert_eq!(EStr::<encoder::RegName>::encode("ó", false), "%C3%B3");
}

#[test]
#[should_panic]
fn table_rejects_percent() {
    let _ = Table::new(b"%");
}

#[test]
fn split() {
    let s = "id=3&name=%E5%BC%A0%E4%B8%89";
    let estr = EStr::<Query>::new(s);
    let mut split = estr.split('&');

    let it = split.next().unwrap();
    assert_eq!(it, "id=3");
    let (k, v) = it.split_once('=').unwrap();
    assert_eq!(k, "id");
    assert_eq!(v, "3");

    let it = split.next().unwrap();
    assert_eq!(it.decode().to_string().unwrap(), "name=张三");
    let (k, v) = it.split_once('=').unwrap();
    assert_eq!(k.decode().to_string().unwrap(), "name");
    assert_eq!(v.decode().to_string().unwrap(), "张三");

    assert_eq!(split.next(), None);

    let estr = EStr::<Path>::new("a/b/c");
    assert_eq!(estr.rsplit_once('/').unwrap(), (EStr::new("a/b"), EStr::new("c")));
    assert!(estr.split('/').rev().eq(["c", "b", "a"]));
}

#[test]
#[should_panic]
fn split_with_unreserved() {
    let _ = EStr::<Path>::new("a-b").split('-');
}

#[test]
fn estr() {
    let e = EStr::<Query>::new("%C2%A1Hola%21+amigo");
    assert!(!e.is_unencoded());
    assert_eq!(e.len(), 19);
    assert_eq!(e.decode().to_string_lossy(), "¡Hola!+amigo");
    assert_eq!(e.decode_plus_as_space().to_string_lossy(), "¡Hola! amigo");
    assert!(EStr::<Query>::EMPTY.is_empty());
    assert_eq!(<&EStr<Query>>::default(), EStr::EMPTY);
    assert_eq!(format!("{e}"), "%C2%A1Hola%21+amigo");
    assert_eq!(format!("{e:?}"), "\"%C2%A1Hola%21+amigo\"");
}
