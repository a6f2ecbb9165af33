use uri_formatter::{Formatter, FormatterConfig, HostEncoding, QueryEncoding, Uri};

#[test]
fn uri_as_string() {
    let uri = Uri::parse("http://example.com:8080/a?b=c#d").unwrap();
    let json = serde_json::to_string(&uri).unwrap();
    assert_eq!(json, r#""http://example.com:8080/a?b=c#d""#);

    let back: Uri = serde_json::from_str(&json).unwrap();
    assert_eq!(back, uri);

    let e = serde_json::from_str::<Uri>(r#""http://host:99999""#).unwrap_err();
    assert!(e.to_string().contains("invalid port at index 12"));
}

#[test]
fn config() {
    let config: FormatterConfig =
        serde_json::from_str(r#"{"host_encoding":"ascii","query_separator":";"}"#).unwrap();
    assert_eq!(config.host_encoding, HostEncoding::Ascii);
    assert_eq!(config.query_encoding, QueryEncoding::Rfc3986);
    assert_eq!(config.query_separator, ";");

    let json = serde_json::to_string(&FormatterConfig::default()).unwrap();
    assert_eq!(
        json,
        r#"{"host_encoding":"unicode","query_encoding":"rfc3986","query_separator":"&"}"#
    );

    let f = Formatter::with_config(config);
    let uri = Uri::parse("http://gwóźdź.pl/?a=1&b=2").unwrap();
    assert_eq!(f.format(&uri).unwrap(), "http://xn--gwd-hna98db.pl/?a=1;b=2");

    assert!(serde_json::from_str::<FormatterConfig>(r#"{"host_encoding":"toto"}"#).is_err());
}
