#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_formatter::{Formatter, Uri};

fuzz_target!(|data: &str| {
    let Ok(uri) = Uri::parse(data) else {
        return;
    };

    // Writing the literal form is idempotent.
    let literal = uri.to_string();
    let reparsed = Uri::parse(&literal).expect("literal form must parse");
    assert_eq!(reparsed.to_string(), literal);

    if let Ok(formatted) = Formatter::new().format(&uri) {
        let reparsed = Uri::parse(&formatted).expect("formatted URI must parse");
        assert_eq!(reparsed.scheme(), uri.scheme());
        assert_eq!(reparsed.port(), uri.port());
        assert_eq!(reparsed.fragment(), uri.fragment());
    }
});
