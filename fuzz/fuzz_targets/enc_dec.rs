#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_formatter::pct_enc::{decode, encode, table};

fuzz_target!(|data: (&str, bool)| {
    let (s, plus) = data;
    for t in [table::QUERY, table::QUERY_DATA, table::PATH, table::IREG_NAME] {
        let encoded = encode(s, t, plus);
        assert_eq!(decode(&encoded, plus).to_string().as_deref(), Ok(s));
    }
});
