#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_formatter::pct_enc::decode;

fuzz_target!(|data: &str| {
    let bytes = decode(data, false).to_bytes();
    assert!(bytes.len() <= data.len());
    let _ = decode(data, true).to_string_lossy();
});
