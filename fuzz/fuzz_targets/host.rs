#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_formatter::host::{to_ascii, to_unicode};

fuzz_target!(|data: &str| {
    let Ok(ascii) = to_ascii(data) else {
        return;
    };
    let unicode = to_unicode(&ascii).expect("ASCII form must decode");
    assert_eq!(to_ascii(&unicode).as_deref(), Ok(&*ascii));
});
