#![no_main]
use libfuzzer_sys::fuzz_target;
use std::net::Ipv4Addr;
use std::str::FromStr;
use uri_formatter::component::{Host, HostKind};

fuzz_target!(|data: &str| {
    assert_eq!(parse_v4(data), Ipv4Addr::from_str(data).ok());
});

fn parse_v4(s: &str) -> Option<Ipv4Addr> {
    match Host::parse(s).ok()?.kind() {
        HostKind::Ipv4(addr) => Some(addr),
        _ => None,
    }
}
