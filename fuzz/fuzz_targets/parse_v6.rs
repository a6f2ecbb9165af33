#![no_main]
use libfuzzer_sys::fuzz_target;
use std::net::Ipv6Addr;
use std::str::FromStr;
use uri_formatter::component::{Host, HostKind};

fuzz_target!(|data: &str| {
    assert_eq!(parse_v6(data), Ipv6Addr::from_str(data).ok());
});

fn parse_v6(s: &str) -> Option<Ipv6Addr> {
    match Host::parse(&format!("[{s}]")).ok()?.kind() {
        HostKind::Ipv6(addr) => Some(addr),
        _ => None,
    }
}
