use std::{env, io};
use uri_formatter::{Formatter, Uri};

fn main() {
    let mut formatter = Formatter::new();
    let mut args = env::args().skip(1);
    if let Some(host_encoding) = args.next() {
        formatter
            .set_host_encoding(host_encoding.as_str())
            .expect("invalid host encoding");
    }
    if let Some(query_encoding) = args.next() {
        formatter
            .set_query_encoding(query_encoding.as_str())
            .expect("invalid query encoding");
    }
    if let Some(separator) = args.next() {
        formatter.set_query_separator(separator);
    }

    for line in io::stdin().lines() {
        let line = line.expect("failed to read line");
        match Uri::parse(&line) {
            Ok(uri) => match formatter.format(&uri) {
                Ok(s) => println!("{s}"),
                Err(e) => println!("Error: {e}"),
            },
            Err(e) => println!("Error: {e}"),
        };
    }
}
