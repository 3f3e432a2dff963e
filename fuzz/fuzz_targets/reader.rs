#![no_main]

use libfuzzer_sys::fuzz_target;
use po2tabs::reader::PoReader;
use po2tabs::table::Catalog;
use std::io::Cursor;

fuzz_target!(|text: String| {
    let reader = PoReader::new(Cursor::new(text), "fuzz.po");
    let _ = Catalog::build(reader, false); // Err(_) can happen and it's fine.
});
