#![no_main]

use libfuzzer_sys::fuzz_target;
use po2tabs::reader::PoReader;
use po2tabs::table::Catalog;
use po2tabs_fuzz::create_po;
use pretty_assertions::assert_eq;
use std::io::Cursor;

fuzz_target!(|translations: Vec<(&str, &str)>| {
    let po = create_po(&translations);
    let reader = PoReader::new(Cursor::new(po), "fuzz.po");
    let catalog = Catalog::build(reader, false).expect("Generated PO file should parse");

    // The header and untranslated messages do not make it into the table.
    let expected = translations
        .iter()
        .filter(|(msgid, msgstr)| !msgid.is_empty() && !msgstr.is_empty())
        .map(|(msgid, msgstr)| (msgid.to_string(), vec![msgstr.to_string()]))
        .collect::<Vec<_>>();
    let actual = catalog
        .entries
        .into_iter()
        .map(|entry| (entry.key, entry.values))
        .collect::<Vec<_>>();
    assert_eq!(expected, actual);
});
