#![no_main]

use libfuzzer_sys::fuzz_target;
use po2tabs::serialize::Target;
use po2tabs_fuzz::{create_catalog, FuzzEntry};

fuzz_target!(|inputs: (u32, Vec<FuzzEntry>)| {
    let (plural_count, entries) = inputs;
    let catalog = create_catalog(plural_count, entries);

    let code = Target::Js
        .serializer("i18n", false)
        .catalog(&catalog)
        .expect("Rendering JSON should succeed");
    let json = code
        .strip_prefix("i18n.langs.xx = ")
        .and_then(|code| code.strip_suffix(";\n"))
        .expect("Statement should wrap a JSON object");
    let value: serde_json::Value = serde_json::from_str(json).expect("Output should be JSON");
    assert_eq!(value["__nplurals"], plural_count);

    let _ = Target::Php.serializer("i18n", true).catalog(&catalog);
});
