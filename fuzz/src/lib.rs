use arbitrary::Arbitrary;
use po2tabs::table::{message_key, Catalog, Entry};

/// Wrapper struct for generating arbitrary table entries.
#[derive(Arbitrary, Debug)]
pub struct FuzzEntry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub values: Vec<String>,
    pub is_plural: bool,
}

/// Generate a random Catalog for fuzzing.
pub fn create_catalog(plural_count: u32, entries: Vec<FuzzEntry>) -> Catalog {
    let entries = entries
        .into_iter()
        .map(|entry| Entry {
            key: message_key(entry.msgctxt.as_deref(), &entry.msgid),
            values: if entry.values.is_empty() {
                vec![String::new()]
            } else {
                entry.values
            },
            is_plural: entry.is_plural,
        })
        .collect();
    Catalog {
        language: Some(String::from("xx")),
        plural_expression: String::from("n != 1"),
        plural_count,
        entries,
    }
}

/// Quote `text` as a PO string literal.
pub fn po_string(text: &str) -> String {
    let mut result = String::from("\"");
    for c in text.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\x7f' => {
                result.push_str(&format!("\\{:03o}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Render singular translations as the text of a PO file.
pub fn create_po(translations: &[(&str, &str)]) -> String {
    let mut po = String::new();
    for (msgid, msgstr) in translations {
        po.push_str(&format!(
            "msgid {}\nmsgstr {}\n\n",
            po_string(msgid),
            po_string(msgstr)
        ));
    }
    po
}
