// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! PHP output: an associative array per catalog, with the plural rule
//! compiled to a closure.

use super::{Serializer, GENERATED_BANNER};
use crate::error::Result;
use crate::table::{Catalog, Entry};
use regex::{NoExpand, Regex};
use std::sync::OnceLock;

pub struct PhpSerializer {
    namespace: String,
    open_tag: bool,
}

impl PhpSerializer {
    pub fn new(namespace: &str, open_tag: bool) -> Self {
        PhpSerializer {
            namespace: namespace.to_string(),
            open_tag,
        }
    }
}

/// Quote `text` as a single-quoted PHP string.
pub fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 2);
    result.push('\'');
    for c in text.chars() {
        if c == '\'' || c == '\\' {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('\'');
    result
}

/// Turn a gettext plural expression into PHP by replacing the variable
/// `n` with `$n`.
///
/// Only `n` as a whole word is replaced:
///
/// ```
/// use po2tabs::serialize::php::compile_plural;
///
/// assert_eq!(compile_plural("nplurals==n"), "nplurals==$n");
/// ```
pub fn compile_plural(expression: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\bn\b").unwrap());
    re.replace_all(expression, NoExpand("$n")).into_owned()
}

fn value(entry: &Entry) -> String {
    if entry.is_list() {
        let values = entry
            .values
            .iter()
            .map(|text| escape(text))
            .collect::<Vec<_>>();
        format!("[{}]", values.join(", "))
    } else {
        escape(entry.values.first().map(String::as_str).unwrap_or_default())
    }
}

impl Serializer for PhpSerializer {
    fn preamble(&self) -> String {
        let mut preamble = String::new();
        if self.open_tag {
            preamble.push_str("<?php\n");
            preamble.push_str(GENERATED_BANNER);
        }
        preamble.push_str(&format!("{}::$langs = [];\n", self.namespace));
        preamble
    }

    fn catalog(&self, catalog: &Catalog) -> Result<String> {
        let mut code = format!(
            "{}::$langs['{}'] = [\n",
            self.namespace,
            catalog.language_key()
        );
        for entry in &catalog.entries {
            code.push_str(&format!("\t{} => {},\n", escape(&entry.key), value(entry)));
        }
        code.push_str(&format!(
            "\t'__plural' => function($n) {{ return (int)({}); }},\n",
            compile_plural(&catalog.plural_expression)
        ));
        code.push_str(&format!("\t'__nplurals' => {}\n", catalog.plural_count));
        code.push_str("];\n");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::tests::french;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape() {
        assert_eq!(escape("cat"), "'cat'");
        assert_eq!(escape("l'homme"), r"'l\'homme'");
        assert_eq!(escape(r"C:\dir"), r"'C:\\dir'");
        assert_eq!(escape("a\"b\nc"), "'a\"b\nc'");
    }

    #[test]
    fn test_compile_plural() {
        assert_eq!(compile_plural("n==1 ? 0 : 1"), "$n==1 ? 0 : 1");
        assert_eq!(compile_plural("nplurals==n"), "nplurals==$n");
        assert_eq!(compile_plural("(n > 1)"), "($n > 1)");
        assert_eq!(
            compile_plural("n%10==1 && n%100!=11 ? 0 : n != 0 ? 1 : 2"),
            "$n%10==1 && $n%100!=11 ? 0 : $n != 0 ? 1 : 2"
        );
        assert_eq!(compile_plural("0"), "0");
    }

    #[test]
    fn test_preamble() {
        assert_eq!(
            PhpSerializer::new("i18n", false).preamble(),
            "i18n::$langs = [];\n"
        );
        assert_eq!(
            PhpSerializer::new("i18n", true).preamble(),
            "<?php\n\
             // This file is generated, don't edit manually!\n\
             i18n::$langs = [];\n"
        );
    }

    #[test]
    fn test_catalog_statement() {
        let code = PhpSerializer::new("i18n", false)
            .catalog(&french())
            .unwrap();
        assert_eq!(
            code,
            "i18n::$langs['fr'] = [\n\
             \t'cat' => 'chat',\n\
             \t'file' => ['fichier', 'fichiers'],\n\
             \t'__plural' => function($n) { return (int)(($n > 1)); },\n\
             \t'__nplurals' => 2\n\
             ];\n"
        );
    }

    #[test]
    fn test_single_plural_form_is_a_list() {
        let entry = Entry {
            key: String::from("item"),
            values: vec![String::from("kus")],
            is_plural: true,
        };
        assert_eq!(value(&entry), "['kus']");
    }

    #[test]
    fn test_duplicate_keys_are_emitted() {
        let mut catalog = french();
        catalog.entries.truncate(1);
        catalog.entries.push(Entry {
            key: String::from("cat"),
            values: vec![String::from("matou")],
            is_plural: false,
        });
        let code = PhpSerializer::new("i18n", false)
            .catalog(&catalog)
            .unwrap();
        assert!(code.contains("\t'cat' => 'chat',\n\t'cat' => 'matou',\n"));
    }
}
