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

//! Catalog metadata carried by the header message, the one with an
//! empty msgid.

use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_PLURAL_COUNT: u32 = 2;
pub const DEFAULT_PLURAL_EXPRESSION: &str = "n != 1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub language: Option<String>,
    pub plural_count: u32,
    pub plural_expression: String,
}

impl Default for Header {
    fn default() -> Self {
        Header {
            language: None,
            plural_count: DEFAULT_PLURAL_COUNT,
            plural_expression: String::from(DEFAULT_PLURAL_EXPRESSION),
        }
    }
}

impl Header {
    /// Extract the fields we care about from the msgstr of the header
    /// message. Fields which are missing keep their defaults.
    pub fn parse(text: &str) -> Header {
        let mut header = Header::default();
        header.update(text);
        header
    }

    /// Overwrite the fields found in `text`, leaving the others alone.
    pub fn update(&mut self, text: &str) {
        if let Some((count, expression)) = plural_forms(text) {
            self.plural_count = count;
            self.plural_expression = expression;
        }
        if let Some(language) = language(text) {
            self.language = Some(language);
        }
    }
}

/// Find `Plural-Forms: nplurals=N; plural=EXPR;` and return `N` and `EXPR`.
pub fn plural_forms(text: &str) -> Option<(u32, String)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"Plural-Forms:\s*nplurals\s*=\s*(\d+)\s*;\s*plural\s*=\s*([^;]+);").unwrap()
    });

    let captures = re.captures(text)?;
    let count = captures[1].parse().ok()?;
    Some((count, captures[2].trim_end().to_string()))
}

/// Find `Language: code`. Only the leading run of lowercase letters is
/// taken, so `pt_BR` gives `pt`.
pub fn language(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"Language:\s*([a-z]+)").unwrap());

    re.captures(text).map(|captures| captures[1].to_string())
}
