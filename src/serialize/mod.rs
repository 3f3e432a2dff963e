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

//! Render catalogs as source code.
//!
//! Every target produces a preamble once, followed by one statement per
//! catalog which stores the catalog's table under its language in a
//! global `langs` table.

pub mod js;
pub mod php;

use crate::error::{Error, Result};
use crate::table::Catalog;
use std::fmt;
use std::str::FromStr;

pub use js::JsSerializer;
pub use php::PhpSerializer;

/// Banner put on top of generated files.
pub const GENERATED_BANNER: &str = "// This file is generated, don't edit manually!\n";

/// Default name of the global object holding the tables.
pub const DEFAULT_NAMESPACE: &str = "i18n";

/// Language of the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Js,
    Php,
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Target> {
        match s {
            "js" => Ok(Target::Js),
            "php" => Ok(Target::Php),
            _ => Err(Error::configuration(format!(
                "You specified invalid --code option: {s}"
            ))),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Js => f.write_str("js"),
            Target::Php => f.write_str("php"),
        }
    }
}

impl Target {
    /// Create the serializer for this target.
    ///
    /// `namespace` names the JS object or PHP class holding the tables.
    /// `php_open_tag` starts PHP output with `<?php`.
    pub fn serializer(self, namespace: &str, php_open_tag: bool) -> Box<dyn Serializer> {
        match self {
            Target::Js => Box::new(JsSerializer::new(namespace)),
            Target::Php => Box::new(PhpSerializer::new(namespace, php_open_tag)),
        }
    }
}

pub trait Serializer {
    /// Code which sets up the global table, emitted once.
    fn preamble(&self) -> String;

    /// A statement storing `catalog` in the global table.
    fn catalog(&self, catalog: &Catalog) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::table::Entry;
    use pretty_assertions::assert_eq;

    /// The French catalog used throughout the serializer tests.
    pub(crate) fn french() -> Catalog {
        Catalog {
            language: Some(String::from("fr")),
            plural_expression: String::from("(n > 1)"),
            plural_count: 2,
            entries: vec![
                Entry {
                    key: String::from("cat"),
                    values: vec![String::from("chat")],
                    is_plural: false,
                },
                Entry {
                    key: String::from("file"),
                    values: vec![String::from("fichier"), String::from("fichiers")],
                    is_plural: true,
                },
            ],
        }
    }

    #[test]
    fn test_parse_target() {
        assert_eq!("js".parse::<Target>().unwrap(), Target::Js);
        assert_eq!("php".parse::<Target>().unwrap(), Target::Php);
        assert_eq!(Target::Php.to_string(), "php");
    }

    #[test]
    fn test_parse_invalid_target() {
        let error = "python".parse::<Target>().unwrap_err();
        assert_eq!(
            error.to_string(),
            "You specified invalid --code option: python"
        );
        assert!("JS".parse::<Target>().is_err());
    }

    #[test]
    fn test_target_serializers() {
        let js = Target::Js.serializer("app", false);
        assert!(js.preamble().ends_with("app.langs = {};\n"));
        let php = Target::Php.serializer("app", false);
        assert_eq!(php.preamble(), "app::$langs = [];\n");
    }
}
