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

//! JavaScript output: one pretty-printed object literal per catalog.

use super::{Serializer, GENERATED_BANNER};
use crate::error::Result;
use crate::table::Catalog;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::warn;

const PLURAL_KEY: &str = "__plural";
const NPLURALS_KEY: &str = "__nplurals";

pub struct JsSerializer {
    namespace: String,
}

impl JsSerializer {
    pub fn new(namespace: &str) -> Self {
        JsSerializer {
            namespace: namespace.to_string(),
        }
    }
}

/// Convert a catalog to a JSON object. Keys keep the order of the
/// catalog; a repeated key keeps its first position and its last value.
/// The plural rule always comes last, over messages with the same keys.
pub fn to_json(catalog: &Catalog) -> Value {
    let mut object = Map::new();
    for entry in &catalog.entries {
        if entry.key == PLURAL_KEY || entry.key == NPLURALS_KEY {
            warn!("Message {:?} is replaced by the plural rule", entry.key);
            continue;
        }
        let value = if entry.is_list() {
            Value::from(entry.values.clone())
        } else {
            Value::from(entry.values.first().cloned().unwrap_or_default())
        };
        object.insert(entry.key.clone(), value);
    }
    object.insert(
        String::from(PLURAL_KEY),
        Value::from(catalog.plural_expression.clone()),
    );
    object.insert(String::from(NPLURALS_KEY), Value::from(catalog.plural_count));
    Value::Object(object)
}

/// Render `value` with tab indentation.
fn to_pretty_string(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

impl Serializer for JsSerializer {
    fn preamble(&self) -> String {
        let ns = &self.namespace;
        format!("{GENERATED_BANNER}{ns} = typeof {ns} == 'undefined' ? {{}} : {ns};\n{ns}.langs = {{}};\n")
    }

    fn catalog(&self, catalog: &Catalog) -> Result<String> {
        Ok(format!(
            "{}.langs.{} = {};\n",
            self.namespace,
            catalog.language_key(),
            to_pretty_string(&to_json(catalog))?
        ))
    }
}
