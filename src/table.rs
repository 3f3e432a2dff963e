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

//! Fold the messages of one catalog into a table of translations.

use crate::error::Result;
use crate::header::Header;
use crate::reader::{self, PoRecord};
use polib::message::MessageView;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Key used for catalogs without a `Language` header.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// One translatable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The msgid, prefixed with `context|` when the message has a context.
    pub key: String,
    /// Never empty.
    pub values: Vec<String>,
    pub is_plural: bool,
}

impl Entry {
    /// Whether the entry is rendered as a list rather than a single string.
    pub fn is_list(&self) -> bool {
        self.values.len() > 1 || self.is_plural
    }
}

/// The translations of one PO file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub language: Option<String>,
    pub plural_expression: String,
    pub plural_count: u32,
    /// In the order of the PO file.
    pub entries: Vec<Entry>,
}

/// Build the table key of a message. An empty context still gets its `|`.
pub fn message_key(msgctxt: Option<&str>, msgid: &str) -> String {
    match msgctxt {
        Some(msgctxt) => format!("{msgctxt}|{msgid}"),
        None => msgid.to_string(),
    }
}

/// Turn a message into an entry, or `None` if it has no place in the table.
fn entry(message: &dyn MessageView, has_context: bool) -> Option<Entry> {
    let msgctxt = has_context.then(|| message.msgctxt());
    let key = message_key(msgctxt, message.msgid());
    if let Ok(values) = message.msgstr_plural() {
        return Some(Entry {
            key,
            values: values.clone(),
            is_plural: true,
        });
    }
    match message.msgstr() {
        Ok(msgstr) if !msgstr.is_empty() => Some(Entry {
            key,
            values: vec![msgstr.to_string()],
            is_plural: false,
        }),
        _ => None,
    }
}

impl Catalog {
    /// Build a catalog from the records of a PO file.
    ///
    /// Obsolete messages and untranslated singular messages are left out,
    /// as are fuzzy messages when `skip_fuzzy` is set. Header messages
    /// fill in the language and plural rules.
    pub fn build<I>(records: I, skip_fuzzy: bool) -> Result<Catalog>
    where
        I: IntoIterator<Item = Result<PoRecord>>,
    {
        let mut header = Header::default();
        let mut entries = Vec::new();
        let mut seen_keys = HashSet::new();

        for record in records {
            let PoRecord {
                message,
                has_context,
                obsolete,
                line,
            } = record?;
            if obsolete {
                debug!("Skipping obsolete message {:?} on line {line}", message.msgid());
                continue;
            }
            if message.msgid().is_empty() {
                if let Ok(msgstr) = message.msgstr() {
                    header.update(msgstr);
                }
                continue;
            }
            if skip_fuzzy && message.is_fuzzy() {
                debug!("Skipping fuzzy message {:?} on line {line}", message.msgid());
                continue;
            }
            let Some(entry) = entry(&message, has_context) else {
                debug!("Skipping untranslated message {:?} on line {line}", message.msgid());
                continue;
            };
            if !seen_keys.insert(entry.key.clone()) {
                warn!("Duplicate message {:?} on line {line}", entry.key);
            }
            entries.push(entry);
        }

        Ok(Catalog {
            language: header.language,
            plural_expression: header.plural_expression,
            plural_count: header.plural_count,
            entries,
        })
    }

    /// Read the PO file at `path` and build its catalog.
    pub fn from_path(path: &Path, skip_fuzzy: bool) -> Result<Catalog> {
        debug!("Reading {}", path.display());
        let mut records = reader::open(path)?;
        let catalog = Catalog::build(records.by_ref(), skip_fuzzy)?;
        debug!(
            "Read {} domain of {} with {} warning(s)",
            records.domain().unwrap_or(reader::DEFAULT_DOMAIN),
            path.display(),
            records.warnings().len()
        );
        if catalog.language.is_none() {
            warn!(
                "{}: no Language header, using {UNKNOWN_LANGUAGE:?}",
                path.display()
            );
        }
        Ok(catalog)
    }

    /// The key the catalog is stored under in the generated tables.
    pub fn language_key(&self) -> &str {
        self.language.as_deref().unwrap_or(UNKNOWN_LANGUAGE)
    }
}
