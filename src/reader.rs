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

//! Read messages from a Gettext PO file.
//!
//! [`open`] returns a [`PoReader`], a forward-only iterator over the
//! messages of the file in the order they appear. Each message is
//! handed out as a [`PoRecord`] wrapping a [`polib::message::Message`],
//! so callers inspect it through [`polib::message::MessageView`].
//!
//! Problems are classified by [`Severity`]. Warnings are logged and
//! collected, and reading continues. Fatal problems end the iteration
//! with [`Error::CatalogFatalSyntax`].
//!
//! Only the first translation domain of a file is read. Messages
//! following a `domain` directive which names another domain are
//! skipped.

use crate::error::{Error, Result};
use polib::message::{Message, MessageFlags};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Domain of messages which precede any `domain` directive.
pub const DEFAULT_DOMAIN: &str = "messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Logged, reading continues.
    Warning,
    /// Reading stops.
    Fatal,
}

/// A problem found while reading a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub line: usize,
    pub message: String,
}

/// One message read from a catalog.
#[derive(Debug)]
pub struct PoRecord {
    pub message: Message,
    /// The message has a `msgctxt` line, possibly an empty one. The
    /// message itself cannot tell `msgctxt ""` from no context.
    pub has_context: bool,
    /// The message was commented out with `#~`.
    pub obsolete: bool,
    /// Line where the message starts, counting from 1.
    pub line: usize,
}

/// Open the PO file at `path` for reading.
pub fn open(path: &Path) -> Result<PoReader<BufReader<File>>> {
    let file = File::open(path).map_err(|err| Error::CatalogRead {
        path: path.to_path_buf(),
        message: format!("Couldn't open the PO file: {err}"),
    })?;
    Ok(PoReader::new(BufReader::new(file), path))
}

/// The string a continuation line is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrPlural(usize),
}

/// A message whose lines are still being read.
#[derive(Debug, Default)]
struct PendingMessage {
    /// First line of the message, 0 while nothing has been read.
    line: usize,
    domain: String,
    obsolete: bool,
    comments: String,
    source: String,
    flags: String,
    msgctxt: Option<String>,
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstr: Option<String>,
    msgstr_plural: Vec<Option<String>>,
    field: Option<Field>,
}

impl PendingMessage {
    fn is_started(&self) -> bool {
        self.line != 0
    }

    fn has_body(&self) -> bool {
        self.msgctxt.is_some() || self.msgid.is_some()
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Msgctxt => self.msgctxt.get_or_insert_with(String::new),
            Field::Msgid => self.msgid.get_or_insert_with(String::new),
            Field::MsgidPlural => self.msgid_plural.get_or_insert_with(String::new),
            Field::Msgstr => self.msgstr.get_or_insert_with(String::new),
            Field::MsgstrPlural(idx) => {
                if self.msgstr_plural.len() <= idx {
                    self.msgstr_plural.resize(idx + 1, None);
                }
                self.msgstr_plural[idx].get_or_insert_with(String::new)
            }
        }
    }
}

/// Append `line` to `text`, separating lines with a newline.
fn push_line(text: &mut String, line: &str) {
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(line);
}

/// Split `line` into its keyword and the rest of the line.
fn split_keyword(line: &str) -> (&str, &str) {
    match line.find(|c: char| c.is_whitespace() || c == '"') {
        Some(idx) => (&line[..idx], &line[idx..]),
        None => (line, ""),
    }
}

/// Resolve the C escape sequences of a PO string literal.
fn unescape(text: &str) -> std::result::Result<String, String> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Err(String::from("unescaped quote inside string")),
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| String::from("unterminated string"))?;
                match escaped {
                    'n' => result.push('\n'),
                    't' => result.push('\t'),
                    'r' => result.push('\r'),
                    'a' => result.push('\x07'),
                    'b' => result.push('\x08'),
                    'f' => result.push('\x0c'),
                    'v' => result.push('\x0b'),
                    '\\' | '"' | '\'' | '?' => result.push(escaped),
                    '0'..='7' => {
                        let mut value = escaped as u32 - '0' as u32;
                        for _ in 0..2 {
                            match chars.peek() {
                                Some(&digit @ '0'..='7') => {
                                    value = value * 8 + (digit as u32 - '0' as u32);
                                    chars.next();
                                }
                                _ => break,
                            }
                        }
                        result.extend(char::from_u32(value));
                    }
                    'x' => {
                        let mut value = None;
                        for _ in 0..2 {
                            match chars.peek().and_then(|digit| digit.to_digit(16)) {
                                Some(digit) => {
                                    value = Some(value.unwrap_or(0) * 16 + digit);
                                    chars.next();
                                }
                                None => break,
                            }
                        }
                        let value =
                            value.ok_or_else(|| String::from("invalid escape sequence \\x"))?;
                        result.extend(char::from_u32(value));
                    }
                    other => return Err(format!("invalid escape sequence \\{other}")),
                }
            }
            _ => result.push(c),
        }
    }
    Ok(result)
}

/// Forward-only iterator over the messages of a PO file.
pub struct PoReader<R> {
    lines: Lines<R>,
    path: PathBuf,
    line_number: usize,
    domain: String,
    processed_domain: Option<String>,
    ignored_domains: Vec<String>,
    pending: PendingMessage,
    ready: Option<PoRecord>,
    error: Option<Error>,
    warnings: Vec<Diagnostic>,
    done: bool,
}

impl<R: BufRead> PoReader<R> {
    /// Read a catalog from `reader`. The `path` is used in diagnostics.
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        PoReader {
            lines: reader.lines(),
            path: path.into(),
            line_number: 0,
            domain: String::from(DEFAULT_DOMAIN),
            processed_domain: None,
            ignored_domains: Vec::new(),
            pending: PendingMessage::default(),
            ready: None,
            error: None,
            warnings: Vec::new(),
            done: false,
        }
    }

    /// Warnings reported so far.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// The domain being read, once the first message has been seen.
    pub fn domain(&self) -> Option<&str> {
        self.processed_domain.as_deref()
    }

    fn report(&mut self, severity: Severity, line: usize, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        match severity {
            Severity::Warning => {
                warn!("{}:{}: {}", self.path.display(), line, message);
                self.warnings.push(Diagnostic {
                    severity,
                    line,
                    message,
                });
                Ok(())
            }
            Severity::Fatal => Err(Error::CatalogFatalSyntax {
                path: self.path.clone(),
                line,
                message,
            }),
        }
    }

    fn fatal(&mut self, message: impl Into<String>) -> Result<()> {
        self.report(Severity::Fatal, self.line_number, message)
    }

    fn parse_string(&mut self, text: &str) -> Result<String> {
        let text = text.trim();
        if !text.starts_with('"') {
            self.fatal("expected a quoted string")?;
        }
        if text.len() < 2 || !text.ends_with('"') {
            self.fatal("unterminated string")?;
        }
        match unescape(&text[1..text.len() - 1]) {
            Ok(value) => Ok(value),
            Err(message) => {
                self.fatal(message)?;
                Ok(String::new())
            }
        }
    }

    /// Start a new message at the current line unless one is in progress.
    fn begin_message(&mut self, obsolete: bool) {
        if !self.pending.is_started() {
            self.pending.line = self.line_number;
            self.pending.domain = self.domain.clone();
        }
        self.pending.obsolete |= obsolete;
    }

    /// Set `field` of the current message from a keyword line.
    fn set_field(&mut self, field: Field, rest: &str) -> Result<()> {
        let value = self.parse_string(rest)?;
        *self.pending.field_mut(field) = value;
        self.pending.field = Some(field);
        Ok(())
    }

    fn require_msgid(&mut self, keyword: &str) -> Result<()> {
        if self.pending.msgid.is_none() {
            self.fatal(format!("{keyword} without msgid"))?;
        }
        Ok(())
    }

    fn consume_line(&mut self, line: &str) -> Result<()> {
        let mut line = line.trim();
        if self.line_number == 1 {
            line = line.trim_start_matches('\u{feff}');
        }

        let mut obsolete = false;
        if let Some(rest) = line.strip_prefix("#~") {
            obsolete = true;
            line = rest.trim_start();
            if line.is_empty() || line.starts_with('|') {
                return Ok(());
            }
        }

        if line.is_empty() {
            return self.finish_message();
        }

        if let Some(comment) = line.strip_prefix('#') {
            if self.pending.has_body() {
                self.finish_message()?;
            }
            self.begin_message(obsolete);
            self.pending.field = None;
            if let Some(flags) = comment.strip_prefix(',') {
                if !self.pending.flags.is_empty() {
                    self.pending.flags.push(',');
                }
                self.pending.flags.push_str(flags);
            } else if let Some(comment) = comment.strip_prefix('.') {
                push_line(&mut self.pending.comments, comment.trim());
            } else if let Some(source) = comment.strip_prefix(':') {
                push_line(&mut self.pending.source, source.trim());
            }
            return Ok(());
        }

        if line.starts_with('"') {
            let Some(field) = self.pending.field else {
                return self.fatal("string continuation outside of a message");
            };
            let value = self.parse_string(line)?;
            self.pending.field_mut(field).push_str(&value);
            return Ok(());
        }

        let (keyword, rest) = split_keyword(line);
        match keyword {
            "domain" => {
                self.finish_message()?;
                self.domain = self.parse_string(rest)?;
            }
            "msgctxt" => {
                if self.pending.has_body() {
                    self.finish_message()?;
                }
                self.begin_message(obsolete);
                self.set_field(Field::Msgctxt, rest)?;
            }
            "msgid" => {
                if self.pending.msgid.is_some() {
                    self.finish_message()?;
                }
                self.begin_message(obsolete);
                self.set_field(Field::Msgid, rest)?;
            }
            "msgid_plural" => {
                self.require_msgid(keyword)?;
                self.set_field(Field::MsgidPlural, rest)?;
            }
            "msgstr" => {
                self.require_msgid(keyword)?;
                self.set_field(Field::Msgstr, rest)?;
            }
            _ if keyword.starts_with("msgstr[") => {
                self.require_msgid("msgstr[]")?;
                let index = keyword
                    .strip_prefix("msgstr[")
                    .and_then(|rest| rest.strip_suffix(']'))
                    .and_then(|index| index.parse::<usize>().ok());
                match index {
                    Some(index) => self.set_field(Field::MsgstrPlural(index), rest)?,
                    None => self.fatal(format!("invalid plural index in {keyword}"))?,
                }
            }
            _ => {
                self.report(
                    Severity::Warning,
                    self.line_number,
                    format!("ignoring unrecognized line: {line}"),
                )?;
            }
        }
        Ok(())
    }

    /// Turn the current message into a record, if it belongs to the
    /// domain being read.
    fn finish_message(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_started() {
            return Ok(());
        }
        let line = pending.line;
        let Some(msgid) = pending.msgid else {
            if pending.msgctxt.is_some() {
                self.report(Severity::Warning, line, "ignoring msgctxt without msgid")?;
            }
            return Ok(());
        };

        if self.processed_domain.is_none() {
            self.processed_domain = Some(pending.domain.clone());
        }
        if self.processed_domain.as_deref() != Some(pending.domain.as_str()) {
            if !self.ignored_domains.contains(&pending.domain) {
                self.report(
                    Severity::Warning,
                    line,
                    format!("ignoring messages of additional domain {:?}", pending.domain),
                )?;
                self.ignored_domains.push(pending.domain);
            }
            debug!("Skipping {msgid:?} outside of the first domain");
            return Ok(());
        }

        let mut msgstr_plural = Vec::with_capacity(pending.msgstr_plural.len());
        for (idx, slot) in pending.msgstr_plural.into_iter().enumerate() {
            if slot.is_none() {
                self.report(Severity::Warning, line, format!("missing msgstr[{idx}]"))?;
            }
            msgstr_plural.push(slot.unwrap_or_default());
        }

        let mut builder = match &pending.msgid_plural {
            Some(_) => Message::build_plural(),
            None => Message::build_singular(),
        };
        let has_context = pending.msgctxt.is_some();
        builder
            .with_comments(pending.comments)
            .with_source(pending.source)
            .with_flags(MessageFlags::from_str(&pending.flags).unwrap_or_default())
            .with_msgctxt(pending.msgctxt.unwrap_or_default())
            .with_msgid(msgid);

        match pending.msgid_plural {
            Some(msgid_plural) => {
                if msgstr_plural.is_empty() {
                    self.report(Severity::Warning, line, "plural message without msgstr[0]")?;
                    msgstr_plural.push(pending.msgstr.unwrap_or_default());
                } else if pending.msgstr.is_some() {
                    self.report(Severity::Warning, line, "ignoring msgstr of plural message")?;
                }
                builder
                    .with_msgid_plural(msgid_plural)
                    .with_msgstr_plural(msgstr_plural);
            }
            None => {
                let msgstr = match (pending.msgstr, msgstr_plural.into_iter().next()) {
                    (Some(msgstr), None) => msgstr,
                    (Some(msgstr), Some(_)) => {
                        self.report(Severity::Warning, line, "ignoring msgstr[] without msgid_plural")?;
                        msgstr
                    }
                    (None, Some(first)) => {
                        self.report(Severity::Warning, line, "msgstr[] without msgid_plural")?;
                        first
                    }
                    (None, None) => {
                        self.report(Severity::Warning, line, "missing msgstr")?;
                        String::new()
                    }
                };
                builder.with_msgstr(msgstr);
            }
        }

        self.ready = Some(PoRecord {
            message: builder.done(),
            has_context,
            obsolete: pending.obsolete,
            line,
        });
        Ok(())
    }
}

impl<R: BufRead> Iterator for PoReader<R> {
    type Item = Result<PoRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.ready.take() {
                return Some(Ok(record));
            }
            if let Some(err) = self.error.take() {
                return Some(Err(err));
            }
            if self.done {
                return None;
            }
            let result = match self.lines.next() {
                Some(Ok(line)) => {
                    self.line_number += 1;
                    self.consume_line(&line)
                }
                Some(Err(err)) => Err(Error::CatalogRead {
                    path: self.path.clone(),
                    message: format!("line {}: {err}", self.line_number + 1),
                }),
                None => {
                    self.done = true;
                    self.finish_message()
                }
            };
            if let Err(err) = result {
                self.done = true;
                self.error = Some(err);
            }
        }
    }
}
