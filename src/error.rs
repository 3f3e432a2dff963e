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

//! Errors returned by every stage of the conversion.
//!
//! All of them are fatal: the run stops at the first one and nothing
//! is written.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Bad command line: missing or unknown `--code`, no inputs, bad
    /// namespace.
    #[error("{0}")]
    Configuration(String),

    /// The catalog could not be opened or read.
    #[error("Failed parsing {}: {message}", .path.display())]
    CatalogRead { path: PathBuf, message: String },

    /// The catalog is malformed beyond recovery.
    #[error("Failed parsing {}: line {line}: {message}", .path.display())]
    CatalogFatalSyntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A table could not be rendered as JSON.
    #[error("Failed rendering JSON")]
    Json(#[from] serde_json::Error),

    /// The generated tables could not be written.
    #[error("Failed writing {}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}
