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

//! Convert Gettext PO catalogs into lookup tables for PHP and JavaScript.
//!
//! Each PO file is read with [`reader`], folded into a [`table::Catalog`]
//! and rendered by a [`serialize::Serializer`]. The [`driver`] ties the
//! steps together for a list of files and produces a single source file
//! which can be included in an application at build time.
//!
//! The generated code stores every catalog in a global `langs` table
//! under its language, together with the plural rule of the language:
//!
//! ```text
//! i18n.langs.fr = {
//!     "cat": "chat",
//!     "__plural": "(n > 1)",
//!     "__nplurals": 2
//! };
//! ```

pub mod driver;
pub mod error;
pub mod header;
pub mod logging;
pub mod reader;
pub mod serialize;
pub mod table;

pub use error::{Error, Result};
