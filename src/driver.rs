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

//! Convert a list of PO files into one generated source file.
//!
//! The files are processed in order and the output of each is appended
//! to a single buffer. The first error aborts the run and nothing is
//! written.

use crate::error::{Error, Result};
use crate::serialize::{Target, DEFAULT_NAMESPACE};
use crate::table::Catalog;
use regex::Regex;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::NamedTempFile;
use tracing::debug;

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub target: Target,
    /// Where to write the result; standard output when `None`.
    pub output: Option<PathBuf>,
    /// Name of the JS object or PHP class holding the tables.
    pub namespace: String,
    pub php_open_tag: bool,
    pub skip_fuzzy: bool,
}

impl Options {
    pub fn new(target: Target) -> Self {
        Options {
            target,
            output: None,
            namespace: String::from(DEFAULT_NAMESPACE),
            php_open_tag: false,
            skip_fuzzy: false,
        }
    }

    /// Check the settings which cannot be checked by the type system.
    pub fn validate(&self) -> Result<()> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
        if !re.is_match(&self.namespace) {
            return Err(Error::configuration(format!(
                "You specified invalid --namespace option: {}",
                self.namespace
            )));
        }
        Ok(())
    }
}

/// Convert `inputs` and return the generated code.
pub fn generate(options: &Options, inputs: &[PathBuf]) -> Result<String> {
    options.validate()?;
    if inputs.is_empty() {
        return Err(Error::configuration("You must specify some input PO files"));
    }

    let serializer = options
        .target
        .serializer(&options.namespace, options.php_open_tag);
    let mut output = serializer.preamble();
    for path in inputs {
        let catalog = Catalog::from_path(path, options.skip_fuzzy)?;
        debug!(
            "Converted {} ({}, {} messages)",
            path.display(),
            catalog.language_key(),
            catalog.entries.len()
        );
        output.push_str(&serializer.catalog(&catalog)?);
    }
    Ok(output)
}

/// Write `content` to `path`, or to standard output when `path` is `None`.
///
/// Files are replaced atomically: the content goes to a temporary file
/// next to `path` which is then renamed over it. A replaced file keeps its
/// permissions, a new one gets the usual `0666` less the umask.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    let Some(path) = path else {
        let mut stdout = std::io::stdout().lock();
        return stdout
            .write_all(content.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|source| Error::OutputWrite {
                path: PathBuf::from("<stdout>"),
                source,
            });
    };

    let output_error = |source: io::Error| Error::OutputWrite {
        path: path.to_path_buf(),
        source: without_temp_path(source),
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = create_temp_file(dir, path).map_err(output_error)?;
    file.write_all(content.as_bytes()).map_err(output_error)?;
    file.persist(path).map_err(|err| output_error(err.error))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn create_temp_file(dir: &Path, target: &Path) -> io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // The mode passed to open(2) is masked by the umask.
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let file = builder.tempfile_in(dir)?;
    if let Ok(metadata) = std::fs::metadata(target) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    Ok(file)
}

/// tempfile appends the name of its temporary file to I/O errors. Only the
/// output path means anything to the user.
fn without_temp_path(err: io::Error) -> io::Error {
    let message = err.to_string();
    match message.split_once(" at path ") {
        Some((cause, _)) => io::Error::new(err.kind(), cause),
        None => err,
    }
}

/// Convert `inputs` and write the result where `options` say.
pub fn run(options: &Options, inputs: &[PathBuf]) -> Result<()> {
    let content = generate(options, inputs)?;
    write_output(options.output.as_deref(), &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    const FRENCH: &str = "msgid \"\"\n\
                          msgstr \"\"\n\
                          \"Language: fr\\n\"\n\
                          \"Plural-Forms: nplurals=2; plural=(n > 1);\\n\"\n\
                          \n\
                          msgid \"cat\"\n\
                          msgstr \"chat\"\n";

    const CZECH: &str = "msgid \"\"\n\
                         msgstr \"Language: cs\\n\"\n\
                         \n\
                         msgid \"cat\"\n\
                         msgstr \"kočka\"\n";

    fn write_catalogs(dir: &Path, catalogs: &[(&str, &str)]) -> Vec<PathBuf> {
        catalogs
            .iter()
            .map(|(name, content)| {
                let path = dir.join(name);
                fs::write(&path, content).expect("Failed to write catalog");
                path
            })
            .collect()
    }

    #[test]
    fn test_generate_js() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let inputs = write_catalogs(tmp_dir.path(), &[("fr.po", FRENCH)]);

        let output = generate(&Options::new(Target::Js), &inputs)?;
        assert_eq!(
            output,
            "// This file is generated, don't edit manually!\n\
             i18n = typeof i18n == 'undefined' ? {} : i18n;\n\
             i18n.langs = {};\n\
             i18n.langs.fr = {\n\
             \t\"cat\": \"chat\",\n\
             \t\"__plural\": \"(n > 1)\",\n\
             \t\"__nplurals\": 2\n\
             };\n"
        );
        Ok(())
    }

    #[test]
    fn test_generate_php() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let inputs = write_catalogs(tmp_dir.path(), &[("fr.po", FRENCH)]);

        let output = generate(&Options::new(Target::Php), &inputs)?;
        assert_eq!(
            output,
            "i18n::$langs = [];\n\
             i18n::$langs['fr'] = [\n\
             \t'cat' => 'chat',\n\
             \t'__plural' => function($n) { return (int)(($n > 1)); },\n\
             \t'__nplurals' => 2\n\
             ];\n"
        );
        Ok(())
    }

    #[test]
    fn test_generate_keeps_input_order() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let inputs = write_catalogs(tmp_dir.path(), &[("cs.po", CZECH), ("fr.po", FRENCH)]);

        let output = generate(&Options::new(Target::Php), &inputs)?;
        let cs = output.find("['cs']").unwrap();
        let fr = output.find("['fr']").unwrap();
        assert!(cs < fr);
        assert!(output.contains("'cat' => 'kočka'"));
        assert!(output.contains("'cat' => 'chat'"));
        assert_eq!(output.matches("'__nplurals' => 2").count(), 2);
        Ok(())
    }

    #[test]
    fn test_generate_with_namespace() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let inputs = write_catalogs(tmp_dir.path(), &[("fr.po", FRENCH)]);
        let options = Options {
            namespace: String::from("Shop_L10n"),
            php_open_tag: true,
            ..Options::new(Target::Php)
        };

        let output = generate(&options, &inputs)?;
        assert!(output.starts_with("<?php\n// This file is generated"));
        assert!(output.contains("Shop_L10n::$langs['fr'] = [\n"));
        Ok(())
    }

    #[test]
    fn test_invalid_namespace() {
        let options = Options {
            namespace: String::from("my-ns"),
            ..Options::new(Target::Js)
        };
        let error = generate(&options, &[PathBuf::from("fr.po")]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "You specified invalid --namespace option: my-ns"
        );
    }

    #[test]
    fn test_no_inputs() {
        let error = generate(&Options::new(Target::Js), &[]).unwrap_err();
        assert!(matches!(error, Error::Configuration(_)));
        assert_eq!(error.to_string(), "You must specify some input PO files");
    }

    #[test]
    fn test_first_failure_aborts() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let mut inputs = write_catalogs(tmp_dir.path(), &[("fr.po", FRENCH)]);
        inputs.push(tmp_dir.path().join("missing.po"));

        let error = generate(&Options::new(Target::Js), &inputs).unwrap_err();
        assert!(
            matches!(&error, Error::CatalogRead { path, .. } if *path == tmp_dir.path().join("missing.po"))
        );
        Ok(())
    }

    #[test]
    fn test_write_output_replaces_file() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("langs.js");
        fs::write(&path, "old")?;

        write_output(Some(&path), "new\n")?;
        assert_eq!(fs::read_to_string(&path)?, "new\n");
        assert_eq!(fs::read_dir(tmp_dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_write_output_to_missing_dir() {
        let error = write_output(Some(Path::new("/nonexistent/dir/langs.js")), "x").unwrap_err();
        assert!(matches!(error, Error::OutputWrite { .. }));
        let message = format!("{:#}", anyhow::Error::from(error));
        assert!(message.starts_with("Failed writing /nonexistent/dir/langs.js: "));
        assert!(!message.contains(".tmp"), "{message}");
        assert_eq!(message.matches("os error").count(), 1, "{message}");
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> anyhow::Result<u32> {
        use std::os::unix::fs::PermissionsExt;
        Ok(fs::metadata(path)?.permissions().mode() & 0o777)
    }

    #[cfg(unix)]
    #[test]
    fn test_write_output_new_file_honours_umask() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let reference = tmp_dir.path().join("reference.js");
        fs::write(&reference, "")?;
        let path = tmp_dir.path().join("langs.js");

        write_output(Some(&path), "new\n")?;
        assert_eq!(mode(&path)?, mode(&reference)?);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_write_output_keeps_existing_mode() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("langs.js");
        fs::write(&path, "old")?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640))?;

        write_output(Some(&path), "new\n")?;
        assert_eq!(mode(&path)?, 0o640);
        Ok(())
    }

    #[test]
    fn test_run() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let inputs = write_catalogs(tmp_dir.path(), &[("fr.po", FRENCH)]);
        let output = tmp_dir.path().join("langs.php");
        let options = Options {
            output: Some(output.clone()),
            ..Options::new(Target::Php)
        };

        run(&options, &inputs)?;
        assert!(fs::read_to_string(&output)?.contains("'cat' => 'chat',"));
        Ok(())
    }
}
