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

//! Convert PO files into a PHP or JavaScript source file with the
//! translations of every file.

use clap::error::ErrorKind;
use clap::Parser;
use po2tabs::driver::{self, Options};
use po2tabs::serialize::{Target, DEFAULT_NAMESPACE};
use po2tabs::{logging, Error};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Language of the generated code: php or js.
    #[arg(short, long, value_name = "php|js")]
    code: Option<String>,
    /// Write the generated code to this file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Log progress to standard error.
    #[arg(short, long)]
    verbose: bool,
    /// Name of the global JavaScript object or PHP class holding the tables.
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,
    /// Start PHP output with an opening `<?php` tag.
    #[arg(long)]
    php_open_tag: bool,
    /// Leave out messages marked as fuzzy.
    #[arg(long)]
    skip_fuzzy: bool,
    #[arg(id = "input.po")]
    inputs: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let message = err.to_string();
            let message = message.lines().next().unwrap_or_default();
            eprintln!(
                "ERROR: Option parsing failed: {}",
                message.trim_start_matches("error: ")
            );
            return ExitCode::FAILURE;
        }
    };

    logging::init(args.verbose);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let code = args
        .code
        .ok_or_else(|| Error::configuration("You must specify --code option"))?;
    let options = Options {
        target: code.parse::<Target>()?,
        output: args.output,
        namespace: args.namespace,
        php_open_tag: args.php_open_tag,
        skip_fuzzy: args.skip_fuzzy,
    };
    driver::run(&options, &args.inputs)?;
    Ok(())
}
