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

use tracing::Level;
use tracing_subscriber::fmt;

/// Most verbose level logged.
pub fn max_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Log to standard error. Warnings are always shown, progress messages
/// only when `verbose` is set.
pub fn init(verbose: bool) {
    // A subscriber may already be installed, e.g. in tests.
    let _ = fmt()
        .with_max_level(max_level(verbose))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_max_level() {
        assert_eq!(max_level(false), Level::WARN);
        assert_eq!(max_level(true), Level::DEBUG);
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
