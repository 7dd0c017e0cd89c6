// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;

pub const DEFAULT_PORT: u16 = 8000;

/// Optional per-collection settings, read from `studycards.toml` in the
/// collection directory. Command-line flags take precedence.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            open_browser: true,
        }
    }
}

impl Config {
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join("studycards.toml");
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
