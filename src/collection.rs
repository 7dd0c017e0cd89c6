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

use std::env::current_dir;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::sqlite::SqliteStore;

/// A collection directory: the card database plus its optional settings.
pub struct Collection {
    pub directory: PathBuf,
    pub store: SqliteStore,
    pub config: Config,
}

impl Collection {
    pub fn open(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let db_path: PathBuf = directory.join("studycards.db");
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let store: SqliteStore = SqliteStore::open(db_path)?;

        let config: Config = Config::load(&directory)?;

        Ok(Self {
            directory,
            store,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_existent_directory() {
        let result = Collection::open(Some("./derpherp".to_string()));
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
    }

    #[test]
    fn test_open_creates_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let coll = Collection::open(Some(dir.path().display().to_string())).unwrap();
        assert_eq!(coll.store.card_count().unwrap(), 0);
        assert_eq!(coll.config, Config::default());
    }
}
