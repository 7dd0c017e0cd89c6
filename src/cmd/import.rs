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
use std::path::PathBuf;

use serde::Deserialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::card::Flashcard;
use crate::types::timestamp::Timestamp;

/// One card as produced by the upstream quiz generator's export.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportCard {
    user_id: String,
    quiz_id: String,
    front: String,
    back: String,
}

/// Import cards from a JSON array of `{userId, quizId, front, back}`
/// records. Imported cards get fresh scheduling state and are immediately
/// due.
pub fn import_cards(directory: Option<String>, file: &PathBuf) -> Fallible<()> {
    let coll: Collection = Collection::open(directory)?;
    let content = read_to_string(file)?;
    let records: Vec<ImportCard> = serde_json::from_str(&content)?;
    let now = Timestamp::now();
    for record in &records {
        let card = Flashcard::new(
            record.user_id.clone(),
            record.quiz_id.clone(),
            record.front.clone(),
            record.back.clone(),
            now,
        );
        coll.store.insert_card(&card, now)?;
    }
    println!("Imported {} cards.", records.len());
    Ok(())
}
