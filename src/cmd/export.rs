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

use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::store::Store;
use crate::types::card::Flashcard;
use crate::types::card_id::CardId;
use crate::types::timestamp::Timestamp;

pub async fn export_collection(directory: Option<String>) -> Fallible<()> {
    let coll: Collection = Collection::open(directory)?;
    let export: Export = get_export(&coll).await?;
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    cards: Vec<Flashcard>,
    reviews: Vec<ReviewExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewExport {
    card_id: CardId,
    rated_at: Timestamp,
    interval_days: u32,
    ease_factor: f64,
    next_review_at: Timestamp,
}

async fn get_export(coll: &Collection) -> Fallible<Export> {
    let cards: Vec<Flashcard> = coll.store.list_flashcards().await?;
    let reviews: Vec<ReviewExport> = coll
        .store
        .list_reviews()?
        .into_iter()
        .map(|review| ReviewExport {
            card_id: review.card_id,
            rated_at: review.rated_at,
            interval_days: review.interval_days,
            ease_factor: review.ease_factor,
            next_review_at: review.next_review_at,
        })
        .collect();
    Ok(Export { cards, reviews })
}
