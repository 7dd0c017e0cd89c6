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

use serde::Deserialize;
use serde::Serialize;

use crate::sm2::INITIAL_EASE;
use crate::sm2::SchedulingUpdate;
use crate::types::card_id::CardId;
use crate::types::timestamp::Timestamp;

/// A spaced-repetition unit.
///
/// `front` and `back` are opaque to the scheduler; it never inspects their
/// content. `user_id` and `quiz_id` are weak references owned by the
/// upstream study app. The JSON representation uses camelCase because that
/// app's client speaks it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: CardId,
    pub user_id: String,
    pub quiz_id: String,
    pub front: String,
    pub back: String,
    /// Days until the next review, as of the last rating.
    pub interval_days: u32,
    /// Growth multiplier for the review interval. Never below 1.3.
    pub ease_factor: f64,
    /// The number of times the card has ever been rated.
    pub repetition_count: u32,
    /// The instant at or after which the card is due.
    pub next_review_at: Timestamp,
    /// Absent for a card that has never been rated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<Timestamp>,
}

impl Flashcard {
    /// A fresh card: immediately due, ease 2.5, no reviews yet.
    pub fn new(
        user_id: impl Into<String>,
        quiz_id: impl Into<String>,
        front: impl Into<String>,
        back: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: CardId::generate(),
            user_id: user_id.into(),
            quiz_id: quiz_id.into(),
            front: front.into(),
            back: back.into(),
            interval_days: 0,
            ease_factor: INITIAL_EASE,
            repetition_count: 0,
            next_review_at: created_at,
            last_reviewed_at: None,
        }
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review_at <= now
    }

    /// The card with the scheduling fields replaced and everything else
    /// untouched.
    pub fn with_update(&self, update: &SchedulingUpdate) -> Self {
        Self {
            interval_days: update.interval_days,
            ease_factor: update.ease_factor,
            repetition_count: update.repetition_count,
            next_review_at: update.next_review_at,
            last_reviewed_at: Some(update.last_reviewed_at),
            ..self.clone()
        }
    }
}
