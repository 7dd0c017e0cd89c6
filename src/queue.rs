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

use crate::types::card::Flashcard;
use crate::types::timestamp::Timestamp;

/// Derive the ordered review queue from the full card collection.
///
/// Cards with `next_review_at <= now` are due, most overdue first. Ties are
/// broken by card id, so rebuilding from identical inputs always yields the
/// same order. The store guarantees no ordering; this is the only place
/// order is imposed.
pub fn build_queue(all_cards: &[Flashcard], now: Timestamp) -> Vec<Flashcard> {
    let mut due: Vec<Flashcard> = all_cards
        .iter()
        .filter(|card| card.is_due(now))
        .cloned()
        .collect();
    due.sort_by(|a, b| {
        a.next_review_at
            .cmp(&b.next_review_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    due
}
