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

use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::error::Fallible;
use crate::error::fail;
use crate::store::Store;
use crate::types::card::Flashcard;
use crate::types::card_id::CardId;

/// An in-memory store for tests, with injectable failures.
pub struct MemoryStore {
    cards: Mutex<Vec<Flashcard>>,
    fail_next_list: AtomicBool,
    fail_next_update: AtomicBool,
}

impl MemoryStore {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards: Mutex::new(cards),
            fail_next_list: AtomicBool::new(false),
            fail_next_update: AtomicBool::new(false),
        }
    }

    /// Make the next `list_flashcards` call fail.
    pub fn fail_next_list(&self) {
        self.fail_next_list.store(true, Ordering::SeqCst);
    }

    /// Make the next `update_flashcard` call fail.
    pub fn fail_next_update(&self) {
        self.fail_next_update.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, id: CardId) -> Option<Flashcard> {
        self.cards
            .lock()
            .unwrap()
            .iter()
            .find(|card| card.id == id)
            .cloned()
    }
}

impl Store for MemoryStore {
    async fn list_flashcards(&self) -> Fallible<Vec<Flashcard>> {
        if self.fail_next_list.swap(false, Ordering::SeqCst) {
            return fail("injected list failure");
        }
        Ok(self.cards.lock().unwrap().clone())
    }

    async fn update_flashcard(&self, card: &Flashcard) -> Fallible<Flashcard> {
        if self.fail_next_update.swap(false, Ordering::SeqCst) {
            return fail("injected update failure");
        }
        let mut cards = self.cards.lock().unwrap();
        let stored = match cards.iter_mut().find(|stored| stored.id == card.id) {
            Some(stored) => stored,
            None => return fail("no such card"),
        };
        // Only the scheduling fields move; content fields keep whatever the
        // store already has, mirroring the contract.
        stored.interval_days = card.interval_days;
        stored.ease_factor = card.ease_factor;
        stored.repetition_count = card.repetition_count;
        stored.next_review_at = card.next_review_at;
        stored.last_reviewed_at = card.last_reviewed_at;
        Ok(stored.clone())
    }
}
