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

#[cfg(test)]
pub mod memory;
pub mod sqlite;

use crate::error::Fallible;
use crate::types::card::Flashcard;

/// The persistence boundary of the review system.
///
/// The review session is the only writer, and it is injected with an
/// implementation of this trait rather than reaching for a global handle.
/// Both operations may suspend; they are the session's only suspension
/// points.
#[allow(async_fn_in_trait)]
pub trait Store {
    /// Fetch the learner's full card collection.
    ///
    /// No ordering is guaranteed, and filtering by owner is the store's
    /// concern, not the caller's.
    async fn list_flashcards(&self) -> Fallible<Vec<Flashcard>>;

    /// Replace the scheduling fields of the card with the given id.
    ///
    /// `front`, `back`, `user_id` and `quiz_id` are preserved as stored.
    /// The update is atomic: on an error, nothing was applied. Returns the
    /// persisted record.
    async fn update_flashcard(&self, card: &Flashcard) -> Fallible<Flashcard>;
}
