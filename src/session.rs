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

//! The review session state machine.
//!
//! `Idle → Loading → {Empty | Reviewing(card, flipped)}`, with `Reviewing`
//! persisting across cards until the due queue is exhausted. The session
//! owns no rendering; the web layer (or a test) drives it through `load`,
//! `flip` and `rate`.

use std::fmt::Display;
use std::fmt::Formatter;

use crate::error::ErrorReport;
use crate::queue::build_queue;
use crate::sm2;
use crate::store::Store;
use crate::types::card::Flashcard;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    Idle,
    Loading,
    /// Nothing to review. `total_cards` distinguishes an empty collection
    /// ("no cards yet") from a collection with nothing due ("all caught
    /// up").
    Empty { total_cards: usize },
    Reviewing { card: Flashcard, flipped: bool },
}

#[derive(Debug)]
pub enum SessionError {
    /// The full card collection could not be fetched. Retryable via
    /// `load()`.
    Load(ErrorReport),
    /// Persisting a rating failed. The session keeps the same current
    /// card, nothing was written, and the same rating can be retried.
    Update(ErrorReport),
    /// A rating ordinal outside 1–4, rejected before any computation or
    /// I/O.
    InvalidRating(u8),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Load(e) => {
                write!(f, "failed to load flashcards: {}", e.message())
            }
            SessionError::Update(e) => {
                write!(f, "failed to save the review: {}", e.message())
            }
            SessionError::InvalidRating(ordinal) => {
                write!(f, "invalid rating: {ordinal} (expected 1 to 4)")
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl From<SessionError> for ErrorReport {
    fn from(e: SessionError) -> Self {
        ErrorReport::new(e.to_string())
    }
}

/// One learner's walk through the cards currently due.
///
/// The store is injected so tests can substitute an in-memory fake. All
/// mutation goes through `&mut self`, so at most one rating is ever in
/// flight; callers are expected to disable rating input while `rate` is
/// pending.
pub struct ReviewSession<S> {
    store: S,
    state: SessionState,
    queue: Vec<Flashcard>,
    total_cards: usize,
    reviewed: usize,
}

impl<S: Store> ReviewSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: SessionState::Idle,
            queue: Vec::new(),
            total_cards: 0,
            reviewed: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Cards still due, including the one being reviewed.
    pub fn due_count(&self) -> usize {
        self.queue.len()
    }

    /// Size of the collection as of the last load.
    pub fn total_cards(&self) -> usize {
        self.total_cards
    }

    /// Ratings persisted during this session.
    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    /// Fetch the full collection and rebuild the due queue.
    ///
    /// This is the only point where the collection is fetched, and the
    /// reference time is sampled fresh on every call: a card that crossed
    /// its due boundary since the last load enters the queue here, never
    /// retroactively.
    pub async fn load(&mut self) -> Result<(), SessionError> {
        self.load_at(Timestamp::now()).await
    }

    /// `load` against a fixed reference time.
    pub async fn load_at(&mut self, now: Timestamp) -> Result<(), SessionError> {
        self.state = SessionState::Loading;
        let cards = match self.store.list_flashcards().await {
            Ok(cards) => cards,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(SessionError::Load(e));
            }
        };
        self.total_cards = cards.len();
        self.queue = build_queue(&cards, now);
        self.state = match self.queue.first() {
            Some(card) => SessionState::Reviewing {
                card: card.clone(),
                flipped: false,
            },
            None => SessionState::Empty {
                total_cards: self.total_cards,
            },
        };
        Ok(())
    }

    /// Toggle between the front and the back of the current card. No I/O.
    pub fn flip(&mut self) {
        match &mut self.state {
            SessionState::Reviewing { flipped, .. } => *flipped = !*flipped,
            _ => log::error!("Flipping a card outside of a review."),
        }
    }

    /// Rate the current card and advance.
    ///
    /// The ordinal is validated before anything else. The card's new
    /// scheduling state is computed, persisted, and only then does the
    /// queue rebuild (full reload, fresh reference time semantics). If the
    /// store rejects the update, the session stays on the same card with
    /// nothing changed, locally or remotely.
    pub async fn rate(&mut self, rating: u8) -> Result<(), SessionError> {
        self.rate_at(rating, Timestamp::now()).await
    }

    /// `rate` against a fixed reference time.
    pub async fn rate_at(&mut self, rating: u8, now: Timestamp) -> Result<(), SessionError> {
        let rating = match Rating::from_ordinal(rating) {
            Some(rating) => rating,
            None => return Err(SessionError::InvalidRating(rating)),
        };
        let card = match &self.state {
            SessionState::Reviewing { card, flipped: true } => card.clone(),
            SessionState::Reviewing { flipped: false, .. } => {
                log::error!("Rating a card that has not been flipped.");
                return Ok(());
            }
            _ => {
                log::error!("Rating a card outside of a review.");
                return Ok(());
            }
        };
        let update = sm2::apply_rating(&card, rating, now);
        self.store
            .update_flashcard(&card.with_update(&update))
            .await
            .map_err(SessionError::Update)?;
        log::debug!(
            "{} {} interval={}d ease={:.2} due={}",
            card.id.short(),
            rating.as_str(),
            update.interval_days,
            update.ease_factor,
            update.next_review_at
        );
        self.reviewed += 1;
        self.load_at(now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::types::timestamp::DAY_MS;

    fn due_card(front: &str, due_at: i64) -> Flashcard {
        let mut card = Flashcard::new("u1", "q1", front, "back", Timestamp::from_millis(0));
        card.next_review_at = Timestamp::from_millis(due_at);
        card
    }

    fn current_card(session: &ReviewSession<MemoryStore>) -> Flashcard {
        match session.state() {
            SessionState::Reviewing { card, .. } => card.clone(),
            other => panic!("not reviewing: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_empty_collection() {
        let mut session = ReviewSession::new(MemoryStore::new(vec![]));
        session.load_at(Timestamp::from_millis(0)).await.unwrap();
        assert_eq!(*session.state(), SessionState::Empty { total_cards: 0 });
        assert_eq!(session.due_count(), 0);
    }

    #[tokio::test]
    async fn test_load_with_nothing_due() {
        let store = MemoryStore::new(vec![due_card("a", 100)]);
        let mut session = ReviewSession::new(store);
        session.load_at(Timestamp::from_millis(50)).await.unwrap();
        assert_eq!(*session.state(), SessionState::Empty { total_cards: 1 });
    }

    #[tokio::test]
    async fn test_load_presents_most_overdue_card_unflipped() {
        let store = MemoryStore::new(vec![due_card("newer", 20), due_card("older", 10)]);
        let mut session = ReviewSession::new(store);
        session.load_at(Timestamp::from_millis(30)).await.unwrap();
        match session.state() {
            SessionState::Reviewing { card, flipped } => {
                assert_eq!(card.front, "older");
                assert!(!flipped);
            }
            other => panic!("not reviewing: {other:?}"),
        }
        assert_eq!(session.due_count(), 2);
        assert_eq!(session.total_cards(), 2);
    }

    #[tokio::test]
    async fn test_flip_toggles() {
        let store = MemoryStore::new(vec![due_card("a", 0)]);
        let mut session = ReviewSession::new(store);
        session.load_at(Timestamp::from_millis(0)).await.unwrap();
        let card = current_card(&session);
        session.flip();
        assert_eq!(
            *session.state(),
            SessionState::Reviewing {
                card: card.clone(),
                flipped: true
            }
        );
        session.flip();
        assert_eq!(
            *session.state(),
            SessionState::Reviewing {
                card,
                flipped: false
            }
        );
    }

    #[tokio::test]
    async fn test_flip_outside_review_is_a_no_op() {
        let mut session = ReviewSession::new(MemoryStore::new(vec![]));
        session.flip();
        assert_eq!(*session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_rate_unflipped_card_is_a_no_op() {
        let store = MemoryStore::new(vec![due_card("a", 0)]);
        let mut session = ReviewSession::new(store);
        session.load_at(Timestamp::from_millis(0)).await.unwrap();
        let before = session.state().clone();
        session.rate_at(3, Timestamp::from_millis(0)).await.unwrap();
        assert_eq!(*session.state(), before);
        assert_eq!(session.reviewed(), 0);
    }

    #[tokio::test]
    async fn test_invalid_rating_rejected_before_anything_happens() {
        let store = MemoryStore::new(vec![due_card("a", 0)]);
        let mut session = ReviewSession::new(store);
        session.load_at(Timestamp::from_millis(0)).await.unwrap();
        session.flip();
        let before = session.state().clone();
        for ordinal in [0, 5, 9] {
            let result = session.rate_at(ordinal, Timestamp::from_millis(0)).await;
            match result {
                Err(SessionError::InvalidRating(n)) => assert_eq!(n, ordinal),
                other => panic!("expected InvalidRating: {other:?}"),
            }
        }
        assert_eq!(*session.state(), before);
        assert_eq!(session.reviewed(), 0);
    }

    #[tokio::test]
    async fn test_rate_persists_and_advances() {
        let first = due_card("first", 10);
        let second = due_card("second", 20);
        let store = MemoryStore::new(vec![first.clone(), second.clone()]);
        let mut session = ReviewSession::new(store);
        let now = Timestamp::from_millis(30);
        session.load_at(now).await.unwrap();
        session.flip();
        session.rate_at(3, now).await.unwrap();

        // The rated card was persisted with its new scheduling state and
        // dropped out of the queue; the next card is up, unflipped.
        match session.state() {
            SessionState::Reviewing { card, flipped } => {
                assert_eq!(card.front, "second");
                assert!(!flipped);
            }
            other => panic!("not reviewing: {other:?}"),
        }
        assert_eq!(session.reviewed(), 1);
        assert_eq!(session.due_count(), 1);
    }

    #[tokio::test]
    async fn test_rate_merges_scheduling_fields_into_the_stored_card() {
        let card = due_card("a", 10);
        let store = MemoryStore::new(vec![card.clone()]);
        let mut session = ReviewSession::new(store);
        let now = Timestamp::from_millis(30);
        session.load_at(now).await.unwrap();
        session.flip();
        session.rate_at(3, now).await.unwrap();
        assert_eq!(*session.state(), SessionState::Empty { total_cards: 1 });

        let stored = session.store.get(card.id).unwrap();
        assert_eq!(stored.front, "a");
        assert_eq!(stored.back, "back");
        assert_eq!(stored.interval_days, 1);
        assert_eq!(stored.repetition_count, 1);
        assert_eq!(stored.next_review_at.as_millis(), 30 + DAY_MS);
        assert_eq!(stored.last_reviewed_at, Some(now));
    }

    #[tokio::test]
    async fn test_forgotten_card_is_not_represented_until_tomorrow() {
        let store = MemoryStore::new(vec![due_card("a", 0)]);
        let mut session = ReviewSession::new(store);
        let now = Timestamp::from_millis(100);
        session.load_at(now).await.unwrap();
        session.flip();
        session.rate_at(1, now).await.unwrap();
        // Even Forgot schedules a day ahead, so the card is gone for now...
        assert_eq!(*session.state(), SessionState::Empty { total_cards: 1 });
        // ...and due again on a load a day later.
        session.load_at(now.add_days(1)).await.unwrap();
        assert_eq!(current_card(&session).front, "a");
    }

    #[tokio::test]
    async fn test_update_failure_keeps_the_session_in_place() {
        let card = due_card("a", 0);
        let store = MemoryStore::new(vec![card.clone()]);
        store.fail_next_update();
        let mut session = ReviewSession::new(store);
        let now = Timestamp::from_millis(10);
        session.load_at(now).await.unwrap();
        session.flip();

        let result = session.rate_at(3, now).await;
        assert!(matches!(result, Err(SessionError::Update(_))));
        // Same card, still flipped, nothing persisted.
        assert_eq!(
            *session.state(),
            SessionState::Reviewing {
                card: card.clone(),
                flipped: true
            }
        );
        assert_eq!(session.store.get(card.id).unwrap(), card);
        assert_eq!(session.reviewed(), 0);

        // The identical rating succeeds on retry.
        session.rate_at(3, now).await.unwrap();
        assert_eq!(session.reviewed(), 1);
        assert_eq!(*session.state(), SessionState::Empty { total_cards: 1 });
    }

    #[tokio::test]
    async fn test_load_failure_is_retryable() {
        let store = MemoryStore::new(vec![due_card("a", 0)]);
        store.fail_next_list();
        let mut session = ReviewSession::new(store);
        let result = session.load_at(Timestamp::from_millis(10)).await;
        assert!(matches!(result, Err(SessionError::Load(_))));
        assert_eq!(*session.state(), SessionState::Idle);

        session.load_at(Timestamp::from_millis(10)).await.unwrap();
        assert_eq!(current_card(&session).front, "a");
    }

    #[tokio::test]
    async fn test_card_becomes_due_on_the_next_load_not_retroactively() {
        let early = due_card("early", 0);
        let late = due_card("late", 2 * DAY_MS);
        let store = MemoryStore::new(vec![early, late]);
        let mut session = ReviewSession::new(store);

        // Load while only the early card is due.
        session.load_at(Timestamp::from_millis(DAY_MS)).await.unwrap();
        assert_eq!(session.due_count(), 1);

        // Wall-clock time passes the late card's boundary; the open
        // Reviewing state does not pick it up.
        assert_eq!(session.due_count(), 1);
        assert_eq!(current_card(&session).front, "early");

        // Rating the early card reloads with a fresh reference time, and
        // only then does the late card enter the queue.
        session.flip();
        session
            .rate_at(3, Timestamp::from_millis(2 * DAY_MS))
            .await
            .unwrap();
        assert_eq!(current_card(&session).front, "late");

        // A load exactly at the boundary includes the card.
        let store = MemoryStore::new(vec![due_card("edge", 5 * DAY_MS)]);
        let mut session = ReviewSession::new(store);
        session
            .load_at(Timestamp::from_millis(5 * DAY_MS - 1))
            .await
            .unwrap();
        assert_eq!(*session.state(), SessionState::Empty { total_cards: 1 });
        session
            .load_at(Timestamp::from_millis(5 * DAY_MS))
            .await
            .unwrap();
        assert_eq!(current_card(&session).front, "edge");
    }

    #[tokio::test]
    async fn test_session_error_messages_are_distinguishable() {
        let load = SessionError::Load(ErrorReport::new("boom"));
        let update = SessionError::Update(ErrorReport::new("boom"));
        let invalid = SessionError::InvalidRating(7);
        assert_eq!(load.to_string(), "failed to load flashcards: boom");
        assert_eq!(update.to_string(), "failed to save the review: boom");
        assert_eq!(invalid.to_string(), "invalid rating: 7 (expected 1 to 4)");
    }
}
