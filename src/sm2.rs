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

//! The scheduling engine: an SM-2-family recurrence over
//! (interval, ease factor).
//!
//! Everything here is a pure function of a card, a rating, and a reference
//! time. Persistence and session flow live elsewhere.

use crate::types::card::Flashcard;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

/// The floor for a card's ease factor.
pub const MIN_EASE: f64 = 1.3;

/// The ease factor assigned to a freshly created card.
pub const INITIAL_EASE: f64 = 2.5;

/// The scheduling fields of a card after one rating.
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulingUpdate {
    pub interval_days: u32,
    pub ease_factor: f64,
    pub repetition_count: u32,
    pub next_review_at: Timestamp,
    pub last_reviewed_at: Timestamp,
}

/// Compute the next scheduling state of `card` given `rating`.
///
/// Forgot resets the interval to one day and leaves the ease factor
/// untouched. (Classic SM-2 also penalizes ease on a failed recall; the
/// upstream app does not, and the behavior is reproduced here as-is. Whether
/// that is intentional is a product question, not a scheduling one.)
///
/// For the other ratings the interval grows `0 → 1 → 3 → ceil(interval *
/// ease)`, and the ease factor moves by `0.1 - (4 - r) * (0.08 + (4 - r) *
/// 0.02)`, clamped below at [`MIN_EASE`]. `ceil` applies only in the
/// multiplicative branch; the others are exact integers.
pub fn apply_rating(card: &Flashcard, rating: Rating, now: Timestamp) -> SchedulingUpdate {
    let (interval_days, ease_factor) = match rating {
        Rating::Forgot => (1, card.ease_factor),
        Rating::Hard | Rating::Good | Rating::Easy => {
            let interval_days = match card.interval_days {
                0 => 1,
                1 => 3,
                n => (n as f64 * card.ease_factor).ceil() as u32,
            };
            let miss = (4 - rating.ordinal()) as f64;
            let ease_factor = card.ease_factor + (0.1 - miss * (0.08 + miss * 0.02));
            let ease_factor = if ease_factor < MIN_EASE {
                MIN_EASE
            } else {
                ease_factor
            };
            (interval_days, ease_factor)
        }
    };
    SchedulingUpdate {
        interval_days,
        ease_factor,
        repetition_count: card.repetition_count + 1,
        next_review_at: now.add_days(interval_days),
        last_reviewed_at: now,
    }
}

/// What [`apply_rating`] would produce, without committing to anything.
///
/// The computation is identical; the separate name marks call sites that
/// only want to show the learner "next review in N days" before they choose.
pub fn preview_next_review(card: &Flashcard, rating: Rating, now: Timestamp) -> SchedulingUpdate {
    apply_rating(card, rating, now)
}

/// Preview intervals for all four ratings, from the same unmutated card.
pub fn preview_intervals(card: &Flashcard, now: Timestamp) -> [u32; 4] {
    Rating::ALL.map(|rating| preview_next_review(card, rating, now).interval_days)
}
