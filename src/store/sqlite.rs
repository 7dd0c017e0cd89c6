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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::store::Store;
use crate::types::card::Flashcard;
use crate::types::card_id::CardId;
use crate::types::timestamp::Timestamp;

/// The SQLite-backed card store.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

/// One rating event, as recorded in the review log.
pub struct ReviewRecord {
    pub card_id: CardId,
    pub rated_at: Timestamp,
    pub interval_days: u32,
    pub ease_factor: f64,
    pub next_review_at: Timestamp,
}

impl SqliteStore {
    pub fn open(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("../schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// Add a new card to the database.
    pub fn insert_card(&self, card: &Flashcard, created_at: Timestamp) -> Fallible<()> {
        log::debug!("Adding new card: {}", card.id);
        let sql = "insert into cards (card_id, user_id, quiz_id, front, back, interval_days, ease_factor, repetition_count, next_review_at, last_reviewed_at, created_at) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);";
        let conn = self.acquire();
        conn.execute(
            sql,
            (
                card.id,
                &card.user_id,
                &card.quiz_id,
                &card.front,
                &card.back,
                card.interval_days,
                card.ease_factor,
                card.repetition_count,
                card.next_review_at,
                card.last_reviewed_at,
                created_at,
            ),
        )?;
        Ok(())
    }

    pub fn card_count(&self) -> Fallible<usize> {
        let conn = self.acquire();
        let count: i64 =
            conn.query_row("select count(*) from cards;", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn due_count(&self, now: Timestamp) -> Fallible<usize> {
        let conn = self.acquire();
        let sql = "select count(*) from cards where next_review_at <= ?;";
        let count: i64 = conn.query_row(sql, [now], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn never_reviewed_count(&self) -> Fallible<usize> {
        let conn = self.acquire();
        let sql = "select count(*) from cards where last_reviewed_at is null;";
        let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn review_count(&self) -> Fallible<usize> {
        let conn = self.acquire();
        let count: i64 =
            conn.query_row("select count(*) from reviews;", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Mean ease factor across the collection. `None` for an empty one.
    pub fn mean_ease_factor(&self) -> Fallible<Option<f64>> {
        let conn = self.acquire();
        let mean: Option<f64> =
            conn.query_row("select avg(ease_factor) from cards;", [], |row| row.get(0))?;
        Ok(mean)
    }

    /// The review log, oldest first.
    pub fn list_reviews(&self) -> Fallible<Vec<ReviewRecord>> {
        let mut reviews = Vec::new();
        let conn = self.acquire();
        let sql = "select card_id, rated_at, interval_days, ease_factor, next_review_at from reviews order by rated_at, review_id;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            reviews.push(ReviewRecord {
                card_id: row.get(0)?,
                rated_at: row.get(1)?,
                interval_days: row.get(2)?,
                ease_factor: row.get(3)?,
                next_review_at: row.get(4)?,
            });
        }
        Ok(reviews)
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}

impl Store for SqliteStore {
    async fn list_flashcards(&self) -> Fallible<Vec<Flashcard>> {
        let mut cards = Vec::new();
        let conn = self.acquire();
        let sql = "select card_id, user_id, quiz_id, front, back, interval_days, ease_factor, repetition_count, next_review_at, last_reviewed_at from cards;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            cards.push(read_card(row)?);
        }
        Ok(cards)
    }

    async fn update_flashcard(&self, card: &Flashcard) -> Fallible<Flashcard> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let sql = "update cards set interval_days = ?, ease_factor = ?, repetition_count = ?, next_review_at = ?, last_reviewed_at = ? where card_id = ?;";
        let affected = tx.execute(
            sql,
            (
                card.interval_days,
                card.ease_factor,
                card.repetition_count,
                card.next_review_at,
                card.last_reviewed_at,
                card.id,
            ),
        )?;
        if affected != 1 {
            return Err(ErrorReport::new(format!("no card with id {}", card.id)));
        }
        // An update without a rating instant is not a rating event, so it
        // leaves no trace in the review log.
        if let Some(rated_at) = card.last_reviewed_at {
            insert_review(
                &tx,
                &ReviewRecord {
                    card_id: card.id,
                    rated_at,
                    interval_days: card.interval_days,
                    ease_factor: card.ease_factor,
                    next_review_at: card.next_review_at,
                },
            )?;
        }
        let persisted = get_card(&tx, card.id)?;
        tx.commit()?;
        Ok(persisted)
    }
}

fn read_card(row: &Row) -> rusqlite::Result<Flashcard> {
    Ok(Flashcard {
        id: row.get(0)?,
        user_id: row.get(1)?,
        quiz_id: row.get(2)?,
        front: row.get(3)?,
        back: row.get(4)?,
        interval_days: row.get(5)?,
        ease_factor: row.get(6)?,
        repetition_count: row.get(7)?,
        next_review_at: row.get(8)?,
        last_reviewed_at: row.get(9)?,
    })
}

fn get_card(tx: &Transaction, id: CardId) -> Fallible<Flashcard> {
    let sql = "select card_id, user_id, quiz_id, front, back, interval_days, ease_factor, repetition_count, next_review_at, last_reviewed_at from cards where card_id = ?;";
    let card = tx.query_row(sql, [id], read_card)?;
    Ok(card)
}

type ReviewId = i64;

fn insert_review(tx: &Transaction, review: &ReviewRecord) -> Fallible<ReviewId> {
    let sql = "insert into reviews (card_id, rated_at, interval_days, ease_factor, next_review_at) values (?, ?, ?, ?, ?) returning review_id;";
    let review_id: ReviewId = tx.query_row(
        sql,
        (
            review.card_id,
            review.rated_at,
            review.interval_days,
            review.ease_factor,
            review.next_review_at,
        ),
        |row| row.get(0),
    )?;
    Ok(review_id)
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}
