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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// JSON output.
    Json,
    /// Plain text output.
    Plain,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Json => write!(f, "json"),
            StatsFormat::Plain => write!(f, "plain"),
        }
    }
}

pub fn print_collection_stats(directory: Option<String>, format: StatsFormat) -> Fallible<()> {
    let coll: Collection = Collection::open(directory)?;
    let stats: Stats = get_stats(&coll, Timestamp::now())?;
    match format {
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{stats_json}");
        }
        StatsFormat::Plain => {
            println!("cards:          {}", stats.card_count);
            println!("due now:        {}", stats.due_count);
            println!("never reviewed: {}", stats.never_reviewed_count);
            println!("reviews logged: {}", stats.review_count);
            match stats.mean_ease_factor {
                Some(mean) => println!("mean ease:      {mean:.2}"),
                None => println!("mean ease:      n/a"),
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    card_count: usize,
    due_count: usize,
    never_reviewed_count: usize,
    review_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_ease_factor: Option<f64>,
}

fn get_stats(coll: &Collection, now: Timestamp) -> Fallible<Stats> {
    Ok(Stats {
        card_count: coll.store.card_count()?,
        due_count: coll.store.due_count(now)?,
        never_reviewed_count: coll.store.never_reviewed_count()?,
        review_count: coll.store.review_count()?,
        mean_ease_factor: coll.store.mean_ease_factor()?,
    })
}
