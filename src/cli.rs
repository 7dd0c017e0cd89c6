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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::export::export_collection;
use crate::cmd::import::import_cards;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_collection_stats;
use crate::error::Fallible;
use crate::web::server::start_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Review due cards in the browser.
    Review {
        /// Optional path to the collection directory.
        directory: Option<String>,
        /// Port to serve on. Overrides the collection config.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Import cards from a JSON file.
    Import {
        /// Path to a JSON array of {userId, quizId, front, back} records.
        file: PathBuf,
        /// Optional path to the collection directory.
        directory: Option<String>,
    },
    /// Export the collection and its review log as JSON.
    Export {
        /// Optional path to the collection directory.
        directory: Option<String>,
    },
    /// Print collection statistics.
    Stats {
        /// Optional path to the collection directory.
        directory: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Json)]
        format: StatsFormat,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Review { directory, port } => start_server(directory, port).await,
        Command::Import { file, directory } => import_cards(directory, &file),
        Command::Export { directory } => export_collection(directory).await,
        Command::Stats { directory, format } => print_collection_stats(directory, format),
    }
}
