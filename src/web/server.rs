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
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::sync::oneshot;
use tokio::time::sleep;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::session::ReviewSession;
use crate::session::SessionState;
use crate::web::get::get_handler;
use crate::web::post::post_handler;
use crate::web::state::MutableState;
use crate::web::state::ServerState;

/// Open the collection, load the due queue, and serve the review session
/// until it is ended or interrupted.
pub async fn start_server(directory: Option<String>, port: Option<u16>) -> Fallible<()> {
    let coll = Collection::open(directory)?;
    log::debug!("Reviewing collection in {}", coll.directory.display());
    let port = port.unwrap_or(coll.config.port);
    let open_browser = coll.config.open_browser;

    let mut session = ReviewSession::new(coll.store);
    session.load().await?;
    match session.state() {
        SessionState::Empty { total_cards: 0 } => {
            println!("No cards in the collection.");
            return Ok(());
        }
        SessionState::Empty { .. } => {
            println!("No cards due right now.");
            return Ok(());
        }
        _ => {}
    }
    log::debug!(
        "{} of {} cards due.",
        session.due_count(),
        session.total_cards()
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let state = ServerState {
        mutable: Arc::new(Mutex::new(MutableState {
            session,
            notice: None,
            finished: false,
        })),
        shutdown_tx: Arc::new(std::sync::Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("0.0.0.0:{port}");

    // Start a separate task to open the browser.
    if open_browser {
        let url = format!("http://{bind}/");
        let probe = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&probe).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    // Start the server.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;
    Ok(())
}

async fn shutdown_signal(shutdown_rx: oneshot::Receiver<()>) {
    tokio::select! {
        _ = shutdown_rx => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
