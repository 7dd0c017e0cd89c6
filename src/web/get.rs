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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::session::SessionState;
use crate::sm2::preview_intervals;
use crate::types::card::Flashcard;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;
use crate::web::state::ServerState;
use crate::web::template::page_template;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mutable = state.mutable.lock().await;
    let notice = mutable.notice.clone();
    let body = if mutable.finished {
        // The final page: render it, then let the server wind down.
        if let Some(tx) = state.shutdown_tx.lock().unwrap().take() {
            let _ = tx.send(());
        }
        html! {
            div.finished {
                h1 {
                    "Session Completed"
                }
                p {
                    (format!("{} cards reviewed.", mutable.session.reviewed()))
                }
            }
        }
    } else {
        match mutable.session.state() {
            SessionState::Reviewing { card, flipped } => {
                let progress = format!(
                    "{} / {}",
                    mutable.session.reviewed(),
                    mutable.session.reviewed() + mutable.session.due_count()
                );
                card_page(card, *flipped, &progress)
            }
            SessionState::Empty { total_cards: 0 } => {
                html! {
                    div.empty {
                        h1 {
                            "No cards yet"
                        }
                        p {
                            "Import some with `studycards import`."
                        }
                        (end_form())
                    }
                }
            }
            SessionState::Empty { .. } => {
                html! {
                    div.empty {
                        h1 {
                            "All caught up"
                        }
                        p {
                            (format!("{} cards reviewed.", mutable.session.reviewed()))
                        }
                        (end_form())
                    }
                }
            }
            SessionState::Idle | SessionState::Loading => {
                html! {
                    div.empty {
                        p {
                            "Nothing loaded."
                        }
                        form action="/" method="post" {
                            button id="reload" name="action" value="reload" { "Retry" }
                        }
                    }
                }
            }
        }
    };
    let body = html! {
        @if let Some(notice) = notice {
            div.notice {
                (notice)
            }
        }
        (body)
    };
    let html = page_template(body);
    (StatusCode::OK, Html(html.into_string()))
}

fn card_page(card: &Flashcard, flipped: bool, progress: &str) -> Markup {
    let card_content = if flipped {
        html! {
            div.content {
                div.question {
                    p {
                        (card.front)
                    }
                }
                div.answer {
                    p {
                        (card.back)
                    }
                }
            }
        }
    } else {
        html! {
            div.content {
                div.question {
                    p {
                        (card.front)
                    }
                }
                div.answer {}
            }
        }
    };
    let card_controls = if flipped {
        // Every rating shows what it would schedule, all computed from the
        // same unmutated card.
        let intervals = preview_intervals(card, Timestamp::now());
        html! {
            form action="/" method="post" {
                @for (rating, days) in Rating::ALL.iter().zip(intervals) {
                    button name="action" value=(rating.ordinal()) {
                        (format!("{} · {}d", rating.as_str(), days))
                    }
                }
                div.spacer {}
                button id="end" name="action" value="end" { "End" }
            }
        }
    } else {
        html! {
            form action="/" method="post" {
                button id="flip" name="action" value="flip" { "Flip" }
                div.spacer {}
                button id="end" name="action" value="end" { "End" }
            }
        }
    };
    html! {
        div.root {
            div.card {
                div.header {
                    h1 {
                        (card.quiz_id)
                    }
                    div.progress {
                        (progress)
                    }
                }
                (card_content)
                div.controls {
                    (card_controls)
                }
            }
        }
    }
}

fn end_form() -> Markup {
    html! {
        form action="/" method="post" {
            button id="end" name="action" value="end" { "End" }
        }
    }
}
