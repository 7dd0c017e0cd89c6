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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::web::state::ServerState;

#[derive(Deserialize)]
pub struct FormData {
    /// `flip`, `end`, or a rating ordinal `1`–`4`.
    action: String,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    action_handler(&state, &form.action).await;
    Redirect::to("/")
}

async fn action_handler(state: &ServerState, action: &str) {
    let mut mutable = state.mutable.lock().await;
    match action {
        "flip" => {
            mutable.session.flip();
            mutable.notice = None;
        }
        "end" => {
            log::debug!("Session ended by the learner.");
            mutable.finished = true;
        }
        // Re-invoke `load` after a failed reload.
        "reload" => match mutable.session.load().await {
            Ok(()) => mutable.notice = None,
            Err(e) => {
                log::error!("error: {e}");
                mutable.notice = Some(e.to_string());
            }
        },
        other => match other.parse::<u8>() {
            Ok(ordinal) => {
                // Rating input stays held (the session is locked) until the
                // update resolves one way or the other.
                match mutable.session.rate(ordinal).await {
                    Ok(()) => mutable.notice = None,
                    Err(e) => {
                        log::error!("error: {e}");
                        mutable.notice = Some(e.to_string());
                    }
                }
            }
            Err(_) => {
                log::error!("Unrecognized action: {other}");
                mutable.notice = Some(format!("unrecognized action: {other}"));
            }
        },
    }
}
