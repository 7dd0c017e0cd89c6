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

/// The learner's self-assessed recall quality for a card.
///
/// Ratings arrive from the UI as the ordinals `1=Forgot, 2=Hard, 3=Good,
/// 4=Easy`. `from_ordinal` is the single place where raw ordinals are
/// validated; the scheduling engine only ever sees one of the four levels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rating {
    Forgot,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Forgot, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1 => Some(Rating::Forgot),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }

    pub fn ordinal(self) -> u8 {
        match self {
            Rating::Forgot => 1,
            Rating::Hard => 2,
            Rating::Good => 3,
            Rating::Easy => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Forgot => "Forgot",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
