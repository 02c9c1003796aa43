/*
    Copyright 2023 github.com/programaquatic

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::world::facing::Facing;

/// One scripted agent action. The wire format is discriminated by a
/// lowercase "type" field.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Place the agent at its entry point and activate it.
    Enter { x: i64, y: i64, facing: Facing },
    /// Relative move; facing defaults to the direction of the displacement.
    Move {
        x: i64,
        y: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        facing: Option<Facing>,
    },
    Leave,
    Pickup { target: String },
    Putdown { target: String },
    Handwash,
    DonMask,
    DoffMask,
    Face { direction: Facing },
}

/// Scripted actions keyed by tick. JSON object keys are strings on the
/// wire and parse back to integer ticks.
pub type Script = BTreeMap<u64, Action>;
