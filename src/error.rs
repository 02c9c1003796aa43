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

use thiserror::Error;

/// Fatal simulation errors. Anything that only deserves a warning
/// (pickup of a missing item, duplicate hold, ...) is logged and skipped
/// instead of being raised here.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("coordinates ({0},{1}) are outside the air grid")]
    OutOfBounds(i64, i64),

    #[error("agent cannot be placed at ({0},{1})")]
    IllegalAgentPosition(i64, i64),

    #[error("invalid emission pattern: {0}")]
    IllegalPattern(String),

    #[error("duplicate surface name: {0}")]
    DuplicateSurfaceName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
