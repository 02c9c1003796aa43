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

//! Tick-driven agent-based simulation of airborne and fomite pathogen
//! transmission in an indoor environment: two diffusing air layers over
//! a discrete grid, contaminated surfaces, and scripted agents that
//! emit, inhale and touch.

pub mod error;
pub mod sim_utils;
pub mod air;
pub mod world;
pub mod model;
pub mod writers;

pub use error::{SimError, SimResult};
pub use model::{Model, ModelSpec};
pub use sim_utils::config::Config;
