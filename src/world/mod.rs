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

pub mod facing;
pub mod action;
pub mod effect;
pub mod surface;
pub mod agent;
pub mod environment;

pub use action::{Action, Script};
pub use agent::{Agent, AgentSpec};
pub use environment::{Environment, EnvironmentSpec};
pub use facing::Facing;
pub use surface::{FixtureSpec, ItemSpec, Surface, SurfaceKind};
