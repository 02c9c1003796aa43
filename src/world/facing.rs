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

use serde::{Serialize, Deserialize};

/// Cardinal direction an agent is facing. Serialized as the single
/// letter used throughout the model files.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl Facing {
    /** Direction of a displacement, by angle quadrant: anything between
        45 and 135 degrees is North, the matching bands give East and
        South, the remainder is West. Diagonals on the 45-degree lines
        resolve to North/East/South by check order.
    **/
    pub fn from_displacement(dx: i64, dy: i64) -> Facing {
        let degrees = (dy as f64).atan2(dx as f64).to_degrees();
        if (45.0..=135.0).contains(&degrees) {
            Facing::North
        } else if (-45.0..=45.0).contains(&degrees) {
            Facing::East
        } else if (-135.0..=-45.0).contains(&degrees) {
            Facing::South
        } else {
            Facing::West
        }
    }
}
