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

/// Fixtures are pinned to a cell and touched with a frequency; items can
/// be carried around by agents.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SurfaceKind {
    Item,
    Fixture { touch_frequency: f64 },
}

/** A contaminated surface. Fixtures transfer rate-based (their transfer
    rate carries the touch frequency and is multiplied by the time step
    at transfer time); items transfer ratio-based per contact.
**/
#[derive(Clone, PartialEq, Debug)]
pub struct Surface {
    pub name: String,
    pub init_x: usize,
    pub init_y: usize,
    pub contamination_load: f64,
    pub surface_decay_rate: f64,
    kind: SurfaceKind,
    transfer_efficiency: f64,
    surface_ratio: f64,
    transfer_rate: f64,
}

impl Surface {
    pub fn item(
        name: impl Into<String>,
        init_x: usize,
        init_y: usize,
        transfer_efficiency: f64,
        surface_ratio: f64,
        surface_decay_rate: f64,
    ) -> Self {
        Surface {
            name: name.into(),
            init_x,
            init_y,
            contamination_load: 0.0,
            surface_decay_rate,
            kind: SurfaceKind::Item,
            transfer_efficiency,
            surface_ratio,
            transfer_rate: transfer_efficiency * surface_ratio,
        }
    }

    pub fn fixture(
        name: impl Into<String>,
        init_x: usize,
        init_y: usize,
        transfer_efficiency: f64,
        surface_ratio: f64,
        touch_frequency: f64,
        surface_decay_rate: f64,
    ) -> Self {
        Surface {
            name: name.into(),
            init_x,
            init_y,
            contamination_load: 0.0,
            surface_decay_rate,
            kind: SurfaceKind::Fixture { touch_frequency },
            transfer_efficiency,
            surface_ratio,
            transfer_rate: transfer_efficiency * surface_ratio * touch_frequency,
        }
    }

    pub fn is_fixture(&self) -> bool {
        matches!(self.kind, SurfaceKind::Fixture { .. })
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Tag used in the surface contamination output.
    pub fn class_tag(&self) -> &'static str {
        if self.is_fixture() { "Fixture" } else { "Item" }
    }

    pub fn transfer_rate(&self) -> f64 {
        self.transfer_rate
    }

    /// Load moved by one contact: rate-based for fixtures, ratio-based
    /// for items.
    pub fn contact_transfer(&self, load: f64, time_step: f64) -> f64 {
        if self.is_fixture() {
            load * self.transfer_rate * time_step
        } else {
            load * self.transfer_rate
        }
    }
}

/// Wire form of a movable surface. The contamination load is runtime
/// state and is not persisted.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ItemSpec {
    pub name: String,
    pub x: usize,
    pub y: usize,
    pub transfer_efficiency: f64,
    pub surface_ratio: f64,
    pub surface_decay_rate: f64,
}

/// Wire form of a fixed surface.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct FixtureSpec {
    pub name: String,
    pub x: usize,
    pub y: usize,
    pub transfer_efficiency: f64,
    pub surface_ratio: f64,
    pub touch_frequency: f64,
    pub surface_decay_rate: f64,
}

impl From<ItemSpec> for Surface {
    fn from(spec: ItemSpec) -> Self {
        Surface::item(
            spec.name,
            spec.x,
            spec.y,
            spec.transfer_efficiency,
            spec.surface_ratio,
            spec.surface_decay_rate,
        )
    }
}

impl From<FixtureSpec> for Surface {
    fn from(spec: FixtureSpec) -> Self {
        Surface::fixture(
            spec.name,
            spec.x,
            spec.y,
            spec.transfer_efficiency,
            spec.surface_ratio,
            spec.touch_frequency,
            spec.surface_decay_rate,
        )
    }
}

impl Surface {
    pub fn to_item_spec(&self) -> Option<ItemSpec> {
        match self.kind {
            SurfaceKind::Item => Some(ItemSpec {
                name: self.name.clone(),
                x: self.init_x,
                y: self.init_y,
                transfer_efficiency: self.transfer_efficiency,
                surface_ratio: self.surface_ratio,
                surface_decay_rate: self.surface_decay_rate,
            }),
            SurfaceKind::Fixture { .. } => None,
        }
    }

    pub fn to_fixture_spec(&self) -> Option<FixtureSpec> {
        match self.kind {
            SurfaceKind::Fixture { touch_frequency } => Some(FixtureSpec {
                name: self.name.clone(),
                x: self.init_x,
                y: self.init_y,
                transfer_efficiency: self.transfer_efficiency,
                surface_ratio: self.surface_ratio,
                touch_frequency,
                surface_decay_rate: self.surface_decay_rate,
            }),
            SurfaceKind::Item => None,
        }
    }
}
