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

use log::warn;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::sim_utils::config::EnvConfig;
use crate::world::action::{Action, Script};
use crate::world::effect::{handwash_ticks, Effect, EffectKind};
use crate::world::facing::Facing;
use crate::world::surface::Surface;

/** A scripted actor. Agents carry a viral load, per-tick exposure
    accumulators for the three contaminant routes, emission and pickup
    coefficients, and a list of active effects. Held items are indices
    into the environment's surface arena.
**/
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: usize,
    pub name: String,
    pub viral_load: f64,

    pub contamination_load_air: f64,
    pub contamination_load_droplet: f64,
    pub contamination_load_surface_accumulation: f64,

    pub emission_rate_air: f64,
    pub emission_rate_droplet: f64,
    pub pick_up_air: f64,
    pub pick_up_droplet: f64,

    pub script: Script,
    pub is_active: bool,
    pub facing: Facing,
    pub queued_cough: bool,

    held: Vec<usize>,
    effects: Vec<Effect>,
}

impl Agent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        viral_load: f64,
        contamination_load_air: f64,
        contamination_load_droplet: f64,
        contamination_load_surface: f64,
        emission_rate_air: f64,
        emission_rate_droplet: f64,
        pick_up_air: f64,
        pick_up_droplet: f64,
        script: Script,
        is_active: bool,
        wearing_mask: bool,
    ) -> Self {
        let name = name.into();
        let first_action = script.values().next();
        let facing = match first_action {
            None => {
                warn!("Agent {} has no script", name);
                Facing::North
            }
            Some(Action::Enter { facing, .. }) => *facing,
            Some(_) => {
                warn!("First script action is not Enter, Agent {} will never be active", name);
                Facing::North
            }
        };
        let mut agent = Agent {
            id: 0,
            name,
            viral_load,
            contamination_load_air,
            contamination_load_droplet,
            contamination_load_surface_accumulation: contamination_load_surface,
            emission_rate_air,
            emission_rate_droplet,
            pick_up_air,
            pick_up_droplet,
            script,
            is_active,
            facing,
            queued_cough: false,
            held: Vec::new(),
            effects: Vec::new(),
        };
        if wearing_mask {
            agent.don_mask();
        }
        agent
    }

    /// Infected agents may cough; the roll happens in process_effects.
    pub fn set_config(&mut self, _cfg: &EnvConfig) {
        if self.viral_load > 0.0 {
            self.effects.push(Effect::Coughing);
        }
    }

    pub fn emit_aerosol(&self, cfg: &EnvConfig) -> f64 {
        let mut emission_load = self.viral_load * self.emission_rate_air * cfg.SimulationTimeStep;
        if self.queued_cough {
            emission_load = self.viral_load
                * self.emission_rate_air
                * cfg.SimulationTimeStep
                * cfg.CoughingFactor
                * cfg.CoughingAerosolPercentage;
        }
        if self.under_effect(EffectKind::WearingMask) {
            emission_load * cfg.MaskEmissionAerosolReductionEfficiency
        } else {
            emission_load
        }
    }

    pub fn emit_droplet(&self, cfg: &EnvConfig) -> f64 {
        let mut emission_load = self.viral_load * self.emission_rate_droplet * cfg.SimulationTimeStep;
        if self.queued_cough {
            // coughs are driven by the air emission rate on both layers
            emission_load = self.viral_load
                * self.emission_rate_air
                * cfg.SimulationTimeStep
                * cfg.CoughingFactor
                * cfg.CoughingDropletPercentage;
        }
        if self.under_effect(EffectKind::WearingMask) {
            emission_load * cfg.MaskEmissionDropletReductionEfficiency
        } else {
            emission_load
        }
    }

    /// Overwrites the per-tick air load with this tick's intake.
    pub fn pickup_air(&mut self, air_load: f64, cfg: &EnvConfig) {
        self.contamination_load_air = air_load * self.pick_up_air * cfg.SimulationTimeStep;
        if self.under_effect(EffectKind::WearingMask) {
            self.contamination_load_air *= cfg.MaskAerosolProtectionEfficiency;
        }
    }

    /// Overwrites the per-tick droplet load with this tick's intake.
    pub fn pickup_droplet(&mut self, droplet_load: f64, cfg: &EnvConfig) {
        self.contamination_load_droplet = droplet_load * self.pick_up_droplet * cfg.SimulationTimeStep;
        if self.under_effect(EffectKind::WearingMask) {
            self.contamination_load_droplet *= cfg.MaskDropletProtectionEfficiency;
        }
    }

    /// Take contamination from a surface into the hand accumulator.
    /// Freshly washed hands pick up nothing.
    pub fn pickup_from_surface(&mut self, surface: &mut Surface, cfg: &EnvConfig) {
        if self.under_effect(EffectKind::Handwash) {
            return;
        }
        let transferred_load =
            surface.contact_transfer(surface.contamination_load, cfg.SimulationTimeStep);
        self.contamination_load_surface_accumulation += transferred_load;
        surface.contamination_load -= transferred_load;
    }

    /// Deposit hand contamination onto a surface. The hand accumulator
    /// is not reduced: hand contamination persists across touches.
    pub fn hand_to_surface_transfer(&self, surface: &mut Surface, cfg: &EnvConfig) {
        let transferred_load = surface.contact_transfer(
            self.contamination_load_surface_accumulation,
            cfg.SimulationTimeStep,
        );
        surface.contamination_load += transferred_load;
    }

    /// Start carrying an item and exchange contamination with it once.
    pub fn hold(&mut self, index: usize, item: &mut Surface, cfg: &EnvConfig) {
        if self.held.contains(&index) {
            warn!("{} is already holding {}", self.name, item.name);
            return;
        }
        self.held.push(index);
        self.pickup_from_surface(item, cfg);
        self.hand_to_surface_transfer(item, cfg);
    }

    pub fn release(&mut self, index: usize, item_name: &str) {
        match self.held.iter().position(|&i| i == index) {
            Some(pos) => {
                self.held.remove(pos);
            }
            None => warn!("{} is not holding {} so it can not be released", self.name, item_name),
        }
    }

    pub fn held(&self) -> &[usize] {
        &self.held
    }

    /** Begin (or refresh) the handwashing effect: the current hand load
        is captured, reduced to the configured fraction, and restored
        when the effect runs out.
    **/
    pub fn start_handwash_effect(&mut self, cfg: &EnvConfig) {
        let duration = handwash_ticks(cfg.HandwashingEffectDuration, cfg.SimulationTimeStep);
        for effect in self.effects.iter_mut() {
            if let Effect::Handwash { remaining_ticks, .. } = effect {
                *remaining_ticks = duration;
                return; // Do not add another
            }
        }
        let restore_load = self.contamination_load_surface_accumulation;
        self.contamination_load_surface_accumulation *= cfg.HandwashingContaminationFraction;
        self.effects.push(Effect::Handwash {
            remaining_ticks: duration,
            restore_load,
        });
    }

    pub fn don_mask(&mut self) {
        if !self.under_effect(EffectKind::WearingMask) {
            self.effects.push(Effect::WearingMask);
        }
    }

    pub fn doff_mask(&mut self) {
        self.effects.retain(|e| e.kind() != EffectKind::WearingMask);
    }

    /** Tick every effect. The coughing effect rolls a Bernoulli per tick
        and queues a cough on success; handwash counts down and restores
        the captured hand load on the tick it expires. Expired effects
        are removed after the scan.
    **/
    pub fn process_effects(&mut self, cfg: &EnvConfig, rng: &mut impl Rng) {
        let mut expired = Vec::new();
        for i in 0..self.effects.len() {
            match self.effects[i] {
                Effect::Coughing => {
                    if rng.gen::<f64>() < cfg.CoughingRate * cfg.SimulationTimeStep {
                        self.queued_cough = true;
                    }
                }
                Effect::Handwash { remaining_ticks, restore_load } => {
                    let remaining = remaining_ticks - 1;
                    if remaining == 0 {
                        // conclusion fires on the same tick as the final event
                        self.contamination_load_surface_accumulation = restore_load;
                        expired.push(i);
                    } else {
                        self.effects[i] = Effect::Handwash {
                            remaining_ticks: remaining,
                            restore_load,
                        };
                    }
                }
                Effect::WearingMask => {}
            }
        }
        for i in expired.into_iter().rev() {
            self.effects.remove(i);
        }
    }

    pub fn under_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind() == kind)
    }

    pub fn set_facing(&mut self, direction: Facing) {
        self.facing = direction;
    }
}

/// Wire form of an agent. Runtime state that cannot round-trip (held
/// items, effect internals) is reduced to the wearing_mask flag.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct AgentSpec {
    pub name: String,
    pub viral_load: f64,
    pub contamination_load_air: f64,
    pub contamination_load_droplet: f64,
    pub contamination_load_surface: f64,
    pub emission_rate_air: f64,
    pub emission_rate_droplet: f64,
    pub pick_up_air: f64,
    pub pick_up_droplet: f64,
    pub script: Script,
    pub is_active: bool,
    pub wearing_mask: bool,
}

impl From<AgentSpec> for Agent {
    fn from(spec: AgentSpec) -> Self {
        Agent::new(
            spec.name,
            spec.viral_load,
            spec.contamination_load_air,
            spec.contamination_load_droplet,
            spec.contamination_load_surface,
            spec.emission_rate_air,
            spec.emission_rate_droplet,
            spec.pick_up_air,
            spec.pick_up_droplet,
            spec.script,
            spec.is_active,
            spec.wearing_mask,
        )
    }
}

impl Agent {
    pub fn to_spec(&self) -> AgentSpec {
        AgentSpec {
            name: self.name.clone(),
            viral_load: self.viral_load,
            contamination_load_air: self.contamination_load_air,
            contamination_load_droplet: self.contamination_load_droplet,
            contamination_load_surface: self.contamination_load_surface_accumulation,
            emission_rate_air: self.emission_rate_air,
            emission_rate_droplet: self.emission_rate_droplet,
            pick_up_air: self.pick_up_air,
            pick_up_droplet: self.pick_up_droplet,
            script: self.script.clone(),
            is_active: self.is_active,
            wearing_mask: self.under_effect(EffectKind::WearingMask),
        }
    }
}
