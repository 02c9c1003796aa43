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

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};

use crate::air::grid::Layer;
use crate::error::{SimError, SimResult};
use crate::sim_utils::config::Config;
use crate::world::agent::{Agent, AgentSpec};
use crate::world::environment::{Environment, EnvironmentSpec};
use crate::world::surface::{FixtureSpec, ItemSpec, Surface};
use crate::writers::OutputWriters;

/// Per-tick hook for external monitors; runs synchronously at the end of
/// every tick.
pub type TickCallback<'a> = &'a mut dyn FnMut(&Model, u64);

/** The simulation model: an environment, the agent roster and the tick
    scheduler that sequences every per-tick operation.

    Within one tick the order is fixed: scripted actions, per-agent
    pickups and effects, periodic cleaning, diffusion, droplet
    deposition, decay, and finally per-agent emission.
**/
pub struct Model {
    pub name: String,
    pub ticks: u64,
    pub env: Environment,
    pub agents: Vec<Agent>,
}

impl Model {
    /// Build a model; surfaces go straight into the environment arena.
    /// Surface names must be unique across the model.
    pub fn new(
        ticks: u64,
        env: Environment,
        agents: Vec<Agent>,
        surfaces: Vec<Surface>,
        name: impl Into<String>,
    ) -> SimResult<Self> {
        for (i, surface) in surfaces.iter().enumerate() {
            if surfaces[..i].iter().any(|s| s.name == surface.name) {
                return Err(SimError::DuplicateSurfaceName(surface.name.clone()));
            }
        }
        let mut env = env;
        env.place_surfaces(surfaces);
        let mut agents = agents;
        for (id, agent) in agents.iter_mut().enumerate() {
            agent.id = id;
        }
        Ok(Model {
            name: name.into(),
            ticks,
            env,
            agents,
        })
    }

    pub fn run(&mut self, config: &Config) -> SimResult<()> {
        let mut rng = StdRng::from_entropy();
        self.run_with(config, &mut rng, None)
    }

    /// Run with a caller-provided rng (for reproducible coughing) and an
    /// optional per-tick callback.
    pub fn run_with(
        &mut self,
        config: &Config,
        rng: &mut StdRng,
        mut callback: Option<TickCallback<'_>>,
    ) -> SimResult<()> {
        let mut writers = if config.output.Suppress {
            None
        } else {
            Some(OutputWriters::open(config)?)
        };

        // setup environment and bind constants
        self.env.set_config(config)?;
        for agent in self.agents.iter_mut() {
            agent.set_config(&config.env);
        }

        let cleaning_period = ((config.env.CleaningInterval / config.env.SimulationTimeStep)
            .ceil() as u64)
            .max(1);

        for tick in 0..self.ticks {
            for i in 0..self.agents.len() {
                if let Some(action) = self.agents[i].script.get(&tick).cloned() {
                    self.env.process_agent_action(&mut self.agents[i], &action, config)?;
                }
            }

            for i in 0..self.agents.len() {
                if self.agents[i].is_active {
                    self.env.pickup_air(&mut self.agents[i], config)?;
                    self.env.pickup_droplet(&mut self.agents[i], config)?;
                    // Infected agents shed onto fixtures, susceptible
                    // ones pick up from them.
                    if self.agents[i].viral_load == 0.0 {
                        self.env.pickup_fixtures(&mut self.agents[i], config);
                    }
                    if self.agents[i].viral_load > 0.0 {
                        self.env.hand_contaminate_fixtures(&mut self.agents[i], config);
                    }
                    self.agents[i].process_effects(&config.env, rng);
                }
            }

            if tick % cleaning_period == 0 {
                self.env.cleaning_surface();
            }
            self.env.diffuse_air();
            self.env.droplet_to_surface_transfer(config)?;
            self.env.decay_air();
            self.env.decay_surface();

            for i in 0..self.agents.len() {
                if self.agents[i].is_active {
                    self.env.add_load_air(&mut self.agents[i], config)?;
                }
            }

            if let Some(w) = writers.as_mut() {
                self.write_observations(w, config, tick)?;
            }
            if let Some(cb) = callback.as_mut() {
                cb(self, tick);
            }
        }

        // clean termination closes every sink
        if let Some(mut w) = writers.take() {
            w.close()?;
        }
        Ok(())
    }

    fn write_observations(
        &self,
        writers: &mut OutputWriters,
        config: &Config,
        tick: u64,
    ) -> SimResult<()> {
        for agent in &self.agents {
            if agent.is_active {
                writers.agent_exposure.write(
                    &agent.name,
                    tick,
                    agent.contamination_load_air,
                    agent.contamination_load_droplet,
                    agent.contamination_load_surface_accumulation,
                    config.env.SimulationTimeStep
                        * agent.contamination_load_surface_accumulation
                        * config.env.SurfaceExposureRatio,
                )?;
            }
        }
        if tick % config.output.AerosolContaminationWriteInterval.max(1) == 0 {
            for (x, y, value) in self.env.air().cells(Layer::Aerosols) {
                writers.aerosol.write(tick, x, y, value)?;
            }
        }
        if tick % config.output.DropletContaminationWriteInterval.max(1) == 0 {
            for (x, y, value) in self.env.air().cells(Layer::Droplets) {
                writers.droplet.write(tick, x, y, value)?;
            }
        }
        if tick % config.output.SurfaceContaminationWriteInterval.max(1) == 0 {
            for (index, surface) in self.env.surfaces().iter().enumerate() {
                let (x, y) = self
                    .env
                    .surface_position(index)
                    .unwrap_or((surface.init_x, surface.init_y));
                writers.surface.write(
                    &surface.name,
                    surface.class_tag(),
                    tick,
                    x,
                    y,
                    surface.contamination_load,
                )?;
            }
        }
        Ok(())
    }

    pub fn air_exposure(&self) -> HashMap<String, f64> {
        self.agents
            .iter()
            .map(|a| (a.name.clone(), a.contamination_load_air))
            .collect()
    }

    pub fn droplet_exposure(&self) -> HashMap<String, f64> {
        self.agents
            .iter()
            .map(|a| (a.name.clone(), a.contamination_load_droplet))
            .collect()
    }

    pub fn surface_exposure(&self) -> HashMap<String, f64> {
        self.agents
            .iter()
            .map(|a| (a.name.clone(), a.contamination_load_surface_accumulation))
            .collect()
    }
}

/// Wire form of a model file.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ModelSpec {
    #[serde(default)]
    pub name: String,
    pub ticks: u64,
    pub env: EnvironmentSpec,
    pub agents: Vec<AgentSpec>,
    pub items: Vec<ItemSpec>,
    pub fixtures: Vec<FixtureSpec>,
}

impl Model {
    pub fn from_spec(spec: ModelSpec) -> SimResult<Self> {
        let mut surfaces: Vec<Surface> = Vec::new();
        surfaces.extend(spec.items.into_iter().map(Surface::from));
        surfaces.extend(spec.fixtures.into_iter().map(Surface::from));
        Model::new(
            spec.ticks,
            Environment::from(spec.env),
            spec.agents.into_iter().map(Agent::from).collect(),
            surfaces,
            spec.name,
        )
    }

    pub fn to_spec(&self) -> ModelSpec {
        ModelSpec {
            name: self.name.clone(),
            ticks: self.ticks,
            env: self.env.to_spec(),
            agents: self.agents.iter().map(|a| a.to_spec()).collect(),
            items: self.env.surfaces().iter().filter_map(|s| s.to_item_spec()).collect(),
            fixtures: self.env.surfaces().iter().filter_map(|s| s.to_fixture_spec()).collect(),
        }
    }
}
