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
use std::fmt;

use itertools::Itertools;
use log::warn;
use serde::{Serialize, Deserialize};

use crate::air::barrier::{Barrier, Void};
use crate::air::grid::Air;
use crate::air::pattern::{aerosol_cough, droplet_cough};
use crate::error::{SimError, SimResult};
use crate::sim_utils::config::Config;
use crate::world::action::Action;
use crate::world::agent::Agent;
use crate::world::facing::Facing;
use crate::world::surface::Surface;

/** The indoor environment: the mobility grid agents move on, the surface
    arena with a per-cell index, the agent position map and the air grid.
    Agents and surfaces are addressed by integer ids/indices; the arena
    is the single owner of surface state.
**/
pub struct Environment {
    pub height: usize,
    pub width: usize,
    pub decay_rate_air: f64,
    pub decay_rate_surface: f64,
    pub decay_rate_droplet: f64,
    pub air_exchange_rate: f64,
    pub droplet_to_surface_transfer_rate: f64,

    barriers: Vec<Barrier>,
    walls: Vec<Void>,

    air: Option<Air>,
    mobility_space: Vec<Option<usize>>,
    surface_grid: Vec<Vec<usize>>,
    surfaces: Vec<Surface>,
    agent_lookup: HashMap<usize, (usize, usize)>,

    reach: usize,
    mobility_ratio: f64,
    time_step: f64,
}

impl Environment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        height: usize,
        width: usize,
        decay_rate_air: f64,
        decay_rate_droplet: f64,
        decay_rate_surface: f64,
        air_exchange_rate: f64,
        droplet_to_surface_transfer_rate: f64,
        barriers: Vec<Barrier>,
        walls: Vec<Void>,
    ) -> Self {
        Environment {
            height,
            width,
            decay_rate_air,
            decay_rate_surface,
            decay_rate_droplet,
            air_exchange_rate,
            droplet_to_surface_transfer_rate,
            barriers,
            walls,
            air: None,
            mobility_space: vec![None; width * height],
            surface_grid: vec![Vec::new(); width * height],
            surfaces: Vec::new(),
            agent_lookup: HashMap::new(),
            reach: 0,
            mobility_ratio: 1.0,
            time_step: 0.0,
        }
    }

    /// Bind the simulation constants and build the air grid.
    pub fn set_config(&mut self, config: &Config) -> SimResult<()> {
        self.reach = (config.env.AgentReach / config.env.MobilityCellSize) as usize;
        self.mobility_ratio = config.mobility_ratio();
        self.time_step = config.env.SimulationTimeStep;
        self.air = Some(Air::new(
            &config.env,
            self.width,
            self.height,
            self.decay_rate_air,
            self.decay_rate_droplet,
            self.air_exchange_rate,
            &self.barriers,
            &self.walls,
        )?);
        Ok(())
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    fn in_grid(&self, x: i64, y: i64) -> bool {
        0 <= x && (x as usize) < self.width && 0 <= y && (y as usize) < self.height
    }

    pub fn air(&self) -> &Air {
        self.air.as_ref().expect("environment used before set_config")
    }

    fn air_mut(&mut self) -> &mut Air {
        self.air.as_mut().expect("environment used before set_config")
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn barriers(&self) -> &[Barrier] {
        &self.barriers
    }

    pub fn walls(&self) -> &[Void] {
        &self.walls
    }

    pub fn agent_position(&self, agent_id: usize) -> Option<(usize, usize)> {
        self.agent_lookup.get(&agent_id).copied()
    }

    /// Move all surfaces into the arena and index them by their cell.
    pub fn place_surfaces(&mut self, surfaces: Vec<Surface>) {
        for surface in surfaces {
            let cell = self.idx(surface.init_x, surface.init_y);
            let index = self.surfaces.len();
            self.surfaces.push(surface);
            self.surface_grid[cell].push(index);
        }
    }

    pub fn apply_entry(
        &mut self,
        agent: &mut Agent,
        x: i64,
        y: i64,
        facing: Facing,
    ) -> SimResult<()> {
        if !self.in_grid(x, y) || self.air().is_void(x, y) {
            return Err(SimError::IllegalAgentPosition(x, y));
        }
        let cell = self.idx(x as usize, y as usize);
        self.mobility_space[cell] = Some(agent.id);
        self.agent_lookup.insert(agent.id, (x as usize, y as usize));
        agent.set_facing(facing);
        agent.is_active = true;
        Ok(())
    }

    pub fn process_agent_action(
        &mut self,
        agent: &mut Agent,
        action: &Action,
        config: &Config,
    ) -> SimResult<()> {
        if let Action::Enter { x, y, facing } = action {
            return self.apply_entry(agent, *x, *y, *facing);
        }
        if !agent.is_active {
            return Ok(());
        }
        let (cur_x, cur_y) = match self.agent_lookup.get(&agent.id) {
            Some(&pos) => pos,
            None => {
                warn!("active Agent {} has no position, ignoring action", agent.name);
                return Ok(());
            }
        };
        match action {
            Action::Enter { .. } => unreachable!(),
            Action::Move { x, y, facing } => {
                let new_x = cur_x as i64 + x;
                let new_y = cur_y as i64 + y;
                if !self.in_grid(new_x, new_y) || self.air().is_void(new_x, new_y) {
                    return Err(SimError::IllegalAgentPosition(new_x, new_y));
                }
                agent.set_facing(facing.unwrap_or_else(|| Facing::from_displacement(*x, *y)));
                // Move self
                let old_cell = self.idx(cur_x, cur_y);
                let new_cell = self.idx(new_x as usize, new_y as usize);
                self.mobility_space[old_cell] = None;
                self.mobility_space[new_cell] = Some(agent.id);
                self.agent_lookup.insert(agent.id, (new_x as usize, new_y as usize));
                // Move held items
                for &item in agent.held() {
                    self.surface_grid[old_cell].retain(|&i| i != item);
                    self.surface_grid[new_cell].push(item);
                }
            }
            Action::Leave => {
                let cell = self.idx(cur_x, cur_y);
                self.mobility_space[cell] = None;
                self.agent_lookup.remove(&agent.id);
                for &item in agent.held() {
                    self.surface_grid[cell].retain(|&i| i != item);
                }
                agent.is_active = false;
            }
            Action::Pickup { target } | Action::Putdown { target } => {
                let cell = self.idx(cur_x, cur_y);
                let items: Vec<usize> = self.surface_grid[cell]
                    .iter()
                    .copied()
                    .filter(|&i| !self.surfaces[i].is_fixture() && self.surfaces[i].name == *target)
                    .collect();
                if items.len() > 1 {
                    warn!("Too many Items found with target name: {}", target);
                } else if items.is_empty() {
                    warn!("No Items found with target name: {}", target);
                } else {
                    let index = items[0];
                    if matches!(action, Action::Pickup { .. }) {
                        agent.hold(index, &mut self.surfaces[index], &config.env);
                    } else {
                        agent.release(index, target);
                    }
                }
            }
            Action::Handwash => agent.start_handwash_effect(&config.env),
            Action::DonMask => agent.don_mask(),
            Action::DoffMask => agent.doff_mask(),
            Action::Face { direction } => agent.set_facing(*direction),
        }
        Ok(())
    }

    /// Emit this tick's load into the air at the agent's cell; a queued
    /// cough sprays the cough patterns in the facing direction instead.
    pub fn add_load_air(&mut self, agent: &mut Agent, config: &Config) -> SimResult<()> {
        let (x, y) = match self.agent_lookup.get(&agent.id) {
            Some(&pos) => pos,
            None => return Ok(()),
        };
        if agent.queued_cough {
            let direction = agent.facing;
            let aerosol = agent.emit_aerosol(&config.env);
            let droplet = agent.emit_droplet(&config.env);
            let air = self.air_mut();
            air.add_aerosol_pattern(x, y, aerosol, &aerosol_cough(), direction);
            air.add_droplet_pattern(x, y, droplet, &droplet_cough(), direction);
            agent.queued_cough = false; // Done processing cough
        } else {
            let aerosol = agent.emit_aerosol(&config.env);
            let droplet = agent.emit_droplet(&config.env);
            let air = self.air_mut();
            air.add_aerosol(x, y, aerosol)?;
            air.add_droplet(x, y, droplet)?;
        }
        Ok(())
    }

    /// The agent inhales from its cell; the inhaled load leaves the cell.
    pub fn pickup_air(&mut self, agent: &mut Agent, config: &Config) -> SimResult<()> {
        if let Some(&(x, y)) = self.agent_lookup.get(&agent.id) {
            let air = self.air_mut();
            let air_load = air.get_aerosol(x, y)?.unwrap_or(0.0);
            agent.pickup_air(air_load, &config.env);
            air.subtract_aerosol(x, y, agent.contamination_load_air)?;
        }
        Ok(())
    }

    pub fn pickup_droplet(&mut self, agent: &mut Agent, config: &Config) -> SimResult<()> {
        if let Some(&(x, y)) = self.agent_lookup.get(&agent.id) {
            let air = self.air_mut();
            let droplet_load = air.get_droplet(x, y)?.unwrap_or(0.0);
            agent.pickup_droplet(droplet_load, &config.env);
            air.subtract_droplet(x, y, agent.contamination_load_droplet)?;
        }
        Ok(())
    }

    fn reachable_fixtures(&self, x: usize, y: usize) -> Vec<usize> {
        self.reachable_surfaces(x as i64, y as i64)
            .into_iter()
            .flat_map(|(rx, ry)| self.surface_grid[self.idx(rx, ry)].iter().copied())
            .filter(|&i| self.surfaces[i].is_fixture())
            .collect()
    }

    /// Susceptible agents touch every fixture within reach.
    pub fn pickup_fixtures(&mut self, agent: &mut Agent, config: &Config) {
        if let Some(&(x, y)) = self.agent_lookup.get(&agent.id) {
            for index in self.reachable_fixtures(x, y) {
                agent.pickup_from_surface(&mut self.surfaces[index], &config.env);
            }
        }
    }

    /// Infected agents deposit hand contamination on fixtures in reach.
    pub fn hand_contaminate_fixtures(&mut self, agent: &mut Agent, config: &Config) {
        if let Some(&(x, y)) = self.agent_lookup.get(&agent.id) {
            for index in self.reachable_fixtures(x, y) {
                agent.hand_to_surface_transfer(&mut self.surfaces[index], &config.env);
            }
        }
    }

    /// Periodic cleaning resets every fixture; items are not wiped.
    pub fn cleaning_surface(&mut self) {
        for surface in self.surfaces.iter_mut().filter(|s| s.is_fixture()) {
            surface.contamination_load = 0.0;
        }
    }

    pub fn decay_surface(&mut self) {
        for surface in self.surfaces.iter_mut() {
            surface.contamination_load *=
                libm::exp(-surface.surface_decay_rate * self.time_step);
        }
    }

    pub fn decay_air(&mut self) {
        self.air_mut().decay();
    }

    pub fn diffuse_air(&mut self) {
        self.air_mut().diffuse();
    }

    /// Droplets settle onto fixtures every tick. The droplet layer keeps
    /// its content; deposition only feeds the surfaces.
    pub fn droplet_to_surface_transfer(&mut self, config: &Config) -> SimResult<()> {
        let air = self.air.as_ref().expect("environment used before set_config");
        let ratio_squared = self.mobility_ratio * self.mobility_ratio;
        for (x, y) in (0..self.width).cartesian_product(0..self.height) {
            let cell = x * self.height + y;
            if self.surface_grid[cell].is_empty() {
                continue;
            }
            let droplet = air.get_droplet(x, y)?.unwrap_or(0.0);
            for &index in &self.surface_grid[cell] {
                if self.surfaces[index].is_fixture() {
                    self.surfaces[index].contamination_load += droplet / ratio_squared
                        * self.droplet_to_surface_transfer_rate
                        * config.env.SimulationTimeStep;
                }
            }
        }
        Ok(())
    }

    /// Where a surface currently is: fixtures on their pinned cell, items
    /// wherever the grid index holds them (following their holder).
    pub fn surface_position(&self, index: usize) -> Option<(usize, usize)> {
        let surface = &self.surfaces[index];
        if surface.is_fixture() {
            return Some((surface.init_x, surface.init_y));
        }
        (0..self.width)
            .cartesian_product(0..self.height)
            .find(|&(x, y)| self.surface_grid[self.idx(x, y)].contains(&index))
    }

    /// Cell window the agent can reach from (x, y), clipped to the grid;
    /// empty when the center is outside.
    pub fn reachable_surfaces(&self, x: i64, y: i64) -> Vec<(usize, usize)> {
        if !self.in_grid(x, y) {
            return Vec::new();
        }
        let half = (self.reach / 2) as i64;
        (x - half..=x + half)
            .cartesian_product(y - half..=y + half)
            .filter(|&(rx, ry)| self.in_grid(rx, ry))
            .map(|(rx, ry)| (rx as usize, ry as usize))
            .collect()
    }
}

/// Agent occupancy chart, one row per x column of the grid.
impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..self.width {
            for y in 0..self.height {
                match self.mobility_space[self.idx(x, y)] {
                    Some(id) => write!(f, "{}", id % 10)?,
                    None => write!(f, "-")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Wire form of the environment: dimensions, rates and static structure.
/// Grids and the air layers are rebuilt on load.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct EnvironmentSpec {
    pub height: usize,
    pub width: usize,
    pub decay_rate_air: f64,
    pub decay_rate_surface: f64,
    pub decay_rate_droplet: f64,
    pub air_exchange_rate: f64,
    pub droplet_to_surface_transfer_rate: f64,
    pub barriers: Vec<Barrier>,
    pub walls: Vec<Void>,
}

impl From<EnvironmentSpec> for Environment {
    fn from(spec: EnvironmentSpec) -> Self {
        Environment::new(
            spec.height,
            spec.width,
            spec.decay_rate_air,
            spec.decay_rate_droplet,
            spec.decay_rate_surface,
            spec.air_exchange_rate,
            spec.droplet_to_surface_transfer_rate,
            spec.barriers,
            spec.walls,
        )
    }
}

impl Environment {
    pub fn to_spec(&self) -> EnvironmentSpec {
        EnvironmentSpec {
            height: self.height,
            width: self.width,
            decay_rate_air: self.decay_rate_air,
            decay_rate_surface: self.decay_rate_surface,
            decay_rate_droplet: self.decay_rate_droplet,
            air_exchange_rate: self.air_exchange_rate,
            droplet_to_surface_transfer_rate: self.droplet_to_surface_transfer_rate,
            barriers: self.barriers.clone(),
            walls: self.walls.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim_utils::config::test_config;
    use crate::world::action::Script;

    fn empty_env(height: usize, width: usize) -> Environment {
        let mut env = Environment::new(height, width, 0.0, 0.0, 0.0, 0.0, 0.0, vec![], vec![]);
        env.set_config(&test_config()).unwrap();
        env
    }

    fn test_agent(name: &str, id: usize) -> Agent {
        let mut script = Script::new();
        script.insert(0, Action::Enter { x: 0, y: 0, facing: Facing::North });
        let mut agent = Agent::new(name, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                                   script, false, false);
        agent.id = id;
        agent
    }

    #[test]
    fn test_default_reachable_surfaces() {
        let env = empty_env(5, 5);
        assert_eq!(env.reachable_surfaces(2, 2).len(), 5 * 5);
        assert_eq!(env.reachable_surfaces(1, 1).len(), 4 * 4);
        assert_eq!(env.reachable_surfaces(0, 0).len(), 3 * 3);
        assert_eq!(env.reachable_surfaces(2, 1).len(), 5 * 4);
        assert_eq!(env.reachable_surfaces(2, 0).len(), 5 * 3);
        assert_eq!(env.reachable_surfaces(3, 3).len(), 4 * 4);
        assert_eq!(env.reachable_surfaces(4, 4).len(), 3 * 3);
        assert_eq!(env.reachable_surfaces(6, 2).len(), 0);
        assert_eq!(env.reachable_surfaces(5, 5).len(), 0);
        assert_eq!(env.reachable_surfaces(-1, -1).len(), 0);
        let coordinates = env.reachable_surfaces(0, 0);
        assert!(coordinates.contains(&(0, 0)));
        assert!(!coordinates.contains(&(4, 4)));
        assert!(coordinates.contains(&(2, 2)));

        let env2 = empty_env(100, 100);
        let coordinates = env2.reachable_surfaces(20, 30);
        assert_eq!(coordinates.len(), 5 * 5);
        assert!(coordinates.contains(&(20, 30)));
        assert!(coordinates.contains(&(18, 30)));
        assert!(!coordinates.contains(&(17, 30)));
        assert!(coordinates.contains(&(22, 32)));
        assert!(!coordinates.contains(&(22, 33)));
        assert!(!coordinates.contains(&(23, 32)));
    }

    #[test]
    fn test_entry_on_void_is_illegal() {
        let cfg = test_config();
        let mut env = Environment::new(10, 5, 0.0, 0.0, 0.0, 0.0, 0.0,
                                       vec![], vec![Void::new(0, 1)]);
        env.set_config(&cfg).unwrap();
        let mut agent = test_agent("Oscar", 0);
        // mobility (2,8) converts onto air void (0,1)
        let result = env.apply_entry(&mut agent, 2, 8, Facing::North);
        assert!(matches!(result, Err(SimError::IllegalAgentPosition(..))));
        assert!(!agent.is_active);

        env.apply_entry(&mut agent, 2, 3, Facing::North).unwrap();
        assert!(agent.is_active);
        assert_eq!(env.agent_position(0), Some((2, 3)));
    }

    #[test]
    fn test_entry_outside_grid_is_illegal() {
        let mut env = empty_env(5, 5);
        let mut agent = test_agent("Oscar", 0);
        let result = env.apply_entry(&mut agent, 7, 0, Facing::North);
        assert!(matches!(result, Err(SimError::IllegalAgentPosition(..))));
    }

    #[test]
    fn test_pickup_and_putdown_move_items_with_agent() {
        let cfg = test_config();
        let mut env = empty_env(5, 5);
        env.place_surfaces(vec![
            Surface::item("Menu", 1, 1, 0.7, 0.2, 0.274),
            Surface::fixture("Table", 1, 1, 0.5, 0.8, 15.0, 0.969),
        ]);
        let mut agent = test_agent("Garcon", 0);
        env.apply_entry(&mut agent, 1, 1, Facing::North).unwrap();

        env.process_agent_action(&mut agent, &Action::Pickup { target: "Menu".into() }, &cfg).unwrap();
        assert_eq!(agent.held(), &[0]);
        // picking up a fixture name warns and does nothing
        env.process_agent_action(&mut agent, &Action::Pickup { target: "Table".into() }, &cfg).unwrap();
        assert_eq!(agent.held(), &[0]);

        env.process_agent_action(&mut agent, &Action::Move { x: 1, y: 0, facing: None }, &cfg).unwrap();
        assert_eq!(env.surface_position(0), Some((2, 1)));
        assert_eq!(env.surface_position(1), Some((1, 1)));

        env.process_agent_action(&mut agent, &Action::Putdown { target: "Menu".into() }, &cfg).unwrap();
        assert!(agent.held().is_empty());
        assert_eq!(env.surface_position(0), Some((2, 1)));
    }

    #[test]
    fn test_leave_drops_items_from_grid() {
        let cfg = test_config();
        let mut env = empty_env(5, 5);
        env.place_surfaces(vec![Surface::item("Menu", 1, 1, 0.7, 0.2, 0.274)]);
        let mut agent = test_agent("Garcon", 0);
        env.apply_entry(&mut agent, 1, 1, Facing::North).unwrap();
        env.process_agent_action(&mut agent, &Action::Pickup { target: "Menu".into() }, &cfg).unwrap();
        env.process_agent_action(&mut agent, &Action::Leave, &cfg).unwrap();
        assert!(!agent.is_active);
        assert_eq!(env.agent_position(0), None);
        assert_eq!(env.surface_position(0), None);
    }

    #[test]
    fn test_droplet_deposition_feeds_fixtures_only() {
        let cfg = test_config();
        let mut env = empty_env(25, 25);
        env.place_surfaces(vec![
            Surface::fixture("Table", 5, 5, 1.0, 1.0, 1.0, 0.0),
            Surface::item("Menu", 5, 5, 1.0, 1.0, 0.0),
        ]);
        env.droplet_to_surface_transfer_rate = 18.18;
        env.air_mut().add_droplet(5, 5, 1.0).unwrap();
        let droplet_before = env.air().get_droplet(5, 5).unwrap().unwrap();

        env.droplet_to_surface_transfer(&cfg).unwrap();
        let expected = 1.0 / (0.2 * 0.2) * 18.18 * cfg.env.SimulationTimeStep;
        assert!((env.surfaces()[0].contamination_load - expected).abs() < 1e-12);
        assert_eq!(env.surfaces()[1].contamination_load, 0.0);
        // the droplet layer is not drained by deposition
        assert_eq!(env.air().get_droplet(5, 5).unwrap().unwrap(), droplet_before);
    }

    #[test]
    fn test_cleaning_and_decay() {
        let cfg = test_config();
        let mut env = empty_env(5, 5);
        env.place_surfaces(vec![
            Surface::fixture("Table", 1, 1, 0.5, 0.8, 15.0, 0.969),
            Surface::item("Menu", 1, 2, 0.7, 0.2, 0.274),
        ]);
        env.surfaces[0].contamination_load = 2.0;
        env.surfaces[1].contamination_load = 2.0;

        env.decay_surface();
        let dt = cfg.env.SimulationTimeStep;
        assert!((env.surfaces()[0].contamination_load - 2.0 * libm::exp(-0.969 * dt)).abs() < 1e-12);
        assert!((env.surfaces()[1].contamination_load - 2.0 * libm::exp(-0.274 * dt)).abs() < 1e-12);

        env.cleaning_surface();
        assert_eq!(env.surfaces()[0].contamination_load, 0.0);
        assert!(env.surfaces()[1].contamination_load > 0.0); // items are not wiped
    }

    #[test]
    fn test_environment_spec_round_trip() {
        let env = Environment::new(
            25, 25, 1.51, 0.3, 0.262, 0.2, 18.18,
            vec![
                Barrier::Wall { x1: 2, y1: 2, x2: 2, y2: 3 },
                Barrier::Shield { x1: 1, y1: 1, x2: 1, y2: 2 },
            ],
            vec![Void::new(4, 4)],
        );
        let json = serde_json::to_value(env.to_spec()).unwrap();
        let back = Environment::from(serde_json::from_value::<EnvironmentSpec>(json.clone()).unwrap());
        assert_eq!(serde_json::to_value(back.to_spec()).unwrap(), json);
    }
}
