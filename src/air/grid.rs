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

use std::collections::HashSet;

use itertools::Itertools;

use crate::air::barrier::{Barrier, Edge, Void};
use crate::air::pattern::EmissionPattern;
use crate::error::{SimError, SimResult};
use crate::sim_utils::config::EnvConfig;
use crate::world::facing::Facing;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Layer {
    Aerosols,
    Droplets,
}

/// Side of the fan a pattern column sits on, relative to the center
/// column. Determines which neighboring cell the emitted air flows from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Flow {
    Left,
    Right,
}

/** Two co-located scalar fields (aerosols and droplets) over the air grid,
    plus one barrier edge set per layer. Void cells are `None` in both
    fields for the lifetime of the grid: reads report the absence, writes
    are dropped.

    The grid is stored as flat vectors indexed by `x * height + y`.
**/
pub struct Air {
    width: usize,
    height: usize,
    mobility_ratio: f64,
    time_step: f64,
    diffusivity: f64,
    wall_absorbing_proportion: f64,

    aerosol_decay_rate: f64,
    droplet_decay_rate: f64,
    air_exchange_rate: f64,

    aerosols: Vec<Option<f64>>,
    droplets: Vec<Option<f64>>,

    aerosol_barriers: HashSet<Edge>,
    droplet_barriers: HashSet<Edge>,
    voids: Vec<Void>,
}

impl Air {
    /// Create the air layers covering a `width` x `height` environment
    /// given in mobility scale. Barrier endpoints and voids are consumed
    /// at air-grid scale.
    pub fn new(
        cfg: &EnvConfig,
        width: usize,
        height: usize,
        aerosol_decay_rate: f64,
        droplet_decay_rate: f64,
        air_exchange_rate: f64,
        barriers: &[Barrier],
        voids: &[Void],
    ) -> SimResult<Self> {
        let mobility_ratio = cfg.MobilityCellSize / cfg.AirCellSize;
        // Round the air size up to cover the entire environment
        let air_width = (width as f64 * mobility_ratio).ceil() as usize;
        let air_height = (height as f64 * mobility_ratio).ceil() as usize;

        let mut air = Air {
            width: air_width,
            height: air_height,
            mobility_ratio,
            time_step: cfg.SimulationTimeStep,
            diffusivity: cfg.Diffusivity,
            wall_absorbing_proportion: cfg.WallAbsorbingProportion,
            aerosol_decay_rate,
            droplet_decay_rate,
            air_exchange_rate,
            aerosols: vec![Some(0.0); air_width * air_height],
            droplets: vec![Some(0.0); air_width * air_height],
            aerosol_barriers: HashSet::new(),
            droplet_barriers: HashSet::new(),
            voids: voids.to_vec(),
        };

        for barrier in barriers {
            for edge in barrier.edges() {
                if barrier.is_wall() {
                    air.aerosol_barriers.insert(edge);
                }
                air.droplet_barriers.insert(edge);
            }
        }

        for void in voids {
            if void.x >= air_width || void.y >= air_height {
                return Err(SimError::OutOfBounds(void.x as i64, void.y as i64));
            }
            let idx = void.x * air_height + void.y;
            air.aerosols[idx] = None;
            air.droplets[idx] = None;
        }

        Ok(air)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        0 <= x && (x as usize) < self.width && 0 <= y && (y as usize) < self.height
    }

    /// Mobility scale to air scale.
    pub fn convert_coordinates(&self, x: i64, y: i64) -> (i64, i64) {
        (
            (x as f64 * self.mobility_ratio).floor() as i64,
            (y as f64 * self.mobility_ratio).floor() as i64,
        )
    }

    /// Whether the mobility-scale coordinate falls on a void air cell.
    pub fn is_void(&self, x: i64, y: i64) -> bool {
        let (x, y) = self.convert_coordinates(x, y);
        self.voids.iter().any(|v| v.x as i64 == x && v.y as i64 == y)
    }

    fn field(&self, layer: Layer) -> &Vec<Option<f64>> {
        match layer {
            Layer::Aerosols => &self.aerosols,
            Layer::Droplets => &self.droplets,
        }
    }

    fn barriers(&self, layer: Layer) -> &HashSet<Edge> {
        match layer {
            Layer::Aerosols => &self.aerosol_barriers,
            Layer::Droplets => &self.droplet_barriers,
        }
    }

    /// Air-scale read. `Ok(None)` marks a void cell.
    pub fn cell(&self, x: usize, y: usize, layer: Layer) -> SimResult<Option<f64>> {
        if x >= self.width || y >= self.height {
            return Err(SimError::OutOfBounds(x as i64, y as i64));
        }
        Ok(self.field(layer)[self.idx(x, y)])
    }

    /// Mobility-scale read.
    pub fn get_layer(&self, x: usize, y: usize, layer: Layer) -> SimResult<Option<f64>> {
        let (ax, ay) = self.convert_coordinates(x as i64, y as i64);
        if !self.in_bounds(ax, ay) {
            return Err(SimError::OutOfBounds(ax, ay));
        }
        Ok(self.field(layer)[self.idx(ax as usize, ay as usize)])
    }

    pub fn get_aerosol(&self, x: usize, y: usize) -> SimResult<Option<f64>> {
        self.get_layer(x, y, Layer::Aerosols)
    }

    pub fn get_droplet(&self, x: usize, y: usize) -> SimResult<Option<f64>> {
        self.get_layer(x, y, Layer::Droplets)
    }

    // Air-scale write, dropped on void cells.
    fn set_cell(&mut self, x: usize, y: usize, value: f64, layer: Layer) {
        let idx = self.idx(x, y);
        let field = match layer {
            Layer::Aerosols => &mut self.aerosols,
            Layer::Droplets => &mut self.droplets,
        };
        if field[idx].is_some() {
            field[idx] = Some(value);
        }
    }

    fn modify_layer(&mut self, x: usize, y: usize, delta: f64, layer: Layer) -> SimResult<()> {
        let (ax, ay) = self.convert_coordinates(x as i64, y as i64);
        if !self.in_bounds(ax, ay) {
            return Err(SimError::OutOfBounds(ax, ay));
        }
        if let Some(current) = self.field(layer)[self.idx(ax as usize, ay as usize)] {
            self.set_cell(ax as usize, ay as usize, current + delta, layer);
        }
        Ok(())
    }

    pub fn add_aerosol(&mut self, x: usize, y: usize, addition: f64) -> SimResult<()> {
        self.modify_layer(x, y, addition, Layer::Aerosols)
    }

    pub fn add_droplet(&mut self, x: usize, y: usize, addition: f64) -> SimResult<()> {
        self.modify_layer(x, y, addition, Layer::Droplets)
    }

    pub fn subtract_aerosol(&mut self, x: usize, y: usize, subtraction: f64) -> SimResult<()> {
        self.modify_layer(x, y, -subtraction, Layer::Aerosols)
    }

    pub fn subtract_droplet(&mut self, x: usize, y: usize, subtraction: f64) -> SimResult<()> {
        self.modify_layer(x, y, -subtraction, Layer::Droplets)
    }

    /// Sum of a layer over all non-void cells.
    pub fn layer_total(&self, layer: Layer) -> f64 {
        self.field(layer).iter().flatten().sum()
    }

    /// All non-void cells of a layer as (x, y, value).
    pub fn cells(&self, layer: Layer) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.width)
            .cartesian_product(0..self.height)
            .filter_map(move |(x, y)| self.field(layer)[self.idx(x, y)].map(|v| (x, y, v)))
    }

    /// Aerosols decay exponentially (decay rate plus room air exchange),
    /// droplets linearly per tick.
    pub fn decay(&mut self) {
        let aerosol_factor =
            libm::exp(-(self.aerosol_decay_rate + self.air_exchange_rate) * self.time_step);
        for cell in self.aerosols.iter_mut().flatten() {
            *cell *= aerosol_factor;
        }
        let droplet_factor = self.droplet_decay_rate * self.time_step;
        for cell in self.droplets.iter_mut().flatten() {
            *cell -= *cell * droplet_factor;
        }
    }

    pub fn diffuse(&mut self) {
        self.aerosols = self.diffused(&self.aerosols, &self.aerosol_barriers);
        self.droplets = self.diffused(&self.droplets, &self.droplet_barriers);
    }

    // First-order explicit diffusion step, out-of-place: all reads come
    // from the previous field. Missing neighbors (bounds, voids, barrier
    // edges) contribute nothing; the wall absorbing proportion decides
    // how much of the outflow toward them is lost.
    fn diffused(&self, values: &[Option<f64>], barriers: &HashSet<Edge>) -> Vec<Option<f64>> {
        let mut next = values.to_vec();
        for (x, y) in (0..self.width).cartesian_product(0..self.height) {
            let here = match values[self.idx(x, y)] {
                Some(v) => v,
                None => continue,
            };
            let mut neighbor_sum = 0.0;
            let mut neighbor_count = 0usize;
            for (dx, dy) in [(0i64, 1i64), (0, -1), (1, 0), (-1, 0)] {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if !self.in_bounds(nx, ny) {
                    continue;
                }
                let value = match values[self.idx(nx as usize, ny as usize)] {
                    Some(v) => v,
                    None => continue,
                };
                if barriers.contains(&Edge::new(x as i64, y as i64, nx, ny)) {
                    continue;
                }
                neighbor_sum += value;
                neighbor_count += 1;
            }
            let absorbing = (4 - neighbor_count) as f64 * self.wall_absorbing_proportion;
            next[self.idx(x, y)] = Some(
                here + self.diffusivity
                    * (neighbor_sum - (neighbor_count as f64 + absorbing) * here)
                    * self.time_step,
            );
        }
        next
    }

    pub fn add_aerosol_pattern(
        &mut self,
        x: usize,
        y: usize,
        addition: f64,
        pattern: &EmissionPattern,
        direction: Facing,
    ) {
        self.add_layer_pattern(x, y, addition, Layer::Aerosols, pattern, direction);
    }

    pub fn add_droplet_pattern(
        &mut self,
        x: usize,
        y: usize,
        addition: f64,
        pattern: &EmissionPattern,
        direction: Facing,
    ) {
        self.add_layer_pattern(x, y, addition, Layer::Droplets, pattern, direction);
    }

    /** Deposit `addition`, weighted by the pattern, into the fan in front
        of the origin. The center column is walked first, then the left
        half from the inside out, then the right half, so depth limits
        found near the axis cut the wings of the same half.

        Per column the walk stops at the grid edge, at a facing-barrier
        edge between consecutive depth cells, at a side-barrier edge
        toward the flow source, or at a void; side blocks and voids at
        depth 0 instead suppress depth 0 for the remaining columns of the
        half and keep going.
    **/
    pub fn add_layer_pattern(
        &mut self,
        x: usize,
        y: usize,
        addition: f64,
        layer: Layer,
        pattern: &EmissionPattern,
        direction: Facing,
    ) {
        let (x, y) = self.convert_coordinates(x as i64, y as i64);
        let half = (pattern.width() / 2) as i64;

        // Anchor so the center column of the pattern lies on the origin.
        let (pattern_x0, pattern_y0) = match direction {
            Facing::North => (x - half, y),
            Facing::South => (x + half, y),
            Facing::East => (x, y + half),
            Facing::West => (x, y - half),
        };

        let center: Vec<i64> = vec![half];
        let left: Vec<i64> = (0..half).rev().collect();
        let right: Vec<i64> = (half + 1..pattern.width() as i64).collect();

        self.pattern_half(&center, None, pattern_x0, pattern_y0, addition, layer, pattern, direction);
        self.pattern_half(&left, Some(Flow::Left), pattern_x0, pattern_y0, addition, layer, pattern, direction);
        self.pattern_half(&right, Some(Flow::Right), pattern_x0, pattern_y0, addition, layer, pattern, direction);
    }

    #[allow(clippy::too_many_arguments)]
    fn pattern_half(
        &mut self,
        columns: &[i64],
        flow: Option<Flow>,
        pattern_x0: i64,
        pattern_y0: i64,
        addition: f64,
        layer: Layer,
        pattern: &EmissionPattern,
        direction: Facing,
    ) {
        // Shared across the columns of this half: a side block or void on
        // the depth-0 row suppresses that row from there on, and a depth
        // limit found in an inner column caps the outer ones.
        let mut block_at_0 = false;
        let mut till_y = pattern.depth() as i64;

        for &pattern_x in columns {
            for pattern_y in 0..pattern.depth() as i64 {
                if pattern_y == 0 && block_at_0 {
                    continue;
                }

                // Rotate the pattern cell into world coordinates.
                let (target_x, target_y) = match direction {
                    Facing::North => (pattern_x0 + pattern_x, pattern_y0 + pattern_y),
                    Facing::South => (pattern_x0 - pattern_x, pattern_y0 - pattern_y),
                    Facing::East => (pattern_x0 + pattern_y, pattern_y0 - pattern_x),
                    Facing::West => (pattern_x0 - pattern_y, pattern_y0 + pattern_x),
                };

                // Edge of the environment ends the column.
                if !self.in_bounds(target_x, target_y) {
                    break;
                }

                // Facing barriers; depth 0 is skipped because the
                // emitter does not emit backwards through itself.
                if pattern_y != 0 {
                    let (prev_x, prev_y) = match direction {
                        Facing::North => (target_x, target_y - 1),
                        Facing::South => (target_x, target_y + 1),
                        Facing::East => (target_x - 1, target_y),
                        Facing::West => (target_x + 1, target_y),
                    };
                    if self.barriers(layer).contains(&Edge::new(prev_x, prev_y, target_x, target_y)) {
                        till_y = pattern_y;
                        break;
                    }
                }

                // Side barriers between this cell and the cell the flow
                // comes from (toward the center column).
                if let Some(flow) = flow {
                    let (flow_x, flow_y) = match (direction, flow) {
                        (Facing::North, Flow::Left) => (target_x + 1, target_y),
                        (Facing::North, Flow::Right) => (target_x - 1, target_y),
                        (Facing::South, Flow::Left) => (target_x - 1, target_y),
                        (Facing::South, Flow::Right) => (target_x + 1, target_y),
                        (Facing::East, Flow::Left) => (target_x, target_y + 1),
                        (Facing::East, Flow::Right) => (target_x, target_y - 1),
                        (Facing::West, Flow::Left) => (target_x, target_y - 1),
                        (Facing::West, Flow::Right) => (target_x, target_y + 1),
                    };
                    if self.barriers(layer).contains(&Edge::new(flow_x, flow_y, target_x, target_y)) {
                        if pattern_y == 0 {
                            block_at_0 = true;
                            continue;
                        }
                        till_y = pattern_y;
                        break;
                    }
                }

                // Void cells behave like a side barrier.
                if self.aerosols[self.idx(target_x as usize, target_y as usize)].is_none() {
                    if pattern_y == 0 {
                        block_at_0 = true;
                        continue;
                    }
                    till_y = pattern_y;
                    break;
                }

                if pattern_y >= till_y {
                    break;
                }

                let weight = pattern.weight(pattern_x as usize, pattern_y as usize);
                if let Some(current) = self.field(layer)[self.idx(target_x as usize, target_y as usize)] {
                    self.set_cell(target_x as usize, target_y as usize, current + addition * weight, layer);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::air::pattern::initial_cough;
    use crate::sim_utils::config::test_config;

    fn make_air(width: usize, height: usize, barriers: &[Barrier], voids: &[Void]) -> Air {
        let cfg = test_config();
        Air::new(&cfg.env, width, height, 0.0, 0.0, 0.0, barriers, voids).unwrap()
    }

    fn flat(depth: usize) -> EmissionPattern {
        EmissionPattern::new(vec![vec![0.1; depth]; 5]).unwrap()
    }

    #[test]
    fn test_grid_covers_environment() {
        let air = make_air(101, 101, &[], &[]);
        // 101 mobility cells at ratio 0.2 round up to 21 air cells
        assert_eq!(air.width(), 21);
        assert_eq!(air.height(), 21);
    }

    #[test]
    fn test_out_of_bounds_read() {
        let air = make_air(5, 5, &[], &[]);
        assert!(matches!(air.cell(1, 0, Layer::Aerosols), Err(SimError::OutOfBounds(..))));
    }

    #[test]
    fn test_void_cell_reads_absent_and_drops_writes() {
        let mut air = make_air(25, 25, &[], &[Void::new(2, 2)]);
        assert_eq!(air.cell(2, 2, Layer::Aerosols).unwrap(), None);
        assert_eq!(air.cell(2, 2, Layer::Droplets).unwrap(), None);
        // mobility (10,10) converts onto the void cell
        air.add_aerosol(10, 10, 5.0).unwrap();
        air.add_droplet(10, 10, 5.0).unwrap();
        assert_eq!(air.get_aerosol(10, 10).unwrap(), None);
        assert_eq!(air.get_droplet(10, 10).unwrap(), None);
        assert_eq!(air.layer_total(Layer::Aerosols), 0.0);
    }

    #[test]
    fn test_void_outside_grid_is_rejected() {
        let cfg = test_config();
        let air = Air::new(&cfg.env, 25, 25, 0.0, 0.0, 0.0, &[], &[Void::new(30, 0)]);
        assert!(matches!(air, Err(SimError::OutOfBounds(..))));
    }

    #[test]
    fn test_add_and_subtract() {
        let mut air = make_air(25, 25, &[], &[]);
        air.add_aerosol(10, 10, 2.0).unwrap();
        air.subtract_aerosol(10, 10, 0.5).unwrap();
        assert_eq!(air.get_aerosol(10, 10).unwrap(), Some(1.5));
        // subtracting below zero is allowed
        air.subtract_droplet(10, 10, 1.0).unwrap();
        assert_eq!(air.get_droplet(10, 10).unwrap(), Some(-1.0));
    }

    #[test]
    fn test_decay_asymmetry() {
        let cfg = test_config();
        let mut air = Air::new(&cfg.env, 5, 5, 1.5, 0.3, 0.2, &[], &[]).unwrap();
        air.add_aerosol(0, 0, 1.0).unwrap();
        air.add_droplet(0, 0, 1.0).unwrap();
        air.decay();
        let dt = cfg.env.SimulationTimeStep;
        let aero = air.get_aerosol(0, 0).unwrap().unwrap();
        let drop = air.get_droplet(0, 0).unwrap().unwrap();
        assert!((aero - libm::exp(-(1.5 + 0.2) * dt)).abs() < 1e-12);
        assert!((drop - (1.0 - 0.3 * dt)).abs() < 1e-12);
    }

    #[test]
    fn test_diffusion_conserves_mass_without_absorption() {
        // WallAbsorbingProportion = 0: every emitted share is received
        let mut air = make_air(101, 101, &[], &[]);
        air.add_aerosol(50, 50, 3.0).unwrap();
        let before = air.layer_total(Layer::Aerosols);
        for _ in 0..5 {
            air.diffuse();
        }
        assert!((air.layer_total(Layer::Aerosols) - before).abs() < 1e-9);
    }

    #[test]
    fn test_diffusion_loses_mass_with_absorbing_walls() {
        let mut cfg = test_config();
        cfg.env.WallAbsorbingProportion = 1.0;
        let mut air = Air::new(&cfg.env, 25, 25, 0.0, 0.0, 0.0, &[], &[]).unwrap();
        air.add_aerosol(0, 0, 3.0).unwrap();
        let mut previous = air.layer_total(Layer::Aerosols);
        for _ in 0..10 {
            air.diffuse();
            let total = air.layer_total(Layer::Aerosols);
            assert!(total < previous);
            previous = total;
        }
    }

    #[test]
    fn test_diffusion_respects_wall_and_shield_edges() {
        // wall on the full left column boundary of a 2x1-air-cell grid
        let wall = Barrier::Wall { x1: 1, y1: 0, x2: 1, y2: 5 };
        let mut air = make_air(10, 25, &[wall], &[]);
        assert_eq!(air.width(), 2);
        air.add_aerosol(9, 10, 1.0).unwrap(); // right air column
        air.add_droplet(9, 10, 1.0).unwrap();
        for _ in 0..20 {
            air.diffuse();
        }
        for y in 0..air.height() {
            assert_eq!(air.cell(0, y, Layer::Aerosols).unwrap(), Some(0.0));
            assert_eq!(air.cell(0, y, Layer::Droplets).unwrap(), Some(0.0));
        }

        let shield = Barrier::Shield { x1: 1, y1: 0, x2: 1, y2: 5 };
        let mut air = make_air(10, 25, &[shield], &[]);
        air.add_aerosol(9, 10, 1.0).unwrap();
        air.add_droplet(9, 10, 1.0).unwrap();
        for _ in 0..20 {
            air.diffuse();
        }
        let aero_left: f64 = (0..air.height())
            .map(|y| air.cell(0, y, Layer::Aerosols).unwrap().unwrap())
            .sum();
        assert!(aero_left > 0.0);
        for y in 0..air.height() {
            assert_eq!(air.cell(0, y, Layer::Droplets).unwrap(), Some(0.0));
        }
    }

    #[test]
    fn test_aerosol_emission_pattern_north() {
        let mut air = make_air(101, 101, &[], &[]);
        air.add_aerosol_pattern(50, 50, 2.0, &initial_cough(), Facing::North);
        assert_ne!(Some(0.0), air.get_aerosol(50, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 55).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 60).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 65).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 70).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(40, 70).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(60, 70).unwrap());
        assert_eq!(Some(0.0), air.get_aerosol(50, 75).unwrap());
        assert_eq!(Some(0.0), air.get_aerosol(50, 45).unwrap());
    }

    #[test]
    fn test_droplet_emission_pattern_north() {
        let mut air = make_air(101, 101, &[], &[]);
        air.add_droplet_pattern(50, 50, 2.0, &initial_cough(), Facing::North);
        assert_ne!(Some(0.0), air.get_droplet(50, 50).unwrap());
        assert_ne!(Some(0.0), air.get_droplet(50, 70).unwrap());
        assert_ne!(Some(0.0), air.get_droplet(40, 70).unwrap());
        assert_ne!(Some(0.0), air.get_droplet(60, 70).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(50, 75).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(50, 45).unwrap());
    }

    #[test]
    fn test_aerosol_emission_pattern_south() {
        let mut air = make_air(101, 101, &[], &[]);
        air.add_aerosol_pattern(50, 50, 2.0, &initial_cough(), Facing::South);
        assert_ne!(Some(0.0), air.get_aerosol(50, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 45).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 40).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 35).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 30).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(40, 30).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(60, 30).unwrap());
        assert_eq!(Some(0.0), air.get_aerosol(50, 25).unwrap());
        assert_eq!(Some(0.0), air.get_aerosol(50, 55).unwrap());
    }

    #[test]
    fn test_aerosol_emission_pattern_east() {
        let mut air = make_air(101, 101, &[], &[]);
        air.add_aerosol_pattern(50, 50, 2.0, &initial_cough(), Facing::East);
        assert_ne!(Some(0.0), air.get_aerosol(50, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(55, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(60, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(65, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(70, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(70, 40).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(70, 60).unwrap());
        assert_eq!(Some(0.0), air.get_aerosol(75, 50).unwrap());
        assert_eq!(Some(0.0), air.get_aerosol(45, 50).unwrap());
    }

    #[test]
    fn test_aerosol_emission_pattern_west() {
        let mut air = make_air(101, 101, &[], &[]);
        air.add_aerosol_pattern(50, 50, 2.0, &initial_cough(), Facing::West);
        assert_ne!(Some(0.0), air.get_aerosol(50, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(45, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(40, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(35, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(30, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(30, 40).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(30, 60).unwrap());
        assert_eq!(Some(0.0), air.get_aerosol(25, 50).unwrap());
        assert_eq!(Some(0.0), air.get_aerosol(55, 50).unwrap());
    }

    #[test]
    fn test_aerosol_emission_pattern_void_north() {
        let mut air = make_air(101, 101, &[], &[Void::new(10, 12)]);
        air.add_aerosol_pattern(50, 50, 2.0, &initial_cough(), Facing::North);
        assert_ne!(Some(0.0), air.get_aerosol(50, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 55).unwrap());
        assert_eq!(None, air.get_aerosol(50, 60).unwrap());
        assert_eq!(Some(0.0), air.get_aerosol(50, 65).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(40, 70).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(60, 70).unwrap());
    }

    #[test]
    fn test_aerosol_emission_pattern_void_east() {
        let mut air = make_air(101, 101, &[], &[Void::new(12, 10)]);
        air.add_aerosol_pattern(50, 50, 2.0, &initial_cough(), Facing::East);
        assert_ne!(Some(0.0), air.get_aerosol(50, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(55, 50).unwrap());
        assert_eq!(None, air.get_aerosol(60, 50).unwrap());
        assert_eq!(Some(0.0), air.get_aerosol(65, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(70, 40).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(70, 60).unwrap());
    }

    #[test]
    fn test_droplet_emission_pattern_shield_east() {
        let shield = Barrier::Shield { x1: 12, y1: 10, x2: 12, y2: 11 };
        let mut air = make_air(101, 101, &[shield], &[]);
        air.add_droplet_pattern(50, 50, 2.0, &initial_cough(), Facing::East);
        assert_ne!(Some(0.0), air.get_droplet(50, 50).unwrap());
        assert_ne!(Some(0.0), air.get_droplet(55, 50).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(60, 50).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(65, 50).unwrap());
        assert_ne!(Some(0.0), air.get_droplet(70, 40).unwrap());
        assert_ne!(Some(0.0), air.get_droplet(70, 60).unwrap());
    }

    #[test]
    fn test_droplet_emission_pattern_shield_north() {
        let shield = Barrier::Shield { x1: 10, y1: 12, x2: 11, y2: 12 };
        let mut air = make_air(101, 101, &[shield], &[]);
        air.add_droplet_pattern(50, 50, 2.0, &initial_cough(), Facing::North);
        assert_ne!(Some(0.0), air.get_droplet(50, 50).unwrap());
        assert_ne!(Some(0.0), air.get_droplet(50, 55).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(50, 60).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(50, 65).unwrap());
        assert_ne!(Some(0.0), air.get_droplet(40, 70).unwrap());
        assert_ne!(Some(0.0), air.get_droplet(60, 70).unwrap());
    }

    #[test]
    fn test_shield_does_not_cut_aerosol_pattern() {
        let shield = Barrier::Shield { x1: 10, y1: 12, x2: 11, y2: 12 };
        let mut air = make_air(101, 101, &[shield], &[]);
        air.add_aerosol_pattern(50, 50, 2.0, &initial_cough(), Facing::North);
        assert_ne!(Some(0.0), air.get_aerosol(50, 60).unwrap());
    }

    #[test]
    fn test_emission_pattern_near_high_edge() {
        let mut air = make_air(101, 101, &[], &[]);
        air.add_aerosol_pattern(50, 90, 2.0, &initial_cough(), Facing::North);
        assert_ne!(Some(0.0), air.get_aerosol(50, 90).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 95).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(50, 100).unwrap());
    }

    #[test]
    fn test_emission_pattern_near_low_edge() {
        let mut air = make_air(101, 101, &[], &[]);
        air.add_aerosol_pattern(10, 50, 2.0, &initial_cough(), Facing::West);
        assert_ne!(Some(0.0), air.get_aerosol(10, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(5, 50).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(0, 50).unwrap());
    }

    #[test]
    fn test_emission_pattern_near_corner() {
        let mut air = make_air(101, 101, &[], &[]);
        air.add_aerosol_pattern(5, 5, 2.0, &initial_cough(), Facing::South);
        assert_ne!(Some(0.0), air.get_aerosol(5, 5).unwrap());
        assert_ne!(Some(0.0), air.get_aerosol(5, 0).unwrap());
    }

    #[test]
    fn test_emission_pattern_next_to_void() {
        let mut air = make_air(101, 101, &[], &[Void::new(9, 10)]);
        air.add_droplet_pattern(50, 50, 2.0, &flat(3), Facing::North);
        assert_ne!(Some(0.0), air.get_droplet(50, 50).unwrap());
        assert_eq!(None, air.get_droplet(45, 50).unwrap());
        // depth 0 stays suppressed in the outer column of the same half
        assert_eq!(Some(0.0), air.get_droplet(40, 50).unwrap());
    }

    #[test]
    fn test_emission_pattern_next_to_shield() {
        let shield = Barrier::Shield { x1: 10, y1: 10, x2: 10, y2: 11 };
        let mut air = make_air(101, 101, &[shield], &[]);
        air.add_droplet_pattern(50, 50, 2.0, &flat(3), Facing::North);
        assert_ne!(Some(0.0), air.get_droplet(50, 50).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(45, 50).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(40, 50).unwrap());
    }

    #[test]
    fn test_emission_pattern_next_to_shield_edge() {
        let shield = Barrier::Shield { x1: 10, y1: 10, x2: 10, y2: 12 };
        let mut air = make_air(101, 101, &[shield], &[]);
        air.add_droplet_pattern(50, 50, 2.0, &flat(3), Facing::North);
        assert_ne!(Some(0.0), air.get_droplet(50, 50).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(45, 50).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(45, 55).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(45, 60).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(40, 50).unwrap());
    }

    #[test]
    fn test_emission_pattern_next_to_shield_edge_right() {
        let shield = Barrier::Shield { x1: 11, y1: 10, x2: 11, y2: 12 };
        let mut air = make_air(101, 101, &[shield], &[]);
        air.add_droplet_pattern(50, 50, 2.0, &flat(3), Facing::North);
        assert_ne!(Some(0.0), air.get_droplet(50, 50).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(55, 50).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(55, 55).unwrap());
        assert_eq!(Some(0.0), air.get_droplet(60, 50).unwrap());
    }
}
