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

/// A dead air cell, the legacy representation of solid walls. Coordinates
/// are in air-grid scale.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Void {
    pub x: usize,
    pub y: usize,
}

impl Void {
    pub fn new(x: usize, y: usize) -> Self {
        Void { x, y }
    }
}

/// An undirected edge between two adjacent air cells, normalized so that
/// (x1,y1) <= (x2,y2). Signed coordinates: emission patterns probe edges
/// that reach one step outside the grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Edge {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Edge {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        let edge = Edge {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        };
        assert!(
            (edge.x2 - edge.x1 == 1 || edge.y2 - edge.y1 == 1)
                && (edge.x2 == edge.x1 || edge.y2 == edge.y1),
            "Edge must be between two adjacent coordinates"
        );
        edge
    }
}

/// A straight barrier segment between two endpoints on the air grid.
/// A Wall blocks aerosols and droplets, a Shield only droplets.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Barrier {
    Wall { x1: i64, y1: i64, x2: i64, y2: i64 },
    Shield { x1: i64, y1: i64, x2: i64, y2: i64 },
}

impl Barrier {
    pub fn endpoints(&self) -> (i64, i64, i64, i64) {
        match *self {
            Barrier::Wall { x1, y1, x2, y2 } => (x1, y1, x2, y2),
            Barrier::Shield { x1, y1, x2, y2 } => (x1, y1, x2, y2),
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Barrier::Wall { .. })
    }

    /// Expand the segment into the set of unit edges it covers.
    pub fn edges(&self) -> Vec<Edge> {
        let (x1, y1, x2, y2) = self.endpoints();
        segment_edges(x1, y1, x2, y2)
    }
}

/// All unit edges along a vertical or horizontal segment. A vertical
/// segment (x, y1)-(x, y2) separates column x-1 from column x, a
/// horizontal one row y1-1 from row y1.
pub fn segment_edges(x1: i64, y1: i64, x2: i64, y2: i64) -> Vec<Edge> {
    assert!(x1 == x2 || y1 == y2, "Only vertical or horizontal lines");
    let mut edges = Vec::new();
    if x1 == x2 { // Vertical
        for y in y1.min(y2)..y1.max(y2) {
            edges.push(Edge::new(x1 - 1, y, x1, y));
        }
    } else { // Horizontal
        for x in x1.min(x2)..x1.max(x2) {
            edges.push(Edge::new(x, y1 - 1, x, y1));
        }
    }
    edges
}
