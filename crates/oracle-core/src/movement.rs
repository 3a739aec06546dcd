//! Ship reachability.
//!
//! Ships sail only through sea cells. A ship may move `base_range` steps for
//! free; every further step costs one favor. Because islands can force a
//! detour, the cost of reaching a cell is measured along the shortest sea
//! path, not by straight hex distance.

use crate::board::HexMap;
use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A sea cell a ship can reach, with the favor needed beyond free range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reachable {
    pub coordinates: HexCoord,
    /// Steps taken beyond the free range
    pub favor_cost: u32,
    /// Length of the shortest sea path
    pub steps: u32,
}

/// Every sea cell reachable from `origin` within `base_range + favor` steps.
///
/// Cells come out in BFS order (by step count, then neighbor direction), each
/// once at its shortest distance. The origin itself is not included.
pub fn reachable(map: &HexMap, origin: HexCoord, base_range: u32, favor: u32) -> Vec<Reachable> {
    let max_steps = base_range.saturating_add(favor);
    let mut result = Vec::new();
    let mut visited: HashSet<HexCoord> = HashSet::new();
    let mut queue: VecDeque<(HexCoord, u32)> = VecDeque::new();

    visited.insert(origin);
    queue.push_back((origin, 0));

    while let Some((current, steps)) = queue.pop_front() {
        if steps == max_steps {
            continue;
        }

        for next in map.neighbors(&current) {
            if !map.is_sea(&next) || !visited.insert(next) {
                continue;
            }
            let next_steps = steps + 1;
            result.push(Reachable {
                coordinates: next,
                favor_cost: next_steps.saturating_sub(base_range),
                steps: next_steps,
            });
            queue.push_back((next, next_steps));
        }
    }

    result
}
