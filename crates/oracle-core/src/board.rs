//! Map representation: colors, terrain and the bounded hexagonal grid.
//!
//! This module contains:
//! - The six-color wheel shared by dice, cards, gods and map cells
//! - Terrain types for map cells
//! - `HexMap`, a fixed-radius hexagon of cells with O(1) lookup
//!
//! The map is produced by an external generator. The engine only reads it
//! and, through `set_cell`, changes the terrain or color of existing cells.

use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Player identifier (index into the player list)
pub type PlayerId = u8;

/// One of the six colors on the color wheel.
///
/// The declaration order is the wheel order; recoloring moves clockwise
/// and wraps from `Green` back to `Red`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoreColor {
    Red,
    Pink,
    Blue,
    Black,
    Yellow,
    Green,
}

impl CoreColor {
    /// All colors in wheel order
    pub const ALL: [CoreColor; 6] = [
        CoreColor::Red,
        CoreColor::Pink,
        CoreColor::Blue,
        CoreColor::Black,
        CoreColor::Yellow,
        CoreColor::Green,
    ];

    /// Position on the wheel (0-5)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The color `steps` positions further around the wheel
    pub fn advanced(self, steps: u32) -> CoreColor {
        let offset = (steps % Self::ALL.len() as u32) as usize;
        Self::ALL[(self.index() + offset) % Self::ALL.len()]
    }

    /// Lowercase name, used in log output and error messages
    pub fn name(&self) -> &'static str {
        match self {
            CoreColor::Red => "red",
            CoreColor::Pink => "pink",
            CoreColor::Blue => "blue",
            CoreColor::Black => "black",
            CoreColor::Yellow => "yellow",
            CoreColor::Green => "green",
        }
    }
}

impl std::fmt::Display for CoreColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a map cell is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    /// Open water; the only terrain ships travel through
    #[default]
    Sea,
    /// Water too shallow to sail
    Shallow,
    /// Plain island
    Land,
    /// The center of the map
    Zeus,
    /// Island holding statues to pick up
    City,
    /// Island where offerings are delivered
    Temple,
    /// Island with a player's shrine tile
    Shrine,
    /// Island with bases for raising statues
    Statue,
    /// Island holding offering cubes
    Offerings,
    /// Island occupied by monsters
    Monsters,
}

impl Terrain {
    /// Whether ships can sail through this terrain
    pub fn is_sea(&self) -> bool {
        matches!(self, Terrain::Sea)
    }
}

/// A single cell on the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexCell {
    /// Position on the hex grid (fixed for the cell's lifetime)
    pub coord: HexCoord,
    /// Current terrain
    pub terrain: Terrain,
    /// Current color, `None` for uncolored cells
    pub color: Option<CoreColor>,
}

impl HexCell {
    /// Create an uncolored sea cell
    pub fn sea(coord: HexCoord) -> Self {
        Self {
            coord,
            terrain: Terrain::Sea,
            color: None,
        }
    }
}

/// Why a serialized map was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("Map of radius {radius} needs {expected} cells, got {found}")]
    WrongCellCount {
        radius: u32,
        expected: usize,
        found: usize,
    },

    #[error("Cell {found} stored where {expected} was expected")]
    MisplacedCell { expected: HexCoord, found: HexCoord },
}

/// Serialized form of the map, validated on load
#[derive(Debug, Clone, Deserialize)]
struct MapData {
    radius: u32,
    cells: Vec<HexCell>,
}

/// A fixed-radius hexagon of cells centered on (0, 0).
///
/// Cells are stored row by row (increasing `r`, then increasing `q`), so a
/// coordinate's storage index is computed arithmetically instead of looked
/// up in a hash map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MapData")]
pub struct HexMap {
    radius: u32,
    cells: Vec<HexCell>,
}

impl HexMap {
    /// Create a map of the given radius filled with uncolored sea
    pub fn new(radius: u32) -> Self {
        let r = radius as i32;
        let mut cells = Vec::with_capacity(Self::cell_count_for(radius));
        for row in -r..=r {
            let q_min = (-r).max(-row - r);
            let q_max = r.min(-row + r);
            for q in q_min..=q_max {
                cells.push(HexCell::sea(HexCoord::new(q, row)));
            }
        }
        Self { radius, cells }
    }

    /// Number of cells in a hexagon of the given radius
    pub fn cell_count_for(radius: u32) -> usize {
        let r = radius as usize;
        3 * r * (r + 1) + 1
    }

    /// The radius the map was built with
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Whether the coordinate lies inside the hexagon
    pub fn contains(&self, coord: &HexCoord) -> bool {
        let r = self.radius as i32;
        coord.q.abs() <= r && coord.r.abs() <= r && coord.s().abs() <= r
    }

    /// Storage index of a coordinate, `None` when off the grid
    fn index_of(&self, coord: &HexCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let radius = self.radius as i64;
        let row = coord.r as i64;
        let q_min = (-radius).max(-row - radius);

        // Rows above the center grow by one cell each, rows below shrink.
        let row_offset = if row <= 0 {
            let k = row + radius;
            k * (radius + 1) + k * (k - 1) / 2
        } else {
            let upper = (radius + 1) * (radius + 1) + radius * (radius + 1) / 2;
            let m = row - 1;
            upper + m * 2 * radius - m * (m - 1) / 2
        };

        Some((row_offset + coord.q as i64 - q_min) as usize)
    }

    /// Get the cell at a coordinate
    pub fn cell(&self, coord: &HexCoord) -> Option<&HexCell> {
        self.index_of(coord).and_then(|i| self.cells.get(i))
    }

    /// Get a mutable cell at a coordinate
    pub fn cell_mut(&mut self, coord: &HexCoord) -> Option<&mut HexCell> {
        let index = self.index_of(coord)?;
        self.cells.get_mut(index)
    }

    /// Change the terrain and color of an existing cell.
    ///
    /// Returns `false` (and changes nothing) for coordinates off the grid.
    pub fn set_cell(&mut self, coord: HexCoord, terrain: Terrain, color: Option<CoreColor>) -> bool {
        match self.cell_mut(&coord) {
            Some(cell) => {
                cell.terrain = terrain;
                cell.color = color;
                true
            }
            None => false,
        }
    }

    /// On-grid neighbors of a coordinate in direction order
    pub fn neighbors(&self, coord: &HexCoord) -> Vec<HexCoord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|n| self.contains(n))
            .collect()
    }

    /// Hex distance between two coordinates, ignoring terrain
    pub fn distance(&self, a: &HexCoord, b: &HexCoord) -> u32 {
        a.distance_to(b)
    }

    /// All cells in storage order
    pub fn cells(&self) -> impl Iterator<Item = &HexCell> {
        self.cells.iter()
    }

    /// Cells of one terrain type, in storage order
    pub fn cells_of_terrain(&self, terrain: Terrain) -> impl Iterator<Item = &HexCell> + '_ {
        self.cells.iter().filter(move |c| c.terrain == terrain)
    }

    /// Whether the coordinate is an on-grid sea cell
    pub fn is_sea(&self, coord: &HexCoord) -> bool {
        self.cell(coord).is_some_and(|c| c.terrain.is_sea())
    }
}

impl TryFrom<MapData> for HexMap {
    type Error = MapError;

    fn try_from(data: MapData) -> Result<Self, Self::Error> {
        let expected = HexMap::new(data.radius);
        if data.cells.len() != expected.cells.len() {
            return Err(MapError::WrongCellCount {
                radius: data.radius,
                expected: expected.cells.len(),
                found: data.cells.len(),
            });
        }
        for (cell, slot) in data.cells.iter().zip(expected.cells.iter()) {
            if cell.coord != slot.coord {
                return Err(MapError::MisplacedCell {
                    expected: slot.coord,
                    found: cell.coord,
                });
            }
        }
        Ok(Self {
            radius: data.radius,
            cells: data.cells,
        })
    }
}
