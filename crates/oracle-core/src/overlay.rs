//! Consumable contents of special islands.
//!
//! The map only knows that a cell is, say, an offerings island of some
//! color. What is still *on* that island (which cubes, which monsters, which
//! statue bases are free, whether a shrine was found) lives in an overlay
//! record. Records are kept in insertion order and indexed by coordinates.

use crate::board::{CoreColor, PlayerId, Terrain};
use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Offering cubes waiting on an offerings island
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeHex {
    pub coordinates: HexCoord,
    pub cubes: Vec<CoreColor>,
}

/// Monsters still occupying an island
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterHex {
    pub coordinates: HexCoord,
    pub monsters: Vec<CoreColor>,
}

/// Statues available for pickup in a city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityHex {
    pub coordinates: HexCoord,
    pub statues: Vec<CoreColor>,
}

/// One pedestal on a statue island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatueBase {
    Empty,
    Raised(PlayerId),
}

/// Pedestals on a statue island
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatueHex {
    pub coordinates: HexCoord,
    pub bases: Vec<StatueBase>,
}

impl StatueHex {
    /// Create a statue island with `count` empty bases
    pub fn new(coordinates: HexCoord, count: usize) -> Self {
        Self {
            coordinates,
            bases: vec![StatueBase::Empty; count],
        }
    }

    pub fn has_empty_base(&self) -> bool {
        self.bases.contains(&StatueBase::Empty)
    }
}

/// Whether a shrine tile has been found, and by how much
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShrineStatus {
    /// Face down; nobody knows whose it is
    Hidden,
    /// Face up but not yet built on
    Visible,
    /// Its owner has built the shrine
    Filled,
}

/// A shrine tile belonging to one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShrineHex {
    pub coordinates: HexCoord,
    pub owner: PlayerId,
    pub status: ShrineStatus,
}

impl ShrineHex {
    /// A face-down shrine
    pub fn hidden(coordinates: HexCoord, owner: PlayerId) -> Self {
        Self {
            coordinates,
            owner,
            status: ShrineStatus::Hidden,
        }
    }
}

/// Any overlay record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayRecord {
    Cubes(CubeHex),
    Monsters(MonsterHex),
    City(CityHex),
    Statue(StatueHex),
    Shrine(ShrineHex),
}

impl OverlayRecord {
    pub fn coordinates(&self) -> HexCoord {
        match self {
            OverlayRecord::Cubes(h) => h.coordinates,
            OverlayRecord::Monsters(h) => h.coordinates,
            OverlayRecord::City(h) => h.coordinates,
            OverlayRecord::Statue(h) => h.coordinates,
            OverlayRecord::Shrine(h) => h.coordinates,
        }
    }

    /// The terrain a record of this type must sit on
    pub fn terrain(&self) -> Terrain {
        match self {
            OverlayRecord::Cubes(_) => Terrain::Offerings,
            OverlayRecord::Monsters(_) => Terrain::Monsters,
            OverlayRecord::City(_) => Terrain::City,
            OverlayRecord::Statue(_) => Terrain::Statue,
            OverlayRecord::Shrine(_) => Terrain::Shrine,
        }
    }
}

/// All overlay records of a game, indexed by coordinates.
///
/// Serialized as the plain record list; the index is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<OverlayRecord>", into = "Vec<OverlayRecord>")]
pub struct Overlays {
    records: Vec<OverlayRecord>,
    index: HashMap<HexCoord, usize>,
}

impl Overlays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, replacing (in place) any record at the same coordinates
    pub fn insert(&mut self, record: OverlayRecord) -> Option<OverlayRecord> {
        let coord = record.coordinates();
        match self.index.get(&coord) {
            Some(&i) => Some(std::mem::replace(&mut self.records[i], record)),
            None => {
                self.index.insert(coord, self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// All records in insertion order
    pub fn records(&self) -> impl Iterator<Item = &OverlayRecord> {
        self.records.iter()
    }

    /// Number of records that belong on `terrain`
    pub fn count_for(&self, terrain: Terrain) -> usize {
        self.records.iter().filter(|r| r.terrain() == terrain).count()
    }

    pub fn get(&self, coord: &HexCoord) -> Option<&OverlayRecord> {
        self.index.get(coord).map(|&i| &self.records[i])
    }

    fn get_mut(&mut self, coord: &HexCoord) -> Option<&mut OverlayRecord> {
        let i = *self.index.get(coord)?;
        self.records.get_mut(i)
    }

    pub fn cube_hex(&self, coord: &HexCoord) -> Option<&CubeHex> {
        match self.get(coord)? {
            OverlayRecord::Cubes(h) => Some(h),
            _ => None,
        }
    }

    pub fn cube_hex_mut(&mut self, coord: &HexCoord) -> Option<&mut CubeHex> {
        match self.get_mut(coord)? {
            OverlayRecord::Cubes(h) => Some(h),
            _ => None,
        }
    }

    pub fn monster_hex(&self, coord: &HexCoord) -> Option<&MonsterHex> {
        match self.get(coord)? {
            OverlayRecord::Monsters(h) => Some(h),
            _ => None,
        }
    }

    pub fn monster_hex_mut(&mut self, coord: &HexCoord) -> Option<&mut MonsterHex> {
        match self.get_mut(coord)? {
            OverlayRecord::Monsters(h) => Some(h),
            _ => None,
        }
    }

    pub fn city_hex(&self, coord: &HexCoord) -> Option<&CityHex> {
        match self.get(coord)? {
            OverlayRecord::City(h) => Some(h),
            _ => None,
        }
    }

    pub fn city_hex_mut(&mut self, coord: &HexCoord) -> Option<&mut CityHex> {
        match self.get_mut(coord)? {
            OverlayRecord::City(h) => Some(h),
            _ => None,
        }
    }

    pub fn statue_hex(&self, coord: &HexCoord) -> Option<&StatueHex> {
        match self.get(coord)? {
            OverlayRecord::Statue(h) => Some(h),
            _ => None,
        }
    }

    pub fn statue_hex_mut(&mut self, coord: &HexCoord) -> Option<&mut StatueHex> {
        match self.get_mut(coord)? {
            OverlayRecord::Statue(h) => Some(h),
            _ => None,
        }
    }

    pub fn shrine_hex(&self, coord: &HexCoord) -> Option<&ShrineHex> {
        match self.get(coord)? {
            OverlayRecord::Shrine(h) => Some(h),
            _ => None,
        }
    }

    pub fn shrine_hex_mut(&mut self, coord: &HexCoord) -> Option<&mut ShrineHex> {
        match self.get_mut(coord)? {
            OverlayRecord::Shrine(h) => Some(h),
            _ => None,
        }
    }

    /// Shrine records in insertion order
    pub fn shrines(&self) -> impl Iterator<Item = &ShrineHex> {
        self.records.iter().filter_map(|r| match r {
            OverlayRecord::Shrine(h) => Some(h),
            _ => None,
        })
    }
}

/// A special cell without its overlay record means the game was built from
/// inconsistent data; there is no sensible way to continue.
pub(crate) fn missing(coord: HexCoord, terrain: Terrain) -> ! {
    panic!("no {terrain:?} overlay record at {coord}")
}

impl From<Vec<OverlayRecord>> for Overlays {
    fn from(records: Vec<OverlayRecord>) -> Self {
        let mut overlays = Overlays::new();
        for record in records {
            overlays.insert(record);
        }
        overlays
    }
}

impl From<Overlays> for Vec<OverlayRecord> {
    fn from(overlays: Overlays) -> Self {
        overlays.records
    }
}
