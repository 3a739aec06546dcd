//! Oracle - rules engine for a hex-grid voyage board game
//!
//! This crate provides the core game logic, including:
//! - Axial hex coordinates and a bounded hexagonal map
//! - Oracle dice and cards with favor-paid recoloring
//! - Legal action generation for every turn phase
//! - Game state machine with phase follow-ups and freeloading
//!
//! # Architecture
//!
//! The engine never trusts a submitted action. `GameState::apply_action`
//! regenerates the legal set and only accepts an action structurally equal
//! to one of its members, so generators are the single source of truth.
//!
//! It can be compiled to:
//! - Native Rust for server-side game hosting
//! - WebAssembly (`wasm` feature) for browser clients
//!
//! # Modules
//!
//! - [`hex`]: Axial coordinate system
//! - [`board`]: Colors, terrain and the hexagonal map
//! - [`overlay`]: Cubes, monsters, statues and shrines on special islands
//! - [`resource`]: Dice, cards and the recoloring wheel
//! - [`player`]: Player state, quests and cargo
//! - [`movement`]: Ship reachability over sea cells
//! - [`actions`]: Actions and resulting events
//! - [`generators`]: Legal action generators
//! - [`phase`]: Turn phases and the follow-up queue
//! - [`game`]: Game state machine
//! - [`config`]: Tunable rules

pub mod actions;
pub mod board;
pub mod config;
pub mod game;
pub mod generators;
pub mod hex;
pub mod movement;
pub mod overlay;
pub mod phase;
pub mod player;
pub mod resource;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{Action, ActionCategory, GameEvent};
pub use board::{CoreColor, HexCell, HexMap, MapError, PlayerId, Terrain};
pub use config::RulesConfig;
pub use game::{FreeloadOpportunity, GameError, GameState, LoadError, SetupError};
pub use hex::{HexCoord, HexDirection};
pub use movement::Reachable;
pub use overlay::{
    CityHex, CubeHex, MonsterHex, OverlayRecord, Overlays, ShrineHex, ShrineStatus, StatueBase,
    StatueHex,
};
pub use phase::{Phase, PhaseStack};
pub use player::{Cargo, God, Player, Quest, QuestKind};
pub use resource::{Resource, ResourceKind};
