//! Game actions that players can take.
//!
//! This module defines all possible actions in the game and the events
//! that result from those actions. Actions are plain data: the generators
//! build them fresh for every query and the engine compares a submitted
//! action against that list structurally.

use crate::board::{CoreColor, PlayerId};
use crate::hex::HexCoord;
use crate::phase::Phase;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};

/// Which generator an action comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCategory {
    /// No resource spent (end turn, god powers)
    Free,
    /// Any die or card works regardless of color
    Resource,
    /// The spent color picks a god track
    Color,
    /// Acts on a cell next to the ship
    Hex,
    /// Sails the ship
    Move,
    /// Teleporting phase
    Teleport,
    /// AdvancingGod phase
    ForcedAdvance,
    /// Peeking phase
    Peek,
    /// Exploring phase
    Explore,
}

/// All possible actions a player can take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    // ==================== Free ====================
    /// End your turn (only once every die has been used)
    EndTurn,
    /// Cash in a god that reached the top of its track
    UseGodPower { god: CoreColor },

    // ==================== Any Resource ====================
    /// Spend any die or card for favor
    GainFavor { spend: Resource },
    /// Spend any die or card to draw an oracle card
    GainOracleCard { spend: Resource },

    // ==================== Color ====================
    /// Advance the god of the spent color
    AdvanceGod { spend: Resource, god: CoreColor },

    // ==================== Hex ====================
    /// Explore (or build on) an adjacent shrine
    ExploreShrine { spend: Resource, coordinates: HexCoord },
    /// Load an offering cube from an adjacent offerings island
    LoadCube {
        spend: Resource,
        coordinates: HexCoord,
        cube: CoreColor,
    },
    /// Deliver a cube to an adjacent temple of its color
    DeliverCube { spend: Resource, coordinates: HexCoord },
    /// Load a statue from an adjacent city
    LoadStatue {
        spend: Resource,
        coordinates: HexCoord,
        statue: CoreColor,
    },
    /// Raise a carried statue on an adjacent statue island
    RaiseStatue { spend: Resource, coordinates: HexCoord },
    /// Defeat the monster of the spent color on an adjacent island
    FightMonster { spend: Resource, coordinates: HexCoord },

    // ==================== Move ====================
    /// Sail to a sea cell of the spent color
    MoveShip {
        spend: Resource,
        destination: HexCoord,
        favor_to_extend_range: u32,
    },

    // ==================== Special phases ====================
    /// Place the ship on any sea cell
    Teleport { destination: HexCoord },
    /// Advance any god without spending a resource
    FreeAdvanceGod { god: CoreColor },
    /// Secretly look at whose shrine a hidden tile is
    PeekShrine { coordinates: HexCoord },
    /// Explore a hidden shrine anywhere on the map
    ExploreRemoteShrine { coordinates: HexCoord },
}

impl Action {
    /// The generator category this action belongs to
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::EndTurn | Action::UseGodPower { .. } => ActionCategory::Free,
            Action::GainFavor { .. } | Action::GainOracleCard { .. } => ActionCategory::Resource,
            Action::AdvanceGod { .. } => ActionCategory::Color,
            Action::ExploreShrine { .. }
            | Action::LoadCube { .. }
            | Action::DeliverCube { .. }
            | Action::LoadStatue { .. }
            | Action::RaiseStatue { .. }
            | Action::FightMonster { .. } => ActionCategory::Hex,
            Action::MoveShip { .. } => ActionCategory::Move,
            Action::Teleport { .. } => ActionCategory::Teleport,
            Action::FreeAdvanceGod { .. } => ActionCategory::ForcedAdvance,
            Action::PeekShrine { .. } => ActionCategory::Peek,
            Action::ExploreRemoteShrine { .. } => ActionCategory::Explore,
        }
    }

    /// The resource paying for this action, if any
    pub fn spend(&self) -> Option<&Resource> {
        match self {
            Action::GainFavor { spend }
            | Action::GainOracleCard { spend }
            | Action::AdvanceGod { spend, .. }
            | Action::ExploreShrine { spend, .. }
            | Action::LoadCube { spend, .. }
            | Action::DeliverCube { spend, .. }
            | Action::LoadStatue { spend, .. }
            | Action::RaiseStatue { spend, .. }
            | Action::FightMonster { spend, .. }
            | Action::MoveShip { spend, .. } => Some(spend),
            Action::EndTurn
            | Action::UseGodPower { .. }
            | Action::Teleport { .. }
            | Action::FreeAdvanceGod { .. }
            | Action::PeekShrine { .. }
            | Action::ExploreRemoteShrine { .. } => None,
        }
    }

    /// The map cell this action touches, if any
    pub fn coordinates(&self) -> Option<HexCoord> {
        match self {
            Action::ExploreShrine { coordinates, .. }
            | Action::LoadCube { coordinates, .. }
            | Action::DeliverCube { coordinates, .. }
            | Action::LoadStatue { coordinates, .. }
            | Action::RaiseStatue { coordinates, .. }
            | Action::FightMonster { coordinates, .. }
            | Action::PeekShrine { coordinates }
            | Action::ExploreRemoteShrine { coordinates } => Some(*coordinates),
            Action::MoveShip { destination, .. } | Action::Teleport { destination } => {
                Some(*destination)
            }
            _ => None,
        }
    }
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player's oracle dice were rolled
    DiceRolled {
        player: PlayerId,
        dice: Vec<CoreColor>,
    },

    /// A die or card was used up
    ResourceSpent {
        player: PlayerId,
        resource: Resource,
    },

    /// Favor was gained
    FavorGained { player: PlayerId, amount: u32 },

    /// An oracle card was drawn from the deck
    OracleCardDrawn { player: PlayerId, color: CoreColor },

    /// A god moved up its track
    GodAdvanced {
        player: PlayerId,
        god: CoreColor,
        level: u8,
    },

    /// A maxed god's power was used
    GodPowerUsed { player: PlayerId, god: CoreColor },

    /// A ship sailed
    ShipMoved {
        player: PlayerId,
        from: HexCoord,
        to: HexCoord,
        favor_paid: u32,
    },

    /// A ship was teleported
    Teleported {
        player: PlayerId,
        from: HexCoord,
        to: HexCoord,
    },

    /// A cube was loaded from an offerings island
    CubeLoaded {
        player: PlayerId,
        location: HexCoord,
        color: CoreColor,
    },

    /// A cube was delivered to a temple
    CubeDelivered {
        player: PlayerId,
        location: HexCoord,
        color: CoreColor,
    },

    /// A statue was loaded from a city
    StatueLoaded {
        player: PlayerId,
        location: HexCoord,
        color: CoreColor,
    },

    /// A statue was raised
    StatueRaised {
        player: PlayerId,
        location: HexCoord,
        color: CoreColor,
    },

    /// A monster was defeated
    MonsterDefeated {
        player: PlayerId,
        location: HexCoord,
        color: CoreColor,
    },

    /// A hidden shrine was turned face up
    ShrineRevealed {
        player: PlayerId,
        location: HexCoord,
        owner: PlayerId,
    },

    /// A shrine was built by its owner
    ShrineFilled { player: PlayerId, location: HexCoord },

    /// A player secretly looked at a shrine
    ShrinePeeked { player: PlayerId, location: HexCoord },

    /// A quest slot was completed
    QuestCompleted {
        player: PlayerId,
        quest_index: usize,
    },

    /// The active phase changed
    PhaseChanged { from: Phase, to: Phase },

    /// Turn ended
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
        round: u32,
    },

    /// A non-active player took a freeloading advance
    Freeloaded {
        player: PlayerId,
        god: CoreColor,
        level: u8,
    },
}
