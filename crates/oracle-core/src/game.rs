//! Core game state machine.
//!
//! This module contains the main `GameState` struct: setup validation, the
//! action dispatcher, turn rotation, freeloading and persistence. Which
//! actions are legal is decided in [`crate::generators`]; this module only
//! accepts what those generators produce.

use crate::actions::{Action, GameEvent};
use crate::board::{CoreColor, HexMap, PlayerId, Terrain};
use crate::config::RulesConfig;
use crate::generators;
use crate::hex::HexCoord;
use crate::overlay::{self, Overlays, ShrineStatus, StatueBase};
use crate::phase::{Phase, PhaseStack};
use crate::player::{Cargo, Player, QuestKind};
use crate::resource::Resource;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Most players a game supports
pub const MAX_PLAYERS: usize = 4;

/// Terrains that must each carry exactly one overlay record
const OVERLAY_TERRAINS: [Terrain; 5] = [
    Terrain::Offerings,
    Terrain::Monsters,
    Terrain::City,
    Terrain::Statue,
    Terrain::Shrine,
];

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Action not available")]
    ActionNotAvailable,

    #[error("Resource spend conflicts with the declared recoloring")]
    ResourceSpendConflict,

    #[error("Not enough favor: need {needed}, have {available}")]
    InsufficientFavor { needed: u32, available: u32 },

    #[error("You don't have that resource")]
    NoSuchResource,

    #[error("Invalid action for current phase")]
    WrongPhase,

    #[error("No freeloading opportunity for that god")]
    NoFreeloadOpportunity,

    #[error("Unknown player")]
    UnknownPlayer,
}

/// Inconsistent data handed to [`GameState::new`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("A game needs at least one player")]
    NoPlayers,

    #[error("Too many players: {0} (max {MAX_PLAYERS})")]
    TooManyPlayers(usize),

    #[error("Player at seat {seat} has id {id}")]
    PlayerOutOfOrder { seat: usize, id: PlayerId },

    #[error("Ship of player {player} is not on a sea cell at {position}")]
    ShipOffMap { player: PlayerId, position: HexCoord },

    #[error("Map has {cells} {terrain:?} cells but {records} overlay records")]
    OverlayCountMismatch {
        terrain: Terrain,
        cells: usize,
        records: usize,
    },

    #[error("Overlay record at {0} does not sit on matching terrain")]
    OverlayOnWrongTerrain(HexCoord),

    #[error("Shrine at {position} belongs to unknown player {owner}")]
    UnknownShrineOwner { position: HexCoord, owner: PlayerId },

    #[error("Current player {0} is not seated")]
    UnknownCurrentPlayer(PlayerId),
}

/// Why a saved game could not be restored
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Malformed save: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inconsistent save: {0}")]
    Setup(#[from] SetupError),
}

/// A non-active player may advance one god for free
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeloadOpportunity {
    pub player: PlayerId,
    pub color: CoreColor,
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The map
    pub map: HexMap,
    /// What is left on special islands
    pub overlays: Overlays,
    /// All players
    pub players: Vec<Player>,
    /// Current player index
    pub current_player: PlayerId,
    /// Round number (starts at 1)
    pub round: u32,
    /// Active phase and queued follow-ups
    pub phases: PhaseStack,
    /// Shared oracle card deck, drawn from the back
    pub oracle_deck: Vec<CoreColor>,
    /// Freeloading open until the next end of turn
    pub freeloading: Vec<FreeloadOpportunity>,
    /// Rules in effect
    pub config: RulesConfig,
    /// Random number generator seed (for deterministic replays)
    rng_seed: u64,
    /// Dice rolls so far; mixed into the seed for each roll
    rolls: u64,
}

impl GameState {
    /// Create a game with default rules and a random seed
    pub fn new(map: HexMap, players: Vec<Player>, overlays: Overlays) -> Result<Self, SetupError> {
        let seed = rand::thread_rng().gen();
        Self::with_config(map, players, overlays, RulesConfig::default(), seed)
    }

    /// Create a game with explicit rules and seed
    pub fn with_config(
        map: HexMap,
        players: Vec<Player>,
        overlays: Overlays,
        config: RulesConfig,
        seed: u64,
    ) -> Result<Self, SetupError> {
        Self::validate(&map, &players, &overlays)?;

        let mut oracle_deck: Vec<CoreColor> = CoreColor::ALL
            .iter()
            .flat_map(|c| std::iter::repeat(*c).take(config.oracle_cards_per_color))
            .collect();
        oracle_deck.shuffle(&mut StdRng::seed_from_u64(seed));

        Ok(Self {
            map,
            overlays,
            players,
            current_player: 0,
            round: 1,
            phases: PhaseStack::new(),
            oracle_deck,
            freeloading: Vec::new(),
            config,
            rng_seed: seed,
            rolls: 0,
        })
    }

    fn validate(map: &HexMap, players: &[Player], overlays: &Overlays) -> Result<(), SetupError> {
        if players.is_empty() {
            return Err(SetupError::NoPlayers);
        }
        if players.len() > MAX_PLAYERS {
            return Err(SetupError::TooManyPlayers(players.len()));
        }

        for (seat, player) in players.iter().enumerate() {
            if player.id as usize != seat {
                return Err(SetupError::PlayerOutOfOrder {
                    seat,
                    id: player.id,
                });
            }
            if !map.is_sea(&player.ship) {
                return Err(SetupError::ShipOffMap {
                    player: player.id,
                    position: player.ship,
                });
            }
        }

        for record in overlays.records() {
            let coord = record.coordinates();
            if map.cell(&coord).map(|c| c.terrain) != Some(record.terrain()) {
                return Err(SetupError::OverlayOnWrongTerrain(coord));
            }
        }

        for terrain in OVERLAY_TERRAINS {
            let cells = map.cells_of_terrain(terrain).count();
            let records = overlays.count_for(terrain);
            if cells != records {
                return Err(SetupError::OverlayCountMismatch {
                    terrain,
                    cells,
                    records,
                });
            }
        }

        for shrine in overlays.shrines() {
            if shrine.owner as usize >= players.len() {
                return Err(SetupError::UnknownShrineOwner {
                    position: shrine.coordinates,
                    owner: shrine.owner,
                });
            }
        }

        Ok(())
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    /// The player whose turn it is
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player as usize]
    }

    fn current_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player as usize]
    }

    pub fn phase(&self) -> Phase {
        self.phases.active()
    }

    /// The first player to complete every quest
    pub fn winner(&self) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|p| p.all_quests_completed())
            .map(|p| p.id)
    }

    // ==================== Queries ====================

    /// All legal actions for the current player in the active phase
    pub fn available_actions(&self) -> Vec<Action> {
        generators::available_actions(self)
    }

    /// Whether `action` is in the current legal set
    pub fn is_available(&self, action: &Action) -> bool {
        self.available_actions().contains(action)
    }

    // ==================== Turn flow ====================

    /// Leave `Welcome` and roll the first player's dice
    pub fn start(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.phases.active() != Phase::Welcome {
            return Err(GameError::WrongPhase);
        }

        let mut events = Vec::new();
        let dice = self.roll_dice();
        self.current_mut().oracle_dice = dice.clone();
        events.push(GameEvent::DiceRolled {
            player: self.current_player,
            dice,
        });
        events.extend(self.end_phase());

        debug!(player = self.current_player, "game started");
        Ok(events)
    }

    /// Record how far the current player wants to recolor one resource.
    ///
    /// A cost of 0 withdraws the declaration. Nothing is charged until the
    /// resource is spent.
    pub fn declare_recoloring(&mut self, resource: Resource) -> Result<(), GameError> {
        let player = self.current_mut();
        if !player.holds(&resource) {
            return Err(GameError::NoSuchResource);
        }
        if resource.recolor_cost > player.favor {
            return Err(GameError::InsufficientFavor {
                needed: resource.recolor_cost,
                available: player.favor,
            });
        }
        player.declare_recoloring(resource);
        debug!(player = player.id, %resource, "recoloring declared");
        Ok(())
    }

    /// Validate and apply an action for the current player.
    ///
    /// The action must be structurally equal to a member of the freshly
    /// generated legal set. A rejected action leaves the state untouched.
    pub fn apply_action(&mut self, action: Action) -> Result<Vec<GameEvent>, GameError> {
        let Some(chosen) = self.available_actions().into_iter().find(|a| *a == action) else {
            warn!(
                player = self.current_player,
                phase = ?self.phases.active(),
                ?action,
                "rejected unavailable action"
            );
            return Err(GameError::ActionNotAvailable);
        };

        if let (Some(submitted), Some(generated)) = (action.spend(), chosen.spend()) {
            if submitted.recolor_cost != generated.recolor_cost {
                warn!(
                    player = self.current_player,
                    submitted = submitted.recolor_cost,
                    declared = generated.recolor_cost,
                    "rejected spend with stale recoloring"
                );
                return Err(GameError::ResourceSpendConflict);
            }
        }

        let player = self.current_player;
        let mut events = Vec::new();
        self.apply_effect(&chosen, &mut events);

        if let Some(spend) = chosen.spend() {
            if !self.current_mut().spend(spend) {
                panic!("player {player} cannot pay for a generated action with {spend}");
            }
            events.push(GameEvent::ResourceSpent {
                player,
                resource: *spend,
            });
        }
        debug!(player, action = ?chosen, "applied action");

        if chosen == Action::EndTurn {
            events.extend(self.end_turn());
        } else {
            events.extend(self.end_phase());
        }
        Ok(events)
    }

    fn apply_effect(&mut self, action: &Action, events: &mut Vec<GameEvent>) {
        let player = self.current_player;
        let max_level = self.config.max_god_level;

        match *action {
            // ==================== Free ====================
            Action::EndTurn => {}

            Action::UseGodPower { god } => {
                self.current_mut().reset_god(god);
                events.push(GameEvent::GodPowerUsed { player, god });

                match god {
                    CoreColor::Blue => self.phases.queue(Phase::Teleporting),
                    CoreColor::Yellow => {
                        self.phases.queue(Phase::Peeking);
                        self.phases.queue(Phase::Peeking);
                    }
                    CoreColor::Green => self.phases.queue(Phase::Exploring),
                    CoreColor::Red => self.phases.queue(Phase::AdvancingGod),
                    CoreColor::Pink => {
                        let amount = self.config.god_power_favor;
                        self.current_mut().favor += amount;
                        events.push(GameEvent::FavorGained { player, amount });
                    }
                    CoreColor::Black => events.extend(self.draw_oracle_card()),
                }
            }

            // ==================== Any Resource ====================
            Action::GainFavor { .. } => {
                let amount = self.config.favor_per_resource;
                self.current_mut().favor += amount;
                events.push(GameEvent::FavorGained { player, amount });
            }

            Action::GainOracleCard { .. } => events.extend(self.draw_oracle_card()),

            // ==================== Color ====================
            Action::AdvanceGod { god, .. } | Action::FreeAdvanceGod { god } => {
                let level = self.current_mut().advance_god(god, max_level);
                events.push(GameEvent::GodAdvanced { player, god, level });
            }

            // ==================== Hex ====================
            Action::ExploreShrine { coordinates, .. }
            | Action::ExploreRemoteShrine { coordinates } => {
                self.explore_shrine(coordinates, events);
            }

            Action::LoadCube {
                coordinates, cube, ..
            } => {
                let offerings = self
                    .overlays
                    .cube_hex_mut(&coordinates)
                    .unwrap_or_else(|| overlay::missing(coordinates, Terrain::Offerings));
                if let Some(pos) = offerings.cubes.iter().position(|c| *c == cube) {
                    offerings.cubes.remove(pos);
                }
                self.current_mut().load(Cargo::Cube(cube));
                events.push(GameEvent::CubeLoaded {
                    player,
                    location: coordinates,
                    color: cube,
                });
            }

            Action::DeliverCube { spend, coordinates } => {
                let color = spend.effective_color();
                let p = self.current_mut();
                p.unload(Cargo::Cube(color));
                let quest = p.complete_quest(QuestKind::Temple, color);
                events.push(GameEvent::CubeDelivered {
                    player,
                    location: coordinates,
                    color,
                });
                events.extend(quest.map(|quest_index| GameEvent::QuestCompleted {
                    player,
                    quest_index,
                }));
            }

            Action::LoadStatue {
                coordinates,
                statue,
                ..
            } => {
                let city = self
                    .overlays
                    .city_hex_mut(&coordinates)
                    .unwrap_or_else(|| overlay::missing(coordinates, Terrain::City));
                if let Some(pos) = city.statues.iter().position(|c| *c == statue) {
                    city.statues.remove(pos);
                }
                self.current_mut().load(Cargo::Statue(statue));
                events.push(GameEvent::StatueLoaded {
                    player,
                    location: coordinates,
                    color: statue,
                });
            }

            Action::RaiseStatue { spend, coordinates } => {
                let color = spend.effective_color();
                let island = self
                    .overlays
                    .statue_hex_mut(&coordinates)
                    .unwrap_or_else(|| overlay::missing(coordinates, Terrain::Statue));
                if let Some(base) = island.bases.iter_mut().find(|b| **b == StatueBase::Empty) {
                    *base = StatueBase::Raised(player);
                }
                let p = self.current_mut();
                p.unload(Cargo::Statue(color));
                let quest = p.complete_quest(QuestKind::Statue, color);
                events.push(GameEvent::StatueRaised {
                    player,
                    location: coordinates,
                    color,
                });
                events.extend(quest.map(|quest_index| GameEvent::QuestCompleted {
                    player,
                    quest_index,
                }));
            }

            Action::FightMonster { spend, coordinates } => {
                let color = spend.effective_color();
                let island = self
                    .overlays
                    .monster_hex_mut(&coordinates)
                    .unwrap_or_else(|| overlay::missing(coordinates, Terrain::Monsters));
                if let Some(pos) = island.monsters.iter().position(|c| *c == color) {
                    island.monsters.remove(pos);
                }
                let quest = self.current_mut().complete_quest(QuestKind::Monster, color);
                events.push(GameEvent::MonsterDefeated {
                    player,
                    location: coordinates,
                    color,
                });
                events.extend(quest.map(|quest_index| GameEvent::QuestCompleted {
                    player,
                    quest_index,
                }));
            }

            // ==================== Move ====================
            Action::MoveShip {
                destination,
                favor_to_extend_range,
                ..
            } => {
                let p = self.current_mut();
                let from = p.ship;
                p.favor -= favor_to_extend_range;
                p.ship = destination;
                events.push(GameEvent::ShipMoved {
                    player,
                    from,
                    to: destination,
                    favor_paid: favor_to_extend_range,
                });
            }

            // ==================== Special phases ====================
            Action::Teleport { destination } => {
                let p = self.current_mut();
                let from = p.ship;
                p.ship = destination;
                events.push(GameEvent::Teleported {
                    player,
                    from,
                    to: destination,
                });
            }

            Action::PeekShrine { coordinates } => {
                self.current_mut().peeked_shrines.push(coordinates);
                events.push(GameEvent::ShrinePeeked {
                    player,
                    location: coordinates,
                });
            }
        }
    }

    /// Fill the shrine if it is the explorer's own and a quest can take
    /// it, otherwise turn a hidden shrine face up.
    fn explore_shrine(&mut self, coordinates: HexCoord, events: &mut Vec<GameEvent>) {
        let player = self.current_player;
        let color = self.map.cell(&coordinates).and_then(|c| c.color);
        let shrine = self
            .overlays
            .shrine_hex_mut(&coordinates)
            .unwrap_or_else(|| overlay::missing(coordinates, Terrain::Shrine));
        let explorer = &mut self.players[player as usize];

        let quest = match color {
            Some(color) if shrine.owner == player => explorer.eligible_quest(QuestKind::Shrine, color),
            _ => None,
        };

        if let Some(quest_index) = quest {
            shrine.status = ShrineStatus::Filled;
            explorer.quests[quest_index].completed = true;
            events.push(GameEvent::ShrineFilled {
                player,
                location: coordinates,
            });
            events.push(GameEvent::QuestCompleted {
                player,
                quest_index,
            });
            self.phases.queue(Phase::AdvancingGod);
        } else if shrine.status == ShrineStatus::Hidden {
            shrine.status = ShrineStatus::Visible;
            events.push(GameEvent::ShrineRevealed {
                player,
                location: coordinates,
                owner: shrine.owner,
            });
            if shrine.owner != player {
                let amount = self.config.shrine_reveal_favor;
                explorer.favor += amount;
                events.push(GameEvent::FavorGained { player, amount });
            }
        }
    }

    fn draw_oracle_card(&mut self) -> Option<GameEvent> {
        let color = self.oracle_deck.pop()?;
        let player = self.current_player;
        self.current_mut().oracle_cards.push(color);
        Some(GameEvent::OracleCardDrawn { player, color })
    }

    /// End the active phase, skipping follow-ups that offer nothing to do
    fn end_phase(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        loop {
            let from = self.phases.active();
            let to = self.phases.end_active();
            if from != to {
                debug!(?from, ?to, "phase changed");
                events.push(GameEvent::PhaseChanged { from, to });
            }
            if to.is_special() && self.available_actions().is_empty() {
                debug!(phase = ?to, "skipping phase with no legal actions");
                continue;
            }
            return events;
        }
    }

    /// Pass the turn to the next player and roll their dice.
    ///
    /// Unspent dice of the outgoing player are discarded. Freeloading
    /// opportunities from the previous roll expire.
    pub fn end_turn(&mut self) -> Vec<GameEvent> {
        let outgoing = self.current_player;
        {
            let p = self.current_mut();
            p.oracle_dice.clear();
            p.end_turn();
        }

        let next = ((outgoing as usize + 1) % self.player_count()) as PlayerId;
        self.current_player = next;
        if next == 0 {
            self.round += 1;
        }

        let dice = self.roll_dice();
        self.current_mut().oracle_dice = dice.clone();

        let from = self.phases.active();
        self.phases.reset_to_main();
        self.freeloading = self.freeload_opportunities(&dice);

        debug!(
            player = outgoing,
            next_player = next,
            round = self.round,
            freeloading = self.freeloading.len(),
            "turn ended"
        );

        let mut events = vec![GameEvent::TurnEnded {
            player: outgoing,
            next_player: next,
            round: self.round,
        }];
        if from != Phase::Main {
            events.push(GameEvent::PhaseChanged {
                from,
                to: Phase::Main,
            });
        }
        events.push(GameEvent::DiceRolled { player: next, dice });
        events
    }

    fn roll_dice(&mut self) -> Vec<CoreColor> {
        self.rolls += 1;
        let seed = self.rng_seed ^ self.rolls.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut rng = StdRng::seed_from_u64(seed);
        (0..self.config.dice_per_turn)
            .map(|_| CoreColor::ALL[rng.gen_range(0..CoreColor::ALL.len())])
            .collect()
    }

    // ==================== Freeloading ====================

    fn freeload_opportunities(&self, dice: &[CoreColor]) -> Vec<FreeloadOpportunity> {
        let mut colors = dice.to_vec();
        colors.sort();
        colors.dedup();

        let max = self.config.max_god_level;
        self.players
            .iter()
            .filter(|p| p.id != self.current_player)
            .flat_map(|p| {
                colors
                    .iter()
                    .filter(move |c| (1..max).contains(&p.god_level(**c)))
                    .map(move |c| FreeloadOpportunity {
                        player: p.id,
                        color: *c,
                    })
            })
            .collect()
    }

    /// Freeloading opportunities still open for a player
    pub fn freeload_options(&self, player: PlayerId) -> Vec<CoreColor> {
        self.freeloading
            .iter()
            .filter(|o| o.player == player)
            .map(|o| o.color)
            .collect()
    }

    /// Take a freeloading advance offered by the current roll
    pub fn accept_freeload(
        &mut self,
        player: PlayerId,
        color: CoreColor,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.get_player(player).is_none() {
            return Err(GameError::UnknownPlayer);
        }
        let Some(pos) = self
            .freeloading
            .iter()
            .position(|o| o.player == player && o.color == color)
        else {
            warn!(player, god = %color, "rejected freeload");
            return Err(GameError::NoFreeloadOpportunity);
        };
        self.freeloading.remove(pos);

        let max = self.config.max_god_level;
        let level = self.players[player as usize].advance_god(color, max);
        debug!(player, god = %color, level, "freeloaded");
        Ok(vec![GameEvent::Freeloaded {
            player,
            god: color,
            level,
        }])
    }

    // ==================== Persistence ====================

    /// Serialize the whole game
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a game saved with [`to_json`](Self::to_json).
    ///
    /// Runs the same checks as a new game and requires a seated current
    /// player.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let state: Self = serde_json::from_str(json)?;
        Self::validate(&state.map, &state.players, &state.overlays)?;
        if state.get_player(state.current_player).is_none() {
            return Err(SetupError::UnknownCurrentPlayer(state.current_player).into());
        }
        Ok(state)
    }
}
