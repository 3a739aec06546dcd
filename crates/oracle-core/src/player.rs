//! Player state and resource management.
//!
//! This module contains:
//! - Player struct with favor, oracle dice and cards, gods, cargo and quests
//! - Quest slots and the exact-color-before-wildcard eligibility rule
//! - Cargo carried on a player's ship
//! - Recoloring declarations attached to the player's resources

use crate::board::{CoreColor, PlayerId};
use crate::hex::HexCoord;
use crate::resource::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};

/// Quest slots per quest kind in a fresh player
pub const QUESTS_PER_KIND: usize = 3;

/// The four quest categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestKind {
    /// Raise a statue on a statue island
    Statue,
    /// Deliver an offering cube to a temple
    Temple,
    /// Defeat a monster
    Monster,
    /// Build a shrine on one of your own shrine islands
    Shrine,
}

impl QuestKind {
    pub const ALL: [QuestKind; 4] = [
        QuestKind::Statue,
        QuestKind::Temple,
        QuestKind::Monster,
        QuestKind::Shrine,
    ];
}

/// One quest slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub kind: QuestKind,
    /// Required color, `None` for a wildcard slot
    pub color: Option<CoreColor>,
    pub completed: bool,
}

impl Quest {
    /// A quest for one specific color
    pub fn new(kind: QuestKind, color: CoreColor) -> Self {
        Self {
            kind,
            color: Some(color),
            completed: false,
        }
    }

    /// A quest any color can satisfy
    pub fn wildcard(kind: QuestKind) -> Self {
        Self {
            kind,
            color: None,
            completed: false,
        }
    }

    fn is_open(&self, kind: QuestKind) -> bool {
        self.kind == kind && !self.completed
    }
}

/// Something loaded on a ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cargo {
    /// Offering cube bound for a temple
    Cube(CoreColor),
    /// Statue bound for a statue island
    Statue(CoreColor),
}

/// Progress on one god's track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct God {
    pub color: CoreColor,
    pub level: u8,
}

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player ID (index in turn order)
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Spendable favor
    pub favor: u32,
    /// Where this player's ship is
    pub ship: HexCoord,
    /// Dice rolled this turn and not yet spent
    pub oracle_dice: Vec<CoreColor>,
    /// Oracle cards in hand
    pub oracle_cards: Vec<CoreColor>,
    /// Whether an oracle card was already spent this turn
    pub used_oracle_card_this_turn: bool,
    /// God tracks in wheel order
    pub gods: [God; 6],
    /// Cubes and statues on the ship
    pub cargo: Vec<Cargo>,
    /// Quest slots
    pub quests: Vec<Quest>,
    /// Declared recolorings, at most one per (kind, base color)
    pub recolorings: Vec<Resource>,
    /// Shrines whose owner this player has secretly looked at
    pub peeked_shrines: Vec<HexCoord>,
}

impl Player {
    /// Create a new player with wildcard quests and empty hands
    pub fn new(id: PlayerId, name: String, ship: HexCoord) -> Self {
        let quests = QuestKind::ALL
            .iter()
            .flat_map(|kind| std::iter::repeat(Quest::wildcard(*kind)).take(QUESTS_PER_KIND))
            .collect();

        Self {
            id,
            name,
            favor: 0,
            ship,
            oracle_dice: Vec::new(),
            oracle_cards: Vec::new(),
            used_oracle_card_this_turn: false,
            gods: CoreColor::ALL.map(|color| God { color, level: 0 }),
            cargo: Vec::new(),
            quests,
            recolorings: Vec::new(),
            peeked_shrines: Vec::new(),
        }
    }

    // ==================== Gods ====================

    /// Current level of a god track
    pub fn god_level(&self, color: CoreColor) -> u8 {
        self.gods[color.index()].level
    }

    /// Move a god one step up, saturating at `max_level`
    pub fn advance_god(&mut self, color: CoreColor, max_level: u8) -> u8 {
        let god = &mut self.gods[color.index()];
        god.level = (god.level + 1).min(max_level);
        god.level
    }

    /// Drop a god back to the bottom of its track
    pub fn reset_god(&mut self, color: CoreColor) {
        self.gods[color.index()].level = 0;
    }

    // ==================== Resources ====================

    /// Whether the player holds at least one die or card of this base color
    pub fn holds(&self, resource: &Resource) -> bool {
        self.pool(resource.kind).contains(&resource.base_color)
    }

    fn pool(&self, kind: ResourceKind) -> &Vec<CoreColor> {
        match kind {
            ResourceKind::Die => &self.oracle_dice,
            ResourceKind::Card => &self.oracle_cards,
        }
    }

    fn pool_mut(&mut self, kind: ResourceKind) -> &mut Vec<CoreColor> {
        match kind {
            ResourceKind::Die => &mut self.oracle_dice,
            ResourceKind::Card => &mut self.oracle_cards,
        }
    }

    /// The resource with whatever recoloring the player declared for it
    pub fn declared(&self, resource: Resource) -> Resource {
        self.recolorings
            .iter()
            .find(|r| **r == resource)
            .copied()
            .unwrap_or(resource.without_recoloring())
    }

    /// Record (or with a cost of 0, withdraw) a recoloring declaration
    pub fn declare_recoloring(&mut self, resource: Resource) {
        self.recolorings.retain(|r| *r != resource);
        if resource.recolor_cost > 0 {
            self.recolorings.push(resource);
        }
    }

    /// One plain resource per distinct (kind, color) the player can spend.
    ///
    /// Dice come first, then cards unless one was already used this turn.
    pub fn held_resources(&self) -> Vec<Resource> {
        let mut resources: Vec<Resource> = Vec::new();
        let dice = self.oracle_dice.iter().map(|c| Resource::die(*c));
        let cards = self
            .oracle_cards
            .iter()
            .filter(|_| !self.used_oracle_card_this_turn)
            .map(|c| Resource::card(*c));

        for resource in dice.chain(cards) {
            if !resources.contains(&resource) {
                resources.push(resource);
            }
        }
        resources
    }

    /// [`held_resources`](Self::held_resources) with declared recolorings
    /// applied. A declaration the player can no longer afford hides that
    /// resource.
    pub fn available_resources(&self) -> Vec<Resource> {
        self.held_resources()
            .into_iter()
            .map(|r| self.declared(r))
            .filter(|r| r.recolor_cost <= self.favor)
            .collect()
    }

    /// Spend one instance of a resource and pay its recoloring.
    ///
    /// Returns false without changing anything when the player does not
    /// hold it or cannot pay.
    pub fn spend(&mut self, resource: &Resource) -> bool {
        if resource.recolor_cost > self.favor {
            return false;
        }
        let pool = self.pool_mut(resource.kind);
        let Some(pos) = pool.iter().position(|c| *c == resource.base_color) else {
            return false;
        };
        pool.remove(pos);

        self.favor -= resource.recolor_cost;
        self.recolorings.retain(|r| r != resource);
        if resource.is_card() {
            self.used_oracle_card_this_turn = true;
        }
        true
    }

    /// Called at end of turn: forget per-turn card use and declarations
    pub fn end_turn(&mut self) {
        self.used_oracle_card_this_turn = false;
        self.recolorings.clear();
    }

    // ==================== Quests ====================

    /// Index of the quest slot a `color` completion of `kind` would fill.
    ///
    /// An open quest of exactly that color wins. An open wildcard is used
    /// only when no open exact-color quest exists.
    pub fn eligible_quest(&self, kind: QuestKind, color: CoreColor) -> Option<usize> {
        self.quests
            .iter()
            .position(|q| q.is_open(kind) && q.color == Some(color))
            .or_else(|| {
                self.quests
                    .iter()
                    .position(|q| q.is_open(kind) && q.color.is_none())
            })
    }

    /// Mark the eligible quest completed, returning its slot index
    pub fn complete_quest(&mut self, kind: QuestKind, color: CoreColor) -> Option<usize> {
        let index = self.eligible_quest(kind, color)?;
        self.quests[index].completed = true;
        Some(index)
    }

    /// Whether every quest slot is done
    pub fn all_quests_completed(&self) -> bool {
        self.quests.iter().all(|q| q.completed)
    }

    // ==================== Cargo ====================

    pub fn has_cargo_space(&self, capacity: usize) -> bool {
        self.cargo.len() < capacity
    }

    pub fn is_carrying(&self, item: Cargo) -> bool {
        self.cargo.contains(&item)
    }

    pub fn load(&mut self, item: Cargo) {
        self.cargo.push(item);
    }

    /// Take one matching item off the ship
    pub fn unload(&mut self, item: Cargo) -> bool {
        if let Some(pos) = self.cargo.iter().position(|c| *c == item) {
            self.cargo.remove(pos);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(0, "Test".to_string(), HexCoord::new(0, 0))
    }

    #[test]
    fn test_new_player_has_wildcard_quests() {
        let p = player();
        assert_eq!(p.quests.len(), QuestKind::ALL.len() * QUESTS_PER_KIND);
        assert!(p.quests.iter().all(|q| q.color.is_none() && !q.completed));
        assert!(p.gods.iter().all(|g| g.level == 0));
    }

    #[test]
    fn test_exact_quest_preferred_over_wildcard() {
        let mut p = player();
        p.quests = vec![
            Quest::wildcard(QuestKind::Monster),
            Quest::new(QuestKind::Monster, CoreColor::Red),
        ];

        assert_eq!(p.eligible_quest(QuestKind::Monster, CoreColor::Red), Some(1));
        assert_eq!(p.eligible_quest(QuestKind::Monster, CoreColor::Blue), Some(0));
        assert_eq!(p.eligible_quest(QuestKind::Temple, CoreColor::Red), None);

        assert_eq!(p.complete_quest(QuestKind::Monster, CoreColor::Red), Some(1));
        // Exact slot used up, wildcard is the fallback now
        assert_eq!(p.eligible_quest(QuestKind::Monster, CoreColor::Red), Some(0));
        p.complete_quest(QuestKind::Monster, CoreColor::Red);
        assert_eq!(p.eligible_quest(QuestKind::Monster, CoreColor::Red), None);
        assert!(p.all_quests_completed());
    }

    #[test]
    fn test_available_resources_are_distinct() {
        let mut p = player();
        p.oracle_dice = vec![CoreColor::Red, CoreColor::Red, CoreColor::Blue];
        p.oracle_cards = vec![CoreColor::Red];

        let available = p.available_resources();
        assert_eq!(
            available,
            vec![
                Resource::die(CoreColor::Red),
                Resource::die(CoreColor::Blue),
                Resource::card(CoreColor::Red),
            ]
        );

        p.used_oracle_card_this_turn = true;
        assert_eq!(p.available_resources().len(), 2);
    }

    #[test]
    fn test_declared_recoloring_is_applied_and_filtered() {
        let mut p = player();
        p.oracle_dice = vec![CoreColor::Red];
        p.favor = 2;
        p.declare_recoloring(Resource::die(CoreColor::Red).with_recoloring(2));

        let available = p.available_resources();
        assert_eq!(available[0].recolor_cost, 2);
        assert_eq!(available[0].effective_color(), CoreColor::Blue);

        p.favor = 1;
        assert!(p.available_resources().is_empty());

        p.declare_recoloring(Resource::die(CoreColor::Red));
        assert!(p.recolorings.is_empty());
        assert_eq!(p.available_resources().len(), 1);
    }

    #[test]
    fn test_spend_card_marks_turn_and_charges_favor() {
        let mut p = player();
        p.favor = 3;
        p.oracle_cards = vec![CoreColor::Black, CoreColor::Black];
        let card = Resource::card(CoreColor::Black).with_recoloring(2);
        p.declare_recoloring(card);

        assert!(p.spend(&card));
        assert_eq!(p.oracle_cards, vec![CoreColor::Black]);
        assert_eq!(p.favor, 1);
        assert!(p.used_oracle_card_this_turn);
        assert!(p.recolorings.is_empty());

        assert!(!p.spend(&Resource::die(CoreColor::Black)));
    }

    #[test]
    fn test_end_turn_clears_turn_state() {
        let mut p = player();
        p.favor = 1;
        p.used_oracle_card_this_turn = true;
        p.declare_recoloring(Resource::die(CoreColor::Red).with_recoloring(1));

        p.end_turn();
        assert!(!p.used_oracle_card_this_turn);
        assert!(p.recolorings.is_empty());
    }

    #[test]
    fn test_cargo() {
        let mut p = player();
        assert!(p.has_cargo_space(2));
        p.load(Cargo::Cube(CoreColor::Red));
        p.load(Cargo::Statue(CoreColor::Red));
        assert!(!p.has_cargo_space(2));
        assert!(p.is_carrying(Cargo::Cube(CoreColor::Red)));

        assert!(p.unload(Cargo::Cube(CoreColor::Red)));
        assert!(!p.unload(Cargo::Cube(CoreColor::Red)));
        assert_eq!(p.cargo, vec![Cargo::Statue(CoreColor::Red)]);
    }

    #[test]
    fn test_god_levels_saturate() {
        let mut p = player();
        for _ in 0..10 {
            p.advance_god(CoreColor::Yellow, 5);
        }
        assert_eq!(p.god_level(CoreColor::Yellow), 5);
        p.reset_god(CoreColor::Yellow);
        assert_eq!(p.god_level(CoreColor::Yellow), 0);
    }
}
