//! Legal action generation.
//!
//! One generator per [`ActionCategory`]. Each is a pure function of the game
//! state; the engine calls them again before validating every submission,
//! so nothing here is cached.

use crate::actions::{Action, ActionCategory};
use crate::board::{CoreColor, HexCell, Terrain};
use crate::game::GameState;
use crate::movement;
use crate::overlay::{self, ShrineStatus};
use crate::player::{Cargo, Player, QuestKind};
use crate::resource::Resource;
use tracing::trace;

/// Every legal action in the active phase, without duplicates
pub fn available_actions(state: &GameState) -> Vec<Action> {
    let mut actions = Vec::new();
    for category in state.phases.active().categories() {
        for action in generate(*category, state) {
            push_unique(&mut actions, action);
        }
    }
    trace!(
        phase = ?state.phases.active(),
        player = state.current_player,
        count = actions.len(),
        "generated legal actions"
    );
    actions
}

/// Run the generator for one category
pub fn generate(category: ActionCategory, state: &GameState) -> Vec<Action> {
    match category {
        ActionCategory::Free => free_actions(state),
        ActionCategory::Resource => resource_actions(state),
        ActionCategory::Color => color_actions(state),
        ActionCategory::Hex => hex_actions(state),
        ActionCategory::Move => move_actions(state),
        ActionCategory::Teleport => teleport_actions(state),
        ActionCategory::ForcedAdvance => forced_advance_actions(state),
        ActionCategory::Peek => peek_actions(state),
        ActionCategory::Explore => explore_actions(state),
    }
}

fn push_unique(actions: &mut Vec<Action>, action: Action) {
    if !actions.contains(&action) {
        actions.push(action);
    }
}

// ==================== Free ====================

/// End turn once all dice are used; god powers for maxed gods
pub fn free_actions(state: &GameState) -> Vec<Action> {
    let player = state.current_player();
    let mut actions = Vec::new();

    if player.oracle_dice.is_empty() {
        actions.push(Action::EndTurn);
    }

    for god in &player.gods {
        if god.level < state.config.max_god_level {
            continue;
        }
        // Black's power draws a card
        if god.color == CoreColor::Black && state.oracle_deck.is_empty() {
            continue;
        }
        actions.push(Action::UseGodPower { god: god.color });
    }

    actions
}

// ==================== Any Resource ====================

/// Favor or an oracle card for any die or card; recoloring is pointless here
pub fn resource_actions(state: &GameState) -> Vec<Action> {
    let player = state.current_player();
    let mut actions = Vec::new();

    for spend in player.held_resources() {
        actions.push(Action::GainFavor { spend });
        if !state.oracle_deck.is_empty() {
            actions.push(Action::GainOracleCard { spend });
        }
    }

    actions
}

// ==================== Color ====================

/// Advance the god named by each resource's effective color
pub fn color_actions(state: &GameState) -> Vec<Action> {
    let player = state.current_player();
    let mut actions = Vec::new();

    for spend in player.available_resources() {
        let god = spend.effective_color();
        if player.god_level(god) < state.config.max_god_level {
            push_unique(&mut actions, Action::AdvanceGod { spend, god });
        }
    }

    actions
}

// ==================== Hex ====================

/// Actions on the cells around the ship, dispatched by terrain
pub fn hex_actions(state: &GameState) -> Vec<Action> {
    let player = state.current_player();
    let resources = player.available_resources();
    let mut actions = Vec::new();

    for coord in state.map.neighbors(&player.ship) {
        let Some(cell) = state.map.cell(&coord) else {
            continue;
        };
        for spend in &resources {
            let spend = *spend;
            match cell.terrain {
                Terrain::Shrine => shrine_rule(state, player, cell, spend, &mut actions),
                Terrain::Offerings => offering_rule(state, player, cell, spend, &mut actions),
                Terrain::Temple => temple_rule(player, cell, spend, &mut actions),
                Terrain::City => city_rule(state, player, cell, spend, &mut actions),
                Terrain::Statue => statue_rule(state, player, cell, spend, &mut actions),
                Terrain::Monsters => monster_rule(state, player, cell, spend, &mut actions),
                Terrain::Sea | Terrain::Shallow | Terrain::Land | Terrain::Zeus => {}
            }
        }
    }

    actions
}

fn color_matches(cell: &HexCell, spend: &Resource) -> bool {
    cell.color == Some(spend.effective_color())
}

fn shrine_rule(
    state: &GameState,
    player: &Player,
    cell: &HexCell,
    spend: Resource,
    actions: &mut Vec<Action>,
) {
    let shrine = state
        .overlays
        .shrine_hex(&cell.coord)
        .unwrap_or_else(|| overlay::missing(cell.coord, Terrain::Shrine));

    if shrine.status == ShrineStatus::Filled || !color_matches(cell, &spend) {
        return;
    }

    let can_fill = shrine.owner == player.id
        && player
            .eligible_quest(QuestKind::Shrine, spend.effective_color())
            .is_some();

    if can_fill || shrine.status == ShrineStatus::Hidden {
        push_unique(
            actions,
            Action::ExploreShrine {
                spend,
                coordinates: cell.coord,
            },
        );
    }
}

fn offering_rule(
    state: &GameState,
    player: &Player,
    cell: &HexCell,
    spend: Resource,
    actions: &mut Vec<Action>,
) {
    let offerings = state
        .overlays
        .cube_hex(&cell.coord)
        .unwrap_or_else(|| overlay::missing(cell.coord, Terrain::Offerings));

    if !color_matches(cell, &spend) || !player.has_cargo_space(state.config.cargo_capacity) {
        return;
    }

    for cube in &offerings.cubes {
        if player.is_carrying(Cargo::Cube(*cube))
            || player.eligible_quest(QuestKind::Temple, *cube).is_none()
        {
            continue;
        }
        push_unique(
            actions,
            Action::LoadCube {
                spend,
                coordinates: cell.coord,
                cube: *cube,
            },
        );
    }
}

fn temple_rule(player: &Player, cell: &HexCell, spend: Resource, actions: &mut Vec<Action>) {
    let Some(color) = cell.color else {
        return;
    };
    if spend.effective_color() != color
        || !player.is_carrying(Cargo::Cube(color))
        || player.eligible_quest(QuestKind::Temple, color).is_none()
    {
        return;
    }
    push_unique(
        actions,
        Action::DeliverCube {
            spend,
            coordinates: cell.coord,
        },
    );
}

fn city_rule(
    state: &GameState,
    player: &Player,
    cell: &HexCell,
    spend: Resource,
    actions: &mut Vec<Action>,
) {
    let city = state
        .overlays
        .city_hex(&cell.coord)
        .unwrap_or_else(|| overlay::missing(cell.coord, Terrain::City));

    if !color_matches(cell, &spend) || !player.has_cargo_space(state.config.cargo_capacity) {
        return;
    }

    for statue in &city.statues {
        if player.is_carrying(Cargo::Statue(*statue))
            || player.eligible_quest(QuestKind::Statue, *statue).is_none()
        {
            continue;
        }
        push_unique(
            actions,
            Action::LoadStatue {
                spend,
                coordinates: cell.coord,
                statue: *statue,
            },
        );
    }
}

fn statue_rule(
    state: &GameState,
    player: &Player,
    cell: &HexCell,
    spend: Resource,
    actions: &mut Vec<Action>,
) {
    let bases = state
        .overlays
        .statue_hex(&cell.coord)
        .unwrap_or_else(|| overlay::missing(cell.coord, Terrain::Statue));

    let Some(color) = cell.color else {
        return;
    };
    if spend.effective_color() != color
        || !bases.has_empty_base()
        || !player.is_carrying(Cargo::Statue(color))
        || player.eligible_quest(QuestKind::Statue, color).is_none()
    {
        return;
    }
    push_unique(
        actions,
        Action::RaiseStatue {
            spend,
            coordinates: cell.coord,
        },
    );
}

fn monster_rule(
    state: &GameState,
    player: &Player,
    cell: &HexCell,
    spend: Resource,
    actions: &mut Vec<Action>,
) {
    let monsters = state
        .overlays
        .monster_hex(&cell.coord)
        .unwrap_or_else(|| overlay::missing(cell.coord, Terrain::Monsters));

    let monster = spend.effective_color();
    if !monsters.monsters.contains(&monster)
        || player.eligible_quest(QuestKind::Monster, monster).is_none()
    {
        return;
    }
    push_unique(
        actions,
        Action::FightMonster {
            spend,
            coordinates: cell.coord,
        },
    );
}

// ==================== Move ====================

/// Sail to every reachable sea cell matching a resource's color
pub fn move_actions(state: &GameState) -> Vec<Action> {
    let player = state.current_player();
    let resources = player.available_resources();
    if resources.is_empty() {
        return Vec::new();
    }

    let mut actions = Vec::new();
    let reachable = movement::reachable(
        &state.map,
        player.ship,
        state.config.base_range,
        player.favor,
    );

    for spot in reachable {
        let Some(color) = state.map.cell(&spot.coordinates).and_then(|c| c.color) else {
            continue;
        };
        for spend in &resources {
            if spend.effective_color() != color
                || spot.favor_cost + spend.recolor_cost > player.favor
            {
                continue;
            }
            push_unique(
                &mut actions,
                Action::MoveShip {
                    spend: *spend,
                    destination: spot.coordinates,
                    favor_to_extend_range: spot.favor_cost,
                },
            );
        }
    }

    actions
}

// ==================== Special phases ====================

/// Any sea cell other than the ship's own
pub fn teleport_actions(state: &GameState) -> Vec<Action> {
    let ship = state.current_player().ship;
    state
        .map
        .cells_of_terrain(Terrain::Sea)
        .filter(|c| c.coord != ship)
        .map(|c| Action::Teleport {
            destination: c.coord,
        })
        .collect()
}

/// A free step on any god below the cap
pub fn forced_advance_actions(state: &GameState) -> Vec<Action> {
    state
        .current_player()
        .gods
        .iter()
        .filter(|g| g.level < state.config.max_god_level)
        .map(|g| Action::FreeAdvanceGod { god: g.color })
        .collect()
}

/// Hidden shrines of other players the current player has not looked at
pub fn peek_actions(state: &GameState) -> Vec<Action> {
    let player = state.current_player();
    state
        .overlays
        .shrines()
        .filter(|s| {
            s.status == ShrineStatus::Hidden
                && s.owner != player.id
                && !player.peeked_shrines.contains(&s.coordinates)
        })
        .map(|s| Action::PeekShrine {
            coordinates: s.coordinates,
        })
        .collect()
}

/// Every hidden shrine, wherever it is
pub fn explore_actions(state: &GameState) -> Vec<Action> {
    state
        .overlays
        .shrines()
        .filter(|s| s.status == ShrineStatus::Hidden)
        .map(|s| Action::ExploreRemoteShrine {
            coordinates: s.coordinates,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HexMap;
    use crate::config::RulesConfig;
    use crate::hex::HexCoord;
    use crate::overlay::Overlays;
    use pretty_assertions::assert_eq;

    /// One player with the ship at the center and an empty hand
    fn game_on(map: HexMap) -> GameState {
        let players = vec![Player::new(0, "P1".to_string(), HexCoord::new(0, 0))];
        let mut game =
            GameState::with_config(map, players, Overlays::new(), RulesConfig::default(), 1)
                .unwrap();
        game.start().unwrap();
        game.players[0].oracle_dice.clear();
        game.players[0].oracle_cards.clear();
        game
    }

    #[test]
    fn test_die_and_card_of_same_color_both_move() {
        let target = HexCoord::new(2, 0);
        let mut map = HexMap::new(4);
        map.set_cell(target, Terrain::Sea, Some(CoreColor::Red));
        let mut game = game_on(map);
        game.players[0].favor = 0;
        game.players[0].oracle_dice = vec![CoreColor::Red];
        game.players[0].oracle_cards = vec![CoreColor::Red];

        assert_eq!(
            move_actions(&game),
            vec![
                Action::MoveShip {
                    spend: Resource::die(CoreColor::Red),
                    destination: target,
                    favor_to_extend_range: 0,
                },
                Action::MoveShip {
                    spend: Resource::card(CoreColor::Red),
                    destination: target,
                    favor_to_extend_range: 0,
                },
            ]
        );
    }

    #[test]
    fn test_range_and_recolor_favor_are_paid_together() {
        // Four steps out: one past the free range
        let target = HexCoord::new(4, 0);
        let mut map = HexMap::new(4);
        map.set_cell(target, Terrain::Sea, Some(CoreColor::Red));
        let mut game = game_on(map);
        game.players[0].oracle_dice = vec![CoreColor::Green];
        // Green is one step before Red on the wheel
        let recolored = Resource::die(CoreColor::Green).with_recoloring(1);
        game.players[0].declare_recoloring(recolored);

        game.players[0].favor = 2;
        let actions = move_actions(&game);
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::MoveShip {
                spend,
                destination,
                favor_to_extend_range,
            } => {
                assert_eq!(*destination, target);
                assert_eq!(*favor_to_extend_range, 1);
                assert_eq!(spend.recolor_cost, 1);
                assert_eq!(spend.effective_color(), CoreColor::Red);
            }
            other => panic!("expected a move, got {other:?}"),
        }

        // Each cost alone is affordable, the sum is not
        game.players[0].favor = 1;
        assert_eq!(game.players[0].available_resources(), vec![recolored]);
        assert!(movement::reachable(&game.map, HexCoord::new(0, 0), 3, 1)
            .iter()
            .any(|r| r.coordinates == target));
        assert!(move_actions(&game).is_empty());
    }
}
