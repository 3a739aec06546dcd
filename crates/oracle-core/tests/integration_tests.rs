//! Integration tests for the oracle game engine.
//!
//! These tests drive complete games through the public API only.

use oracle_core::*;
use pretty_assertions::assert_eq;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A radius-4 map: colored sea everywhere, one island of each kind, and
/// a shrine per player
fn sample_setup(player_count: usize) -> (HexMap, Vec<Player>, Overlays) {
    let mut map = HexMap::new(4);
    let coords: Vec<HexCoord> = map.cells().map(|c| c.coord).collect();
    for coord in coords {
        let color = CoreColor::ALL[(coord.q - coord.r).rem_euclid(6) as usize];
        map.set_cell(coord, Terrain::Sea, Some(color));
    }
    map.set_cell(HexCoord::new(0, 0), Terrain::Zeus, None);

    let mut overlays = Overlays::new();

    let offerings = HexCoord::new(2, 0);
    map.set_cell(offerings, Terrain::Offerings, Some(CoreColor::Red));
    overlays.insert(OverlayRecord::Cubes(CubeHex {
        coordinates: offerings,
        cubes: vec![CoreColor::Blue, CoreColor::Green, CoreColor::Pink],
    }));

    map.set_cell(HexCoord::new(-2, 0), Terrain::Temple, Some(CoreColor::Blue));
    map.set_cell(HexCoord::new(0, -2), Terrain::Temple, Some(CoreColor::Green));

    let monsters = HexCoord::new(0, 2);
    map.set_cell(monsters, Terrain::Monsters, None);
    overlays.insert(OverlayRecord::Monsters(MonsterHex {
        coordinates: monsters,
        monsters: vec![CoreColor::Yellow, CoreColor::Black],
    }));

    let city = HexCoord::new(2, -2);
    map.set_cell(city, Terrain::City, Some(CoreColor::Black));
    overlays.insert(OverlayRecord::City(CityHex {
        coordinates: city,
        statues: vec![CoreColor::Yellow, CoreColor::Red],
    }));

    let statue = HexCoord::new(-2, 2);
    map.set_cell(statue, Terrain::Statue, Some(CoreColor::Yellow));
    overlays.insert(OverlayRecord::Statue(StatueHex::new(statue, 3)));

    let shrine_spots = [
        HexCoord::new(3, 0),
        HexCoord::new(-3, 0),
        HexCoord::new(0, 3),
        HexCoord::new(0, -3),
    ];
    for (owner, spot) in shrine_spots.iter().take(player_count).enumerate() {
        map.set_cell(*spot, Terrain::Shrine, Some(CoreColor::ALL[owner]));
        overlays.insert(OverlayRecord::Shrine(ShrineHex::hidden(*spot, owner as PlayerId)));
    }

    let start = HexCoord::new(1, 0);
    let players = (0..player_count)
        .map(|i| Player::new(i as PlayerId, format!("Player {}", i + 1), start))
        .collect();

    (map, players, overlays)
}

fn sample_game(player_count: usize, seed: u64) -> GameState {
    let (map, players, overlays) = sample_setup(player_count);
    let mut game =
        GameState::with_config(map, players, overlays, RulesConfig::default(), seed).unwrap();
    game.start().unwrap();
    game
}

fn assert_invariants(game: &GameState) {
    let max = game.config.max_god_level;
    for player in &game.players {
        assert!(player.gods.iter().all(|g| g.level <= max));
        assert!(player.cargo.len() <= game.config.cargo_capacity);
        assert!(game.map.is_sea(&player.ship), "ship on land at {}", player.ship);
    }

    let actions = game.available_actions();
    assert!(!actions.is_empty(), "no legal action in {:?}", game.phase());
    for (i, action) in actions.iter().enumerate() {
        assert!(
            !actions[i + 1..].contains(action),
            "duplicate action {action:?}"
        );
        assert!(game.phase().categories().contains(&action.category()));
    }
}

#[test]
fn test_setup_and_start() {
    init_tracing();
    let (map, players, overlays) = sample_setup(3);
    let mut game = GameState::new(map, players, overlays).unwrap();

    assert_eq!(game.phase(), Phase::Welcome);
    assert!(game.available_actions().is_empty());

    game.start().unwrap();
    assert_eq!(game.phase(), Phase::Main);
    assert_eq!(game.current_player, 0);
    assert_eq!(game.current_player().oracle_dice.len(), 3);
    assert_invariants(&game);
}

#[test]
fn test_missing_overlay_is_rejected_at_setup() {
    let (mut map, players, overlays) = sample_setup(2);
    map.set_cell(HexCoord::new(-1, -1), Terrain::City, Some(CoreColor::Pink));

    let result = GameState::new(map, players, overlays);
    assert_eq!(
        result.unwrap_err(),
        SetupError::OverlayCountMismatch {
            terrain: Terrain::City,
            cells: 2,
            records: 1
        }
    );
}

#[test]
fn test_rules_config_from_json() {
    let config = RulesConfig::from_json(r#"{"dice_per_turn": 4, "base_range": 2}"#).unwrap();
    let (map, players, overlays) = sample_setup(2);
    let mut game = GameState::with_config(map, players, overlays, config, 3).unwrap();
    game.start().unwrap();

    assert_eq!(game.current_player().oracle_dice.len(), 4);
    assert_eq!(game.config.max_god_level, 5);
}

#[test]
fn test_simulated_games_keep_invariants() {
    init_tracing();

    for seed in 0..4 {
        let mut game = sample_game(2 + (seed as usize % 3), seed);

        for step in 0..400 {
            assert_invariants(&game);

            let actions = game.available_actions();
            let action = actions[(step * 7 + seed as usize) % actions.len()].clone();
            let ending_turn = action == Action::EndTurn;
            let round = game.round;

            game.apply_action(action.clone())
                .unwrap_or_else(|e| panic!("generated {action:?} was rejected: {e}"));

            if ending_turn {
                assert_eq!(game.phase(), Phase::Main);
                assert_eq!(game.current_player().oracle_dice.len(), 3);
                let expected_round = if game.current_player == 0 { round + 1 } else { round };
                assert_eq!(game.round, expected_round);
            }
        }
    }
}

#[test]
fn test_json_round_trip_mid_game() {
    let mut game = sample_game(3, 11);
    for step in 0..25 {
        let actions = game.available_actions();
        let action = actions[step % actions.len()].clone();
        game.apply_action(action).unwrap();
    }

    let json = game.to_json().unwrap();
    let restored = GameState::from_json(&json).unwrap();

    assert_eq!(restored.available_actions(), game.available_actions());
    assert_eq!(restored.phase(), game.phase());
    assert_eq!(restored, game);

    // The restored game keeps rolling the same dice
    let mut a = game;
    let mut b = restored;
    a.end_turn();
    b.end_turn();
    assert_eq!(a.current_player().oracle_dice, b.current_player().oracle_dice);
}

#[test]
fn test_save_with_unseated_current_player_is_refused() {
    let game = sample_game(2, 11);
    let mut save: serde_json::Value = serde_json::from_str(&game.to_json().unwrap()).unwrap();
    save["current_player"] = 3.into();

    let err = GameState::from_json(&save.to_string()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Setup(SetupError::UnknownCurrentPlayer(3))
    ));
    assert_eq!(err.to_string(), "Inconsistent save: Current player 3 is not seated");
}

#[test]
fn test_full_offering_delivery() {
    init_tracing();
    let mut game = sample_game(2, 5);
    let offerings = HexCoord::new(2, 0);
    let temple = HexCoord::new(-2, 0);

    // Ship starts next to the red offerings island
    game.players[0].oracle_dice = vec![CoreColor::Red, CoreColor::Blue, CoreColor::Blue];

    game.apply_action(Action::LoadCube {
        spend: Resource::die(CoreColor::Red),
        coordinates: offerings,
        cube: CoreColor::Blue,
    })
    .unwrap();
    assert_eq!(game.players[0].cargo, vec![Cargo::Cube(CoreColor::Blue)]);

    // The only blue sea cell beside the temple is four steps away
    game.players[0].favor = 1;
    let sail = Action::MoveShip {
        spend: Resource::die(CoreColor::Blue),
        destination: HexCoord::new(-3, 1),
        favor_to_extend_range: 1,
    };
    assert!(game.is_available(&sail));
    game.apply_action(sail).unwrap();
    assert_eq!(game.players[0].favor, 0);

    let deliver = Action::DeliverCube {
        spend: Resource::die(CoreColor::Blue),
        coordinates: temple,
    };
    assert!(game.is_available(&deliver));
    let events = game.apply_action(deliver).unwrap();

    assert!(game.players[0].cargo.is_empty());
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::QuestCompleted { player: 0, .. })));
    assert!(game.players[0]
        .quests
        .iter()
        .any(|q| q.kind == QuestKind::Temple && q.completed));
}

#[test]
fn test_card_cannot_be_used_twice_in_a_turn() {
    let mut game = sample_game(2, 9);
    game.players[0].oracle_cards = vec![CoreColor::Pink, CoreColor::Pink];

    game.apply_action(Action::GainFavor {
        spend: Resource::card(CoreColor::Pink),
    })
    .unwrap();
    assert!(game.players[0].used_oracle_card_this_turn);
    assert_eq!(game.players[0].oracle_cards.len(), 1);

    let again = Action::AdvanceGod {
        spend: Resource::card(CoreColor::Pink),
        god: CoreColor::Pink,
    };
    assert_eq!(game.apply_action(again), Err(GameError::ActionNotAvailable));
}

#[test]
fn test_green_power_explores_remote_shrine() {
    let mut game = sample_game(2, 2);
    game.players[0].gods[CoreColor::Green.index()].level = 5;

    game.apply_action(Action::UseGodPower {
        god: CoreColor::Green,
    })
    .unwrap();
    assert_eq!(game.phase(), Phase::Exploring);
    assert_eq!(game.available_actions().len(), 2);

    // Player 1's shrine: revealing it pays favor
    let far = HexCoord::new(-3, 0);
    let favor = game.players[0].favor;
    game.apply_action(Action::ExploreRemoteShrine { coordinates: far })
        .unwrap();
    assert_eq!(game.players[0].favor, favor + 1);
    assert_eq!(
        game.overlays.shrine_hex(&far).map(|s| s.status),
        Some(ShrineStatus::Visible)
    );
    assert_eq!(game.phase(), Phase::Main);
}

#[test]
fn test_remote_fill_of_own_shrine_chains_into_advance() {
    let mut game = sample_game(2, 2);
    game.players[0].gods[CoreColor::Green.index()].level = 5;

    game.apply_action(Action::UseGodPower {
        god: CoreColor::Green,
    })
    .unwrap();
    game.apply_action(Action::ExploreRemoteShrine {
        coordinates: HexCoord::new(3, 0),
    })
    .unwrap();

    assert_eq!(
        game.overlays.shrine_hex(&HexCoord::new(3, 0)).map(|s| s.status),
        Some(ShrineStatus::Filled)
    );
    assert_eq!(game.phase(), Phase::AdvancingGod);
    game.apply_action(Action::FreeAdvanceGod {
        god: CoreColor::Green,
    })
    .unwrap();
    assert_eq!(game.players[0].god_level(CoreColor::Green), 1);
    assert_eq!(game.phase(), Phase::Main);
}

#[test]
fn test_winner_after_last_quest() {
    let mut game = sample_game(2, 4);
    let last = game.players[0].quests.len() - 4;
    for (i, quest) in game.players[0].quests.iter_mut().enumerate() {
        quest.completed = i != last;
    }
    assert_eq!(game.players[0].quests[last].kind, QuestKind::Monster);
    assert_eq!(game.winner(), None);

    game.players[0].ship = HexCoord::new(1, 1);
    game.players[0].oracle_dice = vec![CoreColor::Yellow];
    game.apply_action(Action::FightMonster {
        spend: Resource::die(CoreColor::Yellow),
        coordinates: HexCoord::new(0, 2),
    })
    .unwrap();

    assert_eq!(game.winner(), Some(0));
}
