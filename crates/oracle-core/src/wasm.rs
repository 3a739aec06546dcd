//! WebAssembly bindings for the oracle engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen.
//! Everything crosses the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::actions::Action;
use crate::board::{CoreColor, HexMap};
use crate::game::GameState;
use crate::overlay::Overlays;
use crate::player::Player;
use crate::resource::Resource;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn parse<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {what}: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game from a generated map, its overlays and the players
    #[wasm_bindgen(constructor)]
    pub fn new(map_json: &str, players_json: &str, overlays_json: &str) -> Result<WasmGame, JsValue> {
        let map: HexMap = parse(map_json, "map")?;
        let players: Vec<Player> = parse(players_json, "players")?;
        let overlays: Overlays = parse(overlays_json, "overlays")?;

        let state = GameState::new(map, players, overlays)
            .map_err(|e| JsValue::from_str(&format!("Invalid setup: {e}")))?;
        Ok(WasmGame { state })
    }

    /// Restore a game saved with `getState`
    #[wasm_bindgen(js_name = fromState)]
    pub fn from_state(state_json: &str) -> Result<WasmGame, JsValue> {
        let state = GameState::from_json(state_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid state: {e}")))?;
        Ok(WasmGame { state })
    }

    /// Leave the welcome screen and roll the first dice
    pub fn start(&mut self) -> Result<String, JsValue> {
        self.state
            .start()
            .map(|events| to_json(&events, "[]"))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        to_json(&self.state, "{}")
    }

    /// Get the current player ID
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> u8 {
        self.state.current_player
    }

    /// Get the active phase as a string
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        to_json(&self.state.phase(), "\"Unknown\"")
    }

    /// Get legal actions for the current player as JSON array
    #[wasm_bindgen(js_name = getAvailableActions)]
    pub fn get_available_actions(&self) -> String {
        to_json(&self.state.available_actions(), "[]")
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: Action = parse(action_json, "action JSON")?;

        match self.state.apply_action(action) {
            Ok(events) => Ok(to_json(&events, "[]")),
            Err(e) => Err(JsValue::from_str(&format!("Action failed: {}", e))),
        }
    }

    /// Declare (or with cost 0, withdraw) a recoloring for a resource
    #[wasm_bindgen(js_name = declareRecoloring)]
    pub fn declare_recoloring(&mut self, resource_json: &str) -> Result<(), JsValue> {
        let resource: Resource = parse(resource_json, "resource")?;
        self.state
            .declare_recoloring(resource)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Freeloading colors still open for a player, as JSON array
    #[wasm_bindgen(js_name = getFreeloadOptions)]
    pub fn get_freeload_options(&self, player: u8) -> String {
        to_json(&self.state.freeload_options(player), "[]")
    }

    /// Take a freeloading advance; `color_json` is a quoted color name
    #[wasm_bindgen(js_name = acceptFreeload)]
    pub fn accept_freeload(&mut self, player: u8, color_json: &str) -> Result<String, JsValue> {
        let color: CoreColor = parse(color_json, "color")?;
        self.state
            .accept_freeload(player, color)
            .map(|events| to_json(&events, "[]"))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the winner, if any
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<u8> {
        self.state.winner()
    }

    /// Get a specific player's state as JSON
    #[wasm_bindgen(js_name = getPlayer)]
    pub fn get_player(&self, player: u8) -> String {
        match self.state.get_player(player) {
            Some(p) => to_json(p, "{}"),
            None => "null".to_string(),
        }
    }
}
