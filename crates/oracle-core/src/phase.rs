//! Turn phases.
//!
//! Exactly one phase is active. Actions that grant a follow-up privilege
//! queue a phase instead of switching to it; ending the active phase pulls
//! the next queued phase, or falls back to `Main`.

use crate::actions::ActionCategory;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A sub-turn mode selecting which action categories are legal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Before the first turn; nothing is legal
    Welcome,
    /// Regular turn
    Main,
    /// Place the ship on any sea cell
    Teleporting,
    /// Advance one god for free
    AdvancingGod,
    /// Look at one hidden shrine
    Peeking,
    /// Explore one hidden shrine anywhere
    Exploring,
}

impl Phase {
    /// The generator categories active in this phase
    pub fn categories(self) -> &'static [ActionCategory] {
        match self {
            Phase::Welcome => &[],
            Phase::Main => &[
                ActionCategory::Free,
                ActionCategory::Resource,
                ActionCategory::Color,
                ActionCategory::Hex,
                ActionCategory::Move,
            ],
            Phase::Teleporting => &[ActionCategory::Teleport],
            Phase::AdvancingGod => &[ActionCategory::ForcedAdvance],
            Phase::Peeking => &[ActionCategory::Peek],
            Phase::Exploring => &[ActionCategory::Explore],
        }
    }

    /// Whether this is one of the queued follow-up phases
    pub fn is_special(self) -> bool {
        !matches!(self, Phase::Welcome | Phase::Main)
    }
}

/// The active phase plus the FIFO of phases waiting to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStack {
    active: Phase,
    queue: VecDeque<Phase>,
}

impl PhaseStack {
    /// Start in `Welcome` with nothing queued
    pub fn new() -> Self {
        Self {
            active: Phase::Welcome,
            queue: VecDeque::new(),
        }
    }

    pub fn active(&self) -> Phase {
        self.active
    }

    /// Phases waiting to run, front first
    pub fn queued(&self) -> impl Iterator<Item = &Phase> {
        self.queue.iter()
    }

    /// Run `phase` after everything already queued
    pub fn queue(&mut self, phase: Phase) {
        self.queue.push_back(phase);
    }

    /// Finish the active phase and return the one that replaced it
    pub fn end_active(&mut self) -> Phase {
        self.active = self.queue.pop_front().unwrap_or(Phase::Main);
        self.active
    }

    /// Drop anything queued and go straight to `Main`
    pub fn reset_to_main(&mut self) {
        self.queue.clear();
        self.active = Phase::Main;
    }
}

impl Default for PhaseStack {
    fn default() -> Self {
        Self::new()
    }
}
