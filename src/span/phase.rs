//! The four fixed stages of a frame.
//!
//! Each phase owns its own span tree; the root span of that tree carries the
//! phase name, so the phase total lands in the history under that name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One stage of the application loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Update,
    FixedUpdate,
    Draw,
    Swap,
}

impl Phase {
    /// All phases in the order a frame usually runs them
    pub const ALL: [Phase; 4] = [Phase::FixedUpdate, Phase::Update, Phase::Draw, Phase::Swap];

    /// Name of the phase root span (also its history key)
    pub fn name(self) -> &'static str {
        match self {
            Phase::Update => "Update",
            Phase::FixedUpdate => "Fixed Update",
            Phase::Draw => "Draw",
            Phase::Swap => "Swap",
        }
    }

    /// Description shown when inspecting the phase root
    pub fn description(self) -> &'static str {
        match self {
            Phase::Update => "Time spent updating game logic",
            Phase::FixedUpdate => "Time spent in fixed-step simulation updates",
            Phase::Draw => "Time spent issuing GL commands and drawing stuff on the screen",
            Phase::Swap => "Time spent waiting for the GPU while commands/waits are executed.",
        }
    }

    fn slot(self) -> usize {
        match self {
            Phase::FixedUpdate => 0,
            Phase::Update => 1,
            Phase::Draw => 2,
            Phase::Swap => 3,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size map with one value per phase
#[derive(Debug, Clone, Default)]
pub struct PhaseMap<T> {
    slots: [T; 4],
}

impl<T> PhaseMap<T> {
    /// Build a map by calling `f` once per phase, in `Phase::ALL` order
    pub fn from_fn(mut f: impl FnMut(Phase) -> T) -> Self {
        Self {
            slots: Phase::ALL.map(&mut f),
        }
    }
}

impl<T> Index<Phase> for PhaseMap<T> {
    type Output = T;

    fn index(&self, phase: Phase) -> &T {
        &self.slots[phase.slot()]
    }
}

impl<T> IndexMut<Phase> for PhaseMap<T> {
    fn index_mut(&mut self, phase: Phase) -> &mut T {
        &mut self.slots[phase.slot()]
    }
}
