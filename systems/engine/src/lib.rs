#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round driver that pumps the world and the decision systems.
//!
//! Each round the engine snapshots the turn order, then lets every surviving
//! unit move (via [`Movement`]) and attack (via [`Combat`]). Commands are
//! applied to the world immediately so later units observe earlier actions.
//! Combat ends the moment a unit finds no enemies; that partial round is not
//! counted.

mod sweep;

pub use sweep::{minimum_flawless_elf_power, SweepResult, MIN_SWEEP_POWER};

use beverage_bandits_core::{CombatReport, Command, Event, Rules, Team, UnitId};
use beverage_bandits_system_combat::Combat;
use beverage_bandits_system_movement::Movement;
use beverage_bandits_world::{self as world, query, Layout, LayoutError, World};
use thiserror::Error;
use tracing::debug;

/// Position of the engine within its round state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting to start the next round.
    RoundStart,
    /// Walking the turn queue of the current round.
    UnitTurn,
    /// No further rounds will run.
    CombatEnded,
}

/// Result of asking the engine to play a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Every unit in the queue took its turn.
    Completed {
        /// Number of rounds completed so far, including this one.
        round: u32,
    },
    /// A unit found no enemies, or an elf died under `abort_on_elf_death`.
    CombatEnded,
    /// A full round passed without any unit moving or attacking.
    Stalemate,
}

/// Errors surfaced by the engine and its harnesses.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The map could not be read.
    #[error("invalid map")]
    Layout(#[from] LayoutError),
    /// The remaining units can never reach each other.
    #[error("combat cannot end: no unit moved or attacked after {rounds} completed rounds")]
    Stalemate {
        /// Rounds completed before the idle round.
        rounds: u32,
    },
    /// No elf attack power in the searched range avoids elf casualties.
    #[error("no elf attack power up to {max} wins without losses")]
    NoFlawlessPower {
        /// Highest attack power attempted.
        max: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TurnOutcome {
    Skipped,
    Idle,
    Acted,
    NoEnemies,
    Aborted,
}

/// Deterministic combat simulation over a single board.
#[derive(Debug)]
pub struct Engine {
    world: World,
    movement: Movement,
    combat: Combat,
    completed_rounds: u32,
    phase: Phase,
    aborted: bool,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Engine {
    /// Creates an engine driving the provided world.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            world,
            movement: Movement::new(),
            combat: Combat::new(),
            completed_rounds: 0,
            phase: Phase::RoundStart,
            aborted: false,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Creates an engine for a parsed layout.
    #[must_use]
    pub fn from_layout(layout: &Layout, rules: Rules) -> Self {
        Self::new(World::new(layout, rules))
    }

    /// Parses a textual map and creates an engine for it.
    pub fn parse(text: &str, rules: Rules) -> Result<Self, EngineError> {
        Ok(Self::new(World::parse(text, rules)?))
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Rounds in which every queued unit took its turn.
    #[must_use]
    pub fn completed_rounds(&self) -> u32 {
        self.completed_rounds
    }

    /// Current state of the round state machine.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Plays a single round.
    pub fn step_round(&mut self) -> RoundOutcome {
        if self.phase == Phase::CombatEnded {
            return RoundOutcome::CombatEnded;
        }

        self.phase = Phase::UnitTurn;
        let mut active = false;
        for unit in query::unit_turn_order(&self.world) {
            match self.take_turn(unit) {
                TurnOutcome::NoEnemies | TurnOutcome::Aborted => {
                    self.phase = Phase::CombatEnded;
                    debug!(
                        rounds = self.completed_rounds,
                        aborted = self.aborted,
                        "combat ended"
                    );
                    return RoundOutcome::CombatEnded;
                }
                TurnOutcome::Acted => active = true,
                TurnOutcome::Skipped | TurnOutcome::Idle => {}
            }
        }

        self.phase = Phase::RoundStart;
        if !active {
            return RoundOutcome::Stalemate;
        }

        self.completed_rounds += 1;
        debug!(round = self.completed_rounds, "round completed");
        RoundOutcome::Completed {
            round: self.completed_rounds,
        }
    }

    /// Plays rounds until combat ends and reports the result.
    pub fn run(&mut self) -> Result<CombatReport, EngineError> {
        self.run_with(|_, _| {})
    }

    /// Plays rounds until combat ends, calling `observer` after each completed round.
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<CombatReport, EngineError>
    where
        F: FnMut(&World, u32),
    {
        loop {
            match self.step_round() {
                RoundOutcome::Completed { round } => observer(&self.world, round),
                RoundOutcome::CombatEnded => return Ok(self.report()),
                RoundOutcome::Stalemate => {
                    return Err(EngineError::Stalemate {
                        rounds: self.completed_rounds,
                    })
                }
            }
        }
    }

    /// Summary of the combat as it currently stands.
    #[must_use]
    pub fn report(&self) -> CombatReport {
        let survivors = query::surviving_teams(&self.world);
        let winner = match survivors.as_slice() {
            [team] if !self.aborted => Some(*team),
            _ => None,
        };
        CombatReport::new(
            self.completed_rounds,
            query::remaining_health(&self.world),
            winner,
            query::casualties(&self.world),
        )
    }

    fn take_turn(&mut self, id: UnitId) -> TurnOutcome {
        let Some(unit) = query::unit(&self.world, id) else {
            return TurnOutcome::Skipped;
        };
        let enemies = query::enemies_of(&self.world, id);
        if enemies.is_empty() {
            return TurnOutcome::NoEnemies;
        }

        self.movement.handle(
            &unit,
            &enemies,
            query::occupancy_view(&self.world),
            query::nav_mesh(&self.world),
            &mut self.commands,
        );
        let moved = self.dispatch();

        let Some(unit) = query::unit(&self.world, id) else {
            return TurnOutcome::Skipped;
        };
        self.combat.handle(
            &unit,
            &query::unit_view(&self.world),
            query::occupancy_view(&self.world),
            &mut self.commands,
        );
        let attacked = self.dispatch();

        if self.aborted {
            TurnOutcome::Aborted
        } else if moved || attacked {
            TurnOutcome::Acted
        } else {
            TurnOutcome::Idle
        }
    }

    /// Applies queued commands, returning whether any of them took effect.
    fn dispatch(&mut self) -> bool {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        let abort_on_elf_death = query::rules(&self.world).abort_on_elf_death;
        let mut effective = false;
        for event in self.events.drain(..) {
            match event {
                Event::UnitMoved { .. } | Event::UnitAttacked { .. } => effective = true,
                Event::UnitDied { unit, team, cell } => {
                    debug!(unit = unit.get(), ?team, ?cell, "unit died");
                    if team == Team::Elf && abort_on_elf_death {
                        self.aborted = true;
                    }
                }
                Event::MoveRejected { .. } | Event::AttackRejected { .. } => {}
            }
        }
        effective
    }
}
