#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for Beverage Bandits.
//!
//! The world owns the static cave layout, the dense occupancy grid, every unit
//! that took part in the combat, and the navigation mesh derived from the
//! floor. It is mutated exclusively through [`apply`] and inspected through the
//! [`query`] module.

mod layout;
mod navigation;

pub use layout::{Cell, Layout, LayoutError, Spawn};
pub use navigation::{DistanceField, NavMesh};

use beverage_bandits_core::{
    AttackError, AttackPower, CellCoord, Command, Event, Health, MoveError, Occupant, Rules, Team,
    UnitId,
};
use tracing::trace;

/// Represents the authoritative Beverage Bandits board state.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    occupancy: OccupancyGrid,
    units: Vec<Unit>,
    nav_mesh: NavMesh,
}

impl World {
    /// Creates a world from a parsed layout, spawning every declared unit.
    #[must_use]
    pub fn new(layout: &Layout, rules: Rules) -> Self {
        let units: Vec<Unit> = layout
            .spawns()
            .iter()
            .enumerate()
            .map(|(index, spawn)| Unit {
                id: UnitId::new(index as u32),
                cell: spawn.cell,
                team: spawn.team,
                health: rules.starting_health,
                attack_power: rules.attack_power_for(spawn.team),
                alive: true,
            })
            .collect();

        let mut occupancy = OccupancyGrid::from_layout(layout);
        for unit in &units {
            occupancy.occupy(unit.id, unit.cell);
        }

        Self {
            rules,
            occupancy,
            units,
            nav_mesh: NavMesh::from_layout(layout),
        }
    }

    /// Parses a textual map and creates a world from it.
    pub fn parse(text: &str, rules: Rules) -> Result<Self, LayoutError> {
        let layout: Layout = text.parse()?;
        Ok(Self::new(&layout, rules))
    }

    fn live_unit(&self, id: UnitId) -> Option<&Unit> {
        self.units
            .get(usize::try_from(id.get()).ok()?)
            .filter(|unit| unit.alive)
    }

    fn live_unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units
            .get_mut(usize::try_from(id.get()).ok()?)
            .filter(|unit| unit.alive)
    }

    fn move_unit(&mut self, id: UnitId, to: CellCoord) -> Result<CellCoord, MoveError> {
        let from = self.live_unit(id).ok_or(MoveError::UnknownUnit)?.cell;
        if !from.is_adjacent_to(to) {
            return Err(MoveError::NotAdjacent);
        }
        if self.occupancy.occupant(to) != Some(Occupant::Empty) {
            return Err(MoveError::Blocked);
        }

        self.occupancy.vacate(from);
        self.occupancy.occupy(id, to);
        if let Some(unit) = self.live_unit_mut(id) {
            unit.cell = to;
        }
        Ok(from)
    }

    fn attack(&mut self, attacker: UnitId, target: UnitId) -> Result<Strike, AttackError> {
        let striker = self.live_unit(attacker).ok_or(AttackError::UnknownUnit)?;
        let (striker_cell, striker_team, damage) =
            (striker.cell, striker.team, striker.attack_power);
        let victim = self.live_unit(target).ok_or(AttackError::UnknownUnit)?;
        if !striker_team.is_enemy(victim.team) {
            return Err(AttackError::Ally);
        }
        if !striker_cell.is_adjacent_to(victim.cell) {
            return Err(AttackError::NotAdjacent);
        }

        let victim = self
            .live_unit_mut(target)
            .ok_or(AttackError::UnknownUnit)?;
        victim.health = victim.health.after_hit(damage);
        let strike = Strike {
            damage,
            remaining: victim.health,
            team: victim.team,
            cell: victim.cell,
        };
        if strike.remaining.is_depleted() {
            victim.alive = false;
            self.occupancy.vacate(strike.cell);
        }
        Ok(strike)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MoveUnit { unit, to } => match world.move_unit(unit, to) {
            Ok(from) => out_events.push(Event::UnitMoved { unit, from, to }),
            Err(reason) => {
                trace!(unit = unit.get(), ?to, ?reason, "move rejected");
                out_events.push(Event::MoveRejected { unit, to, reason });
            }
        },
        Command::Attack { attacker, target } => match world.attack(attacker, target) {
            Ok(strike) => {
                out_events.push(Event::UnitAttacked {
                    attacker,
                    target,
                    damage: strike.damage,
                    remaining: strike.remaining,
                });
                if strike.remaining.is_depleted() {
                    out_events.push(Event::UnitDied {
                        unit: target,
                        team: strike.team,
                        cell: strike.cell,
                    });
                }
            }
            Err(reason) => {
                trace!(
                    attacker = attacker.get(),
                    target = target.get(),
                    ?reason,
                    "attack rejected"
                );
                out_events.push(Event::AttackRejected {
                    attacker,
                    target,
                    reason,
                });
            }
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{NavMesh, World};
    use beverage_bandits_core::{
        Casualties, CellCoord, Occupant, OccupancyView, Rules, Team, UnitId, UnitSnapshot,
        UnitView,
    };

    /// Dimensions of the board as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.occupancy.dimensions()
    }

    /// Rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// What fills the provided cell, or `None` outside the board.
    #[must_use]
    pub fn occupant(world: &World, cell: CellCoord) -> Option<Occupant> {
        world.occupancy.occupant(cell)
    }

    /// Exposes a read-only view of the dense occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        let (columns, rows) = world.occupancy.dimensions();
        OccupancyView::new(world.occupancy.cells(), columns, rows)
    }

    /// Static navigation mesh over the floor cells.
    #[must_use]
    pub fn nav_mesh(world: &World) -> &NavMesh {
        &world.nav_mesh
    }

    /// Snapshot of the identified unit, if it is still alive.
    #[must_use]
    pub fn unit(world: &World, id: UnitId) -> Option<UnitSnapshot> {
        world.live_unit(id).map(super::Unit::snapshot)
    }

    /// Captures a read-only view of every live unit.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(
            world
                .units
                .iter()
                .filter(|unit| unit.alive)
                .map(super::Unit::snapshot)
                .collect(),
        )
    }

    /// Live units in reading order of their current positions.
    ///
    /// The returned queue is a snapshot; moves made while walking it do not
    /// reorder it.
    #[must_use]
    pub fn unit_turn_order(world: &World) -> Vec<UnitId> {
        let mut live: Vec<(CellCoord, UnitId)> = world
            .units
            .iter()
            .filter(|unit| unit.alive)
            .map(|unit| (unit.cell, unit.id))
            .collect();
        live.sort_unstable();
        live.into_iter().map(|(_, id)| id).collect()
    }

    /// Live units fighting against the identified unit.
    #[must_use]
    pub fn enemies_of(world: &World, id: UnitId) -> Vec<UnitSnapshot> {
        let Some(unit) = world.live_unit(id) else {
            return Vec::new();
        };
        let team = unit.team;
        world
            .units
            .iter()
            .filter(|other| other.alive && team.is_enemy(other.team))
            .map(super::Unit::snapshot)
            .collect()
    }

    /// Sum of the hit points of all live units.
    #[must_use]
    pub fn remaining_health(world: &World) -> u32 {
        world
            .units
            .iter()
            .filter(|unit| unit.alive)
            .map(|unit| unit.health.get())
            .sum()
    }

    /// Number of units each team has lost so far.
    #[must_use]
    pub fn casualties(world: &World) -> Casualties {
        world
            .units
            .iter()
            .filter(|unit| !unit.alive)
            .fold(Casualties::default(), |mut tally, unit| {
                match unit.team {
                    Team::Elf => tally.elves += 1,
                    Team::Goblin => tally.goblins += 1,
                }
                tally
            })
    }

    /// Teams with at least one live unit.
    #[must_use]
    pub fn surviving_teams(world: &World) -> Vec<Team> {
        let mut teams: Vec<Team> = world
            .units
            .iter()
            .filter(|unit| unit.alive)
            .map(|unit| unit.team)
            .collect();
        teams.sort_unstable();
        teams.dedup();
        teams
    }
}

#[derive(Clone, Debug)]
struct Unit {
    id: UnitId,
    cell: CellCoord,
    team: Team,
    health: Health,
    attack_power: AttackPower,
    alive: bool,
}

impl Unit {
    fn snapshot(&self) -> beverage_bandits_core::UnitSnapshot {
        beverage_bandits_core::UnitSnapshot {
            id: self.id,
            cell: self.cell,
            team: self.team,
            health: self.health,
            attack_power: self.attack_power,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Strike {
    damage: AttackPower,
    remaining: Health,
    team: Team,
    cell: CellCoord,
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Occupant>,
}

impl OccupancyGrid {
    fn from_layout(layout: &Layout) -> Self {
        Self {
            columns: layout.columns(),
            rows: layout.rows(),
            cells: layout
                .cells()
                .iter()
                .map(|cell| match cell {
                    Cell::Wall => Occupant::Wall,
                    Cell::Floor => Occupant::Empty,
                })
                .collect(),
        }
    }

    fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    fn occupy(&mut self, unit: UnitId, cell: CellCoord) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            *slot = Occupant::Unit(unit);
        }
    }

    fn vacate(&mut self, cell: CellCoord) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            if matches!(slot, Occupant::Unit(_)) {
                *slot = Occupant::Empty;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn cells(&self) -> &[Occupant] {
        &self.cells
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}
