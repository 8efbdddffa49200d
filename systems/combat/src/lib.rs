#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks melee targets for the acting unit.

use beverage_bandits_core::{Command, Occupant, OccupancyView, UnitSnapshot, UnitView};

/// Melee combat system that queues attack commands.
#[derive(Debug, Default)]
pub struct Combat;

impl Combat {
    /// Creates a new combat system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits `Command::Attack` when an enemy stands next to the unit.
    pub fn handle(
        &self,
        unit: &UnitSnapshot,
        units: &UnitView,
        occupancy: OccupancyView<'_>,
        out: &mut Vec<Command>,
    ) {
        if let Some(target) = self.select_target(unit, units, occupancy) {
            out.push(Command::Attack {
                attacker: unit.id,
                target: target.id,
            });
        }
    }

    /// Adjacent enemy with the fewest hit points, first in reading order on ties.
    #[must_use]
    pub fn select_target(
        &self,
        unit: &UnitSnapshot,
        units: &UnitView,
        occupancy: OccupancyView<'_>,
    ) -> Option<UnitSnapshot> {
        let (columns, rows) = occupancy.dimensions();
        unit.cell
            .cardinal_neighbors(columns, rows)
            .filter_map(|cell| match occupancy.occupant(cell) {
                Some(Occupant::Unit(id)) => units.get(id).copied(),
                _ => None,
            })
            .filter(|candidate| unit.is_enemy_of(candidate))
            .min_by_key(|candidate| (candidate.health, candidate.cell))
    }
}
