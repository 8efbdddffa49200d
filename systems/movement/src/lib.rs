#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that picks a unit's single step per turn.
//!
//! A unit that is not already next to an enemy considers every open square
//! adjacent to any enemy, keeps the ones reachable in the fewest steps, breaks
//! ties by reading order of the square, and then takes the reading-order-first
//! step that lies on a shortest path toward it.

use beverage_bandits_core::{CellCoord, Command, OccupancyView, UnitSnapshot};
use beverage_bandits_world::{DistanceField, NavMesh};

/// Square adjacent to an enemy that a unit decided to walk toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Destination {
    /// Open cell next to an enemy.
    pub cell: CellCoord,
    /// Steps needed to reach the cell under the current occupancy.
    pub distance: u16,
}

/// Pure system that emits movement commands for the acting unit.
#[derive(Debug, Default)]
pub struct Movement {
    from_unit: DistanceField,
    from_destination: DistanceField,
    in_range: Vec<CellCoord>,
}

impl Movement {
    /// Creates a new movement system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::MoveUnit` when the unit should step toward an enemy.
    pub fn handle(
        &mut self,
        unit: &UnitSnapshot,
        enemies: &[UnitSnapshot],
        occupancy: OccupancyView<'_>,
        nav_mesh: &NavMesh,
        out: &mut Vec<Command>,
    ) {
        if let Some(to) = self.next_step(unit, enemies, occupancy, nav_mesh) {
            out.push(Command::MoveUnit { unit: unit.id, to });
        }
    }

    /// Cell the unit should step onto this turn, if any.
    ///
    /// Returns `None` when the unit already stands next to an enemy or cannot
    /// reach any open square in range of one.
    pub fn next_step(
        &mut self,
        unit: &UnitSnapshot,
        enemies: &[UnitSnapshot],
        occupancy: OccupancyView<'_>,
        nav_mesh: &NavMesh,
    ) -> Option<CellCoord> {
        if enemies
            .iter()
            .any(|enemy| enemy.cell.is_adjacent_to(unit.cell))
        {
            return None;
        }

        let destination = self.choose_destination(unit, enemies, occupancy, nav_mesh)?;
        self.first_step(unit.cell, destination.cell, occupancy, nav_mesh)
    }

    /// Nearest reachable open square adjacent to any enemy.
    ///
    /// Distances are measured from the unit's own cell; ties go to the square
    /// first in reading order.
    pub fn choose_destination(
        &mut self,
        unit: &UnitSnapshot,
        enemies: &[UnitSnapshot],
        occupancy: OccupancyView<'_>,
        nav_mesh: &NavMesh,
    ) -> Option<Destination> {
        self.collect_in_range(enemies, occupancy);
        if self.in_range.is_empty() {
            return None;
        }

        nav_mesh.flood(unit.cell, occupancy, &[], &mut self.from_unit);
        self.in_range
            .iter()
            .filter_map(|&cell| {
                self.from_unit
                    .distance(cell)
                    .map(|distance| Destination { cell, distance })
            })
            .min_by_key(|destination| (destination.distance, destination.cell))
    }

    /// First step from `source` along a shortest path to `destination`.
    ///
    /// Among all shortest paths, the one whose first step comes first in
    /// reading order wins. Returns `None` when the destination is unreachable
    /// or already reached.
    pub fn first_step(
        &mut self,
        source: CellCoord,
        destination: CellCoord,
        occupancy: OccupancyView<'_>,
        nav_mesh: &NavMesh,
    ) -> Option<CellCoord> {
        nav_mesh.flood(
            destination,
            occupancy,
            &[source],
            &mut self.from_destination,
        );
        let remaining = self.from_destination.distance(source)?;
        let closer = remaining.checked_sub(1)?;

        nav_mesh
            .neighbors(source)
            .find(|&neighbor| self.from_destination.distance(neighbor) == Some(closer))
    }

    fn collect_in_range(&mut self, enemies: &[UnitSnapshot], occupancy: OccupancyView<'_>) {
        let (columns, rows) = occupancy.dimensions();
        self.in_range.clear();
        for enemy in enemies {
            self.in_range.extend(
                enemy
                    .cell
                    .cardinal_neighbors(columns, rows)
                    .filter(|&cell| occupancy.is_open(cell)),
            );
        }
        self.in_range.sort_unstable();
        self.in_range.dedup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beverage_bandits_core::{Rules, Team, UnitId};
    use beverage_bandits_world::{query, World};

    fn world(text: &str) -> World {
        World::parse(text, Rules::default()).expect("valid map")
    }

    fn first_of(world: &World, team: Team) -> UnitSnapshot {
        query::unit_view(world)
            .iter()
            .copied()
            .find(|unit| unit.team == team)
            .expect("unit of team")
    }

    fn plan(world: &World, unit: &UnitSnapshot) -> Option<CellCoord> {
        let enemies = query::enemies_of(world, unit.id);
        Movement::new().next_step(
            unit,
            &enemies,
            query::occupancy_view(world),
            query::nav_mesh(world),
        )
    }

    #[test]
    fn nearest_square_breaks_ties_by_reading_order() {
        let world = world(
            "\
#######
#E..G.#
#...#.#
#.G.#G#
#######",
        );
        let elf = first_of(&world, Team::Elf);
        let enemies = query::enemies_of(&world, elf.id);
        let mut movement = Movement::new();

        let destination = movement
            .choose_destination(
                &elf,
                &enemies,
                query::occupancy_view(&world),
                query::nav_mesh(&world),
            )
            .expect("reachable square");

        assert_eq!(
            destination,
            Destination {
                cell: CellCoord::new(3, 1),
                distance: 2,
            }
        );
        assert_eq!(plan(&world, &elf), Some(CellCoord::new(2, 1)));
    }

    #[test]
    fn equal_first_steps_prefer_reading_order() {
        let world = world(
            "\
#######
#.E...#
#.....#
#...G.#
#######",
        );
        let elf = first_of(&world, Team::Elf);

        assert_eq!(plan(&world, &elf), Some(CellCoord::new(3, 1)));
    }

    #[test]
    fn diagonal_destination_steps_along_the_upper_row_first() {
        let world = world(
            "\
######
#E...#
#....#
#..G.#
######",
        );
        let elf = first_of(&world, Team::Elf);
        let mut movement = Movement::new();

        let step = movement.first_step(
            elf.cell,
            CellCoord::new(2, 2),
            query::occupancy_view(&world),
            query::nav_mesh(&world),
        );

        assert_eq!(step, Some(CellCoord::new(2, 1)));
    }

    #[test]
    fn adjacent_units_stay_put() {
        let world = world("#####\n#EG.#\n#####");
        let elf = first_of(&world, Team::Elf);

        assert_eq!(plan(&world, &elf), None);
    }

    #[test]
    fn walled_off_units_stay_put() {
        let world = world("#######\n#E.#.G#\n#######");
        let elf = first_of(&world, Team::Elf);

        assert_eq!(plan(&world, &elf), None);
    }

    #[test]
    fn units_block_paths_of_others() {
        let world = world("#######\n#EE..G#\n#######");
        let elf = query::unit(&world, UnitId::new(0)).expect("first elf");

        assert_eq!(plan(&world, &elf), None);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let world = world(
            "\
#########
#G..G..G#
#.......#
#.......#
#G..E..G#
#.......#
#.......#
#G..G..G#
#########",
        );
        let elf = first_of(&world, Team::Elf);
        let enemies = query::enemies_of(&world, elf.id);
        let mut movement = Movement::new();
        let occupancy = query::occupancy_view(&world);
        let nav_mesh = query::nav_mesh(&world);

        let first = movement.next_step(&elf, &enemies, occupancy, nav_mesh);
        let second = movement.next_step(&elf, &enemies, occupancy, nav_mesh);

        assert_eq!(first, second);
        assert_eq!(first, Some(CellCoord::new(4, 3)));
    }

    #[test]
    fn handle_emits_move_command() {
        let world = world("######\n#E..G#\n######");
        let elf = first_of(&world, Team::Elf);
        let enemies = query::enemies_of(&world, elf.id);
        let mut out = Vec::new();

        Movement::new().handle(
            &elf,
            &enemies,
            query::occupancy_view(&world),
            query::nav_mesh(&world),
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::MoveUnit {
                unit: elf.id,
                to: CellCoord::new(2, 1),
            }]
        );
    }
}
