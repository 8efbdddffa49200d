#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Beverage Bandits combat engine.
//!
//! This crate defines the message surface that connects the round driver, the
//! authoritative world, and the pure decision systems. The engine submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what actually happened. Systems only ever read immutable views
//! ([`UnitView`], [`OccupancyView`]) and respond with new commands.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Hit points every unit starts combat with unless the rules override it.
pub const DEFAULT_STARTING_HEALTH: Health = Health::new(200);

/// Damage dealt by a single attack unless the rules override it.
pub const DEFAULT_ATTACK_POWER: AttackPower = AttackPower::new(3);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that a unit take a single step onto an adjacent open cell.
    MoveUnit {
        /// Identifier of the unit attempting to move.
        unit: UnitId,
        /// Cell the unit should occupy after the step.
        to: CellCoord,
    },
    /// Requests that a unit strike an adjacent enemy.
    Attack {
        /// Identifier of the unit dealing damage.
        attacker: UnitId,
        /// Identifier of the unit receiving damage.
        target: UnitId,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a unit moved between two cells.
    UnitMoved {
        /// Identifier of the unit that moved.
        unit: UnitId,
        /// Cell the unit occupied before moving.
        from: CellCoord,
        /// Cell the unit occupies after moving.
        to: CellCoord,
    },
    /// Reports that a movement request was refused.
    MoveRejected {
        /// Identifier of the unit that attempted to move.
        unit: UnitId,
        /// Requested destination cell.
        to: CellCoord,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that an attack landed.
    UnitAttacked {
        /// Identifier of the unit that dealt damage.
        attacker: UnitId,
        /// Identifier of the unit that received damage.
        target: UnitId,
        /// Damage applied by the attack.
        damage: AttackPower,
        /// Health the target retains after the attack.
        remaining: Health,
    },
    /// Reports that an attack request was refused.
    AttackRejected {
        /// Identifier of the unit that attempted to attack.
        attacker: UnitId,
        /// Identifier of the requested target.
        target: UnitId,
        /// Specific reason the attack failed.
        reason: AttackError,
    },
    /// Announces that a unit died and vacated its cell.
    UnitDied {
        /// Identifier of the unit that died.
        unit: UnitId,
        /// Team the unit fought for.
        team: Team,
        /// Cell the unit occupied when it died.
        cell: CellCoord,
    },
}

/// Reasons a movement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// No live unit carries the provided identifier.
    UnknownUnit,
    /// The destination is not orthogonally adjacent to the unit.
    NotAdjacent,
    /// The destination is a wall, another unit, or outside the board.
    Blocked,
}

/// Reasons an attack request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackError {
    /// Either the attacker or the target is not a live unit.
    UnknownUnit,
    /// The target is not orthogonally adjacent to the attacker.
    NotAdjacent,
    /// The target fights for the attacker's own team.
    Ally,
}

/// Factions taking part in the combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// Elves, drawn as `E`.
    Elf,
    /// Goblins, drawn as `G`.
    Goblin,
}

impl Team {
    /// Reports whether units of the two teams fight each other.
    #[must_use]
    pub const fn is_enemy(self, other: Team) -> bool {
        !matches!(
            (self, other),
            (Team::Elf, Team::Elf) | (Team::Goblin, Team::Goblin)
        )
    }

    /// Map symbol used for the team's starting positions.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Elf => 'E',
            Self::Goblin => 'G',
        }
    }

    /// Resolves a map symbol into a team, if it denotes one.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'E' => Some(Self::Elf),
            'G' => Some(Self::Goblin),
            _ => None,
        }
    }
}

/// Unique identifier assigned to a unit.
///
/// Identifiers are handed out in reading order of the starting positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Hit points carried by a unit. Never negative: damage saturates at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Health left after absorbing the provided attack, clamped at zero.
    #[must_use]
    pub const fn after_hit(self, power: AttackPower) -> Self {
        Self(self.0.saturating_sub(power.get()))
    }

    /// Reports whether the unit has no hit points left.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// Damage dealt by a single attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttackPower(u32);

impl AttackPower {
    /// Creates a new attack power value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric damage.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Tunable combat parameters applied when the world is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Damage dealt by each elf attack.
    pub elf_attack_power: AttackPower,
    /// Damage dealt by each goblin attack.
    pub goblin_attack_power: AttackPower,
    /// Hit points every unit starts with.
    pub starting_health: Health,
    /// Ends combat as soon as any elf dies.
    pub abort_on_elf_death: bool,
}

impl Rules {
    /// Returns a copy of the rules with the elf attack power replaced.
    #[must_use]
    pub const fn with_elf_attack_power(mut self, power: AttackPower) -> Self {
        self.elf_attack_power = power;
        self
    }

    /// Attack power granted to members of the provided team.
    #[must_use]
    pub const fn attack_power_for(&self, team: Team) -> AttackPower {
        match team {
            Team::Elf => self.elf_attack_power,
            Team::Goblin => self.goblin_attack_power,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            elf_attack_power: DEFAULT_ATTACK_POWER,
            goblin_attack_power: DEFAULT_ATTACK_POWER,
            starting_health: DEFAULT_STARTING_HEALTH,
            abort_on_elf_death: false,
        }
    }
}

/// Location of a single board cell expressed as column and row coordinates.
///
/// Coordinates order by reading order: top-to-bottom, then left-to-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether the two cells share an edge.
    #[must_use]
    pub fn is_adjacent_to(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Orthogonal neighbours inside a `columns` x `rows` board, in reading order.
    #[must_use]
    pub fn cardinal_neighbors(self, columns: u32, rows: u32) -> NeighborIter {
        let mut neighbors = NeighborIter::default();
        if self.column >= columns || self.row >= rows {
            return neighbors;
        }

        if self.row > 0 {
            neighbors.push(CellCoord::new(self.column, self.row - 1));
        }
        if self.column > 0 {
            neighbors.push(CellCoord::new(self.column - 1, self.row));
        }
        if self.column + 1 < columns {
            neighbors.push(CellCoord::new(self.column + 1, self.row));
        }
        if self.row + 1 < rows {
            neighbors.push(CellCoord::new(self.column, self.row + 1));
        }

        neighbors
    }
}

impl Ord for CellCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.row, self.column).cmp(&(other.row, other.column))
    }
}

impl PartialOrd for CellCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fixed-capacity iterator over up to four neighbouring cells.
#[derive(Clone, Debug, Default)]
pub struct NeighborIter {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl NeighborIter {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

/// What currently fills a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// Impassable rock.
    Wall,
    /// Open floor holding the identified live unit.
    Unit(UnitId),
    /// Open floor with nobody standing on it.
    Empty,
}

/// Read-only view into the dense occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Occupant],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided row-major cells.
    #[must_use]
    pub fn new(cells: &'a [Occupant], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns what fills the provided cell, or `None` outside the board.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether the cell is open floor that nobody stands on.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        matches!(self.occupant(cell), Some(Occupant::Empty))
    }

    /// Reports whether the cell is floor, regardless of who stands on it.
    #[must_use]
    pub fn is_floor(&self, cell: CellCoord) -> bool {
        matches!(
            self.occupant(cell),
            Some(Occupant::Empty | Occupant::Unit(_))
        )
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Occupant> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
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
}

/// Immutable representation of a single live unit used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Board cell currently occupied by the unit.
    pub cell: CellCoord,
    /// Team the unit fights for.
    pub team: Team,
    /// Hit points the unit has left.
    pub health: Health,
    /// Damage the unit deals per attack.
    pub attack_power: AttackPower,
}

impl UnitSnapshot {
    /// Reports whether the other unit fights for the opposing team.
    #[must_use]
    pub const fn is_enemy_of(&self, other: &UnitSnapshot) -> bool {
        self.team.is_enemy(other.team)
    }
}

/// Read-only snapshot describing all live units, sorted in reading order.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.cell);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in reading order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of the unit with the provided identifier.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == id)
    }

    /// Number of live units captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no live units were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Number of units each team lost during combat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Casualties {
    /// Elves killed.
    pub elves: u32,
    /// Goblins killed.
    pub goblins: u32,
}

impl Casualties {
    /// Casualties suffered by the provided team.
    #[must_use]
    pub const fn of(&self, team: Team) -> u32 {
        match team {
            Team::Elf => self.elves,
            Team::Goblin => self.goblins,
        }
    }
}

/// Final summary produced once combat ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReport {
    /// Rounds completed before the unit that found no enemies took its turn.
    pub rounds: u32,
    /// Sum of the hit points of every unit still alive.
    pub remaining_health: u32,
    /// Completed rounds multiplied by the remaining health.
    pub outcome: u64,
    /// Team left standing, or `None` when combat was aborted early.
    pub winner: Option<Team>,
    /// Units lost by each team.
    pub casualties: Casualties,
}

impl CombatReport {
    /// Builds a report, deriving the outcome from rounds and remaining health.
    #[must_use]
    pub fn new(
        rounds: u32,
        remaining_health: u32,
        winner: Option<Team>,
        casualties: Casualties,
    ) -> Self {
        Self {
            rounds,
            remaining_health,
            outcome: u64::from(rounds) * u64::from(remaining_health),
            winner,
            casualties,
        }
    }
}
