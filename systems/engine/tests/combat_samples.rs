use beverage_bandits_core::{AttackPower, CellCoord, Occupant, Rules, Team};
use beverage_bandits_engine::{minimum_flawless_elf_power, Engine, RoundOutcome};
use beverage_bandits_world::{query, Layout, World};

const OPENING: &str = "\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######";

const ELVES_HOLD: &str = "\
#######
#G..#E#
#E#E.E#
#G.##.#
#...#E#
#...E.#
#######";

const ELVES_SPREAD: &str = "\
#######
#E..EG#
#.#G.E#
#E.##E#
#G..#.#
#..E#.#
#######";

const GOBLINS_CORNER: &str = "\
#######
#E.G#.#
#.#G..#
#G.#.G#
#G..#.#
#...E.#
#######";

const GOBLINS_TUNNEL: &str = "\
#######
#.E...#
#.#..G#
#.###.#
#E#G#G#
#...#G#
#######";

const LONE_ELF: &str = "\
#########
#G......#
#.E.#...#
#..##..G#
#...##..#
#...#...#
#.G...G.#
#.....G.#
#########";

fn engine(text: &str) -> Engine {
    Engine::parse(text, Rules::default()).expect("valid map")
}

fn board(world: &World) -> String {
    let (columns, rows) = query::dimensions(world);
    let units = query::unit_view(world);
    let occupancy = query::occupancy_view(world);
    let mut lines = Vec::with_capacity(rows as usize);
    for row in 0..rows {
        let line: String = (0..columns)
            .map(|column| match occupancy.occupant(CellCoord::new(column, row)) {
                Some(Occupant::Wall) | None => '#',
                Some(Occupant::Empty) => '.',
                Some(Occupant::Unit(id)) => units.get(id).map_or('?', |unit| unit.team.symbol()),
            })
            .collect();
        lines.push(line);
    }
    lines.join("\n")
}

fn health_in_reading_order(world: &World) -> Vec<u32> {
    query::unit_view(world)
        .iter()
        .map(|unit| unit.health.get())
        .collect()
}

#[test]
fn opening_sample_ends_after_47_rounds() {
    let report = engine(OPENING).run().expect("combat ends");

    assert_eq!(report.rounds, 47);
    assert_eq!(report.remaining_health, 590);
    assert_eq!(report.outcome, 27730);
    assert_eq!(report.winner, Some(Team::Goblin));
    assert_eq!(report.casualties.elves, 2);
    assert_eq!(report.casualties.goblins, 0);
}

#[test]
fn opening_sample_matches_narrated_rounds() {
    let mut engine = engine(OPENING);

    assert_eq!(engine.step_round(), RoundOutcome::Completed { round: 1 });
    assert_eq!(
        board(engine.world()),
        "\
#######
#..G..#
#...EG#
#.#G#G#
#...#E#
#.....#
#######"
    );
    assert_eq!(
        health_in_reading_order(engine.world()),
        vec![200, 197, 197, 200, 197, 197]
    );

    assert_eq!(engine.step_round(), RoundOutcome::Completed { round: 2 });
    assert_eq!(
        board(engine.world()),
        "\
#######
#...G.#
#..GEG#
#.#.#G#
#...#E#
#.....#
#######"
    );
    assert_eq!(
        health_in_reading_order(engine.world()),
        vec![200, 200, 188, 194, 194, 194]
    );

    let _ = engine.run().expect("combat ends");
    assert_eq!(
        board(engine.world()),
        "\
#######
#G....#
#.G...#
#.#.#G#
#...#.#
#....G#
#######"
    );
    assert_eq!(
        health_in_reading_order(engine.world()),
        vec![200, 131, 59, 200]
    );
}

#[test]
fn summarized_samples_produce_known_outcomes() {
    let cases = [
        (ELVES_HOLD, 37, 982, 36334, Team::Elf),
        (ELVES_SPREAD, 46, 859, 39514, Team::Elf),
        (GOBLINS_CORNER, 35, 793, 27755, Team::Goblin),
        (GOBLINS_TUNNEL, 54, 536, 28944, Team::Goblin),
        (LONE_ELF, 20, 937, 18740, Team::Goblin),
    ];

    for (map, rounds, health, outcome, winner) in cases {
        let report = engine(map).run().expect("combat ends");
        assert_eq!(report.rounds, rounds, "rounds for\n{map}");
        assert_eq!(report.remaining_health, health, "health for\n{map}");
        assert_eq!(report.outcome, outcome, "outcome for\n{map}");
        assert_eq!(report.winner, Some(winner), "winner for\n{map}");
    }
}

#[test]
fn units_converge_in_the_movement_sample() {
    let mut engine = engine(
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

    for _ in 0..3 {
        let _ = engine.step_round();
    }

    assert_eq!(
        board(engine.world()),
        "\
#########
#.......#
#..GGG..#
#..GEG..#
#G..G...#
#......G#
#.......#
#.......#
#########"
    );
}

#[test]
fn movement_sample_after_one_round() {
    let mut engine = engine(
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

    assert_eq!(engine.step_round(), RoundOutcome::Completed { round: 1 });
    assert_eq!(
        board(engine.world()),
        "\
#########
#.G...G.#
#...G...#
#...E..G#
#.G.....#
#.......#
#G..G..G#
#.......#
#########"
    );
}

#[test]
fn sweep_finds_minimum_flawless_power() {
    let cases = [
        (OPENING, 15, 29, 172, 4988),
        (ELVES_SPREAD, 4, 33, 948, 31284),
        (GOBLINS_CORNER, 15, 37, 94, 3478),
        (GOBLINS_TUNNEL, 12, 39, 166, 6474),
        (LONE_ELF, 34, 30, 38, 1140),
    ];

    for (map, power, rounds, health, outcome) in cases {
        let layout: Layout = map.parse().expect("valid map");
        let result = minimum_flawless_elf_power(&layout, Rules::default()).expect("flawless win");

        assert_eq!(result.elf_attack_power, AttackPower::new(power), "power for\n{map}");
        assert_eq!(result.report.rounds, rounds, "rounds for\n{map}");
        assert_eq!(result.report.remaining_health, health, "health for\n{map}");
        assert_eq!(result.report.outcome, outcome, "outcome for\n{map}");
        assert_eq!(result.report.casualties.elves, 0);
        assert_eq!(result.report.winner, Some(Team::Elf));
    }
}
