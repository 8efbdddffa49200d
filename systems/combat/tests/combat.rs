use beverage_bandits_core::{CellCoord, Command, Event, Health, Rules, UnitId};
use beverage_bandits_system_combat::Combat;
use beverage_bandits_world::{self as world, query, World};

fn strike(world: &mut World, attacker: UnitId) -> Vec<Event> {
    let unit = query::unit(world, attacker).expect("attacker alive");
    let mut commands = Vec::new();
    Combat::new().handle(
        &unit,
        &query::unit_view(world),
        query::occupancy_view(world),
        &mut commands,
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn equal_health_targets_resolve_in_reading_order() {
    let mut world = World::parse("#####\n#GEG#\n#####", Rules::default()).expect("valid map");
    let elf = UnitId::new(1);

    let events = strike(&mut world, elf);

    assert_eq!(
        events.first(),
        Some(&Event::UnitAttacked {
            attacker: elf,
            target: UnitId::new(0),
            damage: Rules::default().elf_attack_power,
            remaining: Health::new(197),
        }),
        "the goblin to the left comes first in reading order",
    );
}

#[test]
fn upper_neighbour_precedes_lower_neighbour() {
    let mut world =
        World::parse("#####\n#.G.#\n#.E.#\n#.G.#\n#####", Rules::default()).expect("valid map");

    let events = strike(&mut world, UnitId::new(1));

    assert!(matches!(
        events.as_slice(),
        [Event::UnitAttacked { target, .. }] if *target == UnitId::new(0)
    ));
}

#[test]
fn weakened_target_is_preferred_over_reading_order() {
    let mut world = World::parse("#####\n#GEG#\n#####", Rules::default()).expect("valid map");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Attack {
            attacker: UnitId::new(1),
            target: UnitId::new(2),
        },
        &mut events,
    );

    let events = strike(&mut world, UnitId::new(1));

    assert!(matches!(
        events.as_slice(),
        [Event::UnitAttacked { target, remaining, .. }]
            if *target == UnitId::new(2) && *remaining == Health::new(194)
    ));
    assert_eq!(
        query::unit(&world, UnitId::new(2)).map(|unit| unit.cell),
        Some(CellCoord::new(3, 1))
    );
}
