use crate::{Engine, EngineError};
use beverage_bandits_core::{AttackPower, CombatReport, Rules, Team};
use beverage_bandits_world::Layout;
use tracing::info;

/// Lowest elf attack power considered by [`minimum_flawless_elf_power`].
pub const MIN_SWEEP_POWER: AttackPower = AttackPower::new(4);

/// Outcome of the smallest elf attack power that wins without elf losses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepResult {
    /// Attack power granted to every elf.
    pub elf_attack_power: AttackPower,
    /// Report of the flawless combat played at that power.
    pub report: CombatReport,
}

/// Finds the smallest elf attack power that lets the elves win with no deaths.
///
/// Each attempt replays the layout from scratch, stopping as soon as an elf
/// dies. Powers beyond the starting health of a goblin cannot change the
/// result, so the search gives up there.
pub fn minimum_flawless_elf_power(
    layout: &Layout,
    rules: Rules,
) -> Result<SweepResult, EngineError> {
    let max = rules.starting_health.get().max(MIN_SWEEP_POWER.get());
    let base = Rules {
        abort_on_elf_death: true,
        ..rules
    };

    for power in MIN_SWEEP_POWER.get()..=max {
        let elf_attack_power = AttackPower::new(power);
        let mut engine = Engine::from_layout(layout, base.with_elf_attack_power(elf_attack_power));
        let report = match engine.run() {
            Ok(report) => report,
            Err(EngineError::Stalemate { rounds }) => {
                info!(power, rounds, "sweep attempt stalled");
                continue;
            }
            Err(error) => return Err(error),
        };

        let flawless = report.winner == Some(Team::Elf) && report.casualties.elves == 0;
        info!(power, rounds = report.rounds, flawless, "sweep attempt finished");
        if flawless {
            return Ok(SweepResult {
                elf_attack_power,
                report,
            });
        }
    }

    Err(EngineError::NoFlawlessPower { max })
}
