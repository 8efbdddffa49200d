use beverage_bandits_core::{AttackPower, CombatReport, Team};
use serde::Serialize;

/// How the combat was played out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RunMode {
    /// A single combat at the requested elf attack power.
    Combat,
    /// The lowest elf attack power that wins without elf losses.
    Sweep,
}

/// Summary printed once the simulation is over.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct ReportDocument {
    /// Mode the simulation ran in.
    pub(crate) mode: RunMode,
    /// Elf attack power used for the reported combat.
    pub(crate) elf_attack_power: u32,
    /// Outcome of the reported combat.
    #[serde(flatten)]
    pub(crate) report: CombatReport,
}

impl ReportDocument {
    /// Wraps a combat report for output.
    #[must_use]
    pub(crate) fn new(mode: RunMode, elf_attack_power: AttackPower, report: CombatReport) -> Self {
        Self {
            mode,
            elf_attack_power: elf_attack_power.get(),
            report,
        }
    }

    /// Renders the summary in the style of the puzzle narrative.
    #[must_use]
    pub(crate) fn to_text(&self) -> String {
        let report = &self.report;
        let mut lines = Vec::with_capacity(4);
        if self.mode == RunMode::Sweep {
            lines.push(format!(
                "Elves need {} attack power to win without losses",
                self.elf_attack_power
            ));
        }
        lines.push(format!("Combat ends after {} full rounds", report.rounds));
        let winner = match report.winner {
            Some(Team::Elf) => "Elves win",
            Some(Team::Goblin) => "Goblins win",
            None => "Nobody wins",
        };
        lines.push(format!(
            "{winner} with {} total hit points left",
            report.remaining_health
        ));
        lines.push(format!(
            "Outcome: {} * {} = {}",
            report.rounds, report.remaining_health, report.outcome
        ));
        lines.join("\n")
    }

    /// Serializes the summary as a single JSON object.
    pub(crate) fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beverage_bandits_core::Casualties;

    fn goblin_victory() -> CombatReport {
        CombatReport::new(
            47,
            590,
            Some(Team::Goblin),
            Casualties {
                elves: 2,
                goblins: 0,
            },
        )
    }

    #[test]
    fn text_matches_narrative_summary() {
        let document =
            ReportDocument::new(RunMode::Combat, AttackPower::new(3), goblin_victory());

        assert_eq!(
            document.to_text(),
            "Combat ends after 47 full rounds\n\
             Goblins win with 590 total hit points left\n\
             Outcome: 47 * 590 = 27730"
        );
    }

    #[test]
    fn sweep_text_names_the_attack_power() {
        let report = CombatReport::new(29, 172, Some(Team::Elf), Casualties::default());
        let document = ReportDocument::new(RunMode::Sweep, AttackPower::new(15), report);

        let text = document.to_text();

        assert!(text.starts_with("Elves need 15 attack power"));
        assert!(text.ends_with("Outcome: 29 * 172 = 4988"));
    }

    #[test]
    fn json_flattens_the_report() {
        let document =
            ReportDocument::new(RunMode::Combat, AttackPower::new(3), goblin_victory());

        let json = document.to_json().expect("serializable document");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["mode"], "combat");
        assert_eq!(value["elf_attack_power"], 3);
        assert_eq!(value["outcome"], 27730);
        assert_eq!(value["winner"], "Goblin");
        assert_eq!(value["casualties"]["elves"], 2);
    }
}
