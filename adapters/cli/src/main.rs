#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Beverage Bandits combats.

mod report;

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result as AnyResult};
use beverage_bandits_core::{AttackPower, CombatReport, Rules, DEFAULT_ATTACK_POWER};
use beverage_bandits_engine::{minimum_flawless_elf_power, Engine, EngineError, RoundOutcome};
use beverage_bandits_rendering::{BoardFrame, RenderingBackend, TextBackend};
use beverage_bandits_world::{query, Layout, World};
use clap::{ArgAction, Parser, ValueEnum};
use report::{ReportDocument, RunMode};
use tracing::{info, Level};

/// Simulates goblin and elf combat on a cave map.
#[derive(Debug, Parser)]
#[command(name = "beverage-bandits", version, about)]
struct CliArgs {
    /// Map file to read, or `-` for standard input.
    input: PathBuf,
    /// Attack power granted to every elf.
    #[arg(long, default_value_t = DEFAULT_ATTACK_POWER.get())]
    elf_attack_power: u32,
    /// Print the board after every completed round.
    #[arg(long, conflicts_with = "sweep")]
    show_rounds: bool,
    /// Search for the lowest elf attack power that wins without elf losses.
    #[arg(long)]
    sweep: bool,
    /// Format of the final report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Increase log verbosity (`-v` for debug, `-vv` for trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Entry point for the Beverage Bandits command-line interface.
fn main() -> AnyResult<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let text = read_input(&args.input)?;
    let layout: Layout = text
        .parse()
        .with_context(|| format!("failed to parse map {}", args.input.display()))?;
    info!(
        columns = layout.columns(),
        rows = layout.rows(),
        units = layout.spawns().len(),
        "map loaded"
    );

    let rules = Rules::default().with_elf_attack_power(AttackPower::new(args.elf_attack_power));
    let document = if args.sweep {
        let result = minimum_flawless_elf_power(&layout, rules)
            .context("failed to find a flawless elf attack power")?;
        ReportDocument::new(RunMode::Sweep, result.elf_attack_power, result.report)
    } else {
        let report = run_combat(&layout, rules, args.show_rounds)?;
        ReportDocument::new(RunMode::Combat, rules.elf_attack_power, report)
    };

    match args.format {
        OutputFormat::Text => println!("{}", document.to_text()),
        OutputFormat::Json => println!(
            "{}",
            document.to_json().context("failed to serialize report")?
        ),
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: &Path) -> AnyResult<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        let _ = io::stdin()
            .read_to_string(&mut text)
            .context("failed to read map from standard input")?;
        return Ok(text);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read map {}", path.display()))
}

fn run_combat(
    layout: &Layout,
    rules: Rules,
    show_rounds: bool,
) -> AnyResult<CombatReport> {
    let mut engine = Engine::from_layout(layout, rules);
    if !show_rounds {
        return engine.run().context("combat did not finish");
    }

    let mut backend = TextBackend::new(io::stdout().lock());
    present(&mut backend, "Initially:", engine.world())?;
    loop {
        match engine.step_round() {
            RoundOutcome::Completed { round } => {
                let heading = if round == 1 {
                    "After 1 round:".to_owned()
                } else {
                    format!("After {round} rounds:")
                };
                present(&mut backend, &heading, engine.world())?;
            }
            RoundOutcome::CombatEnded => break,
            RoundOutcome::Stalemate => {
                return Err(EngineError::Stalemate {
                    rounds: engine.completed_rounds(),
                })
                .context("combat did not finish");
            }
        }
    }
    present(&mut backend, "Final:", engine.world())?;
    Ok(engine.report())
}

fn present<B: RenderingBackend>(backend: &mut B, heading: &str, world: &World) -> AnyResult<()> {
    let frame = BoardFrame::capture(query::occupancy_view(world), &query::unit_view(world))
        .context("failed to capture board")?;
    backend.present(Some(heading), &frame)
}
