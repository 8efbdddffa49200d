use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

const OPENING: &str = "\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######
";

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_beverage-bandits"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch beverage-bandits");

    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(input.as_bytes())
        .expect("failed to write map");

    child.wait_with_output().expect("failed to wait for beverage-bandits")
}

#[test]
fn text_report_is_printed_for_stdin_map() {
    let output = run_with_stdin(&["-"], OPENING);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.contains("Combat ends after 47 full rounds"));
    assert!(stdout.contains("Outcome: 47 * 590 = 27730"));
}

#[test]
fn sweep_reports_json() {
    let output = run_with_stdin(&["-", "--sweep", "--format", "json"], OPENING);

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(value["mode"], "sweep");
    assert_eq!(value["elf_attack_power"], 15);
    assert_eq!(value["outcome"], 4988);
}

#[test]
fn show_rounds_prints_narrated_boards() {
    let output = run_with_stdin(&["-", "--show-rounds"], OPENING);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    assert!(stdout.starts_with("Initially:\n#######\n#.G...#   G(200)\n"));
    assert!(stdout.contains("After 1 round:\n#######\n#..G..#   G(200)\n#...EG#   E(197), G(197)\n"));
    assert!(stdout.contains("After 47 rounds:"));
    assert!(!stdout.contains("After 48 rounds:"));
}

#[test]
fn ragged_map_fails_with_context() {
    let output = run_with_stdin(&["-"], "#####\n#E.G#\n###\n");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8 output");
    assert!(stderr.contains("failed to parse map"));
}
