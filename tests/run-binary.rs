use std::fs;

use assert_cmd::Command;

fn solver() -> Command {
    Command::cargo_bin("multi-sokoban-solver").unwrap()
}

#[test]
fn run_single_push() {
    solver()
        .arg("levels/01-single-push.txt")
        .assert()
        .success()
        .stdout("Push(E,E)\n");
}

#[test]
fn run_corridor_all_strategies() {
    let output = "Move(E)\nMove(E)\nMove(E)\nPush(E,E)\nPush(E,E)\n";
    let strategies: &[&[&str]] = &[
        &["--bfs"],
        &["--astar"],
        &["--astar", "--heuristic", "box-distance"],
        &["--wastar", "3"],
        &["--greedy", "--no-shuffle"],
        &["--seed", "123"],
    ];
    for args in strategies {
        solver()
            .args(*args)
            .arg("levels/02-corridor.txt")
            .assert()
            .success()
            .stdout(output);
    }
}

#[test]
fn run_from_stdin() {
    let level = fs::read_to_string("levels/03-pull-out.txt").unwrap();
    solver()
        .write_stdin(level)
        .assert()
        .success()
        .stdout("Pull(E,E)\nPull(E,E)\n");
}

#[test]
fn run_unsolvable() {
    solver()
        .arg("levels/06-swap.txt")
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn run_state_limit() {
    solver()
        .arg("--max-states")
        .arg("1")
        .arg("levels/04-two-agents.txt")
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn run_missing_file() {
    solver()
        .arg("levels/does-not-exist.txt")
        .assert()
        .code(2)
        .stdout("");
}

#[test]
fn run_bad_args() {
    // doesn't check stderr, only that it fails without printing a plan
    solver()
        .arg("--bfs")
        .arg("--dfs")
        .arg("levels/01-single-push.txt")
        .assert()
        .code(2)
        .stdout("");

    solver()
        .arg("--wastar")
        .arg("heavy")
        .arg("levels/01-single-push.txt")
        .assert()
        .code(2)
        .stdout("");
}

#[test]
fn run_server() {
    let level = fs::read_to_string("levels/01-single-push.txt").unwrap();
    solver()
        .arg("--server")
        .write_stdin(format!("{}true\n", level))
        .assert()
        .success()
        .stdout("multi-sokoban-solver\nPush(E,E)\n");
}
