use std::process::Command;

fn forage() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_forage"));
    let _ = command.env("RUST_LOG", "off");
    command
}

#[test]
fn json_summary_is_written_to_stdout() {
    let output = forage()
        .args([
            "--seed", "9", "--rounds", "1", "--food", "5", "--format", "json",
        ])
        .output()
        .expect("failed to launch forage binary");

    assert!(output.status.success(), "forage should exit cleanly");
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should hold a json summary");

    assert_eq!(summary["seed"], 9);
    assert_eq!(summary["config"]["initial_food_count"], 5);
    assert!(summary["population"]["food_remaining"].is_u64());
    assert!(summary["history"].is_array());
}

#[test]
fn identical_seeds_print_identical_summaries() {
    let run = || {
        forage()
            .args(["--seed", "21", "--rounds", "2", "--format", "json"])
            .output()
            .expect("failed to launch forage binary")
            .stdout
    };

    assert_eq!(run(), run());
}

#[test]
fn invalid_configuration_fails_with_context() {
    let output = forage()
        .arg("--floor-size=-3")
        .output()
        .expect("failed to launch forage binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid simulation configuration"));
    assert!(stderr.contains("floor size"));
}
