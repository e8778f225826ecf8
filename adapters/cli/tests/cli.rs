use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_path-defence"))
        .args(args)
        .output()
        .expect("failed to launch path-defence")
}

#[test]
fn json_summary_reports_the_run() {
    let output = run(&[
        "--max-ticks",
        "40",
        "--tower",
        "basic@450,560",
        "--no-autobuild",
        "--json",
        "--log",
        "off",
    ]);
    assert!(output.status.success(), "{output:?}");

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout holds JSON");
    assert_eq!(summary["status"], "Playing");
    assert_eq!(summary["ticks"], 40);
    assert_eq!(summary["towers"], 1);
    assert_eq!(summary["money"], 75);
    assert_eq!(summary["score"], 250);
    assert_eq!(summary["wave"], 2);
}

#[test]
fn blocked_tower_aborts_the_run() {
    let output = run(&[
        "--tower",
        "basic@450,560",
        "--tower",
        "basic@455,565",
        "--log",
        "off",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("basic@455,565"), "{stderr}");
}
