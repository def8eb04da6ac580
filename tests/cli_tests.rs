// Command-line integration tests for the binnacle binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const COUNTS: &str = "# Raw counters

Number of ranks: 4
Datatype size: 1
Alltoallv calls 0
Count: 1 calls

BEGINNING DATA
Rank(s) 0-3: 50 150 2000
END DATA
";

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("counts.rank2.txt");
    fs::write(&input, COUNTS).unwrap();
    (dir, input)
}

fn binnacle() -> Command {
    Command::cargo_bin("binnacle").unwrap()
}

#[test]
fn test_cli_writes_bin_files_and_summary() {
    let (dir, input) = setup();

    binnacle()
        .arg("--input")
        .arg(&input)
        .arg("--thresholds")
        .arg("100,1000")
        .arg("--output-dir")
        .arg(dir.path())
        .args(["--job", "3", "--comm", "1", "--rank", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("job 3 comm 1 rank 2"))
        .stdout(predicate::str::contains("100-1000"))
        .stdout(predicate::str::contains("1000+"));

    for name in [
        "bin.job3.comm1.rank2_0-100.txt",
        "bin.job3.comm1.rank2_100-1000.txt",
        "bin.job3.comm1.rank2_1000+.txt",
    ] {
        assert_eq!(fs::read_to_string(dir.path().join(name)).unwrap(), "4\n");
    }
}

#[test]
fn test_cli_json_summary() {
    let (dir, input) = setup();

    let output = binnacle()
        .arg("-i")
        .arg(&input)
        .args(["-t", "100,1000", "--format", "json"])
        .arg("-o")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total"], 12);
    assert_eq!(json["bins"][0]["range"], "0-100");
    assert_eq!(json["bins"][0]["size"], 4);
}

#[test]
fn test_cli_skips_existing_files() {
    let (dir, input) = setup();
    let run = || {
        binnacle()
            .arg("-i")
            .arg(&input)
            .args(["-t", "100,1000", "--format", "none"])
            .arg("-o")
            .arg(dir.path())
            .assert()
    };

    run().success();
    let first = dir.path().join("bin.job0.comm0.rank0_0-100.txt");
    fs::write(&first, "stale\n").unwrap();

    run()
        .success()
        .stderr(predicate::str::contains("already exist"));
    assert_eq!(fs::read_to_string(&first).unwrap(), "stale\n");
}

#[test]
fn test_cli_force_recomputes() {
    let (dir, input) = setup();
    let run = |extra: &[&str]| {
        binnacle()
            .arg("-i")
            .arg(&input)
            .args(["-t", "100,1000", "--format", "none"])
            .args(extra)
            .arg("-o")
            .arg(dir.path())
            .assert()
    };

    run(&[]).success();
    let first = dir.path().join("bin.job0.comm0.rank0_0-100.txt");
    fs::write(&first, "stale\n").unwrap();

    run(&["--force"]).success();
    assert_eq!(fs::read_to_string(&first).unwrap(), "4\n");
}

#[test]
fn test_cli_rejects_bad_thresholds() {
    let (dir, input) = setup();

    binnacle()
        .arg("-i")
        .arg(&input)
        .args(["-t", "100,abc"])
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid threshold 'abc'"));
}

#[test]
fn test_cli_rejects_decreasing_thresholds() {
    let (dir, input) = setup();

    binnacle()
        .arg("-i")
        .arg(&input)
        .args(["-t", "1000,100"])
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("strictly increasing"));
}

#[test]
fn test_cli_missing_input_file() {
    let dir = TempDir::new().unwrap();

    binnacle()
        .arg("-i")
        .arg(dir.path().join("nope.txt"))
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to open"));
}

#[test]
fn test_cli_config_file() {
    let (dir, input) = setup();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let config = dir.path().join("binnacle.toml");
    fs::write(
        &config,
        format!("thresholds = [100]\noutput_dir = {:?}\n", out.display().to_string()),
    )
    .unwrap();

    binnacle()
        .arg("-i")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .args(["--format", "none"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out.join("bin.job0.comm0.rank0_100+.txt")).unwrap(),
        "8\n"
    );
}
