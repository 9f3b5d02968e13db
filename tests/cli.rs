//! Binary-level tests for the `djset` command.

mod common;

use std::path::Path;
use std::process::{Command, Output};

use assert_approx_eq::assert_approx_eq;

use common::{click_track, write_wav};

fn djset(args: &[&str], cwd: &Path) -> Output {
    let config = cwd.join("no-config.yaml");
    Command::new(env!("CARGO_BIN_EXE_djset"))
        .args(args)
        .arg("--config")
        .arg(&config)
        .current_dir(cwd)
        .env_remove("DJSET_LOG")
        .output()
        .expect("run djset")
}

#[test]
fn run_prints_program_output() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), "strobe.wav", &click_track(120.0, 6.0));
    std::fs::write(
        dir.path().join("set.yaml"),
        r#"
- !Song { name: Strobe, artist: deadmau5, genre: House, file: strobe.wav }
- !If
  init: { name: i, expression: 0 }
  condition: { left: i, op: "<", right: 3 }
  iteration: { name: i, expression: { left: i, op: "+", right: 1 } }
  body:
    - !Shout { expression: i }
"#,
    )
    .unwrap();

    let output = djset(&["run", "set.yaml"], dir.path());
    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "Added song: Strobe by deadmau5 (House)\n0\n1\n2\n");
}

#[test]
fn run_fails_on_hard_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("set.yaml"),
        "- !Shout { expression: before }\n\
         - !OrganizeAll { identifier: mood }\n\
         - !Shout { expression: after }\n",
    )
    .unwrap();

    let output = djset(&["run", "set.yaml"], dir.path());
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stdout, "before\n");
    assert!(stderr.contains("invalid identifier 'mood'"), "stderr: {stderr}");
}

#[test]
fn run_rejects_malformed_program() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("set.yaml"), "- !Rewind { name: x }\n").unwrap();
    let output = djset(&["run", "set.yaml"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot load program"));
}

#[test]
fn bpm_prints_detected_tempo() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), "click.wav", &click_track(120.0, 12.0));
    let output = djset(&["bpm", "click.wav"], dir.path());
    assert!(output.status.success(), "process failed: {output:?}");
    let bpm: f64 = String::from_utf8_lossy(&output.stdout).trim().parse().unwrap();
    assert_approx_eq!(bpm, 120.0, 3.0);
}

#[test]
fn mix_with_explicit_bpm() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), "click.wav", &click_track(120.0, 20.0));
    let output = djset(&["mix", "click.wav", "--bpm", "120", "--bars", "8"], dir.path());
    assert!(output.status.success(), "process failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Using BPM: 120.00\nMix points: segment "));
}

#[test]
fn mix_rejects_low_bpm() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), "click.wav", &click_track(120.0, 20.0));
    let output = djset(&["mix", "click.wav", "--bpm", "30"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid BPM 30"));
}

#[test]
fn malformed_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("set.yaml"), "[]\n").unwrap();
    let bad = dir.path().join("bad.yaml");
    std::fs::write(&bad, "analysis: [not, a, map]\n").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_djset"))
        .args(["run", "set.yaml", "--config"])
        .arg(&bad)
        .current_dir(dir.path())
        .output()
        .expect("run djset");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed config"));
}

fn shout_program(dir: &Path) {
    std::fs::write(dir.join("set.yaml"), "- !Shout { expression: hello }\n").unwrap();
}

#[test]
fn verbose_logs_to_stderr_only() {
    let dir = tempfile::tempdir().unwrap();
    shout_program(dir.path());

    let quiet = djset(&["run", "set.yaml"], dir.path());
    assert!(quiet.status.success(), "process failed: {quiet:?}");
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("dispatch"));

    let verbose = djset(&["run", "set.yaml", "-v"], dir.path());
    assert!(verbose.status.success(), "process failed: {verbose:?}");
    let stderr = String::from_utf8_lossy(&verbose.stderr);
    assert!(stderr.contains("DEBUG"), "stderr: {stderr}");
    assert!(stderr.contains("dispatch"), "stderr: {stderr}");
    assert_eq!(verbose.stdout, quiet.stdout);
    assert_eq!(String::from_utf8_lossy(&verbose.stdout), "hello\n");
}

#[test]
fn log_level_comes_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    shout_program(dir.path());
    let output = Command::new(env!("CARGO_BIN_EXE_djset"))
        .args(["run", "set.yaml", "--config"])
        .arg(dir.path().join("no-config.yaml"))
        .current_dir(dir.path())
        .env("DJSET_LOG", "djset=debug")
        .output()
        .expect("run djset");
    assert!(output.status.success(), "process failed: {output:?}");
    assert!(String::from_utf8_lossy(&output.stderr).contains("dispatch"));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
}
