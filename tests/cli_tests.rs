//! Command-line surface checks that need no media tooling installed

use assert_cmd::Command;
use predicates::prelude::*;

fn webpcut() -> Command {
    Command::cargo_bin("webpcut").unwrap()
}

#[test]
fn help_lists_every_command() {
    webpcut()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("estimate"))
        .stdout(predicate::str::contains("recommend"))
        .stdout(predicate::str::contains("probe"));
}

#[test]
fn fps_outside_the_domain_is_rejected_by_parsing() {
    webpcut()
        .args(["convert", "--input", "in.mp4", "--fps", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));

    webpcut()
        .args(["convert", "--input", "in.mp4", "--fps", "61"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn quality_outside_the_domain_is_rejected_by_parsing() {
    webpcut()
        .args(["convert", "--input", "in.mp4", "--quality", "101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn malformed_crop_is_rejected_by_parsing() {
    webpcut()
        .args(["convert", "--input", "in.mp4", "--crop", "640x360"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("W:H:X:Y"));
}

#[test]
fn missing_input_file_fails_before_any_probing() {
    webpcut()
        .args(["probe", "--input", "/no/such/clip.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn recommend_requires_a_positive_target() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("clip.mp4");
    std::fs::write(&input, b"stub").unwrap();

    webpcut()
        .args([
            "recommend",
            "--input",
            input.to_str().unwrap(),
            "--target-size",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive"));
}
