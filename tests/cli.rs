use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn molsat() -> Command {
    Command::cargo_bin("molsat").unwrap()
}

#[test]
fn test_check_accepts_a_well_formed_candidate_line_file() {
    let file = assert_fs::NamedTempFile::new("lines.txt").unwrap();
    file.write_str("R 1 13 25\nN 2 14 26\n").unwrap();
    molsat()
        .args(["check", "-f", file.path().to_str().unwrap(), "-r", "lines"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 relational and 1 non-relational"));
}

#[test]
fn test_check_rejects_a_malformed_candidate_line_file() {
    let file = assert_fs::NamedTempFile::new("lines.txt").unwrap();
    file.write_str("R 1 2\nX 3 4\n").unwrap();
    molsat()
        .args(["check", "-f", file.path().to_str().unwrap(), "-r", "lines"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unrecognized line kind tag"));
}

#[test]
fn test_check_accepts_a_well_formed_template_file() {
    let file = assert_fs::NamedTempFile::new("template.txt").unwrap();
    file.write_str("10\n01\n\n11\n00\n").unwrap();
    molsat()
        .args(["check", "-f", file.path().to_str().unwrap(), "-r", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 layer(s) of order 2"));
}

#[test]
fn test_check_rejects_a_ragged_template_file() {
    let file = assert_fs::NamedTempFile::new("template.txt").unwrap();
    file.write_str("10\n011\n").unwrap();
    molsat()
        .args(["check", "-f", file.path().to_str().unwrap(), "-r", "template"])
        .assert()
        .failure();
}

#[cfg(target_family = "unix")]
#[test]
fn test_search_net_reports_the_oracle_verdict() {
    let dir = assert_fs::TempDir::new().unwrap();
    let first = dir.child("a-lines.txt");
    first.write_str("R 1 2\n").unwrap();
    let second = dir.child("b-lines.txt");
    second.write_str("R 1 3\n").unwrap();
    molsat()
        .args([
            "search-net",
            "-f",
            first.path().to_str().unwrap(),
            "-f",
            second.path().to_str().unwrap(),
            "--coverage",
            "none",
            "--solver",
            "sh",
            "--solver-opt",
            "-c",
            "--solver-opt",
            "printf 's UNSATISFIABLE\\n'",
            "--cnf-file",
            dir.child("encoding.cnf").path().to_str().unwrap(),
            "--result-file",
            dir.child("result.txt").path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("s UNSATISFIABLE"));
}

#[cfg(target_family = "unix")]
#[test]
fn test_search_net_flags_an_invalid_model_as_a_defect() {
    let dir = assert_fs::TempDir::new().unwrap();
    let first = dir.child("a-lines.txt");
    first.write_str("R 1 2\nR 2 3\n").unwrap();
    let second = dir.child("b-lines.txt");
    second.write_str("R 1 3\n").unwrap();
    molsat()
        .args([
            "search-net",
            "-f",
            first.path().to_str().unwrap(),
            "-f",
            second.path().to_str().unwrap(),
            "--coverage",
            "none",
            "--solver",
            "sh",
            "--solver-opt",
            "-c",
            "--solver-opt",
            "printf 's SATISFIABLE\\nv 1 2 3 0\\n'",
            "--cnf-file",
            dir.child("encoding.cnf").path().to_str().unwrap(),
            "--result-file",
            dir.child("result.txt").path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("violates the net invariants"));
}
