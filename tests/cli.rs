use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use indoc::indoc;
use predicates::prelude::*;
use std::process::Command;

const BINARY: &str = "protseq";
type TestResult = Result<(), Box<dyn std::error::Error>>;

const ALIGNED: &str = indoc! {"
    >a first sequence
    ACDE
    >b
    AC-E
    >c
    GCDE
"};

const UNALIGNED: &str = indoc! {"
    >a
    ACDE
    >b
    ACE
    >c
    GCDE
"};

#[test]
fn file_doesnt_exist() -> TestResult {
    let mut cmd = Command::cargo_bin(BINARY)?;

    cmd.arg("summary").arg("file_which_does_not_exist.fasta");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No such file or directory"));

    Ok(())
}

#[test]
fn summary_reports_properties() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let input = temp.child("aligned.fasta");
    input.write_str(ALIGNED)?;

    for extra in [None, Some("--in-memory")] {
        let mut cmd = Command::cargo_bin(BINARY)?;
        cmd.arg("summary").arg(input.path());
        if let Some(flag) = extra {
            cmd.arg(flag);
        }

        let output = cmd.output()?;
        assert!(output.status.success());

        let summary: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(summary["count"], 3);
        assert_eq!(summary["aligned"], true);
        assert_eq!(summary["width"], 4);
        assert_eq!(summary["has_gaps"], true);
        assert_eq!(summary["mutated_positions"], serde_json::json!([0, 2]));
    }

    temp.close()?;
    Ok(())
}

#[test]
fn duplicates_are_summarised_the_same_either_way() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let input = temp.child("dup.fasta");
    input.write_str(">a\nACDE\n>a\nACDE\n")?;

    for extra in [None, Some("--in-memory")] {
        let mut cmd = Command::cargo_bin(BINARY)?;
        cmd.arg("summary").arg(input.path());
        if let Some(flag) = extra {
            cmd.arg(flag);
        }

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("\"count\": 2"));
    }

    temp.close()?;
    Ok(())
}

#[test]
fn leading_blank_line_is_rejected() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let input = temp.child("blank.fasta");
    input.write_str("\n>a\nACDE\n")?;

    Command::cargo_bin(BINARY)?
        .arg("summary")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed FASTA at line 1"));

    temp.close()?;
    Ok(())
}

#[test]
fn mutations_of_alignment() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let input = temp.child("aligned.fasta");
    input.write_str(ALIGNED)?;

    Command::cargo_bin(BINARY)?
        .arg("mutations")
        .arg(input.path())
        .assert()
        .success()
        .stdout("0\n2\n");

    let unaligned = temp.child("unaligned.fasta");
    unaligned.write_str(UNALIGNED)?;

    Command::cargo_bin(BINARY)?
        .arg("mutations")
        .arg(unaligned.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be aligned"));

    temp.close()?;
    Ok(())
}

#[test]
fn mapping_then_apply_restores_alignment() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let aligned = temp.child("aligned.fasta");
    aligned.write_str(ALIGNED)?;
    let mapping = temp.child("mapping.json");
    let raw = temp.child("raw.fasta");
    raw.write_str(UNALIGNED)?;
    let restored = temp.child("restored.fasta");

    Command::cargo_bin(BINARY)?
        .arg("mapping")
        .arg(aligned.path())
        .arg("-o")
        .arg(mapping.path())
        .assert()
        .success();
    mapping.assert(predicate::path::exists());

    Command::cargo_bin(BINARY)?
        .arg("apply")
        .arg(raw.path())
        .arg("--mapping")
        .arg(mapping.path())
        .arg("-o")
        .arg(restored.path())
        .assert()
        .success();

    restored.assert(">a\nACDE\n>b\nAC-E\n>c\nGCDE\n");

    temp.close()?;
    Ok(())
}

#[test]
fn apply_rejects_gapped_input() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let aligned = temp.child("aligned.fasta");
    aligned.write_str(ALIGNED)?;
    let mapping = temp.child("mapping.json");
    mapping.write_str(r#"{"0":[0,1,2,3],"1":[0,1,3],"2":[0,1,2,3]}"#)?;

    Command::cargo_bin(BINARY)?
        .arg("apply")
        .arg(aligned.path())
        .arg("--mapping")
        .arg(mapping.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already contain gaps"));

    temp.close()?;
    Ok(())
}

#[test]
fn align_without_mafft() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let input = temp.child("unaligned.fasta");
    input.write_str(UNALIGNED)?;

    Command::cargo_bin(BINARY)?
        .env("MAFFT_PATH", "/nonexistent/bin/mafft")
        .arg("align")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("mafft could not be found"));

    temp.close()?;
    Ok(())
}

#[test]
fn align_rejects_gapped_input() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let input = temp.child("aligned.fasta");
    input.write_str(ALIGNED)?;

    Command::cargo_bin(BINARY)?
        .arg("align")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already contain gaps"));

    temp.close()?;
    Ok(())
}
