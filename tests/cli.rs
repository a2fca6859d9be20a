use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

const AOC_SAMPLE: &str = "\
Begin in state A.
Perform a diagnostic checksum after 6 steps.
In state A:
  If the current value is 0:
    - Write the value 1.
    - Move one slot to the right.
    - Continue with state B.
  If the current value is 1:
    - Write the value 0.
    - Move one slot to the left.
    - Continue with state B.
In state B:
  If the current value is 0:
    - Write the value 1.
    - Move one slot to the left.
    - Continue with state A.
  If the current value is 1:
    - Write the value 1.
    - Move one slot to the right.
    - Continue with state A.
";

fn sample_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(AOC_SAMPLE.as_bytes()).unwrap();
    file
}

fn turingc_bin() -> &'static str {
    env!("CARGO_BIN_EXE_turingc")
}

#[test]
fn run_prints_the_diagnostic_checksum() {
    let program_file = sample_file();
    let output = Command::new(turingc_bin())
        .args(["run", program_file.path().to_str().unwrap(), "ast"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Diagnostic checksum: 3"));
}

#[test]
fn run_with_unknown_executor_exits_with_failure() {
    let program_file = sample_file();
    let output = Command::new(turingc_bin())
        .args(["run", program_file.path().to_str().unwrap(), "nonsense"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn generate_c_writes_an_equivalent_c_source_file() {
    let program_file = sample_file();
    let work_dir = tempfile::tempdir().unwrap();
    let output = Command::new(turingc_bin())
        .current_dir(work_dir.path())
        .args(["generate-c", program_file.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let generated = std::fs::read_to_string(work_dir.path().join("generated-program.c")).unwrap();
    assert!(generated.contains("char tape[6];"));
    assert!(generated.contains("Checksum: %i"));
}

#[test]
fn missing_program_file_is_reported_as_a_failure() {
    let output = Command::new(turingc_bin())
        .args(["run", "/nonexistent/path/to/program.txt", "ast"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
