use turingc::executor::{Executor, Machine, EXECUTOR_NAMES};
use turingc::parser;
use turingc::program::Program;

/// Parses `source` and builds every registered executor for it. Panics if
/// parsing fails or if any executor refuses to build (callers that expect
/// a build-time rejection, e.g. the 32-state bytecode cap, should build
/// directly instead of going through this helper).
pub fn build_all(source: &str) -> Vec<Machine> {
    let program = parser::parse(source.as_bytes()).expect("sample program must parse");
    EXECUTOR_NAMES
        .iter()
        .map(|name| Machine::build(name, program.clone()).expect("executor must build"))
        .collect()
}

/// Runs `source` to its full checksum delay on every registered executor
/// and asserts they all agree with `expected_checksum`.
pub fn check_all_engines(source: &str, expected_checksum: u64) {
    let program = parser::parse(source.as_bytes()).expect("sample program must parse");
    let steps = program.checksum_delay;
    for name in EXECUTOR_NAMES {
        let mut machine = Machine::build(name, program.clone()).expect("executor must build");
        for _ in 0..steps {
            machine.step();
        }
        assert_eq!(
            machine.diagnostic_checksum(),
            expected_checksum,
            "executor {name} disagreed with the expected checksum"
        );
    }
}

/// Builds every executor for `program` (already parsed, so round-tripped
/// through the bytecode size cap by the caller) and asserts that after
/// `steps` single steps all three have produced bit-identical checksums.
pub fn assert_step_by_step_agreement(program: &Program, steps: u32) {
    let mut machines: Vec<Machine> = EXECUTOR_NAMES
        .iter()
        .map(|name| Machine::build(name, program.clone()).expect("executor must build"))
        .collect();
    for step in 0..steps {
        for machine in &mut machines {
            machine.step();
        }
        let checksums: Vec<u64> = machines.iter().map(|m| m.diagnostic_checksum()).collect();
        assert!(
            checksums.windows(2).all(|pair| pair[0] == pair[1]),
            "executors disagreed after step {step}: {checksums:?}"
        );
    }
}
