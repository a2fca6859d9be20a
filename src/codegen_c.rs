//! Emits a standalone, single-file C translation of a [`Program`].
//!
//! Ported from `original_source/day25/main.cpp::generate_c`: a flat
//! `switch` over numeric state indices (assigned in [`Program::state_order`]
//! order), a 25-iteration warm-up benchmark, then one real run whose
//! checksum is printed.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::program::{Program, StateAction};

fn state_indices(program: &Program) -> HashMap<&str, usize> {
    program
        .state_order()
        .enumerate()
        .map(|(index, name)| (name.as_str(), index))
        .collect()
}

fn write_case(out: &mut String, indices: &HashMap<&str, usize>, name: &str, actions: [&StateAction; 2]) {
    writeln!(out, "      case {}:", indices[name]).unwrap();
    writeln!(out, "        if (tape[current_offset] == 0) {{").unwrap();
    write_branch(out, indices, actions[0]);
    writeln!(out, "        }} else {{").unwrap();
    write_branch(out, indices, actions[1]);
    writeln!(out, "        }}").unwrap();
    writeln!(out, "        break;").unwrap();
}

fn write_branch(out: &mut String, indices: &HashMap<&str, usize>, action: &StateAction) {
    writeln!(
        out,
        "          tape[current_offset] = {};",
        action.write_value
    )
    .unwrap();
    writeln!(
        out,
        "          current_offset = (current_offset + sizeof(tape) + {}) % sizeof(tape);",
        action.move_direction
    )
    .unwrap();
    writeln!(
        out,
        "          current_state = {};",
        indices[action.next_state.as_str()]
    )
    .unwrap();
}

/// Renders `program` as a C source file.
pub fn generate_c(program: &Program) -> String {
    let indices = state_indices(program);
    let mut out = String::new();

    writeln!(out, "#include <time.h>").unwrap();
    writeln!(out, "#include <stdio.h>").unwrap();
    writeln!(out, "#include <string.h>").unwrap();
    writeln!(out, "char tape[{}];", program.checksum_delay).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "void run() {{").unwrap();
    writeln!(
        out,
        "  unsigned current_state = {};",
        indices[program.initial_state.as_str()]
    )
    .unwrap();
    writeln!(out, "  unsigned long current_offset = 0;").unwrap();
    writeln!(
        out,
        "  for (unsigned long steps = 0; steps < {}; steps++) {{",
        program.checksum_delay
    )
    .unwrap();
    writeln!(out, "    switch(current_state) {{").unwrap();
    for name in program.state_order() {
        let state = &program.states[name];
        write_case(
            &mut out,
            &indices,
            name,
            [state.action_for(0), state.action_for(1)],
        );
    }
    writeln!(out, "    }} //switch").unwrap();
    writeln!(out, "  }} //for").unwrap();
    writeln!(out, "}}; //run").unwrap();
    writeln!(out).unwrap();

    let total_steps = u64::from(program.checksum_delay) * 25;
    writeln!(out, "int main() {{").unwrap();
    writeln!(out, "  //Benchmark:").unwrap();
    writeln!(out, "  clock_t start_ts = clock();").unwrap();
    writeln!(out, "  for (int i=0; i<25; i++) {{").unwrap();
    writeln!(out, "    run();").unwrap();
    writeln!(out, "  }}").unwrap();
    writeln!(out, "  clock_t end_ts = clock();").unwrap();
    writeln!(out, "  double duration = end_ts - start_ts;").unwrap();
    writeln!(out, "  duration /= CLOCKS_PER_SEC;").unwrap();
    writeln!(out, "  duration *= 1000;").unwrap();
    writeln!(out, r#"  printf("Time per iteration: %lfms\n", duration/25);"#).unwrap();
    writeln!(
        out,
        r#"  printf("Total executed steps: {total_steps}\n");"#
    )
    .unwrap();
    writeln!(
        out,
        "  printf(\"%lf steps/ms\\n%lf us/steps\\n\", {total_steps}/ duration, 1000 * duration / {total_steps});"
    )
    .unwrap();
    writeln!(out, "//Actual execution:").unwrap();
    writeln!(out, "    memset(tape, 0, sizeof(tape));").unwrap();
    writeln!(out, "    run();").unwrap();
    writeln!(out, "  unsigned checksum = 0;").unwrap();
    writeln!(out, "  for (unsigned long i=0; i<sizeof(tape); i++) {{").unwrap();
    writeln!(out, "    checksum += tape[i];").unwrap();
    writeln!(out, "  }} //for").unwrap();
    writeln!(out, r#"  printf("Checksum: %i\n", checksum);"#).unwrap();
    writeln!(out, "  return 0;").unwrap();
    writeln!(out, "}} //main").unwrap();

    out
}
