//! The execution driver.
//!
//! A [`Thread`] owns one block's state and steps it line by line: blank and
//! comment lines are skipped outright, every other line is normalized,
//! gated on the open conditional scopes, applied, and rendered. The first
//! failed transition halts the block; the state from before the failure is
//! kept so earlier snapshots stay valid.

use tracing::{debug, trace};

use super::state::{apply, ExecutionState};
use super::{Outcome, Snapshot};
use crate::opcode::normalize;

/// Drives one instruction block to completion.
pub struct Thread {
    state: ExecutionState,
    halted: bool,
}

impl Thread {
    pub fn new(initial: ExecutionState) -> Self {
        Thread { state: initial, halted: false }
    }

    /// The state after the last successful transition.
    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// True once a transition has failed; further lines are ignored.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Run every line of the block, producing one outcome per instruction
    /// line. The sequence is truncated at the first failure.
    pub fn run<I, S>(&mut self, lines: I) -> Vec<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut outcomes = Vec::new();
        for line in lines {
            if self.halted {
                break;
            }
            if let Some(outcome) = self.step(line.as_ref()) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Process a single source line. Blank and comment lines produce no
    /// outcome and consume no state transition.
    pub fn step(&mut self, line: &str) -> Option<Outcome> {
        let token = line.trim();
        if token.is_empty() || is_comment(token) || self.halted {
            return None;
        }
        Some(self.exec_token(token))
    }

    fn exec_token(&mut self, token: &str) -> Outcome {
        let op = match normalize(token) {
            Ok(Some(op)) => op,
            Ok(None) => {
                // Unmodeled mnemonics are deliberately permissive no-ops.
                trace!(token, "unmodeled mnemonic, treated as no-op");
                return Outcome::Rendered(Snapshot::capture(&self.state));
            }
            Err(e) => return self.fail(e),
        };

        if !op.is_conditional() && !self.state.is_executing() {
            trace!(token, "skipped inside untaken branch");
            return Outcome::Rendered(Snapshot::capture(&self.state));
        }

        trace!(token, opcode = op.name(), "executing");
        match apply(&self.state, &op) {
            Ok(next) => {
                self.state = next;
                Outcome::Rendered(Snapshot::capture(&self.state))
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, e: super::error::ExecError) -> Outcome {
        debug!(error = %e, "instruction block halted");
        self.halted = true;
        Outcome::Failed(e)
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::error::ExecError;
    use crate::value::Value;

    fn initial(values: &[i64]) -> ExecutionState {
        ExecutionState::new(values.iter().copied().map(Value::number).collect(), vec![])
    }

    fn rendered_main(outcome: &Outcome) -> &str {
        match outcome {
            Outcome::Rendered(s) => &s.main,
            Outcome::Failed(e) => panic!("expected a rendered outcome, got error: {e}"),
        }
    }

    #[test]
    fn blank_and_comment_lines_produce_no_outcome() {
        let mut thread = Thread::new(initial(&[1]));
        let outcomes = thread.run(["", "   ", "# setup", "// note", "OP_DUP"]);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(rendered_main(&outcomes[0]), "[1, 1]");
    }

    #[test]
    fn unknown_mnemonic_is_a_noop() {
        let mut thread = Thread::new(initial(&[4]));
        let outcomes = thread.run(["OP_FROBNICATE"]);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(rendered_main(&outcomes[0]), "[4]");
        assert!(!thread.is_halted());
    }

    #[test]
    fn failure_halts_the_block_and_keeps_state() {
        let mut thread = Thread::new(initial(&[]));
        let outcomes = thread.run(["OP_1", "OP_ADD", "OP_DUP"]);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[1],
            Outcome::Failed(ExecError::StackUnderflow {
                opcode: "ADD",
                required: 2,
                available: 1
            })
        );
        assert!(thread.is_halted());
        // The state before the failed transition is still renderable.
        assert_eq!(thread.state().main.to_display_string(), "[1]");
        // Further stepping is refused.
        assert_eq!(thread.step("OP_DUP"), None);
    }

    #[test]
    fn oversized_literal_fails_the_line() {
        let token = format!("0x1{}", "0".repeat(1040));
        let mut thread = Thread::new(initial(&[]));
        let outcomes = thread.run([token.as_str()]);
        assert_eq!(
            outcomes[0],
            Outcome::Failed(ExecError::UnrecognizedLiteral(token))
        );
    }

    #[test]
    fn untaken_branch_lines_render_the_prior_snapshot() {
        let mut thread = Thread::new(initial(&[7, 0]));
        let outcomes = thread.run(["OP_IF", "OP_DROP", "OP_DROP", "OP_ENDIF"]);
        assert_eq!(rendered_main(&outcomes[0]), "[7]");
        // Both drops are skipped: the snapshot carries forward unchanged.
        assert_eq!(rendered_main(&outcomes[1]), "[7]");
        assert_eq!(rendered_main(&outcomes[2]), "[7]");
        assert_eq!(rendered_main(&outcomes[3]), "[7]");
    }

    #[test]
    fn taken_and_else_branches() {
        let mut thread = Thread::new(initial(&[1]));
        let outcomes = thread.run(["OP_IF", "OP_2", "OP_ELSE", "OP_3", "OP_ENDIF"]);
        let last = outcomes.last().unwrap();
        assert_eq!(rendered_main(last), "[2]");

        let mut thread = Thread::new(initial(&[0]));
        let outcomes = thread.run(["OP_IF", "OP_2", "OP_ELSE", "OP_3", "OP_ENDIF"]);
        let last = outcomes.last().unwrap();
        assert_eq!(rendered_main(last), "[3]");
    }

    #[test]
    fn nested_conditionals_restore_the_outer_scope() {
        let mut thread = Thread::new(initial(&[1, 0]));
        let outcomes = thread.run([
            "OP_IF",    // outer: untaken
            "OP_IF",    // inner: consumes nothing
            "OP_15",
            "OP_ENDIF", // closes inner
            "OP_16",
            "OP_ENDIF", // closes outer
            "OP_DUP",   // executes again
        ]);
        let last = outcomes.last().unwrap();
        assert_eq!(rendered_main(last), "[1, 1]");
    }

    #[test]
    fn else_without_if_fails_regardless_of_stack() {
        let mut thread = Thread::new(initial(&[9, 9, 9]));
        let outcomes = thread.run(["OP_ELSE"]);
        assert_eq!(outcomes[0], Outcome::Failed(ExecError::ElseWithoutIf));
    }
}
