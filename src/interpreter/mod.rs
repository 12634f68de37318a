//! The script stack machine.
//!
//! Executes an instruction block against a pair of value stacks and yields
//! one [`Outcome`] per instruction line: a rendered snapshot of both stacks
//! after a successful transition, or the terminal error that halted the
//! block.
//!
//! # Architecture
//!
//! Execution is pure and synchronous. [`apply`] is copy-on-transition:
//! every opcode produces a new [`ExecutionState`] and never mutates its
//! input, so the last successfully rendered snapshot stays valid after a
//! later step fails. Blocks are independent; callers may evaluate them in
//! parallel as long as each block owns its own state. The engine holds no
//! state between invocations — re-running a block restarts it from its
//! initial stacks.
//!
//! # Example
//!
//! ```
//! use script_trace::interpreter::{Engine, ExecutionState};
//! use script_trace::Value;
//!
//! let initial = ExecutionState::new(vec![Value::number(3), Value::number(4)], vec![]);
//! let outcomes = Engine::new().execute(initial, ["OP_ADD"]);
//! assert_eq!(outcomes[0].to_string(), "main=[7], alt=[]");
//! ```

pub mod error;
pub mod stack;
pub mod state;
pub mod thread;

mod ops_arithmetic;
mod ops_crypto;
mod ops_flow;
mod ops_stack;

use std::fmt;

use serde::Serialize;

pub use error::{ExecError, StackError};
pub use stack::Stack;
pub use state::{apply, BranchFrame, ExecutionState};
pub use thread::Thread;

/// The rendered contents of both stacks after one instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Main stack, rendered bottom-to-top, e.g. `[3, 4, 1]`.
    pub main: String,
    /// Alt stack, same rendering.
    pub alt: String,
}

impl Snapshot {
    pub fn capture(state: &ExecutionState) -> Self {
        Snapshot {
            main: state.main.to_display_string(),
            alt: state.alt.to_display_string(),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "main={}, alt={}", self.main, self.alt)
    }
}

/// The per-instruction result the editor renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum Outcome {
    /// The instruction executed (or was skipped); both stacks rendered.
    Rendered(Snapshot),
    /// The transition failed; this is the block's final outcome.
    Failed(ExecError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Rendered(s) => write!(f, "{}", s),
            Outcome::Failed(e) => write!(f, "{}", e),
        }
    }
}

/// The one-call execution surface.
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Engine
    }

    /// Execute one instruction block from its initial state.
    ///
    /// Produces one outcome per non-blank, non-comment line, truncated at
    /// the first failure.
    pub fn execute<I, S>(&self, initial: ExecutionState, lines: I) -> Vec<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Thread::new(initial).run(lines)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn initial(values: &[i64]) -> ExecutionState {
        ExecutionState::new(values.iter().copied().map(Value::number).collect(), vec![])
    }

    fn snapshots(outcomes: &[Outcome]) -> Vec<String> {
        outcomes.iter().map(|o| o.to_string()).collect()
    }

    #[test]
    fn worked_example_from_the_domain_documentation() {
        let engine = Engine::new();
        let outcomes = engine.execute(
            initial(&[3, 4]),
            [
                "OP_DUP",
                "OP_ADD",
                "256",
                "OP_2DUP",
                "OP_GREATERTHANOREQUAL",
                "OP_IF",
                "OP_SUB",
                "1",
                "OP_ELSE",
                "OP_DROP",
                "0",
                "OP_ENDIF",
            ],
        );

        assert_eq!(outcomes.len(), 12);
        assert!(outcomes.iter().all(|o| !o.is_failure()));
        // The intermediate snapshot after OP_ADD.
        assert_eq!(outcomes[1].to_string(), "main=[3, 8], alt=[]");
        // 8 >= 256 is false, so the ELSE branch drops 256 and pushes 0.
        assert_eq!(outcomes[4].to_string(), "main=[3, 8, 256, 0], alt=[]");
        assert_eq!(outcomes.last().unwrap().to_string(), "main=[3, 8, 0], alt=[]");
    }

    #[test]
    fn verify_success_and_failure() {
        let engine = Engine::new();

        let outcomes = engine.execute(initial(&[5]), ["OP_VERIFY"]);
        assert_eq!(outcomes[0].to_string(), "main=[], alt=[]");

        let outcomes = engine.execute(initial(&[0]), ["OP_VERIFY"]);
        assert_eq!(
            outcomes[0],
            Outcome::Failed(ExecError::VerificationFailed("VERIFY"))
        );
    }

    #[test]
    fn hash_spellings_all_tag_the_top_value() {
        let engine = Engine::new();
        for spelling in ["OP_SHA256", "OP_HASH160", "OP_RIPEMD160"] {
            let outcomes = engine.execute(initial(&[9]), [spelling]);
            assert_eq!(outcomes[0].to_string(), "main=[Hash(9)], alt=[]", "{spelling}");
        }
    }

    #[test]
    fn ignorable_spellings_leave_the_stack_alone() {
        let engine = Engine::new();
        let outcomes = engine.execute(
            initial(&[2]),
            ["OP_CHECKLOCKTIMEVERIFY", "OP_CODESEPARATOR", "OP_PUSHDATA2"],
        );
        assert_eq!(
            snapshots(&outcomes),
            vec!["main=[2], alt=[]"; 3]
        );
    }

    #[test]
    fn alt_stack_appears_in_snapshots() {
        let engine = Engine::new();
        let outcomes = engine.execute(initial(&[1, 2]), ["OP_TOALTSTACK"]);
        assert_eq!(outcomes[0].to_string(), "main=[1], alt=[2]");
    }

    #[test]
    fn p2pkh_shape_is_steppable_without_keys() {
        // The expected pubkey hash arrives via the initial stack, since
        // instruction lines only push numeric literals.
        let initial = ExecutionState::new(
            vec![
                Value::text("sig"),
                Value::text("pubkey"),
                Value::text("Hash(pubkey)"),
            ],
            vec![],
        );
        let outcomes = Engine::new().execute(
            initial,
            ["OP_OVER", "OP_HASH160", "OP_EQUALVERIFY", "OP_CHECKSIG"],
        );
        assert_eq!(
            snapshots(&outcomes),
            vec![
                "main=[sig, pubkey, Hash(pubkey), pubkey], alt=[]",
                "main=[sig, pubkey, Hash(pubkey), Hash(pubkey)], alt=[]",
                "main=[sig, pubkey], alt=[]",
                "main=[1], alt=[]",
            ]
        );
    }

    #[test]
    fn block_output_truncates_at_first_failure() {
        let outcomes = Engine::new().execute(initial(&[]), ["OP_0", "OP_VERIFY", "OP_1", "OP_1"]);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[1].is_failure());
    }

    #[test]
    fn outcomes_serialize_for_the_editor_boundary() {
        let rendered = Outcome::Rendered(Snapshot {
            main: "[3, 8]".to_string(),
            alt: "[]".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&rendered).unwrap(),
            serde_json::json!({
                "status": "rendered",
                "detail": { "main": "[3, 8]", "alt": "[]" }
            })
        );

        let failed = Outcome::Failed(ExecError::VerificationFailed("VERIFY"));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({ "status": "failed", "detail": "VERIFY failed" })
        );
    }
}
