//! Step-through tracer for Bitcoin-style scripts.
//!
//! Executes an instruction block against two value stacks and yields one
//! rendered stack snapshot (or one terminal error) per instruction line,
//! so an editor can show the machine state next to every instruction.
//!
//! # Example
//!
//! ```
//! use script_trace::{header, Engine, ExecutionState};
//!
//! let (main, alt) = header::parse_initial_stacks("[3,4]").unwrap();
//! let outcomes = Engine::new().execute(ExecutionState::new(main, alt), ["OP_DUP", "OP_ADD"]);
//! assert_eq!(outcomes.len(), 2);
//! assert_eq!(outcomes[1].to_string(), "main=[3, 8], alt=[]");
//! ```

pub mod header;
pub mod interpreter;
pub mod opcode;
pub mod value;

pub use interpreter::{apply, Engine, ExecError, ExecutionState, Outcome, Snapshot, Stack, Thread};
pub use opcode::{normalize, Opcode};
pub use value::Value;
