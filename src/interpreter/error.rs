//! Interpreter error taxonomy.
//!
//! Every failure is recoverable at the block level: it terminates the
//! current block's remaining instructions and surfaces as the terminal
//! outcome, never as a panic. Ops detect precondition failures before
//! touching state, and the driver returns the original state alongside the
//! error, so the last-good snapshot stays valid.

/// Underflow raised by the stack container itself, without opcode context.
///
/// `required` is the full arity of the operation that was attempted, not
/// the size of the single access that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stack underflow: needs {required} item(s), found {available}")]
pub struct StackError {
    pub required: usize,
    pub available: usize,
}

/// A failed instruction transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    /// An opcode needed more stack items than were available.
    #[error("{opcode}: needs {required} stack item(s), found {available}")]
    StackUnderflow {
        opcode: &'static str,
        required: usize,
        available: usize,
    },

    /// A text value reached an arithmetic opcode without parsing as a number.
    #[error("cannot interpret '{0}' as a number")]
    NotANumber(String),

    /// A VERIFY-family opcode popped a zero result. This is the simulated
    /// script failing on its own terms, not an interpreter fault.
    #[error("{0} failed")]
    VerificationFailed(&'static str),

    /// ELSE encountered with no open conditional scope, or after the open
    /// scope already saw its ELSE.
    #[error("ELSE with no matching IF or NOTIF")]
    ElseWithoutIf,

    /// A multisig-family count popped from the stack declared more operands
    /// than the stack holds (or was negative).
    #[error("{opcode}: declared operand count {declared} exceeds {available} available stack item(s)")]
    InsufficientDeclaredOperands {
        opcode: &'static str,
        declared: i64,
        available: usize,
    },

    /// A numeric literal outside the representable magnitude bound.
    #[error("numeric literal '{0}' is outside the representable range")]
    UnrecognizedLiteral(String),

    /// DIV or MOD with a zero divisor.
    #[error("division by zero")]
    DivideByZero,
}

impl ExecError {
    /// Attach the executing opcode's name to a container-level underflow.
    pub(crate) fn underflow(opcode: &'static str, e: StackError) -> Self {
        ExecError::StackUnderflow {
            opcode,
            required: e.required,
            available: e.available,
        }
    }
}

impl serde::Serialize for ExecError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
