//! Interpreter state and the canonical opcode dispatch.

use num_bigint::BigInt;
use num_traits::Zero;

use super::error::ExecError;
use super::stack::Stack;
use crate::opcode::Opcode;
use crate::value::Value;

/// One open conditional scope.
///
/// Pushed on IF/NOTIF, toggled on ELSE, popped on ENDIF. Execution
/// continues only while every open frame is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchFrame {
    pub taken: bool,
    pub else_seen: bool,
}

/// The full machine state threaded from instruction to instruction.
///
/// State is a value: [`apply`] clones it, transforms the clone, and returns
/// it, so a failed transition leaves the caller's state untouched and the
/// last-good snapshot stays renderable. Opcode bodies never mutate shared
/// state in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionState {
    pub main: Stack,
    pub alt: Stack,
    pub(crate) frames: Vec<BranchFrame>,
}

/// Apply a single canonical opcode, returning the successor state.
pub fn apply(state: &ExecutionState, op: &Opcode) -> Result<ExecutionState, ExecError> {
    let mut next = state.clone();
    next.dispatch(op)?;
    Ok(next)
}

impl ExecutionState {
    /// Seed a fresh state from initial stack contents (bottom-to-top).
    pub fn new(main: Vec<Value>, alt: Vec<Value>) -> Self {
        ExecutionState {
            main: Stack::from_values(main),
            alt: Stack::from_values(alt),
            frames: Vec::new(),
        }
    }

    /// True while every open conditional frame is taken (or none is open).
    pub fn is_executing(&self) -> bool {
        self.frames.iter().all(|f| f.taken)
    }

    /// Number of conditional scopes currently open.
    pub fn open_conditionals(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn dispatch(&mut self, op: &Opcode) -> Result<(), ExecError> {
        match op {
            Opcode::Num(n) => {
                self.main.push(Value::Number(BigInt::from(*n)));
                Ok(())
            }
            Opcode::PushBytes(v) => {
                self.main.push(Value::Number(v.clone()));
                Ok(())
            }
            Opcode::Nop => Ok(()),

            Opcode::If => self.op_if(),
            Opcode::NotIf => self.op_notif(),
            Opcode::Else => self.op_else(),
            Opcode::EndIf => self.op_endif(),
            Opcode::Verify => self.op_verify(),

            Opcode::ToAltStack => self.op_to_alt_stack(),
            Opcode::FromAltStack => self.op_from_alt_stack(),
            Opcode::IfDup => self.op_ifdup(),
            Opcode::Depth => self.op_depth(),
            Opcode::Drop => self.op_drop_n("DROP", 1),
            Opcode::TwoDrop => self.op_drop_n("2DROP", 2),
            Opcode::Dup => self.op_dup_n("DUP", 1),
            Opcode::TwoDup => self.op_dup_n("2DUP", 2),
            Opcode::ThreeDup => self.op_dup_n("3DUP", 3),
            Opcode::Nip => self.op_nip(),
            Opcode::Over => self.op_over_n("OVER", 1),
            Opcode::TwoOver => self.op_over_n("2OVER", 2),
            Opcode::Pick => self.op_pick(),
            Opcode::Roll => self.op_roll(),
            Opcode::Rot => self.op_rot_n("ROT", 1),
            Opcode::TwoRot => self.op_rot_n("2ROT", 2),
            Opcode::Swap => self.op_swap_n("SWAP", 1),
            Opcode::TwoSwap => self.op_swap_n("2SWAP", 2),
            Opcode::Tuck => self.op_tuck(),

            Opcode::Cat => self.op_cat(),
            Opcode::Equal => self.op_equal(),
            Opcode::EqualVerify => self.op_equalverify(),

            Opcode::Add1 => self.op_unary_num("1ADD", |n| n + 1),
            Opcode::Sub1 => self.op_unary_num("1SUB", |n| n - 1),
            Opcode::Negate => self.op_unary_num("NEGATE", |n| -n),
            Opcode::Abs => self.op_abs(),
            Opcode::Not => self.op_not(),
            Opcode::ZeroNotEqual => self.op_zero_not_equal(),
            Opcode::Add => self.op_binary_num("ADD", |b, a| b + a),
            Opcode::Sub => self.op_binary_num("SUB", |b, a| b - a),
            Opcode::Mul => self.op_binary_num("MUL", |b, a| b * a),
            Opcode::Div => self.op_div(),
            Opcode::Mod => self.op_mod(),
            Opcode::BoolAnd => self.op_bool_binop("BOOLAND", |b, a| !b.is_zero() && !a.is_zero()),
            Opcode::BoolOr => self.op_bool_binop("BOOLOR", |b, a| !b.is_zero() || !a.is_zero()),
            Opcode::NumEqual => self.op_bool_binop("NUMEQUAL", |b, a| b == a),
            Opcode::NumEqualVerify => self.op_numequalverify(),
            Opcode::NumNotEqual => self.op_bool_binop("NUMNOTEQUAL", |b, a| b != a),
            Opcode::LessThan => self.op_bool_binop("LESSTHAN", |b, a| b < a),
            Opcode::GreaterThan => self.op_bool_binop("GREATERTHAN", |b, a| b > a),
            Opcode::LessThanOrEqual => self.op_bool_binop("LESSTHANOREQUAL", |b, a| b <= a),
            Opcode::GreaterThanOrEqual => {
                self.op_bool_binop("GREATERTHANOREQUAL", |b, a| b >= a)
            }
            Opcode::Min => self.op_binary_num("MIN", |b, a| if b < a { b } else { a }),
            Opcode::Max => self.op_binary_num("MAX", |b, a| if b > a { b } else { a }),
            Opcode::Within => self.op_within(),

            Opcode::Hash => self.op_hash(),
            Opcode::CheckSig => self.op_checksig("CHECKSIG"),
            Opcode::CheckSigVerify => self.op_checksigverify(),
            Opcode::CheckSigAdd => self.op_checksigadd(),
            Opcode::CheckMultiSig => self.op_checkmultisig("CHECKMULTISIG"),
            Opcode::CheckMultiSigVerify => self.op_checkmultisigverify(),
        }
    }

    /// Up-front arity check for fixed-arity opcodes on the main stack.
    pub(crate) fn require(&self, op: &'static str, required: usize) -> Result<(), ExecError> {
        let available = self.main.len();
        if available < required {
            return Err(ExecError::StackUnderflow { opcode: op, required, available });
        }
        Ok(())
    }

    pub(crate) fn pop1(&mut self, op: &'static str) -> Result<Value, ExecError> {
        self.require(op, 1)?;
        self.main.pop().map_err(|e| ExecError::underflow(op, e))
    }

    /// Pop two operands; returns `(a, b)` where `a` was the top and `b` the
    /// second. Binary ops use `b` as the left operand.
    pub(crate) fn pop2(&mut self, op: &'static str) -> Result<(Value, Value), ExecError> {
        self.require(op, 2)?;
        let a = self.main.pop().map_err(|e| ExecError::underflow(op, e))?;
        let b = self.main.pop().map_err(|e| ExecError::underflow(op, e))?;
        Ok((a, b))
    }
}
