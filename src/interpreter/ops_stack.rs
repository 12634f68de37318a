//! Stack manipulation semantics.
//!
//! The grouped shuffles delegate to the n-ary [`Stack`](super::stack::Stack)
//! helpers; this layer attaches the canonical opcode name to any underflow.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use super::error::ExecError;
use super::state::ExecutionState;
use crate::value::Value;

impl ExecutionState {
    pub(crate) fn op_to_alt_stack(&mut self) -> Result<(), ExecError> {
        let v = self.pop1("TOALTSTACK")?;
        self.alt.push(v);
        Ok(())
    }

    pub(crate) fn op_from_alt_stack(&mut self) -> Result<(), ExecError> {
        let v = self
            .alt
            .pop()
            .map_err(|e| ExecError::underflow("FROMALTSTACK", e))?;
        self.main.push(v);
        Ok(())
    }

    pub(crate) fn op_ifdup(&mut self) -> Result<(), ExecError> {
        self.require("IFDUP", 1)?;
        let top = self
            .main
            .peek()
            .map_err(|e| ExecError::underflow("IFDUP", e))?
            .clone();
        if !top.is_zero()? {
            self.main.push(top);
        }
        Ok(())
    }

    pub(crate) fn op_depth(&mut self) -> Result<(), ExecError> {
        let d = self.main.len();
        self.main.push(Value::Number(BigInt::from(d)));
        Ok(())
    }

    pub(crate) fn op_drop_n(&mut self, op: &'static str, n: usize) -> Result<(), ExecError> {
        self.main.drop_n(n).map_err(|e| ExecError::underflow(op, e))
    }

    pub(crate) fn op_dup_n(&mut self, op: &'static str, n: usize) -> Result<(), ExecError> {
        self.main.dup_n(n).map_err(|e| ExecError::underflow(op, e))
    }

    pub(crate) fn op_over_n(&mut self, op: &'static str, n: usize) -> Result<(), ExecError> {
        self.main.over_n(n).map_err(|e| ExecError::underflow(op, e))
    }

    pub(crate) fn op_rot_n(&mut self, op: &'static str, n: usize) -> Result<(), ExecError> {
        self.main.rot_n(n).map_err(|e| ExecError::underflow(op, e))
    }

    pub(crate) fn op_swap_n(&mut self, op: &'static str, n: usize) -> Result<(), ExecError> {
        self.main.swap_n(n).map_err(|e| ExecError::underflow(op, e))
    }

    pub(crate) fn op_nip(&mut self) -> Result<(), ExecError> {
        self.main
            .remove_at(1)
            .map_err(|e| ExecError::underflow("NIP", e))?;
        Ok(())
    }

    pub(crate) fn op_tuck(&mut self) -> Result<(), ExecError> {
        self.main.tuck().map_err(|e| ExecError::underflow("TUCK", e))
    }

    pub(crate) fn op_pick(&mut self) -> Result<(), ExecError> {
        let idx = self.pop_stack_index("PICK")?;
        let v = self
            .main
            .peek_at(idx)
            .map_err(|e| ExecError::underflow("PICK", e))?
            .clone();
        self.main.push(v);
        Ok(())
    }

    pub(crate) fn op_roll(&mut self) -> Result<(), ExecError> {
        let idx = self.pop_stack_index("ROLL")?;
        let v = self
            .main
            .remove_at(idx)
            .map_err(|e| ExecError::underflow("ROLL", e))?;
        self.main.push(v);
        Ok(())
    }

    /// Pop the depth operand for PICK/ROLL and bounds-check it against the
    /// remaining stack. A negative depth can never name an element.
    fn pop_stack_index(&mut self, op: &'static str) -> Result<usize, ExecError> {
        let n = self.pop1(op)?.to_number()?;
        let available = self.main.len();
        match n.to_usize() {
            Some(i) if i < available => Ok(i),
            Some(i) => Err(ExecError::StackUnderflow { opcode: op, required: i + 1, available }),
            None => Err(ExecError::StackUnderflow { opcode: op, required: available + 1, available }),
        }
    }
}
