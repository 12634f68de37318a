//! Flow control: conditionals and the VERIFY family tail.

use super::error::ExecError;
use super::state::{BranchFrame, ExecutionState};

impl ExecutionState {
    pub(crate) fn op_if(&mut self) -> Result<(), ExecError> {
        self.open_branch("IF", |taken| taken)
    }

    pub(crate) fn op_notif(&mut self) -> Result<(), ExecError> {
        self.open_branch("NOTIF", |taken| !taken)
    }

    fn open_branch(
        &mut self,
        op: &'static str,
        interpret: impl FnOnce(bool) -> bool,
    ) -> Result<(), ExecError> {
        let frame = if self.is_executing() {
            let cond = self.pop1(op)?;
            BranchFrame {
                taken: interpret(!cond.is_zero()?),
                else_seen: false,
            }
        } else {
            // Opened inside an untaken branch: the scope can never execute
            // and must not consume a condition value.
            BranchFrame { taken: false, else_seen: false }
        };
        self.frames.push(frame);
        Ok(())
    }

    pub(crate) fn op_else(&mut self) -> Result<(), ExecError> {
        let frame = self.frames.last_mut().ok_or(ExecError::ElseWithoutIf)?;
        if frame.else_seen {
            return Err(ExecError::ElseWithoutIf);
        }
        frame.taken = !frame.taken;
        frame.else_seen = true;
        Ok(())
    }

    /// Close the innermost conditional scope. With no scope open there is
    /// nothing to clear and the instruction is a no-op.
    pub(crate) fn op_endif(&mut self) -> Result<(), ExecError> {
        self.frames.pop();
        Ok(())
    }

    pub(crate) fn op_verify(&mut self) -> Result<(), ExecError> {
        self.verify_top("VERIFY")
    }

    /// Shared tail of every VERIFY-family opcode: pop the result just
    /// produced and fail unless it is non-zero.
    pub(crate) fn verify_top(&mut self, op: &'static str) -> Result<(), ExecError> {
        let v = self.pop1(op)?;
        if v.is_zero()? {
            return Err(ExecError::VerificationFailed(op));
        }
        Ok(())
    }
}
