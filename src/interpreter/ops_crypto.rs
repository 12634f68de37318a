//! Simulated crypto semantics.
//!
//! Nothing here hashes or verifies anything. The hash family tags the top
//! value so the trace shows that a digest would exist, and the signature
//! family pops the operands a real validator would consume and reports
//! success, which keeps standard script templates steppable without keys.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive};

use super::error::ExecError;
use super::state::ExecutionState;
use crate::value::Value;

impl ExecutionState {
    pub(crate) fn op_hash(&mut self) -> Result<(), ExecError> {
        let v = self.pop1("HASH")?;
        self.main.push(Value::Text(format!("Hash({})", v)));
        Ok(())
    }

    pub(crate) fn op_checksig(&mut self, op: &'static str) -> Result<(), ExecError> {
        self.require(op, 2)?;
        let _pubkey = self.pop1(op)?;
        let _sig = self.pop1(op)?;
        self.main.push(Value::from_bool(true));
        Ok(())
    }

    pub(crate) fn op_checksigverify(&mut self) -> Result<(), ExecError> {
        self.op_checksig("CHECKSIGVERIFY")?;
        self.verify_top("CHECKSIGVERIFY")
    }

    pub(crate) fn op_checksigadd(&mut self) -> Result<(), ExecError> {
        self.require("CHECKSIGADD", 3)?;
        let _pubkey = self.pop1("CHECKSIGADD")?;
        let count = self.pop1("CHECKSIGADD")?.to_number()?;
        let _sig = self.pop1("CHECKSIGADD")?;
        self.main.push(Value::Number(count + BigInt::one()));
        Ok(())
    }

    pub(crate) fn op_checkmultisig(&mut self, op: &'static str) -> Result<(), ExecError> {
        let key_count = self.pop1(op)?;
        let _keys = self.pop_counted(op, &key_count)?;
        let sig_count = self.pop1(op)?;
        let _sigs = self.pop_counted(op, &sig_count)?;
        // The extra dummy element the multisig convention consumes.
        self.pop1(op)?;
        self.main.push(Value::from_bool(true));
        Ok(())
    }

    pub(crate) fn op_checkmultisigverify(&mut self) -> Result<(), ExecError> {
        self.op_checkmultisig("CHECKMULTISIGVERIFY")?;
        self.verify_top("CHECKMULTISIGVERIFY")
    }

    /// Pop as many operands as a popped count declared. A count the stack
    /// cannot satisfy (too large or negative) is a script error distinct
    /// from plain underflow.
    fn pop_counted(&mut self, op: &'static str, count: &Value) -> Result<Vec<Value>, ExecError> {
        let n = count.to_number()?;
        let available = self.main.len();
        let declared = n
            .to_i64()
            .unwrap_or(if n.is_negative() { i64::MIN } else { i64::MAX });
        let k = match n.to_usize() {
            Some(k) if k <= available => k,
            _ => {
                return Err(ExecError::InsufficientDeclaredOperands { opcode: op, declared, available })
            }
        };
        let mut items = Vec::with_capacity(k);
        for _ in 0..k {
            items.push(self.main.pop().map_err(|e| ExecError::underflow(op, e))?);
        }
        Ok(items)
    }
}
