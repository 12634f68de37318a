//! Arithmetic and comparison semantics.
//!
//! Binary ops pop `a` (top) then `b` (second) and use `b` as the left
//! operand, so `SUB` pushes `b - a`. Operands funnel through
//! [`Value::to_number`]; a non-numeric text value fails the transition.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use super::error::ExecError;
use super::state::ExecutionState;
use crate::value::Value;

impl ExecutionState {
    pub(crate) fn op_unary_num(
        &mut self,
        op: &'static str,
        f: impl FnOnce(BigInt) -> BigInt,
    ) -> Result<(), ExecError> {
        let n = self.pop1(op)?.to_number()?;
        self.main.push(Value::Number(f(n)));
        Ok(())
    }

    pub(crate) fn op_binary_num(
        &mut self,
        op: &'static str,
        f: impl FnOnce(BigInt, BigInt) -> BigInt,
    ) -> Result<(), ExecError> {
        let (a, b) = self.pop2(op)?;
        let a = a.to_number()?;
        let b = b.to_number()?;
        self.main.push(Value::Number(f(b, a)));
        Ok(())
    }

    pub(crate) fn op_bool_binop(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&BigInt, &BigInt) -> bool,
    ) -> Result<(), ExecError> {
        let (a, b) = self.pop2(op)?;
        let a = a.to_number()?;
        let b = b.to_number()?;
        self.main.push(Value::from_bool(f(&b, &a)));
        Ok(())
    }

    pub(crate) fn op_abs(&mut self) -> Result<(), ExecError> {
        self.op_unary_num("ABS", |n| n.abs())
    }

    pub(crate) fn op_not(&mut self) -> Result<(), ExecError> {
        let n = self.pop1("NOT")?.to_number()?;
        self.main.push(Value::from_bool(n.is_zero()));
        Ok(())
    }

    pub(crate) fn op_zero_not_equal(&mut self) -> Result<(), ExecError> {
        let n = self.pop1("0NOTEQUAL")?.to_number()?;
        self.main.push(Value::from_bool(!n.is_zero()));
        Ok(())
    }

    pub(crate) fn op_div(&mut self) -> Result<(), ExecError> {
        let (a, b) = self.pop2("DIV")?;
        let a = a.to_number()?;
        let b = b.to_number()?;
        if a.is_zero() {
            return Err(ExecError::DivideByZero);
        }
        // BigInt division truncates toward zero.
        self.main.push(Value::Number(b / a));
        Ok(())
    }

    pub(crate) fn op_mod(&mut self) -> Result<(), ExecError> {
        let (a, b) = self.pop2("MOD")?;
        let a = a.to_number()?;
        let b = b.to_number()?;
        if a.is_zero() {
            return Err(ExecError::DivideByZero);
        }
        self.main.push(Value::Number(b % a));
        Ok(())
    }

    pub(crate) fn op_numequalverify(&mut self) -> Result<(), ExecError> {
        self.op_bool_binop("NUMEQUALVERIFY", |b, a| b == a)?;
        self.verify_top("NUMEQUALVERIFY")
    }

    pub(crate) fn op_within(&mut self) -> Result<(), ExecError> {
        self.require("WITHIN", 3)?;
        let max = self.pop1("WITHIN")?.to_number()?;
        let min = self.pop1("WITHIN")?.to_number()?;
        let x = self.pop1("WITHIN")?.to_number()?;
        self.main.push(Value::from_bool(min <= x && x < max));
        Ok(())
    }

    pub(crate) fn op_equal(&mut self) -> Result<(), ExecError> {
        let (a, b) = self.pop2("EQUAL")?;
        self.main.push(Value::from_bool(b == a));
        Ok(())
    }

    pub(crate) fn op_equalverify(&mut self) -> Result<(), ExecError> {
        self.op_equal()?;
        self.verify_top("EQUALVERIFY")
    }

    pub(crate) fn op_cat(&mut self) -> Result<(), ExecError> {
        let (a, b) = self.pop2("CAT")?;
        self.main.push(Value::Text(format!("{}{}", b, a)));
        Ok(())
    }
}
