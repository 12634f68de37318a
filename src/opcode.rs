//! Canonical opcode set and the instruction-token normalizer.
//!
//! Dozens of concrete spellings collapse into the closed [`Opcode`] enum:
//! decode-ignorable opcodes become `Nop`, the hash family becomes `Hash`,
//! named constants and bare numeric literals become the immediate-carrying
//! push variants, and everything else is matched against the canonical
//! mnemonic table. Dispatch is an exhaustive pattern match, never a
//! string-keyed lookup.

use num_bigint::BigInt;

use crate::interpreter::error::ExecError;
use crate::value::parse_number;

/// Largest magnitude a numeric literal may carry, in bits.
pub const MAX_LITERAL_BITS: u64 = 4160;

/// A canonical opcode, after alias collapsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opcode {
    /// Push a named numeric constant (`OP_0`..`OP_16`, `OP_1NEGATE`).
    Num(i64),
    /// Push the value of a bare numeric literal.
    PushBytes(BigInt),
    Nop,

    // Flow control
    If,
    NotIf,
    Else,
    EndIf,
    Verify,

    // Stack manipulation
    ToAltStack,
    FromAltStack,
    IfDup,
    Depth,
    Drop,
    Dup,
    Nip,
    Over,
    Pick,
    Roll,
    Rot,
    Swap,
    Tuck,
    TwoDrop,
    TwoDup,
    ThreeDup,
    TwoOver,
    TwoRot,
    TwoSwap,

    // Splice
    Cat,

    // Structural equality
    Equal,
    EqualVerify,

    // Arithmetic and comparison
    Add1,
    Sub1,
    Negate,
    Abs,
    Not,
    ZeroNotEqual,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BoolAnd,
    BoolOr,
    NumEqual,
    NumEqualVerify,
    NumNotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    Min,
    Max,
    Within,

    // Simulated crypto
    Hash,
    CheckSig,
    CheckSigVerify,
    CheckSigAdd,
    CheckMultiSig,
    CheckMultiSigVerify,
}

impl Opcode {
    /// Canonical name, used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Num(_) => "PUSHNUMBER",
            Opcode::PushBytes(_) => "PUSHBYTES",
            Opcode::Nop => "NOP",
            Opcode::If => "IF",
            Opcode::NotIf => "NOTIF",
            Opcode::Else => "ELSE",
            Opcode::EndIf => "ENDIF",
            Opcode::Verify => "VERIFY",
            Opcode::ToAltStack => "TOALTSTACK",
            Opcode::FromAltStack => "FROMALTSTACK",
            Opcode::IfDup => "IFDUP",
            Opcode::Depth => "DEPTH",
            Opcode::Drop => "DROP",
            Opcode::Dup => "DUP",
            Opcode::Nip => "NIP",
            Opcode::Over => "OVER",
            Opcode::Pick => "PICK",
            Opcode::Roll => "ROLL",
            Opcode::Rot => "ROT",
            Opcode::Swap => "SWAP",
            Opcode::Tuck => "TUCK",
            Opcode::TwoDrop => "2DROP",
            Opcode::TwoDup => "2DUP",
            Opcode::ThreeDup => "3DUP",
            Opcode::TwoOver => "2OVER",
            Opcode::TwoRot => "2ROT",
            Opcode::TwoSwap => "2SWAP",
            Opcode::Cat => "CAT",
            Opcode::Equal => "EQUAL",
            Opcode::EqualVerify => "EQUALVERIFY",
            Opcode::Add1 => "1ADD",
            Opcode::Sub1 => "1SUB",
            Opcode::Negate => "NEGATE",
            Opcode::Abs => "ABS",
            Opcode::Not => "NOT",
            Opcode::ZeroNotEqual => "0NOTEQUAL",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::BoolAnd => "BOOLAND",
            Opcode::BoolOr => "BOOLOR",
            Opcode::NumEqual => "NUMEQUAL",
            Opcode::NumEqualVerify => "NUMEQUALVERIFY",
            Opcode::NumNotEqual => "NUMNOTEQUAL",
            Opcode::LessThan => "LESSTHAN",
            Opcode::GreaterThan => "GREATERTHAN",
            Opcode::LessThanOrEqual => "LESSTHANOREQUAL",
            Opcode::GreaterThanOrEqual => "GREATERTHANOREQUAL",
            Opcode::Min => "MIN",
            Opcode::Max => "MAX",
            Opcode::Within => "WITHIN",
            Opcode::Hash => "HASH",
            Opcode::CheckSig => "CHECKSIG",
            Opcode::CheckSigVerify => "CHECKSIGVERIFY",
            Opcode::CheckSigAdd => "CHECKSIGADD",
            Opcode::CheckMultiSig => "CHECKMULTISIG",
            Opcode::CheckMultiSigVerify => "CHECKMULTISIGVERIFY",
        }
    }

    /// Flow-control opcodes dispatch even inside an untaken branch.
    pub fn is_conditional(&self) -> bool {
        matches!(
            self,
            Opcode::If | Opcode::NotIf | Opcode::Else | Opcode::EndIf
        )
    }
}

/// Normalize a raw instruction token to its canonical opcode.
///
/// Returns `Ok(None)` for tokens that match no canonical entry; the driver
/// treats those as no-ops. The only error is a numeric-looking literal
/// whose magnitude exceeds [`MAX_LITERAL_BITS`].
pub fn normalize(token: &str) -> Result<Option<Opcode>, ExecError> {
    // Decode-ignorable spellings.
    if matches!(
        token,
        "OP_CHECKLOCKTIMEVERIFY"
            | "OP_CHECKSEQUENCEVERIFY"
            | "OP_PUSHDATA1"
            | "OP_PUSHDATA2"
            | "OP_PUSHDATA4"
            | "OP_CODESEPARATOR"
    ) {
        return Ok(Some(Opcode::Nop));
    }

    // The hash family collapses to the one simulated transform.
    if matches!(
        token,
        "OP_RIPEMD160" | "OP_SHA1" | "OP_SHA256" | "OP_HASH160" | "OP_HASH256"
    ) {
        return Ok(Some(Opcode::Hash));
    }

    // Named numeric constants.
    match token {
        "OP_FALSE" => return Ok(Some(Opcode::Num(0))),
        "OP_TRUE" => return Ok(Some(Opcode::Num(1))),
        "OP_1NEGATE" => return Ok(Some(Opcode::Num(-1))),
        _ => {}
    }
    if let Some(rest) = token.strip_prefix("OP_") {
        if let Ok(n) = rest.parse::<i64>() {
            if (0..=16).contains(&n) {
                return Ok(Some(Opcode::Num(n)));
            }
        }
    }

    // Bare numeric literals, tried before generic mnemonic matching.
    if let Some(v) = parse_number(token) {
        if v.bits() > MAX_LITERAL_BITS {
            return Err(ExecError::UnrecognizedLiteral(token.to_string()));
        }
        return Ok(Some(Opcode::PushBytes(v)));
    }

    Ok(mnemonic(token))
}

fn mnemonic(token: &str) -> Option<Opcode> {
    let op = match token {
        "OP_NOP" => Opcode::Nop,
        "OP_IF" => Opcode::If,
        "OP_NOTIF" => Opcode::NotIf,
        "OP_ELSE" => Opcode::Else,
        "OP_ENDIF" => Opcode::EndIf,
        "OP_VERIFY" => Opcode::Verify,
        "OP_TOALTSTACK" => Opcode::ToAltStack,
        "OP_FROMALTSTACK" => Opcode::FromAltStack,
        "OP_IFDUP" => Opcode::IfDup,
        "OP_DEPTH" => Opcode::Depth,
        "OP_DROP" => Opcode::Drop,
        "OP_DUP" => Opcode::Dup,
        "OP_NIP" => Opcode::Nip,
        "OP_OVER" => Opcode::Over,
        "OP_PICK" => Opcode::Pick,
        "OP_ROLL" => Opcode::Roll,
        "OP_ROT" => Opcode::Rot,
        "OP_SWAP" => Opcode::Swap,
        "OP_TUCK" => Opcode::Tuck,
        "OP_2DROP" => Opcode::TwoDrop,
        "OP_2DUP" => Opcode::TwoDup,
        "OP_3DUP" => Opcode::ThreeDup,
        "OP_2OVER" => Opcode::TwoOver,
        "OP_2ROT" => Opcode::TwoRot,
        "OP_2SWAP" => Opcode::TwoSwap,
        "OP_CAT" => Opcode::Cat,
        "OP_EQUAL" => Opcode::Equal,
        "OP_EQUALVERIFY" => Opcode::EqualVerify,
        "OP_1ADD" => Opcode::Add1,
        "OP_1SUB" => Opcode::Sub1,
        "OP_NEGATE" => Opcode::Negate,
        "OP_ABS" => Opcode::Abs,
        "OP_NOT" => Opcode::Not,
        "OP_0NOTEQUAL" => Opcode::ZeroNotEqual,
        "OP_ADD" => Opcode::Add,
        "OP_SUB" => Opcode::Sub,
        "OP_MUL" => Opcode::Mul,
        "OP_DIV" => Opcode::Div,
        "OP_MOD" => Opcode::Mod,
        "OP_BOOLAND" => Opcode::BoolAnd,
        "OP_BOOLOR" => Opcode::BoolOr,
        "OP_NUMEQUAL" => Opcode::NumEqual,
        "OP_NUMEQUALVERIFY" => Opcode::NumEqualVerify,
        "OP_NUMNOTEQUAL" => Opcode::NumNotEqual,
        "OP_LESSTHAN" => Opcode::LessThan,
        "OP_GREATERTHAN" => Opcode::GreaterThan,
        "OP_LESSTHANOREQUAL" => Opcode::LessThanOrEqual,
        "OP_GREATERTHANOREQUAL" => Opcode::GreaterThanOrEqual,
        "OP_MIN" => Opcode::Min,
        "OP_MAX" => Opcode::Max,
        "OP_WITHIN" => Opcode::Within,
        "OP_CHECKSIG" => Opcode::CheckSig,
        "OP_CHECKSIGVERIFY" => Opcode::CheckSigVerify,
        "OP_CHECKSIGADD" => Opcode::CheckSigAdd,
        "OP_CHECKMULTISIG" => Opcode::CheckMultiSig,
        "OP_CHECKMULTISIGVERIFY" => Opcode::CheckMultiSigVerify,
        _ => return None,
    };
    Some(op)
}
