//! Initial-stack header parsing.
//!
//! An instruction block is seeded from a header carrying one or two
//! bracketed, comma-separated literal lists: `[3,4]` seeds the main stack,
//! `[3,4] [A]` seeds main and alt. This is collaborator-facing glue — the
//! editor side locates the header line; this module only interprets it.

use std::sync::LazyLock;

use regex::Regex;

use crate::value::{parse_number, Value};

static BRACKET_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]*)\]").expect("bracket-list pattern"));

/// Parse the initial stacks out of a header line.
///
/// Returns `(main, alt)` in bottom-to-top order. A missing second list is
/// an empty alt stack. Returns `None` when no bracket list is present at
/// all — the caller reports "no script header found" and the interpreter
/// is not invoked.
pub fn parse_initial_stacks(header: &str) -> Option<(Vec<Value>, Vec<Value>)> {
    let mut lists = BRACKET_LIST.captures_iter(header);
    let main = parse_list(&lists.next()?[1]);
    let alt = lists.next().map(|c| parse_list(&c[1])).unwrap_or_default();
    Some((main, alt))
}

/// Tokens that parse as numeric literals become numbers; everything else
/// is opaque text.
fn parse_list(body: &str) -> Vec<Value> {
    body.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| match parse_number(t) {
            Some(n) => Value::Number(n),
            None => Value::Text(t.to_string()),
        })
        .collect()
}
