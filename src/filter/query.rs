//! Query rule evaluation.
//!
//! The coercion rules here match long-standing product behavior that
//! saved views depend on, and are deliberately not corrected:
//!
//! - `=` / `!=` compare stringified values; Null stringifies to "".
//! - `>` / `<` compare numeric coercions. Null coerces to `1` (not `0`).
//! - A malformed operand coerces to NaN, so the comparison is false.
//!   An empty operand coerces to `0`.
//!
//! All of these are pinned by tests.

use crate::types::{CellValue, QueryOp, QueryRule};

/// Numeric coercion of Null for `>` / `<`. Inherited behavior.
const NULL_NUMERIC: f64 = 1.0;

/// Whether a cell value satisfies one query rule.
pub(crate) fn rule_passes(rule: &QueryRule, cell: &CellValue) -> bool {
    match rule.op {
        QueryOp::Eq => cell.display() == rule.operand,
        QueryOp::Ne => cell.display() != rule.operand,
        QueryOp::Gt => cell_number(cell) > text_number(&rule.operand),
        QueryOp::Lt => cell_number(cell) < text_number(&rule.operand),
    }
}

fn cell_number(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Null => NULL_NUMERIC,
        CellValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        CellValue::Number(n) => *n,
        CellValue::Text(s) => text_number(s),
    }
}

fn text_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        0.0
    } else {
        trimmed.parse().unwrap_or(f64::NAN)
    }
}
