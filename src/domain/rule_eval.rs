//! Rule evaluation against an indicator frame.
//!
//! A comparison whose operand is still warming up (no value at this bar)
//! evaluates to false: a rule can never fire before every column it reads
//! is available, regardless of how the comparisons are combined.
//!
//! `AND` short-circuits on the first false child, `OR` on the first true.

use crate::domain::indicator::IndicatorFrame;
use crate::domain::rule::{Operand, Rule};

pub fn evaluate(rule: &Rule, frame: &IndicatorFrame, bar_index: usize) -> bool {
    match rule {
        Rule::Above { left, right } => {
            match (resolve(left, frame, bar_index), resolve(right, frame, bar_index)) {
                (Some(l), Some(r)) => l > r,
                _ => false,
            }
        }
        Rule::Below { left, right } => {
            match (resolve(left, frame, bar_index), resolve(right, frame, bar_index)) {
                (Some(l), Some(r)) => l < r,
                _ => false,
            }
        }
        Rule::And(rules) => rules.iter().all(|r| evaluate(r, frame, bar_index)),
        Rule::Or(rules) => rules.iter().any(|r| evaluate(r, frame, bar_index)),
        Rule::Not(inner) => !evaluate(inner, frame, bar_index),
    }
}

fn resolve(operand: &Operand, frame: &IndicatorFrame, bar_index: usize) -> Option<f64> {
    match operand {
        Operand::Field(field) => frame.value(*field, bar_index),
        Operand::Constant(v) => Some(*v),
    }
}
