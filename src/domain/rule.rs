//! Rule AST data structures.
//!
//! A rule is a tree of comparisons between indicator columns and constants,
//! combined with AND/OR/NOT. The buy and sell rules that were hard-coded
//! (and inconsistently copied) across the original scripts are instances of
//! this one structure, supplied as configuration.

use std::fmt;

use crate::domain::indicator::IndicatorField;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Field(IndicatorField),
    Constant(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Above { left: Operand, right: Operand },
    Below { left: Operand, right: Operand },
    And(Vec<Rule>),
    Or(Vec<Rule>),
    Not(Box<Rule>),
}

impl Rule {
    /// Every indicator column the rule reads.
    pub fn referenced_fields(&self) -> Vec<IndicatorField> {
        fn push(operand: &Operand, out: &mut Vec<IndicatorField>) {
            if let Operand::Field(field) = operand {
                if !out.contains(field) {
                    out.push(*field);
                }
            }
        }

        fn collect(rule: &Rule, out: &mut Vec<IndicatorField>) {
            match rule {
                Rule::Above { left, right } | Rule::Below { left, right } => {
                    push(left, out);
                    push(right, out);
                }
                Rule::And(rules) | Rule::Or(rules) => {
                    for r in rules {
                        collect(r, out);
                    }
                }
                Rule::Not(inner) => collect(inner, out),
            }
        }

        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(field) => write!(f, "{}", field),
            Operand::Constant(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Above { left, right } => write!(f, "ABOVE({}, {})", left, right),
            Rule::Below { left, right } => write!(f, "BELOW({}, {})", left, right),
            Rule::And(rules) => {
                write!(f, "AND(")?;
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", rule)?;
                }
                write!(f, ")")
            }
            Rule::Or(rules) => {
                write!(f, "OR(")?;
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", rule)?;
                }
                write!(f, ")")
            }
            Rule::Not(inner) => write!(f, "NOT({})", inner),
        }
    }
}
