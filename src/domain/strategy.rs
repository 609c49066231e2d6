//! Strategy configuration: the rule pair plus the indicator parameters
//! they are evaluated against.

use crate::domain::indicator::IndicatorParams;
use crate::domain::rule::Rule;

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub name: String,
    pub description: String,
    pub buy_rule: Rule,
    pub sell_rule: Rule,
    pub indicators: IndicatorParams,
}

impl Strategy {
    /// The reference strategy from the original signal scripts:
    /// buy on weak RSI with trend or momentum confirmation, sell on
    /// overbought RSI with trend or momentum inversion.
    pub fn reference() -> Strategy {
        use crate::domain::indicator::IndicatorField::*;
        use crate::domain::rule::Operand;

        let field = |f| Operand::Field(f);
        Strategy {
            name: "RSI + MA + MACD".into(),
            description: "RSI threshold gated by MA crossover or MACD momentum".into(),
            buy_rule: Rule::And(vec![
                Rule::Below {
                    left: field(Rsi),
                    right: Operand::Constant(50.0),
                },
                Rule::Or(vec![
                    Rule::Above {
                        left: field(MaShort),
                        right: field(MaLong),
                    },
                    Rule::Above {
                        left: field(Macd),
                        right: field(MacdSignal),
                    },
                ]),
            ]),
            sell_rule: Rule::And(vec![
                Rule::Above {
                    left: field(Rsi),
                    right: Operand::Constant(70.0),
                },
                Rule::Or(vec![
                    Rule::Below {
                        left: field(MaShort),
                        right: field(MaLong),
                    },
                    Rule::Below {
                        left: field(Macd),
                        right: field(MacdSignal),
                    },
                ]),
            ]),
            indicators: IndicatorParams::default(),
        }
    }
}
