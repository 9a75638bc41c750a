use serde::{Deserialize, Serialize};

/// Closed set of intervention scenarios. New policies extend this enum and
/// the match arms in the government/firm code, never ad-hoc flags.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// No redistribution: taxes accumulate in the treasury, sigma must be 0.
    Baseline,
    /// Flat tax on wages and firm profits, transfers disabled.
    FlatTax,
    /// Marginal bracket table on wages (firm profits stay flat-taxed),
    /// transfers disabled.
    ProgressiveTax,
    /// Equal per-capita transfer to every worker, employed or not.
    Ubi,
    /// Transfer split across unemployed workers only.
    #[default]
    Stimulus,
}

impl PolicyMode {
    /// Whether this policy pays out any per-worker transfer.
    pub fn transfers_enabled(&self) -> bool {
        matches!(self, PolicyMode::Ubi | PolicyMode::Stimulus)
    }

    pub fn is_progressive(&self) -> bool {
        matches!(self, PolicyMode::ProgressiveTax)
    }
}

/// One marginal tax bracket: `rate` applies to income above `threshold`
/// up to the next bracket's threshold.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

/// Marginal tax on `income` under a bracket table.
///
/// Brackets must be validated (non-empty, zero first threshold, strictly
/// increasing) before the run starts; see `SimConfig::validate`.
pub fn marginal_tax(income: f64, brackets: &[TaxBracket]) -> f64 {
    let mut tax = 0.0;
    for (i, bracket) in brackets.iter().enumerate() {
        if income <= bracket.threshold {
            break;
        }
        let upper = brackets
            .get(i + 1)
            .map_or(income, |next| income.min(next.threshold));
        tax += bracket.rate * (upper - bracket.threshold);
    }
    tax
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket {
                threshold: 0.0,
                rate: 0.1,
            },
            TaxBracket {
                threshold: 100.0,
                rate: 0.3,
            },
        ]
    }

    #[test]
    fn marginal_tax_below_second_threshold_uses_first_rate_only() {
        let tax = marginal_tax(50.0, &two_brackets());
        assert!((tax - 5.0).abs() < 1e-12);
    }

    #[test]
    fn marginal_tax_spans_brackets() {
        // 0.1 * 100 + 0.3 * 50
        let tax = marginal_tax(150.0, &two_brackets());
        assert!((tax - 25.0).abs() < 1e-12);
    }

    #[test]
    fn marginal_tax_on_zero_income_is_zero() {
        assert_eq!(marginal_tax(0.0, &two_brackets()), 0.0);
    }

    #[test]
    fn transfers_enabled_only_for_ubi_and_stimulus() {
        assert!(PolicyMode::Ubi.transfers_enabled());
        assert!(PolicyMode::Stimulus.transfers_enabled());
        assert!(!PolicyMode::Baseline.transfers_enabled());
        assert!(!PolicyMode::FlatTax.transfers_enabled());
        assert!(!PolicyMode::ProgressiveTax.transfers_enabled());
    }
}
