use rand::Rng;
use rand_chacha::ChaCha12Rng;
use rand_distr::{Distribution, LogNormal, Normal};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_GRID_CELLS, MAX_RUN_STEPS};
use crate::policy::{PolicyMode, TaxBracket};

/// Stochastic distribution the initial wages are drawn from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum WageDistribution {
    /// Every worker starts at the same wage.
    Fixed { value: f64 },
    Uniform { min: f64, max: f64 },
    /// Gaussian wages clipped from below at `floor` (no near-zero or
    /// negative starting wages).
    Normal { mean: f64, std_dev: f64, floor: f64 },
    LogNormal { location: f64, scale: f64 },
}

impl Default for WageDistribution {
    fn default() -> Self {
        WageDistribution::Normal {
            mean: 100.0,
            std_dev: 10.0,
            floor: 10.0,
        }
    }
}

impl WageDistribution {
    fn is_valid(&self) -> bool {
        match *self {
            WageDistribution::Fixed { value } => value.is_finite() && value >= 0.0,
            WageDistribution::Uniform { min, max } => {
                min.is_finite() && max.is_finite() && 0.0 <= min && min <= max
            }
            WageDistribution::Normal {
                mean,
                std_dev,
                floor,
            } => {
                mean.is_finite()
                    && std_dev.is_finite()
                    && floor.is_finite()
                    && std_dev >= 0.0
                    && floor >= 0.0
            }
            WageDistribution::LogNormal { location, scale } => {
                location.is_finite() && scale.is_finite() && scale >= 0.0
            }
        }
    }

    /// Draw one wage. Parameters are range-checked by `SimConfig::validate`
    /// before any sampling happens.
    pub fn sample(&self, rng: &mut ChaCha12Rng) -> f64 {
        match *self {
            WageDistribution::Fixed { value } => value,
            WageDistribution::Uniform { min, max } => {
                if min == max {
                    min
                } else {
                    rng.random_range(min..max)
                }
            }
            WageDistribution::Normal {
                mean,
                std_dev,
                floor,
            } => {
                let normal =
                    Normal::new(mean, std_dev).expect("wage distribution validated at setup");
                normal.sample(rng).max(floor)
            }
            WageDistribution::LogNormal { location, scale } => {
                let log_normal =
                    LogNormal::new(location, scale).expect("wage distribution validated at setup");
                log_normal.sample(rng)
            }
        }
    }
}

/// Policy configurations that are individually valid but mutually
/// inconsistent. Fatal at configuration time, like range errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyConflictError {
    StimulusUnderBaseline,
    BracketsWithoutProgressiveTax,
    MissingTaxBrackets,
    DeficitSpendingWithoutTransfers,
}

impl std::fmt::Display for PolicyConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyConflictError::StimulusUnderBaseline => {
                write!(f, "sigma must be 0 under the baseline policy")
            }
            PolicyConflictError::BracketsWithoutProgressiveTax => {
                write!(f, "tax_brackets require the progressive_tax policy")
            }
            PolicyConflictError::MissingTaxBrackets => write!(
                f,
                "progressive_tax policy requires a non-empty tax_brackets table"
            ),
            PolicyConflictError::DeficitSpendingWithoutTransfers => {
                write!(f, "deficit_spending requires the ubi or stimulus policy")
            }
        }
    }
}

impl std::error::Error for PolicyConflictError {}

macro_rules! define_sim_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SimConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
            PolicyConflict(PolicyConflictError),
        }

        impl std::fmt::Display for SimConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                    Self::PolicyConflict(e) => write!(f, "{e}"),
                }
            }
        }
    };
}

define_sim_config_error! {
    InvalidGridDims => "rows and cols must both be greater than 0";
    CellCountOverflow => "rows * cols overflows usize";
    TooManyCells { max: usize, actual: usize } => "too many grid cells: {} > max {}", actual, max;
    InvalidAlpha => "alpha must be finite and within [0,1]";
    InvalidBeta => "beta must be finite and within [0,1]";
    InvalidTau => "tau must be finite and within [0,1]";
    InvalidSigma => "sigma must be finite and within [0,1]";
    InvalidEpsilon => "epsilon must be finite and non-negative";
    InvalidGamma => "gamma must be finite and non-negative";
    InvalidAlphaCap => "alpha_cap must be finite and within [0,1]";
    InvalidProfitPerJob => "profit_per_automated_job must be finite and non-negative";
    InvalidSpatialContagion => "spatial_contagion must be finite and non-negative";
    InvalidWageGrowth => "wage_growth must be finite and greater than -1";
    InvalidWageDistribution => "wage_distribution parameters must be finite, non-negative, and ordered";
    InvalidMaxSteps => "max_steps must be greater than 0";
    TooManySteps { max: usize, actual: usize } => "too many steps: {} > max {}", actual, max;
    InvalidTaxBracketRate => "tax bracket rates must be finite and within [0,1]";
    InvalidTaxBracketThreshold => "tax bracket thresholds must start at 0 and be finite and strictly increasing";
}

impl std::error::Error for SimConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimConfigError::PolicyConflict(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PolicyConflictError> for SimConfigError {
    fn from(err: PolicyConflictError) -> Self {
        SimConfigError::PolicyConflict(err)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible runs.
    pub seed: u64,
    /// Grid rows; one worker per cell.
    pub rows: usize,
    /// Grid columns; one worker per cell.
    pub cols: usize,
    /// Per-tick probability an employed worker's job is automated.
    pub alpha: f64,
    /// Propensity to consume: fraction of effective income spent.
    pub beta: f64,
    /// Tax rate on wages and firm profits.
    pub tau: f64,
    /// Fraction of collected tax redistributed as transfers.
    pub sigma: f64,
    /// AI-profit demand sensitivity: how sharply profit is penalized when
    /// aggregate consumption falls below its initial baseline.
    pub epsilon: f64,
    /// Demand elasticity of the non-AI sector (revenue = gamma * consumption).
    pub gamma: f64,
    /// Regulatory ceiling on the effective per-tick automation rate.
    pub alpha_cap: f64,
    /// Labor-cost savings booked per job automated, before the demand penalty.
    pub profit_per_automated_job: f64,
    /// Spatial correlation of job loss: scales a worker's automation
    /// probability by the unemployed fraction of its grid neighbors.
    /// 0 disables the channel (independent Bernoulli draws).
    pub spatial_contagion: f64,
    /// Per-tick multiplicative wage drift for employed workers
    /// (0 = wages held constant).
    pub wage_growth: f64,
    pub wage_distribution: WageDistribution,
    pub policy_mode: PolicyMode,
    /// Marginal bracket table, required iff `policy_mode` is progressive_tax.
    pub tax_brackets: Vec<TaxBracket>,
    /// Allow transfer payouts to drive the treasury negative.
    pub deficit_spending: bool,
    /// Run length in ticks unless the economy collapses first.
    pub max_steps: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rows: 32,
            cols: 32,
            alpha: 0.05,
            beta: 0.8,
            tau: 0.3,
            sigma: 0.5,
            epsilon: 0.5,
            gamma: 0.7,
            alpha_cap: 1.0,
            profit_per_automated_job: 50.0,
            spatial_contagion: 0.0,
            wage_growth: 0.0,
            wage_distribution: WageDistribution::default(),
            policy_mode: PolicyMode::default(),
            tax_brackets: Vec::new(),
            deficit_spending: false,
            max_steps: 50,
        }
    }
}

impl SimConfig {
    pub const MAX_GRID_CELLS: usize = MAX_GRID_CELLS;
    pub const MAX_RUN_STEPS: usize = MAX_RUN_STEPS;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_grid()?;
        self.validate_rates()?;
        self.validate_firms()?;
        self.validate_wages()?;
        self.validate_steps()?;
        self.validate_brackets()?;
        self.validate_policy()?;
        Ok(())
    }

    fn validate_grid(&self) -> Result<(), SimConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SimConfigError::InvalidGridDims);
        }
        let cells = self
            .rows
            .checked_mul(self.cols)
            .ok_or(SimConfigError::CellCountOverflow)?;
        if cells > Self::MAX_GRID_CELLS {
            return Err(SimConfigError::TooManyCells {
                max: Self::MAX_GRID_CELLS,
                actual: cells,
            });
        }
        Ok(())
    }

    fn validate_rates(&self) -> Result<(), SimConfigError> {
        let unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !unit(self.alpha) {
            return Err(SimConfigError::InvalidAlpha);
        }
        if !unit(self.beta) {
            return Err(SimConfigError::InvalidBeta);
        }
        if !unit(self.tau) {
            return Err(SimConfigError::InvalidTau);
        }
        if !unit(self.sigma) {
            return Err(SimConfigError::InvalidSigma);
        }
        if !unit(self.alpha_cap) {
            return Err(SimConfigError::InvalidAlphaCap);
        }
        Ok(())
    }

    fn validate_firms(&self) -> Result<(), SimConfigError> {
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(SimConfigError::InvalidEpsilon);
        }
        if !(self.gamma.is_finite() && self.gamma >= 0.0) {
            return Err(SimConfigError::InvalidGamma);
        }
        if !(self.profit_per_automated_job.is_finite() && self.profit_per_automated_job >= 0.0) {
            return Err(SimConfigError::InvalidProfitPerJob);
        }
        if !(self.spatial_contagion.is_finite() && self.spatial_contagion >= 0.0) {
            return Err(SimConfigError::InvalidSpatialContagion);
        }
        Ok(())
    }

    fn validate_wages(&self) -> Result<(), SimConfigError> {
        if !(self.wage_growth.is_finite() && self.wage_growth > -1.0) {
            return Err(SimConfigError::InvalidWageGrowth);
        }
        if !self.wage_distribution.is_valid() {
            return Err(SimConfigError::InvalidWageDistribution);
        }
        Ok(())
    }

    fn validate_steps(&self) -> Result<(), SimConfigError> {
        if self.max_steps == 0 {
            return Err(SimConfigError::InvalidMaxSteps);
        }
        if self.max_steps > Self::MAX_RUN_STEPS {
            return Err(SimConfigError::TooManySteps {
                max: Self::MAX_RUN_STEPS,
                actual: self.max_steps,
            });
        }
        Ok(())
    }

    fn validate_brackets(&self) -> Result<(), SimConfigError> {
        if self.tax_brackets.is_empty() {
            return Ok(());
        }
        if self.tax_brackets[0].threshold != 0.0 {
            return Err(SimConfigError::InvalidTaxBracketThreshold);
        }
        let mut prev = f64::NEG_INFINITY;
        for bracket in &self.tax_brackets {
            if !(bracket.threshold.is_finite() && bracket.threshold > prev) {
                return Err(SimConfigError::InvalidTaxBracketThreshold);
            }
            if !(bracket.rate.is_finite() && (0.0..=1.0).contains(&bracket.rate)) {
                return Err(SimConfigError::InvalidTaxBracketRate);
            }
            prev = bracket.threshold;
        }
        Ok(())
    }

    fn validate_policy(&self) -> Result<(), PolicyConflictError> {
        if self.policy_mode == PolicyMode::Baseline && self.sigma != 0.0 {
            return Err(PolicyConflictError::StimulusUnderBaseline);
        }
        if self.policy_mode.is_progressive() && self.tax_brackets.is_empty() {
            return Err(PolicyConflictError::MissingTaxBrackets);
        }
        if !self.policy_mode.is_progressive() && !self.tax_brackets.is_empty() {
            return Err(PolicyConflictError::BracketsWithoutProgressiveTax);
        }
        if self.deficit_spending && !self.policy_mode.transfers_enabled() {
            return Err(PolicyConflictError::DeficitSpendingWithoutTransfers);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn validate_accepts_default() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_rates() {
        for (mutate, expected) in [
            (
                Box::new(|c: &mut SimConfig| c.alpha = 1.5) as Box<dyn Fn(&mut SimConfig)>,
                SimConfigError::InvalidAlpha,
            ),
            (
                Box::new(|c: &mut SimConfig| c.beta = -0.1),
                SimConfigError::InvalidBeta,
            ),
            (
                Box::new(|c: &mut SimConfig| c.tau = f64::NAN),
                SimConfigError::InvalidTau,
            ),
            (
                Box::new(|c: &mut SimConfig| c.sigma = 2.0),
                SimConfigError::InvalidSigma,
            ),
            (
                Box::new(|c: &mut SimConfig| c.epsilon = -1.0),
                SimConfigError::InvalidEpsilon,
            ),
            (
                Box::new(|c: &mut SimConfig| c.gamma = f64::INFINITY),
                SimConfigError::InvalidGamma,
            ),
        ] {
            let mut config = SimConfig::default();
            mutate(&mut config);
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn validate_rejects_non_positive_grid_dims() {
        let config = SimConfig {
            rows: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidGridDims));
    }

    #[test]
    fn validate_rejects_too_many_cells() {
        let config = SimConfig {
            rows: SimConfig::MAX_GRID_CELLS,
            cols: 2,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::TooManyCells { .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_max_steps() {
        let config = SimConfig {
            max_steps: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidMaxSteps));
    }

    #[test]
    fn baseline_with_nonzero_sigma_is_a_policy_conflict() {
        let config = SimConfig {
            policy_mode: PolicyMode::Baseline,
            sigma: 0.5,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::PolicyConflict(
                PolicyConflictError::StimulusUnderBaseline
            ))
        );
    }

    #[test]
    fn progressive_tax_requires_brackets() {
        let config = SimConfig {
            policy_mode: PolicyMode::ProgressiveTax,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::PolicyConflict(
                PolicyConflictError::MissingTaxBrackets
            ))
        );
    }

    #[test]
    fn brackets_outside_progressive_tax_are_a_conflict() {
        let config = SimConfig {
            tax_brackets: vec![TaxBracket {
                threshold: 0.0,
                rate: 0.1,
            }],
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::PolicyConflict(
                PolicyConflictError::BracketsWithoutProgressiveTax
            ))
        );
    }

    #[test]
    fn deficit_spending_requires_a_transfer_policy() {
        let config = SimConfig {
            policy_mode: PolicyMode::FlatTax,
            deficit_spending: true,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::PolicyConflict(
                PolicyConflictError::DeficitSpendingWithoutTransfers
            ))
        );
    }

    #[test]
    fn brackets_must_start_at_zero_and_increase() {
        let base = SimConfig {
            policy_mode: PolicyMode::ProgressiveTax,
            ..SimConfig::default()
        };
        let nonzero_start = SimConfig {
            tax_brackets: vec![TaxBracket {
                threshold: 10.0,
                rate: 0.1,
            }],
            ..base.clone()
        };
        assert_eq!(
            nonzero_start.validate(),
            Err(SimConfigError::InvalidTaxBracketThreshold)
        );

        let unordered = SimConfig {
            tax_brackets: vec![
                TaxBracket {
                    threshold: 0.0,
                    rate: 0.1,
                },
                TaxBracket {
                    threshold: 200.0,
                    rate: 0.2,
                },
                TaxBracket {
                    threshold: 100.0,
                    rate: 0.3,
                },
            ],
            ..base
        };
        assert_eq!(
            unordered.validate(),
            Err(SimConfigError::InvalidTaxBracketThreshold)
        );
    }

    #[test]
    fn validate_rejects_bad_wage_distribution() {
        let config = SimConfig {
            wage_distribution: WageDistribution::Uniform {
                min: 50.0,
                max: 10.0,
            },
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::InvalidWageDistribution)
        );
    }

    #[test]
    fn normal_wage_samples_respect_floor() {
        let dist = WageDistribution::Normal {
            mean: 10.0,
            std_dev: 50.0,
            floor: 5.0,
        };
        let mut rng = create_rng(7);
        for _ in 0..200 {
            assert!(dist.sample(&mut rng) >= 5.0);
        }
    }

    #[test]
    fn fixed_wage_samples_are_constant() {
        let dist = WageDistribution::Fixed { value: 100.0 };
        let mut rng = create_rng(7);
        assert_eq!(dist.sample(&mut rng), 100.0);
    }

    #[test]
    fn partial_config_json_deserializes_with_defaults() {
        let json = r#"{
            "seed": 7,
            "rows": 10,
            "cols": 10,
            "alpha": 0.1
        }"#;
        let cfg: SimConfig = serde_json::from_str(json).expect("partial config should parse");
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.rows, 10);
        assert!((cfg.alpha - 0.1).abs() < f64::EPSILON);
        assert!((cfg.beta - 0.8).abs() < f64::EPSILON);
        assert_eq!(cfg.policy_mode, PolicyMode::Stimulus);
        assert_eq!(cfg.wage_distribution, WageDistribution::default());
        assert!(!cfg.deficit_spending);
    }

    #[test]
    fn deserialize_rejects_unknown_policy_mode() {
        let json = r#"{ "policy_mode": "helicopter_money" }"#;
        assert!(serde_json::from_str::<SimConfig>(json).is_err());
    }

    #[test]
    fn error_display_messages_are_preserved() {
        let cases = vec![
            (
                SimConfigError::InvalidGridDims,
                "rows and cols must both be greater than 0",
            ),
            (
                SimConfigError::TooManyCells {
                    max: 100,
                    actual: 200,
                },
                "too many grid cells: 200 > max 100",
            ),
            (
                SimConfigError::InvalidAlpha,
                "alpha must be finite and within [0,1]",
            ),
            (
                SimConfigError::InvalidEpsilon,
                "epsilon must be finite and non-negative",
            ),
            (
                SimConfigError::PolicyConflict(PolicyConflictError::StimulusUnderBaseline),
                "sigma must be 0 under the baseline policy",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }
}
