/// The AI sector, aggregated into a single firm.
///
/// Books labor-cost savings per automated job, discounted by how far
/// aggregate demand has fallen below its initial baseline — the demand
/// side of the disruption feedback loop. Profit never feeds back into the
/// automation rate; alpha is fixed per run.
#[derive(Clone, Debug, PartialEq)]
pub struct AiFirm {
    /// Per-tick Bernoulli probability of automating an employed worker.
    pub automation_rate: f64,
    /// Cumulative profit across the run.
    pub profit: f64,
    pub jobs_automated_last_step: usize,
}

impl AiFirm {
    pub fn new(automation_rate: f64) -> Self {
        Self {
            automation_rate,
            profit: 0.0,
            jobs_automated_last_step: 0,
        }
    }

    /// Automation rate after the regulatory cap.
    pub fn effective_rate(&self, alpha_cap: f64) -> f64 {
        self.automation_rate.min(alpha_cap)
    }

    /// Book this tick's profit and return the increment.
    pub fn accrue_profit(
        &mut self,
        jobs_automated: usize,
        aggregate_consumption: f64,
        baseline_consumption: f64,
        epsilon: f64,
        profit_per_job: f64,
    ) -> f64 {
        let delta = compute_ai_profit(
            jobs_automated,
            aggregate_consumption,
            baseline_consumption,
            epsilon,
            profit_per_job,
        );
        self.profit += delta;
        self.jobs_automated_last_step = jobs_automated;
        delta
    }
}

/// Per-tick AI profit: raw labor savings scaled down by the demand
/// shortfall relative to baseline.
///
/// `shortfall` is clamped at 0 so demand above baseline never *adds*
/// profit through the epsilon channel, which keeps profit non-increasing
/// in epsilon at any demand level.
pub fn compute_ai_profit(
    jobs_automated: usize,
    aggregate_consumption: f64,
    baseline_consumption: f64,
    epsilon: f64,
    profit_per_job: f64,
) -> f64 {
    let raw = jobs_automated as f64 * profit_per_job;
    let ratio = if baseline_consumption > 0.0 {
        aggregate_consumption / baseline_consumption
    } else {
        0.0
    };
    let shortfall = (1.0 - ratio).max(0.0);
    raw * (1.0 - epsilon * shortfall).max(0.0)
}

/// The conventional sector: no automation channel, revenue tied linearly
/// to aggregate demand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NonAiFirm {
    pub revenue: f64,
}

impl NonAiFirm {
    pub fn update_revenue(&mut self, gamma: f64, aggregate_consumption: f64) {
        self.revenue = gamma * aggregate_consumption;
    }
}
