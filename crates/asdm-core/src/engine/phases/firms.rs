use super::super::Engine;

impl Engine {
    /// Firm results from this tick's aggregate demand: AI profit with the
    /// demand penalty against the tick-zero baseline, and non-AI revenue.
    /// Returns the AI profit booked this tick.
    pub(in crate::engine) fn step_firm_phase(
        &mut self,
        jobs_automated: usize,
        aggregate_consumption: f64,
    ) -> f64 {
        let delta = self.ai_firm.accrue_profit(
            jobs_automated,
            aggregate_consumption,
            self.baseline_consumption,
            self.config.epsilon,
            self.config.profit_per_automated_job,
        );
        self.non_ai_firm
            .update_revenue(self.config.gamma, aggregate_consumption);
        delta
    }
}
