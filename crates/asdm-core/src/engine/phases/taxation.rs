use super::super::Engine;

impl Engine {
    /// Tax wages and this tick's firm results, crediting the treasury.
    pub(in crate::engine) fn step_taxation_phase(&mut self, ai_profit_delta: f64) -> f64 {
        let firm_profits = ai_profit_delta + self.non_ai_firm.revenue;
        self.government.collect_tax(
            &self.workers,
            firm_profits,
            self.config.policy_mode,
            &self.config.tax_brackets,
        )
    }
}
