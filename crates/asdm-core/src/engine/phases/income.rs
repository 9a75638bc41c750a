use super::super::Engine;
use crate::government::TransferPlan;

impl Engine {
    /// Wage evolution for survivors, then the government's transfer plan
    /// for this tick (budgeted from the previous tick's revenue).
    pub(in crate::engine) fn step_income_phase(&mut self) -> TransferPlan {
        if self.config.wage_growth != 0.0 {
            let growth = 1.0 + self.config.wage_growth;
            for worker in self.workers.iter_mut().filter(|w| w.employed) {
                worker.wage *= growth;
            }
        }
        let total = self.workers.len();
        let unemployed = self.workers.iter().filter(|w| !w.employed).count();
        self.government.disburse_transfers(
            self.config.policy_mode,
            self.config.deficit_spending,
            total,
            unemployed,
        )
    }
}
