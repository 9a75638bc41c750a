use super::super::Engine;
use crate::government::TransferPlan;

impl Engine {
    /// Per-worker consumption: beta times effective income (labor income
    /// plus transfer). Returns aggregate consumption for the tick.
    ///
    /// Workers are independent here; the loop could be parallelized
    /// without changing results since no draw or cross-worker read occurs.
    pub(in crate::engine) fn step_consumption_phase(&mut self, transfers: &TransferPlan) -> f64 {
        let beta = self.config.beta;
        let mut aggregate = 0.0;
        for worker in &mut self.workers {
            let income = worker.labor_income() + transfers.for_worker(worker);
            worker.consumption = beta * income;
            aggregate += worker.consumption;
        }
        aggregate
    }
}
