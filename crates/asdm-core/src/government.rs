use crate::policy::{marginal_tax, PolicyMode, TaxBracket};
use crate::worker::Worker;

/// Per-worker transfer amounts for one tick, as scalars per class: a UBI
/// payment goes to every worker, an unemployment payment only to workers
/// without a job. At most one of the two is non-zero per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransferPlan {
    pub per_capita: f64,
    pub per_unemployed: f64,
    pub total: f64,
}

impl TransferPlan {
    /// Transfer received by one worker under this plan.
    pub fn for_worker(&self, worker: &Worker) -> f64 {
        if worker.employed {
            self.per_capita
        } else {
            self.per_capita + self.per_unemployed
        }
    }
}

/// Fiscal authority: taxes wages and firm profits, redistributes a share
/// of the take as stimulus or UBI, and carries the rest in the treasury.
#[derive(Clone, Debug, PartialEq)]
pub struct Government {
    pub tax_rate: f64,
    pub stimulus_fraction: f64,
    pub treasury: f64,
    /// Revenue collected on the previous tick; transfers on tick t are
    /// budgeted from tick t-1's take because collection happens after
    /// disbursement in the tick order.
    pub last_tax_revenue: f64,
}

impl Government {
    pub fn new(tax_rate: f64, stimulus_fraction: f64) -> Self {
        Self {
            tax_rate,
            stimulus_fraction,
            treasury: 0.0,
            last_tax_revenue: 0.0,
        }
    }

    /// Collect tax on employed wages and firm profits, crediting the
    /// treasury. Firm profits are always flat-taxed; wages go through the
    /// bracket table under the progressive policy.
    pub fn collect_tax(
        &mut self,
        workers: &[Worker],
        firm_profits: f64,
        policy: PolicyMode,
        brackets: &[TaxBracket],
    ) -> f64 {
        let wage_tax: f64 = if policy.is_progressive() {
            workers
                .iter()
                .map(|w| marginal_tax(w.labor_income(), brackets))
                .sum()
        } else {
            let wages: f64 = workers.iter().map(Worker::labor_income).sum();
            self.tax_rate * wages
        };
        let revenue = wage_tax + self.tax_rate * firm_profits;
        self.treasury += revenue;
        self.last_tax_revenue = revenue;
        revenue
    }

    /// Plan this tick's transfers from the previous tick's revenue.
    ///
    /// The payout never exceeds `sigma * last_tax_revenue`, and is further
    /// capped by the treasury balance unless deficit spending is enabled.
    /// Debits the treasury for the planned total.
    pub fn disburse_transfers(
        &mut self,
        policy: PolicyMode,
        deficit_spending: bool,
        total_workers: usize,
        unemployed_workers: usize,
    ) -> TransferPlan {
        if !policy.transfers_enabled() || total_workers == 0 {
            return TransferPlan::default();
        }
        let mut budget = self.stimulus_fraction * self.last_tax_revenue;
        if !deficit_spending {
            budget = budget.min(self.treasury.max(0.0));
        }
        if budget <= 0.0 {
            return TransferPlan::default();
        }

        let plan = match policy {
            PolicyMode::Ubi => TransferPlan {
                per_capita: budget / total_workers as f64,
                per_unemployed: 0.0,
                total: budget,
            },
            PolicyMode::Stimulus => {
                if unemployed_workers == 0 {
                    return TransferPlan::default();
                }
                TransferPlan {
                    per_capita: 0.0,
                    per_unemployed: budget / unemployed_workers as f64,
                    total: budget,
                }
            }
            PolicyMode::Baseline | PolicyMode::FlatTax | PolicyMode::ProgressiveTax => {
                TransferPlan::default()
            }
        };
        self.treasury -= plan.total;
        plan
    }
}
