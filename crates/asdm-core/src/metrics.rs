use serde::{Deserialize, Serialize};

use crate::firm::{AiFirm, NonAiFirm};
use crate::government::Government;
use crate::worker::Worker;

/// Aggregate economy snapshot for one tick. One entry is appended to the
/// engine's time series per tick; external collaborators read, never write.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AggregateSnapshot {
    pub step: usize,
    pub employed_count: usize,
    pub employment_rate: f64,
    pub jobs_automated: usize,
    pub total_consumption: f64,
    pub tax_revenue: f64,
    pub stimulus_paid: f64,
    /// Cumulative AI-sector profit up to and including this tick.
    pub ai_profit: f64,
    /// AI-sector profit booked on this tick alone.
    pub ai_profit_delta: f64,
    pub non_ai_revenue: f64,
    pub treasury: f64,
    pub mean_wage: f64,
}

/// Why a run reached the TERMINAL state.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    MaxStepsReached,
    /// Employment hit zero before max_steps.
    FullCollapse,
}

impl std::fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalReason::MaxStepsReached => write!(f, "max_steps reached"),
            TerminalReason::FullCollapse => write!(f, "employment collapsed to zero"),
        }
    }
}

fn default_schema_version() -> u32 {
    1
}

/// Full result of a run: the per-tick series plus how it ended.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub terminal: TerminalReason,
    pub final_employment_rate: f64,
    pub samples: Vec<AggregateSnapshot>,
}

/// Read-only employment/wage state per cell, row-major, for heatmap
/// rendering by external collaborators.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GridSnapshot {
    pub step: usize,
    pub rows: usize,
    pub cols: usize,
    pub employed: Vec<bool>,
    pub wages: Vec<f64>,
}

/// Assemble the aggregate snapshot for one completed tick.
pub fn collect_step_metrics(
    step: usize,
    workers: &[Worker],
    ai_firm: &AiFirm,
    non_ai_firm: &NonAiFirm,
    government: &Government,
    total_consumption: f64,
    tax_revenue: f64,
    stimulus_paid: f64,
    ai_profit_delta: f64,
) -> AggregateSnapshot {
    let employed_count = workers.iter().filter(|w| w.employed).count();
    let population = workers.len().max(1) as f64;
    let wage_sum: f64 = workers.iter().map(Worker::labor_income).sum();
    AggregateSnapshot {
        step,
        employed_count,
        employment_rate: employed_count as f64 / population,
        jobs_automated: ai_firm.jobs_automated_last_step,
        total_consumption,
        tax_revenue,
        stimulus_paid,
        ai_profit: ai_firm.profit,
        ai_profit_delta,
        non_ai_revenue: non_ai_firm.revenue,
        treasury: government.treasury,
        mean_wage: wage_sum / population,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_workforce_composition() {
        let mut workers: Vec<Worker> = (0..4).map(|c| Worker::new(c, 100.0)).collect();
        workers[3].employed = false;
        workers[3].wage = 0.0;
        let ai = AiFirm::new(0.05);
        let non_ai = NonAiFirm { revenue: 210.0 };
        let gov = Government::new(0.3, 0.5);
        let snap = collect_step_metrics(1, &workers, &ai, &non_ai, &gov, 240.0, 90.0, 0.0, 0.0);
        assert_eq!(snap.employed_count, 3);
        assert!((snap.employment_rate - 0.75).abs() < 1e-12);
        assert!((snap.mean_wage - 75.0).abs() < 1e-12);
        assert!((snap.non_ai_revenue - 210.0).abs() < 1e-12);
    }

    #[test]
    fn terminal_reason_serializes_snake_case() {
        let json = serde_json::to_string(&TerminalReason::MaxStepsReached).unwrap();
        assert_eq!(json, r#""max_steps_reached""#);
    }
}
