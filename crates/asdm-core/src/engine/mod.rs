use std::{error::Error, fmt};

use crate::config::{SimConfig, SimConfigError};
use crate::firm::{AiFirm, NonAiFirm};
use crate::government::Government;
use crate::grid::Grid;
use crate::metrics::{
    collect_step_metrics, AggregateSnapshot, GridSnapshot, RunSummary, TerminalReason,
};
use crate::worker::{spawn_workers, Worker};

mod phases;

/// Run lifecycle. Construction covers UNINITIALIZED→READY; every accepted
/// tick passes through RUNNING; TERMINAL is entered exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Ready,
    Running,
    Terminal(TerminalReason),
}

/// Which internal-consistency invariant a tick broke.
#[derive(Clone, Debug, PartialEq)]
pub enum ConsistencyViolation {
    EmploymentRateOutOfRange { value: f64 },
    NegativeConsumption { value: f64 },
    NegativeTreasury { value: f64 },
    NonFiniteAggregate { name: &'static str, value: f64 },
}

impl fmt::Display for ConsistencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyViolation::EmploymentRateOutOfRange { value } => {
                write!(f, "employment_rate {value} outside [0,1]")
            }
            ConsistencyViolation::NegativeConsumption { value } => {
                write!(f, "aggregate consumption {value} is negative")
            }
            ConsistencyViolation::NegativeTreasury { value } => {
                write!(f, "treasury {value} went negative without deficit_spending")
            }
            ConsistencyViolation::NonFiniteAggregate { name, value } => {
                write!(f, "aggregate {name} is not finite ({value})")
            }
        }
    }
}

/// A tick produced state that violates the model's aggregate invariants.
/// Fatal: the offending tick is not recorded and the run must not continue.
/// Carries the tick index and the rejected snapshot for diagnosis.
#[derive(Clone, Debug, PartialEq)]
pub struct StateConsistencyError {
    pub step: usize,
    pub violation: ConsistencyViolation,
    pub snapshot: AggregateSnapshot,
}

impl fmt::Display for StateConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state consistency violated at tick {}: {}", self.step, self.violation)
    }
}

impl Error for StateConsistencyError {}

#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// `step()` was called after the run reached TERMINAL.
    AlreadyTerminal(TerminalReason),
    Consistency(StateConsistencyError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::AlreadyTerminal(reason) => {
                write!(f, "engine is terminal ({reason}), no further ticks accepted")
            }
            StepError::Consistency(e) => write!(f, "{e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StepError::Consistency(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StateConsistencyError> for StepError {
    fn from(err: StateConsistencyError) -> Self {
        StepError::Consistency(err)
    }
}

/// The simulation engine: owns the grid, the worker arena, both firm
/// sectors, the government, and the append-only time series. All mutation
/// happens inside `step()`; configuration is fixed at construction.
pub struct Engine {
    config: SimConfig,
    grid: Grid,
    workers: Vec<Worker>,
    ai_firm: AiFirm,
    non_ai_firm: NonAiFirm,
    government: Government,
    /// Aggregate consumption at tick zero; the reference point for the
    /// AI-profit demand penalty.
    baseline_consumption: f64,
    step_index: usize,
    state: EngineState,
    series: Vec<AggregateSnapshot>,
    /// Previous-tick employment field, reused each tick by the automation
    /// phase so contagion reads a stable snapshot.
    employed_buffer: Vec<bool>,
}

impl Engine {
    /// Validate `config` and build a READY engine.
    pub fn new(config: SimConfig) -> Result<Self, SimConfigError> {
        config.validate()?;
        let grid = Grid::new(config.rows, config.cols);
        let workers = spawn_workers(&grid, &config.wage_distribution, config.seed);
        let baseline_consumption: f64 =
            workers.iter().map(|w| config.beta * w.wage).sum();
        let ai_firm = AiFirm::new(config.alpha);
        let government = Government::new(config.tau, config.sigma);
        let worker_count = workers.len();
        Ok(Self {
            config,
            grid,
            workers,
            ai_firm,
            non_ai_firm: NonAiFirm::default(),
            government,
            baseline_consumption,
            step_index: 0,
            state: EngineState::Ready,
            series: Vec::new(),
            employed_buffer: Vec::with_capacity(worker_count),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn terminal_reason(&self) -> Option<TerminalReason> {
        match self.state {
            EngineState::Terminal(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Append-only per-tick series; read-only to callers.
    pub fn series(&self) -> &[AggregateSnapshot] {
        &self.series
    }

    pub fn employment_rate(&self) -> f64 {
        let employed = self.workers.iter().filter(|w| w.employed).count();
        employed as f64 / self.workers.len().max(1) as f64
    }

    /// Current employed/wage state per cell for heatmap consumption.
    pub fn grid_snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            step: self.step_index,
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            employed: self.workers.iter().map(|w| w.employed).collect(),
            wages: self.workers.iter().map(|w| w.wage).collect(),
        }
    }

    /// Advance the economy by one tick.
    ///
    /// Phase order is the core invariant — reordering changes the model:
    /// automation → wages/transfers → consumption → firm results →
    /// taxation → metrics. Returns the recorded snapshot, or an error if
    /// the engine is already terminal or the tick broke an invariant.
    pub fn step(&mut self) -> Result<AggregateSnapshot, StepError> {
        if let EngineState::Terminal(reason) = self.state {
            return Err(StepError::AlreadyTerminal(reason));
        }
        self.state = EngineState::Running;
        self.step_index += 1;

        let jobs_automated = self.step_automation_phase();
        let transfers = self.step_income_phase();
        let aggregate_consumption = self.step_consumption_phase(&transfers);
        let ai_profit_delta = self.step_firm_phase(jobs_automated, aggregate_consumption);
        let tax_revenue = self.step_taxation_phase(ai_profit_delta);

        let snapshot = collect_step_metrics(
            self.step_index,
            &self.workers,
            &self.ai_firm,
            &self.non_ai_firm,
            &self.government,
            aggregate_consumption,
            tax_revenue,
            transfers.total,
            ai_profit_delta,
        );
        self.check_consistency(&snapshot)?;
        self.series.push(snapshot.clone());

        if snapshot.employed_count == 0 {
            self.state = EngineState::Terminal(TerminalReason::FullCollapse);
            tracing::info!(step = self.step_index, "employment hit zero, run terminal");
        } else if self.step_index >= self.config.max_steps {
            self.state = EngineState::Terminal(TerminalReason::MaxStepsReached);
        }
        Ok(snapshot)
    }

    /// Run ticks until TERMINAL (max_steps from config, or full collapse)
    /// and return the whole series.
    pub fn run(&mut self) -> Result<RunSummary, StepError> {
        tracing::debug!(
            max_steps = self.config.max_steps,
            workers = self.workers.len(),
            "starting run"
        );
        let terminal = loop {
            if let EngineState::Terminal(reason) = self.state {
                break reason;
            }
            self.step()?;
        };
        Ok(RunSummary {
            schema_version: 1,
            steps: self.series.len(),
            terminal,
            final_employment_rate: self.employment_rate(),
            samples: self.series.clone(),
        })
    }

    fn check_consistency(&self, snapshot: &AggregateSnapshot) -> Result<(), StateConsistencyError> {
        let fail = |violation| {
            tracing::error!(step = snapshot.step, %violation, "tick aborted");
            Err(StateConsistencyError {
                step: snapshot.step,
                violation,
                snapshot: snapshot.clone(),
            })
        };
        if !(0.0..=1.0).contains(&snapshot.employment_rate) {
            return fail(ConsistencyViolation::EmploymentRateOutOfRange {
                value: snapshot.employment_rate,
            });
        }
        if snapshot.total_consumption < 0.0 {
            return fail(ConsistencyViolation::NegativeConsumption {
                value: snapshot.total_consumption,
            });
        }
        if !self.config.deficit_spending && snapshot.treasury < 0.0 {
            return fail(ConsistencyViolation::NegativeTreasury {
                value: snapshot.treasury,
            });
        }
        for (name, value) in [
            ("total_consumption", snapshot.total_consumption),
            ("tax_revenue", snapshot.tax_revenue),
            ("ai_profit", snapshot.ai_profit),
            ("non_ai_revenue", snapshot.non_ai_revenue),
            ("treasury", snapshot.treasury),
        ] {
            if !value.is_finite() {
                return fail(ConsistencyViolation::NonFiniteAggregate { name, value });
            }
        }
        Ok(())
    }
}
