//! Agent-based simulator of AI-automation-driven labor collapse.
//!
//! Workers on a fixed 2D grid lose jobs to stochastic automation; falling
//! wages depress aggregate demand, which feeds back into AI-firm profit
//! and non-AI revenue; a government taxes and optionally redistributes.
//! The [`engine::Engine`] owns all state and exposes a pure per-tick
//! state-transition interface; rendering, plotting, and file I/O live in
//! external callers.

pub mod config;
pub mod constants;
pub mod engine;
pub mod firm;
pub mod government;
pub mod grid;
pub mod metrics;
pub mod policy;
pub mod rng;
pub mod worker;

pub use config::{PolicyConflictError, SimConfig, SimConfigError, WageDistribution};
pub use engine::{Engine, EngineState, StateConsistencyError, StepError};
pub use metrics::{AggregateSnapshot, GridSnapshot, RunSummary, TerminalReason};
pub use policy::{PolicyMode, TaxBracket};
