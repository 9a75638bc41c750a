use rand::Rng;

use super::super::Engine;
use crate::rng;

impl Engine {
    /// Automation decision: one independent Bernoulli draw per employed
    /// worker, each from its own (seed, step, cell)-keyed sub-stream.
    /// Chosen workers lose employment and wage in place. Returns the
    /// number of jobs automated this tick.
    pub(in crate::engine) fn step_automation_phase(&mut self) -> usize {
        let alpha = self.ai_firm.effective_rate(self.config.alpha_cap);
        let contagion = self.config.spatial_contagion;

        // Contagion reads the previous tick's employment field so a draw
        // never depends on another draw made the same tick.
        self.employed_buffer.clear();
        self.employed_buffer
            .extend(self.workers.iter().map(|w| w.employed));

        let mut automated = 0usize;
        for cell in 0..self.workers.len() {
            if !self.employed_buffer[cell] {
                continue;
            }
            let mut probability = alpha;
            if contagion > 0.0 {
                let mut neighbors = 0usize;
                let mut unemployed = 0usize;
                for n in self.grid.neighbors(cell) {
                    neighbors += 1;
                    if !self.employed_buffer[n] {
                        unemployed += 1;
                    }
                }
                if neighbors > 0 {
                    let fraction = unemployed as f64 / neighbors as f64;
                    probability = (alpha * (1.0 + contagion * fraction)).min(1.0);
                }
            }
            if probability <= 0.0 {
                continue;
            }
            let mut draw = rng::derive_automation_rng(self.config.seed, self.step_index, cell);
            if draw.random_bool(probability) {
                let worker = &mut self.workers[cell];
                worker.employed = false;
                worker.wage = 0.0;
                automated += 1;
            }
        }
        automated
    }
}
