/// Largest supported worker population (rows * cols). Keeps per-tick
/// allocations and snapshot sizes bounded.
pub const MAX_GRID_CELLS: usize = 1_000_000;

/// Largest supported run length in ticks.
pub const MAX_RUN_STEPS: usize = 1_000_000;

/// Prime multiplier used to derive per-cell RNG streams from a base seed.
/// Chosen so streams for consecutive cell indices have minimal overlap.
pub const CELL_STREAM_PRIME: u64 = 7919;

/// Prime multiplier mixed in per tick so a cell's automation draws are
/// independent across ticks.
pub const STEP_STREAM_PRIME: u64 = 15_485_863;

/// Domain offset separating initial wage draws from automation draws on
/// the same cell.
pub const WAGE_STREAM_OFFSET: u64 = 0x5747_4544_5249_4254;
